//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.satboard.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".satboard.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Results document settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Ranking settings.
    #[serde(default)]
    pub ranking: RankingConfig,

    /// Size/time distribution settings.
    #[serde(default)]
    pub distribution: DistributionConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "satboard_report.md".to_string()
}

/// Where and how to read the results document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// URL or local path of the results document.
    #[serde(default = "default_url")]
    pub url: String,

    /// Name of the table holding the result records.
    #[serde(default = "default_table")]
    pub table: String,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            table: default_table(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_url() -> String {
    "https://www.cril.univ-artois.fr/~lecoutre/teaching/jssae/code5/results.json".to_string()
}

fn default_table() -> String {
    "results".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Ranking lengths per section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Solvers listed on the home section.
    #[serde(default = "default_home_top")]
    pub home_top: usize,

    /// Solvers listed on the stats section.
    #[serde(default = "default_stats_top")]
    pub stats_top: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            home_top: default_home_top(),
            stats_top: default_stats_top(),
        }
    }
}

fn default_home_top() -> usize {
    5
}

fn default_stats_top() -> usize {
    15
}

/// Trend binning settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionConfig {
    /// Number of equal-width size buckets.
    #[serde(default = "default_bins")]
    pub bins: usize,

    /// A bucket needs strictly more qualifying members than this to
    /// produce a trend point.
    #[serde(default = "default_min_bucket_members")]
    pub min_bucket_members: usize,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            bins: default_bins(),
            min_bucket_members: default_min_bucket_members(),
        }
    }
}

fn default_bins() -> usize {
    20
}

fn default_min_bucket_members() -> usize {
    5
}

impl From<&DistributionConfig> for crate::analysis::BinningOptions {
    fn from(config: &DistributionConfig) -> Self {
        Self {
            bins: config.bins,
            min_members: config.min_bucket_members,
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only values the user actually passed override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref source) = args.source {
            self.source.url = source.clone();
        }
        if let Some(ref table) = args.table {
            self.source.table = table.clone();
        }
        if let Some(timeout) = args.timeout {
            self.source.timeout_seconds = timeout;
        }
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }
        if let Some(top) = args.top {
            self.ranking.stats_top = top;
        }
        if let Some(bins) = args.bins {
            self.distribution.bins = bins;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Reject values that would leave the report empty or the fetch
    /// unbounded. Run after `merge_with_args`, since flags may override
    /// the file.
    pub fn validate(&self) -> Result<()> {
        if self.source.table.trim().is_empty() {
            anyhow::bail!("[source] table cannot be empty");
        }
        if self.source.timeout_seconds == 0 {
            anyhow::bail!("[source] timeout_seconds must be at least 1");
        }
        if self.ranking.home_top == 0 {
            anyhow::bail!("[ranking] home_top must be at least 1");
        }
        if self.ranking.stats_top == 0 {
            anyhow::bail!("[ranking] stats_top must be at least 1");
        }
        if self.distribution.bins == 0 {
            anyhow::bail!("[distribution] bins must be at least 1");
        }
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
