//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::Section;
use crate::source::DataSource;
use clap::Parser;
use std::path::PathBuf;

/// satboard - SAT solver benchmark results aggregator
///
/// Fetches a JSON results document, aggregates run outcomes by status
/// and by solver, ranks solvers and summarises size versus time in a
/// Markdown or JSON report.
///
/// Examples:
///   satboard
///   satboard --source ./results.json --format json -o report.json
///   satboard --section stats --top 25
///   satboard --dry-run
///   satboard --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Results document to read (http(s) URL or local path)
    ///
    /// Defaults to the value in .satboard.toml, then to the public
    /// benchmark results URL.
    #[arg(short, long, value_name = "URL|FILE", env = "SATBOARD_SOURCE")]
    pub source: Option<String>,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .satboard.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// HTTP request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Name of the table holding the result records
    #[arg(long, value_name = "NAME")]
    pub table: Option<String>,

    /// Number of solvers in the full ranking
    #[arg(long, value_name = "COUNT")]
    pub top: Option<usize>,

    /// Number of size buckets for the time trend
    #[arg(long, value_name = "COUNT")]
    pub bins: Option<usize>,

    /// Render only one dashboard section
    ///
    /// home: overview and top solvers. stats: full ranking and size/time
    /// distribution. Both are rendered when omitted.
    #[arg(long, value_name = "SECTION")]
    pub section: Option<Section>,

    /// Dry run: fetch the document and count records without writing a report
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .satboard.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        if self.top == Some(0) {
            return Err("Top must be at least 1".to_string());
        }

        if self.bins == Some(0) {
            return Err("Bins must be at least 1".to_string());
        }

        if let Some(ref table) = self.table {
            if table.trim().is_empty() {
                return Err("Table name cannot be empty".to_string());
            }
        }

        // Local sources must exist; URLs are checked when fetched
        if let Some(ref source) = self.source {
            if let DataSource::File(path) = DataSource::parse(source) {
                if !path.is_file() {
                    return Err(format!("Source file does not exist: {}", path.display()));
                }
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is `[general] verbose` from the config file;
    /// `--quiet` still wins over it.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            source: None,
            output: None,
            format: OutputFormat::Markdown,
            config: None,
            verbose: false,
            quiet: false,
            timeout: None,
            table: None,
            top: None,
            bins: None,
            section: None,
            dry_run: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "satboard",
            "--source",
            "https://example.org/results.json",
            "--format",
            "json",
            "--section",
            "stats",
            "--top",
            "3",
        ])
        .unwrap();

        assert_eq!(args.source.as_deref(), Some("https://example.org/results.json"));
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.section, Some(Section::Stats));
        assert_eq!(args.top, Some(3));
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_values() {
        let mut args = make_args();
        args.timeout = Some(0);
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.top = Some(0);
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.bins = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_empty_table() {
        let mut args = make_args();
        args.table = Some("  ".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_source_file() {
        let mut args = make_args();
        args.source = Some("/no/such/results.json".to_string());
        assert!(args.validate().is_err());

        args.source = Some("https://example.org/results.json".to_string());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(false), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(false), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(false), tracing::Level::ERROR);
    }

    #[test]
    fn test_log_level_from_config() {
        let mut args = make_args();
        assert_eq!(args.log_level(true), tracing::Level::DEBUG);

        args.quiet = true;
        assert_eq!(args.log_level(true), tracing::Level::ERROR);
    }
}
