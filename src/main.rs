//! satboard - SAT solver benchmark results aggregator
//!
//! A CLI tool that fetches a JSON results document, aggregates run
//! outcomes by status and by solver, and writes a dashboard-style report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (fetch failure, missing results table, write failure, etc.)

mod analysis;
mod cli;
mod config;
mod models;
mod report;
mod source;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::Config;
use models::{navigate, NavAction, ResultRecord, Section};
use report::ReportOptions;
use source::{DataSource, FetchOptions};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config first: `[general] verbose` decides the log level
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(args.log_level(config.general.verbose));

    info!("satboard v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Configuration: {:?}", config);

    if let Err(e) = run(args, config).await {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .satboard.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(config::CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            config::CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", config::CONFIG_FILE);
    println!("   Edit it to change the source URL, ranking sizes and binning.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Fetch, aggregate and report.
async fn run(args: Args, config: Config) -> Result<()> {
    let start_time = Instant::now();

    let data_source = DataSource::parse(&config.source.url);
    let fetch_options = FetchOptions {
        timeout_seconds: config.source.timeout_seconds,
        show_progress: !args.quiet,
    };

    println!("📥 Loading results: {}", data_source);
    let records = load_records(&data_source, &config.source.table, &fetch_options).await?;

    if args.dry_run {
        return handle_dry_run(&records);
    }

    let section = args
        .section
        .map(|s| navigate(Section::default(), NavAction::Select(s)));

    let options = ReportOptions {
        source: data_source.to_string(),
        table: config.source.table.clone(),
        home_top: config.ranking.home_top,
        stats_top: config.ranking.stats_top,
        binning: (&config.distribution).into(),
        section,
    };

    println!("\n🔬 Aggregating {} records...", records.len());
    let report = report::build_report(&records, &options, start_time);

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };

    let output_path = &config.general.output;
    std::fs::write(output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path))?;

    println!("\n📊 Results Summary:");
    println!("   Problems: {}", report.headline.total);
    println!("   Success rate (SAT): {}", report.headline.success_rate);
    let breakdown: Vec<String> = report
        .status_shares
        .iter()
        .map(|s| format!("{}: {}", s.status, s.count))
        .collect();
    if !breakdown.is_empty() {
        println!("   {}", breakdown.join(" | "));
    }
    if let Some(best) = report.ranking.first() {
        println!(
            "   Best solver: {} ({}/{} solved)",
            best.name, best.solved, best.attempts
        );
    }
    println!("   Solvers: {}", report.solvers.len());
    println!(
        "\n✅ Report saved to: {} ({:.1}s)",
        output_path,
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Fetch the document and pull out the result records.
async fn load_records(
    data_source: &DataSource,
    table: &str,
    options: &FetchOptions,
) -> Result<Vec<ResultRecord>> {
    let datasets = source::fetch_document(data_source, options)
        .await
        .with_context(|| format!("Failed to load results from {}", data_source))?;
    debug!("Document holds {} datasets", datasets.len());

    let records = source::extract_table(&datasets, table)?;
    if records.is_empty() {
        warn!("Table '{}' contains no records", table);
    }

    Ok(records)
}

/// Handle --dry-run: report what was found, write nothing.
fn handle_dry_run(records: &[ResultRecord]) -> Result<()> {
    println!("\n🔍 Dry run: {} records found.\n", records.len());

    let counts = analysis::status_counts(records);
    if counts.is_empty() {
        println!("   No status information.");
    } else {
        for (status, count) in &counts {
            println!("     {} {}", status, count);
        }
    }

    println!("\n✅ Dry run complete. No report was written.");
    Ok(())
}

/// Load configuration from file or use defaults, then apply CLI overrides.
///
/// Runs before the subscriber is installed, so problems go to stderr.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match args.config {
        Some(ref config_path) => Config::load(config_path)?,
        None => match Config::load_default() {
            Ok(Some(config)) => config,
            Ok(None) => Config::default(),
            Err(e) => {
                eprintln!("⚠️  Failed to load config, using defaults: {:#}", e);
                Config::default()
            }
        },
    };

    config.merge_with_args(args);
    config.validate()?;

    Ok(config)
}
