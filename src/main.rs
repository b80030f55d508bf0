//! Immo-Harvest main entry point
//!
//! This is the command-line interface for the Immo-Harvest listing crawler.

use anyhow::Context;
use clap::Parser;
use immo_harvest::config::load_config_with_hash;
use immo_harvest::crawler::crawl;
use immo_harvest::storage::DatasetStore;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Immo-Harvest: a resumable classifieds crawler
///
/// Immo-Harvest walks a paginated real-estate classifieds site city by
/// city, checkpointing its position after every page so an interrupted run
/// resumes where it left off, and merges each run's haul into a persistent
/// deduplicated CSV dataset.
#[derive(Parser, Debug)]
#[command(name = "immo-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A resumable classifieds crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Ignore the checkpoint and start from the first segment
    #[arg(long)]
    fresh: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show a summary of the persisted dataset and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }
    if cli.stats {
        return handle_stats(&config);
    }
    handle_crawl(config, cli.fresh).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("immo_harvest=info,warn"),
            1 => EnvFilter::new("immo_harvest=debug,info"),
            2 => EnvFilter::new("immo_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &immo_harvest::config::Config) {
    println!("=== Immo-Harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Pages per segment: {}", config.crawler.pages_per_segment);
    println!("  Per-run record cap: {}", config.crawler.max_records_per_run);
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);

    println!("\nSite:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  User agent: {}", config.site.user_agent);

    println!("\nOutput:");
    println!("  Dataset: {}", config.output.dataset_path);
    println!("  Checkpoint: {}", config.output.checkpoint_path);

    println!("\nSegments ({}):", config.crawler.segments.len());
    for segment in &config.crawler.segments {
        println!("  - {}", segment);
    }

    println!("\nLocation selector chain:");
    for (i, selector) in config.selectors.location.iter().enumerate() {
        println!("  {}. {}", i + 1, selector);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would crawl up to {} pages across {} segments",
        config.crawler.pages_per_segment as usize * config.crawler.segments.len(),
        config.crawler.segments.len()
    );
}

/// Handles the --stats mode: summarizes the persisted dataset
fn handle_stats(config: &immo_harvest::config::Config) -> anyhow::Result<()> {
    use std::collections::BTreeMap;

    println!("Dataset: {}\n", config.output.dataset_path);

    let store = DatasetStore::new(&config.output.dataset_path);
    let records = store.load().context("failed to read dataset")?;

    let mut per_segment: BTreeMap<&str, usize> = BTreeMap::new();
    let mut with_location = 0usize;
    for record in &records {
        *per_segment.entry(record.segment.as_str()).or_default() += 1;
        if !record.location_text.is_empty() {
            with_location += 1;
        }
    }

    println!("=== Dataset Statistics ===\n");
    println!("Total records: {}", records.len());
    println!("Records with location: {}", with_location);
    println!("\nRecords per segment:");
    for (segment, count) in per_segment {
        println!("  {:<20} {}", segment, count);
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: immo_harvest::config::Config, fresh: bool) -> anyhow::Result<()> {
    if fresh {
        tracing::info!("Starting fresh crawl (ignoring previous checkpoint)");
    } else {
        tracing::info!("Starting crawl (will resume from checkpoint if present)");
    }

    let report = crawl(config, fresh).await.context("crawl failed")?;

    println!("Run finished: {}", report.outcome);
    println!("  Listings fetched this run: {}", report.records_fetched);
    println!("  New records merged:        {}", report.new_records);
    println!("  Dataset size:              {}", report.dataset_size);
    println!("  Next run resumes at:       {}", report.cursor);

    Ok(())
}
