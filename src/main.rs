//! Order-Harvest main entry point
//!
//! This is the command-line interface for the Order-Harvest document harvester.

use clap::Parser;
use order_harvest::config::{load_config_with_hash, Config, SummarizerConfig};
use order_harvest::crawler::{HarvestedDocument, Harvester};
use order_harvest::ingest::{load_articles, Ingestor};
use order_harvest::output::{format_mib, write_harvest_report};
use order_harvest::storage::{open_store, DocumentStore, SqliteStore};
use order_harvest::summary::HttpSummarizer;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Order-Harvest: a batched document harvester
///
/// Order-Harvest walks a paginated listing, fetches every linked document in
/// bounded concurrent waves, saves the content region of each document and
/// optionally sends it to a structured-extraction service for storage.
#[derive(Parser, Debug)]
#[command(name = "order-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A batched document harvester", long_about = None)]
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

    /// Validate config and show what would be harvested without fetching
    #[arg(long, conflicts_with_all = ["stats", "skip_ingest", "ingest_only"])]
    dry_run: bool,

    /// Show statistics from the document database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "skip_ingest", "ingest_only"])]
    stats: bool,

    /// Harvest documents to disk without summarizing or storing them
    #[arg(long, conflicts_with = "ingest_only")]
    skip_ingest: bool,

    /// Summarize and store the articles already on disk without fetching
    #[arg(long)]
    ingest_only: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.ingest_only {
        handle_ingest_only(&config, &config_hash).await?;
    } else {
        handle_harvest(config, &config_hash, cli.skip_ingest).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("order_harvest=info,warn"),
            1 => EnvFilter::new("order_harvest=debug,info"),
            2 => EnvFilter::new("order_harvest=trace,debug"),
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

/// Handles the --dry-run mode: shows the resolved harvest plan
fn handle_dry_run(config: &Config) {
    println!("=== Order-Harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Max concurrent pages: {}",
        config.crawler.max_concurrent_pages_open
    );
    println!("  Fetch timeout: {}s", config.crawler.fetch_timeout_secs);
    println!("  Redirect limit: {}", config.crawler.redirect_limit);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    let source = &config.source;
    println!("\nSource:");
    println!("  Link prefix: {}", source.link_prefix);
    println!("  Start marker: {:?}", source.start_marker);
    println!("  End marker: {:?}", source.end_marker);
    if let Some(prefix) = &source.error_page_prefix {
        println!("  Error page prefix: {:?}", prefix);
    }
    println!(
        "  Listing pages ({}):",
        source.last_page - source.first_page + 1
    );
    for page in source.first_page..=source.last_page {
        println!("    * {}", source.listing_url_for(page));
    }

    println!("\nOutput:");
    println!("  Articles: {}", config.output.articles_dir);
    println!("  Database: {}", config.output.database_path);
    println!("  Report: {}", config.output.summary_path);

    match &config.summarizer {
        Some(summarizer) => println!("\nSummarizer: {}", summarizer.endpoint),
        None => println!("\nSummarizer: not configured, ingest will be skipped"),
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    use order_harvest::output::{load_statistics, print_statistics};

    println!("Database: {}\n", config.output.database_path);

    let store = SqliteStore::new(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&store)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(
    config: Config,
    config_hash: &str,
    skip_ingest: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(Path::new(&config.output.database_path))?;
    let run_id = store.create_run(config_hash)?;
    tracing::info!("Started run {}", run_id);

    let outcome = harvest_and_ingest(&config, &mut store, skip_ingest).await;
    finish_run(&mut store, run_id, outcome)
}

/// Handles the --ingest-only mode: ingests the articles saved by an earlier harvest
async fn handle_ingest_only(
    config: &Config,
    config_hash: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(summarizer_config) = &config.summarizer else {
        return Err("--ingest-only needs a [summarizer] section in the config".into());
    };

    let mut store = open_store(Path::new(&config.output.database_path))?;
    let run_id = store.create_run(config_hash)?;
    tracing::info!("Started ingest-only run {}", run_id);

    let outcome = ingest_saved_articles(config, summarizer_config, &mut store).await;
    finish_run(&mut store, run_id, outcome)
}

async fn ingest_saved_articles(
    config: &Config,
    summarizer_config: &SummarizerConfig,
    store: &mut SqliteStore,
) -> Result<(), Box<dyn std::error::Error>> {
    let documents = load_articles(Path::new(&config.output.articles_dir)).await?;
    if documents.is_empty() {
        tracing::warn!("No articles found in {}", config.output.articles_dir);
    }
    ingest_documents(summarizer_config, store, &documents).await
}

/// Marks the run completed or failed according to `outcome`
fn finish_run(
    store: &mut SqliteStore,
    run_id: i64,
    outcome: Result<(), Box<dyn std::error::Error>>,
) -> Result<(), Box<dyn std::error::Error>> {
    match outcome {
        Ok(()) => {
            store.complete_run(run_id)?;
            tracing::info!("Run {} completed", run_id);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Run {} failed: {}", run_id, e);
            if let Err(mark_err) = store.fail_run(run_id) {
                tracing::error!("Could not mark run {} as failed: {}", run_id, mark_err);
            }
            Err(e)
        }
    }
}

async fn harvest_and_ingest(
    config: &Config,
    store: &mut SqliteStore,
    skip_ingest: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let summary = Harvester::new(config.clone()).run().await?;

    println!(
        "Saved {} of {} documents ({} failed, {} skipped), peak memory {}",
        summary.documents_saved,
        summary.links_found,
        summary.documents_failed,
        summary.documents_skipped,
        format_mib(summary.peak_memory_bytes)
    );

    let report_path = Path::new(&config.output.summary_path);
    match write_harvest_report(&summary, report_path).await {
        Ok(()) => tracing::info!("Report written to {}", report_path.display()),
        Err(e) => tracing::warn!("Failed to write report {}: {}", report_path.display(), e),
    }

    if skip_ingest {
        tracing::info!("Skipping ingest (--skip-ingest)");
        return Ok(());
    }
    let Some(summarizer_config) = &config.summarizer else {
        tracing::info!("No summarizer configured, skipping ingest");
        return Ok(());
    };

    ingest_documents(summarizer_config, store, &summary.documents).await
}

async fn ingest_documents(
    summarizer_config: &SummarizerConfig,
    store: &mut SqliteStore,
    documents: &[HarvestedDocument],
) -> Result<(), Box<dyn std::error::Error>> {
    let summarizer = HttpSummarizer::from_config(summarizer_config)?;
    let ingestor = Ingestor::new(Arc::new(summarizer));
    let report = ingestor.ingest(store, documents).await;

    println!(
        "Stored {} documents with {} artifacts ({} skipped, {} store failures)",
        report.documents_created,
        report.artifacts_created,
        report.skipped(),
        report.store_failures
    );
    if report.has_failures() {
        tracing::warn!("Ingest was partial; run with --ingest-only to retry skipped documents");
    }

    Ok(())
}
