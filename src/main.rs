//! Khabargir main entry point
//!
//! This is the command-line interface for the Khabargir news crawler.

use clap::Parser;
use khabargir::config::{load_or_default, Config};
use khabargir::crawler::{crawl_site, CrawlRequest, HttpFetcher};
use khabargir::sites::Site;
use khabargir::storage::{export_csv, RecordStore, SqliteStorage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

/// Khabargir: a crawler for Persian-language news sites
///
/// Khabargir walks a news site by article ID, listing page or daily
/// archive, extracts each article into a fixed set of columns and merges
/// the results into a per-site SQLite database.
#[derive(Parser, Debug)]
#[command(name = "khabargir")]
#[command(version)]
#[command(about = "A crawler for Persian-language news sites", long_about = None)]
struct Cli {
    /// Site to crawl
    #[arg(long, value_enum)]
    site: Site,

    /// First article ID or listing page (resumes from the database if omitted)
    #[arg(long)]
    start: Option<u64>,

    /// Article IDs or listing pages to walk; days back for daily archives
    #[arg(long, default_value_t = 10)]
    count: u64,

    /// Database path (defaults to <database-dir>/<site>.db)
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Also export every stored record to this CSV file
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Show statistics from the database and exit
    #[arg(long)]
    stats: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    let (config, config_hash) = match load_or_default(cli.config.as_deref()) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let database = cli
        .output
        .clone()
        .unwrap_or_else(|| default_database(&config, cli.site));

    if cli.stats {
        handle_stats(&database)?;
    } else {
        handle_crawl(&cli, config, &config_hash, &database).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("khabargir=info,warn"),
            1 => EnvFilter::new("khabargir=debug,info"),
            2 => EnvFilter::new("khabargir=trace,debug"),
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

fn default_database(config: &Config, site: Site) -> PathBuf {
    Path::new(&config.output.database_dir).join(format!("{}.db", site.name()))
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(database: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Database: {}\n", database.display());

    let storage = SqliteStorage::new(database)?;

    println!("Records:   {}", storage.count_records()?);
    match storage.max_page()? {
        Some(page) => println!("Max page:  {}", page),
        None => println!("Max page:  -"),
    }
    println!("Links:     {}", storage.load_links()?.len());

    match storage.latest_run()? {
        Some(run) => {
            println!("\nLatest run #{} ({})", run.id, run.site);
            println!("  Started:  {}", run.started_at);
            println!(
                "  Finished: {}",
                run.finished_at.as_deref().unwrap_or("-")
            );
            println!("  Status:   {}", run.status.to_db_string());
            if let Some(reason) = run.stop_reason {
                println!("  Stopped:  {}", reason);
            }
            println!("  Records:  {}", run.records_saved);
        }
        None => println!("\nNo runs recorded"),
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    cli: &Cli,
    config: Config,
    config_hash: &str,
    database: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Database: {}", database.display());
    let storage = SqliteStorage::new(database)?;
    let fetcher = Arc::new(HttpFetcher::new(config.fetch.clone())?);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing in-flight requests");
            let _ = shutdown_tx.send(true);
        }
    });

    let mut request = CrawlRequest::new(cli.site, cli.count);
    request.start = cli.start;

    let (storage, report) = match crawl_site(
        fetcher,
        &config,
        config_hash,
        storage,
        &request,
        shutdown_rx,
    )
    .await
    {
        Ok(done) => done,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    if let Some(csv_path) = &cli.csv {
        let written = export_csv(&storage, csv_path)?;
        tracing::info!("Exported {} records to {}", written, csv_path.display());
    }

    println!("{}", report.summary);
    println!(
        "Saved {} records in {} batches; {} rows in {}",
        report.totals.records_received,
        report.totals.batches,
        storage.count_records()?,
        database.display()
    );

    Ok(())
}
