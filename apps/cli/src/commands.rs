//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::info;

use docsweep_core::{run_crawl, run_ingest};
use docsweep_shared::{
    CrawlSettings, DEFAULT_CONCURRENCY, DEFAULT_ROOT_SITEMAP_URL, DEFAULT_THROTTLE_SECS,
    FetchSettings, IngestSettings,
};
use docsweep_storage::S3Store;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// docsweep — bulk crawler for the AWS documentation site.
#[derive(Parser)]
#[command(
    name = "docsweep",
    version,
    about = "Crawl AWS documentation in two locales and dump it to object storage.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Crawl the live documentation site and upload one merged dump.
    Crawl {
        /// Storage bucket receiving the dump.
        #[arg(long, env = "BUCKET")]
        bucket: String,

        /// Key prefix this run's objects are placed under.
        #[arg(long, env = "PREFIX")]
        prefix: String,

        /// Maximum in-flight page fetches.
        #[arg(long, env = "SEMAPHORE", default_value_t = DEFAULT_CONCURRENCY)]
        concurrency: usize,

        /// Root sitemap index to start from.
        #[arg(long, default_value = DEFAULT_ROOT_SITEMAP_URL)]
        root_sitemap: String,

        /// Fixed delay before each page fetch, in seconds.
        #[arg(long, default_value_t = DEFAULT_THROTTLE_SECS)]
        throttle_secs: u64,
    },

    /// Republish a previous run's raw dumps for the translation stage.
    Ingest {
        /// Storage bucket holding the raw dumps.
        #[arg(long, env = "BUCKET")]
        bucket: String,

        /// Key prefix the original run wrote under.
        #[arg(long, env = "PREFIX")]
        prefix: String,

        /// Timestamp of the run to ingest (yyyymmddhhmmss).
        #[arg(long, env = "TIMESTAMP")]
        timestamp: String,

        /// Local directory the dump tree is downloaded into.
        #[arg(long, default_value = "/tmp")]
        work_dir: PathBuf,
    },
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "docsweep=info",
        1 => "docsweep=debug",
        _ => "docsweep=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Crawl {
            bucket,
            prefix,
            concurrency,
            root_sitemap,
            throttle_secs,
        } => cmd_crawl(bucket, prefix, concurrency, root_sitemap, throttle_secs).await,
        Command::Ingest {
            bucket,
            prefix,
            timestamp,
            work_dir,
        } => cmd_ingest(bucket, prefix, timestamp, work_dir).await,
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_crawl(
    bucket: String,
    prefix: String,
    concurrency: usize,
    root_sitemap: String,
    throttle_secs: u64,
) -> Result<()> {
    let settings = CrawlSettings::new(bucket, prefix, root_sitemap)?;
    let fetch = FetchSettings {
        concurrency,
        throttle: Duration::from_secs(throttle_secs),
    };

    info!(
        timestamp = %settings.timestamp,
        concurrency,
        "starting crawl"
    );

    let store = S3Store::connect().await;
    let report = run_crawl(&settings, &fetch, &store).await?;

    println!();
    println!("  Crawl complete.");
    println!(
        "  Services:  {}/{} crawled",
        report.services_crawled, report.services_total
    );
    println!("  Pages:     {}", report.pages_fetched);
    println!("  Kept:      {}", report.records_kept);
    println!("  Time:      {:.1}s", report.elapsed.as_secs_f64());
    println!();

    Ok(())
}

async fn cmd_ingest(
    bucket: String,
    prefix: String,
    timestamp: String,
    work_dir: PathBuf,
) -> Result<()> {
    let settings = IngestSettings::new(bucket, prefix, timestamp, work_dir)?;

    info!(timestamp = %settings.timestamp, "starting ingest");

    let store = S3Store::connect().await;
    let report = run_ingest(&settings, &store).await?;

    println!();
    println!("  Ingest complete.");
    println!("  Files:     {}", report.files_read);
    println!("  Records:   {}", report.records_read);
    println!("  Kept:      {}", report.documents_kept);
    println!("  Uploaded:  {}", report.documents_uploaded);
    println!("  Time:      {:.1}s", report.elapsed.as_secs_f64());
    println!();

    Ok(())
}
