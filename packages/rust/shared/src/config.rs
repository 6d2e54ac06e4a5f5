//! Run configuration for docsweep.
//!
//! Required values (bucket, prefix, and for ingest a run timestamp) are read
//! from the environment at the CLI boundary; the structs here are plain data
//! and only re-validate that nothing arrived empty.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;

use crate::error::{DocsweepError, Result};

/// Root sitemap index for the documentation site.
pub const DEFAULT_ROOT_SITEMAP_URL: &str = "https://docs.aws.amazon.com/sitemap_index.xml";

/// Default cap on in-flight fetch operations (`SEMAPHORE` env).
pub const DEFAULT_CONCURRENCY: usize = 30;

/// Fixed delay before each page fetch, seconds.
pub const DEFAULT_THROTTLE_SECS: u64 = 2;

/// Run timestamp layout: `yyyymmddhhmmss`, UTC.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Generate a fresh run timestamp (`yyyymmddhhmmss`, UTC).
pub fn run_timestamp() -> String {
    Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

// ---------------------------------------------------------------------------
// Crawl settings
// ---------------------------------------------------------------------------

/// Settings for one live crawl run.
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Storage bucket receiving the merged output.
    pub bucket: String,
    /// Key prefix under which this run's objects are placed.
    pub prefix: String,
    /// Run timestamp, generated at startup.
    pub timestamp: String,
    /// Root sitemap index URL.
    pub root_sitemap: String,
}

impl CrawlSettings {
    /// Build settings for a new run, stamping the current UTC time.
    pub fn new(
        bucket: impl Into<String>,
        prefix: impl Into<String>,
        root_sitemap: impl Into<String>,
    ) -> Result<Self> {
        let settings = Self {
            bucket: bucket.into(),
            prefix: prefix.into(),
            timestamp: run_timestamp(),
            root_sitemap: root_sitemap.into(),
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        require_non_empty("BUCKET", &self.bucket)?;
        require_non_empty("PREFIX", &self.prefix)?;
        require_non_empty("root sitemap URL", &self.root_sitemap)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Fetch settings
// ---------------------------------------------------------------------------

/// Knobs for the bounded fetcher.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Maximum in-flight fetch operations within one batch.
    pub concurrency: usize,
    /// Fixed delay before each fetch operation.
    pub throttle: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            throttle: Duration::from_secs(DEFAULT_THROTTLE_SECS),
        }
    }
}

// ---------------------------------------------------------------------------
// Ingest settings
// ---------------------------------------------------------------------------

/// Settings for re-reading a previous run's raw dumps from storage.
#[derive(Debug, Clone)]
pub struct IngestSettings {
    /// Storage bucket holding the raw dumps.
    pub bucket: String,
    /// Key prefix the original run wrote under.
    pub prefix: String,
    /// Timestamp of the run to ingest (`yyyymmddhhmmss`).
    pub timestamp: String,
    /// Local directory the dump tree is downloaded into.
    pub work_dir: PathBuf,
}

impl IngestSettings {
    pub fn new(
        bucket: impl Into<String>,
        prefix: impl Into<String>,
        timestamp: impl Into<String>,
        work_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        let settings = Self {
            bucket: bucket.into(),
            prefix: prefix.into(),
            timestamp: timestamp.into(),
            work_dir: work_dir.into(),
        };
        require_non_empty("BUCKET", &settings.bucket)?;
        require_non_empty("PREFIX", &settings.prefix)?;
        require_non_empty("TIMESTAMP", &settings.timestamp)?;
        Ok(settings)
    }

    /// The key prefix the dump tree lives under: `<prefix>/<timestamp>/`.
    pub fn input_prefix(&self) -> String {
        format!("{}/{}/", self.prefix, self.timestamp)
    }
}

fn require_non_empty(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DocsweepError::config(format!("{name} is not set")));
    }
    Ok(())
}
