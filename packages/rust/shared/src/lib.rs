//! Shared types, error model, configuration, and URL filtering for docsweep.
//!
//! This crate is the foundation depended on by all other docsweep crates.
//! It provides:
//! - [`DocsweepError`] — the unified error type
//! - Record types ([`FetchRecord`], [`DocRecord`], [`IngestDoc`])
//! - Run settings ([`CrawlSettings`], [`FetchSettings`], [`IngestSettings`])
//! - URL eligibility predicates ([`filter`])

pub mod config;
pub mod error;
pub mod filter;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    CrawlSettings, DEFAULT_CONCURRENCY, DEFAULT_ROOT_SITEMAP_URL, DEFAULT_THROTTLE_SECS,
    FetchSettings, IngestSettings, TIMESTAMP_FORMAT, run_timestamp,
};
pub use error::{DocsweepError, Result};
pub use types::{DocRecord, FetchRecord, IngestDoc};
