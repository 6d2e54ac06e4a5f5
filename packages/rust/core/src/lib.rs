//! Pipeline orchestration for docsweep.
//!
//! This crate ties discovery, fetching, normalization, and storage together
//! into the two end-to-end runs: a live crawl ([`run_crawl`]) and the
//! ingestion path that republishes a previous run's raw dumps
//! ([`run_ingest`]).

pub mod ingest;
pub mod pipeline;

pub use ingest::{IngestReport, run_ingest};
pub use pipeline::{CrawlReport, run_crawl};

#[cfg(test)]
pub(crate) mod testutil;
