//! Page fetching for the crawl pipeline.
//!
//! This crate provides:
//! - [`Fetcher`] — concurrency-capped engine that fetches each page URL
//!   together with its `ja_jp` locale variant and records per-pair outcomes
//!
//! Sitemap discovery and HTML normalization live in sibling crates; this one
//! only moves bytes.

pub mod engine;

pub use engine::Fetcher;
