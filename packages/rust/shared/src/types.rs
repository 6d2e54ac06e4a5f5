//! Record types flowing through the crawl and ingest pipelines.
//!
//! Field names and declaration order match the JSONL layout consumed by the
//! downstream translation stage; do not reorder without coordinating there.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// FetchRecord
// ---------------------------------------------------------------------------

/// One fetch operation's outcome: the page URL, its `ja_jp` locale variant,
/// and per-locale status/headers/body.
///
/// Invariant: on success every data field is present and both statuses are
/// 200; on failure every data field is `None` and `message` holds the
/// diagnostic. There is no partial success per side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchRecord {
    /// When both responses settled (RFC 3339, seconds, UTC).
    pub crawled_at: String,
    pub url: String,
    pub status: Option<u16>,
    /// `Last-Modified` normalized to `yyyy-mm-ddThh:mm:ss`.
    pub last_modified: Option<String>,
    pub etag: Option<String>,
    pub html: Option<String>,
    pub url_ja: String,
    pub status_ja: Option<u16>,
    pub last_modified_ja: Option<String>,
    pub etag_ja: Option<String>,
    pub html_ja: Option<String>,
    /// Failure diagnostic; `None` on success.
    pub message: Option<String>,
}

impl FetchRecord {
    /// A failure outcome: all data fields null, diagnostic in `message`.
    pub fn failure(
        url: impl Into<String>,
        url_ja: impl Into<String>,
        crawled_at: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            crawled_at: crawled_at.into(),
            url: url.into(),
            status: None,
            last_modified: None,
            etag: None,
            html: None,
            url_ja: url_ja.into(),
            status_ja: None,
            last_modified_ja: None,
            etag_ja: None,
            html_ja: None,
            message: Some(message.into()),
        }
    }

    /// True when both locales answered 200 and carried a body.
    pub fn is_success(&self) -> bool {
        self.status == Some(200)
            && self.status_ja == Some(200)
            && self.html.is_some()
            && self.html_ja.is_some()
    }
}

// ---------------------------------------------------------------------------
// DocRecord
// ---------------------------------------------------------------------------

/// The normalized, storage-ready document: both locales parsed and paired.
/// A record missing either locale is never emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocRecord {
    pub crawled_at: String,
    pub url: String,
    pub last_modified: String,
    pub product: Option<String>,
    pub guide: Option<String>,
    pub title: String,
    pub content: String,
    pub raw_html: String,
    pub url_ja: String,
    pub last_modified_ja: String,
    pub product_ja: Option<String>,
    pub guide_ja: Option<String>,
    pub title_ja: String,
    pub content_ja: String,
    pub raw_html_ja: String,
}

// ---------------------------------------------------------------------------
// IngestDoc
// ---------------------------------------------------------------------------

/// Primary-locale record republished by the ingest path for the translation
/// stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestDoc {
    pub url: String,
    pub product: Option<String>,
    pub guide: Option<String>,
    pub title: String,
    pub content: String,
    pub raw_html: String,
    pub last_modified: Option<String>,
    pub crawled_at: String,
}
