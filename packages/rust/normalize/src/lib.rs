//! HTML normalization for fetched page pairs.
//!
//! This crate provides:
//! - [`parse_page`] — structured fields (title, product/guide tags, visible
//!   text) out of one HTML document
//! - [`filter_documents`] — the batch pass that turns successful fetch
//!   records into storage-ready [`DocRecord`]s, dropping everything the
//!   translation stage cannot use

mod text;

use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};

use docsweep_shared::{DocRecord, DocsweepError, FetchRecord, Result, filter};

pub use text::visible_text;

// ---------------------------------------------------------------------------
// Page parsing
// ---------------------------------------------------------------------------

/// Fields parsed out of one locale's HTML document.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPage {
    pub title: String,
    pub product: Option<String>,
    pub guide: Option<String>,
    pub content: String,
}

/// Parse one HTML document into its normalized fields.
///
/// Fails only when the document has no `<title>` element; missing meta tags
/// and empty bodies degrade to absent or empty fields.
pub fn parse_page(html: &str) -> Result<ParsedPage> {
    let doc = Html::parse_document(html);

    let title_sel = Selector::parse("title").unwrap();
    let title = doc
        .select(&title_sel)
        .next()
        .ok_or_else(|| DocsweepError::parse("document has no title element"))?
        .text()
        .collect::<String>();

    let (product, guide) = meta_tags(&doc);
    let content = text::visible_text(&doc);

    Ok(ParsedPage {
        title,
        product,
        guide,
        content,
    })
}

/// Scan every `<meta>` element for `product` and `guide` tags.
///
/// Later elements win, and a tag without a `content` attribute resets its
/// field to `None`. Cannot fail.
fn meta_tags(doc: &Html) -> (Option<String>, Option<String>) {
    let meta_sel = Selector::parse("meta").unwrap();
    let mut product = None;
    let mut guide = None;

    for el in doc.select(&meta_sel) {
        match el.value().attr("name") {
            Some("product") => product = el.value().attr("content").map(str::to_string),
            Some("guide") => guide = el.value().attr("content").map(str::to_string),
            _ => {}
        }
    }

    (product, guide)
}

// ---------------------------------------------------------------------------
// Batch filtering
// ---------------------------------------------------------------------------

/// Filter and normalize one batch of fetch records.
///
/// A record survives only when the pair fetch succeeded end to end, the
/// primary URL is wanted content, and both locales parse. Drops are logged
/// with the URL; nothing here fails the batch. Given the same input this
/// produces the same output.
#[instrument(skip_all, fields(records = records.len()))]
pub fn filter_documents(records: &[FetchRecord]) -> Vec<DocRecord> {
    let mut docs = Vec::new();

    for record in records {
        if !record.is_success() {
            debug!(url = %record.url, "dropping failed fetch");
            continue;
        }
        if let Some(marker) = filter::content_marker(&record.url) {
            debug!(url = %record.url, marker, "dropping unwanted content");
            continue;
        }

        // is_success leaves these populated; anything else is a malformed
        // record and gets dropped the same way.
        let (Some(html), Some(html_ja), Some(last_modified), Some(last_modified_ja)) = (
            record.html.as_deref(),
            record.html_ja.as_deref(),
            record.last_modified.clone(),
            record.last_modified_ja.clone(),
        ) else {
            warn!(url = %record.url, "dropping record with missing fields");
            continue;
        };

        let (page, page_ja) = match (parse_page(html), parse_page(html_ja)) {
            (Ok(page), Ok(page_ja)) => (page, page_ja),
            (Err(e), _) | (_, Err(e)) => {
                warn!(url = %record.url, error = %e, "dropping unparsable page");
                continue;
            }
        };

        docs.push(DocRecord {
            crawled_at: record.crawled_at.clone(),
            url: record.url.clone(),
            last_modified,
            product: page.product,
            guide: page.guide,
            title: page.title,
            content: page.content,
            raw_html: html.to_string(),
            url_ja: record.url_ja.clone(),
            last_modified_ja,
            product_ja: page_ja.product,
            guide_ja: page_ja.guide,
            title_ja: page_ja.title,
            content_ja: page_ja.content,
            raw_html_ja: html_ja.to_string(),
        });
    }

    info!(
        kept = docs.len(),
        dropped = records.len() - docs.len(),
        "batch normalized"
    );

    docs
}
