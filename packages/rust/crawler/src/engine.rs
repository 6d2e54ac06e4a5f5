//! Dual-locale page fetch engine.
//!
//! Each page URL is fetched together with its Japanese (`ja_jp`) variant; a
//! pair is kept only when both sides answer 200 with usable validator
//! headers. A counting semaphore caps in-flight operations and a fixed
//! throttle spaces them out.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{ETAG, LAST_MODIFIED};
use reqwest::{Client, Response};
use tokio::sync::Semaphore;
use tracing::{debug, error, info, instrument, warn};

use docsweep_shared::{FetchRecord, FetchSettings};

/// User-Agent string for page requests.
const USER_AGENT: &str = concat!("docsweep/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Fetcher
// ---------------------------------------------------------------------------

/// Concurrency-capped fetcher for page/locale-variant pairs.
///
/// The HTTP client and the semaphore live for one [`fetch_all`] call; nothing
/// is shared across batches.
///
/// [`fetch_all`]: Fetcher::fetch_all
pub struct Fetcher {
    settings: FetchSettings,
}

impl Fetcher {
    /// Create a fetcher with the given concurrency and throttle settings.
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    /// Fetch every URL in `urls` together with its locale variant.
    ///
    /// Returns one record per input URL. This never fails: connection
    /// errors, non-200 statuses, and unusable headers all become failure
    /// records carrying a diagnostic `message`. Records are collected in
    /// spawn order; callers correlate by the URL inside each record.
    #[instrument(skip_all, fields(pages = urls.len()))]
    pub async fn fetch_all(&self, urls: &[String]) -> Vec<FetchRecord> {
        let started = Instant::now();

        let client = match Client::builder().user_agent(USER_AGENT).build() {
            Ok(client) => client,
            Err(e) => {
                error!(error = %e, "failed to build HTTP client");
                let crawled_at = now_stamp();
                return urls
                    .iter()
                    .map(|url| {
                        FetchRecord::failure(
                            url,
                            locale_variant(url),
                            &crawled_at,
                            format!("failed to build HTTP client: {e}"),
                        )
                    })
                    .collect();
            }
        };

        let semaphore = Arc::new(Semaphore::new(self.settings.concurrency));
        let mut handles = Vec::with_capacity(urls.len());

        info!(
            pages = urls.len(),
            concurrency = self.settings.concurrency,
            "starting batch"
        );

        for url in urls {
            let client = client.clone();
            let sem = semaphore.clone();
            let throttle = self.settings.throttle;
            let url = url.clone();

            handles.push(tokio::spawn(async move {
                let _permit = sem.acquire().await.expect("semaphore closed");
                tokio::time::sleep(throttle).await;
                fetch_pair(&client, &url).await
            }));
        }

        let mut records = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(record) => records.push(record),
                Err(e) => error!(error = %e, "fetch task aborted"),
            }
        }

        info!(
            pages = urls.len(),
            failed = records.iter().filter(|r| !r.is_success()).count(),
            duration_ms = started.elapsed().as_millis(),
            "batch complete"
        );

        records
    }
}

// ---------------------------------------------------------------------------
// Pair fetching
// ---------------------------------------------------------------------------

/// Fetch one page URL and its locale variant concurrently.
///
/// Both responses must be 200 and carry parsable `Last-Modified` and `Etag`
/// headers; any other combination yields a failure record, never an error.
async fn fetch_pair(client: &Client, url: &str) -> FetchRecord {
    let url_ja = locale_variant(url);
    debug!(%url, "fetching pair");

    let (primary, variant) = tokio::join!(client.get(url).send(), client.get(&url_ja).send());
    let crawled_at = now_stamp();

    let (primary, variant) = match (primary, variant) {
        (Ok(primary), Ok(variant)) => (primary, variant),
        (Err(e), _) | (_, Err(e)) => {
            warn!(%url, error = %e, "request failed");
            return FetchRecord::failure(url, &url_ja, &crawled_at, e.to_string());
        }
    };

    let status = primary.status().as_u16();
    let status_ja = variant.status().as_u16();
    if status != 200 || status_ja != 200 {
        debug!(%url, status, status_ja, "pair incomplete");
        return FetchRecord::failure(
            url,
            &url_ja,
            &crawled_at,
            format!("HTTP {status} ({url}) / HTTP {status_ja} ({url_ja})"),
        );
    }

    let (headers, headers_ja) = match (page_headers(&primary), page_headers(&variant)) {
        (Ok(headers), Ok(headers_ja)) => (headers, headers_ja),
        (Err(message), _) | (_, Err(message)) => {
            warn!(%url, %message, "unusable validator headers");
            return FetchRecord::failure(url, &url_ja, &crawled_at, message);
        }
    };

    let html = match primary.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!(%url, error = %e, "body read failed");
            return FetchRecord::failure(url, &url_ja, &crawled_at, e.to_string());
        }
    };
    let html_ja = match variant.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!(url = %url_ja, error = %e, "body read failed");
            return FetchRecord::failure(url, &url_ja, &crawled_at, e.to_string());
        }
    };

    FetchRecord {
        crawled_at,
        url: url.to_string(),
        status: Some(status),
        last_modified: Some(headers.last_modified),
        etag: Some(headers.etag),
        html: Some(html),
        url_ja,
        status_ja: Some(status_ja),
        last_modified_ja: Some(headers_ja.last_modified),
        etag_ja: Some(headers_ja.etag),
        html_ja: Some(html_ja),
        message: None,
    }
}

/// Derive the Japanese-locale URL by splicing the locale segment after the
/// host. Every `.com/` occurrence is substituted; docs URLs carry exactly
/// one. URLs without the marker come back unchanged.
fn locale_variant(url: &str) -> String {
    url.replace(".com/", ".com/ja_jp/")
}

/// Validator headers every kept response must carry.
struct PageHeaders {
    last_modified: String,
    etag: String,
}

fn page_headers(response: &Response) -> Result<PageHeaders, String> {
    let raw = required_header(response, LAST_MODIFIED)?;
    let last_modified = last_modified_iso(&raw).map_err(|e| format!("{}: {e}", response.url()))?;
    let etag = required_header(response, ETAG)?;
    Ok(PageHeaders {
        last_modified,
        etag,
    })
}

fn required_header(
    response: &Response,
    name: reqwest::header::HeaderName,
) -> Result<String, String> {
    let value = response
        .headers()
        .get(&name)
        .ok_or_else(|| format!("{}: missing {name} header", response.url()))?;
    value
        .to_str()
        .map(str::to_owned)
        .map_err(|_| format!("{}: non-ASCII {name} header", response.url()))
}

/// Normalize an RFC 2822 `Last-Modified` value to `yyyy-mm-ddThh:mm:ss`.
fn last_modified_iso(raw: &str) -> Result<String, String> {
    DateTime::parse_from_rfc2822(raw)
        .map(|stamp| stamp.format("%Y-%m-%dT%H:%M:%S").to_string())
        .map_err(|e| format!("bad Last-Modified value {raw:?}: {e}"))
}

/// Record timestamp, RFC 3339 with second precision and a `+00:00` offset.
fn now_stamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false)
}
