//! End-to-end crawl run: sitemap discovery → bounded dual-locale fetch →
//! normalize → merged upload.

use std::time::{Duration, Instant};

use tracing::{error, info, instrument, warn};

use docsweep_crawler::Fetcher;
use docsweep_discovery::{SitemapClient, fetch_page_urls, fetch_service_list};
use docsweep_normalize::filter_documents;
use docsweep_shared::{CrawlSettings, DocRecord, FetchSettings, Result, filter};
use docsweep_storage::{ObjectStore, gzip_bytes, merged_key, to_jsonl};

/// Summary of one crawl run.
#[derive(Debug)]
pub struct CrawlReport {
    /// Service sitemaps listed by the root index.
    pub services_total: usize,
    /// Service sitemaps actually crawled (eligible and non-empty).
    pub services_crawled: usize,
    /// Pages attempted across all crawled services, failures included.
    pub pages_fetched: usize,
    /// Documents that survived filtering and made it into the merged dump.
    pub records_kept: usize,
    /// Wall-clock duration of the whole run.
    pub elapsed: Duration,
}

/// Walk the documentation site and upload one merged dump for this run.
///
/// Discovery failures on the root index abort the run; a failing service
/// sitemap only skips that service. The merged upload happens once, at the
/// end, and is skipped when nothing survived filtering.
#[instrument(skip_all, fields(timestamp = %settings.timestamp))]
pub async fn run_crawl<S: ObjectStore>(
    settings: &CrawlSettings,
    fetch: &FetchSettings,
    store: &S,
) -> Result<CrawlReport> {
    let start = Instant::now();

    info!(
        bucket = %settings.bucket,
        prefix = %settings.prefix,
        root = %settings.root_sitemap,
        concurrency = fetch.concurrency,
        "starting crawl run"
    );

    // --- Phase 1: Discovery ---
    let client = SitemapClient::new()?;
    let services = fetch_service_list(&client, &settings.root_sitemap).await?;
    info!(services = services.len(), "root index resolved");

    // --- Phase 2: Fetch + normalize, one service at a time ---
    let fetcher = Fetcher::new(fetch.clone());
    let mut run_result: Vec<DocRecord> = Vec::new();
    let mut services_crawled = 0;
    let mut pages_fetched = 0;

    for (i, service_url) in services.iter().enumerate() {
        info!("({}/{}) {}", i + 1, services.len(), service_url);

        if !filter::is_crawlable(service_url) {
            info!(url = %service_url, "service is excluded, skipping");
            continue;
        }

        let page_urls = match fetch_page_urls(&client, service_url).await {
            Ok(urls) => urls,
            Err(e) => {
                warn!(url = %service_url, error = %e, "service sitemap failed, skipping");
                continue;
            }
        };
        if page_urls.is_empty() {
            info!(url = %service_url, "no documentation pages, skipping");
            continue;
        }

        let records = fetcher.fetch_all(&page_urls).await;
        pages_fetched += records.len();
        run_result.extend(filter_documents(&records));
        services_crawled += 1;
    }

    info!(
        fetched = pages_fetched,
        kept = run_result.len(),
        "sweep finished"
    );

    // --- Phase 3: Handoff ---
    if run_result.is_empty() {
        info!("no documents to upload");
    } else {
        let bytes = gzip_bytes(&to_jsonl(&run_result)?)?;
        let key = merged_key(&settings.prefix, &settings.timestamp);
        if let Err(e) = store.upload_merged(&settings.bucket, &key, bytes).await {
            error!(key = %key, error = %e, "merged upload failed");
            return Err(e);
        }
    }

    let report = CrawlReport {
        services_total: services.len(),
        services_crawled,
        pages_fetched,
        records_kept: run_result.len(),
        elapsed: start.elapsed(),
    };

    info!(
        services_crawled = report.services_crawled,
        pages_fetched = report.pages_fetched,
        records_kept = report.records_kept,
        elapsed_ms = report.elapsed.as_millis(),
        "crawl run complete"
    );

    Ok(report)
}
