//! Sitemap-driven URL discovery.
//!
//! The documentation site publishes a root sitemap index whose entries point
//! at per-service sitemaps; each service sitemap lists page URLs. Discovery
//! resolves both levels:
//! - [`fetch_service_list`] — root index → service-sitemap URLs (fatal on
//!   failure; without the index there is nothing to crawl)
//! - [`fetch_page_urls`] — one service sitemap → page URLs on the
//!   documentation host (failures are skippable per service)

mod client;
mod parser;

use docsweep_shared::{DocsweepError, Result, filter};
use tracing::{debug, info, instrument};

pub use client::SitemapClient;
pub use parser::entry_locations;

/// Fetch and parse the root sitemap index.
#[instrument(skip_all, fields(url = %root_url))]
pub async fn fetch_service_list(client: &SitemapClient, root_url: &str) -> Result<Vec<String>> {
    let response = client.get_root(root_url).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(DocsweepError::Network(format!("{root_url}: HTTP {status}")));
    }

    let body = response
        .text()
        .await
        .map_err(|e| DocsweepError::Network(format!("{root_url}: failed to read body: {e}")))?;
    let services = parser::entry_locations(&body)?;

    info!(count = services.len(), "root sitemap index resolved");
    Ok(services)
}

/// Fetch one service sitemap and return its page URLs on the documentation
/// host. The fetch does not follow redirects; a 3xx answer surfaces here as
/// a non-200 error and the caller skips the service.
#[instrument(skip_all, fields(url = %sitemap_url))]
pub async fn fetch_page_urls(client: &SitemapClient, sitemap_url: &str) -> Result<Vec<String>> {
    let response = client.get_service(sitemap_url).await?;
    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(DocsweepError::Network(format!(
            "{sitemap_url}: HTTP {status}"
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| DocsweepError::Network(format!("{sitemap_url}: failed to read body: {e}")))?;
    let urls: Vec<String> = parser::entry_locations(&body)?
        .into_iter()
        .filter(|url| filter::is_docs_host(url))
        .collect();

    debug!(count = urls.len(), "service sitemap resolved");
    Ok(urls)
}
