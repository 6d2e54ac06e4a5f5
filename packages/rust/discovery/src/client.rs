//! Retrying HTTP client for sitemap fetches.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use tracing::warn;

use docsweep_shared::{DocsweepError, Result};

/// Total attempts for one sitemap GET (first try plus retries).
const RETRY_ATTEMPTS: u32 = 5;

/// First backoff delay; doubles after every failed attempt.
const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// User-Agent string for sitemap requests.
const USER_AGENT: &str = concat!("docsweep/", env!("CARGO_PKG_VERSION"));

/// HTTP client for root-index and service-sitemap fetches.
///
/// Carries two pooled clients: one following redirects (the root index) and
/// one with redirects disabled (service sitemaps sometimes redirect a
/// directory path to a single unrelated document, which must not be silently
/// substituted). Both retry transient failures — HTTP 500/502/503/504 or
/// connection-level errors — up to five attempts with exponential backoff.
/// Any other status is returned to the caller as-is.
pub struct SitemapClient {
    follow: Client,
    direct: Client,
    base_delay: Duration,
}

impl SitemapClient {
    pub fn new() -> Result<Self> {
        Self::with_base_delay(RETRY_BASE_DELAY)
    }

    /// Construct with a custom first backoff delay. Tests shrink this so
    /// retry paths run in milliseconds.
    pub fn with_base_delay(base_delay: Duration) -> Result<Self> {
        let follow = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DocsweepError::Network(format!("failed to build HTTP client: {e}")))?;
        let direct = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| DocsweepError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            follow,
            direct,
            base_delay,
        })
    }

    /// GET the root sitemap index, following redirects.
    pub async fn get_root(&self, url: &str) -> Result<Response> {
        self.get_with_retry(&self.follow, url).await
    }

    /// GET a service sitemap without following redirects.
    pub async fn get_service(&self, url: &str) -> Result<Response> {
        self.get_with_retry(&self.direct, url).await
    }

    async fn get_with_retry(&self, client: &Client, url: &str) -> Result<Response> {
        let mut delay = self.base_delay;

        for attempt in 1..=RETRY_ATTEMPTS {
            match client.get(url).send().await {
                Ok(response) if is_retryable_status(response.status()) => {
                    if attempt == RETRY_ATTEMPTS {
                        return Ok(response);
                    }
                    warn!(%url, status = %response.status(), attempt, "retrying sitemap fetch");
                }
                Ok(response) => return Ok(response),
                Err(e) => {
                    if attempt == RETRY_ATTEMPTS {
                        return Err(DocsweepError::Network(format!("{url}: {e}")));
                    }
                    warn!(%url, error = %e, attempt, "retrying sitemap fetch");
                }
            }
            tokio::time::sleep(delay).await;
            delay *= 2;
        }

        unreachable!("retry loop returns on the final attempt");
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 500 | 502 | 503 | 504)
}
