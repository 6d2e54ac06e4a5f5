//! URL eligibility predicates.
//!
//! All checks are case-insensitive substring tests against the raw URL
//! string; no URL parsing or normalization happens here. The predicates are
//! total — a malformed URL simply fails the positive checks.

/// Canonical documentation host. Pages on any other host are dropped at
/// sitemap collection time.
pub const DOCS_HOST: &str = "docs.aws.amazon.com";

/// Markers identifying SDK/CLI/tooling documentation that must never be
/// crawled. Matched anywhere in the URL.
const DENY_MARKERS: &[&str] = &[
    "aws-sdk-php",
    "awsandroidsdk",
    "awsiossdk",
    "awsjavascriptsdk",
    "awsjavasdk",
    "awssdkrubyrecord",
    "encryption-sdk",
    "mobile-sdk",
    "pythonsdk",
    "powershell",
    "sdk-for-android",
    "sdk-for-cpp",
    "sdk-for-go",
    "sdk-for-ios",
    "sdk-for-java",
    "sdk-for-javascript",
    "sdk-for-net",
    "sdk-for-php",
    "sdk-for-php1",
    "sdk-for-ruby",
    "sdk-for-unity",
    "sdkfornet",
    "sdkfornet1",
    "xray-sdk-for-java",
    "code-samples",
];

/// Markers checked again after fetch; some only appear in the final path
/// segment a redirect reveals.
const CONTENT_MARKERS: &[&str] = &["apireference", "/cli/", "/code-samples/"];

/// True when the URL carries no deny-list marker. Applied to service-sitemap
/// URLs before they are fetched.
pub fn is_crawlable(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    !DENY_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// True when the URL points at the canonical documentation host.
pub fn is_docs_host(url: &str) -> bool {
    url.to_ascii_lowercase().contains(DOCS_HOST)
}

/// True when the URL survives the content-stage filter (no API reference,
/// CLI, or code-sample markers).
pub fn is_wanted_content(url: &str) -> bool {
    content_marker(url).is_none()
}

/// The content-stage marker the URL carries, if any. Callers log it when
/// dropping a fetched page.
pub fn content_marker(url: &str) -> Option<&'static str> {
    let lower = url.to_ascii_lowercase();
    CONTENT_MARKERS
        .iter()
        .copied()
        .find(|marker| lower.contains(marker))
}

/// The combined sitemap-stage predicate: on the documentation host and free
/// of deny-list markers.
pub fn is_eligible(url: &str) -> bool {
    is_docs_host(url) && is_crawlable(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deny_markers_reject() {
        assert!(!is_crawlable(
            "https://docs.aws.amazon.com/sdk-for-java/sitemap.xml"
        ));
        assert!(!is_crawlable(
            "https://docs.aws.amazon.com/powershell/latest/reference/sitemap.xml"
        ));
        assert!(!is_crawlable(
            "https://docs.aws.amazon.com/code-samples/latest/catalog/sitemap.xml"
        ));
    }

    #[test]
    fn deny_markers_are_case_insensitive() {
        assert!(!is_crawlable(
            "https://docs.aws.amazon.com/AWSAndroidSDK/latest/sitemap.xml"
        ));
        assert!(!is_crawlable(
            "https://docs.aws.amazon.com/SDK-for-Ruby/v3/sitemap.xml"
        ));
    }

    #[test]
    fn plain_service_sitemaps_pass() {
        assert!(is_crawlable("https://docs.aws.amazon.com/s3/sitemap.xml"));
        assert!(is_eligible(
            "https://docs.aws.amazon.com/AmazonS3/latest/userguide/Welcome.html"
        ));
    }

    #[test]
    fn foreign_hosts_are_rejected() {
        assert!(!is_eligible("https://aws.amazon.com/blogs/example.html"));
        assert!(!is_eligible("https://example.com/docs/page.html"));
    }

    #[test]
    fn content_markers_reject_after_fetch() {
        assert_eq!(
            content_marker(
                "https://docs.aws.amazon.com/goto/WebAPI/s3-2006-03-01/APIReference/Welcome.html"
            ),
            Some("apireference")
        );
        assert!(!is_wanted_content("https://docs.aws.amazon.com/cli/latest/"));
        assert!(!is_wanted_content(
            "https://docs.aws.amazon.com/code-samples/latest/catalog/s3.html"
        ));
        assert!(is_wanted_content(
            "https://docs.aws.amazon.com/AmazonS3/latest/userguide/Welcome.html"
        ));
    }

    #[test]
    fn malformed_urls_are_simply_ineligible() {
        assert!(!is_eligible(""));
        assert!(!is_eligible("not a url at all"));
    }
}
