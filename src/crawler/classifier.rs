//! Failure classifier
//!
//! When a rendered document cannot be introspected, the failure is
//! indistinguishable from a true page error without a second look. The
//! classifier issues a direct network probe for the proxied URL and maps
//! the outcome onto the report's failure taxonomy. This is a heuristic
//! fallback trading precision for a best-effort explanation.

use crate::report::PageStatus;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Probes render failures to explain them
pub struct FailureClassifier {
    client: Client,
}

impl FailureClassifier {
    /// Builds the probe client; unlike the renderer it follows redirects,
    /// because seeing the final location is the point.
    pub fn new(timeout_ms: u64) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("site-scout/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_millis(timeout_ms))
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }

    /// Classifies a failed render of `original` by probing `proxied`
    ///
    /// - final URL differs from the requested one: the request was
    ///   redirected; record where it ended up
    /// - non-success status: a plain HTTP error
    /// - success: the page answered, yet its document was inaccessible
    /// - the probe itself failed: all that is known is that access failed
    pub async fn classify(&self, original: &Url, proxied: &Url) -> PageStatus {
        match self.client.get(proxied.clone()).send().await {
            Ok(response) => {
                let final_url = response.url().clone();
                let status = response.status();

                if final_url != *proxied {
                    tracing::error!("Cannot crawl {} - redirected to {}", original, final_url);
                    PageStatus::Redirect {
                        target: final_url.to_string(),
                    }
                } else if !status.is_success() {
                    tracing::error!(
                        "Cannot crawl {} - code error {} on {}",
                        original,
                        status.as_u16(),
                        final_url
                    );
                    PageStatus::CodeError(status.as_u16())
                } else {
                    tracing::error!(
                        "Cannot crawl {} - document inaccessible (status {})",
                        original,
                        status.as_u16()
                    );
                    PageStatus::Invalid(status.as_u16())
                }
            }
            Err(e) => {
                tracing::error!("Cannot crawl {} - probe failed: {}", original, e);
                PageStatus::ProbeFailed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_probe_detects_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/c"))
            .respond_with(ResponseTemplate::new(301).insert_header("Location", "/c/"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/c/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let classifier = FailureClassifier::new(5_000).unwrap();
        let original = Url::parse(&format!("{}/c", server.uri())).unwrap();
        let proxied = original.clone();

        let status = classifier.classify(&original, &proxied).await;
        assert_eq!(
            status,
            PageStatus::Redirect {
                target: format!("{}/c/", server.uri()),
            }
        );
    }

    #[tokio::test]
    async fn test_probe_detects_code_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/d"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let classifier = FailureClassifier::new(5_000).unwrap();
        let url = Url::parse(&format!("{}/d", server.uri())).unwrap();

        let status = classifier.classify(&url, &url).await;
        assert_eq!(status, PageStatus::CodeError(500));
        assert_eq!(status.to_string(), "Code error: 500");
    }

    #[tokio::test]
    async fn test_probe_success_means_invalid_access() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/e"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let classifier = FailureClassifier::new(5_000).unwrap();
        let url = Url::parse(&format!("{}/e", server.uri())).unwrap();

        let status = classifier.classify(&url, &url).await;
        assert_eq!(status, PageStatus::Invalid(200));
    }

    #[tokio::test]
    async fn test_unreachable_host_reports_access_failure() {
        // Grab an address nobody is listening on by shutting the server down.
        // A non-pooled server is required: pooled servers from
        // `MockServer::start()` keep their listener open after drop.
        let server = MockServer::builder().start().await;
        let url = Url::parse(&format!("{}/f", server.uri())).unwrap();
        drop(server);

        let classifier = FailureClassifier::new(2_000).unwrap();
        let status = classifier.classify(&url, &url).await;
        assert!(matches!(status, PageStatus::ProbeFailed(_)));
    }
}
