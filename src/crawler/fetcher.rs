//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building one persistent client with a fixed identity (headers)
//! - GET requests for listing and detail pages
//! - Error classification into the non-fatal `FetchError` taxonomy
//! - Enforcing the fixed inter-request delay
//!
//! Every fetch failure is recoverable at the orchestrator level: the run
//! skips the unit of work and continues, so a transient network blip never
//! throws away progress already accumulated.

use crate::config::SiteConfig;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// A fetch failure. Always non-fatal to the run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timeout for {url}")]
    Timeout { url: String },

    #[error("connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("transport error for {url}: {message}")]
    Transport { url: String, message: String },
}

/// Builds the HTTP client used for the whole run
///
/// One client, one identity: the same User-Agent on every request keeps the
/// session looking like a single consistent browser and reuses connections.
pub fn build_http_client(site: &SiteConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(site.user_agent.clone())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues sequential GET requests with an enforced inter-request delay.
///
/// The delay is a deliberate throughput cap, applied after every request
/// whether it succeeded or not, to bound the request rate seen by the
/// target and reduce the chance of tripping its anti-bot defenses.
pub struct Fetcher {
    client: Client,
    delay: Duration,
}

impl Fetcher {
    pub fn new(client: Client, delay: Duration) -> Self {
        Self { client, delay }
    }

    /// Fetches a URL, returning the response body.
    ///
    /// Sleeps the configured delay before returning, on success and failure
    /// alike.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let result = self.get_body(url).await;
        tokio::time::sleep(self.delay).await;
        result
    }

    async fn get_body(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| classify_reqwest_error(url, e))
    }
}

/// Maps a reqwest error onto the fetch error taxonomy
fn classify_reqwest_error(url: &str, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if e.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
            message: e.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_site() -> SiteConfig {
        SiteConfig {
            base_url: "https://www.paruvendu.fr/immobilier/vente/".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
        }
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&test_site());
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(
            build_http_client(&test_site()).unwrap(),
            Duration::from_millis(0),
        );
        let body = fetcher.fetch(&format!("{}/page", server.uri())).await.unwrap();
        assert_eq!(body, "<html>ok</html>");
    }

    #[tokio::test]
    async fn test_fetch_sends_configured_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ua"))
            .and(header("user-agent", "Mozilla/5.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(
            build_http_client(&test_site()).unwrap(),
            Duration::from_millis(0),
        );
        fetcher.fetch(&format!("{}/ua", server.uri())).await.unwrap();
    }

    #[tokio::test]
    async fn test_http_error_status_is_classified() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(
            build_http_client(&test_site()).unwrap(),
            Duration::from_millis(0),
        );
        let err = fetcher
            .fetch(&format!("{}/missing", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_connection_refused_is_classified() {
        // Port 1 is essentially never listening
        let fetcher = Fetcher::new(
            build_http_client(&test_site()).unwrap(),
            Duration::from_millis(0),
        );
        let err = fetcher.fetch("http://127.0.0.1:1/").await.unwrap_err();
        assert!(matches!(err, FetchError::Connect { .. }));
    }

    #[tokio::test]
    async fn test_delay_enforced_after_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(
            build_http_client(&test_site()).unwrap(),
            Duration::from_millis(120),
        );
        let started = std::time::Instant::now();
        fetcher.fetch(&server.uri()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(120));
    }
}
