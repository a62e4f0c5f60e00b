//! Self-Poll HTTP Client - reqwest Adapter for the PollTarget Port
//!
//! Issues plain GET requests against a fixed URL and reads the whole
//! body. No timeout, retry or rate limit is applied: a hung peer blocks
//! the poller until it answers.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::ports::poll_target::PollTarget;

/// GET-only HTTP client bound to one target URL.
#[derive(Debug, Clone)]
pub struct HttpTarget {
    /// Underlying HTTP client.
    http: Client,
    /// Absolute URL fetched on every poll.
    url: String,
}

impl HttpTarget {
    /// Create a client for the given URL.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

#[async_trait]
impl PollTarget for HttpTarget {
    async fn fetch(&self) -> Result<String> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .context("HTTP request failed")?;

        debug!(status = %response.status(), url = %self.url, "Poll response received");

        // Consuming the body releases the connection back to the pool.
        response.text().await.context("Failed to read response")
    }

    fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_url() {
        let target = HttpTarget::new("http://localhost:1234/").unwrap();
        assert_eq!(target.url(), "http://localhost:1234/");
    }

    #[tokio::test]
    async fn test_fetch_refused_reports_request_failure() {
        // Bind then drop to obtain a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let target = HttpTarget::new(format!("http://{addr}/")).unwrap();
        let err = target.fetch().await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP request failed");
    }
}
