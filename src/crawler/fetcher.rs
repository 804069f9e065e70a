//! HTTP transport
//!
//! The transport owns everything below the crawl engine: redirect
//! following, timeouts, and compression. Workers see either a
//! [`FetchedPage`] (for any status code with a readable body) or a
//! transport error, which the engine degrades to a synthetic 500.

use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Raw result of fetching one URL
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after following redirects
    pub final_url: String,

    /// HTTP status code
    pub status: u16,

    /// Response headers
    pub headers: HashMap<String, String>,

    /// Response body
    pub body: String,
}

/// Errors below the crawl engine's recovery line
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request failed for {url}: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("Failed to read body from {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

/// Boundary contract between the crawl engine and the network
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, TransportError>;
}

/// Builds the HTTP client used by the default transport
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("gossamer/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Default reqwest-backed transport
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client()?,
        })
    }

    /// Uses a caller-configured client (custom headers, cookies, proxy)
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, TransportError> {
        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|source| TransportError::Request {
                    url: url.to_string(),
                    source,
                })?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();

        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        // Non-2xx responses keep their body; the engine still scans
        // them for links.
        let body = response
            .text()
            .await
            .map_err(|source| TransportError::Body {
                url: url.to_string(),
                source,
            })?;

        Ok(FetchedPage {
            final_url,
            status,
            headers,
            body,
        })
    }
}
