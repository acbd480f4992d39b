//! wallhaven.cc search client.
//!
//! Fetches a single page of search results per call, appends every item's
//! `path` to the caller's [`LinkCollector`], and reports the page metadata
//! back untouched. Pagination is driven by the query cache, one request at
//! a time.

pub mod response;

pub use response::{SearchEnvelope, SearchMeta, Wallpaper};

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};

use wallmancer_core::{Error, LinkCollector, PageMeta, PageSource, Query};

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = concat!("wallmancer/", env!("CARGO_PKG_VERSION"));

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// User-agent string (default: wallmancer/0.x).
    pub user_agent: String,
    /// Request timeout (default: 20s). The only deadline on a hung endpoint.
    pub timeout: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self { user_agent: DEFAULT_USER_AGENT.to_string(), timeout: DEFAULT_TIMEOUT }
    }
}

/// Search page fetcher backed by reqwest.
#[derive(Debug, Clone)]
pub struct WallhavenFetcher {
    http: Client,
}

impl WallhavenFetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::InvalidInput(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http })
    }

    /// The underlying HTTP client, shared with the image downloader.
    pub fn http(&self) -> &Client {
        &self.http
    }
}

#[async_trait]
impl PageSource for WallhavenFetcher {
    async fn fetch_page(&self, query: &Query, links: &LinkCollector) -> Result<PageMeta, Error> {
        let start = Instant::now();
        let url = query.redacted();

        let response = self
            .http
            .get(query.build())
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| Error::Network { url: url.clone(), message: e.to_string() })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::HttpStatus { url, status: status.as_u16() });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Network { url: url.clone(), message: format!("failed to read response: {e}") })?;

        let envelope: SearchEnvelope =
            serde_json::from_slice(&bytes).map_err(|e| Error::Decode { url: url.clone(), message: e.to_string() })?;

        let meta = envelope.page_meta();
        let items = envelope.data.len();
        links.add_links(envelope.into_paths());

        tracing::debug!(
            url = %url,
            items,
            total = meta.total,
            last_page = meta.last_page,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "fetched search page"
        );

        Ok(meta)
    }
}
