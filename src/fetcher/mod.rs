pub mod headers;
pub mod http_fetcher;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use http_fetcher::HttpFetcher;

/// Redirect hops followed before a response is flagged as exceeding the limit.
pub const MAX_REDIRECTS: usize = 5;

/// Result of a header-only (HEAD) probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    pub content_type: Option<String>,
    /// Redirect hops taken. A value above [`MAX_REDIRECTS`] means following
    /// stopped early and `status` belongs to the last redirect response.
    pub redirects: usize,
    pub final_url: String,
}

impl ProbeResponse {
    pub fn exceeded_redirects(&self) -> bool {
        self.redirects > MAX_REDIRECTS
    }
}

/// Result of a page GET
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub redirects: usize,
    pub final_url: String,
    pub body: String,
}

impl PageResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn exceeded_redirects(&self) -> bool {
        self.redirects > MAX_REDIRECTS
    }
}

/// Transport-level failure, before any HTTP status was received.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP error: {0}")]
    Http(String),
}

impl TransportError {
    /// Timeouts, refused connections and broken transfers
    pub fn is_network_layer(&self) -> bool {
        !matches!(self, TransportError::Http(_))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout(e.to_string())
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else if e.is_request() || e.is_body() || e.is_decode() {
            TransportError::Network(e.to_string())
        } else {
            TransportError::Http(e.to_string())
        }
    }
}

impl From<url::ParseError> for TransportError {
    fn from(e: url::ParseError) -> Self {
        TransportError::Http(format!("invalid URL: {}", e))
    }
}

/// HTTP access used by the discovery pipeline.
///
/// Both calls send the browser-like header set and follow redirects up to
/// just past [`MAX_REDIRECTS`], reporting the hop count instead of failing.
/// Non-2xx statuses are returned, not raised.
#[async_trait]
pub trait Fetcher {
    async fn head(&self, url: &str, timeout: Duration) -> Result<ProbeResponse, TransportError>;

    async fn get(&self, url: &str, timeout: Duration) -> Result<PageResponse, TransportError>;
}
