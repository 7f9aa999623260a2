//! Feed discovery: turn an arbitrary URL into playable stream candidates.
//!
//! # Architecture
//!
//! ```text
//! URL → classify ─┬─ direct stream ───────────────────────────→ candidate
//!                 └─ HTML page → fetch (403 → browser render) → extract → candidates
//! candidate → validate → store
//! ```
//!
//! The individual steps are plain functions ([`classify`], [`extract_streams`],
//! [`validate_url`]) so they can be driven with any [`Fetcher`]; [`FeedDiscovery`]
//! bundles them with the configured timeouts and the optional browser fallback.

mod classifier;
mod config;
mod error;
mod extractor;
mod validator;

pub use classifier::{classify, is_direct_stream_url, url_type_for_content_type};
pub use config::DiscoveryConfig;
pub use error::DiscoveryError;
pub use extractor::extract_streams;
pub use validator::validate_url;

use std::fmt;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::browser::Renderer;
use crate::domain::{StreamCandidate, UrlType, UrlValidationResult};
use crate::fetcher::{Fetcher, PageResponse, TransportError};

/// Where the scraped HTML came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSource {
    /// Plain HTTP GET
    Http,
    /// Headless browser after the site answered 403
    Browser,
    /// The body of the 403 response itself
    BlockedResponse,
}

impl fmt::Display for PageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PageSource::Http => "http",
            PageSource::Browser => "browser",
            PageSource::BlockedResponse => "blocked response",
        })
    }
}

/// Outcome of [`FeedDiscovery::discover`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    /// The URL itself is playable
    DirectStream { url: String },
    /// The URL is a page; `candidates` may be empty
    Page {
        candidates: Vec<StreamCandidate>,
        source: PageSource,
    },
}

pub struct FeedDiscovery {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    renderer: Option<Arc<dyn Renderer + Send + Sync>>,
    config: DiscoveryConfig,
}

impl FeedDiscovery {
    pub fn new(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        renderer: Option<Arc<dyn Renderer + Send + Sync>>,
        config: DiscoveryConfig,
    ) -> Self {
        Self {
            fetcher,
            renderer,
            config,
        }
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    pub async fn classify(&self, url: &str) -> Result<UrlType, DiscoveryError> {
        classify(self.fetcher.as_ref(), url, self.config.classify_timeout()).await
    }

    pub fn extract(&self, html: &str, base_url: &str) -> Result<Vec<StreamCandidate>, DiscoveryError> {
        extract_streams(html, base_url)
    }

    pub async fn validate(&self, url: &str) -> Result<UrlValidationResult, DiscoveryError> {
        validate_url(self.fetcher.as_ref(), url, self.config.validate_timeout()).await
    }

    pub async fn render(&self, url: &str) -> Result<String, DiscoveryError> {
        let Some(renderer) = self.renderer.as_ref() else {
            return Err(DiscoveryError::automation_unavailable(
                "Browser rendering is not configured",
                "Browser automation is not available. Please use a direct stream URL.",
            ));
        };
        renderer.render(url, self.config.render_timeout()).await
    }

    /// GET a page with browser-like headers. Any HTTP status is returned;
    /// only transport failures and redirect overflow are errors.
    pub async fn fetch_page(&self, url: &str) -> Result<PageResponse, DiscoveryError> {
        let page = self
            .fetcher
            .get(url, self.config.fetch_timeout())
            .await
            .map_err(|e| {
                error!("Failed to fetch page {}: {}", url, e);
                match e {
                    TransportError::Timeout(_) => DiscoveryError::validation(
                        format!("Timeout while fetching page: {}", url),
                        "Request timed out while fetching the page. \
                         Please check your connection and try again.",
                    ),
                    TransportError::Connect(detail) | TransportError::Network(detail) => {
                        DiscoveryError::validation(
                            format!("Network error while fetching page: {}: {}", url, detail),
                            format!(
                                "Network error: {}. Please check your connection and try again.",
                                detail
                            ),
                        )
                    }
                    TransportError::Http(detail) => DiscoveryError::general(
                        format!("HTTP error while fetching page: {}: {}", url, detail),
                        format!("Unable to access the URL: {}", detail),
                    ),
                }
            })?;

        if page.exceeded_redirects() {
            return Err(DiscoveryError::general(
                format!("Page exceeded maximum redirect limit: {}", url),
                "URL redirects too many times. Please check the URL.",
            ));
        }

        info!("Fetched HTML content from {} ({} bytes)", url, page.body.len());
        Ok(page)
    }

    /// Full discovery flow for a user-supplied URL
    pub async fn discover(&self, url: &str) -> Result<Discovery, DiscoveryError> {
        if self.classify(url).await? == UrlType::DirectStream {
            return Ok(Discovery::DirectStream {
                url: url.to_string(),
            });
        }

        let page = self.fetch_page(url).await?;

        if page.is_success() {
            let candidates = self.extract(&page.body, &page.final_url)?;
            return Ok(Discovery::Page {
                candidates,
                source: PageSource::Http,
            });
        }

        if page.status == 403 {
            return self.discover_forbidden(url, &page).await;
        }

        Err(DiscoveryError::general(
            format!("Failed to fetch page {}: HTTP {}", url, page.status),
            format!(
                "Failed to fetch page: HTTP {}. Please check the URL and try again.",
                page.status
            ),
        ))
    }

    /// The site refused the plain client: render it in a browser, and failing
    /// that scrape whatever the 403 response carried.
    async fn discover_forbidden(
        &self,
        url: &str,
        page: &PageResponse,
    ) -> Result<Discovery, DiscoveryError> {
        let mut fallback_error = None;

        if self.config.browser_fallback {
            info!("403 received for {}, attempting browser fallback", url);
            match self.render(url).await {
                Ok(html) => {
                    let candidates = self.extract(&html, url)?;
                    return Ok(Discovery::Page {
                        candidates,
                        source: PageSource::Browser,
                    });
                }
                Err(e) => {
                    warn!("Browser fallback failed: {}", e);
                    fallback_error = Some(e);
                }
            }
        }

        match self.extract(&page.body, &page.final_url) {
            Ok(candidates) if !candidates.is_empty() => {
                info!("Found {} streams despite 403", candidates.len());
                return Ok(Discovery::Page {
                    candidates,
                    source: PageSource::BlockedResponse,
                });
            }
            Ok(_) => {}
            Err(e) => warn!("Failed to parse 403 response: {}", e),
        }

        Err(fallback_error.unwrap_or_else(|| {
            DiscoveryError::general(
                format!("Access denied (HTTP 403): {}", url),
                "Access denied (403 Forbidden). The site may be blocking automated requests. \
                 Try accessing the page in a browser first, or provide a direct stream URL instead.",
            )
        }))
    }
}
