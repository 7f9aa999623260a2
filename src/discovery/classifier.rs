use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use tracing::{debug, error, warn};

use crate::discovery::DiscoveryError;
use crate::domain::UrlType;
use crate::fetcher::{Fetcher, TransportError, MAX_REDIRECTS};

static DIRECT_STREAM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\.(m3u8|mp4|webm|mkv|flv)$|^(rtsp|rtmp)://)")
        .expect("direct stream regex should compile")
});

const STREAM_CONTENT_TYPES: [&str; 3] = [
    "video/",
    "application/vnd.apple.mpegurl",
    "application/x-mpegurl",
];

/// Fast path: stream file suffix or streaming scheme, no network needed
pub fn is_direct_stream_url(url: &str) -> bool {
    DIRECT_STREAM_PATTERN.is_match(url.trim())
}

/// Map a `Content-Type` header onto a URL type. Unknown or missing types are
/// treated as pages so the caller still gets a chance to scrape them.
pub fn url_type_for_content_type(content_type: Option<&str>) -> UrlType {
    let content_type = content_type.unwrap_or("").trim().to_ascii_lowercase();

    if content_type.contains("text/html") {
        return UrlType::HtmlPage;
    }
    if STREAM_CONTENT_TYPES
        .iter()
        .any(|prefix| content_type.starts_with(prefix))
    {
        return UrlType::DirectStream;
    }
    UrlType::HtmlPage
}

/// Decide whether `url` is a direct stream or an HTML page.
pub async fn classify(
    fetcher: &(dyn Fetcher + Send + Sync),
    url: &str,
    timeout: Duration,
) -> Result<UrlType, DiscoveryError> {
    debug!("Detecting URL type for: {}", url);

    if is_direct_stream_url(url) {
        debug!("URL matched direct stream pattern");
        return Ok(UrlType::DirectStream);
    }

    let response = fetcher.head(url, timeout).await.map_err(|e| {
        error!("Failed to probe {}: {}", url, e);
        match e {
            TransportError::Timeout(_) => DiscoveryError::validation(
                format!("Timeout while detecting URL type: {}", url),
                "The URL took too long to respond. Please check your connection and try again.",
            ),
            TransportError::Connect(_) | TransportError::Network(_) => {
                DiscoveryError::validation(
                    format!("Network error while detecting URL type: {}", url),
                    "Unable to connect to the URL. Please check your internet connection and try again.",
                )
            }
            TransportError::Http(detail) => DiscoveryError::general(
                format!("HTTP error while detecting URL type: {}: {}", url, detail),
                format!("Unable to access the URL: {}", detail),
            ),
        }
    })?;

    if response.exceeded_redirects() {
        warn!("URL exceeded {} redirects: {}", MAX_REDIRECTS, response.redirects);
        return Err(DiscoveryError::general(
            format!("URL exceeded maximum redirect limit ({}): {}", MAX_REDIRECTS, url),
            "URL redirects too many times. Please check the URL.",
        ));
    }

    debug!("Content-Type: {:?}", response.content_type);
    let url_type = url_type_for_content_type(response.content_type.as_deref());
    debug!("URL detected as {}", url_type);
    Ok(url_type)
}
