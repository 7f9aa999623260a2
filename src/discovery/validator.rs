use std::time::Duration;

use tracing::{debug, error, warn};

use crate::discovery::DiscoveryError;
use crate::domain::UrlValidationResult;
use crate::fetcher::{Fetcher, TransportError, MAX_REDIRECTS};

/// Probe `url` with a HEAD request and report whether it answers with 2xx.
///
/// HTTP error statuses and redirect overflow come back as a non-accessible
/// result. Transport failures are returned as [`DiscoveryError::Validation`].
pub async fn validate_url(
    fetcher: &(dyn Fetcher + Send + Sync),
    url: &str,
    timeout: Duration,
) -> Result<UrlValidationResult, DiscoveryError> {
    debug!(
        "Validating URL accessibility: {} (timeout: {}s)",
        url,
        timeout.as_secs_f64()
    );

    let response = fetcher
        .head(url, timeout)
        .await
        .map_err(|e| transport_failure(url, timeout, e))?;

    if response.exceeded_redirects() {
        warn!("URL exceeded {} redirects: {}", MAX_REDIRECTS, response.redirects);
        return Ok(UrlValidationResult {
            is_accessible: false,
            status_code: Some(response.status),
            error_message: Some(format!(
                "URL exceeded maximum redirect limit ({}): {} redirects",
                MAX_REDIRECTS, response.redirects
            )),
            content_type: response.content_type,
        });
    }

    let is_accessible = (200..300).contains(&response.status);
    if is_accessible {
        debug!("URL is accessible (status: {})", response.status);
    } else {
        warn!("URL is not accessible (status: {})", response.status);
    }

    Ok(UrlValidationResult {
        is_accessible,
        status_code: Some(response.status),
        error_message: (!is_accessible).then(|| format!("HTTP {}", response.status)),
        content_type: response.content_type,
    })
}

fn transport_failure(url: &str, timeout: Duration, e: TransportError) -> DiscoveryError {
    error!("Failed to validate {}: {}", url, e);
    match e {
        TransportError::Timeout(_) => DiscoveryError::validation(
            format!("Timeout while validating URL: {}", url),
            format!(
                "The URL took too long to respond (timeout: {}s). \
                 Please check your connection and try again.",
                timeout.as_secs()
            ),
        ),
        TransportError::Connect(_) => DiscoveryError::validation(
            format!("Connection error while validating URL: {}", url),
            "Unable to connect to the URL. \
             Please check your internet connection and verify the URL is correct.",
        ),
        TransportError::Network(_) => DiscoveryError::validation(
            format!("Network error while validating URL: {}", url),
            "A network error occurred. Please check your internet connection and try again.",
        ),
        TransportError::Http(detail) => DiscoveryError::validation(
            format!("HTTP error while validating URL: {}: {}", url, detail),
            format!("Unable to access the URL: {}", detail),
        ),
    }
}
