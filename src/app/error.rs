use thiserror::Error;

use crate::config::ConfigError;
use crate::discovery::DiscoveryError;
use crate::domain::FeedError;
use crate::fetcher::TransportError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid feed: {0}")]
    Feed(#[from] FeedError),

    #[error("HTTP client error: {0}")]
    Transport(#[from] TransportError),

    #[error("Feed not found: {0}")]
    FeedNotFound(String),

    #[error("No playable streams found on {0}")]
    NoStreamsFound(String),

    #[error("Found {count} streams; choose one with --pick")]
    AmbiguousSelection { count: usize },

    #[error("Stream {pick} does not exist; choose between 1 and {count}")]
    InvalidPick { pick: usize, count: usize },

    #[error("Stream is not accessible: {url}: {reason}")]
    NotAccessible { url: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Message suitable for showing to the user as-is
    pub fn user_message(&self) -> String {
        match self {
            AppError::Discovery(e) => e.user_message().to_string(),
            AppError::NoStreamsFound(_) => "No playable streams found on this page. \
                 Try a direct stream URL instead."
                .to_string(),
            AppError::NotAccessible { reason, .. } => format!(
                "The stream could not be reached ({}). Please check the URL and try again.",
                reason
            ),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovery_user_message_passes_through() {
        let err: AppError = DiscoveryError::validation(
            "Timeout while classifying URL: https://example.org",
            "The URL took too long to respond. Please check your connection and try again.",
        )
        .into();

        assert_eq!(
            err.user_message(),
            "The URL took too long to respond. Please check your connection and try again."
        );
        assert_eq!(err.to_string(), "Timeout while classifying URL: https://example.org");
    }

    #[test]
    fn test_feed_error_message() {
        let err: AppError = FeedError::EmptyName.into();
        assert!(err.user_message().starts_with("Invalid feed:"));
    }

    #[test]
    fn test_no_streams_message() {
        let err = AppError::NoStreamsFound("https://zoo.example.org".into());
        assert!(err.user_message().starts_with("No playable streams found on this page"));
    }
}
