use thiserror::Error;

/// Failures surfaced by the feed-discovery pipeline.
///
/// Every variant carries a technical `message` (the `Display` form, meant for
/// logs) and a `user_message` suitable for showing as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    /// Generic discovery failure
    #[error("{message}")]
    General {
        message: String,
        user_message: String,
    },

    /// Network-layer failure (timeout, refused connection, broken transfer)
    #[error("{message}")]
    Validation {
        message: String,
        user_message: String,
    },

    /// HTML, or the base URL needed to interpret it, could not be parsed
    #[error("{message}")]
    Parse {
        message: String,
        user_message: String,
    },

    /// The rendering engine never finished loading the page
    #[error("{message}")]
    BrowserTimeout {
        message: String,
        user_message: String,
    },

    /// The rendering engine is missing or could not be started
    #[error("{message}")]
    AutomationUnavailable {
        message: String,
        user_message: String,
    },
}

impl DiscoveryError {
    pub fn general(message: impl Into<String>, user_message: impl Into<String>) -> Self {
        DiscoveryError::General {
            message: message.into(),
            user_message: user_message.into(),
        }
    }

    pub fn validation(message: impl Into<String>, user_message: impl Into<String>) -> Self {
        DiscoveryError::Validation {
            message: message.into(),
            user_message: user_message.into(),
        }
    }

    pub fn parse(message: impl Into<String>, user_message: impl Into<String>) -> Self {
        DiscoveryError::Parse {
            message: message.into(),
            user_message: user_message.into(),
        }
    }

    pub fn browser_timeout(message: impl Into<String>, user_message: impl Into<String>) -> Self {
        DiscoveryError::BrowserTimeout {
            message: message.into(),
            user_message: user_message.into(),
        }
    }

    pub fn automation_unavailable(
        message: impl Into<String>,
        user_message: impl Into<String>,
    ) -> Self {
        DiscoveryError::AutomationUnavailable {
            message: message.into(),
            user_message: user_message.into(),
        }
    }

    pub fn user_message(&self) -> &str {
        match self {
            DiscoveryError::General { user_message, .. }
            | DiscoveryError::Validation { user_message, .. }
            | DiscoveryError::Parse { user_message, .. }
            | DiscoveryError::BrowserTimeout { user_message, .. }
            | DiscoveryError::AutomationUnavailable { user_message, .. } => user_message,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, DiscoveryError::Validation { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, DiscoveryError::Parse { .. })
    }
}
