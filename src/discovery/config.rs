use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeouts and switches for the discovery pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// URL type probe timeout in seconds (default: 30)
    pub classify_timeout_secs: u64,

    /// Page download timeout in seconds (default: 30)
    pub fetch_timeout_secs: u64,

    /// Accessibility probe timeout in seconds (default: 15)
    pub validate_timeout_secs: u64,

    /// Browser rendering timeout in seconds (default: 30)
    pub render_timeout_secs: u64,

    /// Retry pages that answer 403 in a headless browser (default: true)
    pub browser_fallback: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            classify_timeout_secs: 30,
            fetch_timeout_secs: 30,
            validate_timeout_secs: 15,
            render_timeout_secs: 30,
            browser_fallback: true,
        }
    }
}

impl DiscoveryConfig {
    pub fn classify_timeout(&self) -> Duration {
        Duration::from_secs(self.classify_timeout_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn validate_timeout(&self) -> Duration {
        Duration::from_secs(self.validate_timeout_secs)
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.render_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeouts() {
        let config = DiscoveryConfig::default();
        assert_eq!(config.classify_timeout(), Duration::from_secs(30));
        assert_eq!(config.fetch_timeout(), Duration::from_secs(30));
        assert_eq!(config.validate_timeout(), Duration::from_secs(15));
        assert_eq!(config.render_timeout(), Duration::from_secs(30));
        assert!(config.browser_fallback);
    }
}
