use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::fetcher::headers::BROWSER_USER_AGENT;

/// Configuration for the headless rendering fallback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Whether to run the browser in headless mode (default: true)
    pub headless: bool,

    /// Viewport width in pixels (default: 1920)
    pub viewport_width: u32,

    /// Viewport height in pixels (default: 1080)
    pub viewport_height: u32,

    /// Grace period after navigation for delayed scripts, in milliseconds (default: 2000)
    pub settle_ms: u64,

    /// User agent string presented by the browser
    pub user_agent: String,

    /// Explicit Chrome/Chromium binary; auto-detected when unset
    pub executable: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1920,
            viewport_height: 1080,
            settle_ms: 2000,
            user_agent: BROWSER_USER_AGENT.to_string(),
            executable: None,
        }
    }
}

impl RenderConfig {
    /// Get the post-navigation grace period as a Duration
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}
