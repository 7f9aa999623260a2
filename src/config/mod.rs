//! Configuration management for Pick-a-Zoo.
//!
//! Settings are read from `<data-dir>/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use crate::browser::RenderConfig;
use crate::discovery::DiscoveryConfig;
use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Directory name used for application data under the working directory.
pub const DATA_DIR_NAME: &str = ".pickazoo";

/// Bookmarks file name inside the data directory.
pub const FEEDS_FILE_NAME: &str = "feeds.toml";

/// Settings file name inside the data directory.
pub const SETTINGS_FILE_NAME: &str = "config.toml";

/// Main settings struct.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub discovery: DiscoveryConfig,
    pub browser: RenderConfig,
}

impl Settings {
    /// Load settings from `path`.
    ///
    /// A missing file is created with commented defaults. An invalid file is
    /// an error; missing fields use default values.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            Self::create_default_config(path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// `<cwd>/.pickazoo`
    pub fn default_data_dir() -> Result<PathBuf, ConfigError> {
        let cwd = std::env::current_dir().map_err(|e| ConfigError::Io {
            path: PathBuf::from("."),
            source: e,
        })?;
        Ok(cwd.join(DATA_DIR_NAME))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    fn default_config_content() -> String {
        format!(
            r##"# Pick-a-Zoo Configuration
#
# Every key is optional; removed keys fall back to the values shown here.

[discovery]
# Timeout for deciding whether a URL is a stream or a web page (seconds)
classify_timeout_secs = 30

# Timeout for downloading a web page (seconds)
fetch_timeout_secs = 30

# Timeout for checking that a stream URL is reachable (seconds)
validate_timeout_secs = 15

# Timeout for loading a page in the headless browser (seconds)
render_timeout_secs = 30

# Load pages that refuse plain requests (HTTP 403) in a headless browser
browser_fallback = true

[browser]
# Run browser in headless mode (no visible window)
headless = true

# Viewport size in pixels
viewport_width = 1920
viewport_height = 1080

# Wait time after page load for delayed player scripts (milliseconds)
settle_ms = 2000

# User agent presented by the browser
user_agent = "{}"

# Chrome/Chromium binary; detected automatically when unset
# executable = "/usr/bin/chromium"
"##,
            crate::fetcher::headers::BROWSER_USER_AGENT
        )
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
