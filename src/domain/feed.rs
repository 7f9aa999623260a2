use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Schemes a saved feed may point at.
pub const ALLOWED_SCHEMES: [&str; 4] = ["http", "https", "rtsp", "rtmp"];

/// Window size assigned to newly added feeds.
pub const DEFAULT_WINDOW_SIZE: WindowSize = WindowSize {
    width: 1280,
    height: 720,
};

/// Smallest playback window accepted by [`Feed::set_window_size`].
pub const MIN_WINDOW_SIZE: WindowSize = WindowSize {
    width: 320,
    height: 240,
};

/// Largest playback window accepted by [`Feed::set_window_size`].
pub const MAX_WINDOW_SIZE: WindowSize = WindowSize {
    width: 7680,
    height: 4320,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    #[error("Feed name must be a non-empty string after stripping whitespace")]
    EmptyName,

    #[error("Invalid feed URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Unsupported URL scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("Window size must be positive, got {width}x{height}")]
    InvalidWindowSize { width: u32, height: u32 },

    #[error(
        "Window size {width}x{height} is outside the allowed range \
         ({}x{} to {}x{})",
        MIN_WINDOW_SIZE.width,
        MIN_WINDOW_SIZE.height,
        MAX_WINDOW_SIZE.width,
        MAX_WINDOW_SIZE.height
    )]
    WindowSizeOutOfBounds { width: u32, height: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WindowSizeEntry")]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl WindowSize {
    pub fn new(width: u32, height: u32) -> Result<Self, FeedError> {
        if width == 0 || height == 0 {
            return Err(FeedError::InvalidWindowSize { width, height });
        }
        Ok(Self { width, height })
    }

    /// Whether the size fits inside the playback window bounds
    pub fn within_bounds(&self) -> bool {
        (MIN_WINDOW_SIZE.width..=MAX_WINDOW_SIZE.width).contains(&self.width)
            && (MIN_WINDOW_SIZE.height..=MAX_WINDOW_SIZE.height).contains(&self.height)
    }
}

impl std::fmt::Display for WindowSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Deserialize)]
struct WindowSizeEntry {
    width: u32,
    height: u32,
}

impl TryFrom<WindowSizeEntry> for WindowSize {
    type Error = FeedError;

    fn try_from(entry: WindowSizeEntry) -> Result<Self, Self::Error> {
        WindowSize::new(entry.width, entry.height)
    }
}

/// A saved camera feed (bookmark).
///
/// Construction always validates: the name is trimmed and non-empty, the URL
/// is absolute with a host and one of [`ALLOWED_SCHEMES`]. Name uniqueness is
/// the caller's job (see [`crate::store::resolve_duplicate_name`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FeedEntry", into = "FeedEntry")]
pub struct Feed {
    pub name: String,
    pub url: Url,
    pub window_size: Option<WindowSize>,
}

impl Feed {
    pub fn new(name: &str, url: &str) -> Result<Self, FeedError> {
        Ok(Self {
            name: validate_name(name)?,
            url: parse_feed_url(url)?,
            window_size: None,
        })
    }

    pub fn with_window_size(mut self, size: WindowSize) -> Self {
        self.window_size = Some(size);
        self
    }

    /// Update the playback window size, enforcing the window bounds
    pub fn set_window_size(&mut self, size: WindowSize) -> Result<(), FeedError> {
        if !size.within_bounds() {
            return Err(FeedError::WindowSizeOutOfBounds {
                width: size.width,
                height: size.height,
            });
        }
        self.window_size = Some(size);
        Ok(())
    }

    /// Re-check invariants on a feed whose public fields may have been edited
    pub fn validate(&self) -> Result<(), FeedError> {
        if self.name.trim().is_empty() || self.name.trim() != self.name {
            return Err(FeedError::EmptyName);
        }
        check_url(&self.url)?;
        if let Some(size) = self.window_size {
            WindowSize::new(size.width, size.height)?;
        }
        Ok(())
    }
}

/// On-disk shape of a feed entry. Field order is the written key order.
#[derive(Serialize, Deserialize)]
struct FeedEntry {
    name: String,
    url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    window_size: Option<WindowSize>,
}

impl TryFrom<FeedEntry> for Feed {
    type Error = FeedError;

    fn try_from(entry: FeedEntry) -> Result<Self, Self::Error> {
        let mut feed = Feed::new(&entry.name, &entry.url)?;
        feed.window_size = entry.window_size;
        Ok(feed)
    }
}

impl From<Feed> for FeedEntry {
    fn from(feed: Feed) -> Self {
        Self {
            name: feed.name,
            url: feed.url.to_string(),
            window_size: feed.window_size,
        }
    }
}

fn validate_name(name: &str) -> Result<String, FeedError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(FeedError::EmptyName);
    }
    Ok(trimmed.to_string())
}

fn parse_feed_url(raw: &str) -> Result<Url, FeedError> {
    let url = Url::parse(raw.trim()).map_err(|e| FeedError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    check_url(&url)?;
    Ok(url)
}

fn check_url(url: &Url) -> Result<(), FeedError> {
    if !ALLOWED_SCHEMES.contains(&url.scheme()) {
        return Err(FeedError::UnsupportedScheme(url.scheme().to_string()));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(FeedError::InvalidUrl {
            url: url.to_string(),
            reason: "missing host".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_trimmed() {
        let feed = Feed::new("  Panda Cam  ", "https://example.org/panda.m3u8").unwrap();
        assert_eq!(feed.name, "Panda Cam");
        assert_eq!(feed.url.as_str(), "https://example.org/panda.m3u8");
        assert!(feed.window_size.is_none());
    }

    #[test]
    fn test_blank_name_rejected() {
        assert_eq!(
            Feed::new("   ", "https://example.org/a.mp4"),
            Err(FeedError::EmptyName)
        );
        assert_eq!(Feed::new("", "https://example.org/a.mp4"), Err(FeedError::EmptyName));
    }

    #[test]
    fn test_relative_url_rejected() {
        let err = Feed::new("Cam", "/live/stream.m3u8").unwrap_err();
        assert!(matches!(err, FeedError::InvalidUrl { .. }));
    }

    #[test]
    fn test_unsupported_scheme_rejected() {
        let err = Feed::new("Cam", "ftp://example.org/a.mp4").unwrap_err();
        assert_eq!(err, FeedError::UnsupportedScheme("ftp".into()));
    }

    #[test]
    fn test_stream_schemes_accepted() {
        assert!(Feed::new("Cam", "rtsp://camera.local:554/live").is_ok());
        assert!(Feed::new("Cam", "rtmp://example.org/app/stream").is_ok());
    }

    #[test]
    fn test_window_size_must_be_positive() {
        assert!(WindowSize::new(0, 720).is_err());
        assert!(WindowSize::new(1280, 0).is_err());
        // Construction does not apply playback bounds
        assert!(WindowSize::new(10, 10).is_ok());
    }

    #[test]
    fn test_set_window_size_enforces_bounds() {
        let mut feed = Feed::new("Cam", "https://example.org/a.mp4").unwrap();

        let too_small = WindowSize::new(319, 240).unwrap();
        assert!(matches!(
            feed.set_window_size(too_small),
            Err(FeedError::WindowSizeOutOfBounds { .. })
        ));
        let too_large = WindowSize::new(7680, 4321).unwrap();
        assert!(feed.set_window_size(too_large).is_err());
        assert!(feed.window_size.is_none());

        feed.set_window_size(MIN_WINDOW_SIZE).unwrap();
        assert_eq!(feed.window_size, Some(MIN_WINDOW_SIZE));
        feed.set_window_size(MAX_WINDOW_SIZE).unwrap();
        assert_eq!(feed.window_size, Some(MAX_WINDOW_SIZE));
    }

    #[test]
    fn test_validate_catches_edited_fields() {
        let mut feed = Feed::new("Cam", "https://example.org/a.mp4").unwrap();
        assert!(feed.validate().is_ok());

        feed.name = " ".into();
        assert_eq!(feed.validate(), Err(FeedError::EmptyName));

        feed.name = "Cam".into();
        feed.window_size = Some(WindowSize {
            width: 0,
            height: 10,
        });
        assert!(feed.validate().is_err());
    }

    #[test]
    fn test_deserialize_validates_entry() {
        let feed: Feed = toml::from_str(
            r#"
name = " Otter Live "
url = "https://example.org/otter.mp4"
window_size = { width = 1280, height = 720 }
"#,
        )
        .unwrap();
        assert_eq!(feed.name, "Otter Live");
        assert_eq!(feed.window_size, Some(DEFAULT_WINDOW_SIZE));

        let bad: Result<Feed, _> = toml::from_str("name = \"\"\nurl = \"https://example.org\"\n");
        assert!(bad.is_err());

        let zero: Result<Feed, _> = toml::from_str(
            "name = \"Cam\"\nurl = \"https://example.org\"\nwindow_size = { width = 0, height = 1 }\n",
        );
        assert!(zero.is_err());
    }
}
