//! Headless browser fallback for pages that refuse plain HTTP clients.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pickazoo::browser::{ChromeRenderer, Renderer, RenderConfig};
//!
//! let renderer = ChromeRenderer::new(RenderConfig::default());
//! let html = renderer.render("https://zoo.example.org/cams", Duration::from_secs(30)).await?;
//! ```

mod chrome;
mod config;

pub use chrome::ChromeRenderer;
pub use config::RenderConfig;

use std::time::Duration;

use async_trait::async_trait;

use crate::discovery::DiscoveryError;

/// Loads a page in a real rendering engine and returns the final document.
#[async_trait]
pub trait Renderer {
    /// Render `url` and return the HTML after scripts have run.
    ///
    /// Fails with [`DiscoveryError::AutomationUnavailable`] when no engine can
    /// be started and [`DiscoveryError::BrowserTimeout`] when the page never
    /// finishes loading.
    async fn render(&self, url: &str, timeout: Duration) -> Result<String, DiscoveryError>;
}

#[cfg(test)]
pub(crate) mod mock {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    pub struct MockRenderer {
        result: Mutex<Option<Result<String, DiscoveryError>>>,
        calls: AtomicUsize,
    }

    impl MockRenderer {
        pub fn returning(result: Result<String, DiscoveryError>) -> Self {
            Self {
                result: Mutex::new(Some(result)),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Renderer for MockRenderer {
        async fn render(&self, _url: &str, _timeout: Duration) -> Result<String, DiscoveryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.lock().unwrap().take().unwrap_or_else(|| {
                Err(DiscoveryError::general("render called twice", "render called twice"))
            })
        }
    }
}
