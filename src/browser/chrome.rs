use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::error::CdpError;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::Page;
use futures::StreamExt;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::browser::config::RenderConfig;
use crate::browser::Renderer;
use crate::discovery::DiscoveryError;

/// Resolves once the DOM has been parsed.
const DOM_READY_SCRIPT: &str = r#"
    new Promise((resolve) => {
        if (document.readyState === 'complete' || document.readyState === 'interactive') {
            resolve(document.readyState);
        } else {
            document.addEventListener('DOMContentLoaded', () => resolve(document.readyState));
        }
    })
"#;

/// Chrome-based page renderer using chromiumoxide.
///
/// Every call launches a fresh browser with a throwaway profile directory and
/// shuts it down again before returning, whatever the outcome.
pub struct ChromeRenderer {
    config: RenderConfig,
}

/// A launched browser plus the resources that must be released with it
struct Session {
    browser: Browser,
    handler: JoinHandle<()>,
    _profile: TempDir,
}

enum Navigation {
    Loaded,
    TimedOut,
}

impl ChromeRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    async fn launch(&self) -> Result<Session, DiscoveryError> {
        let profile = TempDir::with_prefix("pickazoo-browser-").map_err(|e| {
            DiscoveryError::general(
                format!("Failed to create browser profile directory: {}", e),
                format!("Failed to load page: {}. Please try a direct stream URL instead.", e),
            )
        })?;

        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .user_data_dir(profile.path())
            .window_size(self.config.viewport_width, self.config.viewport_height)
            .viewport(Viewport {
                width: self.config.viewport_width,
                height: self.config.viewport_height,
                ..Default::default()
            });

        if !self.config.headless {
            builder = builder.with_head();
        }
        if let Some(ref executable) = self.config.executable {
            builder = builder.chrome_executable(executable);
        }

        let browser_config = builder.build().map_err(|e| automation_unavailable(&e))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| automation_unavailable(&e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(_event) = handler.next().await {}
        });

        Ok(Session {
            browser,
            handler,
            _profile: profile,
        })
    }

    async fn render_page(
        &self,
        browser: &Browser,
        url: &str,
        timeout: Duration,
    ) -> Result<String, DiscoveryError> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| browser_failure(url, &e))?;
        page.set_user_agent(self.config.user_agent.as_str())
            .await
            .map_err(|e| browser_failure(url, &e))?;

        if let Navigation::TimedOut = navigate(&page, url, timeout).await? {
            warn!("Network idle timeout, waiting for DOM content instead");
            match tokio::time::timeout(timeout, page.evaluate(DOM_READY_SCRIPT.to_string())).await {
                Ok(Ok(_)) => debug!("DOM ready for {}", url),
                Ok(Err(e)) => return Err(browser_failure(url, &e)),
                Err(_) => {
                    error!("Browser timeout fetching {}", url);
                    return Err(DiscoveryError::browser_timeout(
                        format!("Timeout while fetching page with browser: {}", url),
                        "The page took too long to load. Please check your connection and try again.",
                    ));
                }
            }
        }

        // Delayed player scripts
        tokio::time::sleep(self.config.settle()).await;

        let html = page.content().await.map_err(|e| browser_failure(url, &e))?;
        let _ = page.close().await;
        Ok(html)
    }
}

/// Navigate and wait for the page load to settle.
async fn navigate(page: &Page, url: &str, timeout: Duration) -> Result<Navigation, DiscoveryError> {
    match tokio::time::timeout(timeout, page.goto(url)).await {
        Ok(Ok(_)) => Ok(Navigation::Loaded),
        Ok(Err(CdpError::Timeout)) | Err(_) => Ok(Navigation::TimedOut),
        Ok(Err(e)) => Err(browser_failure(url, &e)),
    }
}

/// Process control needed to tear a browser down.
#[async_trait]
trait Teardown {
    async fn close(&mut self) -> Result<(), String>;
    async fn kill(&mut self) -> Result<(), String>;
    async fn wait(&mut self) -> Result<(), String>;
}

#[async_trait]
impl Teardown for Browser {
    async fn close(&mut self) -> Result<(), String> {
        Browser::close(self).await.map(|_| ()).map_err(|e| e.to_string())
    }

    async fn kill(&mut self) -> Result<(), String> {
        match Browser::kill(self).await {
            Some(Err(e)) => Err(e.to_string()),
            _ => Ok(()),
        }
    }

    async fn wait(&mut self) -> Result<(), String> {
        Browser::wait(self).await.map(|_| ()).map_err(|e| e.to_string())
    }
}

/// Close the browser, killing the process when the CDP close fails so the
/// final wait cannot hang on a live Chrome.
async fn stop_browser(browser: &mut (dyn Teardown + Send)) {
    if let Err(e) = browser.close().await {
        debug!("Browser close failed, killing process: {}", e);
        if let Err(e) = browser.kill().await {
            warn!("Browser kill failed: {}", e);
        }
    }
    if let Err(e) = browser.wait().await {
        debug!("Browser wait failed: {}", e);
    }
}

async fn shutdown(mut session: Session) {
    stop_browser(&mut session.browser).await;
    session.handler.abort();
}

fn automation_unavailable(detail: &str) -> DiscoveryError {
    error!("Browser automation unavailable: {}", detail);
    DiscoveryError::automation_unavailable(
        format!(
            "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
            detail
        ),
        "Browser automation is not available. \
         Please install Chrome or Chromium, or use a direct stream URL.",
    )
}

fn browser_failure(url: &str, e: &CdpError) -> DiscoveryError {
    error!("Browser error fetching {}: {}", url, e);
    DiscoveryError::general(
        format!("Error fetching page with browser: {}", e),
        format!("Failed to load page: {}. Please try a direct stream URL instead.", e),
    )
}

#[async_trait]
impl Renderer for ChromeRenderer {
    async fn render(&self, url: &str, timeout: Duration) -> Result<String, DiscoveryError> {
        info!("Fetching HTML with browser: {}", url);

        let session = self.launch().await?;
        let result = self.render_page(&session.browser, url, timeout).await;
        shutdown(session).await;

        if let Ok(ref html) = result {
            info!("Fetched HTML with browser ({} bytes)", html.len());
        }
        result
    }
}
