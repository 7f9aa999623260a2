use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app::error::{AppError, Result};
use crate::browser::{ChromeRenderer, Renderer};
use crate::config::{Settings, FEEDS_FILE_NAME, SETTINGS_FILE_NAME};
use crate::discovery::FeedDiscovery;
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::store::FileStore;

pub struct AppContext {
    pub data_dir: PathBuf,
    pub settings: Settings,
    pub store: Arc<FileStore>,
    pub discovery: FeedDiscovery,
}

impl AppContext {
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(p) => p,
            None => Settings::default_data_dir()?,
        };
        fs::create_dir_all(&data_dir)?;

        let settings = Settings::load_from(&data_dir.join(SETTINGS_FILE_NAME))?;
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new()?);
        let renderer: Arc<dyn Renderer + Send + Sync> =
            Arc::new(ChromeRenderer::new(settings.browser.clone()));

        Self::with_parts(data_dir, settings, fetcher, Some(renderer))
    }

    /// Build a context around caller-supplied network components.
    pub fn with_parts(
        data_dir: PathBuf,
        settings: Settings,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        renderer: Option<Arc<dyn Renderer + Send + Sync>>,
    ) -> Result<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(AppError::Other("Data directory path is empty".into()));
        }
        let store = Arc::new(FileStore::new(data_dir.join(FEEDS_FILE_NAME)));
        let discovery = FeedDiscovery::new(fetcher, renderer, settings.discovery.clone());

        Ok(Self {
            data_dir,
            settings,
            store,
            discovery,
        })
    }

    pub fn feeds_path(&self) -> &Path {
        self.store.path()
    }
}
