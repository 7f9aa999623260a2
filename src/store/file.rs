use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::app::Result;
use crate::config::ConfigError;
use crate::domain::Feed;
use crate::store::Store;

/// Contents of an empty, well-formed bookmarks file.
const EMPTY_DOCUMENT: &str = "feeds = []\n";

#[derive(Serialize)]
struct FeedsDocument<'a> {
    feeds: &'a [Feed],
}

/// Why a bookmarks file could not be used as-is
enum Corruption {
    Encoding(String),
    Syntax(String),
    Shape(&'static str),
}

/// Bookmarks kept in a single TOML file, replaced atomically on every save.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> ConfigError {
        ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn ensure_directory(&self) -> std::result::Result<(), ConfigError> {
        let dir = self.directory();
        fs::create_dir_all(dir).map_err(|e| self.io_error(dir, e))
    }

    /// Replace the file contents via a temp file in the same directory.
    /// The temp file is removed if anything fails before the rename.
    fn write_atomic(&self, contents: &str) -> std::result::Result<(), ConfigError> {
        self.ensure_directory()?;
        let dir = self.directory();

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| self.io_error(dir, e))?;
        tmp.write_all(contents.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| self.io_error(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.io_error(&self.path, e.error))?;
        Ok(())
    }

    fn parse(&self, bytes: Vec<u8>) -> std::result::Result<Vec<Feed>, Corruption> {
        let text = String::from_utf8(bytes).map_err(|e| Corruption::Encoding(e.to_string()))?;
        if text.trim().is_empty() {
            warn!("Config file is empty, returning empty list");
            return Ok(Vec::new());
        }

        let document: toml::Table = text
            .parse()
            .map_err(|e: toml::de::Error| Corruption::Syntax(e.to_string()))?;

        let entries = match document.get("feeds") {
            None => return Ok(Vec::new()),
            Some(toml::Value::Array(entries)) => entries,
            Some(_) => return Err(Corruption::Shape("'feeds' must be an array")),
        };

        let feeds = entries
            .iter()
            .filter_map(|entry| match entry.clone().try_into::<Feed>() {
                Ok(feed) => Some(feed),
                Err(e) => {
                    warn!("Invalid feed entry skipped: {}", e);
                    None
                }
            })
            .collect();
        Ok(feeds)
    }
}

impl Store for FileStore {
    fn load(&self) -> Result<Vec<Feed>> {
        self.ensure_directory()?;

        if !self.path.exists() {
            info!("Config file missing, creating empty file at {}", self.path.display());
            self.write_atomic(EMPTY_DOCUMENT)?;
            return Ok(Vec::new());
        }

        let bytes = fs::read(&self.path).map_err(|e| self.io_error(&self.path, e))?;

        match self.parse(bytes) {
            Ok(feeds) => {
                info!("Loaded {} feeds from config", feeds.len());
                Ok(feeds)
            }
            Err(corruption) => {
                match corruption {
                    Corruption::Encoding(e) => {
                        warn!("Config file is not valid UTF-8: {}. Rebuilding empty file.", e)
                    }
                    Corruption::Syntax(e) => {
                        warn!("Config file corrupted (TOML parse error): {}. Rebuilding empty file.", e)
                    }
                    Corruption::Shape(e) => {
                        warn!("Config file has invalid structure: {}. Rebuilding empty file.", e)
                    }
                }
                self.write_atomic(EMPTY_DOCUMENT)?;
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, feeds: &[Feed]) -> Result<()> {
        for feed in feeds {
            feed.validate()?;
        }

        let contents = toml::to_string_pretty(&FeedsDocument { feeds }).map_err(ConfigError::from)?;
        self.write_atomic(&contents)?;

        info!("Saved {} feeds to config", feeds.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppError;
    use crate::domain::{WindowSize, DEFAULT_WINDOW_SIZE};
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FileStore {
        FileStore::new(dir.path().join(".pickazoo").join("feeds.toml"))
    }

    fn sample_feeds() -> Vec<Feed> {
        vec![
            Feed::new("Panda Cam", "https://example.org/panda.m3u8").unwrap(),
            Feed::new("Otter Live", "https://example.org/otter.mp4")
                .unwrap()
                .with_window_size(DEFAULT_WINDOW_SIZE),
        ]
    }

    fn is_empty_document(path: &Path) -> bool {
        let text = fs::read_to_string(path).unwrap();
        let table: toml::Table = text.parse().unwrap();
        table.get("feeds").and_then(|v| v.as_array()).is_some_and(|a| a.is_empty())
    }

    #[test]
    fn test_missing_file_created_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(store.load().unwrap().is_empty());
        assert!(is_empty_document(store.path()));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save(&sample_feeds()).unwrap();
        assert_eq!(store.load().unwrap(), sample_feeds());
    }

    #[test]
    fn test_resave_keeps_content() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&sample_feeds()).unwrap();
        let first = fs::read_to_string(store.path()).unwrap();

        let loaded = store.load().unwrap();
        store.save(&loaded).unwrap();

        assert_eq!(fs::read_to_string(store.path()).unwrap(), first);
    }

    #[test]
    fn test_written_key_order() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&sample_feeds()[1..]).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        let name = text.find("name =").unwrap();
        let url = text.find("url =").unwrap();
        let size = text.find("width").unwrap();
        assert!(name < url && url < size);
    }

    #[test]
    fn test_corrupt_file_recovered() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.directory()).unwrap();
        fs::write(store.path(), "[[feeds]\nname = \"Panda").unwrap();

        assert!(store.load().unwrap().is_empty());
        assert!(is_empty_document(store.path()));
    }

    #[test]
    fn test_invalid_bytes_recovered() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.directory()).unwrap();
        fs::write(store.path(), [0xff, 0xfe, 0x00, 0x9c]).unwrap();

        assert!(store.load().unwrap().is_empty());
        assert!(is_empty_document(store.path()));
    }

    #[test]
    fn test_wrong_shape_recovered() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.directory()).unwrap();
        fs::write(store.path(), "feeds = \"panda\"\n").unwrap();

        assert!(store.load().unwrap().is_empty());
        assert!(is_empty_document(store.path()));
    }

    #[test]
    fn test_empty_file_not_rewritten() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.directory()).unwrap();
        fs::write(store.path(), "  \n").unwrap();

        assert!(store.load().unwrap().is_empty());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "  \n");
    }

    #[test]
    fn test_document_without_feeds_key() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.directory()).unwrap();
        fs::write(store.path(), "version = 2\n").unwrap();

        assert!(store.load().unwrap().is_empty());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "version = 2\n");
    }

    #[test]
    fn test_invalid_entries_skipped() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.directory()).unwrap();
        fs::write(
            store.path(),
            r#"
[[feeds]]
name = "Panda Cam"
url = "https://example.org/panda.m3u8"

[[feeds]]
name = "   "
url = "https://example.org/blank.m3u8"

[[feeds]]
name = "Broken"
url = "not a url"

[[feeds]]
name = "Otter Live"
url = "https://example.org/otter.mp4"
"#,
        )
        .unwrap();

        let feeds = store.load().unwrap();
        let names: Vec<_> = feeds.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Panda Cam", "Otter Live"]);
    }

    #[test]
    fn test_save_rejects_invalid_feed() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&sample_feeds()).unwrap();

        let mut feeds = sample_feeds();
        feeds[0].window_size = Some(WindowSize {
            width: 0,
            height: 0,
        });
        let err = store.save(&feeds).unwrap_err();
        assert!(matches!(err, AppError::Feed(_)));

        // Previous contents untouched
        assert_eq!(store.load().unwrap(), sample_feeds());
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&sample_feeds()).unwrap();
        store.save(&sample_feeds()[..1]).unwrap();

        let entries: Vec<_> = fs::read_dir(store.directory())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("feeds.toml")]);
    }

    #[test]
    fn test_store_keeps_duplicates() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let feeds = vec![sample_feeds()[0].clone(), sample_feeds()[0].clone()];

        store.save(&feeds).unwrap();
        assert_eq!(store.load().unwrap().len(), 2);
    }
}
