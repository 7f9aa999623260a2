pub mod file;
mod naming;

use tracing::info;

use crate::app::Result;
use crate::domain::{Feed, WindowSize};

pub use file::FileStore;
pub use naming::resolve_duplicate_name;

/// Persistence for the bookmark list.
///
/// `load` recovers from content problems on its own; only filesystem errors
/// reach the caller. Names are not required to be unique here; see
/// [`resolve_duplicate_name`].
pub trait Store {
    fn load(&self) -> Result<Vec<Feed>>;
    fn save(&self, feeds: &[Feed]) -> Result<()>;

    /// Append a feed, renaming it if the name is taken. Returns the stored feed.
    fn add_feed(&self, mut feed: Feed) -> Result<Feed> {
        let mut feeds = self.load()?;
        feed.name = resolve_duplicate_name(&feed.name, &feeds);
        feeds.push(feed.clone());
        self.save(&feeds)?;
        info!("Added feed '{}'", feed.name);
        Ok(feed)
    }

    /// Set the playback window size of the named feed.
    ///
    /// Returns `false` when no feed has that name. Sizes outside the window
    /// bounds are rejected before anything is written.
    fn update_window_size(&self, name: &str, size: WindowSize) -> Result<bool> {
        let mut feeds = self.load()?;
        let Some(feed) = feeds.iter_mut().find(|feed| feed.name == name) else {
            return Ok(false);
        };
        feed.set_window_size(size)?;
        self.save(&feeds)?;
        info!("Updated window size for '{}' to {}", name, size);
        Ok(true)
    }
}
