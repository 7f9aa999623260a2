use serde_json::json;
use tracing::{info, warn};

use crate::app::{AppContext, AppError, Result};
use crate::discovery::Discovery;
use crate::domain::{Feed, StreamCandidate, WindowSize, DEFAULT_WINDOW_SIZE};
use crate::store::Store;

/// Choose the stream to keep from a page's candidates.
///
/// A single candidate is taken automatically; several need a 1-based `pick`.
pub fn select_candidate<'a>(
    candidates: &'a [StreamCandidate],
    pick: Option<usize>,
    page_url: &str,
) -> Result<&'a StreamCandidate> {
    match (candidates, pick) {
        ([], _) => Err(AppError::NoStreamsFound(page_url.to_string())),
        ([only], None) => Ok(only),
        (_, None) => Err(AppError::AmbiguousSelection {
            count: candidates.len(),
        }),
        (_, Some(n)) => n
            .checked_sub(1)
            .and_then(|i| candidates.get(i))
            .ok_or(AppError::InvalidPick {
                pick: n,
                count: candidates.len(),
            }),
    }
}

fn print_candidates(candidates: &[StreamCandidate]) {
    for (i, candidate) in candidates.iter().enumerate() {
        println!("  {}. [{}] {}", i + 1, candidate.source_type, candidate.url);
    }
}

pub async fn add_feed(
    ctx: &AppContext,
    url: &str,
    name: &str,
    pick: Option<usize>,
    validate: bool,
) -> Result<Feed> {
    // Reject a bad name before any network traffic
    Feed::new(name, url)?;

    let stream_url = match ctx.discovery.discover(url).await? {
        Discovery::DirectStream { url } => url,
        Discovery::Page { candidates, source } => {
            info!("Found {} candidates via {}", candidates.len(), source);
            let selected = select_candidate(&candidates, pick, url).inspect_err(|e| {
                if matches!(e, AppError::AmbiguousSelection { .. } | AppError::InvalidPick { .. }) {
                    println!("Streams found on {}:", url);
                    print_candidates(&candidates);
                }
            })?;
            selected.url.clone()
        }
    };

    let feed = Feed::new(name, &stream_url)?.with_window_size(DEFAULT_WINDOW_SIZE);
    let probeable = matches!(feed.url.scheme(), "http" | "https");
    if validate && !probeable {
        info!("Skipping reachability check for {} stream", feed.url.scheme());
    }

    if validate && probeable {
        let result = ctx.discovery.validate(&stream_url).await?;
        if !result.is_accessible {
            let reason = result
                .error_message
                .unwrap_or_else(|| "unknown error".to_string());
            warn!("Stream not accessible: {} ({})", stream_url, reason);
            return Err(AppError::NotAccessible {
                url: stream_url,
                reason,
            });
        }
    }

    let feed = ctx.store.add_feed(feed)?;
    println!("Added feed: {}\n  {}", feed.name, feed.url);
    Ok(feed)
}

pub fn list_feeds(ctx: &AppContext) -> Result<()> {
    let feeds = ctx.store.load()?;

    if feeds.is_empty() {
        println!("No feeds");
        return Ok(());
    }

    for feed in feeds {
        let size = feed
            .window_size
            .map(|s| s.to_string())
            .unwrap_or_else(|| "default size".to_string());
        println!("{} ({})\n  {}", feed.name, size, feed.url);
    }

    Ok(())
}

pub async fn discover(ctx: &AppContext, url: &str, as_json: bool) -> Result<()> {
    let discovery = ctx.discovery.discover(url).await?;

    if as_json {
        let report = match &discovery {
            Discovery::DirectStream { url } => json!({
                "url_type": "direct_stream",
                "url": url,
            }),
            Discovery::Page { candidates, source } => json!({
                "url_type": "html_page",
                "url": url,
                "source": source.to_string(),
                "candidates": candidates,
            }),
        };
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| AppError::Other(format!("Failed to encode JSON: {}", e)))?;
        println!("{}", text);
        return Ok(());
    }

    match discovery {
        Discovery::DirectStream { url } => println!("Direct stream: {}", url),
        Discovery::Page { candidates, .. } if candidates.is_empty() => {
            println!("No playable streams found on this page")
        }
        Discovery::Page { candidates, source } => {
            println!("Found {} streams ({}):", candidates.len(), source);
            print_candidates(&candidates);
        }
    }
    Ok(())
}

pub async fn check_url(ctx: &AppContext, url: &str) -> Result<()> {
    let result = ctx.discovery.validate(url).await?;

    let status = result
        .status_code
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string());
    if result.is_accessible {
        println!(
            "Accessible (HTTP {}, {})",
            status,
            result.content_type.as_deref().unwrap_or("unknown type")
        );
    } else {
        println!(
            "Not accessible (HTTP {}): {}",
            status,
            result.error_message.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}

pub fn resize_feed(ctx: &AppContext, name: &str, width: u32, height: u32) -> Result<()> {
    let size = WindowSize::new(width, height)?;
    if !ctx.store.update_window_size(name, size)? {
        return Err(AppError::FeedNotFound(name.to_string()));
    }
    println!("Window size for {} set to {}", name, size);
    Ok(())
}

pub fn open_feed(ctx: &AppContext, name: &str) -> Result<()> {
    let feed = ctx
        .store
        .load()?
        .into_iter()
        .find(|feed| feed.name == name)
        .ok_or_else(|| AppError::FeedNotFound(name.to_string()))?;

    println!("Opening {}: {}", feed.name, feed.url);
    open::that(feed.url.as_str())?;
    Ok(())
}
