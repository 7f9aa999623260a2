//! Stream URL extraction from HTML pages.
//!
//! Passes run in a fixed order and results keep discovery order:
//!
//! 1. `<video src>` and the `<source src|srcset>` elements nested in it
//! 2. `<source src>` elements outside any `<video>`
//! 3. absolute media links in the page's visible text
//! 4. absolute media links inside `<script>` elements
//! 5. `<iframe>` embeds from known player sites (logged only)
//!
//! A URL is kept only the first time it is seen.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};
use url::Url;

use crate::discovery::DiscoveryError;
use crate::domain::{LinkKind, SourceType, StreamCandidate};

/// Substrings that mark a regex match as a page asset rather than a stream.
const NON_STREAM_EXTENSIONS: [&str; 7] = [".jpg", ".jpeg", ".png", ".gif", ".css", ".js", ".json"];

/// Embeds that need a player API to resolve; noted but not extracted.
const PLAYER_DOMAINS: [&str; 5] = [
    "youtube.com",
    "youtu.be",
    "vimeo.com",
    "dailymotion.com",
    "twitch.tv",
];

static LINK_PATTERNS: LazyLock<Vec<(LinkKind, Regex)>> = LazyLock::new(|| {
    LinkKind::ALL
        .into_iter()
        .map(|kind| {
            let pattern = format!(
                r#"(?i)https?://[^\s"'<>]+\.{}[^\s"'<>]*"#,
                regex::escape(kind.extension())
            );
            let regex = Regex::new(&pattern).expect("stream link regex should compile");
            (kind, regex)
        })
        .collect()
});

struct Selectors {
    video: Selector,
    source: Selector,
    script: Selector,
    iframe: Selector,
}

impl Selectors {
    fn new() -> Result<Self, DiscoveryError> {
        Ok(Self {
            video: parse_selector("video")?,
            source: parse_selector("source")?,
            script: parse_selector("script")?,
            iframe: parse_selector("iframe")?,
        })
    }
}

fn parse_selector(selector: &str) -> Result<Selector, DiscoveryError> {
    Selector::parse(selector).map_err(|e| {
        DiscoveryError::parse(
            format!("Failed to build selector '{}': {}", selector, e),
            "Unable to parse the webpage. The page may be malformed or unsupported.",
        )
    })
}

/// Ordered, de-duplicated candidate list
#[derive(Default)]
struct CandidateSet {
    streams: Vec<StreamCandidate>,
    seen: HashSet<String>,
}

impl CandidateSet {
    /// Keeps the first spelling of a URL. Spellings that parse to the same
    /// URL (host case, percent-encoding) count as already seen.
    fn push(&mut self, url: String, source_type: SourceType) {
        let key = Url::parse(&url).map(String::from).unwrap_or_else(|_| url.clone());
        if !self.seen.insert(key) {
            return;
        }
        debug!("Found {} stream: {}", source_type, url);
        self.streams.push(StreamCandidate::new(url, source_type));
    }
}

/// Extract candidate stream URLs from `html`, resolving relative URLs
/// against `base_url`.
pub fn extract_streams(html: &str, base_url: &str) -> Result<Vec<StreamCandidate>, DiscoveryError> {
    debug!("Extracting streams from HTML (base_url: {})", base_url);

    let base = Url::parse(base_url).map_err(|e| {
        DiscoveryError::parse(
            format!("Invalid base URL '{}': {}", base_url, e),
            "Unable to parse the webpage address. Please check the URL.",
        )
    })?;
    let selectors = Selectors::new()?;
    let document = Html::parse_document(html);
    if !document.errors.is_empty() {
        debug!("HTML parsed with {} recoverable errors", document.errors.len());
    }

    let mut found = CandidateSet::default();

    for video in document.select(&selectors.video) {
        if let Some(url) = attr_url(&base, video, "src") {
            found.push(url, SourceType::VideoTag);
        }

        for source in video.select(&selectors.source) {
            if let Some(url) = attr_url(&base, source, "src") {
                found.push(url, SourceType::SourceTag);
            }
            if let Some(srcset) = source.value().attr("srcset") {
                for url in srcset_urls(&base, srcset) {
                    found.push(url, SourceType::SourceTag);
                }
            }
        }
    }

    for source in document.select(&selectors.source) {
        if inside_video(source) {
            continue;
        }
        if let Some(url) = attr_url(&base, source, "src") {
            found.push(url, SourceType::SourceTag);
        }
    }

    scan_links(&page_text(&document), SourceType::Link, &mut found);

    for script in document.select(&selectors.script) {
        let text: String = script.text().collect();
        let content = if text.trim().is_empty() {
            script.html()
        } else {
            text
        };
        scan_links(&content, SourceType::ScriptLink, &mut found);
    }

    for iframe in document.select(&selectors.iframe) {
        let Some(src) = iframe.value().attr("src") else {
            continue;
        };
        let Ok(url) = base.join(src.trim()) else {
            continue;
        };
        let domain = url.host_str().unwrap_or("").to_ascii_lowercase();
        if PLAYER_DOMAINS.iter().any(|player| domain.contains(player)) {
            debug!("Found iframe with video player domain: {}", domain);
        }
    }

    info!("Extracted {} unique streams from HTML", found.streams.len());
    Ok(found.streams)
}

fn resolve(base: &Url, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match base.join(raw) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            debug!("Skipping unresolvable URL '{}': {}", raw, e);
            None
        }
    }
}

fn attr_url(base: &Url, element: ElementRef<'_>, attr: &str) -> Option<String> {
    element
        .value()
        .attr(attr)
        .and_then(|value| resolve(base, value))
}

/// First token of each comma-separated `srcset` entry ("url 2x, url 640w")
fn srcset_urls(base: &Url, srcset: &str) -> Vec<String> {
    srcset
        .split(',')
        .filter_map(|entry| entry.split_whitespace().next())
        .filter_map(|token| resolve(base, token))
        .collect()
}

fn inside_video(element: ElementRef<'_>) -> bool {
    element.ancestors().any(|node| {
        node.value()
            .as_element()
            .is_some_and(|el| el.name() == "video")
    })
}

/// Visible text of the page, one line per text node. Script and style
/// bodies are left to the script pass.
fn page_text(document: &Html) -> String {
    let mut text = String::new();
    for node in document.tree.root().descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };
        let in_code = node
            .parent()
            .and_then(|parent| parent.value().as_element())
            .is_some_and(|el| matches!(el.name(), "script" | "style"));
        if !in_code {
            text.push_str(fragment);
            text.push('\n');
        }
    }
    text
}

fn is_asset_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    NON_STREAM_EXTENSIONS.iter().any(|ext| lower.contains(ext))
}

fn scan_links(content: &str, tag: fn(LinkKind) -> SourceType, found: &mut CandidateSet) {
    for (kind, pattern) in LINK_PATTERNS.iter() {
        for matched in pattern.find_iter(content) {
            let url = matched.as_str();
            if is_asset_url(url) {
                continue;
            }
            found.push(url.to_string(), tag(*kind));
        }
    }
}
