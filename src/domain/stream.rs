use std::fmt;

use serde::{Serialize, Serializer};

/// Whether a URL can be played as-is or must be scraped first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlType {
    DirectStream,
    HtmlPage,
}

impl UrlType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrlType::DirectStream => "direct_stream",
            UrlType::HtmlPage => "html_page",
        }
    }
}

impl fmt::Display for UrlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Media link flavour recognised by the text and script scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    M3u8,
    Mp4,
    Webm,
    M3u,
}

impl LinkKind {
    pub const ALL: [LinkKind; 4] = [LinkKind::M3u8, LinkKind::Mp4, LinkKind::Webm, LinkKind::M3u];

    pub fn extension(&self) -> &'static str {
        match self {
            LinkKind::M3u8 => "m3u8",
            LinkKind::Mp4 => "mp4",
            LinkKind::Webm => "webm",
            LinkKind::M3u => "m3u",
        }
    }
}

/// How a [`StreamCandidate`] was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    VideoTag,
    SourceTag,
    Link(LinkKind),
    ScriptLink(LinkKind),
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::VideoTag => "video_tag",
            SourceType::SourceTag => "source_tag",
            SourceType::Link(LinkKind::M3u8) => "m3u8_link",
            SourceType::Link(LinkKind::Mp4) => "mp4_link",
            SourceType::Link(LinkKind::Webm) => "webm_link",
            SourceType::Link(LinkKind::M3u) => "m3u_link",
            SourceType::ScriptLink(LinkKind::M3u8) => "script_m3u8_link",
            SourceType::ScriptLink(LinkKind::Mp4) => "script_mp4_link",
            SourceType::ScriptLink(LinkKind::Webm) => "script_webm_link",
            SourceType::ScriptLink(LinkKind::M3u) => "script_m3u_link",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SourceType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// An extracted, not yet confirmed, stream URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamCandidate {
    pub url: String,
    pub source_type: SourceType,
}

impl StreamCandidate {
    pub fn new(url: impl Into<String>, source_type: SourceType) -> Self {
        Self {
            url: url.into(),
            source_type,
        }
    }
}

/// Outcome of an accessibility probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlValidationResult {
    pub is_accessible: bool,
    pub status_code: Option<u16>,
    pub error_message: Option<String>,
    pub content_type: Option<String>,
}
