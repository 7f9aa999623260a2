//! # Pick-a-Zoo
//!
//! Bookmark live zoo camera feeds and find the stream hiding behind a web page.
//!
//! ## Architecture
//!
//! Adding a feed runs the discovery pipeline, then persists the result:
//!
//! ```text
//! URL → Classifier → Fetcher (→ Browser on 403) → Extractor → Validator → Store
//! ```
//!
//! - [`discovery`]: URL classification, stream extraction, reachability checks
//! - [`fetcher`]: HTTP client with browser-like headers and counted redirects
//! - [`browser`]: Headless Chrome rendering for pages that block plain clients
//! - [`store`]: Atomic TOML persistence of the bookmark list
//!
//! ## Quick Start
//!
//! ```bash
//! # Add a feed from a camera page
//! pickazoo add https://zoo.example.org/panda-cam --name "Panda Cam"
//!
//! # See what a page offers
//! pickazoo discover https://zoo.example.org/panda-cam
//!
//! # List feeds
//! pickazoo list
//!
//! # Watch one
//! pickazoo open "Panda Cam"
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together all components:
/// store, fetcher, renderer, settings.
pub mod app;

/// Headless browser fallback.
///
/// - [`Renderer`](browser::Renderer): Async trait for rendering a page to HTML
/// - [`ChromeRenderer`](browser::ChromeRenderer): chromiumoxide implementation
/// - [`RenderConfig`](browser::RenderConfig): Configuration options
pub mod browser;

/// Command-line interface using clap.
///
/// Defines the CLI structure and subcommands:
/// - `add <url> --name <name>` - Discover and save a feed
/// - `list` - List saved feeds
/// - `discover <url>` - Show stream candidates
/// - `check <url>` - Check that a stream is reachable
/// - `resize <name> <w> <h>` - Change a feed's window size
/// - `open <name>` - Play a feed
pub mod cli;

/// Settings loaded from `<data-dir>/config.toml`.
pub mod config;

/// Feed discovery pipeline.
pub mod discovery;

/// Core domain models.
///
/// - [`Feed`](domain::Feed): A saved camera bookmark
/// - [`StreamCandidate`](domain::StreamCandidate): A stream URL found on a page
/// - [`UrlValidationResult`](domain::UrlValidationResult): Outcome of a reachability probe
pub mod domain;

/// HTTP access for the discovery pipeline.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for HEAD probes and page GETs
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Bookmark persistence.
///
/// - [`Store`](store::Store): Trait defining storage operations
/// - [`FileStore`](store::FileStore): TOML file implementation
pub mod store;
