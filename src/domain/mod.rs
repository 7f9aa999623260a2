pub mod feed;
pub mod stream;

pub use feed::{
    Feed, FeedError, WindowSize, DEFAULT_WINDOW_SIZE, MAX_WINDOW_SIZE, MIN_WINDOW_SIZE,
};
pub use stream::{LinkKind, SourceType, StreamCandidate, UrlType, UrlValidationResult};
