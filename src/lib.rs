pub mod error;
pub mod feed;
pub mod http;
pub mod library;

// Re-export main types for convenience
pub use error::{FeedError, LibraryError};
pub use feed::{Episode, Podcast, fetch_feed, fetch_feed_text, is_url, parse_feed, parse_feed_file};
pub use http::{HttpClient, ReqwestClient};
pub use library::{Library, PlaybackCue};
