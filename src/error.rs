use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when fetching or parsing RSS feeds
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Failed to fetch feed from {url}: {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read feed file {path}: {source}")]
    FileReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid feed URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Feed at {url} has no parseable title")]
    MissingTitle { url: String },

    #[error("Image tag capture too short to strip the inner tag remnant")]
    MalformedImageTag,

    #[error("Feed at {url} has an unparseable artwork URL: {source}")]
    InvalidImageUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Episode '{episode}' has no parseable enclosure or link")]
    UnparseableLink { episode: String },

    #[error("Episode '{episode}' has an invalid audio link: {source}")]
    InvalidAudioLink {
        episode: String,
        #[source]
        source: url::ParseError,
    },
}

/// Errors that can occur when working with the podcast library
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Podcast '{title}' not found in library")]
    PodcastNotFound { title: String },

    #[error("Podcast '{podcast}' has no episode '{episode}'")]
    EpisodeNotFound { podcast: String, episode: String },

    #[error("Failed to read library file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write library file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse library JSON in {path}: {source}")]
    JsonParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize library: {0}")]
    JsonSerializeFailed(#[from] serde_json::Error),

    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),
}
