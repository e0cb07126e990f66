// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;

use url::Url;

use crate::error::FeedError;
use crate::http::HttpClient;

use super::parse::{Podcast, parse_feed};

/// Fetch raw feed text from a URL (without parsing). Feed bytes are decoded
/// lossily; the parser only needs UTF-8-compatible text.
pub async fn fetch_feed_text<C: HttpClient>(client: &C, url: &str) -> Result<String, FeedError> {
    let bytes = client
        .get_bytes(url)
        .await
        .map_err(|e| FeedError::FetchFailed {
            url: url.to_string(),
            source: e,
        })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Read raw feed text from a local file (without parsing)
pub fn read_feed_file(path: &Path) -> Result<String, FeedError> {
    let bytes = std::fs::read(path).map_err(|e| FeedError::FileReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Construct a file:// URL for a local file path
pub fn file_path_to_url(path: &Path) -> Url {
    Url::from_file_path(path).unwrap_or_else(|_| {
        Url::parse(&format!("file://{}", path.display())).expect("valid file URL")
    })
}

/// Fetch and parse a podcast feed from a URL
pub async fn fetch_feed<C: HttpClient>(
    client: &C,
    url: &str,
) -> Result<Option<Podcast>, FeedError> {
    let feed_url = Url::parse(url)?;
    let text = fetch_feed_text(client, url).await?;
    parse_feed(feed_url, &text)
}

/// Parse a podcast feed from a local file
pub fn parse_feed_file(path: &Path) -> Result<Option<Podcast>, FeedError> {
    let text = read_feed_file(path)?;
    parse_feed(file_path_to_url(path), &text)
}

/// Determine if a string is a URL or a file path
pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
