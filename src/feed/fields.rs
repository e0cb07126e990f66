// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-field fallback chains.
//!
//! Each semantic field has an ordered list of candidate trigger tags, tried
//! in turn until one extracts. The lists cover the tag dialects observed in
//! common podcast feeds; supporting a new dialect means adding a tag to the
//! right list.

use crate::error::FeedError;

use super::scan::extract_tag;

const TITLE_TAGS: &[&str] = &["<title>", "<itunes:summary>"];

const DESCRIPTION_TAGS: &[&str] = &[
    "<itunes:summary>",
    "<p>",
    "<description><![CDATA[",
    "<description>",
];

/// Number of characters of inner-tag remnant (`url>`) left at the front of a
/// bare `<image>` capture after cleanup.
const IMAGE_REMNANT_LEN: usize = 4;

fn first_match(buf: &str, candidates: &[&str]) -> Option<String> {
    candidates.iter().find_map(|tag| extract_tag(buf, tag))
}

pub fn resolve_title(buf: &str) -> Option<String> {
    first_match(buf, TITLE_TAGS)
}

pub fn resolve_description(buf: &str) -> Option<String> {
    first_match(buf, DESCRIPTION_TAGS)
}

/// Resolve the artwork location.
///
/// The bare `<image>` fallback captures the channel's nested `<url>` element
/// along with its content, so a fixed-length remnant is cut off the front of
/// that capture before the value is used. A capture too short for the cut is
/// a malformed feed and fails the whole parse; a feed matching no image tag
/// at all is simply artwork-less.
pub fn resolve_image(buf: &str) -> Result<Option<String>, FeedError> {
    if let Some(image) = extract_tag(buf, "<image><url>") {
        return Ok(Some(image));
    }
    if let Some(image) = extract_tag(buf, "<itunes:image") {
        return Ok(Some(image));
    }
    match extract_tag(buf, "<image>") {
        Some(image) => {
            let stripped = image
                .get(IMAGE_REMNANT_LEN..)
                .ok_or(FeedError::MalformedImageTag)?;
            Ok(Some(stripped.to_string()))
        }
        None => Ok(None),
    }
}
