// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Splits feed text into `<item>` blocks and builds one episode per block.

use std::collections::HashMap;

use tracing::debug;

use super::fields::{resolve_description, resolve_title};
use super::parse::Episode;
use super::sanitize::convert_special_chars;
use super::scan::Cursor;

const ITEM_OPEN: &str = "<item>";
const ITEM_CLOSE: &str = "</item>";
const ENCLOSURE_OPEN: &str = "<enclosure";
const URL_ATTR: &str = "url=\"";
const LINK_OPEN: &str = "<link>";
const LINK_CLOSE: &str = "</link>";

/// Extract the audio URL from one item block.
///
/// Enclosure-style feeds carry the URL in an `<enclosure url="...">`
/// attribute; `<link>...</link>` is the other dialect seen in the wild and is
/// only tried when no enclosure tag exists in the block. A block matching
/// neither yields `None`; callers surface that as an invalid-URI failure at
/// the point the link is dereferenced, not during construction.
pub fn resolve_audio_link(block: &str) -> Option<String> {
    if let Some(enclosure) = block.find(ENCLOSURE_OPEN) {
        let rest = &block[enclosure..];
        let url_start = rest.find(URL_ATTR)? + URL_ATTR.len();
        let url_end = rest[url_start..].find('"')? + url_start;
        return Some(rest[url_start..url_end].trim().to_string());
    }

    let link_start = block.find(LINK_OPEN)? + LINK_OPEN.len();
    let link_end = block[link_start..].find(LINK_CLOSE)? + link_start;
    Some(block[link_start..link_end].trim().to_string())
}

/// Walk the feed text left to right and build the episode collection.
///
/// Each `<item>` block is sliced out and handed to the field resolvers and
/// the audio-link resolver, restricted to that block. The scan resumes just
/// past the previous `</item>`, so a block is never revisited. Episodes are
/// keyed by sanitized title; a later block with a duplicate title overwrites
/// the earlier one. Sequence indices follow discovery order starting at 0.
/// Empty feed text yields zero episodes.
pub fn segment_episodes(buf: &str, podcast_title: &str) -> HashMap<String, Episode> {
    let mut episodes = HashMap::new();
    let mut cursor = Cursor::new(buf);
    let mut index = 0;

    while let Some(open) = cursor.find(ITEM_OPEN) {
        cursor.seek(open + ITEM_OPEN.len());
        let Some(close) = cursor.find(ITEM_CLOSE) else {
            // Unterminated trailing block: nothing more to segment.
            break;
        };
        let block = &buf[open..close];
        cursor.seek(close + ITEM_CLOSE.len());

        let title = resolve_title(block)
            .map(|t| convert_special_chars(&t))
            .unwrap_or_default();
        let description = resolve_description(block).map(|d| convert_special_chars(&d));
        let link = resolve_audio_link(block);
        if link.is_none() {
            debug!(episode = %title, "no parseable enclosure or link in item block");
        }

        episodes.insert(
            title.clone(),
            Episode {
                title,
                description,
                link,
                podcast: podcast_title.to_string(),
                index,
                position: None,
            },
        );
        index += 1;
    }

    episodes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enclosure_url_attribute_is_primary() {
        let block = r#"<item><title>Ep</title><enclosure url="http://x/b.mp3" length="123"/></item>"#;
        assert_eq!(resolve_audio_link(block), Some("http://x/b.mp3".to_string()));
    }

    #[test]
    fn link_tag_is_the_fallback() {
        let block = "<item><title>Ep</title><link>http://x/a.mp3</link></item>";
        assert_eq!(resolve_audio_link(block), Some("http://x/a.mp3".to_string()));
    }

    #[test]
    fn enclosure_present_without_url_attribute_is_unparseable() {
        // The link fallback only applies when no enclosure tag exists at all.
        let block = "<item><enclosure type=\"audio/mpeg\"></enclosure><link>http://x/a.mp3</link></item>";
        assert_eq!(resolve_audio_link(block), None);
    }

    #[test]
    fn block_with_neither_dialect_is_unparseable() {
        assert_eq!(resolve_audio_link("<item><title>Ep</title></item>"), None);
    }

    #[test]
    fn blocks_are_discovered_in_document_order() {
        let buf = "\
            <item><title>A</title><link>http://x/a.mp3</link></item>\
            <item><title>B</title><link>http://x/b.mp3</link></item>\
            <item><title>C</title><link>http://x/c.mp3</link></item>";
        let episodes = segment_episodes(buf, "Show");

        assert_eq!(episodes.len(), 3);
        assert_eq!(episodes["A"].index, 0);
        assert_eq!(episodes["B"].index, 1);
        assert_eq!(episodes["C"].index, 2);
        assert_eq!(episodes["B"].link.as_deref(), Some("http://x/b.mp3"));
        assert_eq!(episodes["B"].podcast, "Show");
    }

    #[test]
    fn duplicate_title_last_block_wins() {
        let buf = "\
            <item><title>Same</title><link>http://x/old.mp3</link></item>\
            <item><title>Same</title><link>http://x/new.mp3</link></item>";
        let episodes = segment_episodes(buf, "Show");

        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes["Same"].link.as_deref(), Some("http://x/new.mp3"));
        assert_eq!(episodes["Same"].index, 1);
    }

    #[test]
    fn empty_feed_text_yields_no_episodes() {
        assert!(segment_episodes("", "Show").is_empty());
    }

    #[test]
    fn unterminated_trailing_block_is_dropped() {
        let buf = "<item><title>A</title><link>http://x/a.mp3</link></item><item><title>B</title>";
        let episodes = segment_episodes(buf, "Show");
        assert_eq!(episodes.len(), 1);
        assert!(episodes.contains_key("A"));
    }

    #[test]
    fn episode_titles_are_sanitized_before_keying() {
        let buf = "<item><title>Q &amp; A</title><link>http://x/q.mp3</link></item>";
        let episodes = segment_episodes(buf, "Show");
        assert!(episodes.contains_key("Q & A"));
    }
}
