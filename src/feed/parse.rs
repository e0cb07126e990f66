// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::FeedError;

use super::fields::{resolve_description, resolve_image, resolve_title};
use super::sanitize::convert_special_chars;
use super::segment::segment_episodes;

/// One podcast built from a single feed's text.
///
/// The title is the podcast's identity within a library. Episodes are keyed
/// by sanitized title for lookup; iteration order is the feed's document
/// order via each episode's sequence index, not the map's order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Podcast {
    pub title: String,
    pub description: Option<String>,
    /// The source feed URL.
    pub link: Url,
    /// Artwork URL. Absent when no recognized image tag matched.
    pub image: Option<Url>,
    pub(crate) episodes: HashMap<String, Episode>,
}

impl Podcast {
    /// Episodes in feed document order.
    pub fn episodes(&self) -> Vec<&Episode> {
        let mut list: Vec<&Episode> = self.episodes.values().collect();
        list.sort_by_key(|e| e.index);
        list
    }

    /// Look up an episode by its sanitized title.
    pub fn episode(&self, title: &str) -> Option<&Episode> {
        self.episodes.get(title)
    }

    pub(crate) fn episode_mut(&mut self, title: &str) -> Option<&mut Episode> {
        self.episodes.get_mut(title)
    }
}

/// One episode of a podcast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    pub title: String,
    pub description: Option<String>,
    /// Raw audio link as captured from the feed. `None` when neither an
    /// enclosure nor a link tag could be parsed out of the item block.
    pub link: Option<String>,
    /// Title of the owning podcast. Kept as a key resolved through the
    /// library rather than a reference, so podcast and episode lifetimes
    /// stay independent.
    pub podcast: String,
    /// Zero-based position of the item block in the source feed. Used for
    /// ordering, not identity.
    pub index: usize,
    /// Last known playback position. Absent until first recorded.
    pub position: Option<Duration>,
}

impl Episode {
    /// Resolve the captured audio link to a URL.
    ///
    /// A missing or malformed link never fails episode construction; it is
    /// reported here, when the link is dereferenced.
    pub fn audio_url(&self) -> Result<Url, FeedError> {
        let raw = self
            .link
            .as_deref()
            .ok_or_else(|| FeedError::UnparseableLink {
                episode: self.title.clone(),
            })?;
        Url::parse(raw).map_err(|source| FeedError::InvalidAudioLink {
            episode: self.title.clone(),
            source,
        })
    }
}

/// Parse one feed's raw text into a podcast.
///
/// Empty input is a valid "no podcast" outcome, not an error. A feed whose
/// title cannot be resolved to non-empty text is unusable and yields an
/// error so the caller can skip it; a partially populated podcast is never
/// returned. An absent image is fine, but an image value that survives
/// resolution and still fails URL parsing makes the feed unusable too.
pub fn parse_feed(feed_url: Url, raw: &str) -> Result<Option<Podcast>, FeedError> {
    if raw.is_empty() {
        return Ok(None);
    }

    // The resolver already ran the cleanup pass over the captured span; the
    // entity substitution runs here, so the title is sanitized twice.
    let title = resolve_title(raw)
        .map(|t| convert_special_chars(&t))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| FeedError::MissingTitle {
            url: feed_url.to_string(),
        })?;

    let image = match resolve_image(raw)? {
        Some(location) => Some(Url::parse(&location).map_err(|source| {
            FeedError::InvalidImageUrl {
                url: feed_url.to_string(),
                source,
            }
        })?),
        None => None,
    };

    let description = resolve_description(raw).map(|d| convert_special_chars(&d));
    let episodes = segment_episodes(raw, &title);

    Ok(Some(Podcast {
        title,
        description,
        link: feed_url,
        image,
        episodes,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_url() -> Url {
        Url::parse("https://example.com/feed.xml").unwrap()
    }

    const SAMPLE_FEED: &str = "\
        <title>Example Show</title>\
        <description>Hi &amp; welcome</description>\
        <item><title>Ep1</title><link>http://x/a.mp3</link></item>";

    #[test]
    fn parses_podcast_metadata_and_link_fallback_episode() {
        let podcast = parse_feed(feed_url(), SAMPLE_FEED).unwrap().unwrap();

        assert_eq!(podcast.title, "Example Show");
        assert_eq!(podcast.description.as_deref(), Some("Hi & welcome"));
        assert_eq!(podcast.link, feed_url());
        assert!(podcast.image.is_none());

        let episodes = podcast.episodes();
        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].title, "Ep1");
        assert_eq!(
            episodes[0].audio_url().unwrap(),
            Url::parse("http://x/a.mp3").unwrap()
        );
    }

    #[test]
    fn enclosure_url_wins_over_other_attributes() {
        let raw = "\
            <title>Show</title>\
            <item><title>Ep</title>\
            <enclosure url=\"http://x/b.mp3\" length=\"123\"/>\
            </item>";
        let podcast = parse_feed(feed_url(), raw).unwrap().unwrap();
        let episode = podcast.episode("Ep").unwrap();

        assert_eq!(
            episode.audio_url().unwrap(),
            Url::parse("http://x/b.mp3").unwrap()
        );
    }

    #[test]
    fn empty_text_is_no_podcast() {
        assert!(parse_feed(feed_url(), "").unwrap().is_none());
    }

    #[test]
    fn missing_title_is_unusable_feed() {
        let result = parse_feed(feed_url(), "<author>nobody</author>");
        assert!(matches!(result, Err(FeedError::MissingTitle { .. })));
    }

    #[test]
    fn title_sanitized_to_empty_is_unusable_feed() {
        // A title made entirely of stripped characters must not commit a
        // title-less podcast.
        let result = parse_feed(feed_url(), "<title>\u{a9}</title>");
        assert!(matches!(result, Err(FeedError::MissingTitle { .. })));
    }

    #[test]
    fn title_falls_back_to_itunes_summary() {
        let raw = "<itunes:summary>Summary Show</itunes:summary>";
        let podcast = parse_feed(feed_url(), raw).unwrap().unwrap();
        assert_eq!(podcast.title, "Summary Show");
    }

    #[test]
    fn cdata_wrapped_description_is_unwrapped() {
        let raw = "\
            <title>Show</title>\
            <description><![CDATA[wrapped text]]></description>";
        let podcast = parse_feed(feed_url(), raw).unwrap().unwrap();
        assert_eq!(podcast.description.as_deref(), Some("wrapped text"));
    }

    #[test]
    fn anchor_markup_in_description_is_reduced() {
        let raw = "\
            <title>Show</title>\
            <description><![CDATA[Visit <a href=\"http://spam\">click here]]></description>";
        let podcast = parse_feed(feed_url(), raw).unwrap().unwrap();
        // The anchor's opening tag is excised; its inner text survives. The
        // `</a>` closer never makes it into a capture because the terminator
        // scan stops at the first `</`.
        assert_eq!(podcast.description.as_deref(), Some("Visit click here"));
    }

    #[test]
    fn itunes_image_resolves_artwork() {
        let raw = "\
            <title>Show</title>\
            <itunes:image href=\"https://example.com/art.png\"/>";
        let podcast = parse_feed(feed_url(), raw).unwrap().unwrap();
        assert_eq!(
            podcast.image,
            Some(Url::parse("https://example.com/art.png").unwrap())
        );
    }

    #[test]
    fn unparseable_image_url_is_unusable_feed() {
        let raw = "\
            <title>Show</title>\
            <image><url>not a url at all</url></image>";
        let result = parse_feed(feed_url(), raw);
        assert!(matches!(result, Err(FeedError::InvalidImageUrl { .. })));
    }

    #[test]
    fn episode_with_unparseable_link_is_still_constructed() {
        let raw = "\
            <title>Show</title>\
            <item><title>Broken</title></item>";
        let podcast = parse_feed(feed_url(), raw).unwrap().unwrap();
        let episode = podcast.episode("Broken").unwrap();

        assert!(episode.link.is_none());
        assert!(matches!(
            episode.audio_url(),
            Err(FeedError::UnparseableLink { .. })
        ));
    }

    #[test]
    fn invalid_audio_link_fails_on_dereference_only() {
        let raw = "\
            <title>Show</title>\
            <item><title>Odd</title><link>not a url</link></item>";
        let podcast = parse_feed(feed_url(), raw).unwrap().unwrap();
        let episode = podcast.episode("Odd").unwrap();

        assert_eq!(episode.link.as_deref(), Some("not a url"));
        assert!(matches!(
            episode.audio_url(),
            Err(FeedError::InvalidAudioLink { .. })
        ));
    }

    #[test]
    fn episodes_iterate_in_document_order() {
        let raw = "\
            <title>Show</title>\
            <item><title>Zed</title><link>http://x/z.mp3</link></item>\
            <item><title>Alpha</title><link>http://x/a.mp3</link></item>\
            <item><title>Mid</title><link>http://x/m.mp3</link></item>";
        let podcast = parse_feed(feed_url(), raw).unwrap().unwrap();

        let titles: Vec<&str> = podcast.episodes().iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["Zed", "Alpha", "Mid"]);
    }
}
