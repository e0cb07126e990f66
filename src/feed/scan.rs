// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bounded left-to-right scanning over raw feed text.
//!
//! Non-conformant feeds rule out a real XML tokenizer, so extraction works on
//! plain substring matching: find a trigger tag, then walk forward until the
//! first terminator of either shape (`</` closing style, `/>` self-closing
//! style). No DOM is built and nesting is not tracked.

use super::sanitize::clean_string;

/// A position into a text buffer with bounds-checked search. Scans that walk
/// off the end report "not found" instead of panicking.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    buf: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a str) -> Self {
        Self { buf, pos: 0 }
    }

    /// Absolute position of the next occurrence of `needle` at or after the
    /// cursor, without moving it.
    pub fn find(&self, needle: &str) -> Option<usize> {
        self.buf[self.pos..].find(needle).map(|i| self.pos + i)
    }

    /// Move to an absolute position, clamped to the buffer end.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.buf.len());
    }
}

/// Extract the cleaned inner text of the first `trigger` element in `buf`.
///
/// Single-shot: only the first occurrence of the trigger is considered. The
/// captured span runs from the end of the trigger to the first terminator of
/// either shape, exclusive of both, and goes through [`clean_string`] before
/// it is returned. A trigger with no terminator before the buffer ends is
/// not found, as is an empty buffer or a trigger longer than what remains.
pub fn extract_tag(buf: &str, trigger: &str) -> Option<String> {
    let start = buf.find(trigger)? + trigger.len();
    let end = find_terminator(buf, start)?;
    Some(clean_string(&buf[start..end]))
}

/// Position of the first `</` or `/>` at or after `from`.
fn find_terminator(buf: &str, from: usize) -> Option<usize> {
    let bytes = buf.as_bytes();
    let mut i = from;
    while i + 1 < bytes.len() {
        let closing = bytes[i] == b'<' && bytes[i + 1] == b'/';
        let self_closing = bytes[i] == b'/' && bytes[i + 1] == b'>';
        if closing || self_closing {
            return Some(i);
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_closing_tag_content() {
        assert_eq!(
            extract_tag("<title>Example Show</title>", "<title>"),
            Some("Example Show".to_string())
        );
    }

    #[test]
    fn extracts_and_trims_surrounding_whitespace() {
        assert_eq!(
            extract_tag("<title>  Example Show  </title>", "<title>"),
            Some("Example Show".to_string())
        );
    }

    #[test]
    fn extracts_self_closing_content() {
        assert_eq!(
            extract_tag("<itunes:image href=\"http://x/art.png\"/>", "<itunes:image"),
            Some("http://x/art.png".to_string())
        );
    }

    #[test]
    fn first_terminator_shape_wins() {
        // A closing tag before any `/>` terminates the span.
        assert_eq!(
            extract_tag("<title>a</title><other/>", "<title>"),
            Some("a".to_string())
        );
    }

    #[test]
    fn only_first_occurrence_is_extracted() {
        assert_eq!(
            extract_tag("<title>first</title><title>second</title>", "<title>"),
            Some("first".to_string())
        );
    }

    #[test]
    fn empty_content_is_valid() {
        assert_eq!(extract_tag("<title></title>", "<title>"), Some(String::new()));
    }

    #[test]
    fn missing_trigger_is_not_found() {
        assert_eq!(extract_tag("<other>text</other>", "<title>"), None);
    }

    #[test]
    fn empty_buffer_is_not_found() {
        assert_eq!(extract_tag("", "<title>"), None);
    }

    #[test]
    fn trigger_longer_than_buffer_is_not_found() {
        assert_eq!(extract_tag("<t>", "<title>"), None);
    }

    #[test]
    fn unterminated_element_is_not_found() {
        assert_eq!(extract_tag("<title>never ends", "<title>"), None);
    }

    #[test]
    fn cursor_find_resumes_from_position() {
        let buf = "<item>a</item><item>b</item>";
        let mut cursor = Cursor::new(buf);
        assert_eq!(cursor.find("<item>"), Some(0));
        cursor.seek(14);
        assert_eq!(cursor.find("<item>"), Some(14));
        cursor.seek(buf.len() + 10);
        assert_eq!(cursor.find("<item>"), None);
    }
}
