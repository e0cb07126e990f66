// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cleanup passes for extracted field values.
//!
//! Feeds in the wild leak tag remnants, HTML entities, and embedded anchors
//! into field values. Every captured span goes through [`clean_string`]
//! (junk trimming) when it is extracted, and human-readable fields
//! additionally go through [`convert_special_chars`] (entity and markup
//! substitution) before they are stored. Both passes are pure functions.

/// Trailing characters treated as tag-markup junk.
const TRAILING_JUNK: &[char] = &[' ', '/', '<', '"'];

/// Leading characters treated as tag-markup junk.
const LEADING_JUNK: &[char] = &['<', '/', '>', ' ', '"'];

/// Literal substitutions, applied in this exact order. `&#8211;` has to be
/// rewritten before the bare `&#` rule turns it into `#8211;`, and the
/// `#039;` rule picks up what the `&#` rule leaves behind of `&#039;`.
const SUBSTITUTIONS: &[(&str, &str)] = &[
    ("\u{a9}", ""),
    ("&amp;", "&"),
    ("&#8211;", "--"),
    ("&#", "#"),
    ("\u{b3}", ""),
    ("&apos;", "'"),
    ("#039;", "'"),
    ("&quot;", "'"),
];

/// Markup fragments stripped wholesale after entity substitution.
const MARKUP_STRIPS: &[&str] = &["<br>", "<em>", "<p>", "<div>", "]]>", "div>"];

const ANCHOR_OPEN: &str = "<a href=\"";
const ANCHOR_OPEN_END: &str = "\">";

/// Trim whitespace and tag-markup junk from both ends of a captured span,
/// then cut dangling `href=` / `![CDATA[` prefixes left behind by partial
/// tag captures. An empty result is valid output.
pub fn clean_string(raw: &str) -> String {
    let mut s = raw.trim();

    while let Some(last) = s.chars().next_back() {
        if !TRAILING_JUNK.contains(&last) {
            break;
        }
        s = &s[..s.len() - last.len_utf8()];
    }
    while let Some(first) = s.chars().next() {
        if !LEADING_JUNK.contains(&first) {
            break;
        }
        s = &s[first.len_utf8()..];
    }

    // A dangling `href=` keeps its opening quote attached, so six characters
    // go. Each check is applied to whatever the previous one left behind.
    if s.starts_with("href=") && char_len(s) > 5 {
        s = skip_chars(s, 6);
    }
    if s.starts_with("![CDATA[") && char_len(s) > 8 {
        s = skip_chars(s, 8);
    }
    if s.starts_with("![CDATA[<p>") && char_len(s) > 11 {
        s = skip_chars(s, 11);
    }

    s.to_string()
}

/// Replace entity references with readable text, drop everything outside the
/// ASCII range, strip leftover markup fragments, and excise the opening tag
/// of an embedded anchor if one survived the earlier passes.
pub fn convert_special_chars(raw: &str) -> String {
    let mut text = raw.to_string();
    for (needle, replacement) in SUBSTITUTIONS {
        text = text.replace(needle, replacement);
    }
    text.retain(|c| c.is_ascii());
    for fragment in MARKUP_STRIPS {
        text = text.replace(fragment, "");
    }
    if text.contains(ANCHOR_OPEN) {
        text = strip_anchor_open(&text);
    }
    text
}

/// Remove the opening-tag span of the first `<a href="...">` in `text`,
/// delimiters included. The anchor's inner text and its `</a>` closer stay
/// put, and later anchors are left alone. An anchor whose opening tag never
/// closes is left untouched.
fn strip_anchor_open(text: &str) -> String {
    let Some(start) = text.find(ANCHOR_OPEN) else {
        return text.to_string();
    };
    let Some(close) = text[start..].find(ANCHOR_OPEN_END) else {
        return text.to_string();
    };
    let resume = start + close + ANCHOR_OPEN_END.len();
    format!("{}{}", &text[..start], &text[resume..])
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn skip_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((i, _)) => &s[i..],
        None => "",
    }
}
