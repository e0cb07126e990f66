mod fetch;
mod fields;
mod parse;
mod sanitize;
mod scan;
mod segment;

pub use fetch::{fetch_feed, fetch_feed_text, is_url, parse_feed_file};
pub use parse::{Episode, Podcast, parse_feed};
