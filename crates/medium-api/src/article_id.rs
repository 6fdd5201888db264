//! Extracting an article id from a story URL.

use regex::Regex;
use std::sync::OnceLock;

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"https?://\S+").expect("static regex is valid"))
}

/// Pull the article id out of text containing a Medium story URL.
///
/// The id is the last hyphen-separated part of the last path segment:
/// `https://nishu-jain.medium.com/about-me-nishu-jain-562c5821b5f0`
/// yields `562c5821b5f0`. Returns `None` when there is no URL, the URL
/// has no path, or the candidate is not purely alphanumeric.
pub fn extract_article_id(text: &str) -> Option<String> {
    let found = url_pattern().find(text)?;
    let parsed = url::Url::parse(found.as_str()).ok()?;

    let last_segment = parsed.path().rsplit('/').next()?;
    let candidate = last_segment.rsplit('-').next()?;

    if !candidate.is_empty() && candidate.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(candidate.to_string())
    } else {
        None
    }
}
