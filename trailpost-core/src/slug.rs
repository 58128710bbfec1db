//! Slugs for heading anchors and page identifiers.

use regex::Regex;
use std::sync::OnceLock;
use unicode_segmentation::UnicodeSegmentation;

static DASH_RUN: OnceLock<Regex> = OnceLock::new();

fn dash_run() -> &'static Regex {
    DASH_RUN.get_or_init(|| Regex::new(r"-{2,}").unwrap())
}

/// Anchor slug for a heading: lowercase, separators to `-`, punctuation dropped
///
/// ```
/// use trailpost_core::slug::slugify;
///
/// assert_eq!(slugify("What to Pack"), "what-to-pack");
/// assert_eq!(slugify("Court of Honor!"), "court-of-honor");
/// ```
pub fn slugify(input: &str) -> String {
    let cleaned: String = input
        .to_lowercase()
        .graphemes(true)
        .filter_map(|g| {
            let c = g.chars().next()?;
            if c.is_whitespace() || c == '_' || c == '-' {
                Some("-")
            } else if c.is_alphanumeric() {
                Some(g)
            } else {
                None
            }
        })
        .collect();

    dash_run()
        .replace_all(&cleaned, "-")
        .trim_matches('-')
        .to_string()
}

/// Whether `id` can name a page document (`content/pages/<id>.md`)
pub fn is_page_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 128
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
