//! Binding of header fields onto page elements.
//!
//! Each header key names an element id (`hero_title` binds to
//! `#hero-title`). Keys without a matching element are skipped, so one
//! header can carry fields for several templates.

use crate::dom::{Dom, ElementMut};
use crate::frontmatter::{scalar_text, HeaderRecord};
use regex::Regex;
use serde_yaml::Value;
use std::sync::OnceLock;

/// Keys containing this are treated as image URLs
const IMAGE_ROLE: &str = "image";

static PARAGRAPH_BREAK: OnceLock<Regex> = OnceLock::new();

fn paragraph_break() -> &'static Regex {
    PARAGRAPH_BREAK.get_or_init(|| Regex::new(r"\n\s*\n").unwrap())
}

/// How a single field lands on its element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    ImageSource(String),
    BackgroundImage(String),
    Paragraphs(Vec<String>),
    Text(String),
}

/// Element id a header key binds to.
///
/// Separators (`_` and whitespace) become `-`; everything else is kept.
///
/// ```
/// use trailpost_core::binder::binding_id;
///
/// assert_eq!(binding_id("hero_title"), "hero-title");
/// assert_eq!(binding_id(&binding_id("story 1")), "story-1");
/// ```
pub fn binding_id(key: &str) -> String {
    key.chars()
        .map(|c| if c == '_' || c.is_whitespace() { '-' } else { c })
        .collect()
}

/// Split on blank lines into trimmed, non-empty paragraphs
pub fn split_paragraphs(text: &str) -> Vec<String> {
    paragraph_break()
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Choose the rendering for a value bound to an element with `tag_name`.
///
/// Returns `None` for values without a text form (mappings, sequences).
pub fn plan_binding(key: &str, value: &Value, tag_name: &str) -> Option<Binding> {
    let text = scalar_text(value)?;

    if key.contains(IMAGE_ROLE) {
        return Some(if tag_name.eq_ignore_ascii_case("img") {
            Binding::ImageSource(text)
        } else {
            Binding::BackgroundImage(text)
        });
    }

    if matches!(value, Value::String(_)) && text.contains('\n') {
        return Some(Binding::Paragraphs(split_paragraphs(&text)));
    }

    Some(Binding::Text(text))
}

fn apply(element: &mut ElementMut<'_>, binding: Binding) {
    match binding {
        Binding::ImageSource(url) => element.set_attr("src", &url),
        Binding::BackgroundImage(url) => {
            element.set_style("background-image", &format!("url('{}')", url))
        }
        Binding::Paragraphs(paragraphs) => {
            // Operator-authored content: inserted as markup, not escaped
            let html: String = paragraphs
                .iter()
                .map(|p| format!("<p>{}</p>", p))
                .collect();
            element.set_inner_html(&html);
        }
        Binding::Text(text) => element.set_text(&text),
    }
}

/// Bind every header field that has a target element. Returns the number bound.
pub fn bind_header(dom: &mut Dom, header: &HeaderRecord) -> usize {
    let mut bound = 0;

    for (key, value) in header.iter() {
        let target = binding_id(&key);
        let Some(mut element) = dom.element_mut(&target) else {
            continue;
        };

        match plan_binding(&key, value, element.tag_name()) {
            Some(binding) => {
                apply(&mut element, binding);
                bound += 1;
            }
            None => tracing::debug!("Field {:?} has no text form; skipped", key),
        }
    }

    bound
}
