//! Home and about pages take their fields from a fixed content document.

use crate::binder::bind_header;
use crate::dom::Dom;
use crate::frontmatter::extract;
use crate::source::ContentSource;

pub const HOME_DOCUMENT: &str = "content/home.md";
pub const ABOUT_DOCUMENT: &str = "content/about.md";

/// Content document bound into the page served at `path`, if any
pub fn section_document(path: &str) -> Option<&'static str> {
    if path.is_empty() || path.ends_with('/') || path.ends_with("index.html") {
        Some(HOME_DOCUMENT)
    } else if path.ends_with("about.html") {
        Some(ABOUT_DOCUMENT)
    } else {
        None
    }
}

/// Bind the section document's header fields. Returns the number bound.
pub async fn load_section(dom: &mut Dom, source: &dyn ContentSource, document: &str) -> usize {
    let text = match source.fetch_text(document).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Content loader error for {}: {}", document, e);
            return 0;
        }
    };

    match extract(&text).header {
        Some(header) => {
            let bound = bind_header(dom, &header);
            tracing::debug!("Bound {} field(s) from {}", bound, document);
            bound
        }
        None => 0,
    }
}
