//! # trailpost-render
//!
//! Fragment rendering for trailpost collections.
//!
//! Each collection record is projected through a fixed Askama template and
//! the fragments are concatenated into a container's new content.

pub mod templates;

use askama::Template;
use thiserror::Error;

pub use templates::{
    cover_url, AlbumCardTemplate, EagleCardTemplate, EventCardTemplate, EventsNoticeTemplate,
    LeaderCardTemplate, YouthCardTemplate, PLACEHOLDER_COVER, PLACEHOLDER_PORTRAIT,
};

#[derive(Error, Debug)]
#[error("Failed to render fragment: {0}")]
pub struct RenderError(#[from] askama::Error);

/// Render every card and concatenate the fragments in order
pub fn render_fragments<I, T>(cards: I) -> Result<String, RenderError>
where
    I: IntoIterator<Item = T>,
    T: Template,
{
    let mut html = String::new();
    for card in cards {
        card.render_into(&mut html)?;
    }
    Ok(html)
}
