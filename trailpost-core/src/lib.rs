//! # trailpost-core
//!
//! Content binding engine for the trailpost site.
//!
//! Templates are parsed into a [`Dom`], content documents and collection
//! files are fetched from a [`ContentSource`], and the renderers bind them
//! into the page before it is serialized again.

pub mod binder;
pub mod body;
pub mod calendar;
pub mod collections;
pub mod config;
pub mod dom;
pub mod events;
pub mod frontmatter;
pub mod gallery;
#[cfg(feature = "markdown")]
pub mod markdown;
pub mod page;
pub mod section;
pub mod site;
pub mod slug;
pub mod source;

pub use binder::{bind_header, binding_id};
pub use body::BodyRenderer;
pub use calendar::{CalendarClient, CalendarError};
pub use config::{Config, ConfigError, Secret, Secrets};
pub use dom::Dom;
pub use frontmatter::{extract, Document, FrontmatterError, HeaderRecord};
pub use page::{PageOutcome, PageRenderer};
pub use site::{Route, SiteRenderer};
pub use source::{ContentSource, FsSource, HttpSource, SourceError};
