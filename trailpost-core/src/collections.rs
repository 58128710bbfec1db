//! JSON collection files rendered into their page containers.
//!
//! A collection file holds named arrays (`scoutmasters`, `youth`, ...).
//! Each array present in the file is projected through its card template
//! and replaces the content of its container. Arrays without a container
//! on the page are skipped.

use crate::dom::Dom;
use crate::source::{fetch_json, ContentSource};
use serde_json::{Map, Value};
use thiserror::Error;
use trailpost_render::{
    render_fragments, EagleCardTemplate, LeaderCardTemplate, RenderError, YouthCardTemplate,
};
use trailpost_types::{EagleScout, Person};

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("Invalid records: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Card template a sub-collection's records are projected through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    Leader,
    /// Leader card with the role in the primary colour
    AccentLeader,
    Youth,
    Eagle,
}

impl CardKind {
    /// Decode `records` and render one card per record
    pub fn render(self, records: Value) -> Result<String, CollectionError> {
        let html = match self {
            CardKind::Leader | CardKind::AccentLeader => {
                let people: Vec<Person> = serde_json::from_value(records)?;
                let accent = self == CardKind::AccentLeader;
                render_fragments(people.iter().map(|p| LeaderCardTemplate::from_person(p, accent)))?
            }
            CardKind::Youth => {
                let people: Vec<Person> = serde_json::from_value(records)?;
                render_fragments(people.iter().map(YouthCardTemplate::from_person))?
            }
            CardKind::Eagle => {
                let scouts: Vec<EagleScout> = serde_json::from_value(records)?;
                render_fragments(scouts.iter().map(EagleCardTemplate::from))?
            }
        };
        Ok(html)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SubCollection {
    pub key: &'static str,
    pub container: &'static str,
    pub card: CardKind,
}

/// A collection file and the containers its arrays feed
#[derive(Debug, Clone, Copy)]
pub struct Collection {
    pub file: &'static str,
    pub sections: &'static [SubCollection],
}

pub const LEADERSHIP: Collection = Collection {
    file: "data/leadership.json",
    sections: &[
        SubCollection {
            key: "scoutmasters",
            container: "scoutmaster-list",
            card: CardKind::Leader,
        },
        SubCollection {
            key: "committee_leadership",
            container: "committee-leadership-list",
            card: CardKind::AccentLeader,
        },
        SubCollection {
            key: "committee_members",
            container: "committee-members-list",
            card: CardKind::Leader,
        },
        SubCollection {
            key: "youth",
            container: "youth-leadership-list",
            card: CardKind::Youth,
        },
    ],
};

pub const EAGLES: Collection = Collection {
    file: "data/eagles.json",
    sections: &[SubCollection {
        key: "scouts",
        container: "eagles-list",
        card: CardKind::Eagle,
    }],
};

pub const COLLECTIONS: &[Collection] = &[LEADERSHIP, EAGLES];

impl Collection {
    /// Whether the page has a container for any of this collection's arrays
    pub fn is_wanted(&self, dom: &Dom) -> bool {
        self.sections.iter().any(|s| dom.contains_id(s.container))
    }

    /// Fill every container present on the page. Returns the number filled.
    ///
    /// A fetch or decode failure of the file is logged and leaves every
    /// container as it was; a bad array only affects its own container.
    pub async fn render(&self, dom: &mut Dom, source: &dyn ContentSource) -> usize {
        let mut data: Map<String, Value> = match fetch_json(source, self.file).await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Error loading {}: {}", self.file, e);
                return 0;
            }
        };

        let mut filled = 0;
        for section in self.sections {
            let Some(records) = data.remove(section.key) else {
                continue;
            };
            let Some(mut container) = dom.element_mut(section.container) else {
                continue;
            };

            match section.card.render(records) {
                Ok(html) => {
                    container.set_inner_html(&html);
                    filled += 1;
                }
                Err(e) => tracing::warn!("Skipping {} in {}: {}", section.key, self.file, e),
            }
        }

        filled
    }
}
