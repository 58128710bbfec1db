//! Askama fragment templates, one per collection card.

use askama::Template;
use trailpost_types::{Album, EagleScout, Person};

/// Shown when a youth leader has no portrait
pub const PLACEHOLDER_PORTRAIT: &str = "assets/images/placeholder_user.png";

/// Shown when an album has no cover photo
pub const PLACEHOLDER_COVER: &str = "assets/images/placeholder.jpg";

/// Size suffix appended to bare photo-library base URLs
const COVER_SIZE_SUFFIX: &str = "=w600";

/// Adult leader card (scoutmasters, committee)
#[derive(Template)]
#[template(path = "leader_card.html")]
pub struct LeaderCardTemplate {
    pub name: String,
    pub role: String,
    /// Committee leadership roles use the primary colour
    pub accent: bool,
}

impl LeaderCardTemplate {
    pub fn from_person(person: &Person, accent: bool) -> Self {
        Self {
            name: person.name.clone(),
            role: person.role.clone(),
            accent,
        }
    }
}

/// Youth leader card with portrait and optional candidate badge
#[derive(Template)]
#[template(path = "youth_card.html")]
pub struct YouthCardTemplate {
    pub name: String,
    pub role: String,
    pub image: String,
    pub eagle_candidate: bool,
}

impl YouthCardTemplate {
    pub fn from_person(person: &Person) -> Self {
        let image = person
            .image
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(PLACEHOLDER_PORTRAIT)
            .to_string();

        Self {
            name: person.name.clone(),
            role: person.role.clone(),
            image,
            eagle_candidate: person.eagle_candidate,
        }
    }
}

#[derive(Template)]
#[template(path = "eagle_card.html")]
pub struct EagleCardTemplate {
    pub name: String,
    pub date_display: String,
    pub class_year: String,
}

impl From<&EagleScout> for EagleCardTemplate {
    fn from(scout: &EagleScout) -> Self {
        Self {
            name: scout.name.clone(),
            date_display: scout.date_display.clone(),
            class_year: scout.class_year.clone(),
        }
    }
}

/// Gallery tile linking out to the album
#[derive(Template)]
#[template(path = "album_card.html")]
pub struct AlbumCardTemplate {
    pub title: String,
    pub product_url: String,
    pub cover_url: String,
    pub media_items_count: u64,
}

impl From<&Album> for AlbumCardTemplate {
    fn from(album: &Album) -> Self {
        Self {
            title: album.title.clone(),
            product_url: album.product_url.clone(),
            cover_url: cover_url(album.cover_photo_base_url.as_deref()),
            media_items_count: album.media_items_count.unwrap_or(0),
        }
    }
}

/// Resolve the image shown for an album cover.
///
/// Local assets and URLs that already carry size parameters are used as-is;
/// bare base URLs get a default width.
pub fn cover_url(base_url: Option<&str>) -> String {
    match base_url.map(str::trim).filter(|s| !s.is_empty()) {
        None => PLACEHOLDER_COVER.to_string(),
        Some(url) if url.starts_with("assets/") || url.contains('=') => url.to_string(),
        Some(url) => format!("{}{}", url, COVER_SIZE_SUFFIX),
    }
}

/// Upcoming event card. Labels are preformatted by the caller.
#[derive(Template)]
#[template(path = "event_card.html")]
pub struct EventCardTemplate {
    pub summary: String,
    pub day_label: String,
    pub time_label: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub icon: &'static str,
    pub icon_class: &'static str,
}

/// Message block for the events container (not configured, empty, failed)
#[derive(Template)]
#[template(path = "events_notice.html")]
pub struct EventsNoticeTemplate {
    pub message: String,
    pub calendar_href: String,
    pub primary: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(name: &str, image: Option<&str>, candidate: bool) -> Person {
        Person {
            name: name.into(),
            role: "Patrol Leader".into(),
            image: image.map(Into::into),
            eagle_candidate: candidate,
        }
    }

    #[test]
    fn test_youth_card_placeholder() {
        let html = YouthCardTemplate::from_person(&person("Ana", None, false))
            .render()
            .unwrap();
        assert!(html.contains(PLACEHOLDER_PORTRAIT));
        assert!(!html.contains("EAGLE CANDIDATE"));

        let blank = YouthCardTemplate::from_person(&person("Ana", Some("  "), false));
        assert_eq!(blank.image, PLACEHOLDER_PORTRAIT);
    }

    #[test]
    fn test_youth_card_badge_and_image() {
        let html = YouthCardTemplate::from_person(&person("Ben", Some("img/ben.jpg"), true))
            .render()
            .unwrap();
        assert!(html.contains(r#"src="img/ben.jpg""#));
        assert!(html.contains("EAGLE CANDIDATE"));
    }

    #[test]
    fn test_leader_card_escapes_fields() {
        let mut p = person("Tom & Jerry", None, false);
        p.role = "<b>Chair</b>".into();
        let html = LeaderCardTemplate::from_person(&p, true).render().unwrap();
        assert!(html.contains("Tom &amp; Jerry"));
        assert!(!html.contains("<b>Chair</b>"));
        assert!(html.contains("var(--primary)"));
    }

    #[test]
    fn test_cover_url_rules() {
        assert_eq!(cover_url(None), PLACEHOLDER_COVER);
        assert_eq!(cover_url(Some("")), PLACEHOLDER_COVER);
        assert_eq!(
            cover_url(Some("assets/images/camp.jpg")),
            "assets/images/camp.jpg"
        );
        assert_eq!(
            cover_url(Some("https://lh3.example/abc=w600-h315-p-k")),
            "https://lh3.example/abc=w600-h315-p-k"
        );
        assert_eq!(
            cover_url(Some("https://lh3.example/abc")),
            "https://lh3.example/abc=w600"
        );
    }

    #[test]
    fn test_album_card() {
        let album = Album {
            id: "a1".into(),
            title: "Winter Camp".into(),
            product_url: "https://photos.example/a1".into(),
            cover_photo_base_url: None,
            media_items_count: Some(42),
        };
        let html = AlbumCardTemplate::from(&album).render().unwrap();
        assert!(html.contains("42 Items"));
        assert!(html.contains(r#"href="https://photos.example/a1""#));
        assert!(html.contains(PLACEHOLDER_COVER));
    }

    #[test]
    fn test_event_card_optional_fields() {
        let card = EventCardTemplate {
            summary: "Troop Meeting".into(),
            day_label: "Mar 4".into(),
            time_label: "7:00 PM".into(),
            location: Some("Scout Hall".into()),
            description: None,
            icon: "groups",
            icon_class: "bg-blue-500",
        };
        let html = card.render().unwrap();
        assert!(html.contains("Scout Hall"));
        assert!(!html.contains("line-clamp-2"));
        assert!(html.contains("bg-blue-500"));
    }
}
