//! Shared types for trailpost
//!
//! Records read from the site's collection files and the persisted album
//! cache. Each collection keeps its own shape; nothing here tries to unify
//! them.

pub mod de;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// A normalized photo album, as persisted in `data/albums.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub product_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_photo_base_url: Option<String>,

    #[serde(
        default,
        deserialize_with = "de::optional_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub media_items_count: Option<u64>,
}

/// A leader or youth leader in `data/leadership.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Person {
    #[serde(default, deserialize_with = "de::display_string")]
    pub name: String,

    #[serde(default, deserialize_with = "de::display_string")]
    pub role: String,

    #[serde(default)]
    pub image: Option<String>,

    #[serde(default, deserialize_with = "de::truthy")]
    pub eagle_candidate: bool,
}

/// An Eagle Scout in `data/eagles.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EagleScout {
    #[serde(default, deserialize_with = "de::display_string")]
    pub name: String,

    #[serde(default, deserialize_with = "de::display_string")]
    pub date_display: String,

    #[serde(default, deserialize_with = "de::display_string")]
    pub class_year: String,
}

/// One event from the calendar API (`items[]`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalendarEvent {
    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub start: EventStart,
}

/// Start of an event: timed events carry `dateTime`, all-day events `date`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStart {
    #[serde(default)]
    pub date_time: Option<DateTime<FixedOffset>>,

    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl EventStart {
    pub fn is_all_day(&self) -> bool {
        self.date_time.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_album_wire_names() {
        let album = Album {
            id: "a1".into(),
            title: "Summer Camp".into(),
            product_url: "https://photos.example/a1".into(),
            cover_photo_base_url: Some("https://lh3.example/c".into()),
            media_items_count: Some(12),
        };

        let json = serde_json::to_value(&album).unwrap();
        assert_eq!(json["productUrl"], "https://photos.example/a1");
        assert_eq!(json["coverPhotoBaseUrl"], "https://lh3.example/c");
        assert_eq!(json["mediaItemsCount"], 12);
    }

    #[test]
    fn test_album_count_as_string() {
        let album: Album =
            serde_json::from_str(r#"{"id":"a","title":"t","productUrl":"u","mediaItemsCount":"7"}"#)
                .unwrap();
        assert_eq!(album.media_items_count, Some(7));
        assert_eq!(album.cover_photo_base_url, None);
    }

    #[test]
    fn test_person_candidate_flag() {
        let people: Vec<Person> = serde_json::from_str(
            r#"[
                {"name": "Ana", "role": "SPL", "eagle_candidate": true},
                {"name": "Ben", "role": "ASPL", "eagle_candidate": "yes"},
                {"name": "Cy", "role": "Scribe", "eagle_candidate": 0},
                {"name": "Di", "role": "Quartermaster"}
            ]"#,
        )
        .unwrap();

        let flags: Vec<bool> = people.iter().map(|p| p.eagle_candidate).collect();
        assert_eq!(flags, vec![true, true, false, false]);
    }

    #[test]
    fn test_eagle_numeric_class_year() {
        let scout: EagleScout =
            serde_json::from_str(r#"{"name":"Eli","date_display":"May 2024","class_year":2024}"#)
                .unwrap();
        assert_eq!(scout.class_year, "2024");
    }

    #[test]
    fn test_event_start_variants() {
        let timed: CalendarEvent = serde_json::from_str(
            r#"{"summary":"Meeting","start":{"dateTime":"2025-03-04T19:00:00-08:00"}}"#,
        )
        .unwrap();
        assert!(!timed.start.is_all_day());

        let all_day: CalendarEvent =
            serde_json::from_str(r#"{"summary":"Campout","start":{"date":"2025-03-08"}}"#).unwrap();
        assert!(all_day.start.is_all_day());
        assert_eq!(all_day.start.date, NaiveDate::from_ymd_opt(2025, 3, 8));
    }
}
