//! Upcoming events for the current month on the home page.

use crate::calendar::CalendarClient;
use crate::dom::Dom;
use chrono::{DateTime, TimeZone};
use trailpost_render::{render_fragments, EventCardTemplate, EventsNoticeTemplate};
use trailpost_types::CalendarEvent;

pub const EVENTS_CONTAINER: &str = "upcoming-events-container";

pub const UNCONFIGURED_MESSAGE: &str =
    "Please configure the Google Calendar API key to see upcoming events.";
pub const EMPTY_MESSAGE: &str = "No events scheduled for the rest of this month.";
pub const FAILED_MESSAGE: &str = "Could not load events at this time.";

/// (keywords, icon, background class), first match wins
const EVENT_ICONS: &[(&[&str], &str, &str)] = &[
    (&["hike", "backpack"], "hiking", "bg-orange-500"),
    (&["camp"], "camping", "bg-green-600"),
    (&["meeting", "troop"], "groups", "bg-blue-500"),
    (&["service", "project"], "handshake", "bg-purple-500"),
    (&["court", "honor"], "military_tech", "bg-yellow-500"),
];

const DEFAULT_ICON: (&str, &str) = ("event", "bg-slate-500");

/// What the events container ended up showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventsState {
    Unconfigured,
    Listed(usize),
    Empty,
    Failed,
}

/// Icon name and background class for an event, by summary keyword
pub fn event_icon(summary: &str) -> (&'static str, &'static str) {
    let summary = summary.to_lowercase();
    EVENT_ICONS
        .iter()
        .find(|(keywords, _, _)| keywords.iter().any(|k| summary.contains(k)))
        .map(|&(_, icon, class)| (icon, class))
        .unwrap_or(DEFAULT_ICON)
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Card for one event. Timed events are labelled in their own offset.
pub fn event_card(event: &CalendarEvent) -> EventCardTemplate {
    let (day_label, time_label) = match (&event.start.date_time, &event.start.date) {
        (Some(at), _) => (
            at.format("%b %-d").to_string(),
            at.format("%-I:%M %p").to_string(),
        ),
        (None, Some(date)) => (date.format("%b %-d").to_string(), "All Day".to_string()),
        (None, None) => (String::new(), "All Day".to_string()),
    };
    let (icon, icon_class) = event_icon(&event.summary);

    EventCardTemplate {
        summary: event.summary.clone(),
        day_label,
        time_label,
        location: non_blank(&event.location),
        description: non_blank(&event.description),
        icon,
        icon_class,
    }
}

fn notice(message: &str, calendar_page: &str, primary: bool) -> EventsNoticeTemplate {
    EventsNoticeTemplate {
        message: message.to_string(),
        calendar_href: calendar_page.to_string(),
        primary,
    }
}

/// Fill the events container for the month containing `now`.
///
/// Returns `None` when the page has no events container.
pub async fn render_events<Tz: TimeZone>(
    dom: &mut Dom,
    calendar: Option<&CalendarClient>,
    calendar_page: &str,
    now: &DateTime<Tz>,
) -> Option<EventsState> {
    if !dom.contains_id(EVENTS_CONTAINER) {
        return None;
    }

    let (state, rendered) = match calendar {
        None => (
            EventsState::Unconfigured,
            render_fragments([notice(UNCONFIGURED_MESSAGE, calendar_page, true)]),
        ),
        Some(client) => match client.events_this_month(now).await {
            Ok(events) if events.is_empty() => (
                EventsState::Empty,
                render_fragments([notice(EMPTY_MESSAGE, calendar_page, false)]),
            ),
            Ok(events) => (
                EventsState::Listed(events.len()),
                render_fragments(events.iter().map(event_card)),
            ),
            Err(e) => {
                tracing::error!("Error fetching events: {}", e);
                (
                    EventsState::Failed,
                    render_fragments([notice(FAILED_MESSAGE, calendar_page, true)]),
                )
            }
        },
    };

    match rendered {
        Ok(html) => {
            if let Some(mut container) = dom.element_mut(EVENTS_CONTAINER) {
                container.set_inner_html(&html);
            }
            Some(state)
        }
        Err(e) => {
            tracing::warn!("Error rendering events: {}", e);
            Some(EventsState::Failed)
        }
    }
}
