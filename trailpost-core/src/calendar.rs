//! Read-only client for the calendar events API.

use chrono::{DateTime, Datelike, Months, NaiveDate, SecondsFormat, TimeZone, Utc};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use trailpost_types::CalendarEvent;
use url::Url;

const TIMEOUT_SECONDS: u64 = 60;

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Invalid calendar API base: {0}")]
    BaseUrl(#[from] url::ParseError),

    #[error("Calendar API base {0} cannot carry a path")]
    NotABase(String),

    #[error("Request to calendar API failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from calendar API: {body}")]
    Status { status: u16, body: String },

    #[error("No month window for {0}")]
    Window(String),
}

#[derive(Debug, Default, Deserialize)]
struct EventsPage {
    #[serde(default)]
    items: Vec<CalendarEvent>,
}

/// Start of the month containing `now` through 23:59:59 on its last day,
/// both in `now`'s time zone
pub fn month_window<Tz: TimeZone>(now: &DateTime<Tz>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let tz = now.timezone();
    let first = NaiveDate::from_ymd_opt(now.year(), now.month(), 1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;

    let start = tz.from_local_datetime(&first.and_hms_opt(0, 0, 0)?).earliest()?;
    let end = tz.from_local_datetime(&last.and_hms_opt(23, 59, 59)?).latest()?;
    Some((start.with_timezone(&Utc), end.with_timezone(&Utc)))
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub struct CalendarClient {
    http_client: reqwest::Client,
    api_base: Url,
    calendar_id: String,
    api_key: String,
    max_results: u32,
}

impl CalendarClient {
    pub fn new(
        api_base: &str,
        calendar_id: impl Into<String>,
        api_key: impl Into<String>,
        max_results: u32,
    ) -> Result<Self, CalendarError> {
        let api_base = Url::parse(api_base)?;
        if api_base.cannot_be_a_base() {
            return Err(CalendarError::NotABase(api_base.to_string()));
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECONDS))
            .build()?;

        Ok(Self {
            http_client,
            api_base,
            calendar_id: calendar_id.into(),
            api_key: api_key.into(),
            max_results,
        })
    }

    /// `<api>/calendars/<calendar id>/events` with the query for one time window
    pub fn events_url(&self, from: &DateTime<Utc>, to: &DateTime<Utc>) -> Url {
        let mut url = self.api_base.clone();
        // Checked in new()
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["calendars", self.calendar_id.as_str(), "events"]);
        }

        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("timeMin", &timestamp(from))
            .append_pair("timeMax", &timestamp(to))
            .append_pair("singleEvents", "true")
            .append_pair("orderBy", "startTime")
            .append_pair("maxResults", &self.max_results.to_string());
        url
    }

    /// Events of the month containing `now`, in start order
    pub async fn events_this_month<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> Result<Vec<CalendarEvent>, CalendarError> {
        let (from, to) =
            month_window(now).ok_or_else(|| CalendarError::Window(now.naive_local().to_string()))?;
        let url = self.events_url(&from, &to);
        tracing::debug!("Fetching events {} .. {}", timestamp(&from), timestamp(&to));

        let response = self.http_client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CalendarError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let page: EventsPage = response.json().await?;
        Ok(page.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use mockito::Matcher;

    fn pacific_mid_march() -> DateTime<FixedOffset> {
        FixedOffset::west_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 3, 15, 10, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_month_window() {
        let (from, to) = month_window(&pacific_mid_march()).unwrap();
        assert_eq!(timestamp(&from), "2025-03-01T08:00:00.000Z");
        assert_eq!(timestamp(&to), "2025-04-01T07:59:59.000Z");

        let december = Utc.with_ymd_and_hms(2024, 12, 31, 23, 0, 0).unwrap();
        let (from, to) = month_window(&december).unwrap();
        assert_eq!(timestamp(&from), "2024-12-01T00:00:00.000Z");
        assert_eq!(timestamp(&to), "2024-12-31T23:59:59.000Z");
    }

    #[test]
    fn test_events_url() {
        let client =
            CalendarClient::new("https://cal.example/v3", "troop@example.com", "k", 6).unwrap();
        let (from, to) = month_window(&pacific_mid_march()).unwrap();
        let url = client.events_url(&from, &to);

        assert_eq!(url.path(), "/v3/calendars/troop@example.com/events");
        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(query.contains(&("singleEvents".into(), "true".into())));
        assert!(query.contains(&("orderBy".into(), "startTime".into())));
        assert!(query.contains(&("maxResults".into(), "6".into())));
        assert!(query.contains(&("timeMin".into(), "2025-03-01T08:00:00.000Z".into())));
    }

    #[tokio::test]
    async fn test_fetches_month_of_events() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/calendars/troop/events")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("key".into(), "secret-key".into()),
                Matcher::UrlEncoded("timeMin".into(), "2025-03-01T08:00:00.000Z".into()),
                Matcher::UrlEncoded("timeMax".into(), "2025-04-01T07:59:59.000Z".into()),
                Matcher::UrlEncoded("singleEvents".into(), "true".into()),
                Matcher::UrlEncoded("orderBy".into(), "startTime".into()),
                Matcher::UrlEncoded("maxResults".into(), "6".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"items": [
                    {"summary": "Troop Meeting", "start": {"dateTime": "2025-03-18T19:00:00-07:00"}},
                    {"summary": "Campout", "start": {"date": "2025-03-22"}}
                ]}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let client = CalendarClient::new(&server.url(), "troop", "secret-key", 6).unwrap();
        let events = client.events_this_month(&pacific_mid_march()).await.unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].summary, "Troop Meeting");
        assert!(events[1].start.is_all_day());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/calendars/troop/events")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body("API key not valid")
            .create_async()
            .await;

        let client = CalendarClient::new(&server.url(), "troop", "bad", 6).unwrap();
        let err = client
            .events_this_month(&pacific_mid_march())
            .await
            .unwrap_err();
        assert!(matches!(err, CalendarError::Status { status: 403, .. }));
    }
}
