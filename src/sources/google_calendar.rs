//! Google Calendar v3 client authenticated with a bearer token.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use url::Url;

use super::calendar::{CalendarEvent, CalendarInfo, CalendarSource, EventStart};
use super::{FetchError, agent, read_json};
use crate::constants::GOOGLE_CALENDAR_API_URL;

#[derive(Debug, Deserialize)]
struct GcalEventStart {
    date: Option<String>,
    #[serde(rename = "dateTime")]
    date_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GcalEvent {
    #[serde(default)]
    summary: Option<String>,
    start: GcalEventStart,
}

#[derive(Debug, Deserialize)]
struct GcalEvents {
    #[serde(default)]
    items: Vec<GcalEvent>,
}

#[derive(Debug, Deserialize)]
struct GcalCalendar {
    id: String,
    #[serde(default)]
    summary: String,
}

#[derive(Debug, Deserialize)]
struct GcalCalendarList {
    #[serde(default)]
    items: Vec<GcalCalendar>,
}

/// Read-only Google Calendar client.
pub struct GoogleCalendarClient {
    base_url: Url,
    token: String,
}

impl GoogleCalendarClient {
    pub fn new(token: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_base_url(GOOGLE_CALENDAR_API_URL, token)
    }

    pub fn with_base_url(base_url: &str, token: impl Into<String>) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| FetchError::DataSourceUnavailable(format!("bad API URL: {}", e)))?;
        Ok(Self {
            base_url,
            token: token.into(),
        })
    }

    /// Build a client from a file holding the access token.
    pub fn from_token_file(path: &Path) -> Result<Self, FetchError> {
        let token = fs::read_to_string(path).map_err(|e| {
            FetchError::DataSourceUnavailable(format!(
                "cannot read token file {}: {}",
                path.display(),
                e
            ))
        })?;
        let token = token.trim();
        if token.is_empty() {
            return Err(FetchError::DataSourceUnavailable(format!(
                "token file {} is empty",
                path.display()
            )));
        }
        Self::new(token)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::DataSourceUnavailable("API URL cannot be a base".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorization(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl CalendarSource for GoogleCalendarClient {
    fn upcoming_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        max_results: usize,
    ) -> Result<Vec<CalendarEvent>, FetchError> {
        let url = self.endpoint(&["calendars", calendar_id, "events"])?;
        let response = agent()
            .get(url.as_str())
            .set("Authorization", &self.authorization())
            .query(
                "timeMin",
                &time_min.to_rfc3339_opts(SecondsFormat::Secs, true),
            )
            .query("maxResults", &max_results.to_string())
            .query("singleEvents", "true")
            .query("orderBy", "startTime")
            .call()?;
        let events: GcalEvents = read_json(response)?;
        convert_events(calendar_id, events)
    }

    fn list_calendars(&self) -> Result<Vec<CalendarInfo>, FetchError> {
        let url = self.endpoint(&["users", "me", "calendarList"])?;
        let response = agent()
            .get(url.as_str())
            .set("Authorization", &self.authorization())
            .call()?;
        let list: GcalCalendarList = read_json(response)?;
        Ok(list
            .items
            .into_iter()
            .map(|c| CalendarInfo {
                id: c.id,
                summary: c.summary,
            })
            .collect())
    }
}

fn convert_events(calendar_id: &str, raw: GcalEvents) -> Result<Vec<CalendarEvent>, FetchError> {
    raw.items
        .into_iter()
        .map(|event| {
            Ok(CalendarEvent {
                calendar_id: calendar_id.to_string(),
                summary: event.summary.unwrap_or_else(|| "(No title)".to_string()),
                start: parse_start(&event.start)?,
            })
        })
        .collect()
}

fn parse_start(start: &GcalEventStart) -> Result<EventStart, FetchError> {
    if let Some(date_time) = &start.date_time {
        return DateTime::parse_from_rfc3339(date_time)
            .map(EventStart::At)
            .map_err(|e| FetchError::MalformedResponse(format!("bad dateTime {}: {}", date_time, e)));
    }
    if let Some(date) = &start.date {
        return NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map(EventStart::AllDay)
            .map_err(|e| FetchError::MalformedResponse(format!("bad date {}: {}", date, e)));
    }
    Err(FetchError::MalformedResponse(
        "event start has neither date nor dateTime".to_string(),
    ))
}

/// Parse an events.list response body.
pub fn parse_events(calendar_id: &str, json: &str) -> Result<Vec<CalendarEvent>, FetchError> {
    let raw: GcalEvents =
        serde_json::from_str(json).map_err(|e| FetchError::MalformedResponse(e.to_string()))?;
    convert_events(calendar_id, raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_timed_and_all_day_events() {
        let json = r#"{
            "kind": "calendar#events",
            "items": [
                { "summary": "Standup", "start": { "dateTime": "2024-03-04T09:30:00-07:00" } },
                { "summary": "Vacation", "start": { "date": "2024-03-08" } },
                { "start": { "date": "2024-03-09" } }
            ]
        }"#;
        let events = parse_events("work", json).unwrap();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0].start, EventStart::At(_)));
        assert_eq!(
            events[1].start,
            EventStart::AllDay(NaiveDate::from_ymd_opt(2024, 3, 8).unwrap())
        );
        assert_eq!(events[2].summary, "(No title)");
        assert!(events.iter().all(|e| e.calendar_id == "work"));
    }

    #[test]
    fn test_empty_response_has_no_events() {
        assert!(parse_events("work", "{}").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_start_without_time() {
        let json = r#"{ "items": [ { "summary": "x", "start": {} } ] }"#;
        assert!(matches!(
            parse_events("work", json),
            Err(FetchError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_calendar_id_is_path_escaped() {
        let client = GoogleCalendarClient::new("token").unwrap();
        let url = client
            .endpoint(&["calendars", "family#holiday@group.v.calendar.google.com", "events"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.googleapis.com/calendar/v3/calendars/family%23holiday@group.v.calendar.google.com/events"
        );
    }

    #[test]
    fn test_token_file_must_not_be_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        fs::write(&path, "  \n").unwrap();
        assert!(GoogleCalendarClient::from_token_file(&path).is_err());
        fs::write(&path, "ya29.abc\n").unwrap();
        let client = GoogleCalendarClient::from_token_file(&path).unwrap();
        assert_eq!(client.authorization(), "Bearer ya29.abc");
    }
}
