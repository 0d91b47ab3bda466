//! Calendar event model and the merge across configured calendars.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use super::FetchError;
use crate::logger::{Log, LogLevel};

/// When an event starts: a whole day, or a precise instant.
#[derive(Debug, Clone, PartialEq)]
pub enum EventStart {
    AllDay(NaiveDate),
    At(DateTime<FixedOffset>),
}

impl EventStart {
    /// Instant used to order events; all-day events start at local midnight.
    pub fn sort_key(&self, timezone: Tz) -> DateTime<Utc> {
        match self {
            EventStart::At(at) => at.with_timezone(&Utc),
            EventStart::AllDay(date) => {
                let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
                timezone
                    .from_local_datetime(&midnight)
                    .earliest()
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
            }
        }
    }
}

/// An upcoming event from one calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub calendar_id: String,
    pub summary: String,
    pub start: EventStart,
}

/// A calendar visible to the authenticated account.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarInfo {
    pub id: String,
    pub summary: String,
}

/// An authenticated calendar service.
#[cfg_attr(test, mockall::automock)]
pub trait CalendarSource: Send + Sync {
    /// Up to `max_results` events of one calendar starting at or after `time_min`,
    /// ordered by start time.
    fn upcoming_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        max_results: usize,
    ) -> Result<Vec<CalendarEvent>, FetchError>;

    /// All calendars the account can see.
    fn list_calendars(&self) -> Result<Vec<CalendarInfo>, FetchError>;
}

/// Result of querying every configured calendar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarFetch {
    pub events: Vec<CalendarEvent>,
    pub failed_calendars: usize,
    pub queried_calendars: usize,
}

impl CalendarFetch {
    /// Every calendar we asked failed, so "no events" would be misleading.
    pub fn all_failed(&self) -> bool {
        self.queried_calendars > 0 && self.failed_calendars == self.queried_calendars
    }
}

/// Fetch the next `max_results` events across `calendar_ids`.
///
/// A calendar that fails is logged and skipped; the others still contribute.
/// The merged list is sorted by start time and truncated.
pub fn fetch_upcoming_events(
    source: &dyn CalendarSource,
    calendar_ids: &[String],
    now: DateTime<Utc>,
    max_results: usize,
    timezone: Tz,
) -> CalendarFetch {
    let mut fetch = CalendarFetch {
        queried_calendars: calendar_ids.len(),
        ..CalendarFetch::default()
    };

    for calendar_id in calendar_ids {
        match source.upcoming_events(calendar_id, now, max_results) {
            Ok(events) => fetch.events.extend(events),
            Err(e) => {
                fetch.failed_calendars += 1;
                Log::log_widget(
                    LogLevel::Warn,
                    "calendar",
                    &format!("Could not fetch from {}: {}", calendar_id, e),
                );
            }
        }
    }

    fetch
        .events
        .sort_by_key(|event| event.start.sort_key(timezone));
    fetch.events.truncate(max_results);
    fetch
}
