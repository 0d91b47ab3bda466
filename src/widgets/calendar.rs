//! Upcoming-events overlay.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use std::time::Instant;

use crate::constants::{CALENDAR_EMPTY_TEXT, CALENDAR_LOADING_TEXT, CALENDAR_UNAVAILABLE_TEXT};
use crate::logger::{Log, LogLevel};
use crate::render::{RenderSink, WidgetUpdate};
use crate::scheduler::Refreshable;
use crate::sources::calendar::{
    CalendarEvent, CalendarFetch, CalendarSource, EventStart, fetch_upcoming_events,
};
use crate::worker::Worker;

/// `"Ddd h:mm AM - Summary"` for timed events, `"Ddd, Month d - Summary"` for all-day ones.
pub fn format_event(event: &CalendarEvent, timezone: Tz) -> String {
    let start = match &event.start {
        EventStart::AllDay(date) => date.format("%a, %B %-d").to_string(),
        EventStart::At(at) => at.with_timezone(&timezone).format("%a %-I:%M %p").to_string(),
    };
    format!("{} - {}", start, event.summary)
}

/// Lines to display for a finished fetch.
pub fn calendar_lines(fetch: &CalendarFetch, timezone: Tz) -> Vec<String> {
    if fetch.all_failed() {
        vec![CALENDAR_UNAVAILABLE_TEXT.to_string()]
    } else if fetch.events.is_empty() {
        vec![CALENDAR_EMPTY_TEXT.to_string()]
    } else {
        fetch
            .events
            .iter()
            .map(|event| format_event(event, timezone))
            .collect()
    }
}

pub struct CalendarWidget {
    source: Arc<dyn CalendarSource>,
    calendar_ids: Arc<Vec<String>>,
    max_events: usize,
    timezone: Tz,
    worker: Worker<CalendarFetch>,
}

impl CalendarWidget {
    pub fn new(
        source: Arc<dyn CalendarSource>,
        calendar_ids: Vec<String>,
        max_events: usize,
        timezone: Tz,
    ) -> Self {
        Self {
            source,
            calendar_ids: Arc::new(calendar_ids),
            max_events,
            timezone,
            worker: Worker::new("calendar"),
        }
    }

    fn fetch(&mut self, now: DateTime<Utc>) {
        let source = Arc::clone(&self.source);
        let ids = Arc::clone(&self.calendar_ids);
        let max_events = self.max_events;
        let timezone = self.timezone;
        self.worker.spawn(move || {
            fetch_upcoming_events(source.as_ref(), &ids, now, max_events, timezone)
        });
    }
}

impl Refreshable for CalendarWidget {
    fn name(&self) -> &'static str {
        "calendar"
    }

    fn start(&mut self, _now: Instant, sink: &mut dyn RenderSink) {
        sink.render(&WidgetUpdate::Calendar {
            lines: vec![CALENDAR_LOADING_TEXT.to_string()],
        });
        self.fetch(Utc::now());
    }

    fn on_tick(&mut self, _now: Instant, _sink: &mut dyn RenderSink) {
        self.fetch(Utc::now());
    }

    fn poll(&mut self, sink: &mut dyn RenderSink) {
        if let Some(fetch) = self.worker.take_latest() {
            if fetch.all_failed() {
                Log::log_widget(
                    LogLevel::Warn,
                    self.name(),
                    &format!("All {} calendars failed", fetch.queried_calendars),
                );
            }
            sink.render(&WidgetUpdate::Calendar {
                lines: calendar_lines(&fetch, self.timezone),
            });
        }
    }

    fn stop(&mut self) {
        self.worker.shutdown();
    }
}
