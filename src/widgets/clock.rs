//! Clock overlay.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::time::Instant;

use crate::render::{RenderSink, WidgetUpdate};
use crate::scheduler::Refreshable;

/// Format an instant as the clock's two lines: `h:mm AM` and `Ddd, Month d`.
pub fn format_clock<T: TimeZone>(now: &DateTime<T>) -> (String, String)
where
    T::Offset: std::fmt::Display,
{
    (
        now.format("%-I:%M %p").to_string(),
        now.format("%a, %B %-d").to_string(),
    )
}

pub struct ClockWidget {
    timezone: Tz,
}

impl ClockWidget {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }
}

impl Refreshable for ClockWidget {
    fn name(&self) -> &'static str {
        "clock"
    }

    fn on_tick(&mut self, _now: Instant, sink: &mut dyn RenderSink) {
        let local = Utc::now().with_timezone(&self.timezone);
        let (time, date) = format_clock(&local);
        sink.render(&WidgetUpdate::Clock { time, date });
    }
}
