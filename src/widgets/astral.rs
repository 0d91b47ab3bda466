//! Sun and moon overlay.

use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use serde::Serialize;
use std::time::Instant;

use crate::constants::PLACEHOLDER_DASH;
use crate::geo::{self, AstralSnapshot, Location, MoonPhase, SunTimes};
use crate::logger::{Log, LogLevel};
use crate::render::{RenderSink, WidgetUpdate};
use crate::scheduler::Refreshable;

/// Text fields of the sun/moon overlay, plus the raw moon values the
/// presentation layer needs to draw the phase disc.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AstralDisplay {
    pub sunrise: String,
    pub sunset: String,
    pub daylight: String,
    pub illumination: String,
    pub trend: String,
    pub next_phase: String,
    pub illumination_fraction: Option<f64>,
    pub phase_angle: Option<f64>,
}

impl AstralDisplay {
    /// Every field shows a dash.
    pub fn placeholder() -> Self {
        Self {
            sunrise: PLACEHOLDER_DASH.to_string(),
            sunset: PLACEHOLDER_DASH.to_string(),
            daylight: PLACEHOLDER_DASH.to_string(),
            illumination: PLACEHOLDER_DASH.to_string(),
            trend: PLACEHOLDER_DASH.to_string(),
            next_phase: PLACEHOLDER_DASH.to_string(),
            illumination_fraction: None,
            phase_angle: None,
        }
    }

    pub fn from_snapshot(snapshot: &AstralSnapshot) -> Self {
        let (sunrise, sunset) = match &snapshot.sun {
            SunTimes::Normal { sunrise, sunset } => (format_time(sunrise), format_time(sunset)),
            SunTimes::PolarDay => ("Polar day".to_string(), "Polar day".to_string()),
            SunTimes::PolarNight => ("Polar night".to_string(), "Polar night".to_string()),
        };
        let trend = if snapshot.is_waxing() { "Waxing" } else { "Waning" };

        Self {
            sunrise,
            sunset,
            daylight: format_daylight(snapshot.sun.daylight()),
            illumination: format!("{:.0}%", snapshot.illumination * 100.0),
            trend: trend.to_string(),
            next_phase: format_next_phase(snapshot.next_phase, snapshot.days_to_next_named_phase),
            illumination_fraction: Some(snapshot.illumination),
            phase_angle: Some(snapshot.phase_angle),
        }
    }
}

/// `h:MM AM`
pub fn format_time(at: &DateTime<Tz>) -> String {
    at.format("%-I:%M %p").to_string()
}

/// `Hh MMm`
pub fn format_daylight(daylight: Duration) -> String {
    let minutes = daylight.num_minutes().max(0);
    format!("{}h {:02}m", minutes / 60, minutes % 60)
}

/// "Full Moon tonight", "First Quarter in 1 day", "New Moon in 8 days".
pub fn format_next_phase(phase: MoonPhase, days: u32) -> String {
    match days {
        0 => format!("{} tonight", phase),
        1 => format!("{} in 1 day", phase),
        n => format!("{} in {} days", phase, n),
    }
}

pub struct AstralWidget {
    location: Location,
}

impl AstralWidget {
    pub fn new(location: Location) -> Self {
        Self { location }
    }
}

impl Refreshable for AstralWidget {
    fn name(&self) -> &'static str {
        "astral"
    }

    fn on_tick(&mut self, _now: Instant, sink: &mut dyn RenderSink) {
        let display = match geo::compute(&self.location, self.location.today()) {
            Ok(snapshot) => AstralDisplay::from_snapshot(&snapshot),
            Err(e) => {
                Log::log_widget(LogLevel::Err, self.name(), &e.to_string());
                AstralDisplay::placeholder()
            }
        };
        sink.render(&WidgetUpdate::Astral(display));
    }
}
