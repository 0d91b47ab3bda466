//! Render instructions and the sinks that consume them.
//!
//! Widgets never draw anything themselves. Each refresh produces a
//! [`WidgetUpdate`] which is handed to a [`RenderSink`]: the console
//! ([`LogSink`]), a JSON status file for an external renderer
//! ([`crate::status::StatusFileSink`]), or several at once ([`Sinks`]).

use serde::Serialize;
use std::path::PathBuf;

use crate::constants::FORECAST_LOADING_TEXT;
use crate::logger::{Log, LogLevel};
use crate::widgets::astral::AstralDisplay;
use crate::widgets::forecast::ForecastDay;

/// A single thing for the presentation layer to show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WidgetUpdate {
    Photo { path: PathBuf },
    NoPhotos,
    Clock { time: String, date: String },
    Weather { text: String, icon: Option<String> },
    Forecast { days: Vec<ForecastDay> },
    ForecastLoading,
    ForecastUnavailable,
    ForecastVisibility { visible: bool },
    Calendar { lines: Vec<String> },
    Astral(AstralDisplay),
}

impl WidgetUpdate {
    /// Screen region this update replaces. Later updates for a slot supersede
    /// earlier ones.
    pub fn slot(&self) -> &'static str {
        match self {
            WidgetUpdate::Photo { .. } | WidgetUpdate::NoPhotos => "photo",
            WidgetUpdate::Clock { .. } => "clock",
            WidgetUpdate::Weather { .. } => "weather",
            WidgetUpdate::Forecast { .. }
            | WidgetUpdate::ForecastLoading
            | WidgetUpdate::ForecastUnavailable => "forecast",
            WidgetUpdate::ForecastVisibility { .. } => "forecast_visibility",
            WidgetUpdate::Calendar { .. } => "calendar",
            WidgetUpdate::Astral(_) => "astral",
        }
    }

    /// One-line human readable form for console output.
    pub fn summary(&self) -> String {
        match self {
            WidgetUpdate::Photo { path } => format!("Showing {}", path.display()),
            WidgetUpdate::NoPhotos => "No photos to show".to_string(),
            WidgetUpdate::Clock { time, date } => format!("{} {}", time, date),
            WidgetUpdate::Weather { text, .. } => text.clone(),
            WidgetUpdate::Forecast { days } => {
                let parts: Vec<String> = days
                    .iter()
                    .map(|d| format!("{} {}°/{}°", d.label, d.high, d.low))
                    .collect();
                parts.join(", ")
            }
            WidgetUpdate::ForecastLoading => FORECAST_LOADING_TEXT.to_string(),
            WidgetUpdate::ForecastUnavailable => "Forecast unavailable".to_string(),
            WidgetUpdate::ForecastVisibility { visible } => {
                let state = if *visible { "shown" } else { "hidden" };
                format!("Forecast {}", state)
            }
            WidgetUpdate::Calendar { lines } => lines.join(" | "),
            WidgetUpdate::Astral(display) => format!(
                "Sunrise {} Sunset {} Daylight {} Moon {} {}",
                display.sunrise,
                display.sunset,
                display.daylight,
                display.illumination,
                display.next_phase
            ),
        }
    }
}

/// Receiver of render instructions.
pub trait RenderSink {
    fn render(&mut self, update: &WidgetUpdate);
}

/// Headless sink that prints every update to the console.
///
/// Clock updates arrive every second, so they only show with `--debug`.
#[derive(Debug, Default)]
pub struct LogSink;

impl RenderSink for LogSink {
    fn render(&mut self, update: &WidgetUpdate) {
        let level = match update {
            WidgetUpdate::Clock { .. } => LogLevel::Log,
            _ => LogLevel::Info,
        };
        Log::log_widget(level, update.slot(), &update.summary());
    }
}

/// Fan-out to several sinks in order.
#[derive(Default)]
pub struct Sinks {
    sinks: Vec<Box<dyn RenderSink>>,
}

impl Sinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: Box<dyn RenderSink>) {
        self.sinks.push(sink);
    }
}

impl RenderSink for Sinks {
    fn render(&mut self, update: &WidgetUpdate) {
        for sink in &mut self.sinks {
            sink.render(update);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Shared(Arc<Mutex<Vec<WidgetUpdate>>>);

    impl RenderSink for Shared {
        fn render(&mut self, update: &WidgetUpdate) {
            self.0.lock().unwrap().push(update.clone());
        }
    }

    #[test]
    fn test_sinks_fan_out() {
        let first = Arc::new(Mutex::new(Vec::new()));
        let second = Arc::new(Mutex::new(Vec::new()));
        let mut sinks = Sinks::new();
        sinks.push(Box::new(Shared(first.clone())));
        sinks.push(Box::new(Shared(second.clone())));

        sinks.render(&WidgetUpdate::NoPhotos);

        assert_eq!(first.lock().unwrap().len(), 1);
        assert_eq!(second.lock().unwrap()[0], WidgetUpdate::NoPhotos);
    }

    #[test]
    fn test_slots() {
        assert_eq!(WidgetUpdate::NoPhotos.slot(), "photo");
        assert_eq!(WidgetUpdate::ForecastUnavailable.slot(), "forecast");
        assert_eq!(WidgetUpdate::ForecastLoading.slot(), "forecast");
        assert_eq!(
            WidgetUpdate::ForecastVisibility { visible: true }.slot(),
            "forecast_visibility"
        );
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let update = WidgetUpdate::Weather {
            text: "41°F, Few clouds".to_string(),
            icon: Some("02d".to_string()),
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["kind"], "weather");
        assert_eq!(json["text"], "41°F, Few clouds");
    }
}
