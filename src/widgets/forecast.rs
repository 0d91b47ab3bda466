//! Multi-day forecast data behind the forecast overlay.

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::constants::MAX_FORECAST_DAYS;
use crate::logger::{Log, LogLevel};
use crate::render::{RenderSink, WidgetUpdate};
use crate::scheduler::Refreshable;
use crate::sources::FetchError;
use crate::sources::weather::{ForecastEntry, ForecastSource};
use crate::worker::Worker;

/// One card of the forecast overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastDay {
    /// ISO date, `YYYY-MM-DD`.
    pub date: String,
    pub label: String,
    pub high: i64,
    pub low: i64,
    pub condition_id: u32,
    pub description: String,
    pub icon: &'static str,
}

/// Map an OpenWeatherMap condition code to an icon bucket.
pub fn condition_icon(condition_id: u32) -> &'static str {
    match condition_id {
        800 => "clear",
        801..=802 => "partly_cloudy",
        803.. => "cloudy",
        500..=599 => "rain",
        600..=699 => "snow",
        200..=299 => "thunderstorm",
        _ => "drizzle",
    }
}

/// "Today", "Tomorrow", or the weekday name.
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%A").to_string(),
    }
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(super::weather::capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Group 3-hourly entries by local calendar day, in order of first appearance.
///
/// High and low are the rounded extremes of the day. The day's condition is
/// taken from its middle entry, which for a full day lands around midday.
pub fn group_by_day(entries: &[ForecastEntry], timezone: Tz, today: NaiveDate) -> Vec<ForecastDay> {
    let mut days: Vec<(NaiveDate, Vec<&ForecastEntry>)> = Vec::new();
    for entry in entries {
        let date = entry.timestamp.with_timezone(&timezone).date_naive();
        match days.iter_mut().find(|(d, _)| *d == date) {
            Some((_, bucket)) => bucket.push(entry),
            None => days.push((date, vec![entry])),
        }
    }

    days.into_iter()
        .take(MAX_FORECAST_DAYS)
        .map(|(date, bucket)| {
            let high = bucket
                .iter()
                .map(|e| e.temperature)
                .fold(f64::NEG_INFINITY, f64::max);
            let low = bucket
                .iter()
                .map(|e| e.temperature)
                .fold(f64::INFINITY, f64::min);
            let middle = bucket[bucket.len() / 2];
            ForecastDay {
                date: date.format("%Y-%m-%d").to_string(),
                label: day_label(date, today),
                high: high.round() as i64,
                low: low.round() as i64,
                condition_id: middle.condition_id,
                description: title_case(&middle.description),
                icon: condition_icon(middle.condition_id),
            }
        })
        .collect()
}

pub struct ForecastWidget {
    source: Arc<dyn ForecastSource>,
    timezone: Tz,
    worker: Worker<Result<Vec<ForecastEntry>, FetchError>>,
}

impl ForecastWidget {
    pub fn new(source: Arc<dyn ForecastSource>, timezone: Tz) -> Self {
        Self {
            source,
            timezone,
            worker: Worker::new("forecast"),
        }
    }

    fn fetch(&mut self) {
        let source = Arc::clone(&self.source);
        self.worker.spawn(move || source.forecast());
    }
}

impl Refreshable for ForecastWidget {
    fn name(&self) -> &'static str {
        "forecast"
    }

    fn start(&mut self, _now: Instant, sink: &mut dyn RenderSink) {
        sink.render(&WidgetUpdate::ForecastLoading);
        self.fetch();
    }

    fn on_tick(&mut self, _now: Instant, _sink: &mut dyn RenderSink) {
        self.fetch();
    }

    fn poll(&mut self, sink: &mut dyn RenderSink) {
        match self.worker.take_latest() {
            None => {}
            Some(Ok(entries)) => {
                let today = Utc::now().with_timezone(&self.timezone).date_naive();
                let days = group_by_day(&entries, self.timezone, today);
                Log::log_widget(
                    LogLevel::Log,
                    self.name(),
                    &format!("Updated, {} days", days.len()),
                );
                sink.render(&WidgetUpdate::Forecast { days });
            }
            Some(Err(e)) => {
                Log::log_widget(LogLevel::Warn, self.name(), &e.to_string());
                sink.render(&WidgetUpdate::ForecastUnavailable);
            }
        }
    }

    fn stop(&mut self) {
        self.worker.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::weather::MockForecastSource;
    use chrono::{DateTime, TimeZone};
    use std::thread;
    use std::time::Duration;

    #[derive(Default)]
    struct Updates(Vec<WidgetUpdate>);

    impl RenderSink for Updates {
        fn render(&mut self, update: &WidgetUpdate) {
            self.0.push(update.clone());
        }
    }

    fn entry(at: DateTime<Utc>, temperature: f64, condition_id: u32, description: &str) -> ForecastEntry {
        ForecastEntry {
            timestamp: at,
            temperature,
            condition_id,
            description: description.to_string(),
        }
    }

    #[test]
    fn test_condition_icons() {
        assert_eq!(condition_icon(800), "clear");
        assert_eq!(condition_icon(801), "partly_cloudy");
        assert_eq!(condition_icon(802), "partly_cloudy");
        assert_eq!(condition_icon(804), "cloudy");
        assert_eq!(condition_icon(900), "cloudy");
        assert_eq!(condition_icon(962), "cloudy");
        assert_eq!(condition_icon(501), "rain");
        assert_eq!(condition_icon(601), "snow");
        assert_eq!(condition_icon(211), "thunderstorm");
        assert_eq!(condition_icon(301), "drizzle");
        assert_eq!(condition_icon(741), "drizzle");
    }

    #[test]
    fn test_day_labels() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(day_label(today, today), "Today");
        assert_eq!(day_label(today.succ_opt().unwrap(), today), "Tomorrow");
        assert_eq!(
            day_label(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(), today),
            "Wednesday"
        );
    }

    #[test]
    fn test_groups_by_local_day() {
        let tz = Tz::America__Denver;
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        // 2024-01-02 03:00 UTC is still Jan 1 in Denver.
        let entries = vec![
            entry(Utc.with_ymd_and_hms(2024, 1, 1, 18, 0, 0).unwrap(), 30.4, 600, "light snow"),
            entry(Utc.with_ymd_and_hms(2024, 1, 1, 21, 0, 0).unwrap(), 35.6, 801, "few clouds"),
            entry(Utc.with_ymd_and_hms(2024, 1, 2, 3, 0, 0).unwrap(), 28.0, 800, "clear sky"),
            entry(Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap(), 20.0, 800, "clear sky"),
        ];

        let days = group_by_day(&entries, tz, today);
        assert_eq!(days.len(), 2);

        assert_eq!(days[0].date, "2024-01-01");
        assert_eq!(days[0].label, "Today");
        assert_eq!(days[0].high, 36);
        assert_eq!(days[0].low, 28);
        assert_eq!(days[0].description, "Few Clouds");
        assert_eq!(days[0].icon, "partly_cloudy");

        assert_eq!(days[1].label, "Tomorrow");
        assert_eq!(days[1].high, 20);
    }

    #[test]
    fn test_caps_at_seven_days() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let entries: Vec<_> = (0..10)
            .map(|d| entry(start + chrono::Duration::days(d), 50.0, 800, "clear sky"))
            .collect();
        let days = group_by_day(&entries, Tz::UTC, start.date_naive());
        assert_eq!(days.len(), MAX_FORECAST_DAYS);
    }

    #[test]
    fn test_start_shows_loading_then_failure() {
        let mut source = MockForecastSource::new();
        source.expect_forecast().returning(|| {
            thread::sleep(Duration::from_millis(100));
            Err(FetchError::DataSourceUnavailable("offline".to_string()))
        });
        let mut widget = ForecastWidget::new(Arc::new(source), Tz::UTC);
        let mut sink = Updates::default();

        widget.start(Instant::now(), &mut sink);
        widget.poll(&mut sink);
        assert_eq!(sink.0, vec![WidgetUpdate::ForecastLoading]);

        for _ in 0..200 {
            widget.poll(&mut sink);
            if sink.0.len() > 1 {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(sink.0.last(), Some(&WidgetUpdate::ForecastUnavailable));
        widget.stop();
    }
}
