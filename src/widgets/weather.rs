//! Current-conditions overlay.

use std::sync::Arc;
use std::time::Instant;

use crate::constants::{WEATHER_LOADING_TEXT, WEATHER_UNAVAILABLE_TEXT};
use crate::logger::{Log, LogLevel};
use crate::render::{RenderSink, WidgetUpdate};
use crate::scheduler::Refreshable;
use crate::sources::FetchError;
use crate::sources::weather::{CurrentWeather, Units, WeatherSource};
use crate::worker::Worker;

/// Uppercase the first character, leaving the rest alone.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `"41°F, Few clouds"`
pub fn format_weather(weather: &CurrentWeather, units: Units) -> String {
    // Adding 0.0 turns -0 into 0.
    format!(
        "{}{}, {}",
        weather.temperature.round() + 0.0,
        units.symbol(),
        capitalize(&weather.description)
    )
}

pub struct WeatherWidget {
    source: Arc<dyn WeatherSource>,
    units: Units,
    worker: Worker<Result<CurrentWeather, FetchError>>,
}

impl WeatherWidget {
    pub fn new(source: Arc<dyn WeatherSource>, units: Units) -> Self {
        Self {
            source,
            units,
            worker: Worker::new("weather"),
        }
    }

    fn fetch(&mut self) {
        let source = Arc::clone(&self.source);
        self.worker.spawn(move || source.current());
    }
}

impl Refreshable for WeatherWidget {
    fn name(&self) -> &'static str {
        "weather"
    }

    fn start(&mut self, _now: Instant, sink: &mut dyn RenderSink) {
        sink.render(&WidgetUpdate::Weather {
            text: WEATHER_LOADING_TEXT.to_string(),
            icon: None,
        });
        self.fetch();
    }

    fn on_tick(&mut self, _now: Instant, _sink: &mut dyn RenderSink) {
        self.fetch();
    }

    fn poll(&mut self, sink: &mut dyn RenderSink) {
        let update = match self.worker.take_latest() {
            None => return,
            Some(Ok(weather)) => WidgetUpdate::Weather {
                text: format_weather(&weather, self.units),
                icon: Some(weather.icon),
            },
            Some(Err(e)) => {
                Log::log_widget(LogLevel::Warn, self.name(), &e.to_string());
                WidgetUpdate::Weather {
                    text: WEATHER_UNAVAILABLE_TEXT.to_string(),
                    icon: None,
                }
            }
        };
        sink.render(&update);
    }

    fn stop(&mut self) {
        self.worker.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::weather::MockWeatherSource;
    use std::thread;
    use std::time::Duration;

    #[derive(Default)]
    struct Texts(Vec<String>);
    impl RenderSink for Texts {
        fn render(&mut self, update: &WidgetUpdate) {
            if let WidgetUpdate::Weather { text, .. } = update {
                self.0.push(text.clone());
            }
        }
    }

    fn poll_until(widget: &mut WeatherWidget, sink: &mut Texts, count: usize) {
        for _ in 0..500 {
            widget.poll(sink);
            if sink.0.len() >= count {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_format_weather() {
        let weather = CurrentWeather {
            temperature: 41.5,
            description: "few clouds".to_string(),
            condition_id: 801,
            icon: "02d".to_string(),
        };
        assert_eq!(format_weather(&weather, Units::Imperial), "42°F, Few clouds");
        assert_eq!(format_weather(&weather, Units::Standard), "42K, Few clouds");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_loading_then_result() {
        let mut source = MockWeatherSource::new();
        source.expect_current().returning(|| {
            Ok(CurrentWeather {
                temperature: -3.2,
                description: "light snow".to_string(),
                condition_id: 600,
                icon: "13n".to_string(),
            })
        });

        let mut sink = Texts::default();
        let mut widget = WeatherWidget::new(Arc::new(source), Units::Metric);
        widget.start(Instant::now(), &mut sink);
        poll_until(&mut widget, &mut sink, 2);

        assert_eq!(sink.0, vec![WEATHER_LOADING_TEXT, "-3°C, Light snow"]);
    }

    #[test]
    fn test_failure_shows_placeholder() {
        let mut source = MockWeatherSource::new();
        source
            .expect_current()
            .returning(|| Err(FetchError::DataSourceUnavailable("timeout".into())));

        let mut sink = Texts::default();
        let mut widget = WeatherWidget::new(Arc::new(source), Units::Imperial);
        widget.start(Instant::now(), &mut sink);
        poll_until(&mut widget, &mut sink, 2);

        assert_eq!(sink.0.last().map(String::as_str), Some(WEATHER_UNAVAILABLE_TEXT));
    }
}
