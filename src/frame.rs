//! Wiring of the configured widgets into one scheduler.

use anyhow::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::constants::{
    CALENDAR_EMPTY_TEXT, CALENDAR_UNAVAILABLE_TEXT, CLOCK_REFRESH_INTERVAL_SECS,
    WEATHER_UNAVAILABLE_TEXT,
};
use crate::geo::Location;
use crate::logger::Log;
use crate::render::{RenderSink, WidgetUpdate};
use crate::scheduler::{Scheduler, TaskHandle};
use crate::sources::calendar::CalendarSource;
use crate::sources::google_calendar::GoogleCalendarClient;
use crate::sources::openweather::OpenWeatherClient;
use crate::sources::weather::{ForecastSource, WeatherSource};
use crate::widgets::{
    AstralWidget, CalendarWidget, ClockWidget, ForecastOverlay, ForecastWidget, PhotoWidget,
    WeatherWidget,
};

/// External services the frame talks to. `None` means not configured.
#[derive(Default, Clone)]
pub struct FrameSources {
    pub weather: Option<Arc<dyn WeatherSource>>,
    pub forecast: Option<Arc<dyn ForecastSource>>,
    pub calendar: Option<Arc<dyn CalendarSource>>,
}

impl FrameSources {
    /// Build the real network clients the configuration allows for.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut sources = FrameSources::default();

        match config.weather_api_key.as_deref() {
            Some(key) => {
                let client = Arc::new(OpenWeatherClient::new(
                    config.weather_city(),
                    key,
                    config.units(),
                ));
                sources.weather = Some(client.clone());
                sources.forecast = Some(client);
            }
            None => Log::log_warning("No OpenWeatherMap API key configured, weather disabled"),
        }

        if !config.calendar_ids().is_empty() {
            let client = match (&config.calendar_token, config.calendar_token_file()) {
                (Some(token), _) => Some(GoogleCalendarClient::new(token.as_str())?),
                (None, Some(path)) => match GoogleCalendarClient::from_token_file(&path) {
                    Ok(client) => Some(client),
                    Err(e) => {
                        Log::log_warning(&format!("Calendar disabled: {}", e));
                        None
                    }
                },
                (None, None) => {
                    Log::log_warning("No calendar token configured, calendar disabled");
                    None
                }
            };
            sources.calendar = client.map(|c| Arc::new(c) as Arc<dyn CalendarSource>);
        }

        Ok(sources)
    }
}

/// The running set of widgets.
pub struct Frame {
    scheduler: Scheduler,
    overlay: TaskHandle,
}

impl Frame {
    /// Schedule every widget. Each one renders its initial state into `sink`.
    pub fn build(
        config: &Config,
        location: Location,
        sources: FrameSources,
        now: Instant,
        sink: &mut dyn RenderSink,
    ) -> Self {
        let mut scheduler = Scheduler::new();
        let timezone = location.timezone;

        scheduler.schedule(
            Box::new(PhotoWidget::new(&config.photos_dir())),
            config.photo_interval(),
            now,
            sink,
        );
        scheduler.schedule(
            Box::new(ClockWidget::new(timezone)),
            Duration::from_secs(CLOCK_REFRESH_INTERVAL_SECS),
            now,
            sink,
        );

        match sources.weather {
            Some(source) => {
                scheduler.schedule(
                    Box::new(WeatherWidget::new(source, config.units())),
                    config.weather_refresh_interval(),
                    now,
                    sink,
                );
            }
            None => sink.render(&WidgetUpdate::Weather {
                text: WEATHER_UNAVAILABLE_TEXT.to_string(),
                icon: None,
            }),
        }

        match sources.forecast {
            Some(source) => {
                scheduler.schedule(
                    Box::new(ForecastWidget::new(source, timezone)),
                    config.weather_refresh_interval(),
                    now,
                    sink,
                );
            }
            None => sink.render(&WidgetUpdate::ForecastUnavailable),
        }

        let overlay = scheduler.schedule(
            Box::new(ForecastOverlay::new(config.forecast_display_duration())),
            config.forecast_show_interval(),
            now,
            sink,
        );

        match sources.calendar {
            Some(source) => {
                scheduler.schedule(
                    Box::new(CalendarWidget::new(
                        source,
                        config.calendar_ids().to_vec(),
                        config.max_events(),
                        timezone,
                    )),
                    config.calendar_refresh_interval(),
                    now,
                    sink,
                );
            }
            None => {
                let text = if config.calendar_ids().is_empty() {
                    CALENDAR_EMPTY_TEXT
                } else {
                    CALENDAR_UNAVAILABLE_TEXT
                };
                sink.render(&WidgetUpdate::Calendar {
                    lines: vec![text.to_string()],
                });
            }
        }

        scheduler.schedule(
            Box::new(AstralWidget::new(location)),
            config.astral_refresh_interval(),
            now,
            sink,
        );

        Log::log_debug(&format!("Scheduled {} widgets", scheduler.len()));
        Self { scheduler, overlay }
    }

    pub fn run_due(&mut self, now: Instant, sink: &mut dyn RenderSink) -> usize {
        self.scheduler.run_due(now, sink)
    }

    /// Pop the forecast overlay up outside its regular schedule.
    pub fn show_forecast(&mut self, now: Instant, sink: &mut dyn RenderSink) {
        self.scheduler.fire_now(self.overlay, now, sink);
    }

    pub fn next_wakeup(&self) -> Option<Instant> {
        self.scheduler.next_wakeup()
    }

    pub fn widget_count(&self) -> usize {
        self.scheduler.len()
    }

    pub fn shutdown(&mut self) {
        self.scheduler.shutdown();
    }
}
