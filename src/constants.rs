//! Application constants and default values for photoframe.
//!
//! This module contains the configuration defaults, validation limits,
//! astronomical constants and operational timing used throughout the application.

// ═══ Application Configuration Defaults ═══
// These values are used when config options are not specified by the user

pub const DEFAULT_PHOTOS_DIR: &str = "./photos";
pub const DEFAULT_CITY: &str = "Denver";
pub const DEFAULT_REGION: &str = "Colorado";
pub const DEFAULT_TIMEZONE: &str = "America/Denver";
pub const DEFAULT_LATITUDE: f64 = 39.7392;
pub const DEFAULT_LONGITUDE: f64 = -104.9903;
pub const DEFAULT_WEATHER_CITY: &str = "Denver,US";
pub const DEFAULT_WEATHER_UNITS: &str = "imperial";
pub const DEFAULT_MAX_EVENTS: usize = 3;

pub const DEFAULT_PHOTO_INTERVAL: u64 = 120; // seconds per photo
pub const DEFAULT_FORECAST_SHOW_INTERVAL: u64 = 30 * 60; // seconds between forecast pop-ups
pub const DEFAULT_FORECAST_DISPLAY_DURATION: u64 = 30; // seconds the forecast stays up
pub const DEFAULT_WEATHER_REFRESH_INTERVAL: u64 = 10 * 60; // seconds
pub const DEFAULT_ASTRAL_REFRESH_INTERVAL: u64 = 60 * 60; // seconds
pub const DEFAULT_CALENDAR_REFRESH_INTERVAL: u64 = 15 * 60; // seconds

// ═══ Environment Overrides ═══

pub const ENV_PHOTOS_DIR: &str = "PHOTOS_DIR";
pub const ENV_WEATHER_API_KEY: &str = "OPENWEATHER_API_KEY";
pub const ENV_CALENDAR_TOKEN: &str = "GOOGLE_CALENDAR_TOKEN";

// ═══ Validation Limits ═══

pub const MINIMUM_REFRESH_INTERVAL: u64 = 1; // seconds
pub const MAXIMUM_REFRESH_INTERVAL: u64 = 24 * 60 * 60; // one day
pub const MAXIMUM_EVENTS: usize = 50;
pub const WEATHER_UNITS: &[&str] = &["imperial", "metric", "standard"];

// ═══ Astronomical Constants ═══

/// Mean length of the synodic month in days.
pub const SYNODIC_MONTH: f64 = 29.53058770576;

/// Reference new moon: 2000-01-06 18:14 UTC, as a Unix timestamp.
pub const REFERENCE_NEW_MOON_UNIX: i64 = 947_182_440;

/// Within this many days of a named phase it is reported as "tonight".
///
/// Tunable display threshold, not a physical constant.
pub const PHASE_TONIGHT_THRESHOLD_DAYS: f64 = 0.75;

/// Apparent solar altitude at sunrise/sunset (refraction plus solar radius).
pub const SUNRISE_ALTITUDE_DEG: f64 = -0.833;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

// ═══ Operational Timing Constants ═══

pub const CLOCK_REFRESH_INTERVAL_SECS: u64 = 1;
pub const CHECK_INTERVAL_MS: u64 = 250; // Longest single sleep of the main loop
pub const HTTP_TIMEOUT_SECS: u64 = 10;
pub const MAX_FORECAST_DAYS: usize = 7;

// ═══ Data Source Endpoints ═══

pub const OPENWEATHER_CURRENT_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const OPENWEATHER_FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";
pub const GOOGLE_CALENDAR_API_URL: &str = "https://www.googleapis.com/calendar/v3";

// ═══ Placeholder Texts ═══

pub const PLACEHOLDER_DASH: &str = "—";
pub const WEATHER_LOADING_TEXT: &str = "Loading weather...";
pub const WEATHER_UNAVAILABLE_TEXT: &str = "Weather unavailable";
pub const FORECAST_LOADING_TEXT: &str = "Loading forecast...";
pub const CALENDAR_LOADING_TEXT: &str = "Loading events...";
pub const CALENDAR_EMPTY_TEXT: &str = "No upcoming events found.";
pub const CALENDAR_UNAVAILABLE_TEXT: &str = "Calendar unavailable";

// ═══ Exit Codes ═══

pub const EXIT_FAILURE: i32 = 1; // General failure
