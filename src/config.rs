//! Configuration system for photoframe.
//!
//! Settings live in `photoframe.toml` under `$XDG_CONFIG_HOME/photoframe/`
//! (or any path passed with `--config`). When no file exists at the default
//! location a commented one is generated.
//!
//! ```toml
//! photos_dir = "~/Pictures/frame"
//! city = "Denver"
//! region = "Colorado"
//! timezone = "America/Denver"         # detected from coordinates when omitted
//! latitude = 39.7392
//! longitude = -104.9903
//!
//! weather_city = "Denver,US"
//! weather_units = "imperial"          # "imperial", "metric" or "standard"
//! calendar_ids = ["primary"]
//! calendar_token_file = "~/.config/photoframe/calendar.token"
//! max_events = 3
//!
//! photo_interval = 120                # seconds
//! forecast_show_interval = 1800
//! forecast_display_duration = 30
//! weather_refresh_interval = 600
//! astral_refresh_interval = 3600
//! calendar_refresh_interval = 900
//! status_file = "/run/user/1000/photoframe/status.json"
//! ```
//!
//! ## Overrides
//!
//! An optional `geo.toml` next to the main file overrides the coordinates, so
//! the main file can be shared without revealing where the frame hangs. Then
//! the environment wins over both: `PHOTOS_DIR`, `OPENWEATHER_API_KEY` and
//! `GOOGLE_CALENDAR_TOKEN` (the token itself, not a file).
//!
//! Loading fails fast on anything that would make the frame misbehave:
//! out-of-range coordinates, unknown timezones, zero or huge intervals, or a
//! forecast display duration that is not shorter than its show interval.

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::*;
use crate::geo::{self, Location};
use crate::logger::Log;
use crate::sources::weather::Units;
use crate::utils::{expand_tilde, path_for_display};

/// Coordinates kept in a separate, private `geo.toml`.
#[derive(Debug, Deserialize, Clone)]
struct GeoConfig {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// Photo frame configuration.
///
/// Every field is optional in the file. After [`Config::load_from_path`] the
/// defaults from `constants.rs` have been applied and the whole thing has
/// passed [`validate_config`], so the accessors below never fall back.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    pub photos_dir: Option<String>,

    // Location
    pub city: Option<String>,
    pub region: Option<String>,
    pub timezone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    // Weather
    pub weather_city: Option<String>,
    pub weather_api_key: Option<String>,
    pub weather_units: Option<String>, // "imperial", "metric" or "standard"

    // Calendar
    pub calendar_ids: Option<Vec<String>>,
    pub calendar_token_file: Option<String>,
    pub max_events: Option<usize>,

    // Refresh intervals, all in seconds
    pub photo_interval: Option<u64>,
    pub forecast_show_interval: Option<u64>,
    pub forecast_display_duration: Option<u64>,
    pub weather_refresh_interval: Option<u64>,
    pub astral_refresh_interval: Option<u64>,
    pub calendar_refresh_interval: Option<u64>,

    /// Where to write the JSON status document for an external renderer.
    pub status_file: Option<String>,

    /// Calendar access token taken from the environment. Never read from the file.
    #[serde(skip)]
    pub calendar_token: Option<String>,
}

impl Config {
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("photoframe"))
    }

    pub fn get_config_path() -> Result<PathBuf> {
        Ok(Self::get_config_dir()?.join("photoframe.toml"))
    }

    /// `geo.toml` sits next to whichever config file is in use.
    pub fn geo_path_for(config_path: &Path) -> Option<PathBuf> {
        config_path.parent().map(|parent| parent.join("geo.toml"))
    }

    /// Write a commented default configuration to `path`.
    pub fn create_default_config(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = ConfigBuilder::new()
            .add_section("Photos")
            .add_setting(
                "photos_dir",
                &format!("\"{}\"", DEFAULT_PHOTOS_DIR),
                "Directory of .png/.jpg/.jpeg files",
            )
            .add_setting(
                "photo_interval",
                &DEFAULT_PHOTO_INTERVAL.to_string(),
                "Seconds each photo stays on screen",
            )
            .add_section("Location")
            .add_setting("city", &format!("\"{}\"", DEFAULT_CITY), "Place name")
            .add_setting("region", &format!("\"{}\"", DEFAULT_REGION), "Region name")
            .add_setting(
                "timezone",
                &format!("\"{}\"", DEFAULT_TIMEZONE),
                "IANA timezone (detected from coordinates when omitted)",
            )
            .add_setting(
                "latitude",
                &format!("{:.4}", DEFAULT_LATITUDE),
                "Degrees, north positive (-90 to 90)",
            )
            .add_setting(
                "longitude",
                &format!("{:.4}", DEFAULT_LONGITUDE),
                "Degrees, east positive (-180 to 180)",
            )
            .add_setting(
                "astral_refresh_interval",
                &DEFAULT_ASTRAL_REFRESH_INTERVAL.to_string(),
                "Seconds between sun/moon updates",
            )
            .add_section("Weather")
            .add_setting(
                "weather_city",
                &format!("\"{}\"", DEFAULT_WEATHER_CITY),
                "OpenWeatherMap city query",
            )
            .add_setting(
                "weather_units",
                &format!("\"{}\"", DEFAULT_WEATHER_UNITS),
                "\"imperial\", \"metric\" or \"standard\"",
            )
            .add_setting(
                "weather_refresh_interval",
                &DEFAULT_WEATHER_REFRESH_INTERVAL.to_string(),
                "Seconds between weather and forecast updates",
            )
            .add_setting(
                "forecast_show_interval",
                &DEFAULT_FORECAST_SHOW_INTERVAL.to_string(),
                "Seconds between forecast pop-ups",
            )
            .add_setting(
                "forecast_display_duration",
                &DEFAULT_FORECAST_DISPLAY_DURATION.to_string(),
                "Seconds the forecast stays up (less than the show interval)",
            )
            .add_section("Calendar")
            .add_setting("calendar_ids", "[]", "Calendar ids to merge, e.g. [\"primary\"]")
            .add_setting(
                "max_events",
                &DEFAULT_MAX_EVENTS.to_string(),
                "Upcoming events to show",
            )
            .add_setting(
                "calendar_refresh_interval",
                &DEFAULT_CALENDAR_REFRESH_INTERVAL.to_string(),
                "Seconds between calendar updates",
            )
            .build();

        fs::write(path, content)
            .with_context(|| format!("Failed to write default config to {}", path.display()))?;

        Log::log_indented(&format!(
            "Created default configuration at {}",
            path_for_display(path)
        ));
        Ok(())
    }

    /// Load from the default location, creating the file first if needed.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)
                .context("Failed to create default config during load")?;
        }

        Self::load_from_path(&config_path).with_context(|| {
            format!(
                "Failed to load configuration from {}",
                config_path.display()
            )
        })
    }

    /// Load from an explicit path. Unlike [`Config::load`] this never creates a file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Configuration file not found at specified path: {}",
                path.display()
            );
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        Self::load_geo_override_from_path(&mut config, path);
        config.apply_env_overrides();
        Self::apply_defaults_and_validate_fields(&mut config)?;
        validate_config(&config)?;

        Ok(config)
    }

    /// Apply `geo.toml` if present. A broken file only warns.
    fn load_geo_override_from_path(config: &mut Config, config_path: &Path) {
        let Some(geo_path) = Self::geo_path_for(config_path) else {
            return;
        };
        if !geo_path.exists() {
            return;
        }

        match fs::read_to_string(&geo_path) {
            Ok(content) => match toml::from_str::<GeoConfig>(&content) {
                Ok(geo_config) => {
                    if let Some(lat) = geo_config.latitude {
                        config.latitude = Some(lat);
                    }
                    if let Some(lon) = geo_config.longitude {
                        config.longitude = Some(lon);
                    }
                    Log::log_indented(&format!(
                        "Loaded geographic overrides from {}",
                        path_for_display(&geo_path)
                    ));
                }
                Err(e) => Log::log_warning(&format!(
                    "Failed to parse geo.toml: {}. Using coordinates from main config.",
                    e
                )),
            },
            Err(e) => Log::log_warning(&format!(
                "Failed to read geo.toml: {}. Using coordinates from main config.",
                e
            )),
        }
    }

    /// Environment variables take precedence over the file.
    pub fn apply_env_overrides(&mut self) {
        let non_empty = |name: &str| env::var(name).ok().filter(|v| !v.trim().is_empty());

        if let Some(dir) = non_empty(ENV_PHOTOS_DIR) {
            self.photos_dir = Some(dir);
        }
        if let Some(key) = non_empty(ENV_WEATHER_API_KEY) {
            self.weather_api_key = Some(key);
        }
        if let Some(token) = non_empty(ENV_CALENDAR_TOKEN) {
            self.calendar_token = Some(token.trim().to_string());
        }
    }

    fn apply_defaults_and_validate_fields(config: &mut Config) -> Result<()> {
        // Explicit coordinates without a timezone: look the zone up instead of
        // assuming the default one.
        if config.timezone.is_none() {
            config.timezone = Some(match (config.latitude, config.longitude) {
                (Some(lat), Some(lon)) => {
                    geo::validate_coordinates(lat, lon)?;
                    geo::determine_timezone_from_coordinates(lat, lon)
                        .name()
                        .to_string()
                }
                _ => DEFAULT_TIMEZONE.to_string(),
            });
        }

        config.photos_dir.get_or_insert_with(|| DEFAULT_PHOTOS_DIR.to_string());
        config.city.get_or_insert_with(|| DEFAULT_CITY.to_string());
        config.region.get_or_insert_with(|| DEFAULT_REGION.to_string());
        config.latitude.get_or_insert(DEFAULT_LATITUDE);
        config.longitude.get_or_insert(DEFAULT_LONGITUDE);

        config
            .weather_city
            .get_or_insert_with(|| DEFAULT_WEATHER_CITY.to_string());
        let units = config
            .weather_units
            .get_or_insert_with(|| DEFAULT_WEATHER_UNITS.to_string());
        if Units::parse(units).is_none() {
            anyhow::bail!(
                "Invalid weather_units \"{}\". Use one of: {}",
                units,
                WEATHER_UNITS.join(", ")
            );
        }

        config.calendar_ids.get_or_insert_with(Vec::new);
        config.max_events.get_or_insert(DEFAULT_MAX_EVENTS);

        config.photo_interval.get_or_insert(DEFAULT_PHOTO_INTERVAL);
        config
            .forecast_show_interval
            .get_or_insert(DEFAULT_FORECAST_SHOW_INTERVAL);
        config
            .forecast_display_duration
            .get_or_insert(DEFAULT_FORECAST_DISPLAY_DURATION);
        config
            .weather_refresh_interval
            .get_or_insert(DEFAULT_WEATHER_REFRESH_INTERVAL);
        config
            .astral_refresh_interval
            .get_or_insert(DEFAULT_ASTRAL_REFRESH_INTERVAL);
        config
            .calendar_refresh_interval
            .get_or_insert(DEFAULT_CALENDAR_REFRESH_INTERVAL);

        Ok(())
    }

    // Accessors. Defaults are repeated so a hand-built Config still behaves.

    pub fn photos_dir(&self) -> PathBuf {
        expand_tilde(self.photos_dir.as_deref().unwrap_or(DEFAULT_PHOTOS_DIR))
    }

    pub fn timezone(&self) -> Result<Tz> {
        let name = self.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE);
        Ok(geo::parse_timezone(name)?)
    }

    pub fn location(&self) -> Result<Location> {
        let location = Location::new(
            self.city.as_deref().unwrap_or(DEFAULT_CITY),
            self.region.as_deref().unwrap_or(DEFAULT_REGION),
            self.timezone()?,
            self.latitude.unwrap_or(DEFAULT_LATITUDE),
            self.longitude.unwrap_or(DEFAULT_LONGITUDE),
        )?;
        Ok(location)
    }

    pub fn units(&self) -> Units {
        self.weather_units
            .as_deref()
            .and_then(Units::parse)
            .unwrap_or(Units::Imperial)
    }

    pub fn weather_city(&self) -> &str {
        self.weather_city.as_deref().unwrap_or(DEFAULT_WEATHER_CITY)
    }

    pub fn calendar_ids(&self) -> &[String] {
        self.calendar_ids.as_deref().unwrap_or(&[])
    }

    pub fn max_events(&self) -> usize {
        self.max_events.unwrap_or(DEFAULT_MAX_EVENTS)
    }

    pub fn calendar_token_file(&self) -> Option<PathBuf> {
        self.calendar_token_file.as_deref().map(expand_tilde)
    }

    pub fn status_file(&self) -> Option<PathBuf> {
        self.status_file.as_deref().map(expand_tilde)
    }

    pub fn photo_interval(&self) -> Duration {
        Duration::from_secs(self.photo_interval.unwrap_or(DEFAULT_PHOTO_INTERVAL))
    }

    pub fn forecast_show_interval(&self) -> Duration {
        Duration::from_secs(
            self.forecast_show_interval
                .unwrap_or(DEFAULT_FORECAST_SHOW_INTERVAL),
        )
    }

    pub fn forecast_display_duration(&self) -> Duration {
        Duration::from_secs(
            self.forecast_display_duration
                .unwrap_or(DEFAULT_FORECAST_DISPLAY_DURATION),
        )
    }

    pub fn weather_refresh_interval(&self) -> Duration {
        Duration::from_secs(
            self.weather_refresh_interval
                .unwrap_or(DEFAULT_WEATHER_REFRESH_INTERVAL),
        )
    }

    pub fn astral_refresh_interval(&self) -> Duration {
        Duration::from_secs(
            self.astral_refresh_interval
                .unwrap_or(DEFAULT_ASTRAL_REFRESH_INTERVAL),
        )
    }

    pub fn calendar_refresh_interval(&self) -> Duration {
        Duration::from_secs(
            self.calendar_refresh_interval
                .unwrap_or(DEFAULT_CALENDAR_REFRESH_INTERVAL),
        )
    }

    pub fn log_config(&self, config_path: &Path) {
        Log::log_block_start(&format!(
            "Loaded configuration from {}",
            path_for_display(config_path)
        ));

        if let Some(geo_path) = Self::geo_path_for(config_path).filter(|p| p.exists()) {
            Log::log_indented(&format!(
                "Loaded geo coordinates from {}",
                path_for_display(&geo_path)
            ));
        }

        Log::log_indented(&format!(
            "Photos: {}",
            path_for_display(&self.photos_dir())
        ));
        Log::log_indented(&format!(
            "Location: {}, {} ({})",
            self.city.as_deref().unwrap_or(DEFAULT_CITY),
            self.region.as_deref().unwrap_or(DEFAULT_REGION),
            self.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE)
        ));
        if let Ok(location) = self.location() {
            Log::log_indented(&format!(
                "Coordinates: {}",
                location.coordinates_for_display()
            ));
        }
        Log::log_indented(&format!(
            "Weather: {} in {}{}",
            self.weather_city(),
            self.units().as_str(),
            if self.weather_api_key.is_some() {
                ""
            } else {
                " (no API key)"
            }
        ));
        Log::log_indented(&format!(
            "Calendars: {} (showing {} events)",
            self.calendar_ids().len(),
            self.max_events()
        ));
        Log::log_indented(&format!(
            "Photo interval: {} seconds",
            self.photo_interval().as_secs()
        ));
        Log::log_indented(&format!(
            "Forecast: every {} seconds for {} seconds",
            self.forecast_show_interval().as_secs(),
            self.forecast_display_duration().as_secs()
        ));
        Log::log_indented(&format!(
            "Refresh: weather {}s, astral {}s, calendar {}s",
            self.weather_refresh_interval().as_secs(),
            self.astral_refresh_interval().as_secs(),
            self.calendar_refresh_interval().as_secs()
        ));
        if let Some(status_file) = self.status_file() {
            Log::log_indented(&format!("Status file: {}", path_for_display(&status_file)));
        }
    }
}

/// Check the loaded configuration for values the frame cannot run with.
pub fn validate_config(config: &Config) -> Result<()> {
    let latitude = config.latitude.unwrap_or(DEFAULT_LATITUDE);
    let longitude = config.longitude.unwrap_or(DEFAULT_LONGITUDE);
    geo::validate_coordinates(latitude, longitude)?;

    config.timezone()?;

    let intervals = [
        ("photo_interval", config.photo_interval),
        ("forecast_show_interval", config.forecast_show_interval),
        ("forecast_display_duration", config.forecast_display_duration),
        ("weather_refresh_interval", config.weather_refresh_interval),
        ("astral_refresh_interval", config.astral_refresh_interval),
        ("calendar_refresh_interval", config.calendar_refresh_interval),
    ];
    for (name, value) in intervals {
        if let Some(secs) = value {
            if !(MINIMUM_REFRESH_INTERVAL..=MAXIMUM_REFRESH_INTERVAL).contains(&secs) {
                anyhow::bail!(
                    "{} must be between {} and {} seconds (got {})",
                    name,
                    MINIMUM_REFRESH_INTERVAL,
                    MAXIMUM_REFRESH_INTERVAL,
                    secs
                );
            }
        }
    }

    let show = config.forecast_show_interval();
    let duration = config.forecast_display_duration();
    if duration >= show {
        anyhow::bail!(
            "forecast_display_duration ({}s) must be shorter than forecast_show_interval ({}s)",
            duration.as_secs(),
            show.as_secs()
        );
    }

    let max_events = config.max_events();
    if !(1..=MAXIMUM_EVENTS).contains(&max_events) {
        anyhow::bail!(
            "max_events must be between 1 and {} (got {})",
            MAXIMUM_EVENTS,
            max_events
        );
    }

    if config.calendar_ids().iter().any(|id| id.trim().is_empty()) {
        anyhow::bail!("calendar_ids must not contain empty entries");
    }

    Ok(())
}

/// Builder for the generated config file, aligning every `# comment` to one column.
struct ConfigBuilder {
    entries: Vec<ConfigEntry>,
}

enum ConfigEntry {
    Section(String),
    Setting { line: String, comment: String },
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(ConfigEntry::Section(format!("#[{}]", title)));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(ConfigEntry::Setting {
            line: format!("{} = {}", key, value),
            comment: format!("# {}", comment),
        });
        self
    }

    fn build(self) -> String {
        let width = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                ConfigEntry::Setting { line, .. } => Some(line.len()),
                ConfigEntry::Section(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        let mut lines = Vec::new();
        for entry in self.entries {
            match entry {
                ConfigEntry::Section(title) => {
                    if !lines.is_empty() {
                        lines.push(String::new());
                    }
                    lines.push(title);
                }
                ConfigEntry::Setting { line, comment } => {
                    let padding = " ".repeat(width - line.len());
                    lines.push(format!("{}{}{}", line, padding, comment));
                }
            }
        }

        let mut content = lines.join("\n");
        content.push('\n');
        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::test_constants::*;
    use serial_test::serial;
    use tempfile::tempdir;

    fn create_test_config(show_interval: u64, display_duration: u64) -> Config {
        Config {
            city: Some(TEST_CITY.to_string()),
            region: Some(TEST_REGION.to_string()),
            timezone: Some(TEST_TIMEZONE.to_string()),
            latitude: Some(TEST_LATITUDE),
            longitude: Some(TEST_LONGITUDE),
            forecast_show_interval: Some(show_interval),
            forecast_display_duration: Some(display_duration),
            ..Config::default()
        }
    }

    /// Run `f` with the given environment variables set, restoring them afterwards.
    fn with_env<F: FnOnce()>(vars: &[(&str, Option<&str>)], f: F) {
        let saved: Vec<_> = vars
            .iter()
            .map(|(name, _)| (name.to_string(), env::var(name).ok()))
            .collect();
        unsafe {
            for (name, value) in vars {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
        f();
        unsafe {
            for (name, value) in saved {
                match value {
                    Some(v) => env::set_var(&name, v),
                    None => env::remove_var(&name),
                }
            }
        }
    }

    #[test]
    fn test_config_validation_basic() {
        assert!(validate_config(&create_test_config(1800, 30)).is_ok());
    }

    #[test]
    fn test_display_duration_must_be_shorter_than_show_interval() {
        assert!(validate_config(&create_test_config(30, 30)).is_err());
        assert!(validate_config(&create_test_config(30, 45)).is_err());
        assert!(validate_config(&create_test_config(31, 30)).is_ok());
    }

    #[test]
    fn test_interval_bounds() {
        let mut config = create_test_config(1800, 30);
        config.photo_interval = Some(0);
        assert!(validate_config(&config).is_err());
        config.photo_interval = Some(MAXIMUM_REFRESH_INTERVAL + 1);
        assert!(validate_config(&config).is_err());
        config.photo_interval = Some(MAXIMUM_REFRESH_INTERVAL);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_invalid_coordinates_rejected() {
        let mut config = create_test_config(1800, 30);
        config.latitude = Some(91.0);
        assert!(validate_config(&config).is_err());
        config.latitude = Some(45.0);
        config.longitude = Some(-181.0);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_unknown_timezone_rejected() {
        let mut config = create_test_config(1800, 30);
        config.timezone = Some("Mars/Olympus_Mons".to_string());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_max_events_bounds() {
        let mut config = create_test_config(1800, 30);
        config.max_events = Some(0);
        assert!(validate_config(&config).is_err());
        config.max_events = Some(MAXIMUM_EVENTS);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    #[serial]
    fn test_default_config_file_loads() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("photoframe.toml");

        Config::create_default_config(&config_path).unwrap();
        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("photos_dir"));
        assert!(content.contains("forecast_display_duration"));

        with_env(
            &[
                (ENV_PHOTOS_DIR, None),
                (ENV_WEATHER_API_KEY, None),
                (ENV_CALENDAR_TOKEN, None),
            ],
            || {
                let config = Config::load_from_path(&config_path).unwrap();
                assert_eq!(config.photo_interval(), Duration::from_secs(DEFAULT_PHOTO_INTERVAL));
                assert_eq!(config.timezone.as_deref(), Some(DEFAULT_TIMEZONE));
                assert!(config.calendar_ids().is_empty());
            },
        );
    }

    #[test]
    #[serial]
    fn test_config_load_default_creation() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("photoframe").join("photoframe.toml");

        let xdg = temp_dir.path().to_string_lossy().into_owned();
        with_env(&[("XDG_CONFIG_HOME", Some(xdg.as_str()))], || {
            assert!(Config::load().is_ok());
        });
        assert!(config_path.exists());
    }

    #[test]
    fn test_config_malformed_toml() {
        let result: Result<Config, _> = toml::from_str("photo_interval = \"soon\"");
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_geo_toml_overrides_main_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("photoframe.toml");
        fs::write(
            &config_path,
            "timezone = \"Europe/London\"\nlatitude = 40.7128\nlongitude = -74.0060\n",
        )
        .unwrap();
        fs::write(
            temp_dir.path().join("geo.toml"),
            "latitude = 51.5074\nlongitude = -0.1278\n",
        )
        .unwrap();

        let config = Config::load_from_path(&config_path).unwrap();
        assert_eq!(config.latitude, Some(51.5074));
        assert_eq!(config.longitude, Some(-0.1278));
    }

    #[test]
    #[serial]
    fn test_malformed_geo_toml_falls_back() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("photoframe.toml");
        fs::write(&config_path, "latitude = 40.7128\nlongitude = -74.0060\n").unwrap();
        fs::write(temp_dir.path().join("geo.toml"), "latitude = [oops").unwrap();

        let config = Config::load_from_path(&config_path).unwrap();
        assert_eq!(config.latitude, Some(40.7128));
    }

    #[test]
    #[serial]
    fn test_timezone_detected_from_coordinates() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("photoframe.toml");
        fs::write(&config_path, "latitude = 52.52\nlongitude = 13.405\n").unwrap();

        let config = Config::load_from_path(&config_path).unwrap();
        assert_eq!(config.timezone.as_deref(), Some("Europe/Berlin"));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("photoframe.toml");
        fs::write(
            &config_path,
            "photos_dir = \"/srv/photos\"\nweather_api_key = \"from-file\"\n",
        )
        .unwrap();

        with_env(
            &[
                (ENV_PHOTOS_DIR, Some("/mnt/usb")),
                (ENV_WEATHER_API_KEY, Some("from-env")),
                (ENV_CALENDAR_TOKEN, Some(" ya29.token \n")),
            ],
            || {
                let config = Config::load_from_path(&config_path).unwrap();
                assert_eq!(config.photos_dir(), PathBuf::from("/mnt/usb"));
                assert_eq!(config.weather_api_key.as_deref(), Some("from-env"));
                assert_eq!(config.calendar_token.as_deref(), Some("ya29.token"));
            },
        );
    }

    #[test]
    #[serial]
    fn test_invalid_units_rejected() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("photoframe.toml");
        fs::write(&config_path, "weather_units = \"kelvin\"\n").unwrap();
        assert!(Config::load_from_path(&config_path).is_err());
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let temp_dir = tempdir().unwrap();
        assert!(Config::load_from_path(&temp_dir.path().join("nope.toml")).is_err());
    }

    #[test]
    fn test_location_from_config() {
        let location = create_test_config(1800, 30).location().unwrap();
        assert_eq!(location.city, TEST_CITY);
        assert_eq!(location.timezone, Tz::America__Denver);
    }

    #[test]
    fn test_builder_aligns_comments() {
        let content = ConfigBuilder::new()
            .add_section("Test")
            .add_setting("a", "1", "first")
            .add_setting("longer_key", "\"x\"", "second")
            .build();
        let columns: Vec<_> = content
            .lines()
            .filter(|l| !l.starts_with("#["))
            .map(|l| l.find("# ").unwrap())
            .collect();
        assert_eq!(columns[0], columns[1]);
    }
}
