//! Loading configuration files from disk: defaults, geo.toml overrides,
//! environment overrides and validation.

use photoframe::config::{Config, validate_config};
use photoframe::constants::{ENV_CALENDAR_TOKEN, ENV_PHOTOS_DIR, ENV_WEATHER_API_KEY};
use photoframe::sources::weather::Units;
use proptest::prelude::*;
use serial_test::serial;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::tempdir;

const ENV_VARS: [&str; 3] = [ENV_PHOTOS_DIR, ENV_WEATHER_API_KEY, ENV_CALENDAR_TOKEN];

fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("photoframe.toml");
    fs::write(&path, content).unwrap();
    path
}

fn clear_env() {
    unsafe {
        for name in ENV_VARS {
            std::env::remove_var(name);
        }
    }
}

#[test]
#[serial]
fn test_generated_default_config_loads() {
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("photoframe.toml");

    Config::create_default_config(&path).unwrap();
    let config = Config::load_from_path(&path).unwrap();

    assert_eq!(config.photo_interval(), Duration::from_secs(120));
    assert_eq!(config.forecast_show_interval(), Duration::from_secs(1800));
    assert_eq!(config.forecast_display_duration(), Duration::from_secs(30));
    assert_eq!(config.units(), Units::Imperial);
    assert_eq!(config.timezone().unwrap(), chrono_tz::America::Denver);
    assert!(config.calendar_ids().is_empty());
    assert!(config.weather_api_key.is_none());
}

#[test]
#[serial]
fn test_missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    assert!(Config::load_from_path(&dir.path().join("absent.toml")).is_err());
}

#[test]
#[serial]
fn test_geo_override_replaces_coordinates() {
    clear_env();
    let dir = tempdir().unwrap();
    let path = write_config(
        dir.path(),
        "latitude = 39.7392\nlongitude = -104.9903\ntimezone = \"America/Denver\"\n",
    );
    fs::write(dir.path().join("geo.toml"), "latitude = 40.0150\nlongitude = -105.2705\n").unwrap();

    let config = Config::load_from_path(&path).unwrap();
    assert_eq!(config.latitude, Some(40.0150));
    assert_eq!(config.longitude, Some(-105.2705));
}

#[test]
#[serial]
fn test_broken_geo_file_is_ignored() {
    clear_env();
    let dir = tempdir().unwrap();
    let path = write_config(dir.path(), "latitude = 39.7392\nlongitude = -104.9903\n");
    fs::write(dir.path().join("geo.toml"), "latitude = \"north\"").unwrap();

    let config = Config::load_from_path(&path).unwrap();
    assert_eq!(config.latitude, Some(39.7392));
}

#[test]
#[serial]
fn test_timezone_detected_from_coordinates() {
    clear_env();
    let dir = tempdir().unwrap();
    // Central London, no timezone given
    let path = write_config(dir.path(), "latitude = 51.5074\nlongitude = -0.1278\n");

    let config = Config::load_from_path(&path).unwrap();
    assert_eq!(config.timezone().unwrap(), chrono_tz::Europe::London);
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    let dir = tempdir().unwrap();
    let path = write_config(
        dir.path(),
        "photos_dir = \"/srv/photos\"\nweather_api_key = \"from-file\"\n",
    );

    unsafe {
        std::env::set_var(ENV_PHOTOS_DIR, "/mnt/usb/photos");
        std::env::set_var(ENV_WEATHER_API_KEY, "from-env");
        std::env::set_var(ENV_CALENDAR_TOKEN, "  ya29.token \n");
    }
    let config = Config::load_from_path(&path);
    clear_env();

    let config = config.unwrap();
    assert_eq!(config.photos_dir(), PathBuf::from("/mnt/usb/photos"));
    assert_eq!(config.weather_api_key.as_deref(), Some("from-env"));
    assert_eq!(config.calendar_token.as_deref(), Some("ya29.token"));
}

#[test]
#[serial]
fn test_invalid_values_rejected() {
    clear_env();
    let dir = tempdir().unwrap();
    let cases = [
        "latitude = 91.0\nlongitude = 0.0\n",
        "timezone = \"Mars/Olympus_Mons\"\n",
        "weather_units = \"kelvin-ish\"\n",
        "photo_interval = 0\n",
        "forecast_show_interval = 30\nforecast_display_duration = 30\n",
        "max_events = 0\n",
        "calendar_ids = [\"primary\", \" \"]\n",
        "photo_interval = \"fast\"\n",
    ];
    for content in cases {
        let path = write_config(dir.path(), content);
        assert!(
            Config::load_from_path(&path).is_err(),
            "accepted invalid config: {}",
            content
        );
    }
}

proptest! {
    /// The forecast must always hide before it is due to show again.
    #[test]
    fn test_display_duration_shorter_than_show_interval(
        show in 1u64..=86_400,
        display in 1u64..=86_400,
    ) {
        let config = Config {
            forecast_show_interval: Some(show),
            forecast_display_duration: Some(display),
            ..Config::default()
        };
        prop_assert_eq!(validate_config(&config).is_ok(), display < show);
    }

    /// Every interval outside one second to one day is rejected.
    #[test]
    fn test_interval_bounds(secs in 0u64..200_000) {
        let config = Config {
            astral_refresh_interval: Some(secs),
            ..Config::default()
        };
        prop_assert_eq!(validate_config(&config).is_ok(), (1..=86_400).contains(&secs));
    }
}
