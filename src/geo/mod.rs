//! Astronomical data for the sun/moon overlay.
//!
//! This module provides:
//! - The immutable [`Location`] the frame is installed at
//! - Sunrise/sunset calculation with explicit polar day/night handling
//! - Lunar age, phase angle, illumination and next named phase
//! - Timezone resolution for the configured location
//!
//! [`compute`] ties these together into an [`AstralSnapshot`]. It is pure: the
//! same location and date always produce the same snapshot.

pub mod lunar;
pub mod solar;
pub mod timezone;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

pub use lunar::MoonPhase;
pub use solar::SunTimes;
pub use timezone::{determine_timezone_from_coordinates, parse_timezone};

/// Errors raised by the astronomy calculations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AstralError {
    #[error(
        "Invalid location: latitude {latitude} must be within -90..=90 and longitude {longitude} within -180..=180"
    )]
    InvalidLocation { latitude: f64, longitude: f64 },
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
}

/// Where the frame is installed. Supplied once at startup, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub city: String,
    pub region: String,
    pub timezone: Tz,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Build a location, rejecting out-of-range coordinates.
    pub fn new(
        city: impl Into<String>,
        region: impl Into<String>,
        timezone: Tz,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, AstralError> {
        validate_coordinates(latitude, longitude)?;
        Ok(Self {
            city: city.into(),
            region: region.into(),
            timezone,
            latitude,
            longitude,
        })
    }

    /// Today's date at this location.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }

    /// Human readable coordinates, e.g. `39.7392°N, 104.9903°W`.
    pub fn coordinates_for_display(&self) -> String {
        format!(
            "{:.4}°{}, {:.4}°{}",
            self.latitude.abs(),
            if self.latitude >= 0.0 { "N" } else { "S" },
            self.longitude.abs(),
            if self.longitude >= 0.0 { "E" } else { "W" }
        )
    }
}

/// Everything the astronomy overlay displays, computed for one date.
#[derive(Debug, Clone, PartialEq)]
pub struct AstralSnapshot {
    pub date: NaiveDate,
    pub sun: SunTimes,
    /// Illuminated fraction, 0.0 at new moon to 1.0 at full moon.
    pub illumination: f64,
    /// Degrees in `[0, 360)`; below 180 is waxing.
    pub phase_angle: f64,
    pub days_to_next_named_phase: u32,
    pub next_phase: MoonPhase,
}

impl AstralSnapshot {
    pub fn sunrise(&self) -> Option<&DateTime<Tz>> {
        self.sun.sunrise()
    }

    pub fn sunset(&self) -> Option<&DateTime<Tz>> {
        self.sun.sunset()
    }

    pub fn is_waxing(&self) -> bool {
        lunar::is_waxing(self.phase_angle)
    }
}

pub(crate) fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), AstralError> {
    if (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude) {
        Ok(())
    } else {
        Err(AstralError::InvalidLocation {
            latitude,
            longitude,
        })
    }
}

/// Compute the sun and moon data for `date` at `location`.
///
/// The moon is evaluated at local noon so the whole calendar day shares one
/// phase reading.
///
/// # Errors
/// `AstralError::InvalidLocation` when the location's coordinates are out of range.
pub fn compute(location: &Location, date: NaiveDate) -> Result<AstralSnapshot, AstralError> {
    validate_coordinates(location.latitude, location.longitude)?;

    let sun = solar::calculate_sun_times(
        location.latitude,
        location.longitude,
        date,
        location.timezone,
    )?;

    let noon = date.and_hms_opt(12, 0, 0).unwrap_or_default();
    let local_noon = location
        .timezone
        .from_local_datetime(&noon)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&noon));

    let age = lunar::moon_age_days(local_noon);
    let phase_angle = lunar::phase_angle(age);
    let illumination = lunar::illumination(phase_angle);
    let (days_to_next_named_phase, next_phase) = lunar::next_named_phase(age);

    Ok(AstralSnapshot {
        date,
        sun,
        illumination,
        phase_angle,
        days_to_next_named_phase,
        next_phase,
    })
}
