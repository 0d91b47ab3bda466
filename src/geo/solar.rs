//! Sunrise and sunset calculations for the astronomy overlay.
//!
//! Event times come from the `sunrise` crate. Before asking it for times we
//! evaluate the sunrise hour angle ourselves from the solar declination: when
//! the sun never crosses the apparent horizon (polar day or polar night) the
//! hour angle is undefined and the crate would hand back a meaningless
//! timestamp, so those days are reported as explicit variants instead.

use chrono::{DateTime, Duration, NaiveDate, TimeDelta};
use chrono_tz::Tz;
use sunrise::{Coordinates, SolarDay, SolarEvent};

use super::{AstralError, validate_coordinates};
use crate::constants::SUNRISE_ALTITUDE_DEG;

/// Obliquity of the ecliptic used by the sunrise equation.
const EARTH_OBLIQUITY_DEG: f64 = 23.4397;

/// Sunrise and sunset for one calendar day at one place.
#[derive(Debug, Clone, PartialEq)]
pub enum SunTimes {
    /// The sun rises and sets on this day.
    Normal {
        sunrise: DateTime<Tz>,
        sunset: DateTime<Tz>,
    },
    /// The sun stays above the horizon all day (midnight sun).
    PolarDay,
    /// The sun stays below the horizon all day.
    PolarNight,
}

impl SunTimes {
    pub fn sunrise(&self) -> Option<&DateTime<Tz>> {
        match self {
            SunTimes::Normal { sunrise, .. } => Some(sunrise),
            _ => None,
        }
    }

    pub fn sunset(&self) -> Option<&DateTime<Tz>> {
        match self {
            SunTimes::Normal { sunset, .. } => Some(sunset),
            _ => None,
        }
    }

    /// Length of daylight: sunset minus sunrise, or the whole day / nothing at the poles.
    pub fn daylight(&self) -> Duration {
        match self {
            SunTimes::Normal { sunrise, sunset } => *sunset - *sunrise,
            SunTimes::PolarDay => TimeDelta::hours(24),
            SunTimes::PolarNight => TimeDelta::zero(),
        }
    }
}

/// Calculate the sunrise and sunset for `date` at the given coordinates,
/// expressed in `timezone`.
///
/// # Errors
/// `AstralError::InvalidLocation` when the coordinates are out of range.
pub fn calculate_sun_times(
    latitude: f64,
    longitude: f64,
    date: NaiveDate,
    timezone: Tz,
) -> Result<SunTimes, AstralError> {
    validate_coordinates(latitude, longitude)?;

    let cos_hour_angle = sunrise_hour_angle_cosine(latitude, longitude, date);
    if let Some(polar) = classify_polar(cos_hour_angle) {
        return Ok(polar);
    }

    let coord = Coordinates::new(latitude, longitude)
        .ok_or(AstralError::InvalidLocation { latitude, longitude })?;
    // The crate's solar day follows the longitude, not the civil date in
    // `timezone`. Far from the zone's meridian (Kiribati, Tonga, Samoa) the
    // events falling on `date` belong to a neighbouring solar day.
    let on_date = |event: SolarEvent| {
        [date.pred_opt(), Some(date), date.succ_opt()]
            .into_iter()
            .flatten()
            .map(|day| {
                SolarDay::new(coord, day)
                    .event_time(event)
                    .with_timezone(&timezone)
            })
            .find(|time| time.date_naive() == date)
    };

    match (on_date(SolarEvent::Sunrise), on_date(SolarEvent::Sunset)) {
        (Some(sunrise), Some(sunset)) => Ok(SunTimes::Normal { sunrise, sunset }),
        // Right at the polar boundary the two models can disagree by a hair
        // and the crate finds no crossing on this date.
        _ => Ok(if cos_hour_angle > 0.0 {
            SunTimes::PolarNight
        } else {
            SunTimes::PolarDay
        }),
    }
}

fn classify_polar(cos_hour_angle: f64) -> Option<SunTimes> {
    if cos_hour_angle > 1.0 {
        Some(SunTimes::PolarNight)
    } else if cos_hour_angle < -1.0 {
        Some(SunTimes::PolarDay)
    } else {
        None
    }
}

/// Solar declination in degrees at local solar noon of `date`.
pub fn solar_declination(longitude: f64, date: NaiveDate) -> f64 {
    let j2000 = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN);
    let days = (date - j2000).num_days() as f64 + 0.0008;
    let mean_solar_time = days - longitude / 360.0;

    let mean_anomaly = (357.5291 + 0.98560028 * mean_solar_time).rem_euclid(360.0);
    let m = mean_anomaly.to_radians();
    let equation_of_center = 1.9148 * m.sin() + 0.0200 * (2.0 * m).sin() + 0.0003 * (3.0 * m).sin();
    let ecliptic_longitude =
        (mean_anomaly + equation_of_center + 180.0 + 102.9372).rem_euclid(360.0);

    (ecliptic_longitude.to_radians().sin() * EARTH_OBLIQUITY_DEG.to_radians().sin())
        .asin()
        .to_degrees()
}

/// Cosine of the sunrise hour angle; outside `[-1, 1]` the sun does not cross the horizon.
pub fn sunrise_hour_angle_cosine(latitude: f64, longitude: f64, date: NaiveDate) -> f64 {
    let phi = latitude.to_radians();
    let delta = solar_declination(longitude, date).to_radians();
    (SUNRISE_ALTITUDE_DEG.to_radians().sin() - phi.sin() * delta.sin()) / (phi.cos() * delta.cos())
}
