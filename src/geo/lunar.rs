//! Lunar phase calculations for the moon overlay.
//!
//! The moon is modelled with a mean synodic month measured from a reference new
//! moon. That is accurate to within a day of the true phase, which is all a
//! wall display needs. Illumination follows the simple cosine phase model, so
//! it is symmetric around full moon.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::constants::{
    PHASE_TONIGHT_THRESHOLD_DAYS, REFERENCE_NEW_MOON_UNIX, SECONDS_PER_DAY, SYNODIC_MONTH,
};

/// The four named phases reported by the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoonPhase {
    NewMoon,
    FirstQuarter,
    FullMoon,
    LastQuarter,
}

impl MoonPhase {
    pub fn name(self) -> &'static str {
        match self {
            MoonPhase::NewMoon => "New Moon",
            MoonPhase::FirstQuarter => "First Quarter",
            MoonPhase::FullMoon => "Full Moon",
            MoonPhase::LastQuarter => "Last Quarter",
        }
    }
}

impl fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named phase targets within one cycle, in lunar-age days.
///
/// The trailing new moon at a full synodic month catches ages past last quarter.
const NAMED_PHASES: [(f64, MoonPhase); 5] = [
    (0.0, MoonPhase::NewMoon),
    (SYNODIC_MONTH / 4.0, MoonPhase::FirstQuarter),
    (SYNODIC_MONTH / 2.0, MoonPhase::FullMoon),
    (SYNODIC_MONTH * 3.0 / 4.0, MoonPhase::LastQuarter),
    (SYNODIC_MONTH, MoonPhase::NewMoon),
];

/// Largest representable angle below 360 degrees.
const MAX_PHASE_ANGLE: f64 = f64::from_bits(360.0f64.to_bits() - 1);

/// Age of the moon in days since the last new moon, in `[0, SYNODIC_MONTH)`.
pub fn moon_age_days(instant: DateTime<Utc>) -> f64 {
    let seconds = (instant.timestamp() - REFERENCE_NEW_MOON_UNIX) as f64
        + f64::from(instant.timestamp_subsec_millis()) / 1000.0;
    wrap_age(seconds / SECONDS_PER_DAY)
}

fn wrap_age(days: f64) -> f64 {
    let age = days.rem_euclid(SYNODIC_MONTH);
    // rem_euclid may round up to the modulus for tiny negative inputs
    if age >= SYNODIC_MONTH { 0.0 } else { age }
}

/// Phase angle in degrees for a lunar age: 0 = new, 180 = full, wrapped into `[0, 360)`.
pub fn phase_angle(age_days: f64) -> f64 {
    let angle = (wrap_age(age_days) / SYNODIC_MONTH) * 360.0;
    angle.min(MAX_PHASE_ANGLE)
}

/// Illuminated fraction of the lunar disc for a phase angle in degrees.
pub fn illumination(phase_angle_deg: f64) -> f64 {
    (1.0 - phase_angle_deg.to_radians().cos()) / 2.0
}

/// Angles below 180 degrees are waxing, the rest waning.
pub fn is_waxing(phase_angle_deg: f64) -> bool {
    phase_angle_deg < 180.0
}

/// Whole days until the next named phase, and which phase that is.
///
/// A phase less than [`PHASE_TONIGHT_THRESHOLD_DAYS`] away is reported as 0
/// ("tonight"); anything further is rounded up, so 0.9 days reads as 1 day.
pub fn next_named_phase(age_days: f64) -> (u32, MoonPhase) {
    let age = wrap_age(age_days);
    for (target, phase) in NAMED_PHASES {
        let days_away = target - age;
        if days_away >= 0.0 {
            if days_away < PHASE_TONIGHT_THRESHOLD_DAYS {
                return (0, phase);
            }
            return (days_away.ceil() as u32, phase);
        }
    }
    // Unreachable while the wrap sentinel is in the table
    (0, MoonPhase::NewMoon)
}
