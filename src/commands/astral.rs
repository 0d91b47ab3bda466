//! Implementation of the --astral command.
//!
//! Prints the sunrise, sunset and moon data the frame would show for a date.

use anyhow::Result;
use chrono::NaiveDate;
use std::path::Path;

use crate::geo::{self, SunTimes};
use crate::logger::Log;
use crate::widgets::astral::AstralDisplay;

/// Handle the --astral command for `date`, or today at the configured location.
pub fn handle_astral_command(date: Option<NaiveDate>, config_path: Option<&Path>) -> Result<()> {
    Log::log_version();

    let (config, _) = super::load_config(config_path)?;
    let location = config.location()?;
    let date = date.unwrap_or_else(|| location.today());

    let snapshot = geo::compute(&location, date)?;
    let display = AstralDisplay::from_snapshot(&snapshot);

    Log::log_block_start(&format!(
        "{}, {} on {}",
        location.city,
        location.region,
        date.format("%A, %B %-d %Y")
    ));
    Log::log_indented(&format!("Coordinates: {}", location.coordinates_for_display()));
    Log::log_indented(&format!("Timezone: {}", location.timezone));

    Log::log_block_start("Sun");
    match snapshot.sun {
        SunTimes::Normal { .. } => {
            Log::log_indented(&format!("Sunrise: {}", display.sunrise));
            Log::log_indented(&format!("Sunset: {}", display.sunset));
        }
        SunTimes::PolarDay | SunTimes::PolarNight => {
            Log::log_indented(&format!("No sunrise or sunset ({})", display.sunrise));
        }
    }
    Log::log_indented(&format!("Daylight: {}", display.daylight));

    Log::log_block_start("Moon");
    Log::log_indented(&format!(
        "Illumination: {} ({})",
        display.illumination, display.trend
    ));
    Log::log_indented(&format!("Phase angle: {:.1}°", snapshot.phase_angle));
    Log::log_indented(&format!("Next: {}", display.next_phase));

    Log::log_end();
    Ok(())
}
