//! Timezone resolution for the configured location.
//!
//! The config normally names an IANA zone explicitly. When it does not, the
//! zone is looked up from the coordinates using timezone boundary data.

use chrono_tz::Tz;
use std::sync::OnceLock;
use tzf_rs::DefaultFinder;

use super::AstralError;

/// Parse an IANA timezone identifier such as `America/Denver`.
pub fn parse_timezone(name: &str) -> Result<Tz, AstralError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| AstralError::UnknownTimezone(name.to_string()))
}

/// Determine the timezone for given coordinates using timezone boundary data.
///
/// Falls back to UTC for coordinates the finder cannot place (open ocean).
pub fn determine_timezone_from_coordinates(latitude: f64, longitude: f64) -> Tz {
    static FINDER: OnceLock<DefaultFinder> = OnceLock::new();
    let finder = FINDER.get_or_init(DefaultFinder::new);

    // tzf-rs takes (longitude, latitude)
    let tz_name = finder.get_tz_name(longitude, latitude);
    tz_name.parse::<Tz>().unwrap_or(Tz::UTC)
}
