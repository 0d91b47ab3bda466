//! Weather data model and the source traits the weather widgets poll.

use chrono::{DateTime, Utc};

use super::FetchError;

/// Current conditions at the configured city.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeather {
    pub temperature: f64,
    pub description: String,
    /// OpenWeatherMap condition code, e.g. 800 for clear sky.
    pub condition_id: u32,
    pub icon: String,
}

/// One 3-hourly bucket of the forecast time series.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub condition_id: u32,
    pub description: String,
}

/// Source of current weather conditions.
#[cfg_attr(test, mockall::automock)]
pub trait WeatherSource: Send + Sync {
    fn current(&self) -> Result<CurrentWeather, FetchError>;
}

/// Source of the multi-day forecast time series.
#[cfg_attr(test, mockall::automock)]
pub trait ForecastSource: Send + Sync {
    fn forecast(&self) -> Result<Vec<ForecastEntry>, FetchError>;
}

/// Display units for temperatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Units {
    Imperial,
    Metric,
    Standard,
}

impl Units {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "imperial" => Some(Units::Imperial),
            "metric" => Some(Units::Metric),
            "standard" => Some(Units::Standard),
            _ => None,
        }
    }

    /// Value of the `units` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Units::Imperial => "imperial",
            Units::Metric => "metric",
            Units::Standard => "standard",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Units::Imperial => "°F",
            Units::Metric => "°C",
            Units::Standard => "K",
        }
    }
}
