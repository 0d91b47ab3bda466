//! OpenWeatherMap client for current conditions and the 5-day forecast.

use chrono::DateTime;
use serde::Deserialize;

use super::weather::{CurrentWeather, ForecastEntry, ForecastSource, Units, WeatherSource};
use super::{FetchError, agent, read_json};
use crate::constants::{OPENWEATHER_CURRENT_URL, OPENWEATHER_FORECAST_URL};

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    id: u32,
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwmCurrent {
    main: OwmMain,
    weather: Vec<OwmCondition>,
}

#[derive(Debug, Deserialize)]
struct OwmForecastEntry {
    dt: i64,
    main: OwmMain,
    weather: Vec<OwmCondition>,
}

#[derive(Debug, Deserialize)]
struct OwmForecast {
    list: Vec<OwmForecastEntry>,
}

/// Client for the OpenWeatherMap REST API.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    city: String,
    api_key: String,
    units: Units,
}

impl OpenWeatherClient {
    pub fn new(city: impl Into<String>, api_key: impl Into<String>, units: Units) -> Self {
        Self {
            city: city.into(),
            api_key: api_key.into(),
            units,
        }
    }

    fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = agent()
            .get(url)
            .query("q", &self.city)
            .query("appid", &self.api_key)
            .query("units", self.units.as_str())
            .call()?;
        read_json(response)
    }
}

impl WeatherSource for OpenWeatherClient {
    fn current(&self) -> Result<CurrentWeather, FetchError> {
        let raw: OwmCurrent = self.get(OPENWEATHER_CURRENT_URL)?;
        convert_current(raw)
    }
}

impl ForecastSource for OpenWeatherClient {
    fn forecast(&self) -> Result<Vec<ForecastEntry>, FetchError> {
        let raw: OwmForecast = self.get(OPENWEATHER_FORECAST_URL)?;
        convert_forecast(raw)
    }
}

fn convert_current(raw: OwmCurrent) -> Result<CurrentWeather, FetchError> {
    let condition = raw
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::MalformedResponse("no weather conditions".to_string()))?;
    Ok(CurrentWeather {
        temperature: raw.main.temp,
        description: condition.description,
        condition_id: condition.id,
        icon: condition.icon,
    })
}

fn convert_forecast(raw: OwmForecast) -> Result<Vec<ForecastEntry>, FetchError> {
    raw.list
        .into_iter()
        .map(|entry| {
            let timestamp = DateTime::from_timestamp(entry.dt, 0).ok_or_else(|| {
                FetchError::MalformedResponse(format!("bad forecast timestamp {}", entry.dt))
            })?;
            let condition = entry.weather.into_iter().next().ok_or_else(|| {
                FetchError::MalformedResponse("forecast entry without conditions".to_string())
            })?;
            Ok(ForecastEntry {
                timestamp,
                temperature: entry.main.temp,
                condition_id: condition.id,
                description: condition.description,
            })
        })
        .collect()
}

/// Parse a current-conditions response body.
pub fn parse_current(json: &str) -> Result<CurrentWeather, FetchError> {
    let raw: OwmCurrent =
        serde_json::from_str(json).map_err(|e| FetchError::MalformedResponse(e.to_string()))?;
    convert_current(raw)
}

/// Parse a forecast response body.
pub fn parse_forecast(json: &str) -> Result<Vec<ForecastEntry>, FetchError> {
    let raw: OwmForecast =
        serde_json::from_str(json).map_err(|e| FetchError::MalformedResponse(e.to_string()))?;
    convert_forecast(raw)
}
