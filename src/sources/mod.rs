//! External data sources consumed by the widgets.
//!
//! Each source sits behind a small trait so widgets can be driven by fakes in
//! tests:
//! - **photos**: directory scan for displayable images
//! - **weather**: current conditions and the 3-hourly forecast
//! - **calendar**: upcoming events merged across several calendars
//!
//! The concrete network clients (`openweather`, `google_calendar`) share one
//! HTTP agent with fixed timeouts. Every failure surfaces as a [`FetchError`],
//! which widgets catch and turn into placeholder text.

pub mod calendar;
pub mod google_calendar;
pub mod openweather;
pub mod photos;
pub mod weather;

use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

use crate::constants::HTTP_TIMEOUT_SECS;

/// Failure to obtain data from an external source.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// Network, timeout, or HTTP status error.
    #[error("data source unavailable: {0}")]
    DataSourceUnavailable(String),
    /// The source answered, but not with what we expected.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl From<ureq::Error> for FetchError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, response) => FetchError::DataSourceUnavailable(format!(
                "HTTP {} {}",
                code,
                response.status_text()
            )),
            ureq::Error::Transport(transport) => {
                FetchError::DataSourceUnavailable(transport.to_string())
            }
        }
    }
}

/// Shared HTTP agent with consistent timeouts.
pub(crate) fn agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let timeout = Duration::from_secs(HTTP_TIMEOUT_SECS);
        ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .timeout_write(timeout)
            .build()
    })
}

/// Read a response body and decode it as JSON.
pub(crate) fn read_json<T: serde::de::DeserializeOwned>(
    response: ureq::Response,
) -> Result<T, FetchError> {
    let body = response
        .into_string()
        .map_err(|e| FetchError::DataSourceUnavailable(e.to_string()))?;
    serde_json::from_str(&body).map_err(|e| FetchError::MalformedResponse(e.to_string()))
}
