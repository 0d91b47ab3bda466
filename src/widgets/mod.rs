//! The widgets driven by the scheduler.
//!
//! Every widget owns its own state and implements
//! [`Refreshable`](crate::scheduler::Refreshable). Widgets backed by a network
//! source fetch on a [`Worker`](crate::worker::Worker) thread and render when
//! the result is polled, falling back to placeholder text on failure.

pub mod astral;
pub mod calendar;
pub mod clock;
pub mod forecast;
pub mod overlay;
pub mod photos;
pub mod weather;

pub use astral::AstralWidget;
pub use calendar::CalendarWidget;
pub use clock::ClockWidget;
pub use forecast::ForecastWidget;
pub use overlay::{ForecastOverlay, OverlayState};
pub use photos::{PhotoRotation, PhotoWidget};
pub use weather::WeatherWidget;
