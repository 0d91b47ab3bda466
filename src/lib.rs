//! # Photoframe
//!
//! A digital photo frame for a wall-mounted display. Photoframe rotates local
//! photos and keeps a set of overlays current: clock, weather and forecast,
//! upcoming calendar events, and sun and moon data.
//!
//! ## Architecture
//!
//! - **config**: Configuration loading, validation, and default generation
//! - **constants**: Application-wide constants and defaults
//! - **frame**: Wires the configured widgets into the scheduler
//! - **geo**: Sunrise/sunset, lunar phase and timezone calculations
//! - **lock**: Single-instance lock file
//! - **logger**: Structured logging with visual formatting
//! - **render**: Widget updates and the sinks that display them
//! - **scheduler**: Per-widget refresh timers driven from one loop
//! - **sources**: Photo directory, OpenWeatherMap and Google Calendar clients
//! - **widgets**: The refreshable pieces of the display
//! - **worker**: Background fetches that never block the loop

pub mod args;
pub mod commands;
pub mod config;
pub mod constants;
pub mod frame;
pub mod geo;
pub mod lock;
pub mod logger;
pub mod render;
pub mod scheduler;
pub mod signals;
pub mod sources;
pub mod status;
pub mod utils;
pub mod widgets;
pub mod worker;

// Re-export important types for easier access
pub use config::Config;
pub use frame::{Frame, FrameSources};
pub use geo::{AstralSnapshot, Location};
pub use logger::{Log, LogLevel};
pub use render::{RenderSink, WidgetUpdate};
pub use scheduler::{Refreshable, Scheduler, TaskHandle};
