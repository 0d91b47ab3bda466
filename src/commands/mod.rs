//! One-shot command handlers.
//!
//! Each command loads the configuration, prints its result through the
//! [`Log`](crate::logger::Log) facade and exits without starting the frame.

pub mod astral;
pub mod calendars;

use anyhow::Result;
use std::path::Path;

use crate::config::Config;

/// Load the configuration from an explicit path, or the default location.
pub(crate) fn load_config(config_path: Option<&Path>) -> Result<(Config, std::path::PathBuf)> {
    match config_path {
        Some(path) => Ok((Config::load_from_path(path)?, path.to_path_buf())),
        None => Ok((Config::load()?, Config::get_config_path()?)),
    }
}
