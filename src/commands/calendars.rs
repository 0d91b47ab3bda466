//! Implementation of the --list-calendars command.
//!
//! Lists every calendar the configured token can read, so their ids can be
//! copied into `calendar_ids`.

use anyhow::{Result, bail};
use std::path::Path;

use crate::constants::ENV_CALENDAR_TOKEN;
use crate::logger::Log;
use crate::sources::calendar::CalendarSource;
use crate::sources::google_calendar::GoogleCalendarClient;

pub fn handle_list_calendars_command(config_path: Option<&Path>) -> Result<()> {
    Log::log_version();

    let (config, _) = super::load_config(config_path)?;

    let client = match (&config.calendar_token, config.calendar_token_file()) {
        (Some(token), _) => GoogleCalendarClient::new(token.as_str())?,
        (None, Some(path)) => GoogleCalendarClient::from_token_file(&path)?,
        (None, None) => bail!(
            "No calendar token configured. Set {} or calendar_token_file.",
            ENV_CALENDAR_TOKEN
        ),
    };

    let calendars = client.list_calendars()?;
    if calendars.is_empty() {
        Log::log_block_start("No calendars visible to this account");
    } else {
        Log::log_block_start(&format!("{} calendars:", calendars.len()));
        let configured = config.calendar_ids();
        for calendar in &calendars {
            let marker = if configured.contains(&calendar.id) {
                " (configured)"
            } else {
                ""
            };
            Log::log_indented(&format!("{}: {}{}", calendar.summary, calendar.id, marker));
        }
    }

    Log::log_end();
    Ok(())
}
