//! Command-line argument parsing.
//!
//! Turns the raw argument list into a single [`CliAction`] for `main` to act
//! on. Unknown options and malformed values produce `ShowHelpDueToError`
//! rather than an error, after a warning naming the offending argument.

use chrono::NaiveDate;
use std::path::PathBuf;

use crate::logger::Log;

/// What the invocation asked for.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run the photo frame.
    Run {
        debug_enabled: bool,
        config_path: Option<PathBuf>,
    },
    /// Print the sun/moon snapshot for a date (today when `None`) and exit.
    Astral {
        date: Option<NaiveDate>,
        config_path: Option<PathBuf>,
    },
    /// Print the calendars visible to the configured account and exit.
    ListCalendars { config_path: Option<PathBuf> },
    ShowHelp,
    ShowVersion,
    /// Show help due to unknown or malformed arguments and exit.
    ShowHelpDueToError,
}

pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse arguments; the first item is the program name and is skipped.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut debug_enabled = false;
        let mut display_help = false;
        let mut display_version = false;
        let mut run_astral = false;
        let mut astral_date: Option<NaiveDate> = None;
        let mut list_calendars = false;
        let mut config_path: Option<PathBuf> = None;
        let mut error_found = false;

        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let mut i = 0;
        while i < args_vec.len() {
            let arg_str = &args_vec[i];
            match arg_str.as_str() {
                "--help" | "-h" => display_help = true,
                "--version" | "-V" | "-v" => display_version = true,
                "--debug" | "-d" => debug_enabled = true,
                "--list-calendars" | "-l" => list_calendars = true,
                "--config" | "-c" => match args_vec.get(i + 1) {
                    Some(path) if !path.starts_with('-') => {
                        config_path = Some(PathBuf::from(path));
                        i += 1;
                    }
                    _ => {
                        Log::log_warning("Missing path for --config. Usage: --config <file>");
                        error_found = true;
                    }
                },
                "--astral" | "-a" => {
                    run_astral = true;
                    // Optional date argument
                    if let Some(next) = args_vec.get(i + 1).filter(|a| !a.starts_with('-')) {
                        match NaiveDate::parse_from_str(next, "%Y-%m-%d") {
                            Ok(date) => astral_date = Some(date),
                            Err(_) => {
                                Log::log_warning(&format!(
                                    "Invalid date: {} (expected YYYY-MM-DD)",
                                    next
                                ));
                                error_found = true;
                            }
                        }
                        i += 1;
                    }
                }
                _ => {
                    if arg_str.starts_with('-') {
                        Log::log_warning(&format!("Unknown option: {}", arg_str));
                    } else {
                        Log::log_warning(&format!("Unexpected argument: {}", arg_str));
                    }
                    error_found = true;
                }
            }
            i += 1;
        }

        let action = if display_version {
            CliAction::ShowVersion
        } else if error_found {
            CliAction::ShowHelpDueToError
        } else if display_help {
            CliAction::ShowHelp
        } else if run_astral {
            CliAction::Astral {
                date: astral_date,
                config_path,
            }
        } else if list_calendars {
            CliAction::ListCalendars { config_path }
        } else {
            CliAction::Run {
                debug_enabled,
                config_path,
            }
        };

        ParsedArgs { action }
    }

    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

pub fn display_version_info() {
    Log::log_version();
    Log::log_pipe();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

pub fn display_help() {
    Log::log_version();
    Log::log_block_start(env!("CARGO_PKG_DESCRIPTION"));
    Log::log_block_start("Usage: photoframe [OPTIONS]");
    Log::log_block_start("Options:");
    Log::log_indented("-a, --astral [YYYY-MM-DD]  Print sun and moon data and exit");
    Log::log_indented("-c, --config <file>        Use this configuration file");
    Log::log_indented("-d, --debug                Enable detailed debug output");
    Log::log_indented("-h, --help                 Print help information");
    Log::log_indented("-l, --list-calendars       List calendars visible to the account");
    Log::log_indented("-V, --version              Print version information");
    Log::log_end();
}
