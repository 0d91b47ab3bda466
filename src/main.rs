//! Main entry point for photoframe.
//!
//! Parses arguments, dispatches one-shot commands, and otherwise runs the
//! frame: take the instance lock, load the configuration, schedule every
//! widget and drive the scheduler until a shutdown signal arrives.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::{Duration, Instant};

use photoframe::args::{CliAction, ParsedArgs, display_help, display_version_info};
use photoframe::commands;
use photoframe::config::Config;
use photoframe::constants::{CHECK_INTERVAL_MS, EXIT_FAILURE};
use photoframe::frame::{Frame, FrameSources};
use photoframe::lock::{InstanceLock, default_lock_path};
use photoframe::logger::Log;
use photoframe::render::{LogSink, Sinks};
use photoframe::signals::{SignalMessage, setup_signal_handler};
use photoframe::status::StatusFileSink;
use photoframe::utils::path_for_display;

const CHECK_INTERVAL: Duration = Duration::from_millis(CHECK_INTERVAL_MS);

fn main() -> Result<()> {
    match ParsedArgs::from_env().action {
        CliAction::ShowVersion => {
            display_version_info();
            Ok(())
        }
        CliAction::ShowHelp => {
            display_help();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::Astral { date, config_path } => {
            commands::astral::handle_astral_command(date, config_path.as_deref())
        }
        CliAction::ListCalendars { config_path } => {
            commands::calendars::handle_list_calendars_command(config_path.as_deref())
        }
        CliAction::Run {
            debug_enabled,
            config_path,
        } => run_frame(debug_enabled, config_path.as_deref()),
    }
}

fn run_frame(debug_enabled: bool, config_path: Option<&Path>) -> Result<()> {
    Log::set_debug(debug_enabled);
    Log::log_version();

    let lock_path = default_lock_path();
    let Some(lock) = InstanceLock::acquire(&lock_path)? else {
        let holder = InstanceLock::read_pid(&lock_path)
            .map(|pid| format!(" (PID {})", pid))
            .unwrap_or_default();
        Log::log_error(&format!("photoframe is already running{}", holder));
        Log::log_end();
        std::process::exit(EXIT_FAILURE);
    };
    Log::log_decorated("Lock acquired, starting photoframe...");

    let result = run_with_lock(debug_enabled, config_path);

    lock.release();
    Log::log_end();
    result
}

fn run_with_lock(debug_enabled: bool, config_path: Option<&Path>) -> Result<()> {
    let (config, resolved_path) = match config_path {
        Some(path) => (Config::load_from_path(path)?, path.to_path_buf()),
        None => (Config::load()?, Config::get_config_path()?),
    };
    config.log_config(&resolved_path);

    let location = config.location().context("invalid location")?;
    let signal_state = setup_signal_handler(debug_enabled)?;

    let mut sinks = Sinks::new();
    sinks.push(Box::new(LogSink));
    if let Some(status_file) = config.status_file() {
        let status_sink = StatusFileSink::new(status_file);
        Log::log_decorated(&format!(
            "Writing widget state to {}",
            path_for_display(status_sink.path())
        ));
        sinks.push(Box::new(status_sink));
    }

    let sources = FrameSources::from_config(&config)?;

    Log::log_block_start("Starting widgets");
    let mut frame = Frame::build(&config, location, sources, Instant::now(), &mut sinks);
    Log::log_decorated(&format!("{} widgets running", frame.widget_count()));

    'main: while signal_state.running.load(Ordering::SeqCst) {
        while let Ok(message) = signal_state.signal_receiver.try_recv() {
            match message {
                SignalMessage::ShowForecast => frame.show_forecast(Instant::now(), &mut sinks),
                SignalMessage::Shutdown => break 'main,
            }
        }

        let now = Instant::now();
        frame.run_due(now, &mut sinks);

        // Background fetches are only picked up on a pass, so never sleep
        // longer than the check interval.
        let sleep_for = frame
            .next_wakeup()
            .map(|at| at.saturating_duration_since(Instant::now()))
            .unwrap_or(CHECK_INTERVAL)
            .min(CHECK_INTERVAL);
        if !sleep_for.is_zero() {
            thread::sleep(sleep_for);
        }
    }

    Log::log_block_start("Shutting down...");
    frame.shutdown();
    Ok(())
}
