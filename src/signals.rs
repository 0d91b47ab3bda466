//! Signal handling for the running frame.
//!
//! A background thread turns POSIX signals into [`SignalMessage`]s on a
//! channel the main loop drains between passes:
//! - SIGINT, SIGTERM, SIGHUP: shut down cleanly
//! - SIGUSR1: pop the forecast overlay up now

use anyhow::{Context, Result};
use signal_hook::{
    consts::signal::{SIGHUP, SIGINT, SIGTERM, SIGUSR1},
    iterator::Signals,
};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
    mpsc::{self, Receiver},
};
use std::thread;

use crate::logger::Log;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalMessage {
    /// Show the forecast overlay immediately (SIGUSR1).
    ShowForecast,
    /// Stop the frame (SIGTERM, SIGINT, SIGHUP).
    Shutdown,
}

/// Signal handling state shared between threads.
pub struct SignalState {
    /// Cleared once a shutdown signal arrives.
    pub running: Arc<AtomicBool>,
    pub signal_receiver: Receiver<SignalMessage>,
}

/// Map a raw signal number to the message it produces.
pub fn message_for_signal(signal: i32) -> Option<SignalMessage> {
    match signal {
        SIGUSR1 => Some(SignalMessage::ShowForecast),
        SIGINT | SIGTERM | SIGHUP => Some(SignalMessage::Shutdown),
        _ => None,
    }
}

fn shutdown_description(signal: i32, debug_enabled: bool) -> &'static str {
    match signal {
        SIGINT if debug_enabled => "Received SIGINT (Ctrl+C), initiating graceful shutdown...",
        SIGINT => "Received interrupt signal, initiating graceful shutdown...",
        SIGTERM => "Received termination request, initiating graceful shutdown...",
        SIGHUP => "Received hangup signal, initiating graceful shutdown...",
        _ => "Received shutdown signal, initiating graceful shutdown...",
    }
}

/// Register the handlers and spawn the listener thread.
pub fn setup_signal_handler(debug_enabled: bool) -> Result<SignalState> {
    let running = Arc::new(AtomicBool::new(true));
    let (signal_sender, signal_receiver) = mpsc::channel::<SignalMessage>();

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP, SIGUSR1])
        .context("failed to register signal handlers")?;

    let running_clone = Arc::clone(&running);

    thread::Builder::new()
        .name("signals".to_string())
        .spawn(move || {
            for sig in signals.forever() {
                let Some(message) = message_for_signal(sig) else {
                    continue;
                };

                match message {
                    SignalMessage::ShowForecast => {
                        Log::log_pipe();
                        Log::log_decorated("Received forecast signal");
                    }
                    SignalMessage::Shutdown => {
                        Log::log_pipe();
                        Log::log_decorated(shutdown_description(sig, debug_enabled));
                        running_clone.store(false, Ordering::SeqCst);
                    }
                }

                if signal_sender.send(message).is_err() {
                    // Main loop is gone; nothing left to notify.
                    break;
                }
            }
        })
        .context("failed to spawn signal handler thread")?;

    Ok(SignalState {
        running,
        signal_receiver,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_mapping() {
        assert_eq!(message_for_signal(SIGUSR1), Some(SignalMessage::ShowForecast));
        assert_eq!(message_for_signal(SIGINT), Some(SignalMessage::Shutdown));
        assert_eq!(message_for_signal(SIGTERM), Some(SignalMessage::Shutdown));
        assert_eq!(message_for_signal(SIGHUP), Some(SignalMessage::Shutdown));
        assert_eq!(message_for_signal(0), None);
    }

    #[test]
    fn test_shutdown_descriptions() {
        assert!(shutdown_description(SIGINT, true).contains("Ctrl+C"));
        assert!(!shutdown_description(SIGINT, false).contains("Ctrl+C"));
        assert!(shutdown_description(SIGHUP, false).contains("hangup"));
    }
}
