//! Show/auto-hide policy of the forecast overlay.

use std::time::{Duration, Instant};

use crate::logger::{Log, LogLevel};
use crate::render::{RenderSink, WidgetUpdate};
use crate::scheduler::Refreshable;

/// Visibility of the overlay. A visible overlay always carries its hide deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayState {
    #[default]
    Hidden,
    Visible { hide_at: Instant },
}

impl OverlayState {
    /// Hidden -> Visible, hiding again after `duration`. Ignored while visible,
    /// so the existing deadline stays put. Returns true on a transition.
    pub fn show(&mut self, now: Instant, duration: Duration) -> bool {
        match self {
            OverlayState::Hidden => {
                *self = OverlayState::Visible {
                    hide_at: now + duration,
                };
                true
            }
            OverlayState::Visible { .. } => false,
        }
    }

    /// Visible -> Hidden once the deadline has passed. Returns true on a transition.
    pub fn hide_if_due(&mut self, now: Instant) -> bool {
        match *self {
            OverlayState::Visible { hide_at } if hide_at <= now => {
                *self = OverlayState::Hidden;
                true
            }
            _ => false,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self {
            OverlayState::Visible { hide_at } => Some(*hide_at),
            OverlayState::Hidden => None,
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, OverlayState::Visible { .. })
    }
}

/// Periodically pops the forecast up over the photo for a fixed duration.
///
/// Scheduled on the show interval; the hide is a one-shot deadline.
pub struct ForecastOverlay {
    display_duration: Duration,
    state: OverlayState,
}

impl ForecastOverlay {
    pub fn new(display_duration: Duration) -> Self {
        Self {
            display_duration,
            state: OverlayState::Hidden,
        }
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }
}

impl Refreshable for ForecastOverlay {
    fn name(&self) -> &'static str {
        "overlay"
    }

    fn start(&mut self, _now: Instant, sink: &mut dyn RenderSink) {
        self.state = OverlayState::Hidden;
        sink.render(&WidgetUpdate::ForecastVisibility { visible: false });
    }

    fn on_tick(&mut self, now: Instant, sink: &mut dyn RenderSink) {
        if self.state.show(now, self.display_duration) {
            sink.render(&WidgetUpdate::ForecastVisibility { visible: true });
        } else {
            Log::log_widget(LogLevel::Log, self.name(), "Already visible, deadline unchanged");
        }
    }

    fn deadline(&self) -> Option<Instant> {
        self.state.deadline()
    }

    fn on_deadline(&mut self, now: Instant, sink: &mut dyn RenderSink) {
        if self.state.hide_if_due(now) {
            sink.render(&WidgetUpdate::ForecastVisibility { visible: false });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_then_hide() {
        let t0 = Instant::now();
        let mut state = OverlayState::default();
        assert!(!state.is_visible());

        assert!(state.show(t0, Duration::from_secs(30)));
        assert_eq!(state.deadline(), Some(t0 + Duration::from_secs(30)));

        assert!(!state.hide_if_due(t0 + Duration::from_secs(29)));
        assert!(state.hide_if_due(t0 + Duration::from_secs(30)));
        assert_eq!(state, OverlayState::Hidden);
    }

    #[test]
    fn test_show_while_visible_keeps_deadline() {
        let t0 = Instant::now();
        let mut state = OverlayState::default();
        state.show(t0, Duration::from_secs(30));
        assert!(!state.show(t0 + Duration::from_secs(20), Duration::from_secs(30)));
        assert_eq!(state.deadline(), Some(t0 + Duration::from_secs(30)));
    }

    #[test]
    fn test_hide_when_hidden_is_noop() {
        let mut state = OverlayState::Hidden;
        assert!(!state.hide_if_due(Instant::now()));
    }
}
