//! Periodic refresh scheduling for every widget.
//!
//! Each widget is registered as its own [`RefreshTask`] with a fixed interval.
//! The main loop calls [`Scheduler::run_due`] with the current instant; every
//! task whose time has come gets one `on_tick`, then its next due time moves
//! forward by exactly one interval. Tasks never see each other, so a widget
//! that is slow or failing cannot shift anyone else's schedule.
//!
//! Besides the periodic tick a widget may expose a one-shot deadline (the
//! forecast overlay's auto-hide) and may have background results to apply,
//! which the scheduler polls on every pass.

use std::time::{Duration, Instant};

use crate::logger::Log;
use crate::render::RenderSink;

/// Capability shared by every widget the scheduler drives.
pub trait Refreshable {
    /// Short tag used in log lines.
    fn name(&self) -> &'static str;

    /// Called once when the task is scheduled. Defaults to an immediate refresh.
    fn start(&mut self, now: Instant, sink: &mut dyn RenderSink) {
        self.on_tick(now, sink);
    }

    /// Periodic refresh.
    fn on_tick(&mut self, now: Instant, sink: &mut dyn RenderSink);

    /// Apply results that finished in the background since the last pass.
    fn poll(&mut self, _sink: &mut dyn RenderSink) {}

    /// Pending one-shot deadline, if any.
    fn deadline(&self) -> Option<Instant> {
        None
    }

    /// Called once the deadline has passed.
    fn on_deadline(&mut self, _now: Instant, _sink: &mut dyn RenderSink) {}

    /// Release resources. No further calls follow.
    fn stop(&mut self) {}
}

/// Handle returned by [`Scheduler::schedule`], used to cancel or inspect a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

struct RefreshTask {
    handle: TaskHandle,
    interval: Duration,
    next_due: Instant,
    widget: Box<dyn Refreshable>,
}

impl RefreshTask {
    /// Move to the next period. If the loop fell behind by more than one
    /// interval, skip the missed periods instead of firing a burst.
    fn advance(&mut self, now: Instant) {
        self.next_due += self.interval;
        if self.next_due <= now {
            self.next_due = now + self.interval;
        }
    }
}

#[derive(Default)]
pub struct Scheduler {
    tasks: Vec<RefreshTask>,
    next_handle: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a widget to refresh every `interval`, starting it right away.
    ///
    /// The first periodic tick is due one interval after `now`.
    pub fn schedule(
        &mut self,
        mut widget: Box<dyn Refreshable>,
        interval: Duration,
        now: Instant,
        sink: &mut dyn RenderSink,
    ) -> TaskHandle {
        let interval = interval.max(Duration::from_millis(1));
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;

        Log::log_debug(&format!(
            "Scheduling {} every {:.1}s",
            widget.name(),
            interval.as_secs_f64()
        ));
        widget.start(now, sink);

        self.tasks.push(RefreshTask {
            handle,
            interval,
            next_due: now + interval,
            widget,
        });
        handle
    }

    /// Stop and remove a task. Returns false if the handle is unknown.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        match self.tasks.iter().position(|t| t.handle == handle) {
            Some(index) => {
                let mut task = self.tasks.remove(index);
                task.widget.stop();
                true
            }
            None => false,
        }
    }

    /// Run one pass: apply background results, expire deadlines, then tick
    /// every task that is due. Returns the number of ticks fired.
    pub fn run_due(&mut self, now: Instant, sink: &mut dyn RenderSink) -> usize {
        let mut fired = 0;
        for task in &mut self.tasks {
            task.widget.poll(sink);

            if task.widget.deadline().is_some_and(|deadline| deadline <= now) {
                task.widget.on_deadline(now, sink);
            }

            if task.next_due <= now {
                task.widget.on_tick(now, sink);
                task.advance(now);
                fired += 1;
            }
        }
        fired
    }

    /// Tick a task immediately without touching its periodic schedule.
    pub fn fire_now(&mut self, handle: TaskHandle, now: Instant, sink: &mut dyn RenderSink) -> bool {
        match self.tasks.iter_mut().find(|t| t.handle == handle) {
            Some(task) => {
                task.widget.on_tick(now, sink);
                true
            }
            None => false,
        }
    }

    /// When the task is next due, if it exists.
    pub fn next_due(&self, handle: TaskHandle) -> Option<Instant> {
        self.tasks
            .iter()
            .find(|t| t.handle == handle)
            .map(|t| t.next_due)
    }

    /// Earliest instant at which anything needs to run.
    pub fn next_wakeup(&self) -> Option<Instant> {
        self.tasks
            .iter()
            .flat_map(|t| std::iter::once(t.next_due).chain(t.widget.deadline()))
            .min()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Cancel every task.
    pub fn shutdown(&mut self) {
        for mut task in self.tasks.drain(..) {
            Log::log_debug(&format!("Stopping {}", task.widget.name()));
            task.widget.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::WidgetUpdate;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Counters {
        started: usize,
        ticks: usize,
        stopped: bool,
    }

    struct Counting(Rc<RefCell<Counters>>);

    impl Refreshable for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }
        fn start(&mut self, _now: Instant, _sink: &mut dyn RenderSink) {
            self.0.borrow_mut().started += 1;
        }
        fn on_tick(&mut self, _now: Instant, _sink: &mut dyn RenderSink) {
            self.0.borrow_mut().ticks += 1;
        }
        fn stop(&mut self) {
            self.0.borrow_mut().stopped = true;
        }
    }

    struct NullSink;
    impl RenderSink for NullSink {
        fn render(&mut self, _update: &WidgetUpdate) {}
    }

    fn counting() -> (Box<dyn Refreshable>, Rc<RefCell<Counters>>) {
        let counters = Rc::new(RefCell::new(Counters::default()));
        (Box::new(Counting(counters.clone())), counters)
    }

    #[test]
    fn test_fires_on_period() {
        let t0 = Instant::now();
        let mut scheduler = Scheduler::new();
        let (widget, counters) = counting();
        let handle = scheduler.schedule(widget, Duration::from_secs(10), t0, &mut NullSink);

        assert_eq!(counters.borrow().started, 1);
        assert_eq!(scheduler.run_due(t0 + Duration::from_secs(9), &mut NullSink), 0);
        assert_eq!(scheduler.run_due(t0 + Duration::from_secs(10), &mut NullSink), 1);
        assert_eq!(scheduler.next_due(handle), Some(t0 + Duration::from_secs(20)));
        assert_eq!(counters.borrow().ticks, 1);
    }

    #[test]
    fn test_late_pass_skips_missed_periods() {
        let t0 = Instant::now();
        let mut scheduler = Scheduler::new();
        let (widget, counters) = counting();
        let handle = scheduler.schedule(widget, Duration::from_secs(1), t0, &mut NullSink);

        let late = t0 + Duration::from_millis(5500);
        assert_eq!(scheduler.run_due(late, &mut NullSink), 1);
        assert_eq!(counters.borrow().ticks, 1);
        assert_eq!(scheduler.next_due(handle), Some(late + Duration::from_secs(1)));
    }

    #[test]
    fn test_fire_now_keeps_schedule() {
        let t0 = Instant::now();
        let mut scheduler = Scheduler::new();
        let (widget, counters) = counting();
        let handle = scheduler.schedule(widget, Duration::from_secs(30), t0, &mut NullSink);

        assert!(scheduler.fire_now(handle, t0 + Duration::from_secs(5), &mut NullSink));
        assert_eq!(counters.borrow().ticks, 1);
        assert_eq!(scheduler.next_due(handle), Some(t0 + Duration::from_secs(30)));
    }

    #[test]
    fn test_cancel_stops_widget() {
        let t0 = Instant::now();
        let mut scheduler = Scheduler::new();
        let (widget, counters) = counting();
        let handle = scheduler.schedule(widget, Duration::from_secs(1), t0, &mut NullSink);

        assert!(scheduler.cancel(handle));
        assert!(counters.borrow().stopped);
        assert!(!scheduler.cancel(handle));
        assert_eq!(scheduler.run_due(t0 + Duration::from_secs(5), &mut NullSink), 0);
        assert_eq!(scheduler.next_due(handle), None);
    }

    #[test]
    fn test_next_wakeup_is_earliest() {
        let t0 = Instant::now();
        let mut scheduler = Scheduler::new();
        assert_eq!(scheduler.next_wakeup(), None);
        let (slow, _) = counting();
        let (fast, _) = counting();
        scheduler.schedule(slow, Duration::from_secs(60), t0, &mut NullSink);
        scheduler.schedule(fast, Duration::from_secs(2), t0, &mut NullSink);
        assert_eq!(scheduler.next_wakeup(), Some(t0 + Duration::from_secs(2)));
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let t0 = Instant::now();
        let mut scheduler = Scheduler::new();
        let (widget, _) = counting();
        let handle = scheduler.schedule(widget, Duration::ZERO, t0, &mut NullSink);
        assert_eq!(scheduler.next_due(handle), Some(t0 + Duration::from_millis(1)));
    }

    #[test]
    fn test_shutdown_stops_everything() {
        let t0 = Instant::now();
        let mut scheduler = Scheduler::new();
        let (a, a_counters) = counting();
        let (b, b_counters) = counting();
        scheduler.schedule(a, Duration::from_secs(1), t0, &mut NullSink);
        scheduler.schedule(b, Duration::from_secs(1), t0, &mut NullSink);

        scheduler.shutdown();
        assert!(scheduler.is_empty());
        assert!(a_counters.borrow().stopped);
        assert!(b_counters.borrow().stopped);
    }
}
