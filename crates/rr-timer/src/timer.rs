use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use rr_types::RoastLevel;

use crate::error::TimerError;
use crate::schedule::{TaskId, TickScheduler, TickTask};

/// Countdown step length.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Coarse timer state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    /// Never configured: `total == 0`.
    Idle,
    /// Configured and waiting for `start`.
    Configured,
    /// Counting down.
    Running,
    /// Reached zero; stays here until reconfigured or reset.
    Complete,
}

/// What a delivered tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    /// One second elapsed; the countdown continues.
    Ticked { remaining: u32 },
    /// The countdown reached zero. Emitted exactly once per run.
    Completed,
}

/// Result of a `start` request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new countdown task was scheduled.
    Started(TaskId),
    /// A countdown was already in flight; nothing changed.
    AlreadyRunning,
    /// The countdown is at zero; reset or configure first.
    AlreadyComplete,
}

/// Point-in-time view of the timer for rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub level: RoastLevel,
    pub total: u32,
    pub remaining: u32,
    pub running: bool,
    pub phase: TimerPhase,
}

impl TimerSnapshot {
    /// Elapsed share of the brew, rounded to a whole percent. Zero when idle.
    pub fn progress_percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let elapsed = f64::from(self.total - self.remaining);
        (elapsed / f64::from(self.total) * 100.0).round() as u8
    }

    /// Remaining time as `m:ss`.
    pub fn display(&self) -> String {
        format!("{}:{:02}", self.remaining / 60, self.remaining % 60)
    }
}

/// Brew countdown state machine.
///
/// Durations come from [`RoastLevel::brew_secs`]. The timer owns at most one
/// tick task; `start` while a task is held does nothing, and every path that
/// leaves the running state (configure, reset, completion, drop) cancels the
/// task it holds.
#[derive(Debug)]
pub struct BrewTimer<S: TickScheduler> {
    scheduler: S,
    period: Duration,
    level: RoastLevel,
    total: u32,
    remaining: u32,
    task: Option<S::Task>,
    completions: u64,
}

impl<S: TickScheduler> BrewTimer<S> {
    /// An idle timer with `level` selected. Nothing is configured until
    /// `configure`, `reset` or `start` is called.
    pub fn new(scheduler: S, level: RoastLevel) -> Self {
        Self::with_period(scheduler, level, TICK_PERIOD)
    }

    /// Like [`BrewTimer::new`] with a custom tick spacing. Each tick still
    /// counts as one second of brew time.
    pub fn with_period(scheduler: S, level: RoastLevel, period: Duration) -> Self {
        Self {
            scheduler,
            period,
            level,
            total: 0,
            remaining: 0,
            task: None,
            completions: 0,
        }
    }

    /// Select `level` and load its duration. Cancels any running countdown.
    pub fn configure(&mut self, level: RoastLevel) {
        self.cancel_task();
        self.level = level;
        self.total = level.brew_secs();
        self.remaining = self.total;
        debug!(%level, total = self.total, "brew timer configured");
    }

    /// [`BrewTimer::configure`] from a wire name. Unknown names leave the
    /// timer untouched.
    pub fn configure_named(&mut self, name: &str) -> Result<(), TimerError> {
        match name.parse::<RoastLevel>() {
            Ok(level) => {
                self.configure(level);
                Ok(())
            }
            Err(e) => {
                debug!(name, "rejected unknown roast level");
                Err(e.into())
            }
        }
    }

    /// Begin counting down.
    ///
    /// An idle timer is configured from the selected level first. Calling
    /// `start` while running, or once the countdown has reached zero, does
    /// nothing.
    pub fn start(&mut self) -> StartOutcome {
        if self.total == 0 {
            self.configure(self.level);
        }
        if self.task.is_some() {
            return StartOutcome::AlreadyRunning;
        }
        if self.remaining == 0 {
            return StartOutcome::AlreadyComplete;
        }
        let task = self.scheduler.schedule(self.period);
        let id = task.id();
        self.task = Some(task);
        info!(level = %self.level, remaining = self.remaining, task = %id, "brew started");
        StartOutcome::Started(id)
    }

    /// Cancel any countdown and reconfigure from the selected level.
    pub fn reset(&mut self) {
        self.configure(self.level);
    }

    /// Apply one tick from task `source`.
    ///
    /// Returns `None` when `source` is not the live task (a tick queued before
    /// a cancel), otherwise the resulting event.
    pub fn tick(&mut self, source: TaskId) -> Option<TimerEvent> {
        match &self.task {
            Some(task) if task.id() == source => {}
            _ => {
                debug!(task = %source, "ignoring tick from stale task");
                return None;
            }
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return Some(TimerEvent::Ticked {
                remaining: self.remaining,
            });
        }

        self.cancel_task();
        self.completions += 1;
        info!(level = %self.level, total = self.total, "brew complete");
        Some(TimerEvent::Completed)
    }

    /// Deliver a tick from whatever task is live. `None` when not running.
    pub fn advance(&mut self) -> Option<TimerEvent> {
        let id = self.task.as_ref()?.id();
        self.tick(id)
    }

    pub fn phase(&self) -> TimerPhase {
        if self.task.is_some() {
            TimerPhase::Running
        } else if self.total == 0 {
            TimerPhase::Idle
        } else if self.remaining == 0 {
            TimerPhase::Complete
        } else {
            TimerPhase::Configured
        }
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            level: self.level,
            total: self.total,
            remaining: self.remaining,
            running: self.is_running(),
            phase: self.phase(),
        }
    }

    pub fn level(&self) -> RoastLevel {
        self.level
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Id of the live tick task, if any.
    pub fn task_id(&self) -> Option<TaskId> {
        self.task.as_ref().map(|task| task.id())
    }

    /// Completion signals fired over the life of this timer.
    pub fn completions(&self) -> u64 {
        self.completions
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    fn cancel_task(&mut self) {
        if let Some(mut task) = self.task.take() {
            task.cancel();
        }
    }
}

impl<S: TickScheduler> Drop for BrewTimer<S> {
    fn drop(&mut self) {
        self.cancel_task();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::schedule::ManualScheduler;

    fn timer() -> BrewTimer<ManualScheduler> {
        BrewTimer::new(ManualScheduler::new(), RoastLevel::Medium)
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    #[test]
    fn new_timer_is_idle() {
        let t = timer();
        assert_eq!(t.phase(), TimerPhase::Idle);
        assert_eq!((t.total(), t.remaining(), t.is_running()), (0, 0, false));
    }

    #[test]
    fn configure_loads_table_value() {
        let mut t = timer();
        for level in RoastLevel::ALL {
            t.configure(level);
            assert_eq!(t.total(), level.brew_secs());
            assert_eq!(t.remaining(), t.total());
            assert!(!t.is_running());
            assert_eq!(t.level(), level);
            assert_eq!(t.phase(), TimerPhase::Configured);
        }
    }

    #[test]
    fn configure_while_running_cancels() {
        let mut t = timer();
        t.start();
        t.advance();
        t.configure(RoastLevel::Dark);
        assert!(!t.is_running());
        assert_eq!(t.remaining(), 240);
        assert_eq!(t.scheduler().live(), 0);
    }

    #[test]
    fn unknown_level_leaves_state() {
        let mut t = timer();
        t.configure(RoastLevel::Light);
        t.start();
        t.advance();

        let err = t.configure_named("espresso").unwrap_err();
        assert_eq!(err, TimerError::UnknownRoastLevel("espresso".into()));
        assert!(t.is_running());
        assert_eq!(t.remaining(), 149);
        assert_eq!(t.level(), RoastLevel::Light);
    }

    #[test]
    fn configure_named_accepts_wire_names() {
        let mut t = timer();
        t.configure_named("dark").unwrap();
        assert_eq!(t.total(), 240);
    }

    // -----------------------------------------------------------------------
    // Start
    // -----------------------------------------------------------------------

    #[test]
    fn start_from_idle_configures_selected_level() {
        let mut t = timer();
        assert!(matches!(t.start(), StartOutcome::Started(_)));
        assert_eq!(t.total(), 210);
        assert_eq!(t.phase(), TimerPhase::Running);
        assert_eq!(t.scheduler().last_period(), Some(TICK_PERIOD));
    }

    #[test]
    fn double_start_schedules_one_countdown() {
        let mut t = timer();
        t.configure(RoastLevel::Light);
        let first = t.start();
        assert_eq!(t.start(), StartOutcome::AlreadyRunning);
        assert!(matches!(first, StartOutcome::Started(_)));
        assert_eq!(t.scheduler().scheduled(), 1);
        assert_eq!(t.scheduler().live(), 1);

        // One tick decrements once.
        assert_eq!(t.advance(), Some(TimerEvent::Ticked { remaining: 149 }));
    }

    #[test]
    fn start_at_complete_is_a_no_op() {
        let mut t = timer();
        t.configure(RoastLevel::Light);
        t.start();
        while t.advance().is_some() {}
        assert_eq!(t.phase(), TimerPhase::Complete);

        assert_eq!(t.start(), StartOutcome::AlreadyComplete);
        assert_eq!(t.scheduler().scheduled(), 1);
        assert_eq!(t.phase(), TimerPhase::Complete);
    }

    // -----------------------------------------------------------------------
    // Countdown
    // -----------------------------------------------------------------------

    #[test]
    fn light_brew_completes_once_after_150_ticks() {
        let mut t = timer();
        t.configure(RoastLevel::Light);
        assert_eq!((t.total(), t.remaining()), (150, 150));
        t.start();

        let mut completed = 0;
        for _ in 0..150 {
            if t.advance() == Some(TimerEvent::Completed) {
                completed += 1;
            }
        }
        assert_eq!(completed, 1);
        assert_eq!(t.remaining(), 0);
        assert_eq!(t.phase(), TimerPhase::Complete);
        assert!(!t.is_running());
        assert_eq!(t.completions(), 1);
        assert_eq!(t.scheduler().live(), 0);

        // Further ticks do nothing.
        assert_eq!(t.advance(), None);
        assert_eq!(t.completions(), 1);
    }

    #[test]
    fn stale_ticks_are_ignored() {
        let mut t = timer();
        let StartOutcome::Started(old) = t.start() else {
            panic!("expected start");
        };
        t.reset();
        let StartOutcome::Started(new) = t.start() else {
            panic!("expected restart");
        };
        assert_ne!(old, new);

        assert_eq!(t.tick(old), None);
        assert_eq!(t.remaining(), 210);
        assert_eq!(t.tick(new), Some(TimerEvent::Ticked { remaining: 209 }));
    }

    #[test]
    fn reset_restores_selected_duration() {
        let mut t = timer();
        t.configure(RoastLevel::Dark);
        t.start();
        for _ in 0..30 {
            t.advance();
        }
        t.reset();
        assert_eq!(t.remaining(), 240);
        assert!(!t.is_running());
        assert_eq!(t.scheduler().live(), 0);
    }

    #[test]
    fn reset_after_complete_allows_rerun() {
        let mut t = timer();
        t.configure(RoastLevel::Light);
        t.start();
        while t.advance().is_some() {}
        t.reset();
        assert!(matches!(t.start(), StartOutcome::Started(_)));
        assert_eq!(t.scheduler().scheduled(), 2);
    }

    #[test]
    fn drop_cancels_live_task() {
        let mut t = timer();
        t.start();
        let live = t.scheduler().live_gauge();
        assert_eq!(live.load(Ordering::SeqCst), 1);
        drop(t);
        assert_eq!(live.load(Ordering::SeqCst), 0);
    }

    // -----------------------------------------------------------------------
    // Snapshot
    // -----------------------------------------------------------------------

    #[test]
    fn snapshot_progress_and_display() {
        let mut t = timer();
        assert_eq!(t.snapshot().progress_percent(), 0);
        assert_eq!(t.snapshot().display(), "0:00");

        t.configure(RoastLevel::Medium);
        let s = t.snapshot();
        assert_eq!(s.display(), "3:30");
        assert_eq!(s.progress_percent(), 0);

        t.start();
        for _ in 0..105 {
            t.advance();
        }
        let s = t.snapshot();
        assert_eq!(s.remaining, 105);
        assert_eq!(s.progress_percent(), 50);
        assert_eq!(s.display(), "1:45");
        assert!(s.running);
        assert_eq!(s.phase, TimerPhase::Running);
    }
}
