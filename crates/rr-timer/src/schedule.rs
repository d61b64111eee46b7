use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Identity of a scheduled tick task. Ticks carry the id of the task that
/// produced them so the timer can ignore ticks from a cancelled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

/// Handle to a recurring tick source.
pub trait TickTask {
    fn id(&self) -> TaskId;

    /// Stop producing ticks. Idempotent.
    fn cancel(&mut self);

    fn is_cancelled(&self) -> bool;
}

/// Factory for recurring tick tasks.
pub trait TickScheduler {
    type Task: TickTask;

    /// Begin producing a tick every `period`. The first tick arrives one
    /// period after scheduling, not immediately.
    fn schedule(&mut self, period: Duration) -> Self::Task;
}

/// Scheduler whose ticks are delivered by the caller.
///
/// Keeps counts of scheduled and live tasks so tests can check that a timer
/// never runs two countdowns and never leaks one.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    scheduled: u64,
    live: Arc<AtomicUsize>,
    last_period: Option<Duration>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks handed out so far.
    pub fn scheduled(&self) -> u64 {
        self.scheduled
    }

    /// Tasks handed out and not yet cancelled.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Shared live-task counter; stays readable after the scheduler is
    /// moved into or dropped with its owner.
    pub fn live_gauge(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.live)
    }

    /// Period requested by the most recent `schedule` call.
    pub fn last_period(&self) -> Option<Duration> {
        self.last_period
    }
}

impl TickScheduler for ManualScheduler {
    type Task = ManualTask;

    fn schedule(&mut self, period: Duration) -> ManualTask {
        self.next_id += 1;
        self.scheduled += 1;
        self.last_period = Some(period);
        self.live.fetch_add(1, Ordering::SeqCst);
        ManualTask {
            id: TaskId(self.next_id),
            live: Arc::clone(&self.live),
            cancelled: false,
        }
    }
}

/// Task handed out by [`ManualScheduler`]. Dropping it cancels it.
#[derive(Debug)]
pub struct ManualTask {
    id: TaskId,
    live: Arc<AtomicUsize>,
    cancelled: bool,
}

impl TickTask for ManualTask {
    fn id(&self) -> TaskId {
        self.id
    }

    fn cancel(&mut self) {
        if !self.cancelled {
            self.cancelled = true;
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl Drop for ManualTask {
    fn drop(&mut self) {
        self.cancel();
    }
}
