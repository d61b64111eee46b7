use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use crate::schedule::{TaskId, TickScheduler, TickTask};

/// Scheduler backed by tokio interval tasks.
///
/// Each tick is turned into a host message with `wrap` and sent on `tx`, so
/// ticks are processed by the same event loop, in the same order, as every
/// other action. `schedule` must be called from within a tokio runtime.
pub struct IntervalScheduler<M> {
    tx: mpsc::UnboundedSender<M>,
    wrap: fn(TaskId) -> M,
    next_id: u64,
}

impl<M> IntervalScheduler<M> {
    pub fn new(tx: mpsc::UnboundedSender<M>, wrap: fn(TaskId) -> M) -> Self {
        Self {
            tx,
            wrap,
            next_id: 0,
        }
    }
}

impl<M> std::fmt::Debug for IntervalScheduler<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntervalScheduler")
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl<M: Send + 'static> TickScheduler for IntervalScheduler<M> {
    type Task = IntervalTask;

    fn schedule(&mut self, period: Duration) -> IntervalTask {
        self.next_id += 1;
        let id = TaskId(self.next_id);
        let tx = self.tx.clone();
        let wrap = self.wrap;

        let handle = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                if tx.send(wrap(id)).is_err() {
                    debug!(task = %id, "tick receiver closed; stopping");
                    break;
                }
            }
        });

        debug!(task = %id, period_ms = period.as_millis() as u64, "tick task scheduled");
        IntervalTask {
            id,
            handle: Some(handle),
        }
    }
}

/// Handle to a running tokio interval. Cancelling or dropping it aborts the
/// task.
#[derive(Debug)]
pub struct IntervalTask {
    id: TaskId,
    handle: Option<JoinHandle<()>>,
}

impl TickTask for IntervalTask {
    fn id(&self) -> TaskId {
        self.id
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!(task = %self.id, "tick task cancelled");
        }
    }

    fn is_cancelled(&self) -> bool {
        self.handle.is_none()
    }
}

impl Drop for IntervalTask {
    fn drop(&mut self) {
        self.cancel();
    }
}
