//! Brew countdown timer.
//!
//! The timer is a state machine (`Idle -> Configured -> Running -> Complete`)
//! driven by ticks from a [`TickScheduler`]. The scheduler hands back a
//! [`TickTask`] handle which the timer owns in an `Option`: a timer can hold
//! at most one live task, and `running` is simply "a task is held".
//!
//! Two schedulers are provided:
//!
//! - [`ManualScheduler`] -- the caller delivers ticks; deterministic, used in
//!   tests and simulations.
//! - [`IntervalScheduler`] -- a tokio interval task posts tick messages onto
//!   the host's event channel.

pub mod error;
pub mod interval;
pub mod schedule;
pub mod timer;

pub use error::TimerError;
pub use interval::{IntervalScheduler, IntervalTask};
pub use schedule::{ManualScheduler, ManualTask, TaskId, TickScheduler, TickTask};
pub use timer::{BrewTimer, StartOutcome, TimerEvent, TimerPhase, TimerSnapshot, TICK_PERIOD};
