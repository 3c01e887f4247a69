//! Cooperative task scheduling.
//!
//! Tasks are plain callbacks identified by a [`TaskId`]. Code that needs to
//! wake a task, including interrupt handlers, only sees the [`Scheduler`]
//! trait; [`executor::Executor`] is the implementation the kernel ships.

use kestrel_common::{SchedError, TaskFn, TaskId, Ticks};

pub mod executor;

pub use executor::Executor;

/// Requests task runs.
///
/// Implementations must be callable with interrupts masked, from interrupt
/// context, and must never block.
pub trait Scheduler {
    /// Requests that `func(data)` run as task `tid` no earlier than `delay`
    /// ticks from now. `label` names the run in traces.
    fn schedule(
        &self,
        tid: TaskId,
        func: TaskFn,
        data: usize,
        delay: Ticks,
        label: &'static str,
    ) -> Result<(), SchedError>;

    /// Reserves a task id.
    fn alloc_tid(&self) -> Result<TaskId, SchedError>;
}
