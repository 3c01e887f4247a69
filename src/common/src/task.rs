//! Task identity as seen by the scheduler interface.

/// Callback run by the scheduler on behalf of a task.
///
/// The argument is the opaque word supplied when the run was requested.
pub type TaskFn = fn(usize);

/// Identifies a task slot in the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u16);

impl TaskId {
    /// Creates a task id from its raw slot number.
    pub const fn new(raw: u16) -> Self {
        TaskId(raw)
    }

    /// Returns the slot index.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl core::fmt::Display for TaskId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "tid{}", self.0)
    }
}
