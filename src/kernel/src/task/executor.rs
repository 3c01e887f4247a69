//! A simple tick-driven task executor.
//!
//! Each task owns one slot in a fixed table. A slot holds at most one pending
//! run; scheduling a task that already has one replaces it. A run is due once
//! `now - queued_at >= delay` in wrapping tick arithmetic, so due checks stay
//! correct when the tick counter overflows.

use core::cell::RefCell;

use kestrel_common::time::{self, Ticks};
use kestrel_common::{SchedError, TaskFn, TaskId};
use kestrel_hal::Clock;

use super::Scheduler;
use crate::sync::irq::{self, Mutex};

/// A requested run of a task callback.
#[derive(Clone, Copy)]
struct Run {
    func: TaskFn,
    data: usize,
    queued_at: Ticks,
    delay: Ticks,
    label: &'static str,
}

impl Run {
    /// Ticks past due, or `None` if not due yet.
    fn overdue(&self, now: Ticks) -> Option<Ticks> {
        time::elapsed(now, self.queued_at).checked_sub(self.delay)
    }
}

#[derive(Clone, Copy)]
struct Slot {
    allocated: bool,
    pending: Option<Run>,
}

impl Slot {
    const FREE: Slot = Slot {
        allocated: false,
        pending: None,
    };
}

/// Executor with room for `T` tasks.
pub struct Executor<'a, const T: usize> {
    slots: Mutex<RefCell<[Slot; T]>>,
    clock: &'a (dyn Clock + Sync),
}

impl<'a, const T: usize> Executor<'a, T> {
    const SLOTS_OK: () = assert!(
        T > 0 && T <= u16::MAX as usize + 1,
        "task table size must fit a task id"
    );

    /// Create a new executor timed by `clock`.
    pub const fn new(clock: &'a (dyn Clock + Sync)) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::SLOTS_OK;
        Executor {
            slots: Mutex::new(RefCell::new([Slot::FREE; T])),
            clock,
        }
    }

    /// Run every task that is due, most overdue first.
    ///
    /// Callbacks run outside the critical section and may schedule again.
    /// At most `T` runs happen per call, so a task that keeps rescheduling
    /// itself with zero delay cannot starve the caller. Returns the number
    /// of runs.
    pub fn run_ready(&self) -> usize {
        let mut ran = 0;
        while ran < T {
            let Some((tid, run)) = self.take_next() else {
                break;
            };
            log::trace!("run {} ({})", run.label, tid);
            (run.func)(run.data);
            ran += 1;
        }
        ran
    }

    /// Returns `true` if some run is due now.
    pub fn has_due(&self) -> bool {
        let now = self.clock.now();
        irq::with(|cs| {
            self.slots
                .borrow_ref(cs)
                .iter()
                .filter_map(|slot| slot.pending)
                .any(|run| run.overdue(now).is_some())
        })
    }

    /// Number of tasks with a pending run.
    pub fn pending(&self) -> usize {
        irq::with(|cs| {
            self.slots
                .borrow_ref(cs)
                .iter()
                .filter(|slot| slot.pending.is_some())
                .count()
        })
    }

    /// Run the executor forever, calling `idle` whenever nothing was due.
    pub fn run(&self, mut idle: impl FnMut()) -> ! {
        loop {
            if self.run_ready() == 0 {
                idle();
            }
        }
    }

    /// Removes and returns the most overdue run.
    fn take_next(&self) -> Option<(TaskId, Run)> {
        let now = self.clock.now();
        irq::with(|cs| {
            let mut slots = self.slots.borrow_ref_mut(cs);
            let (index, _) = slots
                .iter()
                .enumerate()
                .filter_map(|(i, slot)| Some((i, slot.pending?.overdue(now)?)))
                .max_by_key(|&(_, overdue)| overdue)?;
            let run = slots[index].pending.take()?;
            Some((TaskId::new(index as u16), run))
        })
    }
}

impl<const T: usize> Scheduler for Executor<'_, T> {
    fn schedule(
        &self,
        tid: TaskId,
        func: TaskFn,
        data: usize,
        delay: Ticks,
        label: &'static str,
    ) -> Result<(), SchedError> {
        let queued_at = self.clock.now();
        irq::with(|cs| {
            let mut slots = self.slots.borrow_ref_mut(cs);
            match slots.get_mut(tid.index()) {
                Some(slot) if slot.allocated => {
                    slot.pending = Some(Run {
                        func,
                        data,
                        queued_at,
                        delay,
                        label,
                    });
                    Ok(())
                }
                _ => Err(SchedError::InvalidTask),
            }
        })
    }

    fn alloc_tid(&self) -> Result<TaskId, SchedError> {
        let index = irq::with(|cs| {
            let mut slots = self.slots.borrow_ref_mut(cs);
            let index = slots.iter().position(|slot| !slot.allocated)?;
            slots[index].allocated = true;
            Some(index)
        });
        match index {
            Some(index) => Ok(TaskId::new(index as u16)),
            None => {
                log::warn!("task table full ({} slots)", T);
                Err(SchedError::NoFreeTask)
            }
        }
    }
}
