//! Simulated hardware for host-side tests.
//!
//! These stand in for the UART registers, the timer and the scheduler so the
//! console and executor logic can be exercised without a target.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU16, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use kestrel_common::{SchedError, TaskFn, TaskId, Ticks};
use kestrel_hal::{Clock, UartHw};

use crate::task::Scheduler;

#[derive(Default)]
struct Wire {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
    busy_polls: u32,
    busy_left: u32,
}

/// A UART whose receive FIFO is filled by the test and whose output is
/// recorded. Clones share the same wire.
#[derive(Clone, Default)]
pub struct SimUart {
    wire: Arc<Mutex<Wire>>,
}

impl SimUart {
    /// Creates an idle UART.
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts bytes into the receive FIFO, as if they arrived on the line.
    pub fn inject(&self, bytes: &[u8]) {
        self.wire().rx.extend(bytes.iter().copied());
    }

    /// Bytes still waiting in the receive FIFO.
    pub fn pending_rx(&self) -> usize {
        self.wire().rx.len()
    }

    /// Everything transmitted so far.
    pub fn transmitted(&self) -> Vec<u8> {
        self.wire().tx.clone()
    }

    /// Makes the transmitter report busy `polls` times before each byte.
    pub fn set_busy_polls(&self, polls: u32) {
        let mut wire = self.wire();
        wire.busy_polls = polls;
        wire.busy_left = polls;
    }

    fn wire(&self) -> std::sync::MutexGuard<'_, Wire> {
        self.wire.lock().expect("sim wire poisoned")
    }
}

impl UartHw for SimUart {
    fn byte_ready(&mut self) -> bool {
        !self.wire().rx.is_empty()
    }

    fn pop_byte(&mut self) -> u8 {
        self.wire().rx.pop_front().unwrap_or(0)
    }

    fn transmit_ready(&mut self) -> bool {
        let mut wire = self.wire();
        if wire.busy_left == 0 {
            return true;
        }
        wire.busy_left -= 1;
        false
    }

    fn push_byte(&mut self, byte: u8) {
        let mut wire = self.wire();
        assert_eq!(wire.busy_left, 0, "byte pushed while transmitter busy");
        wire.tx.push(byte);
        wire.busy_left = wire.busy_polls;
    }
}

/// A clock that moves forward by `step` ticks every time it is read.
///
/// A step of zero gives a manual clock driven by [`advance`](Self::advance).
pub struct StepClock {
    now: AtomicU32,
    step: Ticks,
}

impl StepClock {
    /// Creates a clock at `start`.
    pub const fn new(start: Ticks, step: Ticks) -> Self {
        Self {
            now: AtomicU32::new(start),
            step,
        }
    }

    /// Moves the clock forward without counting as a read.
    pub fn advance(&self, ticks: Ticks) {
        self.now.fetch_add(ticks, Ordering::SeqCst);
    }

    /// Current value without counting as a read.
    pub fn peek(&self) -> Ticks {
        self.now.load(Ordering::SeqCst)
    }
}

impl Clock for StepClock {
    fn now(&self) -> Ticks {
        self.now.fetch_add(self.step, Ordering::SeqCst)
    }
}

/// One call to [`Scheduler::schedule`].
#[derive(Debug, Clone, Copy)]
pub struct Request {
    /// Task to run.
    pub tid: TaskId,
    /// Callback requested.
    pub func: TaskFn,
    /// Callback argument.
    pub data: usize,
    /// Requested delay in ticks.
    pub delay: Ticks,
    /// Trace label.
    pub label: &'static str,
}

/// A scheduler that records requests instead of running anything.
#[derive(Default)]
pub struct RecordingScheduler {
    requests: Mutex<Vec<Request>>,
    next_tid: AtomicU16,
}

impl RecordingScheduler {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything requested so far, oldest first.
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().expect("requests poisoned").clone()
    }
}

impl Scheduler for RecordingScheduler {
    fn schedule(
        &self,
        tid: TaskId,
        func: TaskFn,
        data: usize,
        delay: Ticks,
        label: &'static str,
    ) -> Result<(), SchedError> {
        self.requests
            .lock()
            .expect("requests poisoned")
            .push(Request {
                tid,
                func,
                data,
                delay,
                label,
            });
        Ok(())
    }

    fn alloc_tid(&self) -> Result<TaskId, SchedError> {
        Ok(TaskId::new(self.next_tid.fetch_add(1, Ordering::SeqCst)))
    }
}
