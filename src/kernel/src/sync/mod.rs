//! Synchronization between interrupt handlers and task code.
//!
//! Everything shared with an interrupt handler sits in an [`irq::Mutex`] and
//! is only touched inside a critical section. There are no sleeping locks:
//! sections are short and never wait on anything but hardware.

pub mod irq;

pub use irq::{IrqGuard, IrqState};
