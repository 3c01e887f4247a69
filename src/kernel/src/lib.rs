//! Kestrel Kernel
//!
//! The console transport and time base of a small cooperative runtime.
//!
//! # Architecture
//!
//! The kernel is structured into the following modules:
//! - `sync`: interrupt-masking critical sections
//! - `time`: the tick counter and delay arithmetic
//! - `console`: interrupt-driven UART receive ring, wake-ups and output
//! - `task`: the scheduler interface and a fixed-table executor
//! - `logger`: a `log` backend on top of the console
//! - `arch`: platform code (x86_64 PC: COM1, PIT, PIC, IDT)
//!
//! Interrupt handlers and task code share state only through
//! [`sync::irq::Mutex`], so the whole crate is race-free on a single core.
//!
//! # Safety
//!
//! This is a `#![no_std]` kernel. All unsafe code is documented with safety
//! invariants explaining why the usage is correct.

#![cfg_attr(not(test), no_std)]
#![cfg_attr(
    all(target_arch = "x86_64", target_os = "none"),
    feature(abi_x86_interrupt)
)]
#![warn(missing_docs)]

pub mod arch;
pub mod config;
pub mod console;
pub mod logger;
pub mod sync;
pub mod task;
pub mod time;

#[cfg(test)]
pub mod testutil;

pub use console::Console;
pub use task::{Executor, Scheduler};
pub use time::Timebase;

/// Initializes the platform console, timer and interrupts.
///
/// Called early in the boot process to set up essential services.
#[cfg(all(target_arch = "x86_64", target_os = "none"))]
pub fn init() -> Result<(), kestrel_common::ConfigError> {
    arch::x86_64::init()
}
