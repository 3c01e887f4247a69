//! Shared types for the Kestrel console transport and time base.
//!
//! Everything here is plain data with no hardware or global state, so it can
//! be used from interrupt handlers, task code and host-side tests alike.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

pub mod console;
pub mod error;
pub mod task;
pub mod time;

pub use console::{ConsoleMode, UartConfig};
pub use error::{ConfigError, SchedError};
pub use task::{TaskFn, TaskId};
pub use time::{TickRate, Ticks};
