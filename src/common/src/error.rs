//! System-wide error types for Kestrel.
//!
//! Conditions the console treats as normal (no byte available, a short timed
//! read, a byte dropped on overflow) are deliberately absent here.

use core::fmt;

/// Scheduler interface errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SchedError {
    /// The task id was never allocated
    InvalidTask,
    /// Every task slot is already allocated
    NoFreeTask,
}

impl fmt::Display for SchedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedError::InvalidTask => write!(f, "task id not allocated"),
            SchedError::NoFreeTask => write!(f, "no free task slot"),
        }
    }
}

/// UART configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigError {
    /// Baud rate of zero
    ZeroBaud,
    /// Baud rate cannot be derived from the reference clock
    DivisorOutOfRange,
    /// Data bits outside 5..=8
    InvalidDataBits,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroBaud => write!(f, "baud rate is zero"),
            ConfigError::DivisorOutOfRange => write!(f, "baud divisor out of range"),
            ConfigError::InvalidDataBits => write!(f, "data bits must be 5 to 8"),
        }
    }
}
