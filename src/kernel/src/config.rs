//! Compile-time configuration for the console and time base.
//!
//! Register-level differences between boards live in `arch`; everything the
//! core logic depends on is a constant here.

use kestrel_common::{TickRate, UartConfig};
use log::LevelFilter;

/// Receive ring capacity in bytes. Must be a power of two.
pub const RX_BUF_SIZE: usize = 64;

/// Periodic timer rate: 1 kHz, no sub-microsecond resolution.
pub const TICK_RATE: TickRate = TickRate::new(1000, 0);

/// Console line settings: 115200 baud 8N1 from the PC's 1.8432 MHz UART clock.
pub const CONSOLE_UART: UartConfig = UartConfig::new_8n1(1_843_200, 115_200);

/// Size of the executor's task table.
pub const MAX_TASKS: usize = 16;

/// Most verbose log level written to the console.
pub const LOG_LEVEL: LevelFilter = LevelFilter::Info;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_are_usable() {
        assert!(RX_BUF_SIZE.is_power_of_two());
        assert_eq!(CONSOLE_UART.divisor(), Ok(1));
        assert_eq!(TICK_RATE.ms_to_ticks(1), 1);
        assert!(MAX_TASKS <= u16::MAX as usize + 1);
    }
}
