//! Console mode flags and UART line configuration.

use crate::error::ConfigError;
use bitflags::bitflags;

bitflags! {
    /// Process-wide console modes.
    ///
    /// Read by the transmit path on every byte and changed by console
    /// commands. Races between the two are accepted.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ConsoleMode: u8 {
        /// Echo received characters back to the sender.
        const ECHO = 1 << 0;
        /// Emit bytes unchanged; without it `\n` is sent as `\r\n`.
        const RAW  = 1 << 1;
    }
}

/// Serial line parameters for the console UART.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UartConfig {
    /// UART reference clock in Hz.
    pub clock_hz: u32,
    /// Line rate in bits per second.
    pub baud: u32,
    /// Data bits per character (5 to 8).
    pub data_bits: u8,
    /// Two stop bits instead of one.
    pub two_stop_bits: bool,
}

impl UartConfig {
    /// 8 data bits, no parity, one stop bit.
    pub const fn new_8n1(clock_hz: u32, baud: u32) -> Self {
        Self {
            clock_hz,
            baud,
            data_bits: 8,
            two_stop_bits: false,
        }
    }

    /// Returns the baud-rate divisor for a 16x oversampling UART.
    pub const fn divisor(&self) -> Result<u16, ConfigError> {
        if self.baud == 0 {
            return Err(ConfigError::ZeroBaud);
        }
        let divisor = self.clock_hz as u64 / (16 * self.baud as u64);
        if divisor == 0 || divisor > u16::MAX as u64 {
            return Err(ConfigError::DivisorOutOfRange);
        }
        Ok(divisor as u16)
    }

    /// Returns the 16550-style line control byte (word length and stop bits).
    pub const fn line_control(&self) -> Result<u8, ConfigError> {
        if self.data_bits < 5 || self.data_bits > 8 {
            return Err(ConfigError::InvalidDataBits);
        }
        Ok((self.data_bits - 5) | ((self.two_stop_bits as u8) << 2))
    }
}
