//! Kestrel Hardware Abstraction Layer (HAL) traits.
//!
//! This crate defines traits that abstract away platform-specific hardware details.
//! The console driver and the executor only ever see these traits, so both can
//! run against simulated hardware on the host.

#![no_std]

use kestrel_common::Ticks;

/// Register-level access to a UART.
///
/// Methods map one-to-one onto status bits and data registers. None of them
/// block; the driver decides when to spin.
pub trait UartHw {
    /// Returns `true` if the receiver holds at least one byte.
    fn byte_ready(&mut self) -> bool;
    /// Takes the next received byte. Only meaningful after [`byte_ready`](Self::byte_ready).
    fn pop_byte(&mut self) -> u8;
    /// Returns `true` if the transmitter can accept a byte.
    fn transmit_ready(&mut self) -> bool;
    /// Hands a byte to the transmitter. Only meaningful after [`transmit_ready`](Self::transmit_ready).
    fn push_byte(&mut self, byte: u8);
}

/// A monotonic tick source.
pub trait Clock {
    /// Returns the current tick count. Wraps silently.
    fn now(&self) -> Ticks;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Ticks {
        (**self).now()
    }
}
