//! 16550 UART driver for x86_64.
//!
//! Exposes the raw receive/transmit registers through [`UartHw`]; buffering
//! and line-ending policy live in the console.

use ::x86_64::instructions::port::{Port, PortReadOnly};
use bitflags::bitflags;
use kestrel_common::{ConfigError, UartConfig};
use kestrel_hal::UartHw;

/// COM1 I/O port address.
pub const COM1_PORT: u16 = 0x3F8;

/// Divisor latch access bit in the line control register.
const LCR_DLAB: u8 = 0x80;
/// Enable and clear both FIFOs, interrupt at 14 bytes.
const FCR_ENABLE_CLEAR_14: u8 = 0xC7;
/// DTR, RTS and OUT2. OUT2 gates the IRQ line on PCs.
const MCR_DTR_RTS_OUT2: u8 = 0x0B;
/// Received-data-available interrupt.
const IER_RX_AVAILABLE: u8 = 0x01;

bitflags! {
    /// Line status register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct LineStatus: u8 {
        const DATA_READY = 1 << 0;
        const THR_EMPTY  = 1 << 5;
    }
}

/// A 16550-compatible UART at an I/O port base.
pub struct Uart16550 {
    data: Port<u8>,
    int_enable: Port<u8>,
    fifo_ctrl: Port<u8>,
    line_ctrl: Port<u8>,
    modem_ctrl: Port<u8>,
    line_status: PortReadOnly<u8>,
}

impl Uart16550 {
    /// Creates a handle for the UART at `base`. Touches no hardware.
    pub const fn new(base: u16) -> Self {
        Self {
            data: Port::new(base),
            int_enable: Port::new(base + 1),
            fifo_ctrl: Port::new(base + 2),
            line_ctrl: Port::new(base + 3),
            modem_ctrl: Port::new(base + 4),
            line_status: PortReadOnly::new(base + 5),
        }
    }

    /// Programs line parameters and enables the receive interrupt.
    pub fn init(&mut self, config: &UartConfig) -> Result<(), ConfigError> {
        let divisor = config.divisor()?;
        let line = config.line_control()?;

        // SAFETY: the ports belong to this UART, and nothing else drives it
        // while the console holds the handle.
        unsafe {
            self.int_enable.write(0x00);
            self.line_ctrl.write(LCR_DLAB);
            self.data.write(divisor as u8);
            self.int_enable.write((divisor >> 8) as u8);
            self.line_ctrl.write(line);
            self.fifo_ctrl.write(FCR_ENABLE_CLEAR_14);
            self.modem_ctrl.write(MCR_DTR_RTS_OUT2);
            self.int_enable.write(IER_RX_AVAILABLE);
        }
        Ok(())
    }

    fn line_status(&mut self) -> LineStatus {
        // SAFETY: reading LSR has no side effects beyond clearing error bits.
        LineStatus::from_bits_truncate(unsafe { self.line_status.read() })
    }
}

impl UartHw for Uart16550 {
    fn byte_ready(&mut self) -> bool {
        self.line_status().contains(LineStatus::DATA_READY)
    }

    fn pop_byte(&mut self) -> u8 {
        // SAFETY: reading RBR pops the receive FIFO, which is the intent.
        unsafe { self.data.read() }
    }

    fn transmit_ready(&mut self) -> bool {
        self.line_status().contains(LineStatus::THR_EMPTY)
    }

    fn push_byte(&mut self, byte: u8) {
        // SAFETY: DLAB is clear after `init`, so this writes THR.
        unsafe { self.data.write(byte) }
    }
}
