//! Interrupt-driven serial console.
//!
//! Bytes move from the UART to task code through three stages:
//!
//! 1. The receive interrupt calls [`Console::on_rx_interrupt`], which drains
//!    the hardware FIFO into an [`RxRing`]. Bytes that find the ring full are
//!    dropped.
//! 2. If a task registered with [`Console::notify_on_data`], the same
//!    interrupt asks the scheduler to run it. The callback itself always runs
//!    later, in task context.
//! 3. Task code pulls bytes with [`Console::read_byte`] or
//!    [`Console::read_with_timeout`].
//!
//! Output goes straight to the transmitter, spinning on its ready flag.
//!
//! # Wake-up subscriptions
//!
//! There is a single subscription slot. Registering while another
//! subscription is pending replaces it without notice, so only one task may
//! wait for console input at a time.

mod ring;

pub use ring::RxRing;

use core::cell::RefCell;
use core::fmt;
use core::sync::atomic::{AtomicU8, Ordering};
use core::time::Duration;

use kestrel_common::time::{self, TickRate, Ticks};
use kestrel_common::{ConsoleMode, SchedError, TaskFn, TaskId};
use kestrel_hal::{Clock, UartHw};

use crate::sync::irq::{self, IrqGuard, Mutex};
use crate::task::Scheduler;

/// Label attached to runs requested on behalf of console input.
const RX_LABEL: &str = "console rx";

/// A task waiting for input.
#[derive(Clone, Copy)]
struct Waiter {
    tid: TaskId,
    func: TaskFn,
    data: usize,
}

/// State shared between the receive interrupt and task code.
struct Port<H, const N: usize> {
    hw: H,
    ring: RxRing<N>,
    waiter: Option<Waiter>,
}

impl<H: UartHw, const N: usize> Port<H, N> {
    /// Moves every byte the hardware holds into the ring.
    fn drain(&mut self) {
        while self.hw.byte_ready() {
            let byte = self.hw.pop_byte();
            // Full ring: the byte is dropped.
            let _ = self.ring.push(byte);
        }
    }

    fn put(&mut self, mode: ConsoleMode, byte: u8) {
        if !mode.contains(ConsoleMode::RAW) && byte == b'\n' {
            self.transmit(b'\r');
        }
        self.transmit(byte);
    }

    fn transmit(&mut self, byte: u8) {
        while !self.hw.transmit_ready() {
            core::hint::spin_loop();
        }
        self.hw.push_byte(byte);
    }
}

/// Serial console over a UART with an `N`-byte receive ring.
pub struct Console<'a, H, const N: usize> {
    port: Mutex<RefCell<Port<H, N>>>,
    mode: AtomicU8,
    scheduler: &'a (dyn Scheduler + Sync),
    clock: &'a (dyn Clock + Sync),
    rate: TickRate,
}

impl<'a, H: UartHw, const N: usize> Console<'a, H, N> {
    /// Creates a console in translated mode with echo enabled.
    ///
    /// `clock` and `rate` time [`read_with_timeout`](Self::read_with_timeout);
    /// `scheduler` receives wake-up requests.
    pub const fn new(
        hw: H,
        scheduler: &'a (dyn Scheduler + Sync),
        clock: &'a (dyn Clock + Sync),
        rate: TickRate,
    ) -> Self {
        Self {
            port: Mutex::new(RefCell::new(Port {
                hw,
                ring: RxRing::new(),
                waiter: None,
            })),
            mode: AtomicU8::new(ConsoleMode::ECHO.bits()),
            scheduler,
            clock,
            rate,
        }
    }

    /// Runs `f` on the UART registers inside a critical section.
    pub fn with_hw<R>(&self, f: impl FnOnce(&mut H) -> R) -> R {
        irq::with(|cs| f(&mut self.port.borrow_ref_mut(cs).hw))
    }

    /// Receive interrupt handler body.
    ///
    /// Drains the hardware and, if the ring then holds any byte, hands a
    /// pending subscription to the scheduler with zero delay. Bytes already
    /// pulled in by task-context reads count too.
    pub fn on_rx_interrupt(&self) {
        irq::with(|cs| {
            let mut port = self.port.borrow_ref_mut(cs);
            port.drain();
            if port.ring.is_empty() {
                return;
            }
            if let Some(w) = port.waiter.take() {
                // Nothing to report to from here; the id came from the
                // scheduler itself.
                let _ = self.scheduler.schedule(w.tid, w.func, w.data, 0, RX_LABEL);
            }
        });
    }

    /// Drains the hardware FIFO into the ring without waking anyone.
    pub fn drain(&self) {
        irq::with(|cs| {
            self.port.borrow_ref_mut(cs).drain();
        });
    }

    /// Returns the next received byte, or `None` if nothing is buffered.
    pub fn read_byte(&self) -> Option<u8> {
        irq::with(|cs| {
            let mut port = self.port.borrow_ref_mut(cs);
            port.drain();
            port.ring.pop()
        })
    }

    /// Returns `true` if [`read_byte`](Self::read_byte) would return a byte.
    pub fn has_data(&self) -> bool {
        irq::with(|cs| {
            let mut port = self.port.borrow_ref_mut(cs);
            port.drain();
            !port.ring.is_empty()
        })
    }

    /// Asks for `func(data)` to run as task `tid` once input is available.
    ///
    /// With input already buffered the run is requested right away with zero
    /// delay and nothing is stored. Otherwise the request takes the single
    /// subscription slot, replacing any earlier one.
    pub fn notify_on_data(
        &self,
        tid: TaskId,
        func: TaskFn,
        data: usize,
    ) -> Result<(), SchedError> {
        let (result, replaced) = irq::with(|cs| {
            let mut port = self.port.borrow_ref_mut(cs);
            if !port.ring.is_empty() {
                port.waiter = None;
                (self.scheduler.schedule(tid, func, data, 0, RX_LABEL), None)
            } else {
                let prev = port.waiter.replace(Waiter { tid, func, data });
                (Ok(()), prev.map(|w| w.tid))
            }
        });
        if let Some(prev) = replaced {
            log::debug!("console: {} replaced pending wake-up for {}", tid, prev);
        }
        result
    }

    /// Returns `true` if a subscription is waiting for input.
    pub fn has_waiter(&self) -> bool {
        irq::with(|cs| self.port.borrow_ref(cs).waiter.is_some())
    }

    /// Writes one byte, expanding `\n` to `\r\n` unless in raw mode.
    pub fn write_byte(&self, byte: u8) {
        let guard = IrqGuard::new();
        self.port.borrow_ref_mut(guard.token()).put(self.mode(), byte);
    }

    /// Writes `bytes` without interleaving with other writers.
    pub fn write_bytes(&self, bytes: &[u8]) {
        let guard = IrqGuard::new();
        let mut port = self.port.borrow_ref_mut(guard.token());
        for &byte in bytes {
            port.put(self.mode(), byte);
        }
    }

    /// Writes a string without interleaving with other writers.
    pub fn write_str(&self, s: &str) {
        self.write_bytes(s.as_bytes());
    }

    /// Writes formatted output as one uninterrupted span.
    ///
    /// Lets `write!` and `writeln!` target a shared `&Console`.
    pub fn write_fmt(&self, args: fmt::Arguments<'_>) -> fmt::Result {
        let guard = IrqGuard::new();
        let mut port = self.port.borrow_ref_mut(guard.token());
        let mut out = Writer {
            port: &mut *port,
            mode: &self.mode,
        };
        fmt::write(&mut out, args)
    }

    /// Reads into `buf` until it is full or no byte arrives for `timeout`.
    ///
    /// The idle timer restarts with every byte received. Returns the number
    /// of bytes stored; a count below `buf.len()` means the line went quiet.
    /// Polls without yielding to other tasks.
    pub fn read_with_timeout(&self, buf: &mut [u8], timeout: Duration) -> usize {
        let limit = self.rate.duration_to_ticks(timeout);
        let mut count = 0;
        let mut idle_since: Option<Ticks> = None;

        while count < buf.len() {
            if let Some(byte) = self.read_byte() {
                buf[count] = byte;
                count += 1;
                idle_since = None;
                continue;
            }
            let anchor = *idle_since.get_or_insert_with(|| self.clock.now());
            if time::deadline_reached(self.clock.now(), anchor, limit) {
                break;
            }
            core::hint::spin_loop();
        }
        count
    }

    /// Returns the current mode flags.
    #[inline]
    pub fn mode(&self) -> ConsoleMode {
        ConsoleMode::from_bits_truncate(self.mode.load(Ordering::Relaxed))
    }

    /// Replaces the mode flags, returning the previous ones.
    pub fn set_mode(&self, mode: ConsoleMode) -> ConsoleMode {
        ConsoleMode::from_bits_truncate(self.mode.swap(mode.bits(), Ordering::Relaxed))
    }

    /// Returns `true` if received characters should be echoed.
    pub fn echo(&self) -> bool {
        self.mode().contains(ConsoleMode::ECHO)
    }

    /// Turns echo on or off, returning the previous setting.
    pub fn set_echo(&self, on: bool) -> bool {
        self.set_flag(ConsoleMode::ECHO, on)
    }

    /// Returns `true` if output bypasses line-ending translation.
    pub fn raw(&self) -> bool {
        self.mode().contains(ConsoleMode::RAW)
    }

    /// Switches raw output on or off, returning the previous setting.
    pub fn set_raw(&self, on: bool) -> bool {
        self.set_flag(ConsoleMode::RAW, on)
    }

    fn set_flag(&self, flag: ConsoleMode, on: bool) -> bool {
        let prev = if on {
            self.mode.fetch_or(flag.bits(), Ordering::Relaxed)
        } else {
            self.mode.fetch_and(!flag.bits(), Ordering::Relaxed)
        };
        ConsoleMode::from_bits_truncate(prev).contains(flag)
    }
}

/// Formatting adapter holding the port for the length of one `write_fmt`.
struct Writer<'p, H, const N: usize> {
    port: &'p mut Port<H, N>,
    mode: &'p AtomicU8,
}

impl<H: UartHw, const N: usize> fmt::Write for Writer<'_, H, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for &byte in s.as_bytes() {
            let mode = ConsoleMode::from_bits_truncate(self.mode.load(Ordering::Relaxed));
            self.port.put(mode, byte);
        }
        Ok(())
    }
}
