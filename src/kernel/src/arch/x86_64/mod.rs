//! x86_64 PC platform support.
//!
//! Wires the console to COM1, the time base to PIT channel 0, and both
//! interrupt handlers into the IDT. The statics here are the kernel's single
//! instances of each service.

pub mod interrupts;
mod irq;
pub mod pic;
pub mod pit;
pub mod serial;

pub use serial::{Uart16550, COM1_PORT};

use core::fmt;

use crate::config::{self, MAX_TASKS, RX_BUF_SIZE};
use crate::console::Console;
use crate::logger::{self, ConsoleLogger};
use crate::task::Executor;
use crate::time::Timebase;
use kestrel_common::ConfigError;

/// The console type on this platform.
pub type PlatformConsole = Console<'static, Uart16550, RX_BUF_SIZE>;

/// Tick counter driven by PIT channel 0.
pub static TIMEBASE: Timebase = Timebase::new(config::TICK_RATE);

/// The kernel's task executor.
pub static EXECUTOR: Executor<'static, MAX_TASKS> = Executor::new(&TIMEBASE);

/// Console on COM1.
pub static CONSOLE: PlatformConsole = Console::new(
    Uart16550::new(COM1_PORT),
    &EXECUTOR,
    &TIMEBASE,
    config::TICK_RATE,
);

static LOGGER: ConsoleLogger<'static, Uart16550, RX_BUF_SIZE> =
    ConsoleLogger::new(&CONSOLE, config::LOG_LEVEL);

static INIT: spin::Once<Result<(), ConfigError>> = spin::Once::new();

/// Brings up COM1, the PIT, the interrupt controllers and the logger.
///
/// This function is idempotent - calling it multiple times has no effect
/// after the first call, which decides the result.
pub fn init() -> Result<(), ConfigError> {
    *INIT.call_once(bring_up)
}

fn bring_up() -> Result<(), ConfigError> {
    CONSOLE.with_hw(|uart| uart.init(&config::CONSOLE_UART))?;
    pit::init(config::TICK_RATE)?;
    interrupts::init_idt();

    // A logger installed earlier by the embedder takes precedence.
    let _ = logger::init(&LOGGER);
    log::info!("console on COM1 at {} baud", config::CONSOLE_UART.baud);
    log::info!("timer at {} Hz", config::TICK_RATE.per_second);
    Ok(())
}

/// Runs the executor forever, halting between runs when nothing is due.
pub fn run() -> ! {
    EXECUTOR.run(idle)
}

/// Sleep the CPU if no task is due.
fn idle() {
    use ::x86_64::instructions::interrupts;

    interrupts::disable();
    if EXECUTOR.has_due() {
        interrupts::enable();
    } else {
        interrupts::enable_and_hlt();
    }
}

/// Halts the CPU until the next interrupt.
#[inline]
pub fn hlt() {
    ::x86_64::instructions::hlt();
}

/// Halts the CPU in an infinite loop, waking only to service interrupts.
pub fn halt_loop() -> ! {
    loop {
        hlt();
    }
}

/// Prints to the console without a newline.
#[macro_export]
macro_rules! console_print {
    ($($arg:tt)*) => {
        $crate::arch::x86_64::_print(format_args!($($arg)*))
    };
}

/// Prints to the console with a newline.
#[macro_export]
macro_rules! console_println {
    () => ($crate::console_print!("\n"));
    ($($arg:tt)*) => ($crate::console_print!("{}\n", format_args!($($arg)*)))
}

/// Internal print function used by macros.
#[doc(hidden)]
pub fn _print(args: fmt::Arguments) {
    // Console writes cannot fail short of a formatting error in `args`.
    let _ = CONSOLE.write_fmt(args);
}
