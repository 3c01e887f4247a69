//! `log` backend that writes to the console.
//!
//! Each record becomes one `[LEVEL] target: message` line, written in a
//! single critical-section span so lines from different contexts never mix.
//! Line endings follow the console mode.
//!
//! Interrupt handlers must not log: a record is written synchronously and
//! spins on the transmitter.

use kestrel_hal::UartHw;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::console::Console;

/// Logger writing to a [`Console`].
pub struct ConsoleLogger<'a, H, const N: usize> {
    console: &'a Console<'a, H, N>,
    level: LevelFilter,
}

impl<'a, H, const N: usize> ConsoleLogger<'a, H, N> {
    /// Creates a logger passing records at `level` and above.
    pub const fn new(console: &'a Console<'a, H, N>, level: LevelFilter) -> Self {
        Self { console, level }
    }

    /// The most verbose level this logger passes.
    pub const fn level(&self) -> LevelFilter {
        self.level
    }
}

impl<H: UartHw + Send, const N: usize> Log for ConsoleLogger<'_, H, N> {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // Nowhere to report a failed console write.
        let _ = self.console.write_fmt(format_args!(
            "[{:<5}] {}: {}\n",
            record.level(),
            record.target(),
            record.args()
        ));
    }

    fn flush(&self) {}
}

/// Installs `logger` as the global `log` backend.
///
/// Fails if a logger is already installed.
pub fn init<H: UartHw + Send, const N: usize>(
    logger: &'static ConsoleLogger<'static, H, N>,
) -> Result<(), SetLoggerError> {
    log::set_logger(logger)?;
    log::set_max_level(logger.level());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{RecordingScheduler, SimUart, StepClock};
    use kestrel_common::TickRate;
    use log::Level;

    #[test]
    fn test_formats_one_line_per_record() {
        let uart = SimUart::new();
        let sched = RecordingScheduler::new();
        let clock = StepClock::new(0, 0);
        let console = Console::<_, 4>::new(uart.clone(), &sched, &clock, TickRate::new(1000, 0));
        let logger = ConsoleLogger::new(&console, LevelFilter::Info);

        logger.log(
            &Record::builder()
                .level(Level::Info)
                .target("boot")
                .args(format_args!("timer at {} Hz", 1000))
                .build(),
        );
        assert_eq!(uart.transmitted(), b"[INFO ] boot: timer at 1000 Hz\r\n");
    }

    #[test]
    fn test_filters_below_level() {
        let uart = SimUart::new();
        let sched = RecordingScheduler::new();
        let clock = StepClock::new(0, 0);
        let console = Console::<_, 4>::new(uart.clone(), &sched, &clock, TickRate::new(1000, 0));
        let logger = ConsoleLogger::new(&console, LevelFilter::Warn);

        assert!(!logger.enabled(&Metadata::builder().level(Level::Debug).build()));
        logger.log(
            &Record::builder()
                .level(Level::Info)
                .args(format_args!("dropped"))
                .build(),
        );
        assert!(uart.transmitted().is_empty());
    }
}
