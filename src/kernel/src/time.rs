//! Monotonic time base.
//!
//! A periodic timer interrupt calls [`Timebase::on_tick`], which is the only
//! writer of the tick counter. Everything else reads it through
//! [`Timebase::now`] and measures intervals with wrapping subtraction, so the
//! counter may overflow freely.

use core::cell::Cell;
use kestrel_common::time::{self, TickRate, Ticks};
use kestrel_hal::Clock;

use crate::sync::irq::{self, Mutex};

/// Tick counter driven by the periodic timer interrupt.
pub struct Timebase {
    ticks: Mutex<Cell<Ticks>>,
    rate: TickRate,
}

impl Timebase {
    /// Creates a time base at tick zero.
    pub const fn new(rate: TickRate) -> Self {
        Self::starting_at(rate, 0)
    }

    /// Creates a time base at an arbitrary tick count.
    pub const fn starting_at(rate: TickRate, ticks: Ticks) -> Self {
        Self {
            ticks: Mutex::new(Cell::new(ticks)),
            rate,
        }
    }

    /// Advances the counter by one tick. Timer interrupt only.
    #[inline]
    pub fn on_tick(&self) {
        irq::with(|cs| {
            let ticks = self.ticks.borrow(cs);
            ticks.set(ticks.get().wrapping_add(1));
        });
    }

    /// Returns the current tick count.
    ///
    /// Read under a critical section: the counter is wider than what some
    /// targets load in one instruction.
    #[inline]
    pub fn now(&self) -> Ticks {
        irq::with(|cs| self.ticks.borrow(cs).get())
    }

    /// Returns ticks elapsed since `earlier`.
    pub fn elapsed_since(&self, earlier: Ticks) -> Ticks {
        time::elapsed(self.now(), earlier)
    }

    /// Returns the configured tick rate.
    pub const fn rate(&self) -> TickRate {
        self.rate
    }

    /// Converts milliseconds to ticks, rounding up.
    pub const fn convert_delay(&self, ms: u32) -> Ticks {
        self.rate.ms_to_ticks(ms)
    }

    /// Spins until `us` microseconds have passed.
    ///
    /// Blocks the whole processor context and never yields. Only for
    /// startup and shutdown sequencing.
    pub fn busy_delay(&self, us: u32) {
        busy_delay(self, self.rate, us);
    }
}

impl Clock for Timebase {
    fn now(&self) -> Ticks {
        Timebase::now(self)
    }
}

/// Spins on `clock` until `us` microseconds have passed at `rate`.
pub fn busy_delay<C: Clock + ?Sized>(clock: &C, rate: TickRate, us: u32) {
    let start = clock.now();
    let wait = rate.us_to_ticks(us);
    while !time::deadline_reached(clock.now(), start, wait) {
        core::hint::spin_loop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::StepClock;

    const KHZ: TickRate = TickRate::new(1000, 0);

    #[test]
    fn test_single_tick_elapsed() {
        let tb = Timebase::new(KHZ);
        let before = tb.now();
        tb.on_tick();
        assert_eq!(tb.elapsed_since(before), 1);
    }

    #[test]
    fn test_tick_across_wraparound() {
        let tb = Timebase::starting_at(KHZ, Ticks::MAX);
        let before = tb.now();
        tb.on_tick();
        assert_eq!(tb.now(), 0);
        assert_eq!(time::elapsed(tb.now(), before), 1);
    }

    #[test]
    fn test_convert_delay() {
        let tb = Timebase::new(TickRate::new(100, 0));
        assert_eq!(tb.convert_delay(1000), 100);
        assert_eq!(tb.convert_delay(5), 1);
    }

    #[test]
    fn test_busy_delay_waits_converted_ticks() {
        let clock = StepClock::new(Ticks::MAX - 3, 1);
        busy_delay(&clock, KHZ, 10_000);
        // One read for the anchor, then polls until ten ticks have passed.
        assert_eq!(time::elapsed(clock.peek(), Ticks::MAX - 3), 11);
    }

    #[test]
    fn test_busy_delay_zero_returns_immediately() {
        let clock = StepClock::new(0, 1);
        busy_delay(&clock, KHZ, 0);
        assert_eq!(clock.peek(), 2);
    }

    #[test]
    fn test_busy_delay_with_ticking_interrupt() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        let tb = Arc::new(Timebase::new(KHZ));
        let done = Arc::new(AtomicBool::new(false));
        let ticker = {
            let (tb, done) = (tb.clone(), done.clone());
            std::thread::spawn(move || {
                while !done.load(Ordering::Relaxed) {
                    tb.on_tick();
                    std::thread::yield_now();
                }
            })
        };

        tb.busy_delay(3_000);
        assert!(tb.now() >= 3);
        done.store(true, Ordering::Relaxed);
        assert!(ticker.join().is_ok());
    }
}
