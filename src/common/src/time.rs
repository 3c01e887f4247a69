//! Tick arithmetic.
//!
//! The tick counter wraps silently, so every elapsed-time computation goes
//! through [`elapsed`], which uses wrapping unsigned subtraction. A single
//! wraparound between two readings still yields the right answer.

use core::time::Duration;

/// Scheduler time, in ticks of the periodic timer interrupt.
pub type Ticks = u32;

/// Returns the number of ticks from `earlier` to `later`.
#[inline]
pub const fn elapsed(later: Ticks, earlier: Ticks) -> Ticks {
    later.wrapping_sub(earlier)
}

/// Returns `true` once at least `wait` ticks have passed since `start`.
#[inline]
pub const fn deadline_reached(now: Ticks, start: Ticks, wait: Ticks) -> bool {
    elapsed(now, start) >= wait
}

/// Rate of the periodic timer, fixed per target at compile time.
///
/// `per_microsecond` may be zero on slow timers. Microsecond conversions then
/// fall back to tick granularity derived from `per_second`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickRate {
    /// Ticks per second.
    pub per_second: u32,
    /// Ticks per microsecond, or zero if the timer is slower than 1 MHz.
    pub per_microsecond: u32,
}

impl TickRate {
    /// Creates a tick rate.
    pub const fn new(per_second: u32, per_microsecond: u32) -> Self {
        Self {
            per_second,
            per_microsecond,
        }
    }

    /// Converts milliseconds to ticks, rounding up.
    ///
    /// A non-zero delay never converts to zero ticks. Results that do not fit
    /// the tick width saturate.
    pub const fn ms_to_ticks(self, ms: u32) -> Ticks {
        saturate(ceil_div(ms as u64 * self.per_second as u64, 1_000))
    }

    /// Converts microseconds to ticks, rounding up.
    pub const fn us_to_ticks(self, us: u32) -> Ticks {
        self.micros_to_ticks(us as u64)
    }

    /// Converts a [`Duration`] to ticks with the microsecond rule.
    pub const fn duration_to_ticks(self, duration: Duration) -> Ticks {
        let micros = duration.as_micros();
        if micros > u64::MAX as u128 {
            return Ticks::MAX;
        }
        self.micros_to_ticks(micros as u64)
    }

    const fn micros_to_ticks(self, us: u64) -> Ticks {
        if self.per_microsecond != 0 {
            saturate(us.saturating_mul(self.per_microsecond as u64))
        } else {
            saturate(ceil_div(
                us.saturating_mul(self.per_second as u64),
                1_000_000,
            ))
        }
    }
}

const fn ceil_div(n: u64, d: u64) -> u64 {
    n / d + (n % d != 0) as u64
}

const fn saturate(ticks: u64) -> Ticks {
    if ticks > Ticks::MAX as u64 {
        Ticks::MAX
    } else {
        ticks as Ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_across_wrap() {
        assert_eq!(elapsed(5, 4), 1);
        assert_eq!(elapsed(0, Ticks::MAX), 1);
        assert_eq!(elapsed(3, Ticks::MAX - 1), 5);
    }

    #[test]
    fn test_deadline_reached_across_wrap() {
        let start = Ticks::MAX - 2;
        assert!(!deadline_reached(start.wrapping_add(9), start, 10));
        assert!(deadline_reached(start.wrapping_add(10), start, 10));
    }

    #[test]
    fn test_ms_to_ticks_rounds_up() {
        let khz = TickRate::new(1000, 0);
        assert_eq!(khz.ms_to_ticks(0), 0);
        assert_eq!(khz.ms_to_ticks(250), 250);

        // 100 Hz does not divide 1000 evenly: 1 ms is a fraction of a tick.
        let slow = TickRate::new(100, 0);
        assert_eq!(slow.ms_to_ticks(1), 1);
        assert_eq!(slow.ms_to_ticks(10), 1);
        assert_eq!(slow.ms_to_ticks(11), 2);

        // 300 Hz: 1000 ms is exact, 1 ms is not.
        let odd = TickRate::new(300, 0);
        assert_eq!(odd.ms_to_ticks(1000), 300);
        assert_eq!(odd.ms_to_ticks(1), 1);
    }

    #[test]
    fn test_us_to_ticks_fallback() {
        let khz = TickRate::new(1000, 0);
        assert_eq!(khz.us_to_ticks(2000), 2);
        assert_eq!(khz.us_to_ticks(1), 1);

        let fast = TickRate::new(16_000_000, 16);
        assert_eq!(fast.us_to_ticks(3), 48);
    }

    #[test]
    fn test_conversion_saturates() {
        let fast = TickRate::new(16_000_000, 16);
        assert_eq!(fast.ms_to_ticks(u32::MAX), Ticks::MAX);
        assert_eq!(fast.duration_to_ticks(Duration::from_secs(u64::MAX)), Ticks::MAX);
    }

    #[test]
    fn test_duration_to_ticks() {
        let khz = TickRate::new(1000, 0);
        assert_eq!(khz.duration_to_ticks(Duration::from_millis(20)), 20);
        assert_eq!(khz.duration_to_ticks(Duration::from_micros(1500)), 2);
        assert_eq!(khz.duration_to_ticks(Duration::ZERO), 0);
    }
}
