//! Critical sections by clearing the interrupt flag.
//!
//! A single core needs nothing more: with IF clear no handler can run, and
//! the saved flag makes nested sections restore the right state.

use ::x86_64::instructions::interrupts;
use critical_section::RawRestoreState;

struct InterruptFlag;
critical_section::set_impl!(InterruptFlag);

// SAFETY: clearing IF excludes every other context on a single-core system.
unsafe impl critical_section::Impl for InterruptFlag {
    unsafe fn acquire() -> RawRestoreState {
        let was_enabled = interrupts::are_enabled();
        interrupts::disable();
        was_enabled
    }

    unsafe fn release(was_enabled: RawRestoreState) {
        if was_enabled {
            interrupts::enable();
        }
    }
}
