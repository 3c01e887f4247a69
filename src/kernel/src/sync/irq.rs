//! Interrupt-masking critical sections.
//!
//! On a single core, masking interrupts is the whole locking discipline.
//! [`enter`] masks interrupts and returns the previous enable state, and
//! [`exit`] restores exactly that state, so sections nest. [`IrqGuard`] ties
//! the pair to a scope so every exit path restores the state, including
//! early returns and unwinding.
//!
//! The platform provides the masking itself through the `critical-section`
//! crate. Bare-metal x86_64 registers one in `arch::x86_64`; host builds use
//! the crate's `std` implementation.

use core::marker::PhantomData;
use critical_section::{CriticalSection, RestoreState};

pub use critical_section::{with, Mutex};

/// Interrupt-enable state saved by [`enter`].
#[must_use = "interrupts stay masked until this state is passed to `exit`"]
pub struct IrqState(RestoreState);

/// Masks interrupts and returns the previous enable state.
///
/// # Safety
///
/// The returned state must be passed to [`exit`] exactly once, and nested
/// sections must be exited in reverse order of entry.
#[inline]
pub unsafe fn enter() -> IrqState {
    // SAFETY: the caller upholds the pairing contract documented above.
    IrqState(unsafe { critical_section::acquire() })
}

/// Restores the interrupt-enable state saved by [`enter`].
///
/// # Safety
///
/// `state` must come from the innermost [`enter`] that has not been exited.
#[inline]
pub unsafe fn exit(state: IrqState) {
    // SAFETY: the caller upholds the pairing contract documented above.
    unsafe { critical_section::release(state.0) }
}

/// Keeps interrupts masked for as long as it lives.
///
/// Not `Send`: the state it restores belongs to the context that created it.
pub struct IrqGuard {
    state: RestoreState,
    _not_send: PhantomData<*mut ()>,
}

impl IrqGuard {
    /// Masks interrupts until the guard is dropped.
    #[inline]
    pub fn new() -> Self {
        Self {
            // SAFETY: released exactly once in `Drop`. Guards are dropped in
            // reverse creation order by scoping rules.
            state: unsafe { enter() }.0,
            _not_send: PhantomData,
        }
    }

    /// Returns a token proving interrupts are masked, for [`Mutex::borrow`].
    #[inline]
    pub fn token(&self) -> CriticalSection<'_> {
        // SAFETY: interrupts stay masked for the lifetime of `self`.
        unsafe { CriticalSection::new() }
    }
}

impl Default for IrqGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for IrqGuard {
    #[inline]
    fn drop(&mut self) {
        // SAFETY: `state` came from the `enter` in `new`.
        unsafe { exit(IrqState(self.state)) }
    }
}
