//! Interrupt Descriptor Table (IDT) and handlers for x86_64.
//!
//! Handlers stay minimal: the timer only ticks, COM1 only drains into the
//! console ring and requests wake-ups. Neither allocates nor logs.

use super::pic::{self, InterruptIndex};
use super::{CONSOLE, TIMEBASE};
use ::x86_64::structures::idt::{InterruptDescriptorTable, InterruptStackFrame};
use lazy_static::lazy_static;

lazy_static! {
    /// The Interrupt Descriptor Table (IDT).
    static ref IDT: InterruptDescriptorTable = {
        let mut idt = InterruptDescriptorTable::new();
        idt.double_fault.set_handler_fn(double_fault_handler);

        // Hardware interrupts
        idt[InterruptIndex::Timer.as_usize()]
            .set_handler_fn(timer_interrupt_handler);
        idt[InterruptIndex::Com1.as_usize()]
            .set_handler_fn(com1_interrupt_handler);

        idt
    };
}

/// Loads the IDT, remaps the PICs and enables hardware interrupts.
pub fn init_idt() {
    IDT.load();
    pic::init();
    ::x86_64::instructions::interrupts::enable();
}

/// Handler for the timer interrupt.
extern "x86-interrupt" fn timer_interrupt_handler(_stack_frame: InterruptStackFrame) {
    TIMEBASE.on_tick();
    pic::end_of_interrupt(InterruptIndex::Timer);
}

/// Handler for the COM1 receive interrupt.
extern "x86-interrupt" fn com1_interrupt_handler(_stack_frame: InterruptStackFrame) {
    CONSOLE.on_rx_interrupt();
    pic::end_of_interrupt(InterruptIndex::Com1);
}

/// Handler for the double fault exception.
extern "x86-interrupt" fn double_fault_handler(
    stack_frame: InterruptStackFrame,
    _error_code: u64,
) -> ! {
    panic!("EXCEPTION: DOUBLE FAULT\n{:#?}", stack_frame);
}
