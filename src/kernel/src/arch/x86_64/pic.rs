//! Support for the primary and secondary 8259 Programmable Interrupt Controllers (PICs).

use pic8259::ChainedPics;
use spin::Mutex;

/// The offset of the first PIC (master).
///
/// IRQs 0..7 are mapped to interrupts 32..39.
pub const PIC_1_OFFSET: u8 = 32;

/// The offset of the second PIC (slave).
///
/// IRQs 8..15 are mapped to interrupts 40..47.
pub const PIC_2_OFFSET: u8 = PIC_1_OFFSET + 8;

/// The global instance of the chained PICs.
pub static PICS: Mutex<ChainedPics> =
    Mutex::new(unsafe { ChainedPics::new(PIC_1_OFFSET, PIC_2_OFFSET) });

/// Possible IRQ indices.
#[derive(Debug, Clone, Copy)]
#[repr(u8)]
pub enum InterruptIndex {
    /// PIT channel 0 (IRQ0).
    Timer = PIC_1_OFFSET,
    /// COM1 (IRQ4).
    Com1 = PIC_1_OFFSET + 4,
}

impl InterruptIndex {
    /// Returns the internal u8 value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Returns the internal usize value.
    pub fn as_usize(self) -> usize {
        usize::from(self as u8)
    }

    /// Bit for this line in the master PIC's mask register.
    const fn mask_bit(self) -> u8 {
        1 << (self as u8 - PIC_1_OFFSET)
    }
}

/// Remaps both PICs and unmasks only the lines the kernel handles.
pub fn init() {
    let master = !(InterruptIndex::Timer.mask_bit() | InterruptIndex::Com1.mask_bit());
    let mut pics = PICS.lock();
    // SAFETY: the offsets do not overlap CPU exceptions, and the IDT has
    // handlers for every unmasked line.
    unsafe {
        pics.initialize();
        pics.write_masks(master, 0xFF);
    }
}

/// Signals end of interrupt for `index`.
pub fn end_of_interrupt(index: InterruptIndex) {
    // SAFETY: called at the end of the handler for `index`.
    unsafe {
        PICS.lock().notify_end_of_interrupt(index.as_u8());
    }
}
