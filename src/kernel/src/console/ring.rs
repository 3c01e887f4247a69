//! Receive ring buffer.

/// Fixed-capacity byte queue filled by the receive interrupt.
///
/// `write` and `read` only ever increase (wrapping) and are masked when a
/// slot is indexed, so `write - read` is always the fill level. The capacity
/// is a power of two no larger than 2^31, which keeps the masking correct
/// across index wraparound. When full, [`push`](Self::push) drops the new
/// byte and unread data is never overwritten.
pub struct RxRing<const N: usize> {
    buf: [u8; N],
    write: u32,
    read: u32,
}

impl<const N: usize> RxRing<N> {
    const CAPACITY_OK: () = assert!(
        N.is_power_of_two() && N <= 1 << 31,
        "ring capacity must be a power of two no larger than 2^31"
    );

    /// Creates an empty ring.
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAPACITY_OK;
        Self {
            buf: [0; N],
            write: 0,
            read: 0,
        }
    }

    /// Number of buffered bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.write.wrapping_sub(self.read) as usize
    }

    /// Returns `true` if no byte is buffered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.write == self.read
    }

    /// Returns `true` if the next [`push`](Self::push) would drop its byte.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == N
    }

    /// Total capacity in bytes.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Appends a byte. Returns `false`, leaving the ring untouched, when full.
    #[inline]
    pub fn push(&mut self, byte: u8) -> bool {
        if self.is_full() {
            return false;
        }
        self.buf[Self::slot(self.write)] = byte;
        self.write = self.write.wrapping_add(1);
        true
    }

    /// Removes the oldest byte.
    #[inline]
    pub fn pop(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        let byte = self.buf[Self::slot(self.read)];
        self.read = self.read.wrapping_add(1);
        Some(byte)
    }

    #[inline]
    fn slot(index: u32) -> usize {
        index as usize & (N - 1)
    }

    #[cfg(test)]
    fn with_indices(start: u32) -> Self {
        let mut ring = Self::new();
        ring.write = start;
        ring.read = start;
        ring
    }
}

impl<const N: usize> Default for RxRing<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut ring = RxRing::<8>::new();
        for b in b"hello" {
            assert!(ring.push(*b));
        }
        assert_eq!(ring.len(), 5);
        let mut out = [0u8; 5];
        for slot in out.iter_mut() {
            *slot = ring.pop().expect("byte buffered");
        }
        assert_eq!(&out, b"hello");
        assert_eq!(ring.pop(), None);
    }

    #[test]
    fn test_full_drops_newest() {
        let mut ring = RxRing::<4>::new();
        for b in 0..4u8 {
            assert!(ring.push(b));
        }
        assert!(ring.is_full());
        assert!(!ring.push(99));
        assert!(!ring.push(100));
        assert_eq!(ring.len(), 4);
        for b in 0..4u8 {
            assert_eq!(ring.pop(), Some(b));
        }
        assert!(ring.is_empty());
    }

    #[test]
    fn test_indices_wrap() {
        let mut ring = RxRing::<4>::with_indices(u32::MAX - 1);
        for b in 10..14u8 {
            assert!(ring.push(b));
        }
        assert!(ring.is_full());
        assert!(!ring.push(0));
        for b in 10..14u8 {
            assert_eq!(ring.pop(), Some(b));
        }
        assert!(ring.is_empty());
        assert!(ring.push(42));
        assert_eq!(ring.pop(), Some(42));
    }

    #[test]
    fn test_zero_byte_is_data() {
        let mut ring = RxRing::<2>::new();
        assert!(ring.push(0));
        assert_eq!(ring.pop(), Some(0));
        assert_eq!(ring.pop(), None);
    }
}
