//! Presence bit vector: which optional fields of a record are present.
//!
//! Bits are 1-indexed (bit 0 is reserved) and packed least-significant
//! bit first:
//!
//! ```text
//! bit:   8 7 6 5 4 3 2 1     16 15 14 13 12 11 10 9
//!       ┌───────────────┐   ┌──────────────────────┐
//! byte: │       0       │   │          1           │  ...
//!       └───────────────┘   └──────────────────────┘
//! ```
//!
//! So bit `i` lives in byte `(i - 1) / 8` under mask `1 << ((i - 1) % 8)`.

/// Largest presence field any layout may declare (64 optional fields).
pub const MAX_PRESENCE_BYTES: usize = 8;

/// A fixed-capacity set of presence flags.
///
/// Stored inline (no heap allocation) because one is built for every
/// record on every serialize/deserialize call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceBits {
    bytes: [u8; MAX_PRESENCE_BYTES],
    width: usize,
}

impl PresenceBits {
    /// Creates an all-clear vector `width` bytes wide.
    pub fn new(width: usize) -> Self {
        debug_assert!(
            width <= MAX_PRESENCE_BYTES,
            "presence width {width} exceeds {MAX_PRESENCE_BYTES}"
        );
        Self {
            bytes: [0; MAX_PRESENCE_BYTES],
            width: width.min(MAX_PRESENCE_BYTES),
        }
    }

    /// Builds a vector from raw bytes read off the wire.
    ///
    /// Bytes beyond [`MAX_PRESENCE_BYTES`] are ignored; the reader only
    /// calls this with a width taken from a validated layout.
    pub fn from_bytes(raw: &[u8]) -> Self {
        let width = raw.len().min(MAX_PRESENCE_BYTES);
        let mut bytes = [0; MAX_PRESENCE_BYTES];
        bytes[..width].copy_from_slice(&raw[..width]);
        Self { bytes, width }
    }

    /// Marks optional field `bit` as present.
    pub fn set(&mut self, bit: u16) {
        match self.locate(bit) {
            Some((byte, mask)) => self.bytes[byte] |= mask,
            None => debug_assert!(
                false,
                "presence bit {bit} outside 1..={}",
                self.width * 8
            ),
        }
    }

    /// Sets `bit` when `present` is true. Handy for `Option` fields:
    /// `bits.set_if(3, self.name.is_some())`.
    pub fn set_if(&mut self, bit: u16, present: bool) {
        if present {
            self.set(bit);
        }
    }

    /// Returns whether optional field `bit` is present.
    ///
    /// Bits outside the vector read as absent.
    pub fn is_set(&self, bit: u16) -> bool {
        self.locate(bit)
            .is_some_and(|(byte, mask)| self.bytes[byte] & mask != 0)
    }

    /// Width in bytes.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The packed bytes, exactly `width` long.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.width]
    }

    fn locate(&self, bit: u16) -> Option<(usize, u8)> {
        if bit == 0 {
            return None;
        }
        let index = usize::from(bit - 1);
        let byte = index / 8;
        (byte < self.width).then(|| (byte, 1u8 << (index % 8)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_all_clear() {
        let bits = PresenceBits::new(2);
        assert_eq!(bits.as_bytes(), &[0, 0]);
        assert!((1..=16).all(|b| !bits.is_set(b)));
    }

    #[test]
    fn test_bit_one_is_lowest_bit_of_first_byte() {
        let mut bits = PresenceBits::new(1);
        bits.set(1);
        assert_eq!(bits.as_bytes(), &[0b0000_0001]);
    }

    #[test]
    fn test_second_bit_only() {
        // Two optional fields, only the second present → 0x02.
        let mut bits = PresenceBits::new(1);
        bits.set(2);
        assert_eq!(bits.as_bytes(), &[0x02]);
        assert!(!bits.is_set(1));
        assert!(bits.is_set(2));
    }

    #[test]
    fn test_multi_byte_width() {
        let mut bits = PresenceBits::new(2);
        bits.set(8);
        bits.set(9);
        bits.set(16);
        assert_eq!(bits.as_bytes(), &[0x80, 0x81]);
        assert!(bits.is_set(9));
        assert!(!bits.is_set(10));
    }

    #[test]
    fn test_from_bytes_round_trip() {
        let bits = PresenceBits::from_bytes(&[0x05, 0x01]);
        assert!(bits.is_set(1));
        assert!(!bits.is_set(2));
        assert!(bits.is_set(3));
        assert!(bits.is_set(9));
        assert_eq!(bits.width(), 2);
    }

    #[test]
    fn test_out_of_range_reads_as_absent() {
        let bits = PresenceBits::from_bytes(&[0xFF]);
        assert!(!bits.is_set(0));
        assert!(!bits.is_set(9));
        assert!(bits.is_set(8));
    }

    #[test]
    fn test_set_if() {
        let mut bits = PresenceBits::new(1);
        bits.set_if(1, false);
        bits.set_if(3, true);
        assert_eq!(bits.as_bytes(), &[0x04]);
    }

    #[test]
    fn test_zero_width_vector() {
        let bits = PresenceBits::new(0);
        assert!(bits.as_bytes().is_empty());
        assert!(!bits.is_set(1));
    }
}
