//! GT5X checksum algorithm
//!
//! The checksum is the unsigned 16-bit sum, with wraparound, of every packet
//! byte before the checksum field itself, in transmission order. It is
//! transmitted little-endian as the final two bytes of every packet.

/// Sum a run of bytes with 16-bit wraparound.
///
/// # Examples
///
/// ```
/// use gt5x_core::checksum;
///
/// assert_eq!(checksum::sum(&[0x55, 0xAA]), 0x00FF);
/// assert_eq!(checksum::sum(&[0xFF; 600]), (600u32 * 0xFF % 0x1_0000) as u16);
/// ```
pub fn sum(bytes: &[u8]) -> u16 {
    bytes.iter().fold(0u16, |acc, &b| acc.wrapping_add(b as u16))
}

/// Running checksum accumulator for incrementally decoded frames.
///
/// The [`FrameDecoder`](crate::FrameDecoder) feeds it every byte between the
/// sync pair and the checksum field as they arrive, so verification never
/// needs the payload retained in memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Checksum(u16);

impl Checksum {
    /// Start a new sum over the given prefix (normally the sync pair).
    pub fn over(prefix: &[u8]) -> Self {
        Self(sum(prefix))
    }

    /// Add one byte.
    pub fn push(&mut self, byte: u8) {
        self.0 = self.0.wrapping_add(byte as u16);
    }

    /// Add a run of bytes.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.0 = self.0.wrapping_add(sum(bytes));
    }

    /// The sum accumulated so far.
    pub fn value(self) -> u16 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sum_matches_manual_addition() {
        assert_eq!(sum(&[]), 0);
        assert_eq!(sum(&[1, 2, 3]), 6);
        assert_eq!(sum(&[0x55, 0xAA, 0x01, 0x00]), 0x0100);
    }

    #[test]
    fn sum_wraps_at_16_bits() {
        // 300 * 0xFF = 76500 = 0x12AD4, wraps to 0x2AD4
        assert_eq!(sum(&[0xFF; 300]), 0x2AD4);
    }

    #[test]
    fn incremental_matches_one_shot() {
        let bytes = [0x5A, 0xA5, 0x01, 0x00, 0xDE, 0xAD, 0xBE, 0xEF];
        let mut acc = Checksum::over(&bytes[..2]);
        acc.push(bytes[2]);
        acc.push(bytes[3]);
        acc.extend(&bytes[4..]);
        assert_eq!(acc.value(), sum(&bytes));
    }
}
