//! BIT STRING (UNIVERSAL 3).
//!
//! The first content octet counts the unused bits (0-7) at the end of the
//! last data octet. Bits are numbered from the most significant bit of the
//! first data octet: bit `i` lives in octet `i / 8` under mask `0x80 >> (i % 8)`.

use super::{BerType, decode_segments};
use crate::ber::{ByteCursor, Decoder, Length, Tag};
use crate::error::{DecodeErrorKind, Error, Result};

/// A BIT STRING value.
///
/// Equality compares the bit length and the bits inside it; bits past the
/// end in the last octet are ignored.
#[derive(Debug, Clone, Default)]
pub struct BitString {
    data: Vec<u8>,
    bit_len: usize,
}

impl BitString {
    /// Create a string of `bit_len` cleared bits.
    pub fn new(bit_len: usize) -> Self {
        Self {
            data: vec![0; bit_len.div_ceil(8)],
            bit_len,
        }
    }

    /// Create from data octets and an unused-bit count for the last octet.
    ///
    /// Returns `None` if `unused_bits > 7`, or nonzero with empty data.
    pub fn from_bytes(data: impl Into<Vec<u8>>, unused_bits: u8) -> Option<Self> {
        let data = data.into();
        if unused_bits > 7 || (data.is_empty() && unused_bits != 0) {
            return None;
        }
        let bit_len = data.len() * 8 - unused_bits as usize;
        Some(Self { data, bit_len })
    }

    /// Number of significant bits.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Returns true if the string holds no bits.
    pub fn is_empty(&self) -> bool {
        self.bit_len == 0
    }

    /// Unused bits in the last octet.
    pub fn unused_bits(&self) -> u8 {
        ((8 - self.bit_len % 8) % 8) as u8
    }

    /// The data octets.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get bit `i`. Bits past the end read as clear.
    pub fn get_bit(&self, i: usize) -> bool {
        i < self.bit_len && self.data[i / 8] & (0x80 >> (i % 8)) != 0
    }

    /// Set bit `i`. Returns false (and does nothing) if `i` is out of range.
    pub fn set_bit(&mut self, i: usize) -> bool {
        if i >= self.bit_len {
            return false;
        }
        self.data[i / 8] |= 0x80 >> (i % 8);
        true
    }

    /// Clear bit `i`. Returns false (and does nothing) if `i` is out of range.
    pub fn clear_bit(&mut self, i: usize) -> bool {
        if i >= self.bit_len {
            return false;
        }
        self.data[i / 8] &= !(0x80 >> (i % 8));
        true
    }

    /// The last data octet with unused bits cleared.
    fn masked_last(&self) -> Option<u8> {
        let last = *self.data.last()?;
        Some(last & (0xFFu8 << self.unused_bits()))
    }
}

impl PartialEq for BitString {
    fn eq(&self, other: &Self) -> bool {
        if self.bit_len != other.bit_len {
            return false;
        }
        let full = self.data.len().saturating_sub(1);
        self.data[..full] == other.data[..full] && self.masked_last() == other.masked_last()
    }
}

impl Eq for BitString {}

impl BerType for BitString {
    const TAG: Tag = Tag::BIT_STRING;

    fn encode_content(&self, buf: &mut ByteCursor) -> usize {
        let mut len = 1;
        if let Some(last) = self.masked_last() {
            buf.put_byte_reverse(last);
            len += 1 + buf.push_bytes(&self.data[..self.data.len() - 1]);
        }
        buf.put_byte_reverse(self.unused_bits());
        len
    }

    fn decode_content(dec: &mut Decoder<'_>, tag: Tag, len: Length) -> Result<Self> {
        if !tag.is_constructed() {
            let len = dec.primitive_len(len)?;
            let (data, unused) = read_segment(dec, len)?;
            return Ok(Self {
                bit_len: data.len() * 8 - unused as usize,
                data: data.to_vec(),
            });
        }

        // Only the last segment's unused-bit count applies
        let mut data = Vec::new();
        let mut unused = 0u8;
        decode_segments(
            dec,
            Tag::BIT_STRING,
            len,
            &mut |dec: &mut Decoder<'_>, len: usize| -> Result<()> {
                let (segment, segment_unused) = read_segment(dec, len)?;
                data.extend_from_slice(segment);
                unused = segment_unused;
                Ok(())
            },
        )?;
        if data.is_empty() && unused != 0 {
            return Err(dec.error(DecodeErrorKind::InvalidUnusedBits(unused)));
        }
        Ok(Self {
            bit_len: data.len() * 8 - unused as usize,
            data,
        })
    }
}

/// Read one primitive segment: the unused-bit octet and the data octets.
fn read_segment<'d>(dec: &'d mut Decoder<'_>, len: usize) -> Result<(&'d [u8], u8)> {
    let offset = dec.offset();
    if len == 0 {
        return Err(dec.error(DecodeErrorKind::EmptyBitString));
    }
    let unused = dec.cursor().get_byte();
    if unused > 7 || (len == 1 && unused != 0) {
        return Err(Error::decode(offset, DecodeErrorKind::InvalidUnusedBits(unused)));
    }
    let data = dec.take_bytes(len - 1)?;
    Ok((data, unused))
}

#[cfg(test)]
mod tests {
    use super::super::test_util::{decode, encode};
    use super::*;

    fn alternating(bit_len: usize) -> BitString {
        let mut bits = BitString::new(bit_len);
        for i in (0..bit_len).step_by(2) {
            bits.set_bit(i);
        }
        bits
    }

    #[test]
    fn test_set_and_clear_bits() {
        let mut bits = BitString::new(10);
        assert!(bits.set_bit(0));
        assert!(bits.set_bit(9));
        assert!(!bits.set_bit(10));
        assert_eq!(bits.as_bytes(), &[0x80, 0x40]);
        assert!(bits.get_bit(9));
        assert!(bits.clear_bit(0));
        assert!(!bits.get_bit(0));
        assert_eq!(bits.unused_bits(), 6);
    }

    #[test]
    fn test_encode_alternating_ten_bits() {
        // 1010101010 -> AA 80 with 6 unused bits
        assert_eq!(
            encode(&alternating(10)),
            vec![0x03, 0x03, 0x06, 0xAA, 0x80]
        );
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode(&BitString::new(0)), vec![0x03, 0x01, 0x00]);
        assert_eq!(decode::<BitString>(&[0x03, 0x01, 0x00]).unwrap(), BitString::new(0));
    }

    #[test]
    fn test_equality_ignores_unused_bits() {
        let a = BitString::from_bytes(vec![0xAA, 0x80], 6).unwrap();
        let b = BitString::from_bytes(vec![0xAA, 0xBF], 6).unwrap();
        assert_eq!(a, b);
        let c = BitString::from_bytes(vec![0xAA, 0x80], 5).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_encode_masks_unused_bits() {
        let bits = BitString::from_bytes(vec![0xFF], 4).unwrap();
        assert_eq!(encode(&bits), vec![0x03, 0x02, 0x04, 0xF0]);
    }

    #[test]
    fn test_decode_trailing_garbage_ignored_by_eq() {
        let decoded = decode::<BitString>(&[0x03, 0x03, 0x06, 0xAA, 0xBF]).unwrap();
        assert_eq!(decoded, alternating(10));
        assert_eq!(decoded.bit_len(), 10);
    }

    #[test]
    fn test_decode_constructed() {
        let bytes = [
            0x23, 0x80, // constructed, indefinite
            0x03, 0x02, 0x00, 0xAA, // 8 bits, no unused
            0x03, 0x02, 0x06, 0x80, // 2 bits
            0x00, 0x00,
        ];
        assert_eq!(decode::<BitString>(&bytes).unwrap(), alternating(10));
    }

    #[test]
    fn test_decode_invalid_unused_bits() {
        let err = decode::<BitString>(&[0x03, 0x02, 0x08, 0x00]).unwrap_err();
        assert_eq!(err.decode_kind(), Some(DecodeErrorKind::InvalidUnusedBits(8)));
        let err = decode::<BitString>(&[0x03, 0x01, 0x03]).unwrap_err();
        assert_eq!(err.decode_kind(), Some(DecodeErrorKind::InvalidUnusedBits(3)));
        let err = decode::<BitString>(&[0x03, 0x00]).unwrap_err();
        assert_eq!(err.decode_kind(), Some(DecodeErrorKind::EmptyBitString));
    }

    #[test]
    fn test_from_bytes_validation() {
        assert!(BitString::from_bytes(vec![0x00], 8).is_none());
        assert!(BitString::from_bytes(Vec::new(), 1).is_none());
        assert_eq!(BitString::from_bytes(vec![0xF0], 4).unwrap().bit_len(), 4);
    }
}
