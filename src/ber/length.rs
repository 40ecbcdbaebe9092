//! BER length octets and end-of-contents markers.
//!
//! - Short form: one octet, high bit clear, value 0-127.
//! - Long form: `0x80 | n` followed by `n` big-endian length octets.
//! - Indefinite: the single octet `0x80`; content ends with two zero octets (EOC).

use super::ByteCursor;
use crate::error::{DecodeErrorKind, Error, Result};

/// Octet introducing an indefinite length.
pub const INDEFINITE_OCTET: u8 = 0x80;

/// The length of an encoded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    /// Number of content octets.
    Definite(usize),
    /// Content is terminated by an end-of-contents marker.
    Indefinite,
}

impl Length {
    /// Returns the length if it is definite.
    pub fn definite(self) -> Option<usize> {
        match self {
            Length::Definite(len) => Some(len),
            Length::Indefinite => None,
        }
    }

    /// Returns true for the indefinite form.
    pub fn is_indefinite(self) -> bool {
        matches!(self, Length::Indefinite)
    }

    /// Number of octets this length encodes to.
    pub fn encoded_len(self) -> usize {
        match self {
            Length::Indefinite => 1,
            Length::Definite(len) if len < 128 => 1,
            Length::Definite(len) => 1 + length_octets(len),
        }
    }
}

/// Number of octets needed for `len` in big-endian without leading zeros.
fn length_octets(len: usize) -> usize {
    let bits = usize::BITS - len.leading_zeros();
    bits.div_ceil(8).max(1) as usize
}

/// Write a definite length, returning the number of octets written.
pub fn encode_length(buf: &mut ByteCursor, len: usize) -> usize {
    if len < 128 {
        buf.put_byte_reverse(len as u8);
        return 1;
    }

    let count = length_octets(len);
    let mut rest = len;
    for _ in 0..count {
        buf.put_byte_reverse(rest as u8);
        rest >>= 8;
    }
    buf.put_byte_reverse(0x80 | count as u8);
    count + 1
}

/// Write the indefinite-length octet.
pub fn encode_indefinite_length(buf: &mut ByteCursor) -> usize {
    buf.put_byte_reverse(INDEFINITE_OCTET);
    1
}

/// Write an end-of-contents marker.
pub fn encode_eoc(buf: &mut ByteCursor) -> usize {
    buf.put_byte_reverse(0);
    buf.put_byte_reverse(0);
    2
}

/// Read length octets, returning the length and the number of octets consumed.
pub fn decode_length(buf: &mut ByteCursor) -> Result<(Length, usize)> {
    let offset = buf.position();
    let first = buf.get_byte();
    if buf.has_read_error() {
        return Err(Error::decode(offset, DecodeErrorKind::TruncatedData));
    }

    if first & 0x80 == 0 {
        return Ok((Length::Definite(first as usize), 1));
    }
    if first == INDEFINITE_OCTET {
        return Ok((Length::Indefinite, 1));
    }
    // X.690 8.1.3.5: 0xFF is reserved
    if first == 0xFF {
        return Err(Error::decode(offset, DecodeErrorKind::InvalidLength));
    }

    let count = (first & 0x7F) as usize;
    let mut len: usize = 0;
    let mut significant = 0;
    for _ in 0..count {
        let octet = buf.get_byte();
        if buf.has_read_error() {
            return Err(Error::decode(buf.position(), DecodeErrorKind::TruncatedData));
        }
        // Leading zero octets are legal in BER, so only count the rest
        if significant > 0 || octet != 0 {
            significant += 1;
        }
        if significant > std::mem::size_of::<usize>() {
            return Err(Error::decode(
                offset,
                DecodeErrorKind::LengthTooLong { octets: count },
            ));
        }
        len = (len << 8) | octet as usize;
    }

    Ok((Length::Definite(len), count + 1))
}

/// Consume an end-of-contents marker, returning the number of octets consumed.
///
/// A nonzero first octet means this is not an EOC and is an error. A nonzero
/// second octet is tolerated with a warning.
pub fn decode_eoc(buf: &mut ByteCursor) -> Result<usize> {
    let offset = buf.position();
    let first = buf.get_byte();
    let second = buf.get_byte();
    if buf.has_read_error() {
        return Err(Error::decode(buf.position(), DecodeErrorKind::TruncatedData));
    }
    if first != 0 {
        return Err(Error::decode(offset, DecodeErrorKind::InvalidEoc));
    }
    if second != 0 {
        tracing::warn!(
            ber.offset = offset,
            ber.octet = second,
            "non-zero second octet in end-of-contents"
        );
    }
    Ok(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(len: usize) -> Vec<u8> {
        let mut buf = ByteCursor::for_write(16);
        let written = encode_length(&mut buf, len);
        assert_eq!(written, buf.data_length());
        assert_eq!(written, Length::Definite(len).encoded_len());
        buf.data().to_vec()
    }

    fn decode(bytes: &[u8]) -> Result<(Length, usize)> {
        let mut buf = ByteCursor::for_read(bytes.to_vec());
        decode_length(&mut buf)
    }

    #[test]
    fn test_encode_short_form() {
        assert_eq!(encode(0), vec![0x00]);
        assert_eq!(encode(127), vec![0x7F]);
    }

    #[test]
    fn test_encode_long_form() {
        assert_eq!(encode(128), vec![0x81, 0x80]);
        assert_eq!(encode(255), vec![0x81, 0xFF]);
        assert_eq!(encode(256), vec![0x82, 0x01, 0x00]);
        assert_eq!(encode(99999), vec![0x83, 0x01, 0x86, 0x9F]);
    }

    #[test]
    fn test_roundtrip_boundaries() {
        for len in [0, 1, 127, 128, 255, 256, 65535, 65536, 99999, usize::MAX] {
            let bytes = encode(len);
            assert_eq!(decode(&bytes).unwrap(), (Length::Definite(len), bytes.len()));
        }
    }

    #[test]
    fn test_indefinite() {
        let mut buf = ByteCursor::for_write(4);
        assert_eq!(encode_indefinite_length(&mut buf), 1);
        assert_eq!(buf.data(), &[0x80]);
        assert_eq!(decode(&[0x80]).unwrap(), (Length::Indefinite, 1));
    }

    #[test]
    fn test_eoc_roundtrip() {
        let mut buf = ByteCursor::for_write(4);
        assert_eq!(encode_eoc(&mut buf), 2);
        buf.reset_for_read();
        assert_eq!(decode_eoc(&mut buf).unwrap(), 2);
        assert!(buf.at_end());
    }

    #[test]
    fn test_eoc_nonzero_second_octet_is_tolerated() {
        let mut buf = ByteCursor::for_read(vec![0x00, 0x05]);
        assert_eq!(decode_eoc(&mut buf).unwrap(), 2);
    }

    #[test]
    fn test_eoc_nonzero_first_octet() {
        let mut buf = ByteCursor::for_read(vec![0x02, 0x00]);
        assert_eq!(
            decode_eoc(&mut buf).unwrap_err().decode_kind(),
            Some(DecodeErrorKind::InvalidEoc)
        );
    }

    #[test]
    fn test_eoc_truncated() {
        let mut buf = ByteCursor::for_read(vec![0x00]);
        assert!(decode_eoc(&mut buf).unwrap_err().is_truncated());
    }

    #[test]
    fn test_decode_non_minimal_long_form() {
        // Permissive: leading zero octets are accepted
        assert_eq!(decode(&[0x82, 0x00, 0x05]).unwrap(), (Length::Definite(5), 3));
        assert_eq!(
            decode(&[0x8A, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x10]).unwrap(),
            (Length::Definite(16), 11)
        );
    }

    #[test]
    fn test_decode_errors() {
        assert!(decode(&[]).unwrap_err().is_truncated());
        assert!(decode(&[0x82, 0x01]).unwrap_err().is_truncated());
        assert_eq!(
            decode(&[0xFF]).unwrap_err().decode_kind(),
            Some(DecodeErrorKind::InvalidLength)
        );
        assert_eq!(
            decode(&[0x89, 1, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap_err().decode_kind(),
            Some(DecodeErrorKind::LengthTooLong { octets: 9 })
        );
    }
}
