//! INTEGER (UNIVERSAL 2).
//!
//! Content is the minimal two's-complement big-endian representation.
//! `i64` is the native width; `i32` decodes through it and rejects values
//! that do not fit.

use super::{BerType, primitive_len};
use crate::ber::{ByteCursor, Decoder, Length, Tag, encode_integer_stack};
use crate::error::{DecodeErrorKind, Error, Result};

impl BerType for i64 {
    const TAG: Tag = Tag::INTEGER;

    fn encode_content(&self, buf: &mut ByteCursor) -> usize {
        let (arr, len) = encode_integer_stack(*self);
        // Valid bytes are at the end of the array
        buf.push_bytes(&arr[8 - len..])
    }

    fn decode_content(dec: &mut Decoder<'_>, tag: Tag, len: Length) -> Result<Self> {
        let len = primitive_len(dec, tag, len)?;
        decode_integer_content(dec, len)
    }
}

impl BerType for i32 {
    const TAG: Tag = Tag::INTEGER;

    fn encode_content(&self, buf: &mut ByteCursor) -> usize {
        i64::from(*self).encode_content(buf)
    }

    fn decode_content(dec: &mut Decoder<'_>, tag: Tag, len: Length) -> Result<Self> {
        let offset = dec.offset();
        let len = primitive_len(dec, tag, len)?;
        let value = decode_integer_content(dec, len)?;
        i32::try_from(value)
            .map_err(|_| Error::decode(offset, DecodeErrorKind::IntegerOverflow { length: len }))
    }
}

/// Read `len` content octets as a sign-extended integer.
pub(crate) fn decode_integer_content(dec: &mut Decoder<'_>, len: usize) -> Result<i64> {
    if len == 0 {
        return Err(dec.error(DecodeErrorKind::ZeroLengthInteger));
    }
    if len > 8 {
        return Err(dec.error(DecodeErrorKind::IntegerOverflow { length: len }));
    }

    let buf = dec.cursor();
    // Sign-extend from the first octet
    let mut value = buf.get_byte() as i8 as i64;
    for _ in 1..len {
        value = (value << 8) | buf.get_byte() as i64;
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::super::test_util::{decode, encode};
    use super::*;

    #[test]
    fn test_encode_integer_values() {
        assert_eq!(encode(&0i64), vec![0x02, 0x01, 0x00]);
        assert_eq!(encode(&42i64), vec![0x02, 0x01, 0x2A]);
        assert_eq!(encode(&-99i64), vec![0x02, 0x01, 0x9D]);
        assert_eq!(encode(&128i64), vec![0x02, 0x02, 0x00, 0x80]);
        assert_eq!(encode(&-129i64), vec![0x02, 0x02, 0xFF, 0x7F]);
        assert_eq!(encode(&256i32), vec![0x02, 0x02, 0x01, 0x00]);
    }

    #[test]
    fn test_decode_sign_extension() {
        assert_eq!(decode::<i64>(&[0x02, 0x01, 0xFF]).unwrap(), -1);
        assert_eq!(decode::<i64>(&[0x02, 0x01, 0x80]).unwrap(), -128);
        assert_eq!(decode::<i64>(&[0x02, 0x02, 0x00, 0xFF]).unwrap(), 255);
        assert_eq!(decode::<i64>(&[0x02, 0x02, 0xFF, 0x00]).unwrap(), -256);
    }

    #[test]
    fn test_decode_non_minimal_accepted() {
        assert_eq!(decode::<i64>(&[0x02, 0x03, 0x00, 0x00, 0x05]).unwrap(), 5);
        assert_eq!(decode::<i64>(&[0x02, 0x02, 0xFF, 0xFF]).unwrap(), -1);
    }

    #[test]
    fn test_extremes_roundtrip() {
        for value in [i64::MIN, i64::MIN + 1, -1, 0, 1, i64::MAX] {
            let bytes = encode(&value);
            assert_eq!(decode::<i64>(&bytes).unwrap(), value);
        }
    }

    #[test]
    fn test_decode_zero_length() {
        let err = decode::<i64>(&[0x02, 0x00]).unwrap_err();
        assert_eq!(err.decode_kind(), Some(DecodeErrorKind::ZeroLengthInteger));
    }

    #[test]
    fn test_decode_too_long() {
        let mut bytes = vec![0x02, 0x09];
        bytes.extend_from_slice(&[0x01; 9]);
        let err = decode::<i64>(&bytes).unwrap_err();
        assert_eq!(
            err.decode_kind(),
            Some(DecodeErrorKind::IntegerOverflow { length: 9 })
        );
    }

    #[test]
    fn test_i32_range() {
        let bytes = encode(&(i64::from(i32::MAX) + 1));
        let err = decode::<i32>(&bytes).unwrap_err();
        assert!(matches!(
            err.decode_kind(),
            Some(DecodeErrorKind::IntegerOverflow { .. })
        ));
        assert_eq!(decode::<i32>(&encode(&i32::MIN)).unwrap(), i32::MIN);
    }
}
