//! BOOLEAN (UNIVERSAL 1).
//!
//! Encoders emit `0xFF` for true; decoders accept any nonzero octet as true.

use super::{BerType, primitive_len};
use crate::ber::{ByteCursor, Decoder, Length, Tag};
use crate::error::{DecodeErrorKind, Result};

impl BerType for bool {
    const TAG: Tag = Tag::BOOLEAN;

    fn encode_content(&self, buf: &mut ByteCursor) -> usize {
        buf.put_byte_reverse(if *self { 0xFF } else { 0x00 });
        1
    }

    fn decode_content(dec: &mut Decoder<'_>, tag: Tag, len: Length) -> Result<Self> {
        let len = primitive_len(dec, tag, len)?;
        if len != 1 {
            return Err(dec.error(DecodeErrorKind::InvalidBoolean { length: len }));
        }
        Ok(dec.cursor().get_byte() != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_util::{decode, encode};
    use super::*;

    #[test]
    fn test_encode_boolean() {
        assert_eq!(encode(&true), vec![0x01, 0x01, 0xFF]);
        assert_eq!(encode(&false), vec![0x01, 0x01, 0x00]);
    }

    #[test]
    fn test_decode_any_nonzero_is_true() {
        assert!(decode::<bool>(&[0x01, 0x01, 0x01]).unwrap());
        assert!(decode::<bool>(&[0x01, 0x01, 0x80]).unwrap());
        assert!(!decode::<bool>(&[0x01, 0x01, 0x00]).unwrap());
    }

    #[test]
    fn test_decode_wrong_length() {
        let err = decode::<bool>(&[0x01, 0x02, 0xFF, 0xFF]).unwrap_err();
        assert_eq!(
            err.decode_kind(),
            Some(DecodeErrorKind::InvalidBoolean { length: 2 })
        );
        let err = decode::<bool>(&[0x01, 0x00]).unwrap_err();
        assert_eq!(
            err.decode_kind(),
            Some(DecodeErrorKind::InvalidBoolean { length: 0 })
        );
    }

    #[test]
    fn test_decode_constructed_rejected() {
        let err = decode::<bool>(&[0x21, 0x01, 0xFF]).unwrap_err();
        assert_eq!(err.decode_kind(), Some(DecodeErrorKind::UnexpectedConstructed));
    }
}
