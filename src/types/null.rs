//! NULL (UNIVERSAL 5).

use super::{BerType, primitive_len};
use crate::ber::{ByteCursor, Decoder, Length, Tag};
use crate::error::{DecodeErrorKind, Result};

/// The NULL value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Null;

impl BerType for Null {
    const TAG: Tag = Tag::NULL;

    fn encode_content(&self, _buf: &mut ByteCursor) -> usize {
        0
    }

    fn decode_content(dec: &mut Decoder<'_>, tag: Tag, len: Length) -> Result<Self> {
        if primitive_len(dec, tag, len)? != 0 {
            return Err(dec.error(DecodeErrorKind::InvalidNull));
        }
        Ok(Null)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_util::{decode, encode};
    use super::*;

    #[test]
    fn test_encode_null() {
        assert_eq!(encode(&Null), vec![0x05, 0x00]);
        assert_eq!(decode::<Null>(&[0x05, 0x00]).unwrap(), Null);
    }

    #[test]
    fn test_decode_non_empty_null() {
        let err = decode::<Null>(&[0x05, 0x01, 0x00]).unwrap_err();
        assert_eq!(err.decode_kind(), Some(DecodeErrorKind::InvalidNull));
    }
}
