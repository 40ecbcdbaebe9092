//! OCTET STRING (UNIVERSAL 4).
//!
//! Always encoded in primitive form. Decoding also accepts the constructed
//! form, concatenating the nested segments in order.

use std::ops::Deref;

use bytes::Bytes;

use super::{BerType, decode_segments};
use crate::ber::{ByteCursor, Decoder, Length, Tag};
use crate::error::Result;

/// An OCTET STRING value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OctetString(Bytes);

impl OctetString {
    /// Create from bytes.
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Convert into the underlying `Bytes`.
    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl Deref for OctetString {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Bytes> for OctetString {
    fn from(bytes: Bytes) -> Self {
        Self(bytes)
    }
}

impl From<Vec<u8>> for OctetString {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Bytes::from(bytes))
    }
}

impl From<&[u8]> for OctetString {
    fn from(bytes: &[u8]) -> Self {
        Self(Bytes::copy_from_slice(bytes))
    }
}

impl From<&'static str> for OctetString {
    fn from(s: &'static str) -> Self {
        Self(Bytes::from_static(s.as_bytes()))
    }
}

impl BerType for OctetString {
    const TAG: Tag = Tag::OCTET_STRING;

    fn encode_content(&self, buf: &mut ByteCursor) -> usize {
        buf.push_bytes(&self.0)
    }

    fn decode_content(dec: &mut Decoder<'_>, tag: Tag, len: Length) -> Result<Self> {
        if !tag.is_constructed() {
            let len = dec.primitive_len(len)?;
            let bytes = dec.take_bytes(len)?;
            return Ok(Self(Bytes::copy_from_slice(bytes)));
        }

        let mut out = Vec::new();
        decode_segments(
            dec,
            Tag::OCTET_STRING,
            len,
            &mut |dec: &mut Decoder<'_>, len: usize| -> Result<()> {
                out.extend_from_slice(dec.take_bytes(len)?);
                Ok(())
            },
        )?;
        Ok(Self(Bytes::from(out)))
    }
}
