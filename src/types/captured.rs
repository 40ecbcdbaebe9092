//! Raw captured TLVs.

use bytes::Bytes;

use super::{Decode, Encode};
use crate::any::AnyRegistry;
use crate::ber::{ByteCursor, Decoder};
use crate::error::{DecodeErrorKind, Result};

/// One complete encoded value, kept as raw bytes.
///
/// Decoding captures whatever TLV comes next (tag, length and content,
/// including indefinite-length forms and their EOC) without interpreting
/// it. Encoding writes the bytes back unchanged, so a captured value
/// round-trips byte for byte.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Captured {
    bytes: Bytes,
}

impl Captured {
    /// Wrap an already encoded TLV.
    ///
    /// The bytes are not validated; use [`decode_as`](Self::decode_as) to
    /// interpret them.
    pub fn from_encoded(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// The encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Convert into the underlying `Bytes`.
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    /// Decode the captured value as `T`.
    ///
    /// The value must consume the capture exactly.
    pub fn decode_as<T: Decode>(&self, registry: &AnyRegistry) -> Result<T> {
        let mut buf = ByteCursor::for_read(self.bytes.to_vec());
        let mut dec = Decoder::new(&mut buf, registry);
        let value = T::decode(&mut dec)?;
        dec.check_read()?;
        if dec.has_more()? {
            let remaining = dec.cursor().remaining();
            return Err(dec.error(DecodeErrorKind::TrailingData { remaining }));
        }
        Ok(value)
    }
}

impl Encode for Captured {
    fn encode(&self, buf: &mut ByteCursor) -> Result<usize> {
        Ok(buf.push_bytes(&self.bytes))
    }
}

impl Decode for Captured {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        let start = dec.offset();
        dec.skip_value()?;
        let end = dec.offset();
        Ok(Self {
            bytes: Bytes::copy_from_slice(dec.bytes_between(start, end)),
        })
    }
}
