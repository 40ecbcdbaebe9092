//! PDU entry points.
//!
//! A [`Codec`] wraps a fresh [`ByteCursor`] around one top-level value,
//! runs its encoder or decoder, and turns the cursor's sticky flags into a
//! single [`Result`]. The free functions [`encode_pdu`] and [`decode_pdu`]
//! use the global [`AnyRegistry`] and default settings.
//!
//! # Example
//!
//! ```
//! use snacc_ber::{AnyRegistry, Codec, OctetString};
//!
//! let registry = AnyRegistry::new();
//! let codec = Codec::new(&registry).block_size(256);
//!
//! let bytes = codec.encode_pdu(&OctetString::from("Hi Mom")).unwrap();
//! let (value, consumed) = codec.decode_pdu::<OctetString>(&bytes).unwrap();
//! assert_eq!(value.as_bytes(), b"Hi Mom");
//! assert_eq!(consumed, bytes.len());
//! ```

use bytes::Bytes;

use crate::any::AnyRegistry;
use crate::ber::{ByteCursor, DEFAULT_MAX_DEPTH, Decoder};
use crate::error::{DecodeErrorKind, Error, Result};
use crate::types::{Decode, Encode};

/// Default write block size (64 KiB).
pub const DEFAULT_BLOCK_SIZE: usize = 65536;

/// Codec settings.
#[derive(Debug, Clone)]
pub struct CodecConfig {
    /// Capacity of the write block used for encoding (default: 65536)
    pub block_size: usize,
    /// Maximum nesting of constructed encodings when decoding (default: 64)
    pub max_depth: usize,
    /// Accept bytes after the top-level value when decoding (default: false)
    pub allow_trailing_data: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
            allow_trailing_data: false,
        }
    }
}

/// Top-level encoder and decoder.
#[derive(Debug, Clone)]
pub struct Codec<'r> {
    registry: &'r AnyRegistry,
    config: CodecConfig,
}

impl<'r> Codec<'r> {
    /// Create a codec resolving `ANY` fields through `registry`.
    pub fn new(registry: &'r AnyRegistry) -> Self {
        Self::with_config(registry, CodecConfig::default())
    }

    /// Create a codec with explicit settings.
    pub fn with_config(registry: &'r AnyRegistry, config: CodecConfig) -> Self {
        Self { registry, config }
    }

    /// Set the write block size.
    pub fn block_size(mut self, size: usize) -> Self {
        self.config.block_size = size;
        self
    }

    /// Set the maximum decode nesting depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    /// Accept or reject trailing bytes after the decoded value.
    pub fn allow_trailing_data(mut self, allow: bool) -> Self {
        self.config.allow_trailing_data = allow;
        self
    }

    /// The registry used for `ANY` resolution.
    pub fn registry(&self) -> &'r AnyRegistry {
        self.registry
    }

    /// Current settings.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode one value into a fresh block.
    ///
    /// Fails with [`Error::BufferOverflow`] if the encoding does not fit in
    /// the configured block size; the error reports the size needed.
    pub fn encode_pdu<T: Encode + ?Sized>(&self, value: &T) -> Result<Bytes> {
        let mut buf = ByteCursor::for_write(self.config.block_size);
        let len = value.encode(&mut buf).inspect_err(|e| {
            tracing::debug!(error = %e, "PDU encode failed");
        })?;
        if buf.has_write_error() {
            tracing::debug!(
                ber.needed = len,
                ber.capacity = self.config.block_size,
                "PDU does not fit in write block"
            );
            return Err(Error::BufferOverflow {
                needed: len,
                capacity: self.config.block_size,
            });
        }
        tracing::trace!(ber.bytes = len, "encoded PDU");
        Ok(buf.finish())
    }

    /// Decode one value, returning it with the number of bytes consumed.
    pub fn decode_pdu<T: Decode>(&self, data: &[u8]) -> Result<(T, usize)> {
        self.decode_pdu_with(data, T::decode)
    }

    /// Decode one value with a custom decoding function.
    ///
    /// Useful for structures decoded by hand, where the function reads the
    /// fields through the [`Decoder`] directly.
    pub fn decode_pdu_with<T, F>(&self, data: &[u8], f: F) -> Result<(T, usize)>
    where
        F: FnOnce(&mut Decoder<'_>) -> Result<T>,
    {
        let mut buf = ByteCursor::for_read(data);
        let mut dec = Decoder::with_max_depth(&mut buf, self.registry, self.config.max_depth);

        let value = f(&mut dec)
            .and_then(|value| dec.check_read().map(|()| value))
            .inspect_err(|e| {
                tracing::debug!(error = %e, ber.bytes = data.len(), "PDU decode failed");
            })?;

        let consumed = dec.offset();
        if consumed < data.len() && !self.config.allow_trailing_data {
            let remaining = data.len() - consumed;
            tracing::debug!(
                ber.offset = consumed,
                ber.remaining = remaining,
                "trailing data after PDU"
            );
            return Err(Error::decode(
                consumed,
                DecodeErrorKind::TrailingData { remaining },
            ));
        }

        tracing::trace!(ber.bytes = consumed, "decoded PDU");
        Ok((value, consumed))
    }
}

impl Codec<'static> {
    /// A codec over the global registry with default settings.
    pub fn global() -> Self {
        Self::new(AnyRegistry::global())
    }
}

/// Encode one value with the global registry and default settings.
pub fn encode_pdu<T: Encode + ?Sized>(value: &T) -> Result<Bytes> {
    Codec::global().encode_pdu(value)
}

/// Decode one value with the global registry and default settings.
pub fn decode_pdu<T: Decode>(data: &[u8]) -> Result<(T, usize)> {
    Codec::global().decode_pdu(data)
}
