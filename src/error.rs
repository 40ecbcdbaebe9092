//! Error types for snacc-ber.
//!
//! Buffer-level operations never fail at the call site; they set sticky
//! flags on the [`ByteCursor`](crate::ber::ByteCursor). Structural problems
//! found while decoding tags, lengths and contents are reported as
//! [`Error::Decode`], and the PDU entry points turn leftover flag state into
//! [`Error::BufferOverflow`] or a truncation error.
//!
//! All errors are `#[non_exhaustive]` to allow adding new variants without breaking changes.

use crate::any::Discriminator;
use crate::ber::Tag;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// BER decode error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Expected different tag.
    UnexpectedTag { expected: Tag, actual: Tag },
    /// Data truncated unexpectedly.
    TruncatedData,
    /// Invalid BER length encoding.
    InvalidLength,
    /// Length field too long for this platform.
    LengthTooLong { octets: usize },
    /// TLV extends past end of data.
    TlvOverflow { length: usize, available: usize },
    /// Tag number needs more octets than supported.
    TagTooLong,
    /// BOOLEAN content is not exactly one octet.
    InvalidBoolean { length: usize },
    /// Zero-length integer.
    ZeroLengthInteger,
    /// Integer does not fit in 64 bits.
    IntegerOverflow { length: usize },
    /// Invalid OID encoding.
    InvalidOidEncoding,
    /// OID subidentifier does not fit in 32 bits.
    SubidentifierOverflow,
    /// BIT STRING unused-bit count out of range.
    InvalidUnusedBits(u8),
    /// BIT STRING without the initial unused-bits octet.
    EmptyBitString,
    /// Constructed encoding for a type that is always primitive.
    UnexpectedConstructed,
    /// Indefinite length on a primitive encoding.
    IndefinitePrimitive,
    /// Nesting deeper than the configured maximum.
    DepthExceeded { max: usize },
    /// End-of-contents expected but first octet is nonzero.
    InvalidEoc,
    /// REAL content uses a reserved or malformed form.
    InvalidReal,
    /// NULL with non-zero length.
    InvalidNull,
    /// Constructed content does not end at its declared length.
    LengthMismatch { expected: usize, actual: usize },
    /// Bytes left over after the top-level value.
    TrailingData { remaining: usize },
}

impl std::fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedTag { expected, actual } => {
                write!(f, "expected tag {}, got {}", expected, actual)
            }
            Self::TruncatedData => write!(f, "unexpected end of data"),
            Self::InvalidLength => write!(f, "invalid length encoding"),
            Self::LengthTooLong { octets } => {
                write!(f, "length encoding too long ({} octets)", octets)
            }
            Self::TlvOverflow { length, available } => {
                write!(
                    f,
                    "TLV length {} exceeds {} remaining bytes",
                    length, available
                )
            }
            Self::TagTooLong => write!(f, "tag number too large"),
            Self::InvalidBoolean { length } => {
                write!(f, "BOOLEAN must be 1 byte, got {}", length)
            }
            Self::ZeroLengthInteger => write!(f, "zero-length integer"),
            Self::IntegerOverflow { length } => {
                write!(f, "integer too long: {} bytes", length)
            }
            Self::InvalidOidEncoding => write!(f, "invalid OID encoding"),
            Self::SubidentifierOverflow => write!(f, "subidentifier overflow"),
            Self::InvalidUnusedBits(n) => write!(f, "invalid unused bit count {}", n),
            Self::EmptyBitString => write!(f, "BIT STRING without unused-bits octet"),
            Self::UnexpectedConstructed => {
                write!(f, "constructed encoding not allowed for this type")
            }
            Self::IndefinitePrimitive => {
                write!(f, "indefinite length on primitive encoding")
            }
            Self::DepthExceeded { max } => {
                write!(f, "nesting exceeds maximum depth {}", max)
            }
            Self::InvalidEoc => write!(f, "invalid end-of-contents octets"),
            Self::InvalidReal => write!(f, "invalid REAL encoding"),
            Self::InvalidNull => write!(f, "NULL with non-zero length"),
            Self::LengthMismatch { expected, actual } => {
                write!(
                    f,
                    "constructed content ended at {} but length says {}",
                    actual, expected
                )
            }
            Self::TrailingData { remaining } => {
                write!(f, "{} bytes of trailing data", remaining)
            }
        }
    }
}

/// BER encode error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeErrorKind {
    /// ANY value has no payload to encode.
    EmptyAny,
    /// ANY value was never bound to a registry entry.
    UnboundAny,
}

impl std::fmt::Display for EncodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyAny => write!(f, "ANY value has no payload"),
            Self::UnboundAny => write!(f, "ANY value is not bound to a type"),
        }
    }
}

/// OID validation error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OidErrorKind {
    /// Empty OID string.
    Empty,
    /// Invalid arc value.
    InvalidArc,
    /// First arc must be 0, 1, or 2.
    InvalidFirstArc(u32),
    /// Second arc too large for first arc value.
    InvalidSecondArc { first: u32, second: u32 },
    /// OID too short (minimum 2 arcs).
    TooShort,
}

impl std::fmt::Display for OidErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty OID"),
            Self::InvalidArc => write!(f, "invalid arc value"),
            Self::InvalidFirstArc(v) => write!(f, "first arc must be 0, 1, or 2, got {}", v),
            Self::InvalidSecondArc { first, second } => {
                write!(f, "second arc {} too large for first arc {}", second, first)
            }
            Self::TooShort => write!(f, "OID must have at least 2 arcs"),
        }
    }
}

/// Library error type.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Encoded value did not fit in the write block.
    #[error("buffer overflow: {needed} bytes needed, block holds {capacity}")]
    BufferOverflow { needed: usize, capacity: usize },

    /// BER decoding error.
    #[error("decode error at offset {offset}: {kind}")]
    Decode {
        offset: usize,
        kind: DecodeErrorKind,
    },

    /// BER encoding error.
    #[error("encode error: {kind}")]
    Encode { kind: EncodeErrorKind },

    /// No registry entry for an ANY discriminator.
    ///
    /// Whether this is fatal is up to the caller: optional ANY fields may
    /// tolerate it, required ones usually propagate it.
    #[error("no ANY type registered for {discriminator}")]
    UnresolvedAny { discriminator: Discriminator },

    /// ANY decoded before being bound to a type.
    ///
    /// This is a schema wiring error (the discriminator field was not
    /// processed first), not a problem with the input data.
    #[error("ANY value decoded before its type was set")]
    UnboundAny,

    /// Payload type differs from the prototype of the bound ANY entry.
    #[error("value type does not match ANY binding {any_id}")]
    AnyTypeMismatch { any_id: u32 },

    /// Invalid OID format.
    #[error("invalid OID: {kind}")]
    InvalidOid {
        kind: OidErrorKind,
        input: Option<Box<str>>, // Only allocated when parsing string input
    },
}

impl Error {
    /// Create a decode error.
    pub fn decode(offset: usize, kind: DecodeErrorKind) -> Self {
        Self::Decode { offset, kind }
    }

    /// Create an encode error.
    pub fn encode(kind: EncodeErrorKind) -> Self {
        Self::Encode { kind }
    }

    /// Create an invalid OID error from a kind (no input string).
    pub fn invalid_oid(kind: OidErrorKind) -> Self {
        Self::InvalidOid { kind, input: None }
    }

    /// Create an invalid OID error with the input string that failed.
    pub fn invalid_oid_with_input(kind: OidErrorKind, input: impl Into<Box<str>>) -> Self {
        Self::InvalidOid {
            kind,
            input: Some(input.into()),
        }
    }

    /// Get the decode error kind, if this is a decode error.
    pub fn decode_kind(&self) -> Option<DecodeErrorKind> {
        match self {
            Self::Decode { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Returns true if the input ended before the value was complete.
    pub fn is_truncated(&self) -> bool {
        matches!(self.decode_kind(), Some(DecodeErrorKind::TruncatedData))
    }
}
