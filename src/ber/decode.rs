//! BER decoding over a [`ByteCursor`].
//!
//! [`Decoder`] adds what a bare cursor lacks for structured decoding: it
//! tracks the nesting of constructed values (definite or indefinite), bounds
//! how deep that nesting may go, and carries the [`AnyRegistry`] used to
//! resolve `ANY DEFINED BY` fields.

use smallvec::SmallVec;

use super::length::{Length, decode_eoc, decode_length};
use super::tag::{Tag, decode_tag};
use super::ByteCursor;
use crate::any::AnyRegistry;
use crate::error::{DecodeErrorKind, Error, Result};

/// Default maximum nesting depth for constructed encodings.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// End of one open constructed value.
#[derive(Debug, Clone, Copy)]
enum Frame {
    /// Content ends at this position.
    Definite(usize),
    /// Content ends at an EOC; `closed` once it has been consumed.
    Indefinite { closed: bool },
}

/// Stateful BER decoder.
pub struct Decoder<'a> {
    buf: &'a mut ByteCursor,
    registry: &'a AnyRegistry,
    max_depth: usize,
    frames: SmallVec<[Frame; 8]>,
}

impl<'a> Decoder<'a> {
    /// Create a decoder reading from `buf`.
    pub fn new(buf: &'a mut ByteCursor, registry: &'a AnyRegistry) -> Self {
        Self::with_max_depth(buf, registry, DEFAULT_MAX_DEPTH)
    }

    /// Create a decoder with a custom nesting bound.
    pub fn with_max_depth(
        buf: &'a mut ByteCursor,
        registry: &'a AnyRegistry,
        max_depth: usize,
    ) -> Self {
        Self {
            buf,
            registry,
            max_depth,
            frames: SmallVec::new(),
        }
    }

    /// The underlying cursor.
    pub fn cursor(&mut self) -> &mut ByteCursor {
        &mut *self.buf
    }

    /// The registry used for ANY resolution.
    pub fn registry(&self) -> &'a AnyRegistry {
        self.registry
    }

    /// Current read offset relative to the start of data.
    pub fn offset(&self) -> usize {
        self.buf.position()
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Build a decode error at the current offset.
    pub fn error(&self, kind: DecodeErrorKind) -> Error {
        Error::decode(self.offset(), kind)
    }

    /// Fail with a truncation error if the cursor ran out of data.
    pub fn check_read(&self) -> Result<()> {
        if self.buf.has_read_error() {
            Err(self.error(DecodeErrorKind::TruncatedData))
        } else {
            Ok(())
        }
    }

    /// Read identifier octets.
    pub fn read_tag(&mut self) -> Result<Tag> {
        decode_tag(self.buf).map(|(tag, _)| tag)
    }

    /// Read a tag and check that its class and number match `expected`.
    ///
    /// The constructed bit is not compared; the returned tag carries the
    /// form actually found so content decoders can act on it.
    pub fn expect_tag(&mut self, expected: Tag) -> Result<Tag> {
        let offset = self.offset();
        let actual = self.read_tag()?;
        if !actual.same_type(expected) {
            return Err(Error::decode(
                offset,
                DecodeErrorKind::UnexpectedTag { expected, actual },
            ));
        }
        Ok(actual)
    }

    /// Read length octets.
    ///
    /// Definite lengths larger than the remaining data are rejected here
    /// rather than discovered later as truncation.
    pub fn read_length(&mut self) -> Result<Length> {
        let offset = self.offset();
        let (len, _) = decode_length(self.buf)?;
        if let Length::Definite(n) = len {
            let available = self.buf.remaining();
            if n > available {
                return Err(Error::decode(
                    offset,
                    DecodeErrorKind::TlvOverflow {
                        length: n,
                        available,
                    },
                ));
            }
        }
        Ok(len)
    }

    /// Read a tag and length.
    pub fn read_header(&mut self) -> Result<(Tag, Length)> {
        let tag = self.read_tag()?;
        let len = self.read_length()?;
        Ok((tag, len))
    }

    /// Require a definite length for primitive content.
    pub fn primitive_len(&self, len: Length) -> Result<usize> {
        len.definite()
            .ok_or_else(|| self.error(DecodeErrorKind::IndefinitePrimitive))
    }

    /// Decode the contents of a constructed value.
    ///
    /// The closure runs with a new nesting frame open; inside it,
    /// [`has_more`](Self::has_more) reports whether more nested values
    /// follow. Afterwards the frame is closed: definite content must end
    /// exactly at its declared length, indefinite content must be followed
    /// by an EOC (consumed here if the closure did not reach it).
    pub fn constructed<T, F>(&mut self, len: Length, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        if self.frames.len() >= self.max_depth {
            return Err(self.error(DecodeErrorKind::DepthExceeded {
                max: self.max_depth,
            }));
        }

        let frame = match len {
            Length::Definite(n) => Frame::Definite(self.offset() + n),
            Length::Indefinite => Frame::Indefinite { closed: false },
        };
        self.frames.push(frame);

        let value = f(self)?;

        match self.frames.pop() {
            Some(Frame::Definite(end)) => {
                let actual = self.offset();
                if actual != end {
                    return Err(self.error(DecodeErrorKind::LengthMismatch {
                        expected: end,
                        actual,
                    }));
                }
            }
            Some(Frame::Indefinite { closed: false }) => {
                decode_eoc(self.buf)?;
            }
            Some(Frame::Indefinite { closed: true }) | None => {}
        }

        Ok(value)
    }

    /// Returns true if the innermost open constructed value has more content.
    ///
    /// For indefinite content this consumes the EOC when it is reached. With
    /// no frame open, reports whether any data remains.
    pub fn has_more(&mut self) -> Result<bool> {
        let offset = self.offset();
        match self.frames.last_mut() {
            None => Ok(!self.buf.at_end()),
            Some(Frame::Definite(end)) => Ok(offset < *end),
            Some(Frame::Indefinite { closed: true }) => Ok(false),
            Some(Frame::Indefinite { closed }) => {
                let next = self.buf.peek_byte();
                if self.buf.has_read_error() {
                    return Err(Error::decode(offset, DecodeErrorKind::TruncatedData));
                }
                if next != 0 {
                    return Ok(true);
                }
                *closed = true;
                decode_eoc(self.buf)?;
                Ok(false)
            }
        }
    }

    /// Skip one complete TLV, returning its encoded size.
    ///
    /// Indefinite-length values are walked element by element to find
    /// their end, bounded by the maximum depth.
    pub fn skip_value(&mut self) -> Result<usize> {
        let start = self.offset();
        let (tag, len) = self.read_header()?;
        match len {
            Length::Definite(n) => {
                self.buf.skip(n);
                self.check_read()?;
            }
            Length::Indefinite => {
                if !tag.is_constructed() {
                    return Err(Error::decode(start, DecodeErrorKind::IndefinitePrimitive));
                }
                self.constructed(len, |dec| {
                    while dec.has_more()? {
                        dec.skip_value()?;
                    }
                    Ok(())
                })?;
            }
        }
        Ok(self.offset() - start)
    }

    /// Borrow the next `len` content bytes.
    pub fn take_bytes(&mut self, len: usize) -> Result<&[u8]> {
        let offset = self.offset();
        if len > self.buf.remaining() {
            self.buf.skip(len);
            return Err(Error::decode(offset, DecodeErrorKind::TruncatedData));
        }
        Ok(self.buf.take_segment(len))
    }

    /// Data between two offsets already read.
    pub(crate) fn bytes_between(&self, from: usize, to: usize) -> &[u8] {
        self.buf.data_range(from, to)
    }
}
