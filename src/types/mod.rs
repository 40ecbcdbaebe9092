//! Value codecs.
//!
//! Primitive ASN.1 types implement [`BerType`]: they know their universal
//! tag and how to encode and decode their content octets. The blanket
//! [`Encode`] and [`Decode`] impls wrap that content with tag and length.
//!
//! Structured values (SEQUENCEs written by hand or by generated code,
//! [`Captured`] raw values, [`AnyValue`](crate::AnyValue)) implement
//! [`Encode`] and [`Decode`] directly.

mod bit_string;
mod boolean;
mod captured;
mod integer;
mod null;
mod octet_string;
mod real;

pub use bit_string::BitString;
pub use captured::Captured;
pub use null::Null;
pub use octet_string::OctetString;

use crate::ber::{ByteCursor, Decoder, Length, Tag};
use crate::error::{DecodeErrorKind, Result};

/// A type with a fixed universal tag and a content codec.
pub trait BerType: Sized {
    /// The tag this type is encoded with (primitive form).
    const TAG: Tag;

    /// Write the content octets, returning how many were written.
    fn encode_content(&self, buf: &mut ByteCursor) -> usize;

    /// Decode the content octets.
    ///
    /// `tag` is the tag actually read, which may differ from
    /// [`TAG`](Self::TAG) in its constructed bit.
    fn decode_content(dec: &mut Decoder<'_>, tag: Tag, len: Length) -> Result<Self>;
}

/// Types that can be written as a complete TLV.
pub trait Encode {
    /// Encode to BER, returning the number of bytes written.
    fn encode(&self, buf: &mut ByteCursor) -> Result<usize>;
}

/// Types that can be read from a complete TLV.
pub trait Decode: Sized {
    /// Decode from BER.
    fn decode(dec: &mut Decoder<'_>) -> Result<Self>;
}

impl<T: BerType> Encode for T {
    fn encode(&self, buf: &mut ByteCursor) -> Result<usize> {
        let content_len = self.encode_content(buf);
        Ok(content_len + buf.push_header(T::TAG, content_len))
    }
}

impl<T: BerType> Decode for T {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        let tag = dec.expect_tag(T::TAG)?;
        let len = dec.read_length()?;
        T::decode_content(dec, tag, len)
    }
}

/// SEQUENCE OF T.
impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, buf: &mut ByteCursor) -> Result<usize> {
        buf.push_sequence(|buf| {
            let mut len = 0;
            // Encode in reverse order since we're using reverse buffer
            for item in self.iter().rev() {
                len += item.encode(buf)?;
            }
            Ok(len)
        })
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        let offset = dec.offset();
        let tag = dec.expect_tag(Tag::SEQUENCE)?;
        if !tag.is_constructed() {
            return Err(crate::Error::decode(
                offset,
                DecodeErrorKind::UnexpectedTag {
                    expected: Tag::SEQUENCE,
                    actual: tag,
                },
            ));
        }
        let len = dec.read_length()?;
        dec.constructed(len, |dec| {
            let mut items = Vec::new();
            while dec.has_more()? {
                items.push(T::decode(dec)?);
            }
            Ok(items)
        })
    }
}

/// Content length of a type that only has a primitive encoding.
pub(crate) fn primitive_len(dec: &Decoder<'_>, tag: Tag, len: Length) -> Result<usize> {
    if tag.is_constructed() {
        return Err(dec.error(DecodeErrorKind::UnexpectedConstructed));
    }
    dec.primitive_len(len)
}

/// Walk the segments of a constructed string encoding.
///
/// Every nested value must carry `segment_tag`. Nested constructed segments
/// are walked recursively; for each primitive segment `on_segment` is called
/// with its content length and must consume exactly that many bytes.
pub(crate) fn decode_segments(
    dec: &mut Decoder<'_>,
    segment_tag: Tag,
    len: Length,
    on_segment: &mut dyn FnMut(&mut Decoder<'_>, usize) -> Result<()>,
) -> Result<()> {
    dec.constructed(len, |dec| {
        while dec.has_more()? {
            let tag = dec.expect_tag(segment_tag)?;
            let len = dec.read_length()?;
            if tag.is_constructed() {
                decode_segments(dec, segment_tag, len, on_segment)?;
            } else {
                let len = dec.primitive_len(len)?;
                on_segment(dec, len)?;
            }
        }
        Ok(())
    })
}
