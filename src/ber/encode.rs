//! BER encoding helpers on [`ByteCursor`].
//!
//! Encoding writes backwards: content first, then its length, then its tag.
//! Every helper returns the number of bytes it would have written, even
//! after the block overflowed, so callers can report the size needed.

use super::length::{encode_eoc, encode_indefinite_length, encode_length};
use super::tag::{Tag, encode_tag};
use super::ByteCursor;
use crate::error::Result;

impl ByteCursor {
    /// Push a BER tag.
    pub fn push_tag(&mut self, tag: Tag) -> usize {
        encode_tag(self, tag)
    }

    /// Push a BER definite length.
    pub fn push_length(&mut self, len: usize) -> usize {
        encode_length(self, len)
    }

    /// Push the indefinite-length octet.
    pub fn push_indefinite_length(&mut self) -> usize {
        encode_indefinite_length(self)
    }

    /// Push an end-of-contents marker.
    pub fn push_eoc(&mut self) -> usize {
        encode_eoc(self)
    }

    /// Push content bytes (kept in order).
    pub fn push_bytes(&mut self, bytes: &[u8]) -> usize {
        self.put_segment_reverse(bytes);
        bytes.len()
    }

    /// Wrap already-pushed content of `content_len` bytes with length and tag.
    pub fn push_header(&mut self, tag: Tag, content_len: usize) -> usize {
        let len = self.push_length(content_len);
        len + self.push_tag(tag)
    }

    /// Encode a constructed value with a definite length.
    ///
    /// Calls the closure to encode contents, then wraps with length and tag.
    /// The closure returns the number of content bytes it wrote. Because the
    /// buffer is written backwards, the closure must push the last element
    /// first.
    pub fn push_constructed<F>(&mut self, tag: Tag, f: F) -> Result<usize>
    where
        F: FnOnce(&mut Self) -> Result<usize>,
    {
        let content_len = f(self)?;
        Ok(content_len + self.push_header(tag.into_constructed(), content_len))
    }

    /// Encode a constructed value with indefinite length and a closing EOC.
    pub fn push_constructed_indefinite<F>(&mut self, tag: Tag, f: F) -> Result<usize>
    where
        F: FnOnce(&mut Self) -> Result<usize>,
    {
        let eoc = self.push_eoc();
        let content_len = f(self)?;
        let header = self.push_indefinite_length() + self.push_tag(tag.into_constructed());
        Ok(eoc + content_len + header)
    }

    /// Encode a SEQUENCE.
    pub fn push_sequence<F>(&mut self, f: F) -> Result<usize>
    where
        F: FnOnce(&mut Self) -> Result<usize>,
    {
        self.push_constructed(Tag::SEQUENCE, f)
    }
}

/// Encode a signed 64-bit integer in minimal two's-complement form.
///
/// Returns a stack-allocated array and the number of valid bytes.
/// The valid bytes are at the END of the array (for reverse-buffer compatibility).
#[inline]
pub(crate) fn encode_integer_stack(value: i64) -> ([u8; 8], usize) {
    let bytes = value.to_be_bytes();

    // Find first significant byte
    let mut start = 0;
    if value >= 0 {
        // For positive/zero, skip leading 0x00 bytes (but keep one if needed for sign)
        while start < 7 && bytes[start] == 0 && bytes[start + 1] & 0x80 == 0 {
            start += 1;
        }
    } else {
        // For negative, skip leading 0xFF bytes (but keep one if needed for sign)
        while start < 7 && bytes[start] == 0xFF && bytes[start + 1] & 0x80 != 0 {
            start += 1;
        }
    }

    (bytes, 8 - start)
}

/// Encode an unsigned 64-bit value as big-endian without leading zero bytes.
///
/// Zero encodes as a single `0x00`. No sign octet is added.
#[inline]
pub(crate) fn encode_unsigned_stack(value: u64) -> ([u8; 8], usize) {
    let bytes = value.to_be_bytes();
    let significant = (u64::BITS - value.leading_zeros()).div_ceil(8).max(1) as usize;
    (bytes, significant)
}
