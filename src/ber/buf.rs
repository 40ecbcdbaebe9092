//! Fixed-size byte buffer with a reverse write cursor and a forward read cursor.
//!
//! BER puts the length in front of the content, but an encoder only knows the
//! length after the content is written. Writing backwards from the end of the
//! block lets encoders emit content first and prepend length and tag after,
//! and the bytes read forward from the data start come out in wire order.

use bytes::Bytes;

/// Byte buffer used for both encoding and decoding.
///
/// The cursor owns a block `[0, block_len)`. Valid data lives in
/// `[data_start, data_end)` and reads happen at `read_loc`, with
/// `data_start <= read_loc <= data_end` at all times.
///
/// In write mode, [`put_byte_reverse`](Self::put_byte_reverse) and
/// [`put_segment_reverse`](Self::put_segment_reverse) grow the data region
/// toward the start of the block. In read mode, the `get`/`peek`/`skip`
/// family consumes data forward.
///
/// None of the operations fail at the call site. Running out of room or
/// data sets a sticky flag ([`has_write_error`](Self::has_write_error),
/// [`has_read_error`](Self::has_read_error)) that stays set until the mode
/// is reset. Values returned after a flag is set must not be trusted.
#[derive(Debug, Clone)]
pub struct ByteCursor {
    block: Vec<u8>,
    data_start: usize,
    data_end: usize,
    read_loc: usize,
    read_error: bool,
    write_error: bool,
}

impl ByteCursor {
    /// Create a cursor in write mode with a blank block of `block_len` bytes.
    pub fn for_write(block_len: usize) -> Self {
        let mut buf = Self {
            block: Vec::new(),
            data_start: 0,
            data_end: 0,
            read_loc: 0,
            read_error: true,
            write_error: false,
        };
        buf.init_for_write(block_len);
        buf
    }

    /// Create a cursor in read mode over already-encoded data.
    pub fn for_read(data: impl Into<Vec<u8>>) -> Self {
        let mut buf = Self::for_write(0);
        buf.init_for_read(data);
        buf
    }

    /// Reset to write mode with a fresh blank block.
    ///
    /// No content exists afterwards and reads are invalid until the mode is
    /// flipped again.
    pub fn init_for_write(&mut self, block_len: usize) {
        self.block.clear();
        self.block.resize(block_len, 0);
        self.data_start = block_len;
        self.data_end = block_len;
        self.read_loc = block_len;
        self.write_error = false;
        self.read_error = true;
    }

    /// Reset to read mode, installing `data` as the valid data region.
    pub fn init_for_read(&mut self, data: impl Into<Vec<u8>>) {
        self.block = data.into();
        self.data_start = 0;
        self.data_end = self.block.len();
        self.read_loc = 0;
        self.read_error = false;
        self.write_error = true;
    }

    /// Flip a written block into read mode over the bytes written so far.
    pub fn reset_for_read(&mut self) {
        self.read_loc = self.data_start;
        self.read_error = false;
        self.write_error = true;
    }

    // ------------------------------------------------------------------
    // Write side
    // ------------------------------------------------------------------

    /// Prepend one byte in front of the current data.
    ///
    /// Sets the write error flag and writes nothing if the block is full.
    #[inline]
    pub fn put_byte_reverse(&mut self, byte: u8) {
        if self.data_start == 0 {
            self.write_error = true;
            return;
        }
        self.data_start -= 1;
        self.block[self.data_start] = byte;
    }

    /// Prepend a run of bytes, keeping their order.
    ///
    /// If the run does not fit, the write error flag is set and nothing is
    /// written at all.
    pub fn put_segment_reverse(&mut self, bytes: &[u8]) {
        if bytes.len() > self.data_start {
            self.write_error = true;
            return;
        }
        let start = self.data_start - bytes.len();
        self.block[start..self.data_start].copy_from_slice(bytes);
        self.data_start = start;
    }

    // ------------------------------------------------------------------
    // Read side
    // ------------------------------------------------------------------

    /// Read one byte, or return 0 and set the read error flag at end of data.
    #[inline]
    pub fn get_byte(&mut self) -> u8 {
        if self.read_loc >= self.data_end {
            self.read_error = true;
            return 0;
        }
        let byte = self.block[self.read_loc];
        self.read_loc += 1;
        byte
    }

    /// Look at the next byte without consuming it.
    ///
    /// Same end-of-data behavior as [`get_byte`](Self::get_byte).
    #[inline]
    pub fn peek_byte(&mut self) -> u8 {
        if self.read_loc >= self.data_end {
            self.read_error = true;
            return 0;
        }
        self.block[self.read_loc]
    }

    /// Advance the read position by `n`, clamped to the end of data.
    pub fn skip(&mut self, n: usize) {
        let available = self.remaining();
        if n > available {
            self.read_error = true;
            self.read_loc = self.data_end;
        } else {
            self.read_loc += n;
        }
    }

    /// Copy up to `n` bytes into `dst`, returning how many were copied.
    ///
    /// Copies are clamped both by the remaining data and by `dst.len()`.
    /// The read error flag is set only if fewer than `n` bytes remain; a
    /// short `dst` is not a read error.
    pub fn copy_out(&mut self, dst: &mut [u8], n: usize) -> usize {
        if n > self.remaining() {
            self.read_error = true;
        }
        let count = n.min(self.remaining()).min(dst.len());
        dst[..count].copy_from_slice(&self.block[self.read_loc..self.read_loc + count]);
        self.read_loc += count;
        count
    }

    /// Borrow the next `len` bytes without copying and advance past them.
    ///
    /// If fewer bytes remain, the returned slice is truncated and the read
    /// error flag is set. Check the flag, not the slice length.
    pub fn take_segment(&mut self, len: usize) -> &[u8] {
        let count = len.min(self.remaining());
        if count < len {
            self.read_error = true;
        }
        let start = self.read_loc;
        self.read_loc += count;
        &self.block[start..start + count]
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Number of valid data bytes.
    pub fn data_length(&self) -> usize {
        self.data_end - self.data_start
    }

    /// Total capacity of the block.
    pub fn block_length(&self) -> usize {
        self.block.len()
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data_end.saturating_sub(self.read_loc)
    }

    /// Returns true if the read position has reached the end of data.
    pub fn at_end(&self) -> bool {
        self.read_loc >= self.data_end
    }

    /// Read position relative to the start of data.
    pub fn position(&self) -> usize {
        self.read_loc - self.data_start
    }

    /// Whether a read ran past the end of data since the last mode reset.
    pub fn has_read_error(&self) -> bool {
        self.read_error
    }

    /// Whether a write ran past the start of the block since the last mode reset.
    pub fn has_write_error(&self) -> bool {
        self.write_error
    }

    /// The valid data region.
    pub fn data(&self) -> &[u8] {
        &self.block[self.data_start..self.data_end]
    }

    /// Data between two positions relative to the start of data.
    ///
    /// Positions are clamped to the valid data region.
    pub(crate) fn data_range(&self, from: usize, to: usize) -> &[u8] {
        let data = self.data();
        let to = to.min(data.len());
        &data[from.min(to)..to]
    }

    /// Consume the cursor and return the valid data.
    pub fn finish(self) -> Bytes {
        Bytes::copy_from_slice(self.data())
    }
}
