//! Little-endian byte cursors for header decoding and encoding.
//!
//! Three cursor types split the work that a header codec does:
//!
//! - [`SourceCursor`] walks the caller's raw buffer. It never copies more than
//!   the buffer holds, and every copy out of it is an explicit, checked
//!   [`SourceCursor::take`].
//! - [`ByteReader`] walks a scratch copy of the bytes that were taken, and
//!   decodes fixed-width little-endian fields from it.
//! - [`ByteWriter`] builds an encoded header in a bounded `Vec<u8>` and allows
//!   placeholders to be patched after the fact.
//!
//! Each cursor owns its position. They are created per call and never shared.
//!
//! # Example
//!
//! ```
//! use oxilha_core::cursor::{ByteReader, ByteWriter};
//!
//! let mut writer = ByteWriter::new(64);
//! writer.put_u8(0x20).unwrap();
//! writer.put_u16(0x1234).unwrap();
//! writer.put_u32(0xDEADBEEF).unwrap();
//!
//! let bytes = writer.into_inner();
//! let mut reader = ByteReader::new(&bytes);
//! assert_eq!(reader.read_u8().unwrap(), 0x20);
//! assert_eq!(reader.read_u16().unwrap(), 0x1234);
//! assert_eq!(reader.read_u32().unwrap(), 0xDEADBEEF);
//! ```

use crate::error::{LhaError, Result};

/// A bounded, read-only cursor over the caller's source buffer.
#[derive(Debug, Clone)]
pub struct SourceCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SourceCursor<'a> {
    /// Create a cursor positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Number of bytes consumed so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes left in the source.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Take the next `len` bytes, failing if fewer remain.
    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(LhaError::truncated(self.pos, len, self.remaining()));
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }
}

/// A little-endian reader over a scratch buffer.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Create a reader positioned at `pos`.
    pub fn at(data: &'a [u8], pos: usize) -> Self {
        Self {
            data,
            pos: pos.min(data.len()),
        }
    }

    /// Current read position.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of unread bytes.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// The bytes read so far.
    pub fn consumed(&self) -> &'a [u8] {
        &self.data[..self.pos]
    }

    /// Read `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(LhaError::truncated(self.pos, len, self.remaining()));
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Read a `len`-byte field, keeping at most `limit` bytes of it.
    ///
    /// The cursor always advances past the whole field.
    pub fn read_bounded(&mut self, len: usize, limit: usize) -> Result<Vec<u8>> {
        let field = self.read_bytes(len)?;
        Ok(field[..len.min(limit)].to_vec())
    }

    /// Skip `len` bytes.
    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.read_bytes(len).map(|_| ())
    }

    /// Read a byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Read a 16-bit little-endian word.
    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    /// Read a 32-bit little-endian long word.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a 64-bit little-endian quad word.
    #[inline]
    pub fn read_u64(&mut self) -> Result<u64> {
        let b = self.read_bytes(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(b);
        Ok(u64::from_le_bytes(buf))
    }
}

/// A little-endian writer with a fixed capacity.
#[derive(Debug, Clone)]
pub struct ByteWriter {
    buf: Vec<u8>,
    capacity: usize,
}

impl ByteWriter {
    /// Create a writer that refuses to grow beyond `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity.min(4096)),
            capacity,
        }
    }

    /// Number of bytes written.
    #[inline]
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    /// Maximum number of bytes this writer accepts.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append raw bytes.
    pub fn put_bytes(&mut self, data: &[u8]) -> Result<()> {
        let needed = self.buf.len() + data.len();
        if needed > self.capacity {
            return Err(LhaError::header_too_large(needed, self.capacity));
        }
        self.buf.extend_from_slice(data);
        Ok(())
    }

    /// Append a byte.
    #[inline]
    pub fn put_u8(&mut self, v: u8) -> Result<()> {
        self.put_bytes(&[v])
    }

    /// Append a 16-bit little-endian word.
    #[inline]
    pub fn put_u16(&mut self, v: u16) -> Result<()> {
        self.put_bytes(&v.to_le_bytes())
    }

    /// Append a 32-bit little-endian long word.
    #[inline]
    pub fn put_u32(&mut self, v: u32) -> Result<()> {
        self.put_bytes(&v.to_le_bytes())
    }

    /// Overwrite a previously written byte.
    pub fn patch_u8(&mut self, at: usize, v: u8) -> Result<()> {
        self.patch_bytes(at, &[v])
    }

    /// Overwrite a previously written 16-bit word.
    pub fn patch_u16(&mut self, at: usize, v: u16) -> Result<()> {
        self.patch_bytes(at, &v.to_le_bytes())
    }

    /// Overwrite a previously written 32-bit long word.
    pub fn patch_u32(&mut self, at: usize, v: u32) -> Result<()> {
        self.patch_bytes(at, &v.to_le_bytes())
    }

    fn patch_bytes(&mut self, at: usize, data: &[u8]) -> Result<()> {
        let len = self.buf.len();
        match self.buf.get_mut(at..at + data.len()) {
            Some(slot) => {
                slot.copy_from_slice(data);
                Ok(())
            }
            None => Err(LhaError::truncated(at, data.len(), len.saturating_sub(at))),
        }
    }

    /// The bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the writer and return the written bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}
