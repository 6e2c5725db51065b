//! Low-level byte reading utilities.
//!
//! [`ByteCursor`] walks an immutable buffer with a movable position. All
//! multi-byte integers in an ABIF container are big-endian; 32-bit values are
//! assembled from two big-endian 16-bit halves.
//!
//! Every read checks the remaining length first. A read that would run past
//! the end fails with [`AbifError::Truncated`] and leaves the position where
//! it was.

use byteorder::{BigEndian, ByteOrder};
use encoding_rs::{Encoding, WINDOWS_1252};

use super::types::error::{AbifError, Result};
use super::types::models::{decode_bytes, Tag};

/// A bounds-checked reader over a byte slice.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
    encoding: &'static Encoding,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::at(data, 0)
    }

    /// Creates a cursor starting at `pos`. The position is only checked on read.
    pub fn at(data: &'a [u8], pos: usize) -> Self {
        Self {
            data,
            pos,
            encoding: WINDOWS_1252,
        }
    }

    /// Sets the encoding used by the string reads.
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Bytes left between the position and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Borrows the next `len` bytes and advances past them.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or(AbifError::Truncated {
                offset: self.pos,
                needed: len,
                available: self.remaining(),
            })?;
        let data = self.data;
        let bytes = &data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.read_bytes(len).map(|_| ())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Reads `byte0 * 256 + byte1`.
    pub fn read_u16_be(&mut self) -> Result<u16> {
        Ok(BigEndian::read_u16(self.read_bytes(2)?))
    }

    /// Reads `high16 * 65536 + low16` as two consecutive 16-bit reads.
    pub fn read_u32_be(&mut self) -> Result<u32> {
        // Check up front so a short buffer cannot consume the high half alone.
        if self.remaining() < 4 {
            return Err(AbifError::Truncated {
                offset: self.pos,
                needed: 4,
                available: self.remaining(),
            });
        }
        let high = self.read_u16_be()? as u32;
        let low = self.read_u16_be()? as u32;
        Ok((high << 16) | low)
    }

    /// Reads a 32-bit value and reinterprets it as two's complement.
    pub fn read_i32_be(&mut self) -> Result<i32> {
        Ok(self.read_u32_be()? as i32)
    }

    /// Reads `len` raw bytes as a fixed-width string.
    pub fn read_fixed_string(&mut self, len: usize) -> Result<String> {
        let bytes = self.read_bytes(len)?;
        Ok(decode_bytes(bytes, self.encoding))
    }

    /// Reads a 4-byte record tag.
    pub fn read_tag(&mut self) -> Result<Tag> {
        let bytes = self.read_bytes(4)?;
        Ok(Tag::new([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads one length byte `n`, then `n` bytes as a string.
    pub fn read_pascal_string(&mut self) -> Result<String> {
        let start = self.pos;
        let len = self.read_u8()? as usize;
        match self.read_bytes(len) {
            Ok(bytes) => Ok(decode_bytes(bytes, self.encoding)),
            Err(e) => {
                self.pos = start;
                Err(e)
            }
        }
    }
}
