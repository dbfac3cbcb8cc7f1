//! Bounds-checked forward-only reader over a byte buffer
//!
//! Every stage of the decoder goes through [`ByteCursor`]; nothing computes raw
//! offsets into the buffer. A failed read leaves the position untouched.

use crate::error::{DmfError, Result};

/// Forward-only read position over an immutable byte buffer
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes consumed so far
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left before the end of the buffer
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Total length of the underlying buffer
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos == self.data.len()
    }

    fn out_of_bounds(&self, requested: usize) -> DmfError {
        DmfError::OutOfBounds {
            offset: self.pos,
            requested,
            remaining: self.remaining(),
        }
    }

    /// Look at the next `n` bytes without consuming them
    pub fn peek(&self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(self.out_of_bounds(n));
        }
        Ok(&self.data[self.pos..self.pos + n])
    }

    /// Consume and return the next `n` bytes
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let bytes = self.peek(n)?;
        self.pos += n;
        Ok(bytes)
    }

    /// Consume `n` bytes without looking at them
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.read_bytes(n).map(|_| ())
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.read_bytes(N)?);
        Ok(buf)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        self.read_array().map(u16::from_le_bytes)
    }

    pub fn read_i16_le(&mut self) -> Result<i16> {
        self.read_array().map(i16::from_le_bytes)
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    pub fn read_i32_le(&mut self) -> Result<i32> {
        self.read_array().map(i32::from_le_bytes)
    }

    /// Read a string prefixed by a single length byte
    pub fn read_pstring(&mut self) -> Result<String> {
        let len = self.peek(1)?[0] as usize;
        if len + 1 > self.remaining() {
            return Err(self.out_of_bounds(len + 1));
        }
        self.pos += 1;
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Byte length of `count` records of `width` bytes each
    ///
    /// Overflow is reported as an overrun since no buffer could hold it.
    pub fn span(&self, count: usize, width: usize) -> Result<usize> {
        count
            .checked_mul(width)
            .ok_or_else(|| self.out_of_bounds(usize::MAX))
    }
}
