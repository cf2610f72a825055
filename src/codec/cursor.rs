//! Bounded byte cursor
//!
//! Every read checks the remaining length first and advances only on success.

use crate::error::{IdbError, Result};

/// Simple bounded cursor over an immutable byte slice.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at position 0.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Current byte offset.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Remaining unread bytes.
    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Unread tail of the buffer, without advancing.
    pub fn rest(&self) -> &'a [u8] {
        &self.bytes[self.pos.min(self.bytes.len())..]
    }

    fn eof(&self, need: usize) -> IdbError {
        IdbError::UnexpectedEnd {
            at: self.pos,
            need,
            rem: self.remaining(),
        }
    }

    /// Look at the next byte without consuming it.
    pub fn peek_u8(&self) -> Result<u8> {
        self.bytes.get(self.pos).copied().ok_or_else(|| self.eof(1))
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let byte = self.peek_u8()?;
        self.pos += 1;
        Ok(byte)
    }

    /// Read exactly `n` bytes and advance.
    pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(self.eof(n));
        }
        let start = self.pos;
        self.pos += n;
        Ok(&self.bytes[start..self.pos])
    }

    /// Skip `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.read_exact(n).map(|_| ())
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let raw = self.read_exact(N)?;
        let mut out = [0_u8; N];
        out.copy_from_slice(raw);
        Ok(out)
    }

    /// Read a little-endian `u32`.
    pub fn read_u32_le(&mut self) -> Result<u32> {
        self.read_array::<4>().map(u32::from_le_bytes)
    }

    /// Read a little-endian `u64`.
    pub fn read_u64_le(&mut self) -> Result<u64> {
        self.read_array::<8>().map(u64::from_le_bytes)
    }

    /// Read a little-endian IEEE-754 double.
    pub fn read_f64_le(&mut self) -> Result<f64> {
        self.read_array::<8>().map(f64::from_le_bytes)
    }

    /// Consume `expected` or fail without advancing.
    pub fn expect_u8(&mut self, expected: u8, what: &'static str) -> Result<()> {
        let found = self.peek_u8()?;
        if found != expected {
            return Err(IdbError::MalformedEnvelope {
                at: self.pos,
                expected: what,
                found,
            });
        }
        self.pos += 1;
        Ok(())
    }
}
