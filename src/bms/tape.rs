//! BMS byte tape
//!
//! The tape is an immutable byte sequence with an explicit read cursor.
//! Control-flow events (track start, call, return) move the cursor
//! non-sequentially, so the cursor supports absolute seeks. All multi-byte
//! values are big-endian.

use crate::error::{Error, Result};

/// Seekable reader over raw BMS data
pub struct Tape<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Tape<'a> {
    /// Create a new tape over raw BMS data, positioned at the top
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Get the current cursor position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move the cursor to an absolute position
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Advance the cursor without reading
    pub fn skip(&mut self, len: usize) -> Result<()> {
        if self.pos + len > self.data.len() {
            return Err(Error::UnexpectedEof { offset: self.pos });
        }
        self.pos += len;
        Ok(())
    }

    /// Read a single byte
    pub fn read_u8(&mut self) -> Result<u8> {
        if self.pos >= self.data.len() {
            return Err(Error::UnexpectedEof { offset: self.pos });
        }
        let b = self.data[self.pos];
        self.pos += 1;
        Ok(b)
    }

    /// Read a 16-bit big-endian value
    pub fn read_u16(&mut self) -> Result<u16> {
        let hi = self.read_u8()? as u16;
        let lo = self.read_u8()? as u16;
        Ok((hi << 8) | lo)
    }

    /// Read a 24-bit big-endian value
    pub fn read_u24(&mut self) -> Result<u32> {
        let hi = self.read_u8()? as u32;
        let mid = self.read_u8()? as u32;
        let lo = self.read_u8()? as u32;
        Ok((hi << 16) | (mid << 8) | lo)
    }

    /// Read a 32-bit big-endian value
    pub fn read_u32(&mut self) -> Result<u32> {
        let hi = self.read_u16()? as u32;
        let lo = self.read_u16()? as u32;
        Ok((hi << 16) | lo)
    }

    /// Read bytes into a buffer
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        if self.pos + len > self.data.len() {
            return Err(Error::UnexpectedEof { offset: self.pos });
        }
        let bytes = self.data[self.pos..self.pos + len].to_vec();
        self.pos += len;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_are_big_endian() {
        let mut tape = Tape::new(&[0x12, 0x34, 0x56, 0x78, 0x9A]);
        assert_eq!(tape.read_u8().unwrap(), 0x12);
        assert_eq!(tape.read_u16().unwrap(), 0x3456);
        tape.seek(1);
        assert_eq!(tape.read_u24().unwrap(), 0x345678);
        tape.seek(0);
        assert_eq!(tape.read_u32().unwrap(), 0x12345678);
        assert_eq!(tape.position(), 4);
    }

    #[test]
    fn test_seek_and_skip() {
        let mut tape = Tape::new(&[0, 1, 2, 3]);
        tape.skip(2).unwrap();
        assert_eq!(tape.read_u8().unwrap(), 2);
        tape.seek(0);
        assert_eq!(tape.read_u8().unwrap(), 0);
    }

    #[test]
    fn test_read_past_end_fails() {
        let mut tape = Tape::new(&[0xAB]);
        assert_eq!(tape.read_u8().unwrap(), 0xAB);
        assert!(matches!(
            tape.read_u8(),
            Err(crate::Error::UnexpectedEof { offset: 1 })
        ));
        tape.seek(0);
        assert!(tape.read_u16().is_err());
    }
}
