//! Bounds-checked byte cursor over the input buffer.

use crate::error::DecodeError;

/// Little-endian reader with an explicit position.
///
/// Every read is bounds checked and reports the offset it failed at, which
/// the driver uses to distinguish a truncated trailing instruction from a
/// mid-buffer decode failure.
#[derive(Debug)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current offset into the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// True when every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Returns the next byte without consuming it.
    pub fn peek_u8(&self) -> Result<u8, DecodeError> {
        self.buf
            .get(self.pos)
            .copied()
            .ok_or_else(|| DecodeError::end_of_buffer(self.pos))
    }

    /// Advances past `n` bytes without reading them. Skipping beyond the
    /// end of the buffer fails like a read would.
    pub fn skip(&mut self, n: usize) -> Result<(), DecodeError> {
        let end = self.pos.checked_add(n).filter(|&end| end <= self.buf.len());
        let Some(end) = end else {
            return Err(DecodeError::end_of_buffer(self.buf.len()));
        };
        self.pos = end;
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let b = self.peek_u8()?;
        self.pos += 1;
        Ok(b)
    }

    pub fn read_i8(&mut self) -> Result<i8, DecodeError> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    /// Reads a 64-bit immediate as raw bytes, reordered for display
    /// (most significant byte first).
    pub fn read_u64_display(&mut self) -> Result<[u8; 8], DecodeError> {
        let mut bytes: [u8; 8] = self.read_array()?;
        bytes.reverse();
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let end = self.pos.checked_add(N).filter(|&end| end <= self.buf.len());
        let Some(end) = end else {
            return Err(DecodeError::end_of_buffer(self.buf.len()));
        };
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..end]);
        self.pos = end;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian() {
        let mut cur = Cursor::new(&[0x01, 0x02, 0x03, 0x04, 0x05]);
        assert_eq!(cur.read_u8().unwrap(), 0x01);
        assert_eq!(cur.read_u32().unwrap(), 0x05040302);
        assert!(cur.is_empty());
    }

    #[test]
    fn peek_does_not_advance() {
        let mut cur = Cursor::new(&[0x90]);
        assert_eq!(cur.peek_u8().unwrap(), 0x90);
        assert_eq!(cur.position(), 0);
        assert_eq!(cur.read_u8().unwrap(), 0x90);
        assert_eq!(cur.peek_u8(), Err(DecodeError::end_of_buffer(1)));
    }

    #[test]
    fn short_read_reports_offset() {
        let mut cur = Cursor::new(&[0x01, 0x02]);
        assert_eq!(cur.read_u32(), Err(DecodeError::end_of_buffer(2)));
    }

    #[test]
    fn skip_is_bounds_checked() {
        let mut cur = Cursor::new(&[0x01, 0x02, 0x03]);
        cur.skip(2).unwrap();
        assert_eq!(cur.position(), 2);
        assert_eq!(cur.skip(2), Err(DecodeError::end_of_buffer(3)));
        assert_eq!(cur.position(), 2);
        cur.skip(1).unwrap();
        assert!(cur.is_empty());
    }

    #[test]
    fn display_order_imm64() {
        let mut cur = Cursor::new(&[0xad, 0xde, 0xba, 0xab, 0xef, 0xbe, 0xad, 0xde]);
        assert_eq!(
            cur.read_u64_display().unwrap(),
            [0xde, 0xad, 0xbe, 0xef, 0xab, 0xba, 0xde, 0xad]
        );
    }
}
