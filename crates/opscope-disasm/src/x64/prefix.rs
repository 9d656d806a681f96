//! Legacy prefix and REX parsing.

use crate::cursor::Cursor;
use crate::error::DecodeError;

/// Segment override prefixes. Kept for completeness; they do not change
/// how the rest of the instruction decodes in 64-bit mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Cs,
    Ss,
    Ds,
    Es,
    Fs,
    Gs,
}

/// Legacy prefixes accumulated before the opcode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Prefixes {
    /// 0xF0.
    pub lock: bool,
    /// 0xF2.
    pub repne: bool,
    /// 0xF3.
    pub rep: bool,
    /// 0x66.
    pub operand_size: bool,
    /// 0x67.
    pub address_size: bool,
    /// Last segment override seen, if any.
    pub segment: Option<Segment>,
    /// Set by a VEX escape. Never produced by this decoder yet; operand
    /// slots tied to the VEX register field are dropped while it is false.
    pub vex: bool,
}

impl Prefixes {
    /// Consumes legacy prefix bytes until a non-prefix byte is seen.
    /// Repeats are legal and collapse into one flag.
    pub fn read(cur: &mut Cursor<'_>) -> Result<Self, DecodeError> {
        let mut prefixes = Self::default();
        loop {
            let segment = match cur.peek_u8()? {
                0xf0 => {
                    prefixes.lock = true;
                    None
                }
                0xf2 => {
                    prefixes.repne = true;
                    None
                }
                0xf3 => {
                    prefixes.rep = true;
                    None
                }
                0x66 => {
                    prefixes.operand_size = true;
                    None
                }
                0x67 => {
                    prefixes.address_size = true;
                    None
                }
                0x2e => Some(Segment::Cs),
                0x36 => Some(Segment::Ss),
                0x3e => Some(Segment::Ds),
                0x26 => Some(Segment::Es),
                0x64 => Some(Segment::Fs),
                0x65 => Some(Segment::Gs),
                _ => return Ok(prefixes),
            };
            if segment.is_some() {
                prefixes.segment = segment;
            }
            cur.skip(1)?;
        }
    }
}

/// Decoded REX prefix (0x40-0x4F).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rex {
    /// 64-bit operand size.
    pub w: bool,
    /// Extends ModRM.reg.
    pub r: bool,
    /// Extends SIB.index.
    pub x: bool,
    /// Extends ModRM.rm or SIB.base.
    pub b: bool,
}

impl Rex {
    /// Consumes a REX byte if the next byte is one. REX must directly
    /// precede the opcode, so this runs once, after the legacy prefixes.
    pub fn read(cur: &mut Cursor<'_>) -> Result<Option<Self>, DecodeError> {
        let byte = cur.peek_u8()?;
        if byte & 0xf0 != 0x40 {
            return Ok(None);
        }
        cur.skip(1)?;
        Ok(Some(Self {
            w: byte & 0x8 != 0,
            r: byte & 0x4 != 0,
            x: byte & 0x2 != 0,
            b: byte & 0x1 != 0,
        }))
    }

    /// High register-number bit contributed to ModRM.reg.
    pub fn r_bit(&self) -> u8 {
        (self.r as u8) << 3
    }

    /// High bit for SIB.index.
    pub fn x_bit(&self) -> u8 {
        (self.x as u8) << 3
    }

    /// High bit for ModRM.rm / SIB.base.
    pub fn b_bit(&self) -> u8 {
        (self.b as u8) << 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_legacy_prefixes() {
        let mut cur = Cursor::new(&[0xf0, 0x66, 0x65, 0x90]);
        let prefixes = Prefixes::read(&mut cur).unwrap();
        assert!(prefixes.lock);
        assert!(prefixes.operand_size);
        assert_eq!(prefixes.segment, Some(Segment::Gs));
        assert_eq!(cur.position(), 3);
    }

    #[test]
    fn rex_bits() {
        let mut cur = Cursor::new(&[0x4c, 0x8b]);
        let rex = Rex::read(&mut cur).unwrap().unwrap();
        assert!(rex.w && rex.r);
        assert!(!rex.x && !rex.b);
        assert_eq!(cur.position(), 1);

        let mut cur = Cursor::new(&[0x8b]);
        assert_eq!(Rex::read(&mut cur).unwrap(), None);
        assert_eq!(cur.position(), 0);
    }
}
