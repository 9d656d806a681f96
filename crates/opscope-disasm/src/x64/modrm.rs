//! ModRM and SIB byte fields.

/// Raw ModRM fields. REX extension bits are applied by the decoder at the
/// point of use: opcode-extension groups select on the unextended reg
/// field, and rm only grows a fourth bit when it names a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModRm {
    /// Addressing mode, bits 7:6.
    pub mode: u8,
    /// Register / opcode-extension field, bits 5:3.
    pub reg: u8,
    /// Register-or-memory field, bits 2:0.
    pub rm: u8,
}

impl ModRm {
    pub fn parse(byte: u8) -> Self {
        Self {
            mode: byte >> 6,
            reg: (byte >> 3) & 0x7,
            rm: byte & 0x7,
        }
    }

    /// True when rm names a register directly.
    pub fn is_register_direct(&self) -> bool {
        self.mode == 3
    }
}

/// Raw SIB fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sib {
    /// Scale exponent, bits 7:6. The scale factor is `1 << scale`.
    pub scale: u8,
    /// Index register field, bits 5:3.
    pub index: u8,
    /// Base register field, bits 2:0.
    pub base: u8,
}

impl Sib {
    pub fn parse(byte: u8) -> Self {
        Self {
            scale: byte >> 6,
            index: (byte >> 3) & 0x7,
            base: byte & 0x7,
        }
    }

    pub fn scale_factor(&self) -> u8 {
        1 << self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modrm_fields() {
        let m = ModRm::parse(0xd8);
        assert_eq!((m.mode, m.reg, m.rm), (3, 3, 0));
        assert!(m.is_register_direct());

        let m = ModRm::parse(0x7b);
        assert_eq!((m.mode, m.reg, m.rm), (1, 7, 3));
        assert!(!m.is_register_direct());
    }

    #[test]
    fn sib_fields() {
        let s = Sib::parse(0x8b);
        assert_eq!((s.scale, s.index, s.base), (2, 1, 3));
        assert_eq!(s.scale_factor(), 4);
    }
}
