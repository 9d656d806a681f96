//! Instruction operand types.

use crate::instruction::Condition;
use crate::Register;

/// An instruction operand.
///
/// Every producer constructs exactly one of these variants; there is no
/// loosely-typed escape hatch.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operand {
    /// Register operand.
    Register(Register),
    /// Immediate value.
    Immediate(Immediate),
    /// 64-bit immediate, kept as raw bytes in display order. Some 64-bit
    /// patterns are not representable in the signed immediate type, so the
    /// blob is never narrowed.
    Imm64([u8; 8]),
    /// Memory reference.
    Memory(MemoryRef),
    /// Fixed literal token (segment names and similar).
    Token(&'static str),
    /// Condition-code token (jcc/cmov/setcc families).
    Condition(Condition),
}

impl Operand {
    /// Creates a signed immediate operand.
    pub fn imm(value: i64) -> Self {
        Self::Immediate(Immediate {
            value,
            signed: true,
        })
    }

    /// Creates an unsigned immediate operand.
    pub fn imm_unsigned(value: u64) -> Self {
        Self::Immediate(Immediate {
            value: value as i64,
            signed: false,
        })
    }

    /// Creates a register operand.
    pub fn reg(reg: Register) -> Self {
        Self::Register(reg)
    }

    /// Returns true if this is a memory operand.
    pub fn is_memory(&self) -> bool {
        matches!(self, Self::Memory(_))
    }
}

/// Immediate value operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Immediate {
    /// The value, sign-extended when signed.
    pub value: i64,
    /// Whether the encoding was a signed field.
    pub signed: bool,
}

/// Memory reference operand, `[base, index*scale, disp]`.
///
/// Any subset of the fields may be absent; the addressing mode decides
/// which are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryRef {
    /// Base register, if any.
    pub base: Option<Register>,
    /// Index register, if any.
    pub index: Option<Register>,
    /// Scale factor for the index (1, 2, 4, or 8).
    pub scale: u8,
    /// Signed displacement, if any.
    pub disp: Option<i64>,
}

impl MemoryRef {
    /// A memory reference with just a base register.
    pub fn base(reg: Register) -> Self {
        Self {
            base: Some(reg),
            index: None,
            scale: 1,
            disp: None,
        }
    }

    /// A memory reference with base and displacement.
    pub fn base_disp(base: Register, disp: i64) -> Self {
        Self {
            base: Some(base),
            index: None,
            scale: 1,
            disp: Some(disp),
        }
    }
}

fn write_hex(f: &mut std::fmt::Formatter<'_>, value: i64) -> std::fmt::Result {
    if value < 0 {
        write!(f, "-0x{:x}", value.unsigned_abs())
    } else {
        write!(f, "0x{:x}", value)
    }
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Register(reg) => f.write_str(reg.name()),
            Self::Immediate(imm) => write_hex(f, imm.value),
            Self::Imm64(bytes) => {
                f.write_str("0x")?;
                for b in bytes {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
            Self::Memory(mem) => {
                f.write_str("[")?;
                let mut sep = "";
                if let Some(base) = &mem.base {
                    write!(f, "{}", base.name())?;
                    sep = ", ";
                }
                if let Some(index) = &mem.index {
                    write!(f, "{}{}", sep, index.name())?;
                    if mem.scale > 1 {
                        write!(f, "*{}", mem.scale)?;
                    }
                    sep = ", ";
                }
                if let Some(disp) = mem.disp {
                    f.write_str(sep)?;
                    write_hex(f, disp)?;
                }
                f.write_str("]")
            }
            Self::Token(tok) => f.write_str(tok),
            Self::Condition(cond) => f.write_str(cond.token()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immediate_rendering() {
        assert_eq!(Operand::imm(0xdead).to_string(), "0xdead");
        assert_eq!(Operand::imm(-0xdead).to_string(), "-0xdead");
        assert_eq!(Operand::imm_unsigned(9).to_string(), "0x9");
    }

    #[test]
    fn imm64_renders_in_display_byte_order() {
        let op = Operand::Imm64([0xde, 0xad, 0xbe, 0xef, 0xab, 0xba, 0xde, 0xad]);
        assert_eq!(op.to_string(), "0xdeadbeefabbadead");
    }

    #[test]
    fn memory_rendering() {
        let rbx = Register::gpr(3, 64);
        let rcx = Register::gpr(1, 64);

        assert_eq!(
            Operand::Memory(MemoryRef::base(rbx)).to_string(),
            "[rbx]"
        );
        assert_eq!(
            Operand::Memory(MemoryRef::base_disp(rbx, -8)).to_string(),
            "[rbx, -0x8]"
        );

        let sib = MemoryRef {
            base: Some(rbx),
            index: Some(rcx),
            scale: 4,
            disp: Some(0x10),
        };
        assert_eq!(Operand::Memory(sib).to_string(), "[rbx, rcx*4, 0x10]");

        let no_base = MemoryRef {
            base: None,
            index: None,
            scale: 1,
            disp: Some(0x100),
        };
        assert_eq!(Operand::Memory(no_base).to_string(), "[0x100]");
    }
}
