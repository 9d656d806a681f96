//! Decoded instruction representation.

use crate::Operand;

/// A single decoded instruction.
///
/// Immutable once produced by the decoder; the driver tags each with the
/// buffer offset its first byte was read from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instruction {
    /// Mnemonic, e.g. "mov" or "vmovsd".
    pub mnemonic: String,
    /// Byte offset of the instruction within the decoded buffer.
    pub offset: usize,
    /// Operands in output position order.
    pub operands: Vec<Operand>,
}

impl Instruction {
    /// Creates a new instruction at offset 0.
    pub fn new(mnemonic: impl Into<String>, operands: Vec<Operand>) -> Self {
        Self {
            mnemonic: mnemonic.into(),
            offset: 0,
            operands,
        }
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.mnemonic)?;
        for (i, op) in self.operands.iter().enumerate() {
            if i == 0 {
                write!(f, " {}", op)?;
            } else {
                write!(f, ", {}", op)?;
            }
        }
        Ok(())
    }
}

/// Branch condition, encoded in the low nibble of the opcode for the
/// jcc/cmov/setcc families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Condition {
    Overflow,
    NoOverflow,
    Below,
    NotBelow,
    Zero,
    NotZero,
    BelowOrEqual,
    Above,
    Sign,
    NoSign,
    Parity,
    NoParity,
    Less,
    NotLess,
    LessOrEqual,
    NotLessOrEqual,
}

impl Condition {
    /// The fixed 16-entry condition table, indexed by opcode low nibble.
    pub const ALL: [Condition; 16] = [
        Condition::Overflow,
        Condition::NoOverflow,
        Condition::Below,
        Condition::NotBelow,
        Condition::Zero,
        Condition::NotZero,
        Condition::BelowOrEqual,
        Condition::Above,
        Condition::Sign,
        Condition::NoSign,
        Condition::Parity,
        Condition::NoParity,
        Condition::Less,
        Condition::NotLess,
        Condition::LessOrEqual,
        Condition::NotLessOrEqual,
    ];

    /// Selects the condition for an opcode byte by its low nibble.
    pub fn from_opcode(opcode: u8) -> Self {
        Self::ALL[(opcode & 0x0f) as usize]
    }

    /// Returns the lowercase token used in rendered output.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Overflow => "overflow",
            Self::NoOverflow => "no-overflow",
            Self::Below => "below",
            Self::NotBelow => "not-below",
            Self::Zero => "zero",
            Self::NotZero => "not-zero",
            Self::BelowOrEqual => "below-or-equal",
            Self::Above => "above",
            Self::Sign => "sign",
            Self::NoSign => "no-sign",
            Self::Parity => "parity",
            Self::NoParity => "no-parity",
            Self::Less => "less",
            Self::NotLess => "not-less",
            Self::LessOrEqual => "less-or-equal",
            Self::NotLessOrEqual => "not-less-or-equal",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Register;

    #[test]
    fn condition_from_low_nibble() {
        assert_eq!(Condition::from_opcode(0x70), Condition::Overflow);
        assert_eq!(Condition::from_opcode(0x87), Condition::Above);
        assert_eq!(Condition::from_opcode(0x4f), Condition::NotLessOrEqual);
    }

    #[test]
    fn instruction_rendering() {
        let ins = Instruction::new(
            "mov",
            vec![
                Operand::reg(Register::gpr(0, 64)),
                Operand::reg(Register::gpr(3, 64)),
            ],
        );
        assert_eq!(ins.to_string(), "mov rax, rbx");

        let nop = Instruction::new("nop", vec![]);
        assert_eq!(nop.to_string(), "nop");
    }
}
