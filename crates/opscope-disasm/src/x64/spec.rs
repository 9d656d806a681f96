//! Operand specification shorthand.
//!
//! Table entries describe operands with the Intel manual's two-part
//! notation: an uppercase addressing-method letter followed by a lowercase
//! size code, e.g. `Gv` (register field, natural width) or `Ib` (byte
//! immediate). Anything that does not parse as method+size is a fixed
//! literal: a register name (`rax`), a pair of names selected by REX.B
//! (`rax/r8`), a bare token (`fs`), or an integer (`1`).
//!
//! Parsing happens once, while the opcode table is built; the decoder only
//! ever sees the compiled [`OperandSpec`].

use opscope_core::{Operand, Register, RegisterClass};

/// Addressing-method letter of an operand spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `C`: control register selected by ModRM.reg.
    CtrlReg,
    /// `D`: debug register selected by ModRM.reg.
    DebugReg,
    /// `E`: general register or memory, from ModRM.rm.
    RegMem,
    /// `G`: general register from ModRM.reg.
    Reg,
    /// `I`: immediate.
    Imm,
    /// `J`: relative branch offset immediate.
    Rel,
    /// `M`: memory only, from ModRM.rm.
    Mem,
    /// `N`: mmx register from ModRM.rm, register-direct only.
    MmxRm,
    /// `P`: mmx register from ModRM.reg.
    MmxReg,
    /// `Q`: mmx register or memory, from ModRM.rm.
    MmxRegMem,
    /// `R`: general register from ModRM.rm, register-direct only.
    RegRm,
    /// `U`: xmm register from ModRM.rm, register-direct only.
    XmmRm,
    /// `V`: xmm register from ModRM.reg.
    XmmReg,
    /// `W`: xmm register or memory, from ModRM.rm.
    XmmRegMem,
    /// `H`: register named by the VEX prefix. The slot is dropped from the
    /// output unless a VEX prefix was decoded.
    Vex,
    /// Fixed literal; no bytes consumed.
    Fixed,
}

/// How the decoder fills the operand slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// From the ModRM reg field.
    ModRmReg,
    /// From the ModRM rm field (possibly a memory reference).
    ModRmRm,
    /// From immediate bytes after the addressing fields.
    Immediate,
    /// No decoding input; fixed or VEX-supplied.
    None,
}

/// Size code of an operand spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeCode {
    /// No size suffix.
    None,
    /// `b`: byte.
    B,
    /// `w`: word.
    W,
    /// `d`: doubleword.
    D,
    /// `q`: quadword.
    Q,
    /// `z`: word or doubleword; always doubleword in 64-bit mode.
    Z,
    /// `v`: natural operand width, widened by REX.W.
    V,
    /// `y`: doubleword or quadword by REX.W.
    Y,
    /// `x`: full vector width.
    X,
    /// `p`: far pointer (segment:offset).
    P,
    /// `ps`/`pd`/`ss`/`sd`: packed or scalar float; width is implied by
    /// the register class, so these all decode alike.
    Float,
}

/// A pre-resolved fixed operand.
#[derive(Debug, Clone, PartialEq)]
pub enum FixedOperand {
    /// Always this operand.
    Always(Operand),
    /// Selected by REX.B: the second operand when set.
    ByRexB(Operand, Operand),
}

impl FixedOperand {
    pub fn select(&self, rex_b: bool) -> Operand {
        match self {
            Self::Always(op) => op.clone(),
            Self::ByRexB(low, high) => {
                if rex_b {
                    high.clone()
                } else {
                    low.clone()
                }
            }
        }
    }
}

/// A compiled operand specification.
#[derive(Debug, Clone, PartialEq)]
pub struct OperandSpec {
    pub method: Method,
    pub size: SizeCode,
    /// Output position within the instruction's operand list.
    pub index: usize,
    /// Present iff `method` is [`Method::Fixed`].
    pub fixed: Option<FixedOperand>,
}

impl OperandSpec {
    /// Compiles one shorthand string. `index` is the operand's output
    /// position. Panics on malformed shorthand, which is a table defect.
    pub fn parse(shorthand: &'static str, index: usize) -> Self {
        let mut chars = shorthand.chars();
        let head = chars.next().expect("empty operand shorthand");
        if head.is_ascii_uppercase() {
            let method = parse_method(head, shorthand);
            let size = parse_size(chars.as_str(), shorthand);
            return Self {
                method,
                size,
                index,
                fixed: None,
            };
        }
        Self {
            method: Method::Fixed,
            size: SizeCode::None,
            index,
            fixed: Some(parse_fixed(shorthand)),
        }
    }

    pub fn role(&self) -> Role {
        match self.method {
            Method::CtrlReg | Method::DebugReg | Method::Reg | Method::MmxReg | Method::XmmReg => {
                Role::ModRmReg
            }
            Method::RegMem
            | Method::Mem
            | Method::MmxRm
            | Method::MmxRegMem
            | Method::RegRm
            | Method::XmmRm
            | Method::XmmRegMem => Role::ModRmRm,
            Method::Imm | Method::Rel => Role::Immediate,
            Method::Vex | Method::Fixed => Role::None,
        }
    }

    /// Register class named by this spec when it resolves to a register.
    pub fn register_class(&self) -> RegisterClass {
        match self.method {
            Method::CtrlReg => RegisterClass::Control,
            Method::DebugReg => RegisterClass::Debug,
            Method::MmxRm | Method::MmxReg | Method::MmxRegMem => RegisterClass::Mmx,
            Method::XmmRm | Method::XmmReg | Method::XmmRegMem | Method::Vex => RegisterClass::Xmm,
            _ => RegisterClass::General,
        }
    }

    /// True if a register-direct ModRM is invalid for this operand.
    pub fn memory_only(&self) -> bool {
        self.method == Method::Mem
    }

    /// True for relative branch offsets, which are always signed.
    pub fn is_relative(&self) -> bool {
        self.method == Method::Rel
    }

    pub fn is_vex(&self) -> bool {
        self.method == Method::Vex
    }
}

fn parse_method(letter: char, shorthand: &str) -> Method {
    match letter {
        'C' => Method::CtrlReg,
        'D' => Method::DebugReg,
        'E' => Method::RegMem,
        'G' => Method::Reg,
        'I' => Method::Imm,
        'J' => Method::Rel,
        'M' => Method::Mem,
        'N' => Method::MmxRm,
        'P' => Method::MmxReg,
        'Q' => Method::MmxRegMem,
        'R' => Method::RegRm,
        'U' => Method::XmmRm,
        'V' => Method::XmmReg,
        'W' => Method::XmmRegMem,
        'H' => Method::Vex,
        _ => panic!("unknown addressing method in operand spec {:?}", shorthand),
    }
}

fn parse_size(suffix: &str, shorthand: &str) -> SizeCode {
    match suffix {
        "" => SizeCode::None,
        "b" => SizeCode::B,
        "w" => SizeCode::W,
        "d" => SizeCode::D,
        "q" => SizeCode::Q,
        "z" => SizeCode::Z,
        "v" => SizeCode::V,
        "y" => SizeCode::Y,
        "x" => SizeCode::X,
        "p" => SizeCode::P,
        "ps" | "pd" | "ss" | "sd" => SizeCode::Float,
        _ => panic!("unknown size code in operand spec {:?}", shorthand),
    }
}

fn parse_fixed(literal: &'static str) -> FixedOperand {
    if let Some((low, high)) = literal.split_once('/') {
        return FixedOperand::ByRexB(fixed_operand(low), fixed_operand(high));
    }
    FixedOperand::Always(fixed_operand(literal))
}

fn fixed_operand(literal: &'static str) -> Operand {
    if let Ok(value) = literal.parse::<i64>() {
        return Operand::imm(value);
    }
    match gpr_literal(literal) {
        Some(reg) => Operand::Register(reg),
        // The high-byte names (ah..bh) have no register number in our
        // numbering, and segment names are never ModRM-addressable here.
        None => Operand::Token(literal),
    }
}

/// Maps a fixed register-name literal to a concrete register.
fn gpr_literal(name: &str) -> Option<Register> {
    const GPR64: [&str; 16] = [
        "rax", "rcx", "rdx", "rbx", "rsp", "rbp", "rsi", "rdi", "r8", "r9", "r10", "r11", "r12",
        "r13", "r14", "r15",
    ];
    const GPR32: [&str; 8] = ["eax", "ecx", "edx", "ebx", "esp", "ebp", "esi", "edi"];
    const GPR16: [&str; 8] = ["ax", "cx", "dx", "bx", "sp", "bp", "si", "di"];
    const GPR8: [&str; 12] = [
        "al", "cl", "dl", "bl", "r8b", "r9b", "r10b", "r11b", "r12b", "r13b", "r14b", "r15b",
    ];

    if let Some(num) = GPR64.iter().position(|&n| n == name) {
        return Some(Register::gpr(num as u8, 64));
    }
    if let Some(num) = GPR32.iter().position(|&n| n == name) {
        return Some(Register::gpr(num as u8, 32));
    }
    if let Some(num) = GPR16.iter().position(|&n| n == name) {
        return Some(Register::gpr(num as u8, 16));
    }
    if let Some(pos) = GPR8.iter().position(|&n| n == name) {
        let num = if pos < 4 { pos } else { pos + 4 };
        return Some(Register::gpr(num as u8, 8));
    }
    None
}
