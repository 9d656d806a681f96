//! x86-64 register representation.

/// Register class (general purpose, SIMD, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegisterClass {
    /// General purpose register (rax..r15 and their narrower views).
    General,
    /// MMX register (mm0-mm7).
    Mmx,
    /// XMM register (xmm0-xmm15).
    Xmm,
    /// Control register (cr0, cr2, ...).
    Control,
    /// Debug register (dr0-dr7).
    Debug,
}

/// A concrete register: class, number, and access width.
///
/// The number is the hardware encoding (0-15 for general and xmm, 0-7 for
/// the rest); the width selects which view of the register is named, e.g.
/// number 0 is `rax` at 64 bits and `eax` at 32.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Register {
    /// The class of register.
    pub class: RegisterClass,
    /// Hardware register number.
    pub num: u8,
    /// Access width in bits.
    pub size: u16,
}

impl Register {
    /// Creates a new register.
    pub fn new(class: RegisterClass, num: u8, size: u16) -> Self {
        Self { class, num, size }
    }

    /// A general purpose register of the given number and width.
    pub fn gpr(num: u8, size: u16) -> Self {
        Self::new(RegisterClass::General, num, size)
    }

    /// An xmm register of the given number.
    pub fn xmm(num: u8) -> Self {
        Self::new(RegisterClass::Xmm, num, 128)
    }

    /// Returns the canonical lowercase name for this register.
    pub fn name(&self) -> &'static str {
        match self.class {
            RegisterClass::General => gpr_name(self.num, self.size),
            RegisterClass::Mmx => MMX_NAMES[(self.num & 0x7) as usize],
            RegisterClass::Xmm => XMM_NAMES[(self.num & 0xf) as usize],
            RegisterClass::Control => CONTROL_NAMES[(self.num & 0x7) as usize],
            RegisterClass::Debug => DEBUG_NAMES[(self.num & 0x7) as usize],
        }
    }
}

impl std::fmt::Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

const GPR64_NAMES: [&str; 16] = [
    "rax", "rcx", "rdx", "rbx", "rsp", "rbp", "rsi", "rdi", "r8", "r9", "r10", "r11", "r12", "r13",
    "r14", "r15",
];

const GPR32_NAMES: [&str; 16] = [
    "eax", "ecx", "edx", "ebx", "esp", "ebp", "esi", "edi", "r8d", "r9d", "r10d", "r11d", "r12d",
    "r13d", "r14d", "r15d",
];

const GPR16_NAMES: [&str; 16] = [
    "ax", "cx", "dx", "bx", "sp", "bp", "si", "di", "r8w", "r9w", "r10w", "r11w", "r12w", "r13w",
    "r14w", "r15w",
];

const GPR8_NAMES: [&str; 16] = [
    "al", "cl", "dl", "bl", "spl", "bpl", "sil", "dil", "r8b", "r9b", "r10b", "r11b", "r12b",
    "r13b", "r14b", "r15b",
];

const MMX_NAMES: [&str; 8] = ["mm0", "mm1", "mm2", "mm3", "mm4", "mm5", "mm6", "mm7"];

const XMM_NAMES: [&str; 16] = [
    "xmm0", "xmm1", "xmm2", "xmm3", "xmm4", "xmm5", "xmm6", "xmm7", "xmm8", "xmm9", "xmm10",
    "xmm11", "xmm12", "xmm13", "xmm14", "xmm15",
];

const CONTROL_NAMES: [&str; 8] = ["cr0", "cr1", "cr2", "cr3", "cr4", "cr5", "cr6", "cr7"];

const DEBUG_NAMES: [&str; 8] = ["dr0", "dr1", "dr2", "dr3", "dr4", "dr5", "dr6", "dr7"];

fn gpr_name(num: u8, size: u16) -> &'static str {
    let idx = (num & 0xf) as usize;
    match size {
        64 => GPR64_NAMES[idx],
        32 => GPR32_NAMES[idx],
        16 => GPR16_NAMES[idx],
        8 => GPR8_NAMES[idx],
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpr_names_by_width() {
        assert_eq!(Register::gpr(0, 64).name(), "rax");
        assert_eq!(Register::gpr(0, 32).name(), "eax");
        assert_eq!(Register::gpr(8, 64).name(), "r8");
        assert_eq!(Register::gpr(8, 32).name(), "r8d");
        assert_eq!(Register::gpr(15, 8).name(), "r15b");
        assert_eq!(Register::gpr(4, 8).name(), "spl");
    }

    #[test]
    fn simd_names() {
        assert_eq!(Register::xmm(13).name(), "xmm13");
        assert_eq!(Register::new(RegisterClass::Mmx, 3, 64).name(), "mm3");
        assert_eq!(Register::new(RegisterClass::Debug, 6, 64).name(), "dr6");
    }
}
