//! # opscope-disasm
//!
//! Machine-code decoding for the opscope disassembler. The only
//! architecture wired up today is 64-bit x86; [`create`] is the entry
//! point that picks a decoder by architecture name.
//!
//! ```
//! use opscope_disasm::{create, DisasmOptions};
//!
//! let disasm = create("x64", DisasmOptions::default()).unwrap();
//! let out = disasm.disasm(&[0x48, 0x89, 0xd8]).unwrap();
//! assert_eq!(out[0].to_string(), "mov rax, rbx");
//! ```

pub mod cursor;
pub mod error;
pub mod x64;

pub use error::DecodeError;
pub use x64::X64Disassembler;

use opscope_core::Instruction;

/// Decoder behavior knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisasmOptions {
    /// When set, a buffer that ends in the middle of its final instruction
    /// yields the instructions decoded so far instead of an error. Decode
    /// failures other than truncation are still fatal.
    pub swallow: bool,
}

/// A machine-code decoder for one architecture.
pub trait Disassembler: std::fmt::Debug {
    /// Architecture name this decoder handles.
    fn architecture(&self) -> &'static str;

    /// Decodes the whole buffer into a sequence of instructions, each
    /// tagged with the offset of its first byte.
    fn disasm(&self, bytes: &[u8]) -> Result<Vec<Instruction>, DecodeError>;
}

/// Creates a decoder for the named architecture.
pub fn create(
    arch: &str,
    options: DisasmOptions,
) -> Result<Box<dyn Disassembler>, DecodeError> {
    match arch {
        "x64" | "x86_64" => Ok(Box::new(X64Disassembler::new(options))),
        other => Err(DecodeError::UnsupportedArch(other.to_string())),
    }
}
