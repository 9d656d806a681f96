//! x86-64 decoding: prefixes, REX, the opcode table, and the decoder.

mod decoder;
mod modrm;
mod opcodes;
mod opcodes_0f;
mod opcodes_0f3x;
mod prefix;
mod spec;
mod table;

pub use decoder::X64Disassembler;
pub use prefix::{Prefixes, Rex, Segment};
pub use table::OpcodeTable;
