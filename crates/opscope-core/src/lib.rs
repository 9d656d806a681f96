//! # opscope-core
//!
//! Core abstractions for the opscope disassembler. This crate defines the
//! data model produced by decoding: instructions, operands, registers, and
//! condition codes, together with the plain-text rendering of each.

pub mod instruction;
pub mod operand;
pub mod register;

pub use instruction::{Condition, Instruction};
pub use operand::{Immediate, MemoryRef, Operand};
pub use register::{Register, RegisterClass};
