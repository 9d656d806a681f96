//! x86-64 instruction decoder.

use opscope_core::{Condition, Instruction, MemoryRef, Operand, Register, RegisterClass};

use crate::cursor::Cursor;
use crate::error::DecodeError;
use crate::{DisasmOptions, Disassembler};

use super::modrm::{ModRm, Sib};
use super::prefix::{Prefixes, Rex};
use super::spec::{OperandSpec, SizeCode};
use super::table::{OpcodeEntry, OpcodeTable, TableEntry};

/// Decoder for 64-bit x86 machine code.
#[derive(Debug)]
pub struct X64Disassembler {
    options: DisasmOptions,
}

impl X64Disassembler {
    pub fn new(options: DisasmOptions) -> Self {
        Self { options }
    }
}

impl Disassembler for X64Disassembler {
    fn architecture(&self) -> &'static str {
        "x64"
    }

    fn disasm(&self, bytes: &[u8]) -> Result<Vec<Instruction>, DecodeError> {
        let mut cur = Cursor::new(bytes);
        let mut out = Vec::new();
        while !cur.is_empty() {
            let offset = cur.position();
            match decode_one(&mut cur) {
                Ok(mut ins) => {
                    ins.offset = offset;
                    out.push(ins);
                }
                // A truncated trailing instruction can be swallowed; any
                // other failure, or truncation without opt-in, is fatal.
                Err(err) if err.is_truncation() && self.options.swallow => break,
                Err(err) => return Err(err),
            }
        }
        Ok(out)
    }
}

fn decode_one(cur: &mut Cursor<'_>) -> Result<Instruction, DecodeError> {
    let table = OpcodeTable::get();

    let prefixes = Prefixes::read(cur)?;
    let rex = Rex::read(cur)?.unwrap_or_default();

    let opcode_offset = cur.position();
    let mut opcode_bytes = vec![cur.read_u8()?];
    let (map, opcode) = match opcode_bytes[0] {
        0x0f => {
            let second = cur.read_u8()?;
            opcode_bytes.push(second);
            match second {
                0x38 | 0x3a => {
                    let third = cur.read_u8()?;
                    opcode_bytes.push(third);
                    let map = if second == 0x38 {
                        &table.three_byte_38
                    } else {
                        &table.three_byte_3a
                    };
                    (map, third)
                }
                _ => (&table.two_byte, second),
            }
        }
        first => (&table.one_byte, first),
    };

    let Some(slot) = &map[opcode as usize] else {
        return Err(DecodeError::unsupported_opcode(opcode_offset, opcode_bytes));
    };

    // Resolve to a concrete entry, consuming the ModRM byte early when the
    // slot is keyed on it.
    let mut modrm = None;
    let entry = match slot {
        TableEntry::Op(entry) => entry,
        TableEntry::ByModRm(cases) => {
            let raw = cur.read_u8()?;
            let m = ModRm::parse(raw);
            modrm = Some(m);
            match cases.select(m.is_register_direct(), m.reg) {
                Some(entry) => entry,
                None => {
                    opcode_bytes.push(raw);
                    return Err(DecodeError::unsupported_opcode(opcode_offset, opcode_bytes));
                }
            }
        }
        TableEntry::ByPrefix(cases) => match cases.select(&prefixes) {
            Some(entry) => entry,
            None => {
                return Err(DecodeError::unsupported_opcode(opcode_offset, opcode_bytes));
            }
        },
    };

    let mut slots: Vec<Option<Operand>> = vec![None; entry.arity()];

    if entry.cond {
        slots[0] = Some(Operand::Condition(Condition::from_opcode(opcode)));
    }
    if entry.uses_modrm() {
        let m = match modrm {
            Some(m) => m,
            None => ModRm::parse(cur.read_u8()?),
        };
        decode_modrm(cur, entry, m, rex, &mut slots)?;
    }
    for spec in entry.immediates() {
        slots[spec.index] = Some(read_immediate(cur, spec, rex)?);
    }
    for spec in &entry.specs {
        if let Some(fixed) = &spec.fixed {
            slots[spec.index] = Some(fixed.select(rex.b));
        }
    }

    // Collect in output order, dropping VEX-tied slots when no VEX prefix
    // was decoded.
    let mut operands = Vec::with_capacity(slots.len());
    for (i, slot) in slots.into_iter().enumerate() {
        let vex_slot = entry.spec_for_slot(i).is_some_and(OperandSpec::is_vex);
        if vex_slot && !prefixes.vex {
            continue;
        }
        let Some(operand) = slot else {
            panic!("operand slot {i} left unfilled by table entry");
        };
        operands.push(operand);
    }

    Ok(Instruction::new(entry.mnemonic.select(rex.w), operands))
}

fn decode_modrm(
    cur: &mut Cursor<'_>,
    entry: &OpcodeEntry,
    m: ModRm,
    rex: Rex,
    slots: &mut [Option<Operand>],
) -> Result<(), DecodeError> {
    if let Some(i) = entry.reg_spec {
        let spec = &entry.specs[i];
        let reg = field_register(spec, m.reg | rex.r_bit(), rex);
        slots[spec.index] = Some(Operand::Register(reg));
    }

    let Some(i) = entry.rm_spec else {
        return Ok(());
    };
    let spec = &entry.specs[i];

    if m.is_register_direct() {
        assert!(
            !spec.memory_only(),
            "memory-only operand encoded register-direct"
        );
        let reg = field_register(spec, m.rm | rex.b_bit(), rex);
        slots[spec.index] = Some(Operand::Register(reg));
        return Ok(());
    }

    let mem = if m.rm == 4 {
        decode_sib_memory(cur, m.mode, rex)?
    } else {
        debug_assert!(!rex.x, "REX.X outside a SIB-encoded address");
        let base = Register::gpr(m.rm | rex.b_bit(), 64);
        let disp = read_displacement(cur, m.mode)?;
        MemoryRef {
            base: Some(base),
            index: None,
            scale: 1,
            disp,
        }
    };
    slots[spec.index] = Some(Operand::Memory(mem));
    Ok(())
}

fn decode_sib_memory(cur: &mut Cursor<'_>, mode: u8, rex: Rex) -> Result<MemoryRef, DecodeError> {
    let sib = Sib::parse(cur.read_u8()?);

    // index 100 (post-extension) encodes "no index".
    let index_num = sib.index | rex.x_bit();
    let index = (index_num != 4).then(|| Register::gpr(index_num, 64));
    let scale = if index.is_some() { sib.scale_factor() } else { 1 };

    // base 101 is overloaded: with mode 0 there is no base register at
    // all, only a disp32; with modes 1 and 2 it names rbp or r13.
    let (base, disp) = if sib.base == 5 && mode == 0 {
        (None, Some(i64::from(cur.read_i32()?)))
    } else {
        let base = Register::gpr(sib.base | rex.b_bit(), 64);
        (Some(base), read_displacement(cur, mode)?)
    };

    Ok(MemoryRef {
        base,
        index,
        scale,
        disp,
    })
}

fn read_displacement(cur: &mut Cursor<'_>, mode: u8) -> Result<Option<i64>, DecodeError> {
    match mode {
        0 => Ok(None),
        1 => Ok(Some(i64::from(cur.read_i8()?))),
        2 => Ok(Some(i64::from(cur.read_i32()?))),
        _ => unreachable!("register-direct mode has no displacement"),
    }
}

/// Names the register selected by a ModRM field for the given spec.
/// General registers take their width from REX.W; the fixed-width classes
/// ignore it.
fn field_register(spec: &OperandSpec, num: u8, rex: Rex) -> Register {
    let class = spec.register_class();
    match class {
        RegisterClass::General => Register::gpr(num, if rex.w { 64 } else { 32 }),
        RegisterClass::Xmm => Register::xmm(num),
        // The remaining classes have eight registers; extension bits do
        // not reach them.
        _ => Register::new(class, num & 0x7, 64),
    }
}

fn read_immediate(
    cur: &mut Cursor<'_>,
    spec: &OperandSpec,
    rex: Rex,
) -> Result<Operand, DecodeError> {
    let operand = match spec.size {
        SizeCode::B if spec.is_relative() => Operand::imm(i64::from(cur.read_i8()?)),
        SizeCode::B => Operand::imm_unsigned(u64::from(cur.read_u8()?)),
        SizeCode::W => Operand::imm_unsigned(u64::from(cur.read_u16()?)),
        // z is always a sign-extended doubleword in 64-bit mode.
        SizeCode::Z => Operand::imm(i64::from(cur.read_i32()?)),
        SizeCode::V if rex.w => Operand::Imm64(cur.read_u64_display()?),
        SizeCode::V => Operand::imm_unsigned(u64::from(cur.read_u32()?)),
        other => unreachable!("size code {other:?} is not an immediate width"),
    };
    Ok(operand)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disasm(bytes: &[u8]) -> Vec<Instruction> {
        X64Disassembler::new(DisasmOptions::default())
            .disasm(bytes)
            .unwrap()
    }

    fn one(bytes: &[u8]) -> String {
        let instructions = disasm(bytes);
        assert_eq!(instructions.len(), 1, "expected one instruction");
        instructions[0].to_string()
    }

    #[test]
    fn register_direct_mov() {
        assert_eq!(one(&[0x48, 0x89, 0xd8]), "mov rax, rbx");
        assert_eq!(one(&[0x89, 0xd8]), "mov eax, ebx");
        assert_eq!(one(&[0x4d, 0x89, 0xc1]), "mov r9, r8");
    }

    #[test]
    fn memory_forms() {
        assert_eq!(one(&[0x48, 0x8b, 0x03]), "mov rax, [rbx]");
        assert_eq!(one(&[0x4c, 0x8b, 0x7b, 0x08]), "mov r15, [rbx, 0x8]");
        assert_eq!(one(&[0x48, 0x8b, 0x43, 0x80]), "mov rax, [rbx, -0x80]");
        assert_eq!(one(&[0x48, 0x8b, 0x43, 0x7f]), "mov rax, [rbx, 0x7f]");
        assert_eq!(
            one(&[0x48, 0x8b, 0x83, 0x00, 0x01, 0x00, 0x00]),
            "mov rax, [rbx, 0x100]"
        );
    }

    #[test]
    fn sib_forms() {
        // scale*index with base
        assert_eq!(one(&[0x48, 0x8b, 0x04, 0x8b]), "mov rax, [rbx, rcx*4]");
        // no index (index field 100)
        assert_eq!(one(&[0x48, 0x8b, 0x04, 0x23]), "mov rax, [rbx]");
        // base 101, mode 0: disp32 with no base
        assert_eq!(
            one(&[0x48, 0x8b, 0x04, 0x8d, 0x10, 0x00, 0x00, 0x00]),
            "mov rax, [rcx*4, 0x10]"
        );
        // base 101, mode 1: rbp or r13 by REX.B
        assert_eq!(one(&[0x48, 0x8b, 0x44, 0x24, 0x08]), "mov rax, [rsp, 0x8]");
        assert_eq!(one(&[0x48, 0x8b, 0x44, 0x65, 0x04]), "mov rax, [rbp, 0x4]");
        assert_eq!(one(&[0x49, 0x8b, 0x44, 0x65, 0x04]), "mov rax, [r13, 0x4]");
    }

    #[test]
    fn swallows_trailing_truncation_only_when_asked() {
        let bytes = [0x90, 0x0f];
        let err = X64Disassembler::new(DisasmOptions::default())
            .disasm(&bytes)
            .unwrap_err();
        assert!(err.is_truncation());

        let out = X64Disassembler::new(DisasmOptions { swallow: true })
            .disasm(&bytes)
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].to_string(), "nop");
    }
}
