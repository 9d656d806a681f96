//! Declarative opcode table.
//!
//! The table is a nested, immutable mapping from opcode bytes to decode
//! entries. It is built once, on first use, from compact builder calls in
//! the `opcodes*` modules; the decoder walks it but never mutates it.
//!
//! Indexing is one map per opcode space: the one-byte map, the `0F`
//! two-byte map, and the `0F 38` / `0F 3A` three-byte maps. A slot holds
//! either a concrete entry or a resolver that picks the entry from the
//! ModRM reg field (opcode-extension groups) or from the mandatory-prefix
//! state (SSE-style selection).

use std::sync::OnceLock;

use super::prefix::Prefixes;
use super::spec::{OperandSpec, Role};

/// Instruction mnemonic, possibly picked by REX.W.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mnemonic {
    Single(&'static str),
    /// 32-bit and 64-bit forms, selected by REX.W.
    ByRexW(&'static str, &'static str),
}

impl Mnemonic {
    fn parse(s: &'static str) -> Self {
        match s.split_once('/') {
            Some((narrow, wide)) => Self::ByRexW(narrow, wide),
            None => Self::Single(s),
        }
    }

    pub fn select(&self, rex_w: bool) -> &'static str {
        match self {
            Self::Single(name) => name,
            Self::ByRexW(narrow, wide) => {
                if rex_w {
                    wide
                } else {
                    narrow
                }
            }
        }
    }
}

/// A fully-resolved opcode: mnemonic plus compiled operand specs.
#[derive(Debug, Clone, PartialEq)]
pub struct OpcodeEntry {
    pub mnemonic: Mnemonic,
    pub specs: Vec<OperandSpec>,
    /// The instruction carries a condition-code operand in slot 0,
    /// derived from the opcode's low nibble.
    pub cond: bool,
    /// Index into `specs` of the ModRM reg operand, if any.
    pub reg_spec: Option<usize>,
    /// Index into `specs` of the ModRM rm operand, if any.
    pub rm_spec: Option<usize>,
}

impl OpcodeEntry {
    fn new(mnemonic: &'static str, operands: &[&'static str], cond: bool) -> Self {
        let base = cond as usize;
        let specs: Vec<OperandSpec> = operands
            .iter()
            .enumerate()
            .map(|(i, op)| OperandSpec::parse(op, base + i))
            .collect();
        let position = |role| specs.iter().position(|s| s.role() == role);
        Self {
            mnemonic: Mnemonic::parse(mnemonic),
            cond,
            reg_spec: position(Role::ModRmReg),
            rm_spec: position(Role::ModRmRm),
            specs,
        }
    }

    /// Number of output operand slots, condition included.
    pub fn arity(&self) -> usize {
        self.specs.len() + self.cond as usize
    }

    /// True if decoding this entry consumes a ModRM byte.
    pub fn uses_modrm(&self) -> bool {
        self.reg_spec.is_some() || self.rm_spec.is_some()
    }

    /// Immediate specs in table order, which is also their byte order in
    /// the encoding (enter carries two).
    pub fn immediates(&self) -> impl Iterator<Item = &OperandSpec> {
        self.specs.iter().filter(|s| s.role() == Role::Immediate)
    }

    /// The spec that fills output slot `index`, if one does. The condition
    /// slot of a `cond` entry has no spec.
    pub fn spec_for_slot(&self, index: usize) -> Option<&OperandSpec> {
        self.specs.iter().find(|s| s.index == index)
    }
}

/// Opcode-extension group: entries selected by the ModRM reg field,
/// optionally distinguishing memory from register-direct forms.
#[derive(Debug, Default)]
pub struct ModRmCases {
    /// Used when no mode-specific case matches.
    pub any: [Option<OpcodeEntry>; 8],
    /// Memory forms (mode != 3).
    pub mem: [Option<OpcodeEntry>; 8],
    /// Register-direct forms (mode == 3).
    pub reg: [Option<OpcodeEntry>; 8],
}

impl ModRmCases {
    pub fn select(&self, register_direct: bool, reg: u8) -> Option<&OpcodeEntry> {
        let idx = (reg & 0x7) as usize;
        let specific = if register_direct {
            &self.reg[idx]
        } else {
            &self.mem[idx]
        };
        specific.as_ref().or(self.any[idx].as_ref())
    }
}

/// Mandatory-prefix selection, SSE style.
#[derive(Debug, Default)]
pub struct PrefixCases {
    pub none: Option<OpcodeEntry>,
    /// 0x66.
    pub op_size: Option<OpcodeEntry>,
    /// 0xF3.
    pub rep: Option<OpcodeEntry>,
    /// 0xF2.
    pub repne: Option<OpcodeEntry>,
}

impl PrefixCases {
    /// Picks the entry for the decoded prefix state. 0x66 wins over 0xF3,
    /// which wins over 0xF2; a set prefix with no case falls through.
    pub fn select(&self, prefixes: &Prefixes) -> Option<&OpcodeEntry> {
        if prefixes.operand_size {
            if let Some(entry) = &self.op_size {
                return Some(entry);
            }
        }
        if prefixes.rep {
            if let Some(entry) = &self.rep {
                return Some(entry);
            }
        }
        if prefixes.repne {
            if let Some(entry) = &self.repne {
                return Some(entry);
            }
        }
        self.none.as_ref()
    }
}

/// One slot of an opcode map.
#[derive(Debug)]
pub enum TableEntry {
    Op(OpcodeEntry),
    ByModRm(ModRmCases),
    ByPrefix(PrefixCases),
}

pub(crate) type Map = [Option<TableEntry>; 256];

/// The full x86-64 opcode table.
#[derive(Debug)]
pub struct OpcodeTable {
    pub one_byte: Map,
    pub two_byte: Map,
    pub three_byte_38: Map,
    pub three_byte_3a: Map,
}

impl OpcodeTable {
    /// Returns the process-wide table, building it on first use.
    pub fn get() -> &'static OpcodeTable {
        static TABLE: OnceLock<OpcodeTable> = OnceLock::new();
        TABLE.get_or_init(OpcodeTable::build)
    }

    fn build() -> Self {
        let mut table = Self {
            one_byte: empty_map(),
            two_byte: empty_map(),
            three_byte_38: empty_map(),
            three_byte_3a: empty_map(),
        };
        super::opcodes::fill(&mut table.one_byte);
        super::opcodes_0f::fill(&mut table.two_byte);
        super::opcodes_0f3x::fill_38(&mut table.three_byte_38);
        super::opcodes_0f3x::fill_3a(&mut table.three_byte_3a);
        table
    }
}

fn empty_map() -> Map {
    std::array::from_fn(|_| None)
}

/// Key for one case of an opcode-extension group.
#[derive(Debug, Clone, Copy)]
pub(crate) enum GroupKey {
    /// Any addressing mode.
    Any(u8),
    /// Memory forms only.
    Mem(u8),
    /// Register-direct forms only.
    Reg(u8),
}

/// Installs a plain entry.
pub(crate) fn op(map: &mut Map, byte: u8, mnemonic: &'static str, operands: &[&'static str]) {
    map[byte as usize] = Some(TableEntry::Op(OpcodeEntry::new(mnemonic, operands, false)));
}

/// Installs consecutive entries sharing a mnemonic, one fixed operand each.
/// Used for the register spans (push/pop/xchg and the mov-immediate rows).
pub(crate) fn fixed_span(
    map: &mut Map,
    base: u8,
    mnemonic: &'static str,
    literals: &[&'static str],
    extra: &[&'static str],
) {
    for (i, literal) in literals.iter().enumerate() {
        let mut operands = vec![*literal];
        operands.extend_from_slice(extra);
        op(map, base + i as u8, mnemonic, &operands);
    }
}

/// Installs 16 consecutive condition-carrying entries. The decoder fills
/// slot 0 from the opcode's low nibble.
pub(crate) fn cond_span(map: &mut Map, base: u8, mnemonic: &'static str, operands: &[&'static str]) {
    for i in 0..16 {
        map[(base + i) as usize] = Some(TableEntry::Op(OpcodeEntry::new(mnemonic, operands, true)));
    }
}

/// Installs an opcode-extension group.
pub(crate) fn group(
    map: &mut Map,
    byte: u8,
    cases: &[(GroupKey, &'static str, &[&'static str])],
) {
    let mut group = ModRmCases::default();
    for (key, mnemonic, operands) in cases {
        let entry = OpcodeEntry::new(mnemonic, operands, false);
        match *key {
            GroupKey::Any(reg) => group.any[reg as usize] = Some(entry),
            GroupKey::Mem(reg) => group.mem[reg as usize] = Some(entry),
            GroupKey::Reg(reg) => group.reg[reg as usize] = Some(entry),
        }
    }
    map[byte as usize] = Some(TableEntry::ByModRm(group));
}

/// Installs a mandatory-prefix selection. Case order: no prefix, 0x66,
/// 0xF3, 0xF2.
pub(crate) fn prefix_select(
    map: &mut Map,
    byte: u8,
    none: Option<(&'static str, &[&'static str])>,
    op_size: Option<(&'static str, &[&'static str])>,
    rep: Option<(&'static str, &[&'static str])>,
    repne: Option<(&'static str, &[&'static str])>,
) {
    let build = |case: Option<(&'static str, &[&'static str])>| {
        case.map(|(mnemonic, operands)| OpcodeEntry::new(mnemonic, operands, false))
    };
    map[byte as usize] = Some(TableEntry::ByPrefix(PrefixCases {
        none: build(none),
        op_size: build(op_size),
        rep: build(rep),
        repne: build(repne),
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_roles() {
        let entry = OpcodeEntry::new("imul", &["Gv", "Ev", "Iz"], false);
        assert_eq!(entry.arity(), 3);
        assert!(entry.uses_modrm());
        assert_eq!(entry.reg_spec, Some(0));
        assert_eq!(entry.rm_spec, Some(1));
        assert_eq!(entry.immediates().count(), 1);

        let entry = OpcodeEntry::new("cmov", &["Gv", "Ev"], true);
        assert_eq!(entry.arity(), 3);
        assert!(entry.spec_for_slot(0).is_none());
        assert_eq!(entry.spec_for_slot(1), Some(&entry.specs[0]));
    }

    #[test]
    fn dual_mnemonic_by_rex_w() {
        let m = Mnemonic::parse("vmovd/vmovq");
        assert_eq!(m.select(false), "vmovd");
        assert_eq!(m.select(true), "vmovq");
    }

    #[test]
    fn modrm_case_fallback() {
        let mut map = empty_map();
        group(
            &mut map,
            0xc7,
            &[
                (GroupKey::Any(0), "mov", &["Ev", "Iz"]),
                (GroupKey::Mem(1), "cmpxchg8b/cmpxchg16b", &["Mq"]),
            ],
        );
        let Some(TableEntry::ByModRm(cases)) = &map[0xc7] else {
            panic!("expected modrm group");
        };
        assert!(cases.select(true, 0).is_some());
        assert!(cases.select(false, 1).is_some());
        assert!(cases.select(true, 1).is_none());
        assert!(cases.select(false, 2).is_none());
    }

    #[test]
    fn prefix_case_priority() {
        let prefixes = |op_size, rep, repne| Prefixes {
            operand_size: op_size,
            rep,
            repne,
            ..Prefixes::default()
        };
        let mut map = empty_map();
        prefix_select(
            &mut map,
            0x10,
            Some(("vmovups", &["Vps", "Wps"])),
            None,
            Some(("vmovss", &["Vss", "Hss", "Wss"])),
            Some(("vmovsd", &["Vsd", "Hsd", "Wsd"])),
        );
        let Some(TableEntry::ByPrefix(cases)) = &map[0x10] else {
            panic!("expected prefix group");
        };
        let name = |p: &Prefixes| cases.select(p).unwrap().mnemonic.select(false);
        assert_eq!(name(&prefixes(false, false, false)), "vmovups");
        assert_eq!(name(&prefixes(false, false, true)), "vmovsd");
        assert_eq!(name(&prefixes(false, true, true)), "vmovss");
        // No 0x66 case installed, so the prefix falls through.
        assert_eq!(name(&prefixes(true, false, false)), "vmovups");
    }

    #[test]
    fn table_builds_once() {
        let table = OpcodeTable::get();
        assert!(std::ptr::eq(table, OpcodeTable::get()));
        assert!(table.one_byte[0x90].is_some());
        assert!(table.two_byte[0x1f].is_some());
        assert!(table.three_byte_3a[0x0b].is_some());
    }
}
