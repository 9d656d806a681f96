//! One-byte opcode map.

use super::table::{cond_span, fixed_span, group, op, GroupKey::*, Map};

/// 64-bit register literals for the 0x50..0x5F spans and friends, with the
/// REX.B-selected high half.
const QUAD_REGS: [&str; 8] = [
    "rax/r8", "rcx/r9", "rdx/r10", "rbx/r11", "rsp/r12", "rbp/r13", "rsi/r14", "rdi/r15",
];

/// Byte register literals for the 0xB0 row. The high-byte names have no
/// REX-era register number and render as bare tokens.
const BYTE_REGS: [&str; 8] = [
    "al/r8b", "cl/r9b", "dl/r10b", "bl/r11b", "ah/r12b", "ch/r13b", "dh/r14b", "bh/r15b",
];

/// The classic ALU row: six encodings sharing one mnemonic.
fn alu_block(map: &mut Map, base: u8, mnemonic: &'static str) {
    op(map, base, mnemonic, &["Eb", "Gb"]);
    op(map, base + 1, mnemonic, &["Ev", "Gv"]);
    op(map, base + 2, mnemonic, &["Gb", "Eb"]);
    op(map, base + 3, mnemonic, &["Gv", "Ev"]);
    op(map, base + 4, mnemonic, &["al", "Ib"]);
    op(map, base + 5, mnemonic, &["rax", "Iz"]);
}

/// Group 1: ALU with immediate, selected by ModRM.reg.
fn imm_group(map: &mut Map, byte: u8, operands: &'static [&'static str]) {
    group(
        map,
        byte,
        &[
            (Any(0), "add", operands),
            (Any(1), "or", operands),
            (Any(2), "adc", operands),
            (Any(3), "sbb", operands),
            (Any(4), "and", operands),
            (Any(5), "sub", operands),
            (Any(6), "xor", operands),
            (Any(7), "cmp", operands),
        ],
    );
}

/// Group 2: rotates and shifts.
fn shift_group(map: &mut Map, byte: u8, operands: &'static [&'static str]) {
    group(
        map,
        byte,
        &[
            (Any(0), "rol", operands),
            (Any(1), "ror", operands),
            (Any(2), "rcl", operands),
            (Any(3), "rcr", operands),
            (Any(4), "shl", operands),
            (Any(5), "shr", operands),
            (Any(7), "sar", operands),
        ],
    );
}

/// Group 3: test and the unary arithmetic ops. The widening forms name
/// the implicit accumulator.
fn unary_group(map: &mut Map, byte: u8, e: &'static str, imm: &'static str) {
    group(
        map,
        byte,
        &[
            (Any(0), "test", &[e, imm]),
            (Any(2), "not", &[e]),
            (Any(3), "neg", &[e]),
            (Any(4), "mul", &["rax", e]),
            (Any(5), "imul", &["rax", e]),
            (Any(6), "div", &["rax", e]),
            (Any(7), "idiv", &["rax", e]),
        ],
    );
}

pub(super) fn fill(m: &mut Map) {
    alu_block(m, 0x00, "add");
    alu_block(m, 0x08, "or");
    alu_block(m, 0x10, "adc");
    alu_block(m, 0x18, "sbb");
    alu_block(m, 0x20, "and");
    alu_block(m, 0x28, "sub");
    alu_block(m, 0x30, "xor");
    alu_block(m, 0x38, "cmp");

    fixed_span(m, 0x50, "push", &QUAD_REGS, &[]);
    fixed_span(m, 0x58, "pop", &QUAD_REGS, &[]);

    op(m, 0x63, "movsxd", &["Gv", "Ev"]);
    op(m, 0x68, "push", &["Iz"]);
    op(m, 0x69, "imul", &["Gv", "Ev", "Iz"]);
    op(m, 0x6a, "push", &["Ib"]);
    op(m, 0x6b, "imul", &["Gv", "Ev", "Ib"]);
    op(m, 0x6c, "insb", &[]);
    op(m, 0x6d, "insd", &[]);
    op(m, 0x6e, "outsb", &[]);
    op(m, 0x6f, "outsd", &[]);

    cond_span(m, 0x70, "jcc", &["Jb"]);

    imm_group(m, 0x80, &["Eb", "Ib"]);
    imm_group(m, 0x81, &["Ev", "Iz"]);
    imm_group(m, 0x83, &["Ev", "Ib"]);
    op(m, 0x84, "test", &["Eb", "Gb"]);
    op(m, 0x85, "test", &["Ev", "Gv"]);
    op(m, 0x86, "xchg", &["Eb", "Gb"]);
    op(m, 0x87, "xchg", &["Ev", "Gv"]);
    op(m, 0x88, "mov", &["Eb", "Gb"]);
    op(m, 0x89, "mov", &["Ev", "Gv"]);
    op(m, 0x8a, "mov", &["Gb", "Eb"]);
    op(m, 0x8b, "mov", &["Gv", "Ev"]);
    op(m, 0x8d, "lea", &["Gv", "M"]);
    group(m, 0x8f, &[(Any(0), "pop", &["Ev"])]);

    fixed_span(m, 0x90, "xchg", &QUAD_REGS, &["rax"]);
    // xchg rax, rax is just nop (and the REX.B form still means r8).
    op(m, 0x90, "nop", &[]);
    op(m, 0x98, "cwde/cdqe", &[]);
    op(m, 0x99, "cdq/cqo", &[]);
    op(m, 0x9b, "wait", &[]);
    op(m, 0x9c, "pushf", &[]);
    op(m, 0x9d, "popf", &[]);
    op(m, 0x9e, "sahf", &[]);
    op(m, 0x9f, "lahf", &[]);

    op(m, 0xa4, "movsb", &[]);
    op(m, 0xa5, "movsd", &[]);
    op(m, 0xa6, "cmpsb", &[]);
    op(m, 0xa7, "cmpsd", &[]);
    op(m, 0xa8, "test", &["al", "Ib"]);
    op(m, 0xa9, "test", &["rax", "Iz"]);
    op(m, 0xaa, "stosb", &[]);
    op(m, 0xab, "stosd", &[]);
    op(m, 0xac, "lodsb", &[]);
    op(m, 0xad, "lodsd", &[]);
    op(m, 0xae, "scasb", &[]);
    op(m, 0xaf, "scasd", &[]);

    fixed_span(m, 0xb0, "mov", &BYTE_REGS, &["Ib"]);
    fixed_span(m, 0xb8, "mov", &QUAD_REGS, &["Iv"]);

    shift_group(m, 0xc0, &["Eb", "Ib"]);
    shift_group(m, 0xc1, &["Ev", "Ib"]);
    op(m, 0xc2, "ret", &["Iw"]);
    op(m, 0xc3, "ret", &[]);
    group(
        m,
        0xc6,
        &[(Any(0), "mov", &["Eb", "Ib"]), (Reg(7), "xabort", &["Ib"])],
    );
    group(
        m,
        0xc7,
        &[(Any(0), "mov", &["Ev", "Iz"]), (Reg(7), "xbegin", &["Ib"])],
    );
    op(m, 0xc8, "enter", &["Iw", "Ib"]);
    op(m, 0xc9, "leave", &[]);
    op(m, 0xca, "ret", &["Iw"]);
    op(m, 0xcb, "ret", &[]);
    op(m, 0xcc, "int3", &[]);
    op(m, 0xcd, "int", &["Ib"]);
    op(m, 0xcf, "iretd", &[]);

    shift_group(m, 0xd0, &["Eb", "1"]);
    shift_group(m, 0xd1, &["Ev", "1"]);
    shift_group(m, 0xd2, &["Eb", "cl"]);
    shift_group(m, 0xd3, &["Ev", "cl"]);

    op(m, 0xe0, "loopne", &["Jb"]);
    op(m, 0xe1, "loope", &["Jb"]);
    op(m, 0xe2, "loop", &["Jb"]);
    op(m, 0xe3, "jrcxz", &["Jb"]);
    op(m, 0xe4, "in", &["al", "Ib"]);
    op(m, 0xe5, "in", &["eax", "Ib"]);
    op(m, 0xe6, "out", &["Ib", "al"]);
    op(m, 0xe7, "out", &["Ib", "eax"]);
    op(m, 0xe8, "call", &["Jz"]);
    op(m, 0xe9, "jmp", &["Jz"]);
    op(m, 0xeb, "jmp", &["Jb"]);
    op(m, 0xec, "in", &["al", "dx"]);
    op(m, 0xed, "in", &["eax", "dx"]);
    op(m, 0xee, "out", &["dx", "al"]);
    op(m, 0xef, "out", &["dx", "eax"]);

    op(m, 0xf4, "hlt", &[]);
    op(m, 0xf5, "cmc", &[]);
    unary_group(m, 0xf6, "Eb", "Ib");
    unary_group(m, 0xf7, "Ev", "Iz");
    op(m, 0xf8, "clc", &[]);
    op(m, 0xf9, "stc", &[]);
    op(m, 0xfa, "cli", &[]);
    op(m, 0xfb, "sti", &[]);
    op(m, 0xfc, "cld", &[]);
    op(m, 0xfd, "std", &[]);
    group(m, 0xfe, &[(Any(0), "inc", &["Eb"]), (Any(1), "dec", &["Eb"])]);
    group(
        m,
        0xff,
        &[
            (Any(0), "inc", &["Ev"]),
            (Any(1), "dec", &["Ev"]),
            (Any(2), "call", &["Ev"]),
            (Any(3), "call", &["Ep"]),
            (Any(4), "jmp", &["Ev"]),
            (Any(5), "jmp", &["Mp"]),
            (Any(6), "push", &["Ev"]),
        ],
    );
}
