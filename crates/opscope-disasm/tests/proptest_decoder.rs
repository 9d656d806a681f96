//! Property tests for the x86-64 decoder.

use proptest::prelude::*;

use opscope_disasm::{create, DisasmOptions};

const GPR64: [&str; 16] = [
    "rax", "rcx", "rdx", "rbx", "rsp", "rbp", "rsi", "rdi", "r8", "r9", "r10", "r11", "r12",
    "r13", "r14", "r15",
];
const GPR32: [&str; 16] = [
    "eax", "ecx", "edx", "ebx", "esp", "ebp", "esi", "edi", "r8d", "r9d", "r10d", "r11d", "r12d",
    "r13d", "r14d", "r15d",
];

fn render(bytes: &[u8]) -> String {
    let out = create("x64", DisasmOptions::default())
        .unwrap()
        .disasm(bytes)
        .unwrap();
    assert_eq!(out.len(), 1);
    out[0].to_string()
}

/// A small pool of complete instruction encodings used to build streams.
fn instruction_pool() -> Vec<Vec<u8>> {
    vec![
        vec![0x90],
        vec![0x50],
        vec![0xc3],
        vec![0x48, 0x89, 0xd8],
        vec![0x4c, 0x8b, 0x7b, 0x08],
        vec![0x48, 0x83, 0xc0, 0x01],
        vec![0x48, 0x8b, 0x04, 0x8b],
        vec![0xe8, 0x00, 0x00, 0x00, 0x00],
        vec![0xf2, 0x0f, 0x10, 0xca],
        vec![0x49, 0xb8, 0xad, 0xde, 0xba, 0xab, 0xef, 0xbe, 0xad, 0xde],
    ]
}

proptest! {
    /// Register-direct mov names every register correctly under both
    /// REX.W states.
    #[test]
    fn register_direct_mov_names(src in 0u8..16, dst in 0u8..16, wide in any::<bool>()) {
        let rex = 0x40
            | ((wide as u8) << 3)
            | ((src >> 3) << 2)
            | (dst >> 3);
        let modrm = 0xc0 | ((src & 0x7) << 3) | (dst & 0x7);
        let names: &[&str; 16] = if wide { &GPR64 } else { &GPR32 };
        prop_assert_eq!(
            render(&[rex, 0x89, modrm]),
            format!("mov {}, {}", names[dst as usize], names[src as usize])
        );
    }

    /// disp8 always decodes as a signed byte.
    #[test]
    fn disp8_is_signed(disp in any::<u8>()) {
        let rendered = render(&[0x48, 0x8b, 0x43, disp]);
        let value = disp as i8 as i64;
        let expected = if value < 0 {
            format!("mov rax, [rbx, -{:#x}]", value.unsigned_abs())
        } else {
            format!("mov rax, [rbx, {value:#x}]")
        };
        prop_assert_eq!(rendered, expected);
    }

    /// A stream built from whole instructions decodes to exactly those
    /// instructions, with offsets at the encoding boundaries.
    #[test]
    fn streams_decode_at_boundaries(picks in proptest::collection::vec(0usize..10, 0..40)) {
        let pool = instruction_pool();
        let mut buf = Vec::new();
        let mut offsets = Vec::new();
        for &p in &picks {
            offsets.push(buf.len());
            buf.extend_from_slice(&pool[p]);
        }
        let out = create("x64", DisasmOptions::default())
            .unwrap()
            .disasm(&buf)
            .unwrap();
        prop_assert_eq!(out.len(), picks.len());
        let decoded: Vec<usize> = out.iter().map(|ins| ins.offset).collect();
        prop_assert_eq!(decoded, offsets);
    }

    /// Truncating a valid stream anywhere yields a prefix of its full
    /// decoding when truncation swallowing is on.
    #[test]
    fn truncation_swallow_yields_prefix(
        picks in proptest::collection::vec(0usize..10, 1..20),
        cut_seed in any::<prop::sample::Index>(),
    ) {
        let pool = instruction_pool();
        let buf: Vec<u8> = picks.iter().flat_map(|&p| pool[p].clone()).collect();
        let cut = cut_seed.index(buf.len() + 1);

        let disasm = create("x64", DisasmOptions { swallow: true }).unwrap();
        let full: Vec<String> = disasm
            .disasm(&buf)
            .unwrap()
            .iter()
            .map(|i| i.to_string())
            .collect();
        let partial: Vec<String> = disasm
            .disasm(&buf[..cut])
            .unwrap()
            .iter()
            .map(|i| i.to_string())
            .collect();
        prop_assert!(partial.len() <= full.len());
        prop_assert_eq!(&full[..partial.len()], &partial[..]);
    }
}
