//! Two-byte (`0F`-escaped) opcode map.

use super::table::{cond_span, group, op, prefix_select, GroupKey::*, Map};

pub(super) fn fill(m: &mut Map) {
    op(m, 0x05, "syscall", &[]);
    op(m, 0x0b, "ud2", &[]);

    prefix_select(
        m,
        0x10,
        Some(("vmovups", &["Vps", "Wps"])),
        Some(("vmovupd", &["Vpd", "Wpd"])),
        Some(("vmovss", &["Vss", "Hss", "Wss"])),
        Some(("vmovsd", &["Vsd", "Hsd", "Wsd"])),
    );
    prefix_select(
        m,
        0x11,
        Some(("vmovups", &["Wps", "Vps"])),
        Some(("vmovupd", &["Wpd", "Vpd"])),
        Some(("vmovss", &["Wss", "Hss", "Vss"])),
        Some(("vmovsd", &["Wsd", "Hsd", "Vsd"])),
    );
    group(m, 0x1f, &[(Any(0), "nop", &["Ev"])]);

    op(m, 0x20, "mov", &["Ry", "Cy"]);
    op(m, 0x21, "mov", &["Ry", "Dy"]);
    op(m, 0x22, "mov", &["Cy", "Ry"]);
    op(m, 0x23, "mov", &["Dy", "Ry"]);

    prefix_select(
        m,
        0x28,
        Some(("vmovaps", &["Vps", "Wps"])),
        Some(("vmovapd", &["Vpd", "Wpd"])),
        None,
        None,
    );
    prefix_select(
        m,
        0x29,
        Some(("vmovaps", &["Wps", "Vps"])),
        Some(("vmovapd", &["Wpd", "Vpd"])),
        None,
        None,
    );
    prefix_select(
        m,
        0x2a,
        None,
        None,
        Some(("vcvtsi2ss", &["Vss", "Hss", "Ey"])),
        Some(("vcvtsi2sd", &["Vsd", "Hsd", "Ey"])),
    );
    prefix_select(
        m,
        0x2c,
        None,
        None,
        Some(("vcvttss2si", &["Gy", "Wss"])),
        Some(("vcvttsd2si", &["Gy", "Wsd"])),
    );
    prefix_select(
        m,
        0x2d,
        None,
        None,
        Some(("vcvtss2si", &["Gy", "Wss"])),
        Some(("vcvtsd2si", &["Gy", "Wsd"])),
    );
    prefix_select(
        m,
        0x2e,
        Some(("vucomiss", &["Vss", "Wss"])),
        Some(("vucomisd", &["Vsd", "Wsd"])),
        None,
        None,
    );
    prefix_select(
        m,
        0x2f,
        Some(("vcomiss", &["Vss", "Wss"])),
        Some(("vcomisd", &["Vsd", "Wsd"])),
        None,
        None,
    );

    cond_span(m, 0x40, "cmov", &["Gv", "Ev"]);

    prefix_select(
        m,
        0x50,
        Some(("vmovmskps", &["Gy", "Ups"])),
        Some(("vmovmskpd", &["Gy", "Upd"])),
        None,
        None,
    );
    prefix_select(
        m,
        0x51,
        Some(("vsqrtps", &["Vps", "Wps"])),
        Some(("vsqrtpd", &["Vpd", "Wpd"])),
        Some(("vsqrtss", &["Vss", "Hss", "Wss"])),
        Some(("vsqrtsd", &["Vsd", "Hsd", "Wsd"])),
    );
    prefix_select(
        m,
        0x54,
        Some(("vandps", &["Vps", "Hps", "Wps"])),
        Some(("vandpd", &["Vpd", "Hpd", "Wpd"])),
        None,
        None,
    );
    prefix_select(
        m,
        0x56,
        Some(("vorps", &["Vps", "Hps", "Wps"])),
        Some(("vorpd", &["Vpd", "Hpd", "Wpd"])),
        None,
        None,
    );
    prefix_select(
        m,
        0x57,
        Some(("vxorps", &["Vps", "Hps", "Wps"])),
        Some(("vxorpd", &["Vpd", "Hpd", "Wpd"])),
        None,
        None,
    );
    prefix_select(
        m,
        0x58,
        Some(("vaddps", &["Vps", "Hps", "Wps"])),
        Some(("vaddpd", &["Vpd", "Hpd", "Wpd"])),
        Some(("vaddss", &["Vss", "Hss", "Wss"])),
        Some(("vaddsd", &["Vsd", "Hsd", "Wsd"])),
    );
    prefix_select(
        m,
        0x59,
        Some(("vmulps", &["Vps", "Hps", "Wps"])),
        Some(("vmulpd", &["Vpd", "Hpd", "Wpd"])),
        Some(("vmulss", &["Vss", "Hss", "Wss"])),
        Some(("vmulsd", &["Vsd", "Hsd", "Wsd"])),
    );
    prefix_select(
        m,
        0x5c,
        Some(("vsubps", &["Vps", "Hps", "Wps"])),
        Some(("vsubpd", &["Vpd", "Hpd", "Wpd"])),
        Some(("vsubss", &["Vss", "Hss", "Wss"])),
        Some(("vsubsd", &["Vsd", "Hsd", "Wsd"])),
    );
    prefix_select(
        m,
        0x5e,
        Some(("vdivps", &["Vps", "Hps", "Wps"])),
        Some(("vdivpd", &["Vpd", "Hpd", "Wpd"])),
        Some(("vdivss", &["Vss", "Hss", "Wss"])),
        Some(("vdivsd", &["Vsd", "Hsd", "Wsd"])),
    );

    prefix_select(
        m,
        0x6e,
        None,
        Some(("vmovd/vmovq", &["Vy", "Ey"])),
        None,
        None,
    );
    prefix_select(
        m,
        0x6f,
        Some(("movq", &["Pq", "Qq"])),
        Some(("vmovdqa", &["Vx", "Wx"])),
        Some(("vmovdqu", &["Vx", "Wx"])),
        None,
    );
    prefix_select(
        m,
        0x7e,
        None,
        Some(("vmovd/vmovq", &["Ey", "Vy"])),
        Some(("vmovq", &["Vq", "Wq"])),
        None,
    );
    prefix_select(
        m,
        0x7f,
        Some(("movq", &["Qq", "Pq"])),
        Some(("vmovdqa", &["Wx", "Vx"])),
        Some(("vmovdqu", &["Wx", "Vx"])),
        None,
    );

    cond_span(m, 0x80, "jcc", &["Jz"]);
    cond_span(m, 0x90, "set", &["Eb"]);

    op(m, 0xa0, "push", &["fs"]);
    op(m, 0xa1, "pop", &["fs"]);
    op(m, 0xa2, "cpuid", &[]);
    op(m, 0xa3, "bt", &["Ev", "Gv"]);
    op(m, 0xa8, "push", &["gs"]);
    op(m, 0xa9, "pop", &["gs"]);
    op(m, 0xab, "bts", &["Ev", "Gv"]);
    op(m, 0xaf, "imul", &["Gv", "Ev"]);
    op(m, 0xb0, "cmpxchg", &["Eb", "Gb"]);
    op(m, 0xb1, "cmpxchg", &["Ev", "Gv"]);
    op(m, 0xb6, "movzx", &["Gv", "Eb"]);
    op(m, 0xb7, "movzx", &["Gv", "Ew"]);
    op(m, 0xbe, "movsx", &["Gv", "Eb"]);
    op(m, 0xbf, "movsx", &["Gv", "Ew"]);

    op(m, 0xc3, "movnti", &["My", "Gy"]);
    group(m, 0xc7, &[(Mem(1), "cmpxchg8b/cmpxchg16b", &["Mq"])]);

    prefix_select(
        m,
        0xd6,
        None,
        Some(("vmovq", &["Wq", "Vq"])),
        None,
        None,
    );
    prefix_select(
        m,
        0xd7,
        Some(("pmovmskb", &["Gd", "Nq"])),
        Some(("vpmovmskb", &["Gd", "Ux"])),
        None,
        None,
    );
}
