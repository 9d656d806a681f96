//! Three-byte (`0F 38` and `0F 3A`) opcode maps.

use super::table::{prefix_select, Map};

pub(super) fn fill_38(m: &mut Map) {
    prefix_select(
        m,
        0xf0,
        Some(("movbe", &["Gy", "My"])),
        None,
        None,
        Some(("crc32", &["Gy", "Eb"])),
    );
    prefix_select(
        m,
        0xf1,
        Some(("movbe", &["My", "Gy"])),
        None,
        None,
        Some(("crc32", &["Gy", "Ey"])),
    );
}

pub(super) fn fill_3a(m: &mut Map) {
    prefix_select(
        m,
        0x0a,
        None,
        Some(("vroundss", &["Vss", "Hss", "Wss", "Ib"])),
        None,
        None,
    );
    prefix_select(
        m,
        0x0b,
        None,
        Some(("vroundsd", &["Vsd", "Hsd", "Wsd", "Ib"])),
        None,
        None,
    );
}
