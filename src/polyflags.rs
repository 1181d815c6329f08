use bitflags::bitflags;

bitflags! {
    /// Surface flags carried by the `Flags=` property of polygon blocks.
    /// Unknown bits are kept as-is, old maps set plenty of them.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct PolyFlags: u32 {
        const INVISIBLE          = 1 << 0;
        const MASKED             = 1 << 1;
        const TRANSLUCENT        = 1 << 2;
        const NOT_SOLID          = 1 << 3;
        const ENVIRONMENT        = 1 << 4;
        const SEMISOLID          = 1 << 5;
        const MODULATED          = 1 << 6;
        const FAKE_BACKDROP      = 1 << 7;
        const TWO_SIDED          = 1 << 8;
        const AUTO_U_PAN         = 1 << 9;
        const AUTO_V_PAN         = 1 << 10;
        const NO_SMOOTH          = 1 << 11;
        const BIG_WAVY           = 1 << 12;
        const SMALL_WAVY         = 1 << 13;
        const FLAT               = 1 << 14;
        const LOW_SHADOW_DETAIL  = 1 << 15;
        const NO_MERGE           = 1 << 16;
        const CLOUD_WAVY         = 1 << 17;
        const DIRTY_SHADOWS      = 1 << 18;
        const BRIGHT_CORNERS     = 1 << 19;
        const SPECIAL_LIT        = 1 << 20;
        const GOURAUD            = 1 << 21;
        const UNLIT              = 1 << 22;
        const HIGH_SHADOW_DETAIL = 1 << 23;
        const PORTAL             = 1 << 26;
        const MIRRORED           = 1 << 27;

        const _ = !0;
    }
}

#[test]
fn test_sheet_flags() {
    // a typical sheet brush polygon
    let flags = PolyFlags::from_bits_retain(264);
    assert!(flags.contains(PolyFlags::TWO_SIDED));
    assert!(flags.contains(PolyFlags::NOT_SOLID));
    assert!(!flags.contains(PolyFlags::INVISIBLE));
}
