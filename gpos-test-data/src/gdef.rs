//! GDEF test data

/// A version 1.2 GDEF table.
///
/// - glyphs 1..=9 are base glyphs
/// - glyphs 10..=12 are ligatures
/// - glyphs 20..=29 are marks; 20..=24 have attachment class 1 and
///   25..=29 have attachment class 2
/// - mark glyph set 0 contains glyphs 21 and 25
#[rustfmt::skip]
pub static GDEF_V1_2: &[u8] = &[
    0x00, 0x01, 0x00, 0x02, // version 1.2
    0x00, 0x0E,             // glyphClassDef offset
    0x00, 0x00,             // attachList offset
    0x00, 0x00,             // ligCaretList offset
    0x00, 0x24,             // markAttachClassDef offset
    0x00, 0x3E,             // markGlyphSetsDef offset
    // glyphClassDef: format 2
    0x00, 0x02, 0x00, 0x03,
    0x00, 0x01, 0x00, 0x09, 0x00, 0x01,
    0x00, 0x0A, 0x00, 0x0C, 0x00, 0x02,
    0x00, 0x14, 0x00, 0x1D, 0x00, 0x03,
    // markAttachClassDef: format 1
    0x00, 0x01, 0x00, 0x14, 0x00, 0x0A,
    0x00, 0x01, 0x00, 0x01, 0x00, 0x01, 0x00, 0x01, 0x00, 0x01,
    0x00, 0x02, 0x00, 0x02, 0x00, 0x02, 0x00, 0x02, 0x00, 0x02,
    // markGlyphSetsDef
    0x00, 0x01, 0x00, 0x01,
    0x00, 0x00, 0x00, 0x08,
    // coverage for set 0
    0x00, 0x01, 0x00, 0x02,
    0x00, 0x15, 0x00, 0x19,
];

/// A version 1.0 GDEF table with only a glyph class definition.
#[rustfmt::skip]
pub static GDEF_V1_0_CLASSES_ONLY: &[u8] = &[
    0x00, 0x01, 0x00, 0x00, // version 1.0
    0x00, 0x0C,             // glyphClassDef offset
    0x00, 0x00,
    0x00, 0x00,
    0x00, 0x00,
    // glyphClassDef: format 1, glyphs 1..=4 are base, base, mark, component
    0x00, 0x01, 0x00, 0x01, 0x00, 0x04,
    0x00, 0x01, 0x00, 0x01, 0x00, 0x03, 0x00, 0x04,
];
