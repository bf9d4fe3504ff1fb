use types::MajorMinor;

use super::*;
use crate::Sanitize;
use gpos_test_data::gdef as test_data;

#[test]
fn gdef_header() {
    let table = Gdef::read(test_data::GDEF_V1_2.into()).unwrap();
    assert_eq!(table.version(), MajorMinor::VERSION_1_2);
    assert_eq!(table.glyph_class_def_offset().offset().to_u32(), 0x0E);
    assert!(table.attach_list_offset().is_null());
    assert!(table.lig_caret_list_offset().is_null());
    assert_eq!(
        table
            .mark_glyph_sets_def_offset()
            .map(|off| off.offset().to_u32()),
        Some(0x3E)
    );
    // only present from version 1.3
    assert!(table.item_var_store_offset().is_none());
    table.sanitize().unwrap();
}

#[test]
fn glyph_classes() {
    let table = Gdef::read(test_data::GDEF_V1_2.into()).unwrap();
    assert!(table.has_glyph_classes());
    assert_eq!(table.glyph_class(GlyphId::new(1)), GlyphClassDef::Base);
    assert_eq!(table.glyph_class(GlyphId::new(11)), GlyphClassDef::Ligature);
    assert_eq!(table.glyph_class(GlyphId::new(29)), GlyphClassDef::Mark);
    assert_eq!(table.glyph_class(GlyphId::new(15)), GlyphClassDef::Unknown(0));
}

#[test]
fn glyph_props_include_attachment_class() {
    let table = Gdef::read(test_data::GDEF_V1_2.into()).unwrap();
    assert_eq!(table.glyph_props(GlyphId::new(5)), glyph_props::BASE_GLYPH);
    assert_eq!(table.glyph_props(GlyphId::new(10)), glyph_props::LIGATURE);
    assert_eq!(table.glyph_props(GlyphId::new(20)), glyph_props::MARK | 0x100);
    assert_eq!(table.glyph_props(GlyphId::new(27)), glyph_props::MARK | 0x200);
    assert_eq!(table.glyph_props(GlyphId::new(100)), 0);
    assert_eq!(table.mark_attachment_class(GlyphId::new(24)), 1);
    assert_eq!(table.mark_attachment_class(GlyphId::new(5)), 0);
}

#[test]
fn mark_glyph_sets() {
    let table = Gdef::read(test_data::GDEF_V1_2.into()).unwrap();
    let sets = table.mark_glyph_sets_def().unwrap().unwrap();
    assert_eq!(sets.format(), 1);
    assert_eq!(sets.mark_glyph_set_count(), 1);

    assert!(table.mark_set_covers(0, GlyphId::new(21)));
    assert!(table.mark_set_covers(0, GlyphId::new(25)));
    assert!(!table.mark_set_covers(0, GlyphId::new(22)));
    // out of range sets cover nothing
    assert!(!table.mark_set_covers(1, GlyphId::new(21)));
}

#[test]
fn version_1_0_has_no_mark_sets() {
    let table = Gdef::read(test_data::GDEF_V1_0_CLASSES_ONLY.into()).unwrap();
    assert_eq!(table.version(), MajorMinor::VERSION_1_0);
    assert!(table.mark_glyph_sets_def_offset().is_none());
    assert!(table.mark_glyph_sets_def().is_none());
    assert!(!table.mark_set_covers(0, GlyphId::new(3)));

    assert_eq!(table.glyph_class(GlyphId::new(3)), GlyphClassDef::Mark);
    assert_eq!(table.glyph_class(GlyphId::new(4)), GlyphClassDef::Component);
    // no mark attachment class definition
    assert_eq!(table.glyph_props(GlyphId::new(3)), glyph_props::MARK);
    // components are not matched by any ignore flag
    assert_eq!(table.glyph_props(GlyphId::new(4)), 0);
}

#[test]
fn rejects_major_version_2() {
    let mut data = test_data::GDEF_V1_0_CLASSES_ONLY.to_vec();
    data[1] = 2;
    assert!(matches!(
        Gdef::read(data.as_slice().into()),
        Err(ReadError::InvalidFormat(2))
    ));
}

#[test]
fn truncated_header() {
    let data = &test_data::GDEF_V1_2[..12];
    assert!(Gdef::read(data.into()).is_err());
}
