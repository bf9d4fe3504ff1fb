use crate::tables::layout::DeltaFormat;

use super::*;
use crate::Sanitize;
use gpos_test_data::gpos::{self as test_data, TestLookup};
use pretty_assertions::assert_eq;

#[test]
fn singleposformat1() {
    // https://docs.microsoft.com/en-us/typography/opentype/spec/gpos#example-2-singleposformat1-subtable

    let table = SinglePosFormat1::read(test_data::SINGLEPOSFORMAT1.into()).unwrap();
    assert_eq!(table.value_format(), ValueFormat::Y_PLACEMENT);
    assert_eq!(table.value_record().y_placement(), Some(-80));
    let coverage = table.coverage().unwrap();
    assert_eq!(coverage.iter().count(), 10);
    assert_eq!(coverage.get(GlyphId::new(0x1B5)), Some(2));
}

#[test]
fn singleposformat2() {
    // https://docs.microsoft.com/en-us/typography/opentype/spec/gpos#example-3-singleposformat2-subtable
    let table = SinglePosFormat2::read(test_data::SINGLEPOSFORMAT2.into()).unwrap();
    assert_eq!(
        table.value_format(),
        ValueFormat::X_PLACEMENT | ValueFormat::X_ADVANCE
    );
    assert_eq!(table.value_count(), 3);
    let records = table.value_records().unwrap();
    assert_eq!(records.get(0).unwrap().x_placement(), Some(50));
    assert_eq!(records.get(1).unwrap().x_advance(), Some(25));
    assert_eq!(records.get(2).unwrap().x_placement(), Some(10));
    assert!(records.get(3).is_err());
}

#[test]
fn single_pos_value_record_by_coverage_index() {
    let table = SinglePos::read(test_data::SINGLEPOSFORMAT2.into()).unwrap();
    assert_eq!(table.value_record(1).unwrap().x_placement(), Some(25));
    assert_eq!(table.value_record(3), Err(ReadError::OutOfBounds));

    // format 1 shares one record between every covered glyph
    let table = SinglePos::read(test_data::SINGLEPOSFORMAT1.into()).unwrap();
    assert_eq!(table.value_record(9).unwrap().y_placement(), Some(-80));
}

#[test]
fn pairposformat1() {
    // https://docs.microsoft.com/en-us/typography/opentype/spec/gpos#example-4-pairposformat1-subtable

    let table = PairPosFormat1::read(test_data::PAIRPOSFORMAT1.into()).unwrap();
    assert_eq!(table.value_format1(), ValueFormat::X_ADVANCE);
    assert_eq!(table.value_format2(), ValueFormat::X_PLACEMENT);
    assert_eq!(table.pair_set_count(), 2);

    let set1 = table.pair_sets().get(0).unwrap();
    let set2 = table.pair_sets().get(1).unwrap();
    assert_eq!(set1.pair_value_records().unwrap().iter().count(), 1);
    assert_eq!(set2.pair_value_records().unwrap().iter().count(), 1);

    let rec1 = set1.pair_value_records().unwrap().get(0).unwrap();
    let rec2 = set2.pair_value_records().unwrap().get(0).unwrap();

    assert_eq!(rec1.second_glyph(), GlyphId16::new(0x59));
    assert_eq!(rec1.value_record1().x_advance(), Some(-30));
    assert!(rec1.value_record1().x_placement().is_none());
    assert_eq!(rec1.value_record2().x_placement(), Some(-20));

    assert_eq!(rec2.second_glyph(), GlyphId16::new(0x59));
    assert_eq!(rec2.value_record1().x_advance(), Some(-40));
    assert_eq!(rec2.value_record2().x_placement(), Some(-25));
}

#[test]
fn pair_set_find() {
    let table = PairPosFormat1::read(test_data::PAIRPOSFORMAT1.into()).unwrap();
    let set = table.pair_sets().get(1).unwrap();
    let record = set.find(GlyphId::new(0x59)).unwrap().unwrap();
    assert_eq!(record.value_record1().x_advance(), Some(-40));
    assert!(set.find(GlyphId::new(0x58)).is_none());
    assert!(set.find(GlyphId::new(0x5A)).is_none());
}

#[test]
fn pairposformat2() {
    // https://docs.microsoft.com/en-us/typography/opentype/spec/gpos#example-5-pairposformat2-subtable

    let table = PairPosFormat2::read(test_data::PAIRPOSFORMAT2.into()).unwrap();
    assert_eq!(table.value_format1().record_byte_len(), 2);
    assert_eq!(table.value_format2().record_byte_len(), 0);
    assert_eq!(table.class1_count(), 2);
    assert_eq!(table.class2_count(), 2);

    let class2 = table.class_def2().unwrap();
    match class2 {
        ClassDef::Format1(_) => panic!("expected format2"),
        ClassDef::Format2(cls) => {
            assert_eq!(
                cls.class_range_records()[0].start_glyph_id(),
                GlyphId16::new(0x6A)
            );
        }
    }

    let class1 = table.class_def1().unwrap().get(GlyphId::new(0x49));
    let class2 = table.class_def2().unwrap().get(GlyphId::new(0x6B));
    let [first, second] = table.values(class1, class2).unwrap();
    assert_eq!(first.x_advance(), Some(-50));
    assert!(second.format().is_empty());

    let [first, _] = table.values(0, 1).unwrap();
    assert_eq!(first.x_advance(), Some(0));
    assert!(table.values(2, 0).is_err());
    assert!(table.values(0, 2).is_err());
}

#[test]
fn cursiveposformat1() {
    // https://docs.microsoft.com/en-us/typography/opentype/spec/gpos#example-6-cursiveposformat1-subtable

    let table = CursivePosFormat1::read(test_data::CURSIVEPOSFORMAT1.into()).unwrap();
    assert_eq!(table.entry_exit_count(), 2);
    assert_eq!(table.entry_exit_record().len(), 2);

    let record2 = &table.entry_exit_record()[1];
    let entry2: AnchorFormat1 = record2
        .entry_anchor_offset()
        .resolve(table.offset_data())
        .unwrap()
        .unwrap();
    assert_eq!(entry2.x_coordinate(), 1500);
    assert_eq!(entry2.y_coordinate(), 44);

    let exit2 = record2
        .exit_anchor(table.offset_data())
        .unwrap()
        .unwrap();
    assert_eq!((exit2.x_coordinate(), exit2.y_coordinate()), (0, -20));
}

#[test]
fn markbaseposformat1() {
    // https://docs.microsoft.com/en-us/typography/opentype/spec/gpos#example-7-markbaseposformat1-subtable
    let table = MarkBasePosFormat1::read(test_data::MARKBASEPOSFORMAT1.into()).unwrap();
    assert_eq!(table.mark_class_count(), 2);

    let mark_array = table.mark_array().unwrap();
    let (class, anchor) = mark_array.mark(1).unwrap();
    assert_eq!(class, 1);
    assert_eq!((anchor.x_coordinate(), anchor.y_coordinate()), (261, 88));

    let base_array = table.base_array().unwrap();
    assert_eq!(base_array.row_count(), 1);
    assert_eq!(base_array.class_count(), 2);
    let anchor1 = base_array.anchor(0, 1).unwrap().unwrap();
    assert_eq!(anchor1.x_coordinate(), 830);
    assert!(base_array.anchor(0, 2).is_none());
    assert!(base_array.anchor(1, 0).is_none());
}

#[test]
fn markligposformat1() {
    // https://docs.microsoft.com/en-us/typography/opentype/spec/gpos#example-8-markligposformat1-subtable

    let table = MarkLigPosFormat1::read(test_data::MARKLIGPOSFORMAT1.into()).unwrap();
    let lig_array = table.ligature_array().unwrap();
    assert_eq!(lig_array.ligature_count(), 1);
    let lig_attach = lig_array.ligature_attaches().get(0).unwrap();
    assert_eq!(lig_attach.row_count(), 3);

    let comp0 = lig_attach.anchor(0, 0).unwrap().unwrap();
    assert_eq!((comp0.x_coordinate(), comp0.y_coordinate()), (221, 301));
    assert!(lig_attach.anchor(0, 1).is_none());
    let comp1 = lig_attach.anchor(1, 1).unwrap().unwrap();
    assert_eq!(comp1.x_coordinate(), 628);

    let comp2 = lig_attach.row(2).unwrap();
    assert!(comp2.iter().all(|anchor| anchor.is_none()));
}

#[test]
fn markmarkposformat1() {
    // https://docs.microsoft.com/en-us/typography/opentype/spec/gpos#example-9-markmarkposformat1-subtable

    let table = MarkMarkPosFormat1::read(test_data::MARKMARKPOSFORMAT1.into()).unwrap();
    assert_eq!(table.mark_class_count(), 1);
    let (class, mark1) = table.mark1_array().unwrap().mark(0).unwrap();
    assert_eq!(class, 0);
    assert_eq!((mark1.x_coordinate(), mark1.y_coordinate()), (189, -103));

    let mark2array = table.mark2_array().unwrap();
    assert_eq!(mark2array.row_count(), 1);
    let anchor = mark2array.anchor(0, 0).unwrap().unwrap();
    assert_eq!(anchor.x_coordinate(), 221);
    assert_eq!(anchor.y_coordinate(), 301);
}

#[test]
fn valueformattable() {
    // https://docs.microsoft.com/en-us/typography/opentype/spec/gpos#example-14-valueformat-table-and-valuerecord

    let table = SinglePosFormat1::read(test_data::VALUEFORMATTABLE.into()).unwrap();
    assert_eq!(
        table.value_format(),
        ValueFormat::X_PLACEMENT
            | ValueFormat::Y_ADVANCE
            | ValueFormat::X_PLACEMENT_DEVICE
            | ValueFormat::Y_ADVANCE_DEVICE
    );
    let record = table.value_record();
    assert_eq!(record.y_advance(), Some(210));
    assert!(record.x_placement_device(table.offset_data()).is_none());
    let DeviceOrVariationIndex::Device(device) = record
        .y_advance_device(table.offset_data())
        .unwrap()
        .unwrap()
    else {
        panic!("not a device");
    };

    assert_eq!((device.start_size(), device.end_size()), (11, 15));
    assert_eq!(device.delta_format(), DeltaFormat::Local2BitDeltas);
    assert_eq!(device.delta_value(), [0x5540]);
    assert_eq!(device.delta_pixels(12), 1);
}

#[test]
fn anchorformat1() {
    // https://docs.microsoft.com/en-us/typography/opentype/spec/gpos#example-15-anchorformat1-table

    let table = AnchorFormat1::read(test_data::ANCHORFORMAT1.into()).unwrap();
    assert_eq!(table.x_coordinate(), 189);
    assert_eq!(table.y_coordinate(), -103);
}

#[test]
fn anchorformat2() {
    // https://docs.microsoft.com/en-us/typography/opentype/spec/gpos#example-16-anchorformat2-table

    let table = AnchorFormat2::read(test_data::ANCHORFORMAT2.into()).unwrap();
    assert_eq!(table.x_coordinate(), 322);
    assert_eq!(table.anchor_point(), 13);
}

#[test]
fn anchorformat3() {
    // https://docs.microsoft.com/en-us/typography/opentype/spec/gpos#example-17-anchorformat3-table

    let table = AnchorFormat3::read(test_data::ANCHORFORMAT3.into()).unwrap();
    assert_eq!(table.x_coordinate(), 279);
    assert_eq!(table.y_coordinate(), 1301);

    let x_dev = table.x_device().unwrap().unwrap();
    let y_dev = table.y_device().unwrap().unwrap();

    let (DeviceOrVariationIndex::Device(x_dev), DeviceOrVariationIndex::Device(y_dev)) =
        (x_dev, y_dev)
    else {
        panic!("missing device tables");
    };

    assert_eq!(x_dev.delta_format(), DeltaFormat::Local4BitDeltas);
    assert_eq!(x_dev.delta_value(), [0x1111, 0x2200]);

    assert_eq!(y_dev.delta_format(), DeltaFormat::Local4BitDeltas);
    assert_eq!(y_dev.delta_value(), [0x1111, 0x2200]);
}

#[test]
fn anchor_table_dispatches_on_format() {
    let anchor = AnchorTable::read(test_data::ANCHORFORMAT2.into()).unwrap();
    assert_eq!(anchor.anchor_format(), 2);
    assert_eq!(anchor.y_coordinate(), 350);
    assert!(anchor.x_device().is_none());

    let unknown = [0x00, 0x04, 0x00, 0x01, 0x00, 0x01];
    assert!(matches!(
        AnchorTable::read(FontData::new(&unknown)),
        Err(ReadError::InvalidFormat(4))
    ));
}

#[test]
fn gpos_header() {
    let data = test_data::gpos_with_lookups(&[TestLookup::new(
        1,
        [test_data::SINGLEPOSFORMAT1.to_vec()],
    )]);
    let gpos = Gpos::read(FontData::new(&data)).unwrap();
    assert_eq!(gpos.version(), MajorMinor::VERSION_1_0);
    assert!(gpos.feature_variations_offset().is_none());
    let lookup_list = gpos.lookup_list().unwrap();
    assert_eq!(lookup_list.lookup_count(), 1);

    let lookup = lookup_list.lookups().get(0).unwrap();
    assert_eq!(lookup.lookup_type(), 1);
    let PositionSubtables::Single(subtables) = lookup.subtables().unwrap() else {
        panic!("wrong lookup type");
    };
    assert_eq!(subtables.len(), 1);
    assert!(!subtables.is_extension());
    assert_eq!(
        subtables.get(0).unwrap().value_record(0).unwrap().y_placement(),
        Some(-80)
    );
}

#[test]
fn gpos_rejects_unknown_major_version() {
    let data = [0x00, 0x02, 0x00, 0x00, 0x00, 0x0A, 0x00, 0x0A, 0x00, 0x0A];
    assert!(matches!(
        Gpos::read(FontData::new(&data)),
        Err(ReadError::InvalidFormat(2))
    ));
}

#[test]
fn lookup_with_mark_filtering_set() {
    let data = test_data::gpos_with_lookups(&[TestLookup::new(
        1,
        [test_data::SINGLEPOSFORMAT1.to_vec()],
    )
    .with_flag(LookupFlag::IGNORE_LIGATURES.to_bits())
    .with_mark_filtering_set(3)]);
    let gpos = Gpos::read(FontData::new(&data)).unwrap();
    let lookup = gpos.lookup_list().unwrap().lookups().get(0).unwrap();
    assert_eq!(lookup.mark_filtering_set(), Some(3));
    assert_eq!(lookup.lookup_props(), 0x0014 | (3 << 16));
}

#[test]
fn extension_lookup_dispatches_to_wrapped_type() {
    let data = test_data::gpos_with_lookups(&[TestLookup::new(
        EXTENSION_LOOKUP_TYPE,
        [test_data::extension(2, test_data::PAIRPOSFORMAT1)],
    )]);
    let gpos = Gpos::read(FontData::new(&data)).unwrap();
    let lookup = gpos.lookup_list().unwrap().lookups().get(0).unwrap();
    assert_eq!(lookup.lookup_type(), EXTENSION_LOOKUP_TYPE);
    assert_eq!(lookup.effective_lookup_type().unwrap(), 2);

    let PositionSubtables::Pair(subtables) = lookup.subtables().unwrap() else {
        panic!("wrong lookup type");
    };
    assert!(subtables.is_extension());
    let PairPos::Format1(pair) = subtables.get(0).unwrap() else {
        panic!("wrong format");
    };
    assert_eq!(pair.pair_set_count(), 2);
    gpos.sanitize_lookup(0).unwrap();
}

#[test]
fn nested_extension_is_rejected() {
    let inner = test_data::extension(1, test_data::SINGLEPOSFORMAT1);
    let data = test_data::gpos_with_lookups(&[TestLookup::new(
        EXTENSION_LOOKUP_TYPE,
        [test_data::extension(EXTENSION_LOOKUP_TYPE, &inner)],
    )]);
    let gpos = Gpos::read(FontData::new(&data)).unwrap();
    let lookup = gpos.lookup_list().unwrap().lookups().get(0).unwrap();
    assert!(lookup.subtables().is_err());
    assert!(gpos.sanitize_lookup(0).is_err());
}

#[test]
fn mixed_extension_types_fail_sanitize() {
    let data = test_data::gpos_with_lookups(&[TestLookup::new(
        EXTENSION_LOOKUP_TYPE,
        [
            test_data::extension(1, test_data::SINGLEPOSFORMAT1),
            test_data::extension(2, test_data::PAIRPOSFORMAT1),
        ],
    )]);
    let gpos = Gpos::read(FontData::new(&data)).unwrap();
    assert!(gpos.sanitize_lookup(0).is_err());
}

#[test]
fn truncated_lookup_fails_sanitize() {
    let mut subtable = test_data::MARKBASEPOSFORMAT1.to_vec();
    subtable.truncate(subtable.len() - 4);
    let data = test_data::gpos_with_lookups(&[
        TestLookup::new(1, [test_data::SINGLEPOSFORMAT1.to_vec()]),
        TestLookup::new(4, [subtable]),
    ]);
    let gpos = Gpos::read(FontData::new(&data)).unwrap();
    assert!(gpos.sanitize_lookup(0).is_ok());
    assert!(gpos.sanitize_lookup(1).is_err());
    assert!(gpos.sanitize_lookup(2).is_err());
    assert!(gpos.sanitize().is_err());
}

#[test]
fn unknown_lookup_type_has_no_subtables() {
    let data = test_data::gpos_with_lookups(&[TestLookup::new(
        12,
        [test_data::SINGLEPOSFORMAT1.to_vec()],
    )]);
    let gpos = Gpos::read(FontData::new(&data)).unwrap();
    let lookup = gpos.lookup_list().unwrap().lookups().get(0).unwrap();
    assert!(matches!(
        lookup.subtables(),
        Err(ReadError::InvalidFormat(12))
    ));
}
