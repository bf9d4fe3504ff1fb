//! Positioning whole buffers through the public driver.

use super::*;
use crate::{
    buffer::{glyph_props, scratch_flags, AttachType, Direction, GeneralCategory, GlyphInfo},
    plan::LookupMap,
    test_support::MockFont,
    MAX_NESTING_LEVEL,
};
use gpos_test_data::{
    bebuffer::BeBuffer,
    gdef::GDEF_V1_2,
    gpos::{self as test_data, extension, gpos_with_lookups, TestLookup},
};
use pretty_assertions::assert_eq;
use read_gpos::{types::GlyphId, ReadError};

const SINGLE: u16 = 1;
const PAIR: u16 = 2;
const CURSIVE: u16 = 3;
const MARK_TO_BASE: u16 = 4;
const MARK_TO_LIG: u16 = 5;
const MARK_TO_MARK: u16 = 6;
const CONTEXT: u16 = 7;
const CHAIN_CONTEXT: u16 = 8;
const EXTENSION: u16 = 9;

fn base(glyph: u32, cluster: u32) -> GlyphInfo {
    GlyphInfo::new(glyph, cluster)
}

fn mark(glyph: u32, cluster: u32) -> GlyphInfo {
    let mut info = GlyphInfo::new(glyph, cluster);
    info.set_general_category(GeneralCategory::NonspacingMark);
    info
}

fn buffer(infos: &[GlyphInfo]) -> Buffer {
    let mut buffer = Buffer::default();
    for info in infos {
        buffer.push(*info);
    }
    buffer
}

/// Position `infos` with every lookup in `lookups`, in order.
fn run(lookups: &[TestLookup], font: &MockFont, infos: &[GlyphInfo]) -> Buffer {
    run_with(lookups, font, None, infos, |_| ())
}

fn run_with(
    lookups: &[TestLookup],
    font: &MockFont,
    gdef: Option<&Gdef>,
    infos: &[GlyphInfo],
    adjust_plan: impl FnOnce(&mut PositionPlan),
) -> Buffer {
    let _ = env_logger::builder().is_test(true).try_init();
    let data = gpos_with_lookups(lookups);
    let table = GposTable::new(&data).unwrap();
    let mut plan = PositionPlan::new(Direction::LeftToRight, 0..lookups.len() as u16);
    adjust_plan(&mut plan);
    let mut buffer = buffer(infos);
    position(&plan, font, Some(&table), gdef, &mut buffer);
    buffer
}

fn advances(buffer: &Buffer) -> Vec<i32> {
    buffer.pos.iter().map(|pos| pos.x_advance).collect()
}

fn offsets(buffer: &Buffer) -> Vec<(i32, i32)> {
    buffer
        .pos
        .iter()
        .map(|pos| (pos.x_offset, pos.y_offset))
        .collect()
}

/// A format 1 single positioning subtable adding `x_advance` to `glyphs`.
fn single_x_advance(glyphs: &[u16], x_advance: i16) -> Vec<u8> {
    BeBuffer::new()
        .push(1u16)
        .push(8u16) // coverage offset
        .push(0x0004u16) // x advance
        .push(x_advance)
        .extend([1u16, glyphs.len() as u16])
        .extend(glyphs.iter().copied())
        .into_vec()
}

fn single_x_placement(glyphs: &[u16], x_placement: i16) -> Vec<u8> {
    BeBuffer::new()
        .push(1u16)
        .push(8u16)
        .push(0x0001u16) // x placement
        .push(x_placement)
        .extend([1u16, glyphs.len() as u16])
        .extend(glyphs.iter().copied())
        .into_vec()
}

/// A format 3 context subtable matching one glyph and applying `lookup`.
fn context_applying(glyph: u16, lookup: u16) -> Vec<u8> {
    BeBuffer::new()
        .push(3u16)
        .push(1u16) // glyph count
        .push(1u16) // lookup count
        .push(12u16) // coverage offset
        .extend([0u16, lookup])
        .extend([1u16, 1, glyph])
        .into_vec()
}

/// A format 3 chained context subtable: one glyph each of backtrack, input
/// and lookahead, applying `lookup` to the input glyph.
fn chain_context_applying(backtrack: u16, input: u16, lookahead: u16, lookup: u16) -> Vec<u8> {
    BeBuffer::new()
        .push(3u16)
        .extend([1u16, 20]) // backtrack coverage
        .extend([1u16, 26]) // input coverage
        .extend([1u16, 32]) // lookahead coverage
        .push(1u16)
        .extend([0u16, lookup])
        .extend([1u16, 1, backtrack])
        .extend([1u16, 1, input])
        .extend([1u16, 1, lookahead])
        .into_vec()
}

#[test]
fn default_advances_without_gpos() {
    let font = MockFont {
        advances: [(GlyphId::new(2), 350)].into_iter().collect(),
        ..Default::default()
    };
    let mut buffer = buffer(&[base(1, 0), base(2, 1)]);
    position(&PositionPlan::default(), &font, None, None, &mut buffer);
    assert_eq!(advances(&buffer), [600, 350]);

    let plan = PositionPlan {
        direction: Direction::TopToBottom,
        ..Default::default()
    };
    position(&plan, &font, None, None, &mut buffer);
    assert_eq!(advances(&buffer), [0, 0]);
    assert_eq!(buffer.pos[0].y_advance, -1000);
}

#[test]
fn single_pos() {
    let lookups = [TestLookup::new(
        SINGLE,
        [test_data::SINGLEPOSFORMAT1.to_vec()],
    )];
    let buffer = run(
        &lookups,
        &MockFont::default(),
        &[base(0x1B3, 0), base(0x1B2, 1), base(0x1BC, 2)],
    );
    assert_eq!(offsets(&buffer), [(0, -80), (0, 0), (0, -80)]);
}

#[test]
fn pair_pos_glyph_pairs() {
    let lookups = [TestLookup::new(PAIR, [test_data::PAIRPOSFORMAT1.to_vec()])];
    let buffer = run(
        &lookups,
        &MockFont::default(),
        &[base(0x2D, 0), base(0x59, 1), base(0x31, 2), base(0x59, 3)],
    );
    assert_eq!(advances(&buffer), [570, 600, 560, 600]);
    assert_eq!(offsets(&buffer)[1], (-20, 0));
    assert_eq!(offsets(&buffer)[3], (-25, 0));
    assert!(buffer.info[1].is_unsafe_to_break());
    assert!(!buffer.info[2].is_unsafe_to_break());
}

#[test]
fn pair_pos_class_pairs() {
    let lookups = [TestLookup::new(PAIR, [test_data::PAIRPOSFORMAT2.to_vec()])];
    let buffer = run(
        &lookups,
        &MockFont::default(),
        &[base(0x46, 0), base(0x6A, 1), base(0x4F, 2), base(0x6A, 3)],
    );
    // 0x4F is not covered
    assert_eq!(advances(&buffer), [550, 600, 600, 600]);
}

#[test]
fn pair_pos_skips_ignored_marks() {
    let font = MockFont {
        advances: [(GlyphId::new(0x300), 0)].into_iter().collect(),
        ..Default::default()
    };
    let infos = [base(0x2D, 0), mark(0x300, 0), base(0x59, 1)];
    let plain = [TestLookup::new(PAIR, [test_data::PAIRPOSFORMAT1.to_vec()])];
    assert_eq!(advances(&run(&plain, &font, &infos)), [600, 0, 600]);

    let ignoring = [plain[0].clone().with_flag(0x0008)];
    assert_eq!(advances(&run(&ignoring, &font, &infos)), [570, 0, 600]);
}

#[test]
fn pair_pos_through_joiners() {
    let mut zwj = base(0x3, 0);
    zwj.set_zwj();
    let infos = [base(0x2D, 0), zwj, base(0x59, 1)];
    let lookups = [TestLookup::new(PAIR, [test_data::PAIRPOSFORMAT1.to_vec()])];
    let font = MockFont::default();

    let buffer = run(&lookups, &font, &infos);
    assert_eq!(advances(&buffer)[0], 570);

    let buffer = run_with(&lookups, &font, None, &infos, |plan| {
        plan.lookups[0].auto_zwj = false;
    });
    assert_eq!(advances(&buffer)[0], 600);
}

#[test]
fn lookup_mask() {
    let lookups = [TestLookup::new(
        SINGLE,
        [single_x_advance(&[1], 10)],
    )];
    let mut infos = [base(1, 0), base(1, 1)];
    infos[1].mask = 0x1;
    let buffer = run_with(&lookups, &MockFont::default(), None, &infos, |plan| {
        plan.lookups[0] = LookupMap::new(0).with_mask(0x2);
    });
    assert_eq!(advances(&buffer), [610, 600]);
}

#[test]
fn mark_filtering_set() {
    let gdef = load_gdef(GDEF_V1_2).unwrap();
    let lookups = [TestLookup::new(SINGLE, [single_x_placement(&[21, 22], 5)])
        .with_mark_filtering_set(0)];
    let buffer = run_with(
        &lookups,
        &MockFont::default(),
        Some(&gdef),
        &[base(21, 0), base(22, 1)],
        |plan| plan.zero_marks = ZeroWidthMarks::None,
    );
    assert!(buffer.info[0].is_mark());
    assert_eq!(offsets(&buffer), [(5, 0), (0, 0)]);
}

#[test]
fn gdef_marks_are_zeroed_late() {
    let gdef = load_gdef(GDEF_V1_2).unwrap();
    let infos = [base(1, 0), base(20, 0)];
    let lookups = [TestLookup::new(SINGLE, [single_x_advance(&[20], 10)])];
    let font = MockFont::default();

    let buffer = run_with(&lookups, &font, Some(&gdef), &infos, |_| ());
    assert_eq!(advances(&buffer), [600, 0]);

    // zeroed early, the lookup still adds to the mark's advance
    let buffer = run_with(&lookups, &font, Some(&gdef), &infos, |plan| {
        plan.zero_marks = ZeroWidthMarks::ByGdefEarly;
    });
    assert_eq!(advances(&buffer), [600, 10]);
    assert_eq!(offsets(&buffer), [(0, 0), (0, 0)]);
}

#[test]
fn cursive_ltr() {
    let lookups = [TestLookup::new(
        CURSIVE,
        [test_data::CURSIVEPOSFORMAT1.to_vec()],
    )];
    let buffer = run(
        &lookups,
        &MockFont::default(),
        &[base(0x203, 0), base(0x206, 1)],
    );
    // the exit of the first glyph meets the entry of the second
    assert_eq!(advances(&buffer), [0, -900]);
    assert_eq!(offsets(&buffer), [(0, 0), (-1500, -64)]);
    assert!(buffer.info[1].is_unsafe_to_break());
}

#[test]
fn cursive_right_to_left_flag() {
    let lookups = [TestLookup::new(
        CURSIVE,
        [test_data::CURSIVEPOSFORMAT1.to_vec()],
    )
    .with_flag(0x0001)];
    let buffer = run(
        &lookups,
        &MockFont::default(),
        &[base(0x203, 0), base(0x206, 1)],
    );
    // the last glyph is the root
    assert_eq!(offsets(&buffer), [(0, 64), (-1500, 0)]);
}

#[test]
fn cursive_never_mutually_attached() {
    let plain = TestLookup::new(CURSIVE, [test_data::CURSIVEPOSFORMAT1.to_vec()]);
    let rtl = plain.clone().with_flag(0x0001);
    let buffer = run(
        &[plain, rtl],
        &MockFont::default(),
        &[base(0x203, 0), base(0x206, 1)],
    );
    // the second lookup reverses the attachment made by the first
    assert_eq!(offsets(&buffer), [(0, 64), (-1500, 0)]);
}

#[test]
fn cursive_chain_of_three() {
    let lookups = [TestLookup::new(
        CURSIVE,
        [test_data::CURSIVEPOSFORMAT1.to_vec()],
    )];
    let buffer = run(
        &lookups,
        &MockFont::default(),
        &[base(0x203, 0), base(0x206, 1), base(0x203, 2)],
    );
    // each glyph hangs off the previous one
    assert_eq!(buffer.pos[1].y_offset, -64);
    assert_eq!(buffer.pos[2].y_offset, -128);
}

#[test]
fn mark_to_base() {
    let font = MockFont {
        advances: [(GlyphId::new(0x333), 300), (GlyphId::new(0x33F), 300)]
            .into_iter()
            .collect(),
        ..Default::default()
    };
    let lookups = [TestLookup::new(
        MARK_TO_BASE,
        [test_data::MARKBASEPOSFORMAT1.to_vec()],
    )];
    let buffer = run(&lookups, &font, &[base(0x190, 0), mark(0x333, 0)]);
    // (295 - 346, 1145 + 98), moved back over the base's advance
    assert_eq!(offsets(&buffer), [(0, 0), (-51 - 600, 1243)]);
    assert_eq!(advances(&buffer), [600, 0]);

    let buffer = run(
        &lookups,
        &font,
        &[base(0x190, 0), mark(0x333, 0), mark(0x33F, 0)],
    );
    // the second mark skips over the first to reach the base
    assert_eq!(offsets(&buffer)[2], (830 - 261 - 600, 0));
}

#[test]
fn mark_to_base_records_attachment() {
    let font = MockFont::default();
    let data = gpos_with_lookups(&[TestLookup::new(
        MARK_TO_BASE,
        [test_data::MARKBASEPOSFORMAT1.to_vec()],
    )]);
    let table = GposTable::new(&data).unwrap();
    let plan = PositionPlan::new(Direction::LeftToRight, [0]);
    let mut buffer = buffer(&[base(0x190, 0), mark(0x333, 0)]);
    set_glyph_props_from_gdef(None, &mut buffer);
    position_start(&mut buffer);
    apply_lookups(&plan, &font, &table, None, &mut buffer);

    let mark = buffer.pos[1];
    assert_eq!((mark.x_offset, mark.y_offset), (295 - 346, 1145 + 98));
    assert_eq!(mark.attach_chain, -1);
    assert_eq!(mark.attach_type, AttachType::Mark);
    assert_ne!(buffer.scratch_flags & scratch_flags::HAS_GPOS_ATTACHMENT, 0);
}

#[test]
fn mark_to_base_needs_a_base() {
    let lookups = [TestLookup::new(
        MARK_TO_BASE,
        [test_data::MARKBASEPOSFORMAT1.to_vec()],
    )];
    let font = MockFont::default();
    let buffer = run(&lookups, &font, &[mark(0x333, 0)]);
    assert_eq!(offsets(&buffer), [(0, 0)]);
    // 0x191 is not in the base coverage
    let buffer = run(&lookups, &font, &[base(0x191, 0), mark(0x333, 0)]);
    assert_eq!(offsets(&buffer), [(0, 0), (0, 0)]);
}

#[test]
fn mark_to_ligature_components() {
    let font = MockFont {
        advances: [(GlyphId::new(0x333), 0), (GlyphId::new(0x33F), 0)]
            .into_iter()
            .collect(),
        ..Default::default()
    };
    let lookups = [TestLookup::new(
        MARK_TO_LIG,
        [test_data::MARKLIGPOSFORMAT1.to_vec()],
    )];
    let mut lig = base(0x234, 0);
    lig.set_lig_props_for_ligature(1, 3);
    let mut first = mark(0x333, 0);
    first.set_lig_props_for_mark(1, 1);
    let mut second = mark(0x33F, 0);
    second.set_lig_props_for_mark(1, 2);

    let buffer = run(&lookups, &font, &[lig, first, second]);
    assert_eq!(
        offsets(&buffer),
        [(0, 0), (221 - 346 - 600, 301 + 98), (628 - 261 - 600, 301 - 88)]
    );

    // a mark from elsewhere goes on the last component, which has no anchor
    let stranger = mark(0x333, 0);
    let buffer = run(&lookups, &font, &[lig, stranger]);
    assert_eq!(offsets(&buffer), [(0, 0), (0, 0)]);
}

/// One mark class; ligature 0x234 has three components and only the last
/// one has an anchor.
fn lig_with_anchor_on_last_component() -> Vec<u8> {
    BeBuffer::new()
        .push(1u16)
        .extend([12u16, 18]) // mark and ligature coverage
        .push(1u16) // mark class count
        .extend([24u16, 36]) // mark and ligature array
        .extend([1u16, 1, 0x333])
        .extend([1u16, 1, 0x234])
        // mark array
        .extend([1u16, 0, 6])
        .extend([1u16, 100, 50])
        // ligature array
        .extend([1u16, 4])
        .extend([3u16, 0, 0, 8])
        .extend([1u16, 500, 700])
        .into_vec()
}

#[test]
fn mark_to_ligature_defaults_to_last_component() {
    let font = MockFont {
        advances: [(GlyphId::new(0x333), 0)].into_iter().collect(),
        ..Default::default()
    };
    let lookups = [TestLookup::new(
        MARK_TO_LIG,
        [lig_with_anchor_on_last_component()],
    )];
    let mut lig = base(0x234, 0);
    lig.set_lig_props_for_ligature(1, 3);
    let attached = (500 - 100 - 600, 700 - 50);

    let mut foreign = mark(0x333, 0);
    foreign.set_lig_props_for_mark(2, 1);
    let buffer = run(&lookups, &font, &[lig, foreign]);
    assert_eq!(offsets(&buffer), [(0, 0), attached]);

    let mut past_the_end = mark(0x333, 0);
    past_the_end.set_lig_props_for_mark(1, 9);
    let buffer = run(&lookups, &font, &[lig, past_the_end]);
    assert_eq!(offsets(&buffer), [(0, 0), attached]);

    // the first component has no anchor
    let mut own = mark(0x333, 0);
    own.set_lig_props_for_mark(1, 1);
    let buffer = run(&lookups, &font, &[lig, own]);
    assert_eq!(offsets(&buffer), [(0, 0), (0, 0)]);
}

#[test]
fn mark_to_mark() {
    let font = MockFont {
        advances: [(GlyphId::new(0x289), 0), (GlyphId::new(0x296), 0)]
            .into_iter()
            .collect(),
        ..Default::default()
    };
    let lookups = [TestLookup::new(
        MARK_TO_MARK,
        [test_data::MARKMARKPOSFORMAT1.to_vec()],
    )];
    let infos = [base(1, 0), mark(0x289, 0), mark(0x296, 0)];
    let buffer = run(&lookups, &font, &infos);
    assert_eq!(offsets(&buffer), [(0, 0), (0, 0), (221 - 189, 301 + 103)]);
}

#[test]
fn mark_to_mark_different_components() {
    let lookups = [TestLookup::new(
        MARK_TO_MARK,
        [test_data::MARKMARKPOSFORMAT1.to_vec()],
    )];
    let mut lig = base(1, 0);
    lig.set_lig_props_for_ligature(1, 2);
    let mut mark2 = mark(0x289, 0);
    mark2.set_lig_props_for_mark(1, 1);
    let mut mark1 = mark(0x296, 0);
    mark1.set_lig_props_for_mark(1, 2);
    let buffer = run(&lookups, &MockFont::default(), &[lig, mark2, mark1]);
    assert_eq!(offsets(&buffer)[2], (0, 0));

    mark1.set_lig_props_for_mark(1, 1);
    let buffer = run(&lookups, &MockFont::default(), &[lig, mark2, mark1]);
    assert_ne!(offsets(&buffer)[2], (0, 0));
}

#[test]
fn extension_dispatches_to_wrapped_type() {
    let lookups = [TestLookup::new(
        EXTENSION,
        [extension(SINGLE, test_data::SINGLEPOSFORMAT1)],
    )];
    let buffer = run(&lookups, &MockFont::default(), &[base(0x1B3, 0)]);
    assert_eq!(offsets(&buffer), [(0, -80)]);
}

#[test]
fn context_applies_nested_lookup() {
    let input = BeBuffer::new()
        .push(1u16)
        .push(10u16) // coverage offset
        .push(1u16) // rule set count
        .push(16u16) // rule set offset
        .push(0u16) // padding
        .extend([1u16, 1, 1]) // coverage
        // rule set
        .extend([1u16, 4])
        // rule: two glyphs, position the second
        .extend([2u16, 1, 2])
        .extend([1u16, 1]);
    let lookups = [
        TestLookup::new(CONTEXT, [input.into_vec()]),
        TestLookup::new(SINGLE, [single_x_advance(&[1, 2], 10)]),
    ];
    let buffer = run_with(
        &lookups,
        &MockFont::default(),
        None,
        &[base(1, 0), base(2, 1), base(1, 2), base(3, 3)],
        |plan| plan.lookups.truncate(1),
    );
    assert_eq!(advances(&buffer), [600, 610, 600, 600]);
    assert!(buffer.info[1].is_unsafe_to_break());
}

#[test]
fn chain_context_needs_backtrack_and_lookahead() {
    let lookups = [
        TestLookup::new(CHAIN_CONTEXT, [chain_context_applying(1, 2, 3, 1)]),
        TestLookup::new(SINGLE, [single_x_advance(&[2], 10)]),
    ];
    let advances_for = |glyphs: &[u32]| {
        let infos: Vec<_> = glyphs
            .iter()
            .enumerate()
            .map(|(i, glyph)| base(*glyph, i as u32))
            .collect();
        let buffer = run_with(&lookups, &MockFont::default(), None, &infos, |plan| {
            plan.lookups.truncate(1)
        });
        advances(&buffer)
    };
    assert_eq!(advances_for(&[1, 2, 3]), [600, 610, 600]);
    assert_eq!(advances_for(&[1, 2, 4]), [600, 600, 600]);
    assert_eq!(advances_for(&[5, 2, 3]), [600, 600, 600]);
    assert_eq!(advances_for(&[2, 3]), [600, 600]);
    assert_eq!(advances_for(&[1, 2]), [600, 600]);
}

#[test]
fn chain_context_skips_marks_in_context() {
    let lookups = [
        TestLookup::new(CHAIN_CONTEXT, [chain_context_applying(1, 2, 3, 1)]).with_flag(0x0008),
        TestLookup::new(SINGLE, [single_x_advance(&[2], 10)]),
    ];
    let font = MockFont {
        advances: [(GlyphId::new(20), 0)].into_iter().collect(),
        ..Default::default()
    };
    let buffer = run_with(
        &lookups,
        &font,
        None,
        &[base(1, 0), mark(20, 0), base(2, 1), mark(20, 1), base(3, 2)],
        |plan| plan.lookups.truncate(1),
    );
    assert_eq!(advances(&buffer), [600, 0, 610, 0, 600]);
}

#[test]
fn only_matches_from_the_current_glyph_stay_in_its_syllable() {
    // backtrack 1, input 2 4, lookahead 3
    let subtable = BeBuffer::new()
        .push(3u16)
        .extend([1u16, 22])
        .extend([2u16, 28, 34])
        .extend([1u16, 40])
        .push(1u16)
        .extend([0u16, 1])
        .extend([1u16, 1, 1])
        .extend([1u16, 1, 2])
        .extend([1u16, 1, 4])
        .extend([1u16, 1, 3])
        .into_vec();
    let lookups = [
        TestLookup::new(CHAIN_CONTEXT, [subtable]),
        TestLookup::new(SINGLE, [single_x_advance(&[2], 10)]),
    ];
    let advances_for = |syllables: [u8; 4]| {
        let mut infos = [base(1, 0), base(2, 1), base(4, 2), base(3, 3)];
        for (info, syllable) in infos.iter_mut().zip(syllables) {
            info.syllable = syllable;
        }
        let buffer = run_with(&lookups, &MockFont::default(), None, &infos, |plan| {
            plan.lookups.truncate(1);
            plan.lookups[0].per_syllable = true;
        });
        advances(&buffer)
    };
    // the lookahead search starts after the input, so it may cross over
    assert_eq!(advances_for([1, 1, 1, 2]), [600, 610, 600, 600]);
    assert_eq!(advances_for([1, 1, 2, 2]), [600, 600, 600, 600]);
    assert_eq!(advances_for([2, 1, 1, 1]), [600, 600, 600, 600]);
}

fn nested_contexts(depth: u16) -> Vec<TestLookup> {
    let mut lookups: Vec<_> = (0..depth)
        .map(|i| TestLookup::new(CONTEXT, [context_applying(1, i + 1)]))
        .collect();
    lookups.push(TestLookup::new(SINGLE, [single_x_advance(&[1], 10)]));
    lookups
}

#[test]
fn nesting_is_bounded() {
    let font = MockFont::default();
    let max = MAX_NESTING_LEVEL as u16;

    let lookups = nested_contexts(max);
    let buffer = run_with(&lookups, &font, None, &[base(1, 0)], |plan| {
        plan.lookups.truncate(1)
    });
    assert_eq!(advances(&buffer), [610]);

    let lookups = nested_contexts(max + 1);
    let buffer = run_with(&lookups, &font, None, &[base(1, 0)], |plan| {
        plan.lookups.truncate(1)
    });
    assert_eq!(advances(&buffer), [600]);
}

#[test]
fn truncated_lookup_is_disabled() {
    let truncated = BeBuffer::new()
        .push(1u16)
        .push(0x40u16) // coverage offset past the end
        .push(0x0004u16)
        .push(10i16)
        .into_vec();
    let lookups = [
        TestLookup::new(SINGLE, [truncated]),
        TestLookup::new(SINGLE, [single_x_advance(&[1], 10)]),
    ];
    let data = gpos_with_lookups(&lookups);
    let table = GposTable::new(&data).unwrap();
    assert!(table.is_disabled(0));
    assert!(!table.is_disabled(1));

    let buffer = run(&lookups, &MockFont::default(), &[base(1, 0)]);
    assert_eq!(advances(&buffer), [610]);
}

#[test]
fn disabled_lookup_is_not_reached_from_context() {
    let truncated = BeBuffer::new()
        .push(1u16)
        .push(0x40u16)
        .push(0x0004u16)
        .push(10i16)
        .into_vec();
    let lookups = [
        TestLookup::new(CONTEXT, [context_applying(1, 1)]),
        TestLookup::new(SINGLE, [truncated]),
    ];
    let buffer = run_with(&lookups, &MockFont::default(), None, &[base(1, 0)], |plan| {
        plan.lookups.truncate(1)
    });
    assert_eq!(advances(&buffer), [600]);
}

#[test]
fn invalid_tables() {
    assert_eq!(
        GposTable::new(&[0, 2, 0, 0]).err(),
        Some(PositionError::InvalidGpos(ReadError::InvalidFormat(2)))
    );
    assert!(matches!(
        GposTable::new(&[0, 1]),
        Err(PositionError::InvalidGpos(_))
    ));
    let mut gdef = GDEF_V1_2.to_vec();
    gdef[1] = 2;
    assert_eq!(
        load_gdef(&gdef).err(),
        Some(PositionError::InvalidGdef(ReadError::InvalidFormat(2)))
    );
}

#[test]
fn gdef_classes_drive_ignore_flags() {
    let gdef = load_gdef(GDEF_V1_2).unwrap();
    // ignore ligatures
    let lookups = [TestLookup::new(SINGLE, [single_x_advance(&[1, 10], 10)]).with_flag(0x0004)];
    let buffer = run_with(
        &lookups,
        &MockFont::default(),
        Some(&gdef),
        &[base(1, 0), base(10, 1)],
        |_| (),
    );
    assert_eq!(buffer.info[1].glyph_props & glyph_props::LIGATURE, glyph_props::LIGATURE);
    assert_eq!(advances(&buffer), [610, 600]);
}

#[test]
fn fallback_marks_without_gpos() {
    let mut font = MockFont::default();
    font.extents.insert(
        GlyphId::new(1),
        crate::GlyphExtents {
            x_bearing: 0,
            y_bearing: 700,
            width: 600,
            height: -700,
        },
    );
    font.extents.insert(
        GlyphId::new(20),
        crate::GlyphExtents {
            x_bearing: 0,
            y_bearing: 500,
            width: 200,
            height: -100,
        },
    );
    let mut accent = mark(20, 0);
    accent.set_modified_combining_class(crate::combining_class::ABOVE);
    let mut buffer = buffer(&[base(1, 0), accent]);
    let plan = PositionPlan {
        fallback_mark_positioning: true,
        ..Default::default()
    };
    position(&plan, &font, None, None, &mut buffer);
    assert_eq!(advances(&buffer), [600, 0]);
    // centered over the base, one gap above it
    assert_eq!(offsets(&buffer), [(0, 0), (200 - 600, 362)]);
}
