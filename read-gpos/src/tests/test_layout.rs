use super::*;
use crate::collections::IntSet;
use crate::prelude::*;
use gpos_test_data::bebuffer::BeBuffer;
use pretty_assertions::assert_eq;

fn coverage(glyphs: &[u16]) -> BeBuffer {
    BeBuffer::new()
        .push(1u16)
        .push(glyphs.len() as u16)
        .extend(glyphs.iter().copied())
}

fn glyph_set(glyphs: &[u32]) -> IntSet<GlyphId> {
    glyphs.iter().copied().map(GlyphId::new).collect()
}

// coverage [10]; one rule matching 10, 20 that applies lookup 3 at index 1
fn context_format1() -> BeBuffer {
    BeBuffer::new()
        .push(1u16) // format
        .push(22u16) // coverage offset
        .push(1u16) // rule set count
        .push(8u16) // rule set offset
        // rule set
        .push(1u16)
        .push(4u16)
        // rule
        .push(2u16) // glyph count
        .push(1u16) // lookup count
        .push(GlyphId16::new(20))
        .extend([1u16, 3])
        .append(coverage(&[10]).as_slice())
}

// coverage [30]; class 1 is 30..=31; one class 1 rule applying lookup 5
fn context_format2() -> BeBuffer {
    BeBuffer::new()
        .push(2u16) // format
        .push(26u16) // coverage offset
        .push(32u16) // class def offset
        .push(2u16) // rule set count
        .extend([0u16, 12])
        // class rule set
        .push(1u16)
        .push(4u16)
        // class rule
        .push(2u16)
        .push(1u16)
        .push(1u16)
        .extend([1u16, 5])
        .append(coverage(&[30]).as_slice())
        // class def
        .push(2u16)
        .push(1u16)
        .extend([30u16, 31, 1])
}

// backtrack [1], input [2], lookahead [3]; applies lookup 7
fn chained_format3() -> BeBuffer {
    BeBuffer::new()
        .push(3u16)
        .extend([1u16, 20])
        .extend([1u16, 26])
        .extend([1u16, 32])
        .push(1u16)
        .extend([0u16, 7])
        .append(coverage(&[1]).as_slice())
        .append(coverage(&[2]).as_slice())
        .append(coverage(&[3]).as_slice())
}

#[test]
fn sequence_context_format1() {
    let buf = context_format1();
    let table = SequenceContext::read(FontData::new(buf.as_slice())).unwrap();
    let SequenceContext::Format1(table) = table else {
        panic!("expected format 1");
    };
    assert_eq!(table.coverage().unwrap().get(GlyphId::new(10)), Some(0));
    let rule_set = table.seq_rule_sets().get(0).unwrap().unwrap();
    assert_eq!(rule_set.rule_count(), 1);
    let rule = rule_set.rules().get(0).unwrap();
    assert_eq!(rule.glyph_count(), 2);
    assert_eq!(rule.input_sequence()[0].get(), GlyphId16::new(20));
    let record = rule.seq_lookup_records()[0];
    assert_eq!(record.sequence_index(), 1);
    assert_eq!(record.lookup_list_index(), 3);
}

#[test]
fn sequence_context_rule_matching() {
    let buf = context_format1();
    let table = SequenceContext::read(FontData::new(buf.as_slice())).unwrap();
    assert!(table.intersects(&glyph_set(&[10, 20])).unwrap());
    // the second input glyph is missing
    assert!(!table.intersects(&glyph_set(&[10])).unwrap());
    // the first glyph is not covered
    assert!(!table.intersects(&glyph_set(&[20])).unwrap());

    let mut glyphs = GlyphCollection::default();
    table.collect_glyphs(&mut glyphs).unwrap();
    assert_eq!(glyphs.input, glyph_set(&[10, 20]));
    assert!(glyphs.before.is_empty());
    assert!(glyphs.after.is_empty());
}

#[test]
fn class_context_uses_rule_set_for_class() {
    let buf = context_format2();
    let table = SequenceContext::read(FontData::new(buf.as_slice())).unwrap();
    assert!(table.intersects(&glyph_set(&[30])).unwrap());
    // 31 is in class 1 but not covered
    assert!(!table.intersects(&glyph_set(&[31])).unwrap());

    let mut glyphs = GlyphCollection::default();
    table.collect_glyphs(&mut glyphs).unwrap();
    assert_eq!(glyphs.input, glyph_set(&[30, 31]));
}

#[test]
fn context_queues_nested_lookups() {
    let glyphs = glyph_set(&[10, 20, 30]);
    let mut ctx = LookupClosureCtx::new(&glyphs);

    let buf = context_format1();
    let table = SequenceContext::read(FontData::new(buf.as_slice())).unwrap();
    table.closure_lookups(&mut ctx, 0).unwrap();
    let buf = context_format2();
    let table = SequenceContext::read(FontData::new(buf.as_slice())).unwrap();
    table.closure_lookups(&mut ctx, 1).unwrap();

    assert_eq!(ctx.pop_pending(), Some(5));
    assert_eq!(ctx.pop_pending(), Some(3));
    assert_eq!(ctx.pop_pending(), None);
}

#[test]
fn visited_lookups_are_not_queued() {
    let glyphs = glyph_set(&[10, 20]);
    let mut ctx = LookupClosureCtx::new(&glyphs);
    assert!(ctx.should_visit_lookup(3));
    assert!(!ctx.should_visit_lookup(3));
    ctx.add_nested_lookup(3);
    assert_eq!(ctx.pop_pending(), None);
    ctx.set_lookup_inactive(3);
    assert!(ctx.inactive_lookups().contains(3));
    assert_eq!(ctx.visited_lookups().iter().collect::<Vec<_>>(), [3]);
}

#[test]
fn chained_context_format3() {
    let buf = chained_format3();
    let table = ChainedSequenceContext::read(FontData::new(buf.as_slice())).unwrap();
    let ChainedSequenceContext::Format3(inner) = &table else {
        panic!("expected format 3");
    };
    assert_eq!(inner.backtrack_glyph_count(), 1);
    assert_eq!(inner.input_glyph_count(), 1);
    assert_eq!(inner.lookahead_glyph_count(), 1);
    assert_eq!(inner.seq_lookup_records()[0].lookup_list_index(), 7);

    let mut glyphs = GlyphCollection::default();
    table.collect_glyphs(&mut glyphs).unwrap();
    assert_eq!(glyphs.before, glyph_set(&[1]));
    assert_eq!(glyphs.input, glyph_set(&[2]));
    assert_eq!(glyphs.after, glyph_set(&[3]));

    assert!(table.intersects(&glyph_set(&[1, 2, 3])).unwrap());
    assert!(!table.intersects(&glyph_set(&[2, 3])).unwrap());
}

#[test]
fn unknown_context_format() {
    let buf = BeBuffer::new().push(4u16).push(0u16);
    assert!(matches!(
        SequenceContext::read(FontData::new(buf.as_slice())),
        Err(ReadError::InvalidFormat(4))
    ));
}

#[test]
fn lookup_with_filtering_set() {
    let flag = LookupFlag::IGNORE_MARKS | LookupFlag::USE_MARK_FILTERING_SET;
    let buf = BeBuffer::new()
        .push(1u16) // type
        .push(flag.to_bits())
        .push(1u16)
        .push(10u16)
        .push(2u16) // mark filtering set
        .append(coverage(&[4, 9]).as_slice());
    let lookup = Lookup::<CoverageTable>::read(FontData::new(buf.as_slice())).unwrap();
    assert_eq!(lookup.lookup_type(), 1);
    assert_eq!(lookup.lookup_flag(), flag);
    assert_eq!(lookup.mark_filtering_set(), Some(2));
    assert_eq!(lookup.lookup_props(), flag.to_bits() as u32 | (2 << 16));
    let subtable = lookup.subtables().get(0).unwrap();
    assert_eq!(subtable.get(GlyphId::new(9)), Some(1));
}

#[test]
fn lookup_list_resolves_lookups() {
    let buf = BeBuffer::new()
        .push(1u16) // lookup count
        .push(4u16)
        // lookup
        .push(2u16)
        .push(LookupFlag::IGNORE_LIGATURES.to_bits())
        .push(1u16)
        .push(8u16)
        .append(coverage(&[6]).as_slice());
    let list = LookupList::<Lookup<CoverageTable>>::read(FontData::new(buf.as_slice())).unwrap();
    assert_eq!(list.lookup_count(), 1);
    let lookup = list.lookups().get(0).unwrap();
    assert_eq!(lookup.lookup_type(), 2);
    assert_eq!(lookup.mark_filtering_set(), None);
    assert_eq!(lookup.lookup_props(), LookupFlag::IGNORE_LIGATURES.to_bits() as u32);
    assert!(list.lookups().get(1).is_err());
}
