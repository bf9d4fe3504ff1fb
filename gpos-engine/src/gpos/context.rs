//! impl apply() for contextual and chained contextual subtables

use read_gpos::{
    tables::layout::{
        ChainedSequenceContext, ChainedSequenceContextFormat1, ChainedSequenceContextFormat2,
        ChainedSequenceContextFormat3, ClassDef, CoverageTable, SequenceContext,
        SequenceContextFormat1, SequenceContextFormat2, SequenceContextFormat3,
        SequenceLookupRecord,
    },
    types::{BigEndian, GlyphId, GlyphId16},
    ArrayOfOffsets,
};

use crate::{
    apply::{Apply, ApplyContext, Traced},
    skippy::SkippyIter,
    MAX_CONTEXT_LENGTH,
};

/// Matches the glyph at a position of a sequence (backtrack, input after
/// the first glyph, or lookahead).
type SequenceMatch<'m> = dyn Fn(GlyphId, usize) -> bool + 'm;

fn match_glyphs(sequence: &[BigEndian<GlyphId16>]) -> impl Fn(GlyphId, usize) -> bool + '_ {
    move |glyph, i| {
        sequence
            .get(i)
            .is_some_and(|expected| GlyphId::from(expected.get()) == glyph)
    }
}

fn match_classes<'m>(
    sequence: &'m [BigEndian<u16>],
    class_def: ClassDef<'m>,
) -> impl Fn(GlyphId, usize) -> bool + 'm {
    move |glyph, i| {
        sequence
            .get(i)
            .is_some_and(|class| class_def.get(glyph) == class.get())
    }
}

// `skip` leading coverages are not part of the sequence
fn match_coverages<'m>(
    coverages: ArrayOfOffsets<'m, CoverageTable<'m>>,
    skip: usize,
) -> impl Fn(GlyphId, usize) -> bool + 'm {
    move |glyph, i| {
        coverages
            .get(i + skip)
            .is_ok_and(|coverage| coverage.get(glyph).is_some())
    }
}

/// The buffer positions of a matched input sequence.
struct MatchedInput {
    positions: [usize; MAX_CONTEXT_LENGTH],
    len: usize,
    /// One past the last matched glyph.
    end: usize,
}

/// Match the current glyph and `input_len` more glyphs after it.
fn match_input(
    ctx: &ApplyContext,
    input_len: usize,
    matches: &SequenceMatch,
) -> Option<MatchedInput> {
    let len = input_len + 1;
    if len > MAX_CONTEXT_LENGTH {
        return None;
    }
    let matcher = |glyph: GlyphId, remaining: u16| matches(glyph, input_len - remaining as usize);
    let mut iter = SkippyIter::new(ctx, ctx.buffer.idx, input_len as u16, true);
    iter.enable_matching(&matcher);

    let first = ctx.buffer.cur();
    let first_lig_id = first.lig_id();
    let first_lig_comp = first.lig_comp();
    let mut positions = [0; MAX_CONTEXT_LENGTH];
    positions[0] = ctx.buffer.idx;
    for position in positions.iter_mut().take(len).skip(1) {
        if !iter.next() {
            return None;
        }
        *position = iter.index();
        let this = &ctx.buffer.info[iter.index()];
        let (this_lig_id, this_lig_comp) = (this.lig_id(), this.lig_comp());
        if first_lig_id != 0 && first_lig_comp != 0 {
            // all glyphs must sit on the same ligature component as the first
            if first_lig_id != this_lig_id || first_lig_comp != this_lig_comp {
                return None;
            }
        } else if this_lig_id != 0 && this_lig_comp != 0 && this_lig_id != first_lig_id {
            // or on none, unless attached to the first glyph itself
            return None;
        }
    }
    Some(MatchedInput {
        positions,
        len,
        end: iter.index() + 1,
    })
}

/// Match `len` glyphs before the current one; returns the first position.
fn match_backtrack(ctx: &ApplyContext, len: usize, matches: &SequenceMatch) -> Option<usize> {
    let matcher = |glyph: GlyphId, remaining: u16| matches(glyph, len - remaining as usize);
    let mut iter = SkippyIter::new(ctx, ctx.buffer.idx, len as u16, true);
    iter.enable_matching(&matcher);
    for _ in 0..len {
        if !iter.prev() {
            return None;
        }
    }
    Some(iter.index())
}

/// Match `len` glyphs from `start`; returns one past the last position.
fn match_lookahead(
    ctx: &ApplyContext,
    len: usize,
    matches: &SequenceMatch,
    start: usize,
) -> Option<usize> {
    let matcher = |glyph: GlyphId, remaining: u16| matches(glyph, len - remaining as usize);
    let mut iter = SkippyIter::new(ctx, start - 1, len as u16, true);
    iter.enable_matching(&matcher);
    for _ in 0..len {
        if !iter.next() {
            return None;
        }
    }
    Some(iter.index() + 1)
}

/// Apply the nested lookups of a matched rule, then move past the input.
fn apply_lookup_records(
    ctx: &mut ApplyContext,
    input: &MatchedInput,
    records: &[SequenceLookupRecord],
) {
    for record in records {
        let seq_index = record.sequence_index() as usize;
        if seq_index >= input.len {
            continue;
        }
        ctx.buffer.idx = input.positions[seq_index];
        ctx.recurse(record.lookup_list_index());
    }
    ctx.buffer.idx = input.end;
}

fn apply_context_rule(
    ctx: &mut ApplyContext,
    input_len: usize,
    input: &SequenceMatch,
    records: &[SequenceLookupRecord],
) -> Option<()> {
    let matched = match_input(ctx, input_len, input)?;
    ctx.buffer.unsafe_to_break(ctx.buffer.idx, matched.end);
    apply_lookup_records(ctx, &matched, records);
    Some(())
}

/// The three sequences of a chained rule.
struct ChainRule<'m> {
    backtrack_len: usize,
    backtrack: &'m SequenceMatch<'m>,
    input_len: usize,
    input: &'m SequenceMatch<'m>,
    lookahead_len: usize,
    lookahead: &'m SequenceMatch<'m>,
}

fn apply_chain_rule(
    ctx: &mut ApplyContext,
    rule: &ChainRule,
    records: &[SequenceLookupRecord],
) -> Option<()> {
    let matched = match_input(ctx, rule.input_len, rule.input)?;
    let end = match_lookahead(ctx, rule.lookahead_len, rule.lookahead, matched.end)?;
    let start = match_backtrack(ctx, rule.backtrack_len, rule.backtrack)?;
    ctx.buffer.unsafe_to_break(start, end);
    apply_lookup_records(ctx, &matched, records);
    Some(())
}

impl Apply for SequenceContext<'_> {
    fn apply(&self, ctx: &mut ApplyContext) -> Option<()> {
        match self {
            Self::Format1(table) => table.apply(ctx),
            Self::Format2(table) => table.apply(ctx),
            Self::Format3(table) => table.apply(ctx),
        }
    }
}

impl Apply for SequenceContextFormat1<'_> {
    fn apply(&self, ctx: &mut ApplyContext) -> Option<()> {
        let glyph = ctx.buffer.cur().glyph_id;
        let index = self.coverage().traced("context coverage")?.get(glyph)?;
        let rule_set = self
            .seq_rule_sets()
            .get(index as usize)?
            .traced("rule set")?;
        for rule in rule_set.rules().iter() {
            let Some(rule) = rule.traced("rule") else {
                continue;
            };
            let sequence = rule.input_sequence();
            let input = match_glyphs(sequence);
            if apply_context_rule(ctx, sequence.len(), &input, rule.seq_lookup_records()).is_some()
            {
                return Some(());
            }
        }
        None
    }
}

impl Apply for SequenceContextFormat2<'_> {
    fn apply(&self, ctx: &mut ApplyContext) -> Option<()> {
        let glyph = ctx.buffer.cur().glyph_id;
        self.coverage().traced("context coverage")?.get(glyph)?;
        let class_def = self.class_def().traced("class def")?;
        let class = class_def.get(glyph);
        let rule_set = self
            .class_seq_rule_sets()
            .get(class as usize)?
            .traced("class rule set")?;
        for rule in rule_set.rules().iter() {
            let Some(rule) = rule.traced("class rule") else {
                continue;
            };
            let sequence = rule.input_sequence();
            let input = match_classes(sequence, class_def);
            if apply_context_rule(ctx, sequence.len(), &input, rule.seq_lookup_records()).is_some()
            {
                return Some(());
            }
        }
        None
    }
}

impl Apply for SequenceContextFormat3<'_> {
    fn apply(&self, ctx: &mut ApplyContext) -> Option<()> {
        let glyph = ctx.buffer.cur().glyph_id;
        let coverages = self.coverages();
        coverages
            .get(0)
            .traced("input coverage")?
            .get(glyph)?;
        let input_len = coverages.len() - 1;
        let input = match_coverages(coverages, 1);
        apply_context_rule(ctx, input_len, &input, self.seq_lookup_records())
    }
}

impl Apply for ChainedSequenceContext<'_> {
    fn apply(&self, ctx: &mut ApplyContext) -> Option<()> {
        match self {
            Self::Format1(table) => table.apply(ctx),
            Self::Format2(table) => table.apply(ctx),
            Self::Format3(table) => table.apply(ctx),
        }
    }
}

impl Apply for ChainedSequenceContextFormat1<'_> {
    fn apply(&self, ctx: &mut ApplyContext) -> Option<()> {
        let glyph = ctx.buffer.cur().glyph_id;
        let index = self.coverage().traced("chain coverage")?.get(glyph)?;
        let rule_set = self
            .chained_seq_rule_sets()
            .get(index as usize)?
            .traced("chain rule set")?;
        for rule in rule_set.rules().iter() {
            let Some(rule) = rule.traced("chain rule") else {
                continue;
            };
            let (backtrack, input, lookahead) = (
                rule.backtrack_sequence(),
                rule.input_sequence(),
                rule.lookahead_sequence(),
            );
            let chain = ChainRule {
                backtrack_len: backtrack.len(),
                backtrack: &match_glyphs(backtrack),
                input_len: input.len(),
                input: &match_glyphs(input),
                lookahead_len: lookahead.len(),
                lookahead: &match_glyphs(lookahead),
            };
            if apply_chain_rule(ctx, &chain, rule.seq_lookup_records()).is_some() {
                return Some(());
            }
        }
        None
    }
}

impl Apply for ChainedSequenceContextFormat2<'_> {
    fn apply(&self, ctx: &mut ApplyContext) -> Option<()> {
        let glyph = ctx.buffer.cur().glyph_id;
        self.coverage().traced("chain coverage")?.get(glyph)?;
        let backtrack_classes = self.backtrack_class_def().traced("backtrack class def")?;
        let input_classes = self.input_class_def().traced("input class def")?;
        let lookahead_classes = self.lookahead_class_def().traced("lookahead class def")?;
        let class = input_classes.get(glyph);
        let rule_set = self
            .chained_class_seq_rule_sets()
            .get(class as usize)?
            .traced("chain class rule set")?;
        for rule in rule_set.rules().iter() {
            let Some(rule) = rule.traced("chain class rule") else {
                continue;
            };
            let (backtrack, input, lookahead) = (
                rule.backtrack_sequence(),
                rule.input_sequence(),
                rule.lookahead_sequence(),
            );
            let chain = ChainRule {
                backtrack_len: backtrack.len(),
                backtrack: &match_classes(backtrack, backtrack_classes),
                input_len: input.len(),
                input: &match_classes(input, input_classes),
                lookahead_len: lookahead.len(),
                lookahead: &match_classes(lookahead, lookahead_classes),
            };
            if apply_chain_rule(ctx, &chain, rule.seq_lookup_records()).is_some() {
                return Some(());
            }
        }
        None
    }
}

impl Apply for ChainedSequenceContextFormat3<'_> {
    fn apply(&self, ctx: &mut ApplyContext) -> Option<()> {
        let glyph = ctx.buffer.cur().glyph_id;
        let input = self.input_coverages();
        input.get(0).traced("input coverage")?.get(glyph)?;
        let backtrack = self.backtrack_coverages();
        let lookahead = self.lookahead_coverages();
        let chain = ChainRule {
            backtrack_len: backtrack.len(),
            input_len: input.len() - 1,
            lookahead_len: lookahead.len(),
            backtrack: &match_coverages(backtrack, 0),
            input: &match_coverages(input, 1),
            lookahead: &match_coverages(lookahead, 0),
        };
        apply_chain_rule(ctx, &chain, self.seq_lookup_records())
    }
}
