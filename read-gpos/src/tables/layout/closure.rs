//! Closure analysis over layout tables: glyph set intersection, glyph
//! collection and reachable lookup computation.

use super::{
    ChainedSequenceContext, ChainedSequenceContextFormat1, ChainedSequenceContextFormat2,
    ChainedSequenceContextFormat3, ClassDef, ExtensionLookup, SequenceContext,
    SequenceContextFormat1, SequenceContextFormat2, SequenceContextFormat3, SequenceLookupRecord,
    Subtables,
};
use crate::collections::IntSet;
use crate::prelude::*;

/// The maximum number of lookups visited during a single closure.
pub(crate) const MAX_LOOKUP_VISIT_COUNT: usize = 35000;

/// A trait for layout tables that can be tested against a set of glyphs.
pub trait Intersect {
    /// Returns `true` if this table could apply to a run made only of glyphs
    /// in `glyph_set`.
    fn intersects(&self, glyph_set: &IntSet<GlyphId>) -> Result<bool, ReadError>;
}

/// The glyphs a lookup may interact with, split by role.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphCollection {
    /// Glyphs matched before the input sequence (backtrack).
    pub before: IntSet<GlyphId>,
    /// Glyphs matched by the input sequence.
    pub input: IntSet<GlyphId>,
    /// Glyphs matched after the input sequence (lookahead).
    pub after: IntSet<GlyphId>,
}

/// A trait for layout tables that can report every glyph they may match.
pub trait CollectGlyphs {
    fn collect_glyphs(&self, c: &mut GlyphCollection) -> Result<(), ReadError>;
}

/// State shared while computing the lookups reachable from a glyph set.
pub struct LookupClosureCtx<'a> {
    glyphs: &'a IntSet<GlyphId>,
    visited: IntSet<u16>,
    inactive: IntSet<u16>,
    pending: Vec<u16>,
    visit_count: usize,
}

impl<'a> LookupClosureCtx<'a> {
    pub fn new(glyphs: &'a IntSet<GlyphId>) -> Self {
        Self {
            glyphs,
            visited: IntSet::empty(),
            inactive: IntSet::empty(),
            pending: Vec::new(),
            visit_count: 0,
        }
    }

    /// The glyph set the closure is computed against.
    pub fn glyphs(&self) -> &IntSet<GlyphId> {
        self.glyphs
    }

    pub fn visited_lookups(&self) -> &IntSet<u16> {
        &self.visited
    }

    pub fn inactive_lookups(&self) -> &IntSet<u16> {
        &self.inactive
    }

    /// Returns `true` (and marks it visited) if `lookup_index` has not been seen.
    pub fn should_visit_lookup(&mut self, lookup_index: u16) -> bool {
        if self.visit_count >= MAX_LOOKUP_VISIT_COUNT {
            return false;
        }
        self.visit_count += 1;
        self.visited.insert(lookup_index)
    }

    /// Record a lookup that cannot apply to any glyph in the set.
    pub fn set_lookup_inactive(&mut self, lookup_index: u16) {
        self.inactive.insert(lookup_index);
    }

    /// Queue a lookup referenced by a contextual rule.
    pub fn add_nested_lookup(&mut self, lookup_index: u16) {
        if !self.visited.contains(lookup_index) {
            self.pending.push(lookup_index);
        }
    }

    pub(crate) fn pop_pending(&mut self) -> Option<u16> {
        self.pending.pop()
    }
}

/// A trait for lookups (and subtables) that reference other lookups.
pub trait LookupClosure {
    fn closure_lookups(&self, c: &mut LookupClosureCtx, lookup_index: u16)
        -> Result<(), ReadError>;
}

fn glyphs_in_set(seq: &[BigEndian<GlyphId16>], glyphs: &IntSet<GlyphId>) -> bool {
    seq.iter().all(|gid| glyphs.contains(gid.get().into()))
}

fn classes_in_set(seq: &[BigEndian<u16>], class_def: &ClassDef, glyphs: &IntSet<GlyphId>) -> bool {
    seq.iter()
        .all(|class| class_def.intersects_class(glyphs, class.get()))
}

/// Collect the lookup records of every rule that can match `glyphs`.
///
/// A rule with no lookup records still counts as a match.
trait MatchingRules<'a> {
    fn matching_rules(
        &self,
        glyphs: &IntSet<GlyphId>,
        out: &mut Vec<&'a [SequenceLookupRecord]>,
    ) -> Result<(), ReadError>;
}

impl<'a> MatchingRules<'a> for SequenceContextFormat1<'a> {
    fn matching_rules(
        &self,
        glyphs: &IntSet<GlyphId>,
        out: &mut Vec<&'a [SequenceLookupRecord]>,
    ) -> Result<(), ReadError> {
        let coverage = self.coverage()?;
        for (gid, rule_set) in coverage.iter().zip(self.seq_rule_sets().iter()) {
            if !glyphs.contains(gid) {
                continue;
            }
            let Some(rule_set) = rule_set.transpose()? else {
                continue;
            };
            for rule in rule_set.rules().iter() {
                let rule = rule?;
                if glyphs_in_set(rule.input_sequence(), glyphs) {
                    out.push(rule.seq_lookup_records());
                }
            }
        }
        Ok(())
    }
}

impl<'a> MatchingRules<'a> for SequenceContextFormat2<'a> {
    fn matching_rules(
        &self,
        glyphs: &IntSet<GlyphId>,
        out: &mut Vec<&'a [SequenceLookupRecord]>,
    ) -> Result<(), ReadError> {
        let covered = self.coverage()?.intersect_set(glyphs);
        if covered.is_empty() {
            return Ok(());
        }
        let class_def = self.class_def()?;
        for (class, rule_set) in self.class_seq_rule_sets().iter().enumerate() {
            let Some(rule_set) = rule_set.transpose()? else {
                continue;
            };
            if !class_def.intersects_class(&covered, class as u16) {
                continue;
            }
            for rule in rule_set.rules().iter() {
                let rule = rule?;
                if classes_in_set(rule.input_sequence(), &class_def, glyphs) {
                    out.push(rule.seq_lookup_records());
                }
            }
        }
        Ok(())
    }
}

impl<'a> MatchingRules<'a> for SequenceContextFormat3<'a> {
    fn matching_rules(
        &self,
        glyphs: &IntSet<GlyphId>,
        out: &mut Vec<&'a [SequenceLookupRecord]>,
    ) -> Result<(), ReadError> {
        for coverage in self.coverages().iter() {
            if !coverage?.intersects(glyphs) {
                return Ok(());
            }
        }
        out.push(self.seq_lookup_records());
        Ok(())
    }
}

impl<'a> MatchingRules<'a> for ChainedSequenceContextFormat1<'a> {
    fn matching_rules(
        &self,
        glyphs: &IntSet<GlyphId>,
        out: &mut Vec<&'a [SequenceLookupRecord]>,
    ) -> Result<(), ReadError> {
        let coverage = self.coverage()?;
        for (gid, rule_set) in coverage.iter().zip(self.chained_seq_rule_sets().iter()) {
            if !glyphs.contains(gid) {
                continue;
            }
            let Some(rule_set) = rule_set.transpose()? else {
                continue;
            };
            for rule in rule_set.rules().iter() {
                let rule = rule?;
                if glyphs_in_set(rule.backtrack_sequence(), glyphs)
                    && glyphs_in_set(rule.input_sequence(), glyphs)
                    && glyphs_in_set(rule.lookahead_sequence(), glyphs)
                {
                    out.push(rule.seq_lookup_records());
                }
            }
        }
        Ok(())
    }
}

impl<'a> MatchingRules<'a> for ChainedSequenceContextFormat2<'a> {
    fn matching_rules(
        &self,
        glyphs: &IntSet<GlyphId>,
        out: &mut Vec<&'a [SequenceLookupRecord]>,
    ) -> Result<(), ReadError> {
        let covered = self.coverage()?.intersect_set(glyphs);
        if covered.is_empty() {
            return Ok(());
        }
        let backtrack = self.backtrack_class_def()?;
        let input = self.input_class_def()?;
        let lookahead = self.lookahead_class_def()?;
        for (class, rule_set) in self.chained_class_seq_rule_sets().iter().enumerate() {
            let Some(rule_set) = rule_set.transpose()? else {
                continue;
            };
            if !input.intersects_class(&covered, class as u16) {
                continue;
            }
            for rule in rule_set.rules().iter() {
                let rule = rule?;
                if classes_in_set(rule.backtrack_sequence(), &backtrack, glyphs)
                    && classes_in_set(rule.input_sequence(), &input, glyphs)
                    && classes_in_set(rule.lookahead_sequence(), &lookahead, glyphs)
                {
                    out.push(rule.seq_lookup_records());
                }
            }
        }
        Ok(())
    }
}

impl<'a> MatchingRules<'a> for ChainedSequenceContextFormat3<'a> {
    fn matching_rules(
        &self,
        glyphs: &IntSet<GlyphId>,
        out: &mut Vec<&'a [SequenceLookupRecord]>,
    ) -> Result<(), ReadError> {
        let all = self
            .backtrack_coverages()
            .iter()
            .chain(self.input_coverages().iter())
            .chain(self.lookahead_coverages().iter());
        for coverage in all {
            if !coverage?.intersects(glyphs) {
                return Ok(());
            }
        }
        out.push(self.seq_lookup_records());
        Ok(())
    }
}

impl<'a> MatchingRules<'a> for SequenceContext<'a> {
    fn matching_rules(
        &self,
        glyphs: &IntSet<GlyphId>,
        out: &mut Vec<&'a [SequenceLookupRecord]>,
    ) -> Result<(), ReadError> {
        match self {
            Self::Format1(table) => table.matching_rules(glyphs, out),
            Self::Format2(table) => table.matching_rules(glyphs, out),
            Self::Format3(table) => table.matching_rules(glyphs, out),
        }
    }
}

impl<'a> MatchingRules<'a> for ChainedSequenceContext<'a> {
    fn matching_rules(
        &self,
        glyphs: &IntSet<GlyphId>,
        out: &mut Vec<&'a [SequenceLookupRecord]>,
    ) -> Result<(), ReadError> {
        match self {
            Self::Format1(table) => table.matching_rules(glyphs, out),
            Self::Format2(table) => table.matching_rules(glyphs, out),
            Self::Format3(table) => table.matching_rules(glyphs, out),
        }
    }
}

macro_rules! context_closure {
    ($ty:ident) => {
        impl Intersect for $ty<'_> {
            fn intersects(&self, glyph_set: &IntSet<GlyphId>) -> Result<bool, ReadError> {
                let mut rules = Vec::new();
                self.matching_rules(glyph_set, &mut rules)?;
                Ok(!rules.is_empty())
            }
        }

        impl LookupClosure for $ty<'_> {
            fn closure_lookups(
                &self,
                c: &mut LookupClosureCtx,
                _lookup_index: u16,
            ) -> Result<(), ReadError> {
                let mut rules = Vec::new();
                self.matching_rules(c.glyphs(), &mut rules)?;
                for record in rules.into_iter().flatten() {
                    c.add_nested_lookup(record.lookup_list_index());
                }
                Ok(())
            }
        }
    };
}

context_closure!(SequenceContext);
context_closure!(ChainedSequenceContext);

impl CollectGlyphs for SequenceContext<'_> {
    fn collect_glyphs(&self, c: &mut GlyphCollection) -> Result<(), ReadError> {
        match self {
            Self::Format1(table) => {
                c.input.extend(table.coverage()?.iter());
                for rule_set in table.seq_rule_sets().iter().flatten() {
                    for rule in rule_set?.rules().iter() {
                        c.input
                            .extend(rule?.input_sequence().iter().map(|g| g.get().into()));
                    }
                }
            }
            Self::Format2(table) => {
                c.input.extend(table.coverage()?.iter());
                let class_def = table.class_def()?;
                for rule_set in table.class_seq_rule_sets().iter().flatten() {
                    for rule in rule_set?.rules().iter() {
                        for class in rule?.input_sequence() {
                            class_def.collect_glyphs_for_class(class.get(), &mut c.input);
                        }
                    }
                }
            }
            Self::Format3(table) => {
                for coverage in table.coverages().iter() {
                    c.input.extend(coverage?.iter());
                }
            }
        }
        Ok(())
    }
}

impl CollectGlyphs for ChainedSequenceContext<'_> {
    fn collect_glyphs(&self, c: &mut GlyphCollection) -> Result<(), ReadError> {
        match self {
            Self::Format1(table) => {
                c.input.extend(table.coverage()?.iter());
                for rule_set in table.chained_seq_rule_sets().iter().flatten() {
                    for rule in rule_set?.rules().iter() {
                        let rule = rule?;
                        let glyphs = |seq: &[BigEndian<GlyphId16>]| {
                            seq.iter()
                                .map(|g| GlyphId::from(g.get()))
                                .collect::<Vec<_>>()
                        };
                        c.before.extend(glyphs(rule.backtrack_sequence()));
                        c.input.extend(glyphs(rule.input_sequence()));
                        c.after.extend(glyphs(rule.lookahead_sequence()));
                    }
                }
            }
            Self::Format2(table) => {
                c.input.extend(table.coverage()?.iter());
                let backtrack = table.backtrack_class_def()?;
                let input = table.input_class_def()?;
                let lookahead = table.lookahead_class_def()?;
                for rule_set in table.chained_class_seq_rule_sets().iter().flatten() {
                    for rule in rule_set?.rules().iter() {
                        let rule = rule?;
                        for class in rule.backtrack_sequence() {
                            backtrack.collect_glyphs_for_class(class.get(), &mut c.before);
                        }
                        for class in rule.input_sequence() {
                            input.collect_glyphs_for_class(class.get(), &mut c.input);
                        }
                        for class in rule.lookahead_sequence() {
                            lookahead.collect_glyphs_for_class(class.get(), &mut c.after);
                        }
                    }
                }
            }
            Self::Format3(table) => {
                for coverage in table.backtrack_coverages().iter() {
                    c.before.extend(coverage?.iter());
                }
                for coverage in table.input_coverages().iter() {
                    c.input.extend(coverage?.iter());
                }
                for coverage in table.lookahead_coverages().iter() {
                    c.after.extend(coverage?.iter());
                }
            }
        }
        Ok(())
    }
}

impl<'a, T, Ext> Intersect for Subtables<'a, T, Ext>
where
    T: FontRead<'a> + Intersect,
    Ext: ExtensionLookup<'a, T>,
{
    fn intersects(&self, glyph_set: &IntSet<GlyphId>) -> Result<bool, ReadError> {
        for subtable in self.iter() {
            if subtable?.intersects(glyph_set)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl<'a, T, Ext> LookupClosure for Subtables<'a, T, Ext>
where
    T: FontRead<'a> + LookupClosure,
    Ext: ExtensionLookup<'a, T>,
{
    fn closure_lookups(
        &self,
        c: &mut LookupClosureCtx,
        lookup_index: u16,
    ) -> Result<(), ReadError> {
        for subtable in self.iter() {
            subtable?.closure_lookups(c, lookup_index)?;
        }
        Ok(())
    }
}

impl<'a, T, Ext> CollectGlyphs for Subtables<'a, T, Ext>
where
    T: FontRead<'a> + CollectGlyphs,
    Ext: ExtensionLookup<'a, T>,
{
    fn collect_glyphs(&self, c: &mut GlyphCollection) -> Result<(), ReadError> {
        for subtable in self.iter() {
            subtable?.collect_glyphs(c)?;
        }
        Ok(())
    }
}
