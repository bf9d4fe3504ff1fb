//! Sequence context tables, shared by contextual and chained contextual lookups
//!
//! Format 1 rules match glyph ids and format 2 rules match glyph classes;
//! both have the same binary layout, so their rule and rule set types are
//! generic over the type of the input sequence.

use std::marker::PhantomData;

use super::{ClassDef, CoverageTable, SequenceLookupRecord};
use crate::prelude::*;

/// [Sequence Context Format 1](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#sequence-context-format-1-simple-glyph-contexts)
/// and [Format 2](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#sequence-context-format-2-class-based-glyph-contexts)
#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct SequenceContextMarker<const F: u16> {
    rule_set_offsets_byte_start: usize,
    rule_set_offsets_byte_len: usize,
}

impl<const F: u16> SequenceContextMarker<F> {
    pub fn rule_set_offsets_byte_range(&self) -> Range<usize> {
        let start = self.rule_set_offsets_byte_start;
        start..start + self.rule_set_offsets_byte_len
    }
}

impl<const F: u16> Format<u16> for SequenceContextMarker<F> {
    const FORMAT: u16 = F;
}

impl<'a, const F: u16> FontRead<'a> for TableRef<'a, SequenceContextMarker<F>> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance::<u16>();
        cursor.advance::<Offset16>();
        if F == 2 {
            cursor.advance::<Offset16>();
        }
        let rule_set_count: u16 = cursor.read()?;
        let rule_set_offsets_byte_start = cursor.position()?;
        let rule_set_offsets_byte_len = rule_set_count as usize * Offset16::RAW_BYTE_LEN;
        cursor.advance_by(rule_set_offsets_byte_len);
        cursor.finish(SequenceContextMarker {
            rule_set_offsets_byte_start,
            rule_set_offsets_byte_len,
        })
    }
}

/// [Sequence Context Format 1](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#sequence-context-format-1-simple-glyph-contexts)
pub type SequenceContextFormat1<'a> = TableRef<'a, SequenceContextMarker<1>>;
/// [Sequence Context Format 2](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#sequence-context-format-2-class-based-glyph-contexts)
pub type SequenceContextFormat2<'a> = TableRef<'a, SequenceContextMarker<2>>;

impl<'a, const F: u16> TableRef<'a, SequenceContextMarker<F>> {
    /// Format identifier
    pub fn format(&self) -> u16 {
        self.field(0)
    }

    /// Offset to Coverage table, from beginning of the SequenceContext table
    pub fn coverage_offset(&self) -> Offset16 {
        self.field(2)
    }

    /// Attempt to resolve [`coverage_offset`][Self::coverage_offset].
    pub fn coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.resolve_offset(self.coverage_offset())
    }

    /// Array of offsets to rule sets, indexed by coverage index (format 1)
    /// or by class (format 2)
    pub fn rule_set_offsets(&self) -> &'a [BigEndian<Nullable<Offset16>>] {
        let range = self.shape.rule_set_offsets_byte_range();
        self.data.read_array(range).unwrap_or_default()
    }
}

impl<'a> SequenceContextFormat1<'a> {
    /// A dynamically resolving wrapper for the rule set offsets.
    pub fn seq_rule_sets(&self) -> ArrayOfNullableOffsets<'a, SequenceRuleSet<'a>, Offset16> {
        ArrayOfNullableOffsets::new(self.rule_set_offsets(), self.data, ())
    }
}

impl<'a> SequenceContextFormat2<'a> {
    /// Offset to ClassDef table, from beginning of SequenceContextFormat2 table
    pub fn class_def_offset(&self) -> Offset16 {
        self.field(4)
    }

    /// Attempt to resolve [`class_def_offset`][Self::class_def_offset].
    pub fn class_def(&self) -> Result<ClassDef<'a>, ReadError> {
        self.resolve_offset(self.class_def_offset())
    }

    /// A dynamically resolving wrapper for the class rule set offsets.
    pub fn class_seq_rule_sets(
        &self,
    ) -> ArrayOfNullableOffsets<'a, ClassSequenceRuleSet<'a>, Offset16> {
        ArrayOfNullableOffsets::new(self.rule_set_offsets(), self.data, ())
    }
}

/// Part of [SequenceContextFormat1] and [SequenceContextFormat2]
#[derive(Debug)]
#[doc(hidden)]
pub struct RuleSetMarker<R> {
    rule_offsets_byte_len: usize,
    rule_type: PhantomData<R>,
}

impl<R> RuleSetMarker<R> {
    pub fn rule_offsets_byte_range(&self) -> Range<usize> {
        2..2 + self.rule_offsets_byte_len
    }
}

impl<R> Clone for RuleSetMarker<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for RuleSetMarker<R> {}

impl<'a, R> FontRead<'a> for TableRef<'a, RuleSetMarker<R>> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let rule_count: u16 = cursor.read()?;
        let rule_offsets_byte_len = rule_count as usize * Offset16::RAW_BYTE_LEN;
        cursor.advance_by(rule_offsets_byte_len);
        cursor.finish(RuleSetMarker {
            rule_offsets_byte_len,
            rule_type: PhantomData,
        })
    }
}

/// A set of rules that share a first glyph (or class).
pub type RuleSet<'a, R> = TableRef<'a, RuleSetMarker<R>>;
/// Part of [SequenceContextFormat1]
pub type SequenceRuleSet<'a> = RuleSet<'a, SequenceRule<'a>>;
/// Part of [SequenceContextFormat2]
pub type ClassSequenceRuleSet<'a> = RuleSet<'a, ClassSequenceRule<'a>>;
/// Part of [ChainedSequenceContextFormat1]
pub type ChainedSequenceRuleSet<'a> = RuleSet<'a, ChainedSequenceRule<'a>>;
/// Part of [ChainedSequenceContextFormat2]
pub type ChainedClassSequenceRuleSet<'a> = RuleSet<'a, ChainedClassSequenceRule<'a>>;

impl<'a, R> RuleSet<'a, R> {
    /// Number of rules in this set
    pub fn rule_count(&self) -> u16 {
        self.field(0)
    }

    /// Array of offsets to rules, from beginning of the rule set table
    pub fn rule_offsets(&self) -> &'a [BigEndian<Offset16>] {
        let range = self.shape.rule_offsets_byte_range();
        self.data.read_array(range).unwrap_or_default()
    }

    /// A dynamically resolving wrapper for [`rule_offsets`][Self::rule_offsets].
    pub fn rules(&self) -> ArrayOfOffsets<'a, R, Offset16>
    where
        R: FontRead<'a>,
    {
        ArrayOfOffsets::new(self.rule_offsets(), self.data, ())
    }
}

/// A sequence rule, matching glyph ids (`T` = [`GlyphId16`]) or classes (`T` = `u16`).
#[derive(Debug)]
#[doc(hidden)]
pub struct SequenceRuleMarker<T> {
    input_sequence_byte_len: usize,
    seq_lookup_records_byte_len: usize,
    input_type: PhantomData<T>,
}

impl<T> SequenceRuleMarker<T> {
    pub fn input_sequence_byte_range(&self) -> Range<usize> {
        4..4 + self.input_sequence_byte_len
    }

    pub fn seq_lookup_records_byte_range(&self) -> Range<usize> {
        let start = self.input_sequence_byte_range().end;
        start..start + self.seq_lookup_records_byte_len
    }
}

impl<T> Clone for SequenceRuleMarker<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SequenceRuleMarker<T> {}

impl<'a, T> FontRead<'a> for TableRef<'a, SequenceRuleMarker<T>> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let glyph_count: u16 = cursor.read()?;
        let seq_lookup_count: u16 = cursor.read()?;
        // the first glyph of the input sequence is matched by the coverage table
        let input_sequence_byte_len = glyph_count.saturating_sub(1) as usize * u16::RAW_BYTE_LEN;
        cursor.advance_by(input_sequence_byte_len);
        let seq_lookup_records_byte_len =
            seq_lookup_count as usize * SequenceLookupRecord::RAW_BYTE_LEN;
        cursor.advance_by(seq_lookup_records_byte_len);
        cursor.finish(SequenceRuleMarker {
            input_sequence_byte_len,
            seq_lookup_records_byte_len,
            input_type: PhantomData,
        })
    }
}

/// Part of [SequenceContextFormat1]
pub type SequenceRule<'a> = TableRef<'a, SequenceRuleMarker<GlyphId16>>;
/// Part of [SequenceContextFormat2]
pub type ClassSequenceRule<'a> = TableRef<'a, SequenceRuleMarker<u16>>;

impl<'a, T: Scalar + Copy + 'static> TableRef<'a, SequenceRuleMarker<T>> {
    /// Number of glyphs in the input glyph sequence
    pub fn glyph_count(&self) -> u16 {
        self.field(0)
    }

    /// Number of SequenceLookupRecords
    pub fn seq_lookup_count(&self) -> u16 {
        self.field(2)
    }

    /// Array of input glyph IDs (or classes), starting with the second glyph
    pub fn input_sequence(&self) -> &'a [BigEndian<T>] {
        let range = self.shape.input_sequence_byte_range();
        self.data.read_array(range).unwrap_or_default()
    }

    /// Array of Sequence lookup records
    pub fn seq_lookup_records(&self) -> &'a [SequenceLookupRecord] {
        let range = self.shape.seq_lookup_records_byte_range();
        self.data.read_array(range).unwrap_or_default()
    }
}

/// [Sequence Context Format 3](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#sequence-context-format-3-coverage-based-glyph-contexts)
#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct SequenceContextFormat3Marker {
    coverage_offsets_byte_len: usize,
    seq_lookup_records_byte_len: usize,
}

impl SequenceContextFormat3Marker {
    pub fn coverage_offsets_byte_range(&self) -> Range<usize> {
        6..6 + self.coverage_offsets_byte_len
    }

    pub fn seq_lookup_records_byte_range(&self) -> Range<usize> {
        let start = self.coverage_offsets_byte_range().end;
        start..start + self.seq_lookup_records_byte_len
    }
}

impl Format<u16> for SequenceContextFormat3Marker {
    const FORMAT: u16 = 3;
}

impl<'a> FontRead<'a> for SequenceContextFormat3<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance::<u16>();
        let glyph_count: u16 = cursor.read()?;
        let seq_lookup_count: u16 = cursor.read()?;
        let coverage_offsets_byte_len = glyph_count as usize * Offset16::RAW_BYTE_LEN;
        cursor.advance_by(coverage_offsets_byte_len);
        let seq_lookup_records_byte_len =
            seq_lookup_count as usize * SequenceLookupRecord::RAW_BYTE_LEN;
        cursor.advance_by(seq_lookup_records_byte_len);
        cursor.finish(SequenceContextFormat3Marker {
            coverage_offsets_byte_len,
            seq_lookup_records_byte_len,
        })
    }
}

/// [Sequence Context Format 3](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#sequence-context-format-3-coverage-based-glyph-contexts)
pub type SequenceContextFormat3<'a> = TableRef<'a, SequenceContextFormat3Marker>;

impl<'a> SequenceContextFormat3<'a> {
    /// Format identifier: format = 3
    pub fn format(&self) -> u16 {
        self.field(0)
    }

    /// Number of glyphs in the input sequence
    pub fn glyph_count(&self) -> u16 {
        self.field(2)
    }

    /// Number of SequenceLookupRecords
    pub fn seq_lookup_count(&self) -> u16 {
        self.field(4)
    }

    /// Array of offsets to Coverage tables, from beginning of
    /// SequenceContextFormat3 subtable
    pub fn coverage_offsets(&self) -> &'a [BigEndian<Offset16>] {
        let range = self.shape.coverage_offsets_byte_range();
        self.data.read_array(range).unwrap_or_default()
    }

    /// A dynamically resolving wrapper for [`coverage_offsets`][Self::coverage_offsets].
    pub fn coverages(&self) -> ArrayOfOffsets<'a, CoverageTable<'a>, Offset16> {
        ArrayOfOffsets::new(self.coverage_offsets(), self.data, ())
    }

    /// Array of SequenceLookupRecords
    pub fn seq_lookup_records(&self) -> &'a [SequenceLookupRecord] {
        let range = self.shape.seq_lookup_records_byte_range();
        self.data.read_array(range).unwrap_or_default()
    }
}

/// [Sequence Context](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#sequence-context-format-1-simple-glyph-contexts)
#[derive(Clone, Copy, Debug)]
pub enum SequenceContext<'a> {
    Format1(SequenceContextFormat1<'a>),
    Format2(SequenceContextFormat2<'a>),
    Format3(SequenceContextFormat3<'a>),
}

impl<'a> FontRead<'a> for SequenceContext<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0usize)?;
        match format {
            1 => Ok(Self::Format1(FontRead::read(data)?)),
            2 => Ok(Self::Format2(FontRead::read(data)?)),
            SequenceContextFormat3Marker::FORMAT => Ok(Self::Format3(FontRead::read(data)?)),
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

/// [Chained Sequence Context Format 1](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#chained-sequence-context-format-1-simple-glyph-contexts)
/// and [Format 2](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#chained-sequence-context-format-2-class-based-glyph-contexts)
#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct ChainedSequenceContextMarker<const F: u16> {
    rule_set_offsets_byte_start: usize,
    rule_set_offsets_byte_len: usize,
}

impl<const F: u16> ChainedSequenceContextMarker<F> {
    pub fn rule_set_offsets_byte_range(&self) -> Range<usize> {
        let start = self.rule_set_offsets_byte_start;
        start..start + self.rule_set_offsets_byte_len
    }
}

impl<const F: u16> Format<u16> for ChainedSequenceContextMarker<F> {
    const FORMAT: u16 = F;
}

impl<'a, const F: u16> FontRead<'a> for TableRef<'a, ChainedSequenceContextMarker<F>> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance::<u16>();
        cursor.advance::<Offset16>();
        if F == 2 {
            // backtrack, input and lookahead class definitions
            cursor.advance::<Offset16>();
            cursor.advance::<Offset16>();
            cursor.advance::<Offset16>();
        }
        let rule_set_count: u16 = cursor.read()?;
        let rule_set_offsets_byte_start = cursor.position()?;
        let rule_set_offsets_byte_len = rule_set_count as usize * Offset16::RAW_BYTE_LEN;
        cursor.advance_by(rule_set_offsets_byte_len);
        cursor.finish(ChainedSequenceContextMarker {
            rule_set_offsets_byte_start,
            rule_set_offsets_byte_len,
        })
    }
}

/// [Chained Sequence Context Format 1](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#chained-sequence-context-format-1-simple-glyph-contexts)
pub type ChainedSequenceContextFormat1<'a> = TableRef<'a, ChainedSequenceContextMarker<1>>;
/// [Chained Sequence Context Format 2](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#chained-sequence-context-format-2-class-based-glyph-contexts)
pub type ChainedSequenceContextFormat2<'a> = TableRef<'a, ChainedSequenceContextMarker<2>>;

impl<'a, const F: u16> TableRef<'a, ChainedSequenceContextMarker<F>> {
    /// Format identifier
    pub fn format(&self) -> u16 {
        self.field(0)
    }

    /// Offset to Coverage table, from beginning of ChainSequenceContext table
    pub fn coverage_offset(&self) -> Offset16 {
        self.field(2)
    }

    /// Attempt to resolve [`coverage_offset`][Self::coverage_offset].
    pub fn coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.resolve_offset(self.coverage_offset())
    }

    /// Array of offsets to rule sets
    pub fn rule_set_offsets(&self) -> &'a [BigEndian<Nullable<Offset16>>] {
        let range = self.shape.rule_set_offsets_byte_range();
        self.data.read_array(range).unwrap_or_default()
    }
}

impl<'a> ChainedSequenceContextFormat1<'a> {
    /// A dynamically resolving wrapper for the rule set offsets.
    pub fn chained_seq_rule_sets(
        &self,
    ) -> ArrayOfNullableOffsets<'a, ChainedSequenceRuleSet<'a>, Offset16> {
        ArrayOfNullableOffsets::new(self.rule_set_offsets(), self.data, ())
    }
}

impl<'a> ChainedSequenceContextFormat2<'a> {
    /// Offset to ClassDef table containing backtrack sequence context
    pub fn backtrack_class_def_offset(&self) -> Offset16 {
        self.field(4)
    }

    /// Attempt to resolve [`backtrack_class_def_offset`][Self::backtrack_class_def_offset].
    pub fn backtrack_class_def(&self) -> Result<ClassDef<'a>, ReadError> {
        self.resolve_offset(self.backtrack_class_def_offset())
    }

    /// Offset to ClassDef table containing input sequence context
    pub fn input_class_def_offset(&self) -> Offset16 {
        self.field(6)
    }

    /// Attempt to resolve [`input_class_def_offset`][Self::input_class_def_offset].
    pub fn input_class_def(&self) -> Result<ClassDef<'a>, ReadError> {
        self.resolve_offset(self.input_class_def_offset())
    }

    /// Offset to ClassDef table containing lookahead sequence context
    pub fn lookahead_class_def_offset(&self) -> Offset16 {
        self.field(8)
    }

    /// Attempt to resolve [`lookahead_class_def_offset`][Self::lookahead_class_def_offset].
    pub fn lookahead_class_def(&self) -> Result<ClassDef<'a>, ReadError> {
        self.resolve_offset(self.lookahead_class_def_offset())
    }

    /// A dynamically resolving wrapper for the class rule set offsets.
    pub fn chained_class_seq_rule_sets(
        &self,
    ) -> ArrayOfNullableOffsets<'a, ChainedClassSequenceRuleSet<'a>, Offset16> {
        ArrayOfNullableOffsets::new(self.rule_set_offsets(), self.data, ())
    }
}

/// A chained sequence rule, matching glyph ids (`T` = [`GlyphId16`]) or classes (`T` = `u16`).
#[derive(Debug)]
#[doc(hidden)]
pub struct ChainedSequenceRuleMarker<T> {
    backtrack_sequence_byte_len: usize,
    input_sequence_byte_len: usize,
    lookahead_sequence_byte_len: usize,
    seq_lookup_records_byte_len: usize,
    input_type: PhantomData<T>,
}

impl<T> ChainedSequenceRuleMarker<T> {
    pub fn backtrack_sequence_byte_range(&self) -> Range<usize> {
        2..2 + self.backtrack_sequence_byte_len
    }

    pub fn input_glyph_count_byte_range(&self) -> Range<usize> {
        let start = self.backtrack_sequence_byte_range().end;
        start..start + u16::RAW_BYTE_LEN
    }

    pub fn input_sequence_byte_range(&self) -> Range<usize> {
        let start = self.input_glyph_count_byte_range().end;
        start..start + self.input_sequence_byte_len
    }

    pub fn lookahead_glyph_count_byte_range(&self) -> Range<usize> {
        let start = self.input_sequence_byte_range().end;
        start..start + u16::RAW_BYTE_LEN
    }

    pub fn lookahead_sequence_byte_range(&self) -> Range<usize> {
        let start = self.lookahead_glyph_count_byte_range().end;
        start..start + self.lookahead_sequence_byte_len
    }

    pub fn seq_lookup_count_byte_range(&self) -> Range<usize> {
        let start = self.lookahead_sequence_byte_range().end;
        start..start + u16::RAW_BYTE_LEN
    }

    pub fn seq_lookup_records_byte_range(&self) -> Range<usize> {
        let start = self.seq_lookup_count_byte_range().end;
        start..start + self.seq_lookup_records_byte_len
    }
}

impl<T> Clone for ChainedSequenceRuleMarker<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ChainedSequenceRuleMarker<T> {}

impl<'a, T> FontRead<'a> for TableRef<'a, ChainedSequenceRuleMarker<T>> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let backtrack_glyph_count: u16 = cursor.read()?;
        let backtrack_sequence_byte_len = backtrack_glyph_count as usize * u16::RAW_BYTE_LEN;
        cursor.advance_by(backtrack_sequence_byte_len);
        let input_glyph_count: u16 = cursor.read()?;
        let input_sequence_byte_len =
            input_glyph_count.saturating_sub(1) as usize * u16::RAW_BYTE_LEN;
        cursor.advance_by(input_sequence_byte_len);
        let lookahead_glyph_count: u16 = cursor.read()?;
        let lookahead_sequence_byte_len = lookahead_glyph_count as usize * u16::RAW_BYTE_LEN;
        cursor.advance_by(lookahead_sequence_byte_len);
        let seq_lookup_count: u16 = cursor.read()?;
        let seq_lookup_records_byte_len =
            seq_lookup_count as usize * SequenceLookupRecord::RAW_BYTE_LEN;
        cursor.advance_by(seq_lookup_records_byte_len);
        cursor.finish(ChainedSequenceRuleMarker {
            backtrack_sequence_byte_len,
            input_sequence_byte_len,
            lookahead_sequence_byte_len,
            seq_lookup_records_byte_len,
            input_type: PhantomData,
        })
    }
}

/// Part of [ChainedSequenceContextFormat1]
pub type ChainedSequenceRule<'a> = TableRef<'a, ChainedSequenceRuleMarker<GlyphId16>>;
/// Part of [ChainedSequenceContextFormat2]
pub type ChainedClassSequenceRule<'a> = TableRef<'a, ChainedSequenceRuleMarker<u16>>;

impl<'a, T: Scalar + Copy + 'static> TableRef<'a, ChainedSequenceRuleMarker<T>> {
    /// Number of glyphs in the backtrack sequence
    pub fn backtrack_glyph_count(&self) -> u16 {
        self.field(0)
    }

    /// Array of backtrack glyph IDs (or classes), in reverse logical order
    pub fn backtrack_sequence(&self) -> &'a [BigEndian<T>] {
        let range = self.shape.backtrack_sequence_byte_range();
        self.data.read_array(range).unwrap_or_default()
    }

    /// Number of glyphs in the input sequence
    pub fn input_glyph_count(&self) -> u16 {
        self.field(self.shape.input_glyph_count_byte_range().start)
    }

    /// Array of input glyph IDs (or classes), starting with the second glyph
    pub fn input_sequence(&self) -> &'a [BigEndian<T>] {
        let range = self.shape.input_sequence_byte_range();
        self.data.read_array(range).unwrap_or_default()
    }

    /// Number of glyphs in the lookahead sequence
    pub fn lookahead_glyph_count(&self) -> u16 {
        self.field(self.shape.lookahead_glyph_count_byte_range().start)
    }

    /// Array of lookahead glyph IDs (or classes)
    pub fn lookahead_sequence(&self) -> &'a [BigEndian<T>] {
        let range = self.shape.lookahead_sequence_byte_range();
        self.data.read_array(range).unwrap_or_default()
    }

    /// Number of SequenceLookupRecords
    pub fn seq_lookup_count(&self) -> u16 {
        self.field(self.shape.seq_lookup_count_byte_range().start)
    }

    /// Array of SequenceLookupRecords
    pub fn seq_lookup_records(&self) -> &'a [SequenceLookupRecord] {
        let range = self.shape.seq_lookup_records_byte_range();
        self.data.read_array(range).unwrap_or_default()
    }
}

/// [Chained Sequence Context Format 3](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#chained-sequence-context-format-3-coverage-based-glyph-contexts)
#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct ChainedSequenceContextFormat3Marker {
    backtrack_coverage_offsets_byte_len: usize,
    input_coverage_offsets_byte_len: usize,
    lookahead_coverage_offsets_byte_len: usize,
    seq_lookup_records_byte_len: usize,
}

impl ChainedSequenceContextFormat3Marker {
    pub fn backtrack_coverage_offsets_byte_range(&self) -> Range<usize> {
        4..4 + self.backtrack_coverage_offsets_byte_len
    }

    pub fn input_glyph_count_byte_range(&self) -> Range<usize> {
        let start = self.backtrack_coverage_offsets_byte_range().end;
        start..start + u16::RAW_BYTE_LEN
    }

    pub fn input_coverage_offsets_byte_range(&self) -> Range<usize> {
        let start = self.input_glyph_count_byte_range().end;
        start..start + self.input_coverage_offsets_byte_len
    }

    pub fn lookahead_glyph_count_byte_range(&self) -> Range<usize> {
        let start = self.input_coverage_offsets_byte_range().end;
        start..start + u16::RAW_BYTE_LEN
    }

    pub fn lookahead_coverage_offsets_byte_range(&self) -> Range<usize> {
        let start = self.lookahead_glyph_count_byte_range().end;
        start..start + self.lookahead_coverage_offsets_byte_len
    }

    pub fn seq_lookup_count_byte_range(&self) -> Range<usize> {
        let start = self.lookahead_coverage_offsets_byte_range().end;
        start..start + u16::RAW_BYTE_LEN
    }

    pub fn seq_lookup_records_byte_range(&self) -> Range<usize> {
        let start = self.seq_lookup_count_byte_range().end;
        start..start + self.seq_lookup_records_byte_len
    }
}

impl Format<u16> for ChainedSequenceContextFormat3Marker {
    const FORMAT: u16 = 3;
}

impl<'a> FontRead<'a> for ChainedSequenceContextFormat3<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance::<u16>();
        let backtrack_glyph_count: u16 = cursor.read()?;
        let backtrack_coverage_offsets_byte_len =
            backtrack_glyph_count as usize * Offset16::RAW_BYTE_LEN;
        cursor.advance_by(backtrack_coverage_offsets_byte_len);
        let input_glyph_count: u16 = cursor.read()?;
        let input_coverage_offsets_byte_len = input_glyph_count as usize * Offset16::RAW_BYTE_LEN;
        cursor.advance_by(input_coverage_offsets_byte_len);
        let lookahead_glyph_count: u16 = cursor.read()?;
        let lookahead_coverage_offsets_byte_len =
            lookahead_glyph_count as usize * Offset16::RAW_BYTE_LEN;
        cursor.advance_by(lookahead_coverage_offsets_byte_len);
        let seq_lookup_count: u16 = cursor.read()?;
        let seq_lookup_records_byte_len =
            seq_lookup_count as usize * SequenceLookupRecord::RAW_BYTE_LEN;
        cursor.advance_by(seq_lookup_records_byte_len);
        cursor.finish(ChainedSequenceContextFormat3Marker {
            backtrack_coverage_offsets_byte_len,
            input_coverage_offsets_byte_len,
            lookahead_coverage_offsets_byte_len,
            seq_lookup_records_byte_len,
        })
    }
}

/// [Chained Sequence Context Format 3](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#chained-sequence-context-format-3-coverage-based-glyph-contexts)
pub type ChainedSequenceContextFormat3<'a> = TableRef<'a, ChainedSequenceContextFormat3Marker>;

impl<'a> ChainedSequenceContextFormat3<'a> {
    /// Format identifier: format = 3
    pub fn format(&self) -> u16 {
        self.field(0)
    }

    /// Number of glyphs in the backtrack sequence
    pub fn backtrack_glyph_count(&self) -> u16 {
        self.field(2)
    }

    /// Array of offsets to coverage tables for the backtrack sequence
    pub fn backtrack_coverage_offsets(&self) -> &'a [BigEndian<Offset16>] {
        let range = self.shape.backtrack_coverage_offsets_byte_range();
        self.data.read_array(range).unwrap_or_default()
    }

    /// A dynamically resolving wrapper for [`backtrack_coverage_offsets`][Self::backtrack_coverage_offsets].
    pub fn backtrack_coverages(&self) -> ArrayOfOffsets<'a, CoverageTable<'a>, Offset16> {
        ArrayOfOffsets::new(self.backtrack_coverage_offsets(), self.data, ())
    }

    /// Number of glyphs in the input sequence
    pub fn input_glyph_count(&self) -> u16 {
        self.field(self.shape.input_glyph_count_byte_range().start)
    }

    /// Array of offsets to coverage tables for the input sequence
    pub fn input_coverage_offsets(&self) -> &'a [BigEndian<Offset16>] {
        let range = self.shape.input_coverage_offsets_byte_range();
        self.data.read_array(range).unwrap_or_default()
    }

    /// A dynamically resolving wrapper for [`input_coverage_offsets`][Self::input_coverage_offsets].
    pub fn input_coverages(&self) -> ArrayOfOffsets<'a, CoverageTable<'a>, Offset16> {
        ArrayOfOffsets::new(self.input_coverage_offsets(), self.data, ())
    }

    /// Number of glyphs in the lookahead sequence
    pub fn lookahead_glyph_count(&self) -> u16 {
        self.field(self.shape.lookahead_glyph_count_byte_range().start)
    }

    /// Array of offsets to coverage tables for the lookahead sequence
    pub fn lookahead_coverage_offsets(&self) -> &'a [BigEndian<Offset16>] {
        let range = self.shape.lookahead_coverage_offsets_byte_range();
        self.data.read_array(range).unwrap_or_default()
    }

    /// A dynamically resolving wrapper for [`lookahead_coverage_offsets`][Self::lookahead_coverage_offsets].
    pub fn lookahead_coverages(&self) -> ArrayOfOffsets<'a, CoverageTable<'a>, Offset16> {
        ArrayOfOffsets::new(self.lookahead_coverage_offsets(), self.data, ())
    }

    /// Number of SequenceLookupRecords
    pub fn seq_lookup_count(&self) -> u16 {
        self.field(self.shape.seq_lookup_count_byte_range().start)
    }

    /// Array of SequenceLookupRecords
    pub fn seq_lookup_records(&self) -> &'a [SequenceLookupRecord] {
        let range = self.shape.seq_lookup_records_byte_range();
        self.data.read_array(range).unwrap_or_default()
    }
}

/// [Chained Sequence Context](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#chained-sequence-context-format-1-simple-glyph-contexts)
#[derive(Clone, Copy, Debug)]
pub enum ChainedSequenceContext<'a> {
    Format1(ChainedSequenceContextFormat1<'a>),
    Format2(ChainedSequenceContextFormat2<'a>),
    Format3(ChainedSequenceContextFormat3<'a>),
}

impl<'a> FontRead<'a> for ChainedSequenceContext<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0usize)?;
        match format {
            1 => Ok(Self::Format1(FontRead::read(data)?)),
            2 => Ok(Self::Format2(FontRead::read(data)?)),
            ChainedSequenceContextFormat3Marker::FORMAT => {
                Ok(Self::Format3(FontRead::read(data)?))
            }
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}
