//! Deep structural validation of layout tables
//!
//! [`FontRead`] only checks that a table's own fields and arrays are in
//! bounds; offsets are resolved lazily. [`Sanitize`] walks every offset
//! reachable from a table so that a table which passes can be used without
//! encountering a malformed subtable later.
//!
//! Unknown subtable, anchor and device formats are accepted: they are
//! treated as no-ops when applied.

use crate::prelude::*;
use crate::tables::gdef::{Gdef, MarkGlyphSets};
use crate::tables::gpos::{
    AnchorMatrix, AnchorTable, CursivePosFormat1, ExtensionPosFormat1, Gpos, LigatureArray,
    MarkArray, MarkBasePosFormat1, MarkLigPosFormat1, MarkMarkPosFormat1, PairPos,
    PairPosFormat1, PairPosFormat2, PairSet, PositionLookup, PositionSubtables, SinglePos,
    ValueFormat, ValueRecord, EXTENSION_LOOKUP_TYPE,
};
use crate::tables::layout::{
    ChainedSequenceContext, ClassDef, CoverageTable, DeviceOrVariationIndex, ExtensionLookup,
    RuleSet, SequenceContext, Subtables,
};

/// A table that can be checked for structural validity.
pub trait Sanitize {
    /// Check this table and every table reachable from it.
    fn sanitize(&self) -> Result<(), ReadError>;
}

impl<T: Sanitize> Sanitize for Result<T, ReadError> {
    fn sanitize(&self) -> Result<(), ReadError> {
        match self {
            Ok(table) => table.sanitize(),
            Err(e) => Err(e.clone()),
        }
    }
}

// a null offset is always valid
impl<T: Sanitize> Sanitize for Option<T> {
    fn sanitize(&self) -> Result<(), ReadError> {
        match self {
            Some(table) => table.sanitize(),
            None => Ok(()),
        }
    }
}

fn allow_unknown_format(result: Result<(), ReadError>) -> Result<(), ReadError> {
    match result {
        Err(ReadError::InvalidFormat(_)) => Ok(()),
        other => other,
    }
}

impl Sanitize for CoverageTable<'_> {
    fn sanitize(&self) -> Result<(), ReadError> {
        Ok(())
    }
}

impl Sanitize for ClassDef<'_> {
    fn sanitize(&self) -> Result<(), ReadError> {
        Ok(())
    }
}

impl Sanitize for DeviceOrVariationIndex<'_> {
    fn sanitize(&self) -> Result<(), ReadError> {
        Ok(())
    }
}

fn sanitize_device(
    device: Option<Result<DeviceOrVariationIndex, ReadError>>,
) -> Result<(), ReadError> {
    allow_unknown_format(device.sanitize())
}

fn sanitize_value_record(record: &ValueRecord, data: FontData) -> Result<(), ReadError> {
    sanitize_device(record.x_placement_device(data))?;
    sanitize_device(record.y_placement_device(data))?;
    sanitize_device(record.x_advance_device(data))?;
    sanitize_device(record.y_advance_device(data))
}

impl Sanitize for AnchorTable<'_> {
    fn sanitize(&self) -> Result<(), ReadError> {
        sanitize_device(self.x_device())?;
        sanitize_device(self.y_device())
    }
}

fn sanitize_anchor(anchor: Option<Result<AnchorTable, ReadError>>) -> Result<(), ReadError> {
    allow_unknown_format(anchor.sanitize())
}

impl Sanitize for SinglePos<'_> {
    fn sanitize(&self) -> Result<(), ReadError> {
        self.coverage().sanitize()?;
        let data = self.offset_data();
        match self {
            Self::Format1(table) => sanitize_value_record(&table.value_record(), data),
            Self::Format2(table) => {
                for record in table.value_records()?.iter() {
                    sanitize_value_record(&record?, data)?;
                }
                Ok(())
            }
        }
    }
}

impl Sanitize for PairSet<'_> {
    fn sanitize(&self) -> Result<(), ReadError> {
        let data = self.offset_data();
        for record in self.pair_value_records()?.iter() {
            let record = record?;
            sanitize_value_record(record.value_record1(), data)?;
            sanitize_value_record(record.value_record2(), data)?;
        }
        Ok(())
    }
}

impl Sanitize for PairPosFormat1<'_> {
    fn sanitize(&self) -> Result<(), ReadError> {
        self.coverage().sanitize()?;
        for pair_set in self.pair_sets().iter() {
            pair_set.sanitize()?;
        }
        Ok(())
    }
}

impl Sanitize for PairPosFormat2<'_> {
    fn sanitize(&self) -> Result<(), ReadError> {
        self.coverage().sanitize()?;
        self.class_def1().sanitize()?;
        self.class_def2().sanitize()?;
        let data = self.offset_data();
        let has_devices = (self.value_format1() | self.value_format2())
            .intersects(ValueFormat::ANY_DEVICE_OR_VARIDX);
        for class1 in 0..self.class1_count() {
            for class2 in 0..self.class2_count() {
                let [record1, record2] = self.values(class1, class2)?;
                if has_devices {
                    sanitize_value_record(&record1, data)?;
                    sanitize_value_record(&record2, data)?;
                }
            }
        }
        Ok(())
    }
}

impl Sanitize for PairPos<'_> {
    fn sanitize(&self) -> Result<(), ReadError> {
        match self {
            Self::Format1(table) => table.sanitize(),
            Self::Format2(table) => table.sanitize(),
        }
    }
}

impl Sanitize for CursivePosFormat1<'_> {
    fn sanitize(&self) -> Result<(), ReadError> {
        self.coverage().sanitize()?;
        let data = self.offset_data();
        for record in self.entry_exit_record() {
            sanitize_anchor(record.entry_anchor(data))?;
            sanitize_anchor(record.exit_anchor(data))?;
        }
        Ok(())
    }
}

impl Sanitize for MarkArray<'_> {
    fn sanitize(&self) -> Result<(), ReadError> {
        let data = self.offset_data();
        for record in self.mark_records() {
            sanitize_anchor(Some(record.mark_anchor(data)))?;
        }
        Ok(())
    }
}

impl Sanitize for AnchorMatrix<'_> {
    fn sanitize(&self) -> Result<(), ReadError> {
        let data = self.offset_data();
        for offset in self.anchor_offsets() {
            sanitize_anchor(offset.get().resolve(data))?;
        }
        Ok(())
    }
}

impl Sanitize for LigatureArray<'_> {
    fn sanitize(&self) -> Result<(), ReadError> {
        for attach in self.ligature_attaches().iter() {
            attach.sanitize()?;
        }
        Ok(())
    }
}

impl Sanitize for MarkBasePosFormat1<'_> {
    fn sanitize(&self) -> Result<(), ReadError> {
        self.mark_coverage().sanitize()?;
        self.base_coverage().sanitize()?;
        self.mark_array().sanitize()?;
        self.base_array().sanitize()
    }
}

impl Sanitize for MarkLigPosFormat1<'_> {
    fn sanitize(&self) -> Result<(), ReadError> {
        self.mark_coverage().sanitize()?;
        self.ligature_coverage().sanitize()?;
        self.mark_array().sanitize()?;
        self.ligature_array().sanitize()
    }
}

impl Sanitize for MarkMarkPosFormat1<'_> {
    fn sanitize(&self) -> Result<(), ReadError> {
        self.mark1_coverage().sanitize()?;
        self.mark2_coverage().sanitize()?;
        self.mark1_array().sanitize()?;
        self.mark2_array().sanitize()
    }
}

// reading a rule validates its sequences and lookup records
impl<'a, R: FontRead<'a>> Sanitize for RuleSet<'a, R> {
    fn sanitize(&self) -> Result<(), ReadError> {
        for rule in self.rules().iter() {
            rule?;
        }
        Ok(())
    }
}

impl Sanitize for SequenceContext<'_> {
    fn sanitize(&self) -> Result<(), ReadError> {
        match self {
            Self::Format1(table) => {
                table.coverage().sanitize()?;
                for rule_set in table.seq_rule_sets().iter() {
                    rule_set.sanitize()?;
                }
            }
            Self::Format2(table) => {
                table.coverage().sanitize()?;
                table.class_def().sanitize()?;
                for rule_set in table.class_seq_rule_sets().iter() {
                    rule_set.sanitize()?;
                }
            }
            Self::Format3(table) => {
                for coverage in table.coverages().iter() {
                    coverage.sanitize()?;
                }
            }
        }
        Ok(())
    }
}

impl Sanitize for ChainedSequenceContext<'_> {
    fn sanitize(&self) -> Result<(), ReadError> {
        match self {
            Self::Format1(table) => {
                table.coverage().sanitize()?;
                for rule_set in table.chained_seq_rule_sets().iter() {
                    rule_set.sanitize()?;
                }
            }
            Self::Format2(table) => {
                table.coverage().sanitize()?;
                table.backtrack_class_def().sanitize()?;
                table.input_class_def().sanitize()?;
                table.lookahead_class_def().sanitize()?;
                for rule_set in table.chained_class_seq_rule_sets().iter() {
                    rule_set.sanitize()?;
                }
            }
            Self::Format3(table) => {
                let coverages = table
                    .backtrack_coverages()
                    .iter()
                    .chain(table.input_coverages().iter())
                    .chain(table.lookahead_coverages().iter());
                for coverage in coverages {
                    coverage.sanitize()?;
                }
            }
        }
        Ok(())
    }
}

impl<'a, T, Ext> Sanitize for Subtables<'a, T, Ext>
where
    T: FontRead<'a> + Sanitize,
    Ext: ExtensionLookup<'a, T>,
{
    fn sanitize(&self) -> Result<(), ReadError> {
        for subtable in self.iter() {
            allow_unknown_format(subtable.sanitize())?;
        }
        Ok(())
    }
}

impl Sanitize for PositionSubtables<'_> {
    fn sanitize(&self) -> Result<(), ReadError> {
        match self {
            PositionSubtables::Single(subtables) => subtables.sanitize(),
            PositionSubtables::Pair(subtables) => subtables.sanitize(),
            PositionSubtables::Cursive(subtables) => subtables.sanitize(),
            PositionSubtables::MarkToBase(subtables) => subtables.sanitize(),
            PositionSubtables::MarkToLig(subtables) => subtables.sanitize(),
            PositionSubtables::MarkToMark(subtables) => subtables.sanitize(),
            PositionSubtables::Contextual(subtables) => subtables.sanitize(),
            PositionSubtables::ChainContextual(subtables) => subtables.sanitize(),
        }
    }
}

impl Sanitize for PositionLookup<'_> {
    fn sanitize(&self) -> Result<(), ReadError> {
        if self.lookup_type() == EXTENSION_LOOKUP_TYPE {
            // every extension subtable must wrap the same, non-extension type
            let expected = self.effective_lookup_type()?;
            let data = self.raw().offset_data();
            for offset in self.raw().subtable_offsets() {
                let ext: ExtensionPosFormat1<()> = offset.get().resolve(data)?;
                let lookup_type = ext.extension_lookup_type();
                if lookup_type == EXTENSION_LOOKUP_TYPE || lookup_type != expected {
                    return Err(ReadError::MalformedData(
                        "inconsistent extension lookup types",
                    ));
                }
            }
        }
        self.subtables()?.sanitize()
    }
}

impl Sanitize for MarkGlyphSets<'_> {
    fn sanitize(&self) -> Result<(), ReadError> {
        for coverage in self.coverages().iter() {
            coverage.sanitize()?;
        }
        Ok(())
    }
}

impl Sanitize for Gdef<'_> {
    fn sanitize(&self) -> Result<(), ReadError> {
        self.glyph_class_def().sanitize()?;
        self.mark_attach_class_def().sanitize()?;
        self.mark_glyph_sets_def().sanitize()
    }
}

impl Sanitize for Gpos<'_> {
    fn sanitize(&self) -> Result<(), ReadError> {
        for lookup in self.lookup_list()?.lookups().iter() {
            lookup.sanitize()?;
        }
        Ok(())
    }
}

impl Gpos<'_> {
    /// Validate a single lookup, by index into the lookup list.
    pub fn sanitize_lookup(&self, index: u16) -> Result<(), ReadError> {
        self.lookup_list()?
            .lookups()
            .get(index as usize)
            .sanitize()
    }
}
