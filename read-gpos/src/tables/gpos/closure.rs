//! support closure for GPOS

use super::{
    AnchorMatrix, AnchorTable, CursivePosFormat1, Gpos, MarkArray, MarkBasePosFormat1,
    MarkLigPosFormat1, MarkMarkPosFormat1, PairPos, PairPosFormat1, PairPosFormat2, PairSet,
    PositionLookup, PositionLookupList, PositionSubtables, SinglePos, ValueFormat, ValueRecord,
};
use crate::collections::IntSet;
use crate::prelude::*;
use crate::tables::layout::{
    CollectGlyphs, CoverageTable, DeviceOrVariationIndex, ExtensionLookup, GlyphCollection,
    Intersect, LookupClosure, LookupClosureCtx, Subtables,
};

impl Gpos<'_> {
    /// Update the set of lookup indices with all lookups reachable from
    /// specified glyph set and lookup_indices.
    pub fn closure_lookups(
        &self,
        glyphs: &IntSet<GlyphId>,
        lookup_indices: &mut IntSet<u16>,
    ) -> Result<(), ReadError> {
        let lookup_list = self.lookup_list()?;
        lookup_list.closure_lookups(glyphs, lookup_indices)
    }

    /// Collect the variation indices referenced by every lookup, restricted
    /// to data reachable from `glyphs`.
    pub fn collect_variation_indices(
        &self,
        glyphs: &IntSet<GlyphId>,
        varidx_set: &mut IntSet<u32>,
    ) -> Result<(), ReadError> {
        for lookup in self.lookup_list()?.lookups().iter() {
            lookup?.collect_variation_indices(glyphs, varidx_set)?;
        }
        Ok(())
    }
}

impl PositionLookupList<'_> {
    /// Add every lookup reachable from `lookup_indices` through contextual
    /// lookups, then remove lookups that cannot apply to `glyph_set`.
    pub fn closure_lookups(
        &self,
        glyph_set: &IntSet<GlyphId>,
        lookup_indices: &mut IntSet<u16>,
    ) -> Result<(), ReadError> {
        let mut c = LookupClosureCtx::new(glyph_set);

        let lookups = self.lookups();
        for idx in lookup_indices.iter() {
            let lookup = lookups.get(idx as usize)?;
            lookup.closure_lookups(&mut c, idx)?;
        }
        while let Some(idx) = c.pop_pending() {
            // nested references past the end of the list are ignored
            let Ok(lookup) = lookups.get(idx as usize) else {
                continue;
            };
            lookup.closure_lookups(&mut c, idx)?;
        }

        lookup_indices.union(c.visited_lookups());
        lookup_indices.subtract(c.inactive_lookups());
        Ok(())
    }
}

impl LookupClosure for PositionLookup<'_> {
    fn closure_lookups(
        &self,
        c: &mut LookupClosureCtx,
        lookup_index: u16,
    ) -> Result<(), ReadError> {
        if !c.should_visit_lookup(lookup_index) {
            return Ok(());
        }

        if !self.intersects(c.glyphs())? {
            c.set_lookup_inactive(lookup_index);
            return Ok(());
        }

        self.subtables()?.closure_lookups(c, lookup_index)
    }
}

impl Intersect for PositionLookup<'_> {
    fn intersects(&self, glyph_set: &IntSet<GlyphId>) -> Result<bool, ReadError> {
        self.subtables()?.intersects(glyph_set)
    }
}

impl CollectGlyphs for PositionLookup<'_> {
    fn collect_glyphs(&self, c: &mut GlyphCollection) -> Result<(), ReadError> {
        self.subtables()?.collect_glyphs(c)
    }
}

impl LookupClosure for PositionSubtables<'_> {
    fn closure_lookups(&self, c: &mut LookupClosureCtx, arg: u16) -> Result<(), ReadError> {
        match self {
            PositionSubtables::Contextual(subtables) => subtables.closure_lookups(c, arg),
            PositionSubtables::ChainContextual(subtables) => subtables.closure_lookups(c, arg),
            _ => Ok(()),
        }
    }
}

impl Intersect for PositionSubtables<'_> {
    fn intersects(&self, glyph_set: &IntSet<GlyphId>) -> Result<bool, ReadError> {
        match self {
            PositionSubtables::Single(subtables) => subtables.intersects(glyph_set),
            PositionSubtables::Pair(subtables) => subtables.intersects(glyph_set),
            PositionSubtables::Cursive(subtables) => subtables.intersects(glyph_set),
            PositionSubtables::MarkToBase(subtables) => subtables.intersects(glyph_set),
            PositionSubtables::MarkToLig(subtables) => subtables.intersects(glyph_set),
            PositionSubtables::MarkToMark(subtables) => subtables.intersects(glyph_set),
            PositionSubtables::Contextual(subtables) => subtables.intersects(glyph_set),
            PositionSubtables::ChainContextual(subtables) => subtables.intersects(glyph_set),
        }
    }
}

impl CollectGlyphs for PositionSubtables<'_> {
    fn collect_glyphs(&self, c: &mut GlyphCollection) -> Result<(), ReadError> {
        match self {
            PositionSubtables::Single(subtables) => subtables.collect_glyphs(c),
            PositionSubtables::Pair(subtables) => subtables.collect_glyphs(c),
            PositionSubtables::Cursive(subtables) => subtables.collect_glyphs(c),
            PositionSubtables::MarkToBase(subtables) => subtables.collect_glyphs(c),
            PositionSubtables::MarkToLig(subtables) => subtables.collect_glyphs(c),
            PositionSubtables::MarkToMark(subtables) => subtables.collect_glyphs(c),
            PositionSubtables::Contextual(subtables) => subtables.collect_glyphs(c),
            PositionSubtables::ChainContextual(subtables) => subtables.collect_glyphs(c),
        }
    }
}

impl Intersect for SinglePos<'_> {
    fn intersects(&self, glyph_set: &IntSet<GlyphId>) -> Result<bool, ReadError> {
        Ok(self.coverage()?.intersects(glyph_set))
    }
}

impl CollectGlyphs for SinglePos<'_> {
    fn collect_glyphs(&self, c: &mut GlyphCollection) -> Result<(), ReadError> {
        c.input.extend(self.coverage()?.iter());
        Ok(())
    }
}

impl Intersect for PairPos<'_> {
    fn intersects(&self, glyph_set: &IntSet<GlyphId>) -> Result<bool, ReadError> {
        match self {
            Self::Format1(item) => item.intersects(glyph_set),
            Self::Format2(item) => item.intersects(glyph_set),
        }
    }
}

impl Intersect for PairPosFormat1<'_> {
    fn intersects(&self, glyph_set: &IntSet<GlyphId>) -> Result<bool, ReadError> {
        let coverage = self.coverage()?;
        let pair_sets = self.pair_sets();

        let num_pair_sets = self.pair_set_count();
        let num_bits = 16 - num_pair_sets.leading_zeros();
        // probe from the glyph set side when it is much smaller
        if num_pair_sets as u64 > glyph_set.len() as u64 * num_bits as u64 {
            for g in glyph_set.iter() {
                let Some(i) = coverage.get(g) else {
                    continue;
                };

                let pair_set = pair_sets.get(i as usize)?;
                if pair_set.intersects(glyph_set)? {
                    return Ok(true);
                }
            }
        } else {
            for (g, pair_set) in coverage.iter().zip(pair_sets.iter()) {
                if !glyph_set.contains(g) {
                    continue;
                }
                if pair_set?.intersects(glyph_set)? {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}

impl Intersect for PairSet<'_> {
    fn intersects(&self, glyph_set: &IntSet<GlyphId>) -> Result<bool, ReadError> {
        for record in self.pair_value_records()?.iter() {
            let second_glyph = record?.second_glyph();
            if glyph_set.contains(GlyphId::from(second_glyph)) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl Intersect for PairPosFormat2<'_> {
    fn intersects(&self, glyph_set: &IntSet<GlyphId>) -> Result<bool, ReadError> {
        Ok(self.coverage()?.intersects(glyph_set) && self.class_def2()?.intersects(glyph_set))
    }
}

impl CollectGlyphs for PairPos<'_> {
    fn collect_glyphs(&self, c: &mut GlyphCollection) -> Result<(), ReadError> {
        c.input.extend(self.coverage()?.iter());
        match self {
            Self::Format1(table) => {
                for pair_set in table.pair_sets().iter() {
                    for record in pair_set?.pair_value_records()?.iter() {
                        c.input.insert(record?.second_glyph().into());
                    }
                }
            }
            Self::Format2(table) => {
                let class_def2 = table.class_def2()?;
                for class in 1..table.class2_count() {
                    class_def2.collect_glyphs_for_class(class, &mut c.input);
                }
            }
        }
        Ok(())
    }
}

impl Intersect for CursivePosFormat1<'_> {
    fn intersects(&self, glyph_set: &IntSet<GlyphId>) -> Result<bool, ReadError> {
        Ok(self.coverage()?.intersects(glyph_set))
    }
}

impl CollectGlyphs for CursivePosFormat1<'_> {
    fn collect_glyphs(&self, c: &mut GlyphCollection) -> Result<(), ReadError> {
        c.input.extend(self.coverage()?.iter());
        Ok(())
    }
}

impl Intersect for MarkBasePosFormat1<'_> {
    fn intersects(&self, glyph_set: &IntSet<GlyphId>) -> Result<bool, ReadError> {
        Ok(self.mark_coverage()?.intersects(glyph_set)
            && self.base_coverage()?.intersects(glyph_set))
    }
}

impl Intersect for MarkLigPosFormat1<'_> {
    fn intersects(&self, glyph_set: &IntSet<GlyphId>) -> Result<bool, ReadError> {
        Ok(self.mark_coverage()?.intersects(glyph_set)
            && self.ligature_coverage()?.intersects(glyph_set))
    }
}

impl Intersect for MarkMarkPosFormat1<'_> {
    fn intersects(&self, glyph_set: &IntSet<GlyphId>) -> Result<bool, ReadError> {
        Ok(self.mark1_coverage()?.intersects(glyph_set)
            && self.mark2_coverage()?.intersects(glyph_set))
    }
}

impl CollectGlyphs for MarkBasePosFormat1<'_> {
    fn collect_glyphs(&self, c: &mut GlyphCollection) -> Result<(), ReadError> {
        c.input.extend(self.mark_coverage()?.iter());
        c.input.extend(self.base_coverage()?.iter());
        Ok(())
    }
}

impl CollectGlyphs for MarkLigPosFormat1<'_> {
    fn collect_glyphs(&self, c: &mut GlyphCollection) -> Result<(), ReadError> {
        c.input.extend(self.mark_coverage()?.iter());
        c.input.extend(self.ligature_coverage()?.iter());
        Ok(())
    }
}

impl CollectGlyphs for MarkMarkPosFormat1<'_> {
    fn collect_glyphs(&self, c: &mut GlyphCollection) -> Result<(), ReadError> {
        c.input.extend(self.mark1_coverage()?.iter());
        c.input.extend(self.mark2_coverage()?.iter());
        Ok(())
    }
}

/// A trait for GPOS tables that can reference [`VariationIndex`] tables.
///
/// The combined `(outer << 16) | inner` index of every variation index table
/// reachable from a glyph in the set is added to `varidx_set`.
///
/// [`VariationIndex`]: crate::tables::layout::VariationIndex
pub trait CollectVariationIndices {
    fn collect_variation_indices(
        &self,
        glyphs: &IntSet<GlyphId>,
        varidx_set: &mut IntSet<u32>,
    ) -> Result<(), ReadError>;
}

fn collect_device(
    device: Option<Result<DeviceOrVariationIndex, ReadError>>,
    varidx_set: &mut IntSet<u32>,
) -> Result<(), ReadError> {
    match device {
        Some(Ok(DeviceOrVariationIndex::VariationIndex(table))) => {
            varidx_set.insert(table.var_idx());
            Ok(())
        }
        Some(Err(ReadError::InvalidFormat(_))) | Some(Ok(_)) | None => Ok(()),
        Some(Err(e)) => Err(e),
    }
}

fn collect_value_record(
    record: &ValueRecord,
    data: FontData,
    varidx_set: &mut IntSet<u32>,
) -> Result<(), ReadError> {
    collect_device(record.x_placement_device(data), varidx_set)?;
    collect_device(record.y_placement_device(data), varidx_set)?;
    collect_device(record.x_advance_device(data), varidx_set)?;
    collect_device(record.y_advance_device(data), varidx_set)
}

fn collect_anchor(
    anchor: Option<Result<AnchorTable, ReadError>>,
    varidx_set: &mut IntSet<u32>,
) -> Result<(), ReadError> {
    match anchor {
        Some(Ok(anchor)) => {
            collect_device(anchor.x_device(), varidx_set)?;
            collect_device(anchor.y_device(), varidx_set)
        }
        Some(Err(ReadError::InvalidFormat(_))) | None => Ok(()),
        Some(Err(e)) => Err(e),
    }
}

impl CollectVariationIndices for PositionLookup<'_> {
    fn collect_variation_indices(
        &self,
        glyphs: &IntSet<GlyphId>,
        varidx_set: &mut IntSet<u32>,
    ) -> Result<(), ReadError> {
        match self.subtables()? {
            PositionSubtables::Single(subtables) => {
                subtables.collect_variation_indices(glyphs, varidx_set)
            }
            PositionSubtables::Pair(subtables) => {
                subtables.collect_variation_indices(glyphs, varidx_set)
            }
            PositionSubtables::Cursive(subtables) => {
                subtables.collect_variation_indices(glyphs, varidx_set)
            }
            PositionSubtables::MarkToBase(subtables) => {
                subtables.collect_variation_indices(glyphs, varidx_set)
            }
            PositionSubtables::MarkToLig(subtables) => {
                subtables.collect_variation_indices(glyphs, varidx_set)
            }
            PositionSubtables::MarkToMark(subtables) => {
                subtables.collect_variation_indices(glyphs, varidx_set)
            }
            // contextual lookups only reference other lookups
            PositionSubtables::Contextual(_) | PositionSubtables::ChainContextual(_) => Ok(()),
        }
    }
}

impl<'a, T, Ext> CollectVariationIndices for Subtables<'a, T, Ext>
where
    T: FontRead<'a> + CollectVariationIndices,
    Ext: ExtensionLookup<'a, T>,
{
    fn collect_variation_indices(
        &self,
        glyphs: &IntSet<GlyphId>,
        varidx_set: &mut IntSet<u32>,
    ) -> Result<(), ReadError> {
        for subtable in self.iter() {
            subtable?.collect_variation_indices(glyphs, varidx_set)?;
        }
        Ok(())
    }
}

impl CollectVariationIndices for SinglePos<'_> {
    fn collect_variation_indices(
        &self,
        glyphs: &IntSet<GlyphId>,
        varidx_set: &mut IntSet<u32>,
    ) -> Result<(), ReadError> {
        let coverage = self.coverage()?;
        let data = self.offset_data();
        match self {
            Self::Format1(table) => {
                if table.value_format().intersects(ValueFormat::ANY_DEVICE_OR_VARIDX)
                    && coverage.intersects(glyphs)
                {
                    collect_value_record(&table.value_record(), data, varidx_set)?;
                }
            }
            Self::Format2(table) => {
                if !table.value_format().intersects(ValueFormat::ANY_DEVICE_OR_VARIDX) {
                    return Ok(());
                }
                let records = table.value_records()?;
                for (_, idx) in coverage.iter_in(glyphs) {
                    // coverage may list more glyphs than there are records
                    let Ok(record) = records.get(idx as usize) else {
                        continue;
                    };
                    collect_value_record(&record, data, varidx_set)?;
                }
            }
        }
        Ok(())
    }
}

impl CollectVariationIndices for PairPos<'_> {
    fn collect_variation_indices(
        &self,
        glyphs: &IntSet<GlyphId>,
        varidx_set: &mut IntSet<u32>,
    ) -> Result<(), ReadError> {
        let formats = self.value_format1() | self.value_format2();
        if !formats.intersects(ValueFormat::ANY_DEVICE_OR_VARIDX) {
            return Ok(());
        }
        match self {
            Self::Format1(table) => {
                let coverage = table.coverage()?;
                for (gid, pair_set) in coverage.iter().zip(table.pair_sets().iter()) {
                    if !glyphs.contains(gid) {
                        continue;
                    }
                    let pair_set = pair_set?;
                    let data = pair_set.offset_data();
                    for record in pair_set.pair_value_records()?.iter() {
                        let record = record?;
                        if !glyphs.contains(record.second_glyph().into()) {
                            continue;
                        }
                        collect_value_record(record.value_record1(), data, varidx_set)?;
                        collect_value_record(record.value_record2(), data, varidx_set)?;
                    }
                }
            }
            Self::Format2(table) => {
                let covered = table.coverage()?.intersect_set(glyphs);
                let class1s = table.class_def1()?.intersect_classes(&covered);
                let class2s = table.class_def2()?.intersect_classes(glyphs);
                let data = table.offset_data();
                for class1 in class1s.iter() {
                    for class2 in class2s.iter() {
                        let Ok([record1, record2]) = table.values(class1, class2) else {
                            continue;
                        };
                        collect_value_record(&record1, data, varidx_set)?;
                        collect_value_record(&record2, data, varidx_set)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl CollectVariationIndices for CursivePosFormat1<'_> {
    fn collect_variation_indices(
        &self,
        glyphs: &IntSet<GlyphId>,
        varidx_set: &mut IntSet<u32>,
    ) -> Result<(), ReadError> {
        let records = self.entry_exit_record();
        let data = self.offset_data();
        for (_, idx) in self.coverage()?.iter_in(glyphs) {
            let Some(record) = records.get(idx as usize) else {
                continue;
            };
            collect_anchor(record.entry_anchor(data), varidx_set)?;
            collect_anchor(record.exit_anchor(data), varidx_set)?;
        }
        Ok(())
    }
}

/// Collect the anchors of the covered marks in `glyphs`, returning their
/// mark classes.
fn collect_mark_anchors(
    coverage: &CoverageTable,
    mark_array: &MarkArray,
    glyphs: &IntSet<GlyphId>,
    varidx_set: &mut IntSet<u32>,
) -> Result<IntSet<u16>, ReadError> {
    let mut classes = IntSet::empty();
    let records = mark_array.mark_records();
    let data = mark_array.offset_data();
    for (_, idx) in coverage.iter_in(glyphs) {
        let Some(record) = records.get(idx as usize) else {
            continue;
        };
        classes.insert(record.mark_class());
        collect_anchor(Some(record.mark_anchor(data)), varidx_set)?;
    }
    Ok(classes)
}

fn collect_matrix_anchors(
    matrix: &AnchorMatrix,
    row: u16,
    classes: &IntSet<u16>,
    varidx_set: &mut IntSet<u32>,
) -> Result<(), ReadError> {
    for class in classes.iter() {
        collect_anchor(matrix.anchor(row, class), varidx_set)?;
    }
    Ok(())
}

impl CollectVariationIndices for MarkBasePosFormat1<'_> {
    fn collect_variation_indices(
        &self,
        glyphs: &IntSet<GlyphId>,
        varidx_set: &mut IntSet<u32>,
    ) -> Result<(), ReadError> {
        let classes =
            collect_mark_anchors(&self.mark_coverage()?, &self.mark_array()?, glyphs, varidx_set)?;
        let base_array = self.base_array()?;
        for (_, idx) in self.base_coverage()?.iter_in(glyphs) {
            collect_matrix_anchors(&base_array, idx, &classes, varidx_set)?;
        }
        Ok(())
    }
}

impl CollectVariationIndices for MarkLigPosFormat1<'_> {
    fn collect_variation_indices(
        &self,
        glyphs: &IntSet<GlyphId>,
        varidx_set: &mut IntSet<u32>,
    ) -> Result<(), ReadError> {
        let classes =
            collect_mark_anchors(&self.mark_coverage()?, &self.mark_array()?, glyphs, varidx_set)?;
        let attaches = self.ligature_array()?.ligature_attaches();
        for (_, idx) in self.ligature_coverage()?.iter_in(glyphs) {
            let Ok(attach) = attaches.get(idx as usize) else {
                continue;
            };
            for component in 0..attach.row_count() {
                collect_matrix_anchors(&attach, component, &classes, varidx_set)?;
            }
        }
        Ok(())
    }
}

impl CollectVariationIndices for MarkMarkPosFormat1<'_> {
    fn collect_variation_indices(
        &self,
        glyphs: &IntSet<GlyphId>,
        varidx_set: &mut IntSet<u32>,
    ) -> Result<(), ReadError> {
        let classes = collect_mark_anchors(
            &self.mark1_coverage()?,
            &self.mark1_array()?,
            glyphs,
            varidx_set,
        )?;
        let mark2_array = self.mark2_array()?;
        for (_, idx) in self.mark2_coverage()?.iter_in(glyphs) {
            collect_matrix_anchors(&mark2_array, idx, &classes, varidx_set)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpos_test_data::gpos::{self as test_data, TestLookup};

    fn glyphs(ids: &[u32]) -> IntSet<GlyphId> {
        ids.iter().copied().map(GlyphId::new).collect()
    }

    #[test]
    fn pair_pos_intersects_needs_both_glyphs() {
        let table = PairPos::read(test_data::PAIRPOSFORMAT1.into()).unwrap();
        assert!(table.intersects(&glyphs(&[0x2D, 0x59])).unwrap());
        assert!(!table.intersects(&glyphs(&[0x2D])).unwrap());
        assert!(!table.intersects(&glyphs(&[0x59])).unwrap());

        let table = PairPos::read(test_data::PAIRPOSFORMAT2.into()).unwrap();
        assert!(table.intersects(&glyphs(&[0x46, 0x6A])).unwrap());
        assert!(!table.intersects(&glyphs(&[0x46, 0x50])).unwrap());
    }

    #[test]
    fn mark_base_collects_both_coverages() {
        let table = MarkBasePosFormat1::read(test_data::MARKBASEPOSFORMAT1.into()).unwrap();
        let mut c = GlyphCollection::default();
        table.collect_glyphs(&mut c).unwrap();
        assert_eq!(c.input, glyphs(&[0x190, 0x333, 0x33F]));
        assert!(c.before.is_empty());
        assert!(c.after.is_empty());
    }

    #[test]
    fn closure_drops_lookups_that_cannot_apply() {
        let gpos = test_data::gpos_with_lookups(&[
            TestLookup::new(1, [test_data::SINGLEPOSFORMAT1.to_vec()]),
            TestLookup::new(2, [test_data::PAIRPOSFORMAT1.to_vec()]),
        ]);
        let gpos = Gpos::read(gpos.as_slice().into()).unwrap();
        let mut lookups = IntSet::from([0u16, 1]);
        gpos.closure_lookups(&glyphs(&[0x1B3]), &mut lookups).unwrap();
        assert_eq!(lookups.iter().collect::<Vec<_>>(), [0]);
    }

    #[test]
    fn closure_follows_contextual_lookups() {
        // context format 3: one input glyph (0x1B3), apply lookup 1 at index 0
        let context = gpos_test_data::bebuffer::BeBuffer::new()
            .push(3u16) // format
            .push(1u16) // glyph count
            .push(1u16) // seq lookup count
            .push(12u16) // coverage offset
            .push(0u16) // sequence index
            .push(1u16) // lookup index
            .push(1u16) // coverage format
            .push(1u16)
            .push(0x1B3u16);
        let gpos = test_data::gpos_with_lookups(&[
            TestLookup::new(7, [context.into_vec()]),
            TestLookup::new(1, [test_data::SINGLEPOSFORMAT1.to_vec()]),
        ]);
        let gpos = Gpos::read(gpos.as_slice().into()).unwrap();
        let lookup_list: PositionLookupList = gpos.lookup_list().unwrap();
        let mut lookups = IntSet::from([0u16]);
        lookup_list
            .closure_lookups(&glyphs(&[0x1B3]), &mut lookups)
            .unwrap();
        assert_eq!(lookups.iter().collect::<Vec<_>>(), [0, 1]);
    }

    #[test]
    fn variation_indices_only_for_intersecting_glyphs() {
        // single pos format 1 for glyph 7 with an x advance variation index
        let single = gpos_test_data::bebuffer::BeBuffer::new()
            .push(1u16) // format
            .push(8u16) // coverage offset
            .push(0x0040u16) // value format: x advance device
            .push(14u16) // device offset
            .push(1u16) // coverage format
            .push(1u16)
            .push(7u16)
            .push(2u16) // outer index
            .push(5u16) // inner index
            .push(0x8000u16);
        let table = SinglePos::read(single.as_slice().into()).unwrap();

        let mut varidx = IntSet::empty();
        table
            .collect_variation_indices(&glyphs(&[8]), &mut varidx)
            .unwrap();
        assert!(varidx.is_empty());

        table
            .collect_variation_indices(&glyphs(&[7]), &mut varidx)
            .unwrap();
        assert_eq!(varidx.iter().collect::<Vec<_>>(), [(2 << 16) | 5]);
    }

    #[test]
    fn devices_are_not_variation_indices() {
        let table = SinglePos::read(test_data::VALUEFORMATTABLE.into()).unwrap();
        let mut varidx = IntSet::empty();
        table
            .collect_variation_indices(&glyphs(&[0x3A]), &mut varidx)
            .unwrap();
        assert!(varidx.is_empty());
    }
}
