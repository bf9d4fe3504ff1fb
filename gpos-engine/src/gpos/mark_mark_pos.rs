//! impl apply() for MarkMarkPosFormat1 subtable

use read_gpos::tables::{gpos::MarkMarkPosFormat1, layout::LookupFlag};

use super::mark_array::apply_mark;
use crate::{
    apply::{Apply, ApplyContext, Traced},
    skippy::SkippyIter,
};

impl Apply for MarkMarkPosFormat1<'_> {
    fn apply(&self, ctx: &mut ApplyContext) -> Option<()> {
        let mark1 = *ctx.buffer.cur();
        let mark1_index = self
            .mark1_coverage()
            .traced("mark1 coverage")?
            .get(mark1.glyph_id)?;

        // the previous mark, honouring everything but the ignore flags
        let mut iter = SkippyIter::new(ctx, ctx.buffer.idx, 1, false);
        iter.set_lookup_props(ctx.lookup_props & !(LookupFlag::IGNORE_FLAGS.to_props()));
        if !iter.prev() {
            return None;
        }
        let j = iter.index();
        let mark2 = ctx.buffer.info[j];
        if !mark2.is_mark() {
            return None;
        }

        let (id1, comp1) = (mark1.lig_id(), mark1.lig_comp());
        let (id2, comp2) = (mark2.lig_id(), mark2.lig_comp());
        let same_component = if id1 == id2 {
            // same base, or same component of the same ligature
            id1 == 0 || comp1 == comp2
        } else {
            // one of the marks is itself ligated
            (id1 > 0 && comp1 == 0) || (id2 > 0 && comp2 == 0)
        };
        if !same_component {
            return None;
        }

        let mark2_index = self
            .mark2_coverage()
            .traced("mark2 coverage")?
            .get(mark2.glyph_id)?;
        let marks = self.mark1_array().traced("mark1 array")?;
        let mark2_anchors = self.mark2_array().traced("mark2 array")?;
        apply_mark(ctx, &marks, mark1_index, &mark2_anchors, mark2_index, j)
    }
}
