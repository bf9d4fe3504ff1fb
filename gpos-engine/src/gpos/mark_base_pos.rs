//! impl apply() for MarkBasePosFormat1 subtable

use read_gpos::tables::{gpos::MarkBasePosFormat1, layout::LookupFlag};

use super::mark_array::apply_mark;
use crate::{
    apply::{Apply, ApplyContext, Traced},
    skippy::SkippyIter,
};

impl Apply for MarkBasePosFormat1<'_> {
    fn apply(&self, ctx: &mut ApplyContext) -> Option<()> {
        let glyph = ctx.buffer.cur().glyph_id;
        let mark_index = self.mark_coverage().traced("mark coverage")?.get(glyph)?;

        // find the base, skipping marks
        let mut iter = SkippyIter::new(ctx, ctx.buffer.idx, 1, false);
        iter.set_lookup_props(LookupFlag::IGNORE_MARKS.to_props());
        loop {
            if !iter.prev() {
                return None;
            }
            // only attach to the first of the glyphs produced by a multiple
            // substitution, unless a mark sits between them
            let j = iter.index();
            let info = &ctx.buffer.info;
            if !info[j].is_multiplied()
                || info[j].lig_comp() == 0
                || j == 0
                || info[j - 1].is_mark()
                || info[j].lig_id() != info[j - 1].lig_id()
                || info[j].lig_comp() != info[j - 1].lig_comp() + 1
            {
                break;
            }
            iter.reject();
        }
        let base = iter.index();

        let base_glyph = ctx.buffer.info[base].glyph_id;
        let base_index = self.base_coverage().traced("base coverage")?.get(base_glyph)?;
        let marks = self.mark_array().traced("mark array")?;
        let bases = self.base_array().traced("base array")?;
        apply_mark(ctx, &marks, mark_index, &bases, base_index, base)
    }
}
