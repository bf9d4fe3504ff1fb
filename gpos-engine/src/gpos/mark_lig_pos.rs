//! impl apply() for MarkLigPosFormat1 subtable

use read_gpos::tables::{gpos::MarkLigPosFormat1, layout::LookupFlag};

use super::mark_array::apply_mark;
use crate::{
    apply::{Apply, ApplyContext, Traced},
    skippy::SkippyIter,
};

impl Apply for MarkLigPosFormat1<'_> {
    fn apply(&self, ctx: &mut ApplyContext) -> Option<()> {
        let mark = *ctx.buffer.cur();
        let mark_index = self
            .mark_coverage()
            .traced("mark coverage")?
            .get(mark.glyph_id)?;

        let mut iter = SkippyIter::new(ctx, ctx.buffer.idx, 1, false);
        iter.set_lookup_props(LookupFlag::IGNORE_MARKS.to_props());
        if !iter.prev() {
            return None;
        }
        let lig = iter.index();

        let lig_info = ctx.buffer.info[lig];
        let lig_index = self
            .ligature_coverage()
            .traced("ligature coverage")?
            .get(lig_info.glyph_id)?;
        let lig_attach = self
            .ligature_array()
            .traced("ligature array")?
            .ligature_attaches()
            .get(lig_index as usize)
            .traced("ligature attach")?;

        let comp_count = lig_attach.row_count();
        if comp_count == 0 {
            return None;
        }
        // a mark that was part of this ligature goes on its own component,
        // anything else goes on the last one
        let lig_id = lig_info.lig_id();
        let mark_id = mark.lig_id();
        let mark_comp = mark.lig_comp() as u16;
        let comp_index = if lig_id != 0 && lig_id == mark_id && mark_comp > 0 {
            comp_count.min(mark_comp) - 1
        } else {
            comp_count - 1
        };

        let marks = self.mark_array().traced("mark array")?;
        apply_mark(ctx, &marks, mark_index, &lig_attach, comp_index, lig)
    }
}
