//! impl apply() for SinglePos subtable

use read_gpos::tables::gpos::SinglePos;

use super::value_record::ApplyValue;
use crate::apply::{Apply, ApplyContext, Traced};

impl Apply for SinglePos<'_> {
    fn apply(&self, ctx: &mut ApplyContext) -> Option<()> {
        let idx = ctx.buffer.idx;
        let glyph = ctx.buffer.info[idx].glyph_id;
        let coverage_index = self.coverage().traced("single pos coverage")?.get(glyph)?;
        let record = self
            .value_record(coverage_index)
            .traced("single pos value record")?;
        record.apply_value(
            ctx.font,
            ctx.direction,
            self.offset_data(),
            &mut ctx.buffer.pos[idx],
        );
        ctx.buffer.idx += 1;
        Some(())
    }
}
