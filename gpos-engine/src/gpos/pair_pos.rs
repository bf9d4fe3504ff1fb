//! impl apply() for PairPos subtable

use read_gpos::{
    tables::gpos::{PairPos, ValueRecord},
    FontData,
};

use super::value_record::ApplyValue;
use crate::{
    apply::{Apply, ApplyContext, Traced},
    skippy::SkippyIter,
};

impl Apply for PairPos<'_> {
    fn apply(&self, ctx: &mut ApplyContext) -> Option<()> {
        let first = ctx.buffer.idx;
        let first_glyph = ctx.buffer.info[first].glyph_id;
        let coverage_index = self.coverage().traced("pair pos coverage")?.get(first_glyph)?;

        let mut iter = SkippyIter::new(ctx, first, 1, false);
        if !iter.next() {
            return None;
        }
        let second = iter.index();
        let second_glyph = ctx.buffer.info[second].glyph_id;

        match self {
            PairPos::Format1(table) => {
                let pair_set = table
                    .pair_sets()
                    .get(coverage_index as usize)
                    .traced("pair set")?;
                let record = pair_set.find(second_glyph)?.traced("pair value record")?;
                apply_pair(
                    ctx,
                    [record.value_record1(), record.value_record2()],
                    pair_set.offset_data(),
                    second,
                );
            }
            PairPos::Format2(table) => {
                let class1 = table.class_def1().traced("class def 1")?.get(first_glyph);
                let class2 = table.class_def2().traced("class def 2")?.get(second_glyph);
                if class1 >= table.class1_count() || class2 >= table.class2_count() {
                    return None;
                }
                let [record1, record2] = table.values(class1, class2).traced("class values")?;
                apply_pair(ctx, [&record1, &record2], table.offset_data(), second);
            }
        }

        // the second glyph is consumed only when it was positioned too
        ctx.buffer.idx = if self.value_format2().is_empty() {
            second
        } else {
            second + 1
        };
        Some(())
    }
}

fn apply_pair(ctx: &mut ApplyContext, records: [&ValueRecord; 2], data: FontData, second: usize) {
    let first = ctx.buffer.idx;
    let changed1 = records[0].apply_value(
        ctx.font,
        ctx.direction,
        data,
        &mut ctx.buffer.pos[first],
    );
    let changed2 = records[1].apply_value(
        ctx.font,
        ctx.direction,
        data,
        &mut ctx.buffer.pos[second],
    );
    if changed1 | changed2 {
        ctx.buffer.unsafe_to_break(first, second + 1);
    }
}
