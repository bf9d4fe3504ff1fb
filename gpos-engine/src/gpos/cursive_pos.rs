//! impl apply() for CursivePosFormat1 subtable

use read_gpos::tables::{gpos::CursivePosFormat1, layout::LookupFlag};

use super::anchor::ResolveAnchor;
use crate::{
    apply::{Apply, ApplyContext, Traced},
    attach::reverse_cursive_minor_offset,
    buffer::{scratch_flags, AttachType, Direction},
    skippy::SkippyIter,
};

impl Apply for CursivePosFormat1<'_> {
    fn apply(&self, ctx: &mut ApplyContext) -> Option<()> {
        let coverage = self.coverage().traced("cursive coverage")?;
        let records = self.entry_exit_record();
        let data = self.offset_data();

        let j = ctx.buffer.idx;
        let this_glyph = ctx.buffer.info[j].glyph_id;
        let this_record = records.get(coverage.get(this_glyph)? as usize)?;
        let entry = this_record.entry_anchor(data)?.traced("entry anchor")?;

        let mut iter = SkippyIter::new(ctx, j, 1, false);
        if !iter.prev() {
            return None;
        }
        let i = iter.index();
        let prev_glyph = ctx.buffer.info[i].glyph_id;
        let prev_record = records.get(coverage.get(prev_glyph)? as usize)?;
        let exit = prev_record.exit_anchor(data)?.traced("exit anchor")?;
        let distance = i16::try_from(j - i).ok()?;

        ctx.buffer.unsafe_to_break(i, j + 1);
        let (exit_x, exit_y) = exit.resolve(ctx.font, prev_glyph);
        let (entry_x, entry_y) = entry.resolve(ctx.font, this_glyph);

        let direction = ctx.direction;
        let pos = &mut ctx.buffer.pos;
        match direction {
            Direction::LeftToRight => {
                pos[i].x_advance = exit_x.round() as i32 + pos[i].x_offset;
                let d = entry_x.round() as i32 + pos[j].x_offset;
                pos[j].x_advance -= d;
                pos[j].x_offset -= d;
            }
            Direction::RightToLeft => {
                let d = exit_x.round() as i32 + pos[i].x_offset;
                pos[i].x_advance -= d;
                pos[i].x_offset -= d;
                pos[j].x_advance = entry_x.round() as i32 + pos[j].x_offset;
            }
            Direction::TopToBottom => {
                pos[i].y_advance = exit_y.round() as i32 + pos[i].y_offset;
                let d = entry_y.round() as i32 + pos[j].y_offset;
                pos[j].y_advance -= d;
                pos[j].y_offset -= d;
            }
            Direction::BottomToTop => {
                let d = exit_y.round() as i32 + pos[i].y_offset;
                pos[i].y_advance -= d;
                pos[i].y_offset -= d;
                pos[j].y_advance = entry_y.round() as i32;
            }
        }

        // the glyph that is not the cursive root gets the cross offset
        let mut child = i;
        let mut parent = j;
        let mut chain = distance;
        let mut x_offset = (entry_x - exit_x).round() as i32;
        let mut y_offset = (entry_y - exit_y).round() as i32;
        if ctx.lookup_props & LookupFlag::RIGHT_TO_LEFT.to_props() == 0 {
            std::mem::swap(&mut child, &mut parent);
            chain = -chain;
            x_offset = -x_offset;
            y_offset = -y_offset;
        }

        reverse_cursive_minor_offset(pos, child, direction, parent);

        pos[child].attach_type = AttachType::Cursive;
        pos[child].attach_chain = chain;
        if direction.is_horizontal() {
            pos[child].y_offset = y_offset;
        } else {
            pos[child].x_offset = x_offset;
        }

        // never leave two glyphs attached to each other
        if pos[parent].attach_chain == -pos[child].attach_chain {
            pos[parent].attach_chain = 0;
            if direction.is_horizontal() {
                pos[parent].y_offset = 0;
            } else {
                pos[parent].x_offset = 0;
            }
        }

        ctx.buffer.scratch_flags |= scratch_flags::HAS_GPOS_ATTACHMENT;
        ctx.buffer.idx += 1;
        Some(())
    }
}
