//! Attaching a mark to an anchor of a previous glyph

use read_gpos::tables::gpos::{AnchorMatrix, MarkArray};

use super::anchor::ResolveAnchor;
use crate::{
    apply::{ApplyContext, Traced},
    buffer::{scratch_flags, AttachType},
};

/// Attach the current glyph, mark `mark_index`, to `row` of `anchors`.
///
/// `glyph_pos` is the buffer position of the glyph that owns `row`. Fails
/// when that glyph has no anchor for the mark's class.
pub(crate) fn apply_mark(
    ctx: &mut ApplyContext,
    marks: &MarkArray,
    mark_index: u16,
    anchors: &AnchorMatrix,
    row: u16,
    glyph_pos: usize,
) -> Option<()> {
    let (mark_class, mark_anchor) = marks.mark(mark_index).traced("mark record")?;
    let base_anchor = anchors.anchor(row, mark_class)?.traced("base anchor")?;

    let idx = ctx.buffer.idx;
    let distance = i16::try_from(idx.checked_sub(glyph_pos)?).ok()?;
    ctx.buffer.unsafe_to_break(glyph_pos, idx + 1);

    let (mark_x, mark_y) = mark_anchor.resolve(ctx.font, ctx.buffer.info[idx].glyph_id);
    let (base_x, base_y) = base_anchor.resolve(ctx.font, ctx.buffer.info[glyph_pos].glyph_id);

    let pos = &mut ctx.buffer.pos[idx];
    pos.x_offset = (base_x - mark_x).round() as i32;
    pos.y_offset = (base_y - mark_y).round() as i32;
    pos.attach_type = AttachType::Mark;
    pos.attach_chain = -distance;

    ctx.buffer.scratch_flags |= scratch_flags::HAS_GPOS_ATTACHMENT;
    ctx.buffer.idx += 1;
    Some(())
}
