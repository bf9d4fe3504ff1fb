//! Resolving attachment chains into final offsets.
//!
//! Mark and cursive lookups do not position a glyph absolutely. They record
//! the glyph it is attached to as a relative index in
//! [`GlyphPosition::attach_chain`], and the offsets of the whole chain are
//! summed once all lookups have run. Chains are consumed as they are
//! followed, so every walk terminates even on malformed input.

use crate::buffer::{scratch_flags, AttachType, Buffer, Direction, GlyphPosition};

/// Prepare the buffer positions for a round of lookups.
pub fn position_start(buffer: &mut Buffer) {
    for pos in &mut buffer.pos {
        pos.attach_chain = 0;
        pos.attach_type = AttachType::None;
    }
}

/// Finish the advances once all lookups were applied.
///
/// Advances are final as computed; this only checks the attachment state.
pub fn position_finish_advances(buffer: &mut Buffer) {
    debug_assert!(buffer
        .pos
        .iter()
        .all(|pos| pos.attach_chain == 0 || pos.attach_type != AttachType::None));
}

/// Turn the attachment chains into offsets from each glyph's pen position.
pub fn position_finish_offsets(buffer: &mut Buffer) {
    if buffer.scratch_flags & scratch_flags::HAS_GPOS_ATTACHMENT == 0 {
        return;
    }
    let direction = buffer.direction;
    for i in 0..buffer.pos.len() {
        propagate_attachment_offsets(&mut buffer.pos, i, direction);
    }
}

fn chain_target(pos: &[GlyphPosition], i: usize) -> Option<usize> {
    i.checked_add_signed(pos[i].attach_chain as isize)
        .filter(|&j| j < pos.len())
}

/// Accumulate the offsets of every glyph on the chain starting at `i`.
///
/// Glyphs further down the chain are resolved first, so each glyph adds
/// the already final offset of its target.
pub(crate) fn propagate_attachment_offsets(
    pos: &mut [GlyphPosition],
    i: usize,
    direction: Direction,
) {
    let mut links = Vec::new();
    let mut cur = i;
    while pos[cur].attach_chain != 0 {
        let target = chain_target(pos, cur);
        let kind = pos[cur].attach_type;
        pos[cur].attach_chain = 0;
        let Some(target) = target else {
            break;
        };
        links.push((cur, target, kind));
        cur = target;
    }

    for &(i, j, kind) in links.iter().rev() {
        match kind {
            AttachType::None => {}
            AttachType::Cursive => {
                if direction.is_horizontal() {
                    pos[i].y_offset += pos[j].y_offset;
                } else {
                    pos[i].x_offset += pos[j].x_offset;
                }
            }
            AttachType::Mark => {
                pos[i].x_offset += pos[j].x_offset;
                pos[i].y_offset += pos[j].y_offset;
                // make the offset relative to the mark's own pen position
                let between = if direction.is_forward() {
                    j..i
                } else {
                    j + 1..i + 1
                };
                let (dx, dy) = pos
                    .get(between)
                    .unwrap_or_default()
                    .iter()
                    .fold((0, 0), |(dx, dy), p| (dx + p.x_advance, dy + p.y_advance));
                if direction.is_forward() {
                    pos[i].x_offset -= dx;
                    pos[i].y_offset -= dy;
                } else {
                    pos[i].x_offset += dx;
                    pos[i].y_offset += dy;
                }
            }
        }
    }
}

/// Reverse the cursive chain starting at `i`, so that `new_parent` can
/// become its root.
///
/// Each glyph on the old chain becomes attached to the glyph that was
/// attached to it, taking over the opposite of its cross offset. The walk
/// stops at the end of the chain or on reaching `new_parent`.
pub(crate) fn reverse_cursive_minor_offset(
    pos: &mut [GlyphPosition],
    i: usize,
    direction: Direction,
    new_parent: usize,
) {
    let mut links = Vec::new();
    let mut cur = i;
    loop {
        let chain = pos[cur].attach_chain;
        if chain == 0 || pos[cur].attach_type != AttachType::Cursive {
            break;
        }
        let target = chain_target(pos, cur);
        pos[cur].attach_chain = 0;
        let Some(target) = target.filter(|&j| j != new_parent) else {
            break;
        };
        links.push((cur, target, chain));
        cur = target;
    }

    for &(i, j, chain) in links.iter().rev() {
        if direction.is_horizontal() {
            pos[j].y_offset = -pos[i].y_offset;
        } else {
            pos[j].x_offset = -pos[i].x_offset;
        }
        pos[j].attach_chain = -chain;
        pos[j].attach_type = AttachType::Cursive;
    }
}
