//! Positioning marks from glyph extents, for fonts without mark lookups.

use crate::{
    buffer::{Buffer, Direction, GeneralCategory, GlyphPosition},
    font::{FontService, GlyphExtents},
};

/// Modified combining classes that determine where a mark is placed.
pub mod combining_class {
    pub const ATTACHED_BELOW_LEFT: u8 = 200;
    pub const ATTACHED_BELOW: u8 = 202;
    pub const ATTACHED_ABOVE: u8 = 214;
    pub const ATTACHED_ABOVE_RIGHT: u8 = 216;
    pub const BELOW_LEFT: u8 = 218;
    pub const BELOW: u8 = 220;
    pub const BELOW_RIGHT: u8 = 222;
    pub const LEFT: u8 = 224;
    pub const RIGHT: u8 = 226;
    pub const ABOVE_LEFT: u8 = 228;
    pub const ABOVE: u8 = 230;
    pub const ABOVE_RIGHT: u8 = 232;
    pub const DOUBLE_BELOW: u8 = 233;
    pub const DOUBLE_ABOVE: u8 = 234;
}

use combining_class as ccc;

/// Zero the advance of a glyph, optionally keeping its ink in place.
pub(crate) fn zero_advance(pos: &mut GlyphPosition, adjust_offsets: bool) {
    if adjust_offsets {
        pos.x_offset -= pos.x_advance;
        pos.y_offset -= pos.y_advance;
    }
    pos.x_advance = 0;
    pos.y_advance = 0;
}

/// Zero the advances of the non-spacing marks in `start..end`.
///
/// With `adjust_offsets`, each mark is moved back by its former advance so
/// that its ink stays where it was.
pub fn zero_mark_advances(buffer: &mut Buffer, start: usize, end: usize, adjust_offsets: bool) {
    let end = end.min(buffer.len());
    if start >= end {
        return;
    }
    for (info, pos) in buffer.info[start..end]
        .iter()
        .zip(&mut buffer.pos[start..end])
    {
        if info.general_category() == GeneralCategory::NonspacingMark {
            zero_advance(pos, adjust_offsets);
        }
    }
}

/// Place combining marks around their base using glyph extents and the
/// marks' combining classes.
///
/// A cluster is a glyph that is not a Unicode mark together with the marks
/// that follow it.
pub fn position_fallback_marks(font: &dyn FontService, buffer: &mut Buffer, adjust_offsets: bool) {
    let mut start = 0;
    for i in 1..buffer.len() {
        if !buffer.info[i].is_unicode_mark() {
            position_cluster(font, buffer, start, i, adjust_offsets);
            start = i;
        }
    }
    position_cluster(font, buffer, start, buffer.len(), adjust_offsets);
}

fn position_cluster(
    font: &dyn FontService,
    buffer: &mut Buffer,
    start: usize,
    end: usize,
    adjust_offsets: bool,
) {
    if end.saturating_sub(start) < 2 {
        return;
    }
    let mut i = start;
    while i < end {
        if buffer.info[i].is_unicode_mark() {
            i += 1;
            continue;
        }
        let marks_end = (i + 1..end)
            .find(|&j| !buffer.info[j].is_unicode_mark())
            .unwrap_or(end);
        position_around_base(font, buffer, i, marks_end, adjust_offsets);
        i = marks_end;
    }
}

fn position_around_base(
    font: &dyn FontService,
    buffer: &mut Buffer,
    base: usize,
    end: usize,
    adjust_offsets: bool,
) {
    buffer.unsafe_to_break(base, end);

    let base_info = buffer.info[base];
    let Some(mut base_extents) = font.glyph_extents(base_info.glyph_id) else {
        zero_mark_advances(buffer, base + 1, end, adjust_offsets);
        return;
    };
    base_extents.y_bearing += buffer.pos[base].y_offset;
    // the advance places marks better than the ink, and works for empty glyphs
    base_extents.x_bearing = 0;
    base_extents.width = font.glyph_h_advance(base_info.glyph_id);

    let lig_id = base_info.lig_id();
    let num_lig_components = base_info.lig_num_comps() as i32;

    let direction = buffer.direction;
    let (mut x_offset, mut y_offset) = (0, 0);
    if direction.is_forward() {
        x_offset -= buffer.pos[base].x_advance;
        y_offset -= buffer.pos[base].y_advance;
    }

    // vertical text lays ligature components out left to right
    let components_rtl = direction == Direction::RightToLeft;
    let mut component_extents = base_extents;
    let mut cluster_extents = base_extents;
    let mut last_lig_component = -1;
    let mut last_combining_class = 255;

    for i in base + 1..end {
        let info = buffer.info[i];
        let combining_class = info.modified_combining_class();
        if combining_class == 0 {
            let pos = &buffer.pos[i];
            if direction.is_forward() {
                x_offset -= pos.x_advance;
                y_offset -= pos.y_advance;
            } else {
                x_offset += pos.x_advance;
                y_offset += pos.y_advance;
            }
            continue;
        }

        if num_lig_components > 1 {
            let mut component = info.lig_comp() as i32 - 1;
            if lig_id == 0 || lig_id != info.lig_id() || component >= num_lig_components {
                component = num_lig_components - 1;
            }
            if last_lig_component != component {
                last_lig_component = component;
                last_combining_class = 255;
                component_extents = base_extents;
                let slot = if components_rtl {
                    num_lig_components - 1 - component
                } else {
                    component
                };
                component_extents.x_bearing += slot * component_extents.width / num_lig_components;
                component_extents.width /= num_lig_components;
            }
        }

        if last_combining_class != combining_class {
            last_combining_class = combining_class;
            cluster_extents = component_extents;
        }

        let y_gap = font.units_per_em() as i32 / 16;
        let pos = &mut buffer.pos[i];
        if let Some(mark_extents) = font.glyph_extents(info.glyph_id) {
            position_mark(
                &mut cluster_extents,
                &mark_extents,
                combining_class,
                direction,
                y_gap,
                pos,
            );
        }
        pos.x_advance = 0;
        pos.y_advance = 0;
        pos.x_offset += x_offset;
        pos.y_offset += y_offset;
    }
}

/// Place one mark against `base`, growing `base` to cover the mark so
/// that the next mark of the same class stacks on top of it.
fn position_mark(
    base: &mut GlyphExtents,
    mark: &GlyphExtents,
    combining_class: u8,
    direction: Direction,
    y_gap: i32,
    pos: &mut GlyphPosition,
) {
    pos.y_offset = 0;
    // left and right marks are centered like any other unknown class
    pos.x_offset = match combining_class {
        ccc::DOUBLE_BELOW | ccc::DOUBLE_ABOVE if direction == Direction::LeftToRight => {
            base.x_bearing + base.width - mark.width / 2 - mark.x_bearing
        }
        ccc::DOUBLE_BELOW | ccc::DOUBLE_ABOVE if direction == Direction::RightToLeft => {
            base.x_bearing - mark.width / 2 - mark.x_bearing
        }
        ccc::ATTACHED_BELOW_LEFT | ccc::BELOW_LEFT | ccc::ABOVE_LEFT => {
            base.x_bearing - mark.x_bearing
        }
        ccc::ATTACHED_ABOVE_RIGHT | ccc::BELOW_RIGHT | ccc::ABOVE_RIGHT => {
            base.x_bearing + base.width - mark.width - mark.x_bearing
        }
        _ => base.x_bearing + (base.width - mark.width) / 2 - mark.x_bearing,
    };

    match combining_class {
        ccc::DOUBLE_BELOW
        | ccc::BELOW_LEFT
        | ccc::BELOW
        | ccc::BELOW_RIGHT
        | ccc::ATTACHED_BELOW_LEFT
        | ccc::ATTACHED_BELOW => {
            if combining_class != ccc::ATTACHED_BELOW_LEFT && combining_class != ccc::ATTACHED_BELOW
            {
                base.height -= y_gap;
            }
            pos.y_offset = base.y_bearing + base.height - mark.y_bearing;
            // below marks never move up
            if (y_gap > 0) == (pos.y_offset > 0) {
                base.height -= pos.y_offset;
                pos.y_offset = 0;
            }
            base.height += mark.height;
        }
        ccc::DOUBLE_ABOVE
        | ccc::ABOVE_LEFT
        | ccc::ABOVE
        | ccc::ABOVE_RIGHT
        | ccc::ATTACHED_ABOVE
        | ccc::ATTACHED_ABOVE_RIGHT => {
            if combining_class != ccc::ATTACHED_ABOVE
                && combining_class != ccc::ATTACHED_ABOVE_RIGHT
            {
                base.y_bearing += y_gap;
                base.height -= y_gap;
            }
            pos.y_offset = base.y_bearing - (mark.y_bearing + mark.height);
            // above marks only move down by half their overlap
            if (y_gap > 0) != (pos.y_offset > 0) {
                let correction = -pos.y_offset / 2;
                base.y_bearing += correction;
                base.height -= correction;
                pos.y_offset += correction;
            }
            base.y_bearing -= mark.height;
            base.height += mark.height;
        }
        _ => {}
    }
}
