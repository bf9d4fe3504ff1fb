//! Loading a GPOS table and applying its lookups to a buffer.

mod anchor;
mod context;
mod cursive_pos;
mod mark_array;
mod mark_base_pos;
mod mark_lig_pos;
mod mark_mark_pos;
mod pair_pos;
mod single_pos;
mod value_record;

#[cfg(test)]
mod tests;

use read_gpos::{
    collections::IntSet,
    tables::{
        gdef::Gdef,
        gpos::{Gpos, PositionLookup, PositionLookupList},
    },
    FontData, FontRead, Sanitize,
};

use crate::{
    apply::{apply_forward, ApplyContext},
    attach::{position_finish_advances, position_finish_offsets, position_start},
    buffer::Buffer,
    error::PositionError,
    fallback::{position_fallback_marks, zero_advance},
    font::FontService,
    glyph_props::set_glyph_props_from_gdef,
    plan::{PositionPlan, ZeroWidthMarks},
};

/// A validated GPOS table.
///
/// Every lookup is sanitized when the table is loaded. Lookups that fail
/// are disabled: they never apply, either directly or from a contextual
/// lookup.
#[derive(Clone)]
pub struct GposTable<'a> {
    gpos: Gpos<'a>,
    lookups: PositionLookupList<'a>,
    disabled: IntSet<u16>,
}

impl<'a> GposTable<'a> {
    /// Parse and validate a GPOS table.
    ///
    /// Fails only if the header or the lookup list cannot be read.
    pub fn new(data: &'a [u8]) -> Result<Self, PositionError> {
        let gpos = Gpos::read(FontData::new(data)).map_err(|e| {
            log::debug!("rejecting GPOS table: {e}");
            e
        })?;
        let lookups = gpos.lookup_list().map_err(|e| {
            log::debug!("rejecting GPOS table, bad lookup list: {e}");
            e
        })?;
        let mut disabled = IntSet::empty();
        for index in 0..lookups.lookup_count() {
            if let Err(e) = gpos.sanitize_lookup(index) {
                log::warn!("disabling GPOS lookup {index}: {e}");
                disabled.insert(index);
            }
        }
        Ok(GposTable {
            gpos,
            lookups,
            disabled,
        })
    }

    /// The underlying table.
    pub fn gpos(&self) -> &Gpos<'a> {
        &self.gpos
    }

    pub fn lookup_count(&self) -> u16 {
        self.lookups.lookup_count()
    }

    /// Returns `true` if the lookup failed validation.
    pub fn is_disabled(&self, index: u16) -> bool {
        self.disabled.contains(index)
    }

    /// The lookup at `index`, if it exists and can be read.
    pub fn lookup(&self, index: u16) -> Option<PositionLookup<'a>> {
        self.lookups.lookups().get(index as usize).ok()
    }
}

/// Parse and validate a GDEF table.
pub fn load_gdef(data: &[u8]) -> Result<Gdef<'_>, PositionError> {
    let gdef = Gdef::read(FontData::new(data))
        .and_then(|gdef| gdef.sanitize().map(|_| gdef))
        .map_err(|e| {
            log::debug!("rejecting GDEF table: {e}");
            PositionError::InvalidGdef(e)
        })?;
    Ok(gdef)
}

/// Position the glyphs in `buffer`.
///
/// The glyphs are classified from `gdef`, given their default advances
/// from `font`, and then every lookup in the plan is applied in order.
/// Attachment offsets are resolved at the end, so that each glyph's final
/// offset is relative to its own pen position.
///
/// Without a GPOS table, only the default advances (and the fallback mark
/// positioning, when enabled) are applied.
pub fn position(
    plan: &PositionPlan,
    font: &dyn FontService,
    table: Option<&GposTable>,
    gdef: Option<&Gdef>,
    buffer: &mut Buffer,
) {
    buffer.direction = plan.direction;
    set_glyph_props_from_gdef(gdef, buffer);
    set_default_advances(font, buffer);

    let adjust_offsets =
        plan.adjust_mark_offsets_when_zeroing && plan.direction.is_forward() && table.is_none();

    position_start(buffer);
    if plan.zero_marks == ZeroWidthMarks::ByGdefEarly {
        zero_mark_advances_by_gdef(buffer, adjust_offsets);
    }
    if let Some(table) = table {
        apply_lookups(plan, font, table, gdef, buffer);
    }
    if plan.zero_marks == ZeroWidthMarks::ByGdefLate {
        zero_mark_advances_by_gdef(buffer, adjust_offsets);
    }
    position_finish_advances(buffer);
    position_finish_offsets(buffer);

    if plan.fallback_mark_positioning {
        position_fallback_marks(font, buffer, adjust_offsets);
    }
}

fn set_default_advances(font: &dyn FontService, buffer: &mut Buffer) {
    buffer.clear_positions();
    let horizontal = buffer.direction.is_horizontal();
    for (info, pos) in buffer.info.iter().zip(&mut buffer.pos) {
        if horizontal {
            pos.x_advance = font.glyph_h_advance(info.glyph_id);
        } else {
            pos.y_advance = -font.glyph_v_advance(info.glyph_id);
        }
    }
}

fn zero_mark_advances_by_gdef(buffer: &mut Buffer, adjust_offsets: bool) {
    for (info, pos) in buffer.info.iter().zip(&mut buffer.pos) {
        if info.is_mark() {
            zero_advance(pos, adjust_offsets);
        }
    }
}

fn apply_lookups(
    plan: &PositionPlan,
    font: &dyn FontService,
    table: &GposTable,
    gdef: Option<&Gdef>,
    buffer: &mut Buffer,
) {
    for map in &plan.lookups {
        if table.is_disabled(map.index) {
            log::trace!("skipping disabled lookup {}", map.index);
            continue;
        }
        let Some(lookup) = table.lookup(map.index) else {
            log::trace!("skipping missing lookup {}", map.index);
            continue;
        };
        log::trace!(
            "applying lookup {} (type {})",
            map.index,
            lookup.lookup_type()
        );
        let mut ctx = ApplyContext::new(font, table, gdef, buffer, map, lookup.lookup_props());
        apply_forward(&mut ctx, &lookup);
    }
}
