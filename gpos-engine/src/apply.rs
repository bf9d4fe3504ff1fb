//! Applying a single lookup to the buffer.

use read_gpos::{
    tables::{
        gdef::Gdef,
        gpos::{PositionLookup, PositionSubtables},
        layout::{ExtensionLookup, Subtables},
    },
    FontRead, ReadError,
};

use crate::{
    buffer::{Buffer, Direction},
    font::FontService,
    glyph_props::check_glyph_property,
    gpos::GposTable,
    plan::LookupMap,
    MAX_NESTING_LEVEL,
};

/// The state shared by every subtable applied during one lookup.
pub(crate) struct ApplyContext<'a> {
    pub font: &'a dyn FontService,
    pub table: &'a GposTable<'a>,
    pub gdef: Option<&'a Gdef<'a>>,
    pub buffer: &'a mut Buffer,
    pub direction: Direction,
    pub lookup_mask: u32,
    pub lookup_index: u16,
    pub lookup_props: u32,
    pub nesting_level_left: usize,
    pub auto_zwj: bool,
    pub per_syllable: bool,
}

impl<'a> ApplyContext<'a> {
    pub fn new(
        font: &'a dyn FontService,
        table: &'a GposTable<'a>,
        gdef: Option<&'a Gdef<'a>>,
        buffer: &'a mut Buffer,
        map: &LookupMap,
        lookup_props: u32,
    ) -> Self {
        ApplyContext {
            font,
            table,
            gdef,
            direction: buffer.direction,
            buffer,
            lookup_mask: map.mask,
            lookup_index: map.index,
            lookup_props,
            nesting_level_left: MAX_NESTING_LEVEL,
            auto_zwj: map.auto_zwj,
            per_syllable: map.per_syllable,
        }
    }

    /// Apply the lookup at `lookup_index` at the current buffer position.
    ///
    /// Used by contextual lookups. The glyph is not checked against the
    /// nested lookup's flags or mask.
    pub fn recurse(&mut self, lookup_index: u16) -> bool {
        if self.nesting_level_left == 0 || self.table.is_disabled(lookup_index) {
            return false;
        }
        let Some(lookup) = self.table.lookup(lookup_index) else {
            return false;
        };
        let saved_props = self.lookup_props;
        let saved_index = self.lookup_index;
        self.lookup_props = lookup.lookup_props();
        self.lookup_index = lookup_index;
        self.nesting_level_left -= 1;
        let applied = lookup.apply(self).is_some();
        self.nesting_level_left += 1;
        self.lookup_props = saved_props;
        self.lookup_index = saved_index;
        applied
    }
}

/// Positioning behaviour of a subtable.
///
/// Returns `None` when the subtable does not apply at the current glyph.
/// When it does apply, the buffer cursor has been moved past the glyphs it
/// consumed.
pub(crate) trait Apply {
    fn apply(&self, ctx: &mut ApplyContext) -> Option<()>;
}

/// Discard a read error, logging it.
///
/// Malformed data found while applying a lookup means "no match".
pub(crate) trait Traced<T> {
    fn traced(self, what: &str) -> Option<T>;
}

impl<T> Traced<T> for Result<T, ReadError> {
    fn traced(self, what: &str) -> Option<T> {
        self.map_err(|e| log::trace!("failed to read {what}: {e}"))
            .ok()
    }
}

// the first subtable that applies wins
impl<'a, T, Ext> Apply for Subtables<'a, T, Ext>
where
    T: FontRead<'a> + Apply,
    Ext: ExtensionLookup<'a, T>,
{
    fn apply(&self, ctx: &mut ApplyContext) -> Option<()> {
        for subtable in self.iter() {
            let Some(subtable) = subtable.traced("subtable") else {
                continue;
            };
            if subtable.apply(ctx).is_some() {
                return Some(());
            }
        }
        None
    }
}

impl Apply for PositionSubtables<'_> {
    fn apply(&self, ctx: &mut ApplyContext) -> Option<()> {
        match self {
            PositionSubtables::Single(subtables) => subtables.apply(ctx),
            PositionSubtables::Pair(subtables) => subtables.apply(ctx),
            PositionSubtables::Cursive(subtables) => subtables.apply(ctx),
            PositionSubtables::MarkToBase(subtables) => subtables.apply(ctx),
            PositionSubtables::MarkToLig(subtables) => subtables.apply(ctx),
            PositionSubtables::MarkToMark(subtables) => subtables.apply(ctx),
            PositionSubtables::Contextual(subtables) => subtables.apply(ctx),
            PositionSubtables::ChainContextual(subtables) => subtables.apply(ctx),
        }
    }
}

impl Apply for PositionLookup<'_> {
    fn apply(&self, ctx: &mut ApplyContext) -> Option<()> {
        self.subtables().traced("lookup subtables")?.apply(ctx)
    }
}

/// Walk the buffer from the start, applying `lookup` wherever it matches.
///
/// Returns `true` if the lookup applied at least once.
pub(crate) fn apply_forward(ctx: &mut ApplyContext, lookup: &PositionLookup) -> bool {
    let Some(subtables) = lookup.subtables().traced("lookup subtables") else {
        return false;
    };
    let mut applied = false;
    ctx.buffer.idx = 0;
    while ctx.buffer.idx < ctx.buffer.len() {
        let cur = ctx.buffer.cur();
        let eligible = cur.mask & ctx.lookup_mask != 0
            && check_glyph_property(cur, ctx.lookup_props, ctx.gdef);
        if eligible && subtables.apply(ctx).is_some() {
            applied = true;
        } else {
            ctx.buffer.next_glyph();
        }
    }
    applied
}
