//! Per-call positioning settings.

use crate::buffer::Direction;

/// One lookup to apply, with the settings of the feature that enabled it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LookupMap {
    /// Index into the GPOS lookup list.
    pub index: u16,
    /// Glyphs whose mask does not intersect this are left alone.
    pub mask: u32,
    /// Skip over default ignorable joiners while matching.
    pub auto_zwj: bool,
    pub auto_zwnj: bool,
    /// Only match glyphs within the syllable of the current glyph.
    pub per_syllable: bool,
}

impl LookupMap {
    /// A lookup that applies to every glyph.
    pub fn new(index: u16) -> Self {
        LookupMap {
            index,
            mask: u32::MAX,
            auto_zwj: true,
            auto_zwnj: true,
            per_syllable: false,
        }
    }

    pub fn with_mask(mut self, mask: u32) -> Self {
        self.mask = mask;
        self
    }
}

/// When the advances of mark glyphs are zeroed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ZeroWidthMarks {
    None,
    /// Zero GDEF marks before any lookup is applied.
    ByGdefEarly,
    /// Zero GDEF marks after all lookups were applied.
    #[default]
    ByGdefLate,
}

/// Everything that controls a single positioning call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionPlan {
    pub direction: Direction,
    /// Applied in order.
    pub lookups: Vec<LookupMap>,
    pub zero_marks: ZeroWidthMarks,
    /// Place marks from glyph extents when no GPOS lookup positioned them.
    pub fallback_mark_positioning: bool,
    /// Move zeroed marks back by their former advance.
    ///
    /// Only honoured for forward directions and when no GPOS table is
    /// applied; mark lookups already place marks relative to their base.
    pub adjust_mark_offsets_when_zeroing: bool,
}

impl Default for PositionPlan {
    fn default() -> Self {
        PositionPlan {
            direction: Direction::LeftToRight,
            lookups: Vec::new(),
            zero_marks: ZeroWidthMarks::default(),
            fallback_mark_positioning: false,
            adjust_mark_offsets_when_zeroing: true,
        }
    }
}

impl PositionPlan {
    /// A plan applying the given lookups, in order, to every glyph.
    pub fn new(direction: Direction, lookups: impl IntoIterator<Item = u16>) -> Self {
        PositionPlan {
            direction,
            lookups: lookups.into_iter().map(LookupMap::new).collect(),
            ..Default::default()
        }
    }
}
