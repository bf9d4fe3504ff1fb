//! A font with fixed metrics for tests.

use std::collections::HashMap;

use read_gpos::types::GlyphId;

use crate::font::{FontService, GlyphExtents};

/// Glyphs not in `advances` advance by `advance`; glyphs not in `extents`
/// have no outline.
pub(crate) struct MockFont {
    pub upem: u16,
    pub ppem: (u16, u16),
    pub coords: usize,
    pub advance: i32,
    pub advances: HashMap<GlyphId, i32>,
    pub extents: HashMap<GlyphId, GlyphExtents>,
    pub contour_points: HashMap<(GlyphId, u16), (i32, i32)>,
    pub deltas: HashMap<(u16, u16), f32>,
}

impl Default for MockFont {
    fn default() -> Self {
        MockFont {
            upem: 1000,
            ppem: (0, 0),
            coords: 0,
            advance: 600,
            advances: HashMap::new(),
            extents: HashMap::new(),
            contour_points: HashMap::new(),
            deltas: HashMap::new(),
        }
    }
}

impl FontService for MockFont {
    fn units_per_em(&self) -> u16 {
        self.upem
    }

    fn ppem(&self) -> (u16, u16) {
        self.ppem
    }

    fn num_coords(&self) -> usize {
        self.coords
    }

    fn glyph_h_advance(&self, glyph: GlyphId) -> i32 {
        self.advances.get(&glyph).copied().unwrap_or(self.advance)
    }

    fn glyph_extents(&self, glyph: GlyphId) -> Option<GlyphExtents> {
        self.extents.get(&glyph).copied()
    }

    fn glyph_contour_point(&self, glyph: GlyphId, point_index: u16) -> Option<(i32, i32)> {
        self.contour_points.get(&(glyph, point_index)).copied()
    }

    fn variation_delta(&self, outer: u16, inner: u16) -> f32 {
        self.deltas.get(&(outer, inner)).copied().unwrap_or_default()
    }
}
