//! The font metrics consulted while positioning.

use read_gpos::{tables::layout::Device, types::GlyphId};

/// The ink bounding box of a glyph.
///
/// `y_bearing` is the top of the box and `height` is negative for a box
/// that extends downwards, matching the y-up font coordinate system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlyphExtents {
    pub x_bearing: i32,
    pub y_bearing: i32,
    pub width: i32,
    pub height: i32,
}

/// Metrics and hinting data for the font being shaped.
///
/// All values are in font units unless noted otherwise. A font without
/// a pixel size and without variation coordinates is shaped purely in
/// design units, and device tables are ignored.
pub trait FontService {
    fn units_per_em(&self) -> u16;

    /// The horizontal and vertical pixels per em, or zero when unhinted.
    fn ppem(&self) -> (u16, u16) {
        (0, 0)
    }

    /// The number of normalized variation coordinates set on the font.
    fn num_coords(&self) -> usize {
        0
    }

    fn glyph_h_advance(&self, glyph: GlyphId) -> i32;

    /// The vertical advance, as a positive distance.
    fn glyph_v_advance(&self, glyph: GlyphId) -> i32 {
        let _ = glyph;
        self.units_per_em() as i32
    }

    fn glyph_extents(&self, glyph: GlyphId) -> Option<GlyphExtents>;

    /// The location of a hinted outline point.
    fn glyph_contour_point(&self, glyph: GlyphId, point_index: u16) -> Option<(i32, i32)> {
        let _ = (glyph, point_index);
        None
    }

    /// Resolve an item variation store delta at the current coordinates.
    fn variation_delta(&self, outer: u16, inner: u16) -> f32 {
        let _ = (outer, inner);
        0.0
    }

    /// Scale the pixel adjustment of a device table to font units.
    fn x_scale_device(&self, device: &Device) -> i32 {
        device.delta(self.ppem().0, self.units_per_em() as i32)
    }

    /// Scale the pixel adjustment of a device table to font units.
    fn y_scale_device(&self, device: &Device) -> i32 {
        device.delta(self.ppem().1, self.units_per_em() as i32)
    }
}
