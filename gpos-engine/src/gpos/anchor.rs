//! impl resolve() for AnchorTable

use read_gpos::{tables::gpos::AnchorTable, types::GlyphId};

use super::value_record::{x_device_delta, y_device_delta};
use crate::font::FontService;

pub(crate) trait ResolveAnchor {
    /// The anchor position for `glyph`, in font units.
    fn resolve(&self, font: &dyn FontService, glyph: GlyphId) -> (f32, f32);
}

impl ResolveAnchor for AnchorTable<'_> {
    fn resolve(&self, font: &dyn FontService, glyph: GlyphId) -> (f32, f32) {
        let mut x = self.x_coordinate() as f32;
        let mut y = self.y_coordinate() as f32;
        let (x_ppem, y_ppem) = font.ppem();
        match self {
            AnchorTable::Format1(_) => {}
            AnchorTable::Format2(table) => {
                // the contour point only wins on hinted axes
                if x_ppem != 0 || y_ppem != 0 {
                    if let Some((cx, cy)) = font.glyph_contour_point(glyph, table.anchor_point()) {
                        if x_ppem != 0 {
                            x = cx as f32;
                        }
                        if y_ppem != 0 {
                            y = cy as f32;
                        }
                    }
                }
            }
            AnchorTable::Format3(table) => {
                let has_coords = font.num_coords() != 0;
                if x_ppem != 0 || has_coords {
                    if let Some(Ok(device)) = table.x_device() {
                        x += x_device_delta(font, &device) as f32;
                    }
                }
                if y_ppem != 0 || has_coords {
                    if let Some(Ok(device)) = table.y_device() {
                        y += y_device_delta(font, &device) as f32;
                    }
                }
            }
        }
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockFont;
    use gpos_test_data::gpos as test_data;
    use read_gpos::FontRead;

    fn resolve(data: &[u8], font: &MockFont) -> (f32, f32) {
        let anchor = AnchorTable::read(data.into()).unwrap();
        anchor.resolve(font, GlyphId::new(5))
    }

    #[test]
    fn format1_is_literal() {
        let font = MockFont {
            ppem: (12, 12),
            ..Default::default()
        };
        assert_eq!(resolve(test_data::ANCHORFORMAT1, &font), (189.0, -103.0));
    }

    #[test]
    fn format2_uses_contour_point_when_hinted() {
        let mut font = MockFont::default();
        font.contour_points
            .insert((GlyphId::new(5), 13), (300, 360));
        // unhinted: the design coordinates
        assert_eq!(resolve(test_data::ANCHORFORMAT2, &font), (322.0, 350.0));

        font.ppem = (12, 0);
        assert_eq!(resolve(test_data::ANCHORFORMAT2, &font), (300.0, 350.0));
        font.ppem = (12, 12);
        assert_eq!(resolve(test_data::ANCHORFORMAT2, &font), (300.0, 360.0));
    }

    #[test]
    fn format2_falls_back_without_point() {
        let font = MockFont {
            ppem: (12, 12),
            ..Default::default()
        };
        assert_eq!(resolve(test_data::ANCHORFORMAT2, &font), (322.0, 350.0));
    }

    #[test]
    fn format3_adds_device_deltas() {
        let mut font = MockFont::default();
        assert_eq!(resolve(test_data::ANCHORFORMAT3, &font), (279.0, 1301.0));
        font.ppem = (15, 15);
        // two pixels at 15 ppem
        assert_eq!(resolve(test_data::ANCHORFORMAT3, &font), (412.0, 1434.0));
    }
}
