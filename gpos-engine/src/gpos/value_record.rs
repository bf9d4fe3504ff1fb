//! impl apply_value() for ValueRecord

use read_gpos::{
    tables::{gpos::ValueRecord, layout::DeviceOrVariationIndex},
    FontData,
};

use crate::{
    buffer::{Direction, GlyphPosition},
    font::FontService,
};

/// Horizontal adjustment of a device or variation index table, in font units.
pub(crate) fn x_device_delta(font: &dyn FontService, device: &DeviceOrVariationIndex) -> i32 {
    match device {
        DeviceOrVariationIndex::Device(device) => font.x_scale_device(device),
        DeviceOrVariationIndex::VariationIndex(index) => variation_delta(font, index),
    }
}

/// Vertical adjustment of a device or variation index table, in font units.
pub(crate) fn y_device_delta(font: &dyn FontService, device: &DeviceOrVariationIndex) -> i32 {
    match device {
        DeviceOrVariationIndex::Device(device) => font.y_scale_device(device),
        DeviceOrVariationIndex::VariationIndex(index) => variation_delta(font, index),
    }
}

fn variation_delta(
    font: &dyn FontService,
    index: &read_gpos::tables::layout::VariationIndex,
) -> i32 {
    font.variation_delta(index.delta_set_outer_index(), index.delta_set_inner_index())
        .round() as i32
}

pub(crate) trait ApplyValue {
    /// Add this record to `pos`.
    ///
    /// `data` is the table device offsets are relative to. Returns `true`
    /// if any present field may have changed the position.
    fn apply_value(
        &self,
        font: &dyn FontService,
        direction: Direction,
        data: FontData,
        pos: &mut GlyphPosition,
    ) -> bool;
}

impl ApplyValue for ValueRecord {
    fn apply_value(
        &self,
        font: &dyn FontService,
        direction: Direction,
        data: FontData,
        pos: &mut GlyphPosition,
    ) -> bool {
        let horizontal = direction.is_horizontal();
        let mut changed = false;

        if let Some(delta) = self.x_placement() {
            pos.x_offset += delta as i32;
            changed |= delta != 0;
        }
        if let Some(delta) = self.y_placement() {
            pos.y_offset += delta as i32;
            changed |= delta != 0;
        }
        if let Some(delta) = self.x_advance() {
            if horizontal {
                pos.x_advance += delta as i32;
                changed |= delta != 0;
            }
        }
        if let Some(delta) = self.y_advance() {
            // y advances grow downwards
            if !horizontal {
                pos.y_advance -= delta as i32;
                changed |= delta != 0;
            }
        }

        let (x_ppem, y_ppem) = font.ppem();
        let has_coords = font.num_coords() != 0;
        let use_x_device = x_ppem != 0 || has_coords;
        let use_y_device = y_ppem != 0 || has_coords;
        if !use_x_device && !use_y_device {
            return changed;
        }

        if use_x_device {
            if let Some(device) = self.x_placement_device(data) {
                pos.x_offset += device.map_or(0, |device| x_device_delta(font, &device));
                changed = true;
            }
        }
        if use_y_device {
            if let Some(device) = self.y_placement_device(data) {
                pos.y_offset += device.map_or(0, |device| y_device_delta(font, &device));
                changed = true;
            }
        }
        if horizontal && use_x_device {
            if let Some(device) = self.x_advance_device(data) {
                pos.x_advance += device.map_or(0, |device| x_device_delta(font, &device));
                changed = true;
            }
        }
        if !horizontal && use_y_device {
            if let Some(device) = self.y_advance_device(data) {
                pos.y_advance -= device.map_or(0, |device| y_device_delta(font, &device));
                changed = true;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockFont;
    use gpos_test_data::{bebuffer::BeBuffer, gpos as test_data};
    use read_gpos::tables::gpos::{SinglePos, ValueFormat};
    use read_gpos::FontRead;

    // the canned value format table without its device offsets
    fn without_devices() -> BeBuffer {
        BeBuffer::new()
            .push(1u16) // format
            .push(10u16) // coverage offset
            .push(0x09u16) // x placement, y advance
            .push(80i16)
            .push(210i16)
            .extend([1u16, 1, 0x3A])
    }

    fn apply(data: &[u8], font: &MockFont, direction: Direction) -> (GlyphPosition, bool) {
        let table = SinglePos::read(data.into()).unwrap();
        let record = table.value_record(0).unwrap();
        let mut pos = GlyphPosition {
            y_advance: -1000,
            ..Default::default()
        };
        let changed = record.apply_value(font, direction, table.offset_data(), &mut pos);
        (pos, changed)
    }

    #[test]
    fn devices_ignored_without_ppem_or_coords() {
        let font = MockFont::default();
        let with = apply(test_data::VALUEFORMATTABLE, &font, Direction::TopToBottom);
        let without = apply(without_devices().as_slice(), &font, Direction::TopToBottom);
        assert_eq!(with, without);
        assert_eq!(with.0.x_offset, 80);
        assert_eq!(with.0.y_advance, -1210);
    }

    #[test]
    fn devices_scaled_at_ppem() {
        let font = MockFont {
            ppem: (12, 12),
            ..Default::default()
        };
        let record = SinglePos::read(test_data::VALUEFORMATTABLE.into())
            .unwrap()
            .value_record(0)
            .unwrap();
        assert_eq!(
            record.format(),
            ValueFormat::X_PLACEMENT
                | ValueFormat::Y_ADVANCE
                | ValueFormat::X_PLACEMENT_DEVICE
                | ValueFormat::Y_ADVANCE_DEVICE
        );
        // one pixel at 12 ppem, scaled to 1000 units per em
        let (pos, _) = apply(test_data::VALUEFORMATTABLE, &font, Direction::TopToBottom);
        assert_eq!(pos.y_advance, -1000 - 210 - 83);
    }

    #[test]
    fn advances_follow_direction() {
        let font = MockFont::default();
        let (pos, changed) = apply(without_devices().as_slice(), &font, Direction::LeftToRight);
        // the y advance is consumed but not applied in horizontal runs
        assert_eq!(pos.y_advance, -1000);
        assert_eq!(pos.x_offset, 80);
        assert!(changed);
    }

    #[test]
    fn variation_index_uses_font_delta() {
        let buf = BeBuffer::new()
            .push(1u16) // format
            .push(12u16) // coverage offset
            .push(0x44u16) // x advance, x advance device
            .push(10i16)
            .push(18u16)
            .push(0u16) // padding
            .extend([1u16, 1, 7])
            .extend([3u16, 4, 0x8000]);
        let font = MockFont {
            coords: 1,
            deltas: [((3, 4), 2.6)].into_iter().collect(),
            ..Default::default()
        };
        let (pos, changed) = apply(buf.as_slice(), &font, Direction::LeftToRight);
        assert_eq!(pos.x_advance, 13);
        assert!(changed);
    }
}
