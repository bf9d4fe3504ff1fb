//! Device and VariationIndex tables

use crate::prelude::*;

/// The format of the delta values in a [`Device`] table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeltaFormat {
    /// Signed 2-bit value, 8 values per uint16
    Local2BitDeltas,
    /// Signed 4-bit value, 4 values per uint16
    Local4BitDeltas,
    /// Signed 8-bit value, 2 values per uint16
    Local8BitDeltas,
    /// VariationIndex table, contains a delta-set index pair.
    VariationIndex,
    Unknown(u16),
}

impl DeltaFormat {
    pub fn new(raw: u16) -> Self {
        match raw {
            0x0001 => Self::Local2BitDeltas,
            0x0002 => Self::Local4BitDeltas,
            0x0003 => Self::Local8BitDeltas,
            0x8000 => Self::VariationIndex,
            other => Self::Unknown(other),
        }
    }

    /// The number of bits used by each packed delta, for local formats.
    fn bits_per_value(self) -> Option<u32> {
        match self {
            DeltaFormat::Local2BitDeltas => Some(2),
            DeltaFormat::Local4BitDeltas => Some(4),
            DeltaFormat::Local8BitDeltas => Some(8),
            _ => None,
        }
    }

    /// The number of uint16 words required to pack the given size range.
    pub(crate) fn value_count(self, start_size: u16, end_size: u16) -> usize {
        let range_len = end_size.saturating_add(1).saturating_sub(start_size) as usize;
        let Some(bits) = self.bits_per_value() else {
            return 0;
        };
        let val_per_word = (16 / bits) as usize;
        range_len.div_ceil(val_per_word)
    }
}

impl Default for DeltaFormat {
    fn default() -> Self {
        Self::Local2BitDeltas
    }
}

/// [Device Table](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#device-and-variationindex-tables)
#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct DeviceMarker {
    delta_value_byte_len: usize,
}

impl DeviceMarker {
    pub fn delta_value_byte_range(&self) -> Range<usize> {
        6..6 + self.delta_value_byte_len
    }
}

impl<'a> FontRead<'a> for Device<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let start_size: u16 = cursor.read()?;
        let end_size: u16 = cursor.read()?;
        let delta_format = DeltaFormat::new(cursor.read()?);
        let delta_value_byte_len =
            delta_format.value_count(start_size, end_size) * u16::RAW_BYTE_LEN;
        cursor.advance_by(delta_value_byte_len);
        cursor.finish(DeviceMarker {
            delta_value_byte_len,
        })
    }
}

/// [Device Table](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#device-and-variationindex-tables)
pub type Device<'a> = TableRef<'a, DeviceMarker>;

impl<'a> Device<'a> {
    /// Smallest size to correct, in ppem
    pub fn start_size(&self) -> u16 {
        self.field(0)
    }

    /// Largest size to correct, in ppem
    pub fn end_size(&self) -> u16 {
        self.field(2)
    }

    /// Format of deltaValue array data: 0x0001, 0x0002, or 0x0003
    pub fn delta_format(&self) -> DeltaFormat {
        DeltaFormat::new(self.field(4))
    }

    /// Array of compressed data
    pub fn delta_value(&self) -> &'a [BigEndian<u16>] {
        let range = self.shape.delta_value_byte_range();
        self.data.read_array(range).unwrap_or_default()
    }

    /// The adjustment, in pixels, for the provided size.
    ///
    /// Returns 0 if `ppem` is zero, outside of the table's size range, or if
    /// the table uses an unknown format.
    pub fn delta_pixels(&self, ppem: u16) -> i32 {
        let Some(bits) = self.delta_format().bits_per_value() else {
            return 0;
        };
        let start = self.start_size();
        if ppem == 0 || ppem < start || ppem > self.end_size() {
            return 0;
        }
        let idx = (ppem - start) as u32;
        let per_word = 16 / bits;
        let Some(word) = self.delta_value().get((idx / per_word) as usize) else {
            return 0;
        };
        let shift = 16 - (idx % per_word + 1) * bits;
        let mask = 0xFFFF_u32 >> (16 - bits);
        let value = (word.get() as u32 >> shift) & mask;
        // sign-extend
        if value >= (mask + 1) >> 1 {
            value as i32 - (mask as i32 + 1)
        } else {
            value as i32
        }
    }

    /// The adjustment for the provided size, scaled to `scale` units per em.
    ///
    /// This is `pixels * scale / ppem`.
    pub fn delta(&self, ppem: u16, scale: i32) -> i32 {
        let pixels = self.delta_pixels(ppem);
        if pixels == 0 {
            return 0;
        }
        (pixels as i64 * scale as i64 / ppem as i64) as i32
    }
}

/// Variation index table
#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct VariationIndexMarker;

impl<'a> FontRead<'a> for VariationIndex<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance::<u16>();
        cursor.advance::<u16>();
        cursor.advance::<u16>();
        cursor.finish(VariationIndexMarker)
    }
}

/// Variation index table
pub type VariationIndex<'a> = TableRef<'a, VariationIndexMarker>;

impl VariationIndex<'_> {
    /// A delta-set outer index: used to select an item variation
    /// data subtable within the item variation store.
    pub fn delta_set_outer_index(&self) -> u16 {
        self.field(0)
    }

    /// A delta-set inner index: used to select a delta-set row
    /// within an item variation data subtable.
    pub fn delta_set_inner_index(&self) -> u16 {
        self.field(2)
    }

    /// Format, = 0x8000
    pub fn delta_format(&self) -> DeltaFormat {
        DeltaFormat::new(self.field(4))
    }

    /// The combined `(outer << 16) | inner` index.
    pub fn var_idx(&self) -> u32 {
        ((self.delta_set_outer_index() as u32) << 16) | self.delta_set_inner_index() as u32
    }
}

/// Either a [Device] table (in a non-variable font) or a [VariationIndex] table (in a variable font)
#[derive(Clone, Copy, Debug)]
pub enum DeviceOrVariationIndex<'a> {
    Device(Device<'a>),
    VariationIndex(VariationIndex<'a>),
}

impl<'a> FontRead<'a> for DeviceOrVariationIndex<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(4usize)?;
        match DeltaFormat::new(format) {
            DeltaFormat::Local2BitDeltas
            | DeltaFormat::Local4BitDeltas
            | DeltaFormat::Local8BitDeltas => Ok(Self::Device(FontRead::read(data)?)),
            DeltaFormat::VariationIndex => Ok(Self::VariationIndex(FontRead::read(data)?)),
            DeltaFormat::Unknown(other) => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpos_test_data::bebuffer::BeBuffer;

    fn device(start: u16, end: u16, format: u16, words: &[u16]) -> BeBuffer {
        BeBuffer::new()
            .extend([start, end, format])
            .extend(words.iter().copied())
    }

    #[test]
    fn two_bit_deltas() {
        // sizes 11..=15: 1, -1, 0, 1, -2 => 01 11 00 01 10 00 00 00
        let buf = device(11, 15, 1, &[0b0111_0001_1000_0000]);
        let table = Device::read(FontData::new(buf.as_slice())).unwrap();
        let deltas: Vec<_> = (10..=16).map(|ppem| table.delta_pixels(ppem)).collect();
        assert_eq!(deltas, vec![0, 1, -1, 0, 1, -2, 0]);
    }

    #[test]
    fn four_bit_deltas() {
        let buf = device(11, 15, 2, &[0x1111, 0x2200]);
        let table = Device::read(FontData::new(buf.as_slice())).unwrap();
        let deltas: Vec<_> = (11..=15).map(|ppem| table.delta_pixels(ppem)).collect();
        assert_eq!(deltas, vec![1, 1, 1, 1, 2]);

        let buf = device(9, 9, 2, &[0xF000]);
        let table = Device::read(FontData::new(buf.as_slice())).unwrap();
        assert_eq!(table.delta_pixels(9), -1);
    }

    #[test]
    fn eight_bit_deltas() {
        let buf = device(12, 13, 3, &[0x05FB]);
        let table = Device::read(FontData::new(buf.as_slice())).unwrap();
        assert_eq!(table.delta_pixels(12), 5);
        assert_eq!(table.delta_pixels(13), -5);
    }

    #[test]
    fn zero_ppem_is_ignored() {
        let buf = device(0, 2, 3, &[0x0505, 0x0500]);
        let table = Device::read(FontData::new(buf.as_slice())).unwrap();
        assert_eq!(table.delta_pixels(0), 0);
        assert_eq!(table.delta_pixels(1), 5);
        assert_eq!(table.delta(0, 1000), 0);
    }

    #[test]
    fn scaled_delta() {
        let buf = device(10, 10, 3, &[0x0200]);
        let table = Device::read(FontData::new(buf.as_slice())).unwrap();
        // 2 pixels at 10ppem, 1000 units per em
        assert_eq!(table.delta(10, 1000), 200);
    }

    #[test]
    fn device_or_variation_index() {
        let buf = BeBuffer::new().extend([2u16, 7, 0x8000]);
        let table = DeviceOrVariationIndex::read(FontData::new(buf.as_slice())).unwrap();
        let DeviceOrVariationIndex::VariationIndex(idx) = table else {
            panic!("expected variation index, got {table:?}");
        };
        assert_eq!(idx.var_idx(), 0x0002_0007);

        let buf = BeBuffer::new().extend([11u16, 15, 4]);
        assert!(matches!(
            DeviceOrVariationIndex::read(FontData::new(buf.as_slice())),
            Err(ReadError::InvalidFormat(4))
        ));
    }

    #[test]
    fn truncated_device() {
        let buf = device(11, 30, 1, &[0]);
        assert_eq!(
            Device::read(FontData::new(buf.as_slice())).unwrap_err(),
            ReadError::OutOfBounds
        );
    }
}
