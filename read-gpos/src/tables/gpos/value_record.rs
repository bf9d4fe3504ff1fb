//! A GPOS ValueRecord

use core::ops::{BitOr, BitOrAssign};

use crate::prelude::*;
use crate::tables::layout::DeviceOrVariationIndex;

/// The [ValueFormat](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#value-record)
/// flags, selecting which fields are present in a [`ValueRecord`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueFormat(u16);

impl ValueFormat {
    /// Includes horizontal adjustment for placement
    pub const X_PLACEMENT: Self = ValueFormat(0x0001);
    /// Includes vertical adjustment for placement
    pub const Y_PLACEMENT: Self = ValueFormat(0x0002);
    /// Includes horizontal adjustment for advance
    pub const X_ADVANCE: Self = ValueFormat(0x0004);
    /// Includes vertical adjustment for advance
    pub const Y_ADVANCE: Self = ValueFormat(0x0008);
    /// Includes Device table (non-variable font) / VariationIndex
    /// table (variable font) for horizontal placement
    pub const X_PLACEMENT_DEVICE: Self = ValueFormat(0x0010);
    /// Includes Device table (non-variable font) / VariationIndex
    /// table (variable font) for vertical placement
    pub const Y_PLACEMENT_DEVICE: Self = ValueFormat(0x0020);
    /// Includes Device table (non-variable font) / VariationIndex
    /// table (variable font) for horizontal advance
    pub const X_ADVANCE_DEVICE: Self = ValueFormat(0x0040);
    /// Includes Device table (non-variable font) / VariationIndex
    /// table (variable font) for vertical advance
    pub const Y_ADVANCE_DEVICE: Self = ValueFormat(0x0080);

    /// A mask with all the device/variation index bits set
    pub const ANY_DEVICE_OR_VARIDX: Self = ValueFormat(0x0010 | 0x0020 | 0x0040 | 0x0080);

    /// Return new, empty flags
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Construct a format from raw bits, keeping reserved bits.
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Raw transmutation to u16.
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// `true` if no fields are present.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if all of the flags in `other` are contained within `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Returns `true` if any of the flags in `other` are set in `self`.
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Return the number of bytes required to store a [`ValueRecord`] in this format.
    ///
    /// Every set bit occupies one 16-bit slot, including reserved bits.
    #[inline]
    pub fn record_byte_len(self) -> usize {
        self.0.count_ones() as usize * u16::RAW_BYTE_LEN
    }
}

impl BitOr for ValueFormat {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ValueFormat {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0
    }
}

impl types::Scalar for ValueFormat {
    type Raw = <u16 as types::Scalar>::Raw;
    fn to_raw(self) -> Self::Raw {
        <u16 as types::Scalar>::to_raw(self.0)
    }
    fn from_raw(raw: Self::Raw) -> Self {
        Self(<u16 as types::Scalar>::from_raw(raw))
    }
}

/// A Positioning ValueRecord.
///
/// The layout of a value record depends on a [`ValueFormat`] stored
/// elsewhere, so these are decoded into an owned struct instead of being
/// viewed in place. Device offsets are relative to the table that owns the
/// record, which must be passed in to resolve them.
#[derive(Clone, Default, Eq)]
pub struct ValueRecord {
    pub x_placement: Option<BigEndian<i16>>,
    pub y_placement: Option<BigEndian<i16>>,
    pub x_advance: Option<BigEndian<i16>>,
    pub y_advance: Option<BigEndian<i16>>,
    pub x_placement_device: BigEndian<Nullable<Offset16>>,
    pub y_placement_device: BigEndian<Nullable<Offset16>>,
    pub x_advance_device: BigEndian<Nullable<Offset16>>,
    pub y_advance_device: BigEndian<Nullable<Offset16>>,
    #[doc(hidden)]
    pub format: ValueFormat,
}

// the format is redundant with the presence of the fields
impl PartialEq for ValueRecord {
    fn eq(&self, other: &Self) -> bool {
        self.x_placement == other.x_placement
            && self.y_placement == other.y_placement
            && self.x_advance == other.x_advance
            && self.y_advance == other.y_advance
            && self.x_placement_device == other.x_placement_device
            && self.y_placement_device == other.y_placement_device
            && self.x_advance_device == other.x_advance_device
            && self.y_advance_device == other.y_advance_device
    }
}

impl ValueRecord {
    pub fn read(data: FontData, format: ValueFormat) -> Result<Self, ReadError> {
        let mut this = ValueRecord {
            format,
            ..Default::default()
        };
        let mut cursor = data.cursor();

        if format.contains(ValueFormat::X_PLACEMENT) {
            this.x_placement = Some(cursor.read_be()?);
        }
        if format.contains(ValueFormat::Y_PLACEMENT) {
            this.y_placement = Some(cursor.read_be()?);
        }
        if format.contains(ValueFormat::X_ADVANCE) {
            this.x_advance = Some(cursor.read_be()?);
        }
        if format.contains(ValueFormat::Y_ADVANCE) {
            this.y_advance = Some(cursor.read_be()?);
        }
        if format.contains(ValueFormat::X_PLACEMENT_DEVICE) {
            this.x_placement_device = cursor.read_be()?;
        }
        if format.contains(ValueFormat::Y_PLACEMENT_DEVICE) {
            this.y_placement_device = cursor.read_be()?;
        }
        if format.contains(ValueFormat::X_ADVANCE_DEVICE) {
            this.x_advance_device = cursor.read_be()?;
        }
        if format.contains(ValueFormat::Y_ADVANCE_DEVICE) {
            this.y_advance_device = cursor.read_be()?;
        }
        Ok(this)
    }

    /// The format this record was read with.
    pub fn format(&self) -> ValueFormat {
        self.format
    }

    pub fn x_placement(&self) -> Option<i16> {
        self.x_placement.map(|val| val.get())
    }

    pub fn y_placement(&self) -> Option<i16> {
        self.y_placement.map(|val| val.get())
    }

    pub fn x_advance(&self) -> Option<i16> {
        self.x_advance.map(|val| val.get())
    }

    pub fn y_advance(&self) -> Option<i16> {
        self.y_advance.map(|val| val.get())
    }

    pub fn x_placement_device<'a>(
        &self,
        data: FontData<'a>,
    ) -> Option<Result<DeviceOrVariationIndex<'a>, ReadError>> {
        self.x_placement_device.get().resolve(data)
    }

    pub fn y_placement_device<'a>(
        &self,
        data: FontData<'a>,
    ) -> Option<Result<DeviceOrVariationIndex<'a>, ReadError>> {
        self.y_placement_device.get().resolve(data)
    }

    pub fn x_advance_device<'a>(
        &self,
        data: FontData<'a>,
    ) -> Option<Result<DeviceOrVariationIndex<'a>, ReadError>> {
        self.x_advance_device.get().resolve(data)
    }

    pub fn y_advance_device<'a>(
        &self,
        data: FontData<'a>,
    ) -> Option<Result<DeviceOrVariationIndex<'a>, ReadError>> {
        self.y_advance_device.get().resolve(data)
    }

    /// All present device tables, in field order.
    pub fn devices<'a>(
        &self,
        data: FontData<'a>,
    ) -> impl Iterator<Item = Result<DeviceOrVariationIndex<'a>, ReadError>> {
        [
            self.x_placement_device(data),
            self.y_placement_device(data),
            self.x_advance_device(data),
            self.y_advance_device(data),
        ]
        .into_iter()
        .flatten()
    }
}

impl ReadArgs for ValueRecord {
    type Args = ValueFormat;
}

impl<'a> FontReadWithArgs<'a> for ValueRecord {
    fn read_with_args(data: FontData<'a>, args: &Self::Args) -> Result<Self, ReadError> {
        ValueRecord::read(data, *args)
    }
}

impl ComputeSize for ValueRecord {
    #[inline]
    fn compute_size(args: &ValueFormat) -> Result<usize, ReadError> {
        Ok(args.record_byte_len())
    }
}

impl std::fmt::Debug for ValueRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut f = f.debug_struct("ValueRecord");
        self.x_placement.map(|x| f.field("x_placement", &x));
        self.y_placement.map(|y| f.field("y_placement", &y));
        self.x_advance.map(|x| f.field("x_advance", &x));
        self.y_advance.map(|y| f.field("y_advance", &y));
        if !self.x_placement_device.get().is_null() {
            f.field("x_placement_device", &self.x_placement_device.get());
        }
        if !self.y_placement_device.get().is_null() {
            f.field("y_placement_device", &self.y_placement_device.get());
        }
        if !self.x_advance_device.get().is_null() {
            f.field("x_advance_device", &self.x_advance_device.get());
        }
        if !self.y_advance_device.get().is_null() {
            f.field("y_advance_device", &self.y_advance_device.get());
        }
        f.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanity_check_format_const() {
        let format = ValueFormat::X_ADVANCE_DEVICE
            | ValueFormat::Y_ADVANCE_DEVICE
            | ValueFormat::Y_PLACEMENT_DEVICE
            | ValueFormat::X_PLACEMENT_DEVICE;
        assert_eq!(format, ValueFormat::ANY_DEVICE_OR_VARIDX);
        assert_eq!(format.record_byte_len(), 4 * 2);
    }

    #[test]
    fn record_len_is_popcount() {
        for bits in [0u16, 1, 0x5, 0xFF, 0x8001, 0xFFFF] {
            let format = ValueFormat::from_bits(bits);
            assert_eq!(format.record_byte_len(), bits.count_ones() as usize * 2);
        }
    }

    #[test]
    fn reads_only_present_fields() {
        let format = ValueFormat::X_PLACEMENT | ValueFormat::Y_ADVANCE;
        let data = FontData::new(&[0x00, 0x50, 0xFF, 0x38]);
        let record = ValueRecord::read(data, format).unwrap();
        assert_eq!(record.x_placement(), Some(80));
        assert_eq!(record.y_placement(), None);
        assert_eq!(record.x_advance(), None);
        assert_eq!(record.y_advance(), Some(-200));
        assert!(record.x_placement_device.get().is_null());
    }

    #[test]
    fn truncated_record() {
        let format = ValueFormat::X_PLACEMENT | ValueFormat::Y_PLACEMENT;
        let data = FontData::new(&[0x00, 0x50]);
        assert!(ValueRecord::read(data, format).is_err());
    }
}
