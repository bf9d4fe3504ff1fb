//! Anchor tables

use crate::prelude::*;
use crate::tables::layout::DeviceOrVariationIndex;

/// [Anchor Table Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#anchor-table-format-1-design-units): Design Units
#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct AnchorFormat1Marker;

impl Format<u16> for AnchorFormat1Marker {
    const FORMAT: u16 = 1;
}

impl<'a> FontRead<'a> for AnchorFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance::<u16>();
        cursor.advance::<i16>();
        cursor.advance::<i16>();
        cursor.finish(AnchorFormat1Marker)
    }
}

/// [Anchor Table Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#anchor-table-format-1-design-units): Design Units
pub type AnchorFormat1<'a> = TableRef<'a, AnchorFormat1Marker>;

impl AnchorFormat1<'_> {
    /// Format identifier, = 1
    pub fn anchor_format(&self) -> u16 {
        self.field(0)
    }

    /// Horizontal value, in design units
    pub fn x_coordinate(&self) -> i16 {
        self.field(2)
    }

    /// Vertical value, in design units
    pub fn y_coordinate(&self) -> i16 {
        self.field(4)
    }
}

/// [Anchor Table Format 2](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#anchor-table-format-2-design-units-plus-contour-point): Design Units Plus Contour Point
#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct AnchorFormat2Marker;

impl Format<u16> for AnchorFormat2Marker {
    const FORMAT: u16 = 2;
}

impl<'a> FontRead<'a> for AnchorFormat2<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance::<u16>();
        cursor.advance::<i16>();
        cursor.advance::<i16>();
        cursor.advance::<u16>();
        cursor.finish(AnchorFormat2Marker)
    }
}

/// [Anchor Table Format 2](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#anchor-table-format-2-design-units-plus-contour-point): Design Units Plus Contour Point
pub type AnchorFormat2<'a> = TableRef<'a, AnchorFormat2Marker>;

impl AnchorFormat2<'_> {
    /// Format identifier, = 2
    pub fn anchor_format(&self) -> u16 {
        self.field(0)
    }

    /// Horizontal value, in design units
    pub fn x_coordinate(&self) -> i16 {
        self.field(2)
    }

    /// Vertical value, in design units
    pub fn y_coordinate(&self) -> i16 {
        self.field(4)
    }

    /// Index to glyph contour point
    pub fn anchor_point(&self) -> u16 {
        self.field(6)
    }
}

/// [Anchor Table Format 3](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#anchor-table-format-3-design-units-plus-device-or-variationindex-tables): Design Units Plus Device or VariationIndex Tables
#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct AnchorFormat3Marker;

impl Format<u16> for AnchorFormat3Marker {
    const FORMAT: u16 = 3;
}

impl<'a> FontRead<'a> for AnchorFormat3<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance::<u16>();
        cursor.advance::<i16>();
        cursor.advance::<i16>();
        cursor.advance::<Offset16>();
        cursor.advance::<Offset16>();
        cursor.finish(AnchorFormat3Marker)
    }
}

/// [Anchor Table Format 3](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#anchor-table-format-3-design-units-plus-device-or-variationindex-tables): Design Units Plus Device or VariationIndex Tables
pub type AnchorFormat3<'a> = TableRef<'a, AnchorFormat3Marker>;

impl<'a> AnchorFormat3<'a> {
    /// Format identifier, = 3
    pub fn anchor_format(&self) -> u16 {
        self.field(0)
    }

    /// Horizontal value, in design units
    pub fn x_coordinate(&self) -> i16 {
        self.field(2)
    }

    /// Vertical value, in design units
    pub fn y_coordinate(&self) -> i16 {
        self.field(4)
    }

    /// Offset to Device table (non-variable font) / VariationIndex
    /// table (variable font) for X coordinate, from beginning of
    /// Anchor table (may be NULL)
    pub fn x_device_offset(&self) -> Nullable<Offset16> {
        self.field(6)
    }

    /// Attempt to resolve [`x_device_offset`][Self::x_device_offset].
    pub fn x_device(&self) -> Option<Result<DeviceOrVariationIndex<'a>, ReadError>> {
        self.x_device_offset().resolve(self.data)
    }

    /// Offset to Device table (non-variable font) / VariationIndex
    /// table (variable font) for Y coordinate, from beginning of
    /// Anchor table (may be NULL)
    pub fn y_device_offset(&self) -> Nullable<Offset16> {
        self.field(8)
    }

    /// Attempt to resolve [`y_device_offset`][Self::y_device_offset].
    pub fn y_device(&self) -> Option<Result<DeviceOrVariationIndex<'a>, ReadError>> {
        self.y_device_offset().resolve(self.data)
    }
}

/// [Anchor Tables](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#anchor-tables)
/// position one glyph with respect to another.
#[derive(Clone, Debug)]
pub enum AnchorTable<'a> {
    Format1(AnchorFormat1<'a>),
    Format2(AnchorFormat2<'a>),
    Format3(AnchorFormat3<'a>),
}

impl<'a> FontRead<'a> for AnchorTable<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        match format {
            AnchorFormat1Marker::FORMAT => Ok(Self::Format1(FontRead::read(data)?)),
            AnchorFormat2Marker::FORMAT => Ok(Self::Format2(FontRead::read(data)?)),
            AnchorFormat3Marker::FORMAT => Ok(Self::Format3(FontRead::read(data)?)),
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

impl<'a> AnchorTable<'a> {
    /// Format identifier
    pub fn anchor_format(&self) -> u16 {
        match self {
            Self::Format1(item) => item.anchor_format(),
            Self::Format2(item) => item.anchor_format(),
            Self::Format3(item) => item.anchor_format(),
        }
    }

    /// Horizontal value, in design units
    pub fn x_coordinate(&self) -> i16 {
        match self {
            Self::Format1(item) => item.x_coordinate(),
            Self::Format2(item) => item.x_coordinate(),
            Self::Format3(item) => item.x_coordinate(),
        }
    }

    /// Vertical value, in design units
    pub fn y_coordinate(&self) -> i16 {
        match self {
            Self::Format1(item) => item.y_coordinate(),
            Self::Format2(item) => item.y_coordinate(),
            Self::Format3(item) => item.y_coordinate(),
        }
    }

    /// Attempt to resolve the `Device` or `VariationIndex` table for the
    /// x_coordinate, if present
    pub fn x_device(&self) -> Option<Result<DeviceOrVariationIndex<'a>, ReadError>> {
        match self {
            AnchorTable::Format3(inner) => inner.x_device(),
            _ => None,
        }
    }

    /// Attempt to resolve the `Device` or `VariationIndex` table for the
    /// y_coordinate, if present
    pub fn y_device(&self) -> Option<Result<DeviceOrVariationIndex<'a>, ReadError>> {
        match self {
            AnchorTable::Format3(inner) => inner.y_device(),
            _ => None,
        }
    }
}
