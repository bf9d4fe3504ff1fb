//! Single adjustment positioning (lookup type 1)

use super::{ValueFormat, ValueRecord};
use crate::prelude::*;
use crate::tables::layout::CoverageTable;

/// [Single Adjustment Positioning Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#single-adjustment-positioning-format-1-single-positioning-value): Single Positioning Value
#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct SinglePosFormat1Marker {
    value_record_byte_len: usize,
}

impl SinglePosFormat1Marker {
    pub fn value_record_byte_range(&self) -> Range<usize> {
        6..6 + self.value_record_byte_len
    }
}

impl Format<u16> for SinglePosFormat1Marker {
    const FORMAT: u16 = 1;
}

impl<'a> FontRead<'a> for SinglePosFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance::<u16>();
        cursor.advance::<Offset16>();
        let value_format: ValueFormat = cursor.read()?;
        let value_record_byte_len = value_format.record_byte_len();
        cursor.advance_by(value_record_byte_len);
        cursor.finish(SinglePosFormat1Marker {
            value_record_byte_len,
        })
    }
}

/// [Single Adjustment Positioning Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#single-adjustment-positioning-format-1-single-positioning-value): Single Positioning Value
pub type SinglePosFormat1<'a> = TableRef<'a, SinglePosFormat1Marker>;

impl<'a> SinglePosFormat1<'a> {
    /// Format identifier: format = 1
    pub fn pos_format(&self) -> u16 {
        self.field(0)
    }

    /// Offset to Coverage table, from beginning of SinglePos subtable.
    pub fn coverage_offset(&self) -> Offset16 {
        self.field(2)
    }

    /// Attempt to resolve [`coverage_offset`][Self::coverage_offset].
    pub fn coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.resolve_offset(self.coverage_offset())
    }

    /// Defines the types of data in the ValueRecord.
    pub fn value_format(&self) -> ValueFormat {
        self.field(4)
    }

    /// Defines positioning value(s), applied to all glyphs in the
    /// Coverage table.
    pub fn value_record(&self) -> ValueRecord {
        let range = self.shape.value_record_byte_range();
        self.data
            .read_with_args(range, &self.value_format())
            .unwrap_or_default()
    }
}

/// [Single Adjustment Positioning Format 2](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#single-adjustment-positioning-format-2-array-of-positioning-values): Array of Positioning Values
#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct SinglePosFormat2Marker {
    value_records_byte_len: usize,
}

impl SinglePosFormat2Marker {
    pub fn value_records_byte_range(&self) -> Range<usize> {
        8..8 + self.value_records_byte_len
    }
}

impl Format<u16> for SinglePosFormat2Marker {
    const FORMAT: u16 = 2;
}

impl<'a> FontRead<'a> for SinglePosFormat2<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance::<u16>();
        cursor.advance::<Offset16>();
        let value_format: ValueFormat = cursor.read()?;
        let value_count: u16 = cursor.read()?;
        let value_records_byte_len = (value_count as usize)
            .checked_mul(value_format.record_byte_len())
            .ok_or(ReadError::OutOfBounds)?;
        cursor.advance_by(value_records_byte_len);
        cursor.finish(SinglePosFormat2Marker {
            value_records_byte_len,
        })
    }
}

/// [Single Adjustment Positioning Format 2](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#single-adjustment-positioning-format-2-array-of-positioning-values): Array of Positioning Values
pub type SinglePosFormat2<'a> = TableRef<'a, SinglePosFormat2Marker>;

impl<'a> SinglePosFormat2<'a> {
    /// Format identifier: format = 2
    pub fn pos_format(&self) -> u16 {
        self.field(0)
    }

    /// Offset to Coverage table, from beginning of SinglePos subtable.
    pub fn coverage_offset(&self) -> Offset16 {
        self.field(2)
    }

    /// Attempt to resolve [`coverage_offset`][Self::coverage_offset].
    pub fn coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.resolve_offset(self.coverage_offset())
    }

    /// Defines the types of data in the ValueRecords.
    pub fn value_format(&self) -> ValueFormat {
        self.field(4)
    }

    /// Number of ValueRecords: must equal glyphCount in Coverage table.
    pub fn value_count(&self) -> u16 {
        self.field(6)
    }

    /// Array of ValueRecords: positioning values applied to glyphs.
    pub fn value_records(&self) -> Result<ComputedArray<'a, ValueRecord>, ReadError> {
        let range = self.shape.value_records_byte_range();
        self.data.read_with_args(range, &self.value_format())
    }
}

/// A [SinglePos](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#lookup-type-1-single-adjustment-positioning-subtable) subtable
#[derive(Clone, Debug)]
pub enum SinglePos<'a> {
    Format1(SinglePosFormat1<'a>),
    Format2(SinglePosFormat2<'a>),
}

impl<'a> FontRead<'a> for SinglePos<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        match format {
            SinglePosFormat1Marker::FORMAT => Ok(Self::Format1(FontRead::read(data)?)),
            SinglePosFormat2Marker::FORMAT => Ok(Self::Format2(FontRead::read(data)?)),
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

impl<'a> SinglePos<'a> {
    /// Format identifier
    pub fn pos_format(&self) -> u16 {
        match self {
            Self::Format1(item) => item.pos_format(),
            Self::Format2(item) => item.pos_format(),
        }
    }

    /// Attempt to resolve the coverage table.
    pub fn coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        match self {
            Self::Format1(item) => item.coverage(),
            Self::Format2(item) => item.coverage(),
        }
    }

    /// The data that device offsets in this subtable's value records are
    /// resolved against.
    pub fn offset_data(&self) -> FontData<'a> {
        match self {
            Self::Format1(item) => item.offset_data(),
            Self::Format2(item) => item.offset_data(),
        }
    }

    /// The value record for the glyph at `coverage_index`.
    pub fn value_record(&self, coverage_index: u16) -> Result<ValueRecord, ReadError> {
        match self {
            Self::Format1(item) => Ok(item.value_record()),
            Self::Format2(item) => {
                if coverage_index >= item.value_count() {
                    return Err(ReadError::OutOfBounds);
                }
                let format = item.value_format();
                // zero-sized records can't be located in the array
                if format.record_byte_len() == 0 {
                    return Ok(ValueRecord {
                        format,
                        ..Default::default()
                    });
                }
                item.value_records()?.get(coverage_index as usize)
            }
        }
    }
}
