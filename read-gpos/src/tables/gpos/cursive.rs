//! Cursive attachment positioning (lookup type 3)

use super::AnchorTable;
use crate::prelude::*;
use crate::tables::layout::CoverageTable;

/// [Cursive Attachment Positioning Format1](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#cursive-attachment-positioning-format1-cursive-attachment): Cursive attachment
#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct CursivePosFormat1Marker {
    entry_exit_record_byte_len: usize,
}

impl CursivePosFormat1Marker {
    pub fn entry_exit_record_byte_range(&self) -> Range<usize> {
        6..6 + self.entry_exit_record_byte_len
    }
}

impl Format<u16> for CursivePosFormat1Marker {
    const FORMAT: u16 = 1;
}

impl<'a> FontRead<'a> for CursivePosFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        if format != CursivePosFormat1Marker::FORMAT {
            return Err(ReadError::InvalidFormat(format.into()));
        }
        cursor.advance::<Offset16>();
        let entry_exit_count: u16 = cursor.read()?;
        let entry_exit_record_byte_len =
            entry_exit_count as usize * EntryExitRecord::RAW_BYTE_LEN;
        cursor.advance_by(entry_exit_record_byte_len);
        cursor.finish(CursivePosFormat1Marker {
            entry_exit_record_byte_len,
        })
    }
}

/// [Cursive Attachment Positioning Format1](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#cursive-attachment-positioning-format1-cursive-attachment): Cursive attachment
pub type CursivePosFormat1<'a> = TableRef<'a, CursivePosFormat1Marker>;

impl<'a> CursivePosFormat1<'a> {
    /// Format identifier: format = 1
    pub fn pos_format(&self) -> u16 {
        self.field(0)
    }

    /// Offset to Coverage table, from beginning of CursivePos subtable.
    pub fn coverage_offset(&self) -> Offset16 {
        self.field(2)
    }

    /// Attempt to resolve [`coverage_offset`][Self::coverage_offset].
    pub fn coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.resolve_offset(self.coverage_offset())
    }

    /// Number of EntryExit records
    pub fn entry_exit_count(&self) -> u16 {
        self.field(4)
    }

    /// Array of EntryExit records, in Coverage index order.
    pub fn entry_exit_record(&self) -> &'a [EntryExitRecord] {
        let range = self.shape.entry_exit_record_byte_range();
        self.data.read_array(range).unwrap_or_default()
    }
}

/// Part of [CursivePosFormat1]
#[derive(Clone, Debug, Copy, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct EntryExitRecord {
    /// Offset to entryAnchor table, from beginning of CursivePos
    /// subtable (may be NULL).
    pub entry_anchor_offset: BigEndian<Nullable<Offset16>>,
    /// Offset to exitAnchor table, from beginning of CursivePos
    /// subtable (may be NULL).
    pub exit_anchor_offset: BigEndian<Nullable<Offset16>>,
}

impl EntryExitRecord {
    /// Offset to entryAnchor table, from beginning of CursivePos
    /// subtable (may be NULL).
    pub fn entry_anchor_offset(&self) -> Nullable<Offset16> {
        self.entry_anchor_offset.get()
    }

    /// Offset to entryAnchor table, from beginning of CursivePos
    /// subtable (may be NULL).
    ///
    /// The `data` argument should be retrieved from the parent table
    /// by calling its `offset_data` method.
    pub fn entry_anchor<'a>(
        &self,
        data: FontData<'a>,
    ) -> Option<Result<AnchorTable<'a>, ReadError>> {
        self.entry_anchor_offset().resolve(data)
    }

    /// Offset to exitAnchor table, from beginning of CursivePos
    /// subtable (may be NULL).
    pub fn exit_anchor_offset(&self) -> Nullable<Offset16> {
        self.exit_anchor_offset.get()
    }

    /// Offset to exitAnchor table, from beginning of CursivePos
    /// subtable (may be NULL).
    ///
    /// The `data` argument should be retrieved from the parent table
    /// by calling its `offset_data` method.
    pub fn exit_anchor<'a>(
        &self,
        data: FontData<'a>,
    ) -> Option<Result<AnchorTable<'a>, ReadError>> {
        self.exit_anchor_offset().resolve(data)
    }
}

impl FixedSize for EntryExitRecord {
    const RAW_BYTE_LEN: usize = Offset16::RAW_BYTE_LEN + Offset16::RAW_BYTE_LEN;
}
