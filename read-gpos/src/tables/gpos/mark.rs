//! Mark attachment positioning (lookup types 4, 5 and 6)
//!
//! The three mark attachment subtables share a layout: a mark coverage, a
//! coverage for the glyph the mark attaches to, the mark class count, a
//! [`MarkArray`] and an array of anchors for the attachment target.

use super::AnchorTable;
use crate::prelude::*;
use crate::tables::layout::CoverageTable;

/// [Mark Array](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#mark-array-table)
#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct MarkArrayMarker {
    mark_records_byte_len: usize,
}

impl MarkArrayMarker {
    pub fn mark_records_byte_range(&self) -> Range<usize> {
        2..2 + self.mark_records_byte_len
    }
}

impl<'a> FontRead<'a> for MarkArray<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let mark_count: u16 = cursor.read()?;
        let mark_records_byte_len = mark_count as usize * MarkRecord::RAW_BYTE_LEN;
        cursor.advance_by(mark_records_byte_len);
        cursor.finish(MarkArrayMarker {
            mark_records_byte_len,
        })
    }
}

/// [Mark Array](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#mark-array-table)
pub type MarkArray<'a> = TableRef<'a, MarkArrayMarker>;

impl<'a> MarkArray<'a> {
    /// Number of MarkRecords
    pub fn mark_count(&self) -> u16 {
        self.field(0)
    }

    /// Array of MarkRecords, ordered by corresponding glyphs in the
    /// associated mark Coverage table.
    pub fn mark_records(&self) -> &'a [MarkRecord] {
        let range = self.shape.mark_records_byte_range();
        self.data.read_array(range).unwrap_or_default()
    }

    /// The class and anchor of the mark at `mark_index`.
    pub fn mark(&self, mark_index: u16) -> Result<(u16, AnchorTable<'a>), ReadError> {
        let record = self
            .mark_records()
            .get(mark_index as usize)
            .ok_or(ReadError::OutOfBounds)?;
        Ok((record.mark_class(), record.mark_anchor(self.data)?))
    }
}

/// Part of [MarkArray]
#[derive(Clone, Debug, Copy, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct MarkRecord {
    /// Class defined for the associated mark.
    pub mark_class: BigEndian<u16>,
    /// Offset to Anchor table, from beginning of MarkArray table.
    pub mark_anchor_offset: BigEndian<Offset16>,
}

impl MarkRecord {
    /// Class defined for the associated mark.
    pub fn mark_class(&self) -> u16 {
        self.mark_class.get()
    }

    /// Offset to Anchor table, from beginning of MarkArray table.
    pub fn mark_anchor_offset(&self) -> Offset16 {
        self.mark_anchor_offset.get()
    }

    /// Offset to Anchor table, from beginning of MarkArray table.
    ///
    /// The `data` argument should be retrieved from the parent table
    /// by calling its `offset_data` method.
    pub fn mark_anchor<'a>(&self, data: FontData<'a>) -> Result<AnchorTable<'a>, ReadError> {
        self.mark_anchor_offset().resolve(data)
    }
}

impl FixedSize for MarkRecord {
    const RAW_BYTE_LEN: usize = u16::RAW_BYTE_LEN + Offset16::RAW_BYTE_LEN;
}

/// A row-major matrix of nullable anchor offsets.
///
/// This is the shared layout of the [BaseArray], [Mark2Array] and
/// [LigatureAttach] tables: a row count followed by `rows * class_count`
/// anchor offsets, relative to the start of the matrix.
///
/// [BaseArray]: https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#mark-to-base-attachment-positioning-format-1-mark-to-base-attachment-point
/// [Mark2Array]: https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#mark-to-mark-attachment-positioning-format-1-mark-to-mark-attachment
/// [LigatureAttach]: https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#mark-to-ligature-attachment-positioning-format-1-mark-to-ligature-attachment
#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct AnchorMatrixMarker {
    class_count: u16,
    anchor_offsets_byte_len: usize,
}

impl AnchorMatrixMarker {
    pub fn anchor_offsets_byte_range(&self) -> Range<usize> {
        2..2 + self.anchor_offsets_byte_len
    }
}

impl ReadArgs for AnchorMatrix<'_> {
    type Args = u16;
}

impl<'a> FontReadWithArgs<'a> for AnchorMatrix<'a> {
    fn read_with_args(data: FontData<'a>, args: &u16) -> Result<Self, ReadError> {
        let class_count = *args;
        let mut cursor = data.cursor();
        let row_count: u16 = cursor.read()?;
        let anchor_offsets_byte_len =
            row_count as usize * class_count as usize * Offset16::RAW_BYTE_LEN;
        cursor.advance_by(anchor_offsets_byte_len);
        cursor.finish(AnchorMatrixMarker {
            class_count,
            anchor_offsets_byte_len,
        })
    }
}

impl<'a> AnchorMatrix<'a> {
    /// A constructor that requires additional arguments.
    ///
    /// This type requires some external state in order to be
    /// parsed.
    pub fn read(data: FontData<'a>, class_count: u16) -> Result<Self, ReadError> {
        Self::read_with_args(data, &class_count)
    }
}

/// A row-major matrix of nullable anchor offsets.
pub type AnchorMatrix<'a> = TableRef<'a, AnchorMatrixMarker>;

/// Part of [MarkBasePosFormat1]
pub type BaseArray<'a> = AnchorMatrix<'a>;

/// Part of [MarkMarkPosFormat1]
pub type Mark2Array<'a> = AnchorMatrix<'a>;

/// Part of [MarkLigPosFormat1]
pub type LigatureAttach<'a> = AnchorMatrix<'a>;

impl<'a> AnchorMatrix<'a> {
    /// Number of rows (bases, mark2 glyphs or ligature components).
    pub fn row_count(&self) -> u16 {
        self.field(0)
    }

    /// Number of columns: the mark class count of the parent subtable.
    pub fn class_count(&self) -> u16 {
        self.shape.class_count
    }

    /// The raw anchor offsets, in row-major order.
    pub fn anchor_offsets(&self) -> &'a [BigEndian<Nullable<Offset16>>] {
        let range = self.shape.anchor_offsets_byte_range();
        self.data.read_array(range).unwrap_or_default()
    }

    /// The anchors of one row, with `None` for null entries.
    pub fn row(
        &self,
        row: u16,
    ) -> Result<ArrayOfNullableOffsets<'a, AnchorTable<'a>, Offset16>, ReadError> {
        if row >= self.row_count() {
            return Err(ReadError::OutOfBounds);
        }
        let cols = self.class_count() as usize;
        let start = row as usize * cols;
        let offsets = self
            .anchor_offsets()
            .get(start..start + cols)
            .ok_or(ReadError::OutOfBounds)?;
        Ok(ArrayOfNullableOffsets::new(offsets, self.data, ()))
    }

    /// The anchor at (`row`, `col`).
    ///
    /// Returns `None` if the position is outside the matrix or the entry
    /// is null.
    pub fn anchor(&self, row: u16, col: u16) -> Option<Result<AnchorTable<'a>, ReadError>> {
        if row >= self.row_count() || col >= self.class_count() {
            return None;
        }
        let idx = row as usize * self.class_count() as usize + col as usize;
        self.anchor_offsets().get(idx)?.get().resolve(self.data)
    }
}

/// Part of [MarkLigPosFormat1]
#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct LigatureArrayMarker {
    class_count: u16,
    ligature_attach_offsets_byte_len: usize,
}

impl LigatureArrayMarker {
    pub fn ligature_attach_offsets_byte_range(&self) -> Range<usize> {
        2..2 + self.ligature_attach_offsets_byte_len
    }
}

impl ReadArgs for LigatureArray<'_> {
    type Args = u16;
}

impl<'a> FontReadWithArgs<'a> for LigatureArray<'a> {
    fn read_with_args(data: FontData<'a>, args: &u16) -> Result<Self, ReadError> {
        let class_count = *args;
        let mut cursor = data.cursor();
        let ligature_count: u16 = cursor.read()?;
        let ligature_attach_offsets_byte_len = ligature_count as usize * Offset16::RAW_BYTE_LEN;
        cursor.advance_by(ligature_attach_offsets_byte_len);
        cursor.finish(LigatureArrayMarker {
            class_count,
            ligature_attach_offsets_byte_len,
        })
    }
}

impl<'a> LigatureArray<'a> {
    /// A constructor that requires additional arguments.
    ///
    /// This type requires some external state in order to be
    /// parsed.
    pub fn read(data: FontData<'a>, class_count: u16) -> Result<Self, ReadError> {
        Self::read_with_args(data, &class_count)
    }
}

/// Part of [MarkLigPosFormat1]
pub type LigatureArray<'a> = TableRef<'a, LigatureArrayMarker>;

impl<'a> LigatureArray<'a> {
    /// Number of LigatureAttach table offsets
    pub fn ligature_count(&self) -> u16 {
        self.field(0)
    }

    /// Array of offsets to LigatureAttach tables. Offsets are from
    /// beginning of LigatureArray table, ordered by ligatureCoverage
    /// index.
    pub fn ligature_attach_offsets(&self) -> &'a [BigEndian<Offset16>] {
        let range = self.shape.ligature_attach_offsets_byte_range();
        self.data.read_array(range).unwrap_or_default()
    }

    /// A dynamically resolving wrapper for [`ligature_attach_offsets`][Self::ligature_attach_offsets].
    pub fn ligature_attaches(&self) -> ArrayOfOffsets<'a, LigatureAttach<'a>, Offset16> {
        ArrayOfOffsets::new(
            self.ligature_attach_offsets(),
            self.data,
            self.shape.class_count,
        )
    }
}

/// The shared header of the mark attachment subtables.
///
/// `L` is the lookup type: 4 for mark-to-base, 5 for mark-to-ligature and
/// 6 for mark-to-mark.
#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct MarkAttachPosMarker<const L: u16>;

impl<const L: u16> Format<u16> for MarkAttachPosMarker<L> {
    const FORMAT: u16 = 1;
}

impl<'a, const L: u16> FontRead<'a> for TableRef<'a, MarkAttachPosMarker<L>> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        if format != 1 {
            return Err(ReadError::InvalidFormat(format.into()));
        }
        cursor.advance::<Offset16>();
        cursor.advance::<Offset16>();
        cursor.advance::<u16>();
        cursor.advance::<Offset16>();
        cursor.advance::<Offset16>();
        cursor.finish(MarkAttachPosMarker)
    }
}

/// [Mark-to-Base Attachment Positioning Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#mark-to-base-attachment-positioning-format-1-mark-to-base-attachment-point): Mark-to-base Attachment Point
pub type MarkBasePosFormat1<'a> = TableRef<'a, MarkAttachPosMarker<4>>;

/// [Mark-to-Ligature Positioning Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#mark-to-ligature-attachment-positioning-format-1-mark-to-ligature-attachment): Mark-to-Ligature Attachment
pub type MarkLigPosFormat1<'a> = TableRef<'a, MarkAttachPosMarker<5>>;

/// [Mark-to-Mark Attachment Positioning Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#mark-to-mark-attachment-positioning-format-1-mark-to-mark-attachment): Mark-to-Mark Attachment
pub type MarkMarkPosFormat1<'a> = TableRef<'a, MarkAttachPosMarker<6>>;

impl<'a, const L: u16> TableRef<'a, MarkAttachPosMarker<L>> {
    /// Format identifier: format = 1
    pub fn pos_format(&self) -> u16 {
        self.field(0)
    }

    /// Number of classes defined for marks
    pub fn mark_class_count(&self) -> u16 {
        self.field(6)
    }

    // the attaching mark: mark, mark or mark1
    fn attaching_coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.resolve_offset(self.field::<Offset16>(2))
    }

    // the attachment target: base, ligature or mark2
    fn target_coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.resolve_offset(self.field::<Offset16>(4))
    }

    fn attaching_array(&self) -> Result<MarkArray<'a>, ReadError> {
        self.resolve_offset(self.field::<Offset16>(8))
    }

    fn target_array_offset(&self) -> Offset16 {
        self.field(10)
    }

    fn target_matrix(&self) -> Result<AnchorMatrix<'a>, ReadError> {
        self.target_array_offset()
            .resolve_with_args(self.data, &self.mark_class_count())
    }
}

impl<'a> MarkBasePosFormat1<'a> {
    /// Offset to markCoverage table, from beginning of MarkBasePos
    /// subtable.
    pub fn mark_coverage_offset(&self) -> Offset16 {
        self.field(2)
    }

    /// Attempt to resolve [`mark_coverage_offset`][Self::mark_coverage_offset].
    pub fn mark_coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.attaching_coverage()
    }

    /// Offset to baseCoverage table, from beginning of MarkBasePos
    /// subtable.
    pub fn base_coverage_offset(&self) -> Offset16 {
        self.field(4)
    }

    /// Attempt to resolve [`base_coverage_offset`][Self::base_coverage_offset].
    pub fn base_coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.target_coverage()
    }

    /// Offset to MarkArray table, from beginning of MarkBasePos
    /// subtable.
    pub fn mark_array_offset(&self) -> Offset16 {
        self.field(8)
    }

    /// Attempt to resolve [`mark_array_offset`][Self::mark_array_offset].
    pub fn mark_array(&self) -> Result<MarkArray<'a>, ReadError> {
        self.attaching_array()
    }

    /// Offset to BaseArray table, from beginning of MarkBasePos
    /// subtable.
    pub fn base_array_offset(&self) -> Offset16 {
        self.target_array_offset()
    }

    /// Attempt to resolve [`base_array_offset`][Self::base_array_offset].
    pub fn base_array(&self) -> Result<BaseArray<'a>, ReadError> {
        self.target_matrix()
    }
}

impl<'a> MarkLigPosFormat1<'a> {
    /// Offset to markCoverage table, from beginning of MarkLigPos
    /// subtable.
    pub fn mark_coverage_offset(&self) -> Offset16 {
        self.field(2)
    }

    /// Attempt to resolve [`mark_coverage_offset`][Self::mark_coverage_offset].
    pub fn mark_coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.attaching_coverage()
    }

    /// Offset to ligatureCoverage table, from beginning of MarkLigPos
    /// subtable.
    pub fn ligature_coverage_offset(&self) -> Offset16 {
        self.field(4)
    }

    /// Attempt to resolve [`ligature_coverage_offset`][Self::ligature_coverage_offset].
    pub fn ligature_coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.target_coverage()
    }

    /// Offset to MarkArray table, from beginning of MarkLigPos
    /// subtable.
    pub fn mark_array_offset(&self) -> Offset16 {
        self.field(8)
    }

    /// Attempt to resolve [`mark_array_offset`][Self::mark_array_offset].
    pub fn mark_array(&self) -> Result<MarkArray<'a>, ReadError> {
        self.attaching_array()
    }

    /// Offset to LigatureArray table, from beginning of MarkLigPos
    /// subtable.
    pub fn ligature_array_offset(&self) -> Offset16 {
        self.target_array_offset()
    }

    /// Attempt to resolve [`ligature_array_offset`][Self::ligature_array_offset].
    pub fn ligature_array(&self) -> Result<LigatureArray<'a>, ReadError> {
        self.ligature_array_offset()
            .resolve_with_args(self.data, &self.mark_class_count())
    }
}

impl<'a> MarkMarkPosFormat1<'a> {
    /// Offset to Combining Mark Coverage table, from beginning of
    /// MarkMarkPos subtable.
    pub fn mark1_coverage_offset(&self) -> Offset16 {
        self.field(2)
    }

    /// Attempt to resolve [`mark1_coverage_offset`][Self::mark1_coverage_offset].
    pub fn mark1_coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.attaching_coverage()
    }

    /// Offset to Base Mark Coverage table, from beginning of
    /// MarkMarkPos subtable.
    pub fn mark2_coverage_offset(&self) -> Offset16 {
        self.field(4)
    }

    /// Attempt to resolve [`mark2_coverage_offset`][Self::mark2_coverage_offset].
    pub fn mark2_coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.target_coverage()
    }

    /// Offset to MarkArray table for mark1, from beginning of
    /// MarkMarkPos subtable.
    pub fn mark1_array_offset(&self) -> Offset16 {
        self.field(8)
    }

    /// Attempt to resolve [`mark1_array_offset`][Self::mark1_array_offset].
    pub fn mark1_array(&self) -> Result<MarkArray<'a>, ReadError> {
        self.attaching_array()
    }

    /// Offset to Mark2Array table for mark2, from beginning of
    /// MarkMarkPos subtable.
    pub fn mark2_array_offset(&self) -> Offset16 {
        self.target_array_offset()
    }

    /// Attempt to resolve [`mark2_array_offset`][Self::mark2_array_offset].
    pub fn mark2_array(&self) -> Result<Mark2Array<'a>, ReadError> {
        self.target_matrix()
    }
}
