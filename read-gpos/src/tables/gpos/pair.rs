//! Pair adjustment positioning (lookup type 2)

use super::{ValueFormat, ValueRecord};
use crate::prelude::*;
use crate::tables::layout::{ClassDef, CoverageTable};

/// [Pair Adjustment Positioning Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#pair-adjustment-positioning-format-1-adjustments-for-glyph-pairs): Adjustments for Glyph Pairs
#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct PairPosFormat1Marker {
    pair_set_offsets_byte_len: usize,
}

impl PairPosFormat1Marker {
    pub fn pair_set_offsets_byte_range(&self) -> Range<usize> {
        10..10 + self.pair_set_offsets_byte_len
    }
}

impl Format<u16> for PairPosFormat1Marker {
    const FORMAT: u16 = 1;
}

impl<'a> FontRead<'a> for PairPosFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance::<u16>();
        cursor.advance::<Offset16>();
        cursor.advance::<ValueFormat>();
        cursor.advance::<ValueFormat>();
        let pair_set_count: u16 = cursor.read()?;
        let pair_set_offsets_byte_len = pair_set_count as usize * Offset16::RAW_BYTE_LEN;
        cursor.advance_by(pair_set_offsets_byte_len);
        cursor.finish(PairPosFormat1Marker {
            pair_set_offsets_byte_len,
        })
    }
}

/// [Pair Adjustment Positioning Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#pair-adjustment-positioning-format-1-adjustments-for-glyph-pairs): Adjustments for Glyph Pairs
pub type PairPosFormat1<'a> = TableRef<'a, PairPosFormat1Marker>;

impl<'a> PairPosFormat1<'a> {
    /// Format identifier: format = 1
    pub fn pos_format(&self) -> u16 {
        self.field(0)
    }

    /// Offset to Coverage table, from beginning of PairPos subtable.
    pub fn coverage_offset(&self) -> Offset16 {
        self.field(2)
    }

    /// Attempt to resolve [`coverage_offset`][Self::coverage_offset].
    pub fn coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.resolve_offset(self.coverage_offset())
    }

    /// Defines the types of data in valueRecord1, for the first glyph
    /// in the pair (may be zero).
    pub fn value_format1(&self) -> ValueFormat {
        self.field(4)
    }

    /// Defines the types of data in valueRecord2, for the second glyph
    /// in the pair (may be zero).
    pub fn value_format2(&self) -> ValueFormat {
        self.field(6)
    }

    /// Number of PairSet tables
    pub fn pair_set_count(&self) -> u16 {
        self.field(8)
    }

    /// Array of offsets to PairSet tables. Offsets are from beginning
    /// of PairPos subtable, ordered by Coverage Index.
    pub fn pair_set_offsets(&self) -> &'a [BigEndian<Offset16>] {
        let range = self.shape.pair_set_offsets_byte_range();
        self.data.read_array(range).unwrap_or_default()
    }

    /// A dynamically resolving wrapper for [`pair_set_offsets`][Self::pair_set_offsets].
    pub fn pair_sets(&self) -> ArrayOfOffsets<'a, PairSet<'a>, Offset16> {
        let args = (self.value_format1(), self.value_format2());
        ArrayOfOffsets::new(self.pair_set_offsets(), self.data, args)
    }
}

/// Part of [PairPosFormat1]
#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct PairSetMarker {
    value_format1: ValueFormat,
    value_format2: ValueFormat,
    pair_value_records_byte_len: usize,
}

impl PairSetMarker {
    pub fn pair_value_records_byte_range(&self) -> Range<usize> {
        2..2 + self.pair_value_records_byte_len
    }
}

impl ReadArgs for PairSet<'_> {
    type Args = (ValueFormat, ValueFormat);
}

impl<'a> FontReadWithArgs<'a> for PairSet<'a> {
    fn read_with_args(
        data: FontData<'a>,
        args: &(ValueFormat, ValueFormat),
    ) -> Result<Self, ReadError> {
        let (value_format1, value_format2) = *args;
        let mut cursor = data.cursor();
        let pair_value_count: u16 = cursor.read()?;
        let pair_value_records_byte_len = (pair_value_count as usize)
            .checked_mul(<PairValueRecord as ComputeSize>::compute_size(args)?)
            .ok_or(ReadError::OutOfBounds)?;
        cursor.advance_by(pair_value_records_byte_len);
        cursor.finish(PairSetMarker {
            value_format1,
            value_format2,
            pair_value_records_byte_len,
        })
    }
}

impl<'a> PairSet<'a> {
    /// A constructor that requires additional arguments.
    ///
    /// This type requires some external state in order to be
    /// parsed.
    pub fn read(
        data: FontData<'a>,
        value_format1: ValueFormat,
        value_format2: ValueFormat,
    ) -> Result<Self, ReadError> {
        let args = (value_format1, value_format2);
        Self::read_with_args(data, &args)
    }
}

/// Part of [PairPosFormat1]
pub type PairSet<'a> = TableRef<'a, PairSetMarker>;

impl<'a> PairSet<'a> {
    /// Number of PairValueRecords
    pub fn pair_value_count(&self) -> u16 {
        self.field(0)
    }

    /// Array of PairValueRecords, ordered by glyph ID of the second
    /// glyph.
    pub fn pair_value_records(&self) -> Result<ComputedArray<'a, PairValueRecord>, ReadError> {
        let range = self.shape.pair_value_records_byte_range();
        self.data
            .read_with_args(range, &(self.shape.value_format1, self.shape.value_format2))
    }

    /// Binary search for the record whose second glyph is `second_glyph`.
    ///
    /// Device offsets in the returned record are relative to this pair set.
    pub fn find(
        &self,
        second_glyph: impl Into<GlyphId>,
    ) -> Option<Result<PairValueRecord, ReadError>> {
        let second_glyph = second_glyph.into();
        let args = (self.shape.value_format1, self.shape.value_format2);
        let record_len = PairValueRecord::record_len(&args);
        let records = self.data.slice(self.shape.pair_value_records_byte_range())?;
        let mut lo = 0usize;
        let mut hi = self.pair_value_count() as usize;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let start = mid * record_len;
            let glyph: GlyphId16 = match records.read_at(start) {
                Ok(glyph) => glyph,
                Err(e) => return Some(Err(e)),
            };
            match GlyphId::from(glyph).cmp(&second_glyph) {
                std::cmp::Ordering::Less => lo = mid + 1,
                std::cmp::Ordering::Greater => hi = mid,
                std::cmp::Ordering::Equal => {
                    return Some(records.read_with_args(start..start + record_len, &args))
                }
            }
        }
        None
    }
}

/// Part of [PairSet]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairValueRecord {
    /// Glyph ID of second glyph in the pair (first glyph is listed in
    /// the Coverage table).
    pub second_glyph: BigEndian<GlyphId16>,
    /// Positioning data for the first glyph in the pair.
    pub value_record1: ValueRecord,
    /// Positioning data for the second glyph in the pair.
    pub value_record2: ValueRecord,
}

impl PairValueRecord {
    /// Glyph ID of second glyph in the pair
    pub fn second_glyph(&self) -> GlyphId16 {
        self.second_glyph.get()
    }

    /// Positioning data for the first glyph in the pair.
    pub fn value_record1(&self) -> &ValueRecord {
        &self.value_record1
    }

    /// Positioning data for the second glyph in the pair.
    pub fn value_record2(&self) -> &ValueRecord {
        &self.value_record2
    }

    fn record_len(args: &(ValueFormat, ValueFormat)) -> usize {
        GlyphId16::RAW_BYTE_LEN + args.0.record_byte_len() + args.1.record_byte_len()
    }
}

impl ReadArgs for PairValueRecord {
    type Args = (ValueFormat, ValueFormat);
}

impl ComputeSize for PairValueRecord {
    fn compute_size(args: &(ValueFormat, ValueFormat)) -> Result<usize, ReadError> {
        Ok(Self::record_len(args))
    }
}

impl<'a> FontReadWithArgs<'a> for PairValueRecord {
    fn read_with_args(data: FontData<'a>, args: &Self::Args) -> Result<Self, ReadError> {
        let (value_format1, value_format2) = *args;
        let mut cursor = data.cursor();
        Ok(PairValueRecord {
            second_glyph: cursor.read_be()?,
            value_record1: cursor.read_with_args(&value_format1)?,
            value_record2: cursor.read_with_args(&value_format2)?,
        })
    }
}

/// [Pair Adjustment Positioning Format 2](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#pair-adjustment-positioning-format-2-class-pair-adjustment): Class Pair Adjustment
#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct PairPosFormat2Marker {
    class1_records_byte_len: usize,
}

impl PairPosFormat2Marker {
    pub fn class1_records_byte_range(&self) -> Range<usize> {
        16..16 + self.class1_records_byte_len
    }
}

impl Format<u16> for PairPosFormat2Marker {
    const FORMAT: u16 = 2;
}

impl<'a> FontRead<'a> for PairPosFormat2<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance::<u16>();
        cursor.advance::<Offset16>();
        let value_format1: ValueFormat = cursor.read()?;
        let value_format2: ValueFormat = cursor.read()?;
        cursor.advance::<Offset16>();
        cursor.advance::<Offset16>();
        let class1_count: u16 = cursor.read()?;
        let class2_count: u16 = cursor.read()?;
        let record_len = value_format1.record_byte_len() + value_format2.record_byte_len();
        let class1_records_byte_len = (class1_count as usize)
            .checked_mul(class2_count as usize)
            .and_then(|n| n.checked_mul(record_len))
            .ok_or(ReadError::OutOfBounds)?;
        cursor.advance_by(class1_records_byte_len);
        cursor.finish(PairPosFormat2Marker {
            class1_records_byte_len,
        })
    }
}

/// [Pair Adjustment Positioning Format 2](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#pair-adjustment-positioning-format-2-class-pair-adjustment): Class Pair Adjustment
pub type PairPosFormat2<'a> = TableRef<'a, PairPosFormat2Marker>;

impl<'a> PairPosFormat2<'a> {
    /// Format identifier: format = 2
    pub fn pos_format(&self) -> u16 {
        self.field(0)
    }

    /// Offset to Coverage table, from beginning of PairPos subtable.
    pub fn coverage_offset(&self) -> Offset16 {
        self.field(2)
    }

    /// Attempt to resolve [`coverage_offset`][Self::coverage_offset].
    pub fn coverage(&self) -> Result<CoverageTable<'a>, ReadError> {
        self.resolve_offset(self.coverage_offset())
    }

    /// ValueRecord definition for the first glyph of the pair (may be zero).
    pub fn value_format1(&self) -> ValueFormat {
        self.field(4)
    }

    /// ValueRecord definition for the second glyph of the pair (may be zero).
    pub fn value_format2(&self) -> ValueFormat {
        self.field(6)
    }

    /// Offset to ClassDef table, from beginning of PairPos subtable,
    /// for the first glyph of the pair.
    pub fn class_def1_offset(&self) -> Offset16 {
        self.field(8)
    }

    /// Attempt to resolve [`class_def1_offset`][Self::class_def1_offset].
    pub fn class_def1(&self) -> Result<ClassDef<'a>, ReadError> {
        self.resolve_offset(self.class_def1_offset())
    }

    /// Offset to ClassDef table, from beginning of PairPos subtable,
    /// for the second glyph of the pair.
    pub fn class_def2_offset(&self) -> Offset16 {
        self.field(10)
    }

    /// Attempt to resolve [`class_def2_offset`][Self::class_def2_offset].
    pub fn class_def2(&self) -> Result<ClassDef<'a>, ReadError> {
        self.resolve_offset(self.class_def2_offset())
    }

    /// Number of classes in classDef1 table, includes Class 0.
    pub fn class1_count(&self) -> u16 {
        self.field(12)
    }

    /// Number of classes in classDef2 table, includes Class 0.
    pub fn class2_count(&self) -> u16 {
        self.field(14)
    }

    /// Returns the pair of value records for the given classes.
    ///
    /// The `class1` and `class2` parameters can be computed by passing the
    /// first and second glyphs of the pair to the [`ClassDef`]s returned by
    /// [`Self::class_def1`] and [`Self::class_def2`] respectively. Device
    /// offsets in the records are relative to this subtable.
    pub fn values(&self, class1: u16, class2: u16) -> Result<[ValueRecord; 2], ReadError> {
        if class1 >= self.class1_count() || class2 >= self.class2_count() {
            return Err(ReadError::OutOfBounds);
        }
        let format1 = self.value_format1();
        let format1_len = format1.record_byte_len();
        let format2 = self.value_format2();
        let record_size = format1_len + format2.record_byte_len();
        // Compute an offset into the 2D array of positioning records
        let record_offset = (class1 as usize * record_size * self.class2_count() as usize)
            + (class2 as usize * record_size)
            + self.shape.class1_records_byte_range().start;
        let data = self
            .data
            .split_off(record_offset)
            .ok_or(ReadError::OutOfBounds)?;
        let record1 = ValueRecord::read(data, format1)?;
        let data = data.split_off(format1_len).ok_or(ReadError::OutOfBounds)?;
        let record2 = ValueRecord::read(data, format2)?;
        Ok([record1, record2])
    }
}

/// A [PairPos](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#lookup-type-2-pair-adjustment-positioning-subtable) subtable
#[derive(Clone, Debug)]
pub enum PairPos<'a> {
    Format1(PairPosFormat1<'a>),
    Format2(PairPosFormat2<'a>),
}

impl<'a> FontRead<'a> for PairPos<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        match format {
            PairPosFormat1Marker::FORMAT => Ok(Self::Format1(FontRead::read(data)?)),
            PairPosFormat2Marker::FORMAT => Ok(Self::Format2(FontRead::read(data)?)),
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

impl<'a> PairPos<'a> {
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

    /// The format of the value record applied to the first glyph.
    pub fn value_format1(&self) -> ValueFormat {
        match self {
            Self::Format1(item) => item.value_format1(),
            Self::Format2(item) => item.value_format1(),
        }
    }

    /// The format of the value record applied to the second glyph.
    pub fn value_format2(&self) -> ValueFormat {
        match self {
            Self::Format1(item) => item.value_format2(),
            Self::Format2(item) => item.value_format2(),
        }
    }
}
