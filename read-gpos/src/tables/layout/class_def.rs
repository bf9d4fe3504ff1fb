//! Class definition tables

use crate::collections::IntSet;
use crate::prelude::*;

/// [Class Definition Table Format 1](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#class-definition-table-format-1)
#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct ClassDefFormat1Marker {
    class_value_array_byte_len: usize,
}

impl ClassDefFormat1Marker {
    pub fn class_value_array_byte_range(&self) -> Range<usize> {
        6..6 + self.class_value_array_byte_len
    }
}

impl Format<u16> for ClassDefFormat1Marker {
    const FORMAT: u16 = 1;
}

impl<'a> FontRead<'a> for ClassDefFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance::<u16>();
        cursor.advance::<GlyphId16>();
        let glyph_count: u16 = cursor.read()?;
        let class_value_array_byte_len = glyph_count as usize * u16::RAW_BYTE_LEN;
        cursor.advance_by(class_value_array_byte_len);
        cursor.finish(ClassDefFormat1Marker {
            class_value_array_byte_len,
        })
    }
}

/// [Class Definition Table Format 1](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#class-definition-table-format-1)
pub type ClassDefFormat1<'a> = TableRef<'a, ClassDefFormat1Marker>;

impl<'a> ClassDefFormat1<'a> {
    /// Format identifier, format = 1
    pub fn class_format(&self) -> u16 {
        self.field(0)
    }

    /// First glyph ID of the classValueArray
    pub fn start_glyph_id(&self) -> GlyphId16 {
        self.field(2)
    }

    /// Size of the classValueArray
    pub fn glyph_count(&self) -> u16 {
        self.field(4)
    }

    /// Array of Class Values, one per glyph ID
    pub fn class_value_array(&self) -> &'a [BigEndian<u16>] {
        let range = self.shape.class_value_array_byte_range();
        self.data.read_array(range).unwrap_or_default()
    }

    /// Get the class for a glyph id
    pub fn get(&self, gid: GlyphId) -> u16 {
        let start = self.start_glyph_id().to_u32();
        gid.to_u32()
            .checked_sub(start)
            .and_then(|idx| self.class_value_array().get(idx as usize))
            .map(|x| x.get())
            .unwrap_or(0)
    }

    /// Iterate over each glyph and its class.
    pub fn iter(&self) -> impl Iterator<Item = (GlyphId16, u16)> + 'a {
        let start = self.start_glyph_id();
        self.class_value_array()
            .iter()
            .enumerate()
            .map(move |(i, val)| {
                let gid = start.to_u16().saturating_add(i as u16);
                (GlyphId16::new(gid), val.get())
            })
    }
}

/// [Class Definition Table Format 2](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#class-definition-table-format-2)
#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct ClassDefFormat2Marker {
    class_range_records_byte_len: usize,
}

impl ClassDefFormat2Marker {
    pub fn class_range_records_byte_range(&self) -> Range<usize> {
        4..4 + self.class_range_records_byte_len
    }
}

impl Format<u16> for ClassDefFormat2Marker {
    const FORMAT: u16 = 2;
}

impl<'a> FontRead<'a> for ClassDefFormat2<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance::<u16>();
        let class_range_count: u16 = cursor.read()?;
        let class_range_records_byte_len =
            class_range_count as usize * ClassRangeRecord::RAW_BYTE_LEN;
        cursor.advance_by(class_range_records_byte_len);
        cursor.finish(ClassDefFormat2Marker {
            class_range_records_byte_len,
        })
    }
}

/// [Class Definition Table Format 2](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#class-definition-table-format-2)
pub type ClassDefFormat2<'a> = TableRef<'a, ClassDefFormat2Marker>;

impl<'a> ClassDefFormat2<'a> {
    /// Format identifier, format = 2
    pub fn class_format(&self) -> u16 {
        self.field(0)
    }

    /// Number of ClassRangeRecords
    pub fn class_range_count(&self) -> u16 {
        self.field(2)
    }

    /// Array of ClassRangeRecords, ordered by startGlyphID
    pub fn class_range_records(&self) -> &'a [ClassRangeRecord] {
        let range = self.shape.class_range_records_byte_range();
        self.data.read_array(range).unwrap_or_default()
    }

    /// Get the class for a glyph id
    pub fn get(&self, gid: GlyphId) -> u16 {
        let gid = gid.to_u32();
        let records = self.class_range_records();
        records
            .binary_search_by(|rec| {
                if rec.end_glyph_id().to_u32() < gid {
                    std::cmp::Ordering::Less
                } else if rec.start_glyph_id().to_u32() > gid {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .ok()
            .map(|idx| records[idx].class())
            .unwrap_or(0)
    }

    /// Iterate over each glyph and its class.
    pub fn iter(&self) -> impl Iterator<Item = (GlyphId16, u16)> + 'a {
        self.class_range_records().iter().flat_map(|range| {
            let start = range.start_glyph_id().to_u16();
            let end = range.end_glyph_id().to_u16();
            let class = range.class();
            (start..=end).map(move |gid| (GlyphId16::new(gid), class))
        })
    }
}

/// Used in [ClassDefFormat2]
#[derive(Clone, Debug, Copy, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct ClassRangeRecord {
    /// First glyph ID in the range
    pub start_glyph_id: BigEndian<GlyphId16>,
    /// Last glyph ID in the range
    pub end_glyph_id: BigEndian<GlyphId16>,
    /// Applied to all glyphs in the range
    pub class: BigEndian<u16>,
}

impl ClassRangeRecord {
    /// First glyph ID in the range
    pub fn start_glyph_id(&self) -> GlyphId16 {
        self.start_glyph_id.get()
    }

    /// Last glyph ID in the range
    pub fn end_glyph_id(&self) -> GlyphId16 {
        self.end_glyph_id.get()
    }

    /// Applied to all glyphs in the range
    pub fn class(&self) -> u16 {
        self.class.get()
    }
}

impl FixedSize for ClassRangeRecord {
    const RAW_BYTE_LEN: usize =
        GlyphId16::RAW_BYTE_LEN + GlyphId16::RAW_BYTE_LEN + u16::RAW_BYTE_LEN;
}

/// A [Class Definition Table](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#class-definition-table)
#[derive(Clone, Copy, Debug)]
pub enum ClassDef<'a> {
    Format1(ClassDefFormat1<'a>),
    Format2(ClassDefFormat2<'a>),
}

impl<'a> FontRead<'a> for ClassDef<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0usize)?;
        match format {
            ClassDefFormat1Marker::FORMAT => Ok(Self::Format1(FontRead::read(data)?)),
            ClassDefFormat2Marker::FORMAT => Ok(Self::Format2(FontRead::read(data)?)),
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

impl<'a> ClassDef<'a> {
    /// Get the class for a glyph id.
    ///
    /// Glyphs that are not assigned a class are in class 0.
    #[inline]
    pub fn get(&self, gid: impl Into<GlyphId>) -> u16 {
        let gid: GlyphId = gid.into();
        match self {
            ClassDef::Format1(table) => table.get(gid),
            ClassDef::Format2(table) => table.get(gid),
        }
    }

    /// Iterate over each glyph and its class.
    ///
    /// This may include glyphs explicitly assigned to class 0.
    pub fn iter(&self) -> impl Iterator<Item = (GlyphId16, u16)> + 'a {
        let (one, two) = match self {
            Self::Format1(inner) => (Some(inner.iter()), None),
            Self::Format2(inner) => (None, Some(inner.iter())),
        };
        one.into_iter().flatten().chain(two.into_iter().flatten())
    }

    /// Returns `true` if any glyph in `glyphs` is assigned a non-zero class.
    pub fn intersects(&self, glyphs: &IntSet<GlyphId>) -> bool {
        match self {
            Self::Format1(table) => table
                .iter()
                .any(|(gid, class)| class != 0 && glyphs.contains(gid.into())),
            Self::Format2(table) => table.class_range_records().iter().any(|rec| {
                rec.class() != 0
                    && glyphs
                        .intersects_range(rec.start_glyph_id().into()..=rec.end_glyph_id().into())
            }),
        }
    }

    /// Return the set of classes assigned to the glyphs in `glyphs`.
    ///
    /// Class 0 is included if any glyph in the set has no explicit class.
    pub fn intersect_classes(&self, glyphs: &IntSet<GlyphId>) -> IntSet<u16> {
        glyphs.iter().map(|gid| self.get(gid)).collect()
    }

    /// Returns `true` if any glyph in `glyphs` belongs to `class`.
    pub fn intersects_class(&self, glyphs: &IntSet<GlyphId>, class: u16) -> bool {
        if class == 0 {
            return glyphs.iter().any(|gid| self.get(gid) == 0);
        }
        match self {
            Self::Format1(table) => table
                .iter()
                .any(|(gid, val)| val == class && glyphs.contains(gid.into())),
            Self::Format2(table) => table.class_range_records().iter().any(|rec| {
                rec.class() == class
                    && glyphs
                        .intersects_range(rec.start_glyph_id().into()..=rec.end_glyph_id().into())
            }),
        }
    }

    /// Add every glyph explicitly assigned `class` to `glyphs`.
    ///
    /// Class 0 is unbounded and is never collected.
    pub fn collect_glyphs_for_class(&self, class: u16, glyphs: &mut IntSet<GlyphId>) {
        if class == 0 {
            return;
        }
        match self {
            Self::Format1(table) => glyphs.extend(
                table
                    .iter()
                    .filter(|(_, val)| *val == class)
                    .map(|(gid, _)| GlyphId::from(gid)),
            ),
            Self::Format2(table) => {
                for rec in table.class_range_records() {
                    if rec.class() == class {
                        glyphs.insert_range(rec.start_glyph_id().into()..=rec.end_glyph_id().into());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpos_test_data::bebuffer::BeBuffer;

    fn format1() -> BeBuffer {
        BeBuffer::new()
            .push(1u16)
            .push(GlyphId16::new(5))
            .push(3u16)
            .extend([1u16, 0, 2])
    }

    fn format2() -> BeBuffer {
        BeBuffer::new()
            .push(2u16)
            .push(2u16)
            .extend([10u16, 12, 3])
            .extend([20u16, 20, 1])
    }

    #[test]
    fn unassigned_glyphs_are_class_zero() {
        let buf = format1();
        let class_def = ClassDef::read(FontData::new(buf.as_slice())).unwrap();
        assert_eq!(class_def.get(GlyphId16::new(4)), 0);
        assert_eq!(class_def.get(GlyphId16::new(5)), 1);
        assert_eq!(class_def.get(GlyphId16::new(6)), 0);
        assert_eq!(class_def.get(GlyphId16::new(7)), 2);
        assert_eq!(class_def.get(GlyphId16::new(8)), 0);

        let buf = format2();
        let class_def = ClassDef::read(FontData::new(buf.as_slice())).unwrap();
        assert_eq!(class_def.get(GlyphId16::new(9)), 0);
        assert_eq!(class_def.get(GlyphId16::new(11)), 3);
        assert_eq!(class_def.get(GlyphId16::new(15)), 0);
        assert_eq!(class_def.get(GlyphId16::new(20)), 1);
        assert_eq!(class_def.get(GlyphId::new(100_000)), 0);
    }

    #[test]
    fn class_intersection() {
        let buf = format2();
        let class_def = ClassDef::read(FontData::new(buf.as_slice())).unwrap();
        let glyphs: IntSet<GlyphId> = [GlyphId::new(2), GlyphId::new(12)].into();
        assert!(class_def.intersects(&glyphs));
        assert_eq!(class_def.intersect_classes(&glyphs), IntSet::from([0u16, 3]));
        assert!(class_def.intersects_class(&glyphs, 0));
        assert!(class_def.intersects_class(&glyphs, 3));
        assert!(!class_def.intersects_class(&glyphs, 1));

        let mut collected = IntSet::empty();
        class_def.collect_glyphs_for_class(3, &mut collected);
        assert_eq!(
            collected.iter().map(|g| g.to_u32()).collect::<Vec<_>>(),
            vec![10, 11, 12]
        );
    }

    #[test]
    fn iterates_assignments() {
        let buf = format1();
        let class_def = ClassDef::read(FontData::new(buf.as_slice())).unwrap();
        assert_eq!(
            class_def
                .iter()
                .map(|(gid, class)| (gid.to_u16(), class))
                .collect::<Vec<_>>(),
            vec![(5, 1), (6, 0), (7, 2)]
        );
    }
}
