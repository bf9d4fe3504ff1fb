//! Coverage tables

use crate::collections::IntSet;
use crate::prelude::*;

/// [Coverage Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#coverage-format-1): Individual glyph indices
#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct CoverageFormat1Marker {
    glyph_array_byte_len: usize,
}

impl CoverageFormat1Marker {
    pub fn glyph_array_byte_range(&self) -> Range<usize> {
        4..4 + self.glyph_array_byte_len
    }
}

impl Format<u16> for CoverageFormat1Marker {
    const FORMAT: u16 = 1;
}

impl<'a> FontRead<'a> for CoverageFormat1<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance::<u16>();
        let glyph_count: u16 = cursor.read()?;
        let glyph_array_byte_len = glyph_count as usize * GlyphId16::RAW_BYTE_LEN;
        cursor.advance_by(glyph_array_byte_len);
        cursor.finish(CoverageFormat1Marker {
            glyph_array_byte_len,
        })
    }
}

/// [Coverage Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#coverage-format-1): Individual glyph indices
pub type CoverageFormat1<'a> = TableRef<'a, CoverageFormat1Marker>;

impl<'a> CoverageFormat1<'a> {
    /// Format identifier: format = 1
    pub fn coverage_format(&self) -> u16 {
        self.field(0)
    }

    /// Number of glyphs in the glyph array
    pub fn glyph_count(&self) -> u16 {
        self.field(2)
    }

    /// Array of glyph IDs, in numerical order
    pub fn glyph_array(&self) -> &'a [BigEndian<GlyphId16>] {
        let range = self.shape.glyph_array_byte_range();
        self.data.read_array(range).unwrap_or_default()
    }

    /// Return the coverage index for the provided glyph, if present.
    pub fn get(&self, gid: impl Into<GlyphId>) -> Option<u16> {
        let gid: GlyphId = gid.into();
        let gid16: GlyphId16 = gid.try_into().ok()?;
        let be_glyph: BigEndian<GlyphId16> = gid16.into();
        self.glyph_array()
            .binary_search(&be_glyph)
            .ok()
            .map(|idx| idx as _)
    }
}

/// [Coverage Format 2](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#coverage-format-2): Range of glyphs
#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct CoverageFormat2Marker {
    range_records_byte_len: usize,
}

impl CoverageFormat2Marker {
    pub fn range_records_byte_range(&self) -> Range<usize> {
        4..4 + self.range_records_byte_len
    }
}

impl Format<u16> for CoverageFormat2Marker {
    const FORMAT: u16 = 2;
}

impl<'a> FontRead<'a> for CoverageFormat2<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance::<u16>();
        let range_count: u16 = cursor.read()?;
        let range_records_byte_len = range_count as usize * RangeRecord::RAW_BYTE_LEN;
        cursor.advance_by(range_records_byte_len);
        cursor.finish(CoverageFormat2Marker {
            range_records_byte_len,
        })
    }
}

/// [Coverage Format 2](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#coverage-format-2): Range of glyphs
pub type CoverageFormat2<'a> = TableRef<'a, CoverageFormat2Marker>;

impl<'a> CoverageFormat2<'a> {
    /// Format identifier: format = 2
    pub fn coverage_format(&self) -> u16 {
        self.field(0)
    }

    /// Number of RangeRecords
    pub fn range_count(&self) -> u16 {
        self.field(2)
    }

    /// Array of glyph ranges, ordered by startGlyphID.
    pub fn range_records(&self) -> &'a [RangeRecord] {
        let range = self.shape.range_records_byte_range();
        self.data.read_array(range).unwrap_or_default()
    }

    /// Return the coverage index for the provided glyph, if present.
    pub fn get(&self, gid: impl Into<GlyphId>) -> Option<u16> {
        let gid: GlyphId = gid.into();
        let gid = gid.to_u32();
        let records = self.range_records();
        let idx = records
            .binary_search_by(|rec| {
                if rec.end_glyph_id().to_u32() < gid {
                    std::cmp::Ordering::Less
                } else if rec.start_glyph_id().to_u32() > gid {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .ok()?;
        let record = &records[idx];
        let delta = gid - record.start_glyph_id().to_u32();
        Some(record.start_coverage_index().wrapping_add(delta as u16))
    }
}

/// Used in [CoverageFormat2]
#[derive(Clone, Debug, Copy, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct RangeRecord {
    /// First glyph ID in the range
    pub start_glyph_id: BigEndian<GlyphId16>,
    /// Last glyph ID in the range
    pub end_glyph_id: BigEndian<GlyphId16>,
    /// Coverage Index of first glyph ID in range
    pub start_coverage_index: BigEndian<u16>,
}

impl RangeRecord {
    /// First glyph ID in the range
    pub fn start_glyph_id(&self) -> GlyphId16 {
        self.start_glyph_id.get()
    }

    /// Last glyph ID in the range
    pub fn end_glyph_id(&self) -> GlyphId16 {
        self.end_glyph_id.get()
    }

    /// Coverage Index of first glyph ID in range
    pub fn start_coverage_index(&self) -> u16 {
        self.start_coverage_index.get()
    }

    /// Iterate over the glyphs in this range.
    pub fn iter(&self) -> impl Iterator<Item = GlyphId> {
        (self.start_glyph_id().to_u16()..=self.end_glyph_id().to_u16()).map(GlyphId::from)
    }

    fn len(&self) -> u32 {
        (self.end_glyph_id().to_u32() + 1).saturating_sub(self.start_glyph_id().to_u32())
    }
}

impl FixedSize for RangeRecord {
    const RAW_BYTE_LEN: usize =
        GlyphId16::RAW_BYTE_LEN + GlyphId16::RAW_BYTE_LEN + u16::RAW_BYTE_LEN;
}

/// A [Coverage Table](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#coverage-table).
#[derive(Clone, Copy, Debug)]
pub enum CoverageTable<'a> {
    Format1(CoverageFormat1<'a>),
    Format2(CoverageFormat2<'a>),
}

impl<'a> FontRead<'a> for CoverageTable<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0usize)?;
        match format {
            CoverageFormat1Marker::FORMAT => Ok(Self::Format1(FontRead::read(data)?)),
            CoverageFormat2Marker::FORMAT => Ok(Self::Format2(FontRead::read(data)?)),
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

impl<'a> CoverageTable<'a> {
    /// Return the coverage index for the provided glyph, if present.
    #[inline]
    pub fn get(&self, gid: impl Into<GlyphId>) -> Option<u16> {
        match self {
            CoverageTable::Format1(sub) => sub.get(gid),
            CoverageTable::Format2(sub) => sub.get(gid),
        }
    }

    /// Iterate over the covered glyphs, in coverage index order.
    pub fn iter(&self) -> impl Iterator<Item = GlyphId> + 'a {
        // all one expression so that we have a single return type
        let (iter1, iter2) = match self {
            CoverageTable::Format1(t) => (
                Some(t.glyph_array().iter().map(|g| GlyphId::from(g.get()))),
                None,
            ),
            CoverageTable::Format2(t) => {
                let iter = t.range_records().iter().flat_map(RangeRecord::iter);
                (None, Some(iter))
            }
        };

        iter1
            .into_iter()
            .flatten()
            .chain(iter2.into_iter().flatten())
    }

    /// The number of glyphs covered by this table.
    pub fn population(&self) -> usize {
        match self {
            CoverageTable::Format1(t) => t.glyph_count() as usize,
            CoverageTable::Format2(t) => t
                .range_records()
                .iter()
                .map(|rec| rec.len() as usize)
                .sum(),
        }
    }

    /// Returns `true` if any covered glyph is a member of `glyphs`.
    pub fn intersects(&self, glyphs: &IntSet<GlyphId>) -> bool {
        match self {
            CoverageTable::Format1(t) => t
                .glyph_array()
                .iter()
                .any(|g| glyphs.contains(g.get().into())),
            CoverageTable::Format2(t) => t.range_records().iter().any(|rec| {
                glyphs.intersects_range(rec.start_glyph_id().into()..=rec.end_glyph_id().into())
            }),
        }
    }

    /// Return the covered glyphs that are also members of `glyphs`.
    pub fn intersect_set(&self, glyphs: &IntSet<GlyphId>) -> IntSet<GlyphId> {
        match self {
            CoverageTable::Format1(t) => t
                .glyph_array()
                .iter()
                .map(|g| GlyphId::from(g.get()))
                .filter(|g| glyphs.contains(*g))
                .collect(),
            CoverageTable::Format2(t) => {
                let mut out = IntSet::empty();
                for rec in t.range_records() {
                    let range = rec.start_glyph_id().to_u32()..=rec.end_glyph_id().to_u32();
                    // iterate whichever side is smaller
                    if (rec.len() as usize) < glyphs.len() {
                        out.extend(rec.iter().filter(|g| glyphs.contains(*g)));
                    } else {
                        out.extend(glyphs.iter().filter(|g| range.contains(&g.to_u32())));
                    }
                }
                out
            }
        }
    }

    /// Iterate over `(glyph, coverage index)` pairs for covered glyphs in `glyphs`.
    pub(crate) fn iter_in<'b>(
        &self,
        glyphs: &'b IntSet<GlyphId>,
    ) -> impl Iterator<Item = (GlyphId, u16)> + 'b
    where
        'a: 'b,
    {
        self.iter()
            .enumerate()
            .filter(move |(_, gid)| glyphs.contains(*gid))
            .map(|(idx, gid)| (gid, idx as u16))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpos_test_data::bebuffer::BeBuffer;

    #[test]
    fn format1_binary_search() {
        let buf = BeBuffer::new()
            .push(1u16)
            .push(4u16)
            .extend([3u16, 8, 12, 40]);
        let coverage = CoverageTable::read(FontData::new(buf.as_slice())).unwrap();
        assert_eq!(coverage.get(GlyphId::new(3)), Some(0));
        assert_eq!(coverage.get(GlyphId::new(12)), Some(2));
        assert_eq!(coverage.get(GlyphId::new(40)), Some(3));
        assert_eq!(coverage.get(GlyphId::new(9)), None);
        assert_eq!(coverage.get(GlyphId::new(70_000)), None);
        assert_eq!(coverage.population(), 4);
    }

    #[test]
    fn format2_ranges() {
        let buf = BeBuffer::new()
            .push(2u16)
            .push(2u16)
            .extend([10u16, 14, 0])
            .extend([20u16, 21, 5]);
        let coverage = CoverageTable::read(FontData::new(buf.as_slice())).unwrap();
        assert_eq!(coverage.get(GlyphId::new(10)), Some(0));
        assert_eq!(coverage.get(GlyphId::new(13)), Some(3));
        assert_eq!(coverage.get(GlyphId::new(15)), None);
        assert_eq!(coverage.get(GlyphId::new(21)), Some(6));
        assert_eq!(coverage.population(), 7);
        assert_eq!(
            coverage.iter().map(|g| g.to_u32()).collect::<Vec<_>>(),
            vec![10, 11, 12, 13, 14, 20, 21]
        );
    }

    #[test]
    fn intersection() {
        let buf = BeBuffer::new()
            .push(2u16)
            .push(1u16)
            .extend([10u16, 14, 0]);
        let coverage = CoverageTable::read(FontData::new(buf.as_slice())).unwrap();
        let glyphs: IntSet<GlyphId> = [GlyphId::new(2), GlyphId::new(12)].into();
        assert!(coverage.intersects(&glyphs));
        assert_eq!(
            coverage.intersect_set(&glyphs),
            IntSet::from([GlyphId::new(12)])
        );
        let miss: IntSet<GlyphId> = [GlyphId::new(15)].into();
        assert!(!coverage.intersects(&miss));
    }

    #[test]
    fn truncated_and_unknown_formats() {
        let buf = BeBuffer::new().push(1u16).push(3u16).push(1u16);
        assert_eq!(
            CoverageTable::read(FontData::new(buf.as_slice())).unwrap_err(),
            ReadError::OutOfBounds
        );
        let buf = BeBuffer::new().push(3u16).push(0u16);
        assert_eq!(
            CoverageTable::read(FontData::new(buf.as_slice())).unwrap_err(),
            ReadError::InvalidFormat(3)
        );
    }
}
