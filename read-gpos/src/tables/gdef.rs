//! the [GDEF] table
//!
//! [GDEF]: https://docs.microsoft.com/en-us/typography/opentype/spec/gdef

use crate::prelude::*;

pub use super::layout::{ClassDef, CoverageTable};

#[cfg(test)]
#[path = "../tests/test_gdef.rs"]
mod tests;

/// The [GDEF](https://docs.microsoft.com/en-us/typography/opentype/spec/gdef) table
#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct GdefMarker {
    mark_glyph_sets_def_offset_byte_start: Option<usize>,
    item_var_store_offset_byte_start: Option<usize>,
}

impl GdefMarker {
    pub fn mark_glyph_sets_def_offset_byte_range(&self) -> Option<Range<usize>> {
        let start = self.mark_glyph_sets_def_offset_byte_start?;
        Some(start..start + Offset16::RAW_BYTE_LEN)
    }

    pub fn item_var_store_offset_byte_range(&self) -> Option<Range<usize>> {
        let start = self.item_var_store_offset_byte_start?;
        Some(start..start + Offset32::RAW_BYTE_LEN)
    }
}

impl<'a> FontRead<'a> for Gdef<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version: MajorMinor = cursor.read()?;
        if version.major != 1 {
            return Err(ReadError::InvalidFormat(version.major.into()));
        }
        cursor.advance::<Offset16>();
        cursor.advance::<Offset16>();
        cursor.advance::<Offset16>();
        cursor.advance::<Offset16>();
        let mark_glyph_sets_def_offset_byte_start = version
            .compatible(MajorMinor::VERSION_1_2)
            .then(|| cursor.position())
            .transpose()?;
        if mark_glyph_sets_def_offset_byte_start.is_some() {
            cursor.advance::<Offset16>();
        }
        let item_var_store_offset_byte_start = version
            .compatible(MajorMinor::VERSION_1_3)
            .then(|| cursor.position())
            .transpose()?;
        if item_var_store_offset_byte_start.is_some() {
            cursor.advance::<Offset32>();
        }
        cursor.finish(GdefMarker {
            mark_glyph_sets_def_offset_byte_start,
            item_var_store_offset_byte_start,
        })
    }
}

/// The [GDEF](https://docs.microsoft.com/en-us/typography/opentype/spec/gdef) table
pub type Gdef<'a> = TableRef<'a, GdefMarker>;

impl<'a> Gdef<'a> {
    /// The major/minor version of the GDEF table
    pub fn version(&self) -> MajorMinor {
        self.data.read_at(0).unwrap_or(MajorMinor::VERSION_1_0)
    }

    /// Offset to class definition table for glyph type, from beginning
    /// of GDEF header (may be NULL)
    pub fn glyph_class_def_offset(&self) -> Nullable<Offset16> {
        self.field(4)
    }

    /// Attempt to resolve [`glyph_class_def_offset`][Self::glyph_class_def_offset].
    pub fn glyph_class_def(&self) -> Option<Result<ClassDef<'a>, ReadError>> {
        self.glyph_class_def_offset().resolve(self.data)
    }

    /// Offset to attachment point list table, from beginning of GDEF
    /// header (may be NULL)
    pub fn attach_list_offset(&self) -> Nullable<Offset16> {
        self.field(6)
    }

    /// Offset to ligature caret list table, from beginning of GDEF
    /// header (may be NULL)
    pub fn lig_caret_list_offset(&self) -> Nullable<Offset16> {
        self.field(8)
    }

    /// Offset to class definition table for mark attachment type, from
    /// beginning of GDEF header (may be NULL)
    pub fn mark_attach_class_def_offset(&self) -> Nullable<Offset16> {
        self.field(10)
    }

    /// Attempt to resolve [`mark_attach_class_def_offset`][Self::mark_attach_class_def_offset].
    pub fn mark_attach_class_def(&self) -> Option<Result<ClassDef<'a>, ReadError>> {
        self.mark_attach_class_def_offset().resolve(self.data)
    }

    /// Offset to the table of mark glyph set definitions, from beginning
    /// of GDEF header (may be NULL)
    pub fn mark_glyph_sets_def_offset(&self) -> Option<Nullable<Offset16>> {
        let range = self.shape.mark_glyph_sets_def_offset_byte_range()?;
        Some(self.field(range.start))
    }

    /// Attempt to resolve [`mark_glyph_sets_def_offset`][Self::mark_glyph_sets_def_offset].
    pub fn mark_glyph_sets_def(&self) -> Option<Result<MarkGlyphSets<'a>, ReadError>> {
        self.mark_glyph_sets_def_offset()?.resolve(self.data)
    }

    /// Offset to the Item Variation Store table, from beginning of
    /// GDEF header (may be NULL)
    pub fn item_var_store_offset(&self) -> Option<Nullable<Offset32>> {
        let range = self.shape.item_var_store_offset_byte_range()?;
        Some(self.field(range.start))
    }

    /// `true` if the table carries a glyph class definition.
    pub fn has_glyph_classes(&self) -> bool {
        !self.glyph_class_def_offset().is_null()
    }

    /// The class assigned to `gid` by the glyph class definition table.
    pub fn glyph_class(&self, gid: impl Into<GlyphId>) -> GlyphClassDef {
        let class = match self.glyph_class_def() {
            Some(Ok(class_def)) => class_def.get(gid),
            _ => 0,
        };
        GlyphClassDef::new(class)
    }

    /// The mark attachment class of `gid`, or 0.
    pub fn mark_attachment_class(&self, gid: impl Into<GlyphId>) -> u16 {
        match self.mark_attach_class_def() {
            Some(Ok(class_def)) => class_def.get(gid),
            _ => 0,
        }
    }

    /// The glyph properties used when matching lookups.
    ///
    /// The low byte holds one of the [`glyph_props`] class bits; for marks,
    /// the mark attachment class is stored in the high byte.
    pub fn glyph_props(&self, gid: impl Into<GlyphId>) -> u16 {
        let gid = gid.into();
        match self.glyph_class(gid) {
            GlyphClassDef::Base => glyph_props::BASE_GLYPH,
            GlyphClassDef::Ligature => glyph_props::LIGATURE,
            GlyphClassDef::Mark => {
                let class = self.mark_attachment_class(gid);
                glyph_props::MARK | (class << 8)
            }
            _ => 0,
        }
    }

    /// Returns `true` if mark glyph set `set_index` contains `gid`.
    ///
    /// Missing or malformed sets cover nothing.
    pub fn mark_set_covers(&self, set_index: u16, gid: impl Into<GlyphId>) -> bool {
        match self.mark_glyph_sets_def() {
            Some(Ok(sets)) => sets.covers(set_index, gid),
            _ => false,
        }
    }
}

/// Glyph property bits, as derived from the GDEF glyph class.
///
/// These bits line up with the `IGNORE_*` lookup flags, so that a lookup
/// can test whether a glyph should be skipped with a single mask.
pub mod glyph_props {
    pub const BASE_GLYPH: u16 = 0x02;
    pub const LIGATURE: u16 = 0x04;
    pub const MARK: u16 = 0x08;
}

/// Used in the [Glyph Class Definition Table](https://docs.microsoft.com/en-us/typography/opentype/spec/gdef#glyph-class-definition-table)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GlyphClassDef {
    Base,
    Ligature,
    Mark,
    Component,
    Unknown(u16),
}

impl GlyphClassDef {
    pub fn new(raw: u16) -> Self {
        match raw {
            1 => Self::Base,
            2 => Self::Ligature,
            3 => Self::Mark,
            4 => Self::Component,
            other => Self::Unknown(other),
        }
    }
}

/// The [Mark Glyph Sets](https://docs.microsoft.com/en-us/typography/opentype/spec/gdef#mark-glyph-sets-table) table
#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct MarkGlyphSetsMarker {
    coverage_offsets_byte_len: usize,
}

impl MarkGlyphSetsMarker {
    pub fn coverage_offsets_byte_range(&self) -> Range<usize> {
        4..4 + self.coverage_offsets_byte_len
    }
}

impl Format<u16> for MarkGlyphSetsMarker {
    const FORMAT: u16 = 1;
}

impl<'a> FontRead<'a> for MarkGlyphSets<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        if format != MarkGlyphSetsMarker::FORMAT {
            return Err(ReadError::InvalidFormat(format.into()));
        }
        let mark_glyph_set_count: u16 = cursor.read()?;
        let coverage_offsets_byte_len = mark_glyph_set_count as usize * Offset32::RAW_BYTE_LEN;
        cursor.advance_by(coverage_offsets_byte_len);
        cursor.finish(MarkGlyphSetsMarker {
            coverage_offsets_byte_len,
        })
    }
}

/// The [Mark Glyph Sets](https://docs.microsoft.com/en-us/typography/opentype/spec/gdef#mark-glyph-sets-table) table
pub type MarkGlyphSets<'a> = TableRef<'a, MarkGlyphSetsMarker>;

impl<'a> MarkGlyphSets<'a> {
    /// Format identifier == 1
    pub fn format(&self) -> u16 {
        self.field(0)
    }

    /// Number of mark glyph sets defined
    pub fn mark_glyph_set_count(&self) -> u16 {
        self.field(2)
    }

    /// Array of offsets to mark glyph set coverage tables, from the
    /// start of the MarkGlyphSets table.
    pub fn coverage_offsets(&self) -> &'a [BigEndian<Offset32>] {
        let range = self.shape.coverage_offsets_byte_range();
        self.data.read_array(range).unwrap_or_default()
    }

    /// A dynamically resolving wrapper for [`coverage_offsets`][Self::coverage_offsets].
    pub fn coverages(&self) -> ArrayOfOffsets<'a, CoverageTable<'a>, Offset32> {
        ArrayOfOffsets::new(self.coverage_offsets(), self.data, ())
    }

    /// Returns `true` if set `set_index` contains `gid`.
    pub fn covers(&self, set_index: u16, gid: impl Into<GlyphId>) -> bool {
        self.coverages()
            .get(set_index as usize)
            .map(|coverage| coverage.get(gid).is_some())
            .unwrap_or(false)
    }
}
