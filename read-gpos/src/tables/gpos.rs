//! the [GPOS] table
//!
//! [GPOS]: https://docs.microsoft.com/en-us/typography/opentype/spec/gpos

mod anchor;
mod closure;
mod cursive;
mod mark;
mod pair;
mod single;
mod value_record;

use std::marker::PhantomData;

use crate::prelude::*;

/// reexport stuff from layout that we use
pub use super::layout::{
    ClassDef, CoverageTable, Device, DeviceOrVariationIndex, Lookup, LookupFlag,
};
use super::layout::{ExtensionLookup, Subtables};

pub use anchor::{AnchorFormat1, AnchorFormat2, AnchorFormat3, AnchorTable};
pub use closure::CollectVariationIndices;
pub use cursive::{CursivePosFormat1, EntryExitRecord};
pub use mark::{
    AnchorMatrix, BaseArray, LigatureArray, LigatureAttach, Mark2Array, MarkArray,
    MarkBasePosFormat1, MarkLigPosFormat1, MarkMarkPosFormat1, MarkRecord,
};
pub use pair::{PairPos, PairPosFormat1, PairPosFormat2, PairSet, PairValueRecord};
pub use single::{SinglePos, SinglePosFormat1, SinglePosFormat2};
pub use value_record::{ValueFormat, ValueRecord};

#[doc(hidden)]
pub use anchor::{AnchorFormat1Marker, AnchorFormat2Marker, AnchorFormat3Marker};
#[doc(hidden)]
pub use cursive::CursivePosFormat1Marker;
#[doc(hidden)]
pub use mark::{AnchorMatrixMarker, LigatureArrayMarker, MarkArrayMarker, MarkAttachPosMarker};
#[doc(hidden)]
pub use pair::{PairPosFormat1Marker, PairPosFormat2Marker, PairSetMarker};
#[doc(hidden)]
pub use single::{SinglePosFormat1Marker, SinglePosFormat2Marker};

#[cfg(test)]
#[path = "../tests/test_gpos.rs"]
mod tests;

/// [GPOS Version 1.0](https://docs.microsoft.com/en-us/typography/opentype/spec/gpos#gpos-header)
#[derive(Debug, Clone, Copy)]
#[doc(hidden)]
pub struct GposMarker {
    feature_variations_offset_byte_start: Option<usize>,
}

impl GposMarker {
    pub fn feature_variations_offset_byte_range(&self) -> Option<Range<usize>> {
        let start = self.feature_variations_offset_byte_start?;
        Some(start..start + Offset32::RAW_BYTE_LEN)
    }
}

impl<'a> FontRead<'a> for Gpos<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version: MajorMinor = cursor.read()?;
        if version.major != 1 {
            return Err(ReadError::InvalidFormat(version.major.into()));
        }
        cursor.advance::<Offset16>();
        cursor.advance::<Offset16>();
        cursor.advance::<Offset16>();
        let feature_variations_offset_byte_start = version
            .compatible(MajorMinor::VERSION_1_1)
            .then(|| cursor.position())
            .transpose()?;
        if feature_variations_offset_byte_start.is_some() {
            cursor.advance::<Offset32>();
        }
        cursor.finish(GposMarker {
            feature_variations_offset_byte_start,
        })
    }
}

/// [GPOS Version 1.0](https://docs.microsoft.com/en-us/typography/opentype/spec/gpos#gpos-header)
pub type Gpos<'a> = TableRef<'a, GposMarker>;

impl<'a> Gpos<'a> {
    /// The major and minor version of the GPOS table, as a tuple of u16s.
    pub fn version(&self) -> MajorMinor {
        self.data.read_at(0).unwrap_or(MajorMinor::VERSION_1_0)
    }

    /// Offset to ScriptList table, from beginning of GPOS table
    pub fn script_list_offset(&self) -> Offset16 {
        self.field(4)
    }

    /// Offset to FeatureList table, from beginning of GPOS table
    pub fn feature_list_offset(&self) -> Offset16 {
        self.field(6)
    }

    /// Offset to LookupList table, from beginning of GPOS table
    pub fn lookup_list_offset(&self) -> Offset16 {
        self.field(8)
    }

    /// Attempt to resolve [`lookup_list_offset`][Self::lookup_list_offset].
    pub fn lookup_list(&self) -> Result<PositionLookupList<'a>, ReadError> {
        self.resolve_offset(self.lookup_list_offset())
    }

    /// Offset to FeatureVariations table, from beginning of GPOS table
    /// (may be NULL). Only present in version 1.1.
    pub fn feature_variations_offset(&self) -> Option<Nullable<Offset32>> {
        let range = self.shape.feature_variations_offset_byte_range()?;
        Some(self.field(range.start))
    }
}

/// A typed GPOS [LookupList](super::layout::LookupList) table
pub type PositionLookupList<'a> = super::layout::LookupList<'a, PositionLookup<'a>>;

/// A GPOS [SequenceContext](super::layout::SequenceContext)
pub type PositionSequenceContext<'a> = super::layout::SequenceContext<'a>;

/// A GPOS [ChainedSequenceContext](super::layout::ChainedSequenceContext)
pub type PositionChainContext<'a> = super::layout::ChainedSequenceContext<'a>;

/// [Extension Positioning Subtable Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#extension-positioning-subtable-format-1)
#[derive(Debug)]
#[doc(hidden)]
pub struct ExtensionPosFormat1Marker<T = ()> {
    offset_type: PhantomData<T>,
}

impl<T> Clone for ExtensionPosFormat1Marker<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ExtensionPosFormat1Marker<T> {}

impl<T> Format<u16> for ExtensionPosFormat1Marker<T> {
    const FORMAT: u16 = 1;
}

impl<'a, T> FontRead<'a> for ExtensionPosFormat1<'a, T> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        if format != 1 {
            return Err(ReadError::InvalidFormat(format.into()));
        }
        cursor.advance::<u16>();
        cursor.advance::<Offset32>();
        cursor.finish(ExtensionPosFormat1Marker {
            offset_type: PhantomData,
        })
    }
}

/// [Extension Positioning Subtable Format 1](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#extension-positioning-subtable-format-1)
pub type ExtensionPosFormat1<'a, T> = TableRef<'a, ExtensionPosFormat1Marker<T>>;

impl<'a, T> ExtensionPosFormat1<'a, T> {
    /// Format identifier: format = 1
    pub fn pos_format(&self) -> u16 {
        self.field(0)
    }

    /// Lookup type of subtable referenced by extensionOffset (i.e. the
    /// extension subtable).
    pub fn extension_lookup_type(&self) -> u16 {
        self.field(2)
    }

    /// Offset to the extension subtable, of lookup type
    /// extensionLookupType, relative to the start of the
    /// ExtensionPosFormat1 subtable.
    pub fn extension_offset(&self) -> Offset32 {
        self.field(4)
    }

    /// Attempt to resolve [`extension_offset`][Self::extension_offset].
    pub fn extension(&self) -> Result<T, ReadError>
    where
        T: FontRead<'a>,
    {
        self.resolve_offset(self.extension_offset())
    }
}

impl<'a, T: FontRead<'a>> ExtensionLookup<'a, T> for ExtensionPosFormat1<'a, T> {
    fn extension(&self) -> Result<T, ReadError> {
        self.resolve_offset(self.extension_offset())
    }
}

type PosSubtables<'a, T> = Subtables<'a, T, ExtensionPosFormat1<'a, T>>;

/// The lookup type of extension positioning lookups.
pub const EXTENSION_LOOKUP_TYPE: u16 = 9;

/// A GPOS [Lookup](super::layout::Lookup) table.
///
/// The subtable type depends on the lookup type, which is only known once
/// the lookup has been read; see [`PositionLookup::subtables`].
#[derive(Clone, Copy, Debug)]
pub struct PositionLookup<'a>(Lookup<'a, ()>);

impl<'a> FontRead<'a> for PositionLookup<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Lookup::read(data).map(Self)
    }
}

/// The subtables from a GPOS lookup.
///
/// This type is a convenience that removes the need to dig into the
/// lookup type in order to access subtables, and it also abstracts
/// away the distinction between extension and non-extension lookups.
pub enum PositionSubtables<'a> {
    Single(PosSubtables<'a, SinglePos<'a>>),
    Pair(PosSubtables<'a, PairPos<'a>>),
    Cursive(PosSubtables<'a, CursivePosFormat1<'a>>),
    MarkToBase(PosSubtables<'a, MarkBasePosFormat1<'a>>),
    MarkToLig(PosSubtables<'a, MarkLigPosFormat1<'a>>),
    MarkToMark(PosSubtables<'a, MarkMarkPosFormat1<'a>>),
    Contextual(PosSubtables<'a, PositionSequenceContext<'a>>),
    ChainContextual(PosSubtables<'a, PositionChainContext<'a>>),
}

impl<'a> PositionLookup<'a> {
    /// The untyped lookup table.
    pub fn raw(&self) -> &Lookup<'a, ()> {
        &self.0
    }

    pub fn lookup_flag(&self) -> LookupFlag {
        self.0.lookup_flag()
    }

    /// Different enumerations for GSUB and GPOS
    pub fn lookup_type(&self) -> u16 {
        self.0.lookup_type()
    }

    /// Number of subtables for this lookup
    pub fn sub_table_count(&self) -> u16 {
        self.0.sub_table_count()
    }

    pub fn mark_filtering_set(&self) -> Option<u16> {
        self.0.mark_filtering_set()
    }

    /// The lookup flag combined with the mark filtering set.
    pub fn lookup_props(&self) -> u32 {
        self.0.lookup_props()
    }

    /// The lookup type of the subtables, looking through extension
    /// subtables.
    ///
    /// The type of an extension lookup is taken from its first subtable.
    pub fn effective_lookup_type(&self) -> Result<u16, ReadError> {
        match self.lookup_type() {
            EXTENSION_LOOKUP_TYPE => {
                let offsets = self.0.subtable_offsets();
                let first = offsets.first().ok_or(ReadError::OutOfBounds)?.get();
                let ext: ExtensionPosFormat1<()> = first.resolve(self.0.offset_data())?;
                Ok(ext.extension_lookup_type())
            }
            other => Ok(other),
        }
    }

    /// Return the subtables for this lookup.
    ///
    /// This method handles both extension and non-extension lookups, and saves
    /// the caller needing to dig into the lookup type itself.
    pub fn subtables(&self) -> Result<PositionSubtables<'a>, ReadError> {
        let offsets = self.0.subtable_offsets();
        let data = self.0.offset_data();
        let is_extension = self.lookup_type() == EXTENSION_LOOKUP_TYPE;
        macro_rules! subtables {
            ($variant:ident) => {
                Ok(PositionSubtables::$variant(new_subtables(
                    offsets,
                    data,
                    is_extension,
                )))
            };
        }
        match self.effective_lookup_type()? {
            1 => subtables!(Single),
            2 => subtables!(Pair),
            3 => subtables!(Cursive),
            4 => subtables!(MarkToBase),
            5 => subtables!(MarkToLig),
            6 => subtables!(MarkToMark),
            7 => subtables!(Contextual),
            8 => subtables!(ChainContextual),
            other => Err(ReadError::InvalidFormat(other as _)),
        }
    }
}

fn new_subtables<'a, T: FontRead<'a>>(
    offsets: &'a [BigEndian<Offset16>],
    data: FontData<'a>,
    is_extension: bool,
) -> PosSubtables<'a, T> {
    if is_extension {
        Subtables::new_ext(offsets, data)
    } else {
        Subtables::new(offsets, data)
    }
}
