//! Lookup tables and lookup lists

use std::marker::PhantomData;

use super::LookupFlag;
use crate::prelude::*;

/// [Lookup List Table](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#lookup-list-table)
#[derive(Debug)]
#[doc(hidden)]
pub struct LookupListMarker<T = ()> {
    lookup_offsets_byte_len: usize,
    offset_type: PhantomData<T>,
}

impl<T> LookupListMarker<T> {
    pub fn lookup_offsets_byte_range(&self) -> Range<usize> {
        2..2 + self.lookup_offsets_byte_len
    }
}

impl<T> Clone for LookupListMarker<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for LookupListMarker<T> {}

impl<'a, T> FontRead<'a> for LookupList<'a, T> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let lookup_count: u16 = cursor.read()?;
        let lookup_offsets_byte_len = lookup_count as usize * Offset16::RAW_BYTE_LEN;
        cursor.advance_by(lookup_offsets_byte_len);
        cursor.finish(LookupListMarker {
            lookup_offsets_byte_len,
            offset_type: PhantomData,
        })
    }
}

/// [Lookup List Table](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#lookup-list-table)
pub type LookupList<'a, T> = TableRef<'a, LookupListMarker<T>>;

impl<'a, T> LookupList<'a, T> {
    /// Number of lookups in this table
    pub fn lookup_count(&self) -> u16 {
        self.field(0)
    }

    /// Array of offsets to Lookup tables, from beginning of LookupList
    /// (zero based: the first lookup is Lookup index = 0)
    pub fn lookup_offsets(&self) -> &'a [BigEndian<Offset16>] {
        let range = self.shape.lookup_offsets_byte_range();
        self.data.read_array(range).unwrap_or_default()
    }

    /// A dynamically resolving wrapper for [`lookup_offsets`][Self::lookup_offsets].
    pub fn lookups(&self) -> ArrayOfOffsets<'a, T, Offset16>
    where
        T: FontRead<'a>,
    {
        ArrayOfOffsets::new(self.lookup_offsets(), self.data, ())
    }
}

/// [Lookup Table](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#lookup-table)
#[derive(Debug)]
#[doc(hidden)]
pub struct LookupMarker<T = ()> {
    subtable_offsets_byte_len: usize,
    mark_filtering_set_byte_start: Option<usize>,
    offset_type: PhantomData<T>,
}

impl<T> LookupMarker<T> {
    pub fn subtable_offsets_byte_range(&self) -> Range<usize> {
        6..6 + self.subtable_offsets_byte_len
    }

    pub fn mark_filtering_set_byte_range(&self) -> Option<Range<usize>> {
        let start = self.mark_filtering_set_byte_start?;
        Some(start..start + u16::RAW_BYTE_LEN)
    }
}

impl<T> Clone for LookupMarker<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for LookupMarker<T> {}

impl<'a, T> FontRead<'a> for Lookup<'a, T> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance::<u16>();
        let lookup_flag: LookupFlag = cursor.read()?;
        let sub_table_count: u16 = cursor.read()?;
        let subtable_offsets_byte_len = sub_table_count as usize * Offset16::RAW_BYTE_LEN;
        cursor.advance_by(subtable_offsets_byte_len);
        let mark_filtering_set_byte_start = lookup_flag
            .contains(LookupFlag::USE_MARK_FILTERING_SET)
            .then(|| cursor.position())
            .transpose()?;
        if mark_filtering_set_byte_start.is_some() {
            cursor.advance::<u16>();
        }
        cursor.finish(LookupMarker {
            subtable_offsets_byte_len,
            mark_filtering_set_byte_start,
            offset_type: PhantomData,
        })
    }
}

/// [Lookup Table](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#lookup-table)
pub type Lookup<'a, T> = TableRef<'a, LookupMarker<T>>;

impl<'a, T> Lookup<'a, T> {
    /// Different enumerations for GSUB and GPOS
    pub fn lookup_type(&self) -> u16 {
        self.field(0)
    }

    /// Lookup qualifiers
    pub fn lookup_flag(&self) -> LookupFlag {
        self.field(2)
    }

    /// Number of subtables for this lookup
    pub fn sub_table_count(&self) -> u16 {
        self.field(4)
    }

    /// Array of offsets to lookup subtables, from beginning of Lookup table
    pub fn subtable_offsets(&self) -> &'a [BigEndian<Offset16>] {
        let range = self.shape.subtable_offsets_byte_range();
        self.data.read_array(range).unwrap_or_default()
    }

    /// Index (base 0) into GDEF mark glyph sets structure. This field
    /// is only present if the USE_MARK_FILTERING_SET lookup flag is set.
    pub fn mark_filtering_set(&self) -> Option<u16> {
        let range = self.shape.mark_filtering_set_byte_range()?;
        self.data.read_at(range.start).ok()
    }

    /// The lookup flag combined with the mark filtering set.
    ///
    /// The filtering set index occupies the high 16 bits when
    /// `USE_MARK_FILTERING_SET` is set.
    pub fn lookup_props(&self) -> u32 {
        let flag = self.lookup_flag().to_bits() as u32;
        match self.mark_filtering_set() {
            Some(set) => flag | ((set as u32) << 16),
            None => flag,
        }
    }

    /// A dynamically resolving wrapper for [`subtable_offsets`][Self::subtable_offsets].
    pub fn subtables(&self) -> ArrayOfOffsets<'a, T, Offset16>
    where
        T: FontRead<'a>,
    {
        ArrayOfOffsets::new(self.subtable_offsets(), self.data, ())
    }
}

/// A trait that abstracts the behaviour of an extension subtable
///
/// This is necessary because GPOS and GSUB have different concrete types
/// for their extension lookups.
pub trait ExtensionLookup<'a, T: FontRead<'a>>: FontRead<'a> {
    fn extension(&self) -> Result<T, ReadError>;
}

/// an array of subtables, maybe behind extension lookups
///
/// This is used to implement more ergonomic access to lookup subtables for
/// GPOS & GSUB lookup tables.
pub struct Subtables<'a, T: FontRead<'a>, Ext: ExtensionLookup<'a, T>> {
    offsets: &'a [BigEndian<Offset16>],
    data: FontData<'a>,
    is_extension: bool,
    phantom: PhantomData<fn() -> (T, Ext)>,
}

impl<'a, T: FontRead<'a>, Ext: ExtensionLookup<'a, T>> Subtables<'a, T, Ext> {
    /// create a new subtables array given offsets to non-extension subtables
    pub(crate) fn new(offsets: &'a [BigEndian<Offset16>], data: FontData<'a>) -> Self {
        Subtables {
            offsets,
            data,
            is_extension: false,
            phantom: PhantomData,
        }
    }

    /// create a new subtables array given offsets to extension subtables
    pub(crate) fn new_ext(offsets: &'a [BigEndian<Offset16>], data: FontData<'a>) -> Self {
        Subtables {
            offsets,
            data,
            is_extension: true,
            phantom: PhantomData,
        }
    }

    /// The number of subtables in this collection
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// `true` if these subtables are wrapped in extension subtables.
    pub fn is_extension(&self) -> bool {
        self.is_extension
    }

    /// Return the subtable at the given index
    pub fn get(&self, idx: usize) -> Result<T, ReadError> {
        let offset = self.offsets.get(idx).ok_or(ReadError::OutOfBounds)?.get();
        resolve_subtable::<T, Ext>(offset, self.data, self.is_extension)
    }

    /// Return an iterator over all the subtables in the collection
    pub fn iter(&self) -> impl Iterator<Item = Result<T, ReadError>> + 'a {
        let data = self.data;
        let is_extension = self.is_extension;
        self.offsets
            .iter()
            .map(move |off| resolve_subtable::<T, Ext>(off.get(), data, is_extension))
    }
}

fn resolve_subtable<'a, T, Ext>(
    offset: Offset16,
    data: FontData<'a>,
    is_extension: bool,
) -> Result<T, ReadError>
where
    T: FontRead<'a>,
    Ext: ExtensionLookup<'a, T>,
{
    if is_extension {
        offset.resolve::<Ext>(data)?.extension()
    } else {
        offset.resolve(data)
    }
}

/// [Sequence Lookup Record](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#sequence-lookup-record)
#[derive(Clone, Debug, Copy, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct SequenceLookupRecord {
    /// Index (zero-based) into the input glyph sequence
    pub sequence_index: BigEndian<u16>,
    /// Index (zero-based) into the LookupList
    pub lookup_list_index: BigEndian<u16>,
}

impl SequenceLookupRecord {
    /// Index (zero-based) into the input glyph sequence
    pub fn sequence_index(&self) -> u16 {
        self.sequence_index.get()
    }

    /// Index (zero-based) into the LookupList
    pub fn lookup_list_index(&self) -> u16 {
        self.lookup_list_index.get()
    }
}

impl FixedSize for SequenceLookupRecord {
    const RAW_BYTE_LEN: usize = u16::RAW_BYTE_LEN + u16::RAW_BYTE_LEN;
}
