//! Arrays of offsets to child tables
//!
//! Layout tables reach most of their children through an array of offsets:
//! the subtables of a lookup, the rule sets of a sequence context, the pair
//! sets of a pair adjustment. The types here keep the raw offsets together
//! with the data they are relative to, and read a child only when asked.

use types::{BigEndian, Nullable, Offset16, Scalar};

use crate::{
    offset::ResolveNullableOffset, FontData, FontReadWithArgs, Offset, ReadArgs, ReadError,
    ResolveOffset,
};

/// Offsets that must all point at a table.
#[derive(Clone)]
pub struct ArrayOfOffsets<'a, T: ReadArgs, O: Scalar = Offset16> {
    offsets: &'a [BigEndian<O>],
    data: FontData<'a>,
    args: T::Args,
}

/// Offsets where zero means there is no table.
///
/// Sequence contexts use these for rule sets that have no rules, and
/// anchor matrices for missing anchors.
#[derive(Clone)]
pub struct ArrayOfNullableOffsets<'a, T: ReadArgs, O: Scalar = Offset16> {
    offsets: &'a [BigEndian<Nullable<O>>],
    data: FontData<'a>,
    args: T::Args,
}

macro_rules! offset_array_len {
    ($ty:ident) => {
        impl<T: ReadArgs, O: Scalar> $ty<'_, T, O> {
            /// The number of offsets, including any that fail to resolve.
            pub fn len(&self) -> usize {
                self.offsets.len()
            }

            pub fn is_empty(&self) -> bool {
                self.offsets.is_empty()
            }
        }
    };
}

offset_array_len!(ArrayOfOffsets);
offset_array_len!(ArrayOfNullableOffsets);

impl<'a, T, O> ArrayOfOffsets<'a, T, O>
where
    T: FontReadWithArgs<'a>,
    T::Args: 'static,
    O: Scalar + Offset,
{
    pub(crate) fn new(offsets: &'a [BigEndian<O>], data: FontData<'a>, args: T::Args) -> Self {
        ArrayOfOffsets {
            offsets,
            data,
            args,
        }
    }

    /// Read the table at `idx`.
    ///
    /// An index past the end is reported like an offset past the end of the
    /// data, as `OutOfBounds`. A zero offset is a `NullOffset` error.
    pub fn get(&self, idx: usize) -> Result<T, ReadError> {
        let offset = self.offsets.get(idx).ok_or(ReadError::OutOfBounds)?;
        offset.get().resolve_with_args(self.data, &self.args)
    }

    /// Read every table, in order.
    pub fn iter(&self) -> impl Iterator<Item = Result<T, ReadError>> + 'a {
        let (data, args) = (self.data, self.args);
        self.offsets
            .iter()
            .map(move |offset| offset.get().resolve_with_args(data, &args))
    }
}

impl<'a, T, O> ArrayOfNullableOffsets<'a, T, O>
where
    T: FontReadWithArgs<'a>,
    T::Args: 'static,
    O: Scalar + Offset,
{
    pub(crate) fn new(
        offsets: &'a [BigEndian<Nullable<O>>],
        data: FontData<'a>,
        args: T::Args,
    ) -> Self {
        ArrayOfNullableOffsets {
            offsets,
            data,
            args,
        }
    }

    /// Read the table at `idx`.
    ///
    /// Returns `None` both for a null offset and for an index past the end.
    pub fn get(&self, idx: usize) -> Option<Result<T, ReadError>> {
        let offset = self.offsets.get(idx)?;
        offset.get().resolve_with_args(self.data, &self.args)
    }

    /// Read every table, in order, yielding `None` for null offsets.
    pub fn iter(&self) -> impl Iterator<Item = Option<Result<T, ReadError>>> + 'a {
        let (data, args) = (self.data, self.args);
        self.offsets
            .iter()
            .map(move |offset| offset.get().resolve_with_args(data, &args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::layout::CoverageTable;
    use gpos_test_data::bebuffer::BeBuffer;

    // three offsets, the second null, then one coverage table
    fn offsets_and_coverage() -> BeBuffer {
        BeBuffer::new()
            .extend([6u16, 0, 6])
            .extend([1u16, 2, 7, 9])
    }

    #[test]
    fn offsets_resolve_on_access() {
        let buf = offsets_and_coverage();
        let data = FontData::new(buf.as_slice());
        let offsets: &[BigEndian<Offset16>] = data.read_array(0..6).unwrap();
        let array = ArrayOfOffsets::<CoverageTable>::new(offsets, data, ());
        assert_eq!(array.len(), 3);
        assert_eq!(array.get(0).unwrap().get(9u16), Some(1));
        assert_eq!(array.get(1).err(), Some(ReadError::NullOffset));
        assert_eq!(array.get(3).err(), Some(ReadError::OutOfBounds));
        assert_eq!(array.iter().filter(Result::is_ok).count(), 2);
    }

    #[test]
    fn nullable_offsets_skip_null() {
        let buf = offsets_and_coverage();
        let data = FontData::new(buf.as_slice());
        let offsets: &[BigEndian<Nullable<Offset16>>] = data.read_array(0..6).unwrap();
        let array = ArrayOfNullableOffsets::<CoverageTable>::new(offsets, data, ());
        assert!(array.get(1).is_none());
        assert!(array.get(3).is_none());
        assert_eq!(array.get(2).unwrap().unwrap().get(7u16), Some(0));
        let present: Vec<_> = array.iter().map(|table| table.is_some()).collect();
        assert_eq!(present, [true, false, true]);
    }
}
