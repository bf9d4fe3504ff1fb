//! Arrays of variable-size records

use crate::read::{ComputeSize, FontReadWithArgs, ReadArgs};
use crate::{FontData, ReadError};

/// An array of records whose size is decided by their parent table.
///
/// The value records of a single or pair adjustment subtable are the
/// motivating case: every record has the same size, but that size follows
/// from a `ValueFormat` stored in the subtable header.
#[derive(Clone)]
pub struct ComputedArray<'a, T: ReadArgs> {
    item_len: usize,
    len: usize,
    data: FontData<'a>,
    args: T::Args,
}

impl<'a, T: ComputeSize> ComputedArray<'a, T> {
    /// Interpret all of `data` as records read with `args`.
    ///
    /// Trailing bytes that do not make up a whole record are ignored. A
    /// record size of zero gives an empty array.
    pub fn new(data: FontData<'a>, args: T::Args) -> Result<Self, ReadError> {
        let item_len = T::compute_size(&args)?;
        Ok(ComputedArray {
            item_len,
            len: data.len().checked_div(item_len).unwrap_or_default(),
            data,
            args,
        })
    }
}

impl<'a, T: ReadArgs> ComputedArray<'a, T> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn item_data(&self, idx: usize) -> Result<FontData<'a>, ReadError> {
        if idx >= self.len {
            return Err(ReadError::OutOfBounds);
        }
        let start = idx * self.item_len;
        self.data
            .slice(start..start + self.item_len)
            .ok_or(ReadError::OutOfBounds)
    }
}

impl<T: ReadArgs> ReadArgs for ComputedArray<'_, T> {
    type Args = T::Args;
}

impl<'a, T> FontReadWithArgs<'a> for ComputedArray<'a, T>
where
    T: ComputeSize + FontReadWithArgs<'a>,
{
    fn read_with_args(data: FontData<'a>, args: &Self::Args) -> Result<Self, ReadError> {
        Self::new(data, *args)
    }
}

impl<'a, T> ComputedArray<'a, T>
where
    T: FontReadWithArgs<'a> + 'a,
    T::Args: 'static,
{
    pub fn get(&self, idx: usize) -> Result<T, ReadError> {
        self.item_data(idx)
            .and_then(|data| T::read_with_args(data, &self.args))
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<T, ReadError>> + 'a {
        let array = ComputedArray::<T> {
            item_len: self.item_len,
            len: self.len,
            data: self.data,
            args: self.args,
        };
        (0..self.len).map(move |idx| array.get(idx))
    }
}

impl<T: ReadArgs> std::fmt::Debug for ComputedArray<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ComputedArray")
            .field("len", &self.len)
            .field("item_len", &self.item_len)
            .finish()
    }
}
