//! Typed font tables

use super::read::{FontRead, Format, ReadError};
use crate::{
    font_data::FontData,
    offset::{Offset, ResolveOffset},
};

/// Typed access to raw table data.
///
/// The `shape` holds whatever layout information was computed while the
/// table was validated, such as the byte length of variable sized records.
#[derive(Clone, Copy)]
pub struct TableRef<'a, T> {
    pub(crate) shape: T,
    pub(crate) data: FontData<'a>,
}

impl<'a, T> TableRef<'a, T> {
    /// Resolve the provided offset from the start of this table.
    pub fn resolve_offset<O: Offset, R: FontRead<'a>>(&self, offset: O) -> Result<R, ReadError> {
        offset.resolve(self.data)
    }

    /// Return a reference to this table's raw data.
    ///
    /// Offsets stored in records are resolved relative to this data.
    pub fn offset_data(&self) -> FontData<'a> {
        self.data
    }

    /// Read a scalar at `pos`, returning the default value if it is missing.
    ///
    /// Only used for fields whose presence was checked during `read`.
    #[inline]
    pub(crate) fn field<S: types::Scalar + Default>(&self, pos: usize) -> S {
        self.data.read_at(pos).unwrap_or_default()
    }
}

// a blanket impl so that the format is available through a TableRef
impl<U, T: Format<U>> Format<U> for TableRef<'_, T> {
    const FORMAT: U = T::FORMAT;
}

impl<T: std::fmt::Debug> std::fmt::Debug for TableRef<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableRef")
            .field("shape", &self.shape)
            .field("len", &self.data.len())
            .finish()
    }
}
