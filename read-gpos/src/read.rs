//! Reading tables and records from raw bytes

use crate::font_data::FontData;

/// Why a table or record could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// An offset, array or field extends past the end of the data.
    OutOfBounds,
    /// An unknown format or major version; the value that was found.
    InvalidFormat(i64),
    /// An array whose byte length is not a multiple of its record size.
    InvalidArrayLen,
    /// A table failed a structural check beyond simple bounds.
    ValidationError,
    /// A required offset was zero.
    NullOffset,
    /// A table the caller needed was not supplied.
    TableIsMissing(&'static str),
    MalformedData(&'static str),
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::OutOfBounds => f.write_str("data out of bounds"),
            ReadError::InvalidFormat(format) => write!(f, "invalid format {format}"),
            ReadError::InvalidArrayLen => f.write_str("array length is not a multiple of its items"),
            ReadError::ValidationError => f.write_str("table failed validation"),
            ReadError::NullOffset => f.write_str("unexpected null offset"),
            ReadError::TableIsMissing(name) => write!(f, "missing {name} table"),
            ReadError::MalformedData(what) => write!(f, "malformed data: {what}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ReadError {}

/// A table or record that describes itself.
///
/// `read` checks everything needed to make the type's own accessors
/// infallible: the format, the version-dependent header fields and the
/// length of every inline array. Child tables behind offsets are read on
/// demand, and are only checked up front by [`Sanitize`].
///
/// [`Sanitize`]: crate::Sanitize
pub trait FontRead<'a>: Sized {
    fn read(data: FontData<'a>) -> Result<Self, ReadError>;
}

/// The arguments a type needs in order to be read.
///
/// Value records, for instance, cannot be read without the value format of
/// their parent subtable.
pub trait ReadArgs {
    type Args: Copy;
}

/// A type that can only be read with arguments from its parent.
pub trait FontReadWithArgs<'a>: Sized + ReadArgs {
    fn read_with_args(data: FontData<'a>, args: &Self::Args) -> Result<Self, ReadError>;
}

// every self-describing type can be read with empty arguments, so that
// arrays of offsets can resolve both kinds of child the same way
impl<'a, T: FontRead<'a>> ReadArgs for T {
    type Args = ();
}

impl<'a, T: FontRead<'a>> FontReadWithArgs<'a> for T {
    fn read_with_args(data: FontData<'a>, _: &Self::Args) -> Result<Self, ReadError> {
        T::read(data)
    }
}

/// The format tag of one variant of a multi-format table.
pub trait Format<T> {
    const FORMAT: T;
}

/// A record whose size depends on its arguments.
///
/// For records with a constant size, see [`FixedSize`](types::FixedSize).
pub trait ComputeSize: ReadArgs {
    fn compute_size(args: &Self::Args) -> Result<usize, ReadError>;
}
