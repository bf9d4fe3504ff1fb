//! Handling offsets

use super::read::{FontRead, ReadError};
use crate::{font_data::FontData, read::FontReadWithArgs};
use types::{Nullable, Offset16, Offset32};

/// Any offset type.
pub trait Offset: Copy {
    fn to_usize(self) -> usize;

    fn non_null(self) -> Option<usize> {
        match self.to_usize() {
            0 => None,
            other => Some(other),
        }
    }
}

impl Offset for Offset16 {
    #[inline]
    fn to_usize(self) -> usize {
        self.to_u32() as _
    }
}

impl Offset for Offset32 {
    #[inline]
    fn to_usize(self) -> usize {
        self.to_u32() as _
    }
}

/// A helper trait providing a 'resolve' method for offset types.
///
/// Offsets are resolved relative to the data of the table that contains
/// them; for offsets stored in records, this is the parent table.
pub trait ResolveOffset {
    fn resolve<'a, T: FontRead<'a>>(&self, data: FontData<'a>) -> Result<T, ReadError>;

    fn resolve_with_args<'a, T: FontReadWithArgs<'a>>(
        &self,
        data: FontData<'a>,
        args: &T::Args,
    ) -> Result<T, ReadError>;
}

/// A helper trait providing a 'resolve' method for nullable offset types
///
/// A null offset resolves to `None`.
pub trait ResolveNullableOffset {
    fn resolve<'a, T: FontRead<'a>>(&self, data: FontData<'a>) -> Option<Result<T, ReadError>>;

    fn resolve_with_args<'a, T: FontReadWithArgs<'a>>(
        &self,
        data: FontData<'a>,
        args: &T::Args,
    ) -> Option<Result<T, ReadError>>;
}

impl<O: Offset> ResolveNullableOffset for Nullable<O> {
    fn resolve<'a, T: FontRead<'a>>(&self, data: FontData<'a>) -> Option<Result<T, ReadError>> {
        match self.offset().resolve(data) {
            Err(ReadError::NullOffset) => None,
            other => Some(other),
        }
    }

    fn resolve_with_args<'a, T: FontReadWithArgs<'a>>(
        &self,
        data: FontData<'a>,
        args: &T::Args,
    ) -> Option<Result<T, ReadError>> {
        match self.offset().resolve_with_args(data, args) {
            Err(ReadError::NullOffset) => None,
            other => Some(other),
        }
    }
}

impl<O: Offset> ResolveOffset for O {
    fn resolve<'a, T: FontRead<'a>>(&self, data: FontData<'a>) -> Result<T, ReadError> {
        self.non_null()
            .ok_or(ReadError::NullOffset)
            .and_then(|off| data.split_off(off).ok_or(ReadError::OutOfBounds))
            .and_then(T::read)
    }

    fn resolve_with_args<'a, T: FontReadWithArgs<'a>>(
        &self,
        data: FontData<'a>,
        args: &T::Args,
    ) -> Result<T, ReadError> {
        self.non_null()
            .ok_or(ReadError::NullOffset)
            .and_then(|off| data.split_off(off).ok_or(ReadError::OutOfBounds))
            .and_then(|data| T::read_with_args(data, args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Word(u16);

    impl<'a> FontRead<'a> for Word {
        fn read(data: FontData<'a>) -> Result<Self, ReadError> {
            data.read_at(0).map(Word)
        }
    }

    #[test]
    fn null_offsets() {
        let data = FontData::new(&[0, 0, 0, 7]);
        let null = Offset16::new(0);
        assert_eq!(
            null.resolve::<Word>(data).unwrap_err(),
            ReadError::NullOffset
        );
        assert!(Nullable::<Offset16>::new(0)
            .resolve::<Word>(data)
            .is_none());
        let word: Word = Nullable::<Offset16>::new(2)
            .resolve(data)
            .unwrap()
            .unwrap();
        assert_eq!(word.0, 7);
    }

    #[test]
    fn out_of_bounds_offset() {
        let data = FontData::new(&[0, 0, 0, 7]);
        assert_eq!(
            Offset32::new(9).resolve::<Word>(data).unwrap_err(),
            ReadError::OutOfBounds
        );
    }
}
