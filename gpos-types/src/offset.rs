//! Offsets to tables

use crate::raw::Scalar;

macro_rules! impl_offset {
    ($name:ident, $bits:literal, $rawty:ty) => {
        #[doc = concat!("A", stringify!($bits), "-bit offset to a table.")]
        ///
        /// Specific offset fields may or may not permit NULL values; however we
        /// assume that errors are possible, and expect the caller to handle
        /// the `None` case.
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name($rawty);

        impl $name {
            /// Create a new offset.
            #[inline]
            pub const fn new(raw: $rawty) -> Self {
                Self(raw)
            }

            /// Return `true` if this offset is null.
            #[inline]
            pub fn is_null(self) -> bool {
                self.to_u32() == 0
            }

            #[inline]
            pub fn to_u32(self) -> u32 {
                self.0.into()
            }
        }

        impl crate::raw::Scalar for $name {
            type Raw = <$rawty as Scalar>::Raw;
            fn from_raw(raw: Self::Raw) -> Self {
                let raw = <$rawty>::from_raw(raw);
                $name::new(raw)
            }

            fn to_raw(self) -> Self::Raw {
                self.0.to_raw()
            }
        }

        impl From<$name> for u32 {
            fn from(value: $name) -> u32 {
                value.to_u32()
            }
        }
    };
}

impl_offset!(Offset16, 16, u16);
impl_offset!(Offset32, 32, u32);

/// A type that may be null.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Nullable<T>(T);

impl<T> Nullable<T> {
    /// Return a reference to the inner offset.
    #[inline]
    pub fn offset(&self) -> &T {
        &self.0
    }
}

impl Nullable<Offset16> {
    /// Create a new nullable offset.
    #[inline]
    pub fn new(offset: u16) -> Self {
        Nullable(Offset16::new(offset))
    }

    #[inline]
    pub fn is_null(self) -> bool {
        self.0.is_null()
    }
}

impl Nullable<Offset32> {
    /// Create a new nullable offset.
    #[inline]
    pub fn new(offset: u32) -> Self {
        Nullable(Offset32::new(offset))
    }

    #[inline]
    pub fn is_null(self) -> bool {
        self.0.is_null()
    }
}

impl<T: PartialEq<u32>> PartialEq<u32> for Nullable<T> {
    fn eq(&self, other: &u32) -> bool {
        self.0 == *other
    }
}

impl PartialEq<u32> for Offset16 {
    fn eq(&self, other: &u32) -> bool {
        self.to_u32() == *other
    }
}

impl PartialEq<u32> for Offset32 {
    fn eq(&self, other: &u32) -> bool {
        self.to_u32() == *other
    }
}

impl<T: Scalar> Scalar for Nullable<T> {
    type Raw = T::Raw;
    fn from_raw(raw: Self::Raw) -> Self {
        Self(T::from_raw(raw))
    }

    fn to_raw(self) -> Self::Raw {
        self.0.to_raw()
    }
}
