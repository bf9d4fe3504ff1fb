//! Scalar types shared by the GPOS readers and the positioning engine
//!
//! Everything here is a fixed-size big-endian value as it appears in an
//! OpenType layout table: glyph ids, offsets and version numbers. See the
//! [OpenType data types][data types] for the encodings.
//!
//! [data types]: https://learn.microsoft.com/en-us/typography/opentype/spec/otff#data-types

#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

#[cfg(all(not(feature = "std"), not(test)))]
#[macro_use]
extern crate core as std;

mod glyph_id;
mod offset;
mod raw;
mod version;


pub use glyph_id::{GlyphId, GlyphId16, TryFromGlyphIdError};
pub use offset::{Nullable, Offset16, Offset32};
pub use raw::{BigEndian, FixedSize, Scalar};
pub use version::MajorMinor;
