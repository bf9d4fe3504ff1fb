//! Reading OpenType layout tables for glyph positioning
//!
//! This crate provides memory safe zero-allocation parsing of the [GPOS]
//! and [GDEF] tables, along with the layout structures they share with other
//! layout tables (coverage, class definitions, device tables, lookups and
//! sequence contexts).
//!
//! Every table is a thin, typed view over the underlying bytes. Reading a
//! table only validates its own header and arrays; offsets are resolved
//! lazily. For a deep structural check before applying a lookup, see the
//! [`Sanitize`] trait.
//!
//! In addition to raw data access, this crate provides the closure analysis
//! needed to answer questions such as "can this lookup ever apply to these
//! glyphs?" (see [`tables::layout::Intersect`]).
//!
//! # Example
//!
//! ```no_run
//! use read_gpos::{tables::gpos::Gpos, FontRead};
//! # let gpos_bytes: &[u8] = &[];
//! let gpos = Gpos::read(gpos_bytes.into()).expect("malformed GPOS");
//! let lookups = gpos.lookup_list().expect("missing lookup list");
//! for (i, lookup) in lookups.lookups().iter().enumerate() {
//!     let lookup = lookup.expect("malformed lookup");
//!     println!("lookup {i}: type {}", lookup.lookup_type());
//! }
//! ```
//!
//! [GPOS]: https://learn.microsoft.com/en-us/typography/opentype/spec/gpos
//! [GDEF]: https://learn.microsoft.com/en-us/typography/opentype/spec/gdef

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod array;
pub mod collections;
mod font_data;
mod offset;
mod offset_array;
mod read;
mod sanitize;
mod table_ref;
pub mod tables;

pub use font_data::FontData;
pub use offset::{Offset, ResolveNullableOffset, ResolveOffset};
pub use offset_array::{ArrayOfNullableOffsets, ArrayOfOffsets};
pub use read::{ComputeSize, FontRead, FontReadWithArgs, ReadArgs, ReadError};
pub use sanitize::Sanitize;
pub use table_ref::TableRef;

/// Public re-export of the gpos-types crate.
pub extern crate gpos_types as types;

/// All the types that may be referenced by table definitions.
#[doc(hidden)]
pub(crate) mod prelude {
    pub use crate::array::ComputedArray;
    pub use crate::font_data::FontData;
    pub use crate::offset::{Offset, ResolveNullableOffset, ResolveOffset};
    pub use crate::offset_array::{ArrayOfNullableOffsets, ArrayOfOffsets};
    pub use crate::read::{ComputeSize, FontRead, FontReadWithArgs, Format, ReadArgs, ReadError};
    pub use crate::table_ref::TableRef;
    pub use std::ops::Range;

    pub use types::*;
}
