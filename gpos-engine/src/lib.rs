//! Applying OpenType glyph positioning to a shaped buffer
//!
//! This crate takes a run of glyphs, typically the output of character
//! mapping and glyph substitution, and computes the advance and offset of
//! every glyph from the lookups of a [GPOS] table.
//!
//! Tables are parsed with [`read_gpos`] (re-exported as [`raw`]) and
//! validated once, when a [`GposTable`] is created. Lookups that fail
//! validation are disabled; applying the remaining lookups never fails.
//!
//! Font metrics (advances, extents, hinted outline points and variation
//! deltas) are supplied by the caller through the [`FontService`] trait.
//!
//! # Example
//!
//! ```no_run
//! use gpos_engine::{position, Buffer, Direction, GlyphInfo, GposTable, PositionPlan};
//! # fn font() -> Box<dyn gpos_engine::FontService> { unimplemented!() }
//! # let gpos_bytes: &[u8] = &[];
//! let table = GposTable::new(gpos_bytes).expect("malformed GPOS");
//! let plan = PositionPlan::new(Direction::LeftToRight, 0..table.lookup_count());
//! let mut buffer = Buffer::new(Direction::LeftToRight);
//! buffer.push(GlyphInfo::new(36u32, 0));
//! buffer.push(GlyphInfo::new(68u32, 1));
//! position(&plan, &*font(), Some(&table), None, &mut buffer);
//! for pos in &buffer.pos {
//!     println!("{} {} {}", pos.x_advance, pos.x_offset, pos.y_offset);
//! }
//! ```
//!
//! [GPOS]: https://learn.microsoft.com/en-us/typography/opentype/spec/gpos

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod apply;
mod attach;
pub mod buffer;
mod error;
mod fallback;
mod font;
mod glyph_props;
mod gpos;
mod plan;
mod skippy;

#[cfg(test)]
mod test_support;

/// Public re-export of the read-gpos crate.
pub extern crate read_gpos as raw;

pub use attach::{position_finish_advances, position_finish_offsets, position_start};
pub use buffer::{AttachType, Buffer, Direction, GeneralCategory, GlyphInfo, GlyphPosition};
pub use error::PositionError;
pub use fallback::{combining_class, position_fallback_marks, zero_mark_advances};
pub use font::{FontService, GlyphExtents};
pub use glyph_props::{check_glyph_property, set_glyph_props_from_gdef};
pub use gpos::{load_gdef, position, GposTable};
pub use plan::{LookupMap, PositionPlan, ZeroWidthMarks};

/// The maximum depth of nested contextual lookups.
pub const MAX_NESTING_LEVEL: usize = 6;

/// The maximum number of input glyphs matched by a contextual rule.
pub const MAX_CONTEXT_LENGTH: usize = 64;
