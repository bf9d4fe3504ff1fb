//! OpenType Layout common table formats
//!
//! These are the tables shared by GPOS and GSUB: coverage and class
//! definitions, device tables, the lookup list and the sequence context
//! tables used by contextual lookups.

mod class_def;
mod closure;
mod context;
mod coverage;
mod device;
mod lookup;
mod lookup_flag;

pub use class_def::{ClassDef, ClassDefFormat1, ClassDefFormat2, ClassRangeRecord};
pub use closure::{CollectGlyphs, GlyphCollection, Intersect, LookupClosure, LookupClosureCtx};
pub use context::{
    ChainedClassSequenceRule, ChainedClassSequenceRuleSet, ChainedSequenceContext,
    ChainedSequenceContextFormat1, ChainedSequenceContextFormat2, ChainedSequenceContextFormat3,
    ChainedSequenceRule, ChainedSequenceRuleSet, ClassSequenceRule, ClassSequenceRuleSet, RuleSet,
    SequenceContext, SequenceContextFormat1, SequenceContextFormat2, SequenceContextFormat3,
    SequenceRule, SequenceRuleSet,
};
pub use coverage::{CoverageFormat1, CoverageFormat2, CoverageTable, RangeRecord};
pub use device::{DeltaFormat, Device, DeviceOrVariationIndex, VariationIndex};
pub use lookup::{ExtensionLookup, Lookup, LookupList, SequenceLookupRecord, Subtables};
pub use lookup_flag::LookupFlag;

#[doc(hidden)]
pub use class_def::{ClassDefFormat1Marker, ClassDefFormat2Marker};
#[doc(hidden)]
pub use context::{
    ChainedSequenceContextFormat3Marker, ChainedSequenceContextMarker, ChainedSequenceRuleMarker,
    RuleSetMarker, SequenceContextFormat3Marker, SequenceContextMarker, SequenceRuleMarker,
};
#[doc(hidden)]
pub use coverage::{CoverageFormat1Marker, CoverageFormat2Marker};
#[doc(hidden)]
pub use device::{DeviceMarker, VariationIndexMarker};
#[doc(hidden)]
pub use lookup::{LookupListMarker, LookupMarker};

#[cfg(test)]
#[path = "../tests/test_layout.rs"]
mod tests;
