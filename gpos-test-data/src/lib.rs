//! test data shared between the gpos crates.

pub mod bebuffer;
pub mod gdef;
pub mod gpos;
