//! The layout tables

pub mod gdef;
pub mod gpos;
pub mod layout;
