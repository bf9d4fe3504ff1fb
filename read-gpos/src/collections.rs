//! Data structures useful for font work.

pub mod int_set;
pub use int_set::{Domain, IntSet};
