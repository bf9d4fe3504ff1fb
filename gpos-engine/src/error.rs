//! Errors raised while loading positioning tables.

use read_gpos::ReadError;
use thiserror::Error;

/// A table that cannot be used for positioning at all.
///
/// Problems inside individual lookups are not errors: the lookup is disabled
/// and positioning continues without it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("invalid GPOS table: {0}")]
    InvalidGpos(#[from] ReadError),
    #[error("invalid GDEF table: {0}")]
    InvalidGdef(ReadError),
}
