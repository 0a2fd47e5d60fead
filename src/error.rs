//! Error types returned by the library.
//!
//! Most public APIs return [`crate::Result`], which uses [`Error`] as the
//! error type.

use thiserror::Error;

use crate::cfg::BlockId;
use crate::expr::Expr;

/// Convenient result alias for the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top level error surfaced by the library's public APIs.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The requested head block is not present in the control-flow graph.
    #[error("head block {0:?} is not present in the control-flow graph")]
    InvalidInput(BlockId),

    /// An assignment destination was neither an identifier nor a memory
    /// expression.
    #[error("assignment destination is neither an identifier nor a memory expression: {0:?}")]
    UnsupportedDestination(Expr),

    /// `transform` was called on a driver that still holds state from a
    /// previous transform.
    #[error("transform() called on a driver that was not reset after a previous transform")]
    Reentrancy,
}
