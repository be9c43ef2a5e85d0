//! Error type shared by every module in this crate.
//!
//! A single `thiserror`-derived enum covers every fallible operation, the
//! way most library crates in this ecosystem expose errors: typed
//! variants with enough context to format a useful message, no backtrace
//! allocation, no string-only error type.

use thiserror::Error;

/// The crate's result alias. Every fallible public operation returns this.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    /// Order `< 2`, arity mismatch, an `update` naming a key column or an
    /// unknown column, a non-unit range step, a callable where a scalar or
    /// range was required, or a slice key longer than the row's arity.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Neither the primary index nor any auxiliary index can serve the
    /// requested slice or ordering.
    #[error("unsupported query: {0}")]
    UnsupportedQuery(String),

    /// `Table::insert` was called with a key that the primary index
    /// already holds.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// An invariant the engine itself is responsible for was violated,
    /// e.g. more than one primary row resolved for a single key while
    /// joining through an auxiliary index. Indicates a bug, not misuse.
    #[error("internal invariant violated: {0}")]
    Internal(String),
}
