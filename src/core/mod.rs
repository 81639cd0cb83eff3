//! In-memory tables and the two store variants built on them.

use thiserror::Error;

use crate::{persist::PersistError, record::ValidationError};

/// Single-locale store.
pub mod dictionary;
/// Multi-locale store.
pub mod localized;
mod persistent;
/// Ordered record table and its mutation primitives.
pub mod table;

/// Failure of a store operation.
///
/// Soft outcomes such as a duplicate code are not errors; they come back
/// as `Ok(Outcome { status: false, .. })`.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// Bad caller input; nothing was mutated or written.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Reading, writing or removing the backing file failed.
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Store lifecycle. There is no closed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// Constructed; the table has not been read from disk.
    Configured,
    /// The table was populated from disk at least once.
    Loaded,
}
