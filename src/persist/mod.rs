/// Whole-table JSON file adapter.
pub mod json_file;

use std::string::FromUtf8Error;

use thiserror::Error;

/// Failure reading, writing or removing a backing file.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON encode or decode failure.
    #[error("json error: {0}")]
    Serde(#[from] serde_json::Error),
    /// The file is not UTF-8 text.
    #[error("file content is not valid utf-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

impl PersistError {
    /// True when the underlying cause is a missing file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io(err) if err.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Result of a persistence call.
pub type PersistResult<T> = Result<T, PersistError>;
