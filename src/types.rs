//! Shared primitive aliases and the soft-outcome envelope.

use serde::{Deserialize, Serialize};

/// Record identifier, unique within one table.
pub type Code = String;
/// Language/region code such as `en` or `pt-BR`.
pub type Locale = String;

/// Code carried by the sentinel record returned for unknown lookups.
pub const UNKNOWN_CODE: &str = "0";
/// Message carried by every sentinel record.
pub const UNKNOWN_MESSAGE: &str = "Unknown error!";

/// Report message for a completed write.
pub const MSG_SAVED: &str = "Data successfully saved!";
/// Report message when the table held nothing worth writing.
pub const MSG_NOTHING_TO_SAVE: &str = "Nothing to save!";
/// Report message for a rejected duplicate insert.
pub const MSG_ALREADY_EXISTS: &str = "Failed to save, data already exists!";
/// Report message for a completed update.
pub const MSG_UPDATED: &str = "Data successfully updated!";
/// Report message for an update against a missing code.
pub const MSG_UPDATE_MISSING: &str = "Failed to update, data is not exists!";
/// Report message for a completed delete.
pub const MSG_DELETED: &str = "Data successfully deleted!";
/// Report message for a delete against a missing code.
pub const MSG_DELETE_MISSING: &str = "Failed to delete, data is not exists!";
/// Report message for a completed reload.
pub const MSG_RELOADED: &str = "Successfully to reload datatable!";

/// Result envelope for operations that can end in a soft failure.
///
/// `status == false` means the operation ran correctly but its
/// precondition did not hold. It is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// True when the operation took effect.
    pub status: bool,
    /// Human-readable reason.
    pub message: String,
}

impl Outcome {
    /// Successful outcome with `message`.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: true,
            message: message.into(),
        }
    }

    /// Soft failure with `message`.
    pub fn soft(message: impl Into<String>) -> Self {
        Self {
            status: false,
            message: message.into(),
        }
    }

    /// The write-skipped outcome reported for empty tables.
    pub fn nothing_to_save() -> Self {
        Self::soft(MSG_NOTHING_TO_SAVE)
    }

    /// True for the write-skipped outcome.
    pub fn is_nothing_to_save(&self) -> bool {
        !self.status && self.message == MSG_NOTHING_TO_SAVE
    }
}
