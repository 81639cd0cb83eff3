//! Runtime event stream payloads.

use crate::types::{Code, Locale};

/// Events emitted by the shared dictionary task after a change is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionaryEvent {
    /// A new record was inserted.
    Added {
        /// Inserted code.
        code: Code,
        /// Locale of the first message.
        locale: Locale,
    },
    /// A locale was set on an existing record.
    Updated {
        /// Updated code.
        code: Code,
        /// Locale that was set.
        locale: Locale,
    },
    /// A record was removed.
    Deleted {
        /// Removed code.
        code: Code,
    },
    /// One locale was removed from a record.
    LocaleDeleted {
        /// Affected code.
        code: Code,
        /// Removed locale.
        locale: Locale,
    },
    /// The table was replaced from disk.
    Reloaded {
        /// Record count after the reload.
        records: usize,
    },
    /// The table and its file were dropped.
    Dropped,
}
