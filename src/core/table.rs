use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Ordered in-memory record sequence.
///
/// Order is insertion order. Code uniqueness is the caller's contract;
/// the table itself never checks it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    rows: Vec<Record>,
}

impl Table {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record whose code equals `code`, in table order.
    pub fn find(&self, code: &str) -> Vec<&Record> {
        self.rows.iter().filter(|r| r.code == code).collect()
    }

    /// First record matching `code`.
    pub fn get(&self, code: &str) -> Option<&Record> {
        self.rows.iter().find(|r| r.code == code)
    }

    /// Mutable form of [`Table::get`].
    pub fn get_mut(&mut self, code: &str) -> Option<&mut Record> {
        self.rows.iter_mut().find(|r| r.code == code)
    }

    /// True when some record has `code`.
    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Appends `record` without a uniqueness check.
    pub fn insert(&mut self, record: Record) {
        self.rows.push(record);
    }

    /// Replaces the first record matching `code`, keeping its position.
    ///
    /// Returns false and leaves the table untouched when nothing matches.
    pub fn modify(&mut self, code: &str, record: Record) -> bool {
        match self.position(code) {
            Some(pos) => {
                self.rows[pos] = record;
                true
            }
            None => false,
        }
    }

    /// Removes the first record matching `code`.
    pub fn delete(&mut self, code: &str) -> Option<Record> {
        let pos = self.position(code)?;
        Some(self.rows.remove(pos))
    }

    /// Records in table order.
    pub fn records(&self) -> &[Record] {
        &self.rows
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Removes every record.
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Consumes the table, returning its records.
    pub fn into_records(self) -> Vec<Record> {
        self.rows
    }

    fn position(&self, code: &str) -> Option<usize> {
        self.rows.iter().position(|r| r.code == code)
    }
}

impl From<Vec<Record>> for Table {
    fn from(rows: Vec<Record>) -> Self {
        Self { rows }
    }
}
