use std::path::Path;

use serde_json::Value;

use crate::{
    config::DictionaryConfig,
    record::{Message, Record, normalize_extend, validate_code, validate_message},
    types::{MSG_ALREADY_EXISTS, MSG_UPDATE_MISSING, MSG_UPDATED, Outcome},
};

use super::{DictionaryError, StoreState, persistent::PersistentTable};

/// Instance-scoped store holding one locale of one namespace.
///
/// Every mutating operation takes `&mut self` through its write, so two
/// mutations on the same instance can never interleave.
#[derive(Debug)]
pub struct Dictionary {
    config: DictionaryConfig,
    inner: PersistentTable,
}

impl Dictionary {
    /// Builds an empty, not-yet-loaded store.
    pub fn new(config: DictionaryConfig) -> Self {
        let inner = PersistentTable::new(config.file_path());
        Self { config, inner }
    }

    /// Builds the store and loads it with [`Dictionary::load`].
    pub fn open(config: DictionaryConfig) -> Self {
        let mut dict = Self::new(config);
        dict.load();
        dict
    }

    /// Configuration the store was built with.
    pub fn config(&self) -> &DictionaryConfig {
        &self.config
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        self.inner.file().path()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> StoreState {
        self.inner.state()
    }

    /// Replaces the table from disk. A missing or broken file gives an
    /// empty table; this never fails.
    pub fn load(&mut self) -> &mut Self {
        self.inner.load();
        self
    }

    /// Replaces the table from disk, surfacing read and decode failures.
    pub async fn reload(&mut self) -> Result<Outcome, DictionaryError> {
        Ok(self.inner.reload().await?)
    }

    /// Inserts a new record; an existing `code` is a soft failure.
    pub async fn add(
        &mut self,
        code: &str,
        message: &str,
        extend: Option<Value>,
    ) -> Result<Outcome, DictionaryError> {
        validate_code(code)?;
        validate_message(message)?;
        let extend = normalize_extend(extend)?;

        if self.inner.table().contains(code) {
            return Ok(Outcome::soft(MSG_ALREADY_EXISTS));
        }

        self.inner
            .table_mut()
            .insert(Record::new(code, message).with_extend(extend));
        Ok(self.inner.persist().await?)
    }

    /// Replaces the message of `code` and merges `extend` into its fields.
    pub async fn update(
        &mut self,
        code: &str,
        message: &str,
        extend: Option<Value>,
    ) -> Result<Outcome, DictionaryError> {
        validate_code(code)?;
        validate_message(message)?;
        let extend = normalize_extend(extend)?;

        let Some(existing) = self.inner.table().get(code) else {
            return Ok(Outcome::soft(MSG_UPDATE_MISSING));
        };

        let mut record = existing.clone();
        record.message = Message::from(message);
        record.merge_extend(extend);
        self.inner.table_mut().modify(code, record);
        self.inner.persist().await?;
        Ok(Outcome::ok(MSG_UPDATED))
    }

    /// Removes `code`; a missing code is a soft failure.
    pub async fn delete(&mut self, code: &str) -> Result<Outcome, DictionaryError> {
        validate_code(code)?;
        Ok(self.inner.delete(code).await?)
    }

    /// The record for `code`, or the `"0"` sentinel.
    pub fn get(&self, code: &str) -> Record {
        self.inner
            .table()
            .get(code)
            .cloned()
            .unwrap_or_else(Record::unknown)
    }

    /// The live table in insertion order.
    pub fn list(&self) -> &[Record] {
        self.inner.table().records()
    }

    /// Empties the table and deletes the backing file.
    pub async fn drop(&mut self) -> Result<(), DictionaryError> {
        Ok(self.inner.drop().await?)
    }
}
