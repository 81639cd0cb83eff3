use std::path::Path;

use serde_json::Value;

use crate::{
    config::LocalizedConfig,
    record::{
        Extend, Message, Record, normalize_extend, validate_code, validate_locale,
        validate_message,
    },
    types::{MSG_DELETE_MISSING, MSG_DELETED, MSG_UPDATE_MISSING, MSG_UPDATED, Outcome},
};

use super::{DictionaryError, StoreState, persistent::PersistentTable};

/// Store holding every locale of one namespace in a single file.
///
/// Records carry a [`Message::Localized`] body. Adding a code that already
/// exists merges the new locale into it instead of failing.
#[derive(Debug)]
pub struct LocalizedDictionary {
    config: LocalizedConfig,
    inner: PersistentTable,
}

impl LocalizedDictionary {
    /// Builds an empty, not-yet-loaded store.
    pub fn new(config: LocalizedConfig) -> Self {
        let inner = PersistentTable::new(config.file_path());
        Self { config, inner }
    }

    /// Builds the store and loads it with [`LocalizedDictionary::load`].
    pub fn open(config: LocalizedConfig) -> Self {
        let mut dict = Self::new(config);
        dict.load();
        dict
    }

    /// Configuration the store was built with.
    pub fn config(&self) -> &LocalizedConfig {
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

    /// Never fails; see [`crate::persist::json_file::JsonFile::load_sync`].
    pub fn load(&mut self) -> &mut Self {
        self.inner.load();
        self
    }

    /// Replaces the table from disk, surfacing read and decode failures.
    pub async fn reload(&mut self) -> Result<Outcome, DictionaryError> {
        Ok(self.inner.reload().await?)
    }

    /// Inserts `code` with one locale, or merges the locale into an
    /// existing record.
    pub async fn add(
        &mut self,
        code: &str,
        locale: &str,
        message: &str,
        extend: Option<Value>,
    ) -> Result<Outcome, DictionaryError> {
        let extend = validate(code, locale, message, extend)?;

        if self.inner.table().contains(code) {
            return self.merge(code, locale, message, extend).await;
        }

        let record = Record::new(code, Message::localized(locale, message)).with_extend(extend);
        self.inner.table_mut().insert(record);
        Ok(self.inner.persist().await?)
    }

    /// Sets `locale` on an existing record and merges `extend` into it.
    pub async fn update(
        &mut self,
        code: &str,
        locale: &str,
        message: &str,
        extend: Option<Value>,
    ) -> Result<Outcome, DictionaryError> {
        let extend = validate(code, locale, message, extend)?;
        self.merge(code, locale, message, extend).await
    }

    /// Removes `code` with every locale; a missing code is a soft failure.
    pub async fn delete(&mut self, code: &str) -> Result<Outcome, DictionaryError> {
        validate_code(code)?;
        Ok(self.inner.delete(code).await?)
    }

    /// Removes one locale from `code`.
    ///
    /// An absent locale is reported as success without touching the file.
    /// The record stays even when its last locale goes.
    pub async fn delete_locale(&mut self, code: &str, locale: &str) -> Result<Outcome, DictionaryError> {
        validate_code(code)?;
        validate_locale(locale)?;

        let Some(record) = self.inner.table_mut().get_mut(code) else {
            return Ok(Outcome::soft(MSG_DELETE_MISSING));
        };
        if !record.message.remove_locale(locale) {
            return Ok(Outcome::ok(MSG_DELETED));
        }

        self.inner.persist().await?;
        Ok(Outcome::ok(MSG_DELETED))
    }

    /// The full record for `code`, or the `"0"` sentinel.
    pub fn get(&self, code: &str) -> Record {
        self.inner
            .table()
            .get(code)
            .cloned()
            .unwrap_or_else(Record::unknown)
    }

    /// `code` projected to the text of one locale.
    ///
    /// A known code without that locale yields `{ code, "Unknown error!" }`.
    pub fn get_locale(&self, code: &str, locale: &str) -> Record {
        let Some(record) = self.inner.table().get(code) else {
            return Record::unknown();
        };
        match record.message.for_locale(locale) {
            Some(text) => Record {
                code: record.code.clone(),
                message: Message::from(text),
                extra: record.extra.clone(),
            },
            None => Record::unknown_for(code),
        }
    }

    /// The live table in insertion order.
    pub fn list(&self) -> &[Record] {
        self.inner.table().records()
    }

    /// Empties the table and deletes the backing file.
    pub async fn drop(&mut self) -> Result<(), DictionaryError> {
        Ok(self.inner.drop().await?)
    }

    async fn merge(
        &mut self,
        code: &str,
        locale: &str,
        message: &str,
        extend: Extend,
    ) -> Result<Outcome, DictionaryError> {
        let Some(record) = self.inner.table_mut().get_mut(code) else {
            return Ok(Outcome::soft(MSG_UPDATE_MISSING));
        };
        record.message.set_locale(locale, message);
        record.merge_extend(extend);

        self.inner.persist().await?;
        Ok(Outcome::ok(MSG_UPDATED))
    }
}

fn validate(
    code: &str,
    locale: &str,
    message: &str,
    extend: Option<Value>,
) -> Result<Extend, DictionaryError> {
    validate_code(code)?;
    validate_locale(locale)?;
    validate_message(message)?;
    Ok(normalize_extend(extend)?)
}
