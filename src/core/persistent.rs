use std::path::PathBuf;

use crate::{
    persist::{PersistResult, json_file::JsonFile},
    types::{MSG_DELETE_MISSING, MSG_DELETED, MSG_RELOADED, Outcome},
};

use super::{StoreState, table::Table};

/// A table bound to its backing file. Shared plumbing for both stores.
#[derive(Debug)]
pub(crate) struct PersistentTable {
    file: JsonFile,
    table: Table,
    state: StoreState,
}

impl PersistentTable {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self {
            file: JsonFile::new(path),
            table: Table::new(),
            state: StoreState::Configured,
        }
    }

    pub(crate) fn file(&self) -> &JsonFile {
        &self.file
    }

    pub(crate) fn table(&self) -> &Table {
        &self.table
    }

    pub(crate) fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }

    pub(crate) fn state(&self) -> StoreState {
        self.state
    }

    pub(crate) fn load(&mut self) {
        self.table = self.file.load_sync();
        self.state = StoreState::Loaded;
    }

    /// Replaces the table from disk; on failure the table is left as is.
    pub(crate) async fn reload(&mut self) -> PersistResult<Outcome> {
        let table = self.file.read_table().await?;
        tracing::debug!(path = %self.file.path().display(), records = table.len(), "table reloaded");
        self.table = table;
        self.state = StoreState::Loaded;
        Ok(Outcome::ok(MSG_RELOADED))
    }

    /// Writes the current table.
    ///
    /// An emptied table is not written; its stale file is removed instead
    /// so a later load cannot bring deleted records back.
    pub(crate) async fn persist(&self) -> PersistResult<Outcome> {
        let outcome = self.file.write(&self.table).await?;
        if outcome.is_nothing_to_save() {
            self.file.remove().await?;
        }
        Ok(outcome)
    }

    pub(crate) async fn delete(&mut self, code: &str) -> PersistResult<Outcome> {
        if self.table.delete(code).is_none() {
            return Ok(Outcome::soft(MSG_DELETE_MISSING));
        }
        self.persist().await?;
        Ok(Outcome::ok(MSG_DELETED))
    }

    pub(crate) async fn drop(&mut self) -> PersistResult<()> {
        self.table.clear();
        self.file.remove().await?;
        tracing::info!(path = %self.file.path().display(), "table dropped");
        Ok(())
    }
}
