//! Whole-table JSON file adapter.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::{
    fs::{self, File, OpenOptions},
    io::{AsyncReadExt, AsyncWriteExt},
};

use crate::{
    core::table::Table,
    types::{MSG_SAVED, Outcome},
};

use super::PersistResult;

const CHUNK_SIZE: usize = 8 * 1024;

/// One table persisted as one JSON array at `path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    /// Adapter for the file at `path`. Nothing is touched until used.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when the backing file currently exists.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Startup load. Never fails: a missing, unreadable, empty or
    /// malformed file all yield an empty table.
    pub fn load_sync(&self) -> Table {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no backing file yet, starting empty");
                return Table::new();
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "unreadable backing file, starting empty");
                return Table::new();
            }
        };

        if text.trim().is_empty() {
            return Table::new();
        }

        match serde_json::from_str::<Table>(&text) {
            Ok(table) => {
                tracing::debug!(path = %self.path.display(), records = table.len(), "table loaded");
                table
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "malformed backing file, starting empty");
                Table::new()
            }
        }
    }

    /// Streams the whole file into memory, chunks concatenated in order.
    pub async fn read(&self) -> PersistResult<String> {
        let mut file = File::open(&self.path).await?;
        let mut chunk = vec![0u8; CHUNK_SIZE];
        let mut bytes = Vec::new();
        loop {
            let n = file.read(&mut chunk).await?;
            if n == 0 {
                break;
            }
            bytes.extend_from_slice(&chunk[..n]);
        }
        Ok(String::from_utf8(bytes)?)
    }

    /// Reads and decodes the file. Missing files and malformed JSON are errors.
    pub async fn read_table(&self) -> PersistResult<Table> {
        let text = self.read().await?;
        let table = serde_json::from_str(&text)?;
        Ok(table)
    }

    /// Writes `table`, replacing previous content.
    ///
    /// An empty table is not written; the returned outcome is
    /// [`Outcome::nothing_to_save`].
    pub async fn write(&self, table: &Table) -> PersistResult<Outcome> {
        if table.is_empty() {
            return Ok(Outcome::nothing_to_save());
        }
        let bytes = serde_json::to_vec(table)?;
        self.write_bytes(&bytes).await?;
        tracing::debug!(path = %self.path.display(), records = table.len(), "table written");
        Ok(Outcome::ok(MSG_SAVED))
    }

    /// Writes an arbitrary JSON value, but only if it is a non-empty array.
    pub async fn write_value(&self, value: &Value) -> PersistResult<Outcome> {
        match value {
            Value::Array(items) if !items.is_empty() => {
                let bytes = serde_json::to_vec(value)?;
                self.write_bytes(&bytes).await?;
                Ok(Outcome::ok(MSG_SAVED))
            }
            _ => Ok(Outcome::nothing_to_save()),
        }
    }

    /// Deletes the backing file. A file that is already gone is fine.
    pub async fn remove(&self) -> PersistResult<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "backing file removed");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Sibling file every write is staged in before it replaces `path`.
    pub fn staging_path(&self) -> PathBuf {
        let mut name = OsString::from(".");
        name.push(self.path.file_name().unwrap_or_default());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Stages `bytes` next to the target and renames it into place, so the
    /// backing file always holds either the previous or the new table.
    async fn write_bytes(&self, bytes: &[u8]) -> PersistResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let staging = self.staging_path();
        if let Err(err) = stage(&staging, bytes).await {
            if let Err(cleanup) = fs::remove_file(&staging).await {
                tracing::debug!(path = %staging.display(), error = %cleanup, "staging file not removed");
            }
            return Err(err.into());
        }
        fs::rename(&staging, &self.path).await?;
        Ok(())
    }
}

async fn stage(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .await?;
    for chunk in bytes.chunks(CHUNK_SIZE) {
        file.write_all(chunk).await?;
    }
    file.flush().await?;
    file.sync_data().await
}
