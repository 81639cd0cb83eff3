use std::{
    io,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use hashbrown::HashMap;
use tokio::task;

use crate::{
    config::LocalizedConfig,
    core::{DictionaryError, localized::LocalizedDictionary},
    persist::PersistError,
};

use super::handle::{RuntimeConfig, RuntimeError, SharedDictionary, spawn_shared};

/// Hands out one [`SharedDictionary`] per backing file.
///
/// Callers that want shared state hold the same registry; opening the same
/// file twice returns clones of one handle rather than a second writer.
/// Different configurations never affect each other.
#[derive(Debug, Default)]
pub struct DictionaryRegistry {
    runtime: RuntimeConfig,
    handles: Mutex<HashMap<PathBuf, SharedDictionary>>,
}

impl DictionaryRegistry {
    /// Empty registry whose tasks use `runtime` channel sizing.
    pub fn new(runtime: RuntimeConfig) -> Self {
        Self {
            runtime,
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the live handle for `config`'s file, loading and spawning
    /// the store on first use or after the previous handle shut down.
    ///
    /// Handles are keyed by the canonical file location, so different
    /// spellings of one path share a writer. The parent directory is
    /// created if needed. Disk access runs on the blocking pool and never
    /// under the registry lock.
    pub async fn open(&self, config: LocalizedConfig) -> Result<SharedDictionary, RuntimeError> {
        let path = config.file_path();
        let key = task::spawn_blocking(move || canonical_key(&path))
            .await?
            .map_err(|err| DictionaryError::Persist(PersistError::Io(err)))?;
        if let Some(handle) = self.live_handle(&key) {
            return Ok(handle);
        }

        let dict = task::spawn_blocking(move || LocalizedDictionary::open(config)).await?;

        let mut handles = self.lock();
        // Another caller may have spawned while the store was loading.
        if let Some(handle) = handles.get(&key).filter(|h| !h.is_closed()) {
            return Ok(handle.clone());
        }
        tracing::debug!(path = %key.display(), "spawning shared dictionary");
        let handle = spawn_shared(dict, self.runtime.clone());
        handles.insert(key, handle.clone());
        Ok(handle)
    }

    /// Number of handles whose task is still running.
    pub fn live(&self) -> usize {
        self.lock().values().filter(|h| !h.is_closed()).count()
    }

    /// Shuts down every handle and forgets them.
    pub async fn shutdown_all(&self) -> Result<(), RuntimeError> {
        let handles: Vec<SharedDictionary> = self.lock().drain().map(|(_, h)| h).collect();
        for handle in handles {
            match handle.shutdown().await {
                Ok(()) | Err(RuntimeError::ChannelClosed) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    fn live_handle(&self, key: &Path) -> Option<SharedDictionary> {
        self.lock().get(key).filter(|h| !h.is_closed()).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, SharedDictionary>> {
        self.handles.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Resolves `path` through its canonical parent directory.
fn canonical_key(path: &Path) -> io::Result<PathBuf> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    std::fs::create_dir_all(parent)?;
    let mut key = std::fs::canonicalize(parent)?;
    if let Some(name) = path.file_name() {
        key.push(name);
    }
    Ok(key)
}
