//! JSON-file store

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::KeyValueStore;
use crate::{Result, ScholarGateError};

/// [`KeyValueStore`] persisted as one JSON object on disk.
///
/// The file is read once, on first access, and rewritten in full after every
/// mutation (tmp file + rename). A missing file is an empty store; a corrupt
/// file is logged and treated as empty. Any other read failure is a
/// [`ScholarGateError::Storage`] and nothing is cached, so the file is never
/// overwritten from a partial view.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<Option<BTreeMap<String, String>>>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Mutex::new(None),
        }
    }

    /// Store at the platform data dir: `~/.local/share/scholargate/store.json` on Linux.
    pub fn default_location() -> Self {
        Self::new(default_store_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, String>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(ScholarGateError::Storage(format!(
                    "failed to read store file {}: {e}",
                    self.path.display()
                )));
            }
        };
        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "corrupt store file, starting empty");
                Ok(BTreeMap::new())
            }
        }
    }

    async fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                ScholarGateError::Storage(format!(
                    "failed to create store dir {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        let json = serde_json::to_string(entries)
            .map_err(|e| ScholarGateError::Storage(format!("failed to serialize store: {e}")))?;
        tokio::fs::write(&tmp_path, json).await.map_err(|e| {
            ScholarGateError::Storage(format!(
                "failed to write store file {}: {e}",
                tmp_path.display()
            ))
        })?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| {
                ScholarGateError::Storage(format!(
                    "failed to rename store file {} → {}: {e}",
                    tmp_path.display(),
                    self.path.display()
                ))
            })?;
        debug!(path = %self.path.display(), keys = entries.len(), "store saved");
        Ok(())
    }
}

fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from(".local"))
        .join("scholargate")
        .join("store.json")
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut guard = self.entries.lock().await;
        if guard.is_none() {
            *guard = Some(self.load().await?);
        }
        Ok(guard.as_ref().and_then(|entries| entries.get(key).cloned()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut guard = self.entries.lock().await;
        let mut entries = match guard.take() {
            Some(entries) => entries,
            None => self.load().await?,
        };
        entries.insert(key.to_string(), value.to_string());
        let saved = self.save(&entries).await;
        // Keep the in-memory view either way; a failed write is retried on the next mutation.
        *guard = Some(entries);
        saved
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut guard = self.entries.lock().await;
        let mut entries = match guard.take() {
            Some(entries) => entries,
            None => self.load().await?,
        };
        let existed = entries.remove(key).is_some();
        let saved = if existed {
            self.save(&entries).await
        } else {
            Ok(())
        };
        *guard = Some(entries);
        saved
    }
}
