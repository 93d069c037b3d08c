//! File-backed Store
//!
//! Persists all items as one JSON object. Every call reads or rewrites the
//! whole file, which is fine for a handful of keys.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StorageResult};

/// Key/value store kept in a JSON file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data_local_dir>/secret-snake/storage.json`, or `./secret_snake_storage.json`
    /// when the platform has no data directory
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .map(|p| p.join("secret-snake").join("storage.json"))
            .unwrap_or_else(|| PathBuf::from("./secret_snake_storage.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> StorageResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        Ok(serde_json::from_str(&content)?)
    }

    fn write_all(&self, items: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Write then rename so a crash never leaves a truncated file
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(items)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut items = self.read_all()?;
        items.insert(key.to_string(), value.to_string());
        self.write_all(&items)?;
        tracing::debug!(path = ?self.path, key, "Stored item");
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        let mut items = self.read_all()?;
        if items.remove(key).is_some() {
            self.write_all(&items)?;
            tracing::debug!(path = ?self.path, key, "Removed item");
        }
        Ok(())
    }
}
