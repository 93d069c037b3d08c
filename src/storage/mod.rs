//! Client-side Persistent Storage
//!
//! The auth token lives in a string key/value store under the `token` key,
//! written by whatever logged the user in. The loader never reads the store
//! itself: hosts call [`read_token`] once and inject the result.
//!
//! - [`FileStore`]: JSON file on disk for native hosts
//! - [`MemoryStore`]: process-local store
//! - The browser host implements [`KeyValueStore`] over `localStorage`

#[cfg(feature = "native")]
mod file;

#[cfg(feature = "native")]
pub use file::FileStore;

use std::cell::RefCell;
use std::collections::BTreeMap;

use thiserror::Error;

use crate::model::AuthToken;

/// Key the auth token is stored under
pub const TOKEN_KEY: &str = "token";

/// String key/value storage with `localStorage` semantics
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    fn remove_item(&self, key: &str) -> StorageResult<()>;
}

/// Read the auth token under `key`. Empty values count as absent.
pub fn read_token<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> StorageResult<Option<AuthToken>> {
    Ok(store
        .get_item(key)?
        .filter(|value| !value.is_empty())
        .map(AuthToken::new))
}

/// Non-persistent store
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Errors that can occur reading or writing the store
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The host has no storage (e.g. `localStorage` disabled)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
