//! Browser Storage
//!
//! `window.localStorage` as a [`KeyValueStore`], where the login page keeps
//! the bearer token.

use secret_snake::{KeyValueStore, StorageError, StorageResult};
use wasm_bindgen::JsValue;

/// `window.localStorage`
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Open the page's local storage
    pub fn open() -> StorageResult<Self> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))?;

        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.storage.get_item(key).map_err(js_error)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.storage.set_item(key, value).map_err(js_error)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.storage.remove_item(key).map_err(js_error)
    }
}

fn js_error(e: JsValue) -> StorageError {
    StorageError::Unavailable(format!("{:?}", e))
}
