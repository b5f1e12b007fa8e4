//! Browser LocalStorage backend

use super::{PersistError, Store};

/// Store backed by `window.localStorage`
///
/// A missing storage object (private browsing, sandboxed iframe) degrades
/// to reads returning nothing and writes failing with `Unavailable`.
pub struct LocalStorageStore {
    storage: Option<web_sys::Storage>,
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalStorageStore {
    pub fn new() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable - progress will not be saved");
        }
        Self { storage }
    }
}

impl Store for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        let storage = self.storage.as_ref().ok_or(PersistError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|e| PersistError::Rejected {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })
    }
}
