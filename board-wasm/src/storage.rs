use board_client::cache::{CachePersister, PersistedCache};
use board_client::{CacheError, TokenSource};
use gloo_storage::errors::StorageError;
use gloo_storage::{LocalStorage, Storage};

/// Reads the credential from `localStorage` as stored by the login page.
#[derive(Debug, Clone)]
pub struct LocalStorageTokens {
    key: String,
}

impl LocalStorageTokens {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl TokenSource for LocalStorageTokens {
    fn read_token(&self) -> Option<String> {
        let raw = match LocalStorage::raw().get_item(&self.key) {
            Ok(raw) => raw?,
            Err(e) => {
                log::warn!("localStorage is not readable: {:?}", e);
                return None;
            }
        };

        // Values written through gloo-storage are JSON strings; plain setItem values are not.
        let token = serde_json::from_str::<String>(&raw).unwrap_or(raw);
        if token.is_empty() {
            None
        } else {
            Some(token)
        }
    }
}

/// Query cache snapshot kept in `localStorage`.
#[derive(Debug, Clone)]
pub struct WebStoragePersister {
    key: String,
}

impl WebStoragePersister {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

fn storage_error(e: StorageError) -> CacheError {
    CacheError::Storage(e.to_string())
}

impl CachePersister for WebStoragePersister {
    fn persist(&self, snapshot: &PersistedCache) -> Result<(), CacheError> {
        LocalStorage::set(&self.key, snapshot).map_err(storage_error)
    }

    fn restore(&self) -> Result<Option<PersistedCache>, CacheError> {
        match LocalStorage::get::<PersistedCache>(&self.key) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(StorageError::KeyNotFound(_)) => Ok(None),
            Err(e) => Err(storage_error(e)),
        }
    }

    fn remove(&self) -> Result<(), CacheError> {
        LocalStorage::delete(&self.key);
        Ok(())
    }
}
