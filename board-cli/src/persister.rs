use anyhow::{Context, Result};
use board_client::cache::{CachePersister, PersistedCache};
use board_client::CacheError;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Query cache snapshot stored as JSON (default `~/.board_cache.json`).
pub struct FileCachePersister {
    path: PathBuf,
}

impl FileCachePersister {
    pub fn new(custom_path: Option<PathBuf>) -> Result<Self> {
        let path = match custom_path {
            Some(path) => path,
            None => {
                let home = dirs::home_dir().context("Failed to get home directory")?;
                home.join(".board_cache.json")
            }
        };

        Ok(Self { path })
    }
}

fn storage_error(e: std::io::Error) -> CacheError {
    CacheError::Storage(e.to_string())
}

impl CachePersister for FileCachePersister {
    fn persist(&self, snapshot: &PersistedCache) -> Result<(), CacheError> {
        let json = serde_json::to_string(snapshot)?;
        fs::write(&self.path, json).map_err(storage_error)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&self.path).map_err(storage_error)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.path, perms).map_err(storage_error)?;
        }

        Ok(())
    }

    fn restore(&self) -> Result<Option<PersistedCache>, CacheError> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error(e)),
        }
    }

    fn remove(&self) -> Result<(), CacheError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(e)),
        }
    }
}
