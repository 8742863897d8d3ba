//! JSON-file key/value store
//!
//! Holds the signed-in user, the quick note and the overlay open flag. The
//! whole map is rewritten on every change; it stays small.

use std::path::{Path, PathBuf};

use mia_domain::{MiaError, Result};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::errors::InfraError;

/// File-backed key/value store with an in-memory copy of its contents.
#[derive(Debug)]
pub struct LocalStore {
    path: PathBuf,
    entries: Mutex<Map<String, Value>>,
}

impl LocalStore {
    /// Open the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    /// Returns `MiaError::Storage` if the file exists but cannot be read, or
    /// `MiaError::InvalidInput` if it is not a JSON object.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match std::fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => Map::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(InfraError::from)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(err) => return Err(InfraError::from(err).into()),
        };

        debug!(path = %path.display(), keys = entries.len(), "local store opened");
        Ok(Self { path, entries: Mutex::new(entries) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and decode `key`. A value that no longer decodes is treated as
    /// absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.entries.lock().get(key).cloned()?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                warn!(key, error = %err, "ignoring undecodable local store value");
                None
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }

    /// Store `value` under `key` and persist the file.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value).map_err(InfraError::from)?;
        let mut entries = self.entries.lock();
        entries.insert(key.to_string(), value);
        self.persist(&entries)
    }

    /// Remove `key` and persist the file. Removing a missing key is a no-op.
    pub fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock();
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&entries)
    }

    fn persist(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(InfraError::from)?;
        }

        let bytes = serde_json::to_vec_pretty(entries).map_err(InfraError::from)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes).map_err(InfraError::from)?;
        std::fs::rename(&tmp, &self.path).map_err(|err| {
            MiaError::Storage(format!("failed to replace {}: {err}", self.path.display()))
        })
    }
}
