//! Durable key/value storage for client state.
//!
//! Stands in for the browser's `localStorage`: string values under string
//! keys, kept in one JSON file. Every mutation rewrites the file through a
//! temporary file that is atomically persisted, so a write has completed
//! before the call returns.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// File name used inside the data directory.
pub const STORAGE_FILE: &str = "local-storage.json";

/// Storage keys used by the storefront.
pub mod keys {
    /// Serialized cart entry list.
    pub const CART: &str = "storedCartData";

    /// Session token string.
    pub const TOKEN: &str = "userToken";

    /// Product snapshot handed to the detail view.
    pub const PRODUCT_DETAIL: &str = "productData";
}

/// Errors that can occur reading or writing local storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("storage file {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("value under {key:?} is not valid JSON: {source}")]
    Value {
        key: String,
        source: serde_json::Error,
    },
}

/// String key/value store, optionally backed by a file.
#[derive(Debug, Default)]
pub struct LocalStorage {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl LocalStorage {
    /// Open the storage file in `data_dir`, creating nothing until the first
    /// write.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(data_dir: &Path) -> Result<Self, StorageError> {
        let path = data_dir.join(STORAGE_FILE);
        let values = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StorageError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StorageError::Read { path, source }),
        };

        tracing::debug!(path = %path.display(), keys = values.len(), "Opened local storage");
        Ok(Self {
            path: Some(path),
            values,
        })
    }

    /// Storage that lives only as long as this value.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Path of the backing file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing file cannot be written. The in-memory
    /// value is rolled back in that case.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<(), StorageError> {
        let previous = self.values.insert(key.to_owned(), value.into());
        self.flush().inspect_err(|_| {
            match previous {
                Some(old) => self.values.insert(key.to_owned(), old),
                None => self.values.remove(key),
            };
        })
    }

    /// Delete `key`. Deleting a missing key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing file cannot be written.
    pub fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let Some(previous) = self.values.remove(key) else {
            return Ok(());
        };
        self.flush().inspect_err(|_| {
            self.values.insert(key.to_owned(), previous);
        })
    }

    /// Read and deserialize the JSON value under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Value`] if the stored text is not valid JSON
    /// for `T`.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        self.get(key)
            .map(|raw| {
                serde_json::from_str(raw).map_err(|source| StorageError::Value {
                    key: key.to_owned(),
                    source,
                })
            })
            .transpose()
    }

    /// Serialize `value` as JSON and store it under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn set_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Value {
            key: key.to_owned(),
            source,
        })?;
        self.set(key, raw)
    }

    fn flush(&self) -> Result<(), StorageError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let write_err = |source: io::Error| StorageError::Write {
            path: path.clone(),
            source,
        };

        let dir = path
            .parent()
            .ok_or_else(|| write_err(io::Error::other("storage path missing parent")))?;
        fs::create_dir_all(dir).map_err(write_err)?;

        let bytes = serde_json::to_vec_pretty(&self.values).map_err(|source| StorageError::Corrupt {
            path: path.clone(),
            source,
        })?;

        let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
        temp.write_all(&bytes).map_err(write_err)?;
        temp.as_file().sync_all().map_err(write_err)?;
        temp.persist(path).map_err(|err| write_err(err.error))?;
        Ok(())
    }
}
