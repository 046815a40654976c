//! Raw byte stores behind [`Cache`](crate::Cache).

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use tracing::debug;

use crate::CacheError;

/// A key-value store holding opaque byte blobs.
///
/// Implementations use interior mutability so a store can be shared behind a
/// plain reference.
pub trait KvStore {
    /// Get the blob stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store `value` under `key`, replacing any previous blob.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError>;

    /// Delete the blob stored under `key`. Deleting a missing key succeeds.
    fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Check if a key exists.
    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.get(key)?.is_some())
    }

    /// List all keys, sorted.
    fn keys(&self) -> Result<Vec<String>, CacheError>;
}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        (**self).delete(key)
    }

    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        (**self).exists(key)
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        (**self).keys()
    }
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_entries<R>(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, Vec<u8>>) -> R,
    ) -> Result<R, CacheError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| CacheError::StoreError("memory store lock poisoned".to_string()))?;
        Ok(f(&mut guard))
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.with_entries(|entries| entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        self.with_entries(|entries| {
            entries.insert(key.to_string(), value.to_vec());
        })
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.with_entries(|entries| {
            entries.remove(key);
        })
    }

    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.with_entries(|entries| entries.contains_key(key))
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.with_entries(|entries| entries.keys().cloned().collect())
    }
}

/// Directory-backed store: one file per key.
///
/// File names are the URL-safe base64 encoding of the key, so any key string
/// is accepted. Writes go to a temporary file first and are then renamed into
/// place.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

const BLOB_EXTENSION: &str = "blob";

impl DirStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            CacheError::OpenError(format!("{}: {}", root.display(), e))
        })?;
        debug!(root = %root.display(), "opened directory store");
        Ok(Self { root })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name = URL_SAFE_NO_PAD.encode(key.as_bytes());
        self.root.join(format!("{}.{}", name, BLOB_EXTENSION))
    }

    fn key_from_path(path: &Path) -> Option<String> {
        if path.extension()? != BLOB_EXTENSION {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        let bytes = URL_SAFE_NO_PAD.decode(stem).ok()?;
        String::from_utf8(bytes).ok()
    }
}

impl KvStore for DirStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.path_for(key).is_file())
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            if let Some(key) = Self::key_from_path(&entry?.path()) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }
}
