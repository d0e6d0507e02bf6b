#![forbid(unsafe_code)]

//! Synchronous key/value persistence backends.
//!
//! Values are opaque strings; the assignment codec decides what goes in
//! them. Backends never interpret the value.
//!
//! | Backend | Feature | Use |
//! |---------|---------|-----|
//! | [`MemoryStorage`] | always | tests, hosts without persistence |
//! | `FileStorage` | `file-storage` | native hosts, one JSON object per file |
//! | `LocalStorage` | in `offergrid-wasm` | browser `localStorage` |

use std::collections::BTreeMap;
use std::fmt;

/// Errors raised by storage backends.
#[derive(Debug)]
pub enum StorageError {
    /// Underlying I/O failure.
    Io(std::io::Error),
    /// Backing file contents could not be (de)serialized.
    Serialization(String),
    /// Write would exceed the backend quota. `quota` is `None` when the
    /// backend does not report its limit.
    QuotaExceeded {
        key: String,
        bytes: usize,
        quota: Option<usize>,
    },
    /// Backend is not reachable (private browsing, missing global).
    Unavailable(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Serialization(msg) => write!(f, "serialization error: {msg}"),
            Self::QuotaExceeded {
                key,
                bytes,
                quota: Some(quota),
            } => write!(
                f,
                "writing {bytes} bytes under {key:?} exceeds quota of {quota} bytes"
            ),
            Self::QuotaExceeded {
                key,
                bytes,
                quota: None,
            } => write!(f, "writing {bytes} bytes under {key:?} exceeds storage quota"),
            Self::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Key/value store for persisted grid state.
pub trait StorageBackend {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Read the value under `key`; `Ok(None)` when absent.
    fn load(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replace the value under `key`.
    fn save(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete `key`. Removing an absent key succeeds.
    fn remove(&mut self, key: &str) -> StorageResult<()>;

    fn is_available(&self) -> bool {
        true
    }
}

impl<B: StorageBackend + ?Sized> StorageBackend for Box<B> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).save(key, value)
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}

// ---------------------------------------------------------------------------
// MemoryStorage
// ---------------------------------------------------------------------------

/// In-memory backend with an optional byte quota.
///
/// The quota counts key and value bytes across all entries, the way browsers
/// account `localStorage`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes that would push total usage past `quota` bytes.
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            quota: Some(quota),
        }
    }

    /// Seed a value without quota checks.
    #[must_use]
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn usage_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl StorageBackend for MemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> StorageResult<()> {
        if let Some(quota) = self.quota {
            let bytes = self.usage_without(key) + key.len() + value.len();
            if bytes > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_owned(),
                    bytes,
                    quota: Some(quota),
                });
            }
        }
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileStorage
// ---------------------------------------------------------------------------

#[cfg(feature = "file-storage")]
pub use file::FileStorage;

#[cfg(feature = "file-storage")]
mod file {
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};

    use super::{StorageBackend, StorageError, StorageResult};

    /// One JSON object per file, rewritten atomically on every save.
    #[derive(Debug, Clone)]
    pub struct FileStorage {
        path: PathBuf,
    }

    impl FileStorage {
        #[must_use]
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        #[must_use]
        pub fn path(&self) -> &Path {
            &self.path
        }

        fn read_map(&self) -> StorageResult<BTreeMap<String, String>> {
            match std::fs::read_to_string(&self.path) {
                Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
                Ok(content) => serde_json::from_str(&content)
                    .map_err(|e| StorageError::Serialization(e.to_string())),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
                Err(e) => Err(StorageError::Io(e)),
            }
        }

        /// Existing map for a read-modify-write; a corrupt file is replaced.
        fn map_for_write(&self) -> StorageResult<BTreeMap<String, String>> {
            match self.read_map() {
                Err(StorageError::Serialization(reason)) => {
                    tracing::warn!(
                        target: "offergrid.storage",
                        path = %self.path.display(),
                        %reason,
                        "replacing unreadable storage file"
                    );
                    Ok(BTreeMap::new())
                }
                other => other,
            }
        }

        fn write_map(&self, map: &BTreeMap<String, String>) -> StorageResult<()> {
            if let Some(parent) = self.path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(map)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            let tmp = self.path.with_extension("tmp");
            std::fs::write(&tmp, content)?;
            std::fs::rename(&tmp, &self.path)?;
            Ok(())
        }
    }

    impl StorageBackend for FileStorage {
        fn name(&self) -> &str {
            "file"
        }

        fn load(&self, key: &str) -> StorageResult<Option<String>> {
            Ok(self.read_map()?.remove(key))
        }

        fn save(&mut self, key: &str, value: &str) -> StorageResult<()> {
            let mut map = self.map_for_write()?;
            map.insert(key.to_owned(), value.to_owned());
            self.write_map(&map)
        }

        fn remove(&mut self, key: &str) -> StorageResult<()> {
            let mut map = self.map_for_write()?;
            if map.remove(key).is_some() {
                self.write_map(&map)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_round_trip() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.load("k").expect("load"), None);
        storage.save("k", "v").expect("save");
        assert_eq!(storage.load("k").expect("load").as_deref(), Some("v"));
        storage.remove("k").expect("remove");
        assert!(storage.is_empty());
    }

    #[test]
    fn memory_remove_absent_key_succeeds() {
        let mut storage = MemoryStorage::new();
        assert!(storage.remove("missing").is_ok());
    }

    #[test]
    fn quota_rejects_oversized_write() {
        let mut storage = MemoryStorage::with_quota(8);
        storage.save("k", "1234").expect("fits");
        let err = storage.save("other", "1234").expect_err("over quota");
        assert!(matches!(
            err,
            StorageError::QuotaExceeded { quota: Some(8), .. }
        ));
        assert_eq!(storage.get("other"), None);
    }

    #[test]
    fn quota_counts_replacement_not_sum() {
        let mut storage = MemoryStorage::with_quota(6);
        storage.save("k", "12345").expect("fits");
        storage.save("k", "54321").expect("replacing stays within quota");
        assert_eq!(storage.get("k"), Some("54321"));
    }

    #[test]
    fn boxed_backend_delegates() {
        let mut boxed: Box<dyn StorageBackend> = Box::new(MemoryStorage::new());
        boxed.save("k", "v").expect("save");
        assert_eq!(boxed.name(), "memory");
        assert_eq!(boxed.load("k").expect("load").as_deref(), Some("v"));
    }

    #[test]
    fn display_formats() {
        let err = StorageError::Unavailable("no localStorage".into());
        assert_eq!(err.to_string(), "storage unavailable: no localStorage");
    }
}
