//! Durable key-value storage backing the session records.
//!
//! Flow Overview:
//! - `MemoryStore` keeps records in process memory (tests, ephemeral runs).
//! - `FileStore` keeps one JSON document per origin under the state directory
//!   and rewrites it on every mutation, so records survive restarts.
//!
//! Values are stored in plain text. The store is not a secret vault.

use parking_lot::Mutex;
use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access session store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode session store: {0}")]
    Encode(#[from] serde_json::Error),
}

/// String records addressable by key.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    /// Returns an error if the record cannot be persisted.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removing a missing key is a no-op.
    /// # Errors
    /// Returns an error if the removal cannot be persisted.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.records.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.records.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.records.lock().remove(key);
        Ok(())
    }
}

/// File-backed store scoped to a single origin. The in-memory view only
/// changes once the file has been written.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    records: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens (or lazily creates) the store for `origin` under `dir`.
    #[must_use]
    pub fn open(dir: &Path, origin: &str) -> Self {
        let path = dir.join(format!("{}.json", origin_slug(origin)));
        let records = load_records(&path);
        debug!(path = %path.display(), records = records.len(), "opened session store");
        Self {
            path,
            records: Mutex::new(records),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, records: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        let payload = serde_json::to_vec_pretty(records)?;
        fs::write(&self.path, payload).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.records.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut records = self.records.lock();
        let mut next = records.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next)?;
        *records = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut records = self.records.lock();
        if !records.contains_key(key) {
            return Ok(());
        }
        let mut next = records.clone();
        next.remove(key);
        self.persist(&next)?;
        *records = next;
        Ok(())
    }
}

fn load_records(path: &Path) -> BTreeMap<String, String> {
    match fs::read(path) {
        Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|err| {
            warn!(path = %path.display(), "ignoring unreadable session store: {err}");
            BTreeMap::new()
        }),
        Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
        Err(err) => {
            warn!(path = %path.display(), "failed to read session store: {err}");
            BTreeMap::new()
        }
    }
}

/// Maps an origin such as `https://console.test:8443` to `https_console.test_8443`.
fn origin_slug(origin: &str) -> String {
    let slug: String = origin
        .trim()
        .trim_end_matches('/')
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let mut collapsed = String::with_capacity(slug.len());
    for c in slug.chars() {
        if c == '_' && collapsed.ends_with('_') {
            continue;
        }
        collapsed.push(c);
    }

    if collapsed.is_empty() {
        "default".to_string()
    } else {
        collapsed
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn origin_slug_is_filesystem_safe() {
        assert_eq!(origin_slug("https://console.test:8443"), "https_console.test_8443");
        assert_eq!(origin_slug("http://localhost:8080/"), "http_localhost_8080");
        assert_eq!(origin_slug("   "), "default");
    }

    #[test]
    fn memory_store_remove_missing_is_noop() {
        let store = MemoryStore::new();
        assert!(store.remove("token").is_ok());
        store.set("token", "abc").unwrap();
        assert_eq!(store.get("token").as_deref(), Some("abc"));
        store.remove("token").unwrap();
        assert_eq!(store.get("token"), None);
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path(), "http://localhost:8080");
        store.set("token", "tok123").unwrap();
        store.set("user", r#"{"id":1}"#).unwrap();

        let reopened = FileStore::open(dir.path(), "http://localhost:8080");
        assert_eq!(reopened.get("token").as_deref(), Some("tok123"));
        assert_eq!(reopened.get("user").as_deref(), Some(r#"{"id":1}"#));
    }

    #[test]
    fn file_store_is_scoped_per_origin() {
        let dir = tempfile::tempdir().unwrap();
        let first = FileStore::open(dir.path(), "http://a.test");
        first.set("token", "a").unwrap();

        let second = FileStore::open(dir.path(), "http://b.test");
        assert_eq!(second.get("token"), None);
        assert_ne!(first.path(), second.path());
    }

    #[test]
    fn file_store_treats_corrupt_file_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("http_localhost_8080.json");
        fs::write(&path, b"{not json").unwrap();

        let store = FileStore::open(dir.path(), "http://localhost:8080");
        assert_eq!(store.get("token"), None);
        store.set("token", "fresh").unwrap();
        assert_eq!(
            FileStore::open(dir.path(), "http://localhost:8080")
                .get("token")
                .as_deref(),
            Some("fresh")
        );
    }

    #[test]
    fn failed_write_leaves_records_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path(), "http://localhost:8080");
        store.set("token", "stale").unwrap();

        // A directory in place of the file makes every write fail.
        fs::remove_file(store.path()).unwrap();
        fs::create_dir(store.path()).unwrap();

        assert!(store.remove("token").is_err());
        assert_eq!(store.get("token").as_deref(), Some("stale"));
        assert!(store.set("user", "{}").is_err());
        assert_eq!(store.get("user"), None);
    }

    #[test]
    fn file_store_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("state").join("nested");
        let store = FileStore::open(&nested, "http://localhost:8080");
        store.set("token", "t").unwrap();
        assert!(store.path().exists());
    }
}
