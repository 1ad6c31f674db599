//! Key-value persistence. Every piece of state lives under a fixed string
//! key, serialized as JSON with no schema versioning or migrations. Reads
//! that fail for any reason fall back to the default supplied at the call
//! site.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;

/// Fixed identifiers for persisted state.
pub mod keys {
    pub const ONBOARDING: &str = "onboarding";
    pub const PLAN: &str = "plan";
    pub const JOURNAL: &str = "journal";
    pub const CRAVING_LOGS: &str = "craving_logs";
    pub const RELAPSE_LOG: &str = "relapse_log";
    pub const PROFILE: &str = "profile";
    pub const THEME_MODE: &str = "theme_mode";
}

pub trait KvStore {
    /// Reads and decodes the value under `key`. Missing keys, unreadable
    /// files, and shape mismatches all come back as `None`.
    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T>;

    fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError>;
}

/// One JSON file per key under an injected directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KvStore for JsonFileStore {
    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = fs::read_to_string(self.path_for(key)).ok()?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::debug!(key, error = %err, "stored value did not match expected shape");
                None
            }
        }
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let encoded = serde_json::to_string_pretty(value).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        let path = self.path_for(key);
        fs::write(&path, encoded).map_err(|source| StoreError::Io { path, source })
    }
}

/// In-memory store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, serde_json::Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entries = self.entries.lock().expect("store lock poisoned");
        let value = entries.get(key)?.clone();
        serde_json::from_value(value).ok()
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let encoded = serde_json::to_value(value).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        let mut entries = self.entries.lock().expect("store lock poisoned");
        entries.insert(key.to_string(), encoded);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();

        store.write(keys::THEME_MODE, &"dark").unwrap();
        assert_eq!(store.read::<String>(keys::THEME_MODE).unwrap(), "dark");
        assert!(store.read::<String>(keys::PROFILE).is_none());
    }

    #[test]
    fn test_file_store_shape_mismatch_falls_back_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();

        std::fs::write(dir.path().join("plan.json"), "{not json").unwrap();
        assert!(store.read::<Vec<u32>>(keys::PLAN).is_none());

        store.write(keys::PLAN, &vec![1, 2, 3]).unwrap();
        // Valid JSON, wrong shape.
        assert!(store.read::<String>(keys::PLAN).is_none());
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        store.write(keys::JOURNAL, &vec!["a", "b"]).unwrap();
        assert_eq!(
            store.read::<Vec<String>>(keys::JOURNAL).unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );
    }
}
