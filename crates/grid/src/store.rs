//! Durable key-value store behind the persisted column layout. The grid
//! only sees the `LayoutStore` trait, so it can be tested without any
//! filesystem or browser-storage analog.

use dashmap::DashMap;
use std::path::{Path, PathBuf};
use trafficdesk_core::GridResult;

pub trait LayoutStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> GridResult<()>;
}

/// In-memory store, used in tests and as a fallback when no layout file
/// is configured.
#[derive(Default)]
pub struct MemoryLayoutStore {
    entries: DashMap<String, String>,
}

impl MemoryLayoutStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LayoutStore for MemoryLayoutStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.clone())
    }

    fn set(&self, key: &str, value: &str) -> GridResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed store persisting all entries as a single JSON object.
/// A missing or unreadable file is treated as empty.
pub struct FileLayoutStore {
    path: PathBuf,
    entries: DashMap<String, String>,
}

impl FileLayoutStore {
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = DashMap::new();
        match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<std::collections::HashMap<String, String>>(&raw)
            {
                Ok(map) => {
                    for (k, v) in map {
                        entries.insert(k, v);
                    }
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed layout file");
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read layout file");
            }
        }
        Self { path, entries }
    }

    fn flush(&self) -> GridResult<()> {
        let map: std::collections::HashMap<String, String> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        let raw = serde_json::to_string_pretty(&map)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl LayoutStore for FileLayoutStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.clone())
    }

    fn set(&self, key: &str, value: &str) -> GridResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryLayoutStore::new();
        assert!(store.get("layout").is_none());
        store.set("layout", "{\"a\":1}").unwrap();
        assert_eq!(store.get("layout").as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");

        let store = FileLayoutStore::open(&path);
        store.set("grid", "value-1").unwrap();
        drop(store);

        let reopened = FileLayoutStore::open(&path);
        assert_eq!(reopened.get("grid").as_deref(), Some("value-1"));
    }

    #[test]
    fn test_file_store_ignores_garbage_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(&path, "not json at all").unwrap();

        let store = FileLayoutStore::open(&path);
        assert!(store.get("grid").is_none());
        // still writable afterwards
        store.set("grid", "v").unwrap();
        assert_eq!(store.get("grid").as_deref(), Some("v"));
    }
}
