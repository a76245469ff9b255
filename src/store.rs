//! Template / analysis-result storage.
//!
//! Items are written once under an opaque string id and never mutated
//! in place. `MemoryStore` backs unit tests; `JsonDirStore` keeps one
//! pretty-printed JSON file per id and creates ids at most once.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::StoreError;

pub trait Store<T> {
    /// Store an item under a freshly generated id and return the id.
    fn create(&mut self, item: T) -> Result<String, StoreError>;
    /// Store an item under a caller-chosen id, at most once.
    fn insert(&mut self, id: &str, item: T) -> Result<(), StoreError>;
    fn get(&self, id: &str) -> Result<T, StoreError>;
    fn list_ids(&self) -> Result<Vec<String>, StoreError>;
    fn delete(&mut self, id: &str) -> Result<(), StoreError>;
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// --- In-memory store ---

#[derive(Debug, Default)]
pub struct MemoryStore<T> {
    items: HashMap<String, T>,
}

impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
        }
    }
}

impl<T: Clone> Store<T> for MemoryStore<T> {
    fn create(&mut self, item: T) -> Result<String, StoreError> {
        let id = new_id();
        self.insert(&id, item)?;
        Ok(id)
    }

    fn insert(&mut self, id: &str, item: T) -> Result<(), StoreError> {
        if self.items.contains_key(id) {
            return Err(StoreError::AlreadyExists(id.to_string()));
        }
        self.items.insert(id.to_string(), item);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<T, StoreError> {
        self.items
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn list_ids(&self) -> Result<Vec<String>, StoreError> {
        let mut ids: Vec<String> = self.items.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        self.items
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

// --- JSON directory store ---

pub struct JsonDirStore<T> {
    dir: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize + DeserializeOwned> JsonDirStore<T> {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
            _marker: PhantomData,
        })
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

impl<T: Serialize + DeserializeOwned> Store<T> for JsonDirStore<T> {
    fn create(&mut self, item: T) -> Result<String, StoreError> {
        let id = new_id();
        self.insert(&id, item)?;
        Ok(id)
    }

    fn insert(&mut self, id: &str, item: T) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&item)?;
        // create_new makes id creation atomic / at-most-once
        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.path_for(id))
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(StoreError::AlreadyExists(id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    fn get(&self, id: &str) -> Result<T, StoreError> {
        let content = match fs::read_to_string(self.path_for(id)) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    fn list_ids(&self) -> Result<Vec<String>, StoreError> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().map(|ext| ext == "json").unwrap_or(false) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(stem.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        value: u32,
    }

    #[test]
    fn test_memory_store_crud() {
        let mut store = MemoryStore::new();
        let id = store.create(Item { value: 1 }).unwrap();
        assert_eq!(store.get(&id).unwrap(), Item { value: 1 });
        assert_eq!(store.list_ids().unwrap(), vec![id.clone()]);
        store.delete(&id).unwrap();
        assert!(matches!(store.get(&id), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_memory_store_insert_is_at_most_once() {
        let mut store = MemoryStore::new();
        store.insert("fixed", Item { value: 1 }).unwrap();
        assert!(matches!(
            store.insert("fixed", Item { value: 2 }),
            Err(StoreError::AlreadyExists(_))
        ));
        // 既存の値は上書きされない
        assert_eq!(store.get("fixed").unwrap().value, 1);
    }

    #[test]
    fn test_memory_store_delete_missing_is_not_found() {
        let mut store: MemoryStore<Item> = MemoryStore::new();
        assert!(matches!(store.delete("nope"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_json_dir_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store: JsonDirStore<Item> = JsonDirStore::new(dir.path()).unwrap();
        let id = store.create(Item { value: 7 }).unwrap();
        assert_eq!(store.get(&id).unwrap().value, 7);
        assert_eq!(store.list_ids().unwrap(), vec![id.clone()]);
        store.delete(&id).unwrap();
        assert!(matches!(store.get(&id), Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete(&id), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_json_dir_store_insert_is_at_most_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut store: JsonDirStore<Item> = JsonDirStore::new(dir.path()).unwrap();
        store.insert("fixed", Item { value: 1 }).unwrap();
        assert!(matches!(
            store.insert("fixed", Item { value: 2 }),
            Err(StoreError::AlreadyExists(_))
        ));
        assert_eq!(store.get("fixed").unwrap().value, 1);
    }
}
