//! String key-value persistence.
//!
//! Session clock state, unit preferences and the profile all live in one flat
//! map of string keys to string values. Readers must tolerate absent keys;
//! nothing here knows what the values mean.

use crate::error::StoreError;
use fs2::FileExt;
use log::debug;
use std::collections::{BTreeMap, HashMap};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Writes produced by [`KeyValueStore::update`]. `None` removes the key.
pub type Writes = Vec<(&'static str, Option<String>)>;

pub trait KeyValueStore {
    /// Fetch several keys at once. Every requested key is present in the
    /// result, mapped to `None` when the store has no value for it.
    fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, Option<String>>, StoreError>;

    fn set_many(&self, pairs: &[(&str, String)]) -> Result<(), StoreError>;

    fn remove_many(&self, keys: &[&str]) -> Result<(), StoreError>;

    /// Read `keys`, hand them to `f`, and apply the writes it returns, all in
    /// one step that no other writer can interleave with. Nothing is written
    /// when `f` returns `None`.
    fn update(
        &self,
        keys: &[&str],
        f: &mut dyn FnMut(&HashMap<String, Option<String>>) -> Option<Writes>,
    ) -> Result<(), StoreError>;

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.get_many(&[key])?.remove(key).flatten())
    }
}

fn pick(map: &BTreeMap<String, String>, keys: &[&str]) -> HashMap<String, Option<String>> {
    keys.iter()
        .map(|k| (k.to_string(), map.get(*k).cloned()))
        .collect()
}

fn apply(map: &mut BTreeMap<String, String>, writes: Writes) {
    for (k, v) in writes {
        match v {
            Some(v) => {
                map.insert(k.to_string(), v);
            }
            None => {
                map.remove(k);
            }
        }
    }
}

/// JSON-object file guarded by an exclusive lock file.
pub struct FileStore {
    lock_path: PathBuf,
    data_path: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(lock_path: P, data_path: P) -> Self {
        Self {
            lock_path: lock_path.as_ref().to_path_buf(),
            data_path: data_path.as_ref().to_path_buf(),
        }
    }

    /// Store rooted in `dir`, using `store.lock` and `store.json`.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join("store.lock"), dir.join("store.json"))
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        if !self.data_path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.data_path)?;

        // Handle empty file case
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, map: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(map)?;

        if let Some(parent) = self.data_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write to a sibling temp file and rename so a crash never leaves half a file
        let temp_path = self.data_path.with_extension("tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &self.data_path)?;

        Ok(())
    }

    /// Run `f` over the whole map while holding the lock. The map is written
    /// back only when `f` succeeds and `persist` is set.
    pub fn with_lock<F, R>(&self, persist: bool, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> Result<R, StoreError>,
    {
        self.locked(|map| f(map).map(|out| (out, persist)))
    }

    /// Like [`with_lock`](Self::with_lock), but `f` decides whether the map
    /// is written back.
    fn locked<F, R>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> Result<(R, bool), StoreError>,
    {
        if let Some(parent) = self.lock_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.lock_path)?;

        file.lock_exclusive()
            .map_err(|e| StoreError::Lock(e.to_string()))?;

        let result = self.load().and_then(|mut map| {
            let (out, persist) = f(&mut map)?;
            if persist {
                self.save(&map)?;
            }
            Ok(out)
        });

        file.unlock().map_err(|e| StoreError::Lock(e.to_string()))?;

        result
    }
}

impl KeyValueStore for FileStore {
    fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, Option<String>>, StoreError> {
        debug!("store read {:?} from {}", keys, self.data_path.display());
        self.with_lock(false, |map| Ok(pick(map, keys)))
    }

    fn set_many(&self, pairs: &[(&str, String)]) -> Result<(), StoreError> {
        debug!("store write {} key(s) to {}", pairs.len(), self.data_path.display());
        self.with_lock(true, |map| {
            for (k, v) in pairs {
                map.insert(k.to_string(), v.clone());
            }
            Ok(())
        })
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), StoreError> {
        debug!("store remove {:?} from {}", keys, self.data_path.display());
        self.with_lock(true, |map| {
            for k in keys {
                map.remove(*k);
            }
            Ok(())
        })
    }

    fn update(
        &self,
        keys: &[&str],
        f: &mut dyn FnMut(&HashMap<String, Option<String>>) -> Option<Writes>,
    ) -> Result<(), StoreError> {
        self.locked(|map| match f(&pick(map, keys)) {
            Some(writes) => {
                debug!("store update {} key(s) in {}", writes.len(), self.data_path.display());
                apply(map, writes);
                Ok(((), true))
            }
            None => Ok(((), false)),
        })
    }
}

/// Process-local store, for tests and embedding.
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, StoreError> {
        self.data
            .lock()
            .map_err(|_| StoreError::Lock("memory store mutex poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, Option<String>>, StoreError> {
        Ok(pick(&*self.guard()?, keys))
    }

    fn set_many(&self, pairs: &[(&str, String)]) -> Result<(), StoreError> {
        let mut map = self.guard()?;
        for (k, v) in pairs {
            map.insert(k.to_string(), v.clone());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), StoreError> {
        let mut map = self.guard()?;
        for k in keys {
            map.remove(*k);
        }
        Ok(())
    }

    fn update(
        &self,
        keys: &[&str],
        f: &mut dyn FnMut(&HashMap<String, Option<String>>) -> Option<Writes>,
    ) -> Result<(), StoreError> {
        let mut map = self.guard()?;
        if let Some(writes) = f(&pick(&*map, keys)) {
            apply(&mut *map, writes);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_many_reports_absent_keys() {
        let store = MemoryStore::new();
        store.set_many(&[("a", "1".to_string())]).unwrap();

        let values = store.get_many(&["a", "b"]).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values["a"], Some("1".to_string()));
        assert_eq!(values["b"], None);
    }

    #[test]
    fn test_update_applies_sets_and_removes() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::in_dir(temp.path());
        store.set_many(&[("n", "1".to_string()), ("gone", "x".to_string())]).unwrap();

        store
            .update(&["n"], &mut |values| {
                let n: i64 = values["n"].as_deref()?.parse().ok()?;
                Some(vec![("n", Some((n + 1).to_string())), ("gone", None)])
            })
            .unwrap();

        assert_eq!(store.get("n").unwrap(), Some("2".to_string()));
        assert_eq!(store.get("gone").unwrap(), None);
    }

    #[test]
    fn test_update_without_writes_leaves_store_untouched() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::in_dir(temp.path());

        store.update(&["n"], &mut |_| None).unwrap();
        assert!(!store.data_path().exists());

        let memory = MemoryStore::new();
        memory.update(&["n"], &mut |_| None).unwrap();
        assert_eq!(memory.get("n").unwrap(), None);
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::in_dir(temp.path());

        assert_eq!(store.get("anything").unwrap(), None);
        assert!(!store.data_path().exists());
    }

    #[test]
    fn test_file_store_empty_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::in_dir(temp.path());
        fs::write(store.data_path(), "  \n").unwrap();

        assert_eq!(store.get("anything").unwrap(), None);
    }

    #[test]
    fn test_file_store_persists_and_removes() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::in_dir(temp.path());
        store
            .set_many(&[("x", "10".to_string()), ("y", "20".to_string())])
            .unwrap();
        store.remove_many(&["x"]).unwrap();

        let reopened = FileStore::in_dir(temp.path());
        assert_eq!(reopened.get("x").unwrap(), None);
        assert_eq!(reopened.get("y").unwrap(), Some("20".to_string()));
    }

    #[test]
    fn test_file_store_corrupt_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::in_dir(temp.path());
        fs::write(store.data_path(), "[1, 2").unwrap();

        assert!(matches!(
            store.get_many(&["x"]),
            Err(StoreError::Corrupt(_))
        ));
    }

    #[test]
    fn test_failed_closure_does_not_persist() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::in_dir(temp.path());

        let result: Result<(), StoreError> = store.with_lock(true, |map| {
            map.insert("x".to_string(), "1".to_string());
            Err(StoreError::Lock("abort".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(store.get("x").unwrap(), None);
    }
}
