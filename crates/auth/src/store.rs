use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};

use crate::error::Result;

/// Keys the console persists.
pub mod keys {
    pub const TOKEN: &str = "token";
    pub const USER: &str = "user";
    pub const RECOVER_EMAIL: &str = "recover_email";
    pub const RECOVER_OTP: &str = "recover_otp";
    pub const NEED_AUTH: &str = "need_auth";

    pub const ALL: [&str; 5] = [TOKEN, USER, RECOVER_EMAIL, RECOVER_OTP, NEED_AUTH];
}

/// Flat string key/value persistence, one namespace per store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    /// Drop every key in the namespace.
    fn clear(&self) -> Result<()>;
}

// ── In-memory implementation ─────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.entries().clear();
        Ok(())
    }
}

// ── JSON file-backed implementation ──────────────────────────────────────────

/// Stores all keys as one JSON object in a file.
///
/// Every operation re-reads the file, so several processes sharing a path
/// see each other's writes (last writer wins).
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<BTreeMap<String, String>> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            if data.trim().is_empty() {
                return Ok(BTreeMap::new());
            }
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(BTreeMap::new())
        }
    }

    fn write_file(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, data)?;
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read_file()?;
        f(&mut entries);
        self.write_file(&entries)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_file()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.update(|entries| {
            entries.remove(key);
        })
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn exercise(store: &dyn KeyValueStore) {
        assert!(store.get(keys::TOKEN).unwrap().is_none());

        store.set(keys::TOKEN, "abc123").unwrap();
        store.set(keys::RECOVER_EMAIL, "a@b.com").unwrap();
        assert_eq!(store.get(keys::TOKEN).unwrap().as_deref(), Some("abc123"));

        store.set(keys::TOKEN, "def456").unwrap();
        assert_eq!(store.get(keys::TOKEN).unwrap().as_deref(), Some("def456"));

        store.remove(keys::TOKEN).unwrap();
        assert!(store.get(keys::TOKEN).unwrap().is_none());
        assert_eq!(
            store.get(keys::RECOVER_EMAIL).unwrap().as_deref(),
            Some("a@b.com")
        );

        store.clear().unwrap();
        for key in keys::ALL {
            assert!(store.get(key).unwrap().is_none(), "{key} survived clear");
        }
    }

    #[test]
    fn memory_store_crud() {
        exercise(&MemoryStore::new());
    }

    #[test]
    fn json_file_store_crud() {
        let dir = tempfile::tempdir().unwrap();
        exercise(&JsonFileStore::new(dir.path().join("nested").join("session.json")));
    }

    #[test]
    fn json_file_store_is_shared_through_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        JsonFileStore::new(path.clone()).set(keys::USER, "{\"id\":1}").unwrap();

        let reopened = JsonFileStore::new(path);
        assert_eq!(reopened.get(keys::USER).unwrap().as_deref(), Some("{\"id\":1}"));
    }

    #[test]
    fn json_file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();
        assert!(JsonFileStore::new(path).get(keys::TOKEN).is_err());
    }

    #[test]
    fn clearing_a_missing_file_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        JsonFileStore::new(dir.path().join("absent.json")).clear().unwrap();
    }
}
