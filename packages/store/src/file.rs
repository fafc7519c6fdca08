//! JSON file backed store
//!
//! All components live in one pretty-printed JSON object keyed by id. Every
//! operation reads the file, so edits made by another process are seen.

use crate::error::{StoreError, StoreResult};
use crate::{new_id, ComponentStore};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Default location of the component file
pub const DEFAULT_STORE_PATH: &str = ".components.json";

type Components = BTreeMap<String, String>;

pub struct FileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StoreResult<Components> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(Components::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Components::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, components: &Components) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(components)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // write then rename so readers never see a partial file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        tracing::debug!(path = %self.path.display(), count = components.len(), "saved components");
        Ok(())
    }
}

impl ComponentStore for FileStore {
    fn create(&self, value: &str) -> StoreResult<String> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut components = self.load()?;
        let id = new_id();
        components.insert(id.clone(), value.to_string());
        self.save(&components)?;
        Ok(id)
    }

    fn read(&self, id: &str) -> StoreResult<Option<String>> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(self.load()?.remove(id))
    }

    fn update(&self, id: &str, value: &str) -> StoreResult<()> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut components = self.load()?;
        match components.get_mut(id) {
            Some(stored) => *stored = value.to_string(),
            None => return Err(StoreError::NotFound(id.to_string())),
        }
        self.save(&components)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("components.json"));

        assert_eq!(store.read("nope").unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_persists_pretty_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("components.json");
        let store = FileStore::new(&path);

        let id = store.create("<div/>").unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains(&format!("  \"{}\": \"<div/>\"", id)));

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.read(&id).unwrap().as_deref(), Some("<div/>"));
    }

    #[test]
    fn test_update_unknown_leaves_file() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("components.json"));
        store.create("<a/>").unwrap();

        assert!(store.update("unknown-id", "x").unwrap_err().is_not_found());
        assert_eq!(store.read("unknown-id").unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("components.json");
        fs::write(&path, "{ not json").unwrap();

        let err = FileStore::new(&path).read("x").unwrap_err();
        assert!(matches!(err, StoreError::Serde(_)));
    }
}
