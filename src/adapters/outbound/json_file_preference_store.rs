//! JSON File Preference Store
//!
//! Implements PreferenceStore as a flat JSON object on disk so values
//! survive restarts. The whole file is rewritten on every mutation using
//! write-then-rename.

use crate::domain::ports::{PreferenceStore, StoreError};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Durable preference store backed by a JSON file.
pub struct JsonFilePreferenceStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl JsonFilePreferenceStore {
    /// Open the store, loading existing values if the file exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!(
            "preference store opened at {} ({} entries)",
            path.display(),
            values.len()
        );

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let data = serde_json::to_vec_pretty(values)?;
        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        let mut file = File::create(&tmp_path)?;
        file.write_all(&data)?;
        file.sync_all()?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock();
        values.insert(key.to_string(), value.to_string());
        self.persist(&values)
    }

    fn clear(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock();
        if values.remove(key).is_some() {
            self.persist(&values)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::domain::ports::PERMISSION_DENIED_KEY;

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFilePreferenceStore::open(dir.path().join("prefs.json")).unwrap();
        assert!(store.get(PERMISSION_DENIED_KEY).is_none());
        // Nothing is written until the first mutation
        assert!(!store.path().exists());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        {
            let store = JsonFilePreferenceStore::open(&path).unwrap();
            store.set(PERMISSION_DENIED_KEY, "true").unwrap();
        }

        let reopened = JsonFilePreferenceStore::open(&path).unwrap();
        assert!(reopened.flag(PERMISSION_DENIED_KEY));

        let on_disk: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk[PERMISSION_DENIED_KEY], "true");
    }

    #[test]
    fn test_clear_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let store = JsonFilePreferenceStore::open(&path).unwrap();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.clear("a").unwrap();

        let reopened = JsonFilePreferenceStore::open(&path).unwrap();
        assert!(reopened.get("a").is_none());
        assert_eq!(reopened.get("b").as_deref(), Some("2"));
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/prefs.json");

        let store = JsonFilePreferenceStore::open(&path).unwrap();
        store.set("k", "v").unwrap();
        assert!(path.exists());
        assert!(!dir.path().join("nested/deeper/prefs.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{not json").unwrap();

        let result = JsonFilePreferenceStore::open(&path);
        assert!(matches!(result, Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_empty_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "").unwrap();

        let store = JsonFilePreferenceStore::open(&path).unwrap();
        assert!(store.get("anything").is_none());
    }
}
