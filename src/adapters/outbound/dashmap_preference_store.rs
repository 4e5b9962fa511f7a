//! DashMap Preference Store
//!
//! Implements PreferenceStore in memory using DashMap. Values live for the
//! lifetime of the process.

use crate::domain::ports::{PreferenceStore, StoreError};
use dashmap::DashMap;

/// In-memory preference store.
#[derive(Debug, Default)]
pub struct DashMapPreferenceStore {
    values: DashMap<String, String>,
}

impl DashMapPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PreferenceStore for DashMapPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).map(|e| e.value().clone())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);
        Ok(())
    }
}
