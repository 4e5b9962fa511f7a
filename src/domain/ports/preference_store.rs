//! Preference Store Port
//!
//! Durable client-side key-value storage.

/// Key of the flag recording that the user refused location access.
pub const PERMISSION_DENIED_KEY: &str = "location_permission_denied";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("preference store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("preference store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Durable string key-value store.
///
/// Values survive page reloads (or process restarts). Implementations may
/// be in-memory for tests.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn clear(&self, key: &str) -> Result<(), StoreError>;

    /// Read a flag stored as `"true"`.
    fn flag(&self, key: &str) -> bool {
        self.get(key).as_deref() == Some("true")
    }
}
