//! Recently used names, persisted across page loads.
//!
//! The cache keeps at most [`RECENT_NAMES_CAPACITY`] names, most recent first.
//! Adding a name that is already present leaves the list untouched; it is not
//! moved to the front. Digit keys address the slots positionally, so a stable
//! order matters more here than strict LRU.

#[cfg(test)]
#[path = "recent_test.rs"]
mod recent_test;

use std::cell::RefCell;
use std::collections::HashMap;

use crate::consts::RECENT_NAMES_CAPACITY;

/// Errors from the durable key-value store behind the cache.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No store is reachable (e.g. storage disabled in the browser).
    #[error("storage unavailable")]
    Unavailable,

    #[error("storage read failed: {0}")]
    Read(String),

    #[error("storage write failed: {0}")]
    Write(String),

    /// The stored value is not a JSON list of strings.
    #[error("stored names could not be decoded: {0}")]
    Decode(String),
}

/// Durable string key-value store.
pub trait NameStore {
    /// Read the raw value under `key`; `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write the raw value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    fn save(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Ordered most-recent-first list of unique names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentNames {
    names: Vec<String>,
}

impl RecentNames {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a persisted list, dropping duplicates and anything past capacity.
    #[must_use]
    pub fn from_list(list: Vec<String>) -> Self {
        let mut names: Vec<String> = Vec::with_capacity(RECENT_NAMES_CAPACITY);
        for name in list {
            if names.len() == RECENT_NAMES_CAPACITY {
                break;
            }
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Self { names }
    }

    /// Load the list stored under `key`. A missing or unreadable value yields
    /// an empty cache.
    #[must_use]
    pub fn load(store: &dyn NameStore, key: &str) -> Self {
        match Self::try_load(store, key) {
            Ok(names) => names,
            Err(e) => {
                log::warn!("recent names not loaded: {e}");
                Self::new()
            }
        }
    }

    /// Like [`RecentNames::load`] but surfaces store and decode failures.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Decode`] for a malformed value, or the store's own error.
    pub fn try_load(store: &dyn NameStore, key: &str) -> Result<Self, StoreError> {
        let Some(raw) = store.load(key)? else {
            return Ok(Self::new());
        };
        let list: Vec<String> = serde_json::from_str(&raw).map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(Self::from_list(list))
    }

    /// Persist the list under `key` as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the store write fails.
    pub fn save(&self, store: &dyn NameStore, key: &str) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&self.names).map_err(|e| StoreError::Write(e.to_string()))?;
        store.save(key, &raw)
    }

    /// Prepend `name` unless it is already present, evicting the oldest past capacity.
    ///
    /// Returns whether the list changed.
    pub fn add(&mut self, name: &str) -> bool {
        if self.names.iter().any(|n| n == name) {
            return false;
        }
        self.names.insert(0, name.to_owned());
        self.names.truncate(RECENT_NAMES_CAPACITY);
        true
    }

    /// Name in digit slot `slot`.
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&str> {
        self.names.get(slot).map(String::as_str)
    }

    /// Names for display, most recent first.
    #[must_use]
    pub fn list(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// In-process store, for tests and hosts without durable storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl NameStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Browser `localStorage`.
pub struct LocalStore {
    storage: web_sys::Storage,
}

impl LocalStore {
    /// Open the window's `localStorage`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] outside a browser window or when
    /// storage is disabled.
    pub fn open() -> Result<Self, StoreError> {
        let window = web_sys::window().ok_or(StoreError::Unavailable)?;
        let storage = window
            .local_storage()
            .map_err(|e| StoreError::Read(format!("{e:?}")))?
            .ok_or(StoreError::Unavailable)?;
        Ok(Self { storage })
    }
}

impl NameStore for LocalStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage
            .get_item(key)
            .map_err(|e| StoreError::Read(format!("{e:?}")))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StoreError::Write(format!("{e:?}")))
    }
}
