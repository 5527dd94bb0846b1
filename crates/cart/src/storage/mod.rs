//! Durable key-value backends for the cart.
//!
//! The interface mirrors a browser's local storage: string keys, string
//! values, synchronous reads and writes. Backends report failures, and the
//! cart store decides how to degrade.

mod file;

use std::collections::HashMap;

use thiserror::Error;

pub use file::FileStorage;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend cannot be used in this context.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The key cannot be mapped onto the backing medium.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// A synchronous string key-value store.
pub trait CartStorage {
    /// Read the value stored under `key`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value stored under `key`. Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: CartStorage + ?Sized> CartStorage for &mut S {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).save(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<S: CartStorage + ?Sized> CartStorage for Box<S> {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).save(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// In-process storage.
///
/// Used for tests and to stage values that live in some other per-user
/// container, such as an HTTP session.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-loaded with one entry, if `value` is present.
    #[must_use]
    pub fn with_entry(key: &str, value: Option<String>) -> Self {
        let mut storage = Self::new();
        if let Some(value) = value {
            storage.entries.insert(key.to_owned(), value);
        }
        storage
    }

    /// Current value under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Take the value under `key` out of the storage.
    pub fn take(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Storage for contexts with no durable store: nothing is ever read back and
/// writes are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStorage;

impl CartStorage for NoopStorage {
    fn load(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn save(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Ok(())
    }

    fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }
}
