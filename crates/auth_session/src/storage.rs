//! Durable token storage. Platforms provide a [`KeyValueStorage`]; everything
//! that touches the persisted tokens goes through [`TokenStore`] so the pair is
//! written and purged in one place.

use crate::model::TokenPair;
use secrecy::{ExposeSecret, SecretString};
use std::{cell::RefCell, collections::BTreeMap, rc::Rc, sync::Arc};
use thiserror::Error;
use tracing::warn;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read storage: {0}")]
    Read(String),
    #[error("failed to write storage: {0}")]
    Write(String),
}

/// String key/value storage that survives restarts.
pub trait KeyValueStorage {
    /// # Errors
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// # Errors
    /// Returns an error if the value cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a missing key is not an error.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be updated.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Rc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Process-local storage, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Owner of the persisted `access_token`/`refresh_token` pair.
#[derive(Debug)]
pub struct TokenStore<S> {
    storage: S,
}

impl<S: KeyValueStorage> TokenStore<S> {
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// # Errors
    /// Returns an error if storage cannot be read.
    pub fn access_token(&self) -> Result<Option<SecretString>, StorageError> {
        self.read(ACCESS_TOKEN_KEY)
    }

    /// # Errors
    /// Returns an error if storage cannot be read.
    pub fn refresh_token(&self) -> Result<Option<SecretString>, StorageError> {
        self.read(REFRESH_TOKEN_KEY)
    }

    /// Writes both tokens. If either write fails, both keys are purged so the
    /// store never holds half a pair, nor a new access token next to the
    /// refresh token of an earlier session.
    ///
    /// # Errors
    /// Returns the write error.
    pub fn persist(&self, pair: &TokenPair) -> Result<(), StorageError> {
        let written = self
            .storage
            .set(ACCESS_TOKEN_KEY, pair.access.expose_secret())
            .and_then(|()| {
                self.storage
                    .set(REFRESH_TOKEN_KEY, pair.refresh.expose_secret())
            });

        if let Err(err) = written {
            if let Err(rollback) = self.clear() {
                warn!("failed to purge partially written tokens: {rollback}");
            }
            return Err(err);
        }

        Ok(())
    }

    /// Removes both tokens. Both removals are attempted even if the first one
    /// fails.
    ///
    /// # Errors
    /// Returns the first removal error.
    pub fn clear(&self) -> Result<(), StorageError> {
        let access = self.storage.remove(ACCESS_TOKEN_KEY);
        let refresh = self.storage.remove(REFRESH_TOKEN_KEY);
        access.and(refresh)
    }

    fn read(&self, key: &str) -> Result<Option<SecretString>, StorageError> {
        Ok(self
            .storage
            .get(key)?
            .filter(|value| !value.is_empty())
            .map(SecretString::from))
    }
}
