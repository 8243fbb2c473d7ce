//! File-backed key/value storage for the CLI. The whole map lives in one JSON
//! file that is only readable by the current user.

use auth_session::storage::{KeyValueStorage, StorageError};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `session.json` under the platform config directory, falling back to
    /// the working directory when no home directory is known.
    #[must_use]
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "VortixPR", "vortix").map_or_else(
            || PathBuf::from(".vortix").join(SESSION_FILE),
            |dirs| dirs.config_dir().join(SESSION_FILE),
        )
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_raw(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(None),
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::Read(err.to_string())),
        }
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let Some(raw) = self.read_raw()? else {
            return Ok(BTreeMap::new());
        };
        serde_json::from_str(&raw).map_err(|err| {
            StorageError::Read(format!("{} is corrupted: {err}", self.path.display()))
        })
    }

    /// Loads the map for an update. A corrupted file is discarded so the next
    /// write replaces it; the flag is true when that happened.
    fn load_for_update(&self) -> Result<(BTreeMap<String, String>, bool), StorageError> {
        let Some(raw) = self.read_raw()? else {
            return Ok((BTreeMap::new(), false));
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => Ok((entries, false)),
            Err(err) => {
                warn!(path = %self.path.display(), "discarding corrupted session file: {err}");
                Ok((BTreeMap::new(), true))
            }
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                Err(err) => Err(StorageError::Write(err.to_string())),
            };
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| StorageError::Unavailable(err.to_string()))?;
        }
        let serialized = serde_json::to_string_pretty(entries)
            .map_err(|err| StorageError::Write(err.to_string()))?;
        fs::write(&self.path, serialized).map_err(|err| StorageError::Write(err.to_string()))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
                .map_err(|err| StorageError::Write(err.to_string()))?;
        }
        debug!(path = %self.path.display(), "session file written");
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let (mut entries, _) = self.load_for_update()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let (mut entries, discarded) = self.load_for_update()?;
        if entries.remove(key).is_none() && !discarded {
            return Ok(());
        }
        self.save(&entries)
    }
}
