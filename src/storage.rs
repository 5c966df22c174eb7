//! This module provides the key-value storages the records are persisted to

use std::collections::HashMap;
use std::error::Error;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::collection::Collection;
use crate::traits::{Record, Storage};


/// A storage that lives in memory only, and is lost at the end of the session
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Box<dyn Error>> {
        self.values.remove(key);
        Ok(())
    }
}


/// A storage that keeps every key in its own file, inside a folder
#[derive(Clone, Debug, PartialEq)]
pub struct FolderStorage {
    folder: PathBuf,
}

impl FolderStorage {
    /// The folder used when nothing else is specified
    pub fn default_folder() -> PathBuf {
        let home = std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        home.join(".config").join("crm-desk")
    }

    /// Use a folder as storage. It will be created on the first write if it does not exist yet.
    pub fn new(folder: &Path) -> Self {
        Self { folder: PathBuf::from(folder) }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name = format!("{}.json", sanitize_filename::sanitize(key));
        self.folder.join(file_name)
    }
}

impl Storage for FolderStorage {
    fn get(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(format!("Unable to read file {:?}: {}", path, err).into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        std::fs::create_dir_all(&self.folder)?;
        let path = self.path_for(key);
        std::fs::write(&path, value)
            .map_err(|err| format!("Unable to save file {:?}: {}", path, err).into())
    }

    fn remove(&mut self, key: &str) -> Result<(), Box<dyn Error>> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Err(err) if err.kind() != ErrorKind::NotFound => {
                Err(format!("Unable to remove file {:?}: {}", path, err).into())
            },
            _ => Ok(()),
        }
    }
}


/// Read a collection from a storage.
///
/// An absent or malformed value is not an error: an empty collection is returned instead.
pub fn load_records<T, S>(storage: &S, key: &str) -> Collection<T>
where
    T: Record + DeserializeOwned,
    S: Storage + ?Sized,
{
    let blob = match storage.get(key) {
        Err(err) => {
            log::warn!("Unable to read {}: {}. Starting with no records", key, err);
            return Collection::new();
        },
        Ok(None) => {
            log::debug!("Nothing stored under {} yet", key);
            return Collection::new();
        },
        Ok(Some(blob)) => blob,
    };

    match serde_json::from_str(&blob) {
        Ok(records) => records,
        Err(err) => {
            log::warn!("Invalid content stored under {}: {}. Discarding it", key, err);
            Collection::new()
        },
    }
}

/// Overwrite the stored value of a collection.
///
/// Failures are logged, they do not prevent the in-memory state from being used.
pub fn save_records<T, S>(storage: &mut S, key: &str, records: &Collection<T>)
where
    T: Record + Serialize,
    S: Storage + ?Sized,
{
    let blob = match serde_json::to_string(records) {
        Err(err) => {
            log::warn!("Unable to serialize {}: {}", key, err);
            return;
        },
        Ok(blob) => blob,
    };

    if let Err(err) = storage.set(key, &blob) {
        log::warn!("Unable to save {}: {}", key, err);
    }
}
