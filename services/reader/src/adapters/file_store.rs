//! services/reader/src/adapters/file_store.rs
//!
//! This module contains the filesystem adapter, the concrete implementation of
//! the `KeyValueStore` port used by the reader binary. Each key is kept in its
//! own `<key>.json` file under the data directory.

use reading_habit_core::ports::{KeyValueStore, PortError, PortResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A `KeyValueStore` that keeps one JSON file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        debug!("Opened file store at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| match c {
                'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-' | '.' => c,
                _ => '_',
            })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PortError::ReadFailed {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Writes through a temporary file and renames it into place, so a failed
    /// write never leaves a half-written record behind.
    fn set(&self, key: &str, value: &str) -> PortResult<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let write_failed = |e: std::io::Error| PortError::WriteFailed {
            key: key.to_string(),
            reason: e.to_string(),
        };
        fs::write(&tmp, value).map_err(write_failed)?;
        fs::rename(&tmp, &path).map_err(write_failed)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> PortResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PortError::WriteFailed {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}
