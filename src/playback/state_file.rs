//! The single persisted playback record.
//!
//! One JSON file, overwritten whole on every capture and read once per page
//! load. There is no history and no locking; the last write wins.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::platform;
use crate::types::errors::StateFileError;

pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Record stored under the platform data directory.
    pub fn in_data_dir(file_name: &str) -> Self {
        Self::new(platform::get_data_dir().join(file_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Returns the raw record, or `None` if nothing has been captured yet.
    pub fn read(&self) -> Result<Option<String>, StateFileError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StateFileError::IoError(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    /// Overwrites the record with `contents` verbatim.
    pub fn write_raw(&self, contents: &str) -> Result<(), StateFileError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StateFileError::IoError(format!("Failed to create data directory: {}", e))
            })?;
        }

        fs::write(&self.path, contents).map_err(|e| {
            StateFileError::IoError(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }

    /// Overwrites the record with the compact JSON encoding of `record`.
    pub fn write_record(&self, record: &Map<String, Value>) -> Result<(), StateFileError> {
        let json = serde_json::to_string(record)
            .map_err(|e| StateFileError::SerializationError(e.to_string()))?;
        self.write_raw(&json)
    }
}
