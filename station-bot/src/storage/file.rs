//! JSON file state storage.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::progress::ProgressState;

use super::{StateStorage, StorageError};

/// Stores the snapshot as pretty-printed JSON in a single file.
///
/// A missing file loads as the empty state. Anything else that prevents
/// reading the file is an error, so an unreadable history is never
/// replaced by an empty one.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the state file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    /// Sibling file the snapshot is written to before being moved into place.
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StateStorage for FileStorage {
    async fn load(&self) -> Result<ProgressState, StorageError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no state file yet, starting empty");
                return Ok(ProgressState::empty());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        Ok(serde_json::from_str(&contents)?)
    }

    async fn store(&self, state: &ProgressState) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(state)?;

        // Create parent directories if needed
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, json)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        Ok(())
    }
}
