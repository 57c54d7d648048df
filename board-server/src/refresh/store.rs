//! Persistence of the chosen direction.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::domain::Direction;

/// Error reading or writing the saved direction.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid direction file {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Somewhere to remember the user's direction between runs.
pub trait DirectionStore: Send + Sync {
    /// The saved direction, if one has been saved.
    fn load(&self) -> Result<Option<Direction>, StoreError>;

    fn save(&self, direction: Direction) -> Result<(), StoreError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct SavedDirection {
    direction: Direction,
}

/// Direction saved as a small JSON file.
#[derive(Debug, Clone)]
pub struct FileDirectionStore {
    path: PathBuf,
}

impl FileDirectionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DirectionStore for FileDirectionStore {
    fn load(&self) -> Result<Option<Direction>, StoreError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let saved: SavedDirection =
            serde_json::from_str(&json).map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            })?;
        Ok(Some(saved.direction))
    }

    fn save(&self, direction: Direction) -> Result<(), StoreError> {
        let json = serde_json::to_string(&SavedDirection { direction }).map_err(|source| {
            StoreError::Json {
                path: self.path.clone(),
                source,
            }
        })?;

        std::fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// In-memory store, for tests and for running without a writable disk.
#[derive(Debug, Default)]
pub struct MemoryDirectionStore {
    direction: Mutex<Option<Direction>>,
}

impl MemoryDirectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_direction(direction: Direction) -> Self {
        Self {
            direction: Mutex::new(Some(direction)),
        }
    }
}

impl DirectionStore for MemoryDirectionStore {
    fn load(&self) -> Result<Option<Direction>, StoreError> {
        Ok(*self.direction.lock().unwrap_or_else(|e| e.into_inner()))
    }

    fn save(&self, direction: Direction) -> Result<(), StoreError> {
        *self.direction.lock().unwrap_or_else(|e| e.into_inner()) = Some(direction);
        Ok(())
    }
}
