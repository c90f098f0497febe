//! Progress persistence
//!
//! The engine only sees [`ProgressStore`]: loading never fails (a missing or
//! unreadable record means a fresh player) and saving is fire-and-forget.
//! [`JsonFileStore`] logs what goes wrong and carries on.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::progress::PlayerProgress;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("cannot access progress file `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed progress file `{}`: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where player progress lives between runs
pub trait ProgressStore {
    fn load(&mut self) -> PlayerProgress;
    fn save(&mut self, progress: &PlayerProgress);
}

impl<S: ProgressStore + ?Sized> ProgressStore for &mut S {
    fn load(&mut self) -> PlayerProgress {
        (**self).load()
    }

    fn save(&mut self, progress: &PlayerProgress) {
        (**self).save(progress)
    }
}

/// In-memory store (tests, demo runs)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    record: Option<PlayerProgress>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress(progress: PlayerProgress) -> Self {
        Self {
            record: Some(progress),
            saves: 0,
        }
    }

    /// Last saved (or seeded) record
    pub fn record(&self) -> Option<&PlayerProgress> {
        self.record.as_ref()
    }

    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl ProgressStore for MemoryStore {
    fn load(&mut self) -> PlayerProgress {
        self.record.clone().unwrap_or_default()
    }

    fn save(&mut self, progress: &PlayerProgress) {
        self.record = Some(progress.clone());
        self.saves += 1;
    }
}

/// One JSON document on disk, overwritten on every save
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the record. `Ok(None)` when the file does not exist yet.
    pub fn try_load(&self) -> Result<Option<PlayerProgress>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            })
    }

    pub fn try_save(&self, progress: &PlayerProgress) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(progress).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        fs::write(&self.path, json).map_err(io_err)
    }
}

impl ProgressStore for JsonFileStore {
    fn load(&mut self) -> PlayerProgress {
        match self.try_load() {
            Ok(Some(progress)) => progress,
            Ok(None) => {
                log::info!(
                    "no progress file at {}, starting fresh",
                    self.path.display()
                );
                PlayerProgress::default()
            }
            Err(e) => {
                log::warn!("{e}; starting with fresh progress");
                PlayerProgress::default()
            }
        }
    }

    fn save(&mut self, progress: &PlayerProgress) {
        if let Err(e) = self.try_save(progress) {
            log::warn!("{e}; progress not saved");
        }
    }
}
