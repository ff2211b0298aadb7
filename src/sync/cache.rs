//! On-disk snapshot of the last resolved layout

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use super::protocol::LayoutPayload;

/// Fixed key the snapshot is stored under
pub const STORAGE_KEY: &str = "pyplotdesigner-state";

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid cache contents: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalCache {
    dir: PathBuf,
    autosave: bool,
}

impl LocalCache {
    /// Cache in `dir`, autosave off
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            autosave: false,
        }
    }

    /// `<user cache dir>/plot-designer`, when the platform has one
    pub fn default_dir() -> Option<PathBuf> {
        dirs::cache_dir().map(|dir| dir.join("plot-designer"))
    }

    pub fn with_autosave(mut self, autosave: bool) -> Self {
        self.autosave = autosave;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", STORAGE_KEY))
    }

    pub fn autosave_enabled(&self) -> bool {
        self.autosave
    }

    pub fn set_autosave(&mut self, autosave: bool) {
        self.autosave = autosave;
    }

    pub fn store(&self, payload: &LayoutPayload) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string(payload)?;
        fs::write(self.path(), json)?;
        debug!(path = %self.path().display(), "layout snapshot stored");
        Ok(())
    }

    /// Stored snapshot, `None` when nothing was stored yet
    pub fn load(&self) -> Result<Option<LayoutPayload>, CacheError> {
        let text = match fs::read_to_string(self.path()) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&text)?))
    }

    /// Remove the snapshot; returns whether one existed
    pub fn clear(&self) -> Result<bool, CacheError> {
        match fs::remove_file(self.path()) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
