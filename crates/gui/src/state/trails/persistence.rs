//! Autosave/load of trails and submitted fingerprints

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::TrailStore;
use crate::error::PersistenceError;

/// Everything needed to resume an editing session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrailSnapshot {
    pub store: TrailStore,
    /// Fingerprints of trails accepted by the backend
    #[serde(default)]
    pub submitted: Vec<String>,
}

impl TrailSnapshot {
    /// Get autosave file path
    pub fn autosave_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "trailmark", "trailmark")
            .map(|dirs| dirs.data_dir().join("trails.json"))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PersistenceError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from(path: &Path) -> Result<Self, PersistenceError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Save to the platform data dir
    pub fn autosave(&self) -> Result<(), PersistenceError> {
        let path = Self::autosave_path().ok_or(PersistenceError::NoDataDir)?;
        self.save_to(&path)
    }

    /// Load from the platform data dir, `None` if absent or unreadable
    pub fn load_autosave() -> Option<Self> {
        let path = Self::autosave_path()?;
        if !path.exists() {
            return None;
        }
        match Self::load_from(&path) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!("ignoring autosave at {}: {e}", path.display());
                None
            }
        }
    }
}
