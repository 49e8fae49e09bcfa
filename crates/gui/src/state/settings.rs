//! Editor settings

use serde::{Deserialize, Serialize};
use shared::Georeference;

use crate::scene::Rgb;

/// Drawing and picking tolerances
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawingSettings {
    /// Minimum distance between any two vertices, in scene units
    pub proximity_threshold: f64,
    /// Pointer travel before a press on a vertex becomes a drag
    pub drag_threshold_px: f64,
    /// Pick radius in pixels
    pub pick_radius_px: f64,
    /// Remove zero-vertex trails from the store instead of keeping them
    pub prune_empty_trails: bool,
}

impl Default for DrawingSettings {
    fn default() -> Self {
        Self {
            proximity_threshold: 0.3,
            drag_threshold_px: 5.0,
            pick_radius_px: 8.0,
            prune_empty_trails: false,
        }
    }
}

/// Colors by line state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Palette {
    pub line_default: Rgb,
    pub line_hovered: Rgb,
    pub line_selected: Rgb,
    pub line_submitted: Rgb,
    pub line_pending: Rgb,
    pub line_moving: Rgb,
    /// Segment chosen for insertion
    pub line_armed: Rgb,
    pub point: Rgb,
    pub point_pending: Rgb,
    pub label: Rgb,
    pub total_label: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            line_default: [255, 215, 0],
            line_hovered: [255, 140, 0],
            line_selected: [0, 220, 255],
            line_submitted: [60, 200, 90],
            line_pending: [200, 200, 200],
            line_moving: [255, 80, 200],
            line_armed: [255, 60, 60],
            point: [255, 255, 255],
            point_pending: [180, 180, 180],
            label: [235, 235, 235],
            total_label: [255, 255, 160],
        }
    }
}

/// Backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionSettings {
    /// Base URL of the logging backend
    pub endpoint: String,
    pub table: String,
    /// Table that receives removal notices
    pub removal_table: String,
    /// E-mail sent along with each submission
    #[serde(default)]
    pub submitter_id: Option<String>,
    /// Ask before sending
    pub confirm: bool,
}

impl Default for SubmissionSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3001".to_string(),
            table: shared::TRAILS_TABLE.to_string(),
            removal_table: shared::TRAILS_REMOVED_TABLE.to_string(),
            submitter_id: None,
            confirm: true,
        }
    }
}

/// All editor settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditorSettings {
    #[serde(default)]
    pub drawing: DrawingSettings,
    #[serde(default)]
    pub palette: Palette,
    #[serde(default)]
    pub submission: SubmissionSettings,
    /// How scene positions map to longitude / latitude / height
    #[serde(default)]
    pub georeference: Georeference,
}

impl EditorSettings {
    fn config_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("com", "trailmark", "trailmark")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            if let Ok(json) = std::fs::read_to_string(&path) {
                match serde_json::from_str(&json) {
                    Ok(settings) => return settings,
                    Err(e) => tracing::warn!("invalid settings at {}: {e}", path.display()),
                }
            }
        }
        Self::default()
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Some(dir) = path.parent() {
                if std::fs::create_dir_all(dir).is_ok() {
                    if let Ok(json) = serde_json::to_string_pretty(self) {
                        if let Err(e) = std::fs::write(&path, json) {
                            tracing::warn!("could not save settings: {e}");
                        }
                    }
                }
            }
        }
    }
}
