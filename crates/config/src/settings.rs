// Application settings
// Loaded from ~/.config/formgrid/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Grid limits
    #[serde(rename = "grid.maxRows")]
    pub max_rows: usize,

    #[serde(rename = "grid.maxColumns")]
    pub max_cols: usize,

    // New sheets start at this size and grow toward the limits above
    #[serde(rename = "grid.initialRows")]
    pub initial_rows: usize,

    #[serde(rename = "grid.initialColumns")]
    pub initial_cols: usize,

    // Grid appearance
    #[serde(rename = "grid.defaultColumnWidth")]
    pub default_col_width: f32,

    #[serde(rename = "grid.defaultRowHeight")]
    pub default_row_height: f32,

    #[serde(rename = "grid.minColumnWidth")]
    pub min_col_width: f32,

    #[serde(rename = "grid.minRowHeight")]
    pub min_row_height: f32,

    #[serde(rename = "grid.autofitPadding")]
    pub autofit_padding: f32,

    // Behavior
    /// Whether paste skips locked destination cells. The direct edit
    /// path always refuses locked cells; paste is configurable.
    #[serde(rename = "edit.pasteRespectsLocks")]
    pub paste_respects_locks: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_rows: 1_000_000,
            max_cols: 16_384,
            initial_rows: 100,
            initial_cols: 26,
            default_col_width: 100.0,
            default_row_height: 25.0,
            min_col_width: 40.0,
            min_row_height: 20.0,
            autofit_padding: 16.0,
            paste_respects_locks: false,
        }
    }
}

impl Settings {
    /// Path to the settings file (~/.config/formgrid/settings.json)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("formgrid").join("settings.json"))
    }

    /// Load settings from disk, falling back to defaults on any failure.
    /// Unknown or missing fields are tolerated (serde(default)).
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    pub fn load_from(path: &std::path::Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Save settings to disk, creating the config directory if needed.
    pub fn save(&self) -> Result<(), String> {
        let path = Self::config_path().ok_or("no config directory")?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| e.to_string())
    }
}
