use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// HistorySettings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HistorySettings {
    /// Maximum number of undoable entries kept.
    pub max_size: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self { max_size: 50 }
    }
}

// ---------------------------------------------------------------------------
// DragSettings
// ---------------------------------------------------------------------------

/// Activation constraints for clip drag gestures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DragSettings {
    /// Mouse travel (px) before a press becomes a drag.
    pub mouse_distance_px: f32,
    /// Touch hold time (ms) before a press becomes a drag.
    pub touch_delay_ms: u64,
    /// Touch travel (px) allowed while holding.
    pub touch_tolerance_px: f32,
}

impl Default for DragSettings {
    fn default() -> Self {
        Self {
            mouse_distance_px: 15.0,
            touch_delay_ms: 250,
            touch_tolerance_px: 5.0,
        }
    }
}

// ---------------------------------------------------------------------------
// EditorSettings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorSettings {
    pub history: HistorySettings,
    pub drag: DragSettings,
}

impl EditorSettings {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let settings: EditorSettings = serde_json::from_str(&data)?;
        Ok(settings)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
