use crate::editing;
use crate::error::{CoreError, Result};
use crate::settings::EditorSettings;
use crate::types::*;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const PROJECT_EXTENSION: &str = "captioncut";

impl Project {
    /// Create a new project with no clips.
    pub fn new(name: impl Into<String>, settings: EditorSettings) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            clips: vec![],
            speakers: vec![],
            settings,
        }
    }

    /// Save project to a file as pretty-printed JSON.
    /// Appends the `.captioncut` extension if not present.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = ensure_extension(path.as_ref());
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        tracing::info!(path = %path.display(), clips = self.clips.len(), "project saved");
        Ok(path)
    }

    /// Load a project from a JSON file. Clip ids must be unique.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let project: Project = serde_json::from_str(&data)?;
        if let Some(dup) = editing::first_duplicate_id(&project.clips) {
            return Err(CoreError::DuplicateClipId(dup.to_string()));
        }
        Ok(project)
    }
}

fn ensure_extension(path: &Path) -> PathBuf {
    if path.extension().and_then(|e| e.to_str()) == Some(PROJECT_EXTENSION) {
        path.to_path_buf()
    } else {
        let mut p = path.to_path_buf();
        let mut name = p.file_name().unwrap_or_default().to_os_string();
        name.push(".");
        name.push(PROJECT_EXTENSION);
        p.set_file_name(name);
        p
    }
}
