use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Clip not found: {0}")]
    ClipNotFound(String),

    #[error("Speaker not found: {0}")]
    SpeakerNotFound(String),

    #[error("Duplicate clip id: {0}")]
    DuplicateClipId(String),

    #[error("Duplicate speaker: {0}")]
    DuplicateSpeaker(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Update rejected: {0}")]
    Rejected(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
