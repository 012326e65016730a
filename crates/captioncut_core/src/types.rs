use crate::settings::EditorSettings;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Word
// ---------------------------------------------------------------------------

/// One recognized word inside a clip. Times are seconds from the start of
/// the source video.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Word {
    pub id: String,
    pub text: String,
    pub start: f64,
    pub end: f64,
    #[serde(default = "default_editable")]
    pub is_editable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

fn default_editable() -> bool {
    true
}

impl Word {
    pub fn new(id: impl Into<String>, text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            start,
            end,
            is_editable: true,
            confidence: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Clip
// ---------------------------------------------------------------------------

/// One subtitle segment.
///
/// `timeline` is the 1-based display label. It is derived from the clip's
/// position and is rewritten whenever the sequence changes shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Clip {
    pub id: String,
    pub timeline: String,
    #[serde(default)]
    pub speaker: String,
    pub subtitle: String,
    #[serde(default)]
    pub full_text: String,
    #[serde(default)]
    pub words: Vec<Word>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
}

impl Clip {
    /// Build a clip whose subtitle and full text are the space-joined word texts.
    pub fn from_words(id: impl Into<String>, speaker: impl Into<String>, words: Vec<Word>) -> Self {
        let text = join_word_text(&words);
        Self {
            id: id.into(),
            timeline: String::new(),
            speaker: speaker.into(),
            subtitle: text.clone(),
            full_text: text,
            start_time: words.first().map(|w| w.start),
            end_time: words.last().map(|w| w.end),
            words,
        }
    }

    /// Seconds between the first word's start and the last word's end.
    pub fn duration(&self) -> f64 {
        match (self.words.first(), self.words.last()) {
            (Some(first), Some(last)) => (last.end - first.start).max(0.0),
            _ => 0.0,
        }
    }

    pub fn has_speaker(&self) -> bool {
        !self.speaker.is_empty()
    }
}

pub(crate) fn join_word_text(words: &[Word]) -> String {
    words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub clips: Vec<Clip>,
    #[serde(default)]
    pub speakers: Vec<String>,
    #[serde(default)]
    pub settings: EditorSettings,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
