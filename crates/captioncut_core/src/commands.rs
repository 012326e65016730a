//! Command variants recorded in [`History`](crate::history::History).
//!
//! Each command copies the state it will replace at construction time and
//! never reads the live store on undo.

use crate::editing;
use crate::error::Result;
use crate::history::Command;
use crate::ids;
use crate::store::EditorPort;
use crate::types::*;
use std::collections::HashSet;

fn set_clips(port: &mut dyn EditorPort, clips: Vec<Clip>, module: &str) -> Result<()> {
    port.set_clips(clips).inspect_err(|e| {
        tracing::error!(module, error = %e, "clip update failed");
    })
}

fn set_speakers(port: &mut dyn EditorPort, speakers: Vec<String>, module: &str) -> Result<()> {
    port.set_speakers(speakers).inspect_err(|e| {
        tracing::error!(module, error = %e, "speaker update failed");
    })
}

/// Apply a speaker list and a clip sequence together. When the clip update is
/// rejected the speaker list is put back so callers never observe half an edit.
fn set_speakers_and_clips(
    port: &mut dyn EditorPort,
    speakers: Vec<String>,
    clips: Vec<Clip>,
    module: &str,
) -> Result<()> {
    let previous = port.speakers().to_vec();
    let speakers_changed = previous != speakers;
    if speakers_changed {
        set_speakers(port, speakers, module)?;
    }
    if let Err(e) = set_clips(port, clips, module) {
        if speakers_changed {
            if let Err(rollback) = port.set_speakers(previous) {
                tracing::warn!(module, error = %rollback, "speaker rollback failed");
            }
        }
        return Err(e);
    }
    Ok(())
}

fn subtitle_or_fallback(clips: &[Clip], clip_id: &str) -> String {
    editing::find_clip(clips, clip_id)
        .map(|c| c.subtitle.clone())
        .unwrap_or_else(|| "clip".to_string())
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

// ---------------------------------------------------------------------------
// DeleteClipCommand
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct DeleteClipCommand {
    original: Vec<Clip>,
    clip_id: String,
    description: String,
}

impl DeleteClipCommand {
    pub fn new(clips: &[Clip], clip_id: impl Into<String>) -> Self {
        let clip_id = clip_id.into();
        let description = format!("Delete clip: \"{}\"", subtitle_or_fallback(clips, &clip_id));
        Self {
            original: clips.to_vec(),
            clip_id,
            description,
        }
    }
}

impl Command for DeleteClipCommand {
    fn execute(&self, port: &mut dyn EditorPort) -> Result<()> {
        let updated = editing::remove_clip(&self.original, &self.clip_id);
        set_clips(port, updated, "delete_clip")
    }

    fn undo(&self, port: &mut dyn EditorPort) -> Result<()> {
        set_clips(port, self.original.clone(), "delete_clip")
    }

    fn description(&self) -> &str {
        &self.description
    }
}

// ---------------------------------------------------------------------------
// RemoveSpeakerCommand
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct RemoveSpeakerCommand {
    previous_clips: Vec<Clip>,
    previous_speakers: Vec<String>,
    speaker: String,
    description: String,
}

impl RemoveSpeakerCommand {
    pub fn new(clips: &[Clip], speakers: &[String], speaker: impl Into<String>) -> Self {
        let speaker = speaker.into();
        Self {
            previous_clips: clips.to_vec(),
            previous_speakers: speakers.to_vec(),
            description: format!("Remove speaker: {}", speaker),
            speaker,
        }
    }
}

impl Command for RemoveSpeakerCommand {
    fn execute(&self, port: &mut dyn EditorPort) -> Result<()> {
        let speakers = self
            .previous_speakers
            .iter()
            .filter(|s| **s != self.speaker)
            .cloned()
            .collect();
        let clips = editing::clear_speaker(&self.previous_clips, &self.speaker);
        set_speakers_and_clips(port, speakers, clips, "remove_speaker")
    }

    fn undo(&self, port: &mut dyn EditorPort) -> Result<()> {
        set_speakers_and_clips(
            port,
            self.previous_speakers.clone(),
            self.previous_clips.clone(),
            "remove_speaker",
        )
    }

    fn description(&self) -> &str {
        &self.description
    }
}

// ---------------------------------------------------------------------------
// CopyClipsCommand
// ---------------------------------------------------------------------------

/// Copies clips to the clipboard. The clip sequence is never touched, so
/// `undo` has nothing to revert.
#[derive(Debug)]
pub struct CopyClipsCommand {
    to_copy: Vec<Clip>,
    existing_ids: HashSet<String>,
    description: String,
}

impl CopyClipsCommand {
    pub fn new(clips: &[Clip], clip_ids: &[String]) -> Self {
        let wanted: HashSet<&str> = clip_ids.iter().map(String::as_str).collect();
        let to_copy: Vec<Clip> = clips
            .iter()
            .filter(|c| wanted.contains(c.id.as_str()))
            .cloned()
            .collect();
        let n = to_copy.len();
        Self {
            to_copy,
            existing_ids: clips.iter().map(|c| c.id.clone()).collect(),
            description: format!("Copy {} clip{}", n, plural(n)),
        }
    }

    pub fn len(&self) -> usize {
        self.to_copy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_copy.is_empty()
    }
}

impl Command for CopyClipsCommand {
    fn execute(&self, port: &mut dyn EditorPort) -> Result<()> {
        let mut taken = self.existing_ids.clone();
        let mut fresh_ids = Vec::with_capacity(self.to_copy.len());
        for clip in &self.to_copy {
            let id = ids::derived_id(&clip.id, "copy", &taken);
            taken.insert(id.clone());
            fresh_ids.push(id);
        }

        let copies = self
            .to_copy
            .iter()
            .zip(fresh_ids)
            .map(|(clip, id)| Clip {
                id,
                ..clip.clone()
            })
            .collect();

        port.set_clipboard(copies).inspect_err(|e| {
            tracing::error!(module = "copy_clips", error = %e, "clipboard update failed");
        })
    }

    fn undo(&self, _port: &mut dyn EditorPort) -> Result<()> {
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }
}

// ---------------------------------------------------------------------------
// PasteClipsCommand
// ---------------------------------------------------------------------------

/// Appends clipboard clips under fresh ids. Ids are assigned on construction
/// so a redo re-inserts the same clips.
#[derive(Debug)]
pub struct PasteClipsCommand {
    original: Vec<Clip>,
    pasted: Vec<Clip>,
    description: String,
}

impl PasteClipsCommand {
    pub fn new(clips: &[Clip], clipboard: &[Clip]) -> Self {
        let mut taken: HashSet<String> = clips.iter().map(|c| c.id.clone()).collect();
        let pasted = clipboard
            .iter()
            .map(|clip| {
                let id = ids::derived_id(&clip.id, "paste", &taken);
                taken.insert(id.clone());
                Clip {
                    id,
                    ..clip.clone()
                }
            })
            .collect::<Vec<_>>();
        let n = pasted.len();
        Self {
            original: clips.to_vec(),
            pasted,
            description: format!("Paste {} clip{}", n, plural(n)),
        }
    }

    pub fn pasted_ids(&self) -> Vec<&str> {
        self.pasted.iter().map(|c| c.id.as_str()).collect()
    }
}

impl Command for PasteClipsCommand {
    fn execute(&self, port: &mut dyn EditorPort) -> Result<()> {
        if self.pasted.is_empty() {
            return Ok(());
        }
        let updated = editing::append_clips(&self.original, &self.pasted);
        set_clips(port, updated, "paste_clips")
    }

    fn undo(&self, port: &mut dyn EditorPort) -> Result<()> {
        set_clips(port, self.original.clone(), "paste_clips")
    }

    fn description(&self) -> &str {
        &self.description
    }
}

// ---------------------------------------------------------------------------
// ChangeSpeakerCommand / BatchChangeSpeakerCommand
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ChangeSpeakerCommand {
    previous_clips: Vec<Clip>,
    previous_speakers: Vec<String>,
    clip_ids: Vec<String>,
    speaker: String,
    description: String,
}

impl ChangeSpeakerCommand {
    /// Attribute one clip to `speaker`.
    pub fn new(
        clips: &[Clip],
        speakers: &[String],
        clip_id: impl Into<String>,
        speaker: impl Into<String>,
    ) -> Self {
        let clip_id = clip_id.into();
        let speaker = speaker.into();
        let previous = editing::find_clip(clips, &clip_id)
            .map(|c| c.speaker.clone())
            .unwrap_or_default();
        Self {
            previous_clips: clips.to_vec(),
            previous_speakers: speakers.to_vec(),
            description: format!("Change speaker from {} to {}", previous, speaker),
            clip_ids: vec![clip_id],
            speaker,
        }
    }

    /// Attribute every clip in `clip_ids` to `speaker`.
    pub fn batch(
        clips: &[Clip],
        speakers: &[String],
        clip_ids: &[String],
        speaker: impl Into<String>,
    ) -> Self {
        let speaker = speaker.into();
        Self {
            previous_clips: clips.to_vec(),
            previous_speakers: speakers.to_vec(),
            description: format!(
                "Apply speaker \"{}\" to {} clip{}",
                speaker,
                clip_ids.len(),
                plural(clip_ids.len())
            ),
            clip_ids: clip_ids.to_vec(),
            speaker,
        }
    }
}

impl Command for ChangeSpeakerCommand {
    fn execute(&self, port: &mut dyn EditorPort) -> Result<()> {
        let clips = editing::assign_speaker(&self.previous_clips, &self.clip_ids, &self.speaker);
        let mut speakers = self.previous_speakers.clone();
        if !self.speaker.is_empty() && !speakers.contains(&self.speaker) {
            speakers.push(self.speaker.clone());
        }
        set_speakers_and_clips(port, speakers, clips, "change_speaker")
    }

    fn undo(&self, port: &mut dyn EditorPort) -> Result<()> {
        set_speakers_and_clips(
            port,
            self.previous_speakers.clone(),
            self.previous_clips.clone(),
            "change_speaker",
        )
    }

    fn description(&self) -> &str {
        &self.description
    }
}

// ---------------------------------------------------------------------------
// SplitClipCommand
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct SplitClipCommand {
    original: Vec<Clip>,
    clip_id: String,
    split_ids: (String, String),
    description: String,
}

impl SplitClipCommand {
    pub fn new(clips: &[Clip], clip_id: impl Into<String>) -> Self {
        let clip_id = clip_id.into();
        Self {
            original: clips.to_vec(),
            description: format!("Split clip: \"{}\"", subtitle_or_fallback(clips, &clip_id)),
            split_ids: (ids::split_id(&clip_id, 1), ids::split_id(&clip_id, 2)),
            clip_id,
        }
    }

    /// Id of the clip that takes the original's position.
    pub fn first_split_id(&self) -> &str {
        &self.split_ids.0
    }
}

impl Command for SplitClipCommand {
    fn execute(&self, port: &mut dyn EditorPort) -> Result<()> {
        let updated = editing::split_clip(
            &self.original,
            &self.clip_id,
            (&self.split_ids.0, &self.split_ids.1),
        )
        .inspect_err(|e| tracing::error!(module = "split_clip", error = %e, "split failed"))?;
        set_clips(port, updated, "split_clip")
    }

    fn undo(&self, port: &mut dyn EditorPort) -> Result<()> {
        set_clips(port, self.original.clone(), "split_clip")
    }

    fn description(&self) -> &str {
        &self.description
    }
}

// ---------------------------------------------------------------------------
// MergeClipsCommand
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct MergeClipsCommand {
    original: Vec<Clip>,
    clip_ids: Vec<String>,
    merged_id: String,
}

impl MergeClipsCommand {
    pub fn new(clips: &[Clip], clip_ids: &[String]) -> Self {
        let mut unique = Vec::with_capacity(clip_ids.len());
        for id in clip_ids {
            if !unique.contains(id) {
                unique.push(id.clone());
            }
        }
        Self {
            original: clips.to_vec(),
            clip_ids: unique,
            merged_id: ids::merged_id(),
        }
    }

    pub fn merged_id(&self) -> &str {
        &self.merged_id
    }
}

impl Command for MergeClipsCommand {
    fn execute(&self, port: &mut dyn EditorPort) -> Result<()> {
        let updated = editing::merge_clips(&self.original, &self.clip_ids, &self.merged_id)
            .inspect_err(|e| tracing::error!(module = "merge_clips", error = %e, "merge failed"))?;
        set_clips(port, updated, "merge_clips")
    }

    fn undo(&self, port: &mut dyn EditorPort) -> Result<()> {
        set_clips(port, self.original.clone(), "merge_clips")
    }

    fn description(&self) -> &str {
        "Merge clips"
    }
}

// ---------------------------------------------------------------------------
// ReorderClipsCommand
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ReorderClipsCommand {
    original: Vec<Clip>,
    source: String,
    target: String,
    selected: Vec<String>,
    description: String,
}

impl ReorderClipsCommand {
    pub fn new(
        clips: &[Clip],
        source: impl Into<String>,
        target: impl Into<String>,
        selected: &[String],
    ) -> Self {
        let source = source.into();
        let n = if selected.len() > 1 && selected.contains(&source) {
            selected.len()
        } else {
            1
        };
        Self {
            original: clips.to_vec(),
            source,
            target: target.into(),
            selected: selected.to_vec(),
            description: format!("Move {} clip{}", n, plural(n)),
        }
    }
}

impl Command for ReorderClipsCommand {
    fn execute(&self, port: &mut dyn EditorPort) -> Result<()> {
        let updated =
            editing::reorder_clips(&self.original, &self.source, &self.target, &self.selected);
        set_clips(port, updated, "reorder_clips")
    }

    fn undo(&self, port: &mut dyn EditorPort) -> Result<()> {
        set_clips(port, self.original.clone(), "reorder_clips")
    }

    fn description(&self) -> &str {
        &self.description
    }
}

// ---------------------------------------------------------------------------
// Text and timing edits
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct UpdateWordTextCommand {
    original: Vec<Clip>,
    clip_id: String,
    word_id: String,
    text: String,
    description: String,
}

impl UpdateWordTextCommand {
    pub fn new(
        clips: &[Clip],
        clip_id: impl Into<String>,
        word_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        let clip_id = clip_id.into();
        let word_id = word_id.into();
        let text = text.into();
        let previous = editing::find_clip(clips, &clip_id)
            .and_then(|c| c.words.iter().find(|w| w.id == word_id))
            .map(|w| w.text.clone())
            .unwrap_or_default();
        Self {
            original: clips.to_vec(),
            description: format!("Edit word \"{}\" to \"{}\"", previous, text),
            clip_id,
            word_id,
            text,
        }
    }
}

impl Command for UpdateWordTextCommand {
    fn execute(&self, port: &mut dyn EditorPort) -> Result<()> {
        let updated =
            editing::update_word_text(&self.original, &self.clip_id, &self.word_id, &self.text)
                .inspect_err(|e| tracing::error!(module = "edit_word", error = %e, "edit failed"))?;
        set_clips(port, updated, "edit_word")
    }

    fn undo(&self, port: &mut dyn EditorPort) -> Result<()> {
        set_clips(port, self.original.clone(), "edit_word")
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[derive(Debug)]
pub struct UpdateClipTextCommand {
    original: Vec<Clip>,
    clip_id: String,
    text: String,
    description: String,
}

impl UpdateClipTextCommand {
    pub fn new(clips: &[Clip], clip_id: impl Into<String>, text: impl Into<String>) -> Self {
        let clip_id = clip_id.into();
        Self {
            original: clips.to_vec(),
            description: format!("Edit text: \"{}\"", subtitle_or_fallback(clips, &clip_id)),
            clip_id,
            text: text.into(),
        }
    }
}

impl Command for UpdateClipTextCommand {
    fn execute(&self, port: &mut dyn EditorPort) -> Result<()> {
        let updated = editing::update_clip_text(&self.original, &self.clip_id, &self.text)
            .inspect_err(|e| tracing::error!(module = "edit_text", error = %e, "edit failed"))?;
        set_clips(port, updated, "edit_text")
    }

    fn undo(&self, port: &mut dyn EditorPort) -> Result<()> {
        set_clips(port, self.original.clone(), "edit_text")
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Moves a clip's start/end and rescales its word timings.
#[derive(Debug)]
pub struct UpdateClipTimingCommand {
    original: Vec<Clip>,
    clip_id: String,
    start: f64,
    end: f64,
    description: String,
}

impl UpdateClipTimingCommand {
    pub fn new(clips: &[Clip], clip_id: impl Into<String>, start: f64, end: f64) -> Self {
        let clip_id = clip_id.into();
        Self {
            original: clips.to_vec(),
            description: format!(
                "Change timing of \"{}\" to {:.1}s-{:.1}s",
                subtitle_or_fallback(clips, &clip_id),
                start,
                end
            ),
            clip_id,
            start,
            end,
        }
    }
}

impl Command for UpdateClipTimingCommand {
    fn execute(&self, port: &mut dyn EditorPort) -> Result<()> {
        let updated =
            editing::update_clip_timing(&self.original, &self.clip_id, self.start, self.end)
                .inspect_err(|e| tracing::error!(module = "clip_timing", error = %e, "retime failed"))?;
        set_clips(port, updated, "clip_timing")
    }

    fn undo(&self, port: &mut dyn EditorPort) -> Result<()> {
        set_clips(port, self.original.clone(), "clip_timing")
    }

    fn description(&self) -> &str {
        &self.description
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::store::ClipStore;

    fn clip(id: &str, timeline: &str, speaker: &str) -> Clip {
        Clip {
            id: id.to_string(),
            timeline: timeline.to_string(),
            speaker: speaker.to_string(),
            subtitle: format!("text {}", id),
            full_text: format!("text {}", id),
            words: vec![Word::new(format!("{}_w0", id), id, 0.0, 1.0)],
            start_time: None,
            end_time: None,
        }
    }

    fn abc() -> Vec<Clip> {
        vec![clip("a", "1", ""), clip("b", "2", ""), clip("c", "3", "")]
    }

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn pairs(clips: &[Clip]) -> Vec<(&str, &str)> {
        clips
            .iter()
            .map(|c| (c.id.as_str(), c.timeline.as_str()))
            .collect()
    }

    // -----------------------------------------------------------------------
    // DeleteClipCommand
    // -----------------------------------------------------------------------

    #[test]
    fn delete_renumbers_and_undo_restores_verbatim() {
        let original = abc();
        let mut store = ClipStore::with_state(original.clone(), vec![]).unwrap();

        let cmd = DeleteClipCommand::new(store.clips(), "b");
        cmd.execute(&mut store).unwrap();
        assert_eq!(pairs(store.clips()), vec![("a", "1"), ("c", "2")]);

        cmd.undo(&mut store).unwrap();
        assert_eq!(store.clips(), original.as_slice());
    }

    #[test]
    fn delete_labels_are_contiguous() {
        let mut clips = abc();
        clips.push(clip("d", "9", ""));
        let mut store = ClipStore::with_state(clips, vec![]).unwrap();

        DeleteClipCommand::new(store.clips(), "a")
            .execute(&mut store)
            .unwrap();
        for (i, c) in store.clips().iter().enumerate() {
            assert_eq!(c.timeline, (i + 1).to_string());
        }
    }

    #[test]
    fn delete_missing_id_keeps_sequence() {
        let mut store = ClipStore::with_state(abc(), vec![]).unwrap();
        let cmd = DeleteClipCommand::new(store.clips(), "zzz");
        assert_eq!(cmd.description(), "Delete clip: \"clip\"");

        cmd.execute(&mut store).unwrap();
        assert_eq!(pairs(store.clips()), vec![("a", "1"), ("b", "2"), ("c", "3")]);
    }

    #[test]
    fn delete_description_uses_subtitle() {
        let cmd = DeleteClipCommand::new(&abc(), "c");
        assert_eq!(cmd.description(), "Delete clip: \"text c\"");
    }

    #[test]
    fn delete_can_be_reapplied() {
        let mut store = ClipStore::with_state(abc(), vec![]).unwrap();
        let cmd = DeleteClipCommand::new(store.clips(), "a");
        cmd.execute(&mut store).unwrap();
        cmd.undo(&mut store).unwrap();
        cmd.execute(&mut store).unwrap();
        assert_eq!(pairs(store.clips()), vec![("b", "1"), ("c", "2")]);
    }

    // -----------------------------------------------------------------------
    // RemoveSpeakerCommand
    // -----------------------------------------------------------------------

    #[test]
    fn remove_speaker_scenario() {
        let clips = vec![clip("a", "1", "Alice"), clip("b", "2", "Bob")];
        let speakers = strings(&["Alice", "Bob"]);
        let mut store = ClipStore::with_state(clips.clone(), speakers.clone()).unwrap();

        let cmd = RemoveSpeakerCommand::new(store.clips(), store.speakers(), "Alice");
        cmd.execute(&mut store).unwrap();

        assert_eq!(store.speakers(), strings(&["Bob"]).as_slice());
        assert_eq!(store.clips()[0].speaker, "");
        assert_eq!(store.clips()[1], clips[1]);
        assert_eq!(cmd.description(), "Remove speaker: Alice");

        cmd.undo(&mut store).unwrap();
        assert_eq!(store.speakers(), speakers.as_slice());
        assert_eq!(store.clips(), clips.as_slice());
    }

    #[test]
    fn remove_speaker_updates_every_matching_clip() {
        let clips = vec![
            clip("a", "1", "Alice"),
            clip("b", "2", "Bob"),
            clip("c", "3", "Alice"),
        ];
        let mut store = ClipStore::with_state(clips, strings(&["Alice", "Bob"])).unwrap();
        RemoveSpeakerCommand::new(store.clips(), store.speakers(), "Alice")
            .execute(&mut store)
            .unwrap();

        let speakers: Vec<_> = store.clips().iter().map(|c| c.speaker.as_str()).collect();
        assert_eq!(speakers, vec!["", "Bob", ""]);
    }

    /// Port that accepts speaker updates but rejects clip updates.
    #[derive(Default)]
    struct ClipsLocked(ClipStore);

    impl EditorPort for ClipsLocked {
        fn clips(&self) -> &[Clip] {
            self.0.clips()
        }
        fn set_clips(&mut self, _clips: Vec<Clip>) -> Result<()> {
            Err(CoreError::Rejected("locked".into()))
        }
        fn speakers(&self) -> &[String] {
            self.0.speakers()
        }
        fn set_speakers(&mut self, speakers: Vec<String>) -> Result<()> {
            self.0.set_speakers(speakers)
        }
        fn clipboard(&self) -> &[Clip] {
            self.0.clipboard()
        }
        fn set_clipboard(&mut self, clips: Vec<Clip>) -> Result<()> {
            self.0.set_clipboard(clips)
        }
    }

    #[test]
    fn remove_speaker_rolls_back_speakers_when_clips_rejected() {
        let clips = vec![clip("a", "1", "Alice")];
        let mut port =
            ClipsLocked(ClipStore::with_state(clips, strings(&["Alice", "Bob"])).unwrap());

        let cmd = RemoveSpeakerCommand::new(port.clips(), port.speakers(), "Alice");
        let err = cmd.execute(&mut port).unwrap_err();
        assert!(matches!(err, CoreError::Rejected(_)));
        assert_eq!(port.speakers(), strings(&["Alice", "Bob"]).as_slice());
        assert_eq!(port.clips()[0].speaker, "Alice");
    }

    // -----------------------------------------------------------------------
    // CopyClipsCommand
    // -----------------------------------------------------------------------

    #[test]
    fn copy_is_non_destructive_with_fresh_ids() {
        let original = abc();
        let mut store = ClipStore::with_state(original.clone(), vec![]).unwrap();

        let cmd = CopyClipsCommand::new(store.clips(), &strings(&["c", "a"]));
        assert_eq!(cmd.description(), "Copy 2 clips");
        cmd.execute(&mut store).unwrap();

        assert_eq!(store.clips(), original.as_slice());
        let board = store.clipboard().to_vec();
        assert_eq!(board.len(), 2);
        // original relative order, not request order
        assert!(board[0].id.starts_with("a_copy_"));
        assert!(board[1].id.starts_with("c_copy_"));
        assert_eq!(board[0].subtitle, "text a");
        assert_eq!(board[0].words, original[0].words);
        for copy in &board {
            assert!(original.iter().all(|c| c.id != copy.id));
        }

        cmd.undo(&mut store).unwrap();
        assert_eq!(store.clipboard(), board.as_slice());
        assert_eq!(store.clips(), original.as_slice());
    }

    #[test]
    fn repeated_copies_get_distinct_ids() {
        let mut store = ClipStore::with_state(abc(), vec![]).unwrap();
        let cmd = CopyClipsCommand::new(store.clips(), &strings(&["a"]));

        cmd.execute(&mut store).unwrap();
        let first = store.clipboard()[0].id.clone();
        cmd.execute(&mut store).unwrap();
        assert_ne!(store.clipboard()[0].id, first);
    }

    #[test]
    fn copy_ignores_unknown_ids() {
        let cmd = CopyClipsCommand::new(&abc(), &strings(&["x", "b"]));
        assert_eq!(cmd.len(), 1);
        assert_eq!(cmd.description(), "Copy 1 clip");
    }

    // -----------------------------------------------------------------------
    // PasteClipsCommand
    // -----------------------------------------------------------------------

    #[test]
    fn paste_appends_and_undo_restores() {
        let original = abc();
        let mut store = ClipStore::with_state(original.clone(), vec![]).unwrap();
        let board = vec![clip("a", "1", "")];

        let cmd = PasteClipsCommand::new(store.clips(), &board);
        cmd.execute(&mut store).unwrap();
        assert_eq!(store.clips().len(), 4);
        assert!(store.clips()[3].id.starts_with("a_paste_"));
        assert_eq!(store.clips()[3].timeline, "4");

        cmd.undo(&mut store).unwrap();
        assert_eq!(store.clips(), original.as_slice());

        // redo brings back the same id
        cmd.execute(&mut store).unwrap();
        assert_eq!(store.clips()[3].id, cmd.pasted_ids()[0]);
    }

    #[test]
    fn paste_with_empty_clipboard_is_noop() {
        let mut store = ClipStore::with_state(abc(), vec![]).unwrap();
        let cmd = PasteClipsCommand::new(store.clips(), &[]);
        cmd.execute(&mut store).unwrap();
        assert_eq!(store.revision(), 0);
    }

    // -----------------------------------------------------------------------
    // ChangeSpeakerCommand
    // -----------------------------------------------------------------------

    #[test]
    fn change_speaker_adds_new_name() {
        let mut store =
            ClipStore::with_state(vec![clip("a", "1", "Alice")], strings(&["Alice"])).unwrap();
        let cmd = ChangeSpeakerCommand::new(store.clips(), store.speakers(), "a", "Carol");
        assert_eq!(cmd.description(), "Change speaker from Alice to Carol");

        cmd.execute(&mut store).unwrap();
        assert_eq!(store.clips()[0].speaker, "Carol");
        assert_eq!(store.speakers(), strings(&["Alice", "Carol"]).as_slice());

        cmd.undo(&mut store).unwrap();
        assert_eq!(store.clips()[0].speaker, "Alice");
        assert_eq!(store.speakers(), strings(&["Alice"]).as_slice());
    }

    #[test]
    fn batch_change_speaker_keeps_existing_list() {
        let mut store = ClipStore::with_state(abc(), strings(&["Bob"])).unwrap();
        let cmd =
            ChangeSpeakerCommand::batch(store.clips(), store.speakers(), &strings(&["a", "c"]), "Bob");
        assert_eq!(cmd.description(), "Apply speaker \"Bob\" to 2 clips");

        cmd.execute(&mut store).unwrap();
        let speakers: Vec<_> = store.clips().iter().map(|c| c.speaker.as_str()).collect();
        assert_eq!(speakers, vec!["Bob", "", "Bob"]);
        assert_eq!(store.speakers(), strings(&["Bob"]).as_slice());
    }

    // -----------------------------------------------------------------------
    // SplitClipCommand / MergeClipsCommand
    // -----------------------------------------------------------------------

    #[test]
    fn split_then_undo() {
        let two_words = Clip::from_words(
            "s",
            "",
            vec![Word::new("w0", "good", 0.0, 0.4), Word::new("w1", "day", 0.5, 0.9)],
        );
        let original = vec![two_words, clip("b", "2", "")];
        let mut store = ClipStore::with_state(original.clone(), vec![]).unwrap();

        let cmd = SplitClipCommand::new(store.clips(), "s");
        cmd.execute(&mut store).unwrap();
        assert_eq!(store.clips().len(), 3);
        assert_eq!(store.clips()[0].id, cmd.first_split_id());
        assert_eq!(store.clips()[1].subtitle, "day");

        cmd.undo(&mut store).unwrap();
        assert_eq!(store.clips(), original.as_slice());
    }

    #[test]
    fn split_failure_leaves_store_untouched() {
        let mut store = ClipStore::with_state(abc(), vec![]).unwrap();
        let cmd = SplitClipCommand::new(store.clips(), "a");
        assert!(cmd.execute(&mut store).is_err());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn merge_then_undo() {
        let original = abc();
        let mut store = ClipStore::with_state(original.clone(), vec![]).unwrap();

        let cmd = MergeClipsCommand::new(store.clips(), &strings(&["b", "c", "b"]));
        cmd.execute(&mut store).unwrap();
        assert_eq!(pairs(store.clips()), vec![("a", "1"), (cmd.merged_id(), "2")]);
        assert_eq!(store.clips()[1].subtitle, "text b text c");

        cmd.undo(&mut store).unwrap();
        assert_eq!(store.clips(), original.as_slice());
    }

    // -----------------------------------------------------------------------
    // ReorderClipsCommand
    // -----------------------------------------------------------------------

    #[test]
    fn reorder_then_undo() {
        let original = abc();
        let mut store = ClipStore::with_state(original.clone(), vec![]).unwrap();

        let cmd = ReorderClipsCommand::new(store.clips(), "a", "c", &strings(&["a"]));
        assert_eq!(cmd.description(), "Move 1 clip");
        cmd.execute(&mut store).unwrap();
        assert_eq!(pairs(store.clips()), vec![("b", "1"), ("c", "2"), ("a", "3")]);

        cmd.undo(&mut store).unwrap();
        assert_eq!(store.clips(), original.as_slice());
    }

    // -----------------------------------------------------------------------
    // Text and timing edits
    // -----------------------------------------------------------------------

    fn spoken(id: &str) -> Clip {
        Clip::from_words(
            id,
            "",
            vec![Word::new("w0", "see", 1.0, 1.5), Word::new("w1", "yu", 2.0, 3.0)],
        )
    }

    #[test]
    fn word_text_edit_then_undo() {
        let original = vec![spoken("a")];
        let mut store = ClipStore::with_state(original.clone(), vec![]).unwrap();

        let cmd = UpdateWordTextCommand::new(store.clips(), "a", "w1", "you");
        assert_eq!(cmd.description(), "Edit word \"yu\" to \"you\"");
        cmd.execute(&mut store).unwrap();
        assert_eq!(store.clips()[0].subtitle, "see you");
        assert_eq!(store.clips()[0].words[1].text, "you");

        cmd.undo(&mut store).unwrap();
        assert_eq!(store.clips(), original.as_slice());
    }

    #[test]
    fn word_text_edit_of_unknown_word_changes_nothing() {
        let mut store = ClipStore::with_state(vec![spoken("a")], vec![]).unwrap();
        let cmd = UpdateWordTextCommand::new(store.clips(), "a", "w9", "x");
        assert!(cmd.execute(&mut store).is_err());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn clip_text_edit_then_undo() {
        let original = vec![spoken("a")];
        let mut store = ClipStore::with_state(original.clone(), vec![]).unwrap();

        let cmd = UpdateClipTextCommand::new(store.clips(), "a", "See you!");
        assert_eq!(cmd.description(), "Edit text: \"see yu\"");
        cmd.execute(&mut store).unwrap();
        assert_eq!(store.clips()[0].full_text, "See you!");
        assert_eq!(store.clips()[0].words, original[0].words);

        cmd.undo(&mut store).unwrap();
        assert_eq!(store.clips(), original.as_slice());
    }

    #[test]
    fn timing_edit_then_undo() {
        let original = vec![spoken("a")];
        let mut store = ClipStore::with_state(original.clone(), vec![]).unwrap();

        let cmd = UpdateClipTimingCommand::new(store.clips(), "a", 2.0, 6.0);
        cmd.execute(&mut store).unwrap();
        let clip = &store.clips()[0];
        assert_eq!((clip.start_time, clip.end_time), (Some(2.0), Some(6.0)));
        assert!((clip.words[0].start - 2.0).abs() < 1e-9);
        assert!((clip.words[1].end - 6.0).abs() < 1e-9);

        cmd.undo(&mut store).unwrap();
        assert_eq!(store.clips(), original.as_slice());
    }
}
