use crate::commands::*;
use crate::drag::{DragCoordinator, Point, PointerKind, ReorderRequest, RowExtent};
use crate::error::{CoreError, Result};
use crate::history::{Command, History};
use crate::selection::Selection;
use crate::settings::EditorSettings;
use crate::store::{ClipStore, EditorPort};
use crate::types::*;
use uuid::Uuid;

/// One open editing session: clip state, its undo history, the current
/// selection and the drag gesture in progress.
#[derive(Debug)]
pub struct EditorSession {
    project_id: Uuid,
    name: String,
    settings: EditorSettings,
    store: ClipStore,
    history: History,
    selection: Selection,
    drag: DragCoordinator,
}

impl EditorSession {
    pub fn new(name: impl Into<String>, settings: EditorSettings) -> Self {
        Self {
            project_id: Uuid::new_v4(),
            name: name.into(),
            history: History::new(settings.history.max_size),
            drag: DragCoordinator::new(settings.drag.clone()),
            settings,
            store: ClipStore::new(),
            selection: Selection::new(),
        }
    }

    pub fn from_project(project: Project) -> Result<Self> {
        let store = ClipStore::with_state(project.clips, project.speakers)?;
        Ok(Self {
            project_id: project.id,
            name: project.name,
            history: History::new(project.settings.history.max_size),
            drag: DragCoordinator::new(project.settings.drag.clone()),
            settings: project.settings,
            store,
            selection: Selection::new(),
        })
    }

    /// Snapshot the current state as a project.
    pub fn to_project(&self) -> Project {
        Project {
            id: self.project_id,
            name: self.name.clone(),
            clips: self.store.clips().to_vec(),
            speakers: self.store.speakers().to_vec(),
            settings: self.settings.clone(),
        }
    }

    pub fn clips(&self) -> &[Clip] {
        self.store.clips()
    }

    pub fn speakers(&self) -> &[String] {
        self.store.speakers()
    }

    pub fn clipboard(&self) -> &[Clip] {
        self.store.clipboard()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn drag(&self) -> &DragCoordinator {
        &self.drag
    }

    // -----------------------------------------------------------------------
    // Edits
    // -----------------------------------------------------------------------

    fn record(&mut self, cmd: Box<dyn Command>) -> Result<()> {
        tracing::info!(description = cmd.description(), "edit");
        self.history.execute(cmd, &mut self.store)?;
        let store = &self.store;
        self.selection
            .retain_existing(|id| crate::editing::find_clip(store.clips(), id).is_some());
        Ok(())
    }

    pub fn delete_clip(&mut self, clip_id: &str) -> Result<()> {
        let cmd = DeleteClipCommand::new(self.store.clips(), clip_id);
        self.record(Box::new(cmd))
    }

    /// Delete every selected clip as one undoable step per clip.
    pub fn delete_selected(&mut self) -> Result<usize> {
        let ids = self.selection.ids().to_vec();
        for id in &ids {
            self.delete_clip(id)?;
        }
        Ok(ids.len())
    }

    pub fn remove_speaker(&mut self, speaker: &str) -> Result<()> {
        if !self.store.speakers().iter().any(|s| s == speaker) {
            return Err(CoreError::SpeakerNotFound(speaker.to_string()));
        }
        let cmd = RemoveSpeakerCommand::new(self.store.clips(), self.store.speakers(), speaker);
        self.record(Box::new(cmd))
    }

    pub fn change_speaker(&mut self, clip_id: &str, speaker: &str) -> Result<()> {
        if crate::editing::find_clip(self.store.clips(), clip_id).is_none() {
            return Err(CoreError::ClipNotFound(clip_id.to_string()));
        }
        let cmd =
            ChangeSpeakerCommand::new(self.store.clips(), self.store.speakers(), clip_id, speaker);
        self.record(Box::new(cmd))
    }

    pub fn batch_change_speaker(&mut self, clip_ids: &[String], speaker: &str) -> Result<()> {
        let cmd =
            ChangeSpeakerCommand::batch(self.store.clips(), self.store.speakers(), clip_ids, speaker);
        self.record(Box::new(cmd))
    }

    /// Copy clips to the clipboard. Copying is not an undoable step.
    pub fn copy_clips(&mut self, clip_ids: &[String]) -> Result<usize> {
        let cmd = CopyClipsCommand::new(self.store.clips(), clip_ids);
        tracing::info!(description = cmd.description(), "copy");
        cmd.execute(&mut self.store)?;
        Ok(cmd.len())
    }

    pub fn copy_selected(&mut self) -> Result<usize> {
        let ids = self.selection.ids().to_vec();
        self.copy_clips(&ids)
    }

    /// Paste the clipboard after the last clip. Returns the new clip ids.
    pub fn paste(&mut self) -> Result<Vec<String>> {
        if self.store.clipboard().is_empty() {
            return Ok(vec![]);
        }
        let cmd = PasteClipsCommand::new(self.store.clips(), self.store.clipboard());
        let pasted = cmd.pasted_ids().into_iter().map(str::to_string).collect();
        self.record(Box::new(cmd))?;
        Ok(pasted)
    }

    /// Split a clip in two. Returns the id of the first half.
    pub fn split_clip(&mut self, clip_id: &str) -> Result<String> {
        let cmd = SplitClipCommand::new(self.store.clips(), clip_id);
        let first = cmd.first_split_id().to_string();
        self.record(Box::new(cmd))?;
        self.selection.select_only(&first);
        Ok(first)
    }

    /// Merge consecutive clips. Returns the merged clip's id.
    pub fn merge_clips(&mut self, clip_ids: &[String]) -> Result<String> {
        let cmd = MergeClipsCommand::new(self.store.clips(), clip_ids);
        let merged = cmd.merged_id().to_string();
        self.record(Box::new(cmd))?;
        self.selection.select_only(&merged);
        Ok(merged)
    }

    pub fn edit_word(&mut self, clip_id: &str, word_id: &str, text: &str) -> Result<()> {
        let cmd = UpdateWordTextCommand::new(self.store.clips(), clip_id, word_id, text);
        self.record(Box::new(cmd))
    }

    pub fn edit_clip_text(&mut self, clip_id: &str, text: &str) -> Result<()> {
        let cmd = UpdateClipTextCommand::new(self.store.clips(), clip_id, text);
        self.record(Box::new(cmd))
    }

    /// Move a clip to `[start, end]` seconds, rescaling its words.
    pub fn set_clip_timing(&mut self, clip_id: &str, start: f64, end: f64) -> Result<()> {
        let cmd = UpdateClipTimingCommand::new(self.store.clips(), clip_id, start, end);
        self.record(Box::new(cmd))
    }

    pub fn reorder(&mut self, request: &ReorderRequest) -> Result<()> {
        let cmd = ReorderClipsCommand::new(
            self.store.clips(),
            request.source_id.clone(),
            request.target_id.clone(),
            &request.selected_ids,
        );
        self.record(Box::new(cmd))
    }

    pub fn undo(&mut self) -> Result<bool> {
        self.history.undo(&mut self.store)
    }

    pub fn redo(&mut self) -> Result<bool> {
        self.history.redo(&mut self.store)
    }

    pub fn mark_saved(&mut self) {
        self.history.mark_saved();
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.history.has_unsaved_changes()
    }

    // -----------------------------------------------------------------------
    // Drag gestures
    // -----------------------------------------------------------------------

    pub fn pointer_down(&mut self, clip_id: &str, kind: PointerKind, at: Point, at_ms: u64) {
        self.drag.pointer_down(clip_id, kind, at, at_ms);
    }

    /// Forward pointer movement and resolve the row under the pointer.
    pub fn pointer_move(&mut self, at: Point, at_ms: u64, rows: &[RowExtent]) {
        self.drag.pointer_move(at, at_ms, &mut self.selection);
        let over = crate::drag::hit_test(rows, at.y);
        self.drag.drag_over(over);
    }

    pub fn tick(&mut self, at_ms: u64) {
        self.drag.tick(at_ms, &mut self.selection);
    }

    /// Finish the gesture; a drop on another clip becomes an undoable reorder.
    pub fn pointer_up(&mut self) -> Result<Option<ReorderRequest>> {
        match self.drag.pointer_up(&self.selection) {
            Some(request) => {
                self.reorder(&request)?;
                Ok(Some(request))
            }
            None => Ok(None),
        }
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }
}
