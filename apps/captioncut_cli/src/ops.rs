use anyhow::{Context, Result};
use captioncut_core::drag::{Point, PointerKind, ReorderRequest, RowExtent};
use captioncut_core::EditorSession;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Row height used when replaying drag gestures against the clip list.
const ROW_HEIGHT: f32 = 40.0;

/// One scripted edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOp {
    Select {
        clip_ids: Vec<String>,
    },
    ClearSelection,
    DeleteClip {
        clip_id: String,
    },
    DeleteSelected,
    RemoveSpeaker {
        speaker: String,
    },
    /// Copies the given clips, or the selection when `clip_ids` is absent.
    Copy {
        #[serde(default)]
        clip_ids: Option<Vec<String>>,
    },
    Paste,
    ChangeSpeaker {
        clip_id: String,
        speaker: String,
    },
    BatchChangeSpeaker {
        clip_ids: Vec<String>,
        speaker: String,
    },
    SplitClip {
        clip_id: String,
    },
    MergeClips {
        clip_ids: Vec<String>,
    },
    EditWord {
        clip_id: String,
        word_id: String,
        text: String,
    },
    EditClipText {
        clip_id: String,
        text: String,
    },
    /// New clip bounds in seconds; word timings are rescaled.
    SetClipTiming {
        clip_id: String,
        start: f64,
        end: f64,
    },
    Reorder {
        source_id: String,
        target_id: String,
        #[serde(default)]
        selected_ids: Vec<String>,
    },
    /// Mouse drag from one row onto another.
    Drag {
        clip_id: String,
        onto: String,
    },
    Undo,
    Redo,
    MarkSaved,
}

impl EditOp {
    pub fn name(&self) -> &'static str {
        match self {
            EditOp::Select { .. } => "select",
            EditOp::ClearSelection => "clear_selection",
            EditOp::DeleteClip { .. } => "delete_clip",
            EditOp::DeleteSelected => "delete_selected",
            EditOp::RemoveSpeaker { .. } => "remove_speaker",
            EditOp::Copy { .. } => "copy",
            EditOp::Paste => "paste",
            EditOp::ChangeSpeaker { .. } => "change_speaker",
            EditOp::BatchChangeSpeaker { .. } => "batch_change_speaker",
            EditOp::SplitClip { .. } => "split_clip",
            EditOp::MergeClips { .. } => "merge_clips",
            EditOp::EditWord { .. } => "edit_word",
            EditOp::EditClipText { .. } => "edit_clip_text",
            EditOp::SetClipTiming { .. } => "set_clip_timing",
            EditOp::Reorder { .. } => "reorder",
            EditOp::Drag { .. } => "drag",
            EditOp::Undo => "undo",
            EditOp::Redo => "redo",
            EditOp::MarkSaved => "mark_saved",
        }
    }
}

pub fn load_ops(path: &Path) -> Result<Vec<EditOp>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read ops file {}", path.display()))?;
    let ops: Vec<EditOp> = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse ops file {}", path.display()))?;
    Ok(ops)
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    pub applied: usize,
    pub skipped: usize,
}

/// Run every op in order, stopping at the first failure.
pub fn apply_all(session: &mut EditorSession, ops: &[EditOp]) -> Result<ApplyReport> {
    let mut report = ApplyReport::default();
    for (index, op) in ops.iter().enumerate() {
        let changed = apply(session, op)
            .with_context(|| format!("op #{} ({}) failed", index + 1, op.name()))?;
        if changed {
            report.applied += 1;
        } else {
            report.skipped += 1;
        }
    }
    Ok(report)
}

/// Returns false when the op had nothing to act on.
fn apply(session: &mut EditorSession, op: &EditOp) -> Result<bool> {
    match op {
        EditOp::Select { clip_ids } => {
            let selection = session.selection_mut();
            selection.clear();
            selection.add_all(clip_ids.iter().map(String::as_str));
        }
        EditOp::ClearSelection => session.selection_mut().clear(),
        EditOp::DeleteClip { clip_id } => session.delete_clip(clip_id)?,
        EditOp::DeleteSelected => return Ok(session.delete_selected()? > 0),
        EditOp::RemoveSpeaker { speaker } => session.remove_speaker(speaker)?,
        EditOp::Copy { clip_ids: Some(ids) } => return Ok(session.copy_clips(ids)? > 0),
        EditOp::Copy { clip_ids: None } => return Ok(session.copy_selected()? > 0),
        EditOp::Paste => return Ok(!session.paste()?.is_empty()),
        EditOp::ChangeSpeaker { clip_id, speaker } => session.change_speaker(clip_id, speaker)?,
        EditOp::BatchChangeSpeaker { clip_ids, speaker } => {
            session.batch_change_speaker(clip_ids, speaker)?
        }
        EditOp::SplitClip { clip_id } => {
            session.split_clip(clip_id)?;
        }
        EditOp::MergeClips { clip_ids } => {
            session.merge_clips(clip_ids)?;
        }
        EditOp::EditWord {
            clip_id,
            word_id,
            text,
        } => session.edit_word(clip_id, word_id, text)?,
        EditOp::EditClipText { clip_id, text } => session.edit_clip_text(clip_id, text)?,
        EditOp::SetClipTiming {
            clip_id,
            start,
            end,
        } => session.set_clip_timing(clip_id, *start, *end)?,
        EditOp::Reorder {
            source_id,
            target_id,
            selected_ids,
        } => session.reorder(&ReorderRequest {
            source_id: source_id.clone(),
            target_id: target_id.clone(),
            selected_ids: selected_ids.clone(),
        })?,
        EditOp::Drag { clip_id, onto } => return replay_drag(session, clip_id, onto),
        EditOp::Undo => return Ok(session.undo()?),
        EditOp::Redo => return Ok(session.redo()?),
        EditOp::MarkSaved => session.mark_saved(),
    }
    Ok(true)
}

fn replay_drag(session: &mut EditorSession, clip_id: &str, onto: &str) -> Result<bool> {
    let rows: Vec<RowExtent> = session
        .clips()
        .iter()
        .enumerate()
        .map(|(i, c)| RowExtent {
            clip_id: c.id.clone(),
            top: i as f32 * ROW_HEIGHT,
            height: ROW_HEIGHT,
        })
        .collect();
    let center = |id: &str| {
        rows.iter()
            .find(|r| r.clip_id == id)
            .map(|r| Point::new(0.0, r.top + r.height / 2.0))
    };

    let from = center(clip_id).with_context(|| format!("no clip row for {}", clip_id))?;
    let to = center(onto).with_context(|| format!("no clip row for {}", onto))?;

    session.pointer_down(clip_id, PointerKind::Mouse, from, 0);
    session.pointer_move(to, 16, &rows);
    Ok(session.pointer_up()?.is_some())
}
