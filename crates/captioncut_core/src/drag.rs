//! Drag-to-reorder gesture tracking for the vertical clip list.
//!
//! The coordinator turns raw pointer input into at most one
//! [`ReorderRequest`] per gesture. It never touches clip state itself.

use crate::selection::Selection;
use crate::settings::DragSettings;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    Mouse,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn distance_to(self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Vertical extent of one rendered clip row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowExtent {
    pub clip_id: String,
    pub top: f32,
    pub height: f32,
}

/// Find the row under `y`.
pub fn hit_test(rows: &[RowExtent], y: f32) -> Option<&str> {
    rows.iter()
        .find(|r| y >= r.top && y < r.top + r.height)
        .map(|r| r.clip_id.as_str())
}

/// Emitted when a drag ends over a different clip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub source_id: String,
    pub target_id: String,
    pub selected_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle,
    /// Pressed but not yet past the activation constraint.
    Pending {
        clip_id: String,
        kind: PointerKind,
        origin: Point,
        pressed_at_ms: u64,
    },
    Dragging {
        clip_id: String,
        origin: Point,
        current: Point,
    },
}

#[derive(Debug, Clone)]
pub struct DragCoordinator {
    settings: DragSettings,
    phase: Phase,
    over_id: Option<String>,
}

impl DragCoordinator {
    pub fn new(settings: DragSettings) -> Self {
        Self {
            settings,
            phase: Phase::Idle,
            over_id: None,
        }
    }

    /// Press on a clip row. Any gesture already in progress is dropped.
    pub fn pointer_down(&mut self, clip_id: &str, kind: PointerKind, at: Point, at_ms: u64) {
        self.over_id = None;
        self.phase = Phase::Pending {
            clip_id: clip_id.to_string(),
            kind,
            origin: at,
            pressed_at_ms: at_ms,
        };
    }

    /// Pointer moved. Returns the dragged clip id when this move starts the drag.
    pub fn pointer_move(&mut self, at: Point, at_ms: u64, selection: &mut Selection) -> Option<String> {
        match &mut self.phase {
            Phase::Idle => None,
            Phase::Dragging { current, .. } => {
                *current = at;
                None
            }
            Phase::Pending {
                clip_id,
                kind,
                origin,
                pressed_at_ms,
            } => {
                let moved = origin.distance_to(at);
                match kind {
                    PointerKind::Mouse => {
                        if moved > self.settings.mouse_distance_px {
                            let (id, origin) = (clip_id.clone(), *origin);
                            self.activate(id, origin, at, selection)
                        } else {
                            None
                        }
                    }
                    PointerKind::Touch => {
                        if at_ms.saturating_sub(*pressed_at_ms) >= self.settings.touch_delay_ms {
                            let (id, origin) = (clip_id.clone(), *origin);
                            self.activate(id, origin, at, selection)
                        } else if moved > self.settings.touch_tolerance_px {
                            // moved before the hold elapsed: a scroll, not a drag
                            tracing::debug!(clip_id = %clip_id, "touch drag abandoned");
                            self.phase = Phase::Idle;
                            None
                        } else {
                            None
                        }
                    }
                }
            }
        }
    }

    /// Clock tick without movement; starts a touch drag once the hold delay elapses.
    pub fn tick(&mut self, at_ms: u64, selection: &mut Selection) -> Option<String> {
        if let Phase::Pending {
            clip_id,
            kind: PointerKind::Touch,
            origin,
            pressed_at_ms,
        } = &self.phase
        {
            if at_ms.saturating_sub(*pressed_at_ms) >= self.settings.touch_delay_ms {
                let (id, origin) = (clip_id.clone(), *origin);
                return self.activate(id, origin, origin, selection);
            }
        }
        None
    }

    /// Update the row currently under the pointer. Ignored unless dragging.
    pub fn drag_over(&mut self, target: Option<&str>) {
        if self.is_dragging() {
            self.over_id = target.map(str::to_string);
        }
    }

    /// Visual offset of the dragged row. Horizontal movement is discarded.
    pub fn transform(&self) -> Option<Point> {
        match &self.phase {
            Phase::Dragging { origin, current, .. } => Some(Point::new(0.0, current.y - origin.y)),
            _ => None,
        }
    }

    /// Release. Yields a reorder request when the drag ended over another clip.
    pub fn pointer_up(&mut self, selection: &Selection) -> Option<ReorderRequest> {
        let phase = std::mem::replace(&mut self.phase, Phase::Idle);
        let over = self.over_id.take();

        let Phase::Dragging { clip_id, .. } = phase else {
            return None;
        };
        let target = over?;
        if target == clip_id {
            return None;
        }

        tracing::debug!(source = %clip_id, target = %target, "drag ended");
        Some(ReorderRequest {
            source_id: clip_id,
            target_id: target,
            selected_ids: selection.ids().to_vec(),
        })
    }

    /// Abort the gesture (escape, lost pointer). Nothing is emitted.
    pub fn cancel(&mut self) {
        if self.phase != Phase::Idle {
            tracing::debug!("drag cancelled");
        }
        self.phase = Phase::Idle;
        self.over_id = None;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    pub fn active_id(&self) -> Option<&str> {
        match &self.phase {
            Phase::Dragging { clip_id, .. } => Some(clip_id),
            _ => None,
        }
    }

    pub fn over_id(&self) -> Option<&str> {
        self.over_id.as_deref()
    }

    fn activate(
        &mut self,
        clip_id: String,
        origin: Point,
        current: Point,
        selection: &mut Selection,
    ) -> Option<String> {
        if !selection.contains(&clip_id) {
            selection.select_only(&clip_id);
        }
        tracing::debug!(clip_id = %clip_id, "drag started");
        self.phase = Phase::Dragging {
            clip_id: clip_id.clone(),
            origin,
            current,
        };
        Some(clip_id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
