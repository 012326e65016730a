use crate::error::Result;
use crate::store::EditorPort;

/// A reversible edit that can be executed, undone, and described.
///
/// Implementations capture the state they replace when constructed and own
/// that copy; `undo` writes it back through the port.
pub trait Command: std::fmt::Debug + Send {
    fn execute(&self, port: &mut dyn EditorPort) -> Result<()>;
    fn undo(&self, port: &mut dyn EditorPort) -> Result<()>;
    fn description(&self) -> &str;
}

type ChangeListener = Box<dyn FnMut(bool) + Send>;

/// Linear undo/redo history.
///
/// Entries before `cursor` are done; entries at or after it were undone and
/// can be redone until a new command is recorded.
pub struct History {
    entries: Vec<Box<dyn Command>>,
    cursor: usize,
    max_size: usize,
    /// Cursor position that matches the last saved state, if still reachable.
    saved_at: Option<usize>,
    on_change: Option<ChangeListener>,
}

impl std::fmt::Debug for History {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("History")
            .field("entries", &self.entries)
            .field("cursor", &self.cursor)
            .field("max_size", &self.max_size)
            .field("saved_at", &self.saved_at)
            .finish()
    }
}

impl History {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            max_size: max_size.max(1),
            saved_at: Some(0),
            on_change: None,
        }
    }

    /// Run `listener` with the unsaved-changes flag after every transition.
    pub fn set_on_change(&mut self, listener: impl FnMut(bool) + Send + 'static) {
        self.on_change = Some(Box::new(listener));
    }

    /// Record a command the caller has already executed. Discards the redo tail.
    pub fn push(&mut self, cmd: Box<dyn Command>) {
        if self.saved_at.is_some_and(|s| s > self.cursor) {
            self.saved_at = None;
        }
        self.entries.truncate(self.cursor);
        tracing::debug!(description = cmd.description(), "history push");
        self.entries.push(cmd);
        self.cursor += 1;

        while self.entries.len() > self.max_size {
            self.entries.remove(0);
            self.cursor -= 1;
            self.saved_at = match self.saved_at {
                Some(0) | None => None,
                Some(s) => Some(s - 1),
            };
        }

        self.notify();
    }

    /// Execute a command and record it. A command whose execution fails is
    /// not recorded.
    pub fn execute(&mut self, cmd: Box<dyn Command>, port: &mut dyn EditorPort) -> Result<()> {
        // the command logs its own failure
        if let Err(e) = cmd.execute(port) {
            tracing::debug!(description = cmd.description(), "command not recorded");
            return Err(e);
        }
        self.push(cmd);
        Ok(())
    }

    /// Undo the last done command. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self, port: &mut dyn EditorPort) -> Result<bool> {
        if self.cursor == 0 {
            return Ok(false);
        }
        let cmd = &self.entries[self.cursor - 1];
        cmd.undo(port)?;
        tracing::debug!(description = cmd.description(), "undo");
        self.cursor -= 1;
        self.notify();
        Ok(true)
    }

    /// Re-execute the next undone command. Returns `false` when there is
    /// nothing to redo.
    pub fn redo(&mut self, port: &mut dyn EditorPort) -> Result<bool> {
        if self.cursor == self.entries.len() {
            return Ok(false);
        }
        let cmd = &self.entries[self.cursor];
        cmd.execute(port)?;
        tracing::debug!(description = cmd.description(), "redo");
        self.cursor += 1;
        self.notify();
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.cursor
            .checked_sub(1)
            .map(|i| self.entries[i].description())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.entries.get(self.cursor).map(|cmd| cmd.description())
    }

    /// Descriptions of every recorded entry, oldest first.
    pub fn descriptions(&self) -> Vec<&str> {
        self.entries.iter().map(|c| c.description()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
        self.saved_at = Some(0);
        self.notify();
    }

    pub fn mark_saved(&mut self) {
        self.saved_at = Some(self.cursor);
        self.notify();
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.saved_at != Some(self.cursor)
    }

    fn notify(&mut self) {
        let dirty = self.has_unsaved_changes();
        if let Some(listener) = self.on_change.as_mut() {
            listener(dirty);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
