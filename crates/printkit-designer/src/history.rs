//! Undo/redo history over view snapshots.
//!
//! Every successful mutation records exactly one [`HistoryEntry`] holding
//! the affected view's state before and after the change. History is
//! scoped per view: each view owns an independent [`HistoryStack`], so
//! undoing on one view never touches another.
//!
//! Depth is capped at [`MAX_HISTORY_DEPTH`] entries; when the cap is
//! reached the oldest entry is dropped. The cap bounds memory for long
//! editing sessions and is part of the documented contract, not a silent
//! truncation.

use chrono::{DateTime, Utc};

use printkit_core::{DesignError, Result, ViewId};

use crate::view_state::ViewState;

/// Maximum retained undo entries per view.
pub const MAX_HISTORY_DEPTH: usize = 100;

/// One recorded mutation: the affected view's state on both sides of the
/// change.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub before: ViewState,
    pub after: ViewState,
    pub view_id: ViewId,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(before: ViewState, after: ViewState) -> Self {
        let view_id = before.view_id;
        Self {
            before,
            after,
            view_id,
            timestamp: Utc::now(),
        }
    }
}

/// Per-view undo/redo stack.
#[derive(Debug, Clone, Default)]
pub struct HistoryStack {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
}

impl HistoryStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new entry, clearing any redoable entries.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.undo_stack.push(entry);
        self.redo_stack.clear();
        if self.undo_stack.len() > MAX_HISTORY_DEPTH {
            self.undo_stack.remove(0);
        }
    }

    /// Pops the latest entry and returns the state to restore. Reports
    /// `NothingToUndo` (non-fatal) on an empty stack.
    pub fn undo(&mut self) -> Result<ViewState> {
        let entry = self.undo_stack.pop().ok_or(DesignError::NothingToUndo)?;
        let restored = entry.before.clone();
        self.redo_stack.push(entry);
        Ok(restored)
    }

    /// Re-applies the latest undone entry. Reports `NothingToRedo`
    /// (non-fatal) on an empty redo stack.
    pub fn redo(&mut self) -> Result<ViewState> {
        let entry = self.redo_stack.pop().ok_or(DesignError::NothingToRedo)?;
        let restored = entry.after.clone();
        self.undo_stack.push(entry);
        Ok(restored)
    }

    /// Whether undo is available. Always reflects the true stack state.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Whether redo is available. Always reflects the true stack state.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undoable entries.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of redoable entries.
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drops all entries.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
