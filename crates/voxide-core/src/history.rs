//! Ordered log of reversible actions backing undo/redo.

/// Maximum number of undoable actions kept in the log.
const MAX_LOG_ENTRIES: usize = 50;

/// The kinds of reversible actions the editor records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Paint,
    Erase,
    AddRandom,
    AddCube,
    AddSphere,
    FlipHorizontal,
    FlipVertical,
    Melt,
    Import,
    PaletteEdit,
}

impl Action {
    /// Human-readable label for log inspection and menus.
    pub fn label(&self) -> &'static str {
        match self {
            Action::Paint => "paint voxel",
            Action::Erase => "erase voxel",
            Action::AddRandom => "add random voxels",
            Action::AddCube => "add cube",
            Action::AddSphere => "add sphere",
            Action::FlipHorizontal => "flip horizontally",
            Action::FlipVertical => "flip vertically",
            Action::Melt => "melt",
            Action::Import => "import",
            Action::PaletteEdit => "edit palette",
        }
    }
}

/// An ordered log of reversible actions.
///
/// Every entry pairs the action kind with the state snapshot taken just
/// before the action mutated it, so popping an entry restores the world as
/// it was. Recording a new action invalidates anything previously undone.
#[derive(Debug, Clone, Default)]
pub struct ActionLog<S> {
    undo_stack: Vec<(Action, S)>,
    redo_stack: Vec<(Action, S)>,
}

impl<S> ActionLog<S> {
    /// Create an empty log.
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Record an action and the pre-mutation snapshot (call before mutating).
    pub fn record(&mut self, action: Action, snapshot: S) {
        self.undo_stack.push((action, snapshot));
        self.redo_stack.clear();
        if self.undo_stack.len() > MAX_LOG_ENTRIES {
            self.undo_stack.remove(0);
        }
    }

    /// Undo the most recent action.
    ///
    /// `current` is the present state; it moves to the redo stack and the
    /// pre-action snapshot is returned for the caller to restore. Returns
    /// `None` (and leaves `current` unused) when there is nothing to undo.
    pub fn undo(&mut self, current: S) -> Option<(Action, S)> {
        let (action, snapshot) = self.undo_stack.pop()?;
        self.redo_stack.push((action, current));
        Some((action, snapshot))
    }

    /// Redo the most recently undone action, mirroring [`ActionLog::undo`].
    pub fn redo(&mut self, current: S) -> Option<(Action, S)> {
        let (action, snapshot) = self.redo_stack.pop()?;
        self.undo_stack.push((action, current));
        Some((action, snapshot))
    }

    /// Whether an undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Whether a redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Ordered labels of the pending undoable actions, oldest first.
    pub fn labels(&self) -> Vec<&'static str> {
        self.undo_stack.iter().map(|(a, _)| a.label()).collect()
    }

    /// Number of undoable actions in the log.
    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Whether the log holds no undoable actions.
    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    /// Drop all entries, e.g. when a fresh document replaces the world.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_undo() {
        let mut log: ActionLog<i32> = ActionLog::new();
        log.record(Action::Paint, 0);

        let (action, restored) = log.undo(1).expect("undo available");
        assert_eq!(action, Action::Paint);
        assert_eq!(restored, 0);
        assert!(!log.can_undo());
        assert!(log.can_redo());
    }

    #[test]
    fn test_redo_restores_undone_state() {
        let mut log: ActionLog<i32> = ActionLog::new();
        log.record(Action::Melt, 0);

        let (_, old) = log.undo(1).expect("undo available");
        assert_eq!(old, 0);
        let (action, newer) = log.redo(old).expect("redo available");
        assert_eq!(action, Action::Melt);
        assert_eq!(newer, 1);
        assert!(log.can_undo());
    }

    #[test]
    fn test_new_action_clears_redo() {
        let mut log: ActionLog<i32> = ActionLog::new();
        log.record(Action::Paint, 0);
        log.undo(1);
        assert!(log.can_redo());

        log.record(Action::Erase, 2);
        assert!(!log.can_redo());
    }

    #[test]
    fn test_log_is_capped() {
        let mut log: ActionLog<usize> = ActionLog::new();
        for i in 0..MAX_LOG_ENTRIES + 10 {
            log.record(Action::Paint, i);
        }
        assert_eq!(log.len(), MAX_LOG_ENTRIES);

        // Oldest entries were dropped; the deepest undo restores entry 10.
        let mut last = 0;
        let mut current = MAX_LOG_ENTRIES + 10;
        while let Some((_, snapshot)) = log.undo(current) {
            last = snapshot;
            current = snapshot;
        }
        assert_eq!(last, 10);
    }

    #[test]
    fn test_labels_in_order() {
        let mut log: ActionLog<i32> = ActionLog::new();
        log.record(Action::AddCube, 0);
        log.record(Action::FlipVertical, 1);
        assert_eq!(log.labels(), vec!["add cube", "flip vertically"]);
    }
}
