//! Undo/redo history of navigation commands

use crate::{CommandError, NavigationCommand, Result};

/// Manages undo and redo stacks
#[derive(Debug, Clone)]
pub struct UndoManager {
    /// Executed commands, most recent last
    undo_stack: Vec<NavigationCommand>,
    /// Undone commands, most recently undone last
    redo_stack: Vec<NavigationCommand>,
    /// Maximum number of undo entries
    max_entries: usize,
}

impl UndoManager {
    /// Create a new undo manager
    pub fn new() -> Self {
        Self::with_limit(100)
    }

    /// Create with a custom entry limit
    pub fn with_limit(max_entries: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_entries: max_entries.max(1),
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Record a freshly executed command. Clears the redo stack.
    pub fn push(&mut self, command: NavigationCommand) {
        self.redo_stack.clear();
        self.push_undo(command);
    }

    /// Put a redone (or failed-to-undo) command back on the undo stack, keeping redo history
    pub fn push_undo(&mut self, command: NavigationCommand) {
        self.undo_stack.push(command);

        // Enforce max entries
        while self.undo_stack.len() > self.max_entries {
            let evicted = self.undo_stack.remove(0);
            tracing::trace!(
                target: "outline::history",
                command = evicted.display_name(),
                "evicted oldest undo entry"
            );
        }
    }

    /// Record an undone command for redo
    pub fn push_redo(&mut self, command: NavigationCommand) {
        self.redo_stack.push(command);
    }

    /// Pop the last command for undo
    pub fn pop_undo(&mut self) -> Result<NavigationCommand> {
        self.undo_stack.pop().ok_or(CommandError::UndoStackEmpty)
    }

    /// Pop a command for redo
    pub fn pop_redo(&mut self) -> Result<NavigationCommand> {
        self.redo_stack.pop().ok_or(CommandError::RedoStackEmpty)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Name of the command the next undo would revert
    pub fn undo_label(&self) -> Option<&'static str> {
        self.undo_stack.last().map(NavigationCommand::display_name)
    }

    /// Name of the command the next redo would re-apply
    pub fn redo_label(&self) -> Option<&'static str> {
        self.redo_stack.last().map(NavigationCommand::display_name)
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CommandFactory;
    use outline_model::BookmarkId;

    #[test]
    fn test_push_clears_redo() {
        let factory = CommandFactory::new();
        let mut history = UndoManager::new();
        history.push(factory.toggle_expanded(BookmarkId::new()));
        history.push_redo(factory.toggle_expanded(BookmarkId::new()));
        assert!(history.can_redo());

        history.push(factory.delete_bookmark(BookmarkId::new()));
        assert!(!history.can_redo());
        assert_eq!(history.undo_len(), 2);
        assert_eq!(history.undo_label(), Some("Delete Bookmark"));
    }

    #[test]
    fn test_limit_evicts_oldest() {
        let factory = CommandFactory::new();
        let mut history = UndoManager::with_limit(2);
        history.push(factory.indent(BookmarkId::new()));
        history.push(factory.outdent(BookmarkId::new()));
        history.push(factory.move_up(BookmarkId::new()));

        assert_eq!(history.undo_len(), 2);
        assert_eq!(history.pop_undo().unwrap().display_name(), "Move Bookmark Up");
        assert_eq!(history.pop_undo().unwrap().display_name(), "Outdent Bookmark");
        assert!(matches!(history.pop_undo(), Err(CommandError::UndoStackEmpty)));
    }

    #[test]
    fn test_empty_stacks() {
        let mut history = UndoManager::default();
        assert!(!history.can_undo());
        assert!(history.undo_label().is_none());
        assert!(matches!(history.pop_redo(), Err(CommandError::RedoStackEmpty)));
        history.clear();
        assert_eq!(history.max_entries(), 100);
    }
}
