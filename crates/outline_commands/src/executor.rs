//! Outline editor - a document's navigation state plus its undo history

use crate::{CommandFactory, CommandOutput, NavigationCommand, Result, UndoManager};
use outline_model::OutlineDocument;

/// Runs navigation commands against one document and records them for undo
#[derive(Debug, Clone)]
pub struct OutlineEditor {
    document: OutlineDocument,
    history: UndoManager,
    factory: CommandFactory,
}

impl OutlineEditor {
    /// Create an editor for an empty outline on a document with `page_count` pages
    pub fn new(page_count: u32) -> Self {
        Self::with_document(OutlineDocument::new(page_count))
    }

    /// Create an editor around existing navigation state
    pub fn with_document(document: OutlineDocument) -> Self {
        let history = UndoManager::with_limit(document.settings().max_undo_entries);
        Self {
            document,
            history,
            factory: CommandFactory::new(),
        }
    }

    /// Read access to the document's outline and links
    pub fn document(&self) -> &OutlineDocument {
        &self.document
    }

    /// Direct access that bypasses undo history (loading, host-driven page count changes)
    pub fn document_mut(&mut self) -> &mut OutlineDocument {
        &mut self.document
    }

    /// Hand the document back, dropping its history
    pub fn into_document(self) -> OutlineDocument {
        self.document
    }

    /// Builder for commands to pass to [`execute`](Self::execute)
    pub fn commands(&self) -> CommandFactory {
        self.factory
    }

    pub fn history(&self) -> &UndoManager {
        &self.history
    }

    /// Execute a command and record it for undo. Failed commands are not recorded.
    pub fn execute(&mut self, mut command: NavigationCommand) -> Result<CommandOutput> {
        let output = command.execute(&mut self.document)?;
        tracing::debug!(
            target: "outline::history",
            command = command.display_name(),
            "recorded"
        );
        self.history.push(command);
        Ok(output)
    }

    /// Undo the last command
    pub fn undo(&mut self) -> Result<CommandOutput> {
        let mut command = self.history.pop_undo()?;
        match command.undo(&mut self.document) {
            Ok(output) => {
                self.history.push_redo(command);
                Ok(output)
            }
            Err(err) => {
                tracing::warn!(
                    target: "outline::history",
                    command = command.display_name(),
                    error = %err,
                    "undo failed"
                );
                self.history.push_undo(command);
                Err(err)
            }
        }
    }

    /// Redo the last undone command
    pub fn redo(&mut self) -> Result<CommandOutput> {
        let mut command = self.history.pop_redo()?;
        match command.execute(&mut self.document) {
            Ok(output) => {
                self.history.push_undo(command);
                Ok(output)
            }
            Err(err) => {
                tracing::warn!(
                    target: "outline::history",
                    command = command.display_name(),
                    error = %err,
                    "redo failed"
                );
                self.history.push_redo(command);
                Err(err)
            }
        }
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_label(&self) -> Option<&'static str> {
        self.history.undo_label()
    }

    pub fn redo_label(&self) -> Option<&'static str> {
        self.history.redo_label()
    }

    /// Drop all history, e.g. after the outline was reloaded from the host
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
