//! Navigation command contract
//!
//! Every user-visible change to the outline or the page links goes through a
//! [`NavigationCommand`]. The command runs the same service methods a direct
//! caller would, and captures just enough state on the way to invert itself.

use crate::{
    CommandError, CreateBookmark, CreateLink, DeleteBookmark, DeleteLink, MoveBookmark,
    ReplaceBookmarks, Result, ToggleExpanded, UpdateBookmark, UpdateLink,
};
use outline_model::{BookmarkNode, OutlineDocument, PageLink};
use serde::{Deserialize, Serialize};

/// Lifecycle of a command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandState {
    /// Built but never executed
    #[default]
    NotRun,
    /// Executed and not yet undone
    Executed,
    /// Undone; executing again redoes it
    Undone,
}

/// What a command produced
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    /// The affected bookmark after the change
    Bookmark(BookmarkNode),
    /// A set of bookmarks removed or restored together
    Bookmarks(Vec<BookmarkNode>),
    /// The affected link after the change
    Link(PageLink),
    /// New expanded state
    Expanded(bool),
    /// Nothing to report
    Done,
}

/// One variant per command kind, each carrying its undo capture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CommandOp {
    CreateBookmark(CreateBookmark),
    UpdateBookmark(UpdateBookmark),
    DeleteBookmark(DeleteBookmark),
    MoveBookmark(MoveBookmark),
    ToggleExpanded(ToggleExpanded),
    ReplaceBookmarks(ReplaceBookmarks),
    CreateLink(CreateLink),
    UpdateLink(UpdateLink),
    DeleteLink(DeleteLink),
}

impl CommandOp {
    /// Label for Undo/Redo menu entries
    pub fn display_name(&self) -> &'static str {
        match self {
            CommandOp::CreateBookmark(_) => "Create Bookmark",
            CommandOp::UpdateBookmark(cmd) => cmd.display_name(),
            CommandOp::DeleteBookmark(_) => "Delete Bookmark",
            CommandOp::MoveBookmark(cmd) => cmd.display_name(),
            CommandOp::ToggleExpanded(_) => "Toggle Bookmark",
            CommandOp::ReplaceBookmarks(cmd) => cmd.display_name(),
            CommandOp::CreateLink(_) => "Create Link",
            CommandOp::UpdateLink(_) => "Edit Link",
            CommandOp::DeleteLink(_) => "Delete Link",
        }
    }
}

/// A state-checked, single-step undoable command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationCommand {
    op: CommandOp,
    state: CommandState,
}

impl NavigationCommand {
    pub fn new(op: CommandOp) -> Self {
        Self {
            op,
            state: CommandState::NotRun,
        }
    }

    pub fn op(&self) -> &CommandOp {
        &self.op
    }

    pub fn state(&self) -> CommandState {
        self.state
    }

    pub fn display_name(&self) -> &'static str {
        self.op.display_name()
    }

    /// Apply the command. Allowed once, and again after each undo (redo).
    ///
    /// On failure the document and the command state are unchanged.
    pub fn execute(&mut self, document: &mut OutlineDocument) -> Result<CommandOutput> {
        if self.state == CommandState::Executed {
            return Err(CommandError::AlreadyExecuted(self.display_name().into()));
        }
        let output = match &mut self.op {
            CommandOp::CreateBookmark(cmd) => cmd.execute(&mut document.bookmarks),
            CommandOp::UpdateBookmark(cmd) => cmd.execute(&mut document.bookmarks),
            CommandOp::DeleteBookmark(cmd) => cmd.execute(&mut document.bookmarks),
            CommandOp::MoveBookmark(cmd) => cmd.execute(&mut document.bookmarks),
            CommandOp::ToggleExpanded(cmd) => cmd.execute(&mut document.bookmarks),
            CommandOp::ReplaceBookmarks(cmd) => cmd.execute(&mut document.bookmarks),
            CommandOp::CreateLink(cmd) => cmd.execute(&mut document.links),
            CommandOp::UpdateLink(cmd) => cmd.execute(&mut document.links),
            CommandOp::DeleteLink(cmd) => cmd.execute(&mut document.links),
        }?;
        self.state = CommandState::Executed;
        tracing::debug!(target: "outline::commands", command = self.display_name(), "executed");
        Ok(output)
    }

    /// Revert the last execution. Requires a prior successful execute.
    pub fn undo(&mut self, document: &mut OutlineDocument) -> Result<CommandOutput> {
        if self.state != CommandState::Executed {
            return Err(CommandError::NotExecuted(self.display_name().into()));
        }
        let output = match &mut self.op {
            CommandOp::CreateBookmark(cmd) => cmd.undo(&mut document.bookmarks),
            CommandOp::UpdateBookmark(cmd) => cmd.undo(&mut document.bookmarks),
            CommandOp::DeleteBookmark(cmd) => cmd.undo(&mut document.bookmarks),
            CommandOp::MoveBookmark(cmd) => cmd.undo(&mut document.bookmarks),
            CommandOp::ToggleExpanded(cmd) => cmd.undo(&mut document.bookmarks),
            CommandOp::ReplaceBookmarks(cmd) => cmd.undo(&mut document.bookmarks),
            CommandOp::CreateLink(cmd) => cmd.undo(&mut document.links),
            CommandOp::UpdateLink(cmd) => cmd.undo(&mut document.links),
            CommandOp::DeleteLink(cmd) => cmd.undo(&mut document.links),
        }?;
        self.state = CommandState::Undone;
        tracing::debug!(target: "outline::commands", command = self.display_name(), "undone");
        Ok(output)
    }
}

impl From<CommandOp> for NavigationCommand {
    fn from(op: CommandOp) -> Self {
        Self::new(op)
    }
}

/// Error for a capture that should exist after a successful execute
pub(crate) fn missing_capture(name: &str) -> CommandError {
    CommandError::NotExecuted(name.to_string())
}
