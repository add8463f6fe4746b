//! Bookmark commands for creating, editing, moving and removing outline entries
//!
//! Each command captures only what it needs to invert itself:
//! - create: the created id (and, once undone, the removed node for redo)
//! - update: the full pre-update node
//! - delete: the whole removed subtree
//! - move: the prior parent, position and sibling list

use crate::command::missing_capture;
use crate::{CommandOutput, Result};
use outline_model::{
    BookmarkId, BookmarkNode, BookmarkService, BookmarkUpdate, EntityKind, NewBookmark,
    OutlineError, Placement,
};
use serde::{Deserialize, Serialize};

fn lookup(service: &BookmarkService, id: BookmarkId) -> Result<BookmarkNode> {
    service
        .bookmark(id)
        .ok_or_else(|| OutlineError::not_found(EntityKind::Bookmark, id).into())
}

/// Create a bookmark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBookmark {
    pub params: NewBookmark,
    /// Id assigned on first execute
    created_id: Option<BookmarkId>,
    /// The node removed by undo, re-inserted verbatim on redo
    #[serde(default)]
    removed: Option<Vec<BookmarkNode>>,
}

impl CreateBookmark {
    pub fn new(params: NewBookmark) -> Self {
        Self {
            params,
            created_id: None,
            removed: None,
        }
    }

    /// Id of the created bookmark, once executed
    pub fn created_id(&self) -> Option<BookmarkId> {
        self.created_id
    }

    pub(crate) fn execute(&mut self, service: &mut BookmarkService) -> Result<CommandOutput> {
        if let Some(removed) = &self.removed {
            service.restore_bookmarks(removed.clone())?;
            self.removed = None;
            let id = self.created_id.ok_or_else(|| missing_capture("Create Bookmark"))?;
            return Ok(CommandOutput::Bookmark(lookup(service, id)?));
        }
        let node = service.create(self.params.clone())?;
        self.created_id = Some(node.id);
        Ok(CommandOutput::Bookmark(node))
    }

    pub(crate) fn undo(&mut self, service: &mut BookmarkService) -> Result<CommandOutput> {
        let id = self.created_id.ok_or_else(|| missing_capture("Create Bookmark"))?;
        let removed = service.delete(id)?;
        self.removed = Some(removed.clone());
        Ok(CommandOutput::Bookmarks(removed))
    }
}

/// Edit fields of a bookmark (title, destination, action, style, open state)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateBookmark {
    pub id: BookmarkId,
    pub update: BookmarkUpdate,
    /// Full node as it was before the last execute
    previous: Option<BookmarkNode>,
}

impl UpdateBookmark {
    pub fn new(id: BookmarkId, update: BookmarkUpdate) -> Self {
        Self {
            id,
            update,
            previous: None,
        }
    }

    pub(crate) fn display_name(&self) -> &'static str {
        let only_title = self.update.title.is_some()
            && BookmarkUpdate {
                title: None,
                ..self.update.clone()
            }
            .is_empty();
        if only_title {
            "Rename Bookmark"
        } else {
            "Edit Bookmark"
        }
    }

    pub(crate) fn execute(&mut self, service: &mut BookmarkService) -> Result<CommandOutput> {
        let previous = lookup(service, self.id)?;
        let node = service.update(self.id, self.update.clone())?;
        self.previous = Some(previous);
        Ok(CommandOutput::Bookmark(node))
    }

    pub(crate) fn undo(&mut self, service: &mut BookmarkService) -> Result<CommandOutput> {
        let previous = self
            .previous
            .as_ref()
            .ok_or_else(|| missing_capture(self.display_name()))?;
        let node = service.update(self.id, BookmarkUpdate::from_node(previous))?;
        Ok(CommandOutput::Bookmark(node))
    }
}

/// Delete a bookmark and its subtree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteBookmark {
    pub id: BookmarkId,
    /// Removed subtree, deleted entry first
    removed: Option<Vec<BookmarkNode>>,
}

impl DeleteBookmark {
    pub fn new(id: BookmarkId) -> Self {
        Self { id, removed: None }
    }

    pub(crate) fn execute(&mut self, service: &mut BookmarkService) -> Result<CommandOutput> {
        let removed = service.delete(self.id)?;
        self.removed = Some(removed.clone());
        Ok(CommandOutput::Bookmarks(removed))
    }

    pub(crate) fn undo(&mut self, service: &mut BookmarkService) -> Result<CommandOutput> {
        let removed = self
            .removed
            .clone()
            .ok_or_else(|| missing_capture("Delete Bookmark"))?;
        service.restore_bookmarks(removed.clone())?;
        Ok(CommandOutput::Bookmarks(removed))
    }
}

/// The structural change a move command performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveKind {
    /// Reparent, landing after `insert_after` (or last)
    To {
        parent_id: Option<BookmarkId>,
        insert_after: Option<BookmarkId>,
    },
    Up,
    Down,
    Indent,
    Outdent,
}

/// Where a bookmark sat before a move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOrigin {
    pub parent_id: Option<BookmarkId>,
    pub order_index: usize,
    /// The sibling list as it was, including the moved bookmark
    pub siblings: Vec<BookmarkId>,
}

impl MoveOrigin {
    /// Placement that puts the bookmark back at `order_index`.
    ///
    /// Raw indexes shift as siblings move, so the position is expressed as
    /// "after the sibling that preceded it".
    pub fn placement(&self) -> Placement {
        match self.order_index {
            0 => Placement::First,
            index => self
                .siblings
                .get(index - 1)
                .copied()
                .map_or(Placement::Last, Placement::After),
        }
    }
}

/// Reparent or reorder a bookmark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveBookmark {
    pub id: BookmarkId,
    pub kind: MoveKind,
    origin: Option<MoveOrigin>,
}

impl MoveBookmark {
    pub fn new(id: BookmarkId, kind: MoveKind) -> Self {
        Self {
            id,
            kind,
            origin: None,
        }
    }

    pub(crate) fn display_name(&self) -> &'static str {
        match self.kind {
            MoveKind::To { .. } => "Move Bookmark",
            MoveKind::Up => "Move Bookmark Up",
            MoveKind::Down => "Move Bookmark Down",
            MoveKind::Indent => "Indent Bookmark",
            MoveKind::Outdent => "Outdent Bookmark",
        }
    }

    pub(crate) fn execute(&mut self, service: &mut BookmarkService) -> Result<CommandOutput> {
        let node = lookup(service, self.id)?;
        let siblings = match node.parent_id {
            Some(parent_id) => service.children(parent_id),
            None => service.root_bookmarks(),
        }
        .into_iter()
        .map(|sibling| sibling.id)
        .collect();
        let origin = MoveOrigin {
            parent_id: node.parent_id,
            order_index: node.order_index,
            siblings,
        };

        let moved = match self.kind {
            MoveKind::To {
                parent_id,
                insert_after,
            } => service.move_bookmark(self.id, parent_id, insert_after),
            MoveKind::Up => service.move_up(self.id),
            MoveKind::Down => service.move_down(self.id),
            MoveKind::Indent => service.indent(self.id),
            MoveKind::Outdent => service.outdent(self.id),
        }?;
        self.origin = Some(origin);
        Ok(CommandOutput::Bookmark(moved))
    }

    pub(crate) fn undo(&mut self, service: &mut BookmarkService) -> Result<CommandOutput> {
        let origin = self
            .origin
            .as_ref()
            .ok_or_else(|| missing_capture(self.display_name()))?;
        let node = service.move_to(self.id, origin.parent_id, origin.placement())?;
        Ok(CommandOutput::Bookmark(node))
    }
}

/// Flip a bookmark's expanded state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleExpanded {
    pub id: BookmarkId,
}

impl ToggleExpanded {
    pub fn new(id: BookmarkId) -> Self {
        Self { id }
    }

    pub(crate) fn execute(&mut self, service: &mut BookmarkService) -> Result<CommandOutput> {
        service
            .toggle_expanded(self.id)
            .map(CommandOutput::Expanded)
            .ok_or_else(|| OutlineError::not_found(EntityKind::Bookmark, self.id).into())
    }

    pub(crate) fn undo(&mut self, service: &mut BookmarkService) -> Result<CommandOutput> {
        self.execute(service)
    }
}

/// Replace the whole outline (import), or clear it when `incoming` is `None`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplaceBookmarks {
    pub incoming: Option<Vec<BookmarkNode>>,
    /// Export taken just before the last execute
    previous: Option<Vec<BookmarkNode>>,
}

impl ReplaceBookmarks {
    pub fn import(bookmarks: Vec<BookmarkNode>) -> Self {
        Self {
            incoming: Some(bookmarks),
            previous: None,
        }
    }

    pub fn delete_all() -> Self {
        Self {
            incoming: None,
            previous: None,
        }
    }

    pub(crate) fn display_name(&self) -> &'static str {
        match self.incoming {
            Some(_) => "Import Bookmarks",
            None => "Delete All Bookmarks",
        }
    }

    pub(crate) fn execute(&mut self, service: &mut BookmarkService) -> Result<CommandOutput> {
        let previous = service.export_bookmarks();
        match &self.incoming {
            Some(bookmarks) => service.import_bookmarks(bookmarks.clone())?,
            None => service.delete_all(),
        }
        self.previous = Some(previous);
        Ok(CommandOutput::Done)
    }

    pub(crate) fn undo(&mut self, service: &mut BookmarkService) -> Result<CommandOutput> {
        let previous = self
            .previous
            .clone()
            .ok_or_else(|| missing_capture(self.display_name()))?;
        service.import_bookmarks(previous)?;
        Ok(CommandOutput::Done)
    }
}
