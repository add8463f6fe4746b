//! Command factory
//!
//! Callers build commands here instead of assembling `CommandOp` variants by
//! hand, so every command starts in the `NotRun` state with empty captures.

use crate::{
    CommandOp, CreateBookmark, CreateLink, DeleteBookmark, DeleteLink, MoveBookmark, MoveKind,
    NavigationCommand, ReplaceBookmarks, ToggleExpanded, UpdateBookmark, UpdateLink,
};
use outline_model::{
    BookmarkId, BookmarkNode, BookmarkUpdate, LinkId, LinkUpdate, NewBookmark, NewLink,
};

/// Builds navigation commands for bookmarks and page links
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandFactory;

impl CommandFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn create_bookmark(&self, params: NewBookmark) -> NavigationCommand {
        CommandOp::CreateBookmark(CreateBookmark::new(params)).into()
    }

    pub fn update_bookmark(&self, id: BookmarkId, update: BookmarkUpdate) -> NavigationCommand {
        CommandOp::UpdateBookmark(UpdateBookmark::new(id, update)).into()
    }

    pub fn rename_bookmark(&self, id: BookmarkId, title: impl Into<String>) -> NavigationCommand {
        self.update_bookmark(id, BookmarkUpdate::title(title))
    }

    pub fn delete_bookmark(&self, id: BookmarkId) -> NavigationCommand {
        CommandOp::DeleteBookmark(DeleteBookmark::new(id)).into()
    }

    pub fn move_bookmark(
        &self,
        id: BookmarkId,
        parent_id: Option<BookmarkId>,
        insert_after: Option<BookmarkId>,
    ) -> NavigationCommand {
        self.reposition(
            id,
            MoveKind::To {
                parent_id,
                insert_after,
            },
        )
    }

    pub fn move_up(&self, id: BookmarkId) -> NavigationCommand {
        self.reposition(id, MoveKind::Up)
    }

    pub fn move_down(&self, id: BookmarkId) -> NavigationCommand {
        self.reposition(id, MoveKind::Down)
    }

    pub fn indent(&self, id: BookmarkId) -> NavigationCommand {
        self.reposition(id, MoveKind::Indent)
    }

    pub fn outdent(&self, id: BookmarkId) -> NavigationCommand {
        self.reposition(id, MoveKind::Outdent)
    }

    fn reposition(&self, id: BookmarkId, kind: MoveKind) -> NavigationCommand {
        CommandOp::MoveBookmark(MoveBookmark::new(id, kind)).into()
    }

    pub fn toggle_expanded(&self, id: BookmarkId) -> NavigationCommand {
        CommandOp::ToggleExpanded(ToggleExpanded::new(id)).into()
    }

    pub fn import_bookmarks(&self, bookmarks: Vec<BookmarkNode>) -> NavigationCommand {
        CommandOp::ReplaceBookmarks(ReplaceBookmarks::import(bookmarks)).into()
    }

    pub fn delete_all_bookmarks(&self) -> NavigationCommand {
        CommandOp::ReplaceBookmarks(ReplaceBookmarks::delete_all()).into()
    }

    pub fn create_link(&self, params: NewLink) -> NavigationCommand {
        CommandOp::CreateLink(CreateLink::new(params)).into()
    }

    pub fn update_link(&self, id: LinkId, update: LinkUpdate) -> NavigationCommand {
        CommandOp::UpdateLink(UpdateLink::new(id, update)).into()
    }

    pub fn delete_link(&self, id: LinkId) -> NavigationCommand {
        CommandOp::DeleteLink(DeleteLink::new(id)).into()
    }
}
