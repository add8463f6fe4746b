//! Bookmark - a named navigation entry in the document outline
//!
//! A bookmark optionally points at a page (and a view position on that page)
//! or at a non-page action. Bookmarks form a tree; relationships are stored
//! as ids so the tree can live in a flat id-keyed table.

use crate::{BookmarkId, OutlineError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where on the target page the viewer should land
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewPosition {
    /// Horizontal offset in points from the left edge
    pub left: Option<f64>,
    /// Vertical offset in points from the top edge
    pub top: Option<f64>,
    /// Zoom factor (1.0 = 100%); `None` keeps the current zoom
    pub zoom: Option<f64>,
}

impl ViewPosition {
    /// View anchored at a vertical offset, keeping horizontal scroll and zoom
    pub fn top(top: f64) -> Self {
        Self {
            left: None,
            top: Some(top),
            zoom: None,
        }
    }
}

/// A page number plus an optional view position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    /// 1-based page number
    pub page_number: u32,
    pub view: Option<ViewPosition>,
}

impl Destination {
    /// Destination at the top of a page
    pub fn page(page_number: u32) -> Self {
        Self {
            page_number,
            view: None,
        }
    }

    /// Destination at a page with an explicit view
    pub fn with_view(page_number: u32, view: ViewPosition) -> Self {
        Self {
            page_number,
            view: Some(view),
        }
    }

    /// Check the page number against the document's page count.
    ///
    /// A page count of zero means the host has not reported one yet, and
    /// every page number is accepted.
    pub fn validate(&self, page_count: u32) -> Result<()> {
        if page_count > 0 && (self.page_number == 0 || self.page_number > page_count) {
            return Err(OutlineError::InvalidDestination {
                page: self.page_number,
                page_count,
            });
        }
        Ok(())
    }
}

/// A non-page target for a bookmark
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookmarkAction {
    /// Open a URI
    Uri(String),
    /// Run a viewer-defined named action (e.g. "NextPage")
    Named(String),
    /// Jump to a page in another file
    RemoteGoTo { file: String, page_number: u32 },
    /// Launch an external file or application
    Launch(String),
}

/// Text styling of an outline entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkStyle {
    pub bold: bool,
    pub italic: bool,
    /// RGB text color; `None` uses the viewer default
    pub color: Option<[u8; 3]>,
}

impl BookmarkStyle {
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Self::default()
        }
    }

    pub fn italic() -> Self {
        Self {
            italic: true,
            ..Self::default()
        }
    }
}

/// A single entry in the outline tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkNode {
    pub id: BookmarkId,
    pub title: String,
    /// `None` for root entries
    pub parent_id: Option<BookmarkId>,
    /// Ordered child ids
    pub children_ids: Vec<BookmarkId>,
    /// Whether the entry is shown expanded (presentation only)
    pub is_open: bool,
    pub destination: Option<Destination>,
    pub action: Option<BookmarkAction>,
    pub style: BookmarkStyle,
    /// Position among siblings, kept in sync with the owning list
    pub order_index: usize,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl BookmarkNode {
    /// Create a detached root entry with a fresh id
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: BookmarkId::new(),
            title: title.into(),
            parent_id: None,
            children_ids: Vec::new(),
            is_open: true,
            destination: None,
            action: None,
            style: BookmarkStyle::default(),
            order_index: 0,
            created_at: now,
            modified_at: now,
        }
    }

    /// Check if this entry sits at the top level
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Check if this entry has children
    pub fn has_children(&self) -> bool {
        !self.children_ids.is_empty()
    }

    /// The destination page, if any
    pub fn page_number(&self) -> Option<u32> {
        self.destination.map(|d| d.page_number)
    }

    pub(crate) fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}

/// Where to put an entry within its sibling list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    /// Append after the last sibling
    #[default]
    Last,
    /// Insert before the first sibling
    First,
    /// Insert immediately after the given sibling; appends if it is not in the list
    After(BookmarkId),
}

impl Placement {
    /// Map an optional insert-after sibling to a placement
    pub fn after(sibling: Option<BookmarkId>) -> Self {
        match sibling {
            Some(id) => Placement::After(id),
            None => Placement::Last,
        }
    }
}

/// Parameters for creating a bookmark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBookmark {
    pub title: String,
    pub parent_id: Option<BookmarkId>,
    pub destination: Option<Destination>,
    pub action: Option<BookmarkAction>,
    pub style: BookmarkStyle,
    /// Initial expanded state; `None` uses the configured default
    pub is_open: Option<bool>,
    pub placement: Placement,
}

impl NewBookmark {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            parent_id: None,
            destination: None,
            action: None,
            style: BookmarkStyle::default(),
            is_open: None,
            placement: Placement::Last,
        }
    }

    /// Create as a child of `parent_id`
    pub fn under(mut self, parent_id: BookmarkId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Insert immediately after an existing sibling
    pub fn after(mut self, sibling_id: BookmarkId) -> Self {
        self.placement = Placement::After(sibling_id);
        self
    }

    pub fn placed(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn to_page(mut self, page_number: u32) -> Self {
        self.destination = Some(Destination::page(page_number));
        self
    }

    pub fn with_destination(mut self, destination: Destination) -> Self {
        self.destination = Some(destination);
        self
    }

    pub fn with_action(mut self, action: BookmarkAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_style(mut self, style: BookmarkStyle) -> Self {
        self.style = style;
        self
    }

    pub fn open(mut self, is_open: bool) -> Self {
        self.is_open = Some(is_open);
        self
    }
}

/// A partial field update. Only `Some` fields are applied.
///
/// Nullable fields use a nested `Option` so an update can clear them:
/// `destination: Some(None)` removes the destination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookmarkUpdate {
    pub title: Option<String>,
    pub destination: Option<Option<Destination>>,
    pub action: Option<Option<BookmarkAction>>,
    pub style: Option<BookmarkStyle>,
    pub is_open: Option<bool>,
}

impl BookmarkUpdate {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn destination(destination: Option<Destination>) -> Self {
        Self {
            destination: Some(destination),
            ..Self::default()
        }
    }

    /// An update that resets every editable field to the values in `node`
    pub fn from_node(node: &BookmarkNode) -> Self {
        Self {
            title: Some(node.title.clone()),
            destination: Some(node.destination),
            action: Some(node.action.clone()),
            style: Some(node.style),
            is_open: Some(node.is_open),
        }
    }

    /// Check if the update carries no fields
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.destination.is_none()
            && self.action.is_none()
            && self.style.is_none()
            && self.is_open.is_none()
    }

    pub(crate) fn apply_to(&self, node: &mut BookmarkNode) {
        if let Some(title) = &self.title {
            node.title = title.clone();
        }
        if let Some(destination) = self.destination {
            node.destination = destination;
        }
        if let Some(action) = &self.action {
            node.action = action.clone();
        }
        if let Some(style) = self.style {
            node.style = style;
        }
        if let Some(is_open) = self.is_open {
            node.is_open = is_open;
        }
    }
}

/// A bookmark with its children embedded, for presentation layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedBookmark {
    #[serde(flatten)]
    pub bookmark: BookmarkNode,
    pub children: Vec<NestedBookmark>,
}

impl NestedBookmark {
    pub fn title(&self) -> &str {
        &self.bookmark.title
    }

    /// Number of entries in this subtree, including this one
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(entry) = stack.pop() {
            count += 1;
            stack.extend(entry.children.iter());
        }
        count
    }
}

impl Drop for NestedBookmark {
    fn drop(&mut self) {
        // Unlink children one level at a time so dropping a deep outline
        // does not recurse once per level
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut entry) = pending.pop() {
            pending.append(&mut entry.children);
        }
    }
}
