//! Bookmark service - CRUD, traversal and reordering over the outline tree
//!
//! The service exclusively owns one [`BookmarkTree`]. Reads hand out copies;
//! writes validate every reference up front and only then mutate, so a failed
//! call leaves the tree exactly as it was.

use crate::{
    BookmarkId, BookmarkNode, BookmarkTree, BookmarkUpdate, EntityKind, NestedBookmark,
    NewBookmark, OutlineError, OutlineSettings, Placement, Result,
};
use std::collections::{HashMap, HashSet};

/// Owns and edits the outline of one open document
#[derive(Debug, Clone)]
pub struct BookmarkService {
    tree: BookmarkTree,
    /// Upper bound for destination pages; 0 disables the check
    page_count: u32,
    /// `is_open` for entries created without an explicit state
    default_open: bool,
    /// Reject malformed data in `import_bookmarks`
    validate_imports: bool,
}

impl BookmarkService {
    /// Create an empty outline for a document with `page_count` pages
    pub fn new(page_count: u32) -> Self {
        Self::with_settings(page_count, &OutlineSettings::default())
    }

    /// Create an empty outline using explicit settings
    pub fn with_settings(page_count: u32, settings: &OutlineSettings) -> Self {
        Self {
            tree: BookmarkTree::new(),
            page_count,
            default_open: settings.default_expanded,
            validate_imports: settings.validate_imports,
        }
    }

    /// Current page bound
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Update the page bound. Existing destinations are not re-validated.
    pub fn set_page_count(&mut self, page_count: u32) {
        self.page_count = page_count;
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Copy of the whole tree
    pub fn tree(&self) -> BookmarkTree {
        self.tree.clone()
    }

    /// Every bookmark in depth-first display order
    pub fn bookmarks(&self) -> Vec<BookmarkNode> {
        self.collect(self.tree.preorder())
    }

    /// Top-level bookmarks in display order
    pub fn root_bookmarks(&self) -> Vec<BookmarkNode> {
        self.collect(self.tree.root_ids().to_vec())
    }

    /// Get a bookmark by id
    pub fn bookmark(&self, id: BookmarkId) -> Option<BookmarkNode> {
        self.tree.get(id).cloned()
    }

    /// Direct children in order; empty for unknown ids
    pub fn children(&self, id: BookmarkId) -> Vec<BookmarkNode> {
        self.tree
            .get(id)
            .map(|n| self.collect(n.children_ids.clone()))
            .unwrap_or_default()
    }

    /// Every descendant in depth-first order, excluding `id` itself
    pub fn descendants(&self, id: BookmarkId) -> Vec<BookmarkNode> {
        self.collect(self.tree.descendant_ids(id))
    }

    /// Ancestors from the direct parent up to the root
    pub fn ancestors(&self, id: BookmarkId) -> Vec<BookmarkNode> {
        let mut out = Vec::new();
        let mut current = self.tree.get(id).and_then(|n| n.parent_id);
        while let Some(parent_id) = current {
            let Some(parent) = self.tree.get(parent_id) else {
                break;
            };
            out.push(parent.clone());
            current = parent.parent_id;
            if out.len() > self.tree.len() {
                break;
            }
        }
        out
    }

    /// Nesting level; roots (and unknown ids) are at depth 0
    pub fn depth(&self, id: BookmarkId) -> usize {
        self.ancestors(id).len()
    }

    /// Bookmarks whose destination is `page_number`, in display order
    pub fn bookmarks_for_page(&self, page_number: u32) -> Vec<BookmarkNode> {
        self.bookmarks()
            .into_iter()
            .filter(|b| b.page_number() == Some(page_number))
            .collect()
    }

    /// The outline with children embedded in their parents
    pub fn nested_tree(&self) -> Vec<NestedBookmark> {
        let mut roots = Vec::with_capacity(self.tree.root_ids().len());
        let mut visited = HashSet::with_capacity(self.tree.len());
        // Entries under construction with the index of their next child.
        // Finished entries fold into the frame below, so depth costs heap, not stack.
        let mut stack: Vec<(NestedBookmark, usize)> = Vec::new();

        for &root_id in self.tree.root_ids() {
            self.open_entry(root_id, &mut visited, &mut stack);
            loop {
                let Some((entry, next)) = stack.last_mut() else {
                    break;
                };
                match entry.bookmark.children_ids.get(*next).copied() {
                    Some(child_id) => {
                        *next += 1;
                        self.open_entry(child_id, &mut visited, &mut stack);
                    }
                    None => {
                        let Some((done, _)) = stack.pop() else {
                            break;
                        };
                        match stack.last_mut() {
                            Some((parent, _)) => parent.children.push(done),
                            None => roots.push(done),
                        }
                    }
                }
            }
        }
        roots
    }

    fn open_entry(
        &self,
        id: BookmarkId,
        visited: &mut HashSet<BookmarkId>,
        stack: &mut Vec<(NestedBookmark, usize)>,
    ) {
        // `visited` stops trusted-but-cyclic imports from looping
        if !visited.insert(id) {
            return;
        }
        if let Some(node) = self.tree.get(id) {
            let entry = NestedBookmark {
                bookmark: node.clone(),
                children: Vec::with_capacity(node.children_ids.len()),
            };
            stack.push((entry, 0));
        }
    }

    /// Bookmarks whose title equals `title`, ignoring case
    pub fn find_by_title(&self, title: &str) -> Vec<BookmarkNode> {
        let wanted = title.to_lowercase();
        self.bookmarks()
            .into_iter()
            .filter(|b| b.title.to_lowercase() == wanted)
            .collect()
    }

    /// Bookmarks whose title contains `query`, ignoring case
    pub fn search_by_title(&self, query: &str) -> Vec<BookmarkNode> {
        let needle = query.to_lowercase();
        self.bookmarks()
            .into_iter()
            .filter(|b| b.title.to_lowercase().contains(&needle))
            .collect()
    }

    /// Number of bookmarks
    pub fn count(&self) -> usize {
        self.tree.len()
    }

    /// Check if the outline has any entries
    pub fn has_bookmarks(&self) -> bool {
        !self.tree.is_empty()
    }

    /// Flat snapshot for external serialization, in display order.
    ///
    /// Records an unvalidated import left unreachable from the roots are not
    /// displayed but still exported, after the displayed ones and sorted by id.
    pub fn export_bookmarks(&self) -> Vec<BookmarkNode> {
        let mut ids = self.tree.preorder();
        if ids.len() < self.tree.len() {
            let reached: HashSet<BookmarkId> = ids.iter().copied().collect();
            let mut stray: Vec<BookmarkId> = self
                .tree
                .ids()
                .filter(|id| !reached.contains(id))
                .collect();
            stray.sort();
            ids.extend(stray);
        }
        self.collect(ids)
    }

    fn collect(&self, ids: Vec<BookmarkId>) -> Vec<BookmarkNode> {
        ids.into_iter()
            .filter_map(|id| self.tree.get(id).cloned())
            .collect()
    }

    fn require(&self, id: BookmarkId) -> Result<&BookmarkNode> {
        self.tree
            .get(id)
            .ok_or_else(|| OutlineError::not_found(EntityKind::Bookmark, id))
    }

    // ========================================================================
    // Field edits
    // ========================================================================

    /// Create a bookmark
    pub fn create(&mut self, params: NewBookmark) -> Result<BookmarkNode> {
        if let Some(destination) = &params.destination {
            destination.validate(self.page_count)?;
        }
        if let Some(parent_id) = params.parent_id {
            if !self.tree.contains(parent_id) {
                return Err(OutlineError::not_found(EntityKind::Parent, parent_id));
            }
        }
        if let Placement::After(sibling_id) = params.placement {
            if !self.tree.contains(sibling_id) {
                return Err(OutlineError::not_found(EntityKind::Sibling, sibling_id));
            }
        }

        let mut node = BookmarkNode::new(params.title);
        node.parent_id = params.parent_id;
        node.destination = params.destination;
        node.action = params.action;
        node.style = params.style;
        node.is_open = params.is_open.unwrap_or(self.default_open);
        let id = node.id;

        self.tree.insert_node(node);
        self.attach(id, params.parent_id, params.placement);

        tracing::debug!(target: "outline::service", %id, "bookmark created");
        self.require(id).cloned()
    }

    /// Merge the supplied fields into a bookmark. Never changes its position.
    pub fn update(&mut self, id: BookmarkId, update: BookmarkUpdate) -> Result<BookmarkNode> {
        self.require(id)?;
        if let Some(Some(destination)) = &update.destination {
            destination.validate(self.page_count)?;
        }

        let node = self
            .tree
            .get_mut(id)
            .ok_or_else(|| OutlineError::not_found(EntityKind::Bookmark, id))?;
        update.apply_to(node);
        node.touch();

        tracing::debug!(target: "outline::service", %id, "bookmark updated");
        Ok(node.clone())
    }

    /// Change a bookmark's title
    pub fn rename(&mut self, id: BookmarkId, title: impl Into<String>) -> Result<BookmarkNode> {
        self.update(id, BookmarkUpdate::title(title))
    }

    /// Flip the expanded state. Returns the new state, or `None` for unknown ids.
    pub fn toggle_expanded(&mut self, id: BookmarkId) -> Option<bool> {
        let node = self.tree.get_mut(id)?;
        node.is_open = !node.is_open;
        Some(node.is_open)
    }

    /// Expand every entry
    pub fn expand_all(&mut self) {
        self.tree.nodes_mut().for_each(|n| n.is_open = true);
    }

    /// Collapse every entry
    pub fn collapse_all(&mut self) {
        self.tree.nodes_mut().for_each(|n| n.is_open = false);
    }

    // ========================================================================
    // Removal
    // ========================================================================

    /// Delete a bookmark and its whole subtree.
    ///
    /// Returns the removed nodes in depth-first order, the deleted entry first.
    pub fn delete(&mut self, id: BookmarkId) -> Result<Vec<BookmarkNode>> {
        let parent_id = self.require(id)?.parent_id;

        let mut doomed = vec![id];
        doomed.extend(self.tree.descendant_ids(id));

        self.detach(id, parent_id);
        let removed: Vec<BookmarkNode> = doomed
            .into_iter()
            .filter_map(|doomed_id| self.tree.remove_node(doomed_id))
            .collect();

        tracing::debug!(
            target: "outline::service",
            %id,
            removed = removed.len(),
            "bookmark deleted"
        );
        Ok(removed)
    }

    /// Remove every bookmark
    pub fn delete_all(&mut self) {
        self.tree.clear();
        tracing::debug!(target: "outline::service", "all bookmarks deleted");
    }

    // ========================================================================
    // Structure
    // ========================================================================

    /// Reparent a bookmark.
    ///
    /// `insert_after_id` names the sibling to land after; when it is absent or
    /// not in the destination list the bookmark is appended.
    pub fn move_bookmark(
        &mut self,
        id: BookmarkId,
        new_parent_id: Option<BookmarkId>,
        insert_after_id: Option<BookmarkId>,
    ) -> Result<BookmarkNode> {
        self.move_to(id, new_parent_id, Placement::after(insert_after_id))
    }

    /// Reparent a bookmark to an explicit placement within the new parent
    pub fn move_to(
        &mut self,
        id: BookmarkId,
        new_parent_id: Option<BookmarkId>,
        placement: Placement,
    ) -> Result<BookmarkNode> {
        let old_parent_id = self.require(id)?.parent_id;
        if let Some(parent_id) = new_parent_id {
            if !self.tree.contains(parent_id) {
                return Err(OutlineError::not_found(EntityKind::Parent, parent_id));
            }
            if parent_id == id {
                return Err(OutlineError::InvariantViolation(format!(
                    "{id} cannot become its own parent"
                )));
            }
            if self.tree.is_descendant_of(parent_id, id) {
                return Err(OutlineError::InvariantViolation(format!(
                    "{parent_id} is a descendant of {id}"
                )));
            }
        }

        // Detach fully before reattaching so the node is never listed twice
        self.detach(id, old_parent_id);
        if let Some(node) = self.tree.get_mut(id) {
            node.parent_id = new_parent_id;
        }
        self.attach(id, new_parent_id, placement);
        self.touch(id);

        tracing::debug!(target: "outline::service", %id, parent = ?new_parent_id, "bookmark moved");
        self.require(id).cloned()
    }

    /// Swap with the previous sibling
    pub fn move_up(&mut self, id: BookmarkId) -> Result<BookmarkNode> {
        let (parent_id, position) = self.position_of(id)?;
        if position == 0 {
            return Err(OutlineError::InvalidOperation(format!(
                "{id} is already the first among its siblings"
            )));
        }
        self.swap_siblings(id, parent_id, position, position - 1)
    }

    /// Swap with the next sibling
    pub fn move_down(&mut self, id: BookmarkId) -> Result<BookmarkNode> {
        let (parent_id, position) = self.position_of(id)?;
        let len = self.tree.siblings(parent_id).map_or(0, <[BookmarkId]>::len);
        if position + 1 >= len {
            return Err(OutlineError::InvalidOperation(format!(
                "{id} is already the last among its siblings"
            )));
        }
        self.swap_siblings(id, parent_id, position, position + 1)
    }

    /// Make a bookmark the last child of its previous sibling
    pub fn indent(&mut self, id: BookmarkId) -> Result<BookmarkNode> {
        let (parent_id, position) = self.position_of(id)?;
        if position == 0 {
            return Err(OutlineError::InvalidOperation(format!(
                "{id} has no previous sibling to indent under"
            )));
        }
        let previous = self
            .tree
            .siblings(parent_id)
            .and_then(|list| list.get(position - 1).copied())
            .ok_or_else(|| OutlineError::not_found(EntityKind::Sibling, id))?;
        self.move_bookmark(id, Some(previous), None)
    }

    /// Make a bookmark the sibling immediately after its current parent
    pub fn outdent(&mut self, id: BookmarkId) -> Result<BookmarkNode> {
        let parent_id = self.require(id)?.parent_id.ok_or_else(|| {
            OutlineError::InvalidOperation(format!("{id} is already at the top level"))
        })?;
        let grandparent_id = self.require(parent_id)?.parent_id;
        self.move_bookmark(id, grandparent_id, Some(parent_id))
    }

    fn position_of(&self, id: BookmarkId) -> Result<(Option<BookmarkId>, usize)> {
        let parent_id = self.require(id)?.parent_id;
        let position = self
            .tree
            .siblings(parent_id)
            .and_then(|list| list.iter().position(|&member| member == id))
            .ok_or_else(|| {
                OutlineError::InvariantViolation(format!("{id} is missing from its sibling list"))
            })?;
        Ok((parent_id, position))
    }

    fn swap_siblings(
        &mut self,
        id: BookmarkId,
        parent_id: Option<BookmarkId>,
        a: usize,
        b: usize,
    ) -> Result<BookmarkNode> {
        if let Some(list) = self.tree.siblings_mut(parent_id) {
            list.swap(a, b);
        }
        self.tree.reindex(parent_id);
        self.touch(id);
        tracing::debug!(target: "outline::service", %id, from = a, to = b, "bookmark reordered");
        self.require(id).cloned()
    }

    /// Remove `id` from the list that holds it and reindex that list
    fn detach(&mut self, id: BookmarkId, parent_id: Option<BookmarkId>) {
        if let Some(list) = self.tree.siblings_mut(parent_id) {
            list.retain(|&member| member != id);
        }
        self.tree.reindex(parent_id);
    }

    /// Splice `id` into the children of `parent_id` and reindex that list
    fn attach(&mut self, id: BookmarkId, parent_id: Option<BookmarkId>, placement: Placement) {
        if let Some(list) = self.tree.siblings_mut(parent_id) {
            let index = match placement {
                Placement::Last => list.len(),
                Placement::First => 0,
                Placement::After(sibling) => list
                    .iter()
                    .position(|&member| member == sibling)
                    .map_or(list.len(), |i| i + 1),
            };
            list.insert(index, id);
        }
        self.tree.reindex(parent_id);
    }

    fn touch(&mut self, id: BookmarkId) {
        if let Some(node) = self.tree.get_mut(id) {
            node.touch();
        }
    }

    // ========================================================================
    // Bulk exchange
    // ========================================================================

    /// Replace the whole outline with externally supplied records.
    ///
    /// Records keep their ids, fields and timestamps. Root order follows
    /// `order_index`; child order follows each record's `children_ids`.
    /// With import validation on, malformed data is rejected and the current
    /// outline is kept.
    pub fn import_bookmarks(&mut self, bookmarks: Vec<BookmarkNode>) -> Result<()> {
        let count = bookmarks.len();
        let mut nodes: HashMap<BookmarkId, BookmarkNode> = HashMap::with_capacity(count);
        for node in bookmarks {
            let id = node.id;
            if nodes.insert(id, node).is_some() && self.validate_imports {
                return Err(OutlineError::InvariantViolation(format!(
                    "duplicate bookmark id {id} in import"
                )));
            }
        }

        let mut roots: Vec<(usize, BookmarkId)> = nodes
            .values()
            .filter(|n| n.parent_id.is_none())
            .map(|n| (n.order_index, n.id))
            .collect();
        roots.sort();
        let root_ids = roots.into_iter().map(|(_, id)| id).collect();

        let mut tree = BookmarkTree::from_parts(nodes, root_ids);
        if self.validate_imports {
            for parent in std::iter::once(None).chain(tree.preorder().into_iter().map(Some)) {
                tree.reindex(parent);
            }
            if let Err(err) = tree.validate() {
                tracing::debug!(target: "outline::service", error = %err, "import rejected");
                return Err(err);
            }
        }

        self.tree = tree;
        tracing::debug!(target: "outline::service", count, "bookmarks imported");
        Ok(())
    }

    /// Put a previously deleted subtree back where it was.
    ///
    /// `nodes` is the output of [`delete`](Self::delete): the top entry keeps
    /// its recorded parent and is spliced in at its recorded `order_index`.
    pub fn restore_bookmarks(&mut self, nodes: Vec<BookmarkNode>) -> Result<()> {
        if nodes.is_empty() {
            return Ok(());
        }

        let incoming: HashSet<BookmarkId> = nodes.iter().map(|n| n.id).collect();
        if let Some(existing) = nodes.iter().find(|n| self.tree.contains(n.id)) {
            return Err(OutlineError::InvariantViolation(format!(
                "{} already exists",
                existing.id
            )));
        }

        let mut tops: Vec<(usize, BookmarkId, Option<BookmarkId>)> = Vec::new();
        for node in &nodes {
            match node.parent_id {
                Some(parent_id) if incoming.contains(&parent_id) => {}
                Some(parent_id) if !self.tree.contains(parent_id) => {
                    return Err(OutlineError::not_found(EntityKind::Parent, parent_id));
                }
                parent_id => tops.push((node.order_index, node.id, parent_id)),
            }
        }
        tops.sort_by_key(|&(order_index, _, _)| order_index);

        let mut candidate = self.tree.clone();
        for node in nodes {
            candidate.insert_node(node);
        }
        for (order_index, id, parent_id) in tops {
            if let Some(list) = candidate.siblings_mut(parent_id) {
                let index = order_index.min(list.len());
                list.insert(index, id);
            }
            candidate.reindex(parent_id);
        }
        candidate.validate()?;

        self.tree = candidate;
        tracing::debug!(target: "outline::service", count = incoming.len(), "bookmarks restored");
        Ok(())
    }
}
