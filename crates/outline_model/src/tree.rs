//! Bookmark tree storage
//!
//! Nodes live in a flat id-keyed table; parent/child relationships are stored
//! as ids on the nodes plus an explicit ordered list of root ids. The tree has
//! no business logic of its own: the [`BookmarkService`](crate::BookmarkService)
//! is the only writer, and it keeps the structural invariants intact.

use crate::{BookmarkId, BookmarkNode, OutlineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// The complete outline tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookmarkTree {
    /// Sole owner of node data
    nodes: HashMap<BookmarkId, BookmarkNode>,
    /// Top-level entries in display order
    root_ids: Vec<BookmarkId>,
}

impl BookmarkTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a node by id
    pub fn get(&self, id: BookmarkId) -> Option<&BookmarkNode> {
        self.nodes.get(&id)
    }

    /// Check if a node exists
    pub fn contains(&self, id: BookmarkId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Ordered top-level ids
    pub fn root_ids(&self) -> &[BookmarkId] {
        &self.root_ids
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The sibling list that holds children of `parent` (`None` = root list)
    pub fn siblings(&self, parent: Option<BookmarkId>) -> Option<&[BookmarkId]> {
        match parent {
            None => Some(&self.root_ids),
            Some(parent_id) => self.nodes.get(&parent_id).map(|n| n.children_ids.as_slice()),
        }
    }

    /// Every id in the node table, in no particular order
    pub fn ids(&self) -> impl Iterator<Item = BookmarkId> + '_ {
        self.nodes.keys().copied()
    }

    /// All ids in depth-first display order
    pub fn preorder(&self) -> Vec<BookmarkId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut visited = HashSet::with_capacity(self.nodes.len());
        for &root in &self.root_ids {
            self.collect_subtree(root, &mut out, &mut visited);
        }
        out
    }

    /// Ids of every descendant of `id` in depth-first order, excluding `id`
    pub fn descendant_ids(&self, id: BookmarkId) -> Vec<BookmarkId> {
        let mut out = Vec::new();
        let mut visited = HashSet::from([id]);
        if let Some(node) = self.nodes.get(&id) {
            for &child in &node.children_ids {
                self.collect_subtree(child, &mut out, &mut visited);
            }
        }
        out
    }

    fn collect_subtree(
        &self,
        id: BookmarkId,
        out: &mut Vec<BookmarkId>,
        visited: &mut HashSet<BookmarkId>,
    ) {
        // Explicit stack keeps deep outlines off the call stack; `visited`
        // stops trusted-but-cyclic imports from looping
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            let Some(node) = self.nodes.get(&current) else {
                continue;
            };
            out.push(current);
            stack.extend(node.children_ids.iter().rev().copied());
        }
    }

    /// Check whether `candidate` lies strictly below `ancestor`
    pub fn is_descendant_of(&self, candidate: BookmarkId, ancestor: BookmarkId) -> bool {
        let mut current = self.nodes.get(&candidate).and_then(|n| n.parent_id);
        // Bounded walk: a corrupt parent chain cannot loop forever
        for _ in 0..self.nodes.len() {
            match current {
                Some(id) if id == ancestor => return true,
                Some(id) => current = self.nodes.get(&id).and_then(|n| n.parent_id),
                None => return false,
            }
        }
        false
    }

    /// Check every structural invariant.
    ///
    /// - every listed id exists in the node table
    /// - each node is listed exactly once, in its parent's children or in the root list
    /// - children agree with their recorded parent
    /// - no node is its own ancestor
    /// - `order_index` equals the position in the owning list
    pub fn validate(&self) -> Result<()> {
        let mut seen: HashSet<BookmarkId> = HashSet::with_capacity(self.nodes.len());

        for (index, &root_id) in self.root_ids.iter().enumerate() {
            let node = self.nodes.get(&root_id).ok_or_else(|| {
                OutlineError::InvariantViolation(format!("root {root_id} is not in the node table"))
            })?;
            if node.parent_id.is_some() {
                return Err(OutlineError::InvariantViolation(format!(
                    "root {root_id} has a parent"
                )));
            }
            check_order(node, index)?;
        }

        let mut stack: Vec<BookmarkId> = self.root_ids.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                return Err(OutlineError::InvariantViolation(format!(
                    "{id} is listed more than once or sits on a cycle"
                )));
            }
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            for (index, &child_id) in node.children_ids.iter().enumerate() {
                let child = self.nodes.get(&child_id).ok_or_else(|| {
                    OutlineError::InvariantViolation(format!(
                        "child {child_id} of {id} is not in the node table"
                    ))
                })?;
                if child.parent_id != Some(id) {
                    return Err(OutlineError::InvariantViolation(format!(
                        "child {child_id} is listed under {id} but records a different parent"
                    )));
                }
                check_order(child, index)?;
            }
            stack.extend(node.children_ids.iter().rev().copied());
        }

        if seen.len() != self.nodes.len() {
            return Err(OutlineError::InvariantViolation(format!(
                "{} node(s) are unreachable from the root list",
                self.nodes.len() - seen.len()
            )));
        }

        Ok(())
    }

    // ========================================================================
    // Crate-internal mutation, used only by the services
    // ========================================================================

    pub(crate) fn from_parts(
        nodes: HashMap<BookmarkId, BookmarkNode>,
        root_ids: Vec<BookmarkId>,
    ) -> Self {
        Self { nodes, root_ids }
    }

    pub(crate) fn get_mut(&mut self, id: BookmarkId) -> Option<&mut BookmarkNode> {
        self.nodes.get_mut(&id)
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut BookmarkNode> {
        self.nodes.values_mut()
    }

    pub(crate) fn insert_node(&mut self, node: BookmarkNode) {
        self.nodes.insert(node.id, node);
    }

    pub(crate) fn remove_node(&mut self, id: BookmarkId) -> Option<BookmarkNode> {
        self.nodes.remove(&id)
    }

    pub(crate) fn siblings_mut(
        &mut self,
        parent: Option<BookmarkId>,
    ) -> Option<&mut Vec<BookmarkId>> {
        match parent {
            None => Some(&mut self.root_ids),
            Some(parent_id) => self.nodes.get_mut(&parent_id).map(|n| &mut n.children_ids),
        }
    }

    /// Rewrite `order_index` of every member of a sibling list to its position
    pub(crate) fn reindex(&mut self, parent: Option<BookmarkId>) {
        let ids = self
            .siblings(parent)
            .map(<[BookmarkId]>::to_vec)
            .unwrap_or_default();
        for (index, id) in ids.into_iter().enumerate() {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.order_index = index;
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root_ids.clear();
    }
}

fn check_order(node: &BookmarkNode, index: usize) -> Result<()> {
    if node.order_index != index {
        return Err(OutlineError::InvariantViolation(format!(
            "{} has order index {} but sits at position {}",
            node.id, node.order_index, index
        )));
    }
    Ok(())
}
