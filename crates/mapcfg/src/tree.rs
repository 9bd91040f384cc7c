//! # Tree Model
//!
//! A [`Tree`] owns one root [`Group`] and is the only way to mutate it. Every
//! zone holds exactly one tree; for single-level zones (tool slots) the root
//! group simply never receives subgroups.
//!
//! ## Ordering
//!
//! Sibling order is positional. `insert` and `remove` splice the owning `Vec`,
//! so the vacated and the receiving sibling lists are reindexed as part of the
//! mutation itself and every sibling sequence stays `0..n-1`.
//!
//! An insert index addresses the list the node lands in: `items` for an item,
//! `subgroups` for a group. Indexes past the end append.
//!
//! ## Cycles
//!
//! A group can never be inserted into itself or one of its descendants. The
//! check runs before anything is touched, so a failed insert leaves the tree
//! unchanged.

use serde::Serialize;

use crate::error::{MapcfgError, Result};
use crate::index;
use crate::model::{Group, Item, Node, NodeId, NodeKind};

/// Location of a node: its ancestor chain and sibling position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodePath {
    /// Ids from the root group down to the node itself (inclusive).
    pub chain: Vec<NodeId>,
    /// Position among the siblings of the same list (items or subgroups).
    pub index: usize,
    pub kind: NodeKind,
}

impl NodePath {
    pub fn node(&self) -> &NodeId {
        // chain always holds at least the node itself
        &self.chain[self.chain.len() - 1]
    }

    pub fn parent(&self) -> Option<&NodeId> {
        self.chain.len().checked_sub(2).map(|i| &self.chain[i])
    }

    /// Number of groups above the node (0 for the root group).
    pub fn depth(&self) -> usize {
        self.chain.len() - 1
    }

    /// True if `id` is the node itself or one of its ancestors.
    pub fn passes_through(&self, id: &NodeId) -> bool {
        self.chain.contains(id)
    }
}

/// One row of a structural snapshot: which node sits where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub index: usize,
    pub kind: NodeKind,
}

/// Borrowed view of a node found in a tree.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Item(&'a Item),
    Group(&'a Group),
}

impl NodeRef<'_> {
    pub fn to_node(self) -> Node {
        match self {
            NodeRef::Item(item) => Node::Item(item.clone()),
            NodeRef::Group(group) => Node::Group(group.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    root: Group,
}

impl Tree {
    pub fn new(root_id: impl Into<NodeId>) -> Self {
        Self {
            root: Group::new(root_id),
        }
    }

    /// Adopts an existing group hierarchy, rejecting duplicate ids.
    pub fn from_root(root: Group) -> Result<Self> {
        let mut seen = std::collections::HashSet::new();
        for id in root.subtree_ids() {
            if !seen.insert(id.clone()) {
                return Err(MapcfgError::DuplicateId(id));
            }
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Group {
        &self.root
    }

    pub fn root_id(&self) -> &NodeId {
        &self.root.id
    }

    pub fn into_root(self) -> Group {
        self.root
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.find(id).is_some()
    }

    pub fn group(&self, id: &NodeId) -> Option<&Group> {
        self.root.find_group(id)
    }

    /// Every id in the tree, pre-order, starting with the root group.
    pub fn ids(&self) -> Vec<NodeId> {
        self.root.subtree_ids()
    }

    pub fn len_items(&self) -> usize {
        index::flatten(&self.root).len()
    }

    /// Returns the ancestor chain (root..node) and sibling position of `id`.
    pub fn find(&self, id: &NodeId) -> Option<NodePath> {
        let mut chain = vec![self.root.id.clone()];
        if &self.root.id == id {
            return Some(NodePath {
                chain,
                index: 0,
                kind: NodeKind::Group,
            });
        }
        locate(&self.root, id, &mut chain).map(|(index, kind)| NodePath { chain, index, kind })
    }

    pub fn get(&self, id: &NodeId) -> Option<NodeRef<'_>> {
        let path = self.find(id)?;
        let parent = match path.parent() {
            Some(parent) => self.root.find_group(parent)?,
            None => return Some(NodeRef::Group(&self.root)),
        };
        match path.kind {
            NodeKind::Item(_) => parent.items.get(path.index).map(NodeRef::Item),
            NodeKind::Group => parent.subgroups.get(path.index).map(NodeRef::Group),
        }
    }

    pub(crate) fn get_item_mut(&mut self, id: &NodeId) -> Option<&mut Item> {
        let path = self.find(id)?;
        if !matches!(path.kind, NodeKind::Item(_)) {
            return None;
        }
        let parent = self.root.find_group_mut(path.parent()?)?;
        parent.items.get_mut(path.index)
    }

    /// Inserts `node` into group `into` at `at`, returning the index it landed on.
    pub fn insert(&mut self, node: Node, into: &NodeId, at: usize) -> Result<usize> {
        if let Node::Group(group) = &node {
            if group.find_group(into).is_some() {
                return Err(MapcfgError::Cycle {
                    node: group.id.clone(),
                    target: into.clone(),
                });
            }
        }

        if self.group(into).is_none() {
            return Err(MapcfgError::not_found(into, format!("tree '{}'", self.root.id)));
        }

        if let Some(dup) = node.subtree_ids().into_iter().find(|id| self.contains(id)) {
            return Err(MapcfgError::DuplicateId(dup));
        }

        let target = self
            .root
            .find_group_mut(into)
            .ok_or_else(|| MapcfgError::not_found(into, "tree"))?;

        let index = match node {
            Node::Item(item) => {
                let index = at.min(target.items.len());
                target.items.insert(index, item);
                index
            }
            Node::Group(group) => {
                let index = at.min(target.subgroups.len());
                target.subgroups.insert(index, group);
                index
            }
        };
        Ok(index)
    }

    /// Detaches `id` (with its whole subtree, for groups) and returns it.
    pub fn remove(&mut self, id: &NodeId) -> Result<Node> {
        let path = self
            .find(id)
            .ok_or_else(|| MapcfgError::not_found(id, format!("tree '{}'", self.root.id)))?;

        let Some(parent_id) = path.parent().cloned() else {
            return Err(MapcfgError::Api(format!(
                "The root group '{}' cannot be removed",
                id
            )));
        };

        let parent = self
            .root
            .find_group_mut(&parent_id)
            .ok_or_else(|| MapcfgError::not_found(&parent_id, "tree"))?;

        Ok(match path.kind {
            NodeKind::Item(_) => Node::Item(parent.items.remove(path.index)),
            NodeKind::Group => Node::Group(parent.subgroups.remove(path.index)),
        })
    }

    /// Materialized content of a group: own items, then each subgroup's, recursively.
    pub fn materialize(&self, group_id: &NodeId) -> Result<Vec<Item>> {
        let group = self
            .group(group_id)
            .ok_or_else(|| MapcfgError::not_found(group_id, format!("tree '{}'", self.root.id)))?;
        Ok(index::flatten(group))
    }

    /// Direct items of a group with their sibling index.
    pub fn placements(&self, group_id: &NodeId) -> Result<Vec<(usize, &Item)>> {
        let group = self
            .group(group_id)
            .ok_or_else(|| MapcfgError::not_found(group_id, format!("tree '{}'", self.root.id)))?;
        Ok(group.items.iter().enumerate().collect())
    }

    /// Full structural snapshot (id, parent, position) of every node, pre-order.
    pub fn snapshot(&self) -> Vec<SnapshotEntry> {
        let mut entries = vec![SnapshotEntry {
            id: self.root.id.clone(),
            parent: None,
            index: 0,
            kind: NodeKind::Group,
        }];
        snapshot_group(&self.root, &mut entries);
        entries
    }
}

fn locate(group: &Group, id: &NodeId, chain: &mut Vec<NodeId>) -> Option<(usize, NodeKind)> {
    if let Some(index) = group.items.iter().position(|item| &item.id == id) {
        chain.push(id.clone());
        return Some((index, NodeKind::Item(group.items[index].kind)));
    }
    for (index, sub) in group.subgroups.iter().enumerate() {
        chain.push(sub.id.clone());
        if &sub.id == id {
            return Some((index, NodeKind::Group));
        }
        if let Some(found) = locate(sub, id, chain) {
            return Some(found);
        }
        chain.pop();
    }
    None
}

fn snapshot_group(group: &Group, entries: &mut Vec<SnapshotEntry>) {
    for (index, item) in group.items.iter().enumerate() {
        entries.push(SnapshotEntry {
            id: item.id.clone(),
            parent: Some(group.id.clone()),
            index,
            kind: NodeKind::Item(item.kind),
        });
    }
    for (index, sub) in group.subgroups.iter().enumerate() {
        entries.push(SnapshotEntry {
            id: sub.id.clone(),
            parent: Some(group.id.clone()),
            index,
            kind: NodeKind::Group,
        });
        snapshot_group(sub, entries);
    }
}
