//! # Domain Model: Items, Groups and Overrides
//!
//! This module defines the core data types shared by every other module:
//! [`NodeId`], [`Item`], [`Group`], [`Node`], [`PlacementOverride`] and
//! [`Candidate`].
//!
//! ## Items and Groups
//!
//! An [`Item`] is a leaf: a map layer or a tool. A [`Group`] is a folder of the
//! layer menu holding its own items and nested subgroups:
//!
//! ```text
//! root
//! ├── items:     [L1, L2]
//! └── subgroups: [G1 { items: [L3], subgroups: [G2 { items: [L4] }] }]
//! ```
//!
//! The *materialized content* of a group is its own items followed by the
//! materialized content of each subgroup, in order. For the tree above that is
//! `[L1, L2, L3, L4]`. See [`crate::index::flatten`].
//!
//! ## Identifiers
//!
//! Producers disagree on whether ids are numbers or strings (`12` vs `"12"`).
//! [`NodeId`] accepts both when deserializing and always stores the string
//! form. Loose numeric comparison is confined to name resolution, see
//! [`crate::index::ids_match`].
//!
//! Sibling order is never stored: an item's index is its position in the
//! owning list, so every sibling sequence is `0..n-1` by construction.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::access;

/// Identifier of an item or group, normalized to its string form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&NodeId> for NodeId {
    fn from(id: &NodeId) -> Self {
        id.clone()
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Ids arrive as JSON strings or numbers depending on the producer.
impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawNodeId {
            Str(String),
            Num(serde_json::Number),
        }

        Ok(match RawNodeId::deserialize(deserializer)? {
            RawNodeId::Str(s) => NodeId(s),
            RawNodeId::Num(n) => NodeId(n.to_string()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Layer,
    Tool,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Layer => write!(f, "layer"),
            ItemKind::Tool => write!(f, "tool"),
        }
    }
}

impl std::str::FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "layer" => Ok(ItemKind::Layer),
            "tool" => Ok(ItemKind::Tool),
            other => Err(format!("Invalid item kind: {}", other)),
        }
    }
}

/// A leaf placed into a zone: a map layer or a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: NodeId,
    pub kind: ItemKind,
    pub display_name: String,
    /// Access groups allowed to see this item. Empty means everyone.
    #[serde(default, deserialize_with = "access::deserialize_scope")]
    pub visible_for_groups: Vec<String>,
    /// Type specific options carried through untouched (tools only).
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,
}

impl Item {
    pub fn new(id: impl Into<NodeId>, kind: ItemKind, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            display_name: display_name.into(),
            visible_for_groups: Vec::new(),
            options: Map::new(),
        }
    }

    pub fn layer(id: impl Into<NodeId>) -> Self {
        let id = id.into();
        let name = id.to_string();
        Self::new(id, ItemKind::Layer, name)
    }

    pub fn with_scope(mut self, groups: Vec<String>) -> Self {
        self.visible_for_groups = access::normalize_scope(groups);
        self
    }
}

/// A folder in the layer menu. Nests to any depth.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Group {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub subgroups: Vec<Group>,
}

impl Group {
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_subgroup(mut self, group: Group) -> Self {
        self.subgroups.push(group);
        self
    }

    /// Depth-first search for a group by id, including `self`.
    pub fn find_group(&self, id: &NodeId) -> Option<&Group> {
        if &self.id == id {
            return Some(self);
        }
        self.subgroups.iter().find_map(|g| g.find_group(id))
    }

    pub(crate) fn find_group_mut(&mut self, id: &NodeId) -> Option<&mut Group> {
        if &self.id == id {
            return Some(self);
        }
        self.subgroups.iter_mut().find_map(|g| g.find_group_mut(id))
    }

    /// All ids in this subtree (the group itself, its items, its subgroups), pre-order.
    pub fn subtree_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        collect_ids(self, &mut ids);
        ids
    }
}

fn collect_ids(group: &Group, ids: &mut Vec<NodeId>) {
    ids.push(group.id.clone());
    ids.extend(group.items.iter().map(|i| i.id.clone()));
    for sub in &group.subgroups {
        collect_ids(sub, ids);
    }
}

/// Anything that can be placed into a zone.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Item(Item),
    Group(Group),
}

impl Node {
    pub fn id(&self) -> &NodeId {
        match self {
            Node::Item(item) => &item.id,
            Node::Group(group) => &group.id,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Item(item) => NodeKind::Item(item.kind),
            Node::Group(_) => NodeKind::Group,
        }
    }

    pub fn subtree_ids(&self) -> Vec<NodeId> {
        match self {
            Node::Item(item) => vec![item.id.clone()],
            Node::Group(group) => group.subtree_ids(),
        }
    }
}

impl From<Item> for Node {
    fn from(item: Item) -> Self {
        Node::Item(item)
    }
}

impl From<Group> for Node {
    fn from(group: Group) -> Self {
        Node::Group(group)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase", tag = "node", content = "kind")]
pub enum NodeKind {
    Item(ItemKind),
    Group,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Item(kind) => write!(f, "{}", kind),
            NodeKind::Group => write!(f, "group"),
        }
    }
}

/// Non-default state for one candidate: it is selected, optionally scoped to access groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementOverride {
    #[serde(rename = "id")]
    pub item_id: NodeId,
    #[serde(default, deserialize_with = "access::deserialize_scope")]
    pub visible_for_groups: Vec<String>,
}

impl PlacementOverride {
    pub fn new(item_id: impl Into<NodeId>) -> Self {
        Self {
            item_id: item_id.into(),
            visible_for_groups: Vec::new(),
        }
    }
}

/// A row offered for selection, derived from a raw candidate record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub id: NodeId,
    pub label: String,
    /// Bucket the record came from, empty when synthesized.
    pub bucket: String,
}

impl Candidate {
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            bucket: String::new(),
        }
    }

    pub fn in_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }
}
