//! # Persisted Document
//!
//! The map configuration is a single JSON document (camelCase keys):
//!
//! ```text
//! {
//!   "revision": 4,
//!   "updatedAt": "2026-10-16T09:12:00Z",
//!   "layerMenu": { "id": "root", "layers": [{"id": "12", "visibleForGroups": []}],
//!                  "groups": [{"id": "G1", "caption": "Water", "layers": [], "groups": []}] },
//!   "tools": [{"type": "search", "index": 0, "options": {"target": "toolbar"}}],
//!   "pickers": { "search": [{"id": "12", "visibleForGroups": ["admins"]}] }
//! }
//! ```
//!
//! These types are the wire shape only. [`crate::session::EditorSession`]
//! converts them into zones and reconciliation stores and back; sorting,
//! reindexing and target fallback happen there.
//!
//! Scopes are normalized while deserializing, so `[""]` never survives a load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::access;
use crate::model::{Group, Item, NodeId, PlacementOverride};

pub const DEFAULT_ROOT: &str = "root";

/// Persisted `{id, visibleForGroups}` pair, used for layer entries and picker rows.
pub type ItemRef = PlacementOverride;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub revision: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub layer_menu: GroupDoc,
    #[serde(default)]
    pub tools: Vec<ToolPlacement>,
    #[serde(default)]
    pub pickers: BTreeMap<String, Vec<ItemRef>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::with_root(DEFAULT_ROOT)
    }
}

impl Document {
    pub fn with_root(root: impl Into<NodeId>) -> Self {
        Self {
            revision: 0,
            updated_at: None,
            layer_menu: GroupDoc::new(root),
            tools: Vec::new(),
            pickers: BTreeMap::new(),
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDoc {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default)]
    pub layers: Vec<ItemRef>,
    #[serde(default)]
    pub groups: Vec<GroupDoc>,
}

impl Default for GroupDoc {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

impl GroupDoc {
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            caption: None,
            layers: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty() && self.groups.is_empty()
    }

    /// Builds the in-memory group. Layer display names default to their id.
    pub fn to_group(&self) -> Group {
        Group {
            id: self.id.clone(),
            caption: self.caption.clone(),
            items: self
                .layers
                .iter()
                .map(|layer| Item::layer(layer.item_id.clone()).with_scope(layer.visible_for_groups.clone()))
                .collect(),
            subgroups: self.groups.iter().map(GroupDoc::to_group).collect(),
        }
    }

    pub fn from_group(group: &Group) -> Self {
        Self {
            id: group.id.clone(),
            caption: group.caption.clone(),
            layers: group
                .items
                .iter()
                .map(|item| ItemRef {
                    item_id: item.id.clone(),
                    visible_for_groups: item.visible_for_groups.clone(),
                })
                .collect(),
            groups: group.subgroups.iter().map(GroupDoc::from_group).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolPlacement {
    #[serde(rename = "type")]
    pub tool_type: String,
    /// Position within `options.target`. Only relative order matters on load.
    #[serde(default)]
    pub index: i64,
    #[serde(default)]
    pub options: ToolOptions,
}

impl ToolPlacement {
    pub fn new(tool_type: impl Into<String>, target: impl Into<String>, index: i64) -> Self {
        Self {
            tool_type: tool_type.into(),
            index,
            options: ToolOptions {
                target: Some(target.into()),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(
        default,
        deserialize_with = "access::deserialize_scope",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub visible_for_groups: Vec<String>,
    /// Type specific options, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
