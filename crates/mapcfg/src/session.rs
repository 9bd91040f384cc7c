//! # Editing Session
//!
//! [`EditorSession`] owns every piece of mutable state for one editing
//! session: the zone registry (layer menu plus tool slots) and one
//! [`ReconciliationStore`] per named picker. Nothing else mutates them.
//!
//! ## Loading
//!
//! [`EditorSession::from_document`] turns the persisted [`Document`] into
//! zones:
//!
//! 1. The layer menu becomes the nested zone's tree (duplicate ids fail the load).
//! 2. Tools are bucketed by `options.target`. A missing or unknown target falls
//!    back to the configured default slot.
//! 3. Each slot's tools are stably sorted by `index`; their position in the
//!    slot becomes the new index, so indices are `0..n-1` again on save.
//! 4. A tool already placed in an exclusive slot is dropped.
//!
//! Everything the load had to repair is kept in [`EditorSession::load_warnings`]
//! and logged.
//!
//! ## Saving
//!
//! [`EditorSession::to_document`] writes the zones back in the same shape.
//! The revision is carried over untouched; the store bumps it on save.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashSet};

use crate::access;
use crate::config::MapcfgConfig;
use crate::document::{Document, GroupDoc, ToolOptions, ToolPlacement};
use crate::error::{MapcfgError, Result};
use crate::index::NameTable;
use crate::model::{Candidate, Group, Item, ItemKind, Node, NodeId};
use crate::placement::{self, MoveRequest, Placement};
use crate::reconcile::ReconciliationStore;
use crate::tools::ToolKind;
use crate::tree::Tree;
use crate::zones::ZoneRegistry;

#[derive(Debug, Clone)]
pub struct EditorSession {
    config: MapcfgConfig,
    zones: ZoneRegistry,
    pickers: BTreeMap<String, ReconciliationStore>,
    candidates: Vec<Candidate>,
    revision: u64,
    updated_at: Option<DateTime<Utc>>,
    load_warnings: Vec<String>,
}

impl EditorSession {
    /// Empty session: empty layer menu, empty slots, empty pickers.
    pub fn new(config: &MapcfgConfig) -> Result<Self> {
        config.validate()?;
        let zones = ZoneRegistry::standard(config)?;
        let pickers = config
            .pickers
            .iter()
            .map(|name| (name.clone(), ReconciliationStore::new()))
            .collect();
        Ok(Self {
            config: config.clone(),
            zones,
            pickers,
            candidates: Vec::new(),
            revision: 0,
            updated_at: None,
            load_warnings: Vec::new(),
        })
    }

    pub fn from_document(doc: &Document, config: &MapcfgConfig) -> Result<Self> {
        let mut session = Self::new(config)?;
        session.revision = doc.revision;
        session.updated_at = doc.updated_at;

        let mut root = doc.layer_menu.to_group();
        if doc.layer_menu.is_empty() {
            root.id = NodeId::new(config.layer_menu_root.clone());
        }
        let tree = Tree::from_root(root)?;
        session.zones.replace_tree(&config.layer_menu_zone, tree)?;

        session.load_tools(&doc.tools)?;

        for (name, refs) in &doc.pickers {
            session
                .pickers
                .insert(name.clone(), ReconciliationStore::from_overrides(refs.clone()));
        }

        tracing::debug!(
            revision = session.revision,
            layers = session.layer_menu()?.len_items(),
            tools = doc.tools.len(),
            warnings = session.load_warnings.len(),
            "loaded document"
        );
        Ok(session)
    }

    fn load_tools(&mut self, tools: &[ToolPlacement]) -> Result<()> {
        let mut by_target: Vec<(String, Vec<&ToolPlacement>)> = self
            .config
            .tool_targets
            .iter()
            .map(|t| (t.clone(), Vec::new()))
            .collect();

        for tool in tools {
            let requested = tool.options.target.as_deref();
            let target = match requested {
                Some(t) if self.config.is_tool_target(t) => t.to_string(),
                _ => {
                    let fallback = self.config.default_tool_target.clone();
                    tracing::warn!(
                        tool = %tool.tool_type,
                        target = ?requested,
                        fallback = %fallback,
                        "unknown tool target"
                    );
                    self.load_warnings.push(format!(
                        "Tool '{}' has target {}; placed in '{}'",
                        tool.tool_type,
                        requested.map_or("<none>".to_string(), |t| format!("'{}'", t)),
                        fallback
                    ));
                    fallback
                }
            };
            if let Some((_, bucket)) = by_target.iter_mut().find(|(t, _)| *t == target) {
                bucket.push(tool);
            }
        }

        let mut placed: HashSet<NodeId> = HashSet::new();
        for (target, mut bucket) in by_target {
            bucket.sort_by_key(|tool| tool.index);
            let root = self.zones.get(&target)?.root_id().clone();
            let mut in_zone: HashSet<NodeId> = HashSet::new();
            for tool in bucket {
                let kind: ToolKind = tool.tool_type.parse().unwrap_or_else(|e| match e {});
                let id = NodeId::new(kind.type_name());
                let exclusive_clash = self.config.exclusive_tool_targets && placed.contains(&id);
                if exclusive_clash || in_zone.contains(&id) {
                    tracing::warn!(tool = %id, target = %target, "tool placed twice, dropping");
                    self.load_warnings
                        .push(format!("Tool '{}' is placed more than once; dropped from '{}'", id, target));
                    continue;
                }

                if !kind.is_known() {
                    tracing::warn!(tool = %id, "unknown tool type");
                    self.load_warnings.push(format!("Unknown tool type '{}'", id));
                }
                let mut item = Item::new(id.clone(), ItemKind::Tool, kind.label())
                    .with_scope(tool.options.visible_for_groups.clone());
                item.options = tool.options.extra.clone();

                self.zones
                    .tree_mut(&target)?
                    .insert(Node::Item(item), &root, usize::MAX)?;
                in_zone.insert(id.clone());
                placed.insert(id);
            }
        }
        Ok(())
    }

    pub fn to_document(&self) -> Document {
        let layer_menu = match self.layer_menu() {
            Ok(tree) => GroupDoc::from_group(tree.root()),
            Err(_) => GroupDoc::new(self.config.layer_menu_root.clone()),
        };

        let mut tools = Vec::new();
        for target in &self.config.tool_targets {
            let Ok(zone) = self.zones.get(target) else {
                continue;
            };
            for (index, item) in zone.tree().root().items.iter().enumerate() {
                tools.push(ToolPlacement {
                    tool_type: item.id.to_string(),
                    index: index as i64,
                    options: ToolOptions {
                        target: Some(target.clone()),
                        visible_for_groups: item.visible_for_groups.clone(),
                        extra: item.options.clone(),
                    },
                });
            }
        }

        let pickers = self
            .pickers
            .iter()
            .map(|(name, store)| (name.clone(), store.overrides().to_vec()))
            .collect();

        Document {
            revision: self.revision,
            updated_at: self.updated_at,
            layer_menu,
            tools,
            pickers,
        }
    }

    pub fn config(&self) -> &MapcfgConfig {
        &self.config
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn load_warnings(&self) -> &[String] {
        &self.load_warnings
    }

    pub fn zones(&self) -> &ZoneRegistry {
        &self.zones
    }

    pub fn layer_menu(&self) -> Result<&Tree> {
        self.zones
            .get(&self.config.layer_menu_zone)
            .map(|zone| zone.tree())
    }

    pub fn layer_menu_zone(&self) -> &str {
        &self.config.layer_menu_zone
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn set_candidates(&mut self, candidates: Vec<Candidate>) {
        self.candidates = candidates;
    }

    pub fn picker_names(&self) -> Vec<&str> {
        self.pickers.keys().map(String::as_str).collect()
    }

    pub fn picker(&self, name: &str) -> Result<&ReconciliationStore> {
        self.pickers
            .get(name)
            .ok_or_else(|| MapcfgError::Api(format!("Unknown picker '{}'", name)))
    }

    pub fn picker_mut(&mut self, name: &str) -> Result<&mut ReconciliationStore> {
        self.pickers
            .get_mut(name)
            .ok_or_else(|| MapcfgError::Api(format!("Unknown picker '{}'", name)))
    }

    pub fn move_node(&mut self, request: &MoveRequest) -> Result<Placement> {
        placement::move_node(&mut self.zones, request)
    }

    pub fn place_node(
        &mut self,
        node: Node,
        dest: &str,
        dest_group: Option<&NodeId>,
        index: usize,
    ) -> Result<Placement> {
        placement::place_node(&mut self.zones, node, dest, dest_group, index)
    }

    pub fn remove_node(&mut self, zone: &str, id: &NodeId) -> Result<Node> {
        placement::remove_node(&mut self.zones, zone, id)
    }

    /// Adds an empty group to the layer menu.
    pub fn add_group(
        &mut self,
        group: Group,
        parent: Option<&NodeId>,
        index: usize,
    ) -> Result<Placement> {
        let zone = self.config.layer_menu_zone.clone();
        self.place_node(Node::Group(group), &zone, parent, index)
    }

    /// Sets the access scope of an item placed in `zone` from comma separated text.
    pub fn set_item_scope(&mut self, zone: &str, id: &NodeId, groups_csv: &str) -> Result<Vec<String>> {
        let item = self
            .zones
            .tree_mut(zone)?
            .get_item_mut(id)
            .ok_or_else(|| MapcfgError::not_found(id, format!("zone '{}'", zone)))?;
        item.visible_for_groups = access::parse_scope(groups_csv);
        Ok(item.visible_for_groups.clone())
    }

    /// Replaces layer display names with names resolved from candidate buckets.
    pub fn apply_names(&mut self, names: &NameTable) {
        let zone = self.config.layer_menu_zone.clone();
        let Ok(tree) = self.zones.tree_mut(&zone) else {
            return;
        };
        let ids: Vec<NodeId> = crate::index::flatten_refs(tree.root())
            .into_iter()
            .map(|item| item.id.clone())
            .collect();
        for id in ids {
            if let Some(item) = tree.get_item_mut(&id) {
                item.display_name = names.display_name(id.as_str());
            }
        }
    }
}
