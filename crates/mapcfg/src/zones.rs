//! # Zone Registry
//!
//! A zone is a named drop target with its own ordered tree:
//!
//! | Zone        | Layout        | Accepts | Exclusive set |
//! |-------------|---------------|---------|---------------|
//! | `layermenu` | nested groups | layers  | none          |
//! | `toolbar`   | single level  | tools   | `tools`       |
//! | `left`      | single level  | tools   | `tools`       |
//! | `right`     | single level  | tools   | `tools`       |
//! | `control`   | single level  | tools   | `tools`       |
//!
//! Zones sharing an exclusive set are mutually exclusive: an item id occupies
//! at most one of them. The placement engine enforces this on every move.
//!
//! Zones are declared on a [`ZoneRegistryBuilder`] once per editing session.
//! The built [`ZoneRegistry`] has no way to add or drop zones.

use serde::Serialize;

use crate::config::MapcfgConfig;
use crate::error::{MapcfgError, Result};
use crate::model::{ItemKind, Node, NodeId};
use crate::tree::Tree;

pub const TOOL_EXCLUSIVE_SET: &str = "tools";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZoneLayout {
    /// Full group nesting (layer menus).
    Nested,
    /// Items only; order is the item's index within the zone (tool slots).
    SingleLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneSpec {
    pub id: String,
    pub layout: ZoneLayout,
    pub accepts: ItemKind,
    pub exclusive_set: Option<String>,
}

impl ZoneSpec {
    pub fn nested(id: impl Into<String>, accepts: ItemKind) -> Self {
        Self {
            id: id.into(),
            layout: ZoneLayout::Nested,
            accepts,
            exclusive_set: None,
        }
    }

    pub fn single_level(id: impl Into<String>, accepts: ItemKind) -> Self {
        Self {
            id: id.into(),
            layout: ZoneLayout::SingleLevel,
            accepts,
            exclusive_set: None,
        }
    }

    pub fn exclusive(mut self, set: impl Into<String>) -> Self {
        self.exclusive_set = Some(set.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    spec: ZoneSpec,
    tree: Tree,
}

impl Zone {
    pub fn id(&self) -> &str {
        &self.spec.id
    }

    pub fn spec(&self) -> &ZoneSpec {
        &self.spec
    }

    pub fn layout(&self) -> ZoneLayout {
        self.spec.layout
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn root_id(&self) -> &NodeId {
        self.tree.root_id()
    }

    pub fn accepts_kind(&self, kind: ItemKind) -> bool {
        self.spec.accepts == kind
    }

    /// Groups only drop into nested zones; items only into zones of their kind.
    pub fn accepts(&self, node: &Node) -> bool {
        match node {
            Node::Item(item) => self.accepts_kind(item.kind),
            Node::Group(group) => {
                self.spec.layout == ZoneLayout::Nested
                    && crate::index::flatten_refs(group)
                        .iter()
                        .all(|item| self.accepts_kind(item.kind))
            }
        }
    }

    pub fn is_exclusive_with(&self, other: &Zone) -> bool {
        match (&self.spec.exclusive_set, &other.spec.exclusive_set) {
            (Some(a), Some(b)) => a == b && self.spec.id != other.spec.id,
            _ => false,
        }
    }
}

#[derive(Debug, Default)]
pub struct ZoneRegistryBuilder {
    specs: Vec<(ZoneSpec, Option<NodeId>)>,
}

impl ZoneRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a zone whose root group id equals the zone id.
    pub fn zone(mut self, spec: ZoneSpec) -> Self {
        self.specs.push((spec, None));
        self
    }

    /// Declares a zone with an explicit root group id.
    pub fn zone_with_root(mut self, spec: ZoneSpec, root: impl Into<NodeId>) -> Self {
        self.specs.push((spec, Some(root.into())));
        self
    }

    pub fn build(self) -> Result<ZoneRegistry> {
        let mut zones: Vec<Zone> = Vec::with_capacity(self.specs.len());
        for (spec, root) in self.specs {
            if zones.iter().any(|z| z.spec.id == spec.id) {
                return Err(MapcfgError::Config(format!(
                    "Zone '{}' is declared twice",
                    spec.id
                )));
            }
            let root = root.unwrap_or_else(|| NodeId::new(spec.id.clone()));
            zones.push(Zone {
                tree: Tree::new(root),
                spec,
            });
        }
        Ok(ZoneRegistry { zones })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneRegistry {
    zones: Vec<Zone>,
}

impl ZoneRegistry {
    pub fn builder() -> ZoneRegistryBuilder {
        ZoneRegistryBuilder::new()
    }

    /// The map-viewer zone set: one nested layer menu plus the tool slots.
    pub fn standard(config: &MapcfgConfig) -> Result<Self> {
        let mut builder = Self::builder().zone_with_root(
            ZoneSpec::nested(config.layer_menu_zone.clone(), ItemKind::Layer),
            config.layer_menu_root.as_str(),
        );
        for target in &config.tool_targets {
            let mut spec = ZoneSpec::single_level(target.clone(), ItemKind::Tool);
            if config.exclusive_tool_targets {
                spec = spec.exclusive(TOOL_EXCLUSIVE_SET);
            }
            builder = builder.zone(spec);
        }
        builder.build()
    }

    /// Zones in declaration order.
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn get(&self, zone_id: &str) -> Result<&Zone> {
        self.zones
            .iter()
            .find(|z| z.spec.id == zone_id)
            .ok_or_else(|| MapcfgError::UnknownZone(zone_id.to_string()))
    }

    pub(crate) fn tree_mut(&mut self, zone_id: &str) -> Result<&mut Tree> {
        self.zones
            .iter_mut()
            .find(|z| z.spec.id == zone_id)
            .map(|z| &mut z.tree)
            .ok_or_else(|| MapcfgError::UnknownZone(zone_id.to_string()))
    }

    /// Swaps in a tree built elsewhere (staged moves, document loading).
    pub(crate) fn replace_tree(&mut self, zone_id: &str, tree: Tree) -> Result<()> {
        *self.tree_mut(zone_id)? = tree;
        Ok(())
    }

    /// Zones that accept items of `kind`, for highlighting drop targets.
    pub fn zones_for(&self, kind: ItemKind) -> Vec<&Zone> {
        self.zones.iter().filter(|z| z.accepts_kind(kind)).collect()
    }

    /// Other zones sharing `zone_id`'s exclusive set.
    pub fn exclusive_with(&self, zone_id: &str) -> Result<Vec<&Zone>> {
        let zone = self.get(zone_id)?;
        Ok(self
            .zones
            .iter()
            .filter(|other| zone.is_exclusive_with(other))
            .collect())
    }

    /// First zone (in declaration order) whose tree holds `id`.
    pub fn zone_of(&self, id: &NodeId) -> Option<&Zone> {
        self.zones.iter().find(|z| z.tree.contains(id))
    }
}
