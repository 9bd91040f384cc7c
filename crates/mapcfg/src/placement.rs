//! # Placement Engine
//!
//! Executes drag-style moves within and across zones.
//!
//! ## Move Algorithm
//!
//! 1. Locate the node in the source zone (`NotFound` otherwise).
//! 2. Check the destination zone accepts it (`RejectedByZone`).
//! 3. Resolve the destination group (the zone root when none is given) and
//!    refuse to put a group inside itself or a descendant (`Cycle`).
//! 4. Evict the id from any other zone mutually exclusive with the
//!    destination, so it never occupies two slots.
//! 5. Detach from the source and insert at the destination.
//!
//! ## Drop Index
//!
//! The index only reorders a node among its current siblings. A node that
//! changes parent (another group, or another zone) is appended to the
//! receiving list and the index is ignored. With `L1` at the root and `G1`
//! holding `L2`, dropping `L1` into `G1` at any index yields `[L2, L1]`.
//!
//! ## Atomicity
//!
//! The engine backs a drag gesture: a rejected drop has to snap back with no
//! partial effect. Every affected tree is cloned into a staging area, all
//! mutations run on the copies, and the copies are swapped in only once every
//! step has succeeded. On any error the registry is untouched.

use serde::Serialize;

use crate::error::{MapcfgError, Result};
use crate::model::{Node, NodeId, NodeKind};
use crate::tree::Tree;
use crate::zones::ZoneRegistry;

/// A drop: take `node` out of `source`, put it into `dest` / `dest_group`.
///
/// `index` applies when the node keeps its parent; otherwise it is appended.
#[derive(Debug, Clone)]
pub struct MoveRequest {
    pub source: String,
    pub node: NodeId,
    pub dest: String,
    /// `None` drops at the zone's top level.
    pub dest_group: Option<NodeId>,
    pub index: usize,
}

impl MoveRequest {
    pub fn new(source: impl Into<String>, node: impl Into<NodeId>, dest: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            node: node.into(),
            dest: dest.into(),
            dest_group: None,
            index: usize::MAX,
        }
    }

    pub fn into_group(mut self, group: impl Into<NodeId>) -> Self {
        self.dest_group = Some(group.into());
        self
    }

    pub fn at(mut self, index: usize) -> Self {
        self.index = index;
        self
    }
}

/// Where a node ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub zone: String,
    pub group: NodeId,
    pub index: usize,
    pub node: NodeId,
    pub kind: NodeKind,
    /// Exclusive zones the id was evicted from to keep single occupancy.
    pub evicted_from: Vec<String>,
}

struct Staging {
    trees: Vec<(String, Tree)>,
}

impl Staging {
    fn new() -> Self {
        Self { trees: Vec::new() }
    }

    fn tree<'a>(&'a mut self, zones: &ZoneRegistry, zone_id: &str) -> Result<&'a mut Tree> {
        let pos = match self.trees.iter().position(|(id, _)| id == zone_id) {
            Some(pos) => pos,
            None => {
                let tree = zones.get(zone_id)?.tree().clone();
                self.trees.push((zone_id.to_string(), tree));
                self.trees.len() - 1
            }
        };
        Ok(&mut self.trees[pos].1)
    }

    fn commit(self, zones: &mut ZoneRegistry) -> Result<()> {
        for (zone_id, tree) in self.trees {
            zones.replace_tree(&zone_id, tree)?;
        }
        Ok(())
    }
}

/// Validates the destination and returns the group the node will land in.
fn resolve_destination(
    zones: &ZoneRegistry,
    dest: &str,
    dest_group: Option<&NodeId>,
    node: &Node,
    same_zone: bool,
) -> Result<NodeId> {
    let zone = zones.get(dest)?;
    if !zone.accepts(node) {
        return Err(MapcfgError::RejectedByZone {
            zone: dest.to_string(),
            what: format!("{} '{}'", node.kind(), node.id()),
        });
    }

    let group = dest_group.cloned().unwrap_or_else(|| zone.root_id().clone());
    let Some(path) = zone.tree().find(&group) else {
        return Err(MapcfgError::not_found(&group, format!("zone '{}'", dest)));
    };
    if path.kind != NodeKind::Group {
        return Err(MapcfgError::not_found(&group, format!("groups of zone '{}'", dest)));
    }
    if same_zone && path.passes_through(node.id()) {
        return Err(MapcfgError::Cycle {
            node: node.id().clone(),
            target: group,
        });
    }
    Ok(group)
}

fn evict_from_exclusive(
    zones: &ZoneRegistry,
    staging: &mut Staging,
    dest: &str,
    skip: Option<&str>,
    node: &Node,
) -> Result<Vec<String>> {
    let mut evicted = Vec::new();
    if !matches!(node, Node::Item(_)) {
        return Ok(evicted);
    }
    let conflicting: Vec<String> = zones
        .exclusive_with(dest)?
        .into_iter()
        .filter(|z| Some(z.id()) != skip && z.tree().contains(node.id()))
        .map(|z| z.id().to_string())
        .collect();
    for zone_id in conflicting {
        staging.tree(zones, &zone_id)?.remove(node.id())?;
        evicted.push(zone_id);
    }
    Ok(evicted)
}

/// Moves a node between (or within) zones. All-or-nothing.
pub fn move_node(zones: &mut ZoneRegistry, request: &MoveRequest) -> Result<Placement> {
    let source = zones.get(&request.source)?;
    let node = source
        .tree()
        .get(&request.node)
        .map(|n| n.to_node())
        .ok_or_else(|| MapcfgError::not_found(&request.node, format!("zone '{}'", request.source)))?;
    if source.root_id() == &request.node {
        return Err(MapcfgError::Api(format!(
            "The root of zone '{}' cannot be moved",
            request.source
        )));
    }

    let same_zone = request.source == request.dest;
    let group = resolve_destination(
        zones,
        &request.dest,
        request.dest_group.as_ref(),
        &node,
        same_zone,
    )?;
    let current_parent = source
        .tree()
        .find(&request.node)
        .and_then(|path| path.parent().cloned());
    let reorder = same_zone && current_parent.as_ref() == Some(&group);
    let at = if reorder { request.index } else { usize::MAX };

    let mut staging = Staging::new();
    let evicted = evict_from_exclusive(
        zones,
        &mut staging,
        &request.dest,
        Some(&request.source),
        &node,
    )?;

    let detached = staging.tree(zones, &request.source)?.remove(&request.node)?;
    let index = staging
        .tree(zones, &request.dest)?
        .insert(detached, &group, at)?;
    staging.commit(zones)?;

    tracing::debug!(
        node = %request.node,
        from = %request.source,
        to = %request.dest,
        group = %group,
        index,
        reorder,
        evicted = ?evicted,
        "moved node"
    );

    Ok(Placement {
        zone: request.dest.clone(),
        group,
        index,
        kind: node.kind(),
        node: request.node.clone(),
        evicted_from: evicted,
    })
}

/// Places a node that is not in any zone yet (a freshly added layer, tool or group).
///
/// Same validation and exclusivity rules as [`move_node`]; an id already present
/// in the destination zone is a `DuplicateId`.
pub fn place_node(
    zones: &mut ZoneRegistry,
    node: Node,
    dest: &str,
    dest_group: Option<&NodeId>,
    index: usize,
) -> Result<Placement> {
    let group = resolve_destination(zones, dest, dest_group, &node, false)?;

    let mut staging = Staging::new();
    let evicted = evict_from_exclusive(zones, &mut staging, dest, None, &node)?;

    let id = node.id().clone();
    let kind = node.kind();
    let index = staging.tree(zones, dest)?.insert(node, &group, index)?;
    staging.commit(zones)?;

    tracing::debug!(node = %id, zone = dest, group = %group, index, "placed node");

    Ok(Placement {
        zone: dest.to_string(),
        group,
        index,
        node: id,
        kind,
        evicted_from: evicted,
    })
}

/// Removes a node (and its subtree) from a zone.
pub fn remove_node(zones: &mut ZoneRegistry, zone: &str, id: &NodeId) -> Result<Node> {
    let removed = zones.tree_mut(zone)?.remove(id)?;
    tracing::debug!(node = %id, zone, "removed node");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapcfgConfig;
    use crate::index::flatten;
    use crate::model::{Group, Item, ItemKind};

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    fn tool(name: &str) -> Item {
        Item::new(name, ItemKind::Tool, name)
    }

    fn registry() -> ZoneRegistry {
        let mut zones = ZoneRegistry::standard(&MapcfgConfig::default()).unwrap();
        place_node(&mut zones, Item::layer("L1").into(), "layermenu", None, 0).unwrap();
        place_node(&mut zones, Group::new("G1").into(), "layermenu", None, 0).unwrap();
        place_node(&mut zones, Item::layer("L2").into(), "layermenu", Some(&id("G1")), 0).unwrap();
        place_node(&mut zones, Group::new("G2").into(), "layermenu", Some(&id("G1")), 0).unwrap();
        place_node(&mut zones, tool("search").into(), "toolbar", None, 0).unwrap();
        place_node(&mut zones, tool("print").into(), "toolbar", None, 1).unwrap();
        place_node(&mut zones, tool("measure").into(), "left", None, 0).unwrap();
        zones
    }

    fn menu_order(zones: &ZoneRegistry) -> Vec<String> {
        flatten(zones.get("layermenu").unwrap().tree().root())
            .iter()
            .map(|i| i.id.to_string())
            .collect()
    }

    fn slot(zones: &ZoneRegistry, zone: &str) -> Vec<String> {
        zones
            .get(zone)
            .unwrap()
            .tree()
            .root()
            .items
            .iter()
            .map(|i| i.id.to_string())
            .collect()
    }

    #[test]
    fn test_move_item_into_group() {
        let mut zones = registry();
        let placement = move_node(
            &mut zones,
            &MoveRequest::new("layermenu", "L1", "layermenu")
                .into_group("G1")
                .at(1),
        )
        .unwrap();
        assert_eq!(placement.group, id("G1"));
        assert_eq!(placement.index, 1);
        assert_eq!(menu_order(&zones), vec!["L2", "L1"]);
    }

    #[test]
    fn test_move_item_out_of_group_to_root() {
        let mut zones = registry();
        move_node(&mut zones, &MoveRequest::new("layermenu", "L2", "layermenu").at(0)).unwrap();
        // a new parent means append, whatever the index
        assert_eq!(menu_order(&zones), vec!["L1", "L2"]);
        let path = zones.get("layermenu").unwrap().tree().find(&id("L2")).unwrap();
        assert_eq!(path.parent(), Some(&id("root")));
    }

    #[test]
    fn test_reorder_within_slot() {
        let mut zones = registry();
        move_node(&mut zones, &MoveRequest::new("toolbar", "print", "toolbar").at(0)).unwrap();
        assert_eq!(slot(&zones, "toolbar"), vec!["print", "search"]);
    }

    #[test]
    fn test_index_reorders_within_group() {
        let mut zones = registry();
        place_node(&mut zones, Item::layer("L3").into(), "layermenu", Some(&id("G1")), 1).unwrap();
        let placement = move_node(
            &mut zones,
            &MoveRequest::new("layermenu", "L3", "layermenu")
                .into_group("G1")
                .at(0),
        )
        .unwrap();
        assert_eq!(placement.index, 0);
        assert_eq!(menu_order(&zones), vec!["L1", "L3", "L2"]);
    }

    #[test]
    fn test_move_between_slots() {
        let mut zones = registry();
        let placement =
            move_node(&mut zones, &MoveRequest::new("toolbar", "search", "left").at(0)).unwrap();
        assert_eq!(placement.index, 1);
        assert!(placement.evicted_from.is_empty());
        assert_eq!(slot(&zones, "toolbar"), vec!["print"]);
        assert_eq!(slot(&zones, "left"), vec!["measure", "search"]);
    }

    #[test]
    fn test_group_cycle_rejected_and_unchanged() {
        let mut zones = registry();
        let before = zones.clone();
        let err = move_node(
            &mut zones,
            &MoveRequest::new("layermenu", "G1", "layermenu").into_group("G2"),
        )
        .unwrap_err();
        assert!(matches!(err, MapcfgError::Cycle { .. }));
        assert_eq!(zones, before);

        let err = move_node(
            &mut zones,
            &MoveRequest::new("layermenu", "G1", "layermenu").into_group("G1"),
        )
        .unwrap_err();
        assert!(matches!(err, MapcfgError::Cycle { .. }));
        assert_eq!(zones, before);
    }

    #[test]
    fn test_rejected_by_zone_and_unchanged() {
        let mut zones = registry();
        let before = zones.clone();

        let err = move_node(&mut zones, &MoveRequest::new("layermenu", "G1", "toolbar")).unwrap_err();
        assert!(matches!(err, MapcfgError::RejectedByZone { .. }));

        let err = move_node(&mut zones, &MoveRequest::new("toolbar", "search", "layermenu"))
            .unwrap_err();
        assert!(matches!(err, MapcfgError::RejectedByZone { .. }));

        assert_eq!(zones, before);
    }

    #[test]
    fn test_missing_node_and_group() {
        let mut zones = registry();
        let before = zones.clone();
        assert!(matches!(
            move_node(&mut zones, &MoveRequest::new("layermenu", "ghost", "layermenu")),
            Err(MapcfgError::NotFound { .. })
        ));
        assert!(matches!(
            move_node(
                &mut zones,
                &MoveRequest::new("layermenu", "L1", "layermenu").into_group("ghost")
            ),
            Err(MapcfgError::NotFound { .. })
        ));
        // an item id is not a valid destination group
        assert!(matches!(
            move_node(
                &mut zones,
                &MoveRequest::new("layermenu", "L1", "layermenu").into_group("L2")
            ),
            Err(MapcfgError::NotFound { .. })
        ));
        assert!(matches!(
            move_node(&mut zones, &MoveRequest::new("nowhere", "L1", "layermenu")),
            Err(MapcfgError::UnknownZone(_))
        ));
        assert_eq!(zones, before);
    }

    #[test]
    fn test_place_evicts_from_exclusive_zone() {
        let mut zones = registry();
        let placement = place_node(&mut zones, tool("measure").into(), "right", None, 0).unwrap();
        assert_eq!(placement.evicted_from, vec!["left".to_string()]);
        assert!(slot(&zones, "left").is_empty());
        assert_eq!(slot(&zones, "right"), vec!["measure"]);
    }

    #[test]
    fn test_move_evicts_stray_duplicate() {
        let mut zones = registry();
        // a document loaded with the same tool in two slots
        zones
            .tree_mut("right")
            .unwrap()
            .insert(tool("search").into(), &id("right"), 0)
            .unwrap();
        let placement =
            move_node(&mut zones, &MoveRequest::new("toolbar", "search", "control")).unwrap();
        assert_eq!(placement.evicted_from, vec!["right".to_string()]);
        for zone in ["toolbar", "left", "right"] {
            assert!(!slot(&zones, zone).contains(&"search".to_string()));
        }
        assert_eq!(slot(&zones, "control"), vec!["search"]);
    }

    #[test]
    fn test_place_duplicate_in_same_zone_fails() {
        let mut zones = registry();
        let before = zones.clone();
        let err = place_node(&mut zones, Item::layer("L2").into(), "layermenu", None, 0).unwrap_err();
        assert!(matches!(err, MapcfgError::DuplicateId(_)));
        assert_eq!(zones, before);
    }

    #[test]
    fn test_zone_root_cannot_move() {
        let mut zones = registry();
        assert!(move_node(&mut zones, &MoveRequest::new("layermenu", "root", "layermenu")).is_err());
    }

    #[test]
    fn test_remove_node() {
        let mut zones = registry();
        remove_node(&mut zones, "layermenu", &id("G1")).unwrap();
        assert_eq!(menu_order(&zones), vec!["L1"]);
        assert!(remove_node(&mut zones, "layermenu", &id("G1")).is_err());
    }
}
