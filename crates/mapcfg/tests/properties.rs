//! Property tests for the placement engine.

use proptest::prelude::*;

use mapcfg::config::MapcfgConfig;
use mapcfg::document::{Document, ToolPlacement};
use mapcfg::index::flatten;
use mapcfg::model::{Group, Item, NodeId};
use mapcfg::placement::{move_node, place_node, MoveRequest};
use mapcfg::session::EditorSession;
use mapcfg::tools::ToolKind;
use mapcfg::zones::ZoneRegistry;

const SLOTS: [&str; 4] = ["toolbar", "left", "right", "control"];

/// A layer menu built from (is_group, parent_choice) steps.
fn build_menu(steps: &[(bool, usize)]) -> ZoneRegistry {
    let mut zones = ZoneRegistry::standard(&MapcfgConfig::default()).unwrap();
    let mut groups = vec![NodeId::from("root")];
    for (i, (is_group, parent)) in steps.iter().enumerate() {
        let parent = groups[parent % groups.len()].clone();
        if *is_group {
            let id = NodeId::new(format!("G{}", i));
            place_node(&mut zones, Group::new(id.clone()).into(), "layermenu", Some(&parent), usize::MAX)
                .unwrap();
            groups.push(id);
        } else {
            place_node(
                &mut zones,
                Item::layer(format!("L{}", i)).into(),
                "layermenu",
                Some(&parent),
                usize::MAX,
            )
            .unwrap();
        }
    }
    zones
}

fn menu(zones: &ZoneRegistry) -> Vec<NodeId> {
    flatten(zones.get("layermenu").unwrap().tree().root())
        .into_iter()
        .map(|i| i.id)
        .collect()
}

fn all_ids(zones: &ZoneRegistry) -> Vec<NodeId> {
    zones.get("layermenu").unwrap().tree().ids()
}

proptest! {
    #[test]
    fn flatten_is_stable(steps in prop::collection::vec((any::<bool>(), 0usize..8), 0..24)) {
        let zones = build_menu(&steps);
        prop_assert_eq!(menu(&zones), menu(&zones));
        let layers = steps.iter().filter(|(g, _)| !g).count();
        prop_assert_eq!(menu(&zones).len(), layers);
    }

    #[test]
    fn moves_keep_every_node_once(
        steps in prop::collection::vec((any::<bool>(), 0usize..8), 1..24),
        picks in prop::collection::vec((0usize..64, 0usize..64, 0usize..4), 1..12),
    ) {
        let mut zones = build_menu(&steps);
        let mut expected = all_ids(&zones);
        expected.sort();

        for (node, target, index) in picks {
            let ids = all_ids(&zones);
            let node = ids[1 + node % (ids.len() - 1).max(1)].clone();
            let target = ids[target % ids.len()].clone();
            let before = zones.clone();
            let request = MoveRequest::new("layermenu", node, "layermenu")
                .into_group(target)
                .at(index);
            if move_node(&mut zones, &request).is_err() {
                // rejected moves change nothing
                prop_assert_eq!(&zones, &before);
            }
            let mut now = all_ids(&zones);
            now.sort();
            prop_assert_eq!(&now, &expected);
        }
    }

    #[test]
    fn tools_occupy_one_slot(moves in prop::collection::vec((0usize..17, 0usize..4, 0usize..6), 1..30)) {
        let mut zones = ZoneRegistry::standard(&MapcfgConfig::default()).unwrap();
        for (tool, slot, index) in moves {
            let kind = &ToolKind::known()[tool];
            let id = NodeId::from(kind.type_name());
            let dest = SLOTS[slot];
            match zones.zone_of(&id).map(|z| z.id().to_string()) {
                Some(source) => {
                    move_node(&mut zones, &MoveRequest::new(source, id.clone(), dest).at(index)).unwrap();
                }
                None => {
                    let item = Item::new(id.clone(), mapcfg::model::ItemKind::Tool, kind.label());
                    place_node(&mut zones, item.into(), dest, None, index).unwrap();
                }
            }
            let holders = SLOTS
                .iter()
                .filter(|slot| zones.get(slot).unwrap().tree().contains(&id))
                .count();
            prop_assert_eq!(holders, 1);
        }
    }

    #[test]
    fn loaded_tools_are_reindexed(indices in prop::collection::vec((-50i64..50, 0usize..4), 0..17)) {
        let mut doc = Document::default();
        for (i, (index, slot)) in indices.iter().enumerate() {
            let kind = &ToolKind::known()[i];
            doc.tools.push(ToolPlacement::new(kind.type_name(), SLOTS[*slot], *index));
        }
        let session = EditorSession::from_document(&doc, &MapcfgConfig::default()).unwrap();
        let saved = session.to_document();
        prop_assert_eq!(saved.tools.len(), doc.tools.len());
        for slot in SLOTS {
            let mut in_slot: Vec<&ToolPlacement> = saved
                .tools
                .iter()
                .filter(|t| t.options.target.as_deref() == Some(slot))
                .collect();
            let positions: Vec<i64> = in_slot.iter().map(|t| t.index).collect();
            prop_assert_eq!(positions, (0..in_slot.len() as i64).collect::<Vec<_>>());

            // relative order follows the original indices
            in_slot.sort_by_key(|t| t.index);
            let original: Vec<i64> = in_slot
                .iter()
                .map(|t| doc.tools.iter().find(|o| o.tool_type == t.tool_type).unwrap().index)
                .collect();
            prop_assert!(original.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
