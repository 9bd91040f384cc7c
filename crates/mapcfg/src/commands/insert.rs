//! Adding new layers, tools and groups.
//!
//! Insertion goes through the placement engine, so the same acceptance,
//! duplicate and exclusivity rules apply as for moves. Tools land in the slot
//! named by the caller, else their kind's usual slot, else the configured
//! default slot.

use uuid::Uuid;

use crate::commands::helpers::describe_placement;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Group, Item, ItemKind, Node, NodeId};
use crate::session::EditorSession;
use crate::tools::ToolKind;

pub fn layer(
    session: &mut EditorSession,
    id: &NodeId,
    parent: Option<&NodeId>,
    index: Option<usize>,
) -> Result<CmdResult> {
    let label = session
        .candidates()
        .iter()
        .find(|c| &c.id == id)
        .map(|c| c.label.clone())
        .unwrap_or_else(|| id.to_string());
    let item = Item::new(id.clone(), ItemKind::Layer, label);
    let zone = session.layer_menu_zone().to_string();
    place(session, Node::Item(item.clone()), &zone, parent, index, vec![item])
}

pub fn tool(
    session: &mut EditorSession,
    tool_type: &str,
    target: Option<&str>,
    index: Option<usize>,
) -> Result<CmdResult> {
    let kind: ToolKind = tool_type.parse().unwrap_or_else(|e| match e {});
    let target = match target {
        Some(t) => t.to_string(),
        None => kind
            .default_target()
            .filter(|t| session.config().is_tool_target(t))
            .map(str::to_string)
            .unwrap_or_else(|| session.config().default_tool_target.clone()),
    };
    let item = Item::new(kind.type_name(), ItemKind::Tool, kind.label());

    let mut result = place(session, Node::Item(item.clone()), &target, None, index, vec![item])?;
    if !kind.is_known() {
        tracing::warn!(tool = %kind, "unknown tool type");
        result.add_message(CmdMessage::warning(format!(
            "Unknown tool type '{}': it will show a fallback label",
            kind
        )));
    }
    Ok(result)
}

/// Adds an empty group to the layer menu. Without an id a UUID is generated.
pub fn group(
    session: &mut EditorSession,
    id: Option<&NodeId>,
    caption: Option<&str>,
    parent: Option<&NodeId>,
    index: Option<usize>,
) -> Result<CmdResult> {
    let id = id
        .cloned()
        .unwrap_or_else(|| NodeId::new(Uuid::new_v4().to_string()));
    let mut group = Group::new(id);
    group.caption = caption.map(str::to_string);

    let placement = session.add_group(group, parent, index.unwrap_or(usize::MAX))?;
    let mut result = CmdResult::default().changed();
    result.add_message(CmdMessage::success(describe_placement(&placement)));
    Ok(result.with_placements(vec![placement]))
}

fn place(
    session: &mut EditorSession,
    node: Node,
    zone: &str,
    parent: Option<&NodeId>,
    index: Option<usize>,
    items: Vec<Item>,
) -> Result<CmdResult> {
    let placement = session.place_node(node, zone, parent, index.unwrap_or(usize::MAX))?;
    let mut result = CmdResult::default().changed().with_items(items);
    result.add_message(CmdMessage::success(describe_placement(&placement)));
    Ok(result.with_placements(vec![placement]))
}
