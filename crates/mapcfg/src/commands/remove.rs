use crate::commands::helpers::zone_or_lookup;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index;
use crate::model::{Node, NodeId};
use crate::session::EditorSession;

/// Removes items or groups. A removed group takes its whole subtree with it.
pub fn run(session: &mut EditorSession, zone: Option<&str>, ids: &[NodeId]) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    for id in ids {
        let zone_id = zone_or_lookup(session, zone, id)?;
        let removed = session.remove_node(&zone_id, id)?;
        let message = match &removed {
            Node::Item(item) => format!("Removed {} '{}' from {}", item.kind, item.id, zone_id),
            Node::Group(group) => format!(
                "Removed group '{}' with {} item(s) from {}",
                group.id,
                index::flatten_refs(group).len(),
                zone_id
            ),
        };
        result.add_message(CmdMessage::success(message));
        if let Node::Item(item) = removed {
            result.items.push(item);
        }
    }
    Ok(result.changed())
}
