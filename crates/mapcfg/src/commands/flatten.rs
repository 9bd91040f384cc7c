use crate::commands::{CmdMessage, CmdResult};
use crate::error::{MapcfgError, Result};
use crate::index;
use crate::model::NodeId;
use crate::session::EditorSession;

/// Materialized items of `group` in `zone` (defaults: layer menu, its root),
/// optionally narrowed to items whose name or id contains `query`.
pub fn run(
    session: &EditorSession,
    zone: Option<&str>,
    group: Option<&NodeId>,
    query: Option<&str>,
) -> Result<CmdResult> {
    let zone_id = zone.unwrap_or(session.layer_menu_zone());
    let tree = session.zones().get(zone_id)?.tree();
    let group_id = group.unwrap_or(tree.root_id());
    let group = tree
        .group(group_id)
        .ok_or_else(|| MapcfgError::not_found(group_id, format!("zone '{}'", zone_id)))?;

    let items: Vec<_> = match query {
        Some(q) => index::search_items(group, q).into_iter().cloned().collect(),
        None => index::flatten(group),
    };

    let mut result = CmdResult::default();
    if items.is_empty() {
        result.add_message(CmdMessage::info(match query {
            Some(q) => format!("No items matching '{}' in {}", q, zone_id),
            None => format!("No items in {}", zone_id),
        }));
    }
    Ok(result.with_items(items))
}
