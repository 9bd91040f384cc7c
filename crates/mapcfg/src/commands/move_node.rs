use crate::commands::helpers::{describe_placement, zone_or_lookup};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::NodeId;
use crate::placement::MoveRequest;
use crate::session::EditorSession;

/// Moves `id` to `dest` (a zone, optionally a group in it) at `index`.
///
/// When `source` is omitted the zone currently holding `id` is used; when
/// `dest` is omitted the node stays in its zone (reorder / regroup).
pub fn run(
    session: &mut EditorSession,
    id: &NodeId,
    source: Option<&str>,
    dest: Option<&str>,
    dest_group: Option<&NodeId>,
    index: Option<usize>,
) -> Result<CmdResult> {
    let source = zone_or_lookup(session, source, id)?;
    let dest = dest.map(str::to_string).unwrap_or_else(|| source.clone());

    let mut request = MoveRequest::new(source, id.clone(), dest);
    if let Some(group) = dest_group {
        request = request.into_group(group.clone());
    }
    if let Some(index) = index {
        request = request.at(index);
    }

    let placement = session.move_node(&request)?;
    let mut result = CmdResult::default().changed();
    result.add_message(CmdMessage::success(describe_placement(&placement)));
    Ok(result.with_placements(vec![placement]))
}
