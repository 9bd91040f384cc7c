use crate::error::{MapcfgError, Result};
use crate::model::NodeId;
use crate::placement::Placement;
use crate::session::EditorSession;

/// Zone currently holding `id`, or `NotFound` naming every zone searched.
pub fn zone_of(session: &EditorSession, id: &NodeId) -> Result<String> {
    session
        .zones()
        .zone_of(id)
        .map(|zone| zone.id().to_string())
        .ok_or_else(|| MapcfgError::not_found(id, "any zone"))
}

/// Resolves an explicit zone or falls back to the zone holding `id`.
pub fn zone_or_lookup(session: &EditorSession, zone: Option<&str>, id: &NodeId) -> Result<String> {
    match zone {
        Some(zone) => Ok(zone.to_string()),
        None => zone_of(session, id),
    }
}

pub fn describe_placement(placement: &Placement) -> String {
    let mut text = format!(
        "{} '{}' placed in {}/{} at {}",
        placement.kind, placement.node, placement.zone, placement.group, placement.index
    );
    if !placement.evicted_from.is_empty() {
        text.push_str(&format!(" (removed from {})", placement.evicted_from.join(", ")));
    }
    text
}
