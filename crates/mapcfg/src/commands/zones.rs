use crate::commands::{CmdResult, ZoneSummary};
use crate::model::ItemKind;
use crate::session::EditorSession;

/// Zone overview, optionally limited to zones accepting `kind`.
pub fn run(session: &EditorSession, kind: Option<ItemKind>) -> CmdResult {
    let zones = match kind {
        Some(kind) => session.zones().zones_for(kind),
        None => session.zones().zones().iter().collect(),
    };
    CmdResult {
        zones: zones
            .into_iter()
            .map(|zone| ZoneSummary::new(zone.spec(), zone.tree().len_items()))
            .collect(),
        ..Default::default()
    }
}
