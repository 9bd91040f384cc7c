use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::listing;
use crate::session::EditorSession;

/// Picker checklist narrowed by `query`: matching rows first, selected rows always kept.
pub fn run(session: &EditorSession, picker: &str, query: &str) -> Result<CmdResult> {
    let store = session.picker(picker)?;
    let candidates = session.candidates();
    let selection = store.selection(candidates);

    let rows: Vec<_> = listing::filter_rows(&selection, candidates, query)
        .into_iter()
        .map(|row| store.row_for(&row.candidate, row.matched))
        .collect();

    let mut result = CmdResult::default();
    if rows.is_empty() {
        result.add_message(CmdMessage::info(if query.trim().is_empty() {
            format!("Picker '{}' has no candidates", picker)
        } else {
            format!("No candidates matching '{}'", query.trim())
        }));
    }
    Ok(result.with_rows(rows))
}
