//! Picker selection and access scoping.
//!
//! `toggle` flips picker membership; `scope` sets the access groups of either
//! a picker override or an item placed in a zone.

use crate::access;
use crate::commands::helpers::zone_or_lookup;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::NodeId;
use crate::reconcile::Toggled;
use crate::session::EditorSession;

pub fn toggle(session: &mut EditorSession, picker: &str, ids: &[NodeId]) -> Result<CmdResult> {
    let candidates = session.candidates().to_vec();
    let store = session.picker_mut(picker)?;

    // validate everything first so a bad id leaves the picker untouched
    let mut staged = store.clone();
    let mut result = CmdResult::default();
    for id in ids {
        let outcome = staged.toggle(id, &candidates)?;
        result.add_message(CmdMessage::success(match outcome {
            Toggled::Selected => format!("Selected '{}' in {}", id, picker),
            Toggled::Deselected => format!("Deselected '{}' in {}", id, picker),
        }));
    }
    *store = staged;

    let rows = store.checklist(&candidates);
    Ok(result.with_rows(rows).changed())
}

/// Target of a scope edit.
#[derive(Debug, Clone, Copy)]
pub enum ScopeTarget<'a> {
    Picker(&'a str),
    /// An item placed in a zone; `None` looks the zone up.
    Placed(Option<&'a str>),
}

pub fn scope(
    session: &mut EditorSession,
    target: ScopeTarget<'_>,
    id: &NodeId,
    groups_csv: &str,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let scope = match target {
        ScopeTarget::Picker(picker) => {
            let store = session.picker_mut(picker)?;
            if !store.set_scope(id, groups_csv) {
                result.add_message(CmdMessage::warning(format!(
                    "'{}' is not selected in {}; select it first",
                    id, picker
                )));
                return Ok(result);
            }
            store
                .get(id)
                .map(|o| o.visible_for_groups.clone())
                .unwrap_or_default()
        }
        ScopeTarget::Placed(zone) => {
            let zone = zone_or_lookup(session, zone, id)?;
            session.set_item_scope(&zone, id, groups_csv)?
        }
    };

    tracing::debug!(item = %id, scope = ?scope, "scope set");
    result.add_message(CmdMessage::success(if scope.is_empty() {
        format!("'{}' is visible to everyone", id)
    } else {
        format!("'{}' is visible to {}", id, access::format_scope(&scope))
    }));
    Ok(result.changed())
}
