//! # Reconciliation Store
//!
//! Pickers (e.g. "which layers can the search tool query") show every
//! candidate as a checklist row but persist only the rows that differ from
//! the default: the selected ones, each with an optional access scope.
//!
//! ```text
//! candidates:  [12 Roads] [13 Rivers] [14 Lakes] [15 Parcels]
//! checklist:   [x]        [ ]         [x] a,b    [ ]
//! overrides:   [{id: 12, visibleForGroups: []}, {id: 14, visibleForGroups: ["a", "b"]}]
//! ```
//!
//! State is keyed by id, never by what is currently rendered: narrowing the
//! candidate list (a live search box) never drops an override.
//!
//! Sync runs both ways: [`ReconciliationStore::checklist`] renders rows from
//! the store, [`ReconciliationStore::sync_from_checklist`] applies widget state
//! back for the rows that were visible.

use serde::Serialize;
use std::collections::HashSet;

use crate::access;
use crate::error::{MapcfgError, Result};
use crate::listing::SelectionSet;
use crate::model::{Candidate, NodeId, PlacementOverride};

/// Result of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Toggled {
    Selected,
    Deselected,
}

/// A checklist row as rendered by a picker widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistRow {
    pub candidate: Candidate,
    pub checked: bool,
    /// Scope in text-field form; empty when unchecked or unscoped.
    pub scope_text: String,
    /// Whether the row matched the active query (always true without one).
    pub matched: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationStore {
    overrides: Vec<PlacementOverride>,
}

impl ReconciliationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store from persisted overrides; later duplicates of an id are dropped.
    pub fn from_overrides(overrides: Vec<PlacementOverride>) -> Self {
        let mut seen = HashSet::new();
        let overrides = overrides
            .into_iter()
            .filter(|o| seen.insert(o.item_id.clone()))
            .map(|o| PlacementOverride {
                visible_for_groups: access::normalize_scope(o.visible_for_groups),
                item_id: o.item_id,
            })
            .collect();
        Self { overrides }
    }

    pub fn is_selected(&self, id: &NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: &NodeId) -> Option<&PlacementOverride> {
        self.overrides.iter().find(|o| &o.item_id == id)
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    /// Overrides in selection order.
    pub fn overrides(&self) -> &[PlacementOverride] {
        &self.overrides
    }

    /// Selects `id` (with an empty scope) or deselects it.
    ///
    /// Selecting requires `id` to be a candidate. Deselecting always works, so
    /// stale ids left over from removed layers can be cleared.
    pub fn toggle(&mut self, id: &NodeId, candidates: &[Candidate]) -> Result<Toggled> {
        if let Some(pos) = self.overrides.iter().position(|o| &o.item_id == id) {
            self.overrides.remove(pos);
            tracing::debug!(item = %id, "deselected");
            return Ok(Toggled::Deselected);
        }
        if !candidates.iter().any(|c| &c.id == id) {
            return Err(MapcfgError::not_found(id, "candidates"));
        }
        self.overrides.push(PlacementOverride::new(id.clone()));
        tracing::debug!(item = %id, "selected");
        Ok(Toggled::Selected)
    }

    /// Assigns a scope parsed from `groups_csv`. Returns `false` (no-op) when
    /// `id` is not selected.
    pub fn set_scope(&mut self, id: &NodeId, groups_csv: &str) -> bool {
        match self.overrides.iter_mut().find(|o| &o.item_id == id) {
            Some(o) => {
                o.visible_for_groups = access::parse_scope(groups_csv);
                true
            }
            None => false,
        }
    }

    /// Every override: those in `candidates` first (candidate order), then the
    /// rest in selection order. Nothing is dropped for being filtered out.
    pub fn overrides_for(&self, candidates: &[Candidate]) -> Vec<PlacementOverride> {
        let mut out: Vec<PlacementOverride> = candidates
            .iter()
            .filter_map(|c| self.get(&c.id).cloned())
            .collect();
        let listed: HashSet<&NodeId> = candidates.iter().map(|c| &c.id).collect();
        out.extend(
            self.overrides
                .iter()
                .filter(|o| !listed.contains(&o.item_id))
                .cloned(),
        );
        out
    }

    /// Store → widget: one row per candidate.
    pub fn checklist(&self, candidates: &[Candidate]) -> Vec<ChecklistRow> {
        candidates
            .iter()
            .map(|c| self.row_for(c, true))
            .collect()
    }

    pub(crate) fn row_for(&self, candidate: &Candidate, matched: bool) -> ChecklistRow {
        let over = self.get(&candidate.id);
        ChecklistRow {
            candidate: candidate.clone(),
            checked: over.is_some(),
            scope_text: over
                .map(|o| access::format_scope(&o.visible_for_groups))
                .unwrap_or_default(),
            matched,
        }
    }

    /// Widget → store: applies the checked state of the `visible` rows only.
    ///
    /// Newly checked rows get an empty scope, rows that stay checked keep
    /// theirs, rows not in `visible` are left alone.
    pub fn sync_from_checklist(&mut self, visible: &[Candidate], checked: &HashSet<NodeId>) {
        let visible_ids: HashSet<&NodeId> = visible.iter().map(|c| &c.id).collect();
        self.overrides
            .retain(|o| !visible_ids.contains(&o.item_id) || checked.contains(&o.item_id));
        for candidate in visible {
            if checked.contains(&candidate.id) && !self.is_selected(&candidate.id) {
                self.overrides.push(PlacementOverride::new(candidate.id.clone()));
            }
        }
    }

    /// Selected ids plus the rows they came from. Overrides without a candidate
    /// get a synthesized row labelled with the raw id.
    pub fn selection(&self, candidates: &[Candidate]) -> SelectionSet {
        let rows = self
            .overrides
            .iter()
            .map(|o| {
                candidates
                    .iter()
                    .find(|c| c.id == o.item_id)
                    .cloned()
                    .unwrap_or_else(|| Candidate::new(o.item_id.clone(), o.item_id.to_string()))
            })
            .collect();
        SelectionSet::from_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    fn candidates(n: usize) -> Vec<Candidate> {
        (1..=n)
            .map(|i| Candidate::new(i.to_string(), format!("Layer {}", i)))
            .collect()
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let cands = candidates(3);
        let mut store = ReconciliationStore::new();
        assert_eq!(store.toggle(&id("2"), &cands).unwrap(), Toggled::Selected);
        assert!(store.is_selected(&id("2")));
        assert!(store.get(&id("2")).unwrap().visible_for_groups.is_empty());
        assert_eq!(store.toggle(&id("2"), &cands).unwrap(), Toggled::Deselected);
        assert!(store.is_empty());
    }

    #[test]
    fn test_toggle_preserves_order_of_remaining() {
        let cands = candidates(5);
        let mut store = ReconciliationStore::new();
        for i in ["4", "1", "3"] {
            store.toggle(&id(i), &cands).unwrap();
        }
        store.toggle(&id("1"), &cands).unwrap();
        let ids: Vec<&str> = store.overrides().iter().map(|o| o.item_id.as_str()).collect();
        assert_eq!(ids, vec!["4", "3"]);
    }

    #[test]
    fn test_toggle_unknown_candidate() {
        let mut store = ReconciliationStore::new();
        assert!(matches!(
            store.toggle(&id("99"), &candidates(3)),
            Err(MapcfgError::NotFound { .. })
        ));
    }

    #[test]
    fn test_toggle_deselects_stale_override() {
        let mut store = ReconciliationStore::from_overrides(vec![PlacementOverride::new("gone")]);
        assert_eq!(
            store.toggle(&id("gone"), &candidates(3)).unwrap(),
            Toggled::Deselected
        );
    }

    #[test]
    fn test_set_scope_normalizes() {
        let cands = candidates(2);
        let mut store = ReconciliationStore::new();
        store.toggle(&id("1"), &cands).unwrap();

        assert!(store.set_scope(&id("1"), "a, b ,c"));
        assert_eq!(store.get(&id("1")).unwrap().visible_for_groups, vec!["a", "b", "c"]);

        assert!(store.set_scope(&id("1"), ""));
        assert_eq!(
            store.get(&id("1")).unwrap().visible_for_groups,
            Vec::<String>::new()
        );
    }

    #[test]
    fn test_set_scope_without_selection_is_noop() {
        let mut store = ReconciliationStore::new();
        assert!(!store.set_scope(&id("1"), "a"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_overrides_survive_filtering() {
        let cands = candidates(50);
        let mut store = ReconciliationStore::new();
        store.toggle(&id("7"), &cands).unwrap();
        store.toggle(&id("3"), &cands).unwrap();
        store.set_scope(&id("3"), "admins");

        let filtered: Vec<Candidate> = cands
            .iter()
            .filter(|c| c.label.contains("4"))
            .cloned()
            .collect();
        let overrides = store.overrides_for(&filtered);
        let ids: Vec<&str> = overrides.iter().map(|o| o.item_id.as_str()).collect();
        assert_eq!(ids, vec!["7", "3"]);
        assert_eq!(overrides[1].visible_for_groups, vec!["admins"]);
    }

    #[test]
    fn test_overrides_follow_candidate_order() {
        let cands = candidates(10);
        let mut store = ReconciliationStore::from_overrides(vec![
            PlacementOverride::new("ghost"),
            PlacementOverride::new("9"),
            PlacementOverride::new("2"),
        ]);
        store.toggle(&id("5"), &cands).unwrap();
        let ids: Vec<String> = store
            .overrides_for(&cands)
            .into_iter()
            .map(|o| o.item_id.to_string())
            .collect();
        assert_eq!(ids, vec!["2", "5", "9", "ghost"]);
    }

    #[test]
    fn test_from_overrides_dedupes_and_normalizes() {
        let store = ReconciliationStore::from_overrides(vec![
            PlacementOverride {
                item_id: id("1"),
                visible_for_groups: vec!["".into()],
            },
            PlacementOverride::new("1"),
        ]);
        assert_eq!(store.len(), 1);
        assert!(store.get(&id("1")).unwrap().visible_for_groups.is_empty());
    }

    #[test]
    fn test_checklist_rows() {
        let cands = candidates(3);
        let mut store = ReconciliationStore::new();
        store.toggle(&id("2"), &cands).unwrap();
        store.set_scope(&id("2"), "a,b");

        let rows = store.checklist(&cands);
        assert_eq!(rows.len(), 3);
        assert!(!rows[0].checked);
        assert!(rows[1].checked);
        assert_eq!(rows[1].scope_text, "a, b");
        assert_eq!(rows[2].scope_text, "");
    }

    #[test]
    fn test_sync_from_checklist_only_touches_visible_rows() {
        let cands = candidates(6);
        let mut store = ReconciliationStore::new();
        store.toggle(&id("1"), &cands).unwrap();
        store.toggle(&id("2"), &cands).unwrap();
        store.toggle(&id("5"), &cands).unwrap();
        store.set_scope(&id("2"), "keep");

        // widget shows rows 2..=4; user unchecked nothing but 2 stays, checked 3
        let visible = cands[1..4].to_vec();
        let checked: HashSet<NodeId> = [id("2"), id("3")].into_iter().collect();
        store.sync_from_checklist(&visible, &checked);

        let ids: Vec<&str> = store.overrides().iter().map(|o| o.item_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "5", "3"]);
        assert_eq!(store.get(&id("2")).unwrap().visible_for_groups, vec!["keep"]);

        let checked: HashSet<NodeId> = HashSet::new();
        store.sync_from_checklist(&visible, &checked);
        let ids: Vec<&str> = store.overrides().iter().map(|o| o.item_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "5"]);
    }

    #[test]
    fn test_selection_synthesizes_missing_rows() {
        let cands = candidates(2);
        let store = ReconciliationStore::from_overrides(vec![
            PlacementOverride::new("2"),
            PlacementOverride::new("gone"),
        ]);
        let selection = store.selection(&cands);
        assert!(selection.contains(&id("gone")));
        let labels: Vec<&str> = selection.rows().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Layer 2", "gone"]);
    }
}
