//! Filtered, sorted picker listings.
//!
//! A picker shows candidates narrowed by a search box. Selected rows always
//! stay visible, even when the query does not match them or the candidate
//! list no longer carries them:
//!
//! ```text
//! query "ro", selected {14, 99}
//!
//!   12 Roads    match      ->  12 Roads   (matched)
//!   13 Rivers   no match       14 Lakes   (selected)
//!   14 Lakes    selected       99 99      (selected, appended)
//! ```
//!
//! Rows that match the query come first; within each half the original order
//! is kept.

use serde::Serialize;
use std::collections::HashSet;

use crate::model::{Candidate, NodeId};

/// Explicit set of selected ids plus the rows to show for them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: HashSet<NodeId>,
    rows: Vec<Candidate>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Candidate>) -> Self {
        let mut ids = HashSet::new();
        let rows = rows
            .into_iter()
            .filter(|row| ids.insert(row.id.clone()))
            .collect();
        Self { ids, rows }
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.ids.contains(id)
    }

    pub fn rows(&self) -> &[Candidate] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingRow {
    pub candidate: Candidate,
    pub selected: bool,
    pub matched: bool,
}

/// Case-insensitive substring match. Blank queries match everything.
pub fn matches_query(label: &str, query: &str) -> bool {
    let query = query.trim();
    query.is_empty() || label.to_lowercase().contains(&query.to_lowercase())
}

pub fn filter_rows(selection: &SelectionSet, candidates: &[Candidate], query: &str) -> Vec<ListingRow> {
    let mut seen: HashSet<&NodeId> = HashSet::new();
    let mut rows: Vec<ListingRow> = Vec::new();

    let listed = candidates
        .iter()
        .chain(selection.rows().iter().filter(|row| {
            !candidates.iter().any(|c| c.id == row.id)
        }));

    for candidate in listed {
        if !seen.insert(&candidate.id) {
            continue;
        }
        let selected = selection.contains(&candidate.id);
        let matched = matches_query(&candidate.label, query);
        if selected || matched {
            rows.push(ListingRow {
                candidate: candidate.clone(),
                selected,
                matched,
            });
        }
    }

    let (mut front, back): (Vec<_>, Vec<_>) = rows.into_iter().partition(|row| row.matched);
    front.extend(back);
    front
}
