//! # Flatten and Lookup Index
//!
//! Two read-side views over configuration data, recomputed on every read.
//!
//! ## Flatten
//!
//! [`flatten`] turns a group hierarchy into the ordered leaf list shown in the
//! layer switcher and used to order search results. The traversal is pre-order:
//! a group's own items first, then each subgroup in declared order.
//!
//! ```text
//! root { items: [A], subgroups: [G1 { items: [B], subgroups: [G2 { items: [C] }] }, G3 { items: [D] }] }
//! flatten(root) = [A, B, C, D]
//! ```
//!
//! The same tree always yields the same order.
//!
//! ## Name Resolution
//!
//! Candidate data arrives as typed buckets, one per service type:
//!
//! ```json
//! { "wmslayers": [ { "id": 12, "internalLayerName": "roads", "caption": "Roads" } ],
//!   "wfslayers": [ { "id": "40", "caption": "Parcels" } ] }
//! ```
//!
//! [`resolve_name`] scans buckets (in key order) and records (in list order) and
//! returns the first match's `internalLayerName`, falling back to `caption`.
//! Ids are compared after numeric coercion: `"12"` matches `12`. This is the
//! only place in the crate where ids are compared loosely.
//!
//! A miss is not an error. Configurations routinely reference layers that were
//! since removed from the service; callers show the raw id instead.
//!
//! `resolve_name` is a linear scan. To resolve many ids, build a
//! [`NameTable`] once.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::model::{Candidate, Group, Item};

/// A raw candidate record as delivered by the host (capability list entry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    #[serde(default)]
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_layer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawRecord {
    pub fn new(id: impl Into<Value>) -> Self {
        Self {
            id: id.into(),
            internal_layer_name: None,
            caption: None,
            extra: Map::new(),
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_internal_name(mut self, name: impl Into<String>) -> Self {
        self.internal_layer_name = Some(name.into());
        self
    }

    /// `internalLayerName` when present and non-empty, else `caption`.
    pub fn name(&self) -> Option<&str> {
        non_empty(self.internal_layer_name.as_deref()).or_else(|| non_empty(self.caption.as_deref()))
    }

    /// The record id in string form, if it is a string or a number.
    pub fn id_string(&self) -> Option<String> {
        match &self.id {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

/// Candidate records keyed by bucket (e.g. one bucket per service type).
pub type Buckets = BTreeMap<String, Vec<RawRecord>>;

/// Pre-order leaf list of `root`.
pub fn flatten(root: &Group) -> Vec<Item> {
    flatten_refs(root).into_iter().cloned().collect()
}

/// Same as [`flatten`] without cloning.
pub fn flatten_refs(root: &Group) -> Vec<&Item> {
    let mut out = Vec::new();
    collect_items(root, &mut out);
    out
}

fn collect_items<'a>(group: &'a Group, out: &mut Vec<&'a Item>) {
    out.extend(group.items.iter());
    for sub in &group.subgroups {
        collect_items(sub, out);
    }
}

/// Flattened items whose display name or id contains `query` (case-insensitive),
/// in flatten order.
pub fn search_items<'a>(root: &'a Group, query: &str) -> Vec<&'a Item> {
    let needle = query.trim().to_lowercase();
    flatten_refs(root)
        .into_iter()
        .filter(|item| {
            needle.is_empty()
                || item.display_name.to_lowercase().contains(&needle)
                || item.id.as_str().to_lowercase().contains(&needle)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Numeric {
    Int(i128),
    Float(f64),
}

// Largest magnitude where every integer is exact in an f64.
const EXACT_F64_INT: f64 = 9_007_199_254_740_992.0;

fn as_number(s: &str) -> Option<Numeric> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(n) = s.parse::<i128>() {
        return Some(Numeric::Int(n));
    }
    let n = s.parse::<f64>().ok().filter(|n| n.is_finite())?;
    if n.fract() == 0.0 && n.abs() <= EXACT_F64_INT {
        Some(Numeric::Int(n as i128))
    } else {
        Some(Numeric::Float(n))
    }
}

fn numbers_equal(a: Numeric, b: Numeric) -> bool {
    match (a, b) {
        (Numeric::Int(a), Numeric::Int(b)) => a == b,
        (Numeric::Float(a), Numeric::Float(b)) => a == b,
        (Numeric::Int(i), Numeric::Float(f)) | (Numeric::Float(f), Numeric::Int(i)) => {
            f.fract() == 0.0 && i as f64 == f
        }
    }
}

/// Loose id equality: numeric values compare numerically, everything else by string.
///
/// `ids_match("12", &json!(12))` and `ids_match("12.0", &json!("12"))` are both true.
/// Integer ids compare exactly, so ids past 2^53 stay distinct.
pub fn ids_match(id: &str, record_id: &Value) -> bool {
    let other = match record_id {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return false,
    };
    match (as_number(id), as_number(&other)) {
        (Some(a), Some(b)) => numbers_equal(a, b),
        _ => id == other,
    }
}

/// Resolves `id` to a display name by scanning every bucket. `None` means "show the raw id".
pub fn resolve_name<'a>(id: &str, buckets: &'a Buckets) -> Option<&'a str> {
    buckets
        .values()
        .flat_map(|records| records.iter())
        .filter(|record| ids_match(id, &record.id))
        .find_map(RawRecord::name)
}

// Numeric ids collapse onto one key so "12", "12.0" and 12 share an entry.
fn canonical_key(id: &str) -> String {
    match as_number(id) {
        Some(Numeric::Int(n)) => n.to_string(),
        Some(Numeric::Float(n)) => format!("{}", n),
        None => id.to_string(),
    }
}

/// Precomputed id → name mapping for resolving many ids at once.
///
/// Agrees with [`resolve_name`]: the first record in scan order wins.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    names: HashMap<String, String>,
}

impl NameTable {
    pub fn from_buckets(buckets: &Buckets) -> Self {
        let mut names = HashMap::new();
        for record in buckets.values().flatten() {
            let (Some(id), Some(name)) = (record.id_string(), record.name()) else {
                continue;
            };
            names
                .entry(canonical_key(&id))
                .or_insert_with(|| name.to_string());
        }
        Self { names }
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.names.get(&canonical_key(id)).map(String::as_str)
    }

    /// The resolved name, or the raw id when nothing matches.
    pub fn display_name(&self, id: &str) -> String {
        self.get(id).unwrap_or(id).to_string()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Checklist candidates from raw buckets, first occurrence of each id wins.
pub fn candidates(buckets: &Buckets) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for (bucket, records) in buckets {
        for record in records {
            let Some(id) = record.id_string() else {
                continue;
            };
            if !seen.insert(id.clone()) {
                continue;
            }
            let label = non_empty(record.caption.as_deref())
                .or_else(|| non_empty(record.internal_layer_name.as_deref()))
                .unwrap_or(&id)
                .to_string();
            out.push(Candidate::new(id, label).in_bucket(bucket.clone()));
        }
    }
    out
}
