//! Document health check.
//!
//! Runs on the raw stored JSON, since loading already repairs most of what it
//! looks for. Findings:
//!
//! | Finding | Repaired by a load/save round trip |
//! |---------|------------------------------------|
//! | duplicate ids in the layer menu | no, the load fails |
//! | tool placed in more than one exclusive slot | yes, first slot wins |
//! | unknown tool type | no, kept with a fallback label |
//! | unknown or missing tool target | yes, moved to the default slot |
//! | tool indices not `0..n-1` within a slot | yes |
//! | scopes not normalized (`[""]`, untrimmed, CSV strings) | yes |

use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

use crate::access;
use crate::commands::{CmdMessage, CmdResult};
use crate::config::MapcfgConfig;
use crate::tools::ToolKind;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct DoctorReport {
    pub duplicate_ids: Vec<String>,
    pub repeated_tools: Vec<String>,
    pub unknown_tool_types: Vec<String>,
    pub unknown_targets: Vec<String>,
    pub unindexed_slots: Vec<String>,
    pub unnormalized_scopes: usize,
}

impl DoctorReport {
    pub fn is_clean(&self) -> bool {
        self.duplicate_ids.is_empty() && !self.is_fixable()
    }

    /// Whether a load/save round trip would change the document.
    pub fn is_fixable(&self) -> bool {
        !self.repeated_tools.is_empty()
            || !self.unknown_targets.is_empty()
            || !self.unindexed_slots.is_empty()
            || self.unnormalized_scopes > 0
    }
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn scope_is_normalized(value: Option<&Value>) -> bool {
    match value {
        None => true,
        Some(Value::Array(entries)) => {
            let groups: Option<Vec<String>> = entries
                .iter()
                .map(|e| e.as_str().map(str::to_string))
                .collect();
            groups.is_some_and(|g| access::is_normalized(&g))
        }
        Some(_) => false,
    }
}

fn walk_group(group: &Value, seen: &mut HashSet<String>, report: &mut DoctorReport) {
    if let Some(id) = group.get("id").and_then(id_text) {
        if !seen.insert(id.clone()) {
            report.duplicate_ids.push(id);
        }
    }
    for layer in group.get("layers").and_then(Value::as_array).into_iter().flatten() {
        if let Some(id) = layer.get("id").and_then(id_text) {
            if !seen.insert(id.clone()) {
                report.duplicate_ids.push(id);
            }
        }
        if !scope_is_normalized(layer.get("visibleForGroups")) {
            report.unnormalized_scopes += 1;
        }
    }
    for sub in group.get("groups").and_then(Value::as_array).into_iter().flatten() {
        walk_group(sub, seen, report);
    }
}

pub fn inspect(raw: &Value, config: &MapcfgConfig) -> DoctorReport {
    let mut report = DoctorReport::default();

    if let Some(menu) = raw.get("layerMenu") {
        walk_group(menu, &mut HashSet::new(), &mut report);
    }

    let mut slots: BTreeMap<String, Vec<Option<i64>>> = BTreeMap::new();
    let mut placed: BTreeMap<String, HashSet<String>> = BTreeMap::new();
    let mut occurrences: BTreeMap<String, usize> = BTreeMap::new();
    for tool in raw.get("tools").and_then(Value::as_array).into_iter().flatten() {
        let tool_type = tool
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let kind: ToolKind = tool_type.parse().unwrap_or_else(|e| match e {});
        if !kind.is_known() && !report.unknown_tool_types.contains(&tool_type) {
            report.unknown_tool_types.push(tool_type.clone());
        }

        let options = tool.get("options");
        let target = options
            .and_then(|o| o.get("target"))
            .and_then(Value::as_str)
            .filter(|t| config.is_tool_target(t));
        if target.is_none() {
            report.unknown_targets.push(tool_type.clone());
        }
        let target = target.unwrap_or(&config.default_tool_target).to_string();

        if !scope_is_normalized(options.and_then(|o| o.get("visibleForGroups"))) {
            report.unnormalized_scopes += 1;
        }

        slots
            .entry(target.clone())
            .or_default()
            .push(tool.get("index").and_then(Value::as_i64));
        // "Search" and "search" are the same tool
        let id = kind.type_name().to_string();
        *occurrences.entry(id.clone()).or_default() += 1;
        placed.entry(id).or_default().insert(target);
    }

    for (tool, targets) in &placed {
        let count = occurrences.get(tool).copied().unwrap_or_default();
        let repeated = if config.exclusive_tool_targets {
            targets.len() > 1 || count > 1
        } else {
            count > targets.len()
        };
        if repeated {
            report.repeated_tools.push(tool.clone());
        }
    }

    for (target, indices) in slots {
        let mut sorted: Vec<i64> = indices.iter().map(|i| i.unwrap_or(-1)).collect();
        sorted.sort_unstable();
        let contiguous = sorted.iter().enumerate().all(|(pos, &i)| i == pos as i64);
        if !contiguous {
            report.unindexed_slots.push(target);
        }
    }

    for refs in raw
        .get("pickers")
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(|pickers| pickers.values())
        .filter_map(Value::as_array)
    {
        report.unnormalized_scopes += refs
            .iter()
            .filter(|r| !scope_is_normalized(r.get("visibleForGroups")))
            .count();
    }

    report
}

/// Turns a report into messages. `fixed` tells whether the repairable findings were written back.
pub fn run(raw: Option<&Value>, config: &MapcfgConfig, fixed: bool) -> (CmdResult, DoctorReport) {
    let mut result = CmdResult::default();
    let Some(raw) = raw else {
        result.add_message(CmdMessage::info("No document stored yet."));
        return (result, DoctorReport::default());
    };

    let report = inspect(raw, config);
    if report.is_clean() {
        result.add_message(CmdMessage::success("No inconsistencies found."));
        return (result, report);
    }

    result.add_message(CmdMessage::warning("Inconsistencies found:"));
    let mut line = |label: &str, values: &[String]| {
        if !values.is_empty() {
            result.add_message(CmdMessage::info(format!("  - {}: {}", label, values.join(", "))));
        }
    };
    line("Duplicate layer menu ids", &report.duplicate_ids);
    line("Tools placed more than once", &report.repeated_tools);
    line("Unknown tool types", &report.unknown_tool_types);
    line("Tools with unknown targets", &report.unknown_targets);
    line("Slots with gaps in tool indices", &report.unindexed_slots);
    if report.unnormalized_scopes > 0 {
        result.add_message(CmdMessage::info(format!(
            "  - {} scope(s) not normalized",
            report.unnormalized_scopes
        )));
    }

    if !report.duplicate_ids.is_empty() {
        result.add_message(CmdMessage::error(
            "Duplicate ids must be resolved by hand before the document can be loaded.",
        ));
    } else if fixed {
        result.add_message(CmdMessage::success("Document normalized and saved."));
        result.changed = true;
    } else if report.is_fixable() {
        result.add_message(CmdMessage::info("Run with --fix to normalize the document."));
    }
    (result, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use serde_json::json;

    fn config() -> MapcfgConfig {
        MapcfgConfig::default()
    }

    #[test]
    fn test_clean_document() {
        let raw = json!({
            "layerMenu": {"id": "root", "layers": [{"id": 1, "visibleForGroups": ["a"]}]},
            "tools": [
                {"type": "search", "index": 0, "options": {"target": "toolbar"}},
                {"type": "print", "index": 1, "options": {"target": "toolbar"}}
            ],
            "pickers": {"search": [{"id": "1", "visibleForGroups": []}]}
        });
        let report = inspect(&raw, &config());
        assert!(report.is_clean(), "{:?}", report);
        let (result, _) = run(Some(&raw), &config(), false);
        assert!(result.messages[0].content.contains("No inconsistencies"));
    }

    #[test]
    fn test_finds_everything() {
        let raw = json!({
            "layerMenu": {"id": "root",
                "layers": [{"id": 1, "visibleForGroups": [""]}],
                "groups": [{"id": "G", "layers": [{"id": "1", "visibleForGroups": "a,b"}]}]},
            "tools": [
                {"type": "search", "index": 0, "options": {"target": "toolbar"}},
                {"type": "search", "index": 0, "options": {"target": "left"}},
                {"type": "teleporter", "index": 3, "options": {"target": "footer"}},
                {"type": "print", "index": 5, "options": {"target": "right", "visibleForGroups": [" x"]}}
            ]
        });
        let report = inspect(&raw, &config());
        assert_eq!(report.duplicate_ids, vec!["1"]);
        assert_eq!(report.repeated_tools, vec!["search"]);
        assert_eq!(report.unknown_tool_types, vec!["teleporter"]);
        assert_eq!(report.unknown_targets, vec!["teleporter"]);
        assert_eq!(report.unindexed_slots, vec!["right", "toolbar"]);
        assert_eq!(report.unnormalized_scopes, 3);

        let (result, _) = run(Some(&raw), &config(), false);
        assert!(matches!(
            result.messages.last().unwrap().level,
            MessageLevel::Error
        ));
    }

    #[test]
    fn test_case_variant_tool_types_are_repeats() {
        let raw = json!({
            "tools": [
                {"type": "Search", "index": 0, "options": {"target": "toolbar"}},
                {"type": "search", "index": 0, "options": {"target": "left"}}
            ]
        });
        assert_eq!(inspect(&raw, &config()).repeated_tools, vec!["search"]);
    }

    #[test]
    fn test_fix_hint_and_fixed_message() {
        let raw = json!({
            "tools": [{"type": "search", "index": 4, "options": {"target": "toolbar"}}]
        });
        let (result, report) = run(Some(&raw), &config(), false);
        assert!(report.is_fixable());
        assert!(result.messages.last().unwrap().content.contains("--fix"));

        let (result, _) = run(Some(&raw), &config(), true);
        assert!(result.changed);
    }

    #[test]
    fn test_no_document() {
        let (result, report) = run(None, &config(), false);
        assert!(report.is_clean());
        assert!(result.messages[0].content.contains("No document"));
    }
}
