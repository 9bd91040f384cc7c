use crate::commands::{CmdMessage, CmdResult, ResolvedName};
use crate::index::{self, Buckets};

/// Resolves display names for `ids` against candidate buckets.
///
/// Misses are reported, not failures: the row keeps `name: None`.
pub fn run(buckets: &Buckets, ids: &[String]) -> CmdResult {
    let mut result = CmdResult::default();
    for id in ids {
        let name = index::resolve_name(id, buckets).map(str::to_string);
        if name.is_none() {
            result.add_message(CmdMessage::warning(format!("No name found for '{}'", id)));
        }
        result.names.push(ResolvedName {
            id: id.clone(),
            name,
        });
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::RawRecord;

    #[test]
    fn test_resolve_mixed_ids() {
        let mut buckets = Buckets::new();
        buckets.insert(
            "wmslayers".into(),
            vec![
                RawRecord::new(12).with_caption("Roads"),
                RawRecord::new("abc").with_internal_name("internal_abc"),
            ],
        );
        let result = run(
            &buckets,
            &["12".to_string(), "abc".to_string(), "404".to_string()],
        );
        let names: Vec<Option<&str>> = result.names.iter().map(|n| n.name.as_deref()).collect();
        assert_eq!(names, vec![Some("Roads"), Some("internal_abc"), None]);
        assert_eq!(result.messages.len(), 1);
    }
}
