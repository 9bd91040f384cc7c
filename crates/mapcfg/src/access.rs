//! Access-group scoping (`visibleForGroups`).
//!
//! A scope is a list of access-group names an item is visible to. An empty
//! scope means the item is visible to everyone.
//!
//! Scopes are always normalized:
//! - every entry is trimmed
//! - empty entries are dropped, so a cleared text field (`""`) becomes `[]`,
//!   never `[""]`
//!
//! The admin forms edit scopes as a comma separated string, parsed with
//! [`parse_scope`] and rendered back with [`format_scope`].

use serde::{Deserialize, Deserializer};

/// Parses a comma separated list of access groups.
///
/// # Examples
/// ```
/// use mapcfg::access::parse_scope;
///
/// assert_eq!(parse_scope("a, b ,c"), vec!["a", "b", "c"]);
/// assert!(parse_scope("").is_empty());
/// assert!(parse_scope(" , ,").is_empty());
/// ```
pub fn parse_scope(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Trims entries and drops empty ones.
pub fn normalize_scope(groups: Vec<String>) -> Vec<String> {
    groups
        .into_iter()
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty())
        .collect()
}

/// True when `groups` is already in normalized form.
pub fn is_normalized(groups: &[String]) -> bool {
    groups.iter().all(|g| !g.is_empty() && g.trim() == g)
}

/// Renders a scope back into the text-field form.
pub fn format_scope(groups: &[String]) -> String {
    groups.join(", ")
}

/// Serde helper: reads a scope as a list, a comma separated string or null,
/// always yielding the normalized form.
pub fn deserialize_scope<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawScope {
        List(Vec<String>),
        Csv(String),
    }

    Ok(match Option::<RawScope>::deserialize(deserializer)? {
        Some(RawScope::List(list)) => normalize_scope(list),
        Some(RawScope::Csv(csv)) => parse_scope(&csv),
        None => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "deserialize_scope")]
        scope: Vec<String>,
    }

    fn holder(json: &str) -> Vec<String> {
        serde_json::from_str::<Holder>(json).unwrap().scope
    }

    #[test]
    fn test_parse_trims_entries() {
        assert_eq!(parse_scope("a, b ,c"), vec!["a", "b", "c"]);
        assert_eq!(parse_scope("  admins  "), vec!["admins"]);
    }

    #[test]
    fn test_parse_empty_yields_empty_list() {
        assert_eq!(parse_scope(""), Vec::<String>::new());
        assert_eq!(parse_scope("   "), Vec::<String>::new());
        assert_eq!(parse_scope(",,"), Vec::<String>::new());
    }

    #[test]
    fn test_parse_drops_inner_empty_entries() {
        assert_eq!(parse_scope("a,,b, ,"), vec!["a", "b"]);
    }

    #[test]
    fn test_normalize_rejects_single_empty_string() {
        assert!(normalize_scope(vec!["".to_string()]).is_empty());
        assert_eq!(
            normalize_scope(vec![" x ".to_string(), "".to_string()]),
            vec!["x"]
        );
    }

    #[test]
    fn test_is_normalized() {
        assert!(is_normalized(&[]));
        assert!(is_normalized(&["a".to_string(), "b".to_string()]));
        assert!(!is_normalized(&["".to_string()]));
        assert!(!is_normalized(&[" a".to_string()]));
    }

    #[test]
    fn test_format_round_trips_through_parse() {
        let scope = vec!["planners".to_string(), "gis".to_string()];
        assert_eq!(format_scope(&scope), "planners, gis");
        assert_eq!(parse_scope(&format_scope(&scope)), scope);
    }

    #[test]
    fn test_deserialize_variants() {
        assert_eq!(holder(r#"{"scope": [""]}"#), Vec::<String>::new());
        assert_eq!(holder(r#"{"scope": ["a ", " b"]}"#), vec!["a", "b"]);
        assert_eq!(holder(r#"{"scope": "a,b"}"#), vec!["a", "b"]);
        assert_eq!(holder(r#"{"scope": null}"#), Vec::<String>::new());
        assert_eq!(holder(r#"{}"#), Vec::<String>::new());
    }
}
