//! Dotted-path lookups into a parsed document.
//!
//! `server.listeners.0.port` walks object keys (case-insensitively, exact
//! match preferred) and numeric segments index into arrays.

use serde_json::Value;

/// Resolve `key` against `root`. An empty key returns the root itself.
pub fn resolve<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    if key.is_empty() {
        return Some(root);
    }

    key.split('.').try_fold(root, |node, segment| match node {
        Value::Object(map) => map.get(segment).or_else(|| {
            map.iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(segment))
                .map(|(_, v)| v)
        }),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_nested_paths() {
        let doc = json!({
            "Server": { "listeners": [ { "port": 80 }, { "port": 443 } ] },
            "name": "demo"
        });

        assert_eq!(resolve(&doc, "name"), Some(&json!("demo")));
        assert_eq!(resolve(&doc, "server.listeners.1.port"), Some(&json!(443)));
        assert_eq!(resolve(&doc, "SERVER.LISTENERS.0.PORT"), Some(&json!(80)));
        assert_eq!(resolve(&doc, ""), Some(&doc));
    }

    #[test]
    fn test_resolve_missing_paths() {
        let doc = json!({ "a": { "b": [1, 2] } });

        assert_eq!(resolve(&doc, "a.c"), None);
        assert_eq!(resolve(&doc, "a.b.5"), None);
        assert_eq!(resolve(&doc, "a.b.x"), None);
        assert_eq!(resolve(&doc, "a.b.0.deeper"), None);
    }

    #[test]
    fn test_exact_key_preferred_over_case_folded() {
        let doc = json!({ "Key": 1, "key": 2 });
        assert_eq!(resolve(&doc, "key"), Some(&json!(2)));
        assert_eq!(resolve(&doc, "Key"), Some(&json!(1)));
    }
}
