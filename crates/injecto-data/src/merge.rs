//! Deep merging of data sources.

use serde_yaml::{Mapping, Value};

use crate::source::{DataError, DataSource};
use crate::tree::DataTree;

/// Merge `incoming` into `target` recursively.
///
/// # Merge Rules
///
/// - Both values are mappings: merged key by key
/// - Anything else (scalars, sequences, type mismatches): `incoming` replaces
///   the existing value outright
///
/// Existing keys keep their position in `target`; new keys are appended.
pub fn deep_merge(target: &mut Mapping, incoming: Mapping) {
    for (key, value) in incoming {
        match value {
            Value::Mapping(incoming_map) => {
                if let Some(Value::Mapping(existing)) = target.get_mut(&key) {
                    deep_merge(existing, incoming_map);
                } else {
                    target.insert(key, Value::Mapping(incoming_map));
                }
            }
            other => {
                target.insert(key, other);
            }
        }
    }
}

/// Load all sources in order and deep-merge them into one tree.
///
/// Later sources override earlier ones at the leaf level.
///
/// # Errors
///
/// Returns the first [`DataError`] encountered; no partial tree is returned.
pub fn load_and_merge(sources: &[DataSource]) -> Result<DataTree, DataError> {
    let names: Vec<_> = sources.iter().map(DataSource::name).collect();
    tracing::info!(sources = ?names, "Loading and merging data");

    let mut tree = DataTree::new();
    for source in sources {
        if let Some(mapping) = source.load()? {
            tree.merge(mapping);
        } else {
            tracing::debug!(source = %source.name(), "Data source is empty");
        }
    }

    if tracing::enabled!(tracing::Level::DEBUG)
        && let Some(json) = tree.to_json_pretty()
    {
        tracing::debug!("Final merged data:\n{json}");
    }

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    // ── deep_merge ───────────────────────────────────────────────────

    #[test]
    fn test_merge_nested_mappings() {
        let mut target = mapping("x:\n  a: 1\n  b: 2");
        deep_merge(&mut target, mapping("x:\n  b: 3"));
        assert_eq!(target, mapping("x:\n  a: 1\n  b: 3"));
    }

    #[test]
    fn test_merge_adds_new_keys() {
        let mut target = mapping("a: 1");
        deep_merge(&mut target, mapping("b: 2\nc:\n  d: 3"));
        assert_eq!(target, mapping("a: 1\nb: 2\nc:\n  d: 3"));
    }

    #[test]
    fn test_merge_sequences_overwrite() {
        let mut target = mapping("hosts:\n  - a\n  - b");
        deep_merge(&mut target, mapping("hosts:\n  - c"));
        assert_eq!(target, mapping("hosts:\n  - c"));
    }

    #[test]
    fn test_merge_scalar_replaced_by_mapping() {
        let mut target = mapping("db: postgres");
        deep_merge(&mut target, mapping("db:\n  port: 5432"));
        assert_eq!(target, mapping("db:\n  port: 5432"));
    }

    #[test]
    fn test_merge_mapping_replaced_by_scalar() {
        let mut target = mapping("db:\n  port: 5432");
        deep_merge(&mut target, mapping("db: disabled"));
        assert_eq!(target, mapping("db: disabled"));
    }

    #[test]
    fn test_merge_null_overwrites() {
        let mut target = mapping("a: 1");
        deep_merge(&mut target, mapping("a: ~"));
        assert_eq!(target.get("a"), Some(&Value::Null));
    }

    #[test]
    fn test_merge_keeps_key_order() {
        let mut target = mapping("a: 1\nb: 2\nc: 3");
        deep_merge(&mut target, mapping("b: 20\nd: 4"));
        let keys: Vec<_> = target.keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_merge_deeply_nested() {
        let mut target = mapping("a:\n  b:\n    c: 1\n    d: 2");
        deep_merge(&mut target, mapping("a:\n  b:\n    d: 20\n    e: 30"));
        assert_eq!(target, mapping("a:\n  b:\n    c: 1\n    d: 20\n    e: 30"));
    }

    // ── load_and_merge ───────────────────────────────────────────────

    #[test]
    fn test_load_and_merge_later_sources_win() {
        let sources = [
            DataSource::inline("a", "x:\n  a: 1\n  b: 2\nname: base"),
            DataSource::inline("b", "x:\n  b: 3"),
        ];
        let tree = load_and_merge(&sources).unwrap();
        assert_eq!(tree.resolve("x.a"), Some(&Value::from(1)));
        assert_eq!(tree.resolve("x.b"), Some(&Value::from(3)));
        assert_eq!(tree.resolve("name"), Some(&Value::from("base")));
    }

    #[test]
    fn test_load_and_merge_skips_empty_sources() {
        let sources = [
            DataSource::inline("a", "a: 1"),
            DataSource::inline("empty", ""),
        ];
        let tree = load_and_merge(&sources).unwrap();
        assert_eq!(tree.resolve("a"), Some(&Value::from(1)));
    }

    #[test]
    fn test_load_and_merge_no_sources() {
        let tree = load_and_merge(&[]).unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_load_and_merge_fails_on_bad_source() {
        let sources = [
            DataSource::inline("good", "a: 1"),
            DataSource::inline("bad", "- not\n- a mapping"),
        ];
        let err = load_and_merge(&sources).unwrap_err();
        assert!(matches!(err, DataError::DataFormatError { ref source_name, .. } if source_name == "bad"));
    }

    #[test]
    fn test_load_and_merge_fails_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("base.yaml");
        std::fs::write(&present, "a: 1").unwrap();

        let sources = [
            DataSource::file(&present),
            DataSource::file(dir.path().join("missing.yaml")),
        ];
        let err = load_and_merge(&sources).unwrap_err();
        assert!(matches!(err, DataError::DataSourceNotFound(_)));
    }

    #[test]
    fn test_load_and_merge_files() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base.yaml");
        let prod = dir.path().join("prod.yaml");
        std::fs::write(&base, "app:\n  name: demo\n  replicas: 1\n").unwrap();
        std::fs::write(&prod, "app:\n  replicas: 3\n").unwrap();

        let tree = load_and_merge(&[DataSource::file(&base), DataSource::file(&prod)]).unwrap();
        assert_eq!(tree.resolve("app.name"), Some(&Value::from("demo")));
        assert_eq!(tree.resolve("app.replicas"), Some(&Value::from(3)));
    }
}
