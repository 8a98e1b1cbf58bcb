//! Typed accessors over a decoded YAML document.
//!
//! `serde_yaml::Mapping` keeps keys in document order, which the parsers rely
//! on for deterministic stage ordering. Every accessor returns `None` when the
//! key is absent *or* holds a value of another type; callers decide whether
//! that means "skip" or "default".

use serde_yaml::{Mapping, Value};

use crate::error::{ParseError, Result};

/// Decode raw bytes into the top-level mapping.
///
/// Merge keys (`<<: *anchor`) are resolved. An empty document decodes to an
/// empty mapping. A document whose root is a scalar or a sequence is rejected.
pub(crate) fn decode(bytes: &[u8]) -> Result<Mapping> {
    let mut root: Value = serde_yaml::from_slice(bytes)?;
    root.apply_merge()?;
    match root {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        other => Err(ParseError::InvalidDocument(format!(
            "expected a mapping at the top level, found {}",
            kind(&other)
        ))),
    }
}

pub(crate) fn str_field<'a>(map: &'a Mapping, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Value::as_str)
}

pub(crate) fn seq_field<'a>(map: &'a Mapping, key: &str) -> Option<&'a [Value]> {
    map.get(key)
        .and_then(Value::as_sequence)
        .map(|seq| seq.as_slice())
}

pub(crate) fn map_field<'a>(map: &'a Mapping, key: &str) -> Option<&'a Mapping> {
    map.get(key).and_then(Value::as_mapping)
}

/// Entries whose key is a string, in document order.
pub(crate) fn string_keyed(map: &Mapping) -> impl Iterator<Item = (&str, &Value)> {
    map.iter()
        .filter_map(|(key, value)| key.as_str().map(|k| (k, value)))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_empty_document() {
        let map = decode(b"").expect("empty document should decode");
        assert!(map.is_empty());
    }

    #[test]
    fn test_decode_rejects_scalar_root() {
        let err = decode(b"just a string").unwrap_err();
        assert!(matches!(err, ParseError::InvalidDocument(_)));
        assert!(err.to_string().contains("a string"));
    }

    #[test]
    fn test_decode_rejects_bad_syntax() {
        let err = decode(b"key: [unclosed").unwrap_err();
        assert!(matches!(err, ParseError::Syntax(_)));
    }

    #[test]
    fn test_decode_applies_merge_keys() {
        let yaml = b"base: &base {stage: test, when: manual}\njob:\n  <<: *base\n  when: always\n";
        let map = decode(yaml).unwrap();
        let job = map_field(&map, "job").expect("job mapping");
        assert_eq!(str_field(job, "stage"), Some("test"));
        assert_eq!(str_field(job, "when"), Some("always"));
        assert!(job.get("<<").is_none());
    }

    #[test]
    fn test_typed_accessors_return_none_on_wrong_type() {
        let map = decode(b"name: build\ncount: 3\nlist: [a, b]\nnested: {k: v}\n").unwrap();

        assert_eq!(str_field(&map, "name"), Some("build"));
        assert_eq!(str_field(&map, "count"), None);
        assert_eq!(str_field(&map, "missing"), None);

        assert_eq!(seq_field(&map, "list").map(|s| s.len()), Some(2));
        assert!(seq_field(&map, "name").is_none());

        assert!(map_field(&map, "nested").is_some());
        assert!(map_field(&map, "list").is_none());
    }

    #[test]
    fn test_string_keyed_preserves_order_and_drops_other_keys() {
        let map = decode(b"zeta: 1\n42: skipped\nalpha: 2\nmid: 3\n").unwrap();
        let keys: Vec<&str> = string_keyed(&map).map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }
}
