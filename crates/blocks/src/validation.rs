//! Minimal structural validation for block records.

use serde_yaml::Value;

/// Returns true if `value` is a mapping with a non-empty `id` and a non-empty `type`.
///
/// This is a structural gate only. It does not check per-variant fields: a `hero` record without
/// a `heading` still passes. "Non-empty" means present and not `null`, `false`, `0` or `""`.
pub fn validate_block(value: &Value) -> bool {
    let Value::Mapping(map) = value else {
        return false;
    };

    ["id", "type"]
        .iter()
        .all(|key| map.get(*key).is_some_and(is_truthy))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(_) | Value::Mapping(_) => true,
        Value::Tagged(tagged) => is_truthy(&tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn accepts_id_and_type_without_variant_fields() {
        assert!(validate_block(&yaml("{id: '1', type: hero}")));
    }

    #[test]
    fn rejects_missing_id() {
        assert!(!validate_block(&yaml("{type: hero}")));
    }

    #[test]
    fn rejects_null() {
        assert!(!validate_block(&Value::Null));
    }

    #[test]
    fn rejects_empty_values() {
        assert!(!validate_block(&yaml("{id: '', type: hero}")));
        assert!(!validate_block(&yaml("{id: a, type: ''}")));
        assert!(!validate_block(&yaml("{id: 0, type: hero}")));
        assert!(!validate_block(&yaml("{id: ~, type: hero}")));
    }

    #[test]
    fn rejects_non_mappings() {
        assert!(!validate_block(&yaml("[a, b]")));
        assert!(!validate_block(&yaml("hero")));
    }

    #[test]
    fn numeric_id_counts_as_present() {
        assert!(validate_block(&yaml("{id: 7, type: text}")));
    }
}
