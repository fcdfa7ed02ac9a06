//! Content-addressed id helpers shared by events and cache-stability checks.

use sha2::{Digest, Sha256};

/// First 16 hex chars of SHA-256 over the concatenated parts, joined by `|`.
///
/// Used both for event ids (`kind || timestamp || payload-hash`) and for the
/// context assembler's stable-prefix digest.
pub fn content_digest(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            hasher.update(b"|");
        }
        hasher.update(part.as_bytes());
    }
    let digest = hasher.finalize();
    hex::encode(digest)[..16].to_string()
}

/// Canonical `sorted-json(value)`: keys sorted, minimal separators.
///
/// `serde_json::Value::Object` preserves insertion order internally, so we
/// re-serialize through a `BTreeMap` to force key ordering before encoding.
pub fn sorted_json(value: &serde_json::Value) -> String {
    fn canonicalize(value: &serde_json::Value) -> serde_json::Value {
        match value {
            serde_json::Value::Object(map) => {
                let sorted: std::collections::BTreeMap<String, serde_json::Value> = map
                    .iter()
                    .map(|(k, v)| (k.clone(), canonicalize(v)))
                    .collect();
                serde_json::to_value(sorted).unwrap_or(serde_json::Value::Null)
            }
            serde_json::Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(canonicalize).collect())
            }
            other => other.clone(),
        }
    }
    serde_json::to_string(&canonicalize(value)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_deterministic() {
        let a = content_digest(&["Action", "2024-01-01T00:00:00Z", "list_files|{}"]);
        let b = content_digest(&["Action", "2024-01-01T00:00:00Z", "list_files|{}"]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn digest_changes_with_input() {
        let a = content_digest(&["Action", "t", "x"]);
        let b = content_digest(&["Action", "t", "y"]);
        assert_ne!(a, b);
    }

    #[test]
    fn sorted_json_orders_keys() {
        let v = serde_json::json!({"b": 1, "a": 2});
        assert_eq!(sorted_json(&v), r#"{"a":2,"b":1}"#);
    }
}
