//! Content fingerprints and provenance stamping.
//!
//! Fingerprints identify content for deduplication. They are not a defence
//! against tampering.

use crate::canon::{canonical_json_bytes, sha256_hex};
use crate::error::Result;
use crate::schema::{Provenance, VideoPack};
use serde_json::Value;
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// SHA-256 over the canonical (key-sorted, compact) JSON form of `value`.
pub fn stable_hash(value: &Value) -> String {
    sha256_hex(&canonical_json_bytes(value))
}

/// Fingerprint of a pack's extracted content. `id` and `provenance` are left
/// out, so two runs over the same material agree.
pub fn pack_fingerprint(pack: &VideoPack) -> Result<String> {
    let mut value = pack.to_value()?;
    if let Some(obj) = value.as_object_mut() {
        obj.remove("id");
        obj.remove("provenance");
    }
    Ok(stable_hash(&value))
}

impl Provenance {
    /// Stamped with the current UTC time and no tool versions.
    pub fn now() -> Self {
        Provenance {
            created_at: OffsetDateTime::now_utc(),
            tool_versions: BTreeMap::new(),
            source_hash: None,
            notes: None,
        }
    }

    pub fn with_tool(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.tool_versions.insert(name.into(), version.into());
        self
    }

    /// Record the fingerprint of the material the pack was built from.
    pub fn with_source(mut self, source: &Value) -> Self {
        self.source_hash = Some(stable_hash(source));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Transcript;
    use serde_json::json;

    #[test]
    fn key_order_does_not_matter() {
        let a: Value = serde_json::from_str(r#"{"a":1,"b":2}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"b":2,"a":1}"#).unwrap();
        assert_eq!(stable_hash(&a), stable_hash(&b));

        let nested_a = json!({"outer": {"x": [1, {"q": 1, "p": 2}], "y": null}});
        let nested_b = json!({"outer": {"y": null, "x": [1, {"p": 2, "q": 1}]}});
        assert_eq!(stable_hash(&nested_a), stable_hash(&nested_b));
    }

    #[test]
    fn any_value_change_changes_hash() {
        assert_ne!(stable_hash(&json!({"a": 1})), stable_hash(&json!({"a": 2})));
        assert_ne!(stable_hash(&json!({"a": 1})), stable_hash(&json!({"b": 1})));
        assert_ne!(stable_hash(&json!([1, 2])), stable_hash(&json!([2, 1])));
    }

    #[test]
    fn hash_is_hex_sha256_of_compact_form() {
        let h = stable_hash(&json!({"b": 2, "a": 1}));
        assert_eq!(h, sha256_hex(br#"{"a":1,"b":2}"#));
        assert_eq!(h.len(), 64);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit() && !c.is_uppercase()));
    }

    #[test]
    fn fingerprint_ignores_identity_and_provenance() {
        let make = |tool: &str| {
            VideoPack::new(
                "vid-123",
                Transcript::new("same words", vec![]),
                Provenance::now().with_tool("yt_api", tool),
            )
            .unwrap()
        };
        let a = make("3");
        let b = make("4");
        assert_ne!(a.id, b.id);
        assert_eq!(pack_fingerprint(&a).unwrap(), pack_fingerprint(&b).unwrap());

        let mut c = make("3");
        c.concepts.push("extra".into());
        assert_ne!(pack_fingerprint(&a).unwrap(), pack_fingerprint(&c).unwrap());
    }

    #[test]
    fn builders_fill_provenance() {
        let source = json!({"video_id": "abc", "transcript": {"full_text": "x"}});
        let p = Provenance::now()
            .with_tool("mcp", "1.2")
            .with_source(&source);
        assert_eq!(p.tool_versions.get("mcp").map(String::as_str), Some("1.2"));
        assert_eq!(p.source_hash, Some(stable_hash(&source)));
    }
}
