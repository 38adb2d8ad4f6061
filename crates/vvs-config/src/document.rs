//! Config documents: YAML on disk, JSON values in memory.

use anyhow::{Context, Result};
use serde_json::Value;

/// An arbitrary nested key/value document.
pub type Document = Value;

/// Top-level flag asking resolution to continue to the level above.
pub const INHERIT_KEY: &str = "__inherit__";
/// Overlay marker that discards the base before merging.
pub const ALL_KEY: &str = "__all__";
pub const GROUPS_KEY: &str = "groups";
pub const ACCESS_KEY: &str = "access";

/// Parse a YAML config document. A one-element list wrapping a mapping is
/// unwrapped to the mapping.
pub fn parse_document(bytes: &[u8]) -> Result<Document> {
    let value: Value = serde_yaml::from_slice(bytes).context("Failed to parse config document")?;
    Ok(match value {
        Value::Array(mut list) if list.len() == 1 && list[0].is_object() => list.remove(0),
        other => other,
    })
}

/// True when `key` is literally `true` in a mapping document.
pub(crate) fn flag_set(doc: &Document, key: &str) -> bool {
    doc.get(key).and_then(Value::as_bool) == Some(true)
}
