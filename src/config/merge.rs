//! Deep merge functionality for layered wizard documents.
//!
//! Plain keys merge field-by-field where higher layer values override lower
//! layer values. Arrays are replaced entirely, not concatenated. The
//! `questions` and `post_actions` collections are merged by entry `id`.

use serde_json::{Map, Value};
use std::collections::HashMap;

/// Top-level keys whose lists are merged by entry id instead of replaced.
pub const MERGEABLE_COLLECTIONS: [&str; 2] = ["questions", "post_actions"];

/// Deep merge two JSON values, with `overlay` taking precedence over `base`.
///
/// - Objects are merged recursively: keys in overlay override keys in base
/// - Arrays, strings, numbers, booleans, nulls are replaced entirely
/// - If overlay is null, the base value is preserved (null means "not specified")
///
/// # Example
/// ```
/// use serde_json::json;
/// use scaffold_wizard::config::deep_merge;
///
/// let base = json!({
///     "name": "database",
///     "choices": [{"name": "SQLite", "value": "sqlite3"}]
/// });
/// let overlay = json!({
///     "default": "postgresql",
///     "choices": [{"name": "PostgreSQL", "value": "postgresql"}]
/// });
/// let result = deep_merge(base, overlay);
/// assert_eq!(result["choices"].as_array().unwrap().len(), 1);
/// assert_eq!(result["name"], "database");
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged_value = if let Some(base_value) = base_map.remove(&key) {
                    deep_merge(base_value, overlay_value)
                } else {
                    overlay_value
                };
                base_map.insert(key, merged_value);
            }
            Value::Object(base_map)
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

/// Merge one layer document over another.
///
/// Identical to [`deep_merge`] except that the [`MERGEABLE_COLLECTIONS`]
/// keys are merged with [`merge_collection`] when both sides hold lists.
pub fn merge_document(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged_value = match base_map.remove(&key) {
                    Some(Value::Array(base_list)) if is_collection_key(&key) => {
                        match overlay_value {
                            Value::Array(overlay_list) => {
                                Value::Array(merge_collection(base_list, overlay_list))
                            }
                            other => deep_merge(Value::Array(base_list), other),
                        }
                    }
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged_value);
            }
            Value::Object(base_map)
        }
        (base, overlay) => deep_merge(base, overlay),
    }
}

/// Merge multiple layer documents in order, with later layers taking precedence.
pub fn merge_all(values: impl IntoIterator<Item = Value>) -> Value {
    values
        .into_iter()
        .fold(Value::Object(Map::new()), merge_document)
}

fn is_collection_key(key: &str) -> bool {
    MERGEABLE_COLLECTIONS.contains(&key)
}

/// The id of a collection entry, if it is a mapping with a non-blank id.
///
/// Numeric and boolean ids are keyed by their text, so `id: 42` and
/// `id: "42"` name the same entry.
pub fn entry_id(entry: &Value) -> Option<String> {
    match entry.get("id")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Merge two entry lists as an id-keyed ordered association.
///
/// Result order: base id-keyed entries in base order, then override-only
/// id-keyed entries in override order, then base entries without an id,
/// then override entries without an id. An id present in both layers is
/// merged with [`deep_merge`], so list fields such as `choices` are
/// replaced wholesale. A repeated id inside the override is kept as a
/// separate entry so validation can report the duplicate.
pub fn merge_collection(base: Vec<Value>, overlay: Vec<Value>) -> Vec<Value> {
    let mut keyed: Vec<Value> = Vec::with_capacity(base.len() + overlay.len());
    let mut base_loose = Vec::new();
    let mut overlay_loose = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for entry in base {
        match entry_id(&entry) {
            Some(id) => {
                positions.entry(id).or_insert(keyed.len());
                keyed.push(entry);
            }
            None => base_loose.push(entry),
        }
    }

    for entry in overlay {
        let Some(id) = entry_id(&entry) else {
            overlay_loose.push(entry);
            continue;
        };
        match positions.remove(&id) {
            Some(index) => {
                let base_entry = std::mem::take(&mut keyed[index]);
                keyed[index] = deep_merge(base_entry, entry);
            }
            None => keyed.push(entry),
        }
    }

    keyed.extend(base_loose);
    keyed.extend(overlay_loose);
    keyed
}
