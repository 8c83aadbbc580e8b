use ahash::AHashMap;
use percent_encoding::percent_decode_str;
use serde_json::Value;

use crate::pointer::{is_pointer, pointer};

/// Externally supplied documents, keyed by the exact string a reference uses to select them.
pub type Documents = AHashMap<String, Value>;

/// Find the first node (depth-first, document order) whose `id` or `$id` equals `id`.
#[must_use]
pub fn find_by_id<'a>(document: &'a Value, id: &str) -> Option<&'a Value> {
    match document {
        Value::Object(map) => {
            let matches = |key: &str| map.get(key).and_then(Value::as_str) == Some(id);
            if matches("id") || matches("$id") {
                return Some(document);
            }
            map.values().find_map(|value| find_by_id(value, id))
        }
        Value::Array(items) => items.iter().find_map(|value| find_by_id(value, id)),
        _ => None,
    }
}

/// Resolve `reference` against `root` and the external `documents`.
///
/// See the crate documentation for the lookup order.
#[must_use]
pub fn resolve<'a>(root: &'a Value, documents: &'a Documents, reference: &str) -> Option<&'a Value> {
    if let Some(found) = find_by_id(root, reference) {
        return Some(found);
    }
    let stripped = reference.strip_prefix('#').unwrap_or(reference);
    let decoded = percent_decode_str(stripped)
        .decode_utf8()
        .unwrap_or_else(|_| stripped.into());
    if is_pointer(&decoded) {
        return pointer(root, &decoded);
    }
    let stripped = stripped.strip_suffix('/').unwrap_or(stripped);
    match stripped.split_once('#') {
        None => documents.get(stripped),
        Some((key, fragment)) => {
            let document = documents.get(key)?;
            if is_pointer(fragment) {
                pointer(document, fragment)
            } else {
                Some(document)
            }
        }
    }
}
