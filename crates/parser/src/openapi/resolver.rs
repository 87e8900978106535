//! Internal `$ref` resolution

use super::document::Document;
use super::types::Schema;
use serde_json::Value;
use tracing::debug;

/// Resolve a local JSON pointer (`#/components/schemas/User`) to a schema
///
/// Returns `None` for external refs and missing targets. A target that is
/// not a schema object reads as an untyped schema.
pub fn resolve_ref(ref_path: &str, doc: &Document) -> Option<Schema> {
    let pointer = match ref_path.strip_prefix("#/") {
        Some(pointer) => pointer,
        None => {
            debug!(ref_path, "unsupported non-local reference");
            return None;
        }
    };

    let mut current = doc.raw();
    for segment in pointer.split('/') {
        let segment = segment.replace("~1", "/").replace("~0", "~");
        current = match current {
            Value::Object(map) => map.get(&segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(Schema::from_value(current.clone()))
}

/// Final `/` segment of a reference, used as the component name
pub fn get_ref_name(ref_path: &str) -> &str {
    apity_common::ref_name(ref_path)
}

/// Whether a value is a `{"$ref": ...}` object
pub fn is_reference_object(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|object| object.contains_key("$ref"))
}
