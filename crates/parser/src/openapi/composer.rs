//! `allOf` flattening

use super::document::Document;
use super::resolver::resolve_ref;
use super::types::Schema;
use indexmap::IndexMap;
use tracing::debug;

/// Merge a schema's `allOf` members into a single schema
///
/// Members are folded in order: referenced members are resolved (and
/// skipped when they cannot be), nested `allOf` is flattened, properties
/// from later members replace earlier ones, `required` lists are
/// concatenated, and `type`/`format`/`description` keep the first value
/// seen. `oneOf` is left untouched. Returns the schema unchanged when it has
/// no `allOf` members.
pub fn process_all_of(schema: &Schema, doc: &Document) -> Schema {
    let mut expanding = Vec::new();
    compose(schema, doc, &mut expanding)
}

fn compose(schema: &Schema, doc: &Document, expanding: &mut Vec<String>) -> Schema {
    let members = match schema.all_of.as_deref() {
        Some(members) if !members.is_empty() => members,
        _ => return schema.clone(),
    };

    let mut merged = Schema {
        all_of: None,
        ..schema.clone()
    };

    for member in members {
        let resolved = match member.ref_path.as_deref() {
            Some(ref_path) => {
                if expanding.iter().any(|r| r == ref_path) {
                    debug!(ref_path, "skipping recursive allOf member");
                    continue;
                }
                let Some(target) = resolve_ref(ref_path, doc) else {
                    debug!(ref_path, "skipping unresolved allOf member");
                    continue;
                };
                expanding.push(ref_path.to_string());
                let composed = compose(&target, doc, expanding);
                expanding.pop();
                composed
            }
            None => compose(member, doc, expanding),
        };

        merge_member(&mut merged, resolved);
    }

    merged
}

fn merge_member(merged: &mut Schema, member: Schema) {
    if let Some(properties) = member.properties {
        merged
            .properties
            .get_or_insert_with(IndexMap::new)
            .extend(properties);
    }

    if let Some(required) = member.required {
        merged.required.get_or_insert_with(Vec::new).extend(required);
    }

    if merged.schema_type.is_none() {
        merged.schema_type = member.schema_type;
    }
    if merged.format.is_none() {
        merged.format = member.format;
    }
    if merged.description.is_none() {
        merged.description = member.description;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::types::SchemaType;
    use serde_json::json;

    fn doc() -> Document {
        Document::from_value(json!({
            "openapi": "3.0.0",
            "paths": {},
            "components": {
                "schemas": {
                    "Base": {
                        "type": "object",
                        "description": "Base entity",
                        "properties": {
                            "id": {"type": "string"},
                            "name": {"type": "string"}
                        },
                        "required": ["id"]
                    },
                    "Timestamped": {
                        "allOf": [
                            {"$ref": "#/components/schemas/Base"},
                            {"properties": {"createdAt": {"type": "string", "format": "date-time"}}}
                        ]
                    },
                    "Loop": {
                        "allOf": [{"$ref": "#/components/schemas/Loop"}, {"properties": {"x": {"type": "string"}}}]
                    }
                }
            }
        }))
        .unwrap()
    }

    fn schema(value: serde_json::Value) -> Schema {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_identity_without_all_of() {
        let input = schema(json!({"type": "string", "minLength": 2}));
        assert_eq!(process_all_of(&input, &doc()), input);

        let input = schema(json!({"type": "object", "allOf": []}));
        assert_eq!(process_all_of(&input, &doc()), input);
    }

    #[test]
    fn test_later_members_override_properties() {
        let input = schema(json!({
            "allOf": [
                {"$ref": "#/components/schemas/Base"},
                {
                    "properties": {"name": {"type": "integer"}, "email": {"type": "string"}},
                    "required": ["id", "email"]
                }
            ]
        }));

        let merged = process_all_of(&input, &doc());
        assert!(merged.all_of.is_none());
        assert_eq!(
            merged.schema_type,
            Some(SchemaType::Single("object".to_string()))
        );
        assert_eq!(merged.description.as_deref(), Some("Base entity"));

        let properties = merged.properties.unwrap();
        assert_eq!(
            properties.keys().collect::<Vec<_>>(),
            vec!["id", "name", "email"]
        );
        assert_eq!(
            properties["name"].schema_type,
            Some(SchemaType::Single("integer".to_string()))
        );

        // duplicates are kept
        assert_eq!(merged.required.unwrap(), vec!["id", "id", "email"]);
    }

    #[test]
    fn test_nested_all_of_is_flattened() {
        let input = schema(json!({
            "allOf": [
                {"$ref": "#/components/schemas/Timestamped"},
                {"properties": {"deleted": {"type": "boolean"}}}
            ]
        }));

        let merged = process_all_of(&input, &doc());
        let properties = merged.properties.unwrap();
        assert_eq!(
            properties.keys().collect::<Vec<_>>(),
            vec!["id", "name", "createdAt", "deleted"]
        );
    }

    #[test]
    fn test_unresolved_members_are_skipped() {
        let input = schema(json!({
            "allOf": [
                {"$ref": "#/components/schemas/Missing"},
                {"type": "object", "properties": {"id": {"type": "string"}}}
            ]
        }));

        let merged = process_all_of(&input, &doc());
        assert_eq!(merged.properties.unwrap().len(), 1);
    }

    #[test]
    fn test_first_type_wins() {
        let input = schema(json!({
            "allOf": [
                {"type": "object", "format": "first"},
                {"type": "string", "format": "second", "description": "later"}
            ]
        }));

        let merged = process_all_of(&input, &doc());
        assert_eq!(
            merged.schema_type,
            Some(SchemaType::Single("object".to_string()))
        );
        assert_eq!(merged.format.as_deref(), Some("first"));
        assert_eq!(merged.description.as_deref(), Some("later"));
    }

    #[test]
    fn test_recursive_reference_terminates() {
        let input = schema(json!({"allOf": [{"$ref": "#/components/schemas/Loop"}]}));
        let merged = process_all_of(&input, &doc());
        assert!(merged.properties.unwrap().contains_key("x"));
    }

    #[test]
    fn test_one_of_is_not_merged() {
        let input = schema(json!({
            "allOf": [{"type": "object"}],
            "oneOf": [{"type": "string"}, {"type": "number"}]
        }));

        let merged = process_all_of(&input, &doc());
        assert_eq!(merged.one_of.unwrap().len(), 2);
    }
}
