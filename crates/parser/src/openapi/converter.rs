//! Converts raw document schemas into `SchemaNode` IR

use super::types::{Schema, SchemaType};
use apity_common::{NumberSchema, ObjectSchema, SchemaKind, SchemaNode, StringSchema};
use indexmap::IndexMap;
use serde_json::Value;

/// Classify a raw schema into a schema node
///
/// Precedence: `$ref`, `allOf`, `oneOf`/`anyOf`, then `type`. A `type`
/// array has `"null"` stripped; a single remaining type becomes a
/// `Nullable` node, none at all is `Null`, anything else falls back to
/// string. An untyped schema
/// with properties is treated as an object.
pub fn convert_schema(schema: &Schema) -> SchemaNode {
    SchemaNode {
        kind: classify(schema),
        nullable: schema.nullable.unwrap_or(false),
        description: schema.description.clone(),
    }
}

fn classify(schema: &Schema) -> SchemaKind {
    if let Some(ref_path) = &schema.ref_path {
        return SchemaKind::Ref(ref_path.clone());
    }

    if let Some(members) = non_empty(&schema.all_of) {
        return SchemaKind::AllOf(members.iter().map(convert_schema).collect());
    }

    if let Some(members) = non_empty(&schema.one_of).or_else(|| non_empty(&schema.any_of)) {
        return SchemaKind::OneOf(members.iter().map(convert_schema).collect());
    }

    match &schema.schema_type {
        Some(SchemaType::Single(name)) => kind_for_type(name, schema),
        Some(SchemaType::Multiple(names)) => {
            let has_null = names.iter().any(|n| n == "null");
            let non_null: Vec<&String> = names.iter().filter(|n| *n != "null").collect();

            let inner = match non_null.as_slice() {
                [] if has_null => return SchemaKind::Null,
                [] => return SchemaKind::Any,
                [single] => kind_for_type(single, schema),
                _ => SchemaKind::String(string_schema(schema)),
            };

            if has_null {
                SchemaKind::Nullable(Box::new(SchemaNode::new(inner)))
            } else {
                inner
            }
        }
        None if schema.properties.as_ref().is_some_and(|p| !p.is_empty()) => {
            object_kind(schema)
        }
        None => SchemaKind::Any,
    }
}

fn kind_for_type(name: &str, schema: &Schema) -> SchemaKind {
    match name {
        "string" => SchemaKind::String(string_schema(schema)),
        "number" | "integer" => SchemaKind::Number(NumberSchema {
            integer: name == "integer",
            minimum: schema.minimum.clone(),
            maximum: schema.maximum.clone(),
        }),
        "boolean" => SchemaKind::Boolean,
        "null" => SchemaKind::Null,
        "array" => SchemaKind::Array(
            schema
                .items
                .as_deref()
                .map(|items| Box::new(convert_schema(items))),
        ),
        "object" => object_kind(schema),
        _ => SchemaKind::Any,
    }
}

fn string_schema(schema: &Schema) -> StringSchema {
    let enum_values = schema
        .enum_values
        .iter()
        .flatten()
        .map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();

    StringSchema {
        enum_values,
        format: schema.format.clone(),
        min_length: schema.min_length,
        max_length: schema.max_length,
    }
}

fn object_kind(schema: &Schema) -> SchemaKind {
    let properties: IndexMap<String, SchemaNode> = schema
        .properties
        .iter()
        .flatten()
        .map(|(name, property)| (name.clone(), convert_schema(property)))
        .collect();

    SchemaKind::Object(ObjectSchema {
        properties,
        required: schema.required.clone().unwrap_or_default(),
    })
}

fn non_empty(members: &Option<Vec<Schema>>) -> Option<&Vec<Schema>> {
    members.as_ref().filter(|m| !m.is_empty())
}
