//! Schema node to zod validator expressions

use crate::code_builder::CodeBuilder;
use crate::naming::{escape_string, property_key, schema_ident};
use apity_common::{ref_name, NumberSchema, ObjectSchema, SchemaKind, SchemaNode, StringSchema};
use std::collections::HashSet;
use tracing::debug;

/// Nesting depth past which `z.unknown()` is emitted instead of recursing
pub const MAX_DEPTH: usize = 64;

/// Render a zod expression for `node`
///
/// `known_schemas` holds the component schema names that are declared in
/// the generated output; references to anything else become
/// `z.unknown()`. Modifiers are appended in order: `.nullable()`,
/// `.describe(...)`, then `.optional()` when `is_required` is false.
pub fn schema_to_validator(
    node: &SchemaNode,
    is_required: bool,
    known_schemas: &HashSet<String>,
) -> String {
    Emitter { known_schemas }.emit(node, is_required, 0)
}

struct Emitter<'a> {
    known_schemas: &'a HashSet<String>,
}

impl Emitter<'_> {
    fn emit(&self, node: &SchemaNode, is_required: bool, depth: usize) -> String {
        let mut out = if depth > MAX_DEPTH {
            debug!(depth, "schema nesting too deep, emitting z.unknown()");
            "z.unknown()".to_string()
        } else {
            self.emit_kind(&node.kind, depth)
        };

        if node.nullable {
            out.push_str(".nullable()");
        }
        if let Some(description) = &node.description {
            out.push_str(&format!(".describe('{}')", escape_string(description)));
        }
        if !is_required {
            out.push_str(".optional()");
        }
        out
    }

    fn emit_kind(&self, kind: &SchemaKind, depth: usize) -> String {
        match kind {
            SchemaKind::Ref(target) => self.emit_ref(target),
            SchemaKind::AllOf(members) => self
                .emit_members(members, depth)
                .into_iter()
                .reduce(|acc, member| format!("z.intersection({}, {})", acc, member))
                .unwrap_or_else(unknown),
            SchemaKind::OneOf(members) => self
                .emit_members(members, depth)
                .into_iter()
                .reduce(|acc, member| format!("{}.or({})", acc, member))
                .unwrap_or_else(unknown),
            SchemaKind::Nullable(inner) => {
                format!("{}.nullable()", self.emit(inner, true, depth + 1))
            }
            SchemaKind::String(string) => emit_string(string),
            SchemaKind::Number(number) => emit_number(number),
            SchemaKind::Boolean => "z.boolean()".to_string(),
            SchemaKind::Null => "z.null()".to_string(),
            SchemaKind::Array(Some(items)) => {
                format!("z.array({})", self.emit(items, true, depth + 1))
            }
            SchemaKind::Array(None) => "z.array(z.unknown())".to_string(),
            SchemaKind::Object(object) => self.emit_object(object, depth),
            SchemaKind::Any => unknown(),
        }
    }

    fn emit_ref(&self, target: &str) -> String {
        let name = ref_name(target);
        if self.known_schemas.contains(name) {
            format!("z.lazy(() => {})", schema_ident(name))
        } else {
            debug!(target, "reference to undeclared schema, emitting z.unknown()");
            unknown()
        }
    }

    fn emit_members(&self, members: &[SchemaNode], depth: usize) -> Vec<String> {
        members
            .iter()
            .map(|member| self.emit(member, true, depth + 1))
            .collect()
    }

    fn emit_object(&self, object: &ObjectSchema, depth: usize) -> String {
        if object.properties.is_empty() {
            return "z.object({})".to_string();
        }

        let mut builder = CodeBuilder::new();
        builder.block("z.object({", "})", |b| {
            for (name, property) in &object.properties {
                let value = self.emit(property, object.is_required(name), depth + 1);
                b.line(format!("{}: {},", property_key(name), value));
            }
        });
        builder.finish()
    }
}

fn emit_string(string: &StringSchema) -> String {
    if !string.enum_values.is_empty() {
        let values: Vec<String> = string
            .enum_values
            .iter()
            .map(|v| format!("'{}'", escape_string(v)))
            .collect();
        return format!("z.enum([{}])", values.join(", "));
    }

    match string.format.as_deref() {
        Some("date-time") => "z.string().datetime()".to_string(),
        Some("email") => "z.string().email()".to_string(),
        _ => {
            let mut out = "z.string()".to_string();
            if let Some(min) = string.min_length {
                out.push_str(&format!(".min({})", min));
            }
            if let Some(max) = string.max_length {
                out.push_str(&format!(".max({})", max));
            }
            out
        }
    }
}

fn emit_number(number: &NumberSchema) -> String {
    let mut out = "z.number()".to_string();
    if let Some(min) = &number.minimum {
        out.push_str(&format!(".min({})", min));
    }
    if let Some(max) = &number.maximum {
        out.push_str(&format!(".max({})", max));
    }
    out
}

fn unknown() -> String {
    "z.unknown()".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn known(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn emit(node: &SchemaNode) -> String {
        schema_to_validator(node, true, &known(&["User", "Pet"]))
    }

    fn string_with(f: impl FnOnce(&mut StringSchema)) -> SchemaNode {
        let mut string = StringSchema::default();
        f(&mut string);
        SchemaNode::new(SchemaKind::String(string))
    }

    fn number(minimum: Option<serde_json::Number>, maximum: Option<serde_json::Number>) -> SchemaNode {
        SchemaNode::new(SchemaKind::Number(NumberSchema {
            integer: false,
            minimum,
            maximum,
        }))
    }

    #[test]
    fn test_known_ref_is_lazy() {
        assert_eq!(
            emit(&SchemaNode::reference("#/components/schemas/User")),
            "z.lazy(() => UserSchema)"
        );
    }

    #[test]
    fn test_unknown_ref_is_unknown() {
        assert_eq!(
            emit(&SchemaNode::reference("#/components/schemas/Ghost")),
            "z.unknown()"
        );
    }

    #[test]
    fn test_all_of_folds_into_intersections() {
        let node = SchemaNode::new(SchemaKind::AllOf(vec![
            SchemaNode::reference("#/components/schemas/User"),
            SchemaNode::reference("#/components/schemas/Pet"),
            SchemaNode::new(SchemaKind::Boolean),
        ]));
        assert_eq!(
            emit(&node),
            "z.intersection(z.intersection(z.lazy(() => UserSchema), z.lazy(() => PetSchema)), z.boolean())"
        );

        let single = SchemaNode::new(SchemaKind::AllOf(vec![SchemaNode::string()]));
        assert_eq!(emit(&single), "z.string()");
    }

    #[test]
    fn test_one_of_chains_or() {
        let node = SchemaNode::new(SchemaKind::OneOf(vec![
            SchemaNode::reference("#/components/schemas/User"),
            SchemaNode::reference("#/components/schemas/Pet"),
            SchemaNode::string(),
        ]));
        assert_eq!(
            emit(&node),
            "z.lazy(() => UserSchema).or(z.lazy(() => PetSchema)).or(z.string())"
        );

        let single = SchemaNode::new(SchemaKind::OneOf(vec![SchemaNode::string()]));
        assert_eq!(emit(&single), "z.string()");
    }

    #[test]
    fn test_nullable_type_array() {
        let node = SchemaNode::new(SchemaKind::Nullable(Box::new(SchemaNode::string())));
        assert_eq!(emit(&node), "z.string().nullable()");
    }

    #[test]
    fn test_string_variants() {
        let node = string_with(|s| {
            s.enum_values = vec!["pending".into(), "approved".into(), "rejected".into()]
        });
        assert_eq!(emit(&node), "z.enum(['pending', 'approved', 'rejected'])");

        let node = string_with(|s| s.enum_values = vec!["it's".into()]);
        assert_eq!(emit(&node), "z.enum(['it\\'s'])");

        let node = string_with(|s| s.format = Some("date-time".into()));
        assert_eq!(emit(&node), "z.string().datetime()");

        let node = string_with(|s| s.format = Some("email".into()));
        assert_eq!(emit(&node), "z.string().email()");

        let node = string_with(|s| {
            s.min_length = Some(5);
            s.max_length = Some(10);
        });
        assert_eq!(emit(&node), "z.string().min(5).max(10)");
    }

    #[test]
    fn test_number_bounds() {
        assert_eq!(
            emit(&number(Some(1.into()), Some(100.into()))),
            "z.number().min(1).max(100)"
        );
        assert_eq!(
            emit(&number(
                serde_json::Number::from_f64(0.1),
                serde_json::Number::from_f64(9.9)
            )),
            "z.number().min(0.1).max(9.9)"
        );
        assert_eq!(emit(&number(Some(1.into()), None)), "z.number().min(1)");
    }

    #[test]
    fn test_scalars_and_arrays() {
        assert_eq!(emit(&SchemaNode::new(SchemaKind::Boolean)), "z.boolean()");
        assert_eq!(emit(&SchemaNode::new(SchemaKind::Null)), "z.null()");
        assert_eq!(emit(&SchemaNode::any()), "z.unknown()");
        assert_eq!(
            emit(&SchemaNode::new(SchemaKind::Array(None))),
            "z.array(z.unknown())"
        );
        assert_eq!(
            emit(&SchemaNode::new(SchemaKind::Array(Some(Box::new(
                SchemaNode::reference("#/components/schemas/Pet")
            ))))),
            "z.array(z.lazy(() => PetSchema))"
        );
    }

    #[test]
    fn test_object_properties_and_optionality() {
        let mut properties = IndexMap::new();
        properties.insert("id".to_string(), SchemaNode::string());
        properties.insert("content-type".to_string(), SchemaNode::string());
        let node = SchemaNode::object(properties, vec!["id".to_string()]);

        assert_eq!(
            emit(&node),
            "z.object({\n  id: z.string(),\n  'content-type': z.string().optional(),\n})"
        );
        assert_eq!(
            emit(&SchemaNode::object(IndexMap::new(), vec![])),
            "z.object({})"
        );
    }

    #[test]
    fn test_nested_objects_are_indented() {
        let mut inner = IndexMap::new();
        inner.insert("name".to_string(), SchemaNode::string());
        let mut outer = IndexMap::new();
        outer.insert(
            "owner".to_string(),
            SchemaNode::object(inner, vec!["name".to_string()]),
        );
        let node = SchemaNode::object(outer, vec!["owner".to_string()]);

        assert_eq!(
            emit(&node),
            "z.object({\n  owner: z.object({\n    name: z.string(),\n  }),\n})"
        );
    }

    #[test]
    fn test_modifier_order() {
        let mut node = SchemaNode::string();
        node.nullable = true;
        node.description = Some("User's `name`".to_string());

        assert_eq!(
            schema_to_validator(&node, false, &HashSet::new()),
            "z.string().nullable().describe('User\\'s \\`name\\`').optional()"
        );
    }

    #[test]
    fn test_depth_guard() {
        let mut node = SchemaNode::string();
        for _ in 0..(MAX_DEPTH + 10) {
            node = SchemaNode::new(SchemaKind::Array(Some(Box::new(node))));
        }

        let out = emit(&node);
        assert!(out.contains("z.unknown()"));
        assert!(!out.contains("z.string()"));
    }
}
