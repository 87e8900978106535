//! Schema node IR
//!
//! A closed representation of one OpenAPI schema object. The parser
//! classifies raw document schemas into these nodes once, and the
//! generator matches on them exhaustively.

use indexmap::IndexMap;
use serde::Serialize;

/// One schema node with the modifiers shared by every kind
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaNode {
    /// What kind of value the schema describes
    pub kind: SchemaKind,

    /// OpenAPI 3.0 `nullable: true`
    pub nullable: bool,

    /// Human readable description
    pub description: Option<String>,
}

/// Schema kinds, one per shape an OpenAPI schema can take
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum SchemaKind {
    /// `$ref` pointer, stored verbatim (e.g. `#/components/schemas/User`)
    Ref(String),

    /// Structural intersection of all members
    AllOf(Vec<SchemaNode>),

    /// Union where the first matching member wins
    OneOf(Vec<SchemaNode>),

    /// Multi-type `type` array containing `"null"`
    Nullable(Box<SchemaNode>),

    String(StringSchema),

    /// `number` and `integer`
    Number(NumberSchema),

    Boolean,

    Null,

    /// Array with optional item schema
    Array(Option<Box<SchemaNode>>),

    Object(ObjectSchema),

    /// Untyped or unrecognized schema
    Any,
}

/// String constraints
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StringSchema {
    /// Allowed literal values, in document order
    pub enum_values: Vec<String>,

    /// Format hint (`date-time`, `email`, ...)
    pub format: Option<String>,

    pub min_length: Option<u64>,

    pub max_length: Option<u64>,
}

/// Numeric constraints
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NumberSchema {
    /// True for `type: integer`
    pub integer: bool,

    pub minimum: Option<serde_json::Number>,

    pub maximum: Option<serde_json::Number>,
}

/// Object shape
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ObjectSchema {
    /// Properties in document order
    pub properties: IndexMap<String, SchemaNode>,

    /// Names of required properties (may contain duplicates)
    pub required: Vec<String>,
}

impl SchemaNode {
    /// Create a node of the given kind with no modifiers
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            nullable: false,
            description: None,
        }
    }

    /// Accept-anything node
    pub fn any() -> Self {
        Self::new(SchemaKind::Any)
    }

    /// Plain string node
    pub fn string() -> Self {
        Self::new(SchemaKind::String(StringSchema::default()))
    }

    /// Reference node
    pub fn reference(ref_path: impl Into<String>) -> Self {
        Self::new(SchemaKind::Ref(ref_path.into()))
    }

    /// Object node from ordered properties and required names
    pub fn object(properties: IndexMap<String, SchemaNode>, required: Vec<String>) -> Self {
        Self::new(SchemaKind::Object(ObjectSchema {
            properties,
            required,
        }))
    }

    /// Collect every `$ref` reachable from this node, in traversal order
    pub fn collect_refs<'a>(&'a self, refs: &mut Vec<&'a str>) {
        match &self.kind {
            SchemaKind::Ref(target) => {
                if !refs.contains(&target.as_str()) {
                    refs.push(target);
                }
            }
            SchemaKind::AllOf(members) | SchemaKind::OneOf(members) => {
                for member in members {
                    member.collect_refs(refs);
                }
            }
            SchemaKind::Nullable(inner) => inner.collect_refs(refs),
            SchemaKind::Array(Some(items)) => items.collect_refs(refs),
            SchemaKind::Object(object) => {
                for property in object.properties.values() {
                    property.collect_refs(refs);
                }
            }
            SchemaKind::String(_)
            | SchemaKind::Number(_)
            | SchemaKind::Boolean
            | SchemaKind::Null
            | SchemaKind::Array(None)
            | SchemaKind::Any => {}
        }
    }
}

/// Final `/` segment of a `$ref` pointer (`#/components/schemas/User` → `User`)
pub fn ref_name(ref_path: &str) -> &str {
    ref_path.rsplit('/').next().unwrap_or("")
}

impl ObjectSchema {
    /// Whether a property is listed in `required`
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}
