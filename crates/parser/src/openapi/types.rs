//! OpenAPI 3.0 type definitions
//!
//! Typed view over the parts of a document the route extractor reads.
//! Parameters are kept as raw values so malformed entries can be skipped
//! one at a time instead of failing the whole document.
//!
//! Deserialization is lenient below the document root: a field with the
//! wrong shape reads as absent, and a schema slot holding anything other
//! than an object (a 3.1 boolean schema, `null`) reads as an untyped
//! schema.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

/// OpenAPI document root
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenApiSpec {
    /// OpenAPI version (e.g., "3.0.0")
    #[serde(default, deserialize_with = "or_default")]
    pub openapi: String,

    /// API metadata
    #[serde(default, deserialize_with = "or_default")]
    pub info: Info,

    /// API paths, in document order. `null` and malformed path items are skipped.
    #[serde(default, deserialize_with = "path_items")]
    pub paths: IndexMap<String, PathItem>,

    /// Reusable components
    #[serde(default, deserialize_with = "lenient")]
    pub components: Option<Components>,

    /// Servers
    #[serde(default, deserialize_with = "or_default")]
    pub servers: Vec<Server>,
}

/// API information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// Server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    /// Server URL
    pub url: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// Path item
///
/// Every key other than `parameters` lands in `entries`; the route
/// extractor decides which of them are operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathItem {
    /// Parameters shared by every operation on this path
    #[serde(default, deserialize_with = "or_default")]
    pub parameters: Vec<Value>,

    /// Verb keys (`get`, `post`, ...) and any other path item fields
    #[serde(flatten)]
    pub entries: IndexMap<String, Value>,
}

/// HTTP operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "operationId")]
    #[serde(default, deserialize_with = "lenient")]
    pub operation_id: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub summary: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,

    /// Raw parameter entries, references included
    #[serde(default, deserialize_with = "or_default")]
    pub parameters: Vec<Value>,

    #[serde(rename = "requestBody")]
    #[serde(default, deserialize_with = "lenient")]
    pub request_body: Option<RefOr<RequestBody>>,

    /// Responses keyed by status code
    #[serde(default, deserialize_with = "entries")]
    pub responses: IndexMap<String, RefOr<Response>>,

    #[serde(default, deserialize_with = "or_default")]
    pub tags: Vec<String>,
}

/// Parameter definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    /// Location: query, header, path, cookie
    #[serde(rename = "in")]
    pub location: String,

    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "or_default")]
    pub required: bool,

    #[serde(default, deserialize_with = "optional_schema")]
    pub schema: Option<Schema>,
}

/// Request body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,

    /// Content types
    #[serde(default, deserialize_with = "entries")]
    pub content: IndexMap<String, MediaType>,

    #[serde(default, deserialize_with = "or_default")]
    pub required: bool,
}

/// Response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
    #[serde(default, deserialize_with = "or_default")]
    pub description: String,

    /// Content types
    #[serde(default, deserialize_with = "entries")]
    pub content: IndexMap<String, MediaType>,
}

/// Media type
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(default, deserialize_with = "optional_schema")]
    pub schema: Option<Schema>,
}

/// Either a `$ref` object or an inline item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    /// Reference object
    Reference {
        #[serde(rename = "$ref")]
        ref_path: String,
    },

    /// Inline item
    Item(T),
}

impl<T> RefOr<T> {
    /// The inline item, if this is not a reference
    pub fn as_item(&self) -> Option<&T> {
        match self {
            RefOr::Item(item) => Some(item),
            RefOr::Reference { .. } => None,
        }
    }
}

/// `type` is either one name or a list of names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Multiple(Vec<String>),
}

/// Schema object as written in the document
///
/// Build from an arbitrary JSON value with `Schema::from_value`, which
/// never fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "type")]
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,

    #[serde(rename = "$ref")]
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub ref_path: Option<String>,

    /// Properties (for object type), in document order
    #[serde(default, deserialize_with = "properties", skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Schema>>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    /// Items schema (for array type)
    #[serde(default, deserialize_with = "optional_boxed_schema", skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,

    #[serde(rename = "enum")]
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    #[serde(rename = "allOf")]
    #[serde(default, deserialize_with = "schema_list", skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<Schema>>,

    #[serde(rename = "oneOf")]
    #[serde(default, deserialize_with = "schema_list", skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<Schema>>,

    #[serde(rename = "anyOf")]
    #[serde(default, deserialize_with = "schema_list", skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<Schema>>,

    /// Format (e.g., int32, date-time, email)
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub minimum: Option<serde_json::Number>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub maximum: Option<serde_json::Number>,

    #[serde(rename = "minLength")]
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,

    #[serde(rename = "maxLength")]
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl Schema {
    /// Read a schema slot; non-object values become an untyped schema
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            other => {
                debug!(value = %other, "non-object schema read as untyped");
                Schema::default()
            }
        }
    }

    /// Whether the schema carries a non-empty `allOf`
    pub fn has_all_of(&self) -> bool {
        self.all_of.as_ref().is_some_and(|members| !members.is_empty())
    }
}

/// Reusable components
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Components {
    /// Schemas, in document order
    #[serde(default, deserialize_with = "schemas_by_name")]
    pub schemas: IndexMap<String, Schema>,
}

impl OpenApiSpec {
    /// URL of the first declared server, or empty
    pub fn base_url(&self) -> &str {
        self.servers.first().map(|s| s.url.as_str()).unwrap_or("")
    }

    /// Component schemas, empty when the document has none
    pub fn component_schemas(&self) -> impl Iterator<Item = (&String, &Schema)> {
        self.components.iter().flat_map(|c| c.schemas.iter())
    }
}

/// Field that reads as `None` when its value has the wrong shape
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Field that reads as its default when its value has the wrong shape
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(lenient(deserializer)?.unwrap_or_default())
}

/// Map whose malformed entries are dropped one at a time
fn entries<'de, D, T>(deserializer: D) -> Result<IndexMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Object(map) = Value::deserialize(deserializer)? else {
        return Ok(IndexMap::new());
    };

    Ok(map
        .into_iter()
        .filter_map(|(key, value)| match serde_json::from_value(value) {
            Ok(entry) => Some((key, entry)),
            Err(e) => {
                debug!(key = %key, error = %e, "skipping malformed entry");
                None
            }
        })
        .collect())
}

fn path_items<'de, D>(deserializer: D) -> Result<IndexMap<String, PathItem>, D::Error>
where
    D: Deserializer<'de>,
{
    entries(deserializer)
}

fn optional_schema<'de, D>(deserializer: D) -> Result<Option<Schema>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        value => Some(Schema::from_value(value)),
    })
}

fn optional_boxed_schema<'de, D>(deserializer: D) -> Result<Option<Box<Schema>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_schema(deserializer)?.map(Box::new))
}

fn schema_list<'de, D>(deserializer: D) -> Result<Option<Vec<Schema>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(items.into_iter().map(Schema::from_value).collect()),
        _ => None,
    })
}

fn properties<'de, D>(deserializer: D) -> Result<Option<IndexMap<String, Schema>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => Some(
            map.into_iter()
                .map(|(name, value)| (name, Schema::from_value(value)))
                .collect(),
        ),
        _ => None,
    })
}

fn schemas_by_name<'de, D>(deserializer: D) -> Result<IndexMap<String, Schema>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(properties(deserializer)?.unwrap_or_default())
}
