//! Route table IR shared between the route extractor and endpoint codegen

use crate::schema::SchemaNode;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// HTTP verbs an OpenAPI path item can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    /// Parse a path item key (`get`, `post`, ...). Case-insensitive.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "get" => Some(Self::Get),
            "put" => Some(Self::Put),
            "post" => Some(Self::Post),
            "delete" => Some(Self::Delete),
            "options" => Some(Self::Options),
            "head" => Some(Self::Head),
            "patch" => Some(Self::Patch),
            "trace" => Some(Self::Trace),
            _ => None,
        }
    }

    /// Uppercase verb as written in generated code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
            Self::Patch => "PATCH",
            Self::Trace => "TRACE",
        }
    }

    /// GET endpoints are fetch endpoints, everything else mutates
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named parameter schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedSchema {
    pub name: String,
    pub schema: SchemaNode,
    pub required: bool,
}

/// Everything codegen needs for one (path, verb) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMethodEntry {
    pub method: HttpMethod,

    /// 200 `application/json` response schema; `None` emits a void validator
    pub response: Option<SchemaNode>,

    /// `application/json` request body schema
    pub body: Option<SchemaNode>,

    /// Query parameters in declaration order
    pub query: Vec<NamedSchema>,

    /// Path parameters in declaration order
    pub path_params: Vec<NamedSchema>,
}

impl RouteMethodEntry {
    /// Create an entry with no schemas
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            response: None,
            body: None,
            query: Vec::new(),
            path_params: Vec::new(),
        }
    }

    /// Synthetic `type: object` schema over the query parameters
    pub fn query_schema(&self) -> Option<SchemaNode> {
        params_object(&self.query)
    }

    /// Path parameter names in declaration order
    pub fn path_param_names(&self) -> impl Iterator<Item = &str> {
        self.path_params.iter().map(|p| p.name.as_str())
    }
}

fn params_object(params: &[NamedSchema]) -> Option<SchemaNode> {
    if params.is_empty() {
        return None;
    }

    let properties = params
        .iter()
        .map(|p| (p.name.clone(), p.schema.clone()))
        .collect();
    let required = params
        .iter()
        .filter(|p| p.required)
        .map(|p| p.name.clone())
        .collect();

    Some(SchemaNode::object(properties, required))
}

/// Normalized path (`/users/[id]`) to per-verb entries, in document order
pub type RouteTable = IndexMap<String, IndexMap<HttpMethod, RouteMethodEntry>>;

/// Parsed API ready for code generation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDefinition {
    /// First declared server URL, or empty
    pub base_url: String,

    /// Component schemas with top-level `allOf` merged, in document order
    pub schemas: IndexMap<String, SchemaNode>,

    pub routes: RouteTable,
}

impl ApiDefinition {
    /// Number of (path, verb) pairs
    pub fn endpoint_count(&self) -> usize {
        self.routes.values().map(IndexMap::len).sum()
    }
}
