//! Loaded OpenAPI 3 document

use super::types::OpenApiSpec;
use apity_common::{GeneratorError, Result};
use serde_json::Value;

/// An OpenAPI 3 document, typed and raw
///
/// The typed view drives route extraction. The raw tree is kept so `$ref`
/// pointers can reach any location, not just `components.schemas`.
#[derive(Debug, Clone)]
pub struct Document {
    spec: OpenApiSpec,
    raw: Value,
}

impl Document {
    /// Build from an OpenAPI 3 JSON tree
    pub fn from_value(raw: Value) -> Result<Self> {
        let spec: OpenApiSpec = serde_json::from_value(raw.clone())
            .map_err(|e| GeneratorError::Parse(format!("Invalid OpenAPI document: {}", e)))?;

        Ok(Self { spec, raw })
    }

    /// Typed view of the document
    pub fn spec(&self) -> &OpenApiSpec {
        &self.spec
    }

    /// Raw JSON tree
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}
