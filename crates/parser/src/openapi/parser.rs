//! OpenAPI document parser

use super::converter::convert_schema;
use super::document::Document;
use super::routes::extract_routes;
use super::composer::process_all_of;
use crate::{loader, swagger};
use apity_common::{ApiDefinition, Result};
use indexmap::IndexMap;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// OpenAPI specification parser
///
/// Loads OpenAPI 3.x or Swagger 2.0 documents from JSON or YAML and turns
/// them into an `ApiDefinition` ready for code generation.
pub struct OpenApiParser {
    document: Document,
}

impl OpenApiParser {
    /// Load a document from a file path
    ///
    /// `.yaml`/`.yml` files are read as YAML, everything else as JSON.
    ///
    /// # Example
    /// ```rust,ignore
    /// let parser = OpenApiParser::from_file("openapi.yaml")?;
    /// let api = parser.parse()?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = loader::load_file(path.as_ref())?;
        Self::from_value(raw)
    }

    /// Parse a document from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_value(loader::json_from_str(json)?)
    }

    /// Parse a document from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Self::from_value(loader::yaml_from_str(yaml)?)
    }

    /// Build from an already parsed JSON tree, converting Swagger 2.0
    pub fn from_value(raw: Value) -> Result<Self> {
        let raw = swagger::convert_to_openapi3(raw)?;
        let document = Document::from_value(raw)?;
        debug!(
            paths = document.spec().paths.len(),
            title = %document.spec().info.title,
            "loaded OpenAPI document"
        );
        Ok(Self { document })
    }

    /// Parse into an `ApiDefinition`
    pub fn parse(&self) -> Result<ApiDefinition> {
        let spec = self.document.spec();

        let schemas: IndexMap<_, _> = spec
            .component_schemas()
            .map(|(name, schema)| {
                let composed = process_all_of(schema, &self.document);
                (name.clone(), convert_schema(&composed))
            })
            .collect();

        Ok(ApiDefinition {
            base_url: spec.base_url().to_string(),
            schemas,
            routes: extract_routes(&self.document),
        })
    }

    /// Get reference to the loaded document
    pub fn document(&self) -> &Document {
        &self.document
    }
}
