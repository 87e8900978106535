//! API document parsing for the apity endpoint generator
//!
//! This crate turns OpenAPI 3.x and Swagger 2.0 documents (JSON or YAML)
//! into the `ApiDefinition` IR consumed by the generator.
//!
//! ## Pipeline
//!
//! - file → JSON/YAML tree (`loader`)
//! - Swagger 2.0 → OpenAPI 3.0 (`swagger`)
//! - component schemas with top-level `allOf` flattened
//! - route table: `{param}` paths become `[param]`, one entry per verb

pub mod loader;
pub mod openapi;
pub mod swagger;

pub use openapi::{
    extract_routes, get_ref_name, is_reference_object, process_all_of, resolve_ref, Document,
    OpenApiParser,
};
pub use swagger::convert_to_openapi3;

use apity_common::{ApiDefinition, Result};
use std::path::Path;

/// Parse an API document file into an `ApiDefinition`
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ApiDefinition> {
    OpenApiParser::from_file(path)?.parse()
}
