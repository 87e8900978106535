//! OpenAPI 3.0 document parser
//!
//! Loads a document, resolves internal `$ref` pointers, flattens `allOf`
//! compositions, and extracts the per-path, per-verb route table.
//!
//! ## Usage
//! ```rust,ignore
//! use apity_parser::openapi::OpenApiParser;
//!
//! let parser = OpenApiParser::from_file("openapi.json")?;
//! let api = parser.parse()?;
//! ```

mod composer;
mod converter;
mod document;
mod parser;
mod resolver;
mod routes;
mod types;

pub use composer::process_all_of;
pub use converter::convert_schema;
pub use document::Document;
pub use parser::OpenApiParser;
pub use resolver::{get_ref_name, is_reference_object, resolve_ref};
pub use routes::{extract_routes, normalize_path};
pub use types::*;
