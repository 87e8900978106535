//! Common types and utilities for the apity endpoint generator
//!
//! This crate contains shared data structures, error types, and generation
//! options used across the parser, generator, and CLI components.

mod options;
mod routes;
mod schema;

pub use options::{GenerateOptions, OutputMode};
pub use routes::{ApiDefinition, HttpMethod, NamedSchema, RouteMethodEntry, RouteTable};
pub use schema::{ref_name, NumberSchema, ObjectSchema, SchemaKind, SchemaNode, StringSchema};

use thiserror::Error;

/// Errors that can occur while importing an API document
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;
