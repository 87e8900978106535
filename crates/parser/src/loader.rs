//! Document loading
//!
//! Reads JSON or YAML into a `serde_json::Value`. YAML mapping keys that
//! are not strings (`200:` in a responses map) are stringified so both
//! formats produce the same tree.

use apity_common::{GeneratorError, Result};
use serde_json::{Map, Number, Value};
use std::fs;
use std::path::Path;

/// Source format of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// `.yaml`/`.yml` is YAML, anything else is JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                DocumentFormat::Yaml
            }
            _ => DocumentFormat::Json,
        }
    }
}

/// Read a document file, picking the format from its extension
pub fn load_file(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        GeneratorError::Parse(format!(
            "Failed to read OpenAPI file {}: {}",
            path.display(),
            e
        ))
    })?;

    match DocumentFormat::from_path(path) {
        DocumentFormat::Json => json_from_str(&content),
        DocumentFormat::Yaml => yaml_from_str(&content),
    }
}

/// Parse a JSON document
pub fn json_from_str(content: &str) -> Result<Value> {
    Ok(serde_json::from_str(content)?)
}

/// Parse a YAML document
pub fn yaml_from_str(content: &str) -> Result<Value> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
    yaml_to_json(yaml)
}

fn yaml_to_json(value: serde_yaml::Value) -> Result<Value> {
    Ok(match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => yaml_number(&n),
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => {
            let mut object = Map::new();
            for (key, value) in mapping {
                object.insert(yaml_key(key)?, yaml_to_json(value)?);
            }
            Value::Object(object)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

fn yaml_number(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Number(i.into())
    } else if let Some(u) = n.as_u64() {
        Value::Number(u.into())
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

fn yaml_key(key: serde_yaml::Value) -> Result<String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Null => Ok("null".to_string()),
        other => Err(GeneratorError::Parse(format!(
            "Unsupported YAML mapping key: {:?}",
            other
        ))),
    }
}
