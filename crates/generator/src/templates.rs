//! Template loading and management

use crate::naming::escape_string;
use apity_common::{GeneratorError, Result};
use std::collections::HashMap;
use tera::{Tera, Value};

/// Single-file output: schemas, endpoints, and the api instance
pub const ENDPOINTS: &str = "endpoints.ts";

/// File-based output: component validators
pub const SCHEMAS: &str = "schemas.ts";

/// File-based output: one route path
pub const ROUTE: &str = "route.ts";

/// Load all templates
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();

    tera.register_filter("ts_string", ts_string_filter);

    tera.add_raw_template(ENDPOINTS, include_str!("../templates/endpoints.ts.tera"))
        .map_err(|e| {
            GeneratorError::Generation(format!("Failed to load endpoints.ts template: {}", e))
        })?;

    tera.add_raw_template(SCHEMAS, include_str!("../templates/schemas.ts.tera"))
        .map_err(|e| {
            GeneratorError::Generation(format!("Failed to load schemas.ts template: {}", e))
        })?;

    tera.add_raw_template(ROUTE, include_str!("../templates/route.ts.tera"))
        .map_err(|e| {
            GeneratorError::Generation(format!("Failed to load route.ts template: {}", e))
        })?;

    Ok(tera)
}

/// Render a template, ending the output with exactly one newline
pub fn render(tera: &Tera, name: &str, context: &tera::Context) -> Result<String> {
    let rendered = tera
        .render(name, context)
        .map_err(|e| GeneratorError::Generation(format!("Template error in {}: {:?}", name, e)))?;

    let mut output = rendered.trim_end().to_string();
    output.push('\n');
    Ok(output)
}

/// Filter to escape a value for a single-quoted TypeScript string
fn ts_string_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("ts_string filter expects a string"))?;

    Ok(Value::String(escape_string(s)))
}
