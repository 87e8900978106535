//! Route table extraction

use super::composer::process_all_of;
use super::converter::convert_schema;
use super::document::Document;
use super::resolver::is_reference_object;
use super::types::{MediaType, Operation, Parameter, Schema};
use apity_common::{HttpMethod, NamedSchema, RouteMethodEntry, RouteTable, SchemaNode};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Build the route table for every path and HTTP verb in the document
pub fn extract_routes(doc: &Document) -> RouteTable {
    let mut routes = RouteTable::new();

    for (path, path_item) in &doc.spec().paths {
        let mut methods = IndexMap::new();

        for (key, value) in &path_item.entries {
            let Some(method) = HttpMethod::from_key(key) else {
                continue;
            };

            let operation: Operation = match serde_json::from_value(value.clone()) {
                Ok(operation) => operation,
                Err(e) => {
                    warn!(path = %path, method = %method, error = %e, "skipping operation that is not an object");
                    continue;
                }
            };

            let entry = extract_method(method, &operation, &path_item.parameters, doc);
            methods.insert(method, entry);
        }

        routes.insert(normalize_path(path), methods);
    }

    routes
}

/// Rewrite `{name}` template segments as `[name]`
pub fn normalize_path(path: &str) -> String {
    path.replace('{', "[").replace('}', "]")
}

fn extract_method(
    method: HttpMethod,
    operation: &Operation,
    shared_parameters: &[Value],
    doc: &Document,
) -> RouteMethodEntry {
    let mut entry = RouteMethodEntry::new(method);

    entry.response = operation
        .responses
        .get("200")
        .and_then(|response| response.as_item())
        .and_then(|response| json_schema(&response.content))
        .map(|schema| resolve_schema(schema, doc));

    entry.body = operation
        .request_body
        .as_ref()
        .and_then(|body| body.as_item())
        .and_then(|body| json_schema(&body.content))
        .map(|schema| resolve_schema(schema, doc));

    for parameter in merge_parameters(shared_parameters, &operation.parameters) {
        let named = NamedSchema {
            schema: parameter
                .schema
                .as_ref()
                .map(|schema| resolve_schema(schema, doc))
                .unwrap_or_else(SchemaNode::any),
            name: parameter.name,
            required: parameter.required,
        };

        match parameter.location.as_str() {
            "query" => entry.query.push(named),
            "path" => entry.path_params.push(named),
            _ => {}
        }
    }

    entry
}

fn json_schema(content: &IndexMap<String, MediaType>) -> Option<&Schema> {
    content
        .get(JSON_CONTENT_TYPE)
        .and_then(|media| media.schema.as_ref())
}

/// Compose a top-level `allOf` before classifying
fn resolve_schema(schema: &Schema, doc: &Document) -> SchemaNode {
    if schema.has_all_of() {
        convert_schema(&process_all_of(schema, doc))
    } else {
        convert_schema(schema)
    }
}

/// Path-level parameters followed by operation parameters. An operation
/// parameter replaces a path-level one with the same name and location.
fn merge_parameters(shared: &[Value], own: &[Value]) -> Vec<Parameter> {
    let mut merged: Vec<Parameter> = Vec::new();

    for parameter in shared.iter().chain(own).filter_map(parse_parameter) {
        let existing = merged
            .iter_mut()
            .find(|p| p.name == parameter.name && p.location == parameter.location);
        match existing {
            Some(slot) => *slot = parameter,
            None => merged.push(parameter),
        }
    }

    merged
}

fn parse_parameter(value: &Value) -> Option<Parameter> {
    if is_reference_object(value) {
        debug!(parameter = %value, "skipping referenced parameter");
        return None;
    }

    match serde_json::from_value(value.clone()) {
        Ok(parameter) => Some(parameter),
        Err(e) => {
            debug!(parameter = %value, error = %e, "skipping malformed parameter");
            None
        }
    }
}
