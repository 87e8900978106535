//! Swagger 2.0 to OpenAPI 3.0 conversion
//!
//! Works on the raw JSON tree and only rewrites what the route extractor
//! and emitter read:
//! - `definitions` → `components.schemas` (refs rewritten)
//! - `body` parameters → `requestBody` with `application/json`
//! - inline parameter `type`/`format`/... → parameter `schema`
//! - response `schema` → `content["application/json"].schema`
//! - `host`/`basePath`/`schemes` → `servers`
//! - `x-nullable` → `nullable`

use crate::openapi::is_reference_object;
use apity_common::{GeneratorError, Result};
use serde_json::{json, Map, Value};
use tracing::debug;

const HTTP_VERBS: &[&str] = &[
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Fields of a Swagger 2 non-body parameter that belong in its schema
const PARAMETER_SCHEMA_FIELDS: &[&str] = &[
    "type",
    "format",
    "items",
    "enum",
    "default",
    "minimum",
    "maximum",
    "minLength",
    "maxLength",
    "pattern",
    "x-nullable",
];

/// Detected document version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecVersion {
    OpenApi3,
    Swagger2,
}

/// Detect whether a document is OpenAPI 3.x or Swagger 2.0
pub fn detect_version(doc: &Value) -> Result<SpecVersion> {
    if let Some(version) = doc.get("openapi").and_then(Value::as_str) {
        if version.starts_with("3.") {
            return Ok(SpecVersion::OpenApi3);
        }
        return Err(GeneratorError::Parse(format!(
            "Unsupported OpenAPI version: {}",
            version
        )));
    }

    match doc.get("swagger") {
        Some(Value::String(version)) if version.starts_with("2.") => Ok(SpecVersion::Swagger2),
        Some(version) => Err(GeneratorError::Parse(format!(
            "Unsupported Swagger version: {}",
            version
        ))),
        None => Err(GeneratorError::Parse(
            "Document declares neither `openapi` nor `swagger` version".to_string(),
        )),
    }
}

/// Return an OpenAPI 3 tree, converting Swagger 2 documents
pub fn convert_to_openapi3(doc: Value) -> Result<Value> {
    match detect_version(&doc)? {
        SpecVersion::OpenApi3 => Ok(doc),
        SpecVersion::Swagger2 => {
            debug!("converting Swagger 2.0 document to OpenAPI 3.0");
            Ok(convert_swagger2(doc))
        }
    }
}

fn convert_swagger2(doc: Value) -> Value {
    let mut source = match doc {
        Value::Object(object) => object,
        other => return other,
    };

    let mut out = Map::new();
    out.insert("openapi".to_string(), json!("3.0.0"));
    out.insert(
        "info".to_string(),
        source.remove("info").unwrap_or_else(|| json!({})),
    );

    let servers = servers_from(&source);
    if !servers.is_empty() {
        out.insert("servers".to_string(), Value::Array(servers));
    }

    if let Some(Value::Object(paths)) = source.remove("paths") {
        let paths = paths
            .into_iter()
            .map(|(path, item)| (path, convert_path_item(item)))
            .collect();
        out.insert("paths".to_string(), Value::Object(paths));
    }

    let mut components = Map::new();
    if let Some(definitions) = source.remove("definitions") {
        components.insert("schemas".to_string(), definitions);
    }
    if let Some(Value::Object(parameters)) = source.remove("parameters") {
        let parameters = parameters
            .into_iter()
            .map(|(name, parameter)| (name, convert_parameter(parameter)))
            .collect();
        components.insert("parameters".to_string(), Value::Object(parameters));
    }
    if let Some(Value::Object(responses)) = source.remove("responses") {
        let responses = responses
            .into_iter()
            .map(|(name, response)| (name, convert_response(response)))
            .collect();
        components.insert("responses".to_string(), Value::Object(responses));
    }
    if !components.is_empty() {
        out.insert("components".to_string(), Value::Object(components));
    }

    for key in ["tags", "externalDocs"] {
        if let Some(value) = source.remove(key) {
            out.insert(key.to_string(), value);
        }
    }

    let mut converted = Value::Object(out);
    rewrite_schema_fields(&mut converted);
    converted
}

fn servers_from(source: &Map<String, Value>) -> Vec<Value> {
    let base_path = source
        .get("basePath")
        .and_then(Value::as_str)
        .unwrap_or("");

    match source.get("host").and_then(Value::as_str) {
        Some(host) => {
            let schemes: Vec<&str> = source
                .get("schemes")
                .and_then(Value::as_array)
                .map(|s| s.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();
            let schemes = if schemes.is_empty() {
                vec!["https"]
            } else {
                schemes
            };
            schemes
                .into_iter()
                .map(|scheme| json!({"url": format!("{}://{}{}", scheme, host, base_path)}))
                .collect()
        }
        None if !base_path.is_empty() => vec![json!({"url": base_path})],
        None => Vec::new(),
    }
}

/// A path-level `in: body` parameter becomes the `requestBody` of every
/// operation on the path that does not declare its own.
fn convert_path_item(item: Value) -> Value {
    let mut item = match item {
        Value::Object(object) => object,
        other => return other,
    };

    let (shared, shared_body) = match item.remove("parameters") {
        Some(parameters) => {
            let (parameters, body) = split_parameters(parameters);
            (Some(parameters), body)
        }
        None => (None, None),
    };

    let mut out = Map::new();
    if let Some(parameters) = shared {
        out.insert("parameters".to_string(), Value::Array(parameters));
    }
    for (key, value) in item {
        if HTTP_VERBS.contains(&key.as_str()) {
            let mut operation = convert_operation(value);
            if let (Some(body), Value::Object(object)) = (&shared_body, &mut operation) {
                if !object.contains_key("requestBody") {
                    object.insert("requestBody".to_string(), body.clone());
                }
            }
            out.insert(key, operation);
        } else {
            out.insert(key, value);
        }
    }
    Value::Object(out)
}

fn convert_operation(operation: Value) -> Value {
    let operation = match operation {
        Value::Object(object) => object,
        other => return other,
    };

    let mut out = Map::new();
    for (key, value) in operation {
        match key.as_str() {
            "parameters" => {
                let (parameters, body) = split_parameters(value);
                out.insert(key, Value::Array(parameters));
                if let Some(body) = body {
                    out.insert("requestBody".to_string(), body);
                }
            }
            "responses" => {
                let responses = match value {
                    Value::Object(responses) => Value::Object(
                        responses
                            .into_iter()
                            .map(|(status, response)| (status, convert_response(response)))
                            .collect(),
                    ),
                    other => other,
                };
                out.insert(key, responses);
            }
            "consumes" | "produces" | "schemes" => {}
            _ => {
                out.insert(key, value);
            }
        }
    }
    Value::Object(out)
}

/// Split Swagger parameters into OpenAPI 3 parameters and an optional
/// request body built from the `in: body` entry
fn split_parameters(parameters: Value) -> (Vec<Value>, Option<Value>) {
    let Value::Array(parameters) = parameters else {
        return (Vec::new(), None);
    };

    let mut converted = Vec::new();
    let mut body = None;

    for parameter in parameters {
        match parameter.get("in").and_then(Value::as_str) {
            Some("body") => {
                let schema = parameter.get("schema").cloned().unwrap_or_else(|| json!({}));
                let mut request_body = Map::new();
                if let Some(description) = parameter.get("description") {
                    request_body.insert("description".to_string(), description.clone());
                }
                request_body.insert(
                    "content".to_string(),
                    json!({"application/json": {"schema": schema}}),
                );
                request_body.insert(
                    "required".to_string(),
                    parameter.get("required").cloned().unwrap_or(json!(false)),
                );
                body = Some(Value::Object(request_body));
            }
            Some("formData") => {
                debug!(parameter = %parameter, "dropping formData parameter");
            }
            _ => converted.push(convert_parameter(parameter)),
        }
    }

    (converted, body)
}

fn convert_parameter(parameter: Value) -> Value {
    if is_reference_object(&parameter) {
        return parameter;
    }
    let parameter = match parameter {
        Value::Object(object) => object,
        other => return other,
    };
    if parameter.contains_key("schema") {
        return Value::Object(parameter);
    }

    let mut out = Map::new();
    let mut schema = Map::new();
    for (key, value) in parameter {
        if PARAMETER_SCHEMA_FIELDS.contains(&key.as_str()) {
            schema.insert(key, value);
        } else if key != "collectionFormat" && key != "allowEmptyValue" {
            out.insert(key, value);
        }
    }
    if !schema.is_empty() {
        out.insert("schema".to_string(), Value::Object(schema));
    }
    Value::Object(out)
}

fn convert_response(response: Value) -> Value {
    if is_reference_object(&response) {
        return response;
    }
    let mut response = match response {
        Value::Object(object) => object,
        other => return other,
    };

    if let Some(schema) = response.remove("schema") {
        response.insert(
            "content".to_string(),
            json!({"application/json": {"schema": schema}}),
        );
    }
    response.remove("examples");
    Value::Object(response)
}

/// Rewrite Swagger-only schema fields everywhere in the tree
fn rewrite_schema_fields(value: &mut Value) {
    match value {
        Value::Object(object) => {
            if let Some(Value::String(target)) = object.get_mut("$ref") {
                *target = rewrite_ref(target);
            }
            if let Some(nullable) = object.remove("x-nullable") {
                object.insert("nullable".to_string(), nullable);
            }
            for child in object.values_mut() {
                rewrite_schema_fields(child);
            }
        }
        Value::Array(items) => {
            for item in items {
                rewrite_schema_fields(item);
            }
        }
        _ => {}
    }
}

fn rewrite_ref(target: &str) -> String {
    const REWRITES: &[(&str, &str)] = &[
        ("#/definitions/", "#/components/schemas/"),
        ("#/parameters/", "#/components/parameters/"),
        ("#/responses/", "#/components/responses/"),
    ];

    for (from, to) in REWRITES {
        if let Some(rest) = target.strip_prefix(from) {
            return format!("{}{}", to, rest);
        }
    }
    target.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn petstore() -> Value {
        json!({
            "swagger": "2.0",
            "info": {"title": "Petstore", "version": "1.0.0"},
            "host": "petstore.example.com",
            "basePath": "/v1",
            "schemes": ["https"],
            "paths": {
                "/pets/{petId}": {
                    "parameters": [
                        {"name": "petId", "in": "path", "required": true, "type": "string"}
                    ],
                    "get": {
                        "parameters": [
                            {"name": "limit", "in": "query", "type": "integer", "minimum": 1}
                        ],
                        "responses": {
                            "200": {"description": "OK", "schema": {"$ref": "#/definitions/Pet"}}
                        }
                    },
                    "put": {
                        "consumes": ["application/json"],
                        "parameters": [
                            {"name": "pet", "in": "body", "required": true, "schema": {"$ref": "#/definitions/Pet"}}
                        ],
                        "responses": {"200": {"description": "OK"}}
                    }
                }
            },
            "definitions": {
                "Pet": {
                    "type": "object",
                    "properties": {
                        "name": {"type": "string", "x-nullable": true},
                        "owner": {"$ref": "#/definitions/Owner"}
                    }
                },
                "Owner": {"type": "object"}
            }
        })
    }

    #[test]
    fn test_detect_version() {
        assert_eq!(
            detect_version(&json!({"openapi": "3.1.0"})).unwrap(),
            SpecVersion::OpenApi3
        );
        assert_eq!(
            detect_version(&json!({"swagger": "2.0"})).unwrap(),
            SpecVersion::Swagger2
        );
        assert!(detect_version(&json!({"swagger": "1.2"})).is_err());
        assert!(detect_version(&json!({"openapi": "4.0.0"})).is_err());
        assert!(detect_version(&json!({"info": {}})).is_err());
    }

    #[test]
    fn test_openapi3_passes_through() {
        let doc = json!({"openapi": "3.0.3", "paths": {"/x": {}}});
        assert_eq!(convert_to_openapi3(doc.clone()).unwrap(), doc);
    }

    #[test]
    fn test_definitions_become_component_schemas() {
        let converted = convert_to_openapi3(petstore()).unwrap();

        assert_eq!(converted["openapi"], "3.0.0");
        assert!(converted.pointer("/components/schemas/Pet").is_some());
        assert!(converted.get("definitions").is_none());
        assert_eq!(
            converted.pointer("/components/schemas/Pet/properties/owner/$ref"),
            Some(&json!("#/components/schemas/Owner"))
        );
        assert_eq!(
            converted.pointer("/components/schemas/Pet/properties/name/nullable"),
            Some(&json!(true))
        );
    }

    #[test]
    fn test_servers_from_host_and_base_path() {
        let converted = convert_to_openapi3(petstore()).unwrap();
        assert_eq!(
            converted["servers"],
            json!([{"url": "https://petstore.example.com/v1"}])
        );

        let converted = convert_to_openapi3(json!({"swagger": "2.0", "basePath": "/api"})).unwrap();
        assert_eq!(converted["servers"], json!([{"url": "/api"}]));
    }

    #[test]
    fn test_body_parameter_becomes_request_body() {
        let converted = convert_to_openapi3(petstore()).unwrap();
        let put = converted.pointer("/paths/~1pets~1{petId}/put").unwrap();

        assert_eq!(put["parameters"], json!([]));
        assert_eq!(
            put.pointer("/requestBody/content/application~1json/schema/$ref"),
            Some(&json!("#/components/schemas/Pet"))
        );
        assert_eq!(put["requestBody"]["required"], json!(true));
        assert!(put.get("consumes").is_none());
    }

    #[test]
    fn test_inline_parameter_types_move_into_schema() {
        let converted = convert_to_openapi3(petstore()).unwrap();
        let item = converted.pointer("/paths/~1pets~1{petId}").unwrap();

        assert_eq!(
            item["parameters"][0],
            json!({"name": "petId", "in": "path", "required": true, "schema": {"type": "string"}})
        );
        assert_eq!(
            item["get"]["parameters"][0],
            json!({"name": "limit", "in": "query", "schema": {"type": "integer", "minimum": 1}})
        );
    }

    #[test]
    fn test_response_schema_moves_into_content() {
        let converted = convert_to_openapi3(petstore()).unwrap();
        let get = converted.pointer("/paths/~1pets~1{petId}/get").unwrap();

        assert_eq!(
            get.pointer("/responses/200/content/application~1json/schema/$ref"),
            Some(&json!("#/components/schemas/Pet"))
        );
        assert!(get.pointer("/responses/200/schema").is_none());
    }

    #[test]
    fn test_path_level_body_is_shared_by_operations() {
        let converted = convert_to_openapi3(json!({
            "swagger": "2.0",
            "paths": {
                "/notes": {
                    "post": {"responses": {}},
                    "put": {
                        "parameters": [{"name": "own", "in": "body", "schema": {"type": "string"}}],
                        "responses": {}
                    },
                    "parameters": [
                        {"name": "note", "in": "body", "required": true, "schema": {"$ref": "#/definitions/Note"}},
                        {"name": "tag", "in": "query", "type": "string"}
                    ]
                }
            }
        }))
        .unwrap();
        let item = converted.pointer("/paths/~1notes").unwrap();

        assert_eq!(item["parameters"].as_array().unwrap().len(), 1);
        assert_eq!(
            item.pointer("/post/requestBody/content/application~1json/schema/$ref"),
            Some(&json!("#/components/schemas/Note"))
        );
        assert_eq!(
            item.pointer("/put/requestBody/content/application~1json/schema/type"),
            Some(&json!("string"))
        );
    }
}
