//! zod validator and endpoint generation
//!
//! This crate turns an `ApiDefinition` into TypeScript sources: one
//! `export const {Name}Schema` per component schema, one
//! `createApiEndpoint` descriptor per (path, verb), and the
//! `fetchEndpoints`/`mutateEndpoints` maps wired into `createApi`.

mod code_builder;
mod naming;
mod templates;
mod validator;
mod writer;

pub use code_builder::CodeBuilder;
pub use naming::{endpoint_name, route_file_stem, schema_ident};
pub use validator::{schema_to_validator, MAX_DEPTH};
pub use writer::{FsWriter, OutputWriter};

use apity_common::{
    ref_name, ApiDefinition, GenerateOptions, OutputMode, Result, RouteMethodEntry, SchemaNode,
};
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use tera::Tera;
use tracing::{debug, info};

/// Module route files import component validators from
const SCHEMAS_MODULE: &str = "./schemas";

/// A rendered source file, relative to the output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

#[derive(Serialize)]
struct SchemaDeclaration {
    ident: String,
    validator: String,
}

#[derive(Serialize)]
struct EndpointGroup {
    path: String,
    names: Vec<String>,
}

/// Endpoint generator
///
/// Renders every file up front, then writes them through an
/// `OutputWriter`, so a failed render leaves the output directory alone.
pub struct EndpointGenerator {
    api: ApiDefinition,
    options: GenerateOptions,
    known_schemas: HashSet<String>,
    tera: Tera,
}

impl EndpointGenerator {
    /// Create a new generator for a parsed API
    pub fn new(api: ApiDefinition, options: GenerateOptions) -> Result<Self> {
        let tera = templates::load_templates()?;
        let known_schemas = api.schemas.keys().cloned().collect();
        Ok(Self {
            api,
            options,
            known_schemas,
            tera,
        })
    }

    /// Render all files for the configured output mode
    pub fn render(&self) -> Result<Vec<GeneratedFile>> {
        match self.options.output {
            OutputMode::SingleFile => Ok(vec![self.render_single_file()?]),
            OutputMode::FileBased => self.render_file_based(),
        }
    }

    /// Render and write to the configured output directory
    pub fn generate_to_directory(&self) -> Result<Vec<PathBuf>> {
        self.write_with(&FsWriter)
    }

    /// Render and write through `writer`, returning the written paths
    pub fn write_with(&self, writer: &dyn OutputWriter) -> Result<Vec<PathBuf>> {
        let files = self.render()?;
        let out_dir = self.options.out_dir();

        writer.create_dir_all(out_dir)?;

        let mut written = Vec::with_capacity(files.len());
        for file in files {
            let path = out_dir.join(&file.path);
            writer.write_file(&path, &file.contents)?;
            info!(path = %path.display(), "wrote generated file");
            written.push(path);
        }
        Ok(written)
    }

    /// `endpoints.ts` with schemas, descriptors, maps, and the api instance
    fn render_single_file(&self) -> Result<GeneratedFile> {
        let mut fetch_endpoints = Vec::new();
        let mut mutate_endpoints = Vec::new();
        let mut fetch_groups = Vec::new();
        let mut mutate_groups = Vec::new();

        for (path, methods) in &self.api.routes {
            let mut fetch_names = Vec::new();
            let mut mutate_names = Vec::new();

            for entry in methods.values() {
                let name = endpoint_name(path, entry);
                let declaration = self.endpoint_declaration(&format!("const {}", name), entry);
                debug!(path = %path, endpoint = %name, "rendered endpoint");

                if entry.method.is_fetch() {
                    fetch_endpoints.push(declaration);
                    fetch_names.push(name);
                } else {
                    mutate_endpoints.push(declaration);
                    mutate_names.push(name);
                }
            }

            if !fetch_names.is_empty() {
                fetch_groups.push(EndpointGroup {
                    path: path.clone(),
                    names: fetch_names,
                });
            }
            if !mutate_names.is_empty() {
                mutate_groups.push(EndpointGroup {
                    path: path.clone(),
                    names: mutate_names,
                });
            }
        }

        let mut context = tera::Context::new();
        context.insert("client_module", &self.options.client_module);
        context.insert("base_url", &self.api.base_url);
        context.insert("schemas", &self.schema_declarations());
        context.insert("fetch_endpoints", &fetch_endpoints);
        context.insert("mutate_endpoints", &mutate_endpoints);
        context.insert("fetch_groups", &fetch_groups);
        context.insert("mutate_groups", &mutate_groups);

        Ok(GeneratedFile {
            path: PathBuf::from(templates::ENDPOINTS),
            contents: templates::render(&self.tera, templates::ENDPOINTS, &context)?,
        })
    }

    /// `schemas.ts` plus one file per route path
    fn render_file_based(&self) -> Result<Vec<GeneratedFile>> {
        let mut context = tera::Context::new();
        context.insert("schemas", &self.schema_declarations());

        let mut files = vec![GeneratedFile {
            path: PathBuf::from(templates::SCHEMAS),
            contents: templates::render(&self.tera, templates::SCHEMAS, &context)?,
        }];

        for (path, methods) in &self.api.routes {
            let mut imports = Vec::new();
            let mut endpoints = Vec::new();

            for entry in methods.values() {
                self.collect_imports(entry, &mut imports);
                endpoints.push(
                    self.endpoint_declaration(&format!("export const {}", entry.method), entry),
                );
            }

            let mut context = tera::Context::new();
            context.insert("path", path);
            context.insert("client_module", &self.options.client_module);
            context.insert("schemas_module", SCHEMAS_MODULE);
            context.insert("imports", &imports);
            context.insert("endpoints", &endpoints);

            files.push(GeneratedFile {
                path: PathBuf::from(format!("{}.ts", route_file_stem(path))),
                contents: templates::render(&self.tera, templates::ROUTE, &context)?,
            });
        }

        Ok(files)
    }

    fn schema_declarations(&self) -> Vec<SchemaDeclaration> {
        self.api
            .schemas
            .iter()
            .map(|(name, schema)| SchemaDeclaration {
                ident: schema_ident(name),
                validator: self.validator(schema),
            })
            .collect()
    }

    /// `{binding} = createApiEndpoint({ method, response, body?, query? });`
    fn endpoint_declaration(&self, binding: &str, entry: &RouteMethodEntry) -> String {
        let response = entry
            .response
            .as_ref()
            .map(|response| self.validator(response))
            .unwrap_or_else(|| "z.void()".to_string());

        let mut builder = CodeBuilder::new();
        builder.block(format!("{} = createApiEndpoint({{", binding), "});", |b| {
            b.line(format!("method: '{}',", entry.method));
            b.line(format!("response: {},", response));
            if let Some(body) = &entry.body {
                b.line(format!("body: {},", self.validator(body)));
            }
            if let Some(query) = entry.query_schema() {
                b.line(format!("query: {},", self.validator(&query)));
            }
        });
        builder.finish()
    }

    /// Component schema idents referenced by an endpoint, deduplicated
    fn collect_imports(&self, entry: &RouteMethodEntry, imports: &mut Vec<String>) {
        let query = entry.query_schema();
        let mut refs = Vec::new();
        for node in entry.response.iter().chain(&entry.body).chain(&query) {
            node.collect_refs(&mut refs);
        }

        for target in refs {
            let name = ref_name(target);
            if !self.known_schemas.contains(name) {
                continue;
            }
            let ident = schema_ident(name);
            if !imports.contains(&ident) {
                imports.push(ident);
            }
        }
    }

    fn validator(&self, node: &SchemaNode) -> String {
        schema_to_validator(node, true, &self.known_schemas)
    }
}

/// Generate endpoint sources for a parsed API into `options.out_dir()`
pub fn generate_endpoints(api: ApiDefinition, options: GenerateOptions) -> Result<Vec<PathBuf>> {
    EndpointGenerator::new(api, options)?.generate_to_directory()
}

#[cfg(test)]
mod tests {
    use super::*;
    use apity_common::{HttpMethod, NamedSchema, RouteTable, SchemaKind};
    use indexmap::IndexMap;

    fn api() -> ApiDefinition {
        let mut user = IndexMap::new();
        user.insert("id".to_string(), SchemaNode::string());
        let mut schemas = IndexMap::new();
        schemas.insert(
            "User".to_string(),
            SchemaNode::object(user, vec!["id".to_string()]),
        );

        let mut get = RouteMethodEntry::new(HttpMethod::Get);
        get.response = Some(SchemaNode::reference("#/components/schemas/User"));
        get.path_params.push(NamedSchema {
            name: "id".to_string(),
            schema: SchemaNode::string(),
            required: true,
        });

        let mut delete = RouteMethodEntry::new(HttpMethod::Delete);
        delete.query.push(NamedSchema {
            name: "force".to_string(),
            schema: SchemaNode::new(SchemaKind::Boolean),
            required: false,
        });

        let mut methods = IndexMap::new();
        methods.insert(HttpMethod::Get, get);
        methods.insert(HttpMethod::Delete, delete);
        let mut routes = RouteTable::new();
        routes.insert("/users/[id]".to_string(), methods);

        ApiDefinition {
            base_url: "https://api.example.com".to_string(),
            schemas,
            routes,
        }
    }

    #[test]
    fn test_endpoint_declaration_layout() {
        let generator = EndpointGenerator::new(api(), GenerateOptions::default()).unwrap();
        let entry = &generator.api.routes["/users/[id]"][&HttpMethod::Delete];

        assert_eq!(
            generator.endpoint_declaration("const DELETE_users_id", entry),
            "const DELETE_users_id = createApiEndpoint({\n  method: 'DELETE',\n  response: z.void(),\n  query: z.object({\n    force: z.boolean().optional(),\n  }),\n});"
        );
    }

    #[test]
    fn test_single_file_sections() {
        let generator = EndpointGenerator::new(api(), GenerateOptions::default()).unwrap();
        let files = generator.render().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, PathBuf::from("endpoints.ts"));

        let contents = &files[0].contents;
        assert!(contents.starts_with("// Generated by apity. Do not edit by hand.\n"));
        assert!(contents.contains("import { createApi, createApiEndpoint } from './createApi';"));
        assert!(contents.contains("import { z } from 'zod';"));
        assert!(contents.contains("export const UserSchema = z.object({\n  id: z.string(),\n});"));
        assert!(contents.contains("const GET_users_id = createApiEndpoint({"));
        assert!(contents.contains("response: z.lazy(() => UserSchema),"));
        assert!(contents.contains(
            "export const fetchEndpoints = {\n  '/users/[id]': [GET_users_id],\n} as const;"
        ));
        assert!(contents.contains(
            "export const mutateEndpoints = {\n  '/users/[id]': [DELETE_users_id],\n} as const;"
        ));
        assert!(contents.contains("baseUrl: 'https://api.example.com',"));
        assert!(contents.ends_with("});\n"));

        let schema_at = contents.find("export const UserSchema").unwrap();
        let fetch_at = contents.find("const GET_users_id =").unwrap();
        let mutate_at = contents.find("const DELETE_users_id =").unwrap();
        let maps_at = contents.find("export const fetchEndpoints").unwrap();
        let api_at = contents.find("export const api =").unwrap();
        assert!(schema_at < fetch_at && fetch_at < mutate_at && mutate_at < maps_at);
        assert!(maps_at < api_at);
    }

    #[test]
    fn test_file_based_imports_only_referenced_schemas() {
        let options = GenerateOptions::default().with_output(OutputMode::FileBased);
        let generator = EndpointGenerator::new(api(), options).unwrap();
        let files = generator.render().unwrap();

        let paths: Vec<_> = files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(
            paths,
            vec![PathBuf::from("schemas.ts"), PathBuf::from("users._id_.ts")]
        );

        let route = &files[1].contents;
        assert!(route.contains("// Route: /users/[id]"));
        assert!(route.contains("import { UserSchema } from './schemas';"));
        assert!(route.contains("export const GET = createApiEndpoint({"));
        assert!(route.contains("export const DELETE = createApiEndpoint({"));
        assert!(!route.contains("createApi("));
    }

    #[test]
    fn test_client_module_is_configurable() {
        let options = GenerateOptions {
            client_module: "@acme/api-client".to_string(),
            ..GenerateOptions::default()
        };
        let generator = EndpointGenerator::new(api(), options).unwrap();
        let files = generator.render().unwrap();
        assert!(files[0]
            .contents
            .contains("from '@acme/api-client';"));
    }
}
