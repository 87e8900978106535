//! apity CLI
//!
//! Command-line interface for generating zod endpoint bindings from
//! OpenAPI 3 and Swagger 2 documents.

use anyhow::{Context, Result};
use apity_common::{ApiDefinition, GenerateOptions, OutputMode};
use apity_generator::{endpoint_name, EndpointGenerator};
use apity_parser::OpenApiParser;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "apity")]
#[command(version, about = "Generate zod endpoint bindings from OpenAPI documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate endpoint bindings from an OpenAPI or Swagger document
    #[command(after_help = "EXAMPLES:\n  \
        # Single endpoints.ts under ./src\n  \
        apity import-openapi openapi.yaml\n\n  \
        # One file per route under ./app/routes\n  \
        apity import-openapi swagger.json \\\n    \
        --outDir ./app/routes \\\n    \
        --output file-based")]
    ImportOpenapi {
        /// Path to the OpenAPI (3.x) or Swagger (2.0) document
        file: PathBuf,

        /// Output directory (defaults to src, or src/routes for file-based output)
        #[arg(short = 'd', long = "outDir", env = "APITY_OUT_DIR")]
        out_dir: Option<PathBuf>,

        /// Layout of the generated sources
        #[arg(short, long, value_enum, default_value_t = OutputArg::SingleFile)]
        output: OutputArg,

        /// Module to import createApi and createApiEndpoint from
        #[arg(long, default_value = "./createApi")]
        client_module: String,
    },

    /// Parse a document and display its route table
    Inspect {
        /// Path to the OpenAPI (3.x) or Swagger (2.0) document
        file: PathBuf,

        /// Print the route table as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputArg {
    /// One endpoints.ts with schemas, endpoints and the api instance
    SingleFile,
    /// schemas.ts plus one file per route path
    FileBased,
}

impl From<OutputArg> for OutputMode {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::SingleFile => OutputMode::SingleFile,
            OutputArg::FileBased => OutputMode::FileBased,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::ImportOpenapi {
            file,
            out_dir,
            output,
            client_module,
        } => {
            let mut options = GenerateOptions {
                client_module,
                ..GenerateOptions::default()
            }
            .with_output(output.into());
            if let Some(out_dir) = out_dir {
                options = options.with_out_dir(out_dir);
            }
            import_command(&file, options, cli.verbose)?;
        }
        Commands::Inspect { file, json } => {
            inspect_command(&file, json, cli.verbose)?;
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise warnings, or debug with `--verbose`
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load(file: &Path) -> Result<ApiDefinition> {
    let parser = OpenApiParser::from_file(file)
        .with_context(|| format!("Failed to load {}", file.display()))?;
    parser
        .parse()
        .with_context(|| format!("Failed to parse {}", file.display()))
}

fn import_command(file: &Path, options: GenerateOptions, verbose: bool) -> Result<()> {
    println!("{} Importing: {}", "→".cyan(), file.display());

    if verbose {
        println!("  Output: {}", options.output);
        println!("  Directory: {}", options.out_dir().display());
        println!("  Client module: {}", options.client_module);
    }

    let api = load(file)?;
    println!(
        "{} Parsed {} schemas and {} endpoints",
        "✓".green(),
        api.schemas.len(),
        api.endpoint_count()
    );

    println!("{} Generating endpoint files...", "→".cyan());
    let generator = EndpointGenerator::new(api, options).context("Failed to create generator")?;
    let written = generator
        .generate_to_directory()
        .context("Failed to generate API routes")?;

    if verbose {
        println!("\n{}", "Generated files:".bold());
        for path in &written {
            println!("  📄 {}", path.display());
        }
    }

    println!("\n{}", "✓ Successfully generated API routes!".green().bold());
    Ok(())
}

fn inspect_command(file: &Path, json: bool, verbose: bool) -> Result<()> {
    let api = load(file)?;

    if json {
        let summary = route_summary(&api);
        let rendered =
            serde_json::to_string_pretty(&summary).context("Failed to serialize route table")?;
        println!("{}", rendered);
        return Ok(());
    }

    println!("{}", "✓ Parse successful!".green().bold());
    println!("\n{}", "API Definition:".bold());
    println!("  Base URL: {}", display_or_none(&api.base_url).yellow());
    println!("  Schemas: {}", api.schemas.len());
    println!("  Routes: {}", api.routes.len());
    println!("  Endpoints: {}", api.endpoint_count());

    println!("\n{}", "Routes:".bold());
    for (path, methods) in &api.routes {
        println!("  • {}", path.cyan());
        for entry in methods.values() {
            let kind = if entry.method.is_fetch() {
                "fetch"
            } else {
                "mutate"
            };
            println!(
                "    {:<7} {} ({})",
                entry.method.as_str(),
                endpoint_name(path, entry),
                kind
            );
            if verbose {
                println!(
                    "            query: {}, body: {}, response: {}",
                    entry.query.len(),
                    yes_no(entry.body.is_some()),
                    yes_no(entry.response.is_some())
                );
            }
        }
    }

    if verbose && !api.schemas.is_empty() {
        println!("\n{}", "Schemas:".bold());
        for name in api.schemas.keys() {
            println!("  • {}", name);
        }
    }

    Ok(())
}

fn route_summary(api: &ApiDefinition) -> serde_json::Value {
    let routes: Vec<serde_json::Value> = api
        .routes
        .iter()
        .map(|(path, methods)| {
            let endpoints: Vec<serde_json::Value> = methods
                .values()
                .map(|entry| {
                    serde_json::json!({
                        "method": entry.method.as_str(),
                        "name": endpoint_name(path, entry),
                        "fetch": entry.method.is_fetch(),
                        "pathParams": entry.path_param_names().collect::<Vec<_>>(),
                        "query": entry.query.iter().map(|q| q.name.as_str()).collect::<Vec<_>>(),
                        "hasBody": entry.body.is_some(),
                        "hasResponse": entry.response.is_some(),
                    })
                })
                .collect();
            serde_json::json!({ "path": path, "endpoints": endpoints })
        })
        .collect();

    serde_json::json!({
        "baseUrl": api.base_url,
        "schemas": api.schemas.keys().collect::<Vec<_>>(),
        "routes": routes,
    })
}

fn display_or_none(value: &str) -> &str {
    if value.is_empty() {
        "(none)"
    } else {
        value
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
