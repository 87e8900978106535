//! Generation options

use std::fmt;
use std::path::{Path, PathBuf};

/// Layout of the generated sources
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// One `endpoints.ts` with schemas, endpoints and the api instance
    #[default]
    SingleFile,

    /// `schemas.ts` plus one file per route path
    FileBased,
}

impl OutputMode {
    /// Output directory used when none is configured
    pub fn default_out_dir(&self) -> &'static str {
        match self {
            OutputMode::SingleFile => "src",
            OutputMode::FileBased => "src/routes",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::SingleFile => write!(f, "single-file"),
            OutputMode::FileBased => write!(f, "file-based"),
        }
    }
}

/// Options controlling where and how sources are generated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Output directory; falls back to the mode's default
    pub out_dir: Option<PathBuf>,

    pub output: OutputMode,

    /// Module the generated code imports `createApi`/`createApiEndpoint` from
    pub client_module: String,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            out_dir: None,
            output: OutputMode::default(),
            client_module: "./createApi".to_string(),
        }
    }
}

impl GenerateOptions {
    /// Set the output directory
    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(out_dir.into());
        self
    }

    /// Set the output mode
    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    /// Directory generated files are written to
    pub fn out_dir(&self) -> &Path {
        self.out_dir
            .as_deref()
            .unwrap_or_else(|| Path::new(self.output.default_out_dir()))
    }
}
