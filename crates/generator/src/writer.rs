//! Output sink for generated files

use apity_common::{GeneratorError, Result};
use std::fs;
use std::path::Path;

/// Destination for generated sources
pub trait OutputWriter {
    /// Create a directory and all of its parents
    fn create_dir_all(&self, dir: &Path) -> Result<()>;

    /// Write a file, replacing any existing content
    fn write_file(&self, path: &Path, contents: &str) -> Result<()>;
}

/// Writes to the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsWriter;

impl OutputWriter for FsWriter {
    fn create_dir_all(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir).map_err(|e| {
            GeneratorError::Generation(format!(
                "Failed to create output directory {}: {}",
                dir.display(),
                e
            ))
        })
    }

    fn write_file(&self, path: &Path, contents: &str) -> Result<()> {
        fs::write(path, contents).map_err(|e| {
            GeneratorError::Generation(format!("Failed to write {}: {}", path.display(), e))
        })
    }
}
