//! Error types for kiln_glaze tools.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal tool failures.
///
/// Diagnostics are never reported through this type; they travel as data
/// in [`crate::TranspileOutput`].
#[derive(Debug, Error)]
pub enum ToolError {
    /// The configured language target is not understood by the transformer
    #[error("unsupported language target `{target}`: {message}")]
    Target { target: String, message: String },

    /// A tool was handed zero or several inputs
    #[error("expected exactly one input for {}, got {count}", output.display())]
    InputCount { output: PathBuf, count: usize },

    /// Reading an input failed
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing an output or its source map failed
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;
