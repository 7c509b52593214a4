//! Error types for staging.

use std::path::PathBuf;
use thiserror::Error;

/// Failures that stop staging before any target is registered.
#[derive(Debug, Error)]
pub enum StageError {
    /// The output directory could not be created
    #[error("failed to create output directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output directory could not be made absolute
    #[error("failed to resolve output directory {}: {source}", path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source name that does not name a file inside the output directory
    #[error("invalid source name `{name}`: {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// A tool could not be constructed
    #[error(transparent)]
    Tool(#[from] kiln_glaze::ToolError),
}

/// Result type for staging.
pub type StageResult<T> = Result<T, StageError>;
