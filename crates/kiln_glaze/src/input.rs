//! Tool inputs.

use crate::error::{ToolError, ToolResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One input handed to a tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolInput {
    /// A file read when the tool runs.
    File(PathBuf),
    /// Text already in memory.
    Text(Arc<str>),
}

impl ToolInput {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn text(text: impl Into<Arc<str>>) -> Self {
        Self::Text(text.into())
    }

    /// Read the full text of the input.
    pub fn read(&self) -> ToolResult<Arc<str>> {
        match self {
            Self::File(path) => std::fs::read_to_string(path)
                .map(Arc::from)
                .map_err(|source| ToolError::Read {
                    path: path.clone(),
                    source,
                }),
            Self::Text(text) => Ok(Arc::clone(text)),
        }
    }

    /// Path on disk, if this input is a file.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Text(_) => None,
        }
    }
}
