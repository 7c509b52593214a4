//! Errors of the command-line front end.

use crate::config::ConfigError;
use kiln_glaze::ToolError;
use kiln_shelf::StageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("cannot determine the project root: {0}")]
    Root(#[source] std::io::Error),

    #[error(transparent)]
    Stage(#[from] StageError),

    #[error(transparent)]
    Tool(#[from] ToolError),
}

pub type CliResult<T> = Result<T, CliError>;
