//! CLI commands.

pub mod build;
pub mod check;

use crate::config::{load_config, KilnConfig};
use crate::error::{CliError, CliResult};
use clap::ValueEnum;
use kiln_glaze::{SourceMapMode, ToolKind, ToolOptions};
use kiln_shelf::Stager;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Diagnostics and a summary on stderr
    #[default]
    Text,
    /// One JSON report on stdout
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SourceMapArg {
    /// `<output>.map` next to each output
    Sibling,
    /// Data URL inside each output
    Inline,
}

impl From<SourceMapArg> for SourceMapMode {
    fn from(arg: SourceMapArg) -> Self {
        match arg {
            SourceMapArg::Sibling => SourceMapMode::Sibling,
            SourceMapArg::Inline => SourceMapMode::Inline,
        }
    }
}

/// Command-line values that override the config file for both tools.
#[derive(Debug, Clone, Default)]
pub struct ToolOverrides {
    pub target: Option<String>,
    pub source_map: Option<SourceMapMode>,
    pub minify: bool,
}

impl ToolOverrides {
    fn apply(&self, mut options: ToolOptions) -> ToolOptions {
        if let Some(target) = &self.target {
            options.target = target.clone();
        }
        if let Some(source_map) = self.source_map {
            options.source_map = source_map;
        }
        if self.minify {
            options.minify = true;
        }
        options
    }
}

/// A project root with its loaded configuration.
#[derive(Debug)]
pub struct Project {
    pub root: PathBuf,
    pub config: KilnConfig,
}

impl Project {
    /// Resolve `root` (default: the current directory) and load its config.
    pub fn open(root: Option<&Path>) -> CliResult<Self> {
        let root = match root {
            Some(root) => root.to_path_buf(),
            None => std::env::current_dir().map_err(CliError::Root)?,
        };
        let root = std::path::absolute(&root).map_err(CliError::Root)?;
        let config = load_config(&root)?;
        Ok(Self { root, config })
    }

    /// Source patterns: command line first, then config.
    pub fn patterns(&self, cli: &[String]) -> Vec<String> {
        if !cli.is_empty() {
            return cli.to_vec();
        }
        self.config.build.sources.clone().unwrap_or_default()
    }

    /// Output directory: command line first, then config, then `dist`.
    pub fn out_dir(&self, cli: Option<&Path>) -> PathBuf {
        let out = cli
            .map(Path::to_path_buf)
            .or_else(|| self.config.build.out_dir.clone())
            .unwrap_or_else(|| PathBuf::from("dist"));
        self.root.join(out)
    }

    /// Build both tools once and wrap them in a stager.
    pub fn stager(&self, overrides: &ToolOverrides) -> CliResult<Stager> {
        let build = &self.config.build;
        let stager = Stager::from_options(
            overrides.apply(build.tool_options(ToolKind::Module)),
            overrides.apply(build.tool_options(ToolKind::Script)),
        )?;
        Ok(match &build.module_suffixes {
            Some(suffixes) => stager.with_module_suffixes(suffixes.iter().cloned()),
            None => stager,
        })
    }
}
