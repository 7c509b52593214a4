//! Target staging.
//!
//! Turns an output directory plus an ordered list of sources into one
//! target per source. Tools are injected, built once by the caller and
//! shared by every target of their kind.

use crate::error::{StageError, StageResult};
use crate::source::Source;
use crate::target::Target;
use kiln_glaze::{Tool, ToolOptions};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Suffixes that mark a source as an ES module by default.
pub const DEFAULT_MODULE_SUFFIXES: &[&str] = &[".mjs", ".mts"];

/// Extension of every compiled output.
pub const OUTPUT_EXTENSION: &str = "js";

/// Registers targets for sources.
#[derive(Debug, Clone)]
pub struct Stager {
    module_tool: Arc<Tool>,
    script_tool: Arc<Tool>,
    module_suffixes: Vec<String>,
}

impl Stager {
    pub fn new(module_tool: Arc<Tool>, script_tool: Arc<Tool>) -> Self {
        Self {
            module_tool,
            script_tool,
            module_suffixes: DEFAULT_MODULE_SUFFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Build both tools from their options.
    pub fn from_options(module: ToolOptions, script: ToolOptions) -> StageResult<Self> {
        Ok(Self::new(
            Arc::new(Tool::module(module)?),
            Arc::new(Tool::script(script)?),
        ))
    }

    /// Replace the suffixes that select the module tool.
    pub fn with_module_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.module_suffixes = suffixes.into_iter().map(Into::into).collect();
        self
    }

    #[inline]
    pub fn module_suffixes(&self) -> &[String] {
        &self.module_suffixes
    }

    /// The tool for a declared source name.
    pub fn tool_for(&self, name: &str) -> &Arc<Tool> {
        if self.module_suffixes.iter().any(|s| name.ends_with(s.as_str())) {
            &self.module_tool
        } else {
            &self.script_tool
        }
    }

    /// Stage `sources` into `out_dir`.
    ///
    /// Creates `out_dir` first (an existing directory is fine), then returns
    /// one target per source in input order. Names must stay inside
    /// `out_dir`; an empty name or one with `..` is rejected before anything
    /// is created. Two sources resolving to the same output are not detected
    /// here.
    pub fn stage(&self, out_dir: &Path, sources: &[Source]) -> StageResult<Vec<Target>> {
        for source in sources {
            check_name(source.name())?;
        }

        std::fs::create_dir_all(out_dir).map_err(|source| StageError::CreateDir {
            path: out_dir.to_path_buf(),
            source,
        })?;
        let out_dir = std::path::absolute(out_dir).map_err(|source| StageError::Resolve {
            path: out_dir.to_path_buf(),
            source,
        })?;

        let targets = sources
            .iter()
            .map(|source| {
                let tool = self.tool_for(source.name());
                let output = output_path(&out_dir, source.name());
                tracing::trace!(
                    "staged {} -> {} ({})",
                    source.name(),
                    output.display(),
                    tool.label()
                );
                Target::new(
                    source.name(),
                    output,
                    vec![source.input().clone()],
                    Arc::clone(tool),
                )
            })
            .collect();

        Ok(targets)
    }
}

fn check_name(name: &str) -> StageResult<()> {
    let invalid = |reason| {
        Err(StageError::InvalidName {
            name: name.to_string(),
            reason,
        })
    };

    let relative = Path::new(name.trim_start_matches('/'));
    let mut components = relative.components().peekable();
    if components.peek().is_none() {
        return invalid("empty name");
    }
    if components.any(|c| !matches!(c, Component::Normal(_))) {
        return invalid("must be a relative path without `.` or `..`");
    }
    Ok(())
}

/// Output path for a declared name: `out_dir/<name>` with exactly one
/// trailing suffix replaced by `.js`.
///
/// The name is not validated here; [`Stager::stage`] rejects names that
/// would leave `out_dir`.
pub fn output_path(out_dir: &Path, name: &str) -> PathBuf {
    out_dir
        .join(name.trim_start_matches('/'))
        .with_extension(OUTPUT_EXTENSION)
}

/// Stage `sources` with default tool options.
pub fn transpile(out_dir: &Path, sources: &[Source]) -> StageResult<Vec<Target>> {
    Stager::from_options(ToolOptions::default(), ToolOptions::default())?.stage(out_dir, sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_glaze::ToolKind;
    use tempfile::TempDir;

    fn stager() -> Stager {
        Stager::from_options(ToolOptions::default(), ToolOptions::default()).unwrap()
    }

    #[test]
    fn test_output_path_replaces_one_suffix() {
        let out = Path::new("/out");
        assert_eq!(output_path(out, "a.js"), PathBuf::from("/out/a.js"));
        assert_eq!(output_path(out, "b.mjs"), PathBuf::from("/out/b.js"));
        assert_eq!(output_path(out, "foo.xyz"), PathBuf::from("/out/foo.js"));
        assert_eq!(output_path(out, "types.d.ts"), PathBuf::from("/out/types.d.js"));
        assert_eq!(output_path(out, "noext"), PathBuf::from("/out/noext.js"));
        assert_eq!(
            output_path(out, "lib/util.mts"),
            PathBuf::from("/out/lib/util.js")
        );
    }

    #[test]
    fn test_tool_selection_by_suffix() {
        let stager = stager();
        assert_eq!(stager.tool_for("main.mjs").kind(), ToolKind::Module);
        assert_eq!(stager.tool_for("main.mts").kind(), ToolKind::Module);
        assert_eq!(stager.tool_for("main.js").kind(), ToolKind::Script);
        assert_eq!(stager.tool_for("main.ts").kind(), ToolKind::Script);
    }

    #[test]
    fn test_custom_module_suffixes() {
        let stager = stager().with_module_suffixes([".module.js"]);
        assert_eq!(stager.tool_for("a.module.js").kind(), ToolKind::Module);
        assert_eq!(stager.tool_for("a.mjs").kind(), ToolKind::Script);
    }

    #[test]
    fn test_stage_preserves_order_and_names() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let sources = vec![
            Source::text("z.js", "1"),
            Source::text("a.mjs", "2"),
            Source::text("m/x.js", "3"),
        ];

        let targets = stager().stage(&out, &sources).unwrap();

        let names: Vec<_> = targets.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["z.js", "a.mjs", "m/x.js"]);
        assert!(out.is_dir());
        assert!(targets.iter().all(|t| t.output().is_absolute()));
        assert!(targets[1].output().ends_with("a.js"));
        assert_eq!(targets[1].tool().kind(), ToolKind::Module);
        assert!(targets.iter().all(|t| t.inputs().len() == 1));
    }

    #[test]
    fn test_stage_into_existing_directory() {
        let dir = TempDir::new().unwrap();
        let sources = vec![Source::text("a.js", "1")];
        let stager = stager();

        let first = stager.stage(dir.path(), &sources).unwrap();
        let second = stager.stage(dir.path(), &sources).unwrap();

        assert_eq!(first.len(), second.len());
        assert_eq!(first[0].output(), second[0].output());
    }

    #[test]
    fn test_stage_directory_failure_is_an_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "").unwrap();

        let err = stager()
            .stage(&blocker.join("out"), &[Source::text("a.js", "1")])
            .unwrap_err();
        assert!(matches!(err, StageError::CreateDir { .. }));
    }

    #[test]
    fn test_stage_rejects_names_outside_out_dir() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");

        for name in ["", "/", "../escape.js", "lib/../../escape.js", "./a.js", "."] {
            let err = stager()
                .stage(&out, &[Source::text(name, "1")])
                .unwrap_err();
            assert!(
                matches!(err, StageError::InvalidName { .. }),
                "{:?} was accepted",
                name
            );
        }
        assert!(!out.exists());
        assert!(!dir.path().join("escape.js").exists());
    }

    #[test]
    fn test_stage_accepts_leading_slash() {
        let dir = TempDir::new().unwrap();
        let targets = stager()
            .stage(dir.path(), &[Source::text("/lib/a.js", "1")])
            .unwrap();
        assert!(targets[0].output().ends_with("lib/a.js"));
    }

    #[test]
    fn test_stage_empty_sources() {
        let dir = TempDir::new().unwrap();
        let targets = stager().stage(dir.path(), &[]).unwrap();
        assert!(targets.is_empty());
    }
}
