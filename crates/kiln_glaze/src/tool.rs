//! Reusable transpile tools.

use crate::error::{ToolError, ToolResult};
use crate::input::ToolInput;
use crate::options::{SourceMapMode, ToolKind, ToolOptions};
use crate::transpile::{transform_options, transpile, Emitted, TranspileOutput};
use kiln_ember::{DiagnosticReporter, ReportSummary};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// What one tool invocation did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToolOutcome {
    /// Whether the output (and its map) was written.
    pub written: bool,
    pub summary: ReportSummary,
}

/// A transpile tool bound to one [`ToolKind`].
///
/// Built once per kind and shared by every target of that kind. Holds no
/// state besides its options, so sharing across threads is free.
#[derive(Debug, Clone)]
pub struct Tool {
    kind: ToolKind,
    options: ToolOptions,
}

impl Tool {
    /// Create a tool. Performs no I/O; rejects an unknown language target.
    pub fn new(kind: ToolKind, options: ToolOptions) -> ToolResult<Self> {
        transform_options(&options.target)?;
        Ok(Self { kind, options })
    }

    #[inline]
    pub fn module(options: ToolOptions) -> ToolResult<Self> {
        Self::new(ToolKind::Module, options)
    }

    #[inline]
    pub fn script(options: ToolOptions) -> ToolResult<Self> {
        Self::new(ToolKind::Script, options)
    }

    #[inline]
    pub fn kind(&self) -> ToolKind {
        self.kind
    }

    #[inline]
    pub fn options(&self) -> &ToolOptions {
        &self.options
    }

    /// Purpose label for progress output.
    #[inline]
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }

    /// Transpile without touching the file system.
    pub fn transpile_only(&self, name: &str, source: &str) -> ToolResult<TranspileOutput> {
        transpile(name, source, self.kind, &self.options)
    }

    /// Build `output` from `inputs`.
    ///
    /// `name` is the declared source name, used to label diagnostics and to
    /// pick the source language. The output is written only when the
    /// invocation produced no error; a failed compile leaves any previous
    /// output untouched.
    pub fn invoke(
        &self,
        output: &Path,
        inputs: &[ToolInput],
        name: &str,
        reporter: &DiagnosticReporter,
    ) -> ToolResult<ToolOutcome> {
        let [input] = inputs else {
            return Err(ToolError::InputCount {
                output: output.to_path_buf(),
                count: inputs.len(),
            });
        };

        tracing::debug!("{} {}", self.label(), name);

        let source = input.read()?;
        let result = self.transpile_only(name, &source)?;
        self.settle(output, name, &source, result, reporter)
    }

    /// Report the diagnostics of `result` and write its output when no
    /// diagnostic is an error. Warnings never block the write.
    pub fn settle(
        &self,
        output: &Path,
        name: &str,
        source: &str,
        result: TranspileOutput,
        reporter: &DiagnosticReporter,
    ) -> ToolResult<ToolOutcome> {
        let clean = !result.has_errors();
        let summary = reporter.report(source, &result.diagnostics);

        let written = match (clean, result.emitted) {
            (true, Some(emitted)) => {
                self.write_outputs(output, emitted)?;
                true
            }
            _ => {
                tracing::debug!(
                    "{}: {} error(s), leaving {} untouched",
                    name,
                    summary.errors,
                    output.display()
                );
                false
            }
        };

        Ok(ToolOutcome { written, summary })
    }

    fn write_outputs(&self, output: &Path, emitted: Emitted) -> ToolResult<()> {
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent).map_err(|source| ToolError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut files = Vec::with_capacity(2);
        let mut code = emitted.code;
        if let Some(map) = emitted.map {
            if !code.is_empty() && !code.ends_with('\n') {
                code.push('\n');
            }
            match self.options.source_map {
                SourceMapMode::Sibling => {
                    let map_path = sibling_map_path(output);
                    let map_name = map_path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    code.push_str("//# sourceMappingURL=");
                    code.push_str(&map_name);
                    code.push('\n');
                    files.push((map_path, map.json));
                }
                SourceMapMode::Inline => {
                    code.push_str("//# sourceMappingURL=");
                    code.push_str(&map.data_url);
                    code.push('\n');
                }
            }
        }

        // The output goes last so it never references a map that did not land.
        files.push((
            output.to_path_buf(),
            apply_newline(code, self.options.newline.as_str()),
        ));
        write_together(&files)
    }
}

/// `<output>.map`, e.g. `out/a.js` -> `out/a.js.map`.
pub fn sibling_map_path(output: &Path) -> PathBuf {
    with_suffix(output, ".map")
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut path: OsString = path.as_os_str().to_owned();
    path.push(suffix);
    PathBuf::from(path)
}

fn apply_newline(code: String, newline: &str) -> String {
    if newline == "\n" {
        code
    } else {
        code.replace('\n', newline)
    }
}

const TMP_SUFFIX: &str = ".kiln-tmp";
const BACKUP_SUFFIX: &str = ".kiln-bak";

/// Write every file or none of them.
///
/// Contents go to temporary siblings first. They are then renamed into
/// place in order; if a rename fails, the files already moved are put back
/// the way they were and the remaining temporaries are removed. Replaced
/// files are kept as backups until the last rename succeeds, except the
/// last file, which is renamed straight over its target.
fn write_together(files: &[(PathBuf, String)]) -> ToolResult<()> {
    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(files.len());
    for (path, contents) in files {
        let tmp = with_suffix(path, TMP_SUFFIX);
        if let Err(source) = fs::write(&tmp, contents) {
            let _ = fs::remove_file(&tmp);
            discard(staged.iter().map(|(tmp, _)| tmp.as_path()));
            return Err(ToolError::Write {
                path: path.clone(),
                source,
            });
        }
        staged.push((tmp, path.as_path()));
    }

    let last = staged.len().saturating_sub(1);
    let mut committed: Vec<(&Path, Option<PathBuf>)> = Vec::with_capacity(staged.len());
    for (i, (tmp, path)) in staged.iter().enumerate() {
        match commit(tmp, path, i < last) {
            Ok(backup) => committed.push((*path, backup)),
            Err(source) => {
                roll_back(&committed);
                discard(staged[i..].iter().map(|(tmp, _)| tmp.as_path()));
                return Err(ToolError::Write {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }
    }

    discard(committed.iter().filter_map(|(_, backup)| backup.as_deref()));
    Ok(())
}

/// Rename `tmp` over `path`, first moving an existing file aside when
/// `keep_backup` is set. Returns the backup path.
fn commit(tmp: &Path, path: &Path, keep_backup: bool) -> std::io::Result<Option<PathBuf>> {
    let backup = if keep_backup && path.is_file() {
        let backup = with_suffix(path, BACKUP_SUFFIX);
        fs::rename(path, &backup)?;
        Some(backup)
    } else {
        None
    };

    if let Err(e) = fs::rename(tmp, path) {
        if let Some(backup) = &backup {
            let _ = fs::rename(backup, path);
        }
        return Err(e);
    }
    Ok(backup)
}

fn roll_back(committed: &[(&Path, Option<PathBuf>)]) {
    for (path, backup) in committed.iter().rev() {
        match backup {
            Some(backup) => {
                let _ = fs::rename(backup, path);
            }
            None => {
                let _ = fs::remove_file(path);
            }
        }
    }
}

fn discard<'a>(paths: impl IntoIterator<Item = &'a Path>) {
    for path in paths {
        let _ = fs::remove_file(path);
    }
}
