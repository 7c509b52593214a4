//! Source discovery.
//!
//! Walks the project root (respecting `.gitignore`), keeps files with a
//! script extension (declaration files excluded) that match one of the
//! patterns, and names each one by its root-relative path with forward
//! slashes.

use crate::error::{CliError, CliResult};
use glob::{MatchOptions, Pattern};
use ignore::WalkBuilder;
use kiln_shelf::Source;
use std::path::{Path, PathBuf};

/// Extensions picked up by discovery.
pub const SOURCE_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "ts", "mts", "cts"];

/// Type declaration files carry no code to emit.
pub const DECLARATION_SUFFIXES: &[&str] = &[".d.ts", ".d.mts", ".d.cts"];

/// Patterns used when neither the command line nor the config names any.
pub const DEFAULT_PATTERNS: &[&str] = &["**/*"];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Compile glob patterns relative to the root. A leading `./` is ignored.
pub fn compile_patterns(patterns: &[String]) -> CliResult<Vec<Pattern>> {
    patterns
        .iter()
        .map(|pattern| {
            let normalized = pattern.trim_start_matches("./");
            Pattern::new(normalized).map_err(|source| CliError::Pattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

/// Root-relative name of `path` with forward slashes.
pub fn source_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

fn is_source_file(path: &Path) -> bool {
    let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if DECLARATION_SUFFIXES.iter().any(|s| file_name.ends_with(s)) {
        return false;
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Collect sources under `root` matching `patterns`, sorted by name.
///
/// Anything inside `exclude` (the output directory) is skipped so a build
/// never picks up its own outputs.
pub fn collect_sources(root: &Path, patterns: &[String], exclude: &Path) -> CliResult<Vec<Source>> {
    let patterns = if patterns.is_empty() {
        compile_patterns(&DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect::<Vec<_>>())?
    } else {
        compile_patterns(patterns)?
    };
    let exclude: PathBuf = exclude.to_path_buf();

    let walker = WalkBuilder::new(root)
        .filter_entry(move |entry| !entry.path().starts_with(&exclude))
        .build();

    let mut sources = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("skipping unreadable entry: {}", e);
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_some_and(|t| t.is_file()) || !is_source_file(path) {
            continue;
        }
        let Some(name) = source_name(root, path) else {
            continue;
        };
        if patterns.iter().any(|p| p.matches_with(&name, MATCH_OPTIONS)) {
            sources.push(Source::file(name, path));
        }
    }

    sources.sort_by(|a, b| a.name().cmp(b.name()));
    sources.dedup_by(|a, b| a.name() == b.name());
    tracing::debug!("found {} sources under {}", sources.len(), root.display());
    Ok(sources)
}
