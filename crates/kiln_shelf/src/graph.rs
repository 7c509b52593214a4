//! Build graph.
//!
//! Holds registered targets (one per output path) and builds the stale ones
//! on demand. Independent targets run on a rayon pool. A target failing
//! with error diagnostics never stops the others; a fatal tool error ends
//! the whole build.

use crate::fingerprint::{fingerprint, Fingerprints};
use crate::target::Target;
use kiln_ember::{DiagnosticReporter, ReportSummary};
use kiln_glaze::{sibling_map_path, SourceMapMode, ToolResult};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::path::PathBuf;

/// Options for [`BuildGraph::build`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Rebuild every target regardless of fingerprints.
    pub force: bool,
    /// Worker threads; `None` uses the global pool, `Some(1)` builds in order
    /// on the calling thread.
    pub jobs: Option<usize>,
}

/// Outcome of one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetStatus {
    /// Output written.
    Built,
    /// Skipped; the previous output is current.
    UpToDate,
    /// Error diagnostics; output left untouched.
    Failed,
}

/// Report for one target.
#[derive(Debug, Clone)]
pub struct TargetReport {
    pub name: String,
    pub output: PathBuf,
    pub status: TargetStatus,
    pub summary: ReportSummary,
}

/// Report for one [`BuildGraph::build`] call, in registration order.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub targets: Vec<TargetReport>,
}

impl BuildReport {
    pub fn count(&self, status: TargetStatus) -> usize {
        self.targets.iter().filter(|t| t.status == status).count()
    }

    pub fn built(&self) -> usize {
        self.count(TargetStatus::Built)
    }

    pub fn up_to_date(&self) -> usize {
        self.count(TargetStatus::UpToDate)
    }

    pub fn failed(&self) -> usize {
        self.count(TargetStatus::Failed)
    }

    pub fn errors(&self) -> usize {
        self.targets.iter().map(|t| t.summary.errors).sum()
    }

    pub fn warnings(&self) -> usize {
        self.targets.iter().map(|t| t.summary.warnings).sum()
    }

    #[inline]
    pub fn success(&self) -> bool {
        self.failed() == 0
    }
}

/// Registered targets plus the fingerprints of their last good builds.
#[derive(Debug, Default)]
pub struct BuildGraph {
    nodes: Vec<Target>,
    index: FxHashMap<PathBuf, usize>,
    fingerprints: Fingerprints,
    manifest: Option<PathBuf>,
}

enum FingerprintUpdate {
    Keep,
    Set(u64),
    Clear,
}

impl BuildGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist fingerprints at `path`, loading any previous manifest.
    pub fn with_manifest(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            fingerprints: Fingerprints::load(&path),
            manifest: Some(path),
            ..Self::default()
        }
    }

    /// Register a target. A target for an output path that is already
    /// registered replaces the earlier one.
    pub fn add(&mut self, target: Target) {
        match self.index.get(target.output()) {
            Some(&i) => {
                tracing::debug!("replacing target for {}", target.output().display());
                self.nodes[i] = target;
            }
            None => {
                self.index
                    .insert(target.output().to_path_buf(), self.nodes.len());
                self.nodes.push(target);
            }
        }
    }

    pub fn extend(&mut self, targets: impl IntoIterator<Item = Target>) {
        for target in targets {
            self.add(target);
        }
    }

    #[inline]
    pub fn targets(&self) -> &[Target] {
        &self.nodes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn fingerprints(&self) -> &Fingerprints {
        &self.fingerprints
    }

    /// Build every stale target.
    ///
    /// The first fatal tool error (an unreadable input, a failed write)
    /// stops the build and is returned; fingerprints and the manifest are
    /// left as they were before the call.
    pub fn build(
        &mut self,
        reporter: &DiagnosticReporter,
        options: &BuildOptions,
    ) -> ToolResult<BuildReport> {
        let fingerprints = &self.fingerprints;
        let run = |target: &Target| build_node(target, fingerprints, reporter, options.force);

        let results: ToolResult<Vec<(TargetReport, FingerprintUpdate)>> = match options.jobs {
            Some(1) => self.nodes.iter().map(run).collect(),
            Some(n) => match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
                Ok(pool) => pool.install(|| self.nodes.par_iter().map(run).collect()),
                Err(e) => {
                    tracing::warn!("failed to start {} workers ({}), using the global pool", n, e);
                    self.nodes.par_iter().map(run).collect()
                }
            },
            None => self.nodes.par_iter().map(run).collect(),
        };
        let results = results?;

        let mut report = BuildReport::default();
        for (target_report, update) in results {
            match update {
                FingerprintUpdate::Keep => {}
                FingerprintUpdate::Set(fp) => {
                    self.fingerprints.insert(target_report.output.clone(), fp)
                }
                FingerprintUpdate::Clear => self.fingerprints.remove(&target_report.output),
            }
            report.targets.push(target_report);
        }

        if let Some(manifest) = &self.manifest {
            if let Err(e) = self.fingerprints.save(manifest) {
                tracing::warn!("failed to write {}: {}", manifest.display(), e);
            }
        }

        Ok(report)
    }
}

fn build_node(
    target: &Target,
    fingerprints: &Fingerprints,
    reporter: &DiagnosticReporter,
    force: bool,
) -> ToolResult<(TargetReport, FingerprintUpdate)> {
    let report = |status, summary| TargetReport {
        name: target.name().to_string(),
        output: target.output().to_path_buf(),
        status,
        summary,
    };

    let current = fingerprint(target)?;

    if !force && is_up_to_date(target, fingerprints.get(target.output()), current) {
        tracing::debug!("{} is up to date", target.name());
        return Ok((
            report(TargetStatus::UpToDate, ReportSummary::default()),
            FingerprintUpdate::Keep,
        ));
    }

    tracing::info!("{} {}", target.tool().label(), target.name());

    let outcome = target.build(reporter)?;
    Ok(if outcome.written {
        (
            report(TargetStatus::Built, outcome.summary),
            FingerprintUpdate::Set(current),
        )
    } else {
        (
            report(TargetStatus::Failed, outcome.summary),
            FingerprintUpdate::Clear,
        )
    })
}

/// Unchanged fingerprint, and every file the last build wrote still exists.
fn is_up_to_date(target: &Target, previous: Option<u64>, current: u64) -> bool {
    if previous != Some(current) || !target.output().exists() {
        return false;
    }
    match target.tool().options().source_map {
        SourceMapMode::Sibling => sibling_map_path(target.output()).exists(),
        SourceMapMode::Inline => true,
    }
}
