//! Build command - Transpile sources into the output directory

use super::{OutputFormat, Project, SourceMapArg, ToolOverrides};
use crate::discover::collect_sources;
use crate::error::CliResult;
use clap::Args;
use kiln_ember::{CollectingSink, ConsoleSink, DiagnosticReporter, DiagnosticSink, ReportedLine};
use kiln_shelf::{BuildGraph, BuildOptions, BuildReport, TargetStatus};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Fingerprint manifest kept inside the output directory.
pub const FINGERPRINT_MANIFEST: &str = ".kiln-fingerprints.json";

#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Glob pattern(s) selecting sources relative to the root (default: every script)
    pub patterns: Vec<String>,

    /// Output directory (default: ./dist)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Project root holding kiln.config.json (default: current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Language level to lower to, e.g. es2015 or esnext
    #[arg(long)]
    pub target: Option<String>,

    /// Source map placement for every tool
    #[arg(long, value_enum)]
    pub source_map: Option<SourceMapArg>,

    /// Minify generated code
    #[arg(long)]
    pub minify: bool,

    /// Rebuild targets that are up to date
    #[arg(long)]
    pub force: bool,

    /// Number of threads (default: number of CPUs)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Show timing profile breakdown
    #[arg(long)]
    pub profile: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl BuildArgs {
    fn overrides(&self) -> ToolOverrides {
        ToolOverrides {
            target: self.target.clone(),
            source_map: self.source_map.map(Into::into),
            minify: self.minify,
        }
    }
}

/// Result of one build run.
#[derive(Debug)]
pub struct BuildRun {
    pub out_dir: PathBuf,
    pub sources: usize,
    pub report: BuildReport,
    pub collect_elapsed: Duration,
    pub build_elapsed: Duration,
}

/// Discover, stage and build. Diagnostics go to `sink`.
pub fn execute(args: &BuildArgs, sink: Arc<dyn DiagnosticSink>) -> CliResult<BuildRun> {
    let collect_start = Instant::now();
    let project = Project::open(args.root.as_deref())?;
    let out_dir = project.out_dir(args.output.as_deref());
    let sources = collect_sources(
        &project.root,
        &project.patterns(&args.patterns),
        &out_dir,
    )?;
    let collect_elapsed = collect_start.elapsed();

    if sources.is_empty() {
        return Ok(BuildRun {
            out_dir,
            sources: 0,
            report: BuildReport::default(),
            collect_elapsed,
            build_elapsed: Duration::ZERO,
        });
    }

    let build_start = Instant::now();
    let targets = project.stager(&args.overrides())?.stage(&out_dir, &sources)?;

    let mut graph = BuildGraph::with_manifest(out_dir.join(FINGERPRINT_MANIFEST));
    graph.extend(targets);
    let report = graph.build(
        &DiagnosticReporter::new(sink),
        &BuildOptions {
            force: args.force,
            jobs: args.threads,
        },
    )?;

    Ok(BuildRun {
        out_dir,
        sources: sources.len(),
        report,
        collect_elapsed,
        build_elapsed: build_start.elapsed(),
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonTarget {
    name: String,
    output: String,
    status: &'static str,
    errors: usize,
    warnings: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport {
    success: bool,
    out_dir: String,
    built: usize,
    up_to_date: usize,
    failed: usize,
    targets: Vec<JsonTarget>,
    diagnostics: Vec<ReportedLine>,
}

pub fn status_label(status: TargetStatus) -> &'static str {
    match status {
        TargetStatus::Built => "built",
        TargetStatus::UpToDate => "up_to_date",
        TargetStatus::Failed => "failed",
    }
}

fn json_report(run: &BuildRun, diagnostics: Vec<ReportedLine>) -> JsonReport {
    let report = &run.report;
    JsonReport {
        success: report.success(),
        out_dir: run.out_dir.display().to_string(),
        built: report.built(),
        up_to_date: report.up_to_date(),
        failed: report.failed(),
        targets: report
            .targets
            .iter()
            .map(|t| JsonTarget {
                name: t.name.clone(),
                output: t.output.display().to_string(),
                status: status_label(t.status),
                errors: t.summary.errors,
                warnings: t.summary.warnings,
            })
            .collect(),
        diagnostics,
    }
}

pub fn run(args: BuildArgs) {
    let start = Instant::now();
    let collected = Arc::new(CollectingSink::new());
    let sink: Arc<dyn DiagnosticSink> = match args.format {
        OutputFormat::Text => Arc::new(ConsoleSink::default()),
        OutputFormat::Json => collected.clone(),
    };

    let run = match execute(&args, sink) {
        Ok(run) => run,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            std::process::exit(1);
        }
    };

    if run.sources == 0 {
        eprintln!("No source files found matching the patterns");
        std::process::exit(1);
    }

    let report = &run.report;
    if args.format == OutputFormat::Json {
        match serde_json::to_string_pretty(&json_report(&run, collected.take())) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize report: {}", e),
        }
    }

    let total_elapsed = start.elapsed();

    if args.profile {
        eprintln!();
        eprintln!("Timing breakdown:");
        eprintln!("  File collection: {:.4}s", run.collect_elapsed.as_secs_f64());
        eprintln!("  Build:           {:.4}s", run.build_elapsed.as_secs_f64());
        eprintln!("  Total:           {:.4}s", total_elapsed.as_secs_f64());
        eprintln!();
    }

    let built = report.built();
    let failed = report.failed();
    if failed > 0 {
        eprintln!(
            "✗ {} file(s) failed, {} compiled in {:.4}s",
            failed,
            built,
            total_elapsed.as_secs_f64()
        );
        std::process::exit(1);
    }

    let file_word = if built == 1 { "file" } else { "files" };
    eprintln!(
        "✓ {} {} compiled, {} up to date in {:.4}s",
        built,
        file_word,
        report.up_to_date(),
        total_elapsed.as_secs_f64()
    );
}
