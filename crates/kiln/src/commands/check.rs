//! Check command - Report diagnostics without writing outputs

use super::{OutputFormat, Project, ToolOverrides};
use crate::discover::collect_sources;
use crate::error::CliResult;
use clap::Args;
use kiln_ember::{
    CollectingSink, ConsoleSink, DiagnosticReporter, DiagnosticSink, ReportSummary, ReportedLine,
};
use kiln_glaze::ToolResult;
use kiln_shelf::{Source, Stager};
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Glob pattern(s) selecting sources relative to the root (default: every script)
    pub patterns: Vec<String>,

    /// Project root holding kiln.config.json (default: current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Diagnostics of one checked source.
#[derive(Debug, Clone, Serialize)]
pub struct FileCheck {
    pub name: String,
    pub errors: usize,
    pub warnings: usize,
    /// Set when the source could not be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FileCheck {
    pub fn failed(&self) -> bool {
        self.errors > 0 || self.message.is_some()
    }
}

/// Result of one check run, in source-name order.
#[derive(Debug, Default)]
pub struct CheckRun {
    pub files: Vec<FileCheck>,
}

impl CheckRun {
    pub fn failed(&self) -> usize {
        self.files.iter().filter(|f| f.failed()).count()
    }

    pub fn errors(&self) -> usize {
        self.files.iter().map(|f| f.errors).sum()
    }

    pub fn warnings(&self) -> usize {
        self.files.iter().map(|f| f.warnings).sum()
    }
}

fn check_source(
    source: &Source,
    stager: &Stager,
    reporter: &DiagnosticReporter,
) -> ToolResult<ReportSummary> {
    let text = source.input().read()?;
    let output = stager
        .tool_for(source.name())
        .transpile_only(source.name(), &text)?;
    Ok(reporter.report(&text, &output.diagnostics))
}

/// Run every discovered source through its tool. Nothing is written.
pub fn execute(args: &CheckArgs, sink: Arc<dyn DiagnosticSink>) -> CliResult<CheckRun> {
    let project = Project::open(args.root.as_deref())?;
    let out_dir = project.out_dir(None);
    let sources = collect_sources(&project.root, &project.patterns(&args.patterns), &out_dir)?;
    let stager = project.stager(&ToolOverrides::default())?;
    let reporter = DiagnosticReporter::new(sink);

    let files = sources
        .par_iter()
        .map(|source| match check_source(source, &stager, &reporter) {
            Ok(summary) => FileCheck {
                name: source.name().to_string(),
                errors: summary.errors,
                warnings: summary.warnings,
                message: None,
            },
            Err(e) => FileCheck {
                name: source.name().to_string(),
                errors: 0,
                warnings: 0,
                message: Some(e.to_string()),
            },
        })
        .collect();

    Ok(CheckRun { files })
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    success: bool,
    errors: usize,
    warnings: usize,
    files: &'a [FileCheck],
    diagnostics: Vec<ReportedLine>,
}

pub fn run(args: CheckArgs) {
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

    if run.files.is_empty() {
        eprintln!("No source files found matching the patterns");
        return;
    }

    let failed = run.failed();
    match args.format {
        OutputFormat::Json => {
            let report = JsonReport {
                success: failed == 0,
                errors: run.errors(),
                warnings: run.warnings(),
                files: &run.files,
                diagnostics: collected.take(),
            };
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("Failed to serialize report: {}", e),
            }
        }
        OutputFormat::Text => {
            for file in &run.files {
                if let Some(message) = &file.message {
                    eprintln!("Error checking {}: {}", file.name, message);
                }
            }

            let elapsed = start.elapsed().as_secs_f64();
            if failed > 0 {
                eprintln!(
                    "✗ {} of {} file(s) failed ({} errors, {} warnings) in {:.4}s",
                    failed,
                    run.files.len(),
                    run.errors(),
                    run.warnings(),
                    elapsed
                );
            } else {
                eprintln!(
                    "✓ {} file(s) checked, {} warnings in {:.4}s",
                    run.files.len(),
                    run.warnings(),
                    elapsed
                );
            }
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }
}
