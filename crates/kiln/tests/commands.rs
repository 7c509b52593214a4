//! Build and check commands against scratch projects.

use kiln::commands::build::{self, BuildArgs, FINGERPRINT_MANIFEST};
use kiln::commands::check::{self, CheckArgs};
use kiln::commands::SourceMapArg;
use kiln::config::CONFIG_FILE;
use kiln::ember::CollectingSink;
use kiln::shelf::TargetStatus;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        let path = dir.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    dir
}

fn build_args(root: &Path) -> BuildArgs {
    BuildArgs {
        root: Some(root.to_path_buf()),
        threads: Some(2),
        ..BuildArgs::default()
    }
}

#[test]
fn build_writes_outputs_maps_and_manifest() {
    let dir = project(&[
        ("src/main.mjs", "import { helper } from './util.js';\nhelper();\n"),
        ("src/util.js", "function helper() { return 1; }\n"),
        ("src/types.ts", "const n: number = 1;\n"),
    ]);
    let sink = Arc::new(CollectingSink::new());

    let run = build::execute(&build_args(dir.path()), sink.clone()).unwrap();

    assert_eq!(run.sources, 3);
    assert!(run.report.success());
    assert_eq!(run.report.built(), 3);
    assert!(sink.errors().is_empty());

    let dist = dir.path().join("dist");
    assert!(dist.join("src/main.js").exists());
    assert!(dist.join("src/main.js.map").exists());
    assert!(dist.join("src/util.js").exists());
    assert!(dist.join(FINGERPRINT_MANIFEST).exists());

    let types = fs::read_to_string(dist.join("src/types.js")).unwrap();
    assert!(!types.contains(": number"));
}

#[test]
fn second_build_is_up_to_date_and_skips_outputs() {
    let dir = project(&[("a.js", "var a = 1;\n")]);
    let args = build_args(dir.path());

    let first = build::execute(&args, Arc::new(CollectingSink::new())).unwrap();
    assert_eq!(first.report.built(), 1);

    let second = build::execute(&args, Arc::new(CollectingSink::new())).unwrap();
    assert_eq!(second.report.up_to_date(), 1);
    assert_eq!(second.sources, 1);

    let forced = build::execute(
        &BuildArgs {
            force: true,
            ..build_args(dir.path())
        },
        Arc::new(CollectingSink::new()),
    )
    .unwrap();
    assert_eq!(forced.report.built(), 1);
}

#[test]
fn failed_source_keeps_other_outputs() {
    let dir = project(&[("good.js", "var ok = 1;\n"), ("bad.js", "var = ;\n")]);
    let sink = Arc::new(CollectingSink::new());

    let run = build::execute(&build_args(dir.path()), sink.clone()).unwrap();

    assert!(!run.report.success());
    assert_eq!(run.report.failed(), 1);
    let bad = run
        .report
        .targets
        .iter()
        .find(|t| t.name == "bad.js")
        .unwrap();
    assert_eq!(bad.status, TargetStatus::Failed);
    assert!(sink.errors().iter().any(|line| line.contains("[bad.js:1]")));
    assert!(dir.path().join("dist/good.js").exists());
    assert!(!dir.path().join("dist/bad.js").exists());
}

#[test]
fn config_file_and_flags_shape_the_build() {
    let dir = project(&[
        (
            CONFIG_FILE,
            r#"{ "build": { "outDir": "public", "sources": ["lib/**/*.js"] } }"#,
        ),
        ("lib/a.js", "var a = 'x';\n"),
        ("scratch/b.js", "var b = 1;\n"),
    ]);

    let run = build::execute(
        &BuildArgs {
            source_map: Some(SourceMapArg::Inline),
            ..build_args(dir.path())
        },
        Arc::new(CollectingSink::new()),
    )
    .unwrap();

    assert_eq!(run.sources, 1);
    let code = fs::read_to_string(dir.path().join("public/lib/a.js")).unwrap();
    assert!(code.contains("sourceMappingURL=data:application/json;"));
    assert!(!dir.path().join("public/lib/a.js.map").exists());
    assert!(!dir.path().join("public/scratch").exists());
}

#[test]
fn build_with_no_sources_writes_nothing() {
    let dir = project(&[("notes.md", "# notes")]);

    let run = build::execute(&build_args(dir.path()), Arc::new(CollectingSink::new())).unwrap();

    assert_eq!(run.sources, 0);
    assert!(run.report.targets.is_empty());
    assert!(!dir.path().join("dist").exists());
}

#[test]
fn invalid_target_is_a_fatal_error() {
    let dir = project(&[("a.js", "1;")]);

    let result = build::execute(
        &BuildArgs {
            target: Some("es1999".to_string()),
            ..build_args(dir.path())
        },
        Arc::new(CollectingSink::new()),
    );

    assert!(result.is_err());
}

#[test]
fn check_reports_without_writing() {
    let dir = project(&[
        ("ok.mjs", "export const ok = true;\n"),
        ("broken.js", "let x = 1;\nlet = ;\n"),
    ]);
    let sink = Arc::new(CollectingSink::new());

    let run = check::execute(
        &CheckArgs {
            root: Some(dir.path().to_path_buf()),
            ..CheckArgs::default()
        },
        sink.clone(),
    )
    .unwrap();

    assert_eq!(run.files.len(), 2);
    assert_eq!(run.failed(), 1);
    assert!(run.errors() >= 1);
    assert!(sink
        .errors()
        .iter()
        .any(|line| line.starts_with("KL1001 [broken.js:2]: ")));
    assert!(!dir.path().join("dist").exists());
}
