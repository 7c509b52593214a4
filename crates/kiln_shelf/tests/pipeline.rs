//! End-to-end staging and build tests.

use kiln_ember::{CollectingSink, DiagnosticReporter};
use kiln_glaze::ToolKind;
use kiln_shelf::{transpile, BuildGraph, BuildOptions, Source, TargetStatus};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn reporter() -> (DiagnosticReporter, Arc<CollectingSink>) {
    let sink = Arc::new(CollectingSink::new());
    (DiagnosticReporter::new(sink.clone()), sink)
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn script_source_builds_clean() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let (reporter, sink) = reporter();

    let targets = transpile(&out, &[Source::text("a.js", "let x=1;")]).unwrap();
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].tool().kind(), ToolKind::Script);

    let outcome = targets[0].build(&reporter).unwrap();

    assert!(outcome.written);
    assert_eq!(outcome.summary.errors, 0);
    assert_eq!(outcome.summary.warnings, 0);
    assert!(sink.lines().is_empty());
    let code = fs::read_to_string(out.join("a.js")).unwrap();
    assert!(code.contains("let x = 1"));
}

#[test]
fn module_source_is_normalized_to_js() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let (reporter, _) = reporter();

    let targets = transpile(&out, &[Source::text("b.mjs", "import x from 'y'")]).unwrap();

    assert_eq!(targets[0].tool().kind(), ToolKind::Module);
    assert!(targets[0].output().ends_with("out/b.js"));
    assert_eq!(targets[0].name(), "b.mjs");

    let outcome = targets[0].build(&reporter).unwrap();
    assert!(outcome.written);
    let code = fs::read_to_string(out.join("b.js")).unwrap();
    assert!(code.contains("import x from"));
    assert!(!out.join("b.mjs").exists());
}

#[test]
fn syntax_error_reports_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let (reporter, sink) = reporter();

    let targets = transpile(&out, &[Source::text("c.js", "let = ;")]).unwrap();
    let outcome = targets[0].build(&reporter).unwrap();

    assert!(!outcome.written);
    assert!(outcome.summary.errors >= 1);
    let errors = sink.errors();
    assert!(!errors.is_empty());
    assert!(errors[0].contains("[c.js:1]"));
    assert!(!out.join("c.js").exists());
    assert!(!out.join("c.js.map").exists());
}

#[test]
fn build_order_does_not_leak_between_targets() {
    let sources = [
        Source::text("one.js", "var one = 1;"),
        Source::text("two.mjs", "export const two = 2;"),
    ];

    let build = |reverse: bool| {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let (reporter, _) = reporter();
        let mut targets = transpile(&out, &sources).unwrap();
        if reverse {
            targets.reverse();
        }
        for target in &targets {
            assert!(target.build(&reporter).unwrap().written);
        }
        (
            fs::read_to_string(out.join("one.js")).unwrap(),
            fs::read_to_string(out.join("two.js")).unwrap(),
        )
    };

    assert_eq!(build(false), build(true));
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn repeated_failed_builds_keep_previous_output() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let src = dir.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("game.js"), "var score = 0;").unwrap();
    let (reporter, _) = reporter();

    let targets = transpile(&out, &[Source::in_root(&src, "game.js")]).unwrap();
    assert!(targets[0].build(&reporter).unwrap().written);
    let good = fs::read_to_string(out.join("game.js")).unwrap();
    let good_map = fs::read_to_string(out.join("game.js.map")).unwrap();

    fs::write(src.join("game.js"), "var score = ;").unwrap();
    for _ in 0..3 {
        let outcome = targets[0].build(&reporter).unwrap();
        assert!(!outcome.written);
    }

    assert_eq!(fs::read_to_string(out.join("game.js")).unwrap(), good);
    assert_eq!(fs::read_to_string(out.join("game.js.map")).unwrap(), good_map);
}

#[test]
fn staging_into_existing_directory_gives_same_targets() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let sources = [Source::text("a.js", "1;"), Source::text("lib/b.mjs", "export {};")];

    let fresh = transpile(&out, &sources).unwrap();
    let again = transpile(&out, &sources).unwrap();

    let outputs = |targets: &[kiln_shelf::Target]| {
        targets
            .iter()
            .map(|t| (t.name().to_string(), t.output().to_path_buf(), t.tool().kind()))
            .collect::<Vec<_>>()
    };
    assert_eq!(outputs(&fresh), outputs(&again));
}

#[test]
fn nested_names_create_subdirectories() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let (reporter, _) = reporter();

    let targets = transpile(&out, &[Source::text("scenes/title.mjs", "export default 1;")]).unwrap();
    assert!(targets[0].build(&reporter).unwrap().written);
    assert!(out.join("scenes/title.js").exists());
    assert!(out.join("scenes/title.js.map").exists());
}

#[test]
fn graph_builds_many_targets_in_parallel() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let sources: Vec<_> = (0..16)
        .map(|i| Source::text(format!("m{i}.mjs"), format!("export const v{i} = {i};")))
        .collect();
    let (reporter, sink) = reporter();

    let mut graph = BuildGraph::new();
    graph.extend(transpile(&out, &sources).unwrap());
    let report = graph
        .build(
            &reporter,
            &BuildOptions {
                force: false,
                jobs: Some(4),
            },
        )
        .unwrap();

    assert!(report.success());
    assert_eq!(report.built(), 16);
    assert!(report
        .targets
        .iter()
        .all(|t| t.status == TargetStatus::Built));
    assert!(sink.lines().is_empty());
    for i in 0..16 {
        let code = fs::read_to_string(out.join(format!("m{i}.js"))).unwrap();
        assert!(code.contains(&format!("v{i}")));
    }
}
