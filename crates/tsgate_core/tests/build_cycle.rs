//! Integration tests for full build cycles.
//!
//! These tests drive `BuildAggregator::from_options` the way a pipeline
//! host would: load a rules document, run builds over in-memory files and
//! inspect artifacts, reports and escalation.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tsgate_core::{
    BuildAggregator, OutcomeCache, SourceFile, SourceTree, StageError, StageOptions, TestGenerator,
    write_artifacts,
};

const WHITESPACE_RULES: &str = r#"{
    "rules": {
        "no-trailing-whitespace": true,
        "eofline": true
    }
}"#;

const SCENARIO_A_INPUT: &str = "var Xx = \"abcd\"; ";

fn write_config(dir: &Path, json: &str) -> PathBuf {
    let path = dir.join("tslint.json");
    fs::write(&path, json).unwrap();
    path
}

/// Options with a config document and a report file inside `temp`.
fn options_with(temp: &TempDir, json: &str) -> StageOptions {
    StageOptions::new()
        .configuration_path(write_config(temp.path(), json))
        .output_file(temp.path().join("lint-output.txt"))
}

fn collecting_notifier(options: StageOptions) -> (StageOptions, Arc<Mutex<Vec<String>>>) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&lines);
    let options = options.notifier(move |line: &str| seen.lock().push(line.to_string()));
    (options, lines)
}

fn report_file(temp: &TempDir) -> String {
    fs::read_to_string(temp.path().join("lint-output.txt")).unwrap()
}

#[test]
fn test_failing_file_reports_two_errors() {
    let temp = TempDir::new().unwrap();
    let (options, lines) = collecting_notifier(options_with(&temp, WHITESPACE_RULES));
    let aggregator = BuildAggregator::from_options(options).unwrap();

    let output = aggregator
        .run(&[SourceFile::new("a.ts", SCENARIO_A_INPUT)])
        .unwrap();

    assert_eq!(
        *lines.lock(),
        vec![
            "ERROR: a.ts[1, 17]: trailing whitespace (no-trailing-whitespace)".to_string(),
            "ERROR: a.ts[1, 18]: file should end with a newline (eofline)".to_string(),
            "======= Found 2 lint errors in 1 files =======".to_string(),
        ]
    );
    assert_eq!(output.summary.failure_count, 2);
    assert_eq!(output.artifacts.len(), 1);
    assert_eq!(output.artifacts[0].path, "a.lint-test.js");
    assert!(output.artifacts[0].text.contains("assert.ok(false"));
    assert!(
        output.artifacts[0]
            .text
            .contains("a.ts should pass tsgate.\\n\\nERROR: a.ts[1, 17]: trailing whitespace")
    );
}

#[test]
fn test_passing_file_with_fail_build() {
    let temp = TempDir::new().unwrap();
    let (options, lines) = collecting_notifier(options_with(&temp, WHITESPACE_RULES));
    let aggregator = BuildAggregator::from_options(options.fail_build(true)).unwrap();

    let output = aggregator
        .run(&[SourceFile::new("a.ts", "let x = 1;\n")])
        .unwrap();

    assert!(lines.lock().is_empty());
    assert_eq!(output.report, "Finished linting 1 files successfully");
    assert_eq!(report_file(&temp), "Finished linting 1 files successfully");
    assert!(output.artifacts[0].text.contains("assert.ok(true"));
}

#[test]
fn test_missing_configuration_fails_before_build() {
    let temp = TempDir::new().unwrap();
    let options = StageOptions::new().configuration_path(temp.path().join("missing.json"));

    let result = BuildAggregator::from_options(options);

    assert!(matches!(result, Err(StageError::ConfigNotFound { .. })));
}

#[test]
fn test_configuration_without_rules_key() {
    let temp = TempDir::new().unwrap();
    let options = options_with(&temp, r#"{ "extends": "tsgate:recommended" }"#);

    let result = BuildAggregator::from_options(options);

    assert!(matches!(result, Err(StageError::ConfigShape { .. })));
}

#[test]
fn test_disabled_generator_produces_empty_artifacts() {
    let temp = TempDir::new().unwrap();
    let options = options_with(&temp, WHITESPACE_RULES).disable_test_generator(true);
    let aggregator = BuildAggregator::from_options(options).unwrap();

    let output = aggregator
        .run(&[
            SourceFile::new("a.ts", SCENARIO_A_INPUT),
            SourceFile::new("b.ts", "let y = 2;\n"),
        ])
        .unwrap();

    assert_eq!(output.artifacts.len(), 2);
    assert!(output.artifacts.iter().all(|a| a.text.is_empty()));
    assert_eq!(output.summary.failure_count, 2);
}

#[test]
fn test_custom_rules_document() {
    let temp = TempDir::new().unwrap();
    let (options, lines) = collecting_notifier(options_with(
        &temp,
        r#"{ "rules": { "no-var-keyword": true } }"#,
    ));
    let aggregator = BuildAggregator::from_options(options).unwrap();

    aggregator
        .run(&[SourceFile::new("a.ts", SCENARIO_A_INPUT)])
        .unwrap();

    assert_eq!(
        lines.lock()[0],
        "ERROR: a.ts[1, 1]: Forbidden 'var' keyword, use 'let' or 'const' instead (no-var-keyword)"
    );
}

#[test]
fn test_identical_builds_are_deterministic() {
    let temp = TempDir::new().unwrap();
    let aggregator =
        BuildAggregator::from_options(options_with(&temp, WHITESPACE_RULES)).unwrap();
    let files = vec![
        SourceFile::new("a.ts", SCENARIO_A_INPUT),
        SourceFile::new("lib/b.ts", "let b = 1;  \n"),
        SourceFile::new("lib/c.ts", "let c = 1;\n"),
    ];

    let first = aggregator.run(&files).unwrap();
    let first_report = report_file(&temp);
    let second = aggregator.run(&files).unwrap();

    assert_eq!(first.artifacts, second.artifacts);
    assert_eq!(first.summary, second.summary);
    assert_eq!(first_report, report_file(&temp));
}

#[test]
fn test_counts_are_per_build() {
    let temp = TempDir::new().unwrap();
    let aggregator =
        BuildAggregator::from_options(options_with(&temp, WHITESPACE_RULES)).unwrap();
    let files = vec![
        SourceFile::new("a.ts", SCENARIO_A_INPUT),
        SourceFile::new("b.ts", "let b = 1;\n"),
    ];

    aggregator.run(&files).unwrap();
    let output = aggregator.run(&files).unwrap();

    assert_eq!(output.summary.total_files, 2);
    assert_eq!(output.summary.failure_count, 2);
    assert_eq!(
        output.summary.formatted_lines.len(),
        output.summary.failure_count
    );
}

#[test]
fn test_fail_build_escalates_after_reporting() {
    let temp = TempDir::new().unwrap();
    let options = options_with(&temp, WHITESPACE_RULES).fail_build(true);
    let aggregator = BuildAggregator::from_options(options).unwrap();

    let err = aggregator
        .run(&[SourceFile::new("a.ts", SCENARIO_A_INPUT)])
        .unwrap_err();

    assert!(matches!(err, StageError::BuildFailed));
    assert_eq!(err.to_string(), "Build failed due to lint errors!");
    assert_eq!(
        report_file(&temp),
        "======= Found 2 lint errors in 1 files =======\n\
         ERROR: a.ts[1, 17]: trailing whitespace (no-trailing-whitespace)\n\
         ERROR: a.ts[1, 18]: file should end with a newline (eofline)"
    );
}

#[test]
fn test_errors_without_fail_build_succeed() {
    let temp = TempDir::new().unwrap();
    let aggregator =
        BuildAggregator::from_options(options_with(&temp, WHITESPACE_RULES)).unwrap();

    let output = aggregator
        .run(&[SourceFile::new("a.ts", SCENARIO_A_INPUT)])
        .unwrap();

    assert!(output.summary.has_failures());
}

#[test]
fn test_custom_generator_output() {
    let temp = TempDir::new().unwrap();
    let options = options_with(&temp, WHITESPACE_RULES).test_generator(TestGenerator::custom(
        |_path, _passed, _text| "FOO IS GENERATED".to_string(),
    ));
    let aggregator = BuildAggregator::from_options(options).unwrap();

    let output = aggregator
        .run(&[SourceFile::new("a.ts", SCENARIO_A_INPUT)])
        .unwrap();

    assert_eq!(output.artifacts[0].text, "FOO IS GENERATED");
}

#[test]
fn test_mocha_generator_output() {
    let temp = TempDir::new().unwrap();
    let options = options_with(&temp, WHITESPACE_RULES).test_generator(TestGenerator::Mocha);
    let aggregator = BuildAggregator::from_options(options).unwrap();

    let output = aggregator
        .run(&[SourceFile::new("a.ts", SCENARIO_A_INPUT)])
        .unwrap();

    let text = &output.artifacts[0].text;
    assert!(text.starts_with("describe('TSGate - .', function() {"));
    assert!(text.contains("new chai.AssertionError("));
}

#[test]
fn test_engine_fault_is_reported_then_returned() {
    let temp = TempDir::new().unwrap();
    let aggregator =
        BuildAggregator::from_options(options_with(&temp, WHITESPACE_RULES)).unwrap();

    let err = aggregator
        .run(&[
            SourceFile::new("a.ts", "let a = 1;\n"),
            SourceFile::new("b.ts", "let\0b;\n"),
            SourceFile::new("c.ts", "let c = 1;\n"),
        ])
        .unwrap_err();

    match err {
        StageError::LintEngine { path, .. } => assert_eq!(path, "b.ts"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(report_file(&temp), "Finished linting 1 files successfully");
}

#[test]
fn test_nested_configuration() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("src");
    fs::create_dir_all(root.join("legacy")).unwrap();
    fs::write(root.join("a.ts"), "var a = 1;\n").unwrap();
    fs::write(root.join("legacy/b.ts"), "var b = 1;\n").unwrap();
    write_config(&root.join("legacy"), r#"{ "rules": { "no-var-keyword": true } }"#);

    let options = options_with(&temp, WHITESPACE_RULES).nested_configs(&root);
    let aggregator = BuildAggregator::from_options(options).unwrap();
    let files = SourceTree::new(&root, &["ts".to_string()], &[])
        .unwrap()
        .collect()
        .unwrap();

    let output = aggregator.run(&files).unwrap();

    assert_eq!(output.summary.failure_count, 1);
    assert_eq!(
        output.summary.formatted_lines,
        vec![
            "ERROR: legacy/b.ts[1, 1]: Forbidden 'var' keyword, use 'let' or 'const' instead (no-var-keyword)"
                .to_string()
        ]
    );
}

#[test]
fn test_cached_outcomes_are_counted() {
    let temp = TempDir::new().unwrap();
    let cache_dir = temp.path().join(".tsgate-cache");
    let options = options_with(&temp, WHITESPACE_RULES).cache_dir(&cache_dir);
    let files = vec![
        SourceFile::new("a.ts", SCENARIO_A_INPUT),
        SourceFile::new("b.ts", "let b = 1;\n"),
    ];

    let first = BuildAggregator::from_options(options.clone())
        .unwrap()
        .run(&files)
        .unwrap();
    assert!(cache_dir.join("outcomes.json").is_file());

    let second = BuildAggregator::from_options(options)
        .unwrap()
        .run(&files)
        .unwrap();

    assert_eq!(second.summary, first.summary);
    assert_eq!(second.artifacts, first.artifacts);
}

#[test]
fn test_artifacts_written_to_output_tree() {
    let temp = TempDir::new().unwrap();
    let aggregator =
        BuildAggregator::from_options(options_with(&temp, WHITESPACE_RULES)).unwrap();
    let out = temp.path().join("dist");

    let output = aggregator
        .run(&[SourceFile::new("app/models/user.ts", "let u = 1;\n")])
        .unwrap();
    write_artifacts(&out, &output.artifacts).unwrap();

    let written = fs::read_to_string(out.join("app/models/user.lint-test.js")).unwrap();
    assert!(written.starts_with("QUnit.module('TSGate - app/models');"));
}

#[test]
fn test_non_utf8_input_does_not_abort_build() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("a.ts"), SCENARIO_A_INPUT).unwrap();
    fs::write(src.join("b.ts"), [0xFF, 0xFE, b'\n']).unwrap();
    let aggregator =
        BuildAggregator::from_options(options_with(&temp, WHITESPACE_RULES)).unwrap();

    let files = SourceTree::new(&src, &["ts".to_string()], &[])
        .unwrap()
        .collect()
        .unwrap();
    let output = aggregator.run(&files).unwrap();

    assert_eq!(output.summary.total_files, 1);
    assert_eq!(output.artifacts[0].path, "a.lint-test.js");
    assert!(report_file(&temp).starts_with("======= Found 2 lint errors in 1 files ======="));
}

#[test]
fn test_cache_drops_entries_for_removed_inputs() {
    let temp = TempDir::new().unwrap();
    let cache_dir = temp.path().join(".tsgate-cache");
    let options = options_with(&temp, WHITESPACE_RULES).cache_dir(&cache_dir);
    let old_files: Vec<SourceFile> = (0..5)
        .map(|i| SourceFile::new(format!("old{}.ts", i), "let x = 1;\n"))
        .collect();

    BuildAggregator::from_options(options.clone())
        .unwrap()
        .run(&old_files)
        .unwrap();
    BuildAggregator::from_options(options)
        .unwrap()
        .run(&[SourceFile::new("new.ts", "let y = 1;\n")])
        .unwrap();

    let mut cache = OutcomeCache::new(&cache_dir);
    cache.load().unwrap();
    assert_eq!(cache.len(), 1);
}
