//! Integration tests testing against the actual crate binary and the checked-in fixtures: Test the full E2E path.

use std::path::PathBuf;
use std::process::{Command, Output};

use crate::scripts_dir;

const KTS: &str = r"(.+)\.kts";

fn fixture_guard(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fixture-guard"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to execute binary")
}

/// Returns the absolute path to a test fixture file in `tests/data/`.
fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("binary output was not valid UTF-8")
}

#[test]
fn cases_prints_the_macro_table() {
    let root = scripts_dir();
    let output = fixture_guard(&["cases", root.to_str().unwrap(), KTS]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        stdout(&output),
        "\
broken_test => \"broken.test.kts\",
declarationsOrderWith_test => \"declarationsOrderWith.test.kts\",
empty_test => \"empty.test.kts\",
params_test => \"params.test.kts\",
reflect_test => \"reflect.test.kts\",
simple_test => \"simple.test.kts\",
"
    );
}

#[test]
fn cases_leaves_out_excluded_fixtures() {
    let root = scripts_dir();
    let output = fixture_guard(&["cases", root.to_str().unwrap(), KTS, "broken_test", "params_test"]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let table = stdout(&output);
    assert!(!table.contains("broken_test"), "{table}");
    assert!(!table.contains("params_test"), "{table}");
    assert!(table.contains("simple_test => \"simple.test.kts\","), "{table}");
}

#[test]
fn generated_manifest_matches_the_checked_in_one() {
    let root = scripts_dir();
    let output = fixture_guard(&[
        "manifest",
        root.to_str().unwrap(),
        KTS,
        "JVM_IR",
        "broken_test",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let expected = std::fs::read_to_string(data_path("manifest.csv"))
        .expect("failed to read manifest fixture");

    assert_eq!(normalize_csv(&stdout(&output)), normalize_csv(&expected));
}

#[test]
fn manifest_without_backend_still_takes_exclusions() {
    let root = scripts_dir();
    let output = fixture_guard(&["manifest", root.to_str().unwrap(), KTS, "-", "broken_test"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let rows = normalize_csv(&stdout(&output));
    assert_eq!(rows.len(), 6, "{rows:?}"); // header plus five fixtures
    assert!(rows.contains(&"empty_test,empty.test.kts,".to_string()), "{rows:?}");
    assert!(rows.iter().all(|row| !row.starts_with("broken_test,")), "{rows:?}");
}

#[test]
fn check_passes_with_exclusion() {
    let root = scripts_dir();
    let manifest = data_path("manifest.csv");
    let output = fixture_guard(&[
        "check",
        root.to_str().unwrap(),
        KTS,
        manifest.to_str().unwrap(),
        "broken_test",
    ]);

    assert!(output.status.success(), "stdout: {}", stdout(&output));
    assert_eq!(stdout(&output).trim(), "all fixtures present");
}

#[test]
fn check_fails_and_names_the_undeclared_fixture() {
    let root = scripts_dir();
    let manifest = data_path("manifest.csv");
    let output = fixture_guard(&["check", root.to_str().unwrap(), KTS, manifest.to_str().unwrap()]);

    assert!(!output.status.success());
    let report = stdout(&output);
    assert!(report.contains("broken_test => \"broken.test.kts\""), "{report}");
    assert!(report.contains("declared but absent (delete the case): none"), "{report}");
}

#[test]
fn missing_root_fails() {
    let manifest = data_path("manifest.csv");
    let output = fixture_guard(&[
        "check",
        "/definitely/not/a/fixture/root",
        KTS,
        manifest.to_str().unwrap(),
    ]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("configuration error"));
}

#[test]
fn unknown_command_fails_with_usage() {
    let output = fixture_guard(&["frobnicate"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage:"));
}

#[cfg(unix)]
#[test]
fn run_dispatches_every_case_to_the_program() {
    let root = scripts_dir();
    let manifest = data_path("manifest.csv");
    let output = fixture_guard(&[
        "run",
        root.to_str().unwrap(),
        KTS,
        manifest.to_str().unwrap(),
        "grep",
        "-q",
        "EXPECTED: OK",
    ]);

    // broken.test.kts is not declared, so the completeness check fails while every case passes
    assert!(!output.status.success());
    let report = stdout(&output);
    assert!(report.contains("all fixtures present ... FAILED"), "{report}");
    for id in [
        "declarationsOrderWith_test",
        "empty_test",
        "params_test",
        "reflect_test",
        "simple_test",
    ] {
        assert!(report.contains(&format!("{id} ... ok")), "{report}");
    }
    assert!(report.contains("5 passed; 1 failed"), "{report}");
}

/// Trims every cell, so that the checked-in manifest may be aligned for readability.
fn normalize_csv(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| {
            line.split(',')
                .map(|cell| cell.trim())
                .collect::<Vec<_>>()
                .join(",")
        })
        .filter(|line| !line.is_empty())
        .collect()
}
