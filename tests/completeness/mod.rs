//! Integration tests for the completeness check against real directories

use std::fs;
use std::path::Path;

use claims::{assert_err, assert_ok};
use fixture_guard::{DeclaredCase, Error, Identifier, Suite};
use tempfile::{TempDir, tempdir};

const KTS: &str = r"(.+)\.kts";

/// Helper: a fixture root containing the given scripts, each expecting `OK`.
fn script_dir(files: &[&str]) -> TempDir {
    let dir = tempdir().expect("failed to create temp dir");
    for file in files {
        let path = dir.path().join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "// EXPECTED: OK\n").unwrap();
    }
    dir
}

fn suite(root: &Path, declared: &[(&str, &str)]) -> Suite {
    Suite::new(root, KTS)
        .unwrap()
        .declare_all(declared.iter().map(|(id, path)| DeclaredCase::new(*id, *path)))
}

const THREE_SCRIPTS: [(&str, &str); 3] = [
    ("empty_test", "empty.test.kts"),
    ("simple_test", "simple.test.kts"),
    ("params_test", "params.test.kts"),
];

#[test]
fn matching_table_passes() {
    let dir = script_dir(&["empty.test.kts", "simple.test.kts", "params.test.kts"]);

    assert_ok!(suite(dir.path(), &THREE_SCRIPTS).check_complete());
}

#[test]
fn new_fixture_without_case_fails_and_names_it() {
    let dir = script_dir(&[
        "empty.test.kts",
        "simple.test.kts",
        "params.test.kts",
        "reflect.test.kts",
    ]);

    let err = assert_err!(suite(dir.path(), &THREE_SCRIPTS).check_complete());

    let Error::Completeness(drift) = err else {
        panic!("expected a completeness error");
    };
    let undeclared: Vec<&Identifier> = drift.undeclared_identifiers().collect();
    assert_eq!(undeclared, [&Identifier::new("reflect_test")]);
    assert!(drift.missing.is_empty());
    assert!(drift.to_string().contains("reflect_test => \"reflect.test.kts\""));
}

#[test]
fn deleted_fixture_fails_and_names_the_stale_case() {
    let dir = script_dir(&["empty.test.kts", "simple.test.kts"]);

    let err = assert_err!(suite(dir.path(), &THREE_SCRIPTS).check_complete());

    let Error::Completeness(drift) = err else {
        panic!("expected a completeness error");
    };
    assert!(drift.undeclared.is_empty());
    assert_eq!(drift.missing, [Identifier::new("params_test")]);
}

#[test]
fn excluded_fixture_needs_no_case() {
    let dir = script_dir(&[
        "empty.test.kts",
        "simple.test.kts",
        "params.test.kts",
        "broken.test.kts",
    ]);

    let result = suite(dir.path(), &THREE_SCRIPTS)
        .exclude("broken_test")
        .check_complete();

    assert_ok!(result);
}

#[test]
fn exclusion_pattern_covers_a_family_of_fixtures() {
    let dir = script_dir(&["empty.test.kts", "wip_one.kts", "wip_two.kts"]);

    let result = suite(dir.path(), &[("empty_test", "empty.test.kts")])
        .exclude_matching("wip_.*")
        .unwrap()
        .check_complete();

    assert_ok!(result);
}

#[test]
fn nested_fixtures_need_nested_cases() {
    let dir = script_dir(&["top.kts", "nested/inner.test.kts"]);

    assert_ok!(
        suite(
            dir.path(),
            &[("top", "top.kts"), ("nested__inner_test", "nested/inner.test.kts")]
        )
        .check_complete()
    );
    assert_ok!(
        suite(dir.path(), &[("top", "top.kts")])
            .recursive(false)
            .check_complete()
    );
}

#[test]
fn skipped_directory_is_not_checked() {
    let dir = script_dir(&["top.kts", "_archive/old.kts"]);

    let result = suite(dir.path(), &[("top", "top.kts")])
        .skip_dir("_archive")
        .check_complete();

    assert_ok!(result);
}

#[test]
fn missing_root_is_a_configuration_error() {
    let dir = tempdir().unwrap();

    let err = assert_err!(suite(&dir.path().join("nope"), &THREE_SCRIPTS).check_complete());
    assert!(matches!(err, Error::Configuration(_)), "got {err:?}");
}

#[test]
fn case_named_after_another_fixture_is_a_configuration_error() {
    let dir = script_dir(&["empty.test.kts", "simple.test.kts"]);

    let err = assert_err!(
        suite(
            dir.path(),
            &[("empty_test", "simple.test.kts"), ("simple_test", "simple.test.kts")]
        )
        .check_complete()
    );
    assert!(matches!(err, Error::Configuration(_)), "got {err:?}");
}

#[test]
fn case_pointing_outside_the_root_is_rejected_before_it_runs() {
    let outer = tempdir().unwrap();
    let root = outer.path().join("root");
    for base in [root.as_path(), outer.path()] {
        fs::create_dir_all(base.join("other")).unwrap();
        fs::write(base.join("other/x.kts"), "// EXPECTED: OK\n").unwrap();
    }
    let suite = suite(&root, &[("other__x", "../other/x.kts")]);

    let err = assert_err!(suite.check_complete());
    assert!(matches!(err, Error::Configuration(_)), "got {err:?}");

    let executed = |_: &DeclaredCase, fixture: &Path| -> fixture_guard::TestOutcome {
        panic!("executor was handed {}", fixture.display())
    };
    let err = assert_err!(suite.run_case("other__x", &executed));
    assert!(matches!(err, Error::Configuration(_)), "got {err:?}");
}

#[test]
fn rescanning_an_unchanged_directory_is_stable() {
    let dir = script_dir(&["b.kts", "a.kts", "sub/c.kts"]);
    let suite = suite(dir.path(), &[]);

    let first = assert_ok!(suite.discover());
    let second = assert_ok!(suite.discover());

    assert_eq!(first, second);
}
