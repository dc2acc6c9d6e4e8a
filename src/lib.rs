mod dispatch;
mod domain;
mod error;
mod macros;
mod manifest;
mod scanner;
mod suite;
mod telemetry;
mod verifier;

pub use dispatch::{
    CaseReport, CommandExecutor, Executor, dispatch, dispatch_parallel, run_case,
};
pub use domain::{
    Backend, DeclaredCase, ExclusionSet, FixturePath, FixtureSet, Identifier, NamePattern,
    TestOutcome,
};
pub use error::{CompletenessError, Error};
pub use manifest::{read_manifest, render_cases, write_manifest};
pub use scanner::{ScanConfig, scan};
pub use suite::{Suite, SuiteReport};
pub use telemetry::{setup_logging, setup_test_logging};
pub use verifier::{validate_declared, verify_complete};

/// Checks a fixture root against a declared case table in one call.
///
/// This is the completeness check in its plainest form: files below `root` whose name fully
/// matches `pattern` must be exactly the `declared` cases, apart from the `excluded` identifiers.
/// Both directions of any drift are reported in the returned [`Error::Completeness`].
///
/// # Example
///
/// ```no_run
/// use fixture_guard::{DeclaredCase, check};
///
/// let declared = [
///     DeclaredCase::new("empty_test", "empty.test.kts"),
///     DeclaredCase::new("simple_test", "simple.test.kts"),
/// ];
/// check("tests/data/testScripts", r"(.+)\.kts", &declared, &["broken_test"]).unwrap();
/// ```
pub fn check(
    root: impl Into<std::path::PathBuf>,
    pattern: &str,
    declared: &[DeclaredCase],
    excluded: &[&str],
) -> Result<(), Error> {
    excluded
        .iter()
        .fold(Suite::new(root, pattern)?, |suite, id| suite.exclude(*id))
        .declare_all(declared.iter().cloned())
        .check_complete()
}
