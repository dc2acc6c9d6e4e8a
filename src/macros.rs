/// Registers a declared case table with the test harness.
///
/// Expands to one `#[test]` per declared case, named after the case, plus the
/// `all_fixtures_present` test which fails as soon as the table and the fixture root drift apart.
/// Case names must be the identifiers derived from their paths; `fixture-guard cases <root>
/// <pattern>` prints a ready-made table.
///
/// The executor has to be a path to a function (or a `static`) implementing [`Executor`].
///
/// The macro also defines a private `declared_suite()` function in the calling module. Neither
/// `declared_suite` nor `all_fixtures_present` can be used as a case name; exclude or rename such
/// fixtures.
///
/// [`Executor`]: crate::Executor
///
/// # Example
///
/// ```ignore
/// fn execute_script(case: &DeclaredCase, fixture: &Path) -> TestOutcome {
///     /* ... */
/// }
///
/// fixture_guard::fixture_suite! {
///     root: concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/testScripts"),
///     pattern: r"(.+)\.kts",
///     excluded: ["broken_test"],
///     backend: "JVM_IR",
///     executor: execute_script,
///     cases: {
///         empty_test => "empty.test.kts",
///         simple_test => "simple.test.kts",
///     }
/// }
/// ```
#[macro_export]
macro_rules! fixture_suite {
    (
        root: $root:expr,
        pattern: $pattern:expr,
        $(recursive: $recursive:expr,)?
        $(excluded: [$($excluded:expr),* $(,)?],)?
        $(backend: $backend:expr,)?
        executor: $executor:expr,
        cases: { $($name:ident => $path:expr),* $(,)? } $(,)?
    ) => {
        fn declared_suite() -> $crate::Suite {
            $crate::setup_test_logging();
            let suite = $crate::Suite::new($root, $pattern).unwrap_or_else(|e| panic!("{e}"));
            $(let suite = suite.recursive($recursive);)?
            $($(let suite = suite.exclude($excluded);)*)?
            $(let suite = suite.backend($crate::Backend::new($backend));)?
            suite$(.declare($crate::DeclaredCase::new(stringify!($name), $path)))*
        }

        #[test]
        fn all_fixtures_present() {
            if let Err(e) = declared_suite().check_complete() {
                panic!("{e}");
            }
        }

        $(
            #[test]
            #[allow(non_snake_case)]
            fn $name() {
                if let Err(e) = declared_suite().run_case(stringify!($name), &$executor) {
                    panic!("{e}");
                }
            }
        )*
    };
}
