//! Module tying scanning, the completeness check and dispatching together into one suite run.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::dispatch::{CaseReport, Executor, dispatch, dispatch_parallel, run_case};
use crate::domain::{
    Backend, DeclaredCase, ExclusionSet, FixtureSet, Identifier, NamePattern, TestOutcome,
};
use crate::error::{CompletenessError, Error, configuration_error};
use crate::scanner::{ScanConfig, scan};
use crate::verifier::{validate_declared, verify_complete};

const CHANNEL_CAPACITY: usize = 64;

/// A fixture root, the rule for which files under it are fixtures, and the cases declared for
/// them.
#[derive(Debug, Clone)]
pub struct Suite {
    root: PathBuf,
    config: ScanConfig,
    backend: Option<Backend>,
    cases: Vec<DeclaredCase>,
}

impl Suite {
    /// Fails if `pattern` is not a valid regular expression.
    pub fn new(root: impl Into<PathBuf>, pattern: &str) -> Result<Self, Error> {
        Ok(Self {
            root: root.into(),
            config: ScanConfig::new(NamePattern::new(pattern)?),
            backend: None,
            cases: Vec::new(),
        })
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.config = self.config.recursive(recursive);
        self
    }

    pub fn exclude(mut self, identifier: impl Into<Identifier>) -> Self {
        let mut excluded = self.config.exclusions().clone();
        excluded.insert(identifier);
        self.config = self.config.excluded(excluded);
        self
    }

    pub fn exclude_matching(mut self, pattern: &str) -> Result<Self, Error> {
        let mut excluded = self.config.exclusions().clone();
        excluded.insert_pattern(pattern)?;
        self.config = self.config.excluded(excluded);
        Ok(self)
    }

    pub fn skip_dir(mut self, name: impl Into<String>) -> Self {
        self.config = self.config.skip_dir(name);
        self
    }

    /// Backend attached to every declared case that does not carry its own.
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn declare(mut self, case: DeclaredCase) -> Self {
        self.cases.push(case);
        self
    }

    pub fn declare_all(mut self, cases: impl IntoIterator<Item = DeclaredCase>) -> Self {
        self.cases.extend(cases);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn exclusions(&self) -> &ExclusionSet {
        self.config.exclusions()
    }

    pub fn cases(&self) -> impl Iterator<Item = DeclaredCase> + '_ {
        self.cases.iter().map(|case| match (case.backend(), &self.backend) {
            (None, Some(backend)) => case.clone().with_backend(backend.clone()),
            _ => case.clone(),
        })
    }

    /// Scans the fixture root.
    pub fn discover(&self) -> Result<FixtureSet, Error> {
        scan(&self.root, &self.config)
    }

    /// The completeness check on its own, as one pass/fail result.
    pub fn check_complete(&self) -> Result<(), Error> {
        validate_declared(&self.cases, self.config.pattern())?;
        let discovered = self.discover()?;
        self.compare(&discovered)?;
        Ok(())
    }

    /// Runs the completeness check and every declared case, one after the other.
    ///
    /// Configuration errors abort before any case runs. Drift and failing cases are captured in the
    /// report instead, so one run surfaces all of them.
    pub fn run(&self, executor: &impl Executor) -> Result<SuiteReport, Error> {
        let completeness = self.prepare()?;
        let cases: Vec<DeclaredCase> = self.cases().collect();
        let reports = dispatch(&cases, &self.root, executor);
        Ok(SuiteReport::new(completeness, reports))
    }

    /// Same as [`Suite::run`], but the cases are spread over `num_workers` threads.
    pub fn run_parallel(
        &self,
        executor: &impl Executor,
        num_workers: usize,
    ) -> Result<SuiteReport, Error> {
        let completeness = self.prepare()?;
        let cases: Vec<DeclaredCase> = self.cases().collect();
        let reports = dispatch_parallel(&cases, &self.root, executor, num_workers, CHANNEL_CAPACITY);
        Ok(SuiteReport::new(completeness, reports))
    }

    /// Runs the single declared case named `identifier`.
    ///
    /// The declared table is validated first, so a case never runs a fixture other than the one its
    /// name derives from.
    pub fn run_case(&self, identifier: &str, executor: &impl Executor) -> Result<(), Error> {
        validate_declared(&self.cases, self.config.pattern())?;
        if !self.root.is_dir() {
            return Err(configuration_error(format!(
                "fixture root `{}` does not exist or is not a directory",
                self.root.display()
            )));
        }
        let case = self
            .cases()
            .find(|case| case.identifier().as_str() == identifier)
            .ok_or_else(|| configuration_error(format!("no case `{identifier}` is declared")))?;
        run_case(&case, &self.root, executor).into_result()
    }

    fn prepare(&self) -> Result<Result<(), CompletenessError>, Error> {
        validate_declared(&self.cases, self.config.pattern())?;
        let discovered = self.discover()?;
        info!(
            root = %self.root.display(),
            fixtures = discovered.len(),
            cases = self.cases.len(),
            "running fixture suite"
        );
        Ok(self.compare(&discovered))
    }

    fn compare(&self, discovered: &FixtureSet) -> Result<(), CompletenessError> {
        verify_complete(
            self.cases.iter().map(DeclaredCase::identifier),
            discovered,
            self.config.exclusions(),
        )
    }
}

/// One result for the completeness check plus one per declared case.
#[derive(Debug)]
pub struct SuiteReport {
    pub completeness: Result<(), CompletenessError>,
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    fn new(completeness: Result<(), CompletenessError>, cases: Vec<CaseReport>) -> Self {
        let report = Self {
            completeness,
            cases,
        };
        if !report.is_success() {
            warn!(failures = report.failure_count(), "fixture suite failed");
        }
        report
    }

    pub fn is_success(&self) -> bool {
        self.completeness.is_ok() && self.cases.iter().all(CaseReport::is_pass)
    }

    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|case| case.is_pass()).count()
    }

    fn failure_count(&self) -> usize {
        usize::from(self.completeness.is_err()) + self.cases.len() - self.passed()
    }

    /// Every failed result as its own error: the completeness check first, then the cases in
    /// declared order.
    pub fn failures(&self) -> Vec<Error> {
        let completeness = self.completeness.clone().err().map(Error::from);
        let cases = self
            .cases
            .iter()
            .cloned()
            .filter_map(|case| case.into_result().err());
        completeness.into_iter().chain(cases).collect()
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.completeness {
            Ok(()) => writeln!(f, "all fixtures present ... ok")?,
            Err(e) => writeln!(f, "all fixtures present ... FAILED\n{e}")?,
        }
        for case in &self.cases {
            match &case.outcome {
                TestOutcome::Pass => writeln!(f, "{} ... ok", case.identifier)?,
                TestOutcome::Fail(diagnostic) => {
                    writeln!(f, "{} ... FAILED: {diagnostic}", case.identifier)?
                }
            }
        }
        write!(
            f,
            "result: {}. {} passed; {} failed",
            if self.is_success() { "ok" } else { "FAILED" },
            self.passed() + usize::from(self.completeness.is_ok()),
            self.failure_count()
        )
    }
}
