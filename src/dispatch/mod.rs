//! Module handing the declared cases to the executor and collecting one report per case

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;

use tracing::{info, warn};

use crate::Error;
use crate::domain::{DeclaredCase, Identifier, TestOutcome};

mod command;
mod orchestration;


pub use command::CommandExecutor;
pub use orchestration::{dispatch, dispatch_parallel};

/// The collaborator which actually runs a fixture.
///
/// Implementations must be deterministic; a failing case is never retried. They are shared
/// between worker threads in [`dispatch_parallel`].
pub trait Executor: Sync {
    /// `fixture` is the absolute path of the case's fixture file.
    fn execute(&self, case: &DeclaredCase, fixture: &Path) -> TestOutcome;
}

impl<F> Executor for F
where
    F: Fn(&DeclaredCase, &Path) -> TestOutcome + Sync,
{
    fn execute(&self, case: &DeclaredCase, fixture: &Path) -> TestOutcome {
        self(case, fixture)
    }
}

/// The result of one declared case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseReport {
    pub identifier: Identifier,
    pub outcome: TestOutcome,
}

impl CaseReport {
    pub fn is_pass(&self) -> bool {
        self.outcome.is_pass()
    }

    pub fn into_result(self) -> Result<(), Error> {
        match self.outcome {
            TestOutcome::Pass => Ok(()),
            TestOutcome::Fail(diagnostic) => Err(Error::FixtureExecution {
                identifier: self.identifier,
                diagnostic,
            }),
        }
    }
}

/// Runs a single case. A panicking executor fails this case only.
pub fn run_case(case: &DeclaredCase, root: &Path, executor: &impl Executor) -> CaseReport {
    let fixture = root.join(case.path());
    let outcome = catch_unwind(AssertUnwindSafe(|| executor.execute(case, &fixture)))
        .unwrap_or_else(|payload| TestOutcome::Fail(panic_message(payload.as_ref())));

    match &outcome {
        TestOutcome::Pass => info!(identifier = %case.identifier(), "case passed"),
        TestOutcome::Fail(diagnostic) => {
            warn!(identifier = %case.identifier(), %diagnostic, "case failed")
        }
    }

    CaseReport {
        identifier: case.identifier().clone(),
        outcome,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let message = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload");
    format!("executor panicked: {message}")
}
