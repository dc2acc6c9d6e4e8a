//! Module defining an executor which delegates every fixture to an external program

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::dispatch::Executor;
use crate::domain::{DeclaredCase, TestOutcome};

/// Name of the environment variable carrying the case's backend tag, if any.
pub const BACKEND_ENV: &str = "FIXTURE_BACKEND";

/// Runs `program [args..] <fixture>` per case. Exit status 0 is a pass; otherwise the captured
/// output is the diagnostic.
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandExecutor {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<OsString>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl Executor for CommandExecutor {
    fn execute(&self, case: &DeclaredCase, fixture: &Path) -> TestOutcome {
        let mut command = Command::new(&self.program);
        command.args(&self.args).arg(fixture);
        if let Some(backend) = case.backend() {
            command.env(BACKEND_ENV, backend.as_str());
        }
        debug!(identifier = %case.identifier(), ?command, "running fixture");

        let output = match command.output() {
            Ok(output) => output,
            Err(e) => {
                return TestOutcome::fail(format!(
                    "failed to run `{}`: {e}",
                    self.program.to_string_lossy()
                ));
            }
        };

        if output.status.success() {
            return TestOutcome::Pass;
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let captured = if stderr.trim().is_empty() {
            stdout.trim()
        } else {
            stderr.trim()
        };
        TestOutcome::fail(format!("{} exited with {}: {captured}", fixture.display(), output.status))
    }
}
