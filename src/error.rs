//! Module defining the errors which are exposed to the users of the crate

use std::fmt;
use std::path::PathBuf;

use crate::domain::Identifier;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The suite cannot run at all, e.g., a missing fixture root or an inconsistent case table
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The fixtures on disk and the declared cases diverge
    #[error(transparent)]
    Completeness(#[from] CompletenessError),

    /// A single declared case failed when handed to the executor
    #[error("fixture `{identifier}` failed: {diagnostic}")]
    FixtureExecution {
        identifier: Identifier,
        diagnostic: String,
    },

    /// Invalid manifest CSV
    #[error("manifest error: {0}")]
    Manifest(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub(crate) fn configuration_error(message: impl Into<String>) -> Error {
    Error::Configuration(message.into())
}

/// Both directions of drift between the fixtures on disk and the declared cases.
///
/// Either list may be empty, but never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletenessError {
    /// Fixtures found on disk without a declared case, with their root-relative paths
    pub undeclared: Vec<(Identifier, PathBuf)>,
    /// Declared cases without a fixture on disk, or whose fixture is excluded
    pub missing: Vec<Identifier>,
}

impl CompletenessError {
    pub fn undeclared_identifiers(&self) -> impl Iterator<Item = &Identifier> {
        self.undeclared.iter().map(|(id, _)| id)
    }
}

impl fmt::Display for CompletenessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "declared cases are out of sync with the fixtures on disk ({} undeclared, {} missing)",
            self.undeclared.len(),
            self.missing.len()
        )?;
        write!(f, "\n  present but not declared (add a case):")?;
        if self.undeclared.is_empty() {
            write!(f, " none")?;
        }
        for (id, path) in &self.undeclared {
            write!(f, "\n    {id} => \"{}\"", path.display())?;
        }
        write!(f, "\n  declared but absent (delete the case):")?;
        if self.missing.is_empty() {
            write!(f, " none")?;
        }
        for id in &self.missing {
            write!(f, "\n    {id}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CompletenessError {}
