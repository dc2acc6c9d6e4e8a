//! Module defining the statically declared test cases

use std::path::{Path, PathBuf};

use crate::domain::{Backend, Identifier};

/// A declared pairing of a fixture to a test body.
///
/// Declared cases are authored (or generated) ahead of time; their identifiers are the "expected"
/// side of the completeness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredCase {
    identifier: Identifier,
    path: PathBuf,
    backend: Option<Backend>,
}

impl DeclaredCase {
    /// `path` is relative to the suite's fixture root.
    pub fn new(identifier: impl Into<Identifier>, path: impl Into<PathBuf>) -> Self {
        Self {
            identifier: identifier.into(),
            path: path.into(),
            backend: None,
        }
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backend(&self) -> Option<&Backend> {
        self.backend.as_ref()
    }
}
