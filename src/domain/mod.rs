//! Module for the types describing fixtures, declared cases and their outcomes.

use std::fmt;
use std::path::{Component, Path};

use regex::Regex;

use crate::error::{Error, configuration_error};

mod case;
mod exclusion;
mod fixture;


pub use case::DeclaredCase;
pub use exclusion::ExclusionSet;
pub use fixture::{FixturePath, FixtureSet};

/// Separator placed between the normalized directory components and the file stem.
const DIR_SEPARATOR: &str = "__";

/// Stable, human-readable name of a fixture.
///
/// Derived deterministically from the fixture's file name, so that regenerating a case table for an
/// unchanged directory produces the same identifiers. Derived identifiers are always valid Rust
/// identifiers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derives the identifier of a fixture from its path relative to the scan root.
    ///
    /// Returns `None` if the file name does not match `pattern`.
    pub fn from_relative_path(relative: &Path, pattern: &NamePattern) -> Option<Self> {
        let file_name = relative.file_name()?.to_str()?;
        let stem = pattern.stem(file_name)?;

        let mut parts: Vec<String> = relative
            .parent()
            .into_iter()
            .flat_map(|parent| parent.components())
            .filter_map(|c| match c {
                Component::Normal(dir) => Some(normalize(&dir.to_string_lossy())),
                _ => None,
            })
            .collect();
        parts.push(normalize(stem));

        Some(Self(parts.join(DIR_SEPARATOR)))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Maps an arbitrary name fragment onto `[A-Za-z0-9_]`, never starting with a digit.
fn normalize(fragment: &str) -> String {
    let mut normalized: String = fragment
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if normalized.is_empty() || normalized.starts_with(|c: char| c.is_ascii_digit()) {
        normalized.insert(0, '_');
    }
    normalized
}

/// A regular expression which has to match a fixture's whole file name.
///
/// When the expression has a capture group, its first group is the stem the identifier is derived
/// from, e.g. `(.+)\.kts` turns `simple.test.kts` into `simple.test`. Without a group the last
/// extension is stripped.
#[derive(Debug, Clone)]
pub struct NamePattern {
    source: String,
    regex: Regex,
}

impl NamePattern {
    pub fn new(pattern: &str) -> Result<Self, Error> {
        let regex = Regex::new(&format!("^(?:{pattern})$"))
            .map_err(|e| configuration_error(format!("invalid name pattern `{pattern}`: {e}")))?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as written by the user, without the anchors.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, file_name: &str) -> bool {
        self.regex.is_match(file_name)
    }

    fn stem<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        let captures = self.regex.captures(file_name)?;
        if let Some(group) = captures.get(1) {
            return Some(group.as_str());
        }
        Some(match file_name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => file_name,
        })
    }
}

/// Opaque tag naming the backend a case is executed on, e.g. `JVM_IR`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Backend(String);

impl Backend {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Terminal state of a single executed case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    Pass,
    /// The diagnostic is produced by the executor and passed through untouched
    Fail(String),
}

impl TestOutcome {
    pub fn fail(diagnostic: impl Into<String>) -> Self {
        Self::Fail(diagnostic.into())
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

impl<E: fmt::Display> From<Result<(), E>> for TestOutcome {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::Pass,
            Err(e) => Self::Fail(e.to_string()),
        }
    }
}
