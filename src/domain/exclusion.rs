//! Module defining the fixtures which may exist on disk without a declared case

use std::collections::BTreeSet;

use regex::Regex;

use crate::domain::Identifier;
use crate::error::{Error, configuration_error};

/// Exact identifiers and identifier patterns excused from the completeness check.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    identifiers: BTreeSet<Identifier>,
    patterns: Vec<Regex>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, identifier: impl Into<Identifier>) {
        self.identifiers.insert(identifier.into());
    }

    /// Excludes every identifier fully matching `pattern`.
    pub fn insert_pattern(&mut self, pattern: &str) -> Result<(), Error> {
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|e| {
            configuration_error(format!("invalid exclusion pattern `{pattern}`: {e}"))
        })?;
        self.patterns.push(regex);
        Ok(())
    }

    pub fn contains(&self, identifier: &Identifier) -> bool {
        self.identifiers.contains(identifier)
            || self
                .patterns
                .iter()
                .any(|pattern| pattern.is_match(identifier.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty() && self.patterns.is_empty()
    }
}

impl<I: Into<Identifier>> FromIterator<I> for ExclusionSet {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self {
            identifiers: iter.into_iter().map(Into::into).collect(),
            patterns: Vec::new(),
        }
    }
}
