//! Module defining the fixtures discovered on disk

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::domain::Identifier;
use crate::error::{Error, configuration_error};

/// One fixture file found by a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixturePath {
    identifier: Identifier,
    relative: PathBuf,
    absolute: PathBuf,
}

impl FixturePath {
    pub fn new(root: &Path, relative: impl Into<PathBuf>, identifier: Identifier) -> Self {
        let relative = relative.into();
        Self {
            identifier,
            absolute: root.join(&relative),
            relative,
        }
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// Path relative to the scan root
    pub fn relative(&self) -> &Path {
        &self.relative
    }

    pub fn absolute(&self) -> &Path {
        &self.absolute
    }

    pub fn base_name(&self) -> Option<&str> {
        self.relative.file_name().and_then(|name| name.to_str())
    }

    pub fn extension(&self) -> Option<&str> {
        self.relative.extension().and_then(|ext| ext.to_str())
    }
}

/// The fixtures found by one scan, unique by identifier and ordered by it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureSet {
    fixtures: BTreeMap<Identifier, FixturePath>,
}

impl FixtureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fixture. Two different files normalizing to the same identifier make the set
    /// ambiguous, which is reported as a configuration error.
    pub fn insert(&mut self, fixture: FixturePath) -> Result<(), Error> {
        if let Some(existing) = self.fixtures.get(fixture.identifier()) {
            if existing.relative() == fixture.relative() {
                return Ok(());
            }
            return Err(configuration_error(format!(
                "fixtures `{}` and `{}` both map to identifier `{}`",
                existing.relative().display(),
                fixture.relative().display(),
                fixture.identifier()
            )));
        }
        self.fixtures.insert(fixture.identifier().clone(), fixture);
        Ok(())
    }

    pub fn try_from_iter(fixtures: impl IntoIterator<Item = FixturePath>) -> Result<Self, Error> {
        let mut set = Self::new();
        for fixture in fixtures {
            set.insert(fixture)?;
        }
        Ok(set)
    }

    pub fn get(&self, identifier: &Identifier) -> Option<&FixturePath> {
        self.fixtures.get(identifier)
    }

    pub fn contains(&self, identifier: &Identifier) -> bool {
        self.fixtures.contains_key(identifier)
    }

    pub fn identifiers(&self) -> BTreeSet<&Identifier> {
        self.fixtures.keys().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FixturePath> {
        self.fixtures.values()
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }
}

impl<'a> IntoIterator for &'a FixtureSet {
    type Item = &'a FixturePath;
    type IntoIter = std::collections::btree_map::Values<'a, Identifier, FixturePath>;

    fn into_iter(self) -> Self::IntoIter {
        self.fixtures.values()
    }
}
