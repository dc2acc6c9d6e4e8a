//! Module discovering the fixture files below a root directory.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::{ExclusionSet, FixturePath, FixtureSet, Identifier, NamePattern};
use crate::error::{Error, configuration_error};


/// Which files below the root count as fixtures.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pattern: NamePattern,
    recursive: bool,
    excluded: ExclusionSet,
    skipped_dirs: BTreeSet<String>,
}

impl ScanConfig {
    /// Recursive scan for files whose whole name matches `pattern`.
    pub fn new(pattern: NamePattern) -> Self {
        Self {
            pattern,
            recursive: true,
            excluded: ExclusionSet::default(),
            skipped_dirs: BTreeSet::new(),
        }
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn excluded(mut self, excluded: ExclusionSet) -> Self {
        self.excluded = excluded;
        self
    }

    /// Sub-directories with this name are not entered.
    pub fn skip_dir(mut self, name: impl Into<String>) -> Self {
        self.skipped_dirs.insert(name.into());
        self
    }

    pub fn pattern(&self) -> &NamePattern {
        &self.pattern
    }

    pub fn exclusions(&self) -> &ExclusionSet {
        &self.excluded
    }
}

/// Collects the fixtures below `root`.
///
/// Fails if `root` is not a readable directory. The result does not depend on the order in which
/// the filesystem returns directory entries.
pub fn scan(root: &Path, config: &ScanConfig) -> Result<FixtureSet, Error> {
    if !root.is_dir() {
        return Err(configuration_error(format!(
            "fixture root `{}` does not exist or is not a directory",
            root.display()
        )));
    }

    let mut fixtures = FixtureSet::new();
    visit(root, Path::new(""), config, &mut fixtures, &mut Vec::new())?;

    debug!(
        root = %root.display(),
        fixtures = fixtures.len(),
        "scanned fixture root"
    );
    Ok(fixtures)
}

fn visit(
    root: &Path,
    relative_dir: &Path,
    config: &ScanConfig,
    fixtures: &mut FixtureSet,
    ancestors: &mut Vec<PathBuf>,
) -> Result<(), Error> {
    let dir = root.join(relative_dir);
    // symlinked directories are followed, so the canonical path detects cycles
    let canonical = fs::canonicalize(&dir)
        .map_err(|e| configuration_error(format!("cannot read `{}`: {e}", dir.display())))?;
    if ancestors.contains(&canonical) {
        return Err(configuration_error(format!(
            "`{}` links back to its ancestor `{}`",
            dir.display(),
            canonical.display()
        )));
    }
    ancestors.push(canonical);

    for (name, path) in read_dir_sorted(&dir)? {
        let relative = relative_dir.join(&name);

        if path.is_dir() {
            if config.recursive && !config.skipped_dirs.contains(&name) {
                visit(root, &relative, config, fixtures, ancestors)?;
            }
            continue;
        }

        if !path.is_file() || !config.pattern.is_match(&name) {
            continue;
        }
        let Some(identifier) = Identifier::from_relative_path(&relative, &config.pattern) else {
            continue;
        };
        if config.excluded.contains(&identifier) {
            debug!(%identifier, "fixture excluded");
            continue;
        }

        debug!(%identifier, path = %relative.display(), "found fixture");
        fixtures.insert(FixturePath::new(root, relative, identifier))?;
    }

    ancestors.pop();
    Ok(())
}

fn read_dir_sorted(dir: &Path) -> Result<Vec<(String, PathBuf)>, Error> {
    let unreadable =
        |e: std::io::Error| configuration_error(format!("cannot read `{}`: {e}", dir.display()));

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        // names which are not valid UTF-8 can never match a name pattern
        if let Ok(name) = entry.file_name().into_string() {
            entries.push((name, entry.path()));
        }
    }
    entries.sort();
    Ok(entries)
}
