//! Module checking that the declared cases and the fixtures on disk describe the same set.

use std::collections::BTreeSet;
use std::path::Component;

use tracing::{debug, warn};

use crate::domain::{DeclaredCase, ExclusionSet, FixtureSet, Identifier, NamePattern};
use crate::error::{CompletenessError, Error, configuration_error};


/// Succeeds iff the discovered identifiers minus the excluded ones equal `declared` exactly.
///
/// On failure the error lists both directions of the drift.
pub fn verify_complete<'a>(
    declared: impl IntoIterator<Item = &'a Identifier>,
    discovered: &FixtureSet,
    excluded: &ExclusionSet,
) -> Result<(), CompletenessError> {
    let declared: BTreeSet<&Identifier> = declared.into_iter().collect();

    let undeclared: Vec<_> = discovered
        .iter()
        .filter(|fixture| !excluded.contains(fixture.identifier()))
        .filter(|fixture| !declared.contains(fixture.identifier()))
        .map(|fixture| (fixture.identifier().clone(), fixture.relative().to_path_buf()))
        .collect();

    let missing: Vec<Identifier> = declared
        .iter()
        .filter(|id| !discovered.contains(id) || excluded.contains(id))
        .map(|id| (*id).clone())
        .collect();

    if undeclared.is_empty() && missing.is_empty() {
        debug!(cases = declared.len(), "declared cases match the fixtures");
        return Ok(());
    }

    warn!(
        undeclared = undeclared.len(),
        missing = missing.len(),
        "declared cases are out of sync with the fixtures"
    );
    Err(CompletenessError {
        undeclared,
        missing,
    })
}

/// Checks that the declared table is consistent in itself before it is compared to the disk.
///
/// Every identifier has to be unique and has to be the one derived from the case's own path,
/// otherwise a case could silently run a different fixture than its name suggests. Paths have to
/// stay below the fixture root, so `..` and absolute paths are rejected.
pub fn validate_declared(cases: &[DeclaredCase], pattern: &NamePattern) -> Result<(), Error> {
    let mut seen = BTreeSet::new();
    for case in cases {
        if !seen.insert(case.identifier()) {
            return Err(configuration_error(format!(
                "case `{}` is declared more than once",
                case.identifier()
            )));
        }

        let leaves_root = case
            .path()
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if leaves_root {
            return Err(configuration_error(format!(
                "case `{}` points to `{}`, which is not relative to the fixture root",
                case.identifier(),
                case.path().display()
            )));
        }

        let derived = Identifier::from_relative_path(case.path(), pattern).ok_or_else(|| {
            configuration_error(format!(
                "case `{}` points to `{}`, which does not match the name pattern `{}`",
                case.identifier(),
                case.path().display(),
                pattern.as_str()
            ))
        })?;
        if &derived != case.identifier() {
            return Err(configuration_error(format!(
                "case `{}` points to `{}`, whose identifier is `{derived}`",
                case.identifier(),
                case.path().display()
            )));
        }
    }
    Ok(())
}
