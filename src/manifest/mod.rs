//! Module for the CSV form of the declared case table: reading it back as declared cases, and
//! generating it (or the equivalent `fixture_suite!` case block) from a scan.

use std::fmt::Write as _;
use std::io::{Read, Write};
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{Backend, DeclaredCase, FixtureSet};
use crate::error::Error;


/// Parses a manifest with the columns `identifier, path, backend`. The backend column may be empty.
pub fn read_manifest(reader: impl Read) -> Result<Vec<DeclaredCase>, Error> {
    let csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .into_deserialize::<ManifestRow>()
        .map(|result| result.map(DeclaredCase::from).map_err(Error::from))
        .collect()
}

/// Writes one manifest row per fixture, in the set's (deterministic) order.
pub fn write_manifest(
    fixtures: &FixtureSet,
    backend: Option<&Backend>,
    writer: impl Write,
) -> Result<(), Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for fixture in fixtures {
        wtr.serialize(ManifestRow {
            identifier: fixture.identifier().to_string(),
            path: portable(fixture.relative()),
            backend: backend.map(ToString::to_string),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Renders the body of a `fixture_suite!` `cases` block for the given fixtures.
pub fn render_cases(fixtures: &FixtureSet) -> String {
    let mut out = String::new();
    for fixture in fixtures {
        // writing into a String cannot fail
        let _ = writeln!(
            out,
            "{} => {:?},",
            fixture.identifier(),
            portable(fixture.relative())
        );
    }
    out
}

// Intermediate type mirroring the CSV columns
#[derive(Debug, Serialize, Deserialize)]
struct ManifestRow {
    identifier: String,
    path: String,
    backend: Option<String>,
}

impl From<ManifestRow> for DeclaredCase {
    fn from(row: ManifestRow) -> Self {
        let case = DeclaredCase::new(row.identifier, PathBuf::from(row.path));
        match row.backend {
            Some(backend) if !backend.is_empty() => case.with_backend(Backend::new(backend)),
            _ => case,
        }
    }
}

/// `/`-separated rendering of a relative path, identical on every platform.
fn portable(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
