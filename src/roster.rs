//! Reading rosters from the participant files the events are registered in.
//!
//! Both formats use the same fields: `serial_number`, `participant1_name`,
//! `participant2_name` (missing, null or blank for solo entrants) and `team_name`.

use std::{fs::File, io::Read, path::Path};

use anyhow::{Context, bail};
use log::debug;

use crate::entrant::{Entrant, Roster};

/// Loads a `.json` or `.csv` roster.
///
/// # Errors
///
/// If the file can't be read, has another extension, or holds an invalid
/// roster.
pub fn load(path: &Path) -> anyhow::Result<Roster> {
    let file =
        File::open(path).with_context(|| format!("roster: failed to open {}", path.display()))?;

    let roster = match path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("json") => from_json(file),
        Some("csv") => from_csv(file),
        _ => bail!(
            "roster: {} is neither a .json nor a .csv file",
            path.display()
        ),
    }
    .with_context(|| format!("roster: failed to load {}", path.display()))?;

    debug!("roster: {} entrants in {}", roster.len(), path.display());
    Ok(roster)
}

/// # Errors
///
/// If the JSON isn't an array of entrants, or the serial numbers are invalid.
pub fn from_json<R: Read>(reader: R) -> anyhow::Result<Roster> {
    Ok(serde_json::from_reader(reader)?)
}

/// # Errors
///
/// If a record doesn't parse, or the serial numbers are invalid.
pub fn from_csv<R: Read>(reader: R) -> anyhow::Result<Roster> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut entrants = Vec::new();
    for (line, record) in reader.deserialize::<Entrant>().enumerate() {
        entrants.push(record.with_context(|| format!("roster: bad record {}", line + 1))?);
    }

    Ok(Roster::new(entrants)?)
}
