//! Bulk registration import from CSV (`name,faction,checked_in`; the last two optional).

use crate::models::{Tournament, TournamentError};
use serde::Deserialize;
use std::io;

#[derive(Debug, Deserialize)]
struct RegistrationRecord {
    name: String,
    #[serde(default)]
    faction: Option<String>,
    #[serde(default)]
    checked_in: Option<String>,
}

impl RegistrationRecord {
    fn is_checked_in(&self) -> bool {
        matches!(
            self.checked_in
                .as_deref()
                .map(|v| v.trim().to_ascii_lowercase())
                .as_deref(),
            Some("true" | "yes" | "y" | "1" | "x")
        )
    }
}

/// Add every row of `reader` as a registration. All-or-nothing: on the first bad row
/// (malformed CSV, empty or duplicate name) nothing is added and the line is reported.
/// Returns the number of registrations added.
pub fn import_registrations<R: io::Read>(
    tournament: &mut Tournament,
    reader: R,
) -> Result<usize, TournamentError> {
    let mut staged = tournament.clone();
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    for (idx, row) in csv_reader.deserialize::<RegistrationRecord>().enumerate() {
        // Header is line 1.
        let line = idx as u64 + 2;
        let record = row.map_err(|e| TournamentError::Import {
            line: e.position().map_or(line, |p| p.line()),
            message: e.to_string(),
        })?;
        let checked_in = record.is_checked_in();
        let id = staged
            .add_registration(record.name, record.faction)
            .map_err(|e| TournamentError::Import {
                line,
                message: e.to_string(),
            })?;
        if checked_in {
            staged.set_checked_in(id, true)?;
        }
    }

    let added = staged.registrations.len() - tournament.registrations.len();
    *tournament = staged;
    log::info!(
        "Imported {} registrations into tournament {}",
        added,
        tournament.id
    );
    Ok(added)
}
