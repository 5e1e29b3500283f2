//! Team roster import from CSV (`name,skill_level,checked_in`; header row required).

use crate::models::{Team, TournamentError};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct TeamRow {
    name: String,
    #[serde(default)]
    skill_level: Option<String>,
    #[serde(default)]
    checked_in: Option<bool>,
}

/// Parse a roster. Blank skill levels mean the open division; missing `checked_in` means true.
pub fn import_teams_csv<R: Read>(reader: R) -> Result<Vec<Team>, TournamentError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut teams = Vec::new();
    for (i, row) in rdr.deserialize::<TeamRow>().enumerate() {
        // Line 1 is the header.
        let line = i + 2;
        let row = row.map_err(|e| TournamentError::InvalidInput(format!("line {}: {}", line, e)))?;
        if row.name.is_empty() {
            return Err(TournamentError::InvalidInput(format!(
                "line {}: team name is empty",
                line
            )));
        }
        let mut team = Team::new(row.name);
        team.skill_level = row.skill_level.filter(|s| !s.is_empty());
        team.checked_in = row.checked_in.unwrap_or(true);
        teams.push(team);
    }
    log::info!("Imported {} team(s) from CSV", teams.len());
    Ok(teams)
}
