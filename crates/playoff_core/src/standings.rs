//! Standings table rows → simulator teams.
//!
//! Provider standings carry a "W-L-T" text cell per team. The simulator's
//! [`Team`] has no tie slot, so ties are folded in by a [`TiePolicy`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Result, SimulationError};
use crate::models::{teams_by_name, Team};

/// One row of a league standings table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub team: String,
    pub wlt: String,
    #[serde(default)]
    pub pct: Option<String>,
    #[serde(default)]
    pub pts_for: Option<String>,
    #[serde(default)]
    pub pts_against: Option<String>,
}

impl StandingsRow {
    pub fn new(team: impl Into<String>, wlt: impl Into<String>) -> Self {
        Self {
            team: team.into(),
            wlt: wlt.into(),
            pct: None,
            pts_for: None,
            pts_against: None,
        }
    }
}

/// Parsed "W-L" or "W-L-T" cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordLine {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

/// How tied games are folded into a two-slot record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiePolicy {
    /// Ties are discarded.
    #[default]
    Drop,
    /// Each tie counts as a loss.
    AsLoss,
    /// Each tie counts as a win.
    AsWin,
}

impl TiePolicy {
    /// Folded (wins, losses); `None` when the sum does not fit in a `u32`.
    pub fn fold(self, line: RecordLine) -> Option<(u32, u32)> {
        match self {
            TiePolicy::Drop => Some((line.wins, line.losses)),
            TiePolicy::AsLoss => Some((line.wins, line.losses.checked_add(line.ties)?)),
            TiePolicy::AsWin => Some((line.wins.checked_add(line.ties)?, line.losses)),
        }
    }
}

/// Parse "W-L" or "W-L-T". An empty cell is a team with no games played.
pub fn parse_record(team: &str, wlt: &str) -> Result<RecordLine> {
    let wlt = wlt.trim();
    if wlt.is_empty() {
        return Ok(RecordLine::default());
    }

    let invalid = |reason: String| SimulationError::InvalidRecord { team: team.to_string(), reason };

    let parts = wlt
        .split('-')
        .map(|part| {
            part.trim()
                .parse::<u32>()
                .map_err(|e| invalid(format!("'{wlt}': {e}")))
        })
        .collect::<Result<Vec<u32>>>()?;

    match parts.as_slice() {
        [wins, losses] => Ok(RecordLine { wins: *wins, losses: *losses, ties: 0 }),
        [wins, losses, ties] => Ok(RecordLine { wins: *wins, losses: *losses, ties: *ties }),
        _ => Err(invalid(format!("'{wlt}' is not W-L or W-L-T"))),
    }
}

pub fn team_from_row(row: &StandingsRow, policy: TiePolicy) -> Result<Team> {
    let name = row.team.trim();
    if name.is_empty() {
        return Err(SimulationError::InvalidRecord {
            team: row.team.clone(),
            reason: "blank team name".to_string(),
        });
    }

    let line = parse_record(name, &row.wlt)?;
    let (wins, losses) = policy.fold(line).ok_or_else(|| SimulationError::InvalidRecord {
        team: name.to_string(),
        reason: format!("'{}' overflows when ties count {:?}", row.wlt.trim(), policy),
    })?;
    if line.ties > 0 {
        log::debug!("{}: folded {} ties with {:?}", name, line.ties, policy);
    }
    Ok(Team::new(name, wins, losses))
}

pub fn teams_from_standings(rows: &[StandingsRow], policy: TiePolicy) -> Result<BTreeMap<String, Team>> {
    let teams = rows
        .iter()
        .map(|row| team_from_row(row, policy))
        .collect::<Result<Vec<_>>>()?;
    teams_by_name(teams)
}
