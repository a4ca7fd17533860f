//! League data shapes consumed by the simulator.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Result, SimulationError};

/// A fantasy team and its record from games already played.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
}

impl Team {
    pub fn new(name: impl Into<String>, wins: u32, losses: u32) -> Self {
        Self { name: name.into(), wins, losses }
    }

    /// Team with no games played.
    pub fn unplayed(name: impl Into<String>) -> Self {
        Self::new(name, 0, 0)
    }

    pub fn games_played(&self) -> Result<u32> {
        self.wins.checked_add(self.losses).ok_or_else(|| SimulationError::InvalidRecord {
            team: self.name.clone(),
            reason: format!("{} games played exceeds the record limit", self.record()),
        })
    }

    /// "W-L" display form.
    pub fn record(&self) -> String {
        format!("{}-{}", self.wins, self.losses)
    }
}

/// An unplayed game. `week` is carried for display only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Matchup {
    #[serde(default)]
    pub week: u32,
    pub team1: String,
    pub team2: String,
}

impl Matchup {
    pub fn new(week: u32, team1: impl Into<String>, team2: impl Into<String>) -> Self {
        Self { week, team1: team1.into(), team2: team2.into() }
    }

    pub fn involves(&self, name: &str) -> bool {
        self.team1 == name || self.team2 == name
    }
}

/// Build the name-keyed team mapping, rejecting duplicate names.
pub fn teams_by_name<I>(teams: I) -> Result<BTreeMap<String, Team>>
where
    I: IntoIterator<Item = Team>,
{
    let mut map = BTreeMap::new();
    for team in teams {
        if map.contains_key(&team.name) {
            return Err(SimulationError::DuplicateTeam(team.name));
        }
        map.insert(team.name.clone(), team);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_defaults_to_unplayed() {
        let team: Team = serde_json::from_str(r#"{"name": "Alpha"}"#).unwrap();
        assert_eq!(team, Team::unplayed("Alpha"));
        assert_eq!(team.games_played().unwrap(), 0);
    }

    #[test]
    fn test_games_played_overflow() {
        assert_eq!(Team::new("A", 6, 4).games_played().unwrap(), 10);

        let err = Team::new("Max", u32::MAX, 1).games_played().unwrap_err();
        assert!(matches!(err, SimulationError::InvalidRecord { ref team, .. } if team == "Max"));
    }

    #[test]
    fn test_record_display() {
        assert_eq!(Team::new("Bravo", 4, 3).record(), "4-3");
    }

    #[test]
    fn test_teams_by_name_rejects_duplicates() {
        let result = teams_by_name(vec![Team::new("A", 1, 0), Team::new("A", 0, 1)]);
        assert!(matches!(result, Err(SimulationError::DuplicateTeam(name)) if name == "A"));
    }

    #[test]
    fn test_teams_by_name_keys_match_names() {
        let map = teams_by_name(vec![Team::unplayed("B"), Team::unplayed("A")]).unwrap();
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["A", "B"]);
        assert!(map.iter().all(|(k, t)| k == &t.name));
    }

    #[test]
    fn test_matchup_involves() {
        let m = Matchup::new(4, "A", "B");
        assert!(m.involves("A"));
        assert!(m.involves("B"));
        assert!(!m.involves("C"));
    }
}
