use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::config::{is_yaml, SimulatorConfig};
use crate::error::{Result, SimulationError};
use crate::models::{teams_by_name, Matchup, Team};
use crate::simulator::simulate_seeded;
use crate::standings::{team_from_row, StandingsRow, TiePolicy};
use crate::SCHEMA_VERSION;

fn default_schema_version() -> u8 {
    SCHEMA_VERSION
}

/// League snapshot plus optional run overrides.
///
/// Teams may be listed directly, as standings rows, or both; every name
/// must be unique across the two lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonRequest {
    #[serde(default = "default_schema_version")]
    pub schema_version: u8,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub standings: Vec<StandingsRow>,
    #[serde(default)]
    pub tie_policy: TiePolicy,
    #[serde(default)]
    pub matchups: Vec<Matchup>,
    #[serde(default)]
    pub sims: Option<u32>,
    #[serde(default)]
    pub playoff_teams: Option<usize>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub parallel: Option<bool>,
}

impl SeasonRequest {
    pub fn new(teams: Vec<Team>, matchups: Vec<Matchup>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            teams,
            standings: Vec::new(),
            tie_policy: TiePolicy::default(),
            matchups,
            sims: None,
            playoff_teams: None,
            seed: None,
            parallel: None,
        }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Read a league file; `.yaml`/`.yml` as YAML, anything else as JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        if is_yaml(path) {
            Self::from_yaml(&content)
        } else {
            Self::from_json(&content)
        }
    }

    fn check_schema(&self) -> Result<()> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(SimulationError::UnsupportedSchema {
                found: self.schema_version,
                expected: SCHEMA_VERSION,
            });
        }
        Ok(())
    }

    /// Name-keyed teams from both `teams` and `standings`.
    pub fn league(&self) -> Result<BTreeMap<String, Team>> {
        let from_rows = self
            .standings
            .iter()
            .map(|row| team_from_row(row, self.tie_policy))
            .collect::<Result<Vec<_>>>()?;
        teams_by_name(self.teams.iter().cloned().chain(from_rows))
    }

    /// Overlay this request's run fields on `base`.
    pub fn resolve(&self, base: &SimulatorConfig) -> SimulatorConfig {
        SimulatorConfig {
            sims: self.sims.unwrap_or(base.sims),
            playoff_teams: self.playoff_teams.unwrap_or(base.playoff_teams),
            seed: self.seed.or(base.seed),
            parallel: self.parallel.unwrap_or(base.parallel),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualificationStatus {
    /// Qualified in every trial
    Clinched,
    /// Qualified in no trial
    Eliminated,
    Contending,
}

impl QualificationStatus {
    pub fn from_probability(probability: f64) -> Self {
        if probability >= 1.0 {
            QualificationStatus::Clinched
        } else if probability <= 0.0 {
            QualificationStatus::Eliminated
        } else {
            QualificationStatus::Contending
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualificationStatus::Clinched => "clinched",
            QualificationStatus::Eliminated => "eliminated",
            QualificationStatus::Contending => "contending",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamOdds {
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    /// Unplayed games involving this team
    pub remaining: usize,
    pub probability: f64,
    pub status: QualificationStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonResponse {
    pub schema_version: u8,
    pub sims: u32,
    pub playoff_teams: usize,
    /// Seed the run used, drawn from entropy when the request had none
    pub seed: u64,
    pub parallel: bool,
    /// RFC3339
    pub generated_at: String,
    /// Most likely qualifier first
    pub odds: Vec<TeamOdds>,
}

impl SeasonResponse {
    pub fn probability(&self, name: &str) -> Option<f64> {
        self.odds.iter().find(|o| o.name == name).map(|o| o.probability)
    }
}

/// Validate `request`, run it over `base`, and collect the report.
pub fn run_request(request: &SeasonRequest, base: &SimulatorConfig) -> Result<SeasonResponse> {
    request.check_schema()?;
    let teams = request.league()?;
    let config = request.resolve(base);
    config.validate()?;

    let (probabilities, seed) = simulate_seeded(&teams, &request.matchups, &config)?;

    let mut odds: Vec<TeamOdds> = teams
        .values()
        .map(|team| {
            let probability = probabilities.get(&team.name).copied().unwrap_or(0.0);
            TeamOdds {
                name: team.name.clone(),
                wins: team.wins,
                losses: team.losses,
                remaining: request.matchups.iter().filter(|m| m.involves(&team.name)).count(),
                probability,
                status: QualificationStatus::from_probability(probability),
            }
        })
        .collect();
    odds.sort_by(|a, b| {
        b.probability
            .total_cmp(&a.probability)
            .then(b.wins.cmp(&a.wins))
            .then(a.name.cmp(&b.name))
    });

    Ok(SeasonResponse {
        schema_version: SCHEMA_VERSION,
        sims: config.sims,
        playoff_teams: config.playoff_teams,
        seed,
        parallel: config.parallel,
        generated_at: chrono::Utc::now().to_rfc3339(),
        odds,
    })
}

/// JSON in, JSON out, with default simulator settings under the request.
pub fn simulate_season_json(request_json: &str) -> Result<String> {
    let request = SeasonRequest::from_json(request_json)?;
    let response = run_request(&request, &SimulatorConfig::default())?;
    Ok(serde_json::to_string(&response)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn four_team_request() -> serde_json::Value {
        json!({
            "schema_version": 1,
            "seed": 42,
            "sims": 2000,
            "playoff_teams": 2,
            "teams": [
                {"name": "Alpha", "wins": 5, "losses": 2},
                {"name": "Bravo", "wins": 4, "losses": 3},
                {"name": "Charlie", "wins": 3, "losses": 4},
                {"name": "Delta", "wins": 2, "losses": 5}
            ],
            "matchups": [
                {"week": 8, "team1": "Alpha", "team2": "Bravo"},
                {"week": 8, "team1": "Charlie", "team2": "Delta"}
            ]
        })
    }

    #[test]
    fn test_json_round_trip_shape() {
        let out = simulate_season_json(&four_team_request().to_string()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(parsed["schema_version"], 1);
        assert_eq!(parsed["sims"], 2000);
        assert_eq!(parsed["playoff_teams"], 2);
        assert_eq!(parsed["seed"], 42);
        assert_eq!(parsed["odds"].as_array().unwrap().len(), 4);
        assert_eq!(parsed["odds"][0]["remaining"], 1);
    }

    #[test]
    fn test_same_seed_same_json_odds() {
        let request = four_team_request().to_string();
        let first: SeasonResponse = serde_json::from_str(&simulate_season_json(&request).unwrap()).unwrap();
        let second: SeasonResponse = serde_json::from_str(&simulate_season_json(&request).unwrap()).unwrap();

        assert_eq!(first.odds, second.odds);
    }

    #[test]
    fn test_unseeded_parallel_report_can_be_replayed() {
        let mut request = SeasonRequest::from_json(&four_team_request().to_string()).unwrap();
        request.seed = None;
        request.parallel = Some(true);
        let first = run_request(&request, &SimulatorConfig::default()).unwrap();

        request.seed = Some(first.seed);
        let replay = run_request(&request, &SimulatorConfig::default()).unwrap();

        assert_eq!(replay.seed, first.seed);
        assert_eq!(replay.odds, first.odds);
    }

    #[test]
    fn test_odds_sorted_and_labelled() {
        let request = SeasonRequest::from_json(&four_team_request().to_string()).unwrap();
        let response = run_request(&request, &SimulatorConfig::default()).unwrap();

        assert!(response.odds.windows(2).all(|w| w[0].probability >= w[1].probability));
        assert_eq!(response.odds[0].name, "Alpha");
        assert_eq!(response.odds[0].status, QualificationStatus::Clinched);
        let delta = response.odds.iter().find(|o| o.name == "Delta").unwrap();
        assert_eq!(delta.status, QualificationStatus::Eliminated);
        assert!(response.probability("Alpha").unwrap() > response.probability("Delta").unwrap());
    }

    #[test]
    fn test_standings_rows_merge_with_teams() {
        let request = SeasonRequest::from_json(
            &json!({
                "teams": [{"name": "A", "wins": 1, "losses": 1}],
                "standings": [{"team": "B", "wlt": "1-0-1"}],
                "tie_policy": "as_loss",
                "matchups": [{"week": 3, "team1": "A", "team2": "B"}]
            })
            .to_string(),
        )
        .unwrap();

        let league = request.league().unwrap();
        assert_eq!(league["B"], Team::new("B", 1, 1));
        assert_eq!(request.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn test_request_overrides_base_config() {
        let mut request = SeasonRequest::new(vec![Team::unplayed("A")], Vec::new());
        request.sims = Some(10);
        let base = SimulatorConfig { sims: 500, playoff_teams: 3, seed: Some(1), parallel: true };

        let resolved = request.resolve(&base);
        assert_eq!(resolved.sims, 10);
        assert_eq!(resolved.playoff_teams, 3);
        assert_eq!(resolved.seed, Some(1));
        assert!(resolved.parallel);
    }

    #[test]
    fn test_unknown_team_in_request() {
        let mut request = four_team_request();
        request["matchups"][1]["team2"] = json!("Echo");

        let err = simulate_season_json(&request.to_string()).unwrap_err();
        assert!(matches!(err, SimulationError::UnknownTeam { ref team, .. } if team == "Echo"));
    }

    #[test]
    fn test_zero_sims_in_request() {
        let mut request = four_team_request();
        request["sims"] = json!(0);

        let err = simulate_season_json(&request.to_string()).unwrap_err();
        assert!(matches!(err, SimulationError::ZeroSims));
    }

    #[test]
    fn test_schema_mismatch_rejected() {
        let mut request = four_team_request();
        request["schema_version"] = json!(2);

        let err = simulate_season_json(&request.to_string()).unwrap_err();
        assert!(matches!(err, SimulationError::UnsupportedSchema { found: 2, expected: 1 }));
    }

    #[test]
    fn test_malformed_json_is_not_validation() {
        let err = simulate_season_json("{not json").unwrap_err();
        assert!(!err.is_validation());
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(QualificationStatus::from_probability(1.0), QualificationStatus::Clinched);
        assert_eq!(QualificationStatus::from_probability(0.0), QualificationStatus::Eliminated);
        assert_eq!(QualificationStatus::from_probability(0.37), QualificationStatus::Contending);
        assert_eq!(QualificationStatus::Contending.as_str(), "contending");
    }
}
