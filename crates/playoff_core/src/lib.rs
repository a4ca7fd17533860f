//! # playoff_core - Fantasy Playoff Odds Simulator
//!
//! Estimates each team's chance of making the playoffs by finishing the
//! remaining schedule many times over with fair coin flips.
//!
//! ## Features
//! - Injected or seeded randomness (same seed = same odds)
//! - Deterministic seeding: wins, then losses, then team name
//! - Parallel trials with per-chunk random streams
//! - Standings-table adapter and JSON API for front ends

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod simulator;
pub mod standings;

pub use api::{
    run_request, simulate_season_json, QualificationStatus, SeasonRequest, SeasonResponse,
    TeamOdds,
};
pub use config::{SimulatorConfig, CONFIG_PATH_ENV};
pub use error::{Result, SimulationError};
pub use models::{teams_by_name, Matchup, Team};
pub use simulator::{
    rank_standings, simulate, simulate_seeded, PlayoffOdds, SeasonSimulator, SimulationParams,
    DEFAULT_PLAYOFF_TEAMS, DEFAULT_SIMS,
};
pub use standings::{parse_record, teams_from_standings, RecordLine, StandingsRow, TiePolicy};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use serde_json::json;

    #[test]
    fn test_basic_simulation() {
        let request = json!({
            "schema_version": 1,
            "seed": 7,
            "teams": [
                {"name": "A", "wins": 3, "losses": 0},
                {"name": "B", "wins": 2, "losses": 1},
                {"name": "C", "wins": 1, "losses": 2},
                {"name": "D", "wins": 0, "losses": 3}
            ],
            "matchups": [
                {"week": 4, "team1": "A", "team2": "B"},
                {"week": 4, "team1": "C", "team2": "D"}
            ]
        });

        let result = simulate_season_json(&request.to_string());
        assert!(result.is_ok(), "Simulation should succeed");

        let parsed: SeasonResponse = serde_json::from_str(&result.unwrap()).unwrap();
        assert_eq!(parsed.sims, DEFAULT_SIMS);
        assert_eq!(parsed.playoff_teams, DEFAULT_PLAYOFF_TEAMS);
        assert!(parsed.odds.iter().all(|o| o.probability == 1.0));
    }

    #[test]
    fn test_library_entry_point() {
        let teams = teams_by_name(vec![
            Team::new("Alpha", 5, 2),
            Team::new("Bravo", 4, 3),
            Team::new("Charlie", 3, 4),
            Team::new("Delta", 2, 5),
        ])
        .unwrap();
        let schedule = vec![Matchup::new(8, "Alpha", "Bravo"), Matchup::new(8, "Charlie", "Delta")];
        let mut rng = ChaCha8Rng::seed_from_u64(999);

        let odds = simulate(&teams, &schedule, SimulationParams::new(1000, 2), &mut rng).unwrap();

        assert_eq!(odds.len(), 4);
        assert!(odds["Alpha"] > odds["Delta"]);
    }
}
