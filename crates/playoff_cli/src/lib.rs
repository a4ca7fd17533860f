//! Playoff Odds CLI support
//!
//! League file loading, run overrides and report rendering for the
//! `playoff_cli` binary.

use anyhow::{Context, Result};
use playoff_core::{run_request, Matchup, SeasonRequest, SeasonResponse, SimulatorConfig, Team};
use std::fmt::Write as _;
use std::path::Path;

/// Command-line values that win over both the config and the league file.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOverrides {
    pub sims: Option<u32>,
    pub playoff_teams: Option<usize>,
    pub seed: Option<u64>,
    pub parallel: Option<bool>,
}

impl RunOverrides {
    pub fn apply(&self, request: &mut SeasonRequest) {
        if let Some(sims) = self.sims {
            request.sims = Some(sims);
        }
        if let Some(playoff_teams) = self.playoff_teams {
            request.playoff_teams = Some(playoff_teams);
        }
        if let Some(seed) = self.seed {
            request.seed = Some(seed);
        }
        if let Some(parallel) = self.parallel {
            request.parallel = Some(parallel);
        }
    }
}

/// Four-team sample league, two games left in week 8.
pub fn demo_request() -> SeasonRequest {
    SeasonRequest::new(
        vec![
            Team::new("Alpha", 5, 2),
            Team::new("Bravo", 4, 3),
            Team::new("Charlie", 3, 4),
            Team::new("Delta", 2, 5),
        ],
        vec![Matchup::new(8, "Alpha", "Bravo"), Matchup::new(8, "Charlie", "Delta")],
    )
}

pub fn load_league(path: &Path) -> Result<SeasonRequest> {
    SeasonRequest::load(path).with_context(|| format!("Failed to load league file: {}", path.display()))
}

/// Explicit config file if given, otherwise `PLAYOFF_SIM_CONFIG_PATH`, otherwise defaults.
pub fn load_config(path: Option<&Path>) -> Result<SimulatorConfig> {
    match path {
        Some(path) => SimulatorConfig::load(path)
            .with_context(|| format!("Failed to load config file: {}", path.display())),
        None => Ok(SimulatorConfig::from_env()?),
    }
}

pub fn run(mut request: SeasonRequest, config: &SimulatorConfig, overrides: RunOverrides) -> Result<SeasonResponse> {
    overrides.apply(&mut request);
    log::info!(
        "Simulating {} teams, {} remaining matchups",
        request.teams.len() + request.standings.len(),
        request.matchups.len()
    );
    let response = run_request(&request, config).context("Simulation failed")?;
    log::debug!("Finished {} trials", response.sims);
    Ok(response)
}

/// Plain-text table, most likely qualifier first.
pub fn render_table(response: &SeasonResponse) -> String {
    let width = response
        .odds
        .iter()
        .map(|o| o.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Team".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Playoff odds: {} trials, {} playoff spots",
        response.sims, response.playoff_teams
    );
    let _ = writeln!(out, "{:<width$}  {:>7}  {:>4}  {:>6}  Status", "Team", "Record", "Left", "Odds");
    for odds in &response.odds {
        let _ = writeln!(
            out,
            "{:<width$}  {:>7}  {:>4}  {:>5.1}%  {}",
            odds.name,
            format!("{}-{}", odds.wins, odds.losses),
            odds.remaining,
            odds.probability * 100.0,
            odds.status.as_str()
        );
    }
    out
}

pub fn render_json(response: &SeasonResponse) -> Result<String> {
    Ok(serde_json::to_string_pretty(response)?)
}
