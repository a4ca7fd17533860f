//! Season Simulator
//!
//! Monte Carlo completion of a partially played fantasy season:
//! - every remaining matchup is a fair coin flip between its two teams
//! - final records are ranked by wins desc, losses asc, then team name asc
//! - the top `playoff_teams` of each trial are credited with a qualification
//!
//! A probability is the number of trials a team qualified in divided by the
//! trial count. Randomness is always supplied by the caller, either as an
//! `Rng` handle or as a seed for the parallel runner.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::config::SimulatorConfig;
use crate::error::{Result, SimulationError};
use crate::models::{Matchup, Team};

/// Team name → qualification probability in `[0.0, 1.0]`.
pub type PlayoffOdds = BTreeMap<String, f64>;

pub const DEFAULT_SIMS: u32 = 1000;
pub const DEFAULT_PLAYOFF_TEAMS: usize = 4;

/// Trials per parallel work unit. Fixed so the parallel result depends on
/// the seed only, never on the size of the thread pool.
const TRIALS_PER_CHUNK: u32 = 1024;

/// Working (wins, losses) pair for one team during one trial.
pub type WorkingRecord = (u32, u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationParams {
    pub sims: u32,
    pub playoff_teams: usize,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self { sims: DEFAULT_SIMS, playoff_teams: DEFAULT_PLAYOFF_TEAMS }
    }
}

impl SimulationParams {
    pub fn new(sims: u32, playoff_teams: usize) -> Self {
        Self { sims, playoff_teams }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sims == 0 {
            return Err(SimulationError::ZeroSims);
        }
        if self.playoff_teams == 0 {
            return Err(SimulationError::ZeroPlayoffTeams);
        }
        Ok(())
    }
}

/// Validated league ready for repeated trials.
///
/// Team names are held in lexical order and matchups are resolved to
/// indices into that order, so a trial never touches a string.
#[derive(Debug, Clone)]
pub struct SeasonSimulator {
    names: Vec<String>,
    initial: Vec<WorkingRecord>,
    games: Vec<(usize, usize)>,
}

/// Per-worker buffers reused across trials.
struct TrialScratch {
    records: Vec<WorkingRecord>,
    order: Vec<usize>,
}

impl TrialScratch {
    fn new(team_count: usize) -> Self {
        Self {
            records: Vec::with_capacity(team_count),
            order: Vec::with_capacity(team_count),
        }
    }
}

impl SeasonSimulator {
    /// Validate the league and resolve every matchup.
    ///
    /// Fails on an empty league, a key that does not match its team's name,
    /// a matchup naming an unknown team, a team scheduled against itself, or
    /// a record that could overflow once every remaining game is played.
    pub fn new(teams: &BTreeMap<String, Team>, matchups: &[Matchup]) -> Result<Self> {
        if teams.is_empty() {
            return Err(SimulationError::EmptyLeague);
        }

        let mut names = Vec::with_capacity(teams.len());
        let mut initial = Vec::with_capacity(teams.len());
        for (key, team) in teams {
            if key != &team.name {
                return Err(SimulationError::TeamKeyMismatch {
                    key: key.clone(),
                    name: team.name.clone(),
                });
            }
            names.push(team.name.clone());
            initial.push((team.wins, team.losses));
        }

        let index: HashMap<&str, usize> =
            names.iter().enumerate().map(|(i, name)| (name.as_str(), i)).collect();
        let lookup = |week: u32, name: &str| {
            index.get(name).copied().ok_or_else(|| SimulationError::UnknownTeam {
                week,
                team: name.to_string(),
            })
        };

        let mut games = Vec::with_capacity(matchups.len());
        for matchup in matchups {
            let team1 = lookup(matchup.week, &matchup.team1)?;
            let team2 = lookup(matchup.week, &matchup.team2)?;
            if team1 == team2 {
                return Err(SimulationError::SelfMatchup {
                    week: matchup.week,
                    team: matchup.team1.clone(),
                });
            }
            games.push((team1, team2));
        }

        let mut remaining = vec![0u32; names.len()];
        for &(team1, team2) in &games {
            remaining[team1] = remaining[team1].saturating_add(1);
            remaining[team2] = remaining[team2].saturating_add(1);
        }
        for ((name, &(wins, losses)), &left) in names.iter().zip(&initial).zip(&remaining) {
            if wins.checked_add(left).is_none() || losses.checked_add(left).is_none() {
                return Err(SimulationError::InvalidRecord {
                    team: name.clone(),
                    reason: format!("{wins}-{losses} with {left} games left exceeds the record limit"),
                });
            }
        }

        Ok(Self { names, initial, games })
    }

    pub fn team_count(&self) -> usize {
        self.names.len()
    }

    pub fn matchup_count(&self) -> usize {
        self.games.len()
    }

    /// Team names in ranking tie-break order.
    pub fn team_names(&self) -> &[String] {
        &self.names
    }

    /// Run `params.sims` sequential trials drawing from `rng`.
    pub fn run<R: Rng + ?Sized>(&self, params: SimulationParams, rng: &mut R) -> Result<PlayoffOdds> {
        params.validate()?;
        log::debug!(
            "Simulating {} trials: {} teams, {} matchups, {} playoff slots",
            params.sims,
            self.team_count(),
            self.matchup_count(),
            params.playoff_teams
        );

        let mut counts = vec![0u32; self.team_count()];
        let mut scratch = TrialScratch::new(self.team_count());
        for _ in 0..params.sims {
            self.run_trial(params.playoff_teams, rng, &mut scratch, &mut counts);
        }

        Ok(self.odds(&counts, params.sims))
    }

    /// Run trials across the rayon pool.
    ///
    /// Trials are cut into fixed-size chunks; chunk `i` draws from a
    /// `ChaCha8Rng` seeded with `seed` on stream `i`. Same seed, same odds.
    pub fn run_parallel(&self, params: SimulationParams, seed: u64) -> Result<PlayoffOdds> {
        params.validate()?;
        let team_count = self.team_count();
        let chunks = params.sims.div_ceil(TRIALS_PER_CHUNK);
        log::debug!(
            "Simulating {} trials in {} chunks (seed {}): {} teams, {} matchups",
            params.sims,
            chunks,
            seed,
            team_count,
            self.matchup_count()
        );

        let counts = (0..chunks)
            .into_par_iter()
            .map(|chunk| {
                let start = chunk * TRIALS_PER_CHUNK;
                let trials = TRIALS_PER_CHUNK.min(params.sims - start);

                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                rng.set_stream(u64::from(chunk));

                let mut counts = vec![0u32; team_count];
                let mut scratch = TrialScratch::new(team_count);
                for _ in 0..trials {
                    self.run_trial(params.playoff_teams, &mut rng, &mut scratch, &mut counts);
                }
                log::trace!("chunk {} finished {} trials", chunk, trials);
                counts
            })
            .reduce(
                || vec![0u32; team_count],
                |mut total, part| {
                    for (t, p) in total.iter_mut().zip(part) {
                        *t += p;
                    }
                    total
                },
            );

        Ok(self.odds(&counts, params.sims))
    }

    /// One trial: resolve every matchup, rank, credit the qualifiers.
    fn run_trial<R: Rng + ?Sized>(
        &self,
        playoff_teams: usize,
        rng: &mut R,
        scratch: &mut TrialScratch,
        counts: &mut [u32],
    ) {
        scratch.records.clear();
        scratch.records.extend_from_slice(&self.initial);

        for &(team1, team2) in &self.games {
            let (winner, loser) = if rng.gen_bool(0.5) { (team1, team2) } else { (team2, team1) };
            scratch.records[winner].0 += 1;
            scratch.records[loser].1 += 1;
        }

        rank_into(&scratch.records, &mut scratch.order);
        for &team in scratch.order.iter().take(playoff_teams) {
            counts[team] += 1;
        }
    }

    fn odds(&self, counts: &[u32], sims: u32) -> PlayoffOdds {
        let sims = f64::from(sims);
        self.names
            .iter()
            .zip(counts)
            .map(|(name, &count)| (name.clone(), f64::from(count) / sims))
            .collect()
    }
}

/// Seeding order: more wins first, then fewer losses, then lower index.
///
/// Indices follow team-name order inside [`SeasonSimulator`], so the last
/// key is an alphabetical tie-break.
fn compare_records(records: &[WorkingRecord], a: usize, b: usize) -> Ordering {
    let (wins_a, losses_a) = records[a];
    let (wins_b, losses_b) = records[b];
    wins_b
        .cmp(&wins_a)
        .then(losses_a.cmp(&losses_b))
        .then(a.cmp(&b))
}

fn rank_into(records: &[WorkingRecord], order: &mut Vec<usize>) {
    order.clear();
    order.extend(0..records.len());
    order.sort_unstable_by(|&a, &b| compare_records(records, a, b));
}

/// Rank working records, best first. Returns indices into `records`.
pub fn rank_standings(records: &[WorkingRecord]) -> Vec<usize> {
    let mut order = Vec::with_capacity(records.len());
    rank_into(records, &mut order);
    order
}

/// Simulate the rest of the season with an injected random source.
pub fn simulate<R: Rng + ?Sized>(
    teams: &BTreeMap<String, Team>,
    matchups: &[Matchup],
    params: SimulationParams,
    rng: &mut R,
) -> Result<PlayoffOdds> {
    params.validate()?;
    SeasonSimulator::new(teams, matchups)?.run(params, rng)
}

/// Simulate using the seed and execution mode in `config`.
///
/// Without a seed one is drawn from OS entropy. The seed actually used is
/// returned with the odds so any run can be repeated.
pub fn simulate_seeded(
    teams: &BTreeMap<String, Team>,
    matchups: &[Matchup],
    config: &SimulatorConfig,
) -> Result<(PlayoffOdds, u64)> {
    let params = config.params();
    params.validate()?;
    let simulator = SeasonSimulator::new(teams, matchups)?;
    let seed = config.seed.unwrap_or_else(rand::random);

    let odds = if config.parallel {
        simulator.run_parallel(params, seed)?
    } else {
        simulator.run(params, &mut ChaCha8Rng::seed_from_u64(seed))?
    };
    Ok((odds, seed))
}
