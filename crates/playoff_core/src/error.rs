use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("League has no teams")]
    EmptyLeague,

    #[error("Unknown team '{team}' in week {week} matchup")]
    UnknownTeam { week: u32, team: String },

    #[error("Team '{team}' is scheduled against itself in week {week}")]
    SelfMatchup { week: u32, team: String },

    #[error("Simulation count must be at least 1")]
    ZeroSims,

    #[error("Playoff team count must be at least 1")]
    ZeroPlayoffTeams,

    #[error("Duplicate team: {0}")]
    DuplicateTeam(String),

    #[error("Team stored under key '{key}' is named '{name}'")]
    TeamKeyMismatch { key: String, name: String },

    #[error("Invalid record for '{team}': {reason}")]
    InvalidRecord { team: String, reason: String },

    #[error("Unsupported schema version: found {found}, expected {expected}")]
    UnsupportedSchema { found: u8, expected: u8 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl SimulationError {
    /// True for errors caused by the league or parameters handed in,
    /// as opposed to I/O and decoding failures.
    pub fn is_validation(&self) -> bool {
        match self {
            SimulationError::EmptyLeague
            | SimulationError::UnknownTeam { .. }
            | SimulationError::SelfMatchup { .. }
            | SimulationError::ZeroSims
            | SimulationError::ZeroPlayoffTeams
            | SimulationError::DuplicateTeam(_)
            | SimulationError::TeamKeyMismatch { .. }
            | SimulationError::InvalidRecord { .. }
            | SimulationError::UnsupportedSchema { .. } => true,
            SimulationError::Json(_)
            | SimulationError::Yaml(_)
            | SimulationError::Io(_)
            | SimulationError::Config(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
