//! Simulator configuration loaded from JSON or YAML.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::{env, fs};

use crate::error::{Result, SimulationError};
use crate::simulator::{SimulationParams, DEFAULT_PLAYOFF_TEAMS, DEFAULT_SIMS};

pub const CONFIG_PATH_ENV: &str = "PLAYOFF_SIM_CONFIG_PATH";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Number of trials
    pub sims: u32,
    /// Qualifying teams per trial
    pub playoff_teams: usize,
    /// Fixed seed for reproducible runs; entropy when absent
    pub seed: Option<u64>,
    /// Spread trials over the rayon pool
    pub parallel: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            sims: DEFAULT_SIMS,
            playoff_teams: DEFAULT_PLAYOFF_TEAMS,
            seed: None,
            parallel: false,
        }
    }
}

impl SimulatorConfig {
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load from a file; `.yaml`/`.yml` are read as YAML, anything else as JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = if is_yaml(path) { Self::from_yaml(&content)? } else { Self::from_json(&content)? };
        config.validate()?;
        Ok(config)
    }

    /// Load from the file named by `PLAYOFF_SIM_CONFIG_PATH`, or defaults
    /// when the variable is unset or blank.
    pub fn from_env() -> Result<Self> {
        let Ok(path) = env::var(CONFIG_PATH_ENV) else {
            return Ok(Self::default());
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }

        Self::load(Path::new(path)).map_err(|e| {
            SimulationError::Config(format!("Failed to load config from {CONFIG_PATH_ENV}='{path}': {e}"))
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.params().validate()
    }

    pub fn params(&self) -> SimulationParams {
        SimulationParams::new(self.sims, self.playoff_teams)
    }
}

pub(crate) fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase).as_deref(),
        Some("yaml") | Some("yml")
    )
}
