//! Playoff Odds CLI
//!
//! League file (JSON/YAML) → Monte Carlo playoff odds table or JSON report

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "playoff_cli")]
#[command(about = "Estimate fantasy playoff odds by simulating the rest of the season", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct RunArgs {
    /// Number of simulated seasons
    #[arg(long)]
    sims: Option<u32>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Spread trials over all cores (`--parallel=false` forces a sequential run)
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    parallel: Option<bool>,

    /// Print the JSON report instead of a table
    #[arg(long, default_value = "false")]
    json: bool,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Simulate a league file
    Simulate {
        /// League file path (.json, .yaml or .yml)
        #[arg(long)]
        league: PathBuf,

        /// Simulator config file (falls back to PLAYOFF_SIM_CONFIG_PATH)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Teams that make the playoffs
        #[arg(long)]
        playoff_teams: Option<usize>,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Simulate the built-in four-team sample league (two playoff spots)
    Demo {
        #[command(flatten)]
        run: RunArgs,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    match cli.command {
        Commands::Simulate { league, config, playoff_teams, run } => {
            let request = playoff_cli::load_league(&league)?;
            let config = playoff_cli::load_config(config.as_deref())?;
            let overrides = overrides(&run, playoff_teams);

            let response = playoff_cli::run(request, &config, overrides)?;
            print_report(&response, run.json)?;
        }

        Commands::Demo { run } => {
            let overrides = overrides(&run, Some(2));

            let response = playoff_cli::run(playoff_cli::demo_request(), &Default::default(), overrides)?;
            print_report(&response, run.json)?;
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn overrides(run: &RunArgs, playoff_teams: Option<usize>) -> playoff_cli::RunOverrides {
    playoff_cli::RunOverrides {
        sims: run.sims,
        playoff_teams,
        seed: run.seed,
        parallel: run.parallel,
    }
}

#[cfg(feature = "cli")]
fn print_report(response: &playoff_core::SeasonResponse, json: bool) -> Result<()> {
    if json {
        println!("{}", playoff_cli::render_json(response)?);
    } else {
        print!("{}", playoff_cli::render_table(response));
    }
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("playoff_cli is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
