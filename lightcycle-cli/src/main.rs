//! Lightcycle CLI - Command-line interface
//!
//! Commands:
//! - run: Play a tournament and print the leaderboard
//! - replay: Play a tournament and print the frames of one round

mod replay_cmd;
mod run_cmd;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use lightcycle_tournament::{Roster, SandboxKind};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lightcycle")]
#[command(about = "Light-cycle elimination tournament runner")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a tournament and print the leaderboard
    Run(run_cmd::RunArgs),
    /// Run a tournament and print every frame of one round
    Replay(replay_cmd::ReplayArgs),
}

/// Roster and settings shared by all commands
#[derive(Args, Clone, Debug)]
pub struct RosterArgs {
    /// Roster JSON file (built-in demo roster if omitted)
    #[arg(long, value_name = "FILE")]
    pub roster: Option<PathBuf>,

    /// Evaluation budget per agent per turn, in milliseconds
    #[arg(long, value_name = "MS")]
    pub budget_ms: Option<u64>,

    /// Evaluate on the simulation thread instead of a worker thread
    #[arg(long)]
    pub inline: bool,

    /// Evaluate the agents of a turn concurrently
    #[arg(long)]
    pub parallel: bool,
}

impl RosterArgs {
    /// Load the roster and apply command-line overrides
    pub fn load(&self) -> Result<Roster> {
        let mut roster = match &self.roster {
            Some(path) => load_roster(path)?,
            None => Roster::demo(),
        };

        if let Some(ms) = self.budget_ms {
            roster.settings.time_budget_ms = ms;
        }
        if self.inline {
            roster.settings.sandbox = SandboxKind::Inline;
        }
        if self.parallel {
            roster.settings.parallel = true;
        }
        Ok(roster)
    }
}

fn load_roster(path: &Path) -> Result<Roster> {
    let roster = Roster::load(path)?;
    tracing::info!("Loaded {} agents from {}", roster.agents.len(), path.display());
    Ok(roster)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run(args) => run_cmd::run(args),
        Commands::Replay(args) => replay_cmd::run(args),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
