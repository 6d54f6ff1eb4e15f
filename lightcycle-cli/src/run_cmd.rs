//! Run command - play a full tournament and report the leaderboard
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_tournament(), report_results(), export_rounds()
//! - Level 3: progress bar handling
//! - Level 4: formatting utilities

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use lightcycle_core::TurnSnapshot;
use lightcycle_tournament::{Standing, Tournament};
use serde::Serialize;

use crate::RosterArgs;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub roster: RosterArgs,

    /// Output the leaderboard as JSON
    #[arg(long)]
    pub json: bool,

    /// Write every round's frames to a JSON file
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run the tournament command
///
/// 1. Load the roster
/// 2. Play rounds until at most one agent is left
/// 3. Report the leaderboard and optionally export the rounds
pub fn run(args: RunArgs) -> Result<()> {
    let roster = args.roster.load()?;
    let mut tournament = roster.tournament().context("Invalid roster")?;

    tracing::info!(
        "Starting tournament: {} agents (budget={}ms, sandbox={:?}, parallel={})",
        tournament.agents().len(),
        roster.settings.time_budget_ms,
        roster.settings.sandbox,
        roster.settings.parallel
    );

    let standings = play_tournament(&mut tournament)?;

    report_results(&standings, args.json)?;

    if let Some(path) = &args.export {
        export_rounds(&tournament, path)?;
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play every round, advancing a progress bar per elimination
fn play_tournament(tournament: &mut Tournament) -> Result<Vec<Standing>> {
    let pb = progress_bar(tournament.agents().len())?;

    while !tournament.finished() {
        let record = tournament.do_round()?;
        let turns = record.round().turn();
        pb.set_message(format!("round {} ({} turns)", tournament.rounds().len(), turns));
        pb.set_position(tournament.eliminated().len() as u64);
    }
    pb.finish_and_clear();

    Ok(tournament.leaderboard()?)
}

fn report_results(standings: &[Standing], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(standings)?);
    } else {
        print_text_leaderboard(standings);
    }
    Ok(())
}

/// Dump each round's participants and frames
fn export_rounds(tournament: &Tournament, path: &Path) -> Result<()> {
    #[derive(Serialize)]
    struct ExportRound<'a> {
        round: usize,
        participants: Vec<&'a str>,
        frames: &'a [TurnSnapshot],
    }

    let rounds: Vec<ExportRound> = tournament
        .rounds()
        .iter()
        .enumerate()
        .map(|(i, record)| ExportRound {
            round: i + 1,
            participants: record
                .participants()
                .iter()
                .map(|&g| tournament.agents()[g].name())
                .collect(),
            frames: record.round().frames(),
        })
        .collect();

    let json = serde_json::to_string(&rounds)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write export: {}", path.display()))?;

    tracing::info!("Exported {} rounds to {}", rounds.len(), path.display());
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn progress_bar(agents: usize) -> Result<ProgressBar> {
    let pb = ProgressBar::new(agents.saturating_sub(1) as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40}] {pos}/{len} eliminated {msg}")?
            .progress_chars("=> "),
    );
    Ok(pb)
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn print_text_leaderboard(standings: &[Standing]) {
    println!("\n=== Leaderboard ===");
    for s in standings {
        let fate = match s.eliminated_in_round {
            Some(round) => format!("out in round {}", round + 1),
            None => "winner".to_string(),
        };
        println!("{:>3}. {:<24} {:<16} {}", s.rank, s.name, s.author, fate);
    }
}
