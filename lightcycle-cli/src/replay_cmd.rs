//! Replay command - play a tournament, then print one round frame by frame

use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use lightcycle_tournament::Playback;

use crate::RosterArgs;

#[derive(Args)]
pub struct ReplayArgs {
    #[command(flatten)]
    pub roster: RosterArgs,

    /// Round to show (1-based)
    #[arg(long)]
    pub round: usize,

    /// Pause between frames, in milliseconds
    #[arg(long, default_value = "100")]
    pub delay_ms: u64,
}

pub fn run(args: ReplayArgs) -> Result<()> {
    let roster = args.roster.load()?;
    let mut tournament = roster.tournament().context("Invalid roster")?;
    tournament.run()?;

    let played = tournament.rounds().len();
    if args.round == 0 || args.round > played {
        bail!("Round {} out of range (tournament had {} rounds)", args.round, played);
    }

    let mut playback = Playback::new(tournament.rounds());
    playback.seek_round(args.round - 1);
    let delay = Duration::from_millis(args.delay_ms);

    loop {
        if let Some(frame) = playback.frame() {
            println!("Round {} turn {}", args.round, frame.turn);
            println!("{}", frame);
        }
        if playback.at_end() {
            break;
        }
        playback.next_turn();
        thread::sleep(delay);
    }

    Ok(())
}
