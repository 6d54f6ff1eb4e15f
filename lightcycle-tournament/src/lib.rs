//! Lightcycle Tournament - Multi-round elimination bracket
//!
//! This crate provides tournament infrastructure:
//! - Tournament configuration and roster files
//! - Repeated single-elimination rounds among surviving agents
//! - Leaderboard derivation
//! - A playback cursor over recorded rounds
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: Tournament::run (orchestration)
//! - Level 2: Tournament::do_round, Tournament::leaderboard (phases)
//! - Level 3: Round::do_turn (steps, in lightcycle-core)
//! - Level 4: configuration, rosters, playback

mod config;
mod playback;
mod roster;
mod tournament;

pub use config::{SandboxKind, TournamentConfig};
pub use playback::Playback;
pub use roster::{BotKind, Roster, RosterEntry};
pub use tournament::{RoundRecord, Standing, Tournament};
