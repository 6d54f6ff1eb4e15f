//! Tournament execution - repeated single-elimination rounds
//!
//! Level 1 - Orchestration and Level 2 - Phases
//!
//! Each round is played by the agents not yet eliminated, on a board sized
//! for that subset, and ends at the first elimination event. The tournament
//! is over once at most one agent is left.

use lightcycle_core::{Agent, EngineError, Referee, Round};
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::config::TournamentConfig;

/// Final placing of one agent
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Standing {
    /// 1-based rank; agents knocked out together share a rank
    pub rank: usize,
    /// Index of the agent in the registration order
    pub index: usize,
    pub name: String,
    pub author: String,
    /// 0-based round in which the agent fell, `None` for the winner
    pub eliminated_in_round: Option<usize>,
}

/// A completed round and the tournament-global identity of its players
#[derive(Debug)]
pub struct RoundRecord {
    participants: Vec<usize>,
    round: Round,
}

impl RoundRecord {
    /// Global indices of the round's agents, in round-local order
    pub fn participants(&self) -> &[usize] {
        &self.participants
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    /// Eliminations of this round as global indices, in elimination order
    pub fn eliminated(&self) -> Vec<usize> {
        self.round
            .eliminated()
            .iter()
            .map(|&local| self.participants[local])
            .collect()
    }
}

/// A full tournament over a fixed, ordered agent list
#[derive(Debug)]
pub struct Tournament {
    agents: Vec<Agent>,
    referee: Referee,
    rounds: Vec<RoundRecord>,
    /// Global indices, in elimination order
    eliminated: Vec<usize>,
}

impl Tournament {
    /// Register agents; their order fixes the agent numbering
    pub fn new(agents: Vec<Agent>, config: &TournamentConfig) -> Result<Self, EngineError> {
        Self::with_referee(agents, config.referee())
    }

    pub fn with_referee(agents: Vec<Agent>, referee: Referee) -> Result<Self, EngineError> {
        if agents.len() < 2 {
            return Err(EngineError::Configuration { agents: agents.len() });
        }
        Ok(Self {
            agents,
            referee,
            rounds: Vec::new(),
            eliminated: Vec::new(),
        })
    }

    /// True once at most one agent remains
    pub fn finished(&self) -> bool {
        self.remaining() <= 1
    }

    /// Number of agents not yet eliminated
    pub fn remaining(&self) -> usize {
        self.agents.len() - self.eliminated.len()
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn rounds(&self) -> &[RoundRecord] {
        &self.rounds
    }

    /// Global indices of eliminated agents, in elimination order
    pub fn eliminated(&self) -> &[usize] {
        &self.eliminated
    }

    // ========================================================================
    // Level 1 - Orchestration
    // ========================================================================

    /// Play rounds until finished and return the leaderboard
    pub fn run(&mut self) -> Result<Vec<Standing>, EngineError> {
        while !self.finished() {
            self.do_round()?;
        }
        let standings = self.leaderboard()?;

        tracing::info!(
            "Tournament finished after {} rounds, winner: {}",
            self.rounds.len(),
            standings
                .first()
                .filter(|s| s.eliminated_in_round.is_none())
                .map_or("none", |s| s.name.as_str())
        );

        Ok(standings)
    }

    // ========================================================================
    // Level 2 - Phases
    // ========================================================================

    /// Play one round among the surviving agents
    pub fn do_round(&mut self) -> Result<&RoundRecord, EngineError> {
        if self.finished() {
            return Err(EngineError::TournamentFinished);
        }

        let participants = self.survivors();
        let roster = participants.iter().map(|&i| self.agents[i].clone()).collect();

        let mut round = Round::new(roster, self.referee.clone())?;
        let turns = round.run()?;

        let record = RoundRecord { participants, round };
        let fallen = record.eliminated();

        tracing::info!(
            "Round {}: {} eliminated after {} turns ({} remaining)",
            self.rounds.len() + 1,
            self.names(&fallen).join(", "),
            turns,
            self.remaining() - fallen.len()
        );

        self.eliminated.extend_from_slice(&fallen);
        self.rounds.push(record);
        Ok(&self.rounds[self.rounds.len() - 1])
    }

    /// Final standings, best first.
    ///
    /// The surviving agent (if any) ranks first. Eliminated agents follow in
    /// reverse round order; agents eliminated in the same round keep their
    /// index order and share a rank.
    pub fn leaderboard(&self) -> Result<Vec<Standing>, EngineError> {
        if !self.finished() {
            return Err(EngineError::TournamentInProgress {
                remaining: self.remaining(),
            });
        }

        let mut standings = Vec::with_capacity(self.agents.len());

        // No winner if everyone crashed together in the last round
        if let Some(winner) = self.survivors().first() {
            standings.push(self.standing(*winner, 1, None));
        }

        for (round_index, record) in self.rounds.iter().enumerate().rev() {
            let rank = standings.len() + 1;
            for index in record.eliminated() {
                standings.push(self.standing(index, rank, Some(round_index)));
            }
        }

        Ok(standings)
    }

    // ========================================================================
    // Level 3 - Steps
    // ========================================================================

    /// Global indices not yet eliminated, in registration order
    fn survivors(&self) -> Vec<usize> {
        let out: FxHashSet<usize> = self.eliminated.iter().copied().collect();
        (0..self.agents.len()).filter(|i| !out.contains(i)).collect()
    }

    fn standing(&self, index: usize, rank: usize, eliminated_in_round: Option<usize>) -> Standing {
        let agent = &self.agents[index];
        Standing {
            rank,
            index,
            name: agent.name().to_string(),
            author: agent.author().to_string(),
            eliminated_in_round,
        }
    }

    fn names(&self, indices: &[usize]) -> Vec<&str> {
        indices.iter().map(|&i| self.agents[i].name()).collect()
    }
}
