//! Error types for the simulation engine

use std::time::Duration;

/// Structural errors: bad configuration or caller misuse
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("expected at least 2 agents in the tournament, got {agents}")]
    Configuration { agents: usize },

    #[error("a round needs at least one agent")]
    EmptyRound,

    #[error("cannot do turn when round is finished")]
    RoundFinished,

    #[error("cannot do round when tournament is already finished")]
    TournamentFinished,

    #[error("cannot generate leaderboard while {remaining} agents remain")]
    TournamentInProgress { remaining: usize },
}

/// Failure of one agent on one turn. Always resolves to elimination.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentFault {
    #[error("exceeded {budget:?} evaluation time limit")]
    Timeout { budget: Duration },

    #[error("returned invalid value {0:?} (expected one of \"N\", \"E\", \"S\", \"W\")")]
    InvalidOutput(String),

    #[error("encountered error while evaluating: {0}")]
    Runtime(String),
}

/// Raised by providers whose raw output is not a direction
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid direction {0:?}")]
pub struct InvalidOutput(pub String);
