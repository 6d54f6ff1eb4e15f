//! Referee - per-turn evaluation harness
//!
//! Wraps a [`Sandbox`] and a time budget, evaluates every live agent
//! against the same frozen pre-turn state and contains agent faults.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rayon::prelude::*;

use crate::agent::Agent;
use crate::board::Direction;
use crate::error::AgentFault;
use crate::sandbox::{Sandbox, ThreadSandbox};
use crate::view::{BoardView, FrozenBoard};

/// Wall-clock ceiling for one evaluation
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_millis(1000);

/// Evaluates agents under a sandbox. Cheap to clone.
#[derive(Clone)]
pub struct Referee {
    sandbox: Arc<dyn Sandbox>,
    budget: Duration,
    parallel: bool,
}

impl Referee {
    pub fn new(sandbox: impl Sandbox + 'static, budget: Duration) -> Self {
        Self {
            sandbox: Arc::new(sandbox),
            budget,
            parallel: false,
        }
    }

    /// Evaluate the agents of one turn concurrently
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Evaluate one agent, reporting the fault if it fails
    pub fn judge(&self, agent: &Agent, view: BoardView) -> Result<Direction, AgentFault> {
        let verdict = self.sandbox.call(agent.provider(), view, self.budget);
        if let Err(ref fault) = verdict {
            tracing::warn!("Agent {} {}", agent.name(), fault);
        }
        verdict
    }

    /// Evaluate every agent against the same frozen state.
    ///
    /// Results are index-aligned with `agents`; `None` marks a fault.
    pub fn evaluate_all(&self, agents: &[Agent], frozen: &Arc<FrozenBoard>) -> Vec<Option<Direction>> {
        let evaluate = |(i, agent): (usize, &Agent)| {
            self.judge(agent, BoardView::share(Arc::clone(frozen), i)).ok()
        };

        if self.parallel {
            agents.par_iter().enumerate().map(evaluate).collect()
        } else {
            agents.iter().enumerate().map(evaluate).collect()
        }
    }
}

impl Default for Referee {
    fn default() -> Self {
        Self::new(ThreadSandbox, DEFAULT_TIME_BUDGET)
    }
}

impl fmt::Debug for Referee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Referee")
            .field("budget", &self.budget)
            .field("parallel", &self.parallel)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::provider_fn;
    use crate::board::{Board, Position};
    use crate::sandbox::InlineSandbox;

    fn frozen() -> Arc<FrozenBoard> {
        Arc::new(FrozenBoard::new(
            Board::new(10, 10),
            vec![Position::new(1, 1), Position::new(8, 8)],
        ))
    }

    fn agents() -> Vec<Agent> {
        vec![
            Agent::new("east", "t", provider_fn(|_| Ok(Direction::East))),
            Agent::new("broken", "t", provider_fn(|_| Err(anyhow::anyhow!("nope")))),
        ]
    }

    #[test]
    fn test_referee_defaults() {
        let referee = Referee::default();
        assert_eq!(referee.budget(), DEFAULT_TIME_BUDGET);
        assert!(!referee.is_parallel());
    }

    #[test]
    fn test_evaluate_all_sequential() {
        let referee = Referee::new(InlineSandbox, DEFAULT_TIME_BUDGET);
        let moves = referee.evaluate_all(&agents(), &frozen());
        assert_eq!(moves, vec![Some(Direction::East), None]);
    }

    #[test]
    fn test_evaluate_all_parallel_keeps_order() {
        let referee = Referee::new(ThreadSandbox, DEFAULT_TIME_BUDGET).with_parallel(true);
        let moves = referee.evaluate_all(&agents(), &frozen());
        assert_eq!(moves, vec![Some(Direction::East), None]);
    }

    #[test]
    fn test_each_agent_sees_own_position() {
        let seen = provider_fn(|view| {
            // Head at (1,1) heads north, head at (8,8) heads south
            if view.self_position() == Position::new(1, 1) {
                Ok(Direction::North)
            } else {
                Ok(Direction::South)
            }
        });
        let shared: Arc<dyn crate::agent::DecisionProvider> = Arc::new(seen);
        let roster = vec![
            Agent::from_shared("a", "t", Arc::clone(&shared)),
            Agent::from_shared("b", "t", shared),
        ];
        let referee = Referee::new(InlineSandbox, DEFAULT_TIME_BUDGET);
        let moves = referee.evaluate_all(&roster, &frozen());
        assert_eq!(moves, vec![Some(Direction::North), Some(Direction::South)]);
    }
}
