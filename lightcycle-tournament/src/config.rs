//! Configuration types for tournament play
//!
//! Level 4 - Utilities and configuration

use std::time::Duration;

use lightcycle_core::{InlineSandbox, Referee, ThreadSandbox};
use serde::{Deserialize, Serialize};

/// How provider calls are bounded
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SandboxKind {
    /// Worker thread with a hard deadline
    #[default]
    Thread,
    /// Caller's thread, overruns detected after the call returns
    Inline,
}

/// Tournament configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    /// Wall-clock budget per evaluation in milliseconds
    pub time_budget_ms: u64,
    /// Execution context for provider calls
    pub sandbox: SandboxKind,
    /// Evaluate the agents of a turn concurrently
    pub parallel: bool,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            time_budget_ms: 1000,
            sandbox: SandboxKind::Thread,
            parallel: false,
        }
    }
}

impl TournamentConfig {
    /// Set the per-evaluation budget
    pub fn with_budget_ms(mut self, ms: u64) -> Self {
        self.time_budget_ms = ms;
        self
    }

    /// Set the sandbox kind
    pub fn with_sandbox(mut self, sandbox: SandboxKind) -> Self {
        self.sandbox = sandbox;
        self
    }

    /// Enable or disable concurrent evaluation
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }

    /// Build the referee shared by every round
    pub fn referee(&self) -> Referee {
        let referee = match self.sandbox {
            SandboxKind::Thread => Referee::new(ThreadSandbox, self.time_budget()),
            SandboxKind::Inline => Referee::new(InlineSandbox, self.time_budget()),
        };
        referee.with_parallel(self.parallel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tournament_config_defaults() {
        let config = TournamentConfig::default();
        assert_eq!(config.time_budget_ms, 1000);
        assert_eq!(config.sandbox, SandboxKind::Thread);
        assert!(!config.parallel);
        assert_eq!(config.time_budget(), Duration::from_secs(1));
    }

    #[test]
    fn test_builders() {
        let config = TournamentConfig::default()
            .with_budget_ms(50)
            .with_sandbox(SandboxKind::Inline)
            .with_parallel(true);
        assert_eq!(config.time_budget_ms, 50);
        assert_eq!(config.sandbox, SandboxKind::Inline);

        let referee = config.referee();
        assert_eq!(referee.budget(), Duration::from_millis(50));
        assert!(referee.is_parallel());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TournamentConfig = serde_json::from_str(r#"{"sandbox": "inline"}"#).unwrap();
        assert_eq!(config.sandbox, SandboxKind::Inline);
        assert_eq!(config.time_budget_ms, 1000);
        assert!(!config.parallel);
    }
}
