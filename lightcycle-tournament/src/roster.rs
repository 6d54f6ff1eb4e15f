//! Roster files - which bots play, and with which settings
//!
//! A roster is a JSON document:
//!
//! ```json
//! {
//!   "settings": { "time_budget_ms": 1000, "sandbox": "thread", "parallel": false },
//!   "agents": [
//!     { "name": "Blind Bot", "author": "TheSilican", "bot": { "kind": "blind" } },
//!     { "name": "Lefty", "author": "anon", "bot": { "kind": "straight", "direction": "W" } },
//!     { "name": "Drifter", "author": "anon", "bot": { "kind": "wander", "seed": 7 } }
//!   ]
//! }
//! ```

use std::path::Path;

use anyhow::Context;
use lightcycle_core::{Agent, BlindBot, Direction, EngineError, StraightBot, WanderBot};
use serde::{Deserialize, Serialize};

use crate::config::TournamentConfig;
use crate::tournament::Tournament;

/// Built-in provider selection
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BotKind {
    Blind,
    Straight { direction: Direction },
    Wander { seed: u64 },
}

impl BotKind {
    fn into_agent(self, name: String, author: String) -> Agent {
        match self {
            BotKind::Blind => Agent::new(name, author, BlindBot),
            BotKind::Straight { direction } => Agent::new(name, author, StraightBot(direction)),
            BotKind::Wander { seed } => Agent::new(name, author, WanderBot::new(seed)),
        }
    }
}

/// One registered bot
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    pub author: String,
    pub bot: BotKind,
}

/// Agents plus tournament settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub settings: TournamentConfig,
    pub agents: Vec<RosterEntry>,
}

impl Roster {
    /// Load from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read roster: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse roster: {}", path.display()))
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Save as pretty-printed JSON
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write roster: {}", path.display()))
    }

    /// Built-in four-bot roster
    pub fn demo() -> Self {
        let entry = |name: &str, bot: BotKind| RosterEntry {
            name: name.to_string(),
            author: "lightcycle".to_string(),
            bot,
        };
        Self {
            settings: TournamentConfig::default(),
            agents: vec![
                entry("Blind Bot", BotKind::Blind),
                entry("Drifter", BotKind::Wander { seed: 7 }),
                entry("Rambler", BotKind::Wander { seed: 1337 }),
                entry("Eastbound", BotKind::Straight { direction: Direction::East }),
            ],
        }
    }

    /// Instantiate the agents in roster order
    pub fn agents(&self) -> Vec<Agent> {
        self.agents
            .iter()
            .cloned()
            .map(|e| e.bot.into_agent(e.name, e.author))
            .collect()
    }

    /// Build a tournament with the roster's own settings
    pub fn tournament(&self) -> Result<Tournament, EngineError> {
        Tournament::new(self.agents(), &self.settings)
    }
}
