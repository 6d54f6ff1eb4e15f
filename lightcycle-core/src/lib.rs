//! Lightcycle Core - Simulation engine
//!
//! This crate provides the core of the light-cycle elimination game:
//! - Board geometry, trail storage and spawn placement
//! - The decision provider contract and read-only board views
//! - Bounded execution of providers (time budget, fault containment)
//! - Round: per-turn resolution and snapshot history
//! - Reference bots

pub mod board;
pub mod error;
pub mod view;
pub mod agent;
pub mod sandbox;
pub mod referee;
pub mod round;
pub mod bots;

// Re-exports for convenient access
pub use board::{Board, Cell, Direction, Position, DIRECTIONS, board_width, board_height, spawn_positions};
pub use error::{AgentFault, EngineError, InvalidOutput};
pub use view::{BoardView, CellState, FrozenBoard};
pub use agent::{Agent, DecisionProvider, provider_fn};
pub use sandbox::{InlineSandbox, Sandbox, ThreadSandbox};
pub use referee::{Referee, DEFAULT_TIME_BUDGET};
pub use round::{HeadMark, Round, TurnSnapshot, head_glyph};
pub use bots::{BlindBot, StraightBot, TextBot, WanderBot};
