//! Reference decision providers
//!
//! Simple, deterministic bots used for demos, rosters and tests.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::agent::DecisionProvider;
use crate::board::{Direction, DIRECTIONS};
use crate::view::BoardView;

/// Takes the first free neighbour in N, E, S, W order; N if boxed in
#[derive(Clone, Copy, Debug, Default)]
pub struct BlindBot;

impl DecisionProvider for BlindBot {
    fn decide(&self, view: &BoardView) -> anyhow::Result<Direction> {
        Ok(DIRECTIONS
            .into_iter()
            .find(|&d| view.look(d).is_free())
            .unwrap_or(Direction::North))
    }
}

/// Always drives the same way
#[derive(Clone, Copy, Debug)]
pub struct StraightBot(pub Direction);

impl DecisionProvider for StraightBot {
    fn decide(&self, _view: &BoardView) -> anyhow::Result<Direction> {
        Ok(self.0)
    }
}

/// Picks uniformly among free neighbours.
///
/// The RNG is reseeded from `seed` and the bot's own position on every
/// call, so the choice depends only on what the bot can see.
#[derive(Clone, Copy, Debug)]
pub struct WanderBot {
    pub seed: u64,
}

impl WanderBot {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl DecisionProvider for WanderBot {
    fn decide(&self, view: &BoardView) -> anyhow::Result<Direction> {
        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        view.self_position().hash(&mut hasher);
        let mut rng = ChaCha8Rng::seed_from_u64(hasher.finish());

        let free: Vec<Direction> = DIRECTIONS
            .into_iter()
            .filter(|&d| view.look(d).is_free())
            .collect();
        Ok(free.choose(&mut rng).copied().unwrap_or(Direction::North))
    }
}

/// Adapts a provider that answers in text (`"N"`, `"E"`, `"S"`, `"W"`).
///
/// Any other text is reported as invalid output.
pub struct TextBot<F> {
    answer: F,
}

impl<F> TextBot<F>
where
    F: Fn(&BoardView) -> anyhow::Result<String> + Send + Sync,
{
    pub fn new(answer: F) -> Self {
        Self { answer }
    }
}

impl<F> DecisionProvider for TextBot<F>
where
    F: Fn(&BoardView) -> anyhow::Result<String> + Send + Sync,
{
    fn decide(&self, view: &BoardView) -> anyhow::Result<Direction> {
        let raw = (self.answer)(view)?;
        Ok(raw.parse::<Direction>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Position};
    use crate::error::InvalidOutput;

    fn corner_view() -> BoardView {
        // Head in the top-right corner with trail to the south
        let mut board = Board::new(6, 6);
        board.mark_trail(Position::new(5, 4));
        BoardView::new(board, vec![Position::new(5, 5)], 0)
    }

    #[test]
    fn test_blind_bot_prefers_north() {
        let view = BoardView::new(Board::new(6, 6), vec![Position::new(2, 2)], 0);
        assert_eq!(BlindBot.decide(&view).unwrap(), Direction::North);
    }

    #[test]
    fn test_blind_bot_skips_walls_and_trail() {
        // N and E are off the board, S is trail: only W is free
        assert_eq!(BlindBot.decide(&corner_view()).unwrap(), Direction::West);
    }

    #[test]
    fn test_blind_bot_boxed_in() {
        let mut board = Board::new(1, 1);
        board.mark_trail(Position::new(0, 0));
        let view = BoardView::new(board, vec![Position::new(0, 0)], 0);
        assert_eq!(BlindBot.decide(&view).unwrap(), Direction::North);
    }

    #[test]
    fn test_straight_bot() {
        let bot = StraightBot(Direction::South);
        assert_eq!(bot.decide(&corner_view()).unwrap(), Direction::South);
    }

    #[test]
    fn test_wander_bot_deterministic_and_safe() {
        let bot = WanderBot::new(7);
        let first = bot.decide(&corner_view()).unwrap();
        for _ in 0..10 {
            assert_eq!(bot.decide(&corner_view()).unwrap(), first);
        }
        assert_eq!(first, Direction::West);
    }

    #[test]
    fn test_wander_bot_only_picks_free_cells() {
        let view = BoardView::new(Board::new(9, 9), vec![Position::new(4, 4)], 0);
        for seed in 0..32 {
            let d = WanderBot::new(seed).decide(&view).unwrap();
            assert!(view.look(d).is_free());
        }
    }

    #[test]
    fn test_text_bot() {
        let good = TextBot::new(|_: &BoardView| Ok("E".to_string()));
        assert_eq!(good.decide(&corner_view()).unwrap(), Direction::East);

        let bad = TextBot::new(|_: &BoardView| Ok("east".to_string()));
        let err = bad.decide(&corner_view()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<InvalidOutput>(),
            Some(&InvalidOutput("east".to_string()))
        );
    }
}
