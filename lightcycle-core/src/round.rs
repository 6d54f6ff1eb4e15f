//! Round - one single-elimination sub-game on a shared board
//!
//! A round is driven turn by turn and stops at the first turn that
//! eliminates at least one agent. Every turn resolves in four steps:
//!
//! 1. evaluate all agents against the frozen pre-turn state
//! 2. lay trail on each mover's old cell and advance its head
//! 3. eliminate faulted, out-of-bounds, trail-hitting and colliding agents
//! 4. record an immutable snapshot

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::agent::Agent;
use crate::board::{spawn_positions, Board, Direction, Position};
use crate::error::EngineError;
use crate::referee::Referee;
use crate::view::FrozenBoard;

/// Characters used to draw heads, by round-local index
pub const HEAD_GLYPHS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Display glyph for a round-local agent index
pub fn head_glyph(index: usize) -> char {
    HEAD_GLYPHS.get(index).map_or('?', |&b| b as char)
}

/// A head as drawn in a snapshot
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HeadMark {
    pub name: String,
    pub glyph: char,
    pub x: i64,
    pub y: i64,
}

/// Immutable record of one turn
#[derive(Clone, Debug, Serialize)]
pub struct TurnSnapshot {
    pub turn: u32,
    pub width: usize,
    pub height: usize,
    pub heads: Vec<HeadMark>,
    /// Names of agents eliminated on this turn
    pub eliminated: Vec<String>,
    /// Rendered board, eliminations and legend
    pub text: String,
}

impl fmt::Display for TurnSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// One round among a subset of agents
#[derive(Debug)]
pub struct Round {
    agents: Vec<Agent>,
    referee: Referee,
    board: Board,
    heads: Vec<Position>,
    /// Round-local indices, in elimination order
    eliminated: Vec<usize>,
    turn: u32,
    frames: Vec<TurnSnapshot>,
}

impl Round {
    /// Create a round with a fresh board sized for `agents` and the
    /// turn-0 snapshot already recorded
    pub fn new(agents: Vec<Agent>, referee: Referee) -> Result<Self, EngineError> {
        if agents.is_empty() {
            return Err(EngineError::EmptyRound);
        }

        let n = agents.len();
        let mut round = Self {
            board: Board::for_agents(n),
            heads: spawn_positions(n),
            agents,
            referee,
            eliminated: Vec::new(),
            turn: 0,
            frames: Vec::new(),
        };
        let initial = round.snapshot(&[]);
        round.frames.push(initial);
        Ok(round)
    }

    /// A round is finished once anyone has been eliminated
    pub fn finished(&self) -> bool {
        !self.eliminated.is_empty()
    }

    /// Play one turn and return its snapshot
    pub fn do_turn(&mut self) -> Result<&TurnSnapshot, EngineError> {
        if self.finished() {
            return Err(EngineError::RoundFinished);
        }

        let frozen = Arc::new(FrozenBoard::new(self.board.clone(), self.heads.clone()));
        let moves = self.referee.evaluate_all(&self.agents, &frozen);

        self.apply_moves(&moves);
        let fallen = self.find_eliminated(&moves);
        self.eliminated.extend_from_slice(&fallen);
        self.turn += 1;

        tracing::debug!(
            "Turn {}: {} agents moved, {} eliminated",
            self.turn,
            moves.iter().filter(|m| m.is_some()).count(),
            fallen.len()
        );

        let frame = self.snapshot(&fallen);
        self.frames.push(frame);
        Ok(&self.frames[self.frames.len() - 1])
    }

    /// Drive turns until the round finishes, returning the turn count.
    ///
    /// Always terminates: every surviving agent lays one trail cell per
    /// turn, so the board fills up.
    pub fn run(&mut self) -> Result<u32, EngineError> {
        if self.finished() {
            return Err(EngineError::RoundFinished);
        }
        while !self.finished() {
            self.do_turn()?;
        }
        Ok(self.turn)
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn heads(&self) -> &[Position] {
        &self.heads
    }

    /// Round-local indices of eliminated agents, in elimination order
    pub fn eliminated(&self) -> &[usize] {
        &self.eliminated
    }

    /// Turns played so far
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Recorded snapshots, turn 0 first
    pub fn frames(&self) -> &[TurnSnapshot] {
        &self.frames
    }

    // ------------------------------------------------------------------------
    // Turn steps
    // ------------------------------------------------------------------------

    /// Lay trail under every mover and advance its head
    fn apply_moves(&mut self, moves: &[Option<Direction>]) {
        for (head, mv) in self.heads.iter_mut().zip(moves) {
            if let Some(direction) = *mv {
                self.board.mark_trail(*head);
                *head = head.step(direction);
            }
        }
    }

    /// Agents eliminated by this turn's moves, in index order
    fn find_eliminated(&self, moves: &[Option<Direction>]) -> Vec<usize> {
        let mut occupancy: FxHashMap<Position, usize> = FxHashMap::default();
        for head in &self.heads {
            *occupancy.entry(*head).or_insert(0) += 1;
        }

        self.heads
            .iter()
            .zip(moves)
            .enumerate()
            .filter(|(_, (head, mv))| {
                mv.is_none()
                    || !self.board.contains(**head)
                    || self.board.is_trail(**head)
                    || occupancy.get(*head).copied().unwrap_or(0) > 1
            })
            .map(|(i, _)| i)
            .collect()
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    fn snapshot(&self, fallen: &[usize]) -> TurnSnapshot {
        let heads = self
            .heads
            .iter()
            .enumerate()
            .map(|(i, pos)| HeadMark {
                name: self.agents[i].name().to_string(),
                glyph: head_glyph(i),
                x: pos.x,
                y: pos.y,
            })
            .collect();
        let eliminated = fallen
            .iter()
            .map(|&i| self.agents[i].name().to_string())
            .collect();

        TurnSnapshot {
            turn: self.turn,
            width: self.board.width(),
            height: self.board.height(),
            heads,
            eliminated,
            text: self.render(fallen),
        }
    }

    /// Draw the board top row first, with a one-cell border. Heads are drawn
    /// over the border too, so a head that just left the board stays visible.
    fn render(&self, fallen: &[usize]) -> String {
        let (width, height) = (self.board.width() as i64, self.board.height() as i64);

        let mut glyph_at: FxHashMap<Position, char> = FxHashMap::default();
        for (i, head) in self.heads.iter().enumerate() {
            glyph_at.entry(*head).or_insert_with(|| head_glyph(i));
        }

        let mut out = format!("Turn {}\n", self.turn);
        for y in (-1..=height).rev() {
            for x in -1..=width {
                let pos = Position::new(x, y);
                let edge_x = x == -1 || x == width;
                let edge_y = y == -1 || y == height;
                let c = match glyph_at.get(&pos) {
                    Some(&glyph) => glyph,
                    None if edge_x && edge_y => '+',
                    None if edge_x => '|',
                    None if edge_y => '-',
                    None if self.board.is_trail(pos) => '#',
                    None => ' ',
                };
                out.push(c);
            }
            out.push('\n');
        }
        out.push('\n');

        if !fallen.is_empty() {
            let names: Vec<&str> = fallen.iter().map(|&i| self.agents[i].name()).collect();
            let verb = if names.len() > 1 { "have been" } else { "has been" };
            out.push_str(&format!("{} {} eliminated!\n\n", names.join(", "), verb));
        }

        for (i, agent) in self.agents.iter().enumerate() {
            out.push_str(&format!("{}: {}\n", head_glyph(i), agent.name()));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::provider_fn;
    use crate::referee::DEFAULT_TIME_BUDGET;
    use crate::sandbox::InlineSandbox;

    fn referee() -> Referee {
        Referee::new(InlineSandbox, DEFAULT_TIME_BUDGET)
    }

    fn always(name: &str, direction: Direction) -> Agent {
        Agent::new(name, "test", provider_fn(move |_| Ok(direction)))
    }

    fn failing(name: &str) -> Agent {
        Agent::new(name, "test", provider_fn(|_| Err(anyhow::anyhow!("crash"))))
    }

    #[test]
    fn test_new_round_layout() {
        let round = Round::new(
            vec![always("a", Direction::South), always("b", Direction::North)],
            referee(),
        )
        .unwrap();
        assert_eq!(round.board().dimensions(), (84, 35));
        assert_eq!(round.heads(), &[Position::new(42, 34), Position::new(42, 0)]);
        assert_eq!(round.turn(), 0);
        assert_eq!(round.frames().len(), 1);
        assert!(!round.finished());
    }

    #[test]
    fn test_empty_round_rejected() {
        assert_eq!(Round::new(vec![], referee()).unwrap_err(), EngineError::EmptyRound);
    }

    #[test]
    fn test_wall_elimination() {
        // Agent 0 spawns on the top edge and drives north off the board
        let mut round = Round::new(
            vec![always("a", Direction::North), always("b", Direction::North)],
            referee(),
        )
        .unwrap();
        round.do_turn().unwrap();
        assert!(round.finished());
        assert_eq!(round.eliminated(), &[0]);
        assert_eq!(round.turn(), 1);
        assert_eq!(round.frames().len(), 2);
        assert_eq!(round.frames()[1].eliminated, vec!["a".to_string()]);
    }

    #[test]
    fn test_do_turn_after_finish_fails() {
        let mut round = Round::new(vec![failing("x"), always("y", Direction::North)], referee()).unwrap();
        round.do_turn().unwrap();
        assert_eq!(round.do_turn().unwrap_err(), EngineError::RoundFinished);
        assert_eq!(round.run().unwrap_err(), EngineError::RoundFinished);
        // Failed call left no trace
        assert_eq!(round.frames().len(), 2);
    }

    #[test]
    fn test_faulted_agent_does_not_move_or_lay_trail() {
        let mut round = Round::new(vec![failing("x"), always("y", Direction::North)], referee()).unwrap();
        let start = round.heads()[0];
        round.do_turn().unwrap();
        assert_eq!(round.heads()[0], start);
        assert!(!round.board().is_trail(start));
        assert!(round.board().is_trail(Position::new(42, 0)));
        assert_eq!(round.eliminated(), &[0]);
    }

    #[test]
    fn test_trail_collision() {
        // Single agent that turns back onto its own trail
        let turned = provider_fn(|view| {
            let top = view.dimensions().1 as i64 - 1;
            if view.self_position().y == top {
                Ok(Direction::South)
            } else {
                Ok(Direction::North)
            }
        });
        let mut round = Round::new(vec![Agent::new("loop", "t", turned)], referee()).unwrap();
        let turns = round.run().unwrap();
        assert_eq!(turns, 2);
        assert_eq!(round.eliminated(), &[0]);
        assert!(round.board().is_trail(round.heads()[0]));
    }

    #[test]
    fn test_head_collision_is_symmetric() {
        // Two agents on the same row facing each other, one gap apart
        let mut round = Round::new(
            vec![always("a", Direction::South), always("b", Direction::North)],
            referee(),
        )
        .unwrap();
        // Agents start at y=34 and y=0, same x; they meet after 17 turns
        let turns = round.run().unwrap();
        assert_eq!(turns, 17);
        assert_eq!(round.heads()[0], round.heads()[1]);
        assert_eq!(round.eliminated(), &[0, 1]);
        let last = round.frames().last().unwrap();
        assert_eq!(last.eliminated, vec!["a".to_string(), "b".to_string()]);
        assert!(last.text.contains("a, b have been eliminated!"));
    }

    #[test]
    fn test_moving_into_stationary_faulted_head() {
        // Three agents: 96x40 board, spawns (24,39), (48,0), (72,39).
        // Agent 0 runs east to x=48 then south; agent 1 runs north and
        // faults in place at y=31 just as agent 0 steps onto it.
        let hunter = provider_fn(|view| {
            if view.self_position().x < 48 {
                Ok(Direction::East)
            } else {
                Ok(Direction::South)
            }
        });
        let stopper = provider_fn(|view| {
            anyhow::ensure!(view.self_position().y != 31, "stalled");
            Ok(Direction::North)
        });
        let mut round = Round::new(
            vec![
                Agent::new("hunter", "t", hunter),
                Agent::new("stopper", "t", stopper),
                always("bystander", Direction::South),
            ],
            referee(),
        )
        .unwrap();

        let turns = round.run().unwrap();
        assert_eq!(turns, 32);
        assert_eq!(round.heads()[0], Position::new(48, 31));
        assert_eq!(round.heads()[1], Position::new(48, 31));
        assert_eq!(round.eliminated(), &[0, 1]);
    }

    #[test]
    fn test_views_are_pre_turn() {
        // Both agents record the other's head as seen; neither may observe a
        // sibling's move from the same turn.
        let probe = provider_fn(|view| {
            let (w, _) = view.dimensions();
            let x = w as i64 / 2;
            let me = view.self_position();
            let other_y = if me.y == 0 { 34 } else { 0 };
            // On turn 1 the other head must still be at its spawn
            if me.y == 0 || me.y == 34 {
                anyhow::ensure!(
                    view.cell_at(x, other_y) == crate::view::CellState::OtherHeadPresent,
                    "saw a moved head"
                );
            }
            Ok(Direction::East)
        });
        let shared: Arc<dyn crate::agent::DecisionProvider> = Arc::new(probe);
        let mut round = Round::new(
            vec![
                Agent::from_shared("a", "t", Arc::clone(&shared)),
                Agent::from_shared("b", "t", shared),
            ],
            referee(),
        )
        .unwrap();
        round.do_turn().unwrap();
        assert!(!round.finished());
    }

    #[test]
    fn test_initial_frame_text() {
        let round = Round::new(vec![always("solo", Direction::East)], referee()).unwrap();
        let frame = &round.frames()[0];
        let lines: Vec<&str> = frame.text.lines().collect();
        assert_eq!(lines[0], "Turn 0");
        // Border rows plus board rows
        let board_w = 72; // 12 * 1 + 60
        assert_eq!(lines[1].len(), board_w + 2);
        assert!(lines[1].starts_with('+') && lines[1].ends_with('+'));
        // Solo agent spawns on the top row, centred
        assert_eq!(lines[2].chars().nth(36 + 1), Some('0'));
        assert!(frame.text.ends_with("0: solo\n"));
        assert_eq!(frame.heads[0].glyph, '0');
    }

    #[test]
    fn test_head_drawn_over_border() {
        let mut round = Round::new(vec![always("up", Direction::North)], referee()).unwrap();
        round.do_turn().unwrap();
        let frame = round.frames().last().unwrap();
        let top_border = frame.text.lines().nth(1).unwrap();
        assert_eq!(top_border.chars().nth(36 + 1), Some('0'));
        assert!(frame.text.contains("up has been eliminated!"));
    }

    #[test]
    fn test_head_glyphs() {
        assert_eq!(head_glyph(0), '0');
        assert_eq!(head_glyph(10), 'A');
        assert_eq!(head_glyph(35), 'Z');
        assert_eq!(head_glyph(36), '?');
    }
}
