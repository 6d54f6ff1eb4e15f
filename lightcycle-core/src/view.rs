//! Read-only board view handed to decision providers

use std::sync::Arc;

use crate::board::{Board, Direction, Position};

/// Result of a cell query
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellState {
    Empty,
    Trail,
    OutOfBounds,
    OtherHeadPresent,
}

impl CellState {
    /// True only for `Empty`
    pub fn is_free(self) -> bool {
        self == CellState::Empty
    }
}

/// Pre-turn board and head positions, frozen for one turn.
///
/// Shared between all views of the same turn; nothing can mutate it.
#[derive(Debug)]
pub struct FrozenBoard {
    board: Board,
    heads: Vec<Position>,
}

impl FrozenBoard {
    pub fn new(board: Board, heads: Vec<Position>) -> Self {
        Self { board, heads }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn heads(&self) -> &[Position] {
        &self.heads
    }
}

/// One agent's view of the pre-turn state.
///
/// Owned and `Send`, so it can be moved onto an evaluation worker. Every
/// accessor returns copies.
#[derive(Clone, Debug)]
pub struct BoardView {
    frozen: Arc<FrozenBoard>,
    me: usize,
}

impl BoardView {
    /// Build a standalone view, e.g. for exercising a provider in isolation.
    ///
    /// Panics if `me` is not an index into `heads`.
    pub fn new(board: Board, heads: Vec<Position>, me: usize) -> Self {
        assert!(me < heads.len(), "view owner {me} has no head");
        Self::share(Arc::new(FrozenBoard::new(board, heads)), me)
    }

    pub(crate) fn share(frozen: Arc<FrozenBoard>, me: usize) -> Self {
        Self { frozen, me }
    }

    /// (width, height)
    pub fn dimensions(&self) -> (usize, usize) {
        self.frozen.board.dimensions()
    }

    /// The caller's own head position
    pub fn self_position(&self) -> Position {
        self.frozen.heads[self.me]
    }

    /// Number of live agents on the board, including the caller
    pub fn agent_count(&self) -> usize {
        self.frozen.heads.len()
    }

    /// Query a cell. Off-board coordinates report `OutOfBounds`; any head,
    /// the caller's own included, reports `OtherHeadPresent`.
    pub fn cell_at(&self, x: i64, y: i64) -> CellState {
        let pos = Position::new(x, y);
        if !self.frozen.board.contains(pos) {
            return CellState::OutOfBounds;
        }
        if self.frozen.heads.contains(&pos) {
            return CellState::OtherHeadPresent;
        }
        if self.frozen.board.is_trail(pos) {
            CellState::Trail
        } else {
            CellState::Empty
        }
    }

    /// Query the cell one step from the caller's head
    pub fn look(&self, direction: Direction) -> CellState {
        let next = self.self_position().step(direction);
        self.cell_at(next.x, next.y)
    }
}
