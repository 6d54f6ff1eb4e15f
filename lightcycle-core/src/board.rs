//! Grid board geometry, trail storage and spawn placement

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::InvalidOutput;

/// Board width for a round with `agents` participants
pub const fn board_width(agents: usize) -> usize {
    12 * agents + 60
}

/// Board height for a round with `agents` participants
pub const fn board_height(agents: usize) -> usize {
    5 * agents + 25
}

/// Integer grid coordinates. `y` grows northwards; row 0 is the bottom edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Neighbouring position one step in `direction`
    pub fn step(self, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        Position::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Movement direction requested by an agent
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "W")]
    West,
}

/// All directions in query order: N, E, S, W
pub const DIRECTIONS: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

impl Direction {
    /// Displacement vector (dx, dy)
    pub const fn delta(self) -> (i64, i64) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }

    /// Single-letter wire form
    pub const fn letter(self) -> char {
        match self {
            Direction::North => 'N',
            Direction::East => 'E',
            Direction::South => 'S',
            Direction::West => 'W',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Parses exactly one of `N`, `E`, `S`, `W`. Anything else, including
/// lowercase or padded text, is rejected.
impl FromStr for Direction {
    type Err = InvalidOutput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N" => Ok(Direction::North),
            "E" => Ok(Direction::East),
            "S" => Ok(Direction::South),
            "W" => Ok(Direction::West),
            other => Err(InvalidOutput(other.to_string())),
        }
    }
}

/// Contents of a single board cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Trail,
}

/// Fixed-size grid of trail cells. Dimensions never change after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    /// Board sized for a round with `agents` participants
    pub fn for_agents(agents: usize) -> Self {
        Self::new(board_width(agents), board_height(agents))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Check if the position lies inside `[0, width) x [0, height)`
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u64) < self.width as u64 && (pos.y as u64) < self.height as u64
    }

    /// Cell at `pos`, or `None` off the board
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    pub fn is_trail(&self, pos: Position) -> bool {
        self.get(pos) == Some(Cell::Trail)
    }

    /// Mark a cell as trail. Positions off the board are ignored.
    pub fn mark_trail(&mut self, pos: Position) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = Cell::Trail;
        }
    }

    /// Number of trail cells laid so far
    pub fn trail_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == Cell::Trail).count()
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.contains(pos) {
            Some(pos.y as usize * self.width + pos.x as usize)
        } else {
            None
        }
    }
}

/// Spawn positions for `agents` participants, index-aligned.
///
/// Even indices go to the top edge (`y = height - 1`), odd indices to the
/// bottom edge (`y = 0`). The `k`-th agent of the `m` on an edge sits at
/// `x = floor(width * (k + 0.5) / m)`.
pub fn spawn_positions(agents: usize) -> Vec<Position> {
    let width = board_width(agents) as i64;
    let top_y = board_height(agents) as i64 - 1;
    let on_top = agents.div_ceil(2) as i64;
    let on_bottom = (agents / 2) as i64;

    (0..agents)
        .map(|i| {
            let k = (i / 2) as i64;
            if i % 2 == 0 {
                Position::new(spread(width, k, on_top), top_y)
            } else {
                Position::new(spread(width, k, on_bottom), 0)
            }
        })
        .collect()
}

/// floor(width * (k + 0.5) / m) in integer arithmetic
fn spread(width: i64, k: i64, m: i64) -> i64 {
    (width * (2 * k + 1)) / (2 * m)
}
