//! Grid primitives: cells, headings and placement search

use serde::{Deserialize, Serialize};

use super::rng::GameRng;
use crate::consts::{GRID_SIZE, PLACEMENT_ATTEMPTS};

/// A grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// True when the cell lies on the board
    #[inline]
    pub fn in_bounds(&self) -> bool {
        (0..GRID_SIZE).contains(&self.x) && (0..GRID_SIZE).contains(&self.y)
    }

    #[inline]
    pub fn manhattan(&self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Neighbouring cell one step in `direction` (may leave the board)
    #[inline]
    pub fn step(&self, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        Position::new(self.x + dx, self.y + dy)
    }

    /// Wrap an off-board cell to the opposite edge
    pub fn wrapped(&self) -> Position {
        Position::new(self.x.rem_euclid(GRID_SIZE), self.y.rem_euclid(GRID_SIZE))
    }

    /// Center cell of the board
    pub fn center() -> Position {
        Position::new(GRID_SIZE / 2, GRID_SIZE / 2)
    }
}

/// Movement heading. Y grows downward, as on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Fixed iteration order used wherever candidates are enumerated
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Dominant heading from `from` toward `to` (x wins ties)
    pub fn toward(from: Position, to: Position) -> Direction {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        if dx.abs() >= dy.abs() {
            if dx >= 0 { Direction::Right } else { Direction::Left }
        } else if dy > 0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        }
    }
}

/// Uniformly random cell on the board
pub fn random_position(rng: &mut dyn GameRng) -> Position {
    let x = rng.next_index(GRID_SIZE as usize) as i32;
    let y = rng.next_index(GRID_SIZE as usize) as i32;
    Position::new(x, y)
}

/// Rejection-sample a cell for which `blocked` is false.
///
/// Gives up after `PLACEMENT_ATTEMPTS` draws and returns the origin, so a
/// saturated board never stalls a tick.
pub fn random_free_position(rng: &mut dyn GameRng, blocked: impl Fn(Position) -> bool) -> Position {
    for _ in 0..PLACEMENT_ATTEMPTS {
        let pos = random_position(rng);
        if !blocked(pos) {
            return pos;
        }
    }
    log::debug!("placement search exhausted, falling back to origin");
    Position::ORIGIN
}
