use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a unit tracked by a [`Game`](crate::Game).
///
/// Ids are allocated sequentially by the game and never reused, so a game
/// rebuilt from a snapshot hands out the same ids as the original.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of a team taking part in the match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub u32);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "team-{}", self.0)
    }
}

/// Discrete grid position expressed in cell coordinates.
///
/// Positions are plain values and are never checked against grid bounds on
/// their own; callers use [`Game::in_bounds`](crate::Game::in_bounds).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Stable integer encoding usable as a set or map key.
    pub const fn key(self) -> u64 {
        ((self.x as u32 as u64) << 32) | (self.y as u32 as u64)
    }

    /// The four orthogonal neighbours, in `+x, -x, +y, -y` order.
    pub const fn adjacents(self) -> [Position; 4] {
        [
            Position::new(self.x + 1, self.y),
            Position::new(self.x - 1, self.y),
            Position::new(self.x, self.y + 1),
            Position::new(self.x, self.y - 1),
        ]
    }

    pub const fn manhattan_distance(self, other: Position) -> u32 {
        self.x
            .abs_diff(other.x)
            .saturating_add(self.y.abs_diff(other.y))
    }

    pub fn is_adjacent_to(self, other: Position) -> bool {
        self.manhattan_distance(other) == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Rectangle of cells anchored at its lowest-coordinate corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Footprint {
    pub anchor: Position,
    pub width: u32,
    pub height: u32,
}

impl Footprint {
    pub const fn new(anchor: Position, width: u32, height: u32) -> Self {
        Self {
            anchor,
            width,
            height,
        }
    }

    pub const fn single(anchor: Position) -> Self {
        Self::new(anchor, 1, 1)
    }

    /// Every covered cell, x outer and y inner.
    pub fn covering(&self) -> Vec<Position> {
        let mut cells = Vec::with_capacity((self.width * self.height) as usize);
        for dx in 0..self.width as i32 {
            for dy in 0..self.height as i32 {
                cells.push(Position::new(self.anchor.x + dx, self.anchor.y + dy));
            }
        }
        cells
    }

    pub fn contains(&self, position: Position) -> bool {
        self.gap(position) == (0, 0)
    }

    /// True when `position` is covered or orthogonally touches a covered cell.
    pub fn touches(&self, position: Position) -> bool {
        let (gap_x, gap_y) = self.gap(position);
        gap_x + gap_y <= 1
    }

    /// Per-axis distance from `position` to the nearest covered cell.
    fn gap(&self, position: Position) -> (i64, i64) {
        fn axis(offset: i64, len: u32) -> i64 {
            if offset < 0 {
                -offset
            } else {
                (offset - i64::from(len) + 1).max(0)
            }
        }
        let dx = i64::from(position.x) - i64::from(self.anchor.x);
        let dy = i64::from(position.y) - i64::from(self.anchor.y);
        (axis(dx, self.width), axis(dy, self.height))
    }
}

/// Anything that sits on the grid with an anchor and a rectangular size.
pub trait Positioned {
    fn position(&self) -> Position;

    fn size(&self) -> (u32, u32) {
        (1, 1)
    }

    fn footprint(&self) -> Footprint {
        let (width, height) = self.size();
        Footprint::new(self.position(), width, height)
    }

    fn covering(&self) -> Vec<Position> {
        self.footprint().covering()
    }

    fn occupies(&self, position: Position) -> bool {
        self.footprint().contains(position)
    }
}
