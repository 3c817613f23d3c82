//! Grid coordinates
//!
//! Row/column addressing and the cardinal/diagonal offsets used by the
//! dungeon queries and the carving checks.

use serde::{Deserialize, Serialize};

/// A position on the dungeon grid
///
/// Ordering is row-major, which is the scan order every generation stage uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The neighbouring coordinate one step in `direction`
    pub fn step(&self, direction: Direction) -> Coord {
        let (dr, dc) = direction.offset();
        Coord::new(self.row + dr, self.col + dc)
    }

    /// Cardinal neighbours in N, S, E, W order (may be out of bounds)
    pub fn cardinals(&self) -> [Coord; 4] {
        Direction::ALL.map(|d| self.step(d))
    }

    /// Diagonal neighbours in NW, SW, NE, SE order (may be out of bounds)
    pub fn diagonals(&self) -> [Coord; 4] {
        DIAGONAL_OFFSETS.map(|(dr, dc)| Coord::new(self.row + dr, self.col + dc))
    }

    /// Chebyshev distance (diagonals count as one step)
    pub fn chebyshev_distance(&self, other: &Coord) -> i32 {
        (self.row - other.row).abs().max((self.col - other.col).abs())
    }

    /// True when `other` touches this coordinate cardinally or diagonally
    pub fn touches(&self, other: &Coord) -> bool {
        self != other && self.chebyshev_distance(other) == 1
    }
}

impl From<Coord> for (i32, i32) {
    fn from(coord: Coord) -> Self {
        (coord.row, coord.col)
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Only used by carvability checks, navigation is strictly cardinal
const DIAGONAL_OFFSETS: [(i32, i32); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

/// Cardinal carving/movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Fixed iteration order; maze carving options are listed in this order
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// (row, col) delta
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_ordering() {
        let mut coords = vec![Coord::new(2, 1), Coord::new(1, 5), Coord::new(1, 2)];
        coords.sort();
        assert_eq!(coords, vec![Coord::new(1, 2), Coord::new(1, 5), Coord::new(2, 1)]);
    }

    #[test]
    fn test_step_and_opposite() {
        let c = Coord::new(4, 4);
        for dir in Direction::ALL {
            assert_eq!(c.step(dir).step(dir.opposite()), c);
        }
        assert_eq!(c.step(Direction::North), Coord::new(3, 4));
        assert_eq!(c.step(Direction::East), Coord::new(4, 5));
    }

    #[test]
    fn test_touches() {
        let c = Coord::new(4, 4);
        assert!(c.touches(&Coord::new(3, 3)));
        assert!(c.touches(&Coord::new(4, 5)));
        assert!(!c.touches(&c));
        assert!(!c.touches(&Coord::new(4, 6)));
    }
}
