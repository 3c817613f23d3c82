//! Rooms
//!
//! Rectangular chambers carved into the grid, and the opaque occupants that
//! downstream systems attach to them.

use serde::{Deserialize, Serialize};

use super::coord::Coord;

/// Something living in a room
///
/// The generator never looks inside; the payload belongs to whoever
/// populated the room (creature tables, loot, etc).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occupant {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Occupant {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            data: serde_json::Value::Null,
        }
    }
}

/// A rectangular room
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    /// Top-left corner, only meaningful once the room has been carved
    pub top_left: Coord,
    pub height: i32,
    pub width: i32,
    pub occupants: Vec<Occupant>,
}

impl Room {
    /// A room of the given size, not yet placed. Non-positive sizes are rejected.
    pub fn new(height: i32, width: i32) -> Option<Self> {
        if height <= 0 || width <= 0 {
            return None;
        }
        Some(Self {
            top_left: Coord::new(0, 0),
            height,
            width,
            occupants: Vec::new(),
        })
    }

    /// Bottom-right corner (inclusive)
    pub fn bottom_right(&self) -> Coord {
        Coord::new(
            self.top_left.row + self.height - 1,
            self.top_left.col + self.width - 1,
        )
    }

    pub fn center(&self) -> Coord {
        Coord::new(
            self.top_left.row + self.height / 2,
            self.top_left.col + self.width / 2,
        )
    }

    /// Bounding box test, edges included
    pub fn contains(&self, coord: Coord) -> bool {
        let br = self.bottom_right();
        coord.row >= self.top_left.row
            && coord.row <= br.row
            && coord.col >= self.top_left.col
            && coord.col <= br.col
    }

    /// Every coordinate of the footprint in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        let top = self.top_left;
        (0..self.height)
            .flat_map(move |dr| (0..self.width).map(move |dc| Coord::new(top.row + dr, top.col + dc)))
    }

    pub fn area(&self) -> i32 {
        self.height * self.width
    }

    pub fn populate(&mut self, occupant: Occupant) {
        self.occupants.push(occupant);
    }
}

impl std::fmt::Display for Room {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(Room: {}x{} @ {}, {})",
            self.height,
            self.width,
            self.top_left,
            self.occupants.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed(row: i32, col: i32, height: i32, width: i32) -> Room {
        let mut room = Room::new(height, width).unwrap();
        room.top_left = Coord::new(row, col);
        room
    }

    #[test]
    fn test_rejects_empty_size() {
        assert!(Room::new(0, 4).is_none());
        assert!(Room::new(3, -1).is_none());
        assert!(Room::new(2, 2).is_some());
    }

    #[test]
    fn test_contains() {
        let room = placed(5, 5, 6, 6);

        // inside
        assert!(room.contains(Coord::new(6, 7)));
        // outside
        assert!(!room.contains(Coord::new(2, 2)));
        assert!(!room.contains(Coord::new(11, 5)));
        // edges
        assert!(room.contains(Coord::new(5, 5)));
        assert!(room.contains(Coord::new(6, 10)));
        assert!(room.contains(Coord::new(10, 10)));
    }

    #[test]
    fn test_cells_cover_footprint() {
        let room = placed(2, 3, 2, 3);
        let cells: Vec<Coord> = room.cells().collect();
        assert_eq!(cells.len() as i32, room.area());
        assert_eq!(cells.first(), Some(&Coord::new(2, 3)));
        assert_eq!(cells.last(), Some(&room.bottom_right()));
        assert!(cells.iter().all(|c| room.contains(*c)));
    }

    #[test]
    fn test_populate() {
        let mut room = placed(1, 1, 3, 3);
        assert!(room.occupants.is_empty());
        room.populate(Occupant::new("Grub", "monster"));
        assert_eq!(room.occupants.len(), 1);
        assert_eq!(room.occupants[0].name, "Grub");
    }
}
