//! World module
//!
//! Contains the dungeon data structures, their serialized form, and
//! procedural generation.

pub mod cell;
pub mod coord;
pub mod dungeon;
pub mod generation;
pub mod room;
pub mod serialize;

pub use cell::{Cell, CellType};
pub use coord::{Coord, Direction};
pub use dungeon::Dungeon;
pub use room::{Occupant, Room};
pub use serialize::{DungeonRecord, ParseError, RoomRecord};
