//! Undercroft - rooms and mazes dungeon generator
//!
//! Places rooms, fills the rock between them with mazes, joins everything
//! into one connected level, trims dead ends and picks an entrance. The same
//! seed and configuration always produce the same dungeon.

pub mod config;
pub mod rng;
pub mod world;

// Re-export commonly used types
pub use config::{ConfigError, GeneratorConfig, SizeRange};
pub use rng::DungeonRng;
pub use world::generation::{generate, generate_dungeon, generate_with_stats, GenerationError, GenerationStats};
pub use world::{Cell, CellType, Coord, Direction, Dungeon, Occupant, ParseError, Room};
