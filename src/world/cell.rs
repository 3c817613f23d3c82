//! Cell definitions
//!
//! The cell types of a finished dungeon and their properties.

use serde::{Deserialize, Serialize};

use super::coord::Coord;

/// A single grid position of a finished dungeon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub cell_type: CellType,
    pub coord: Coord,
    /// Outermost ring of the grid, always Solid
    pub border: bool,
}

impl Cell {
    pub fn new(coord: Coord, border: bool) -> Self {
        Self {
            cell_type: CellType::Solid,
            coord,
            border,
        }
    }

    pub fn is_navigable(&self) -> bool {
        self.cell_type.is_navigable()
    }

    pub fn glyph(&self) -> char {
        self.cell_type.glyph()
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cell: {}, {}", self.cell_type.name(), self.coord)
    }
}

/// Types of cells in a finished dungeon
///
/// Generation uses an extra transient connector marker which has no
/// representation here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CellType {
    Solid,
    Room,
    Passage,
    Doorway,
    Entrance,
}

impl CellType {
    /// Every type that is written out when serializing; Solid is implicit
    pub const CARVED: [CellType; 4] = [
        CellType::Room,
        CellType::Passage,
        CellType::Doorway,
        CellType::Entrance,
    ];

    pub fn is_navigable(&self) -> bool {
        !matches!(self, CellType::Solid)
    }

    pub fn glyph(&self) -> char {
        match self {
            CellType::Solid => '▓',
            CellType::Room => '_',
            CellType::Passage => ' ',
            CellType::Doorway => '+',
            CellType::Entrance => '>',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CellType::Solid => "solid",
            CellType::Room => "room",
            CellType::Passage => "passage",
            CellType::Doorway => "doorway",
            CellType::Entrance => "entrance",
        }
    }

    /// Inverse of [`CellType::name`]
    pub fn from_name(name: &str) -> Option<CellType> {
        match name {
            "solid" => Some(CellType::Solid),
            "room" => Some(CellType::Room),
            "passage" => Some(CellType::Passage),
            "doorway" => Some(CellType::Doorway),
            "entrance" => Some(CellType::Entrance),
            _ => None,
        }
    }
}
