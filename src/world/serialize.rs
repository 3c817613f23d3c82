//! Dungeon serialization
//!
//! Sparse, type-bucketed JSON form: one coordinate list per carved cell type
//! (Solid is implied) plus each room's bounding box and occupants. For large
//! dungeons this is a fraction of the size of a per-cell dump.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::cell::CellType;
use super::coord::Coord;
use super::dungeon::{grid_area, Dungeon};
use super::room::{Occupant, Room};

/// Errors raised while parsing a serialized dungeon
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Malformed dungeon JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown cell type code '{0}'")]
    UnknownCellType(String),

    #[error("Invalid dungeon dimensions {height}x{width}")]
    InvalidDimensions { height: i32, width: i32 },

    #[error("Cell ({row}, {col}) is outside the grid")]
    OutOfBounds { row: i32, col: i32 },

    #[error("Border cell ({row}, {col}) can not be carved")]
    BorderCell { row: i32, col: i32 },

    #[error("Room {number} has an invalid bounding box")]
    InvalidRoom { number: usize },
}

/// Serialized dungeon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DungeonRecord {
    pub height: i32,
    pub width: i32,
    /// Cell type name -> coordinates, row-major
    pub cells: BTreeMap<String, Vec<(i32, i32)>>,
    #[serde(default)]
    pub rooms: Vec<RoomRecord>,
}

/// Serialized room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomRecord {
    /// 1-based room number
    pub n: usize,
    pub row: i32,
    pub col: i32,
    pub height: i32,
    pub width: i32,
    #[serde(default)]
    pub occ: Vec<Occupant>,
}

impl From<&Dungeon> for DungeonRecord {
    fn from(dungeon: &Dungeon) -> Self {
        let mut cells: BTreeMap<String, Vec<(i32, i32)>> = BTreeMap::new();
        for cell_type in CellType::CARVED {
            let coords: Vec<(i32, i32)> = dungeon
                .cells_of_type(cell_type)
                .map(|c| <(i32, i32)>::from(c.coord))
                .collect();
            cells.insert(cell_type.name().to_string(), coords);
        }

        let rooms = dungeon
            .rooms()
            .iter()
            .enumerate()
            .map(|(idx, room)| RoomRecord {
                n: idx + 1,
                row: room.top_left.row,
                col: room.top_left.col,
                height: room.height,
                width: room.width,
                occ: room.occupants.clone(),
            })
            .collect();

        DungeonRecord {
            height: dungeon.height(),
            width: dungeon.width(),
            cells,
            rooms,
        }
    }
}

impl TryFrom<DungeonRecord> for Dungeon {
    type Error = ParseError;

    fn try_from(record: DungeonRecord) -> Result<Self, Self::Error> {
        if grid_area(record.height, record.width).is_none() {
            return Err(ParseError::InvalidDimensions {
                height: record.height,
                width: record.width,
            });
        }

        let mut dungeon = Dungeon::new(record.height, record.width);

        for (code, coords) in &record.cells {
            let cell_type =
                CellType::from_name(code).ok_or_else(|| ParseError::UnknownCellType(code.clone()))?;
            for &(row, col) in coords {
                let cell = dungeon
                    .cell(row, col)
                    .ok_or(ParseError::OutOfBounds { row, col })?;
                if cell.border && cell_type != CellType::Solid {
                    return Err(ParseError::BorderCell { row, col });
                }
                dungeon.set_cell_type(Coord::new(row, col), cell_type);
            }
        }

        for entry in record.rooms {
            let mut room = Room::new(entry.height, entry.width)
                .ok_or(ParseError::InvalidRoom { number: entry.n })?;
            room.top_left = Coord::new(entry.row, entry.col);
            if !dungeon.in_bounds(room.top_left) || !dungeon.in_bounds(room.bottom_right()) {
                return Err(ParseError::InvalidRoom { number: entry.n });
            }
            room.occupants = entry.occ;
            dungeon.push_room(room);
        }

        Ok(dungeon)
    }
}

impl Dungeon {
    pub fn to_record(&self) -> DungeonRecord {
        DungeonRecord::from(self)
    }

    /// Encode as a single JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_record())
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_record())
    }

    /// Parse a dungeon produced by [`Dungeon::to_json`]
    pub fn from_json(json: &str) -> Result<Dungeon, ParseError> {
        let record: DungeonRecord = serde_json::from_str(json)?;
        Dungeon::try_from(record)
    }
}
