//! Dungeon data structure
//!
//! The finished, fully connected grid handed to the exploration engine,
//! renderer and persistence layers.

use std::collections::HashSet;

use super::cell::{Cell, CellType};
use super::coord::Coord;
use super::room::Room;

/// Largest grid accepted from a config or a saved file, in cells
pub const MAX_CELLS: usize = 1 << 24;

/// Cell count of a `height` x `width` grid, or `None` when a side is not
/// positive or the grid is larger than [`MAX_CELLS`]
pub fn grid_area(height: i32, width: i32) -> Option<usize> {
    if height <= 0 || width <= 0 {
        return None;
    }
    height
        .checked_mul(width)
        .map(|cells| cells as usize)
        .filter(|cells| *cells <= MAX_CELLS)
}

/// A generated dungeon
#[derive(Debug, Clone, PartialEq)]
pub struct Dungeon {
    height: i32,
    width: i32,
    cells: Vec<Cell>,
    /// Carve order; index + 1 is the room number shown to players
    rooms: Vec<Room>,
}

impl Dungeon {
    /// Create a dungeon of solid rock with the outer ring marked as border
    pub fn new(height: i32, width: i32) -> Self {
        let height = height.max(0);
        let width = width.max(0);
        let mut cells = Vec::with_capacity((height as usize).saturating_mul(width as usize));
        for row in 0..height {
            for col in 0..width {
                let border = row == 0 || col == 0 || row == height - 1 || col == width - 1;
                cells.push(Cell::new(Coord::new(row, col), border));
            }
        }
        Self {
            height,
            width,
            cells,
            rooms: Vec::new(),
        }
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    /// Convert 2D coordinates to 1D index
    #[inline]
    fn idx(&self, coord: Coord) -> usize {
        (coord.row * self.width + coord.col) as usize
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.row >= 0 && coord.row < self.height && coord.col >= 0 && coord.col < self.width
    }

    /// Get the cell at a position, `None` when out of bounds
    pub fn cell(&self, row: i32, col: i32) -> Option<&Cell> {
        self.cell_at(Coord::new(row, col))
    }

    pub fn cell_at(&self, coord: Coord) -> Option<&Cell> {
        if self.in_bounds(coord) {
            Some(&self.cells[self.idx(coord)])
        } else {
            None
        }
    }

    /// Set the type of a cell. Border cells stay Solid.
    pub(crate) fn set_cell_type(&mut self, coord: Coord, cell_type: CellType) {
        if self.in_bounds(coord) {
            let idx = self.idx(coord);
            let cell = &mut self.cells[idx];
            if !cell.border {
                cell.cell_type = cell_type;
            }
        }
    }

    pub(crate) fn push_room(&mut self, room: Room) {
        self.rooms.push(room);
    }

    /// All cells in row-major order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// All cells of one type in row-major order
    pub fn cells_of_type(&self, cell_type: CellType) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter().filter(move |c| c.cell_type == cell_type)
    }

    pub fn count(&self, cell_type: CellType) -> usize {
        self.cells_of_type(cell_type).count()
    }

    /// Navigable cardinal neighbours of a position
    pub fn neighbors(&self, coord: Coord) -> Vec<&Cell> {
        coord
            .cardinals()
            .iter()
            .filter_map(|c| self.cell_at(*c))
            .filter(|c| c.is_navigable())
            .collect()
    }

    /// Diagonal neighbours that exist, navigable or not
    pub fn diagonal_neighbors(&self, coord: Coord) -> Vec<&Cell> {
        coord
            .diagonals()
            .iter()
            .filter_map(|c| self.cell_at(*c))
            .collect()
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Mutable access to a room, for populating occupants
    pub fn room_mut(&mut self, index: usize) -> Option<&mut Room> {
        self.rooms.get_mut(index)
    }

    /// 1-based number of the room containing a position
    pub fn room_number(&self, coord: Coord) -> Option<usize> {
        self.rooms
            .iter()
            .position(|r| r.contains(coord))
            .map(|idx| idx + 1)
    }

    /// The single entrance cell
    pub fn entrance(&self) -> Option<&Cell> {
        self.cells_of_type(CellType::Entrance).next()
    }

    /// Cardinal flood fill over navigable cells
    pub fn reachable_from(&self, start: Coord) -> HashSet<Coord> {
        let mut visited = HashSet::new();
        if !self.cell_at(start).map_or(false, |c| c.is_navigable()) {
            return visited;
        }

        let mut stack = vec![start];
        while let Some(pos) = stack.pop() {
            if !visited.insert(pos) {
                continue;
            }
            for next in self.neighbors(pos) {
                if !visited.contains(&next.coord) {
                    stack.push(next.coord);
                }
            }
        }
        visited
    }

    /// ASCII map with a row index gutter
    pub fn render(&self) -> String {
        let mut out = String::with_capacity((self.width as usize + 8) * self.height as usize * 3);
        for (row, line) in self.cells.chunks(self.width.max(1) as usize).enumerate() {
            out.push_str(&format!("{:>4}: ", row));
            out.extend(line.iter().map(|c| c.glyph()));
            out.push('\n');
        }
        out
    }
}
