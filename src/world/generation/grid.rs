//! Generation-phase grid
//!
//! Mutable working copy of the dungeon used while the stages run. It carries
//! the bookkeeping that only matters mid-generation (region tags and the
//! transient connector marker) and is converted into an immutable
//! [`Dungeon`] once every stage has finished.

use crate::world::cell::CellType;
use crate::world::coord::{Coord, Direction};
use crate::world::dungeon::Dungeon;
use crate::world::room::Room;

use super::GenerationError;

/// Connectivity region tag, allocated once per room and per maze tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub u32);

impl RegionId {
    /// Printable symbol for the region debug view
    fn symbol(&self) -> char {
        char::from(33 + (self.0 % 94) as u8)
    }
}

impl std::fmt::Display for RegionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Cell kinds during generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenKind {
    Solid,
    Room,
    Passage,
    Doorway,
    Entrance,
    /// Solid cell bordering two regions; never survives generation
    Connector,
}

impl GenKind {
    pub fn is_navigable(&self) -> bool {
        matches!(
            self,
            GenKind::Room | GenKind::Passage | GenKind::Doorway | GenKind::Entrance
        )
    }

    fn glyph(&self) -> char {
        match self {
            GenKind::Solid => '▓',
            GenKind::Room => '_',
            GenKind::Passage => ' ',
            GenKind::Doorway => '+',
            GenKind::Entrance => '>',
            GenKind::Connector => '!',
        }
    }
}

/// One cell of the working grid
#[derive(Debug, Clone, Copy)]
pub struct GenCell {
    pub kind: GenKind,
    pub coord: Coord,
    pub border: bool,
    /// `None` for rock nothing has claimed yet
    pub region: Option<RegionId>,
}

/// Working grid shared by every stage of one generation run
#[derive(Debug, Clone)]
pub struct GenGrid {
    height: i32,
    width: i32,
    cells: Vec<GenCell>,
    rooms: Vec<Room>,
    next_region: u32,
}

impl GenGrid {
    /// Solid grid with the outer ring flagged as border
    pub fn new(height: i32, width: i32) -> Self {
        let capacity = (height.max(0) as usize).saturating_mul(width.max(0) as usize);
        let mut cells = Vec::with_capacity(capacity);
        for row in 0..height {
            for col in 0..width {
                cells.push(GenCell {
                    kind: GenKind::Solid,
                    coord: Coord::new(row, col),
                    border: row == 0 || col == 0 || row == height - 1 || col == width - 1,
                    region: None,
                });
            }
        }
        Self {
            height,
            width,
            cells,
            rooms: Vec::new(),
            next_region: 1,
        }
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.row >= 0 && coord.row < self.height && coord.col >= 0 && coord.col < self.width
    }

    #[inline]
    fn idx(&self, coord: Coord) -> usize {
        (coord.row * self.width + coord.col) as usize
    }

    pub fn cell(&self, coord: Coord) -> Option<&GenCell> {
        if self.in_bounds(coord) {
            Some(&self.cells[self.idx(coord)])
        } else {
            None
        }
    }

    pub fn kind(&self, coord: Coord) -> Option<GenKind> {
        self.cell(coord).map(|c| c.kind)
    }

    pub fn region(&self, coord: Coord) -> Option<RegionId> {
        self.cell(coord).and_then(|c| c.region)
    }

    /// Set kind and region of a cell. Border cells are never changed.
    pub fn set(&mut self, coord: Coord, kind: GenKind, region: Option<RegionId>) {
        if self.in_bounds(coord) {
            let idx = self.idx(coord);
            let cell = &mut self.cells[idx];
            if !cell.border {
                cell.kind = kind;
                cell.region = region;
            }
        }
    }

    /// Set kind only, keeping the region tag
    pub fn set_kind(&mut self, coord: Coord, kind: GenKind) {
        if let Some(region) = self.cell(coord).map(|c| c.region) {
            self.set(coord, kind, region);
        }
    }

    /// Reseal a cell to untagged rock
    pub fn seal(&mut self, coord: Coord) {
        self.set(coord, GenKind::Solid, None);
    }

    pub fn cells(&self) -> &[GenCell] {
        &self.cells
    }

    /// Row-major coordinates of every cell of one kind
    pub fn coords_of(&self, kind: GenKind) -> Vec<Coord> {
        self.cells
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.coord)
            .collect()
    }

    /// Row-major coordinates of every non-border cell
    pub fn interior(&self) -> impl Iterator<Item = Coord> {
        let (height, width) = (self.height, self.width);
        (1..height - 1).flat_map(move |row| (1..width - 1).map(move |col| Coord::new(row, col)))
    }

    /// Allocate a fresh region id
    pub fn new_region(&mut self) -> RegionId {
        let id = RegionId(self.next_region);
        self.next_region += 1;
        id
    }

    /// Every region id handed out so far, in allocation order
    pub fn allocated_regions(&self) -> impl Iterator<Item = RegionId> {
        (1..self.next_region).map(RegionId)
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Whether `room` fits with its top-left at `top_left`: it may not touch
    /// the border or leave the grid, and its footprint plus a one cell halo
    /// must be solid rock.
    pub fn can_fit(&self, room: &Room, top_left: Coord) -> bool {
        if top_left.row <= 0 || top_left.col <= 0 {
            return false;
        }
        if top_left.row + room.height >= self.height || top_left.col + room.width >= self.width {
            return false;
        }

        for row in top_left.row - 1..=top_left.row + room.height {
            for col in top_left.col - 1..=top_left.col + room.width {
                if self.kind(Coord::new(row, col)) != Some(GenKind::Solid) {
                    return false;
                }
            }
        }
        true
    }

    /// Carve a room that passed [`GenGrid::can_fit`] and take ownership of it
    pub fn carve_room(&mut self, mut room: Room, top_left: Coord) -> RegionId {
        let region = self.new_region();
        room.top_left = top_left;
        for coord in room.cells() {
            self.set(coord, GenKind::Room, Some(region));
        }
        self.rooms.push(room);
        region
    }

    pub fn carve_passage(&mut self, coord: Coord, region: RegionId) {
        self.set(coord, GenKind::Passage, Some(region));
    }

    /// A cell is safe to carve when it is interior rock and none of its eight
    /// neighbours (other than those in `ignore`) is anything but rock, so
    /// carving it can not link two regions by accident.
    pub fn is_safe_carvable(&self, coord: Coord, ignore: &[Coord]) -> bool {
        match self.cell(coord) {
            Some(cell) if !cell.border && cell.kind == GenKind::Solid => {}
            _ => return false,
        }

        coord
            .cardinals()
            .into_iter()
            .chain(coord.diagonals())
            .filter(|n| !ignore.contains(n))
            .all(|n| self.kind(n).map_or(true, |k| k == GenKind::Solid))
    }

    /// Directions the maze can extend into from `coord`, in N, S, E, W order.
    /// The cursor and its own cardinal neighbours belong to the tree being
    /// grown, so they are exempt from the neighbour check.
    pub fn possible_carves(&self, coord: Coord) -> Vec<Direction> {
        let mut ignore = coord.cardinals().to_vec();
        ignore.push(coord);

        Direction::ALL
            .into_iter()
            .filter(|dir| self.is_safe_carvable(coord.step(*dir), &ignore))
            .collect()
    }

    /// Debug view: one symbol per region, `!` for connectors
    pub fn render_regions(&self) -> String {
        let mut out = String::new();
        for (row, line) in self.cells.chunks(self.width.max(1) as usize).enumerate() {
            out.push_str(&format!("{:>4}: ", row));
            for cell in line {
                let symbol = match (cell.kind, cell.region) {
                    (GenKind::Connector, _) => '!',
                    (_, None) => GenKind::Solid.glyph(),
                    (_, Some(region)) => region.symbol(),
                };
                out.push(symbol);
            }
            out.push('\n');
        }
        out
    }

    /// Plain map view, same glyphs as [`Dungeon::render`]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (row, line) in self.cells.chunks(self.width.max(1) as usize).enumerate() {
            out.push_str(&format!("{:>4}: ", row));
            out.extend(line.iter().map(|c| c.kind.glyph()));
            out.push('\n');
        }
        out
    }

    /// Freeze into the final dungeon. A connector left on the grid means a
    /// stage failed to clean up after itself.
    pub fn into_dungeon(self) -> Result<Dungeon, GenerationError> {
        let mut dungeon = Dungeon::new(self.height, self.width);
        for cell in &self.cells {
            let cell_type = match cell.kind {
                GenKind::Solid => continue,
                GenKind::Room => CellType::Room,
                GenKind::Passage => CellType::Passage,
                GenKind::Doorway => CellType::Doorway,
                GenKind::Entrance => CellType::Entrance,
                GenKind::Connector => {
                    return Err(GenerationError::ResidualConnector {
                        row: cell.coord.row,
                        col: cell.coord.col,
                    })
                }
            };
            dungeon.set_cell_type(cell.coord, cell_type);
        }
        for room in self.rooms {
            dungeon.push_room(room);
        }
        Ok(dungeon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(height: i32, width: i32) -> Room {
        Room::new(height, width).unwrap()
    }

    #[test]
    fn test_can_fit_bounds() {
        let grid = GenGrid::new(12, 12);
        assert!(!grid.can_fit(&room(3, 3), Coord::new(0, 4)), "touches border");
        assert!(!grid.can_fit(&room(3, 3), Coord::new(4, 0)), "touches border");
        assert!(!grid.can_fit(&room(3, 3), Coord::new(9, 4)), "runs off the bottom");
        assert!(grid.can_fit(&room(3, 3), Coord::new(8, 8)), "halo may be the border");
        assert!(grid.can_fit(&room(3, 3), Coord::new(1, 1)));
    }

    #[test]
    fn test_can_fit_needs_halo() {
        let mut grid = GenGrid::new(14, 14);
        grid.carve_room(room(3, 3), Coord::new(2, 2));

        // footprint overlap
        assert!(!grid.can_fit(&room(2, 2), Coord::new(3, 3)));
        // directly adjacent, halo would hit the room
        assert!(!grid.can_fit(&room(2, 2), Coord::new(2, 5)));
        // one cell of rock between, halo touches the rock only
        assert!(grid.can_fit(&room(2, 2), Coord::new(2, 6)));
    }

    #[test]
    fn test_carve_room_allocates_region() {
        let mut grid = GenGrid::new(12, 12);
        let a = grid.carve_room(room(2, 2), Coord::new(2, 2));
        let b = grid.carve_room(room(2, 2), Coord::new(6, 6));
        assert_ne!(a, b);
        assert_eq!(grid.room_count(), 2);
        assert_eq!(grid.rooms()[1].top_left, Coord::new(6, 6));
        assert_eq!(grid.region(Coord::new(3, 3)), Some(a));
        assert_eq!(grid.kind(Coord::new(7, 7)), Some(GenKind::Room));
        assert_eq!(grid.allocated_regions().count(), 2);
    }

    #[test]
    fn test_safe_carvable_checks_diagonals() {
        let mut grid = GenGrid::new(10, 10);
        let r = grid.new_region();
        grid.carve_passage(Coord::new(4, 4), r);

        assert!(!grid.is_safe_carvable(Coord::new(5, 5), &[]), "diagonal neighbour");
        assert!(!grid.is_safe_carvable(Coord::new(4, 5), &[]), "cardinal neighbour");
        assert!(grid.is_safe_carvable(Coord::new(4, 6), &[]));
        assert!(grid.is_safe_carvable(Coord::new(5, 5), &[Coord::new(4, 4)]));
        assert!(!grid.is_safe_carvable(Coord::new(0, 5), &[]), "border");
        assert!(!grid.is_safe_carvable(Coord::new(4, 4), &[]), "already carved");
    }

    #[test]
    fn test_possible_carves_from_lone_cell() {
        let mut grid = GenGrid::new(10, 10);
        let r = grid.new_region();
        grid.carve_passage(Coord::new(4, 4), r);
        assert_eq!(grid.possible_carves(Coord::new(4, 4)), Direction::ALL.to_vec());

        // next to the border the outward direction is gone
        grid.carve_passage(Coord::new(1, 4), r);
        let dirs = grid.possible_carves(Coord::new(1, 4));
        assert!(!dirs.contains(&Direction::North));
    }

    #[test]
    fn test_into_dungeon_rejects_connector() {
        let mut grid = GenGrid::new(10, 10);
        grid.set(Coord::new(3, 3), GenKind::Connector, None);
        assert!(matches!(
            grid.clone().into_dungeon(),
            Err(GenerationError::ResidualConnector { row: 3, col: 3 })
        ));

        grid.seal(Coord::new(3, 3));
        let dungeon = grid.into_dungeon().unwrap();
        assert_eq!(dungeon.count(CellType::Solid), 100);
    }

    #[test]
    fn test_render_matches_dungeon_glyphs() {
        let mut grid = GenGrid::new(10, 10);
        let r = grid.new_region();
        grid.carve_passage(Coord::new(2, 2), r);
        grid.set(Coord::new(2, 3), GenKind::Doorway, Some(r));
        assert_eq!(grid.render(), grid.clone().into_dungeon().unwrap().render());
    }

    #[test]
    fn test_render_regions_marks_connectors() {
        let mut grid = GenGrid::new(10, 10);
        let r = grid.new_region();
        grid.carve_passage(Coord::new(2, 2), r);
        grid.set(Coord::new(2, 3), GenKind::Connector, None);
        let text = grid.render_regions();
        let line = text.lines().nth(2).unwrap();
        assert!(line.contains('!'));
        assert!(line.contains(r.symbol()));
    }
}
