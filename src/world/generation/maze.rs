//! Passage carving
//!
//! Fills every pocket of rock left after room placement with a perfect maze
//! using the growing tree algorithm. Each tree gets its own region id.
//!
//! Growing tree keeps a pile of carved cells, repeatedly picks one and carves
//! into an unmade neighbour, dropping the cell from the pile once it has none
//! left. How the cell is picked sets the texture: always taking the newest
//! makes it a recursive backtracker (long winding corridors), taking the
//! oldest or a random one gives short, branchy mazes. We always take the
//! newest.

use crate::config::GeneratorConfig;
use crate::rng::DungeonRng;
use crate::world::coord::{Coord, Direction};

use super::grid::{GenGrid, RegionId};

/// Scan the interior in row-major order and grow a tree from every cell that
/// is still safe to carve. Returns the number of trees grown.
pub fn carve_passages(grid: &mut GenGrid, config: &GeneratorConfig, rng: &mut DungeonRng) -> usize {
    let mut trees = 0;
    let seeds: Vec<Coord> = grid.interior().collect();

    for coord in seeds {
        if grid.is_safe_carvable(coord, &[]) {
            let region = grid.new_region();
            let carved = grow_tree(grid, coord, region, config, rng);
            log::trace!("Tree {} from {} carved {} cells", region, coord, carved);
            trees += 1;
        }
    }

    trees
}

/// Grow one maze tree from `start`. Returns the number of cells carved.
pub fn grow_tree(
    grid: &mut GenGrid,
    start: Coord,
    region: RegionId,
    config: &GeneratorConfig,
    rng: &mut DungeonRng,
) -> usize {
    grid.carve_passage(start, region);
    let mut pile = vec![start];
    let mut previous: Option<Direction> = None;
    let mut carved = 1;

    while let Some(&cursor) = pile.last() {
        let options = grid.possible_carves(cursor);

        if options.is_empty() {
            // exhausted
            pile.pop();
            continue;
        }

        let roll = rng.percent();
        let direction = match previous {
            Some(dir) if options.contains(&dir) && roll < config.chance_maintain_direction => dir,
            _ => options[rng.index(options.len())],
        };
        previous = Some(direction);

        let next = cursor.step(direction);
        grid.carve_passage(next, region);
        pile.push(next);
        carved += 1;
    }

    carved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::generation::grid::GenKind;
    use crate::world::generation::rooms::place_rooms;

    /// No two carved cells from different regions may touch, even diagonally
    fn assert_regions_isolated(grid: &GenGrid) {
        for cell in grid.cells() {
            let Some(region) = cell.region else { continue };
            for n in cell.coord.cardinals().into_iter().chain(cell.coord.diagonals()) {
                if let Some(other) = grid.region(n) {
                    assert_eq!(other, region, "{} touches {}", cell.coord, n);
                }
            }
        }
    }

    #[test]
    fn test_single_tree_fills_empty_grid() {
        let config = GeneratorConfig::default();
        let mut grid = GenGrid::new(15, 21);
        let trees = carve_passages(&mut grid, &config, &mut DungeonRng::new(3));

        assert!(trees >= 1);
        let passages = grid.coords_of(GenKind::Passage);
        assert!(passages.len() > 20);
        assert_eq!(grid.region(Coord::new(1, 1)), Some(RegionId(1)), "first seed is the first interior cell");
        assert_regions_isolated(&grid);
    }

    #[test]
    fn test_maze_never_touches_rooms() {
        let config = GeneratorConfig::default();
        let mut grid = GenGrid::new(config.height, config.width);
        let mut rng = DungeonRng::new(21);
        place_rooms(&mut grid, &config, &mut rng);
        let trees = carve_passages(&mut grid, &config, &mut rng);

        assert!(trees >= 1);
        assert_regions_isolated(&grid);
        for cell in grid.cells().iter().filter(|c| c.border) {
            assert_eq!(cell.kind, GenKind::Solid);
        }
    }

    #[test]
    fn test_maze_is_a_tree() {
        // a perfect maze on an empty grid: cells - 1 == cardinal adjacencies
        let config = GeneratorConfig::default();
        let mut grid = GenGrid::new(12, 12);
        let mut rng = DungeonRng::new(8);
        let region = grid.new_region();
        let carved = grow_tree(&mut grid, Coord::new(1, 1), region, &config, &mut rng);

        let passages = grid.coords_of(GenKind::Passage);
        assert_eq!(passages.len(), carved);

        let mut edges = 0;
        for c in &passages {
            for dir in [Direction::South, Direction::East] {
                if grid.kind(c.step(dir)) == Some(GenKind::Passage) {
                    edges += 1;
                }
            }
        }
        assert_eq!(edges + 1, carved);
    }

    #[test]
    fn test_nothing_left_to_seed_after_carving() {
        let config = GeneratorConfig::default();
        let mut grid = GenGrid::new(20, 20);
        carve_passages(&mut grid, &config, &mut DungeonRng::new(4));
        assert!(grid.interior().all(|c| !grid.is_safe_carvable(c, &[])));
    }
}
