//! Entrance selection

use crate::rng::DungeonRng;
use crate::world::coord::Coord;

use super::grid::{GenGrid, GenKind};
use super::GenerationError;

/// Turn one passage cell, picked uniformly, into the dungeon entrance
pub fn place_entrance(grid: &mut GenGrid, rng: &mut DungeonRng) -> Result<Coord, GenerationError> {
    let passages = grid.coords_of(GenKind::Passage);
    let Some(&entrance) = rng.choose(&passages) else {
        log::error!("No passage cell left for the entrance");
        return Err(GenerationError::NoPassage);
    };

    grid.set_kind(entrance, GenKind::Entrance);
    log::debug!("Entrance at {} (from {} passage cells)", entrance, passages.len());
    Ok(entrance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::room::Room;

    #[test]
    fn test_entrance_replaces_a_passage() {
        let mut grid = GenGrid::new(8, 8);
        let region = grid.new_region();
        for col in 1..=5 {
            grid.carve_passage(Coord::new(2, col), region);
        }

        let entrance = place_entrance(&mut grid, &mut DungeonRng::new(5)).unwrap();

        assert_eq!(entrance.row, 2);
        assert_eq!(grid.kind(entrance), Some(GenKind::Entrance));
        assert_eq!(grid.region(entrance), Some(region));
        assert_eq!(grid.coords_of(GenKind::Entrance), vec![entrance]);
        assert_eq!(grid.coords_of(GenKind::Passage).len(), 4);
    }

    #[test]
    fn test_same_seed_same_entrance() {
        let mut a = GenGrid::new(10, 10);
        let region = a.new_region();
        for row in 1..=8 {
            a.carve_passage(Coord::new(row, 4), region);
        }
        let mut b = a.clone();

        assert_eq!(
            place_entrance(&mut a, &mut DungeonRng::new(77)).unwrap(),
            place_entrance(&mut b, &mut DungeonRng::new(77)).unwrap()
        );
    }

    #[test]
    fn test_no_passage_is_fatal() {
        let mut grid = GenGrid::new(8, 8);
        grid.carve_room(Room::new(4, 4).unwrap(), Coord::new(2, 2));

        let result = place_entrance(&mut grid, &mut DungeonRng::new(1));
        assert!(matches!(result, Err(GenerationError::NoPassage)));
        assert!(grid.coords_of(GenKind::Entrance).is_empty());
    }
}
