//! Room placement
//!
//! Rejection sampling: every attempt picks a random size and a random top-left
//! corner and keeps the room only if it fits with a one cell rock halo.
//! Attempts are independent, there is no backtracking.

use crate::config::GeneratorConfig;
use crate::rng::DungeonRng;
use crate::world::coord::Coord;
use crate::world::room::Room;

use super::grid::GenGrid;

/// Outcome of the placement stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementReport {
    pub placed: usize,
    pub attempts: usize,
}

/// Place rooms until `max_rooms` are carved or `max_room_attempts` run out
pub fn place_rooms(grid: &mut GenGrid, config: &GeneratorConfig, rng: &mut DungeonRng) -> PlacementReport {
    let mut attempts = 0;

    while grid.room_count() < config.max_rooms && attempts < config.max_room_attempts {
        attempts += 1;

        // row/col zero are border, the fit test rejects anything that spills over
        let top_left = Coord::new(
            rng.range(1, grid.height() - 2),
            rng.range(1, grid.width() - 2),
        );
        let height = rng.range(config.room_height.min, config.room_height.max);
        let width = rng.range(config.room_width.min, config.room_width.max);

        let Some(room) = Room::new(height, width) else {
            continue;
        };

        if grid.can_fit(&room, top_left) {
            log::trace!("Room {} carved at {} ({}x{})", grid.room_count() + 1, top_left, height, width);
            grid.carve_room(room, top_left);
        }
    }

    if grid.room_count() < config.max_rooms {
        log::warn!(
            "Placed {} of {} rooms after {} attempts",
            grid.room_count(),
            config.max_rooms,
            attempts
        );
    }

    PlacementReport {
        placed: grid.room_count(),
        attempts,
    }
}
