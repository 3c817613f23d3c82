//! Procedural dungeon generation
//!
//! Rooms and mazes: scatter rooms, fill the rock between them with mazes,
//! connect everything into one region, trim dead ends, pick an entrance.
//! Every stage works on one [`GenGrid`] and draws from one [`DungeonRng`],
//! so a seed and a config reproduce the same dungeon.

pub mod connect;
pub mod entrance;
pub mod grid;
pub mod maze;
pub mod rooms;
pub mod sparseness;

pub use connect::ConnectReport;
pub use grid::{GenGrid, GenKind, RegionId};
pub use rooms::PlacementReport;
pub use sparseness::SparsenessReport;

use thiserror::Error;

use crate::config::{ConfigError, GeneratorConfig};
use crate::rng::DungeonRng;
use crate::world::coord::Coord;
use crate::world::dungeon::Dungeon;

/// Errors that abort a generation run
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("region {region} could not be connected to the rest of the dungeon")]
    UnbridgeableRegion { region: u32 },

    #[error("no passage cell left to place the entrance on")]
    NoPassage,

    #[error("connector left at ({row}, {col}) after generation")]
    ResidualConnector { row: i32, col: i32 },
}

/// Per stage statistics of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationStats {
    pub seed: u64,
    pub rooms: PlacementReport,
    pub maze_trees: usize,
    pub connect: ConnectReport,
    pub sparseness: SparsenessReport,
    pub entrance: Coord,
}

/// Generate a dungeon with a fresh RNG seeded from `seed`
pub fn generate(config: &GeneratorConfig, seed: u64) -> Result<Dungeon, GenerationError> {
    generate_dungeon(config, &mut DungeonRng::new(seed))
}

/// Run every stage and freeze the result
pub fn generate_dungeon(config: &GeneratorConfig, rng: &mut DungeonRng) -> Result<Dungeon, GenerationError> {
    generate_with_stats(config, rng).map(|(dungeon, _)| dungeon)
}

/// Same as [`generate_dungeon`], also returning what each stage did
pub fn generate_with_stats(
    config: &GeneratorConfig,
    rng: &mut DungeonRng,
) -> Result<(Dungeon, GenerationStats), GenerationError> {
    config.validate()?;

    let seed = rng.seed();
    let result = run_stages(config, rng);

    match &result {
        Ok((dungeon, stats)) => log::info!(
            "Generated {}x{} dungeon with {} rooms from seed {} (entrance {})",
            dungeon.height(),
            dungeon.width(),
            dungeon.room_count(),
            seed,
            stats.entrance
        ),
        Err(e) => log::error!("Generation failed for seed {}: {} ({:?})", seed, e, config),
    }
    result
}

fn run_stages(
    config: &GeneratorConfig,
    rng: &mut DungeonRng,
) -> Result<(Dungeon, GenerationStats), GenerationError> {
    let mut grid = GenGrid::new(config.height, config.width);

    log::debug!("Stage 1: carve rooms");
    let placement = rooms::place_rooms(&mut grid, config, rng);
    log::debug!("Placed {} rooms in {} attempts", placement.placed, placement.attempts);

    log::debug!("Stage 2: carve passages");
    let maze_trees = maze::carve_passages(&mut grid, config, rng);
    log::debug!("Grew {} maze trees", maze_trees);

    log::debug!("Stage 3: connect regions");
    let connect = connect::connect_regions(&mut grid, config, rng)?;

    log::debug!("Stage 4: reduce sparseness");
    let sparseness = sparseness::reduce_sparseness(&mut grid, config, rng);
    log::debug!(
        "Sealed {} dead end cells in {} passes ({} kept)",
        sparseness.sealed,
        sparseness.passes,
        sparseness.kept
    );
    if log::log_enabled!(log::Level::Trace) {
        log::trace!("Grid before entrance placement:\n{}", grid.render());
    }

    log::debug!("Stage 5: place entrance");
    let entrance = entrance::place_entrance(&mut grid, rng)?;

    let stats = GenerationStats {
        seed: rng.seed(),
        rooms: placement,
        maze_trees,
        connect,
        sparseness,
        entrance,
    };
    Ok((grid.into_dungeon()?, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SizeRange;
    use crate::world::cell::CellType;

    #[test]
    fn test_invalid_config_fails_before_generation() {
        let config = GeneratorConfig {
            height: 4,
            ..GeneratorConfig::default()
        };
        let result = generate(&config, 1);
        assert!(matches!(result, Err(GenerationError::Config(ConfigError::HeightTooSmall { .. }))));
    }

    /// Generate seeds 0..10, allowing at most one topology failure, and
    /// return the first success
    fn first_success(config: &GeneratorConfig) -> (Dungeon, GenerationStats) {
        let results: Vec<_> = (0..10)
            .map(|seed| generate_with_stats(config, &mut DungeonRng::new(seed)))
            .collect();
        let failures = results.iter().filter(|r| r.is_err()).count();
        assert!(failures <= 1, "{} of 10 seeds failed", failures);
        results
            .into_iter()
            .find_map(Result::ok)
            .expect("a seed generates")
    }

    #[test]
    fn test_default_dungeon_is_connected() {
        let (dungeon, _) = first_success(&GeneratorConfig::default());

        let entrance = dungeon.entrance().expect("entrance").coord;
        let reached = dungeon.reachable_from(entrance);
        let carved = dungeon.cells().iter().filter(|c| c.is_navigable()).count();
        assert_eq!(reached.len(), carved);
        assert_eq!(dungeon.count(CellType::Entrance), 1);
        assert!(dungeon.room_count() > 0);
    }

    #[test]
    fn test_stats_match_dungeon() {
        let (dungeon, stats) = first_success(&GeneratorConfig::default());

        assert_eq!(stats.rooms.placed, dungeon.room_count());
        assert_eq!(dungeon.entrance().map(|c| c.coord), Some(stats.entrance));
        assert!(stats.maze_trees >= 1);
        assert!(stats.connect.merges >= 1);
        assert_eq!(generate(&GeneratorConfig::default(), stats.seed).ok(), Some(dungeon));
    }

    #[test]
    fn test_same_seed_same_dungeon() {
        let config = GeneratorConfig {
            room_height: SizeRange::new(3, 6),
            room_width: SizeRange::new(3, 10),
            ..GeneratorConfig::default()
        };
        for seed in 0..4 {
            assert_eq!(generate(&config, seed).ok(), generate(&config, seed).ok());
        }
    }
}
