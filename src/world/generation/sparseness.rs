//! Dead end removal
//!
//! Sealing a dead end usually turns its only neighbour into a new dead end,
//! so repeated passes eat corridors back from their tips. A dead end that
//! wins its keep roll is whitelisted and survives every later pass.

use std::collections::HashSet;

use crate::config::GeneratorConfig;
use crate::rng::DungeonRng;
use crate::world::coord::Coord;

use super::grid::{GenGrid, GenKind};

/// Outcome of the sparseness stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SparsenessReport {
    pub passes: u32,
    pub sealed: usize,
    pub kept: usize,
    /// Pass cap reached while dead ends were still being found
    pub capped: bool,
}

/// A passage cell with exactly one passage neighbour and no doorway neighbour
pub fn is_dead_end(grid: &GenGrid, coord: Coord) -> bool {
    if grid.kind(coord) != Some(GenKind::Passage) {
        return false;
    }
    let mut passages = 0;
    for n in coord.cardinals() {
        match grid.kind(n) {
            Some(GenKind::Passage) => passages += 1,
            Some(GenKind::Doorway) => return false,
            _ => {}
        }
    }
    passages == 1
}

/// Every dead end on the grid, row-major
pub fn dead_ends(grid: &GenGrid) -> Vec<Coord> {
    grid.coords_of(GenKind::Passage)
        .into_iter()
        .filter(|c| is_dead_end(grid, *c))
        .collect()
}

pub fn reduce_sparseness(grid: &mut GenGrid, config: &GeneratorConfig, rng: &mut DungeonRng) -> SparsenessReport {
    let mut report = SparsenessReport::default();
    let mut whitelist: HashSet<Coord> = HashSet::new();

    loop {
        if config.max_sparseness_passes.is_some_and(|cap| report.passes >= cap) {
            report.capped = !dead_ends(grid).is_empty();
            break;
        }

        let found = dead_ends(grid);
        if found.is_empty() {
            break;
        }
        report.passes += 1;

        let mut sealed = 0;
        for coord in found {
            if rng.percent() < config.chance_keep_dead_end {
                if whitelist.insert(coord) {
                    report.kept += 1;
                }
            } else if !whitelist.contains(&coord) {
                grid.seal(coord);
                sealed += 1;
            }
        }
        report.sealed += sealed;
        log::trace!("Sparseness pass {} sealed {} cells", report.passes, sealed);

        // every dead end left is whitelisted, another pass changes nothing
        if sealed == 0 {
            break;
        }
    }

    if report.capped {
        log::warn!(
            "Sparseness stopped at the {} pass cap with dead ends remaining",
            report.passes
        );
    }
    report
}
