//! Region connection
//!
//! After rooms and mazes are carved the grid is a set of disjoint regions
//! separated by rock. Rock cells that sit between two different regions are
//! marked as connectors; one room's region is then grown by opening a
//! connector into a neighbouring region, merging it in, and tidying up the
//! connectors the merge made redundant, until nothing is left outside it.
//!
//! Merges go through a union-find over region ids, so cell tags are only
//! rewritten once at the end.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::GeneratorConfig;
use crate::rng::DungeonRng;
use crate::world::coord::{Coord, Direction};

use super::grid::{GenGrid, GenKind, RegionId};
use super::GenerationError;

/// Disjoint sets over region ids
#[derive(Debug, Clone)]
struct RegionSets {
    parent: Vec<u32>,
}

impl RegionSets {
    fn new(region_count: usize) -> Self {
        Self {
            parent: (0..=region_count as u32).collect(),
        }
    }

    fn find(&mut self, region: RegionId) -> RegionId {
        let mut root = region.0;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        // path compression
        let mut node = region.0;
        while self.parent[node as usize] != root {
            let next = self.parent[node as usize];
            self.parent[node as usize] = root;
            node = next;
        }
        RegionId(root)
    }

    /// Reparent the root of `from` under the root of `into`
    fn union_into(&mut self, from: RegionId, into: RegionId) -> Option<(RegionId, RegionId)> {
        let from = self.find(from);
        let into = self.find(into);
        if from == into {
            return None;
        }
        self.parent[from.0 as usize] = into.0;
        Some((from, into))
    }
}

/// Connector bookkeeping: which regions each connector bridges, and which
/// connectors touch each (root) region
#[derive(Debug, Clone)]
pub struct ConnectorTable {
    sides: BTreeMap<Coord, [RegionId; 2]>,
    by_region: BTreeMap<RegionId, BTreeSet<Coord>>,
    sets: RegionSets,
}

impl ConnectorTable {
    pub fn new(region_count: usize) -> Self {
        Self {
            sides: BTreeMap::new(),
            by_region: BTreeMap::new(),
            sets: RegionSets::new(region_count),
        }
    }

    pub fn insert(&mut self, coord: Coord, a: RegionId, b: RegionId) {
        self.sides.insert(coord, [a, b]);
        for side in [a, b] {
            let root = self.sets.find(side);
            self.by_region.entry(root).or_default().insert(coord);
        }
    }

    pub fn len(&self) -> usize {
        self.sides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sides.is_empty()
    }

    /// Current root of a region
    pub fn find(&mut self, region: RegionId) -> RegionId {
        self.sets.find(region)
    }

    /// Connectors between `main` and some other region, in coordinate order
    pub fn bridging(&mut self, main: RegionId) -> Vec<Coord> {
        let main = self.find(main);
        let Some(coords) = self.by_region.get(&main).cloned() else {
            return Vec::new();
        };
        coords
            .into_iter()
            .filter(|coord| self.across(*coord, main).is_some())
            .collect()
    }

    /// The region on the far side of a connector from `from`, if different
    pub fn across(&mut self, coord: Coord, from: RegionId) -> Option<RegionId> {
        let [a, b] = *self.sides.get(&coord)?;
        let from = self.find(from);
        [a, b]
            .into_iter()
            .map(|side| self.find(side))
            .find(|root| *root != from)
    }

    /// Connectors that bridge exactly these two regions
    pub fn shared(&mut self, a: RegionId, b: RegionId) -> Vec<Coord> {
        let a = self.find(a);
        let b = self.find(b);
        match (self.by_region.get(&a), self.by_region.get(&b)) {
            (Some(sa), Some(sb)) => sa.intersection(sb).copied().collect(),
            _ => Vec::new(),
        }
    }

    /// Collapse `from` into `into`: every connector referencing `from` now
    /// references `into`
    pub fn merge(&mut self, from: RegionId, into: RegionId) -> bool {
        let Some((from, into)) = self.sets.union_into(from, into) else {
            return false;
        };
        if let Some(coords) = self.by_region.remove(&from) {
            self.by_region.entry(into).or_default().extend(coords);
        }
        true
    }

    /// Drop a connector, returning the regions it bridged
    pub fn remove(&mut self, coord: Coord) -> Option<[RegionId; 2]> {
        let sides = self.sides.remove(&coord)?;
        for side in sides {
            let root = self.sets.find(side);
            if let Some(set) = self.by_region.get_mut(&root) {
                set.remove(&coord);
                if set.is_empty() {
                    self.by_region.remove(&root);
                }
            }
        }
        Some(sides)
    }

    /// Every connector still in the table
    pub fn coords(&self) -> Vec<Coord> {
        self.sides.keys().copied().collect()
    }
}

/// Outcome of the connection stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectReport {
    pub connectors: usize,
    pub merges: usize,
    pub bridges: usize,
    /// Bridges that had to leave a corner-only contact behind
    pub loose_bridges: usize,
    pub extra_doorways: usize,
    pub main_region: Option<RegionId>,
}

/// Mark every rock cell that borders two different regions as a connector.
/// East/West is checked first, North/South only when East/West is not a
/// differing pair.
pub fn detect_connectors(grid: &mut GenGrid) -> ConnectorTable {
    let mut table = ConnectorTable::new(grid.allocated_regions().count());
    let interior: Vec<Coord> = grid.interior().collect();

    for coord in interior {
        if grid.kind(coord) != Some(GenKind::Solid) {
            continue;
        }

        let pair = |a: Coord, b: Coord| match (grid.region(a), grid.region(b)) {
            (Some(x), Some(y)) if x != y => Some((x, y)),
            _ => None,
        };
        let east_west = pair(coord.step(Direction::East), coord.step(Direction::West));
        let found = east_west
            .or_else(|| pair(coord.step(Direction::North), coord.step(Direction::South)));

        if let Some((a, b)) = found {
            grid.set(coord, GenKind::Connector, None);
            table.insert(coord, a, b);
        }
    }

    table
}

/// Join every region into one
pub fn connect_regions(
    grid: &mut GenGrid,
    config: &GeneratorConfig,
    rng: &mut DungeonRng,
) -> Result<ConnectReport, GenerationError> {
    let mut table = detect_connectors(grid);
    let mut report = ConnectReport {
        connectors: table.len(),
        ..ConnectReport::default()
    };
    log::debug!("Found {} connectors", table.len());
    if log::log_enabled!(log::Level::Trace) {
        log::trace!("Regions after connector detection:\n{}", grid.render_regions());
    }

    let Some(main) = pick_main_region(grid, rng) else {
        return Ok(report);
    };
    report.main_region = Some(main);

    while let Some(stray) = unmerged_region(grid, &mut table, main) {
        let candidates = table.bridging(main);

        let (opened, redundant, mut doorways) = if candidates.is_empty() {
            // nothing touches the main region directly, dig a short corridor
            let (away, clean) = bridge_isolated(grid, &mut table, main, stray, rng)?;
            report.bridges += 1;
            if !clean {
                report.loose_bridges += 1;
            }
            (away, Vec::new(), Vec::new())
        } else {
            let selected = candidates[rng.index(candidates.len())];
            grid.set(selected, GenKind::Doorway, Some(main));
            let opened = table
                .across(selected, main)
                .ok_or(GenerationError::UnbridgeableRegion { region: stray.0 })?;
            let redundant = table.shared(main, opened);
            table.remove(selected);
            (opened, redundant, vec![selected])
        };

        table.merge(opened, main);
        report.merges += 1;

        // both sides of these are already merged, so opening one adds a loop
        for coord in redundant {
            if table.remove(coord).is_none() {
                continue;
            }

            if doorways.iter().any(|d| d.touches(&coord)) {
                // no double doors
                grid.seal(coord);
            } else if rng.percent() < config.chance_extra_doorway {
                grid.set(coord, GenKind::Doorway, Some(main));
                doorways.push(coord);
                report.extra_doorways += 1;
            } else {
                grid.seal(coord);
            }
        }
    }

    // anything left only ever bridged regions that are now the same one
    if !table.is_empty() {
        log::trace!("Sealing {} leftover connectors", table.len());
    }
    for coord in table.coords() {
        table.remove(coord);
        grid.seal(coord);
    }

    normalize_regions(grid, &mut table);

    log::debug!(
        "Merged {} regions into {} ({} bridges, {} extra doorways)",
        report.merges,
        main,
        report.bridges,
        report.extra_doorways
    );
    Ok(report)
}

/// Region of a random room, or of a random region when no room was placed
fn pick_main_region(grid: &GenGrid, rng: &mut DungeonRng) -> Option<RegionId> {
    if grid.room_count() > 0 {
        let room = &grid.rooms()[rng.index(grid.room_count())];
        return grid.region(room.top_left);
    }
    let regions: Vec<RegionId> = grid.allocated_regions().collect();
    rng.choose(&regions).copied()
}

/// First region (in allocation order) not yet merged into `main`
fn unmerged_region(grid: &GenGrid, table: &mut ConnectorTable, main: RegionId) -> Option<RegionId> {
    let main = table.find(main);
    grid.allocated_regions().find(|r| table.find(*r) != main)
}

/// One side of a bridge: the rock cell to open and the navigable cell it
/// leads to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Flank {
    cell: Coord,
    reach: Coord,
    reached: GenKind,
}

/// Carve a three cell corridor from the main region to some other region
/// through a rock cell whose four sides are all rock. Used when no single
/// connector touches the main region, e.g. when two regions are two cells
/// apart.
///
/// Corridors that would leave two open cells touching only at a corner are
/// avoided; one is carved only when the whole grid offers nothing better.
/// Returns the region reached and whether the corridor was clean.
fn bridge_isolated(
    grid: &mut GenGrid,
    table: &mut ConnectorTable,
    main: RegionId,
    stray: RegionId,
    rng: &mut DungeonRng,
) -> Result<(RegionId, bool), GenerationError> {
    let candidates: Vec<Coord> = grid.interior().collect();
    let mut fallback = None;

    for coord in candidates {
        let Some((home, away)) = bridge_options(grid, table, main, coord) else {
            continue;
        };

        let clean: Vec<(Flank, Flank, RegionId)> = home
            .iter()
            .flat_map(|h| away.iter().map(move |(a, region)| (*h, *a, *region)))
            .filter(|(h, a, _)| corridor_is_clean(&*grid, coord, h, a))
            .collect();
        if !clean.is_empty() {
            let (home_flank, away_flank, away_region) = clean[rng.index(clean.len())];
            carve_bridge(grid, main, coord, home_flank, away_flank);
            log::debug!("Bridged {} to {} through {}", main, away_region, coord);
            return Ok((away_region, true));
        }

        if fallback.is_none() {
            fallback = Some((coord, home, away));
        }
    }

    let Some((coord, home, away)) = fallback else {
        log::error!("No bridge found for region {} into {}", stray, main);
        return Err(GenerationError::UnbridgeableRegion { region: stray.0 });
    };

    let home_flank = home[rng.index(home.len())];
    let (away_flank, away_region) = away[rng.index(away.len())];
    carve_bridge(grid, main, coord, home_flank, away_flank);
    log::warn!(
        "Bridged {} to {} through {}, corridor touches other cells diagonally",
        main,
        away_region,
        coord
    );
    Ok((away_region, false))
}

/// Flanks into the main region, and flanks into other regions with their root
type BridgeOptions = (Vec<Flank>, Vec<(Flank, RegionId)>);

/// Bridge options around `coord`, or `None` when `coord` is not enclosed
/// rock or one side has nothing to reach
fn bridge_options(
    grid: &GenGrid,
    table: &mut ConnectorTable,
    main: RegionId,
    coord: Coord,
) -> Option<BridgeOptions> {
    let enclosed = grid.kind(coord) == Some(GenKind::Solid)
        && coord.cardinals().iter().all(|n| {
            grid.cell(*n)
                .map_or(false, |c| c.kind == GenKind::Solid && !c.border)
        });
    if !enclosed {
        return None;
    }

    let mut home = Vec::new();
    let mut away = Vec::new();
    for cell in coord.cardinals() {
        for reach in cell.cardinals() {
            let Some(target) = grid.cell(reach) else { continue };
            let Some(region) = target.region.filter(|_| target.kind.is_navigable()) else {
                continue;
            };
            let flank = Flank {
                cell,
                reach,
                reached: target.kind,
            };
            let root = table.find(region);
            if root == main {
                home.push(flank);
            } else {
                away.push((flank, root));
            }
        }
    }

    if home.is_empty() || away.is_empty() {
        None
    } else {
        Some((home, away))
    }
}

/// Whether carving `center` and both flanks keeps every diagonal contact
/// backed by an orthogonal one, and keeps passages out of rooms
fn corridor_is_clean(grid: &GenGrid, center: Coord, home: &Flank, away: &Flank) -> bool {
    let carved = [center, home.cell, away.cell];
    let open = |c: Coord| carved.contains(&c) || grid.kind(c).map_or(false, |k| k.is_navigable());

    // rooms are entered through doorways only
    let passage_into_room = [home, away].into_iter().any(|flank| {
        flank_kind(flank.reached) == GenKind::Passage
            && flank
                .cell
                .cardinals()
                .iter()
                .any(|n| grid.kind(*n) == Some(GenKind::Room))
    });
    if passage_into_room {
        return false;
    }

    carved.iter().all(|cell| {
        cell.diagonals().iter().all(|d| {
            !open(*d) || open(Coord::new(cell.row, d.col)) || open(Coord::new(d.row, cell.col))
        })
    })
}

fn carve_bridge(grid: &mut GenGrid, main: RegionId, center: Coord, home: Flank, away: Flank) {
    grid.set(center, GenKind::Passage, Some(main));
    grid.set(home.cell, flank_kind(home.reached), Some(main));
    grid.set(away.cell, flank_kind(away.reached), Some(main));
    log::trace!(
        "Bridge flanks {} -> {} and {} -> {}",
        home.cell,
        home.reach,
        away.cell,
        away.reach
    );
}

/// Corridor cells next to a passage continue it, next to anything else they are doors
fn flank_kind(reached: GenKind) -> GenKind {
    if reached == GenKind::Passage {
        GenKind::Passage
    } else {
        GenKind::Doorway
    }
}

/// Rewrite every region tag to its merged root
fn normalize_regions(grid: &mut GenGrid, table: &mut ConnectorTable) {
    let tagged: Vec<(Coord, GenKind, RegionId)> = grid
        .cells()
        .iter()
        .filter_map(|c| c.region.map(|r| (c.coord, c.kind, r)))
        .collect();
    for (coord, kind, region) in tagged {
        let root = table.find(region);
        if root != region {
            grid.set(coord, kind, Some(root));
        }
    }
}
