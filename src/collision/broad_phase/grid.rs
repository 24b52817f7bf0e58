use rustc_hash::{FxHashMap, FxHashSet};

use super::{BodyBounds, BroadPhase};
use crate::collision::{BodyHandle, ContactPair};
use crate::geometry::Aabb;

/// Inclusive cell-coordinate footprint of an AABB on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellRange {
    min: (i32, i32),
    max: (i32, i32),
}

impl CellRange {
    fn from_aabb(aabb: Aabb, cell_size: f32) -> Self {
        let cell = |v: f32| (v / cell_size).floor() as i32;
        Self {
            min: (cell(aabb.min.x), cell(aabb.min.y)),
            max: (cell(aabb.max.x), cell(aabb.max.y)),
        }
    }

    fn cells(self) -> impl Iterator<Item = (i32, i32)> {
        (self.min.0..=self.max.0)
            .flat_map(move |x| (self.min.1..=self.max.1).map(move |y| (x, y)))
    }
}

/// Spatial hash grid with incremental maintenance.
///
/// A body occupies every cell its AABB touches. Candidate pairs are
/// tracked in a reference-counted map keyed by the pair: the count is the
/// number of cells the two bodies currently share, so a pair disappears
/// exactly when its last shared cell does. Moves recompute only the
/// symmetric difference between the old and new cell footprints.
#[derive(Debug)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: FxHashMap<(i32, i32), Vec<BodyHandle>>,
    /// Pair -> number of cells currently shared
    pair_counts: FxHashMap<ContactPair, u32>,
    footprints: FxHashMap<BodyHandle, CellRange>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        assert!(cell_size > 0.0, "grid cell size must be positive");
        Self {
            cell_size,
            cells: FxHashMap::default(),
            pair_counts: FxHashMap::default(),
            footprints: FxHashMap::default(),
        }
    }

    fn add_to_cell(&mut self, handle: BodyHandle, cell: (i32, i32)) {
        let occupants = self.cells.entry(cell).or_default();
        for &other in occupants.iter() {
            *self
                .pair_counts
                .entry(ContactPair::new(handle, other))
                .or_insert(0) += 1;
        }
        occupants.push(handle);
    }

    fn remove_from_cell(&mut self, handle: BodyHandle, cell: (i32, i32)) {
        let Some(occupants) = self.cells.get_mut(&cell) else {
            return;
        };
        occupants.retain(|&h| h != handle);
        for &other in occupants.iter() {
            let pair = ContactPair::new(handle, other);
            if let Some(count) = self.pair_counts.get_mut(&pair) {
                *count -= 1;
                if *count == 0 {
                    self.pair_counts.remove(&pair);
                }
            }
        }
        if self.cells[&cell].is_empty() {
            self.cells.remove(&cell);
        }
    }
}

impl BroadPhase for SpatialGrid {
    fn on_added(&mut self, handle: BodyHandle, bounds: &BodyBounds) {
        let range = CellRange::from_aabb(bounds.aabb, self.cell_size);
        for cell in range.cells() {
            self.add_to_cell(handle, cell);
        }
        self.footprints.insert(handle, range);
    }

    fn on_removed(&mut self, handle: BodyHandle, _bounds: &BodyBounds) {
        let Some(range) = self.footprints.remove(&handle) else {
            return;
        };
        for cell in range.cells() {
            self.remove_from_cell(handle, cell);
        }
    }

    fn on_updated(&mut self, handle: BodyHandle, bounds: &BodyBounds) {
        let new_range = CellRange::from_aabb(bounds.aabb, self.cell_size);
        let Some(&old_range) = self.footprints.get(&handle) else {
            return;
        };
        if new_range == old_range {
            return;
        }

        let old_cells: FxHashSet<(i32, i32)> = old_range.cells().collect();
        let new_cells: FxHashSet<(i32, i32)> = new_range.cells().collect();

        for &cell in old_cells.difference(&new_cells) {
            self.remove_from_cell(handle, cell);
        }
        for &cell in new_cells.difference(&old_cells) {
            self.add_to_cell(handle, cell);
        }
        self.footprints.insert(handle, new_range);
    }

    fn candidate_pairs(&mut self, pairs: &mut Vec<ContactPair>) {
        pairs.extend(self.pair_counts.keys().copied());
    }

    fn name(&self) -> &'static str {
        "spatial hash grid"
    }
}
