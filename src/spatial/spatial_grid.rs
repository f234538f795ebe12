// Uniform hash grid for radius queries over particle centers.
//
// Space is cut into cubic cells; each occupied cell stores the ids of the
// centers that fall inside it. A query walks the cells overlapped by the AABB
// of the query sphere and runs an exact (inclusive) distance check on their
// members. Construction is O(N); a query costs O(cells visited + k).
//
// The visited cell range is clamped to the occupied range, so a query radius
// much larger than the cell size never walks empty space outside the data.

use crate::spatial::{SpatialIndex, padded_reach};
use glam::f64::DVec3;
use rustc_hash::FxHashMap;

type CellKey = (i32, i32, i32);

/// A sparse uniform grid over a fixed set of centers.
pub struct SpatialGrid {
    cell_size: f64,
    inv_cell_size: f64,
    centers: Vec<DVec3>,
    cells: FxHashMap<CellKey, Vec<usize>>,
    min_cell: CellKey,
    max_cell: CellKey,
}

impl SpatialGrid {
    /// Builds a grid over `centers` with cubic cells of side `cell_size`.
    ///
    /// `cell_size` should be close to the typical query radius; a query then
    /// touches at most 3^3 = 27 cells. Non-positive or non-finite sizes fall
    /// back to `1.0`.
    pub fn from_centers(centers: &[DVec3], cell_size: f64) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            1.0
        };
        let inv_cell_size = 1.0 / cell_size;
        let mut cells: FxHashMap<CellKey, Vec<usize>> = FxHashMap::default();
        let mut min_cell = (i32::MAX, i32::MAX, i32::MAX);
        let mut max_cell = (i32::MIN, i32::MIN, i32::MIN);

        for (i, center) in centers.iter().enumerate() {
            let key = cell_of(*center, inv_cell_size);
            min_cell = (min_cell.0.min(key.0), min_cell.1.min(key.1), min_cell.2.min(key.2));
            max_cell = (max_cell.0.max(key.0), max_cell.1.max(key.1), max_cell.2.max(key.2));
            cells.entry(key).or_default().push(i);
        }

        Self {
            cell_size,
            inv_cell_size,
            centers: centers.to_vec(),
            cells,
            min_cell,
            max_cell,
        }
    }

    /// Picks a cell size for a set of centers when no radius hint exists:
    /// the bounding box edge divided by the cube root of the point count.
    pub fn suggested_cell_size(centers: &[DVec3]) -> f64 {
        let Some(first) = centers.first() else {
            return 1.0;
        };
        let (min, max) = centers
            .iter()
            .fold((*first, *first), |(lo, hi), c| (lo.min(*c), hi.max(*c)));
        let extent = (max - min).max_element();
        let size = extent / (centers.len() as f64).cbrt();
        if size.is_finite() && size > 0.0 { size } else { 1.0 }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of occupied cells.
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }
}

impl SpatialIndex for SpatialGrid {
    fn len(&self) -> usize {
        self.centers.len()
    }

    fn center(&self, id: usize) -> DVec3 {
        self.centers[id]
    }

    fn for_each_within(&self, point: DVec3, radius: f64, f: &mut dyn FnMut(usize)) {
        if self.cells.is_empty() || radius.is_nan() || radius < 0.0 || !point.is_finite() {
            return;
        }
        let reach = DVec3::splat(padded_reach(radius, point.abs().max_element()));
        let lo = cell_of(point - reach, self.inv_cell_size);
        let hi = cell_of(point + reach, self.inv_cell_size);
        let lo = (lo.0.max(self.min_cell.0), lo.1.max(self.min_cell.1), lo.2.max(self.min_cell.2));
        let hi = (hi.0.min(self.max_cell.0), hi.1.min(self.max_cell.1), hi.2.min(self.max_cell.2));
        if lo.0 > hi.0 || lo.1 > hi.1 || lo.2 > hi.2 {
            return;
        }

        let mut visit = |members: &Vec<usize>| {
            for &j in members {
                if point.distance(self.centers[j]) <= radius {
                    f(j);
                }
            }
        };

        let span = |a: i32, b: i32| i64::from(b) - i64::from(a) + 1;
        let range_cells = span(lo.0, hi.0)
            .saturating_mul(span(lo.1, hi.1))
            .saturating_mul(span(lo.2, hi.2));

        // Sparse data under a wide query: scanning the occupied cells is cheaper
        // than walking the (mostly empty) cell range.
        if range_cells > self.cells.len() as i64 {
            for (key, members) in &self.cells {
                let inside = (lo.0..=hi.0).contains(&key.0)
                    && (lo.1..=hi.1).contains(&key.1)
                    && (lo.2..=hi.2).contains(&key.2);
                if inside {
                    visit(members);
                }
            }
            return;
        }

        for gx in lo.0..=hi.0 {
            for gy in lo.1..=hi.1 {
                for gz in lo.2..=hi.2 {
                    if let Some(members) = self.cells.get(&(gx, gy, gz)) {
                        visit(members);
                    }
                }
            }
        }
    }
}

// `as i32` saturates, and floor is monotone, so clamping stays conservative
// even for coordinates far outside the i32 cell range.
fn cell_of(p: DVec3, inv_cell_size: f64) -> CellKey {
    (
        (p.x * inv_cell_size).floor() as i32,
        (p.y * inv_cell_size).floor() as i32,
        (p.z * inv_cell_size).floor() as i32,
    )
}
