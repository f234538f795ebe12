// Radius queries over particle centers.
//
// Indexes only know about centers. Particle radii are folded into the query
// radius by the caller, so one index serves every search bound.

pub mod kd_tree;
pub mod spatial_grid;

use crate::error::{ContactError, Result};
use glam::f64::DVec3;
use serde::{Deserialize, Serialize};

pub use kd_tree::KdTree;
pub use spatial_grid::SpatialGrid;

/// Read-only index answering "which centers lie within `radius` of `point`".
///
/// Implementations must not produce false negatives: every indexed center at
/// distance `<= radius` (as computed by [`DVec3::distance`]) is reported,
/// including a center that coincides with `point`. A negative or NaN radius
/// yields nothing, as does an index over zero points.
pub trait SpatialIndex: Send + Sync {
    /// Number of indexed centers.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Center of the indexed point `id`.
    fn center(&self, id: usize) -> DVec3;

    /// Calls `f(id)` once for every center within `radius` of `point`.
    fn for_each_within(&self, point: DVec3, radius: f64, f: &mut dyn FnMut(usize));

    /// Collects the ids of every center within `radius` of `point`, in no
    /// particular order.
    fn query_within(&self, point: DVec3, radius: f64) -> Vec<usize> {
        let mut found = Vec::new();
        self.for_each_within(point, radius, &mut |id| found.push(id));
        found
    }

    /// Closest indexed center to `point` and its distance. Equal distances
    /// resolve to the lowest id.
    ///
    /// The default implementation is a linear scan.
    fn nearest(&self, point: DVec3) -> Result<(usize, f64)> {
        if self.is_empty() {
            return Err(ContactError::EmptyIndex);
        }
        if !point.is_finite() {
            return Err(ContactError::NonFiniteQuery(point.to_array()));
        }
        let mut best = (0, point.distance(self.center(0)));
        for id in 1..self.len() {
            let d = point.distance(self.center(id));
            if d < best.1 {
                best = (id, d);
            }
        }
        Ok(best)
    }
}

/// Which index structure a search builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    /// Median-split k-d tree, O(N log N) construction.
    #[default]
    KdTree,
    /// Uniform hash grid, O(N) construction.
    Grid,
}

/// Tuning passed to [`build_index`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexParams {
    pub kind: IndexKind,
    /// Grid cell edge; `None` picks one from the data.
    pub cell_size: Option<f64>,
    pub leaf_size: usize,
}

impl Default for IndexParams {
    fn default() -> Self {
        Self {
            kind: IndexKind::default(),
            cell_size: None,
            leaf_size: kd_tree::DEFAULT_LEAF_SIZE,
        }
    }
}

/// Builds the configured index over `centers`.
///
/// `max_radius` feeds the default grid cell size (`2 * max_radius`, the
/// diameter of the largest sphere); when it is zero the cell size is derived
/// from the point spread instead.
pub fn build_index(
    centers: &[DVec3],
    max_radius: f64,
    params: &IndexParams,
) -> Box<dyn SpatialIndex> {
    match params.kind {
        IndexKind::KdTree => Box::new(KdTree::with_leaf_size(centers, params.leaf_size)),
        IndexKind::Grid => {
            let cell_size = params.cell_size.unwrap_or_else(|| {
                if max_radius > 0.0 {
                    2.0 * max_radius
                } else {
                    SpatialGrid::suggested_cell_size(centers)
                }
            });
            log::debug!("building grid over {} centers, cell size {cell_size}", centers.len());
            Box::new(SpatialGrid::from_centers(centers, cell_size))
        }
    }
}

/// Query radius widened by a few ulps of the values involved, so that cell and
/// split-plane pruning never discards a center the exact distance test accepts.
pub(crate) fn padded_reach(radius: f64, magnitude: f64) -> f64 {
    radius + 4.0 * f64::EPSILON * (radius + magnitude)
}
