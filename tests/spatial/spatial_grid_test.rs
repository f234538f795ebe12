// Tests for the uniform hash grid.
//
// Covers empty and degenerate inputs, inclusive boundaries, negative
// coordinates, and agreement with brute-force enumeration.

use crate::common::{brute_force_within, random_particles};
use glam::f64::DVec3;
use sphere_contacts::spatial::{SpatialGrid, SpatialIndex};

fn sorted(mut ids: Vec<usize>) -> Vec<usize> {
    ids.sort_unstable();
    ids
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn empty_grid_never_returns_candidates() {
    let grid = SpatialGrid::from_centers(&[], 2.0);
    assert!(grid.is_empty());
    assert_eq!(grid.num_cells(), 0);
    assert!(grid.query_within(DVec3::ZERO, 100.0).is_empty());
}

#[test]
fn invalid_cell_size_falls_back_to_unit() {
    let grid = SpatialGrid::from_centers(&[DVec3::ZERO], 0.0);
    assert_eq!(grid.cell_size(), 1.0);
    let grid = SpatialGrid::from_centers(&[DVec3::ZERO], f64::NAN);
    assert_eq!(grid.cell_size(), 1.0);
}

#[test]
fn suggested_cell_size_handles_degenerate_sets() {
    assert_eq!(SpatialGrid::suggested_cell_size(&[]), 1.0);
    assert_eq!(SpatialGrid::suggested_cell_size(&[DVec3::ONE, DVec3::ONE]), 1.0);
    // 8 points spanning 4 units on the widest axis: 4 / cbrt(8) = 2.
    let centers: Vec<DVec3> = (0..8).map(|i| DVec3::new(i as f64 * 4.0 / 7.0, 0.0, 0.0)).collect();
    assert!((SpatialGrid::suggested_cell_size(&centers) - 2.0).abs() < 1e-12);
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn query_includes_coinciding_center() {
    let centers = vec![DVec3::new(1.0, 2.0, 3.0), DVec3::new(9.0, 9.0, 9.0)];
    let grid = SpatialGrid::from_centers(&centers, 2.0);
    assert_eq!(grid.query_within(centers[0], 0.0), vec![0]);
}

#[test]
fn boundary_distance_is_inclusive() {
    let centers = vec![DVec3::ZERO, DVec3::new(5.0, 0.0, 0.0)];
    let grid = SpatialGrid::from_centers(&centers, 5.0);
    assert_eq!(sorted(grid.query_within(DVec3::ZERO, 5.0)), vec![0, 1]);
    assert_eq!(grid.query_within(DVec3::ZERO, 4.999), vec![0]);
}

#[test]
fn point_outside_bounds_returns_nothing() {
    let centers = vec![DVec3::ZERO, DVec3::ONE];
    let grid = SpatialGrid::from_centers(&centers, 1.0);
    assert!(grid.query_within(DVec3::splat(100.0), 3.0).is_empty());
}

#[test]
fn negative_or_nan_radius_returns_nothing() {
    let grid = SpatialGrid::from_centers(&[DVec3::ZERO], 1.0);
    assert!(grid.query_within(DVec3::ZERO, -1.0).is_empty());
    assert!(grid.query_within(DVec3::ZERO, f64::NAN).is_empty());
}

#[test]
fn negative_coordinates() {
    let centers = vec![
        DVec3::new(-5.0, -3.0, -1.0),
        DVec3::new(-4.0, -3.0, -1.0),
        DVec3::new(10.0, 10.0, 10.0),
    ];
    let grid = SpatialGrid::from_centers(&centers, 3.0);
    assert_eq!(sorted(grid.query_within(centers[0], 3.0)), vec![0, 1]);
    assert_eq!(grid.query_within(centers[2], 3.0), vec![2]);
}

#[test]
fn neighbors_across_cell_boundaries() {
    // Cell size 5: the two points sit in adjacent cells, 0.2 apart.
    let centers = vec![DVec3::new(4.9, 0.0, 0.0), DVec3::new(5.1, 0.0, 0.0)];
    let grid = SpatialGrid::from_centers(&centers, 5.0);
    assert_eq!(sorted(grid.query_within(centers[0], 1.0)), vec![0, 1]);
}

#[test]
fn wide_query_over_sparse_cells() {
    // Tiny cells and far-apart points: the query range covers ~10^12 cells,
    // only two of which are occupied.
    let centers = vec![DVec3::ZERO, DVec3::new(1000.0, 1000.0, 1000.0), DVec3::new(1.0, 0.0, 0.0)];
    let grid = SpatialGrid::from_centers(&centers, 0.1);
    assert_eq!(sorted(grid.query_within(DVec3::ZERO, 2000.0)), vec![0, 1, 2]);
    assert_eq!(sorted(grid.query_within(DVec3::ZERO, 1.0)), vec![0, 2]);
}

#[test]
fn for_each_within_visits_each_hit_once() {
    let centers: Vec<DVec3> = (0..10).map(|i| DVec3::new(i as f64 * 0.3, 0.0, 0.0)).collect();
    let grid = SpatialGrid::from_centers(&centers, 0.5);
    let mut hits = Vec::new();
    grid.for_each_within(DVec3::ZERO, 10.0, &mut |j| hits.push(j));
    assert_eq!(sorted(hits), (0..10).collect::<Vec<_>>());
}

// ============================================================================
// Correctness against brute force
// ============================================================================

#[test]
fn matches_brute_force_for_many_radii() {
    let particles = random_particles(7, 300, 10.0, 0.0, 0.0, 0.0);
    let centers = particles.centers();

    for cell_size in [0.3, 1.0, 2.5, 7.0] {
        let grid = SpatialGrid::from_centers(centers, cell_size);
        for (i, &point) in centers.iter().enumerate().step_by(7) {
            for radius in [0.0, 0.4, 1.3, 3.0, 20.0] {
                let got = sorted(grid.query_within(point, radius));
                let expected = brute_force_within(centers, point, radius);
                assert_eq!(got, expected, "cell {cell_size}, particle {i}, radius {radius}");
            }
        }
    }
}

#[test]
fn nearest_uses_linear_scan() {
    let centers = vec![DVec3::new(3.0, 0.0, 0.0), DVec3::new(-1.0, 0.0, 0.0), DVec3::new(1.0, 0.0, 0.0)];
    let grid = SpatialGrid::from_centers(&centers, 1.0);
    // Ids 1 and 2 are equally close; the lower id wins.
    let (id, distance) = grid.nearest(DVec3::ZERO).unwrap();
    assert_eq!(id, 1);
    assert_eq!(distance, 1.0);
}
