use crate::common::{brute_force_within, random_particles};
use glam::f64::DVec3;
use sphere_contacts::error::ContactError;
use sphere_contacts::spatial::{KdTree, SpatialIndex};

fn sorted(mut ids: Vec<usize>) -> Vec<usize> {
    ids.sort_unstable();
    ids
}

#[test]
fn empty_tree() {
    let tree = KdTree::from_centers(&[]);
    assert!(tree.is_empty());
    assert_eq!(tree.num_nodes(), 0);
    assert!(tree.query_within(DVec3::ZERO, 10.0).is_empty());
    assert!(matches!(tree.nearest(DVec3::ZERO), Err(ContactError::EmptyIndex)));
}

#[test]
fn single_point() {
    let tree = KdTree::from_centers(&[DVec3::new(1.0, 2.0, 3.0)]);
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.query_within(DVec3::new(1.0, 2.0, 3.0), 0.0), vec![0]);
    assert!(tree.query_within(DVec3::ZERO, 1.0).is_empty());
}

#[test]
fn leaf_size_is_clamped_to_one() {
    let centers: Vec<DVec3> = (0..5).map(|i| DVec3::splat(i as f64)).collect();
    let tree = KdTree::with_leaf_size(&centers, 0);
    assert_eq!(tree.leaf_size(), 1);
    // Five leaves plus four splits.
    assert_eq!(tree.num_nodes(), 9);
}

#[test]
fn boundary_distance_is_inclusive() {
    let centers = vec![DVec3::ZERO, DVec3::new(0.0, 0.0, 2.5)];
    let tree = KdTree::with_leaf_size(&centers, 1);
    assert_eq!(sorted(tree.query_within(DVec3::ZERO, 2.5)), vec![0, 1]);
    assert_eq!(tree.query_within(DVec3::ZERO, 2.4), vec![0]);
}

#[test]
fn duplicate_centers_are_all_reported() {
    let centers = vec![DVec3::ONE; 40];
    let tree = KdTree::with_leaf_size(&centers, 2);
    assert_eq!(sorted(tree.query_within(DVec3::ONE, 0.0)), (0..40).collect::<Vec<_>>());
}

#[test]
fn invalid_queries_return_nothing() {
    let tree = KdTree::from_centers(&[DVec3::ZERO, DVec3::ONE]);
    assert!(tree.query_within(DVec3::ZERO, -0.5).is_empty());
    assert!(tree.query_within(DVec3::ZERO, f64::NAN).is_empty());
    assert!(tree.query_within(DVec3::new(f64::NAN, 0.0, 0.0), 5.0).is_empty());
    assert!(matches!(
        tree.nearest(DVec3::new(0.0, f64::INFINITY, 0.0)),
        Err(ContactError::NonFiniteQuery(_))
    ));
}

#[test]
fn matches_brute_force_for_many_leaf_sizes() {
    let particles = random_particles(11, 400, 10.0, 0.0, 0.0, 0.0);
    let centers = particles.centers();

    for leaf_size in [1, 4, 8, 64] {
        let tree = KdTree::with_leaf_size(centers, leaf_size);
        for (i, &point) in centers.iter().enumerate().step_by(9) {
            for radius in [0.0, 0.5, 1.7, 4.0, 50.0] {
                let got = sorted(tree.query_within(point, radius));
                let expected = brute_force_within(centers, point, radius);
                assert_eq!(got, expected, "leaf {leaf_size}, particle {i}, radius {radius}");
            }
        }
    }
}

#[test]
fn queries_away_from_indexed_points() {
    let particles = random_particles(5, 200, 8.0, 0.0, 0.0, 0.0);
    let centers = particles.centers();
    let tree = KdTree::from_centers(centers);

    for point in [DVec3::splat(4.0), DVec3::new(-3.0, 2.0, 9.0), DVec3::new(8.5, 0.1, 4.4)] {
        let got = sorted(tree.query_within(point, 2.2));
        assert_eq!(got, brute_force_within(centers, point, 2.2));
    }
}

#[test]
fn nearest_matches_brute_force() {
    let particles = random_particles(23, 250, 10.0, 0.0, 0.0, 0.0);
    let centers = particles.centers();
    let tree = KdTree::with_leaf_size(centers, 3);

    for point in [DVec3::ZERO, DVec3::splat(5.0), DVec3::new(12.0, -1.0, 3.0), centers[17]] {
        let expected = (0..centers.len())
            .map(|j| (j, point.distance(centers[j])))
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
            .unwrap();
        assert_eq!(tree.nearest(point).unwrap(), expected);
    }
}
