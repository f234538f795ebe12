// Radius-stratified candidate search.
//
// A single large particle inflates every query of the flat search, since the
// bound always adds the global largest radius. Here particles are split into
// classes by radius (powers of two below the largest radius) and each class
// gets its own index. A particle probes every class with a bound widened only
// by that class's largest radius, which is still >= the radius of any partner
// found there, so no contact is lost.

use crate::contacts::contact_graph::ContactGraph;
use crate::contacts::pair_finder::{PairFinder, Refiner, SearchStats};
use crate::error::Result;
use crate::particles::ParticleSet;
use crate::spatial::{SpatialIndex, build_index};
use glam::f64::DVec3;

struct RadiusClass {
    /// Global ids of the members; the class index reports positions in here.
    members: Vec<usize>,
    max_radius: f64,
    index: Box<dyn SpatialIndex>,
}

/// Groups particle ids into at most `max_classes` radius classes.
///
/// Class `k` holds radii in `(max_radius / 2^(k+1), max_radius / 2^k]`; the
/// last class also takes everything smaller, zero radii included. Empty
/// classes are dropped, and members of each class are ascending.
pub fn radius_classes(radii: &[f64], max_classes: usize) -> Vec<Vec<usize>> {
    let max_classes = max_classes.max(1);
    let max_radius = radii.iter().copied().fold(0.0, f64::max);
    let mut classes: Vec<Vec<usize>> = vec![Vec::new(); max_classes];

    for (id, &radius) in radii.iter().enumerate() {
        let class = if max_radius <= 0.0 || radius >= max_radius {
            0
        } else if radius <= 0.0 {
            max_classes - 1
        } else {
            let ratio = max_radius / radius;
            // ratio in [2^k, 2^(k+1)) maps to class k.
            (ratio.log2().floor() as usize).min(max_classes - 1)
        };
        classes[class].push(id);
    }

    classes.retain(|members| !members.is_empty());
    classes
}

pub(crate) fn find_contacts(
    finder: &PairFinder,
    particles: &ParticleSet,
) -> Result<(ContactGraph, SearchStats)> {
    let config = finder.config();
    let tolerance = particles.overlap_tolerance();
    let centers = particles.centers();
    let radii = particles.radii();
    let max_radius = particles.max_radius().unwrap_or(0.0);

    let params = config.index_params();
    let classes: Vec<RadiusClass> = radius_classes(radii, config.max_radius_classes)
        .into_iter()
        .map(|members| {
            let class_centers: Vec<DVec3> = members.iter().map(|&id| centers[id]).collect();
            let class_max = members.iter().map(|&id| radii[id]).fold(0.0, f64::max);
            RadiusClass {
                index: build_index(&class_centers, class_max, &params),
                members,
                max_radius: class_max,
            }
        })
        .collect();
    for (k, class) in classes.iter().enumerate() {
        log::debug!(
            "radius class {k}: {} particles, max radius {}",
            class.members.len(),
            class.max_radius
        );
    }

    let refiner = Refiner {
        centers,
        radii,
        tolerance,
    };
    let bound = config.bound;
    let (builder, candidates) = finder.collect(particles.len(), |i, builder| {
        let mut candidates = 0;
        for class in &classes {
            let query_radius = bound.query_radius(radii[i], class.max_radius, tolerance);
            class
                .index
                .for_each_within(centers[i], query_radius, &mut |local| {
                    candidates += 1;
                    let j = class.members[local];
                    if j > i && refiner.accepts(i, j) {
                        builder.insert_ids(i, j);
                    }
                });
        }
        candidates
    });

    let graph = builder.finish();
    let stats = SearchStats {
        particles: particles.len(),
        max_radius,
        radius_classes: classes.len(),
        candidates,
        pairs: graph.len(),
    };
    log::debug!(
        "stratified contact search: {} particles in {} classes, {} candidates, {} pairs",
        stats.particles,
        stats.radius_classes,
        stats.candidates,
        stats.pairs
    );
    Ok((graph, stats))
}
