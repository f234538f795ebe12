// Candidate search and exact refinement.
//
// Each particle queries the index once with a conservative bound. Two spheres
// touch when |c_i - c_j| <= r_i + r_j + tolerance, and r_j never exceeds the
// largest radius, so any bound >= r_i + max_radius + max(tolerance, 0) sees
// every partner of i. Candidates are then checked exactly; only j > i is
// considered, which drops the self match and the mirrored discovery of the
// same contact from j's query.
//
// The index and the refinement compute the center distance the same way, and
// float addition is monotone, so the bound holds under rounding too.

use crate::config::ContactSearchConfig;
use crate::contacts::contact_graph::{ContactGraph, ContactGraphBuilder};
use crate::contacts::stratified;
use crate::error::{ContactError, Result};
use crate::particles::ParticleSet;
use crate::spatial::{SpatialIndex, build_index};
use glam::f64::DVec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Safety multiplier on the largest radius used by [`SearchBound::Margin`]
/// unless configured otherwise.
pub const DEFAULT_MARGIN_FACTOR: f64 = 2.5;

/// Policy for a particle's query radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum SearchBound {
    /// `r_i + factor * max_radius + max(tolerance, 0)`, `factor >= 1`.
    Margin { factor: f64 },
    /// `r_i + max_radius + max(tolerance, 0)`, the smallest correct bound.
    Tight,
}

impl Default for SearchBound {
    fn default() -> Self {
        SearchBound::Margin {
            factor: DEFAULT_MARGIN_FACTOR,
        }
    }
}

impl SearchBound {
    /// Query radius for a particle of radius `own_radius` when no partner is
    /// larger than `partner_radius`.
    pub fn query_radius(&self, own_radius: f64, partner_radius: f64, tolerance: f64) -> f64 {
        let reach = match *self {
            SearchBound::Margin { factor } => factor * partner_radius,
            SearchBound::Tight => partner_radius,
        };
        own_radius + reach + tolerance.max(0.0)
    }
}

/// How the candidate search is organised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// One index; every query is widened by the global largest radius.
    #[default]
    Flat,
    /// One index per radius class; each query is widened only by the largest
    /// radius of the class it probes. Pays off when a few particles are much
    /// larger than the rest.
    Stratified,
}

/// Counters from one search.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SearchStats {
    pub particles: usize,
    pub max_radius: f64,
    /// Indexes probed per particle (1 for the flat strategy).
    pub radius_classes: usize,
    /// Index hits examined by the exact test, self matches included.
    pub candidates: usize,
    /// Distinct pairs in the result.
    pub pairs: usize,
}

/// Exact contact test over borrowed particle arrays.
#[derive(Clone, Copy)]
pub(crate) struct Refiner<'a> {
    pub centers: &'a [DVec3],
    pub radii: &'a [f64],
    pub tolerance: f64,
}

impl Refiner<'_> {
    pub fn accepts(&self, i: usize, j: usize) -> bool {
        self.centers[i].distance(self.centers[j]) <= self.radii[i] + self.radii[j] + self.tolerance
    }
}

/// Finds every pair of particles in contact.
#[derive(Debug, Clone, Default)]
pub struct PairFinder {
    config: ContactSearchConfig,
}

impl PairFinder {
    pub fn new(config: ContactSearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ContactSearchConfig {
        &self.config
    }

    /// Runs the search against a prebuilt index over `particles`' centers.
    ///
    /// The configured strategy is not consulted: the given index is the only
    /// one probed.
    pub fn run(
        &self,
        index: &dyn SpatialIndex,
        particles: &ParticleSet,
        tolerance: f64,
    ) -> Result<ContactGraph> {
        self.run_with_stats(index, particles, tolerance)
            .map(|(graph, _)| graph)
    }

    pub fn run_with_stats(
        &self,
        index: &dyn SpatialIndex,
        particles: &ParticleSet,
        tolerance: f64,
    ) -> Result<(ContactGraph, SearchStats)> {
        if !tolerance.is_finite() {
            return Err(ContactError::InvalidTolerance(tolerance));
        }
        if index.len() != particles.len() {
            return Err(ContactError::IndexMismatch {
                index: index.len(),
                particles: particles.len(),
            });
        }
        let Some(max_radius) = particles.max_radius() else {
            return Ok((ContactGraph::empty(), SearchStats::default()));
        };

        let refiner = Refiner {
            centers: particles.centers(),
            radii: particles.radii(),
            tolerance,
        };
        let bound = self.config.bound;
        let (builder, candidates) = self.collect(particles.len(), |i, builder| {
            let query_radius = bound.query_radius(refiner.radii[i], max_radius, tolerance);
            let mut candidates = 0;
            index.for_each_within(refiner.centers[i], query_radius, &mut |j| {
                candidates += 1;
                if j > i && refiner.accepts(i, j) {
                    builder.insert_ids(i, j);
                }
            });
            candidates
        });

        let graph = builder.finish();
        let stats = SearchStats {
            particles: particles.len(),
            max_radius,
            radius_classes: 1,
            candidates,
            pairs: graph.len(),
        };
        log::debug!(
            "flat contact search: {} particles, max radius {}, {} candidates, {} pairs",
            stats.particles,
            stats.max_radius,
            stats.candidates,
            stats.pairs
        );
        Ok((graph, stats))
    }

    /// Builds the configured index(es) and searches with the set's own tolerance.
    pub fn find_contacts(&self, particles: &ParticleSet) -> Result<ContactGraph> {
        self.find_contacts_with_stats(particles)
            .map(|(graph, _)| graph)
    }

    pub fn find_contacts_with_stats(
        &self,
        particles: &ParticleSet,
    ) -> Result<(ContactGraph, SearchStats)> {
        let Some(max_radius) = particles.max_radius() else {
            return Ok((ContactGraph::empty(), SearchStats::default()));
        };
        match self.config.strategy {
            SearchStrategy::Flat => {
                let index =
                    build_index(particles.centers(), max_radius, &self.config.index_params());
                self.run_with_stats(index.as_ref(), particles, particles.overlap_tolerance())
            }
            SearchStrategy::Stratified => stratified::find_contacts(self, particles),
        }
    }

    /// Runs `per_particle(i, builder)` for every particle, sequentially or on
    /// the rayon pool, and merges the worker-local builders. Returns the
    /// merged builder and the summed return values.
    pub(crate) fn collect<F>(&self, num_particles: usize, per_particle: F) -> (ContactGraphBuilder, usize)
    where
        F: Fn(usize, &mut ContactGraphBuilder) -> usize + Sync,
    {
        if self.config.parallel {
            (0..num_particles)
                .into_par_iter()
                .fold(
                    || (ContactGraphBuilder::new(), 0),
                    |(mut builder, count), i| {
                        let found = per_particle(i, &mut builder);
                        (builder, count + found)
                    },
                )
                .reduce(
                    || (ContactGraphBuilder::new(), 0),
                    |(mut left, left_count), (right, right_count)| {
                        left.merge(right);
                        (left, left_count + right_count)
                    },
                )
        } else {
            let mut builder = ContactGraphBuilder::new();
            let mut count = 0;
            for i in 0..num_particles {
                count += per_particle(i, &mut builder);
            }
            (builder, count)
        }
    }
}
