// Particle snapshot handed to the contact search.
//
// Centers and radii are stored as parallel arrays: the spatial index is built
// straight from the centers slice, and the refinement step reads radii by
// index. A particle's id is its position in these arrays.

pub mod provider;

use crate::error::{ContactError, Result};
use glam::f64::DVec3;

pub use provider::{JsonParticleSource, ParticleProvider};

/// A single sphere, as seen through [`ParticleSet::particle`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub id: usize,
    pub center: DVec3,
    pub radius: f64,
}

/// An immutable, validated snapshot of spheres plus the overlap tolerance.
///
/// Invariants enforced on construction:
/// - every center has three finite components,
/// - every radius is finite and `>= 0`,
/// - the tolerance is finite (it may be negative).
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSet {
    centers: Vec<DVec3>,
    radii: Vec<f64>,
    overlap_tolerance: f64,
}

impl ParticleSet {
    /// Builds a set from parallel center and radius arrays.
    pub fn new(centers: Vec<DVec3>, radii: Vec<f64>, overlap_tolerance: f64) -> Result<Self> {
        if centers.len() != radii.len() {
            return Err(ContactError::LengthMismatch {
                centers: centers.len(),
                radii: radii.len(),
            });
        }
        for (index, center) in centers.iter().enumerate() {
            if !center.is_finite() {
                return Err(ContactError::NonFiniteCenter {
                    index,
                    center: center.to_array(),
                });
            }
        }
        for (index, &radius) in radii.iter().enumerate() {
            if !radius.is_finite() || radius < 0.0 {
                return Err(ContactError::InvalidRadius { index, radius });
            }
        }
        check_tolerance(overlap_tolerance)?;

        Ok(Self {
            centers,
            radii,
            overlap_tolerance,
        })
    }

    /// Builds a set from `[x, y, z]` triples, the layout most external readers produce.
    pub fn from_arrays(centers: &[[f64; 3]], radii: &[f64], overlap_tolerance: f64) -> Result<Self> {
        let centers = centers.iter().map(|&c| DVec3::from_array(c)).collect();
        Self::new(centers, radii.to_vec(), overlap_tolerance)
    }

    /// Builds a set from `(center, radius)` tuples.
    pub fn from_spheres<I>(spheres: I, overlap_tolerance: f64) -> Result<Self>
    where
        I: IntoIterator<Item = (DVec3, f64)>,
    {
        let (centers, radii) = spheres.into_iter().unzip();
        Self::new(centers, radii, overlap_tolerance)
    }

    /// An empty set. Searching it yields an empty contact graph.
    pub fn empty() -> Self {
        Self {
            centers: Vec::new(),
            radii: Vec::new(),
            overlap_tolerance: 0.0,
        }
    }

    /// Returns a copy of this set with a different tolerance.
    pub fn with_tolerance(&self, overlap_tolerance: f64) -> Result<Self> {
        check_tolerance(overlap_tolerance)?;
        Ok(Self {
            centers: self.centers.clone(),
            radii: self.radii.clone(),
            overlap_tolerance,
        })
    }

    /// Derives the tolerance from a per-particle "max overlap" attribute.
    ///
    /// The largest value wins; an empty attribute yields `0.0`. Non-finite
    /// values are skipped.
    pub fn tolerance_from_max_overlap<I>(max_overlaps: I) -> f64
    where
        I: IntoIterator<Item = f64>,
    {
        max_overlaps
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    pub fn centers(&self) -> &[DVec3] {
        &self.centers
    }

    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    pub fn overlap_tolerance(&self) -> f64 {
        self.overlap_tolerance
    }

    /// Largest radius in the set, `None` when empty.
    pub fn max_radius(&self) -> Option<f64> {
        self.radii.iter().copied().reduce(f64::max)
    }

    pub fn particle(&self, id: usize) -> Option<Particle> {
        Some(Particle {
            id,
            center: *self.centers.get(id)?,
            radius: *self.radii.get(id)?,
        })
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Particle> + '_ {
        self.centers
            .iter()
            .zip(&self.radii)
            .enumerate()
            .map(|(id, (&center, &radius))| Particle { id, center, radius })
    }

    /// Exact contact test between particles `i` and `j` under `tolerance`.
    ///
    /// Contact means `|c_i - c_j| <= r_i + r_j + tolerance`.
    pub fn in_contact(&self, i: usize, j: usize, tolerance: f64) -> bool {
        let distance = self.centers[i].distance(self.centers[j]);
        distance <= self.radii[i] + self.radii[j] + tolerance
    }
}

fn check_tolerance(tolerance: f64) -> Result<()> {
    if tolerance.is_finite() {
        Ok(())
    } else {
        Err(ContactError::InvalidTolerance(tolerance))
    }
}
