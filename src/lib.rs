//! Contact detection for sphere packings.
//!
//! Given an immutable snapshot of spheres (centers, radii and one overlap
//! tolerance), finds every pair whose surfaces touch or overlap:
//!
//! ```text
//! |c_i - c_j| <= r_i + r_j + tolerance
//! ```
//!
//! The search builds a spatial index over the centers ([`spatial`]), queries
//! it once per particle with a conservative bound, and refines the candidates
//! with the exact test ([`contacts::PairFinder`]). The result is a
//! [`contacts::ContactGraph`]: canonical `(i, j)` pairs with `i < j`, sorted
//! and duplicate-free, identical across runs and thread counts.
//!
//! ```no_run
//! use sphere_contacts::contacts::PairFinder;
//! use sphere_contacts::particles::ParticleSet;
//!
//! let particles = ParticleSet::from_arrays(
//!     &[[0.0, 0.0, 0.0], [1.5, 0.0, 0.0]],
//!     &[1.0, 1.0],
//!     0.0,
//! )?;
//! let graph = PairFinder::default().find_contacts(&particles)?;
//! assert_eq!(graph.to_tuples(), vec![(0, 1)]);
//! # Ok::<(), sphere_contacts::error::ContactError>(())
//! ```

pub mod config;
pub mod contacts;
pub mod error;
pub mod particles;
pub mod spatial;

pub use config::ContactSearchConfig;
pub use contacts::{ContactGraph, Pair, PairFinder, detect_contacts};
pub use error::{ContactError, Result};
pub use particles::ParticleSet;
