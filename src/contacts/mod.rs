// Contact detection: pair search, the resulting graph and the driver that
// wires a particle source to a pair sink.

pub mod consumer;
pub mod contact_graph;
pub mod pair;
pub mod pair_finder;
pub mod stratified;

use crate::config::ContactSearchConfig;
use crate::error::Result;
use crate::particles::ParticleProvider;
use std::time::{Duration, Instant};

pub use consumer::{EdgeListWriter, PairConsumer};
pub use contact_graph::{ContactGraph, ContactGraphBuilder};
pub use pair::Pair;
pub use pair_finder::{PairFinder, SearchBound, SearchStats, SearchStrategy};

/// Outcome of [`detect_contacts`].
#[derive(Debug, Clone)]
pub struct ContactReport {
    pub graph: ContactGraph,
    pub stats: SearchStats,
    /// Wall time of the search alone, loading and emitting excluded.
    pub elapsed: Duration,
}

/// Loads particles from `provider`, finds every contact under `config`, and
/// hands the sorted pairs to `consumer`.
///
/// Nothing reaches the consumer unless the search succeeds.
pub fn detect_contacts<P, C>(
    provider: &P,
    consumer: &mut C,
    config: &ContactSearchConfig,
) -> Result<ContactReport>
where
    P: ParticleProvider + ?Sized,
    C: PairConsumer + ?Sized,
{
    let finder = PairFinder::new(config.clone())?;
    let particles = provider.load()?;

    let start = Instant::now();
    let (graph, stats) = finder.find_contacts_with_stats(&particles)?;
    let elapsed = start.elapsed();
    log::info!(
        "found {} contacts among {} particles in {:.3} ms",
        graph.len(),
        particles.len(),
        elapsed.as_secs_f64() * 1000.0
    );

    graph.emit(consumer)?;
    Ok(ContactReport {
        graph,
        stats,
        elapsed,
    })
}
