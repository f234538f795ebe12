// The result of a contact search: a sorted, duplicate-free list of canonical
// pairs.
//
// Order is a pure function of content. Pairs may be discovered in any order
// and more than once (both particles of a contact can find it, and parallel
// workers finish in any order); the builder settles this with one sort and
// dedup at the end.

use crate::contacts::pair::Pair;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Accumulates pairs in any order, possibly with repeats.
#[derive(Debug, Default, Clone)]
pub struct ContactGraphBuilder {
    pairs: Vec<Pair>,
}

impl ContactGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pairs: Vec::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, pair: Pair) {
        self.pairs.push(pair);
    }

    /// Inserts the contact between `a` and `b`. Returns `false` for a self pair.
    pub fn insert_ids(&mut self, a: usize, b: usize) -> bool {
        match Pair::new(a, b) {
            Some(pair) => {
                self.pairs.push(pair);
                true
            }
            None => false,
        }
    }

    /// Absorbs another builder, e.g. a worker-local one.
    pub fn merge(&mut self, mut other: ContactGraphBuilder) {
        if other.pairs.len() > self.pairs.len() {
            std::mem::swap(&mut self.pairs, &mut other.pairs);
        }
        self.pairs.append(&mut other.pairs);
    }

    /// Number of pairs inserted so far, repeats included.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn finish(mut self) -> ContactGraph {
        self.pairs.sort_unstable();
        self.pairs.dedup();
        ContactGraph { pairs: self.pairs }
    }
}

impl Extend<Pair> for ContactGraphBuilder {
    fn extend<T: IntoIterator<Item = Pair>>(&mut self, iter: T) {
        self.pairs.extend(iter);
    }
}

/// Immutable contact graph: pairs sorted by `i`, then `j`, each listed once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<Pair>", from = "Vec<Pair>")]
pub struct ContactGraph {
    pairs: Vec<Pair>,
}

impl From<Vec<Pair>> for ContactGraph {
    fn from(pairs: Vec<Pair>) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<ContactGraph> for Vec<Pair> {
    fn from(graph: ContactGraph) -> Self {
        graph.pairs
    }
}

impl FromIterator<Pair> for ContactGraph {
    fn from_iter<T: IntoIterator<Item = Pair>>(iter: T) -> Self {
        let mut builder = ContactGraphBuilder::new();
        builder.extend(iter);
        builder.finish()
    }
}

impl ContactGraph {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pair> {
        self.pairs.iter()
    }

    /// Pairs as plain `(i, j)` tuples.
    pub fn to_tuples(&self) -> Vec<(usize, usize)> {
        self.pairs.iter().map(Pair::as_tuple).collect()
    }

    /// Whether `a` and `b` are in contact, in either argument order.
    pub fn contains(&self, a: usize, b: usize) -> bool {
        Pair::new(a, b).is_some_and(|pair| self.pairs.binary_search(&pair).is_ok())
    }

    /// Number of contacts of every particle `0..num_particles`.
    ///
    /// Ids at or beyond `num_particles` are ignored.
    pub fn degrees(&self, num_particles: usize) -> Vec<usize> {
        let mut degrees = vec![0; num_particles];
        for pair in &self.pairs {
            if pair.j() < num_particles {
                degrees[pair.i()] += 1;
                degrees[pair.j()] += 1;
            }
        }
        degrees
    }

    /// Sorted contact partners of every particle `0..num_particles`.
    pub fn adjacency(&self, num_particles: usize) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); num_particles];
        for pair in &self.pairs {
            if pair.j() < num_particles {
                adjacency[pair.i()].push(pair.j());
                adjacency[pair.j()].push(pair.i());
            }
        }
        // Sorted pair order means every particle sees its smaller partners
        // (pairs `(a, x)`) before its larger ones (pairs `(x, b)`), each run
        // ascending, so the lists come out sorted.
        adjacency
    }

    /// Clusters of particles joined by contacts, isolated particles included.
    ///
    /// Each cluster is sorted ascending, and clusters are ordered by their
    /// smallest member.
    pub fn connected_components(&self, num_particles: usize) -> Vec<Vec<usize>> {
        let mut union_find = UnionFind::<usize>::new(num_particles);
        for pair in &self.pairs {
            if pair.j() < num_particles {
                union_find.union(pair.i(), pair.j());
            }
        }
        let labels = union_find.into_labeling();

        let mut slot_of_label: HashMap<usize, usize> = HashMap::new();
        let mut components: Vec<Vec<usize>> = Vec::new();
        for (id, label) in labels.into_iter().enumerate() {
            let slot = *slot_of_label.entry(label).or_insert_with(|| {
                components.push(Vec::new());
                components.len() - 1
            });
            components[slot].push(id);
        }
        components
    }

    /// The contact graph as a `petgraph` undirected graph.
    ///
    /// Node `k` carries particle id `k`; every particle gets a node even when
    /// it has no contacts.
    pub fn to_petgraph(&self, num_particles: usize) -> UnGraph<usize, ()> {
        let mut graph = UnGraph::with_capacity(num_particles, self.pairs.len());
        for id in 0..num_particles {
            graph.add_node(id);
        }
        for pair in &self.pairs {
            if pair.j() < num_particles {
                graph.add_edge(NodeIndex::new(pair.i()), NodeIndex::new(pair.j()), ());
            }
        }
        graph
    }
}

impl<'a> IntoIterator for &'a ContactGraph {
    type Item = &'a Pair;
    type IntoIter = std::slice::Iter<'a, Pair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}
