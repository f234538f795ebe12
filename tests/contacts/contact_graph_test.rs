use petgraph::algo::connected_components;
use sphere_contacts::contacts::{ContactGraph, ContactGraphBuilder, Pair};

fn pair(a: usize, b: usize) -> Pair {
    Pair::new(a, b).unwrap()
}

#[test]
fn pair_is_canonical() {
    assert_eq!(pair(5, 2).as_tuple(), (2, 5));
    assert_eq!(pair(2, 5), pair(5, 2));
    assert!(Pair::new(3, 3).is_none());
    assert_eq!(pair(2, 5).other(2), Some(5));
    assert_eq!(pair(2, 5).other(5), Some(2));
    assert_eq!(pair(2, 5).other(4), None);
    assert_eq!(pair(7, 1).to_string(), "(1, 7)");
}

#[test]
fn builder_sorts_and_deduplicates() {
    let mut builder = ContactGraphBuilder::new();
    assert!(builder.insert_ids(3, 1));
    assert!(builder.insert_ids(0, 2));
    assert!(builder.insert_ids(1, 3));
    assert!(!builder.insert_ids(4, 4));
    builder.insert(pair(0, 1));
    assert_eq!(builder.len(), 4);

    let graph = builder.finish();
    assert_eq!(graph.to_tuples(), vec![(0, 1), (0, 2), (1, 3)]);
}

#[test]
fn merged_builders_match_a_single_builder() {
    let mut left = ContactGraphBuilder::with_capacity(4);
    left.extend([pair(4, 5), pair(0, 1)]);
    let mut right = ContactGraphBuilder::new();
    right.extend([pair(1, 0), pair(2, 3), pair(3, 4)]);
    left.merge(right);

    let single: ContactGraph = [pair(0, 1), pair(2, 3), pair(3, 4), pair(4, 5)].into_iter().collect();
    assert_eq!(left.finish(), single);
}

#[test]
fn contains_checks_both_orders() {
    let graph: ContactGraph = vec![pair(0, 1), pair(2, 6)].into();
    assert!(graph.contains(0, 1));
    assert!(graph.contains(6, 2));
    assert!(!graph.contains(1, 2));
    assert!(!graph.contains(2, 2));
}

#[test]
fn degrees_and_adjacency() {
    let graph: ContactGraph = vec![pair(0, 1), pair(0, 3), pair(1, 2), pair(1, 3)].into();
    assert_eq!(graph.degrees(5), vec![2, 3, 1, 2, 0]);
    assert_eq!(
        graph.adjacency(5),
        vec![vec![1, 3], vec![0, 2, 3], vec![1], vec![0, 1], vec![]]
    );
    // Pairs beyond the requested range are ignored.
    assert_eq!(graph.degrees(2), vec![1, 1]);
}

#[test]
fn connected_components_group_bonded_clusters() {
    let graph: ContactGraph = vec![pair(0, 4), pair(4, 2), pair(1, 5)].into();
    assert_eq!(
        graph.connected_components(7),
        vec![vec![0, 2, 4], vec![1, 5], vec![3], vec![6]]
    );
    assert!(ContactGraph::empty().connected_components(0).is_empty());
}

#[test]
fn petgraph_export_keeps_isolated_particles() {
    let graph: ContactGraph = vec![pair(0, 1), pair(1, 2), pair(4, 5)].into();
    let exported = graph.to_petgraph(7);
    assert_eq!(exported.node_count(), 7);
    assert_eq!(exported.edge_count(), 3);
    assert_eq!(connected_components(&exported), graph.connected_components(7).len());
}

#[test]
fn serializes_as_index_pairs() {
    let graph: ContactGraph = vec![pair(1, 2), pair(0, 3), pair(0, 1)].into();
    let json = serde_json::to_string(&graph).unwrap();
    assert_eq!(json, "[[0,1],[0,3],[1,2]]");

    // Unsorted, mirrored and repeated input still yields the canonical graph.
    let parsed: ContactGraph = serde_json::from_str("[[3,0],[1,0],[0,1],[2,1]]").unwrap();
    assert_eq!(parsed, graph);

    assert!(serde_json::from_str::<ContactGraph>("[[2,2]]").is_err());
}
