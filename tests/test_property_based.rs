/*!
# Property-Based Tests

Randomized checks of the structural invariants: degree sums, heap ordering,
spanning-tree levels, and the agreement of the two MST constructions on
graphs with unique edge weights.
*/

use arista::core::graph::Graph;
use arista::core::heap::MinHeap;
use arista::core::mst::{kruskal, prim};
use arista::core::traversal::bfs_tree;
use proptest::prelude::*;

/// Strategy for a vertex count.
fn graph_size() -> impl Strategy<Value = usize> {
    2usize..12usize
}

/// Strategy for an edge list over `n` vertices, as index pairs.
fn edge_list(n: usize) -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((0..n, 0..n), 0..(n * 3))
}

/// Builds a graph over `v0..vn` with unique edge weights.
fn build(n: usize, edges: &[(usize, usize)]) -> Graph<String> {
    let mut graph = Graph::new();
    for i in 0..n {
        graph.add_vertex(format!("v{}", i)).unwrap();
    }
    for (k, (a, b)) in edges.iter().enumerate() {
        graph
            .add_edge(&format!("v{}", a), &format!("v{}", b), (k as i64) + 1)
            .unwrap();
    }
    graph
}

proptest! {
    /// Property: the degree sum is twice the edge count plus the loops.
    #[test]
    fn prop_degree_sum(n in graph_size(), edges in edge_list(11)) {
        let edges: Vec<(usize, usize)> = edges
            .into_iter()
            .map(|(a, b)| (a % n, b % n))
            .collect();
        let graph = build(n, &edges);
        let degree_sum: usize = graph
            .vertices()
            .map(|v| graph.degree(v).unwrap())
            .sum();
        prop_assert_eq!(degree_sum, 2 * graph.edge_count() + graph.loop_count());
    }

    /// Property: the heap drains its keys in nondecreasing order.
    #[test]
    fn prop_heap_drains_sorted(keys in prop::collection::vec(-1000i64..1000, 0..64)) {
        let mut heap = MinHeap::new();
        for (i, key) in keys.iter().enumerate() {
            heap.insert(*key, i);
        }
        let mut drained = Vec::with_capacity(keys.len());
        while !heap.is_empty() {
            drained.push(heap.delete_top().unwrap().0);
        }
        prop_assert_eq!(drained.len(), keys.len());
        for pair in drained.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
    }

    /// Property: BFS levels grow by exactly one along every tree edge, and
    /// the tree spans the graph exactly when it reaches every vertex.
    #[test]
    fn prop_bfs_levels(n in graph_size(), edges in edge_list(11)) {
        let edges: Vec<(usize, usize)> = edges
            .into_iter()
            .map(|(a, b)| (a % n, b % n))
            .collect();
        let graph = build(n, &edges);
        let result = bfs_tree(&graph);
        for (u, v, _) in result.tree.edges() {
            let lu = result.tree.level(u).unwrap();
            let lv = result.tree.level(v).unwrap();
            prop_assert_eq!(lu.abs_diff(lv), 1);
        }
        prop_assert_eq!(
            result.connected,
            result.tree.vertex_count() == graph.vertex_count()
        );
        if result.connected && n > 0 {
            prop_assert_eq!(result.tree.edge_count(), n - 1);
        }
    }

    /// Property: with unique edge weights, Kruskal and Prim find trees of
    /// the same total weight.
    #[test]
    fn prop_kruskal_matches_prim(n in graph_size(), edges in edge_list(11)) {
        let edges: Vec<(usize, usize)> = edges
            .into_iter()
            .map(|(a, b)| (a % n, b % n))
            .filter(|(a, b)| a != b)
            .collect();
        let graph = build(n, &edges);
        let by_kruskal = kruskal(&graph).unwrap();
        let by_prim = prim(&graph).unwrap();
        prop_assert_eq!(by_kruskal.spanning, by_prim.spanning);
        if by_kruskal.spanning {
            prop_assert_eq!(by_kruskal.weight, by_prim.weight);
        }
    }
}
