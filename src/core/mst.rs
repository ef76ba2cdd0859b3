/*!
# Minimum Spanning Tree Algorithms

Two MST constructions over the undirected [`Graph`]:

- **Kruskal's Algorithm:**
  Extracts edges from a [`MinHeap`] in weight order and merges subtrees
  through a vertex-to-label mapping.

- **Prim's Algorithm:**
  Grows a single tree from the first vertex, scanning for the cheapest edge
  crossing the tree boundary at every step.

Both return the tree together with its total weight and a `spanning` verdict;
on a disconnected graph the partial tree is returned with `spanning == false`.
Loop edges can never enter a tree and are discarded up front.
*/

use std::collections::{HashMap, HashSet};

use crate::core::error::{Error, Result};
use crate::core::graph::Graph;
use crate::core::heap::MinHeap;
use crate::core::types::Key;

/// A minimum spanning tree plus its weight and the spanning verdict.
#[derive(Debug, Clone)]
pub struct MinimumSpanningTree<K: Key> {
    pub tree: Graph<K>,
    pub weight: i64,
    pub spanning: bool,
}

/// Computes a minimum spanning tree with Kruskal's algorithm.
///
/// Each extracted minimum edge falls into one of four cases: both endpoints
/// unlabeled (open a fresh subtree), one unlabeled (attach it), two distinct
/// labels (merge the subtrees by rewriting one label), or one shared label
/// (discard, the edge would close a cycle).
///
/// # Errors
///
/// Returns an [`Error::Invariant`] if the graph is empty.
pub fn kruskal<K: Key>(graph: &Graph<K>) -> Result<MinimumSpanningTree<K>> {
    if graph.is_empty() {
        return Err(Error::invariant("cannot compute an MST of an empty graph"));
    }

    let mut heap = MinHeap::with_capacity(graph.edge_count());
    for (u, v, w) in graph.edges() {
        if u != v {
            heap.insert(w, (u.clone(), v.clone()));
        }
    }

    let mut labels: HashMap<K, u32> = HashMap::new();
    let mut next_label: u32 = 0;
    let mut tree = Graph::new();
    let mut weight = 0;
    let mut tree_edges = 0;
    let target = graph.vertex_count() - 1;

    while tree_edges < target {
        let Ok((w, (u, v))) = heap.delete_top() else {
            break;
        };
        match (labels.get(&u).copied(), labels.get(&v).copied()) {
            (None, None) => {
                next_label += 1;
                labels.insert(u.clone(), next_label);
                labels.insert(v.clone(), next_label);
                tree.add_vertex(u.clone()).expect("vertex is unlabeled");
                tree.add_vertex(v.clone()).expect("vertex is unlabeled");
            }
            (Some(label), None) => {
                labels.insert(v.clone(), label);
                tree.add_vertex(v.clone()).expect("vertex is unlabeled");
            }
            (None, Some(label)) => {
                labels.insert(u.clone(), label);
                tree.add_vertex(u.clone()).expect("vertex is unlabeled");
            }
            (Some(a), Some(b)) if a != b => {
                for label in labels.values_mut() {
                    if *label == b {
                        *label = a;
                    }
                }
            }
            _ => continue,
        }
        tree.add_edge(&u, &v, w).expect("both endpoints are labeled");
        weight += w;
        tree_edges += 1;
    }

    let spanning = tree_edges == target;
    Ok(MinimumSpanningTree {
        tree,
        weight,
        spanning,
    })
}

/// Computes a minimum spanning tree with Prim's algorithm.
///
/// # Errors
///
/// Returns an [`Error::Invariant`] if the graph is empty.
pub fn prim<K: Key>(graph: &Graph<K>) -> Result<MinimumSpanningTree<K>> {
    if graph.is_empty() {
        return Err(Error::invariant("cannot compute an MST of an empty graph"));
    }

    let start = graph.first_vertex().expect("graph is nonempty").clone();
    let mut tree = Graph::new();
    tree.add_vertex(start.clone()).expect("tree is empty");
    let mut in_tree: HashSet<K> = HashSet::from([start]);
    let mut weight = 0;

    while in_tree.len() < graph.vertex_count() {
        let mut best: Option<(i64, K, K)> = None;
        for (u, v, w) in graph.edges() {
            let (inside, outside) = match (in_tree.contains(u), in_tree.contains(v)) {
                (true, false) => (u, v),
                (false, true) => (v, u),
                _ => continue,
            };
            if best.as_ref().is_none_or(|(bw, _, _)| w < *bw) {
                best = Some((w, inside.clone(), outside.clone()));
            }
        }
        let Some((w, inside, outside)) = best else {
            // No edge crosses the boundary: the graph is disconnected.
            return Ok(MinimumSpanningTree {
                tree,
                weight,
                spanning: false,
            });
        };
        tree.add_vertex(outside.clone()).expect("vertex is outside the tree");
        tree.add_edge(&inside, &outside, w)
            .expect("both endpoints are in the tree");
        in_tree.insert(outside);
        weight += w;
    }

    Ok(MinimumSpanningTree {
        tree,
        weight,
        spanning: true,
    })
}
