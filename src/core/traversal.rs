/*!
# Graph Traversal Algorithms

Spanning-tree traversals over the undirected [`Graph`]:

- **Breadth-First Search (BFS):**
  Grows the tree level by level from the first vertex of the graph.

- **Iterative Depth-First Search:**
  Same contract, stack-driven.

- **Recursive Depth-First Search:**
  Same contract, by recursion on the chosen root.

All three return a fresh [`Graph`] holding the reached vertices, the tree
edges with their original weights, and a `level` per vertex with
`level(child) = level(parent) + 1` and root level 0. The traversal root is the
first vertex in insertion order, so the result is deterministic within a run.
*/

use std::collections::{HashSet, VecDeque};

use crate::core::graph::Graph;
use crate::core::types::Key;

/// An expansion tree plus the connectivity verdict.
///
/// `connected` holds exactly when the tree reached every vertex of the
/// original graph.
#[derive(Debug, Clone)]
pub struct SpanningTree<K: Key> {
    pub tree: Graph<K>,
    pub connected: bool,
}

/// Builds the BFS expansion tree rooted at the first vertex.
pub fn bfs_tree<K: Key>(graph: &Graph<K>) -> SpanningTree<K> {
    let mut tree = Graph::new();
    let Some(root) = graph.first_vertex() else {
        return SpanningTree {
            tree,
            connected: true,
        };
    };

    let mut visited: HashSet<K> = HashSet::new();
    let mut queue: VecDeque<K> = VecDeque::new();

    tree.add_vertex(root.clone()).expect("tree is empty");
    tree.set_level(root, 0).expect("root is in the tree");
    visited.insert(root.clone());
    queue.push_back(root.clone());

    while let Some(vertex) = queue.pop_front() {
        let level = tree.level(&vertex).expect("visited vertices have levels");
        for (_, opposite, weight) in graph.incident_edges(&vertex) {
            if visited.insert(opposite.clone()) {
                tree.add_vertex(opposite.clone()).expect("first visit");
                tree.set_level(opposite, level + 1)
                    .expect("vertex was just added");
                tree.add_edge(&vertex, opposite, weight)
                    .expect("both endpoints are in the tree");
                queue.push_back(opposite.clone());
            }
        }
    }

    let connected = tree.vertex_count() == graph.vertex_count();
    SpanningTree { tree, connected }
}

/// Builds a DFS expansion tree rooted at the first vertex, iteratively.
pub fn dfs_tree_iterative<K: Key>(graph: &Graph<K>) -> SpanningTree<K> {
    let mut tree = Graph::new();
    let Some(root) = graph.first_vertex() else {
        return SpanningTree {
            tree,
            connected: true,
        };
    };

    let mut visited: HashSet<K> = HashSet::new();
    // (vertex, parent edge) pairs; the parent is known at push time so the
    // level can be attached on first visit.
    let mut stack: Vec<(K, Option<(K, i64)>)> = vec![(root.clone(), None)];

    while let Some((vertex, parent)) = stack.pop() {
        if !visited.insert(vertex.clone()) {
            continue;
        }
        tree.add_vertex(vertex.clone()).expect("first visit");
        match parent {
            Some((parent, weight)) => {
                let level = tree.level(&parent).expect("parent was visited first");
                tree.set_level(&vertex, level + 1)
                    .expect("vertex was just added");
                tree.add_edge(&parent, &vertex, weight)
                    .expect("both endpoints are in the tree");
            }
            None => {
                tree.set_level(&vertex, 0).expect("vertex was just added");
            }
        }
        for (_, opposite, weight) in graph.incident_edges(&vertex) {
            if !visited.contains(opposite) {
                stack.push((opposite.clone(), Some((vertex.clone(), weight))));
            }
        }
    }

    let connected = tree.vertex_count() == graph.vertex_count();
    SpanningTree { tree, connected }
}

/// Builds a DFS expansion tree rooted at the first vertex, recursively.
pub fn dfs_tree_recursive<K: Key>(graph: &Graph<K>) -> SpanningTree<K> {
    let mut tree = Graph::new();
    let Some(root) = graph.first_vertex() else {
        return SpanningTree {
            tree,
            connected: true,
        };
    };

    let mut visited: HashSet<K> = HashSet::new();
    tree.add_vertex(root.clone()).expect("tree is empty");
    tree.set_level(root, 0).expect("root is in the tree");
    visited.insert(root.clone());
    visit(graph, &mut tree, &mut visited, root, 0);

    let connected = tree.vertex_count() == graph.vertex_count();
    SpanningTree { tree, connected }
}

fn visit<K: Key>(
    graph: &Graph<K>,
    tree: &mut Graph<K>,
    visited: &mut HashSet<K>,
    vertex: &K,
    level: u64,
) {
    for (_, opposite, weight) in graph.incident_edges(vertex) {
        if visited.insert(opposite.clone()) {
            tree.add_vertex(opposite.clone()).expect("first visit");
            tree.set_level(opposite, level + 1)
                .expect("vertex was just added");
            tree.add_edge(vertex, opposite, weight)
                .expect("both endpoints are in the tree");
            visit(graph, tree, visited, opposite, level + 1);
        }
    }
}
