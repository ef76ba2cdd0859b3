/*!
# Undirected Graph

The undirected weighted graph used by the Euler-circuit, traversal and
spanning-tree algorithms. Vertices are identified by an opaque comparable
token; each edge is incident to both endpoints, and a loop contributes two to
the degree of its vertex. The `level` attribute is meaningful only inside a
tree produced by BFS/DFS.

# Examples

```rust
use arista::core::graph::Graph;

let mut g = Graph::new();
g.add_vertex("a").unwrap();
g.add_vertex("b").unwrap();
g.add_edge(&"a", &"b", 3).unwrap();

assert_eq!(g.degree(&"a"), Some(1));
assert_eq!(g.edge_count(), 1);
```
*/

use std::collections::HashMap;

use petgraph::Undirected;
use petgraph::stable_graph::StableGraph;
use petgraph::visit::{EdgeRef, IntoEdgeReferences};

use crate::core::error::{Error, Result};
use crate::core::types::{EdgeId, Key, NodeId};

/// Vertex record: the caller-supplied name plus traversal bookkeeping.
#[derive(Debug, Clone)]
struct Vertex<K> {
    name: K,
    level: Option<u64>,
}

/// Undirected weighted graph keyed by vertex name.
#[derive(Debug, Clone)]
pub struct Graph<K: Key> {
    inner: StableGraph<Vertex<K>, i64, Undirected>,
    index: HashMap<K, NodeId>,
}

impl<K: Key> Default for Graph<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key> Graph<K> {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            inner: StableGraph::default(),
            index: HashMap::new(),
        }
    }

    /// Returns true if the graph contains no vertices.
    pub fn is_empty(&self) -> bool {
        self.inner.node_count() == 0
    }

    /// Returns the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Returns the number of edges, loops included once.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Returns true if a vertex with this name exists.
    pub fn contains_vertex(&self, name: &K) -> bool {
        self.index.contains_key(name)
    }

    /// Adds a vertex with the given name.
    ///
    /// # Errors
    ///
    /// Returns an [`Error::Invariant`] if the name is already taken.
    pub fn add_vertex(&mut self, name: K) -> Result<NodeId> {
        if self.index.contains_key(&name) {
            return Err(Error::invariant(format!(
                "vertex '{}' already exists",
                name
            )));
        }
        let id = NodeId::new(self.inner.add_node(Vertex {
            name: name.clone(),
            level: None,
        }));
        self.index.insert(name, id);
        Ok(id)
    }

    /// Adds an edge between two existing vertices. Loops are allowed.
    ///
    /// # Errors
    ///
    /// Returns an [`Error::Invariant`] if either endpoint is missing.
    pub fn add_edge(&mut self, source: &K, terminus: &K, weight: i64) -> Result<EdgeId> {
        let a = self.require(source)?;
        let b = self.require(terminus)?;
        Ok(EdgeId::new(self.inner.add_edge(a.0, b.0, weight)))
    }

    /// Removes an edge, returning its weight if it existed.
    pub fn remove_edge(&mut self, edge: EdgeId) -> Option<i64> {
        self.inner.remove_edge(edge.0)
    }

    /// Returns the degree of a vertex, counting each loop twice.
    pub fn degree(&self, name: &K) -> Option<usize> {
        let id = self.index.get(name)?;
        let mut degree = 0;
        for edge in self.inner.edges(id.0) {
            degree += if edge.source() == edge.target() { 2 } else { 1 };
        }
        Some(degree)
    }

    /// Returns the BFS/DFS level of a vertex, if one was assigned.
    pub fn level(&self, name: &K) -> Option<u64> {
        let id = self.index.get(name)?;
        self.inner.node_weight(id.0).and_then(|v| v.level)
    }

    /// Assigns a traversal level to a vertex.
    ///
    /// # Errors
    ///
    /// Returns an [`Error::Invariant`] if the vertex is missing.
    pub fn set_level(&mut self, name: &K, level: u64) -> Result<()> {
        let id = self.require(name)?;
        let vertex = self
            .inner
            .node_weight_mut(id.0)
            .expect("indexed vertex exists");
        vertex.level = Some(level);
        Ok(())
    }

    /// Iterates over vertex names in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &K> + '_ {
        self.inner
            .node_indices()
            .filter_map(|idx| self.inner.node_weight(idx))
            .map(|v| &v.name)
    }

    /// Returns the first vertex in insertion order, if any.
    pub fn first_vertex(&self) -> Option<&K> {
        self.vertices().next()
    }

    /// Iterates over all edges as `(source, terminus, weight)`.
    pub fn edges(&self) -> impl Iterator<Item = (&K, &K, i64)> + '_ {
        self.inner.edge_references().map(|edge| {
            let src = &self.inner[edge.source()].name;
            let dst = &self.inner[edge.target()].name;
            (src, dst, *edge.weight())
        })
    }

    /// Iterates over the edges incident to a vertex as
    /// `(edge, opposite endpoint, weight)`. Loops report the vertex itself
    /// as the opposite endpoint and appear once.
    pub fn incident_edges<'a>(
        &'a self,
        name: &K,
    ) -> impl Iterator<Item = (EdgeId, &'a K, i64)> + 'a {
        let id = self.index.get(name).copied();
        id.into_iter().flat_map(move |id| {
            self.inner.edges(id.0).map(move |edge| {
                let opposite = if edge.source() == id.0 {
                    edge.target()
                } else {
                    edge.source()
                };
                (
                    EdgeId::new(edge.id()),
                    &self.inner[opposite].name,
                    *edge.weight(),
                )
            })
        })
    }

    /// Returns the number of loop edges.
    pub fn loop_count(&self) -> usize {
        self.inner
            .edge_references()
            .filter(|e| e.source() == e.target())
            .count()
    }

    fn require(&self, name: &K) -> Result<NodeId> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| Error::invariant(format!("vertex '{}' does not exist", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degree_sum_counts_loops_twice() {
        let mut g = Graph::new();
        for name in ["a", "b", "c"] {
            g.add_vertex(name).unwrap();
        }
        g.add_edge(&"a", &"b", 1).unwrap();
        g.add_edge(&"b", &"c", 2).unwrap();
        g.add_edge(&"c", &"c", 5).unwrap();

        assert_eq!(g.degree(&"a"), Some(1));
        assert_eq!(g.degree(&"b"), Some(2));
        assert_eq!(g.degree(&"c"), Some(3));

        let degree_sum: usize = ["a", "b", "c"].iter().map(|v| g.degree(v).unwrap()).sum();
        assert_eq!(degree_sum, 2 * g.edge_count() + g.loop_count());
    }

    #[test]
    fn test_duplicate_vertex_rejected() {
        let mut g = Graph::new();
        g.add_vertex("a").unwrap();
        assert!(g.add_vertex("a").is_err());
    }

    #[test]
    fn test_edge_requires_both_endpoints() {
        let mut g = Graph::new();
        g.add_vertex("a").unwrap();
        assert!(g.add_edge(&"a", &"b", 1).is_err());
    }

    #[test]
    fn test_vertices_iterate_in_insertion_order() {
        let mut g = Graph::new();
        for name in ["z", "m", "a"] {
            g.add_vertex(name).unwrap();
        }
        let order: Vec<&str> = g.vertices().copied().collect();
        assert_eq!(order, vec!["z", "m", "a"]);
        assert_eq!(g.first_vertex(), Some(&"z"));
    }

    #[test]
    fn test_remove_edge_updates_degree() {
        let mut g = Graph::new();
        g.add_vertex("a").unwrap();
        g.add_vertex("b").unwrap();
        let e = g.add_edge(&"a", &"b", 1).unwrap();
        assert_eq!(g.remove_edge(e), Some(1));
        assert_eq!(g.degree(&"a"), Some(0));
        assert_eq!(g.edge_count(), 0);
    }
}
