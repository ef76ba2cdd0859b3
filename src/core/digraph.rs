/*!
# Directed Graph

The directed weighted graph used by the shortest-path algorithms and, as the
marginal (residual) structure, by the minimum-cost flow solvers. Every arc is
visible from both endpoints through the in/out views; parallel arcs between
the same ordered pair are allowed.
*/

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::stable_graph::StableGraph;
use petgraph::visit::{EdgeRef, IntoEdgeReferences};

use crate::core::error::{Error, Result};
use crate::core::types::{EdgeId, Key, NodeId};

/// Directed weighted graph keyed by vertex name.
#[derive(Debug, Clone)]
pub struct Digraph<K: Key> {
    inner: StableGraph<K, i64>,
    index: HashMap<K, NodeId>,
}

impl<K: Key> Default for Digraph<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key> Digraph<K> {
    /// Creates an empty digraph.
    pub fn new() -> Self {
        Self {
            inner: StableGraph::default(),
            index: HashMap::new(),
        }
    }

    /// Returns true if the digraph contains no vertices.
    pub fn is_empty(&self) -> bool {
        self.inner.node_count() == 0
    }

    /// Returns the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Returns the number of arcs.
    pub fn arc_count(&self) -> usize {
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
        let id = NodeId::new(self.inner.add_node(name.clone()));
        self.index.insert(name, id);
        Ok(id)
    }

    /// Adds the vertex if it is not present yet.
    pub fn ensure_vertex(&mut self, name: K) -> NodeId {
        match self.index.get(&name) {
            Some(id) => *id,
            None => self.add_vertex(name).expect("vertex is not present"),
        }
    }

    /// Adds an arc from `source` to `terminus`. Parallel arcs are allowed.
    ///
    /// # Errors
    ///
    /// Returns an [`Error::Invariant`] if either endpoint is missing.
    pub fn add_arc(&mut self, source: &K, terminus: &K, weight: i64) -> Result<EdgeId> {
        let a = self.require(source)?;
        let b = self.require(terminus)?;
        Ok(EdgeId::new(self.inner.add_edge(a.0, b.0, weight)))
    }

    /// Returns the number of arcs leaving a vertex.
    pub fn out_degree(&self, name: &K) -> Option<usize> {
        let id = self.index.get(name)?;
        Some(self.inner.edges_directed(id.0, Direction::Outgoing).count())
    }

    /// Returns the number of arcs entering a vertex.
    pub fn in_degree(&self, name: &K) -> Option<usize> {
        let id = self.index.get(name)?;
        Some(self.inner.edges_directed(id.0, Direction::Incoming).count())
    }

    /// Iterates over vertex names in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &K> + '_ {
        self.inner
            .node_indices()
            .filter_map(|idx| self.inner.node_weight(idx))
    }

    /// Returns the first vertex in insertion order, if any.
    pub fn first_vertex(&self) -> Option<&K> {
        self.vertices().next()
    }

    /// Iterates over all arcs as `(source, terminus, weight)`.
    pub fn arcs(&self) -> impl Iterator<Item = (&K, &K, i64)> + '_ {
        self.inner.edge_references().map(|edge| {
            (
                &self.inner[edge.source()],
                &self.inner[edge.target()],
                *edge.weight(),
            )
        })
    }

    /// Iterates over the arcs leaving a vertex as
    /// `(arc, opposite endpoint, weight)`.
    pub fn out_arcs<'a>(&'a self, name: &K) -> impl Iterator<Item = (EdgeId, &'a K, i64)> + 'a {
        self.directed_arcs(name, Direction::Outgoing)
    }

    /// Iterates over the arcs entering a vertex as
    /// `(arc, opposite endpoint, weight)`.
    pub fn in_arcs<'a>(&'a self, name: &K) -> impl Iterator<Item = (EdgeId, &'a K, i64)> + 'a {
        self.directed_arcs(name, Direction::Incoming)
    }

    /// Iterates over the arcs from `source` to `terminus` as `(arc, weight)`.
    pub fn arcs_between<'a>(
        &'a self,
        source: &K,
        terminus: &K,
    ) -> impl Iterator<Item = (EdgeId, i64)> + 'a {
        let src = self.index.get(source).copied();
        let dst = self.index.get(terminus).copied();
        src.into_iter().flat_map(move |src| {
            self.inner
                .edges_directed(src.0, Direction::Outgoing)
                .filter(move |edge| Some(NodeId::new(edge.target())) == dst)
                .map(|edge| (EdgeId::new(edge.id()), *edge.weight()))
        })
    }

    fn directed_arcs<'a>(
        &'a self,
        name: &K,
        direction: Direction,
    ) -> impl Iterator<Item = (EdgeId, &'a K, i64)> + 'a {
        let id = self.index.get(name).copied();
        id.into_iter().flat_map(move |id| {
            self.inner.edges_directed(id.0, direction).map(move |edge| {
                let opposite = if direction == Direction::Outgoing {
                    edge.target()
                } else {
                    edge.source()
                };
                (EdgeId::new(edge.id()), &self.inner[opposite], *edge.weight())
            })
        })
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

    fn sample() -> Digraph<&'static str> {
        let mut g = Digraph::new();
        for name in ["a", "b", "c"] {
            g.add_vertex(name).unwrap();
        }
        g.add_arc(&"a", &"b", 1).unwrap();
        g.add_arc(&"a", &"c", 4).unwrap();
        g.add_arc(&"b", &"c", 2).unwrap();
        g
    }

    #[test]
    fn test_in_and_out_views_agree() {
        let g = sample();
        assert_eq!(g.out_degree(&"a"), Some(2));
        assert_eq!(g.in_degree(&"a"), Some(0));
        assert_eq!(g.in_degree(&"c"), Some(2));

        let out: Vec<(&str, i64)> = g.out_arcs(&"a").map(|(_, t, w)| (*t, w)).collect();
        assert!(out.contains(&("b", 1)));
        assert!(out.contains(&("c", 4)));

        let into: Vec<(&str, i64)> = g.in_arcs(&"c").map(|(_, s, w)| (*s, w)).collect();
        assert!(into.contains(&("a", 4)));
        assert!(into.contains(&("b", 2)));
    }

    #[test]
    fn test_parallel_arcs_are_allowed() {
        let mut g = sample();
        g.add_arc(&"a", &"b", 1).unwrap();
        g.add_arc(&"a", &"b", 9).unwrap();
        assert_eq!(g.out_degree(&"a"), Some(4));
        assert_eq!(g.arcs_between(&"a", &"b").count(), 3);
    }

    #[test]
    fn test_missing_endpoint_rejected() {
        let mut g = sample();
        assert!(g.add_arc(&"a", &"x", 1).is_err());
        assert!(g.add_vertex("a").is_err());
    }
}
