/*!
# Euler Circuit Construction

Fleury's algorithm over the undirected [`Graph`]. The circuit is returned as
a [`Digraph`] whose arc weights are the 1-based traversal sequence: walking
the arcs in weight order 1, 2, ... retraces the circuit.

The walk operates on a working copy, consuming edges as it traverses them and
preferring, at every step, an edge whose far endpoint still has degree greater
than one; a vertex left with a single edge is bridge-constrained and follows
that forced edge. Vertices with no remaining edges are retired onto the
circuit.
*/

use tracing::debug;

use crate::core::digraph::Digraph;
use crate::core::error::{Error, Result};
use crate::core::graph::Graph;
use crate::core::types::{EdgeId, Key};

/// An Euler circuit plus the connectivity verdict.
///
/// `connected` holds exactly when the walk visited every vertex and consumed
/// every edge of the input.
#[derive(Debug, Clone)]
pub struct EulerCircuit<K: Key> {
    pub circuit: Digraph<K>,
    pub connected: bool,
}

/// Builds an Euler circuit of the graph starting from its first vertex.
///
/// # Errors
///
/// Returns an [`Error::Invariant`] if the graph is empty or any vertex has
/// odd degree.
pub fn fleury<K: Key>(graph: &Graph<K>) -> Result<EulerCircuit<K>> {
    if graph.is_empty() {
        return Err(Error::invariant(
            "an Euler circuit needs a nonempty graph",
        ));
    }
    for vertex in graph.vertices() {
        let degree = graph.degree(vertex).expect("iterated vertex exists");
        if degree % 2 != 0 {
            return Err(Error::invariant(format!(
                "vertex '{}' has odd degree {}",
                vertex, degree
            )));
        }
    }

    let mut work = graph.clone();
    let start = work.first_vertex().cloned().expect("graph is nonempty");

    let mut stack: Vec<K> = vec![start];
    let mut walk: Vec<K> = Vec::new();

    while let Some(vertex) = stack.last().cloned() {
        match pick_edge(&work, &vertex) {
            Some((edge, next)) => {
                work.remove_edge(edge);
                stack.push(next);
            }
            None => {
                walk.push(vertex);
                stack.pop();
            }
        }
    }
    walk.reverse();
    debug!(steps = walk.len().saturating_sub(1), "euler walk finished");

    let mut circuit = Digraph::new();
    let mut sequence = 0;
    for pair in walk.windows(2) {
        circuit.ensure_vertex(pair[0].clone());
        circuit.ensure_vertex(pair[1].clone());
        sequence += 1;
        circuit
            .add_arc(&pair[0], &pair[1], sequence)
            .expect("both endpoints were just ensured");
    }
    if circuit.is_empty() {
        // An edgeless graph: the circuit is the start vertex alone.
        circuit.ensure_vertex(walk[0].clone());
    }

    let connected =
        circuit.vertex_count() == graph.vertex_count() && work.edge_count() == 0;
    Ok(EulerCircuit { circuit, connected })
}

/// Picks the next edge out of `vertex`, preferring one whose opposite
/// endpoint still has degree greater than one.
fn pick_edge<K: Key>(work: &Graph<K>, vertex: &K) -> Option<(EdgeId, K)> {
    let mut fallback: Option<(EdgeId, K)> = None;
    for (edge, opposite, _) in work.incident_edges(vertex) {
        if work.degree(opposite).unwrap_or(0) > 1 {
            return Some((edge, opposite.clone()));
        }
        if fallback.is_none() {
            fallback = Some((edge, opposite.clone()));
        }
    }
    fallback
}
