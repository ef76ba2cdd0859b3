/*!
# Flow Network

The capacitated network used by the maximum-flow and minimum-cost-flow
algorithms. Vertices carry textual names because the flow transformations
synthesize reserved names (`a'`, `z'`, `a''`, `z''` and one dummy `X'` per
range-restricted vertex `X`); user input colliding with the four fixed
reserved names is rejected at insertion.

Unlike [`Digraph`](crate::core::digraph::Digraph), at most one arc may exist
per ordered vertex pair and loops are forbidden. Each arc carries a capacity,
a minimum restriction, the current flow and a unit cost. `restriction ≤ flow`
is established by the flow algorithms; insertion only demands
`0 ≤ flow ≤ capacity` and `0 ≤ restriction ≤ capacity`.

Side information that the algorithms need but the network does not own —
declared sources and sinks, per-vertex throughput ranges, productions and
demands — travels in a [`NetworkProfile`].
*/

use std::collections::{BTreeMap, HashMap};

use petgraph::Direction;
use petgraph::stable_graph::StableGraph;
use petgraph::visit::{EdgeRef, IntoEdgeReferences};

use crate::core::error::{Error, Result};
use crate::core::types::NodeId;

/// Name of the synthesized super-source.
pub const SUPER_SOURCE: &str = "a'";
/// Name of the synthesized super-sink.
pub const SUPER_SINK: &str = "z'";
/// Name of the super-super-source used while building an initial flow.
pub const AUX_SOURCE: &str = "a''";
/// Name of the super-super-sink used while building an initial flow.
pub const AUX_SINK: &str = "z''";

const RESERVED: [&str; 4] = [SUPER_SOURCE, SUPER_SINK, AUX_SOURCE, AUX_SINK];

/// Returns the dummy name standing in for a range-restricted vertex.
pub(crate) fn dummy_name(name: &str) -> String {
    format!("{}'", name)
}

/// Arc attributes: `restriction ≤ flow ≤ capacity` once a feasible flow has
/// been established; `cost` may be negative in marginal networks only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arc {
    pub capacity: i64,
    pub restriction: i64,
    pub flow: i64,
    pub cost: i64,
}

impl Arc {
    /// An arc with the given capacity and zero restriction, flow and cost.
    pub fn with_capacity(capacity: i64) -> Self {
        Self {
            capacity,
            restriction: 0,
            flow: 0,
            cost: 0,
        }
    }
}

/// Declared endpoints and vertex-level data accompanying a loaded network.
///
/// The network itself stores none of this; the loader fills it in and the
/// flow algorithms and the writer consume it.
#[derive(Debug, Clone, Default)]
pub struct NetworkProfile {
    /// Declared source vertices, in document order.
    pub sources: Vec<String>,
    /// Declared sink vertices, in document order.
    pub sinks: Vec<String>,
    /// Per-vertex throughput range `(min, max)`.
    pub ranges: BTreeMap<String, (i64, i64)>,
    /// Per-vertex production (positive) or demand (negative).
    pub supplies: BTreeMap<String, i64>,
    /// Vertex kind token from the input document (`source`, `sink`, ...).
    pub kinds: BTreeMap<String, String>,
}

/// Directed capacitated network keyed by vertex name.
#[derive(Debug, Clone, Default)]
pub struct Network {
    inner: StableGraph<String, Arc>,
    index: HashMap<String, NodeId>,
    pub(crate) current_flow: i64,
    pub(crate) current_cost: i64,
}

impl Network {
    /// Creates an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the network contains no vertices.
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
    pub fn contains_vertex(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Total flow routed by the last algorithm run on this network.
    pub fn current_flow(&self) -> i64 {
        self.current_flow
    }

    /// Total cost accumulated by the last algorithm run on this network.
    pub fn current_cost(&self) -> i64 {
        self.current_cost
    }

    /// Adds a vertex, rejecting the reserved transformation names.
    ///
    /// # Errors
    ///
    /// Returns an [`Error::Invariant`] if the name is reserved or taken.
    pub fn add_vertex(&mut self, name: impl Into<String>) -> Result<NodeId> {
        let name = name.into();
        if RESERVED.contains(&name.as_str()) {
            return Err(Error::invariant(format!(
                "vertex name '{}' is reserved",
                name
            )));
        }
        self.insert_vertex(name)
    }

    /// Adds a vertex without the reserved-name check. The transformations
    /// use this to synthesize `a'`, `z'`, `a''`, `z''` and dummies.
    pub(crate) fn insert_vertex(&mut self, name: String) -> Result<NodeId> {
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

    /// Removes a vertex and every arc incident to it.
    pub(crate) fn remove_vertex(&mut self, name: &str) -> bool {
        match self.index.remove(name) {
            Some(id) => {
                self.inner.remove_node(id.0);
                true
            }
            None => false,
        }
    }

    /// Adds an arc from `source` to `terminus`.
    ///
    /// # Errors
    ///
    /// Returns an [`Error::Invariant`] if an endpoint is missing, the arc
    /// would be a loop or a parallel arc, or the attributes are out of range.
    pub fn add_arc(&mut self, source: &str, terminus: &str, arc: Arc) -> Result<()> {
        if source == terminus {
            return Err(Error::invariant(format!(
                "loop arcs are not allowed in a network (vertex '{}')",
                source
            )));
        }
        if arc.capacity < 0 {
            return Err(Error::invariant(format!(
                "arc {} -> {} has negative capacity {}",
                source, terminus, arc.capacity
            )));
        }
        if arc.restriction < 0 || arc.restriction > arc.capacity {
            return Err(Error::invariant(format!(
                "arc {} -> {} has restriction {} outside [0, {}]",
                source, terminus, arc.restriction, arc.capacity
            )));
        }
        if arc.flow < 0 || arc.flow > arc.capacity {
            return Err(Error::invariant(format!(
                "arc {} -> {} has flow {} outside [0, {}]",
                source, terminus, arc.flow, arc.capacity
            )));
        }
        let a = self.require(source)?;
        let b = self.require(terminus)?;
        if self.inner.find_edge(a.0, b.0).is_some() {
            return Err(Error::invariant(format!(
                "parallel arc {} -> {} is not allowed in a network",
                source, terminus
            )));
        }
        self.inner.add_edge(a.0, b.0, arc);
        Ok(())
    }

    /// Removes the arc between the given pair, returning its attributes.
    pub(crate) fn remove_arc(&mut self, source: &str, terminus: &str) -> Option<Arc> {
        let a = *self.index.get(source)?;
        let b = *self.index.get(terminus)?;
        let edge = self.inner.find_edge(a.0, b.0)?;
        self.inner.remove_edge(edge)
    }

    /// Returns the arc between the given pair, if present.
    pub fn arc(&self, source: &str, terminus: &str) -> Option<&Arc> {
        let a = *self.index.get(source)?;
        let b = *self.index.get(terminus)?;
        let edge = self.inner.find_edge(a.0, b.0)?;
        self.inner.edge_weight(edge)
    }

    /// Returns the arc between the given pair mutably, if present.
    pub fn arc_mut(&mut self, source: &str, terminus: &str) -> Option<&mut Arc> {
        let a = *self.index.get(source)?;
        let b = *self.index.get(terminus)?;
        let edge = self.inner.find_edge(a.0, b.0)?;
        self.inner.edge_weight_mut(edge)
    }

    /// Iterates over vertex names in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &String> + '_ {
        self.inner
            .node_indices()
            .filter_map(|idx| self.inner.node_weight(idx))
    }

    /// Iterates over all arcs as `(source, terminus, attributes)`.
    pub fn arcs(&self) -> impl Iterator<Item = (&String, &String, &Arc)> + '_ {
        self.inner.edge_references().map(|edge| {
            (
                &self.inner[edge.source()],
                &self.inner[edge.target()],
                edge.weight(),
            )
        })
    }

    /// Iterates over the arcs leaving a vertex as `(terminus, attributes)`.
    pub fn out_arcs<'a>(&'a self, name: &str) -> impl Iterator<Item = (&'a String, &'a Arc)> + 'a {
        self.directed_arcs(name, Direction::Outgoing)
    }

    /// Iterates over the arcs entering a vertex as `(source, attributes)`.
    pub fn in_arcs<'a>(&'a self, name: &str) -> impl Iterator<Item = (&'a String, &'a Arc)> + 'a {
        self.directed_arcs(name, Direction::Incoming)
    }

    /// Returns the number of arcs leaving a vertex.
    pub fn out_degree(&self, name: &str) -> Option<usize> {
        let id = self.index.get(name)?;
        Some(self.inner.edges_directed(id.0, Direction::Outgoing).count())
    }

    /// Returns the number of arcs entering a vertex.
    pub fn in_degree(&self, name: &str) -> Option<usize> {
        let id = self.index.get(name)?;
        Some(self.inner.edges_directed(id.0, Direction::Incoming).count())
    }

    /// Sum of the flow on the arcs leaving a vertex.
    pub fn outgoing_flow(&self, name: &str) -> i64 {
        self.out_arcs(name).map(|(_, arc)| arc.flow).sum()
    }

    /// Sum of the flow on the arcs entering a vertex.
    pub fn incoming_flow(&self, name: &str) -> i64 {
        self.in_arcs(name).map(|(_, arc)| arc.flow).sum()
    }

    /// Total routing cost of the current flow, `Σ flow · cost`.
    pub fn total_cost(&self) -> i64 {
        self.arcs().map(|(_, _, arc)| arc.flow * arc.cost).sum()
    }

    /// Clears the flow on every arc.
    pub(crate) fn reset_flows(&mut self) {
        let edges: Vec<_> = self.inner.edge_indices().collect();
        for edge in edges {
            if let Some(arc) = self.inner.edge_weight_mut(edge) {
                arc.flow = 0;
            }
        }
    }

    fn directed_arcs<'a>(
        &'a self,
        name: &str,
        direction: Direction,
    ) -> impl Iterator<Item = (&'a String, &'a Arc)> + 'a {
        let id = self.index.get(name).copied();
        id.into_iter().flat_map(move |id| {
            self.inner.edges_directed(id.0, direction).map(move |edge| {
                let opposite = if direction == Direction::Outgoing {
                    edge.target()
                } else {
                    edge.source()
                };
                (&self.inner[opposite], edge.weight())
            })
        })
    }

    fn require(&self, name: &str) -> Result<NodeId> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| Error::invariant(format!("vertex '{}' does not exist", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> Network {
        let mut net = Network::new();
        for name in ["s", "v", "t"] {
            net.add_vertex(name).unwrap();
        }
        net.add_arc("s", "v", Arc::with_capacity(10)).unwrap();
        net.add_arc("v", "t", Arc::with_capacity(10)).unwrap();
        net
    }

    #[test]
    fn test_reserved_names_rejected() {
        let mut net = Network::new();
        for name in [SUPER_SOURCE, SUPER_SINK, AUX_SOURCE, AUX_SINK] {
            assert!(net.add_vertex(name).is_err(), "{} must be reserved", name);
        }
        assert!(net.add_vertex("a").is_ok());
    }

    #[test]
    fn test_loop_and_parallel_arcs_rejected() {
        let mut net = chain();
        assert!(net.add_arc("s", "s", Arc::with_capacity(1)).is_err());
        assert!(net.add_arc("s", "v", Arc::with_capacity(1)).is_err());
        // The reverse direction is a different ordered pair.
        assert!(net.add_arc("v", "s", Arc::with_capacity(1)).is_ok());
    }

    #[test]
    fn test_attribute_bounds_checked() {
        let mut net = chain();
        net.add_vertex("w").unwrap();
        let bad_capacity = Arc {
            capacity: -1,
            restriction: 0,
            flow: 0,
            cost: 0,
        };
        assert!(net.add_arc("s", "w", bad_capacity).is_err());
        let bad_restriction = Arc {
            capacity: 3,
            restriction: 4,
            flow: 0,
            cost: 0,
        };
        assert!(net.add_arc("s", "w", bad_restriction).is_err());
        let overfull = Arc {
            capacity: 3,
            restriction: 0,
            flow: 4,
            cost: 0,
        };
        assert!(net.add_arc("s", "w", overfull).is_err());
    }

    #[test]
    fn test_flow_sums() {
        let mut net = chain();
        net.arc_mut("s", "v").unwrap().flow = 4;
        net.arc_mut("v", "t").unwrap().flow = 4;
        assert_eq!(net.outgoing_flow("s"), 4);
        assert_eq!(net.incoming_flow("v"), 4);
        assert_eq!(net.outgoing_flow("v"), 4);
        assert_eq!(net.incoming_flow("t"), 4);
    }

    #[test]
    fn test_total_cost() {
        let mut net = chain();
        net.arc_mut("s", "v").unwrap().flow = 2;
        net.arc_mut("s", "v").unwrap().cost = 3;
        net.arc_mut("v", "t").unwrap().flow = 2;
        net.arc_mut("v", "t").unwrap().cost = 1;
        assert_eq!(net.total_cost(), 8);
    }
}
