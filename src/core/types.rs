/*!
# Shared Core Types

Identifier newtypes and scalar conventions shared by the graph, digraph and
network structures. All three wrap petgraph's `StableGraph`: stable indices
survive removals, which the edge-consuming and transformation algorithms rely
on, and insertion order doubles as the deterministic vertex iteration order.
*/

use std::fmt::{Debug, Display};
use std::hash::Hash;

use petgraph::graph::{EdgeIndex, NodeIndex};

/// Sentinel for an unbounded capacity or an unreachable distance.
pub const INFINITE: i64 = i64::MAX;

/// Bound alias for vertex identifiers: an opaque comparable, hashable token.
pub trait Key: Clone + Eq + Hash + Ord + Debug + Display {}

impl<T: Clone + Eq + Hash + Ord + Debug + Display> Key for T {}

/// Wrapper for `NodeIndex` that hides the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) NodeIndex);

impl NodeId {
    /// Returns the numeric part of the vertex index.
    pub fn index(&self) -> usize {
        self.0.index()
    }

    pub(crate) fn new(index: NodeIndex) -> Self {
        Self(index)
    }
}

/// Wrapper for `EdgeIndex` that hides the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId(pub(crate) EdgeIndex);

impl EdgeId {
    /// Returns the numeric part of the edge index.
    pub fn index(&self) -> usize {
        self.0.index()
    }

    pub(crate) fn new(index: EdgeIndex) -> Self {
        Self(index)
    }
}
