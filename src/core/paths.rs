/*!
# Shortest Paths Algorithms

Shortest-path computations over the [`Digraph`]:

- **Generalized Dijkstra:**
  Single-source shortest paths tolerating negative arcs. A classical heap
  phase builds a first arborescence, then a relaxation phase re-examines the
  non-tree arcs in weight order and swaps improving arcs into the tree. When a
  swap would close a cycle through the `previous` chain, a negative cycle has
  been found; the cycle is returned as the result digraph with
  `cycle_found == true`, never as an error.

- **Floyd–Warshall:**
  All-pairs shortest paths over a `(previous, dist)` route table, with path
  retrieval and per-vertex arborescence extraction. A shortened diagonal
  fails with [`Error::NegativeCycle`].
*/

use std::collections::HashMap;

use tracing::debug;

use crate::core::digraph::Digraph;
use crate::core::error::{Error, Result};
use crate::core::heap::MinHeap;
use crate::core::types::{INFINITE, Key};

/// Vertex state inside the generalized Dijkstra. Vertices start at infinity
/// (absent from the map) and move one way through these two states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VertexState {
    Temporary,
    Definitive,
}

/// A shortest-path arborescence, or the negative cycle that prevented one.
///
/// With `cycle_found == false`, `tree` is the arborescence rooted at the
/// start vertex, `distances` maps every reached vertex to its shortest
/// distance and `previous` to its tree parent. With `cycle_found == true`,
/// `tree` holds exactly the vertices and arcs of one negative cycle.
#[derive(Debug, Clone)]
pub struct ShortestPathTree<K: Key> {
    pub tree: Digraph<K>,
    pub distances: HashMap<K, i64>,
    pub previous: HashMap<K, K>,
    pub cycle_found: bool,
}

/// Computes single-source shortest paths on a digraph that may carry
/// negative arcs.
///
/// # Errors
///
/// Returns an [`Error::Invariant`] if the start vertex does not exist.
/// A negative cycle is not an error; see [`ShortestPathTree`].
pub fn shortest_path_tree<K: Key>(digraph: &Digraph<K>, start: &K) -> Result<ShortestPathTree<K>> {
    if !digraph.contains_vertex(start) {
        return Err(Error::invariant(format!(
            "start vertex '{}' does not exist",
            start
        )));
    }

    let mut dist: HashMap<K, i64> = HashMap::new();
    let mut prev: HashMap<K, (K, i64)> = HashMap::new();
    let mut state: HashMap<K, VertexState> = HashMap::new();

    // Phase 1: classical Dijkstra. Improvements while a vertex is still
    // temporary swap its tree arc and re-insert it with the new distance.
    let mut heap: MinHeap<K> = MinHeap::new();
    dist.insert(start.clone(), 0);
    state.insert(start.clone(), VertexState::Temporary);
    heap.insert(0, start.clone());

    while let Ok((d, u)) = heap.delete_top() {
        if state.get(&u) == Some(&VertexState::Definitive) {
            continue;
        }
        if d > dist[&u] {
            continue;
        }
        state.insert(u.clone(), VertexState::Definitive);
        for (_, v, w) in digraph.out_arcs(&u) {
            if state.get(v) == Some(&VertexState::Definitive) {
                continue;
            }
            let candidate = d + w;
            if dist.get(v).is_none_or(|&dv| candidate < dv) {
                dist.insert(v.clone(), candidate);
                prev.insert(v.clone(), (u.clone(), w));
                state.insert(v.clone(), VertexState::Temporary);
                heap.insert(candidate, v.clone());
            }
        }
    }

    // Phase 2: negative-arc relaxation over the arcs that were left out of
    // the tree, cheapest first.
    let mut arc_heap: MinHeap<(K, K, i64)> = MinHeap::new();
    for (u, v, w) in digraph.arcs() {
        if dist.contains_key(u) && !is_tree_arc(&prev, u, v, w) {
            arc_heap.insert(w, (u.clone(), v.clone(), w));
        }
    }

    while let Ok((_, (u, v, w))) = arc_heap.delete_top() {
        let Some(&du) = dist.get(&u) else {
            continue;
        };
        match dist.get(&v).copied() {
            Some(dv) if du + w < dv => {
                if on_previous_chain(&prev, &u, &v) {
                    debug!(source = %u, terminus = %v, weight = w, "negative cycle closed");
                    return Ok(cycle_result(&prev, dist, u, v, w));
                }
                // The ejected in-arc of the terminus goes back on the heap.
                if let Some((p, pw)) = prev.get(&v).cloned() {
                    arc_heap.insert(pw, (p, v.clone(), pw));
                }
                let delta = dv - (du + w);
                prev.insert(v.clone(), (u.clone(), w));
                let subtree = collect_subtree(&prev, &v);
                for member in &subtree {
                    *dist.get_mut(member).expect("subtree members are reached") -= delta;
                }
                // Arcs leaving the lowered subtree may relax again.
                for member in &subtree {
                    for (_, y, aw) in digraph.out_arcs(member) {
                        if !is_tree_arc(&prev, member, y, aw) {
                            arc_heap.insert(aw, (member.clone(), y.clone(), aw));
                        }
                    }
                }
            }
            Some(_) => {}
            None => {
                // The terminus joins the tree for the first time.
                dist.insert(v.clone(), du + w);
                prev.insert(v.clone(), (u.clone(), w));
                for (_, y, aw) in digraph.out_arcs(&v) {
                    arc_heap.insert(aw, (v.clone(), y.clone(), aw));
                }
            }
        }
    }

    // Assemble the arborescence in the digraph's vertex order.
    let mut tree = Digraph::new();
    for vertex in digraph.vertices() {
        if dist.contains_key(vertex) {
            tree.add_vertex(vertex.clone()).expect("vertices are unique");
        }
    }
    for (child, (parent, weight)) in &prev {
        tree.add_arc(parent, child, *weight)
            .expect("tree endpoints were reached");
    }

    let previous = prev.into_iter().map(|(child, (parent, _))| (child, parent)).collect();
    Ok(ShortestPathTree {
        tree,
        distances: dist,
        previous,
        cycle_found: false,
    })
}

/// True if `(u, v, w)` is the arc currently attaching `v` to the tree.
fn is_tree_arc<K: Key>(prev: &HashMap<K, (K, i64)>, u: &K, v: &K, w: i64) -> bool {
    prev.get(v).is_some_and(|(p, pw)| p == u && *pw == w)
}

/// True if `target` lies on the `previous` chain from `from` to the root.
fn on_previous_chain<K: Key>(prev: &HashMap<K, (K, i64)>, from: &K, target: &K) -> bool {
    if from == target {
        return true;
    }
    let mut cursor = from;
    while let Some((parent, _)) = prev.get(cursor) {
        if parent == target {
            return true;
        }
        cursor = parent;
    }
    false
}

/// Collects `root` and every tree descendant of `root`.
fn collect_subtree<K: Key>(prev: &HashMap<K, (K, i64)>, root: &K) -> Vec<K> {
    let mut members = vec![root.clone()];
    let mut cursor = 0;
    while cursor < members.len() {
        let current = members[cursor].clone();
        for (child, (parent, _)) in prev {
            if *parent == current {
                members.push(child.clone());
            }
        }
        cursor += 1;
    }
    members
}

/// Builds the negative-cycle result: the `previous` chain from `u` back to
/// `v` plus the closing arc `(u, v, w)`.
fn cycle_result<K: Key>(
    prev: &HashMap<K, (K, i64)>,
    dist: HashMap<K, i64>,
    u: K,
    v: K,
    w: i64,
) -> ShortestPathTree<K> {
    let mut chain = vec![u.clone()];
    let mut cursor = u.clone();
    while cursor != v {
        let (parent, _) = prev[&cursor].clone();
        chain.push(parent.clone());
        cursor = parent;
    }

    let mut cycle = Digraph::new();
    for name in &chain {
        cycle.ensure_vertex(name.clone());
    }
    for pair in chain.windows(2) {
        let (child, parent) = (&pair[0], &pair[1]);
        let weight = prev[child].1;
        cycle
            .add_arc(parent, child, weight)
            .expect("chain vertices were added");
    }
    cycle.add_arc(&u, &v, w).expect("cycle endpoints were added");

    let previous = prev
        .iter()
        .map(|(child, (parent, _))| (child.clone(), parent.clone()))
        .collect();
    ShortestPathTree {
        tree: cycle,
        distances: dist,
        previous,
        cycle_found: true,
    }
}

/// One cell of the Floyd–Warshall route table.
#[derive(Debug, Clone, Copy)]
struct Route {
    previous: usize,
    dist: i64,
}

/// The all-pairs route table produced by [`floyd_warshall`].
#[derive(Debug, Clone)]
pub struct FloydRoutes<K: Key> {
    order: Vec<K>,
    index: HashMap<K, usize>,
    routes: Vec<Vec<Route>>,
}

/// Computes all-pairs shortest paths.
///
/// # Errors
///
/// Returns an [`Error::NegativeCycle`] if any relaxation shortens a
/// diagonal entry (including a negative loop arc at initialization).
pub fn floyd_warshall<K: Key>(digraph: &Digraph<K>) -> Result<FloydRoutes<K>> {
    let order: Vec<K> = digraph.vertices().cloned().collect();
    let n = order.len();
    let index: HashMap<K, usize> = order
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), i))
        .collect();

    let mut routes: Vec<Vec<Route>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| Route {
                    previous: i,
                    dist: if i == j { 0 } else { INFINITE },
                })
                .collect()
        })
        .collect();

    for (u, v, w) in digraph.arcs() {
        let i = index[u];
        let j = index[v];
        if i == j {
            if w < 0 {
                return Err(Error::negative_cycle(format!(
                    "vertex '{}' carries a negative loop",
                    u
                )));
            }
            continue;
        }
        if w < routes[i][j].dist {
            routes[i][j] = Route { previous: i, dist: w };
        }
    }

    for k in 0..n {
        for i in 0..n {
            if i == k || routes[i][k].dist == INFINITE {
                continue;
            }
            for j in 0..n {
                if j == k || routes[k][j].dist == INFINITE {
                    continue;
                }
                let candidate = routes[i][k].dist + routes[k][j].dist;
                if candidate < routes[i][j].dist {
                    if i == j {
                        return Err(Error::negative_cycle(format!(
                            "a negative cycle passes through vertex '{}'",
                            order[i]
                        )));
                    }
                    routes[i][j] = Route {
                        previous: routes[k][j].previous,
                        dist: candidate,
                    };
                }
            }
        }
    }

    Ok(FloydRoutes {
        order,
        index,
        routes,
    })
}

impl<K: Key> FloydRoutes<K> {
    /// Shortest distance from `a` to `b`, or `None` if `b` is unreachable.
    pub fn distance(&self, a: &K, b: &K) -> Option<i64> {
        let i = *self.index.get(a)?;
        let j = *self.index.get(b)?;
        let dist = self.routes[i][j].dist;
        (dist != INFINITE).then_some(dist)
    }

    /// Shortest path from `a` to `b` as a vertex sequence, or `None` if no
    /// path exists.
    pub fn retrieve_path(&self, a: &K, b: &K) -> Option<Vec<K>> {
        let i = *self.index.get(a)?;
        let j = *self.index.get(b)?;
        if self.routes[i][j].dist == INFINITE {
            return None;
        }
        let mut path = vec![self.order[j].clone()];
        let mut cursor = j;
        while cursor != i {
            cursor = self.routes[i][cursor].previous;
            path.push(self.order[cursor].clone());
        }
        path.reverse();
        Some(path)
    }

    /// Extracts, for every vertex, its shortest-path arborescence.
    pub fn shortest_path_trees(&self) -> Vec<(K, Digraph<K>)> {
        let n = self.order.len();
        let mut trees = Vec::with_capacity(n);
        for r in 0..n {
            let mut tree = Digraph::new();
            for j in 0..n {
                if self.routes[r][j].dist != INFINITE {
                    tree.ensure_vertex(self.order[j].clone());
                }
            }
            for j in 0..n {
                if j == r || self.routes[r][j].dist == INFINITE {
                    continue;
                }
                let p = self.routes[r][j].previous;
                let weight = self.routes[r][j].dist - self.routes[r][p].dist;
                tree.add_arc(&self.order[p], &self.order[j], weight)
                    .expect("reachable vertices are in the tree");
            }
            trees.push((self.order[r].clone(), tree));
        }
        trees
    }
}
