/*!
# Network Flow Algorithms

Maximum-flow and minimum-cost-flow computations over the [`Network`]:

- **Transformations:**
  Reduce a network with multiple sources and sinks, arc minimum restrictions
  and per-vertex throughput ranges to a canonical single-source,
  single-sink network. A super-source `a'` feeds every declared source and a
  super-sink `z'` drains every sink; each range-restricted vertex `X` is
  split through a dummy `X'` whose connecting arc meters the throughput.

- **Initial feasible flow:**
  Absorbs arc minimum restrictions with a second reduction through `a''` and
  `z''`, solved by the same Ford–Fulkerson core; failure to saturate means
  the restrictions are unsatisfiable.

- **Ford–Fulkerson:**
  Label-correcting augmenting-chain search with forward and backward arcs,
  optionally clamped to a prescribed target flow.

- **Minimum-cost flow:**
  Either by negative-cycle cancellation on the marginal (residual) network,
  probing the generalized Dijkstra from every vertex, or by successive
  shortest-path augmentation from `a'`.

Every public algorithm copies its input; the returned network is fresh and
already reverted to the caller's vertex set.
*/

use std::collections::{BTreeMap, HashMap, VecDeque};

use tracing::debug;

use crate::core::digraph::Digraph;
use crate::core::error::{Error, Result};
use crate::core::network::{
    AUX_SINK, AUX_SOURCE, Arc, Network, NetworkProfile, SUPER_SINK, SUPER_SOURCE, dummy_name,
};
use crate::core::paths::shortest_path_tree;
use crate::core::types::{EdgeId, INFINITE};

/// A maximum flow and the network carrying it.
#[derive(Debug, Clone)]
pub struct MaxFlow {
    pub network: Network,
    pub flow: i64,
}

/// A routing of some flow at minimum cost.
///
/// `solution_found` is false when the shortest-path solver could not reach
/// the prescribed throughput; the partial routing is still returned.
#[derive(Debug, Clone)]
pub struct MinCostFlow {
    pub network: Network,
    pub flow: i64,
    pub cost: i64,
    pub solution_found: bool,
}

/// The marginal (residual) digraph of a network plus the residual capacity
/// and orientation of each of its arcs.
#[derive(Debug, Clone)]
pub struct Marginal {
    pub graph: Digraph<String>,
    arcs: HashMap<EdgeId, MarginalArc>,
}

#[derive(Debug, Clone)]
struct MarginalArc {
    residual: i64,
    source: String,
    terminus: String,
    forward: bool,
}

impl Marginal {
    /// Residual capacity of the arc from `source` to `terminus` with the
    /// given weight, if one exists.
    pub fn residual(&self, source: &String, terminus: &String, weight: i64) -> Option<i64> {
        self.matching(source, terminus, weight)
            .map(|(_, arc)| arc.residual)
    }

    /// Picks one concrete marginal arc for `(source, terminus, weight)`.
    /// Residual arcs that tie on all three are interchangeable for cost.
    fn matching(&self, source: &String, terminus: &String, weight: i64) -> Option<(EdgeId, &MarginalArc)> {
        self.graph
            .arcs_between(source, terminus)
            .find(|(_, w)| *w == weight)
            .map(|(edge, _)| (edge, &self.arcs[&edge]))
    }
}

/// Builds the marginal network of the current flow.
///
/// Every network arc `u -> v` contributes a forward arc `u -> v` weighted
/// `+cost` while `flow < capacity` and a backward arc `v -> u` weighted
/// `-cost` while `flow > restriction`.
pub fn marginal_network(network: &Network) -> Marginal {
    let mut graph = Digraph::new();
    for vertex in network.vertices() {
        graph
            .add_vertex(vertex.clone())
            .expect("network vertices are unique");
    }
    let mut arcs = HashMap::new();
    for (u, v, arc) in network.arcs() {
        if arc.flow < arc.capacity {
            let edge = graph
                .add_arc(u, v, arc.cost)
                .expect("both endpoints mirror network vertices");
            arcs.insert(
                edge,
                MarginalArc {
                    residual: arc.capacity - arc.flow,
                    source: u.clone(),
                    terminus: v.clone(),
                    forward: true,
                },
            );
        }
        if arc.flow > arc.restriction {
            let edge = graph
                .add_arc(v, u, -arc.cost)
                .expect("both endpoints mirror network vertices");
            arcs.insert(
                edge,
                MarginalArc {
                    residual: arc.flow - arc.restriction,
                    source: u.clone(),
                    terminus: v.clone(),
                    forward: false,
                },
            );
        }
    }
    Marginal { graph, arcs }
}

/// Reduces the network to a single-source, single-sink shape.
///
/// Adds `a'` and `z'`, wires them to the declared sources and sinks with
/// unbounded zero-cost arcs, and splits every range-restricted vertex `X`
/// through a dummy `X'` carrying the range as the connecting arc's bounds.
///
/// # Errors
///
/// Returns an [`Error::Invariant`] if a declared source, sink or ranged
/// vertex does not exist, or if the pre-loaded flows violate a range.
pub fn make_transformations(net: &mut Network, profile: &NetworkProfile) -> Result<()> {
    net.insert_vertex(SUPER_SOURCE.to_string())?;
    net.insert_vertex(SUPER_SINK.to_string())?;

    for source in &profile.sources {
        if !net.contains_vertex(source) {
            return Err(Error::invariant(format!(
                "declared source '{}' does not exist",
                source
            )));
        }
        let flow = net.outgoing_flow(source);
        net.add_arc(
            SUPER_SOURCE,
            source,
            Arc {
                capacity: INFINITE,
                restriction: 0,
                flow,
                cost: 0,
            },
        )?;
    }
    for sink in &profile.sinks {
        if !net.contains_vertex(sink) {
            return Err(Error::invariant(format!(
                "declared sink '{}' does not exist",
                sink
            )));
        }
        let flow = net.incoming_flow(sink);
        net.add_arc(
            sink,
            SUPER_SINK,
            Arc {
                capacity: INFINITE,
                restriction: 0,
                flow,
                cost: 0,
            },
        )?;
    }

    for (vertex, (low, high)) in &profile.ranges {
        if !net.contains_vertex(vertex) {
            return Err(Error::invariant(format!(
                "range-restricted vertex '{}' does not exist",
                vertex
            )));
        }
        let dummy = dummy_name(vertex);
        net.insert_vertex(dummy.clone())?;
        let moved: Vec<(String, Arc)> = net
            .out_arcs(vertex)
            .map(|(terminus, arc)| (terminus.clone(), *arc))
            .collect();
        let mut moved_flow = 0;
        for (terminus, arc) in &moved {
            net.remove_arc(vertex, terminus);
            net.add_arc(&dummy, terminus, *arc)?;
            moved_flow += arc.flow;
        }
        net.add_arc(
            vertex,
            &dummy,
            Arc {
                capacity: *high,
                restriction: *low,
                flow: moved_flow,
                cost: 0,
            },
        )?;
    }
    Ok(())
}

/// Undoes [`make_transformations`]: removes `a'` and `z'` and folds every
/// dummy `X'` back into its vertex, arcs and attributes preserved.
pub fn revert_transformations(net: &mut Network, profile: &NetworkProfile) -> Result<()> {
    net.remove_vertex(SUPER_SOURCE);
    net.remove_vertex(SUPER_SINK);
    for vertex in profile.ranges.keys() {
        let dummy = dummy_name(vertex);
        let moved: Vec<(String, Arc)> = net
            .out_arcs(&dummy)
            .map(|(terminus, arc)| (terminus.clone(), *arc))
            .collect();
        net.remove_vertex(&dummy);
        for (terminus, arc) in moved {
            net.add_arc(vertex, &terminus, arc)?;
        }
    }
    Ok(())
}

/// Absorbs arc minimum restrictions by building an initial feasible flow.
///
/// Expects the network to be transformed already (`a'` and `z'` present).
/// Restricted arcs are relaxed to zero restriction with reduced capacity,
/// `a''` and `z''` absorb the restriction totals per vertex, and circulation
/// arcs `a' <-> z'` close the loop. The auxiliary maximum flow must saturate
/// every arc out of `a''`; its flow is then folded back onto the restricted
/// arcs, each filled exactly up to its restriction.
///
/// # Errors
///
/// Returns an [`Error::Infeasible`] if the restrictions cannot be met.
pub fn find_initial_flow(net: &mut Network) -> Result<()> {
    let restricted: Vec<(String, String, i64)> = net
        .arcs()
        .filter(|(_, _, arc)| arc.restriction > 0)
        .map(|(u, v, arc)| (u.clone(), v.clone(), arc.restriction))
        .collect();
    if restricted.is_empty() {
        return Ok(());
    }
    debug!(arcs = restricted.len(), "building an initial feasible flow");

    net.insert_vertex(AUX_SOURCE.to_string())?;
    net.insert_vertex(AUX_SINK.to_string())?;
    net.add_arc(SUPER_SOURCE, SUPER_SINK, Arc::with_capacity(INFINITE))?;
    net.add_arc(SUPER_SINK, SUPER_SOURCE, Arc::with_capacity(INFINITE))?;

    let mut out_restrictions: BTreeMap<String, i64> = BTreeMap::new();
    let mut in_restrictions: BTreeMap<String, i64> = BTreeMap::new();
    for (u, v, restriction) in &restricted {
        let arc = net.arc_mut(u, v).expect("restricted arc exists");
        arc.capacity -= restriction;
        arc.restriction = 0;
        *out_restrictions.entry(u.clone()).or_insert(0) += restriction;
        *in_restrictions.entry(v.clone()).or_insert(0) += restriction;
    }
    for (u, total) in &out_restrictions {
        net.add_arc(u, AUX_SINK, Arc::with_capacity(*total))?;
    }
    for (v, total) in &in_restrictions {
        net.add_arc(AUX_SOURCE, v, Arc::with_capacity(*total))?;
    }

    augment(net, AUX_SOURCE, AUX_SINK, None);

    for (vertex, arc) in net.out_arcs(AUX_SOURCE) {
        if arc.flow < arc.capacity {
            return Err(Error::infeasible(format!(
                "the minimum restrictions into '{}' cannot be satisfied",
                vertex
            )));
        }
    }

    // Fold the auxiliary flow back: restore each restricted arc's bounds and
    // top it up to its restriction, consuming the budgets on the arcs next
    // to `a''` and `z''`. The `placed` ledger keeps the two passes from
    // filling the same arc twice.
    for (u, v, restriction) in &restricted {
        let arc = net.arc_mut(u, v).expect("restricted arc exists");
        arc.capacity += restriction;
        arc.restriction = *restriction;
    }
    let mut placed: HashMap<(String, String), i64> = HashMap::new();
    for u in out_restrictions.keys() {
        let mut budget = net.arc(u, AUX_SINK).expect("budget arc exists").flow;
        for (au, av, restriction) in restricted.iter().filter(|(au, _, _)| au == u) {
            if budget == 0 {
                break;
            }
            let arc = net.arc_mut(au, av).expect("restricted arc exists");
            let done = placed.entry((au.clone(), av.clone())).or_insert(0);
            let add = (restriction - *done).min(budget).min(arc.capacity - arc.flow);
            if add > 0 {
                arc.flow += add;
                *done += add;
                budget -= add;
            }
        }
    }
    for v in in_restrictions.keys() {
        let mut budget = net.arc(AUX_SOURCE, v).expect("budget arc exists").flow;
        for (au, av, restriction) in restricted.iter().filter(|(_, av, _)| av == v) {
            if budget == 0 {
                break;
            }
            let arc = net.arc_mut(au, av).expect("restricted arc exists");
            let done = placed.entry((au.clone(), av.clone())).or_insert(0);
            let add = (restriction - *done).min(budget).min(arc.capacity - arc.flow);
            if add > 0 {
                arc.flow += add;
                *done += add;
                budget -= add;
            }
        }
    }

    net.remove_vertex(AUX_SOURCE);
    net.remove_vertex(AUX_SINK);
    net.remove_arc(SUPER_SOURCE, SUPER_SINK);
    net.remove_arc(SUPER_SINK, SUPER_SOURCE);
    Ok(())
}

/// Chain label attached to a vertex during the augmenting search.
#[derive(Debug, Clone)]
struct Label {
    parent: String,
    forward: bool,
    chain: i64,
}

/// Vertex marking inside one augmenting search; unmarked vertices are unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Touched,
    Examined,
}

/// The Ford–Fulkerson core loop between two vertices of `net`.
///
/// Starts from whatever flow the network already carries and augments until
/// no chain remains or the optional target total is reached. Returns the
/// total flow out of `source`.
fn augment(net: &mut Network, source: &str, sink: &str, target: Option<i64>) -> i64 {
    let mut total = net.outgoing_flow(source) - net.incoming_flow(source);
    if target.is_some_and(|t| total >= t) {
        return total;
    }

    loop {
        let mut labels: HashMap<String, Label> = HashMap::new();
        let mut marks: HashMap<String, Mark> = HashMap::new();
        let mut touched: VecDeque<String> = VecDeque::new();
        marks.insert(source.to_string(), Mark::Touched);
        touched.push_back(source.to_string());

        let mut reached = false;
        while let Some(vertex) = touched.pop_front() {
            let chain = labels.get(&vertex).map_or(INFINITE, |label| label.chain);
            for (terminus, arc) in net.out_arcs(&vertex) {
                if !marks.contains_key(terminus) && arc.flow < arc.capacity {
                    labels.insert(
                        terminus.clone(),
                        Label {
                            parent: vertex.clone(),
                            forward: true,
                            chain: chain.min(arc.capacity - arc.flow),
                        },
                    );
                    marks.insert(terminus.clone(), Mark::Touched);
                    touched.push_back(terminus.clone());
                }
            }
            for (origin, arc) in net.in_arcs(&vertex) {
                if !marks.contains_key(origin) && arc.flow > arc.restriction {
                    labels.insert(
                        origin.clone(),
                        Label {
                            parent: vertex.clone(),
                            forward: false,
                            chain: chain.min(arc.flow - arc.restriction),
                        },
                    );
                    marks.insert(origin.clone(), Mark::Touched);
                    touched.push_back(origin.clone());
                }
            }
            marks.insert(vertex, Mark::Examined);
            if marks.get(sink) == Some(&Mark::Touched) {
                reached = true;
                break;
            }
        }
        if !reached {
            break;
        }

        let mut amount = labels[sink].chain;
        if let Some(t) = target {
            amount = amount.min(t - total);
        }
        let mut cursor = sink.to_string();
        while cursor != source {
            let label = labels[&cursor].clone();
            if label.forward {
                let arc = net
                    .arc_mut(&label.parent, &cursor)
                    .expect("forward chain arc exists");
                arc.flow += amount;
            } else {
                let arc = net
                    .arc_mut(&cursor, &label.parent)
                    .expect("backward chain arc exists");
                arc.flow -= amount;
            }
            cursor = label.parent;
        }
        total += amount;
        debug!(amount, total, "augmenting chain applied");
        if target.is_some_and(|t| total >= t) {
            break;
        }
    }
    total
}

/// Computes the maximum flow of the network between its declared sources
/// and sinks, honoring arc restrictions and vertex ranges.
///
/// # Errors
///
/// Returns an [`Error::Invariant`] if no source or no sink is declared or a
/// declared endpoint is missing, and an [`Error::Infeasible`] if the arc
/// restrictions cannot be satisfied.
pub fn ford_fulkerson(network: &Network, profile: &NetworkProfile) -> Result<MaxFlow> {
    validate_endpoints(profile)?;
    let mut net = network.clone();
    make_transformations(&mut net, profile)?;
    find_initial_flow(&mut net)?;
    let flow = augment(&mut net, SUPER_SOURCE, SUPER_SINK, None);
    revert_transformations(&mut net, profile)?;
    net.current_flow = flow;
    net.current_cost = net.total_cost();
    Ok(MaxFlow { network: net, flow })
}

/// Routes exactly `target` units at minimum cost by negative-cycle
/// cancellation on the marginal network.
///
/// # Errors
///
/// Returns an [`Error::Invariant`] on missing endpoints or a negative
/// target, and an [`Error::Infeasible`] if the network cannot carry exactly
/// `target` units.
pub fn minimum_cost_flow(
    network: &Network,
    profile: &NetworkProfile,
    target: i64,
) -> Result<MinCostFlow> {
    validate_endpoints(profile)?;
    if target < 0 {
        return Err(Error::invariant(format!(
            "the prescribed throughput {} is negative",
            target
        )));
    }

    let mut net = network.clone();
    make_transformations(&mut net, profile)?;
    find_initial_flow(&mut net)?;
    let flow = augment(&mut net, SUPER_SOURCE, SUPER_SINK, Some(target));
    if flow != target {
        return Err(Error::infeasible(format!(
            "the network carries {} of the prescribed {} units",
            flow, target
        )));
    }

    let mut cost = net.total_cost();
    loop {
        let marginal = marginal_network(&net);
        let Some(cycle) = find_negative_cycle(&marginal) else {
            break;
        };
        let arcs = cycle_arcs(&cycle);
        let mut amount = INFINITE;
        let mut weight_sum = 0;
        let mut chosen: Vec<EdgeId> = Vec::with_capacity(arcs.len());
        for (u, v, w) in &arcs {
            let (edge, arc) = marginal
                .matching(u, v, *w)
                .expect("cycle arcs come from the marginal digraph");
            amount = amount.min(arc.residual);
            weight_sum += w;
            chosen.push(edge);
        }
        if amount == INFINITE {
            return Err(Error::invariant(
                "the marginal network carries an unbounded negative cycle",
            ));
        }
        for edge in &chosen {
            push_on(&marginal, *edge, &mut net, amount);
        }
        cost += amount * weight_sum;
        debug!(amount, weight_sum, cost, "negative cycle canceled");
    }

    revert_transformations(&mut net, profile)?;
    net.current_flow = target;
    net.current_cost = cost;
    Ok(MinCostFlow {
        network: net,
        flow: target,
        cost,
        solution_found: true,
    })
}

/// Routes up to `target` units at minimum cost by successive shortest-path
/// augmentation on the marginal network, starting from zero flow.
///
/// Returns `solution_found == false` (with the partial routing) when `z'`
/// becomes unreachable or a negative cycle shows up before the target is
/// met.
///
/// # Errors
///
/// Returns an [`Error::Invariant`] on missing endpoints, a negative target,
/// or any positive minimum restriction (arc or vertex range lower bound),
/// which this solver does not support.
pub fn minimum_cost_flow_with_shortest_paths(
    network: &Network,
    profile: &NetworkProfile,
    target: i64,
) -> Result<MinCostFlow> {
    validate_endpoints(profile)?;
    if target < 0 {
        return Err(Error::invariant(format!(
            "the prescribed throughput {} is negative",
            target
        )));
    }
    for (u, v, arc) in network.arcs() {
        if arc.restriction > 0 {
            return Err(Error::invariant(format!(
                "arc {} -> {} has a minimum restriction, which the shortest-path solver does not support",
                u, v
            )));
        }
    }
    for (vertex, (low, _)) in &profile.ranges {
        if *low > 0 {
            return Err(Error::invariant(format!(
                "vertex '{}' has a minimum throughput, which the shortest-path solver does not support",
                vertex
            )));
        }
    }

    let mut net = network.clone();
    net.reset_flows();
    make_transformations(&mut net, profile)?;

    let super_source = SUPER_SOURCE.to_string();
    let super_sink = SUPER_SINK.to_string();
    let mut flow = 0;
    let mut cost = 0;
    let mut solution_found = true;
    while flow < target {
        let marginal = marginal_network(&net);
        let paths = shortest_path_tree(&marginal.graph, &super_source)
            .expect("the super-source is a marginal vertex");
        if paths.cycle_found {
            solution_found = false;
            break;
        }
        let Some(&distance) = paths.distances.get(&super_sink) else {
            solution_found = false;
            break;
        };

        let mut chain: Vec<(String, String, i64)> = Vec::new();
        let mut cursor = super_sink.clone();
        while cursor != super_source {
            let parent = paths.previous[&cursor].clone();
            let weight = paths.distances[&cursor] - paths.distances[&parent];
            chain.push((parent.clone(), cursor, weight));
            cursor = parent;
        }

        let mut amount = target - flow;
        let mut chosen: Vec<EdgeId> = Vec::with_capacity(chain.len());
        for (u, v, w) in &chain {
            let (edge, arc) = marginal
                .matching(u, v, *w)
                .expect("chain arcs come from the marginal digraph");
            amount = amount.min(arc.residual);
            chosen.push(edge);
        }
        for edge in &chosen {
            push_on(&marginal, *edge, &mut net, amount);
        }
        flow += amount;
        cost += amount * distance;
        debug!(amount, flow, cost, "shortest augmenting path applied");
    }

    revert_transformations(&mut net, profile)?;
    net.current_flow = flow;
    net.current_cost = cost;
    Ok(MinCostFlow {
        network: net,
        flow,
        cost,
        solution_found,
    })
}

/// Applies `amount` units along one marginal arc to the underlying network.
fn push_on(marginal: &Marginal, edge: EdgeId, net: &mut Network, amount: i64) {
    let info = &marginal.arcs[&edge];
    let arc = net
        .arc_mut(&info.source, &info.terminus)
        .expect("marginal arcs mirror network arcs");
    if info.forward {
        arc.flow += amount;
    } else {
        arc.flow -= amount;
    }
}

/// Probes the generalized Dijkstra from every marginal vertex in turn and
/// returns the first negative cycle reported, if any.
fn find_negative_cycle(marginal: &Marginal) -> Option<Digraph<String>> {
    let starts: Vec<String> = marginal.graph.vertices().cloned().collect();
    for start in starts {
        let paths = shortest_path_tree(&marginal.graph, &start)
            .expect("probe starts are marginal vertices");
        if paths.cycle_found {
            return Some(paths.tree);
        }
    }
    None
}

/// Orders the arcs of a cycle digraph into a closed walk.
fn cycle_arcs(cycle: &Digraph<String>) -> Vec<(String, String, i64)> {
    let start = cycle.first_vertex().expect("a cycle is nonempty").clone();
    let mut arcs = Vec::with_capacity(cycle.arc_count());
    let mut cursor = start.clone();
    loop {
        let (_, terminus, weight) = cycle
            .out_arcs(&cursor)
            .next()
            .map(|(edge, terminus, weight)| (edge, terminus.clone(), weight))
            .expect("every cycle vertex has one outgoing arc");
        arcs.push((cursor, terminus.clone(), weight));
        cursor = terminus;
        if cursor == start {
            break;
        }
    }
    arcs
}

fn validate_endpoints(profile: &NetworkProfile) -> Result<()> {
    if profile.sources.is_empty() {
        return Err(Error::invariant("the network declares no source"));
    }
    if profile.sinks.is_empty() {
        return Err(Error::invariant("the network declares no sink"));
    }
    Ok(())
}
