use arista::core::flow::{
    ford_fulkerson, marginal_network, minimum_cost_flow, minimum_cost_flow_with_shortest_paths,
};
use arista::core::network::{Arc, Network, NetworkProfile};
use arista::core::paths::shortest_path_tree;

fn profile(sources: &[&str], sinks: &[&str]) -> NetworkProfile {
    NetworkProfile {
        sources: sources.iter().map(|s| s.to_string()).collect(),
        sinks: sinks.iter().map(|s| s.to_string()).collect(),
        ..NetworkProfile::default()
    }
}

fn arc(capacity: i64, cost: i64) -> Arc {
    Arc {
        capacity,
        restriction: 0,
        flow: 0,
        cost,
    }
}

/// Flow conservation at every vertex that is neither a source nor a sink.
fn assert_conserved(net: &Network, profile: &NetworkProfile) {
    for vertex in net.vertices() {
        if profile.sources.contains(vertex) || profile.sinks.contains(vertex) {
            continue;
        }
        assert_eq!(
            net.incoming_flow(vertex),
            net.outgoing_flow(vertex),
            "vertex {} does not conserve flow",
            vertex
        );
    }
}

/// Arc bounds after a flow algorithm: restriction <= flow <= capacity.
fn assert_bounds(net: &Network) {
    for (u, v, arc) in net.arcs() {
        assert!(
            arc.restriction <= arc.flow && arc.flow <= arc.capacity,
            "arc {} -> {} breaks its bounds: {:?}",
            u,
            v,
            arc
        );
    }
}

#[test]
fn test_ford_fulkerson_with_a_vertex_restriction() {
    let mut net = Network::new();
    for name in ["s", "v", "t"] {
        net.add_vertex(name).unwrap();
    }
    net.add_arc("s", "v", arc(10, 0)).unwrap();
    net.add_arc("v", "t", arc(10, 0)).unwrap();

    let mut prof = profile(&["s"], &["t"]);
    prof.ranges.insert("v".to_string(), (0, 4));

    let result = ford_fulkerson(&net, &prof).unwrap();
    assert_eq!(result.flow, 4);
    assert_eq!(result.network.current_flow(), 4);
    // The dummy used during the computation never leaks into the result.
    assert!(!result.network.contains_vertex("v'"));
    assert_eq!(result.network.vertex_count(), 3);
    assert_eq!(result.network.arc("s", "v").unwrap().flow, 4);
    assert_eq!(result.network.arc("v", "t").unwrap().flow, 4);
    assert_conserved(&result.network, &prof);
    assert_bounds(&result.network);
}

#[test]
fn test_minimum_cost_flow_by_cycle_cancellation() {
    // Two source-to-sink routes: 5 units at cost 1, 5 units at cost 3.
    // Routing 7 units optimally costs 5*1 + 2*3 = 11.
    let mut net = Network::new();
    for name in ["s", "a", "b", "t"] {
        net.add_vertex(name).unwrap();
    }
    net.add_arc("s", "a", arc(5, 1)).unwrap();
    net.add_arc("a", "t", arc(5, 0)).unwrap();
    net.add_arc("s", "b", arc(5, 3)).unwrap();
    net.add_arc("b", "t", arc(5, 0)).unwrap();

    let prof = profile(&["s"], &["t"]);
    let result = minimum_cost_flow(&net, &prof, 7).unwrap();
    assert_eq!(result.flow, 7);
    assert_eq!(result.cost, 11);
    assert_eq!(result.network.current_flow(), 7);
    assert_eq!(result.network.current_cost(), 11);
    assert_conserved(&result.network, &prof);
    assert_bounds(&result.network);

    // Optimality: the final marginal network carries no negative cycle.
    let marginal = marginal_network(&result.network);
    for start in marginal.graph.vertices() {
        let paths = shortest_path_tree(&marginal.graph, start).unwrap();
        assert!(!paths.cycle_found);
    }
}

#[test]
fn test_minimum_cost_flow_infeasible_target() {
    let mut net = Network::new();
    for name in ["s", "t"] {
        net.add_vertex(name).unwrap();
    }
    net.add_arc("s", "t", arc(3, 1)).unwrap();
    assert!(minimum_cost_flow(&net, &profile(&["s"], &["t"]), 5).is_err());
}

#[test]
fn test_multiple_sources_and_sinks() {
    let mut net = Network::new();
    for name in ["s1", "s2", "m", "t1", "t2"] {
        net.add_vertex(name).unwrap();
    }
    net.add_arc("s1", "m", arc(3, 0)).unwrap();
    net.add_arc("s2", "m", arc(2, 0)).unwrap();
    net.add_arc("m", "t1", arc(4, 0)).unwrap();
    net.add_arc("m", "t2", arc(4, 0)).unwrap();

    let prof = profile(&["s1", "s2"], &["t1", "t2"]);
    let result = ford_fulkerson(&net, &prof).unwrap();
    assert_eq!(result.flow, 5);
    assert_conserved(&result.network, &prof);
    assert_bounds(&result.network);
}

#[test]
fn test_arc_restriction_forces_flow_through_the_longer_route() {
    // The direct route is free, but the detour carries a minimum of 2.
    let mut net = Network::new();
    for name in ["s", "d", "t"] {
        net.add_vertex(name).unwrap();
    }
    net.add_arc("s", "t", arc(10, 0)).unwrap();
    net.add_arc(
        "s",
        "d",
        Arc {
            capacity: 5,
            restriction: 2,
            flow: 0,
            cost: 0,
        },
    )
    .unwrap();
    net.add_arc("d", "t", arc(5, 0)).unwrap();

    let prof = profile(&["s"], &["t"]);
    let result = ford_fulkerson(&net, &prof).unwrap();
    assert_eq!(result.flow, 15);
    assert!(result.network.arc("s", "d").unwrap().flow >= 2);
    assert_conserved(&result.network, &prof);
    assert_bounds(&result.network);
}

#[test]
fn test_shortest_path_solver_on_the_parallel_routes() {
    let mut net = Network::new();
    for name in ["s", "a", "b", "t"] {
        net.add_vertex(name).unwrap();
    }
    net.add_arc("s", "a", arc(5, 1)).unwrap();
    net.add_arc("a", "t", arc(5, 0)).unwrap();
    net.add_arc("s", "b", arc(5, 3)).unwrap();
    net.add_arc("b", "t", arc(5, 0)).unwrap();

    let prof = profile(&["s"], &["t"]);
    let result = minimum_cost_flow_with_shortest_paths(&net, &prof, 7).unwrap();
    assert!(result.solution_found);
    assert_eq!(result.flow, 7);
    assert_eq!(result.cost, 11);
    assert_conserved(&result.network, &prof);
    assert_bounds(&result.network);
}

#[test]
fn test_vertex_range_with_minimum_throughput() {
    // v must carry between 2 and 4 units even though the cheap route
    // bypasses it entirely.
    let mut net = Network::new();
    for name in ["s", "v", "t"] {
        net.add_vertex(name).unwrap();
    }
    net.add_arc("s", "t", arc(10, 0)).unwrap();
    net.add_arc("s", "v", arc(10, 0)).unwrap();
    net.add_arc("v", "t", arc(10, 0)).unwrap();

    let mut prof = profile(&["s"], &["t"]);
    prof.ranges.insert("v".to_string(), (2, 4));

    let result = ford_fulkerson(&net, &prof).unwrap();
    assert_eq!(result.flow, 14);
    let through_v = result.network.arc("s", "v").unwrap().flow;
    assert!((2..=4).contains(&through_v));
    assert_conserved(&result.network, &prof);
    assert_bounds(&result.network);
}
