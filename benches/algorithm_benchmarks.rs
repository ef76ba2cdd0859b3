/*!
# Performance Benchmarks

Criterion benchmarks for the traversal, MST, shortest-path and flow
algorithms over deterministically built inputs.
*/

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use arista::core::flow::ford_fulkerson;
use arista::core::graph::Graph;
use arista::core::mst::{kruskal, prim};
use arista::core::network::{Arc, Network, NetworkProfile};
use arista::core::paths::{floyd_warshall, shortest_path_tree};
use arista::core::traversal::bfs_tree;
use arista::core::digraph::Digraph;

/// A ring of `n` vertices with chords every 7 steps.
fn chorded_ring(n: usize) -> Graph<String> {
    let mut graph = Graph::new();
    for i in 0..n {
        graph.add_vertex(format!("v{}", i)).unwrap();
    }
    for i in 0..n {
        let next = format!("v{}", (i + 1) % n);
        graph
            .add_edge(&format!("v{}", i), &next, (i as i64 % 13) + 1)
            .unwrap();
        if i % 7 == 0 {
            let chord = format!("v{}", (i + n / 2) % n);
            if chord != format!("v{}", i) {
                graph
                    .add_edge(&format!("v{}", i), &chord, (i as i64 % 17) + 1)
                    .unwrap();
            }
        }
    }
    graph
}

/// A layered digraph of `n` vertices.
fn layered_digraph(n: usize) -> Digraph<String> {
    let mut digraph = Digraph::new();
    for i in 0..n {
        digraph.add_vertex(format!("v{}", i)).unwrap();
    }
    for i in 0..n {
        for step in [1usize, 3, 5] {
            if i + step < n {
                digraph
                    .add_arc(
                        &format!("v{}", i),
                        &format!("v{}", i + step),
                        (i as i64 % 9) + 1,
                    )
                    .unwrap();
            }
        }
    }
    digraph
}

/// A grid-shaped network from one source to one sink.
fn grid_network(side: usize) -> (Network, NetworkProfile) {
    let mut net = Network::new();
    for row in 0..side {
        for col in 0..side {
            net.add_vertex(format!("n{}x{}", row, col)).unwrap();
        }
    }
    for row in 0..side {
        for col in 0..side {
            let here = format!("n{}x{}", row, col);
            if col + 1 < side {
                net.add_arc(
                    &here,
                    &format!("n{}x{}", row, col + 1),
                    Arc::with_capacity(((row + col) as i64 % 5) + 1),
                )
                .unwrap();
            }
            if row + 1 < side {
                net.add_arc(
                    &here,
                    &format!("n{}x{}", row + 1, col),
                    Arc::with_capacity(((row * col) as i64 % 5) + 1),
                )
                .unwrap();
            }
        }
    }
    let profile = NetworkProfile {
        sources: vec!["n0x0".to_string()],
        sinks: vec![format!("n{}x{}", side - 1, side - 1)],
        ..NetworkProfile::default()
    };
    (net, profile)
}

fn bench_traversal_and_mst(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_algorithms");
    for size in [100, 400].iter() {
        let graph = chorded_ring(*size);
        group.bench_with_input(BenchmarkId::new("bfs", size), &graph, |b, g| {
            b.iter(|| black_box(bfs_tree(g)));
        });
        group.bench_with_input(BenchmarkId::new("kruskal", size), &graph, |b, g| {
            b.iter(|| black_box(kruskal(g).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("prim", size), &graph, |b, g| {
            b.iter(|| black_box(prim(g).unwrap()));
        });
    }
    group.finish();
}

fn bench_shortest_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("shortest_paths");
    for size in [50, 150].iter() {
        let digraph = layered_digraph(*size);
        let start = "v0".to_string();
        group.bench_with_input(BenchmarkId::new("dijkstra", size), &digraph, |b, g| {
            b.iter(|| black_box(shortest_path_tree(g, &start).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("floyd", size), &digraph, |b, g| {
            b.iter(|| black_box(floyd_warshall(g).unwrap()));
        });
    }
    group.finish();
}

fn bench_max_flow(c: &mut Criterion) {
    let mut group = c.benchmark_group("network_flow");
    for side in [6, 10].iter() {
        let (net, profile) = grid_network(*side);
        group.bench_with_input(
            BenchmarkId::new("ford_fulkerson", side),
            &(net, profile),
            |b, (net, profile)| {
                b.iter(|| black_box(ford_fulkerson(net, profile).unwrap()));
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_traversal_and_mst,
    bench_shortest_paths,
    bench_max_flow
);
criterion_main!(benches);
