//! Driver for the undirected-graph algorithms.
//!
//! Usage: `graph <json-path> <id> {fleury|bfs|idfs|rdfs|kruskal|prim}`.
//! Results land in `./data/<id>-final.txt`; a caught error is written there
//! as an exception document and still exits 0.

use std::process::ExitCode;

use arista::core::error::{Error, Result};
use arista::core::euler::fleury;
use arista::core::io::{load_graph, write_digraph, write_exception, write_graph};
use arista::core::mst::{kruskal, prim};
use arista::core::traversal::{bfs_tree, dfs_tree_iterative, dfs_tree_recursive};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 {
        eprintln!("usage: graph <json-path> <id> {{fleury|bfs|idfs|rdfs|kruskal|prim}}");
        return ExitCode::from(2);
    }
    let output = format!("./data/{}-final.txt", args[1]);
    if let Err(error) = run(&args[0], &args[2], &output) {
        if write_exception(&output, &error.to_string()).is_err() {
            eprintln!("{}", error);
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}

fn run(input: &str, algorithm: &str, output: &str) -> Result<()> {
    let graph = load_graph(input)?;
    match algorithm {
        "fleury" => {
            let result = fleury(&graph)?;
            write_digraph(output, &result.circuit, &connectivity_note(result.connected))
        }
        "bfs" | "idfs" | "rdfs" => {
            let result = match algorithm {
                "bfs" => bfs_tree(&graph),
                "idfs" => dfs_tree_iterative(&graph),
                _ => dfs_tree_recursive(&graph),
            };
            write_graph(output, &result.tree, &connectivity_note(result.connected))
        }
        "kruskal" | "prim" => {
            let result = if algorithm == "kruskal" {
                kruskal(&graph)?
            } else {
                prim(&graph)?
            };
            let mut extra = vec![format!("The minimum tree has weight: {}", result.weight)];
            if !result.spanning {
                extra.push("The graph has no spanning tree.".to_string());
            }
            write_graph(output, &result.tree, &extra)
        }
        other => Err(Error::invalid_argument(format!(
            "unknown graph algorithm '{}'",
            other
        ))),
    }
}

fn connectivity_note(connected: bool) -> Vec<String> {
    if connected {
        Vec::new()
    } else {
        vec!["The graph is not connected.".to_string()]
    }
}
