//! Driver for the digraph algorithms.
//!
//! Usage: `digraph <json-path> <id> {dijkstra|floyd} <startVertex>` (the
//! start vertex is ignored for `floyd`). Results land in
//! `./data/<id>-final.txt`; a caught error is written there as an exception
//! document and still exits 0.

use std::process::ExitCode;

use arista::core::error::{Error, Result};
use arista::core::io::{load_digraph, write_digraph, write_digraph_forest, write_exception};
use arista::core::paths::{floyd_warshall, shortest_path_tree};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 {
        eprintln!("usage: digraph <json-path> <id> {{dijkstra|floyd}} <startVertex>");
        return ExitCode::from(2);
    }
    let output = format!("./data/{}-final.txt", args[1]);
    if let Err(error) = run(&args[0], &args[2], args.get(3), &output) {
        if write_exception(&output, &error.to_string()).is_err() {
            eprintln!("{}", error);
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}

fn run(input: &str, algorithm: &str, start: Option<&String>, output: &str) -> Result<()> {
    let digraph = load_digraph(input)?;
    match algorithm {
        "dijkstra" => {
            let start = start
                .ok_or_else(|| Error::invalid_argument("dijkstra needs a start vertex"))?;
            let result = shortest_path_tree(&digraph, start)?;
            let extra = if result.cycle_found {
                vec!["A negative cycle was found.".to_string()]
            } else {
                Vec::new()
            };
            write_digraph(output, &result.tree, &extra)
        }
        "floyd" => {
            let routes = floyd_warshall(&digraph)?;
            let trees: Vec<_> = routes
                .shortest_path_trees()
                .into_iter()
                .map(|(_, tree)| tree)
                .collect();
            write_digraph_forest(output, &trees, &[])
        }
        other => Err(Error::invalid_argument(format!(
            "unknown digraph algorithm '{}'",
            other
        ))),
    }
}
