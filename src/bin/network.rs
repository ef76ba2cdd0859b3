//! Driver for the network-flow algorithms.
//!
//! Usage: `network <json-path> <id> {ford|mincycle|minpaths|simplex} [<F>]`
//! where the prescribed throughput `F` is required for `mincycle` and
//! `minpaths`. Results land in `./data/<id>-final.txt`; a caught error is
//! written there as an exception document and still exits 0.

use std::process::ExitCode;

use arista::core::error::{Error, Result};
use arista::core::flow::{
    ford_fulkerson, minimum_cost_flow, minimum_cost_flow_with_shortest_paths,
};
use arista::core::io::{load_network, write_exception, write_network};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 {
        eprintln!("usage: network <json-path> <id> {{ford|mincycle|minpaths|simplex}} [<F>]");
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

fn run(input: &str, algorithm: &str, target: Option<&String>, output: &str) -> Result<()> {
    let (network, profile) = load_network(input)?;
    match algorithm {
        "ford" => {
            let result = ford_fulkerson(&network, &profile)?;
            let extra = vec![format!("Flow: {}.", result.flow)];
            write_network(output, &result.network, &profile, &extra)
        }
        "mincycle" => {
            let target = parse_target(target)?;
            let result = minimum_cost_flow(&network, &profile, target)?;
            let extra = vec![format!("Flow: {}. Cost: {}.", result.flow, result.cost)];
            write_network(output, &result.network, &profile, &extra)
        }
        "minpaths" => {
            let target = parse_target(target)?;
            let result = minimum_cost_flow_with_shortest_paths(&network, &profile, target)?;
            let mut extra = vec![format!("Flow: {}. Cost: {}.", result.flow, result.cost)];
            if !result.solution_found {
                extra.push("No solution was found.".to_string());
            }
            write_network(output, &result.network, &profile, &extra)
        }
        "simplex" => Err(Error::invalid_argument(
            "the simplex method is not implemented",
        )),
        other => Err(Error::invalid_argument(format!(
            "unknown network algorithm '{}'",
            other
        ))),
    }
}

fn parse_target(target: Option<&String>) -> Result<i64> {
    let raw = target
        .ok_or_else(|| Error::invalid_argument("a prescribed throughput is required"))?;
    raw.parse::<i64>().map_err(|_| {
        Error::invalid_argument(format!("'{}' is not a decimal throughput", raw))
    })
}
