/*!
# Input/Output Routines

The serialization adaptors around the core structures:

- **JSON in:** a single-object document with `nodes` and `links` arrays, as
  produced by the external graph library. `parse_*` work on strings, the
  `load_*` wrappers read a file. Loading a network also yields the
  [`NetworkProfile`] with the declared sources, sinks, ranges and
  productions.

- **Text out:** the line-oriented result format. The first line names the
  kind (`graph`, `digraph`, `network` or `exception`), sections are
  introduced by the keyword lines `vertex`, `edges` and (optionally) `extra`,
  and `end` terminates the document. Parent directories of the output path
  are created on demand.
*/

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Deserialize;

use crate::core::digraph::Digraph;
use crate::core::error::Result;
use crate::core::graph::Graph;
use crate::core::network::{Arc, Network, NetworkProfile};
use crate::core::types::INFINITE;

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    nodes: Vec<NodeRecord>,
    #[serde(default)]
    links: Vec<LinkRecord>,
}

#[derive(Debug, Deserialize)]
struct NodeRecord {
    id: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    min_flow: Option<i64>,
    #[serde(default)]
    max_flow: Option<i64>,
    #[serde(default)]
    flow: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct LinkRecord {
    source: String,
    target: String,
    #[serde(default)]
    weight: i64,
    #[serde(default)]
    restriction: i64,
    #[serde(default)]
    flow: i64,
    #[serde(default)]
    cost: i64,
}

/// Materializes an undirected graph from a JSON node/link document.
pub fn parse_graph(text: &str) -> Result<Graph<String>> {
    let document: Document = serde_json::from_str(text)?;
    let mut graph = Graph::new();
    for node in document.nodes {
        graph.add_vertex(node.id)?;
    }
    for link in document.links {
        graph.add_edge(&link.source, &link.target, link.weight)?;
    }
    Ok(graph)
}

/// Materializes a digraph from a JSON node/link document.
pub fn parse_digraph(text: &str) -> Result<Digraph<String>> {
    let document: Document = serde_json::from_str(text)?;
    let mut digraph = Digraph::new();
    for node in document.nodes {
        digraph.add_vertex(node.id)?;
    }
    for link in document.links {
        digraph.add_arc(&link.source, &link.target, link.weight)?;
    }
    Ok(digraph)
}

/// Materializes a network and its profile from a JSON node/link document.
///
/// The link `weight` is the arc capacity. Nodes typed `source`/`sink` fill
/// the profile's endpoint lists; `min_flow` + `max_flow` declare a vertex
/// range, `flow` a production or demand.
pub fn parse_network(text: &str) -> Result<(Network, NetworkProfile)> {
    let document: Document = serde_json::from_str(text)?;
    let mut network = Network::new();
    let mut profile = NetworkProfile::default();
    for node in document.nodes {
        network.add_vertex(node.id.clone())?;
        let kind = node.kind.unwrap_or_else(|| "node".to_string());
        match kind.as_str() {
            "source" => profile.sources.push(node.id.clone()),
            "sink" => profile.sinks.push(node.id.clone()),
            _ => {}
        }
        profile.kinds.insert(node.id.clone(), kind);
        if let (Some(low), Some(high)) = (node.min_flow, node.max_flow) {
            profile.ranges.insert(node.id.clone(), (low, high));
        }
        if let Some(supply) = node.flow {
            profile.supplies.insert(node.id, supply);
        }
    }
    for link in document.links {
        network.add_arc(
            &link.source,
            &link.target,
            Arc {
                capacity: link.weight,
                restriction: link.restriction,
                flow: link.flow,
                cost: link.cost,
            },
        )?;
    }
    Ok((network, profile))
}

/// Reads and parses an undirected graph from a JSON file.
pub fn load_graph(path: &str) -> Result<Graph<String>> {
    parse_graph(&fs::read_to_string(path)?)
}

/// Reads and parses a digraph from a JSON file.
pub fn load_digraph(path: &str) -> Result<Digraph<String>> {
    parse_digraph(&fs::read_to_string(path)?)
}

/// Reads and parses a network and its profile from a JSON file.
pub fn load_network(path: &str) -> Result<(Network, NetworkProfile)> {
    parse_network(&fs::read_to_string(path)?)
}

fn open_output(path: &str) -> Result<BufWriter<File>> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(BufWriter::new(File::create(path)?))
}

fn write_extra(writer: &mut BufWriter<File>, extra: &[String]) -> Result<()> {
    if !extra.is_empty() {
        writeln!(writer, "extra")?;
        for line in extra {
            writeln!(writer, "{}", line)?;
        }
    }
    Ok(())
}

/// Prints `inf` for the unbounded sentinel.
fn bound(value: i64) -> String {
    if value == INFINITE {
        "inf".to_string()
    } else {
        value.to_string()
    }
}

/// Writes an undirected graph result document.
pub fn write_graph(path: &str, graph: &Graph<String>, extra: &[String]) -> Result<()> {
    let mut writer = open_output(path)?;
    writeln!(writer, "graph")?;
    writeln!(writer, "vertex")?;
    for vertex in graph.vertices() {
        writeln!(writer, "{}", vertex)?;
    }
    writeln!(writer, "edges")?;
    for (source, terminus, weight) in graph.edges() {
        writeln!(writer, "{} {} {}", source, terminus, weight)?;
    }
    write_extra(&mut writer, extra)?;
    writeln!(writer, "end")?;
    writer.flush()?;
    Ok(())
}

/// Writes a digraph result document.
pub fn write_digraph(path: &str, digraph: &Digraph<String>, extra: &[String]) -> Result<()> {
    write_digraph_forest(path, std::slice::from_ref(digraph), extra)
}

/// Writes several digraphs into one document, suffixing the vertex names of
/// tree `i` with `i` apostrophes to keep them apart.
pub fn write_digraph_forest(
    path: &str,
    trees: &[Digraph<String>],
    extra: &[String],
) -> Result<()> {
    let mut writer = open_output(path)?;
    writeln!(writer, "digraph")?;
    writeln!(writer, "vertex")?;
    for (index, tree) in trees.iter().enumerate() {
        let primes = "'".repeat(index);
        for vertex in tree.vertices() {
            writeln!(writer, "{}{} {}{}", vertex, primes, vertex, primes)?;
        }
    }
    writeln!(writer, "edges")?;
    for (index, tree) in trees.iter().enumerate() {
        let primes = "'".repeat(index);
        for (source, terminus, weight) in tree.arcs() {
            writeln!(
                writer,
                "{}{} {}{} {}",
                source, primes, terminus, primes, weight
            )?;
        }
    }
    write_extra(&mut writer, extra)?;
    writeln!(writer, "end")?;
    writer.flush()?;
    Ok(())
}

/// Writes a network result document.
///
/// Vertex lines carry the kind token plus the `r min max` range and the
/// `p production` tail; vertices without a declared range print `r 0 inf`,
/// vertices without a production print `p 0`.
pub fn write_network(
    path: &str,
    network: &Network,
    profile: &NetworkProfile,
    extra: &[String],
) -> Result<()> {
    let mut writer = open_output(path)?;
    writeln!(writer, "network")?;
    writeln!(writer, "vertex")?;
    for vertex in network.vertices() {
        let kind = profile
            .kinds
            .get(vertex)
            .map(String::as_str)
            .unwrap_or("node");
        let (low, high) = profile
            .ranges
            .get(vertex)
            .copied()
            .unwrap_or((0, INFINITE));
        let supply = profile.supplies.get(vertex).copied().unwrap_or(0);
        writeln!(
            writer,
            "{} {} r {} {} p {}",
            vertex,
            kind,
            bound(low),
            bound(high),
            supply
        )?;
    }
    writeln!(writer, "edges")?;
    for (source, terminus, arc) in network.arcs() {
        writeln!(
            writer,
            "{} {} {} {} {} {}",
            source,
            terminus,
            bound(arc.capacity),
            arc.restriction,
            arc.flow,
            arc.cost
        )?;
    }
    write_extra(&mut writer, extra)?;
    writeln!(writer, "end")?;
    writer.flush()?;
    Ok(())
}

/// Writes the two-line exception document.
pub fn write_exception(path: &str, message: &str) -> Result<()> {
    let mut writer = open_output(path)?;
    writeln!(writer, "exception")?;
    writeln!(writer, "{}", message)?;
    writer.flush()?;
    Ok(())
}

/// Splits a written document back into its lines, for tests and tooling.
pub fn read_lines(path: &str) -> Result<Vec<String>> {
    Ok(fs::read_to_string(path)?
        .lines()
        .map(str::to_string)
        .collect())
}
