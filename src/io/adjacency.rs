//! Classic adjacency-list files for unlabeled graphs.
//!
//! One line per vertex: the vertex id followed by its neighbors,
//! whitespace separated; `#` starts a comment. A companion *anchor file*
//! lists one anchored edge per line as `u,v`.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::graph::{Edge, Graph};

fn parse_int(token: &str, line: usize) -> Result<u32> {
    token
        .parse()
        .map_err(|_| Error::parse(line, format!("expected an integer, found {token:?}")))
}

/// Parse an adjacency list from a string.
pub fn parse_adjacency_list(text: &str) -> Result<Graph> {
    let mut g = Graph::new();
    for (index, raw) in text.lines().enumerate() {
        let number = index + 1;
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let mut tokens = line.split_whitespace();
        let vertex = parse_int(tokens.next().expect("non-empty line"), number)?;
        g.add_node(vertex);
        for token in tokens {
            let neighbor = parse_int(token, number)?;
            g.add_edge(vertex, neighbor);
        }
    }
    Ok(g)
}

/// Read an adjacency-list graph file.
pub fn read_adjacency_list(path: impl AsRef<Path>) -> Result<Graph> {
    let text = fs::read_to_string(path.as_ref())
        .map_err(|e| Error::invalid_input(format!("cannot read {}: {e}", path.as_ref().display())))?;
    parse_adjacency_list(&text)
}

/// Parse a companion anchor file: one `u,v` edge per line.
pub fn parse_anchor_edges(text: &str) -> Result<Vec<Edge>> {
    let mut edges = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let number = index + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let Some((u, v)) = line.split_once(',') else {
            return Err(Error::parse(number, "anchored edge must be written as u,v"));
        };
        edges.push((parse_int(u.trim(), number)?, parse_int(v.trim(), number)?));
    }
    Ok(edges)
}

/// Read a companion anchor file.
pub fn read_anchor_edges(path: impl AsRef<Path>) -> Result<Vec<Edge>> {
    let text = fs::read_to_string(path.as_ref())
        .map_err(|e| Error::invalid_input(format!("cannot read {}: {e}", path.as_ref().display())))?;
    parse_anchor_edges(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_neighbors_per_line() {
        let g = parse_adjacency_list("0 1 2\n1 2\n2\n3\n").unwrap();
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.edge_count(), 3);
        assert!(g.contains_edge(0, 2));
        assert!(g.contains_node(3));
        assert_eq!(g.degree(3), 0);
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let g = parse_adjacency_list("# header\n0 1 # tail comment\n\n1\n").unwrap();
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn anchor_file_round_trip() {
        let edges = parse_anchor_edges("0,1\n3, 4\n").unwrap();
        assert_eq!(edges, vec![(0, 1), (3, 4)]);
        assert!(parse_anchor_edges("0-1\n").is_err());
    }
}
