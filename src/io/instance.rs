//! The molecule text format.
//!
//! A file holds a sequence of records separated by the literal line
//! `---New Instance---`. Each record lists vertices as `<int> <atom>`
//! lines, then a `###` separator, then edges as `<u> <v> <token>…` where
//! the token is either a bond symbol (`-`, `=`, `:`, `==`, `-=`, `=-`;
//! anything else reads as `q`) or the word `anchor` followed by
//! `, <bond symbol>`. Edges flagged `anchor` are collected into the
//! record's anchored-edge list.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::graph::{BondType, Edge, Graph};

/// One parsed record: the graph and its anchored edges.
pub type Instance = (Graph, Vec<Edge>);

const SEPARATOR: &str = "---New Instance---";
const EDGE_MARKER: &str = "###";

#[derive(Default)]
struct RecordBuilder {
    graph: Graph,
    anchors: Vec<Edge>,
    in_edges: bool,
    has_content: bool,
}

impl RecordBuilder {
    fn finish(self, line: usize) -> Result<Option<Instance>> {
        if !self.has_content {
            return Ok(None);
        }
        if !self.in_edges {
            return Err(Error::parse(line, "record is missing the ### separator"));
        }
        Ok(Some((self.graph, self.anchors)))
    }
}

fn parse_int(token: &str, line: usize) -> Result<u32> {
    token
        .parse()
        .map_err(|_| Error::parse(line, format!("expected an integer, found {token:?}")))
}

/// Parse a bond symbol from the tail of an anchor edge line. Composite
/// symbols may arrive split (`- =`), so the pieces are concatenated; the
/// leading comma after `anchor` is skipped.
fn anchor_bond_symbol(tokens: &[&str]) -> String {
    tokens
        .iter()
        .filter(|&&t| t != ",")
        .map(|t| t.trim_start_matches(','))
        .collect()
}

/// Parse molecule records from a string.
pub fn parse_instances(text: &str) -> Result<Vec<Instance>> {
    let mut instances = Vec::new();
    let mut record = RecordBuilder::default();

    for (index, raw) in text.lines().enumerate() {
        let number = index + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if line == SEPARATOR {
            if let Some(done) = std::mem::take(&mut record).finish(number)? {
                instances.push(done);
            }
            continue;
        }
        if line == EDGE_MARKER {
            record.in_edges = true;
            record.has_content = true;
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if !record.in_edges {
            if tokens.len() < 2 {
                return Err(Error::parse(number, "vertex line needs an id and an atom type"));
            }
            let id = parse_int(tokens[0], number)?;
            record.graph.add_atom(id, tokens[1]);
            record.has_content = true;
        } else {
            if tokens.len() < 3 {
                return Err(Error::parse(number, "edge line needs two ids and a bond"));
            }
            let u = parse_int(tokens[0], number)?;
            let v = parse_int(tokens[1], number)?;
            let symbol = if tokens[2] == "anchor" {
                record.anchors.push((u, v));
                anchor_bond_symbol(&tokens[3..])
            } else {
                tokens[2].to_owned()
            };
            record.graph.add_bond(u, v, BondType::from_symbol(&symbol));
        }
    }

    let last_line = text.lines().count();
    if let Some(done) = record.finish(last_line)? {
        instances.push(done);
    }
    Ok(instances)
}

/// Read molecule records from a file.
pub fn read_instances(path: impl AsRef<Path>) -> Result<Vec<Instance>> {
    let text = fs::read_to_string(path.as_ref())
        .map_err(|e| Error::invalid_input(format!("cannot read {}: {e}", path.as_ref().display())))?;
    parse_instances(&text)
}
