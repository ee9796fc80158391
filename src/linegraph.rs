//! Line graph construction.
//!
//! The line graph `L(G)` has one vertex per edge of `G`, named by the
//! canonical edge index, and an edge between two vertices whenever the
//! underlying edges share an endpoint. In molecule mode every vertex also
//! carries the unordered atom pair and bond type of its source edge; the
//! modular product uses these to filter label-incompatible tuples.

use fixedbitset::FixedBitSet;

use crate::error::{Error, Result};
use crate::graph::{BondType, Edge, Graph};

/// Labels inherited by a line-graph vertex from its source edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeLabel {
    /// Atom types of the two endpoints, in ascending order.
    pub atom_pair: (String, String),
    pub bond: Option<BondType>,
}

/// The line graph of a [`Graph`].
///
/// Adjacency is stored as one bit row per vertex so the product builder
/// can test adjacency in constant time.
#[derive(Clone, Debug)]
pub struct LineGraph {
    adj: Vec<FixedBitSet>,
    labels: Option<Vec<EdgeLabel>>,
}

impl LineGraph {
    /// Number of vertices, equal to the edge count of the source graph.
    pub fn node_count(&self) -> usize {
        self.adj.len()
    }

    pub fn is_adjacent(&self, i: usize, j: usize) -> bool {
        i != j && self.adj[i].contains(j)
    }

    /// Molecule labels of vertex `i`, when built in molecule mode.
    pub fn label(&self, i: usize) -> Option<&EdgeLabel> {
        self.labels.as_ref().map(|labels| &labels[i])
    }

    pub fn is_labeled(&self) -> bool {
        self.labels.is_some()
    }

    /// Vertices adjacent to `i`, ascending.
    pub fn neighbors(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.adj[i].ones()
    }
}

fn shares_endpoint(e: Edge, f: Edge) -> bool {
    let (a, b) = e;
    let (c, d) = f;
    a == c || a == d || b == c || b == d
}

/// Build the line graph of `g`.
///
/// With `molecule` set, every vertex carries the atom pair and bond type
/// of its source edge; a vertex without an atom type is `InvalidInput`.
pub fn line_graph(g: &Graph, molecule: bool) -> Result<LineGraph> {
    let edges: Vec<Edge> = g.edges().collect();
    let n = edges.len();

    let mut adj = vec![FixedBitSet::with_capacity(n); n];
    for i in 0..n {
        for j in (i + 1)..n {
            if shares_endpoint(edges[i], edges[j]) {
                adj[i].insert(j);
                adj[j].insert(i);
            }
        }
    }

    let labels = if molecule {
        let mut labels = Vec::with_capacity(n);
        for &(u, v) in &edges {
            let atom_of = |n| {
                g.atom_type(n).ok_or_else(|| {
                    Error::invalid_input(format!("molecule vertex {n} has no atom type"))
                })
            };
            let a = atom_of(u)?;
            let b = atom_of(v)?;
            let atom_pair = if a <= b {
                (a.to_owned(), b.to_owned())
            } else {
                (b.to_owned(), a.to_owned())
            };
            labels.push(EdgeLabel {
                atom_pair,
                bond: g.bond_type(u, v),
            });
        }
        Some(labels)
    } else {
        None
    };

    Ok(LineGraph { adj, labels })
}
