//! Modular products of line graphs.
//!
//! Vertices of the product are k-tuples holding one line-graph vertex per
//! factor. An edge joins two tuples that differ in every coordinate and
//! whose factors reach a consensus: **blue** when every coordinate pair is
//! adjacent, **red** when every coordinate pair is non-adjacent. Mixed
//! verdicts produce no edge.
//!
//! The anchor-limited variant keeps only the region of the product that
//! can extend an anchored solution: tuples with a blue or red edge to some
//! anchor tuple, plus the anchor tuples themselves.

use hashbrown::HashSet;
use indexmap::IndexSet;
use itertools::Itertools;
use tracing::debug;

use crate::linegraph::LineGraph;

/// Color of a modular-product edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EdgeColor {
    /// All factor pairs agree on adjacency.
    Blue,
    /// All factor pairs agree on non-adjacency.
    Red,
}

/// A modular product graph over interned k-tuples.
#[derive(Clone, Debug, Default)]
pub struct ProductGraph {
    nodes: IndexSet<Vec<u32>>,
    adj: Vec<Vec<(usize, EdgeColor)>>,
}

impl ProductGraph {
    fn add_node(&mut self, tuple: Vec<u32>) -> usize {
        let (id, inserted) = self.nodes.insert_full(tuple);
        if inserted {
            self.adj.push(Vec::new());
        }
        id
    }

    fn add_edge(&mut self, a: usize, b: usize, color: EdgeColor) {
        self.adj[a].push((b, color));
        self.adj[b].push((a, color));
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The k-tuple of node `id`.
    pub fn tuple(&self, id: usize) -> &[u32] {
        &self.nodes[id]
    }

    pub fn index_of(&self, tuple: &[u32]) -> Option<usize> {
        self.nodes.get_index_of(tuple)
    }

    /// Incident edges of `id` in insertion order.
    pub fn neighbors(&self, id: usize) -> &[(usize, EdgeColor)] {
        &self.adj[id]
    }

    /// Color of the edge between `a` and `b`, if one exists.
    pub fn edge_color(&self, a: usize, b: usize) -> Option<EdgeColor> {
        self.adj[a]
            .iter()
            .find(|&&(other, _)| other == b)
            .map(|&(_, color)| color)
    }
}

/// Consensus of all factors for a candidate product edge between `u` and
/// `v`: `Blue`, `Red`, or `None` when a coordinate collides or the
/// factors disagree.
fn edge_consensus(factors: &[LineGraph], u: &[u32], v: &[u32]) -> Option<EdgeColor> {
    let mut all_adjacent = true;
    let mut all_non_adjacent = true;
    for (i, factor) in factors.iter().enumerate() {
        if u[i] == v[i] {
            return None;
        }
        if factor.is_adjacent(u[i] as usize, v[i] as usize) {
            all_non_adjacent = false;
        } else {
            all_adjacent = false;
        }
        if !all_adjacent && !all_non_adjacent {
            return None;
        }
    }
    if all_adjacent {
        Some(EdgeColor::Blue)
    } else if all_non_adjacent {
        Some(EdgeColor::Red)
    } else {
        None
    }
}

/// All factors carry the same atom pair and bond type at the coordinates
/// of `tuple`.
fn labels_agree(factors: &[LineGraph], tuple: &[u32]) -> bool {
    let Some(first) = factors[0].label(tuple[0] as usize) else {
        return true;
    };
    factors.iter().zip(tuple).skip(1).all(|(factor, &coord)| {
        factor
            .label(coord as usize)
            .is_some_and(|label| label == first)
    })
}

fn all_tuples(factors: &[LineGraph]) -> impl Iterator<Item = Vec<u32>> + '_ {
    factors
        .iter()
        .map(|factor| 0..factor.node_count() as u32)
        .multi_cartesian_product()
}

/// Unrestricted modular product of the given line graphs.
///
/// Every k-tuple becomes a vertex; edges follow the blue/red consensus
/// rule. Exponential in the number of factors, so callers working from an
/// anchor should prefer [`modular_product_limited`].
pub fn modular_product(factors: &[LineGraph]) -> ProductGraph {
    let mut product = ProductGraph::default();
    if factors.is_empty() {
        return product;
    }
    for tuple in all_tuples(factors) {
        product.add_node(tuple);
    }
    let n = product.node_count();
    for i in 0..n {
        for j in (i + 1)..n {
            if let Some(color) = edge_consensus(factors, &product.nodes[i], &product.nodes[j]) {
                product.add_edge(i, j, color);
            }
        }
    }
    debug!(
        nodes = product.node_count(),
        "built unrestricted modular product"
    );
    product
}

/// Anchor-limited modular product.
///
/// `anchors` are product tuples (one line-graph vertex per factor). The
/// result always contains the anchor tuples, first in insertion order,
/// plus every tuple with a blue or red edge to at least one anchor. Tuples mixing anchor and non-anchor coordinates are dropped,
/// as are label-incompatible tuples when `molecule` is set. Internal
/// edges among the survivors are computed with the unrestricted rule.
pub fn modular_product_limited(
    factors: &[LineGraph],
    anchors: &[Vec<u32>],
    molecule: bool,
) -> ProductGraph {
    let mut product = ProductGraph::default();
    if factors.is_empty() {
        return product;
    }

    // Coordinates used by some anchor entry, per factor. A candidate that
    // touches one of these without being an anchor itself would remap an
    // anchored edge and is discarded.
    let anchor_coords: Vec<HashSet<u32>> = (0..factors.len())
        .map(|i| anchors.iter().map(|anchor| anchor[i]).collect())
        .collect();

    for anchor in anchors {
        product.add_node(anchor.clone());
    }
    let anchor_count = product.node_count();

    for tuple in all_tuples(factors) {
        if product.nodes.contains(&tuple) {
            continue;
        }
        let touches_anchor = tuple
            .iter()
            .enumerate()
            .any(|(i, coord)| anchor_coords[i].contains(coord));
        if touches_anchor {
            continue;
        }
        if molecule && !labels_agree(factors, &tuple) {
            continue;
        }
        let mut interned = None;
        for anchor_id in 0..anchor_count {
            if let Some(color) = edge_consensus(factors, &tuple, &product.nodes[anchor_id]) {
                let node = *interned.get_or_insert_with(|| product.add_node(tuple.clone()));
                product.add_edge(node, anchor_id, color);
            }
        }
    }

    // Internal edges among the survivors; anchor-to-survivor edges are
    // already in place from the pass above.
    let n = product.node_count();
    for i in 0..n {
        for j in (i + 1)..n {
            let crosses = i < anchor_count && j >= anchor_count;
            if crosses {
                continue;
            }
            if let Some(color) = edge_consensus(factors, &product.nodes[i], &product.nodes[j]) {
                product.add_edge(i, j, color);
            }
        }
    }
    debug!(
        nodes = product.node_count(),
        anchors = anchor_count,
        "built anchor-limited modular product"
    );
    product
}
