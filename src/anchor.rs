//! Edge anchors: fixed correspondences the solutions must preserve.
//!
//! An anchor is a list of correspondence tuples; each tuple names one
//! edge per input graph, and all edges of a tuple must be mapped to each
//! other. Solutions produced by the engines share the same shape, so
//! `Mapping` and `EdgeAnchor` are aliases of the same type.

use hashbrown::HashMap;
use indexmap::IndexMap;
use itertools::Itertools;

use crate::error::{Error, Result};
use crate::graph::{edge_key, BondType, Edge, Graph};

/// One correspondence tuple: edge `i` belongs to input graph `i`.
pub type EdgeTuple = Vec<Edge>;

/// A solution: the anchor plus zero or more extension tuples.
pub type Mapping = Vec<EdgeTuple>;

/// The required correspondences an MCES must contain.
pub type EdgeAnchor = Vec<EdgeTuple>;

/// How [`enumerate_anchors`] combines the per-graph anchored edge lists.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AnchorMode {
    /// Group anchored edges by (atom pair, bond type) and only map edges
    /// of equal type to each other. Requires molecule labels.
    Typed,
    /// Map entry `i` of every per-graph list together; yields exactly one
    /// anchor. The conservative choice for unlabeled graphs.
    Positional,
    /// Enumerate every one-to-one combination, ignoring labels.
    AllPermutations,
}

/// Convert anchor entries to modular-product tuples of line-graph
/// vertices (canonical edge indices).
pub(crate) fn anchor_line_vertices(graphs: &[&Graph], anchor: &EdgeAnchor) -> Result<Vec<Vec<u32>>> {
    anchor
        .iter()
        .map(|entry| {
            entry
                .iter()
                .zip(graphs)
                .map(|(&(u, v), g)| {
                    g.edge_index(u, v).map(|index| index as u32).ok_or_else(|| {
                        Error::invalid_input(format!("anchored edge ({u}, {v}) is not in its graph"))
                    })
                })
                .collect()
        })
        .collect()
}

/// Edge type used to group anchored edges in [`AnchorMode::Typed`].
type EdgeType = ((String, String), Option<BondType>);

fn edge_type_of(g: &Graph, (u, v): Edge) -> Result<EdgeType> {
    let atom_of = |n| {
        g.atom_type(n)
            .ok_or_else(|| Error::invalid_input(format!("anchored vertex {n} has no atom type")))
    };
    let a = atom_of(u)?;
    let b = atom_of(v)?;
    let pair = if a <= b {
        (a.to_owned(), b.to_owned())
    } else {
        (b.to_owned(), a.to_owned())
    };
    Ok((pair, g.bond_type(u, v)))
}

fn validate_lists(graphs: &[Graph], anchored: &[Vec<Edge>]) -> Result<usize> {
    if graphs.is_empty() || graphs.len() != anchored.len() {
        return Err(Error::invalid_input(
            "one anchored edge list is required per graph",
        ));
    }
    let count = anchored[0].len();
    for (i, list) in anchored.iter().enumerate() {
        if list.len() != count {
            return Err(Error::invalid_input(format!(
                "graph {i} anchors {} edges, expected {count}",
                list.len()
            )));
        }
        for &(u, v) in list {
            if graphs[i].edge_index(u, v).is_none() {
                return Err(Error::invalid_input(format!(
                    "anchored edge ({u}, {v}) is not in graph {i}"
                )));
            }
        }
    }
    Ok(count)
}

/// Enumerate every valid one-to-one anchor correspondence over the
/// per-graph anchored edge lists.
///
/// In [`AnchorMode::Typed`] the anchored edges are grouped per graph by
/// (unordered atom pair, bond type); within each type, every combination
/// of per-graph permutations becomes one way of mapping that type's
/// edges, and the cartesian product across types yields the anchors. All
/// graphs must agree on the per-type edge counts.
pub fn enumerate_anchors(
    graphs: &[Graph],
    anchored: &[Vec<Edge>],
    mode: AnchorMode,
) -> Result<Vec<EdgeAnchor>> {
    let count = validate_lists(graphs, anchored)?;
    if count == 0 {
        return Ok(Vec::new());
    }

    match mode {
        AnchorMode::Positional => {
            let anchor = (0..count)
                .map(|i| {
                    anchored
                        .iter()
                        .zip(graphs)
                        .map(|(list, _)| normalize(list[i]))
                        .collect()
                })
                .collect();
            Ok(vec![anchor])
        }
        AnchorMode::AllPermutations => {
            let groups: Vec<IndexMap<(), Vec<Edge>>> = anchored
                .iter()
                .map(|list| {
                    let mut group = IndexMap::new();
                    group.insert((), list.iter().map(|&e| normalize(e)).collect());
                    group
                })
                .collect();
            enumerate_grouped(&groups)
        }
        AnchorMode::Typed => {
            let mut groups: Vec<IndexMap<EdgeType, Vec<Edge>>> = Vec::with_capacity(graphs.len());
            for (g, list) in graphs.iter().zip(anchored) {
                let mut group: IndexMap<EdgeType, Vec<Edge>> = IndexMap::new();
                for &edge in list {
                    let ty = edge_type_of(g, edge)?;
                    group.entry(ty).or_default().push(normalize(edge));
                }
                group.sort_keys();
                groups.push(group);
            }
            // Every graph must anchor the same number of edges per type.
            let reference: HashMap<&EdgeType, usize> =
                groups[0].iter().map(|(ty, edges)| (ty, edges.len())).collect();
            for group in &groups[1..] {
                let counts: HashMap<&EdgeType, usize> =
                    group.iter().map(|(ty, edges)| (ty, edges.len())).collect();
                if counts != reference {
                    return Err(Error::invalid_input(
                        "anchored edge types differ between graphs",
                    ));
                }
            }
            enumerate_grouped(&groups)
        }
    }
}

#[inline]
fn normalize((u, v): Edge) -> Edge {
    edge_key(u, v)
}

/// Core enumeration shared by the typed and permutation modes: for each
/// group key, the cartesian product over graphs of the permutations of
/// that group's indices; then the cartesian product across group keys.
fn enumerate_grouped<K: Eq + std::hash::Hash>(
    groups: &[IndexMap<K, Vec<Edge>>],
) -> Result<Vec<EdgeAnchor>> {
    let n_graphs = groups.len();
    let keys: Vec<&K> = groups[0].keys().collect();

    // options[t] lists, for group key t, every tuple of per-graph
    // permutations of that key's edge indices.
    let mut options: Vec<Vec<Vec<Vec<usize>>>> = Vec::with_capacity(keys.len());
    for &key in &keys {
        let size = groups[0][key].len();
        let per_graph: Vec<Vec<Vec<usize>>> = (0..n_graphs)
            .map(|_| (0..size).permutations(size).collect())
            .collect();
        let combos: Vec<Vec<Vec<usize>>> = per_graph
            .into_iter()
            .multi_cartesian_product()
            .collect();
        options.push(combos);
    }

    let mut anchors = Vec::new();
    for combination in options.into_iter().multi_cartesian_product() {
        let mut anchor: EdgeAnchor = Vec::new();
        for (t, per_graph_perms) in combination.iter().enumerate() {
            let key = keys[t];
            let size = groups[0][key].len();
            for j in 0..size {
                let tuple: EdgeTuple = (0..n_graphs)
                    .map(|g| groups[g][key][per_graph_perms[g][j]])
                    .collect();
                anchor.push(tuple);
            }
        }
        anchors.push(anchor);
    }
    Ok(anchors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::BondType;

    fn labeled_pair() -> (Graph, Graph) {
        let mut g = Graph::new();
        g.add_atom(0, "C");
        g.add_atom(1, "O");
        g.add_atom(2, "O");
        g.add_bond(0, 1, BondType::Single);
        g.add_bond(0, 2, BondType::Double);

        let mut h = Graph::new();
        h.add_atom(0, "O");
        h.add_atom(1, "C");
        h.add_atom(2, "O");
        h.add_bond(0, 1, BondType::Single);
        h.add_bond(1, 2, BondType::Double);
        (g, h)
    }

    #[test]
    fn typed_enumeration_respects_edge_types() {
        let (g, h) = labeled_pair();
        let anchors = enumerate_anchors(
            &[g, h],
            &[vec![(0, 1), (0, 2)], vec![(0, 1), (1, 2)]],
            AnchorMode::Typed,
        )
        .unwrap();
        // One single bond and one double bond per graph: a single valid
        // correspondence.
        assert_eq!(anchors.len(), 1);
        let anchor = &anchors[0];
        assert_eq!(anchor.len(), 2);
        assert!(anchor.contains(&vec![(0, 1), (0, 1)]));
        assert!(anchor.contains(&vec![(0, 2), (1, 2)]));
    }

    #[test]
    fn typed_enumeration_permutes_within_type() {
        let mut g = Graph::new();
        for n in 0..4 {
            g.add_atom(n, "C");
        }
        g.add_bond(0, 1, BondType::Single);
        g.add_bond(2, 3, BondType::Single);
        let h = g.clone();
        let anchors = enumerate_anchors(
            &[g, h],
            &[vec![(0, 1), (2, 3)], vec![(0, 1), (2, 3)]],
            AnchorMode::Typed,
        )
        .unwrap();
        // Two same-typed edges per graph: 2! * 2! combinations of
        // per-graph permutations.
        assert_eq!(anchors.len(), 4);
        for anchor in &anchors {
            assert_eq!(anchor.len(), 2);
        }
    }

    #[test]
    fn positional_mode_zips_entries() {
        let g = Graph::from_edges([(0, 1), (1, 2)]);
        let h = Graph::from_edges([(5, 6), (6, 7)]);
        let anchors = enumerate_anchors(
            &[g, h],
            &[vec![(1, 0)], vec![(6, 5)]],
            AnchorMode::Positional,
        )
        .unwrap();
        assert_eq!(anchors, vec![vec![vec![(0, 1), (5, 6)]]]);
    }

    #[test]
    fn mismatched_types_are_rejected() {
        let (g, h) = labeled_pair();
        let result = enumerate_anchors(
            &[g, h],
            &[vec![(0, 1)], vec![(1, 2)]], // single vs double bond
            AnchorMode::Typed,
        );
        assert!(result.is_err());
    }

    #[test]
    fn ragged_lists_are_rejected() {
        let g = Graph::from_edges([(0, 1), (1, 2)]);
        let result = enumerate_anchors(
            &[g.clone(), g],
            &[vec![(0, 1), (1, 2)], vec![(0, 1)]],
            AnchorMode::Positional,
        );
        assert!(result.is_err());
    }
}
