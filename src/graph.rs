//! Undirected simple graphs with optional molecule labels.
//!
//! `Graph` keeps an adjacency list per node plus an insertion-ordered edge
//! map. Node values are plain integers used as identifiers, so removing a
//! node never renumbers the others. The insertion order of the edge map is
//! the *canonical edge sequence*: line graphs, anchors and MARCS rows all
//! refer to edges by their position in it.

use std::fmt;

use indexmap::map::Entry;
use indexmap::IndexMap;

/// Node identifier. Dense small integers in practice, but nothing relies
/// on density.
pub type NodeId = u32;

/// An undirected edge, stored with its endpoints in ascending order.
pub type Edge = (NodeId, NodeId);

/// Normalize an endpoint pair to the stored orientation.
#[inline]
pub(crate) fn edge_key(a: NodeId, b: NodeId) -> Edge {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Chemical bond kind attached to an edge in molecule mode.
///
/// `SingleDouble` and `DoubleSingle` are the composite `s/d` and `d/s`
/// kinds produced by some exporters for delocalized bonds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BondType {
    Single,
    Double,
    Triple,
    Quadruple,
    Aromatic,
    SingleDouble,
    DoubleSingle,
}

impl BondType {
    /// Map a bond symbol to a bond type. Unknown symbols fall back to
    /// `Quadruple`, mirroring the `q` fallback of the text format.
    pub fn from_symbol(symbol: &str) -> BondType {
        match symbol {
            "-" => BondType::Single,
            "=" => BondType::Double,
            ":" => BondType::Aromatic,
            "==" => BondType::Triple,
            "-=" => BondType::SingleDouble,
            "=-" => BondType::DoubleSingle,
            _ => BondType::Quadruple,
        }
    }

    /// Short code for tables and debugging output.
    pub fn code(&self) -> &'static str {
        match self {
            BondType::Single => "s",
            BondType::Double => "d",
            BondType::Triple => "t",
            BondType::Quadruple => "q",
            BondType::Aromatic => "a",
            BondType::SingleDouble => "s/d",
            BondType::DoubleSingle => "d/s",
        }
    }
}

impl fmt::Display for BondType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
struct NodeData {
    atom_type: Option<String>,
    neighbors: Vec<NodeId>,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct EdgeData {
    bond_type: Option<BondType>,
}

/// An undirected simple graph over integer node identifiers.
///
/// Nodes may carry an `atom_type` and edges a [`BondType`]; both are
/// optional so the same type serves labeled (molecule) and unlabeled
/// inputs. Self loops and parallel edges are rejected.
#[derive(Clone, Default)]
pub struct Graph {
    nodes: IndexMap<NodeId, NodeData>,
    edges: IndexMap<Edge, EdgeData>,
}

impl Graph {
    pub fn new() -> Self {
        Graph::default()
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Graph {
            nodes: IndexMap::with_capacity(nodes),
            edges: IndexMap::with_capacity(edges),
        }
    }

    /// Build an unlabeled graph from an edge list.
    pub fn from_edges<I>(iterable: I) -> Self
    where
        I: IntoIterator<Item = Edge>,
    {
        let mut g = Graph::new();
        for (a, b) in iterable {
            g.add_edge(a, b);
        }
        g
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Add node `n`. Inserting an existing node is a no-op.
    pub fn add_node(&mut self, n: NodeId) -> NodeId {
        self.nodes.entry(n).or_default();
        n
    }

    /// Set the atom type of `n`, inserting the node if needed.
    pub fn add_atom(&mut self, n: NodeId, atom: impl Into<String>) -> NodeId {
        self.nodes.entry(n).or_default().atom_type = Some(atom.into());
        n
    }

    /// Add an unlabeled edge between `a` and `b`, inserting the endpoints
    /// if they are not yet present. Returns `true` if the edge is new.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        self.insert_edge(a, b, EdgeData::default())
    }

    /// Add a bond-labeled edge between `a` and `b`. If the edge already
    /// exists its bond type is replaced.
    pub fn add_bond(&mut self, a: NodeId, b: NodeId, bond: BondType) -> bool {
        self.insert_edge(
            a,
            b,
            EdgeData {
                bond_type: Some(bond),
            },
        )
    }

    fn insert_edge(&mut self, a: NodeId, b: NodeId, data: EdgeData) -> bool {
        if a == b {
            return false;
        }
        self.add_node(a);
        self.add_node(b);
        match self.edges.entry(edge_key(a, b)) {
            Entry::Occupied(mut entry) => {
                entry.insert(data);
                false
            }
            Entry::Vacant(entry) => {
                entry.insert(data);
                self.nodes[&a].neighbors.push(b);
                self.nodes[&b].neighbors.push(a);
                true
            }
        }
    }

    /// Remove node `n` and its incident edges. Other node identifiers are
    /// unaffected. Returns `true` if the node existed.
    pub fn remove_node(&mut self, n: NodeId) -> bool {
        let Some(data) = self.nodes.shift_remove(&n) else {
            return false;
        };
        for neighbor in data.neighbors {
            if let Some(entry) = self.nodes.get_mut(&neighbor) {
                entry.neighbors.retain(|&m| m != n);
            }
            self.edges.shift_remove(&edge_key(n, neighbor));
        }
        true
    }

    pub fn contains_node(&self, n: NodeId) -> bool {
        self.nodes.contains_key(&n)
    }

    pub fn contains_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.edges.contains_key(&edge_key(a, b))
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Nodes in ascending identifier order. The search engines iterate
    /// vertices in this order, which makes every enumeration deterministic.
    pub fn sorted_nodes(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Neighbors of `n` in edge-insertion order; empty if `n` is absent.
    pub fn neighbors(&self, n: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .get(&n)
            .into_iter()
            .flat_map(|data| data.neighbors.iter().copied())
    }

    pub fn degree(&self, n: NodeId) -> usize {
        self.nodes.get(&n).map_or(0, |data| data.neighbors.len())
    }

    /// The canonical edge sequence: edges in insertion order, endpoints
    /// ascending within each pair.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges.keys().copied()
    }

    /// Canonical index of the edge between `a` and `b`, if present.
    pub fn edge_index(&self, a: NodeId, b: NodeId) -> Option<usize> {
        self.edges.get_index_of(&edge_key(a, b))
    }

    /// The edge at canonical index `index`.
    pub fn edge_at(&self, index: usize) -> Option<Edge> {
        self.edges.get_index(index).map(|(&edge, _)| edge)
    }

    pub fn atom_type(&self, n: NodeId) -> Option<&str> {
        self.nodes.get(&n).and_then(|data| data.atom_type.as_deref())
    }

    pub fn bond_type(&self, a: NodeId, b: NodeId) -> Option<BondType> {
        self.edges
            .get(&edge_key(a, b))
            .and_then(|data| data.bond_type)
    }

    /// Edge-induced subgraph: the given edges, their endpoints, and any
    /// labels the endpoints and edges carry here. Nodes and edges are
    /// inserted in ascending order so the canonical sequence of the copy
    /// does not depend on the order of `edges`.
    pub fn edge_subgraph(&self, edges: &[Edge]) -> Graph {
        let mut ids: Vec<NodeId> = edges.iter().flat_map(|&(u, v)| [u, v]).collect();
        ids.sort_unstable();
        ids.dedup();

        let mut sub = Graph::with_capacity(ids.len(), edges.len());
        for &n in &ids {
            match self.atom_type(n) {
                Some(atom) => sub.add_atom(n, atom),
                None => sub.add_node(n),
            };
        }
        let mut ordered: Vec<Edge> = edges.iter().map(|&(u, v)| edge_key(u, v)).collect();
        ordered.sort_unstable();
        ordered.dedup();
        for (u, v) in ordered {
            match self.bond_type(u, v) {
                Some(bond) => sub.add_bond(u, v, bond),
                None => sub.add_edge(u, v),
            };
        }
        sub
    }
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.edges == other.edges
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.nodes.keys().collect::<Vec<_>>())
            .field("edges", &self.edges.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_query() {
        let mut g = Graph::new();
        g.add_edge(1, 2);
        g.add_edge(2, 0);
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
        assert!(g.contains_edge(2, 1));
        assert!(g.contains_edge(0, 2));
        assert!(!g.contains_edge(0, 1));
        assert_eq!(g.degree(2), 2);
    }

    #[test]
    fn canonical_edge_sequence_is_insertion_order() {
        let g = Graph::from_edges([(3, 1), (0, 1), (1, 2)]);
        let edges: Vec<Edge> = g.edges().collect();
        assert_eq!(edges, vec![(1, 3), (0, 1), (1, 2)]);
        assert_eq!(g.edge_index(1, 0), Some(1));
        assert_eq!(g.edge_at(2), Some((1, 2)));
    }

    #[test]
    fn self_loops_and_parallel_edges_are_rejected() {
        let mut g = Graph::new();
        assert!(!g.add_edge(1, 1));
        assert!(g.add_edge(1, 2));
        assert!(!g.add_edge(2, 1));
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.neighbors(1).count(), 1);
    }

    #[test]
    fn removal_preserves_identifiers_and_order() {
        let mut g = Graph::from_edges([(0, 1), (1, 2), (2, 3), (0, 3)]);
        assert!(g.remove_node(1));
        assert!(!g.contains_node(1));
        assert_eq!(g.sorted_nodes(), vec![0, 2, 3]);
        let edges: Vec<Edge> = g.edges().collect();
        assert_eq!(edges, vec![(2, 3), (0, 3)]);
        assert!(!g.remove_node(1));
    }

    #[test]
    fn labels_round_trip() {
        let mut g = Graph::new();
        g.add_atom(0, "C");
        g.add_atom(1, "O");
        g.add_bond(0, 1, BondType::Double);
        assert_eq!(g.atom_type(0), Some("C"));
        assert_eq!(g.atom_type(2), None);
        assert_eq!(g.bond_type(1, 0), Some(BondType::Double));
    }

    #[test]
    fn edge_subgraph_inherits_labels() {
        let mut g = Graph::new();
        g.add_atom(0, "C");
        g.add_atom(1, "C");
        g.add_atom(2, "O");
        g.add_bond(0, 1, BondType::Single);
        g.add_bond(1, 2, BondType::Double);
        let sub = g.edge_subgraph(&[(2, 1)]);
        assert_eq!(sub.node_count(), 2);
        assert_eq!(sub.atom_type(2), Some("O"));
        assert_eq!(sub.bond_type(1, 2), Some(BondType::Double));
        assert!(!sub.contains_node(0));
    }

    #[test]
    fn bond_symbols() {
        assert_eq!(BondType::from_symbol("-"), BondType::Single);
        assert_eq!(BondType::from_symbol("=="), BondType::Triple);
        assert_eq!(BondType::from_symbol("-="), BondType::SingleDouble);
        assert_eq!(BondType::from_symbol("?!"), BondType::Quadruple);
        assert_eq!(BondType::SingleDouble.code(), "s/d");
    }
}
