//! Graph isomorphism for deduplicating intermediate results.
//!
//! The iterative orchestrator compares the small edge-induced subgraphs
//! of its candidate mappings; a backtracking injection with degree and
//! label pruning is enough at that size. In label-aware mode two graphs
//! only match when the bijection preserves `atom_type` and `bond_type`.

use hashbrown::HashMap;

use crate::graph::{Graph, NodeId};

fn degree_signature(g: &Graph) -> Vec<usize> {
    let mut degrees: Vec<usize> = g.nodes().map(|n| g.degree(n)).collect();
    degrees.sort_unstable();
    degrees
}

fn label_signature(g: &Graph) -> (Vec<Option<String>>, Vec<Option<String>>) {
    let mut atoms: Vec<Option<String>> = g
        .nodes()
        .map(|n| g.atom_type(n).map(str::to_owned))
        .collect();
    atoms.sort();
    let mut bonds: Vec<Option<String>> = g
        .edges()
        .map(|(u, v)| g.bond_type(u, v).map(|b| b.code().to_owned()))
        .collect();
    bonds.sort();
    (atoms, bonds)
}

struct Matcher<'a> {
    a: &'a Graph,
    b: &'a Graph,
    a_nodes: Vec<NodeId>,
    b_nodes: Vec<NodeId>,
    match_labels: bool,
}

impl Matcher<'_> {
    fn compatible(&self, v: NodeId, w: NodeId, mapping: &HashMap<NodeId, NodeId>) -> bool {
        if self.a.degree(v) != self.b.degree(w) {
            return false;
        }
        if self.match_labels && self.a.atom_type(v) != self.b.atom_type(w) {
            return false;
        }
        // Adjacency (and bond labels) must agree with everything mapped
        // so far, in both directions.
        for (&u, &image) in mapping {
            let in_a = self.a.contains_edge(v, u);
            let in_b = self.b.contains_edge(w, image);
            if in_a != in_b {
                return false;
            }
            if in_a && self.match_labels && self.a.bond_type(v, u) != self.b.bond_type(w, image) {
                return false;
            }
        }
        true
    }

    fn extend(&self, depth: usize, mapping: &mut HashMap<NodeId, NodeId>, used: &mut Vec<bool>) -> bool {
        if depth == self.a_nodes.len() {
            return true;
        }
        let v = self.a_nodes[depth];
        for (i, &w) in self.b_nodes.iter().enumerate() {
            if used[i] || !self.compatible(v, w, mapping) {
                continue;
            }
            mapping.insert(v, w);
            used[i] = true;
            if self.extend(depth + 1, mapping, used) {
                return true;
            }
            mapping.remove(&v);
            used[i] = false;
        }
        false
    }
}

/// Whether `a` and `b` are isomorphic; with `match_labels` the bijection
/// must also preserve atom and bond types.
pub fn is_isomorphic(a: &Graph, b: &Graph, match_labels: bool) -> bool {
    if a.node_count() != b.node_count() || a.edge_count() != b.edge_count() {
        return false;
    }
    if degree_signature(a) != degree_signature(b) {
        return false;
    }
    if match_labels && label_signature(a) != label_signature(b) {
        return false;
    }

    // Order the pattern side by descending degree so constrained vertices
    // are placed first.
    let mut a_nodes = a.sorted_nodes();
    a_nodes.sort_by_key(|&n| std::cmp::Reverse(a.degree(n)));
    let matcher = Matcher {
        a,
        b,
        a_nodes,
        b_nodes: b.sorted_nodes(),
        match_labels,
    };
    let mut mapping = HashMap::new();
    let mut used = vec![false; b.node_count()];
    matcher.extend(0, &mut mapping, &mut used)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::BondType;

    #[test]
    fn cycles_are_isomorphic_up_to_relabeling() {
        let a = Graph::from_edges([(0, 1), (1, 2), (2, 3), (3, 0)]);
        let b = Graph::from_edges([(10, 20), (20, 30), (30, 40), (40, 10)]);
        assert!(is_isomorphic(&a, &b, false));
    }

    #[test]
    fn path_and_star_differ() {
        let path = Graph::from_edges([(0, 1), (1, 2), (2, 3)]);
        let star = Graph::from_edges([(0, 1), (0, 2), (0, 3)]);
        assert!(!is_isomorphic(&path, &star, false));
    }

    #[test]
    fn labels_split_isomorphism_classes() {
        let mut a = Graph::new();
        a.add_atom(0, "C");
        a.add_atom(1, "O");
        a.add_bond(0, 1, BondType::Single);

        let mut b = Graph::new();
        b.add_atom(0, "C");
        b.add_atom(1, "N");
        b.add_bond(0, 1, BondType::Single);

        assert!(is_isomorphic(&a, &b, false));
        assert!(!is_isomorphic(&a, &b, true));

        let mut c = Graph::new();
        c.add_atom(5, "O");
        c.add_atom(6, "C");
        c.add_bond(5, 6, BondType::Single);
        assert!(is_isomorphic(&a, &c, true));
    }

    #[test]
    fn bond_types_matter_in_label_mode() {
        let mut a = Graph::new();
        a.add_atom(0, "C");
        a.add_atom(1, "O");
        a.add_bond(0, 1, BondType::Single);
        let mut b = Graph::new();
        b.add_atom(0, "C");
        b.add_atom(1, "O");
        b.add_bond(0, 1, BondType::Double);
        assert!(!is_isomorphic(&a, &b, true));
    }
}
