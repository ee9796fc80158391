//! McGregor's backtracking algorithm for pairwise MCES.
//!
//! The engine enumerates injections of `G`'s vertices into `H`'s while
//! maintaining MARCS, a `|E(G)| × |E(H)|` bit matrix in which a set bit
//! `(i, j)` means edge `i` of `G` may still be mapped to edge `j` of `H`
//! under the current partial mapping. The number of non-zero rows,
//! *arcsleft*, bounds how many edges the finished mapping can still cover
//! and drives the best-first pruning.
//!
//! The search is iterative with an explicit depth cursor. Instead of
//! snapshotting the matrix at every decision point, each depth keeps the
//! log of cells it cleared (`killed`); backtracking re-applies the log in
//! reverse, which restores MARCS, the row counters and arcsleft exactly.

use fixedbitset::FixedBitSet;
use hashbrown::HashMap;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::graph::{edge_key, Edge, Graph, NodeId};

/// Options for [`mces_pairwise`].
#[derive(Copy, Clone, Debug)]
pub struct McgregorConfig {
    /// Require equal atom types on mapped vertices and equal bond types
    /// on mapped edges.
    pub molecule: bool,
    /// Accept branches that tie the best bound (`>=`), enumerating every
    /// maximum mapping. With `false` only strict improvements are kept,
    /// which finds one maximum faster.
    pub collect_ties: bool,
}

impl Default for McgregorConfig {
    fn default() -> Self {
        McgregorConfig {
            molecule: false,
            collect_ties: true,
        }
    }
}

/// Anchor for the pairwise engine: vertex pairs, edge pairs, or both.
///
/// Edge pairs pin the MARCS row of the `G` edge to the column of the `H`
/// edge and also anchor their endpoints, pairing the smaller endpoint of
/// one edge with the smaller endpoint of the other.
#[derive(Clone, Debug, Default)]
pub struct PairwiseAnchor {
    pub vertices: Vec<(NodeId, NodeId)>,
    pub edges: Vec<(Edge, Edge)>,
}

impl PairwiseAnchor {
    pub fn none() -> Self {
        PairwiseAnchor::default()
    }

    pub fn from_vertices(vertices: Vec<(NodeId, NodeId)>) -> Self {
        PairwiseAnchor {
            vertices,
            ..PairwiseAnchor::default()
        }
    }

    pub fn from_edges(edges: Vec<(Edge, Edge)>) -> Self {
        PairwiseAnchor {
            edges,
            ..PairwiseAnchor::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty()
    }
}

/// The edge-correspondence matrix with its row counters.
#[derive(Clone, Debug)]
pub struct Marcs {
    rows: Vec<FixedBitSet>,
    row_ones: Vec<usize>,
    arcsleft: usize,
}

impl Marcs {
    fn new(rows: usize, columns: usize) -> Self {
        let mut all_ones = FixedBitSet::with_capacity(columns);
        all_ones.insert_range(..);
        Marcs {
            rows: vec![all_ones; rows],
            row_ones: vec![columns; rows],
            arcsleft: if columns > 0 { rows } else { 0 },
        }
    }

    pub fn get(&self, row: usize, column: usize) -> bool {
        self.rows[row].contains(column)
    }

    pub fn row_ones(&self, row: usize) -> usize {
        self.row_ones[row]
    }

    /// Number of rows that still contain at least one set bit.
    pub fn arcsleft(&self) -> usize {
        self.arcsleft
    }

    /// Clear a cell. Returns `true` if the cell was set, in which case the
    /// caller is responsible for logging it for later restoration.
    fn kill(&mut self, row: usize, column: usize) -> bool {
        if !self.rows[row].contains(column) {
            return false;
        }
        self.rows[row].set(column, false);
        self.row_ones[row] -= 1;
        if self.row_ones[row] == 0 {
            self.arcsleft -= 1;
        }
        true
    }

    /// Undo a kill.
    fn revive(&mut self, row: usize, column: usize) {
        debug_assert!(!self.rows[row].contains(column));
        self.rows[row].insert(column);
        if self.row_ones[row] == 0 {
            self.arcsleft += 1;
        }
        self.row_ones[row] += 1;
    }
}

/// One mapping found by [`mces_pairwise`].
#[derive(Clone, Debug)]
pub struct PairwiseMces {
    /// Vertex correspondence in ascending `G`-vertex order, anchored
    /// pairs included.
    pub mapping: Vec<(NodeId, NodeId)>,
    /// MARCS at the time the mapping was recorded.
    pub marcs: Marcs,
    /// Number of `G` edges that remain mappable, i.e. the edge size of
    /// the common subgraph.
    pub arcsleft: usize,
}

struct Side<'a> {
    graph: &'a Graph,
    nodes: Vec<NodeId>,
    edges: Vec<Edge>,
    /// Incident edge indices per node position.
    incidence: Vec<FixedBitSet>,
    /// Adjacent node positions per node position.
    adjacency: Vec<FixedBitSet>,
}

impl<'a> Side<'a> {
    fn new(graph: &'a Graph) -> Self {
        let nodes = graph.sorted_nodes();
        let edges: Vec<Edge> = graph.edges().collect();
        let positions: HashMap<NodeId, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, &n)| (n, i))
            .collect();

        let mut incidence = vec![FixedBitSet::with_capacity(edges.len()); nodes.len()];
        let mut adjacency = vec![FixedBitSet::with_capacity(nodes.len()); nodes.len()];
        for (index, &(u, v)) in edges.iter().enumerate() {
            let up = positions[&u];
            let vp = positions[&v];
            incidence[up].insert(index);
            incidence[vp].insert(index);
            adjacency[up].insert(vp);
            adjacency[vp].insert(up);
        }
        Side {
            graph,
            nodes,
            edges,
            incidence,
            adjacency,
        }
    }

    fn position(&self, n: NodeId) -> Result<usize> {
        self.nodes
            .binary_search(&n)
            .map_err(|_| Error::invalid_input(format!("anchor vertex {n} is not in its graph")))
    }

    fn edge_index(&self, (u, v): Edge) -> Result<usize> {
        self.graph
            .edge_index(u, v)
            .ok_or_else(|| Error::invalid_input(format!("anchor edge ({u}, {v}) is not in its graph")))
    }
}

struct McGregor<'a> {
    g: Side<'a>,
    h: Side<'a>,
    config: McgregorConfig,
    marcs: Marcs,
    /// Chosen image position in `H` per `G` position.
    assigned: Vec<Option<usize>>,
    /// Inverse of `assigned`: owning `G` position per `H` position.
    h_owner: Vec<Option<usize>>,
    anchored: FixedBitSet,
    h_tried: Vec<FixedBitSet>,
    /// Per-depth log of MARCS cells cleared by the current tentative
    /// assignment at that depth.
    killed: Vec<Vec<(usize, usize)>>,
}

impl<'a> McGregor<'a> {
    fn new(g: &'a Graph, h: &'a Graph, config: McgregorConfig) -> Result<Self> {
        if g.node_count() > h.node_count() {
            return Err(Error::invalid_input(format!(
                "first graph has {} vertices, second only {}",
                g.node_count(),
                h.node_count()
            )));
        }
        let g = Side::new(g);
        let h = Side::new(h);
        let marcs = Marcs::new(g.edges.len(), h.edges.len());
        let g_len = g.nodes.len();
        let h_len = h.nodes.len();
        Ok(McGregor {
            g,
            h,
            config,
            marcs,
            assigned: vec![None; g_len],
            h_owner: vec![None; h_len],
            anchored: FixedBitSet::with_capacity(g_len),
            h_tried: vec![FixedBitSet::with_capacity(h_len); g_len],
            killed: vec![Vec::new(); g_len],
        })
    }

    /// Apply the anchor and the molecule label filter to MARCS. Anchor
    /// kills are permanent: they are never logged, so no backtrack can
    /// restore them.
    fn seed(&mut self, anchor: &PairwiseAnchor) -> Result<()> {
        // Derive vertex pairs from the anchored edges: ascending
        // endpoints correspond.
        let mut vertex_pairs: Vec<(usize, usize)> = Vec::new();
        let mut seen: HashMap<usize, usize> = HashMap::new();
        let mut pair = |gp: usize, hp: usize| -> Result<()> {
            match seen.get(&gp) {
                Some(&existing) if existing == hp => Ok(()),
                Some(_) => Err(Error::invalid_input(
                    "anchor maps one vertex to two different images",
                )),
                None => {
                    seen.insert(gp, hp);
                    vertex_pairs.push((gp, hp));
                    Ok(())
                }
            }
        };
        for &(gn, hn) in &anchor.vertices {
            pair(self.g.position(gn)?, self.h.position(hn)?)?;
        }
        for &(ge, he) in &anchor.edges {
            let (ga, gb) = edge_key(ge.0, ge.1);
            let (ha, hb) = edge_key(he.0, he.1);
            pair(self.g.position(ga)?, self.h.position(ha)?)?;
            pair(self.g.position(gb)?, self.h.position(hb)?)?;
        }
        let images: hashbrown::HashSet<usize> = vertex_pairs.iter().map(|&(_, hp)| hp).collect();
        if images.len() != vertex_pairs.len() {
            return Err(Error::invalid_input(
                "anchor maps two vertices to the same image",
            ));
        }

        for &(gp, hp) in &vertex_pairs {
            self.anchored.insert(gp);
            self.assigned[gp] = Some(hp);
            self.h_owner[hp] = Some(gp);
            self.refine_unlogged(gp, hp);
        }

        for &(ge, he) in &anchor.edges {
            let row = self.g.edge_index(ge)?;
            let column = self.h.edge_index(he)?;
            for j in 0..self.h.edges.len() {
                if j != column {
                    self.marcs.kill(row, j);
                }
            }
            for i in 0..self.g.edges.len() {
                if i != row {
                    self.marcs.kill(i, column);
                }
            }
        }

        if self.config.molecule {
            for (i, &(gu, gv)) in self.g.edges.iter().enumerate() {
                let g_bond = self.g.graph.bond_type(gu, gv);
                for (j, &(hu, hv)) in self.h.edges.iter().enumerate() {
                    if g_bond != self.h.graph.bond_type(hu, hv) {
                        self.marcs.kill(i, j);
                    }
                }
            }
        }
        Ok(())
    }

    /// Clear every MARCS cell pairing an edge incident to `G` position
    /// `gp` with an `H` edge not incident to `hp`, without logging.
    fn refine_unlogged(&mut self, gp: usize, hp: usize) {
        for row in self.g.incidence[gp].ones() {
            for column in 0..self.h.edges.len() {
                if !self.h.incidence[hp].contains(column) {
                    self.marcs.kill(row, column);
                }
            }
        }
    }

    /// Same refinement, but logging each cleared cell into the depth log
    /// so the assignment can be retracted.
    fn refine_logged(&mut self, v: usize, x: usize) {
        for row in self.g.incidence[v].ones() {
            for column in 0..self.h.edges.len() {
                if !self.h.incidence[x].contains(column) && self.marcs.kill(row, column) {
                    self.killed[v].push((row, column));
                }
            }
        }
    }

    /// Retract the tentative assignment at depth position `v`, restoring
    /// MARCS from the depth log.
    fn retract(&mut self, v: usize) {
        if let Some(prev) = self.assigned[v].take() {
            self.h_owner[prev] = None;
        }
        for &(row, column) in self.killed[v].iter().rev() {
            self.marcs.revive(row, column);
        }
        self.killed[v].clear();
    }

    /// A candidate pair is legal when the images of `v`'s mapped
    /// neighbors are adjacent to `x`, and every mapped vertex adjacent to
    /// `x` is the image of a neighbor of `v`. The second clause rejects
    /// choices that would put edges into the common subgraph that `G`
    /// does not have.
    fn is_legal(&self, v: usize, x: usize) -> bool {
        for u in self.g.adjacency[v].ones() {
            if let Some(y) = self.assigned[u] {
                if !self.h.adjacency[x].contains(y) {
                    return false;
                }
            }
        }
        for y in self.h.adjacency[x].ones() {
            if let Some(owner) = self.h_owner[y] {
                if owner != v && !self.g.adjacency[v].contains(owner) {
                    return false;
                }
            }
        }
        true
    }

    fn atom_matches(&self, v: usize, x: usize) -> bool {
        !self.config.molecule
            || self.g.graph.atom_type(self.g.nodes[v]) == self.h.graph.atom_type(self.h.nodes[x])
    }

    fn snapshot_mapping(&self) -> Vec<(NodeId, NodeId)> {
        self.assigned
            .iter()
            .enumerate()
            .filter_map(|(gp, image)| image.map(|hp| (self.g.nodes[gp], self.h.nodes[hp])))
            .collect()
    }

    fn search(mut self) -> Vec<PairwiseMces> {
        // Non-anchored G positions in ascending order; `cursor` indexes
        // into this list and plays the role of the search depth.
        let order: Vec<usize> = (0..self.g.nodes.len())
            .filter(|&v| !self.anchored.contains(v))
            .collect();
        if order.is_empty() {
            let arcsleft = self.marcs.arcsleft();
            return vec![PairwiseMces {
                mapping: self.snapshot_mapping(),
                marcs: self.marcs,
                arcsleft,
            }];
        }

        let h_len = self.h.nodes.len();
        let mut all: Vec<PairwiseMces> = Vec::new();
        let mut best = 0usize;
        let mut cursor = 0usize;

        loop {
            let v = order[cursor];

            let mut chosen = None;
            for x in 0..h_len {
                if self.h_tried[v].contains(x) || self.h_owner[x].is_some() {
                    continue;
                }
                if self.atom_matches(v, x) && self.is_legal(v, x) {
                    chosen = Some(x);
                    break;
                }
            }

            match chosen {
                Some(x) => {
                    // Release the previous tentative image at this depth
                    // before committing to the new one.
                    self.retract(v);
                    self.assigned[v] = Some(x);
                    self.h_owner[x] = Some(v);
                    self.h_tried[v].insert(x);
                    self.refine_logged(v, x);

                    let arcsleft = self.marcs.arcsleft();
                    let accept = if self.config.collect_ties {
                        arcsleft >= best
                    } else {
                        arcsleft > best
                    };
                    if accept {
                        if cursor + 1 == order.len() {
                            trace!(arcsleft, "recording mapping");
                            all.push(PairwiseMces {
                                mapping: self.snapshot_mapping(),
                                marcs: self.marcs.clone(),
                                arcsleft,
                            });
                            best = arcsleft;
                        } else {
                            cursor += 1;
                            let next = order[cursor];
                            self.h_tried[next].clear();
                            self.killed[next].clear();
                        }
                    }
                }
                None => {
                    self.retract(v);
                    if cursor == 0 {
                        break;
                    }
                    cursor -= 1;
                }
            }
        }

        if all.is_empty() {
            // No vertex beyond the anchor could be mapped at all; the
            // anchor itself is the result.
            let arcsleft = self.marcs.arcsleft();
            return vec![PairwiseMces {
                mapping: self.snapshot_mapping(),
                marcs: self.marcs,
                arcsleft,
            }];
        }

        let max = all.iter().map(|m| m.arcsleft).max().unwrap_or(0);
        debug!(
            mappings = all.len(),
            arcsleft = max,
            "pairwise search finished"
        );
        all.retain(|m| m.arcsleft == max);
        all
    }
}

/// Maximum common edge subgraph of two graphs by McGregor's backtracking
/// algorithm.
///
/// Requires `|V(G)| <= |V(H)|`. Returns every recorded mapping whose
/// arcsleft equals the maximum found; with `collect_ties` unset only the
/// first maximum is kept. `H` vertices are tried strictly in ascending
/// identifier order, so results are deterministic.
pub fn mces_pairwise(
    g: &Graph,
    h: &Graph,
    anchor: &PairwiseAnchor,
    config: &McgregorConfig,
) -> Result<Vec<PairwiseMces>> {
    let mut engine = McGregor::new(g, h, *config)?;
    engine.seed(anchor)?;
    Ok(engine.search())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    /// arcsleft must equal the number of rows with at least one set bit.
    fn check_marcs(marcs: &Marcs, rows: usize, columns: usize) {
        let mut non_zero = 0;
        for i in 0..rows {
            let ones = (0..columns).filter(|&j| marcs.get(i, j)).count();
            assert_eq!(ones, marcs.row_ones(i));
            if ones > 0 {
                non_zero += 1;
            }
        }
        assert_eq!(non_zero, marcs.arcsleft());
    }

    #[test]
    fn identical_triangles_map_fully() {
        let g = Graph::from_edges([(0, 1), (1, 2), (0, 2)]);
        let results = mces_pairwise(
            &g,
            &g.clone(),
            &PairwiseAnchor::none(),
            &McgregorConfig::default(),
        )
        .unwrap();
        assert!(!results.is_empty());
        for result in &results {
            assert_eq!(result.arcsleft, 3);
            check_marcs(&result.marcs, 3, 3);
        }
    }

    #[test]
    fn precondition_rejects_larger_first_graph() {
        let g = Graph::from_edges([(0, 1), (1, 2)]);
        let h = Graph::from_edges([(0, 1)]);
        let result = mces_pairwise(&g, &h, &PairwiseAnchor::none(), &McgregorConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn fully_anchored_graph_returns_anchor() {
        let g = Graph::from_edges([(0, 1)]);
        let h = Graph::from_edges([(0, 1), (1, 2)]);
        let anchor = PairwiseAnchor::from_vertices(vec![(0, 0), (1, 1)]);
        let results = mces_pairwise(&g, &h, &anchor, &McgregorConfig::default()).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].mapping, vec![(0, 0), (1, 1)]);
        assert_eq!(results[0].arcsleft, 1);
    }

    #[test]
    fn edge_anchor_pins_the_marcs_row() {
        let g = Graph::from_edges([(0, 1), (1, 2)]);
        let h = Graph::from_edges([(0, 1), (1, 2), (2, 3)]);
        let anchor = PairwiseAnchor::from_edges(vec![((0, 1), (0, 1))]);
        let results = mces_pairwise(&g, &h, &anchor, &McgregorConfig::default()).unwrap();
        for result in &results {
            assert!(result.mapping.contains(&(0, 0)));
            assert!(result.mapping.contains(&(1, 1)));
            assert_eq!(result.arcsleft, 2);
        }
    }

    #[test]
    fn conflicting_anchor_is_rejected() {
        let g = Graph::from_edges([(0, 1)]);
        let h = Graph::from_edges([(0, 1), (1, 2)]);
        let anchor = PairwiseAnchor::from_vertices(vec![(0, 0), (0, 1)]);
        assert!(mces_pairwise(&g, &h, &anchor, &McgregorConfig::default()).is_err());
    }

    #[test]
    fn molecule_filter_zeroes_incompatible_rows() {
        use crate::graph::BondType;
        let mut g = Graph::new();
        g.add_atom(0, "C");
        g.add_atom(1, "C");
        g.add_bond(0, 1, BondType::Double);
        let mut h = Graph::new();
        h.add_atom(0, "C");
        h.add_atom(1, "C");
        h.add_atom(2, "C");
        h.add_bond(0, 1, BondType::Single);
        h.add_bond(1, 2, BondType::Single);
        let config = McgregorConfig {
            molecule: true,
            ..McgregorConfig::default()
        };
        let results = mces_pairwise(&g, &h, &PairwiseAnchor::none(), &config).unwrap();
        // No double bond exists in H: the label filter empties MARCS.
        for result in &results {
            assert_eq!(result.arcsleft, 0);
        }
    }
}
