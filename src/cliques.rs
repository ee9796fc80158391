//! Clique-based MCES over the anchor-limited modular product.
//!
//! Pipeline: line graphs of the inputs, modular product (anchor-limited
//! by default), blue-connected components of the anchor's common
//! neighborhood, maximal cliques inside the components, and a final
//! blue-reachability filter per clique. Every surviving clique, together
//! with the anchor, translates back into one candidate mapping of edge
//! correspondence tuples.

use std::collections::VecDeque;

use fixedbitset::FixedBitSet;
use hashbrown::HashSet;
use tracing::debug;

use crate::anchor::{anchor_line_vertices, EdgeAnchor, Mapping};
use crate::error::{Error, Result};
use crate::graph::{edge_key, Edge, Graph};
use crate::linegraph::line_graph;
use crate::product::{modular_product, modular_product_limited, EdgeColor, ProductGraph};

/// Options for the clique-based engines.
#[derive(Copy, Clone, Debug)]
pub struct McesConfig {
    /// Restrict the modular product to the anchor's reach. Disabling this
    /// builds the full product and is exponential in the factor count.
    pub limit_product: bool,
    /// Treat inputs as molecules: tuples must agree on atom pair and bond
    /// type.
    pub molecule: bool,
}

impl Default for McesConfig {
    fn default() -> Self {
        McesConfig {
            limit_product: true,
            molecule: false,
        }
    }
}

/// Vertex paint for the blue-only searches. `Poison` marks vertices that
/// are out of scope for the current pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Color {
    Poison,
    White,
    Gray,
    Black,
}

/// Breadth-first walk over blue edges from `source`, visiting only white
/// vertices. Visited vertices end up black.
fn blue_bfs(product: &ProductGraph, color: &mut [Color], source: usize) {
    let mut queue = VecDeque::new();
    queue.push_back(source);
    while let Some(u) = queue.pop_front() {
        for &(v, edge_color) in product.neighbors(u) {
            if color[v] == Color::White && edge_color == EdgeColor::Blue {
                color[v] = Color::Gray;
                queue.push_back(v);
            }
        }
        color[u] = Color::Black;
    }
}

/// Split the anchor's common neighborhood into disjoint blue-connected
/// components reachable from the anchor through blue edges.
///
/// Every returned component is non-empty, contains only vertices of
/// `neighborhood`, and each of its members has a blue path from the
/// anchor.
fn blue_components(
    product: &ProductGraph,
    anchor_ids: &[usize],
    neighborhood: &[usize],
) -> Vec<Vec<usize>> {
    let mut color = vec![Color::Poison; product.node_count()];
    for &a in anchor_ids {
        color[a] = Color::White;
    }
    for &n in neighborhood {
        color[n] = Color::White;
    }

    blue_bfs(product, &mut color, anchor_ids[0]);

    let mut filtered: Vec<usize> = neighborhood
        .iter()
        .copied()
        .filter(|&n| color[n] == Color::Black)
        .collect();
    if filtered.is_empty() {
        return Vec::new();
    }

    // Second phase: recolor the reachable neighborhood and peel off one
    // blue component at a time. The anchor is out of scope here so a
    // component never absorbs an anchor vertex.
    for c in color.iter_mut() {
        *c = Color::Poison;
    }
    for &n in &filtered {
        color[n] = Color::White;
    }

    let mut components = Vec::new();
    while let Some(source) = filtered.pop() {
        if color[source] != Color::White {
            continue;
        }
        color[source] = Color::Gray;
        let mut component = vec![source];
        let mut queue = VecDeque::new();
        queue.push_back(source);
        while let Some(u) = queue.pop_front() {
            for &(v, edge_color) in product.neighbors(u) {
                if color[v] == Color::White && edge_color == EdgeColor::Blue {
                    color[v] = Color::Gray;
                    component.push(v);
                    queue.push_back(v);
                }
            }
            color[u] = Color::Black;
        }
        components.push(component);
    }
    components
}

/// Bron–Kerbosch with pivoting over bit-set candidate sets.
///
/// `neighbors[v]` must already be restricted to the member set of the
/// induced subgraph under consideration.
fn bron_kerbosch_pivot(
    neighbors: &[FixedBitSet],
    r: &mut Vec<usize>,
    p: FixedBitSet,
    x: FixedBitSet,
    cliques: &mut Vec<Vec<usize>>,
) {
    if p.count_ones(..) == 0 {
        if x.count_ones(..) == 0 {
            cliques.push(r.clone());
        }
        return;
    }
    // Pivot on a candidate with maximum degree; its neighbors need not be
    // tried at this level.
    let pivot = p
        .ones()
        .max_by_key(|&v| neighbors[v].count_ones(..))
        .expect("non-empty candidate set");
    let todo: Vec<usize> = p
        .ones()
        .filter(|&v| v == pivot || !neighbors[pivot].contains(v))
        .collect();

    let mut p = p;
    let mut x = x;
    for v in todo {
        p.set(v, false);
        r.push(v);
        let mut next_p = p.clone();
        next_p.intersect_with(&neighbors[v]);
        let mut next_x = x.clone();
        next_x.intersect_with(&neighbors[v]);
        bron_kerbosch_pivot(neighbors, r, next_p, next_x, cliques);
        r.pop();
        x.insert(v);
    }
}

/// Maximal cliques of the subgraph of `product` induced by `members`,
/// using every product edge regardless of color.
fn maximal_cliques(product: &ProductGraph, members: &[usize]) -> Vec<Vec<usize>> {
    let n = product.node_count();
    let mut member_set = FixedBitSet::with_capacity(n);
    for &m in members {
        member_set.insert(m);
    }

    let mut neighbors = vec![FixedBitSet::with_capacity(n); n];
    for &m in members {
        for &(v, _) in product.neighbors(m) {
            if member_set.contains(v) {
                neighbors[m].insert(v);
            }
        }
    }

    let mut cliques = Vec::new();
    let mut r = Vec::new();
    bron_kerbosch_pivot(
        &neighbors,
        &mut r,
        member_set,
        FixedBitSet::with_capacity(n),
        &mut cliques,
    );
    cliques
}

/// Part of a clique reachable from the anchor by blue edges inside the
/// subgraph induced by clique ∪ anchor.
fn blue_reachable_part(
    product: &ProductGraph,
    anchor_ids: &[usize],
    clique: &[usize],
) -> Vec<usize> {
    let mut color = vec![Color::Poison; product.node_count()];
    for &a in anchor_ids {
        color[a] = Color::White;
    }
    for &v in clique {
        color[v] = Color::White;
    }
    blue_bfs(product, &mut color, anchor_ids[0]);
    clique
        .iter()
        .copied()
        .filter(|&v| color[v] == Color::Black)
        .collect()
}

/// For every maximal clique of the component union, emit the blue
/// reachable clique part together with the anchor.
fn connected_extensions(
    product: &ProductGraph,
    anchor_ids: &[usize],
    components: &[Vec<usize>],
) -> Vec<Vec<usize>> {
    let members: Vec<usize> = components.iter().flatten().copied().collect();
    let cliques = maximal_cliques(product, &members);
    debug!(
        components = components.len(),
        cliques = cliques.len(),
        "extending anchor through blue components"
    );

    let mut extensions = Vec::with_capacity(cliques.len());
    for clique in &cliques {
        let mut reached = blue_reachable_part(product, anchor_ids, clique);
        reached.extend_from_slice(anchor_ids);
        extensions.push(reached);
    }
    extensions
}

fn validate_anchor(graphs: &[&Graph], anchor: &EdgeAnchor) -> Result<()> {
    if graphs.len() < 2 {
        return Err(Error::invalid_input(
            "clique-based MCES requires at least two graphs",
        ));
    }
    if anchor.is_empty() {
        return Err(Error::invalid_input("the edge anchor must not be empty"));
    }
    for entry in anchor {
        if entry.len() != graphs.len() {
            return Err(Error::invalid_input(format!(
                "anchor entry has {} edges for {} graphs",
                entry.len(),
                graphs.len()
            )));
        }
    }
    Ok(())
}

/// Clique-based MCES over explicit graph references. Shared by the public
/// entry point and the iterative orchestrator, which pairs a synthesized
/// intermediate graph with an input graph.
pub(crate) fn mces_products(
    graphs: &[&Graph],
    anchor: &EdgeAnchor,
    config: &McesConfig,
) -> Result<Vec<Mapping>> {
    validate_anchor(graphs, anchor)?;
    // Work on the stored edge orientation throughout, so returned tuples
    // compare equal no matter how the caller wrote the anchor.
    let anchor: EdgeAnchor = anchor
        .iter()
        .map(|entry| entry.iter().map(|&(u, v)| edge_key(u, v)).collect())
        .collect();
    let anchor = &anchor;

    let edge_lists: Vec<Vec<Edge>> = graphs.iter().map(|g| g.edges().collect()).collect();
    let factors = graphs
        .iter()
        .map(|g| line_graph(g, config.molecule))
        .collect::<Result<Vec<_>>>()?;
    let anchor_tuples = anchor_line_vertices(graphs, anchor)?;

    let product = if config.limit_product {
        modular_product_limited(&factors, &anchor_tuples, config.molecule)
    } else {
        modular_product(&factors)
    };

    let anchor_ids = anchor_tuples
        .iter()
        .map(|tuple| {
            product.index_of(tuple).ok_or_else(|| {
                Error::invalid_input("anchor tuple is missing from the modular product")
            })
        })
        .collect::<Result<Vec<usize>>>()?;

    // Anchor-only product: nothing can extend the anchor.
    if product.node_count() == anchor_ids.len() {
        return Ok(vec![anchor.clone()]);
    }

    // Common neighborhood of the anchor, over edges of either color.
    let anchor_set: HashSet<usize> = anchor_ids.iter().copied().collect();
    let mut common: Vec<usize> = product
        .neighbors(anchor_ids[0])
        .iter()
        .map(|&(v, _)| v)
        .filter(|v| !anchor_set.contains(v))
        .collect();
    for &a in &anchor_ids[1..] {
        let adjacent: HashSet<usize> = product.neighbors(a).iter().map(|&(v, _)| v).collect();
        common.retain(|v| adjacent.contains(v));
    }

    let components = blue_components(&product, &anchor_ids, &common);
    if components.is_empty() {
        return Ok(vec![anchor.clone()]);
    }

    let extensions = connected_extensions(&product, &anchor_ids, &components);
    let mappings = extensions
        .into_iter()
        .map(|vertex_set| {
            vertex_set
                .into_iter()
                .map(|id| {
                    let tuple = product.tuple(id);
                    tuple
                        .iter()
                        .enumerate()
                        .map(|(i, &coord)| edge_lists[i][coord as usize])
                        .collect()
                })
                .collect()
        })
        .collect();
    Ok(mappings)
}

/// Maximum common edge subgraphs of all graphs at once.
///
/// Builds one modular product across all `graphs` and extends the
/// `anchor` through its blue-connected components. Each returned mapping
/// is a list of correspondence tuples (one edge per graph) containing the
/// anchor; when nothing extends the anchor the anchor itself is the sole
/// mapping.
pub fn mces_all_products(
    graphs: &[Graph],
    anchor: &EdgeAnchor,
    config: &McesConfig,
) -> Result<Vec<Mapping>> {
    let refs: Vec<&Graph> = graphs.iter().collect();
    mces_products(&refs, anchor, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::linegraph::line_graph;
    use crate::product::modular_product_limited;

    #[test]
    fn blue_components_are_blue_reachable() {
        // Path against path: the anchor edge pair extends along the path
        // in one blue component.
        let g = Graph::from_edges([(0, 1), (1, 2), (2, 3)]);
        let h = Graph::from_edges([(0, 1), (1, 2), (2, 3)]);
        let factors = vec![
            line_graph(&g, false).unwrap(),
            line_graph(&h, false).unwrap(),
        ];
        let product = modular_product_limited(&factors, &[vec![0, 0]], false);
        let neighborhood: Vec<usize> = (1..product.node_count()).collect();
        let components = blue_components(&product, &[0], &neighborhood);
        assert!(!components.is_empty());
        for component in &components {
            assert!(!component.is_empty());
            for &v in component {
                assert_ne!(v, 0, "components must not contain the anchor");
            }
        }
    }

    #[test]
    fn bron_kerbosch_finds_triangle() {
        // Product of a triangle with itself around a fixed anchor pair
        // contains a clique covering the remaining two edge pairs.
        let g = Graph::from_edges([(0, 1), (1, 2), (0, 2)]);
        let anchor = vec![vec![(0, 1), (0, 1)]];
        let mappings = mces_all_products(
            &[g.clone(), g.clone()],
            &anchor,
            &McesConfig::default(),
        )
        .unwrap();
        let best = mappings.iter().map(|m| m.len()).max().unwrap();
        assert_eq!(best, 3, "triangle maps onto itself entirely");
    }

    #[test]
    fn anchor_without_extension_is_returned_unchanged() {
        // Two disjoint edges cannot be extended beyond the anchored one.
        let g = Graph::from_edges([(0, 1), (2, 3)]);
        let h = Graph::from_edges([(0, 1), (2, 3)]);
        let anchor = vec![vec![(0, 1), (0, 1)]];
        let mappings = mces_all_products(&[g, h], &anchor, &McesConfig::default()).unwrap();
        assert_eq!(mappings, vec![anchor]);
    }

    #[test]
    fn ragged_anchor_is_rejected() {
        let g = Graph::from_edges([(0, 1)]);
        let anchor = vec![vec![(0, 1)]];
        let result = mces_all_products(&[g.clone(), g], &anchor, &McesConfig::default());
        assert!(result.is_err());
    }
}
