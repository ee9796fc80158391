//! Iterative multi-graph MCES.
//!
//! Instead of one modular product across all inputs, the orchestrator
//! grows the common subgraph pairwise: it solves (L[0], L[1]), turns each
//! resulting mapping into an edge-induced subgraph of L[0], and extends
//! that subgraph against L[2], L[3], … one graph at a time. Branches that
//! stop extending the anchor are pruned; candidate sets at each step are
//! deduplicated up to permutation and (label-aware) isomorphism of their
//! induced subgraphs.

use tracing::debug;

use crate::anchor::{EdgeAnchor, EdgeTuple, Mapping};
use crate::cliques::{mces_products, McesConfig};
use crate::error::{Error, Result};
use crate::graph::{edge_key, Edge, Graph};
use crate::isomorphism::is_isomorphic;

/// One branch of the extension search.
struct Frame {
    /// Edge-induced subgraph of L[0] for the mappings found so far.
    graph: Graph,
    /// Next input graph to extend against.
    depth: usize,
    /// Correspondence tuples accumulated along this branch.
    mapping: Mapping,
}

fn first_coordinates(mapping: &Mapping) -> Vec<Edge> {
    mapping.iter().map(|tuple| tuple[0]).collect()
}

/// Keep one representative per equivalence class: mappings are equal when
/// they hold the same tuples in any order, or when their edge-induced
/// subgraphs in `source` are isomorphic (label-aware in molecule mode).
fn dedup_mappings(mappings: Vec<Mapping>, source: &Graph, molecule: bool) -> Vec<Mapping> {
    let mut kept: Vec<(Mapping, Vec<EdgeTuple>, Graph)> = Vec::new();
    for mapping in mappings {
        let mut key = mapping.clone();
        key.sort();
        if kept.iter().any(|(_, other, _)| *other == key) {
            continue;
        }
        let induced = source.edge_subgraph(&first_coordinates(&mapping));
        if kept
            .iter()
            .any(|(_, _, other)| is_isomorphic(&induced, other, molecule))
        {
            continue;
        }
        kept.push((mapping, key, induced));
    }
    kept.into_iter().map(|(mapping, _, _)| mapping).collect()
}

/// Project an anchor to the coordinate pair {0, depth}.
fn project_anchor(anchor: &EdgeAnchor, depth: usize) -> EdgeAnchor {
    anchor
        .iter()
        .map(|tuple| vec![tuple[0], tuple[depth]])
        .collect()
}

/// Maximum common edge subgraphs by pairwise iteration.
///
/// Returns mappings of full-width correspondence tuples extending the
/// anchor, or `vec![anchor]` when no branch extends it. Equivalent to
/// [`mces_all_products`](crate::cliques::mces_all_products) on inputs
/// small enough for the all-at-once product, but scales to longer graph
/// lists.
pub fn mces_iterative(
    graphs: &[Graph],
    anchor: &EdgeAnchor,
    config: &McesConfig,
) -> Result<Vec<Mapping>> {
    if graphs.len() < 2 {
        return Err(Error::invalid_input(
            "iterative MCES requires at least two graphs",
        ));
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

    let anchor: EdgeAnchor = anchor
        .iter()
        .map(|entry| entry.iter().map(|&(u, v)| edge_key(u, v)).collect())
        .collect();
    let anchor = &anchor;

    let anchor_len = anchor.len();
    let total = graphs.len();
    let mut results: Vec<Mapping> = Vec::new();

    let base_anchor = project_anchor(anchor, 1);
    let base = mces_products(&[&graphs[0], &graphs[1]], &base_anchor, config)?;

    let mut stack: Vec<Frame> = Vec::new();
    for mapping in dedup_mappings(base, &graphs[0], config.molecule) {
        let graph = graphs[0].edge_subgraph(&first_coordinates(&mapping));
        stack.push(Frame {
            graph,
            depth: 2,
            mapping,
        });
    }

    while let Some(frame) = stack.pop() {
        if frame.depth == total {
            results.push(frame.mapping);
            continue;
        }

        let pair_anchor = project_anchor(anchor, frame.depth);
        let found = mces_products(&[&frame.graph, &graphs[frame.depth]], &pair_anchor, config)?;
        for candidate in dedup_mappings(found, &frame.graph, config.molecule) {
            // Branches that add nothing beyond the anchor are dead ends.
            if candidate.len() <= anchor_len {
                continue;
            }

            // Extend the accumulated tuples by the new image, matching on
            // the L[0] coordinate; tuples the candidate does not cover
            // are dropped from the branch.
            let mut extended = frame.mapping.clone();
            let mut carried: Mapping = Vec::new();
            for tuple in &candidate {
                for (slot, current) in frame.mapping.iter().enumerate() {
                    if current[0] == tuple[0] {
                        extended[slot].push(tuple[1]);
                        carried.push(extended[slot].clone());
                    }
                }
            }

            let graph = frame.graph.edge_subgraph(&first_coordinates(&candidate));
            stack.push(Frame {
                graph,
                depth: frame.depth + 1,
                mapping: carried,
            });
        }
    }

    if results.is_empty() {
        debug!("no branch extended the anchor");
        return Ok(vec![anchor.clone()]);
    }
    debug!(mappings = results.len(), "iterative search finished");
    Ok(results)
}
