//! Input shrinking around the anchor.
//!
//! A breadth-first pass from the anchored vertices (all at distance 0)
//! measures how far each graph stretches away from its anchor; deleting
//! everything beyond a chosen radius trades completeness for a smaller
//! search space.

use std::collections::VecDeque;

use hashbrown::HashMap;
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::{Edge, Graph, NodeId};

/// Distances from the anchor per graph, restricted to reachable vertices.
pub type DistanceMap = HashMap<NodeId, u32>;

fn bfs_from_anchor(g: &Graph, sources: &[NodeId]) -> DistanceMap {
    let mut distances = DistanceMap::with_capacity(g.node_count());
    let mut queue = VecDeque::new();
    for &s in sources {
        distances.insert(s, 0);
        queue.push_back(s);
    }
    while let Some(u) = queue.pop_front() {
        let next = distances[&u] + 1;
        for v in g.neighbors(u) {
            if !distances.contains_key(&v) {
                distances.insert(v, next);
                queue.push_back(v);
            }
        }
    }
    distances
}

/// Per-graph distance maps from the anchored vertices, plus the smallest
/// anchor diameter: the minimum over graphs of the largest distance.
///
/// `anchored[i]` lists the anchored edges of `graphs[i]`; every graph
/// must anchor at least one edge.
pub fn anchor_reach(
    graphs: &[Graph],
    anchored: &[Vec<Edge>],
) -> Result<(Vec<DistanceMap>, u32)> {
    if graphs.is_empty() || graphs.len() != anchored.len() {
        return Err(Error::invalid_input(
            "one anchored edge list is required per graph",
        ));
    }

    let mut maps = Vec::with_capacity(graphs.len());
    let mut diameter = u32::MAX;
    for (i, (g, edges)) in graphs.iter().zip(anchored).enumerate() {
        if edges.is_empty() {
            return Err(Error::invalid_input(format!(
                "graph {i} has no anchored edges"
            )));
        }
        let mut sources: Vec<NodeId> = edges.iter().flat_map(|&(u, v)| [u, v]).collect();
        sources.sort_unstable();
        sources.dedup();
        for &s in &sources {
            if !g.contains_node(s) {
                return Err(Error::invalid_input(format!(
                    "anchored vertex {s} is not in graph {i}"
                )));
            }
        }
        let distances = bfs_from_anchor(g, &sources);
        let farthest = distances.values().copied().max().unwrap_or(0);
        diameter = diameter.min(farthest);
        maps.push(distances);
    }
    debug!(diameter, "measured anchor reach");
    Ok((maps, diameter))
}

/// Copies of the graphs with every vertex recorded farther than `radius`
/// from the anchor removed. Vertices missing from a distance map (i.e.
/// unreachable from the anchor) are retained.
pub fn shrink_graphs(graphs: &[Graph], radius: u32, maps: &[DistanceMap]) -> Vec<Graph> {
    graphs
        .iter()
        .zip(maps)
        .map(|(g, distances)| {
            let mut shrunk = g.clone();
            let mut far: Vec<NodeId> = distances
                .iter()
                .filter(|&(_, &d)| d > radius)
                .map(|(&n, _)| n)
                .collect();
            far.sort_unstable();
            for n in far {
                shrunk.remove_node(n);
            }
            shrunk
        })
        .collect()
}
