//! **mces** computes anchored Maximum Common Edge Subgraphs (MCES) of two
//! or more undirected graphs, optionally labeled as molecules.
//!
//! An *anchor* is a fixed one-to-one correspondence between designated
//! edges of the inputs; every solution must preserve it. Two engines are
//! provided:
//!
//! - [`mces_pairwise`]: McGregor's backtracking algorithm for two graphs,
//!   driven by the MARCS edge-compatibility matrix and its *arcsleft*
//!   pruning bound.
//! - The clique-based engine of Levi and Barrow–Burstall over the modular
//!   product of line graphs, reduced to the blue-connected components
//!   reachable from the anchor. It scales to *n* graphs either all at
//!   once ([`mces_all_products`]) or by pairwise extension
//!   ([`mces_iterative`]), the latter deduplicating intermediate results
//!   up to label-aware isomorphism.
//!
//! Supporting modules build line graphs and modular products, enumerate
//! anchor correspondences from per-graph anchored edge lists, shrink
//! inputs around the anchor, and parse the molecule text and
//! adjacency-list formats.
//!
//! ```
//! use mces::{mces_pairwise, Graph, McgregorConfig, PairwiseAnchor};
//!
//! let g = Graph::from_edges([(0, 1), (1, 2), (0, 2)]);
//! let h = Graph::from_edges([(0, 1), (1, 2), (0, 2), (2, 3)]);
//! let results = mces_pairwise(&g, &h, &PairwiseAnchor::none(), &McgregorConfig::default())
//!     .unwrap();
//! assert_eq!(results[0].arcsleft, 3);
//! ```
//!
//! All engines are single-threaded and deterministic: vertices are tried
//! in ascending identifier order and edges in canonical (insertion)
//! order. Timeouts are the caller's concern; no global state survives a
//! call.

pub mod anchor;
pub mod cliques;
mod error;
pub mod graph;
pub mod io;
pub mod isomorphism;
pub mod iterative;
pub mod linegraph;
pub mod mcgregor;
pub mod preprocess;
pub mod product;

pub use anchor::{enumerate_anchors, AnchorMode, EdgeAnchor, EdgeTuple, Mapping};
pub use cliques::{mces_all_products, McesConfig};
pub use error::{Error, Result};
pub use graph::{BondType, Edge, Graph, NodeId};
pub use isomorphism::is_isomorphic;
pub use iterative::mces_iterative;
pub use linegraph::{line_graph, LineGraph};
pub use mcgregor::{mces_pairwise, Marcs, McgregorConfig, PairwiseAnchor, PairwiseMces};
pub use preprocess::{anchor_reach, shrink_graphs, DistanceMap};
pub use product::{modular_product, modular_product_limited, EdgeColor, ProductGraph};
