//! End-to-end scenarios for the pairwise McGregor engine.

use mces::{mces_pairwise, Graph, McgregorConfig, PairwiseAnchor};

fn small_pair() -> (Graph, Graph) {
    let g = Graph::from_edges([(0, 1), (0, 2), (1, 2), (2, 3), (3, 4)]);
    let h = Graph::from_edges([
        (0, 1),
        (1, 2),
        (1, 3),
        (1, 7),
        (2, 3),
        (3, 4),
        (3, 6),
        (6, 7),
        (7, 8),
        (4, 5),
    ]);
    (g, h)
}

#[test]
fn node_anchor_extends_to_the_maximum() {
    // K3 with a tail embeds fully into H when vertex 4 is pinned to 5:
    // the triangle maps onto H's {1, 2, 3} and the tail onto 3-4-5.
    let (g, h) = small_pair();
    let anchor = PairwiseAnchor::from_vertices(vec![(4, 5)]);
    let results = mces_pairwise(&g, &h, &anchor, &McgregorConfig::default()).unwrap();
    assert!(!results.is_empty());
    for result in &results {
        assert_eq!(result.arcsleft, g.edge_count());
        assert!(result.mapping.contains(&(4, 5)));
        assert_eq!(result.mapping.len(), g.node_count());
    }
}

#[test]
fn first_maximum_only_mode_agrees_on_the_bound() {
    let (g, h) = small_pair();
    let anchor = PairwiseAnchor::from_vertices(vec![(4, 5)]);
    let all = mces_pairwise(&g, &h, &anchor, &McgregorConfig::default()).unwrap();
    let first = mces_pairwise(
        &g,
        &h,
        &anchor,
        &McgregorConfig {
            collect_ties: false,
            ..McgregorConfig::default()
        },
    )
    .unwrap();
    assert_eq!(all[0].arcsleft, first[0].arcsleft);
    assert!(first.len() <= all.len());
}

#[test]
fn dense_target_absorbs_triangle_with_tail() {
    // Triangle 0-1-2 with tail 2-3; H is K10 with a pendant vertex 10.
    // Anchoring the tail end onto the pendant leaves the triangle free to
    // land anywhere in the clique, so every edge stays mappable.
    let g = Graph::from_edges([(0, 1), (1, 2), (2, 0), (2, 3)]);
    let mut h = Graph::new();
    for i in 0..10 {
        for j in (i + 1)..10 {
            h.add_edge(i, j);
        }
    }
    h.add_edge(9, 10);

    let anchor = PairwiseAnchor::from_vertices(vec![(3, 10)]);
    let results = mces_pairwise(&g, &h, &anchor, &McgregorConfig::default()).unwrap();
    assert!(!results.is_empty());
    assert_eq!(results[0].arcsleft, g.edge_count());
    for result in &results {
        assert!(result.mapping.contains(&(3, 10)));
    }
}

#[test]
fn marcs_invariants_hold_on_results() {
    let (g, h) = small_pair();
    let rows = g.edge_count();
    let columns = h.edge_count();
    let results =
        mces_pairwise(&g, &h, &PairwiseAnchor::none(), &McgregorConfig::default()).unwrap();
    for result in &results {
        let mut non_zero_rows = 0;
        for i in 0..rows {
            let ones = (0..columns).filter(|&j| result.marcs.get(i, j)).count();
            assert_eq!(ones, result.marcs.row_ones(i));
            if ones > 0 {
                non_zero_rows += 1;
            }
        }
        assert_eq!(non_zero_rows, result.marcs.arcsleft());
        assert_eq!(result.arcsleft, result.marcs.arcsleft());
    }
}

#[test]
fn anchored_pairs_always_survive_in_the_mapping() {
    let (g, h) = small_pair();
    let anchor = PairwiseAnchor::from_edges(vec![((3, 4), (4, 5))]);
    let results = mces_pairwise(&g, &h, &anchor, &McgregorConfig::default()).unwrap();
    for result in &results {
        assert!(result.mapping.contains(&(3, 4)));
        assert!(result.mapping.contains(&(4, 5)));
    }
}
