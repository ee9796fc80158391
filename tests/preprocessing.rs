//! Shrinking around the anchor and its interaction with the MCES search.

mod common;

use mces::{anchor_reach, mces_all_products, shrink_graphs, McesConfig};

#[test]
fn shrunk_mces_is_contained_in_the_full_mces() {
    let graphs = [common::propanoic_acid(), common::methanoic_acid()];
    let anchored = [vec![(2, 4)], vec![(0, 2)]];
    let anchor = vec![vec![(2, 4), (0, 2)]];
    let config = McesConfig {
        molecule: true,
        ..McesConfig::default()
    };

    let full = mces_all_products(&graphs, &anchor, &config).unwrap();

    let (maps, diameter) = anchor_reach(&graphs, &anchored).unwrap();
    assert!(diameter >= 1);
    let shrunk = shrink_graphs(&graphs, 1, &maps);
    assert!(shrunk[0].node_count() < graphs[0].node_count());

    let reduced = mces_all_products(&shrunk, &anchor, &config).unwrap();
    // Every correspondence found on the shrunk inputs already exists in
    // some mapping over the full inputs.
    for mapping in &reduced {
        assert!(full.iter().any(|complete| {
            mapping.iter().all(|tuple| complete.contains(tuple))
        }));
    }
}

#[test]
fn shrink_beyond_the_reach_is_the_identity() {
    let graphs = [common::propanoic_acid(), common::methanoic_acid()];
    let anchored = [vec![(2, 4)], vec![(0, 2)]];
    let (maps, diameter) = anchor_reach(&graphs, &anchored).unwrap();
    // Methanoic acid stays within one step of its anchored bond;
    // propanoic acid reaches distance 3.
    assert_eq!(diameter, 1);
    let same = shrink_graphs(&graphs, 3, &maps);
    assert_eq!(same[0], graphs[0]);
    assert_eq!(same[1], graphs[1]);
}
