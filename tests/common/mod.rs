//! Shared fixtures: the small molecules used across the integration
//! tests.

use mces::{BondType, Graph};

pub fn propanoic_acid() -> Graph {
    let mut g = Graph::new();
    for (n, atom) in [
        (0, "C"),
        (1, "C"),
        (2, "C"),
        (3, "O"),
        (4, "O"),
        (5, "H"),
        (6, "H"),
        (7, "H"),
        (8, "H"),
        (9, "H"),
        (10, "H"),
    ] {
        g.add_atom(n, atom);
    }
    g.add_bond(0, 1, BondType::Single);
    g.add_bond(1, 2, BondType::Single);
    g.add_bond(2, 3, BondType::Double);
    g.add_bond(2, 4, BondType::Single);
    g.add_bond(4, 5, BondType::Single);
    g.add_bond(0, 8, BondType::Single);
    g.add_bond(0, 9, BondType::Single);
    g.add_bond(0, 10, BondType::Single);
    g.add_bond(1, 6, BondType::Single);
    g.add_bond(1, 7, BondType::Single);
    g
}

pub fn methanoic_acid() -> Graph {
    let mut g = Graph::new();
    for (n, atom) in [(0, "C"), (1, "O"), (2, "O"), (3, "H"), (4, "H")] {
        g.add_atom(n, atom);
    }
    g.add_bond(0, 1, BondType::Double);
    g.add_bond(0, 2, BondType::Single);
    g.add_bond(0, 4, BondType::Single);
    g.add_bond(2, 3, BondType::Single);
    g
}

pub fn methanol() -> Graph {
    let mut g = Graph::new();
    for (n, atom) in [(0, "C"), (1, "O"), (2, "H"), (3, "H"), (4, "H"), (5, "H")] {
        g.add_atom(n, atom);
    }
    g.add_bond(0, 1, BondType::Single);
    g.add_bond(0, 3, BondType::Single);
    g.add_bond(0, 4, BondType::Single);
    g.add_bond(0, 5, BondType::Single);
    g.add_bond(1, 2, BondType::Single);
    g
}
