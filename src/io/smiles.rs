//! Data contract for SMILES producers.
//!
//! A SMILES parser is expected to deliver per-atom `element`/`charge`
//! and per-bond numeric `order`. This boundary converts those into the
//! internal labels: the atom type is the element with a non-zero charge
//! appended, the bond type follows {1: s, 2: d, 3: t, 4: q, 1.5: a}.

use crate::error::{Error, Result};
use crate::graph::{BondType, Graph, NodeId};

/// One atom as produced by a SMILES parser.
#[derive(Clone, Debug)]
pub struct SmilesAtom {
    pub id: NodeId,
    pub element: String,
    pub charge: i8,
}

/// One bond as produced by a SMILES parser; `order` 1.5 denotes an
/// aromatic bond.
#[derive(Clone, Debug)]
pub struct SmilesBond {
    pub u: NodeId,
    pub v: NodeId,
    pub order: f64,
}

fn bond_from_order(order: f64) -> Result<BondType> {
    let bond = if order == 1.0 {
        BondType::Single
    } else if order == 2.0 {
        BondType::Double
    } else if order == 3.0 {
        BondType::Triple
    } else if order == 4.0 {
        BondType::Quadruple
    } else if order == 1.5 {
        BondType::Aromatic
    } else {
        return Err(Error::invalid_input(format!(
            "unsupported bond order {order}"
        )));
    };
    Ok(bond)
}

/// Build a labeled [`Graph`] from SMILES parser output.
pub fn labeled_graph(atoms: &[SmilesAtom], bonds: &[SmilesBond]) -> Result<Graph> {
    let mut g = Graph::with_capacity(atoms.len(), bonds.len());
    for atom in atoms {
        let atom_type = if atom.charge != 0 {
            format!("{}{}", atom.element, atom.charge)
        } else {
            atom.element.clone()
        };
        g.add_atom(atom.id, atom_type);
    }
    for bond in bonds {
        g.add_bond(bond.u, bond.v, bond_from_order(bond.order)?);
    }
    Ok(g)
}
