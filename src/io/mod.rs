//! Input boundaries: molecule text instances, adjacency-list files, and
//! the data contract for SMILES producers.

pub mod adjacency;
pub mod instance;
pub mod smiles;
