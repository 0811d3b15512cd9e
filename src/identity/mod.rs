//! Collision-free identifier generation and consistent reference rewriting.

mod generator;
mod remap;

pub use generator::IdGenerator;
pub use remap::{EDGE_ID_PREFIX, NODE_ID_PREFIX, RemapTable};
