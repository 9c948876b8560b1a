//! Application services

pub mod graph;
pub mod traversal;

pub use graph::{GraphFile, GraphService, NodeRecord};
pub use traversal::TraversalEngine;
