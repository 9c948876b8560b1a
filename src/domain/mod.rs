//! Domain layer: decision graph, traversal records and the session state machine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builtin;
pub mod entities;
pub mod error;
pub mod graph;
pub mod session;

pub use entities::*;
pub use error::DomainError;
pub use graph::{DecisionGraph, GraphIssue};
pub use session::Session;
