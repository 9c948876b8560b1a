//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::Answer;

/// Domain errors represent traversal faults and graph-authoring defects.
/// All of them are recoverable: the session stays at its last valid state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node not found in decision graph: {0}")]
    NodeNotFound(String),

    #[error("question '{node}' has no successor for answer '{answer}'")]
    MissingSuccessor { node: String, answer: Answer },

    #[error("no pending question: {0}")]
    InvalidState(String),

    #[error("duplicate node id in decision graph: {0}")]
    DuplicateNode(String),
}
