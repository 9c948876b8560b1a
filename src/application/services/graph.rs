//! Decision graph loading and export
//!
//! Graphs come either from the built-in questionnaire or from a TOML file read
//! once at startup.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::builtin::cholera_screening;
use crate::domain::{DecisionGraph, Node, NodeKind};
use crate::infrastructure::traits::FileSystem;

/// On-disk graph layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphFile {
    pub root: String,
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
}

/// One `[[nodes]]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeRecord {
    pub id: String,
    pub kind: NodeKindRecord,
    pub text: String,
    pub group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NodeKindRecord {
    Question,
    Conclusion,
}

impl From<NodeKindRecord> for NodeKind {
    fn from(kind: NodeKindRecord) -> Self {
        match kind {
            NodeKindRecord::Question => NodeKind::Question,
            NodeKindRecord::Conclusion => NodeKind::Conclusion,
        }
    }
}

impl From<NodeKind> for NodeKindRecord {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Question => NodeKindRecord::Question,
            NodeKind::Conclusion => NodeKindRecord::Conclusion,
        }
    }
}

impl From<NodeRecord> for Node {
    fn from(record: NodeRecord) -> Self {
        Node {
            id: record.id,
            kind: record.kind.into(),
            text: record.text,
            group: record.group,
            on_yes: record.yes,
            on_no: record.no,
        }
    }
}

impl From<&Node> for NodeRecord {
    fn from(node: &Node) -> Self {
        NodeRecord {
            id: node.id.clone(),
            kind: node.kind.into(),
            text: node.text.clone(),
            group: node.group.clone(),
            yes: node.on_yes.clone(),
            no: node.on_no.clone(),
        }
    }
}

impl GraphFile {
    /// Parse TOML content. `path` is only used for error messages.
    pub fn parse(content: &str, path: &Path) -> ApplicationResult<Self> {
        toml::from_str(content).map_err(|e| ApplicationError::GraphFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn into_graph(self, path: &Path) -> ApplicationResult<DecisionGraph> {
        DecisionGraph::new(self.root, self.nodes.into_iter().map(Node::from)).map_err(|e| {
            ApplicationError::GraphFile {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })
    }
}

impl From<&DecisionGraph> for GraphFile {
    fn from(graph: &DecisionGraph) -> Self {
        GraphFile {
            root: graph.root().to_string(),
            nodes: graph.nodes().map(NodeRecord::from).collect(),
        }
    }
}

/// Service for obtaining the decision graph of a run.
pub struct GraphService {
    fs: Arc<dyn FileSystem>,
}

impl GraphService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Load the graph from `path`, or the built-in questionnaire if `None`.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: Option<&Path>) -> ApplicationResult<DecisionGraph> {
        let Some(path) = path else {
            debug!("using built-in questionnaire");
            return Ok(cholera_screening());
        };
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read graph file", path)?;
        let graph = GraphFile::parse(&content, path)?.into_graph(path)?;
        debug!(nodes = graph.len(), root = graph.root(), "graph loaded");
        Ok(graph)
    }

    /// Serialize a graph in the same TOML layout `load` reads.
    pub fn export(&self, graph: &DecisionGraph) -> ApplicationResult<String> {
        toml::to_string_pretty(&GraphFile::from(graph)).map_err(serialize_err)
    }
}

fn serialize_err(e: toml::ser::Error) -> ApplicationError {
    ApplicationError::OperationFailed {
        context: "serialize graph".to_string(),
        source: Box::new(e),
    }
}
