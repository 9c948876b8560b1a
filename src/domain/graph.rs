//! Immutable decision graph: lookup from node id to node definition.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

use itertools::Itertools;

use crate::domain::error::DomainError;
use crate::domain::{Answer, Node, NodeKind};

/// Read-only mapping from node id to [`Node`] with one designated root.
///
/// Fully populated at construction and never mutated afterwards. Successor
/// references are not checked here; traversal surfaces bad references as
/// [`DomainError::NodeNotFound`] / [`DomainError::MissingSuccessor`], and
/// [`DecisionGraph::validate`] reports them statically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionGraph {
    root: String,
    nodes: BTreeMap<String, Node>,
}

impl DecisionGraph {
    /// Build a graph from its root id and node definitions.
    ///
    /// Fails only on duplicate node ids. A root that does not exist is accepted
    /// and reported by `start()` as `NodeNotFound`.
    pub fn new(
        root: impl Into<String>,
        nodes: impl IntoIterator<Item = Node>,
    ) -> Result<Self, DomainError> {
        let mut map = BTreeMap::new();
        for node in nodes {
            if map.contains_key(&node.id) {
                return Err(DomainError::DuplicateNode(node.id));
            }
            map.insert(node.id.clone(), node);
        }
        Ok(Self {
            root: root.into(),
            nodes: map,
        })
    }

    /// Build from nodes whose ids are unique by construction.
    ///
    /// A repeated id replaces the earlier node; callers own the uniqueness.
    pub(crate) fn from_unique(
        root: impl Into<String>,
        nodes: impl IntoIterator<Item = Node>,
    ) -> Self {
        Self {
            root: root.into(),
            nodes: nodes.into_iter().map(|n| (n.id.clone(), n)).collect(),
        }
    }

    /// Look up a node by id.
    pub fn get(&self, id: &str) -> Result<&Node, DomainError> {
        self.nodes
            .get(id)
            .ok_or_else(|| DomainError::NodeNotFound(id.to_string()))
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Static authoring diagnostics, sorted by node id.
    ///
    /// Traversal never consults this; an empty result means every question has
    /// both successors, every reference resolves, conclusions carry no edges and
    /// every node is reachable from the root.
    pub fn validate(&self) -> Vec<GraphIssue> {
        let mut issues = Vec::new();

        if !self.contains(&self.root) {
            issues.push(GraphIssue::MissingRoot {
                root: self.root.clone(),
            });
        }

        for node in self.nodes.values() {
            match node.kind {
                NodeKind::Question => {
                    for answer in [Answer::Yes, Answer::No] {
                        match node.successor(answer) {
                            None => issues.push(GraphIssue::MissingSuccessor {
                                node: node.id.clone(),
                                answer,
                            }),
                            Some(target) if !self.contains(target) => {
                                issues.push(GraphIssue::DanglingReference {
                                    node: node.id.clone(),
                                    answer,
                                    target: target.to_string(),
                                })
                            }
                            Some(_) => {}
                        }
                    }
                }
                NodeKind::Conclusion => {
                    if node.on_yes.is_some() || node.on_no.is_some() {
                        issues.push(GraphIssue::UnexpectedSuccessor {
                            node: node.id.clone(),
                        });
                    }
                }
            }
        }

        let reachable = self.reachable();
        issues.extend(
            self.nodes
                .keys()
                .filter(|id| !reachable.contains(id.as_str()))
                .map(|id| GraphIssue::Unreachable { node: id.clone() }),
        );

        issues
            .into_iter()
            .sorted_by(|a, b| a.node_id().cmp(b.node_id()))
            .collect()
    }

    /// Ids reachable from the root over yes/no edges.
    fn reachable(&self) -> BTreeSet<&str> {
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::new();
        if let Some((id, _)) = self.nodes.get_key_value(self.root.as_str()) {
            queue.push_back(id.as_str());
        }
        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(node) = self.nodes.get(id) {
                for target in [node.on_yes.as_deref(), node.on_no.as_deref()]
                    .into_iter()
                    .flatten()
                {
                    if let Some((key, _)) = self.nodes.get_key_value(target) {
                        queue.push_back(key.as_str());
                    }
                }
            }
        }
        seen
    }
}

/// A defect found by [`DecisionGraph::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphIssue {
    MissingRoot {
        root: String,
    },
    DanglingReference {
        node: String,
        answer: Answer,
        target: String,
    },
    MissingSuccessor {
        node: String,
        answer: Answer,
    },
    UnexpectedSuccessor {
        node: String,
    },
    Unreachable {
        node: String,
    },
}

impl GraphIssue {
    pub fn node_id(&self) -> &str {
        match self {
            GraphIssue::MissingRoot { root } => root,
            GraphIssue::DanglingReference { node, .. }
            | GraphIssue::MissingSuccessor { node, .. }
            | GraphIssue::UnexpectedSuccessor { node }
            | GraphIssue::Unreachable { node } => node,
        }
    }
}

impl fmt::Display for GraphIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphIssue::MissingRoot { root } => write!(f, "root node '{root}' does not exist"),
            GraphIssue::DanglingReference {
                node,
                answer,
                target,
            } => write!(f, "'{node}' on {answer} points to unknown node '{target}'"),
            GraphIssue::MissingSuccessor { node, answer } => {
                write!(f, "question '{node}' has no successor for {answer}")
            }
            GraphIssue::UnexpectedSuccessor { node } => {
                write!(f, "conclusion '{node}' must not have successors")
            }
            GraphIssue::Unreachable { node } => {
                write!(f, "'{node}' is not reachable from the root")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_graph() -> DecisionGraph {
        DecisionGraph::new(
            "q",
            vec![
                Node::question("q", "Q?", "g", "yes-end", "no-end"),
                Node::conclusion("yes-end", "Yes.", "g"),
                Node::conclusion("no-end", "No.", "g"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn given_every_node_when_looking_up_then_returns_node_with_same_id() {
        let graph = small_graph();
        for node in graph.nodes() {
            assert_eq!(graph.get(&node.id).unwrap().id, node.id);
        }
    }

    #[test]
    fn given_unknown_id_when_looking_up_then_node_not_found() {
        let graph = small_graph();
        assert_eq!(
            graph.get("nope"),
            Err(DomainError::NodeNotFound("nope".to_string()))
        );
    }

    #[test]
    fn given_duplicate_ids_when_building_then_rejected() {
        let result = DecisionGraph::new(
            "a",
            vec![
                Node::conclusion("a", "A", "g"),
                Node::conclusion("a", "A again", "g"),
            ],
        );
        assert_eq!(result, Err(DomainError::DuplicateNode("a".to_string())));
    }

    #[test]
    fn given_consistent_graph_when_validating_then_no_issues() {
        assert!(small_graph().validate().is_empty());
    }

    #[test]
    fn given_missing_root_when_validating_then_reports_root_and_unreachable_nodes() {
        let graph = DecisionGraph::new("ghost", vec![Node::conclusion("c", "C", "g")]).unwrap();
        let issues = graph.validate();
        assert!(issues.contains(&GraphIssue::MissingRoot {
            root: "ghost".to_string()
        }));
        assert!(issues.contains(&GraphIssue::Unreachable {
            node: "c".to_string()
        }));
    }
}
