//! Session state machine: current position plus the append-only path.

use crate::domain::error::DomainError;
use crate::domain::{Answer, DecisionGraph, NodeKind, SessionState, Step, StepAnswer};

/// One walk through a [`DecisionGraph`].
///
/// States are `Idle -> AwaitingAnswer(id) -> ... -> Terminal`. Every operation
/// computes its result first and then replaces the state in one go, so a
/// failing call leaves `path` and `state` untouched.
#[derive(Debug, Clone, Default)]
pub struct Session {
    path: Vec<Step>,
    state: SessionState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the path and visit the root node.
    pub fn start(&mut self, graph: &DecisionGraph) -> Result<&Step, DomainError> {
        let root = graph.get(graph.root())?;
        let step = Step::visit(root, StepAnswer::Start, 0);
        self.state = Self::state_after(&step);
        self.path = vec![step];
        Ok(&self.path[0])
    }

    /// Follow the edge selected by `answer` from the pending question.
    pub fn answer(&mut self, graph: &DecisionGraph, answer: Answer) -> Result<&Step, DomainError> {
        let current_id = match &self.state {
            SessionState::AwaitingAnswer(id) => id.as_str(),
            SessionState::Idle => {
                return Err(DomainError::InvalidState(
                    "session has not been started".to_string(),
                ))
            }
            SessionState::Terminal => {
                return Err(DomainError::InvalidState(
                    "session already reached a conclusion".to_string(),
                ))
            }
        };

        let current = graph.get(current_id)?;
        if current.kind != NodeKind::Question {
            return Err(DomainError::InvalidState(format!(
                "'{}' is not a question",
                current.id
            )));
        }

        let next_id = current
            .successor(answer)
            .ok_or_else(|| DomainError::MissingSuccessor {
                node: current.id.clone(),
                answer,
            })?;
        let next = graph.get(next_id)?;

        let previous_depth = self.path.last().map(|s| s.depth).unwrap_or(0);
        let depth = if next.group != current.group {
            0
        } else {
            previous_depth + 1
        };

        let step = Step::visit(next, answer.into(), depth);
        self.state = Self::state_after(&step);
        self.path.push(step);
        Ok(&self.path[self.path.len() - 1])
    }

    pub fn path(&self) -> &[Step] {
        &self.path
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state == SessionState::Terminal
    }

    fn state_after(step: &Step) -> SessionState {
        match step.kind {
            NodeKind::Question => SessionState::AwaitingAnswer(step.node_id.clone()),
            NodeKind::Conclusion => SessionState::Terminal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Node;

    fn two_phase_graph() -> DecisionGraph {
        DecisionGraph::new(
            "s1",
            vec![
                Node::question("s1", "S1?", "symptoms", "s2", "c-none"),
                Node::question("s2", "S2?", "symptoms", "r1", "c-mild"),
                Node::question("r1", "R1?", "risk", "c-high", "c-low"),
                Node::conclusion("c-none", "None.", "symptoms"),
                Node::conclusion("c-mild", "Mild.", "symptoms"),
                Node::conclusion("c-high", "High.", "risk"),
                Node::conclusion("c-low", "Low.", "risk"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn given_new_session_when_answering_then_invalid_state() {
        let graph = two_phase_graph();
        let mut session = Session::new();
        assert!(matches!(
            session.answer(&graph, Answer::Yes),
            Err(DomainError::InvalidState(_))
        ));
        assert!(session.path().is_empty());
        assert_eq!(session.state(), &SessionState::Idle);
    }

    #[test]
    fn given_started_session_when_changing_group_then_depth_resets() {
        let graph = two_phase_graph();
        let mut session = Session::new();
        session.start(&graph).unwrap();
        assert_eq!(session.answer(&graph, Answer::Yes).unwrap().depth, 1);
        assert_eq!(session.answer(&graph, Answer::Yes).unwrap().depth, 0);
        assert_eq!(session.answer(&graph, Answer::No).unwrap().depth, 1);
        assert!(session.is_terminal());
    }

    #[test]
    fn given_terminal_session_when_restarting_then_path_resets() {
        let graph = two_phase_graph();
        let mut session = Session::new();
        session.start(&graph).unwrap();
        session.answer(&graph, Answer::No).unwrap();
        assert!(session.is_terminal());

        session.start(&graph).unwrap();
        assert_eq!(session.path().len(), 1);
        assert_eq!(
            session.state(),
            &SessionState::AwaitingAnswer("s1".to_string())
        );
    }
}
