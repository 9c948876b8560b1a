//! Traversal engine
//!
//! Owns the session for one run of the questionnaire and notifies subscribed
//! views after every successful step.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::application::observer::{ChangeKind, SessionChange, SessionObserver};
use crate::application::ApplicationResult;
use crate::domain::{Answer, DecisionGraph, Node, Session, SessionState, Step};

/// Drives a [`Session`] over a shared [`DecisionGraph`].
pub struct TraversalEngine {
    graph: Arc<DecisionGraph>,
    session: Session,
    session_id: Uuid,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl TraversalEngine {
    /// Create an idle engine; call [`TraversalEngine::start`] to begin.
    pub fn new(graph: Arc<DecisionGraph>) -> Self {
        Self {
            graph,
            session: Session::new(),
            session_id: Uuid::new_v4(),
            observers: Vec::new(),
        }
    }

    /// Register a view. It is notified on the next change, not retroactively.
    pub fn subscribe(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    /// Begin a new session at the root, discarding any previous path.
    #[instrument(level = "debug", skip(self), fields(root = %self.graph.root()))]
    pub fn start(&mut self) -> ApplicationResult<&Step> {
        let session_id = Uuid::new_v4();
        let step = self.session.start(&self.graph).inspect_err(|e| {
            warn!("start failed: {}", e);
        })?;
        info!(session = %session_id, node = %step.node_id, "session started");
        self.session_id = session_id;
        self.notify(ChangeKind::Started);
        Ok(self.last_step())
    }

    /// Forward a validated answer to the pending question.
    #[instrument(level = "debug", skip(self), fields(session = %self.session_id))]
    pub fn answer(&mut self, answer: Answer) -> ApplicationResult<&Step> {
        let step = self.session.answer(&self.graph, answer).inspect_err(|e| {
            warn!("answer rejected: {}", e);
        })?;
        debug!(
            node = %step.node_id,
            group = %step.group,
            depth = step.depth,
            "advanced"
        );
        if step.is_conclusion() {
            info!(conclusion = %step.node_id, "session reached a conclusion");
        }
        self.notify(ChangeKind::Advanced);
        Ok(self.last_step())
    }

    pub fn path(&self) -> &[Step] {
        self.session.path()
    }

    pub fn state(&self) -> &SessionState {
        self.session.state()
    }

    pub fn is_terminal(&self) -> bool {
        self.session.is_terminal()
    }

    /// The question awaiting an answer, if any.
    pub fn pending_question(&self) -> Option<&Node> {
        self.session
            .state()
            .pending_node_id()
            .and_then(|id| self.graph.get(id).ok())
    }

    pub fn graph(&self) -> &DecisionGraph {
        &self.graph
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    fn last_step(&self) -> &Step {
        // start() and answer() append before notifying
        &self.session.path()[self.session.path().len() - 1]
    }

    fn notify(&mut self, kind: ChangeKind) {
        let change = SessionChange {
            kind,
            path: self.session.path(),
            state: self.session.state(),
        };
        debug!(observers = self.observers.len(), ?kind, "notify");
        for observer in self.observers.iter_mut() {
            observer.on_change(&change);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::builtin::cholera_screening;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Counter(Rc<RefCell<Vec<(ChangeKind, usize)>>>);

    impl SessionObserver for Counter {
        fn on_change(&mut self, change: &SessionChange<'_>) {
            self.0.borrow_mut().push((change.kind, change.path.len()));
        }
    }

    #[test]
    fn given_subscribed_observer_when_walking_then_notified_once_per_step() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut engine = TraversalEngine::new(Arc::new(cholera_screening()));
        engine.subscribe(Box::new(Counter(seen.clone())));

        engine.start().unwrap();
        engine.answer(Answer::Yes).unwrap();
        engine.answer(Answer::No).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![
                (ChangeKind::Started, 1),
                (ChangeKind::Advanced, 2),
                (ChangeKind::Advanced, 3)
            ]
        );
    }

    #[test]
    fn given_terminal_session_when_answering_then_observer_not_notified() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut engine = TraversalEngine::new(Arc::new(cholera_screening()));
        engine.subscribe(Box::new(Counter(seen.clone())));
        engine.start().unwrap();
        engine.answer(Answer::No).unwrap();
        assert!(engine.is_terminal());

        assert!(engine.answer(Answer::Yes).is_err());

        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(engine.path().len(), 2);
    }

    #[test]
    fn given_restart_when_starting_again_then_new_session_id() {
        let mut engine = TraversalEngine::new(Arc::new(cholera_screening()));
        engine.start().unwrap();
        let first = engine.session_id();
        engine.start().unwrap();
        assert_ne!(first, engine.session_id());
    }
}
