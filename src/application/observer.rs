//! Change notifications from the traversal engine to its views.

use crate::domain::{SessionState, Step};

/// What happened to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// `start()` reset the path and visited the root
    Started,
    /// `answer()` appended one step
    Advanced,
}

/// Snapshot handed to observers after a successful state change.
#[derive(Debug, Clone, Copy)]
pub struct SessionChange<'a> {
    pub kind: ChangeKind,
    pub path: &'a [Step],
    pub state: &'a SessionState,
}

/// Subscriber to session changes, e.g. the transcript or the flow diagram.
///
/// Observers only project state; they cannot fail the traversal.
pub trait SessionObserver {
    fn on_change(&mut self, change: &SessionChange<'_>);
}
