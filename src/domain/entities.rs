//! Domain entities: core data structures

use std::fmt;
use std::str::FromStr;

/// Whether a node asks something or ends the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Question,
    Conclusion,
}

impl NodeKind {
    /// Human readable label used in transcript and diagram headers.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Question => "Question",
            NodeKind::Conclusion => "Conclusion",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A validated user choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Answer::Yes => "yes",
            Answer::No => "no",
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for input that is neither yes nor no.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerParseError {
    pub input: String,
}

impl fmt::Display for AnswerParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected 'yes' or 'no', got '{}'", self.input)
    }
}

impl std::error::Error for AnswerParseError {}

impl FromStr for Answer {
    type Err = AnswerParseError;

    /// Accepts `yes`/`y`/`no`/`n`, case-insensitive, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" => Ok(Answer::Yes),
            "no" | "n" => Ok(Answer::No),
            _ => Err(AnswerParseError {
                input: s.trim().to_string(),
            }),
        }
    }
}

/// The input that led to a step. The root step is reached by `Start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepAnswer {
    Start,
    Yes,
    No,
}

impl StepAnswer {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepAnswer::Start => "start",
            StepAnswer::Yes => "yes",
            StepAnswer::No => "no",
        }
    }
}

impl From<Answer> for StepAnswer {
    fn from(answer: Answer) -> Self {
        match answer {
            Answer::Yes => StepAnswer::Yes,
            Answer::No => StepAnswer::No,
        }
    }
}

impl fmt::Display for StepAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static entry of the decision graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub text: String,
    /// Questionnaire phase, e.g. "symptoms" or "risk"
    pub group: String,
    /// Successor for a "yes" answer (questions only)
    pub on_yes: Option<String>,
    /// Successor for a "no" answer (questions only)
    pub on_no: Option<String>,
}

impl Node {
    pub fn question(
        id: impl Into<String>,
        text: impl Into<String>,
        group: impl Into<String>,
        on_yes: impl Into<String>,
        on_no: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Question,
            text: text.into(),
            group: group.into(),
            on_yes: Some(on_yes.into()),
            on_no: Some(on_no.into()),
        }
    }

    pub fn conclusion(
        id: impl Into<String>,
        text: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Conclusion,
            text: text.into(),
            group: group.into(),
            on_yes: None,
            on_no: None,
        }
    }

    pub fn is_question(&self) -> bool {
        self.kind == NodeKind::Question
    }

    /// Successor id selected by `answer`, if the node has one.
    pub fn successor(&self, answer: Answer) -> Option<&str> {
        match answer {
            Answer::Yes => self.on_yes.as_deref(),
            Answer::No => self.on_no.as_deref(),
        }
    }
}

/// One recorded visit to a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub node_id: String,
    pub kind: NodeKind,
    pub text: String,
    pub group: String,
    pub answer: StepAnswer,
    /// Visual nesting only, never used for branching
    pub depth: usize,
}

impl Step {
    pub fn visit(node: &Node, answer: StepAnswer, depth: usize) -> Self {
        Self {
            node_id: node.id.clone(),
            kind: node.kind,
            text: node.text.clone(),
            group: node.group.clone(),
            answer,
            depth,
        }
    }

    pub fn is_conclusion(&self) -> bool {
        self.kind == NodeKind::Conclusion
    }
}

/// Position of a session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Not started yet
    #[default]
    Idle,
    /// Waiting for the answer to the given question
    AwaitingAnswer(String),
    /// A conclusion was reached; only `start()` is valid
    Terminal,
}

impl SessionState {
    pub fn pending_node_id(&self) -> Option<&str> {
        match self {
            SessionState::AwaitingAnswer(id) => Some(id),
            _ => None,
        }
    }
}
