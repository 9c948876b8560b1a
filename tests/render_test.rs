//! Tests for the transcript and diagram views driven by the engine

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::sync::Arc;

use triage::application::TraversalEngine;
use triage::cli::render::{render_graph_tree, DiagramView, TranscriptView};
use triage::domain::builtin::cholera_screening;
use triage::domain::{Answer, DecisionGraph, Node};
use triage::util::testing;

/// Writer whose bytes stay readable after the view took ownership.
#[derive(Clone, Default)]
struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl SharedBuf {
    fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }

    fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn engine_with(graph: DecisionGraph) -> TraversalEngine {
    testing::init_test_setup();
    colored::control::set_override(false);
    TraversalEngine::new(Arc::new(graph))
}

#[test]
fn given_transcript_view_when_walking_then_entries_are_only_appended() {
    // Arrange
    let buf = SharedBuf::default();
    let mut engine = engine_with(cholera_screening());
    engine.subscribe(Box::new(TranscriptView::new(buf.clone(), 2)));

    // Act
    engine.start().unwrap();
    let after_start = buf.contents();
    engine.answer(Answer::Yes).unwrap();
    let after_first = buf.contents();
    engine.answer(Answer::No).unwrap();
    let after_second = buf.contents();

    // Assert
    assert!(after_start.starts_with("Question [start]\n"));
    assert!(after_first.starts_with(&after_start));
    assert!(after_second.starts_with(&after_first));
    assert_eq!(
        &after_first[after_start.len()..],
        "  > yes\n  Question [q1]\n    Is there intense vomiting?\n"
    );
    assert!(after_second[after_first.len()..].starts_with("    > no\n    Conclusion [c1]\n"));
    assert_eq!(after_second.matches("Question [start]").count(), 1);
}

#[test]
fn given_diagram_view_when_walking_then_whole_path_rendered_each_time() {
    // Arrange
    let buf = SharedBuf::default();
    let mut engine = engine_with(cholera_screening());
    engine.subscribe(Box::new(DiagramView::new(buf.clone(), 2)));

    // Act
    engine.start().unwrap();
    buf.clear();
    engine.answer(Answer::No).unwrap();
    let diagram = buf.contents();

    // Assert: the latest render repeats the root and adds the conclusion
    assert!(diagram.starts_with("── flow ──\n"));
    assert!(diagram.contains("● Question [start]"));
    assert!(diagram.contains("\n  ↓\n"));
    assert!(diagram.contains("  ✗ Conclusion [c0]"));
    assert!(diagram.trim_end().ends_with("──────────"));
}

#[test]
fn given_group_change_when_rendering_diagram_then_risk_question_not_indented() {
    let buf = SharedBuf::default();
    let mut engine = engine_with(cholera_screening());
    engine.subscribe(Box::new(DiagramView::new(buf.clone(), 4)));

    engine.start().unwrap();
    for _ in 0..3 {
        engine.answer(Answer::Yes).unwrap();
    }
    buf.clear();
    engine.answer(Answer::Yes).unwrap();
    let diagram = buf.contents();

    assert!(diagram.contains("\n            ✓ Question [q3]"));
    assert!(diagram.contains("\n✓ Question [q4]"));
}

#[test]
fn given_finished_session_when_restarting_then_transcript_marks_new_session() {
    let buf = SharedBuf::default();
    let mut engine = engine_with(cholera_screening());
    engine.subscribe(Box::new(TranscriptView::new(buf.clone(), 2)));

    engine.start().unwrap();
    engine.answer(Answer::No).unwrap();
    engine.start().unwrap();

    let transcript = buf.contents();
    assert_eq!(transcript.matches("── new session ──").count(), 1);
    assert_eq!(transcript.matches("Question [start]").count(), 2);
}

#[test]
fn given_failed_answer_when_observing_then_views_receive_nothing() {
    let buf = SharedBuf::default();
    let graph = DecisionGraph::new(
        "q",
        vec![
            Node::question("q", "?", "g", "ghost", "end"),
            Node::conclusion("end", "end", "g"),
        ],
    )
    .unwrap();
    let mut engine = engine_with(graph);
    engine.subscribe(Box::new(TranscriptView::new(buf.clone(), 2)));
    engine.subscribe(Box::new(DiagramView::new(buf.clone(), 2)));
    engine.start().unwrap();
    let before = buf.contents();

    assert!(engine.answer(Answer::Yes).is_err());

    assert_eq!(buf.contents(), before);
}

#[test]
fn given_builtin_graph_when_rendering_tree_then_every_node_and_edge_shown() {
    colored::control::set_override(false);
    let graph = cholera_screening();

    let tree = render_graph_tree(&graph).to_string();

    for node in graph.nodes() {
        assert!(tree.contains(&format!("[{}]", node.id)), "missing {}", node.id);
    }
    assert!(tree.contains("yes → Question [q1]"));
    assert!(tree.contains("no → Conclusion [c0]"));
}

#[test]
fn given_cycle_and_dangling_edge_when_rendering_tree_then_marked_instead_of_recursing() {
    colored::control::set_override(false);
    let graph = DecisionGraph::new(
        "a",
        vec![
            Node::question("a", "first", "g", "b", "ghost"),
            Node::question("b", "second", "g", "a", "a"),
        ],
    )
    .unwrap();

    let tree = render_graph_tree(&graph).to_string();

    assert!(tree.contains("(cycle back to [a])"));
    assert!(tree.contains("(missing node 'ghost')"));
}
