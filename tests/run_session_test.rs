//! Tests for the answer loop: prompts feeding the engine

use std::io::Cursor;
use std::sync::Arc;

use rstest::rstest;

use triage::application::TraversalEngine;
use triage::cli::commands::{run_session, SessionOutcome};
use triage::cli::CliError;
use triage::domain::builtin::cholera_screening;
use triage::domain::{Answer, DecisionGraph, Node};
use triage::exitcode;
use triage::infrastructure::traits::{LinePrompt, ScriptedPrompt};
use triage::util::testing;

fn started(graph: DecisionGraph) -> TraversalEngine {
    testing::init_test_setup();
    let mut engine = TraversalEngine::new(Arc::new(graph));
    engine.start().unwrap();
    engine
}

#[rstest]
#[case(vec![Answer::No], "c0")]
#[case(vec![Answer::Yes, Answer::Yes, Answer::No], "c2")]
#[case(vec![Answer::Yes; 5], "c4")]
fn given_scripted_answers_when_running_then_concludes(
    #[case] answers: Vec<Answer>,
    #[case] conclusion: &str,
) {
    let mut engine = started(cholera_screening());
    let prompt = ScriptedPrompt::new(answers);

    let outcome = run_session(&mut engine, &prompt).unwrap();

    assert_eq!(
        outcome,
        SessionOutcome::Concluded {
            conclusion: conclusion.to_string()
        }
    );
    assert_eq!(prompt.remaining(), 0);
}

#[test]
fn given_extra_answers_when_conclusion_reached_then_rest_left_unused() {
    let mut engine = started(cholera_screening());
    let prompt = ScriptedPrompt::new([Answer::No, Answer::Yes, Answer::Yes]);

    run_session(&mut engine, &prompt).unwrap();

    assert_eq!(prompt.remaining(), 2);
    assert_eq!(engine.path().len(), 2);
}

#[test]
fn given_too_few_answers_when_running_then_paused_at_pending_question() {
    let mut engine = started(cholera_screening());
    let prompt = ScriptedPrompt::new([Answer::Yes, Answer::Yes]);

    let outcome = run_session(&mut engine, &prompt).unwrap();

    assert_eq!(
        outcome,
        SessionOutcome::Paused {
            at: "q2".to_string()
        }
    );
    assert!(!engine.is_terminal());
}

#[test]
fn given_dangling_edge_when_answering_then_question_reasked_and_other_branch_works() {
    let graph = DecisionGraph::new(
        "q",
        vec![
            Node::question("q", "?", "g", "ghost", "end"),
            Node::conclusion("end", "end", "g"),
        ],
    )
    .unwrap();
    let mut engine = started(graph);
    let prompt = ScriptedPrompt::new([Answer::Yes, Answer::No]);

    let outcome = run_session(&mut engine, &prompt).unwrap();

    assert_eq!(
        outcome,
        SessionOutcome::Concluded {
            conclusion: "end".to_string()
        }
    );
    assert_eq!(engine.path().len(), 2);
}

#[test]
fn given_input_ends_after_fault_when_running_then_fault_returned_as_data_error() {
    let graph = DecisionGraph::new(
        "q",
        vec![
            Node::question("q", "?", "g", "ghost", "end"),
            Node::conclusion("end", "end", "g"),
        ],
    )
    .unwrap();
    let mut engine = started(graph);
    let prompt = ScriptedPrompt::new([Answer::Yes]);

    let err = run_session(&mut engine, &prompt).unwrap_err();

    assert!(matches!(err, CliError::Infra(_)));
    assert_eq!(err.exit_code(), exitcode::DATAERR);
    assert_eq!(engine.path().len(), 1);
}

#[test]
fn given_typed_lines_with_garbage_when_running_then_only_valid_answers_reach_engine() {
    // Arrange
    let mut engine = started(cholera_screening());
    let input = Cursor::new("y\nmaybe\nNO\n");
    let mut shown = Vec::new();

    // Act
    {
        let prompt = LinePrompt::new(input, &mut shown);
        let outcome = run_session(&mut engine, &prompt).unwrap();
        assert_eq!(
            outcome,
            SessionOutcome::Concluded {
                conclusion: "c1".to_string()
            }
        );
    }

    // Assert
    let shown = String::from_utf8(shown).unwrap();
    assert!(shown.contains("[start] yes/no > "));
    assert!(shown.contains("expected 'yes' or 'no', got 'maybe'"));
    assert_eq!(shown.matches("[q1] yes/no > ").count(), 2);
}
