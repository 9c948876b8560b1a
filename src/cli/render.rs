//! Presentation of traversal state: transcript, flow diagram and graph tree
//!
//! Views own no decision logic. They subscribe to the engine and project its
//! path onto the terminal.

use std::io::Write;

use colored::{ColoredString, Colorize};
use termtree::Tree;
use tracing::warn;

use crate::application::{ChangeKind, SessionChange, SessionObserver};
use crate::domain::{Answer, DecisionGraph, NodeKind, Step, StepAnswer};

fn pad(depth: usize, indent_width: usize) -> String {
    " ".repeat(depth.saturating_mul(indent_width))
}

fn marker(answer: StepAnswer) -> &'static str {
    match answer {
        StepAnswer::Start => "●",
        StepAnswer::Yes => "✓",
        StepAnswer::No => "✗",
    }
}

/// yes → green, no → red, start → neutral
fn paint(s: String, answer: StepAnswer) -> ColoredString {
    match answer {
        StepAnswer::Start => s.normal(),
        StepAnswer::Yes => s.green(),
        StepAnswer::No => s.red(),
    }
}

fn heading(step: &Step) -> String {
    format!("{} [{}]", step.kind.label(), step.node_id)
}

/// One transcript entry: answer echo (if any), heading and text.
pub fn render_transcript_entry(step: &Step, indent_width: usize) -> String {
    let pad = pad(step.depth, indent_width);
    let mut entry = String::new();
    if step.answer != StepAnswer::Start {
        entry.push_str(&format!(
            "{pad}> {}\n",
            paint(step.answer.to_string(), step.answer)
        ));
    }
    let heading = match step.kind {
        NodeKind::Question => heading(step).bold(),
        NodeKind::Conclusion => heading(step).bold().magenta(),
    };
    entry.push_str(&format!("{pad}{heading}\n{pad}  {}\n", step.text));
    entry
}

/// The full walked path as a flow diagram, one entry per step.
pub fn render_diagram(path: &[Step], indent_width: usize) -> String {
    let mut lines = Vec::with_capacity(path.len() * 2);
    for (i, step) in path.iter().enumerate() {
        if i > 0 {
            lines.push(format!("{}↓", pad(step.depth, indent_width)));
        }
        let header = paint(
            format!("{} {}", marker(step.answer), heading(step)),
            step.answer,
        );
        lines.push(format!(
            "{}{} {}",
            pad(step.depth, indent_width),
            header,
            step.text
        ));
    }
    let mut diagram = lines.join("\n");
    diagram.push('\n');
    diagram
}

/// Whole graph from the root as a tree, edges labelled with their answer.
pub fn render_graph_tree(graph: &DecisionGraph) -> Tree<String> {
    let mut ancestors = Vec::new();
    graph_subtree(graph, graph.root(), None, &mut ancestors)
}

fn graph_subtree(
    graph: &DecisionGraph,
    id: &str,
    edge: Option<Answer>,
    ancestors: &mut Vec<String>,
) -> Tree<String> {
    let prefix = match edge {
        Some(Answer::Yes) => format!("{} → ", "yes".green()),
        Some(Answer::No) => format!("{} → ", "no".red()),
        None => String::new(),
    };

    let Ok(node) = graph.get(id) else {
        return Tree::new(format!("{prefix}(missing node '{id}')"));
    };
    if ancestors.iter().any(|a| a == id) {
        return Tree::new(format!("{prefix}(cycle back to [{id}])"));
    }

    let mut tree = Tree::new(format!(
        "{prefix}{} [{}] {}",
        node.kind.label(),
        node.id,
        node.text
    ));
    ancestors.push(node.id.clone());
    for answer in [Answer::Yes, Answer::No] {
        if let Some(target) = node.successor(answer) {
            tree.push(graph_subtree(graph, target, Some(answer), ancestors));
        }
    }
    ancestors.pop();
    tree
}

/// Chat-like transcript: appends one entry per new step, never rewrites.
pub struct TranscriptView<W: Write> {
    out: W,
    indent_width: usize,
    written: usize,
    sessions: usize,
}

impl<W: Write> TranscriptView<W> {
    pub fn new(out: W, indent_width: usize) -> Self {
        Self {
            out,
            indent_width,
            written: 0,
            sessions: 0,
        }
    }

    fn write_change(&mut self, change: &SessionChange<'_>) -> std::io::Result<()> {
        if change.kind == ChangeKind::Started {
            if self.sessions > 0 {
                writeln!(self.out, "{}", "── new session ──".dimmed())?;
            }
            self.sessions += 1;
            self.written = 0;
        }
        for step in change.path.get(self.written..).unwrap_or_default() {
            write!(
                self.out,
                "{}",
                render_transcript_entry(step, self.indent_width)
            )?;
        }
        self.written = change.path.len();
        self.out.flush()
    }
}

impl<W: Write> SessionObserver for TranscriptView<W> {
    fn on_change(&mut self, change: &SessionChange<'_>) {
        if let Err(e) = self.write_change(change) {
            warn!("transcript write failed: {}", e);
        }
    }
}

/// Flow diagram: fully re-rendered on every change.
pub struct DiagramView<W: Write> {
    out: W,
    indent_width: usize,
}

impl<W: Write> DiagramView<W> {
    pub fn new(out: W, indent_width: usize) -> Self {
        Self { out, indent_width }
    }

    fn write_change(&mut self, change: &SessionChange<'_>) -> std::io::Result<()> {
        writeln!(self.out, "{}", "── flow ──".cyan().bold())?;
        write!(
            self.out,
            "{}",
            render_diagram(change.path, self.indent_width)
        )?;
        writeln!(self.out, "{}", "──────────".cyan().bold())?;
        self.out.flush()
    }
}

impl<W: Write> SessionObserver for DiagramView<W> {
    fn on_change(&mut self, change: &SessionChange<'_>) {
        if let Err(e) = self.write_change(change) {
            warn!("diagram write failed: {}", e);
        }
    }
}
