//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::Answer;

/// Yes/no decision-tree questionnaire: chat transcript plus flow diagram
#[derive(Parser, Debug)]
#[command(name = "triage")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d, -dd, -ddd)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory holding .triage.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    /// Decision graph TOML file (overrides config)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub graph: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Walk the questionnaire (default)
    Run {
        /// Answer non-interactively, e.g. --answers yes,no,yes
        #[arg(short, long, value_delimiter = ',', value_parser = parse_answer)]
        answers: Option<Vec<Answer>>,

        /// Do not render the flow diagram
        #[arg(long)]
        no_diagram: bool,
    },

    /// Inspect the decision graph
    Graph {
        #[command(subcommand)]
        command: GraphCommands,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum GraphCommands {
    /// Print the whole graph as a tree
    Show,

    /// Report dangling references, missing successors, unreachable nodes
    Check,

    /// Print the graph as TOML
    Export,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(long)]
        global: bool,
    },

    /// Show config paths
    Path,
}

/// Reject anything but yes/y/no/n before it reaches the engine.
pub fn parse_answer(s: &str) -> Result<Answer, String> {
    s.parse::<Answer>().map_err(|e| e.to_string())
}
