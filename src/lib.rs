//! triage: linear yes/no decision-tree questionnaire
//!
//! Layers, innermost first:
//! - `domain`: decision graph, steps and the session state machine
//! - `application`: traversal engine, graph loading, observers
//! - `infrastructure`: filesystem, answer prompts, service wiring
//! - `cli`: arguments, commands and terminal rendering

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
