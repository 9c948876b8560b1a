//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::application::TraversalEngine;
use crate::cli::args::{Cli, Commands, ConfigCommands, GraphCommands};
use crate::cli::output;
use crate::cli::render::{render_graph_tree, DiagramView, TranscriptView};
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::Answer;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{AnswerPrompt, ScriptedPrompt};
use crate::infrastructure::InfraError;

/// How an interactive run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// A conclusion was reached
    Concluded { conclusion: String },
    /// Input ended while a question was pending
    Paused { at: String },
}

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let project_dir = resolve_project_dir(cli.project_dir.as_deref())?;
    debug!("project_dir: {}", project_dir.display());

    match &cli.command {
        None => cmd_run(&build_container(cli, &project_dir)?, None, false),
        Some(Commands::Run {
            answers,
            no_diagram,
        }) => cmd_run(
            &build_container(cli, &project_dir)?,
            answers.as_deref(),
            *no_diagram,
        ),
        Some(Commands::Graph { command }) => {
            let container = build_container(cli, &project_dir)?;
            match command {
                GraphCommands::Show => cmd_graph_show(&container),
                GraphCommands::Check => cmd_graph_check(&container),
                GraphCommands::Export => cmd_graph_export(&container),
            }
        }
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => cmd_config_show(&build_container(cli, &project_dir)?),
            ConfigCommands::Init { global } => cmd_config_init(*global, &project_dir),
            ConfigCommands::Path => cmd_config_path(&project_dir),
        },
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "triage", &mut io::stdout());
            Ok(())
        }
    }
}

fn resolve_project_dir(dir: Option<&Path>) -> CliResult<PathBuf> {
    match dir {
        Some(d) => Ok(d.to_path_buf()),
        None => std::env::current_dir()
            .map_err(|e| CliError::Infra(InfraError::io("determine current directory", e))),
    }
}

/// Load layered settings and apply command-line overrides.
fn build_container(cli: &Cli, project_dir: &Path) -> CliResult<ServiceContainer> {
    let mut settings = Settings::load(Some(project_dir))?;
    if let Some(graph) = &cli.graph {
        settings.graph_file = Some(graph.clone());
    }
    Ok(ServiceContainer::new(settings))
}

#[instrument(skip(container))]
fn cmd_run(
    container: &ServiceContainer,
    answers: Option<&[Answer]>,
    no_diagram: bool,
) -> CliResult<()> {
    let prompt: Arc<dyn AnswerPrompt> = match answers {
        Some(list) => Arc::new(ScriptedPrompt::new(list.iter().copied())),
        None => container.prompt.clone(),
    };

    let mut engine = container.traversal_engine()?;
    let width = container.settings.indent_width;
    engine.subscribe(Box::new(TranscriptView::new(io::stdout(), width)));
    if container.settings.diagram && !no_diagram {
        engine.subscribe(Box::new(DiagramView::new(io::stdout(), width)));
    }

    engine.start()?;
    match run_session(&mut engine, prompt.as_ref())? {
        SessionOutcome::Concluded { conclusion } => {
            debug!("concluded at {}", conclusion);
        }
        SessionOutcome::Paused { at } => {
            output::warning(&format!("no answer given, session paused at [{at}]"));
        }
    }
    Ok(())
}

/// Ask pending questions until a conclusion is reached or input runs out.
///
/// `NodeNotFound` / `MissingSuccessor` are reported and the same question is
/// asked again. If input ends right after such a failure, that failure is
/// returned.
pub fn run_session(
    engine: &mut TraversalEngine,
    prompt: &dyn AnswerPrompt,
) -> CliResult<SessionOutcome> {
    let mut last_error: Option<ApplicationError> = None;

    while let Some(question) = engine.pending_question().cloned() {
        let answer = prompt.ask(&question).map_err(|e| InfraError::Prompt {
            message: e.to_string(),
        })?;

        let Some(answer) = answer else {
            return match last_error {
                Some(e) => Err(e.into()),
                None => Ok(SessionOutcome::Paused { at: question.id }),
            };
        };

        match engine.answer(answer) {
            Ok(_) => last_error = None,
            Err(e) => {
                output::error(&e);
                last_error = Some(e);
            }
        }
    }

    match engine.path().last() {
        Some(step) if step.is_conclusion() => Ok(SessionOutcome::Concluded {
            conclusion: step.node_id.clone(),
        }),
        _ => Err(CliError::Usage("session was not started".to_string())),
    }
}

fn cmd_graph_show(container: &ServiceContainer) -> CliResult<()> {
    let graph = container.load_graph()?;
    output::info(&render_graph_tree(&graph));
    Ok(())
}

fn cmd_graph_check(container: &ServiceContainer) -> CliResult<()> {
    let graph = container.load_graph()?;
    let issues = graph.validate();
    if issues.is_empty() {
        output::success(&format!(
            "graph ok: {} nodes, root [{}]",
            graph.len(),
            graph.root()
        ));
        return Ok(());
    }
    output::header(&format!("{} issue(s):", issues.len()));
    for issue in &issues {
        output::failure(issue);
    }
    Err(CliError::GraphCheck {
        issues: issues.len(),
    })
}

fn cmd_graph_export(container: &ServiceContainer) -> CliResult<()> {
    let graph = container.load_graph()?;
    output::info(&container.graph_service().export(&graph)?);
    Ok(())
}

fn cmd_config_show(container: &ServiceContainer) -> CliResult<()> {
    output::info(&container.settings.to_toml()?);
    Ok(())
}

fn cmd_config_path(project_dir: &Path) -> CliResult<()> {
    let container = ServiceContainer::new(Settings::default());
    let mark = |p: &Path| {
        if container.fs.exists(p) {
            "(exists)"
        } else {
            "(not found)"
        }
    };
    output::header("Config locations:");
    match global_config_path() {
        Some(p) => output::detail(&format!("global: {} {}", p.display(), mark(p.as_path()))),
        None => output::detail("global: unavailable (no home directory)"),
    }
    let local = local_config_path(project_dir);
    output::detail(&format!("local:  {} {}", local.display(), mark(local.as_path())));
    Ok(())
}

fn cmd_config_init(global: bool, project_dir: &Path) -> CliResult<()> {
    let path = if global {
        global_config_path()
            .ok_or_else(|| CliError::Usage("cannot determine global config directory".into()))?
    } else {
        local_config_path(project_dir)
    };

    let container = ServiceContainer::new(Settings::default());
    if container.fs.exists(&path) {
        return Err(CliError::Usage(format!(
            "config already exists: {}",
            path.display()
        )));
    }

    container
        .fs
        .ensure_parent(&path)
        .map_err(|e| InfraError::io(format!("create directory for {}", path.display()), e))?;
    container
        .fs
        .write(&path, &Settings::template())
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
    output::action("Created", &path.display());
    Ok(())
}
