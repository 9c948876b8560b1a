//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::{ApplicationResult, GraphService, TraversalEngine};
use crate::config::Settings;
use crate::domain::DecisionGraph;
use crate::infrastructure::traits::{AnswerPrompt, FileSystem, LinePrompt, RealFileSystem};

/// Container holding settings and the I/O boundaries of one run.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Where answers come from
    pub prompt: Arc<dyn AnswerPrompt>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(LinePrompt::stdio()),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        prompt: Arc<dyn AnswerPrompt>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            prompt,
        }
    }

    pub fn graph_service(&self) -> GraphService {
        GraphService::new(self.fs.clone())
    }

    /// The graph named by `settings.graph_file`, or the built-in one.
    pub fn load_graph(&self) -> ApplicationResult<Arc<DecisionGraph>> {
        let graph = self
            .graph_service()
            .load(self.settings.graph_file.as_deref())?;
        Ok(Arc::new(graph))
    }

    /// A fresh, idle engine over the configured graph.
    pub fn traversal_engine(&self) -> ApplicationResult<TraversalEngine> {
        Ok(TraversalEngine::new(self.load_graph()?))
    }
}
