//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/triage/triage.toml`
//! 3. Local config: `<project_dir>/.triage.toml`
//! 4. Environment variables: `TRIAGE_*` prefix
//!
//! Command-line flags are applied on top by the CLI layer.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{ApplicationError, IoResultExt};
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Largest accepted `indent_width`.
pub const MAX_INDENT_WIDTH: usize = 16;

/// Unified configuration for triage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Decision graph TOML file (default: built-in questionnaire)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph_file: Option<PathBuf>,
    /// Spaces of indentation per depth level
    pub indent_width: usize,
    /// Re-render the flow diagram after every step
    pub diagram: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            graph_file: None,
            indent_width: 2,
            diagram: true,
        }
    }
}

/// Raw settings for intermediate parsing (`None` = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub graph_file: Option<PathBuf>,
    pub indent_width: Option<usize>,
    pub diagram: Option<bool>,
}

/// Get the XDG config directory for triage.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "triage").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("triage.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".triage.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(fs: &dyn FileSystem, path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = fs.read_to_string(path).with_config_context(path)?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Merge overlay config onto self (base). Overlay wins where specified.
    ///
    /// `graph_file` is expanded first; if still relative it is resolved
    /// against `origin`, the directory of the file the overlay came from.
    fn merge_with(&self, overlay: &RawSettings, origin: Option<&Path>) -> Self {
        let graph_file = match &overlay.graph_file {
            Some(file) => {
                let expanded = PathBuf::from(expand_env_vars(file.to_string_lossy().as_ref()));
                match origin {
                    Some(dir) if expanded.is_relative() && !expanded.starts_with("~") => {
                        Some(dir.join(expanded))
                    }
                    _ => Some(expanded),
                }
            }
            None => self.graph_file.clone(),
        };
        Self {
            graph_file,
            indent_width: overlay.indent_width.unwrap_or(self.indent_width),
            diagram: overlay.diagram.unwrap_or(self.diagram),
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(file) = &self.graph_file {
            let expanded = expand_env_vars(file.to_string_lossy().as_ref());
            self.graph_file = Some(PathBuf::from(expanded));
        }
    }

    /// Load settings with layered precedence from the real filesystem.
    ///
    /// # Arguments
    /// * `project_dir` - Optional directory holding a local `.triage.toml`
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_with(&RealFileSystem, project_dir)
    }

    /// Load settings with layered precedence, reading config files through `fs`.
    pub fn load_with(
        fs: &dyn FileSystem,
        project_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        // 1. Defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if fs.exists(&global_path) {
                debug!("global config: {}", global_path.display());
                let raw = load_raw_settings(fs, &global_path)?;
                current = current.merge_with(&raw, global_path.parent());
            }
        }

        // 3. Local config
        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if fs.exists(&local_path) {
                debug!("local config: {}", local_path.display());
                let raw = load_raw_settings(fs, &local_path)?;
                current = current.merge_with(&raw, Some(dir));
            }
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();
        current.check_bounds()?;

        Ok(current)
    }

    fn check_bounds(&self) -> Result<(), ApplicationError> {
        if self.indent_width > MAX_INDENT_WIDTH {
            return Err(ApplicationError::Config {
                message: format!(
                    "indent_width {} exceeds maximum of {}",
                    self.indent_width, MAX_INDENT_WIDTH
                ),
            });
        }
        Ok(())
    }

    /// Apply TRIAGE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TRIAGE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("graph_file") {
            settings.graph_file = Some(PathBuf::from(val));
        }
        match config.get::<usize>("indent_width") {
            Ok(val) => settings.indent_width = val,
            Err(ConfigError::NotFound(_)) => {}
            Err(e) => return Err(config_err(e)),
        }
        match config.get_bool("diagram") {
            Ok(val) => settings.diagram = val,
            Err(ConfigError::NotFound(_)) => {}
            Err(e) => return Err(config_err(e)),
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# triage configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/triage/triage.toml
#   Local:  <project_dir>/.triage.toml
#   Env:    TRIAGE_* environment variables
#   Flags:  --graph, --no-diagram

# Decision graph in TOML (default: built-in cholera screening)
# Relative paths are resolved against the directory of this file.
# graph_file = "~/questionnaires/triage.toml"

# Spaces of indentation per depth level in transcript and diagram (max 16)
# indent_width = 2

# Re-render the flow diagram after every answer
# diagram = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
