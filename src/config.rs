//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/mechtree/mechtree.toml`
//! 3. Local config: `<project_dir>/.mechtree.toml`
//! 4. Environment variables: `MECHTREE_*` prefix (`__` separates sections)
//! 5. Command line flags (`--api-url`), applied by the caller

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

/// Geometry of the canvas display list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
    pub node_width: f64,
    pub node_height: f64,
    pub corner_radius: f64,
    /// Vertical distance between a parent's and a child's anchor.
    pub vertical_gap: f64,
    /// Slot width per child.
    pub horizontal_gap: f64,
    /// y of the root anchor.
    pub top_margin: f64,
    pub arrow_size: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            node_width: 180.0,
            node_height: 80.0,
            corner_radius: 12.0,
            vertical_gap: 140.0,
            horizontal_gap: 200.0,
            top_margin: 70.0,
            arrow_size: 10.0,
        }
    }
}

/// Spacing of the flow graph layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlowConfig {
    pub level_width: f64,
    pub level_height: f64,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            level_width: 250.0,
            level_height: 150.0,
        }
    }
}

/// Legacy graph display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GraphConfig {
    /// Layout algorithm name handed to the graph component.
    pub layout: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            layout: "cose-bilkent".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawCanvasConfig {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub node_width: Option<f64>,
    pub node_height: Option<f64>,
    pub corner_radius: Option<f64>,
    pub vertical_gap: Option<f64>,
    pub horizontal_gap: Option<f64>,
    pub top_margin: Option<f64>,
    pub arrow_size: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawFlowConfig {
    pub level_width: Option<f64>,
    pub level_height: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawGraphConfig {
    pub layout: Option<String>,
}

/// Raw settings for intermediate parsing.
///
/// Every field is optional so a file only overrides what it names.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub session_file: Option<PathBuf>,
    pub canvas: RawCanvasConfig,
    pub flow: RawFlowConfig,
    pub graph: RawGraphConfig,
}

impl CanvasConfig {
    fn merge(&self, o: &RawCanvasConfig) -> Self {
        Self {
            width: o.width.unwrap_or(self.width),
            height: o.height.unwrap_or(self.height),
            node_width: o.node_width.unwrap_or(self.node_width),
            node_height: o.node_height.unwrap_or(self.node_height),
            corner_radius: o.corner_radius.unwrap_or(self.corner_radius),
            vertical_gap: o.vertical_gap.unwrap_or(self.vertical_gap),
            horizontal_gap: o.horizontal_gap.unwrap_or(self.horizontal_gap),
            top_margin: o.top_margin.unwrap_or(self.top_margin),
            arrow_size: o.arrow_size.unwrap_or(self.arrow_size),
        }
    }
}

/// Unified configuration for mechtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the REST backend
    pub api_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Where the login session is kept between runs
    pub session_file: PathBuf,
    pub canvas: CanvasConfig,
    pub flow: FlowConfig,
    pub graph: GraphConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            timeout_secs: 30,
            session_file: default_session_file(),
            canvas: CanvasConfig::default(),
            flow: FlowConfig::default(),
            graph: GraphConfig::default(),
        }
    }
}

/// Default session location (`$XDG_DATA_HOME/mechtree/session.json`).
fn default_session_file() -> PathBuf {
    ProjectDirs::from("", "", "mechtree")
        .map(|dirs| dirs.data_dir().join("session.json"))
        .unwrap_or_else(|| PathBuf::from("~/.mechtree/session.json"))
}

/// Get the XDG config directory for mechtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "mechtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("mechtree.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".mechtree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand `~`, `$VAR` and `${VAR}` in the session path.
    fn expand_paths(&mut self) {
        let raw = self.session_file.to_string_lossy().to_string();
        if let Ok(expanded) = shellexpand::full(&raw) {
            self.session_file = PathBuf::from(expanded.as_ref());
        }
    }

    /// Overlay a config file onto self: fields the file names win.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            api_url: overlay
                .api_url
                .clone()
                .unwrap_or_else(|| self.api_url.clone()),
            timeout_secs: overlay.timeout_secs.unwrap_or(self.timeout_secs),
            session_file: overlay
                .session_file
                .clone()
                .unwrap_or_else(|| self.session_file.clone()),
            canvas: self.canvas.merge(&overlay.canvas),
            flow: FlowConfig {
                level_width: overlay.flow.level_width.unwrap_or(self.flow.level_width),
                level_height: overlay.flow.level_height.unwrap_or(self.flow.level_height),
            },
            graph: GraphConfig {
                layout: overlay
                    .graph
                    .layout
                    .clone()
                    .unwrap_or_else(|| self.graph.layout.clone()),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional directory holding a local `.mechtree.toml`
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("local config: {}", local_path.display());
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        current.validate()?;

        Ok(current)
    }

    /// Apply MECHTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("MECHTREE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("api_url") {
            settings.api_url = val;
        }
        if let Ok(val) = config.get_int("timeout_secs") {
            settings.timeout_secs = u64::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("timeout_secs must not be negative: {val}"),
            })?;
        }
        if let Ok(val) = config.get_string("session_file") {
            settings.session_file = PathBuf::from(val);
        }

        let canvas = &mut settings.canvas;
        for (key, field) in [
            ("canvas.width", &mut canvas.width),
            ("canvas.height", &mut canvas.height),
            ("canvas.node_width", &mut canvas.node_width),
            ("canvas.node_height", &mut canvas.node_height),
            ("canvas.corner_radius", &mut canvas.corner_radius),
            ("canvas.vertical_gap", &mut canvas.vertical_gap),
            ("canvas.horizontal_gap", &mut canvas.horizontal_gap),
            ("canvas.top_margin", &mut canvas.top_margin),
            ("canvas.arrow_size", &mut canvas.arrow_size),
            ("flow.level_width", &mut settings.flow.level_width),
            ("flow.level_height", &mut settings.flow.level_height),
        ] {
            if let Ok(val) = config.get_float(key) {
                *field = val;
            }
        }
        if let Ok(val) = config.get_string("graph.layout") {
            settings.graph.layout = val;
        }

        Ok(settings)
    }

    /// Replace the backend URL (command line override).
    pub fn with_api_url(mut self, api_url: Option<&str>) -> Result<Self, ApplicationError> {
        if let Some(url) = api_url {
            self.api_url = url.to_string();
            self.validate()?;
        }
        Ok(self)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ApplicationError::Config {
                message: format!("api_url must be an http(s) URL: {}", self.api_url),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ApplicationError::Config {
                message: "timeout_secs must be positive".into(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        format!(
            r#"# mechtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/mechtree/mechtree.toml
#   Local:  <project>/.mechtree.toml
#   Env:    MECHTREE_* environment variables (MECHTREE_CANVAS__WIDTH=1024)
#   Flag:   --api-url

# Base URL of the backend API
# api_url = "{DEFAULT_API_URL}"

# Request timeout in seconds
# timeout_secs = 30

# Where the login session is stored
# session_file = "~/.local/share/mechtree/session.json"

[canvas]
# width = 800
# height = 600
# node_width = 180
# node_height = 80
# corner_radius = 12
# vertical_gap = 140
# horizontal_gap = 200
# top_margin = 70
# arrow_size = 10

[flow]
# level_width = 250
# level_height = 150

[graph]
# cose-bilkent | directed | animate
# layout = "cose-bilkent"
"#
        )
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
