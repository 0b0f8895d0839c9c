//! Viewer configuration loaded from an optional YAML file.
//!
//! Every field has a default, so an empty file (or no file) is valid.
//! Values may reference environment variables with `${VAR}` or
//! `${VAR:-default}`.
//!
//! ```yaml
//! output: snapshot.png
//! figure:
//!   width: 1200
//!   height: 700
//!   levels: 48
//!   colormap: seismic
//!   font_path: ${HOME}/fonts/DejaVuSans.ttf
//! display:
//!   default: viewer
//!   viewer_command: ["feh", "--scale-down"]
//!   hosts:
//!     - pattern: "login*"
//!       backend: file
//!     - pattern: "*-workstation"
//!       backend: viewer
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use field_common::{FieldError, FieldResult};
use renderer::plot::MAX_LEVELS;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::display::DisplayBackend;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// PNG written when `--output` is not given.
    pub output: PathBuf,
    pub figure: FigureConfig,
    pub display: DisplayConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("field.png"),
            figure: FigureConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub width: u32,
    pub height: u32,
    /// Contour bands for filled-contour plots.
    pub levels: usize,
    pub colormap: String,
    pub font_path: Option<PathBuf>,
    pub font_size: f32,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 800,
            levels: renderer::plot::DEFAULT_LEVELS,
            colormap: "viridis".to_string(),
            font_path: None,
            font_size: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Backend used when nothing else decides.
    pub default: DisplayBackend,
    /// Program (and leading arguments) the PNG path is passed to.
    pub viewer_command: Vec<String>,
    /// Host rules, first match wins.
    pub hosts: Vec<HostRule>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default: DisplayBackend::Viewer,
            viewer_command: vec!["xdg-open".to_string()],
            hosts: Vec::new(),
        }
    }
}

/// Glob pattern (`*`, `?`) matched against the host name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRule {
    pub pattern: String,
    pub backend: DisplayBackend,
}

impl ViewerConfig {
    /// Load from `path`, or return defaults when no path is given.
    pub fn load(path: Option<&Path>) -> FieldResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path).map_err(|e| {
            FieldError::Config(format!("cannot read config {}: {}", path.display(), e))
        })?;
        let config = Self::from_yaml(&content)
            .map_err(|e| FieldError::Config(format!("{}: {}", path.display(), e)))?;

        info!(
            path = %path.display(),
            host_rules = config.display.hosts.len(),
            "Loaded viewer config"
        );
        Ok(config)
    }

    /// Parse YAML after expanding environment variables.
    pub fn from_yaml(content: &str) -> FieldResult<Self> {
        let expanded = expand_env_vars(content)?;
        if expanded.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(&expanded)
            .map_err(|e| FieldError::Config(format!("invalid YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> FieldResult<()> {
        if self.figure.width == 0 || self.figure.height == 0 {
            return Err(FieldError::Config(format!(
                "figure size must be non-zero, got {}x{}",
                self.figure.width, self.figure.height
            )));
        }
        if self.figure.levels == 0 || self.figure.levels > MAX_LEVELS {
            return Err(FieldError::Config(format!(
                "figure.levels must be between 1 and {}, got {}",
                MAX_LEVELS, self.figure.levels
            )));
        }
        if !self.figure.font_size.is_finite() || self.figure.font_size <= 0.0 {
            return Err(FieldError::Config("figure.font_size must be positive".to_string()));
        }
        if self.display.hosts.iter().any(|rule| rule.pattern.is_empty()) {
            return Err(FieldError::Config("display.hosts patterns must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Expand `${VAR}` and `${VAR:-default}` references.
fn expand_env_vars(content: &str) -> FieldResult<String> {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' || chars.peek() != Some(&'{') {
            result.push(ch);
            continue;
        }
        chars.next();

        let mut var_expr = String::new();
        loop {
            match chars.next() {
                Some('}') => break,
                Some(c) => var_expr.push(c),
                None => {
                    return Err(FieldError::Config(format!(
                        "unclosed variable substitution: ${{{}",
                        var_expr
                    )))
                }
            }
        }
        result.push_str(&resolve_var_expr(&var_expr)?);
    }

    Ok(result)
}

fn resolve_var_expr(expr: &str) -> FieldResult<String> {
    if let Some((name, default)) = expr.split_once(":-") {
        return Ok(match std::env::var(name.trim()) {
            Ok(value) if !value.is_empty() => value,
            _ => default.to_string(),
        });
    }
    std::env::var(expr.trim())
        .map_err(|_| FieldError::Config(format!("environment variable {} not set", expr.trim())))
}
