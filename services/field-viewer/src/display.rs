//! Display backend selection and the display step itself.
//!
//! The backend is resolved once at startup. Precedence:
//! 1. `--backend` flag
//! 2. `GLL_PLOT_BACKEND` environment variable
//! 3. first config host rule whose pattern matches the host name
//! 4. the config default

use std::fmt;
use std::path::Path;
use std::process::Command;
use std::str::FromStr;

use field_common::{FieldError, FieldResult};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::DisplayConfig;

pub const BACKEND_ENV: &str = "GLL_PLOT_BACKEND";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayBackend {
    /// Write the PNG only.
    File,
    /// Write the PNG, then open it in the viewer command and wait.
    #[default]
    Viewer,
}

impl fmt::Display for DisplayBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayBackend::File => write!(f, "file"),
            DisplayBackend::Viewer => write!(f, "viewer"),
        }
    }
}

impl FromStr for DisplayBackend {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" | "png" => Ok(DisplayBackend::File),
            "viewer" | "window" => Ok(DisplayBackend::Viewer),
            other => Err(FieldError::invalid(
                "backend",
                format!("expected file or viewer, got '{}'", other),
            )),
        }
    }
}

/// Which rule decided the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendSource {
    Flag,
    Environment,
    HostRule { pattern: String, host: String },
    ConfigDefault,
}

impl fmt::Display for BackendSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendSource::Flag => write!(f, "--backend"),
            BackendSource::Environment => write!(f, "{}", BACKEND_ENV),
            BackendSource::HostRule { pattern, host } => {
                write!(f, "host rule '{}' for {}", pattern, host)
            }
            BackendSource::ConfigDefault => write!(f, "config default"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBackend {
    pub backend: DisplayBackend,
    pub source: BackendSource,
}

/// Pick the display backend. Pure; callers pass in the environment value
/// and host name.
pub fn resolve_backend(
    flag: Option<DisplayBackend>,
    env_value: Option<&str>,
    hostname: Option<&str>,
    config: &DisplayConfig,
) -> FieldResult<ResolvedBackend> {
    if let Some(backend) = flag {
        return Ok(ResolvedBackend {
            backend,
            source: BackendSource::Flag,
        });
    }

    if let Some(value) = env_value.filter(|v| !v.trim().is_empty()) {
        let backend = value.parse().map_err(|_| {
            FieldError::invalid(
                BACKEND_ENV,
                format!("expected file or viewer, got '{}'", value),
            )
        })?;
        return Ok(ResolvedBackend {
            backend,
            source: BackendSource::Environment,
        });
    }

    if let Some(host) = hostname {
        if let Some(rule) = config.hosts.iter().find(|r| glob_match(&r.pattern, host)) {
            return Ok(ResolvedBackend {
                backend: rule.backend,
                source: BackendSource::HostRule {
                    pattern: rule.pattern.clone(),
                    host: host.to_string(),
                },
            });
        }
    }

    Ok(ResolvedBackend {
        backend: config.default,
        source: BackendSource::ConfigDefault,
    })
}

/// Resolve against the real process environment.
pub fn resolve_from_env(flag: Option<DisplayBackend>, config: &DisplayConfig) -> FieldResult<ResolvedBackend> {
    let env_value = std::env::var(BACKEND_ENV).ok();
    let host = hostname();
    resolve_backend(flag, env_value.as_deref(), host.as_deref(), config)
}

/// Host name from `HOSTNAME`, falling back to `/etc/hostname`.
pub fn hostname() -> Option<String> {
    std::env::var("HOSTNAME")
        .ok()
        .or_else(|| std::fs::read_to_string("/etc/hostname").ok())
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
}

/// Case-insensitive glob match supporting `*` and `?`.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.to_lowercase().chars().collect();
    let text: Vec<char> = text.to_lowercase().chars().collect();

    let (mut p, mut t) = (0, 0);
    // Position of the last `*` and the text index it was matched against.
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(&c) if c == '?' || c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((star, matched)) => {
                    p = star + 1;
                    t = matched + 1;
                    backtrack = Some((star, matched + 1));
                }
                None => return false,
            },
        }
    }
    pattern[p..].iter().all(|&c| c == '*')
}

/// Show a written figure. Blocks until the viewer exits.
pub fn show(backend: DisplayBackend, path: &Path, viewer_command: &[String]) -> FieldResult<()> {
    match backend {
        DisplayBackend::File => {
            info!(path = %path.display(), "Figure written");
            Ok(())
        }
        DisplayBackend::Viewer => {
            let (program, args) = viewer_command
                .split_first()
                .ok_or_else(|| FieldError::Config("display.viewer_command is empty".to_string()))?;

            info!(viewer = %program, path = %path.display(), "Opening figure");
            let status = Command::new(program).args(args).arg(path).status().map_err(|e| {
                FieldError::Io(std::io::Error::new(
                    e.kind(),
                    format!("failed to start viewer '{}': {}", program, e),
                ))
            })?;

            if !status.success() {
                warn!(viewer = %program, status = %status, "Viewer exited with an error");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HostRule;

    fn config_with_rules(rules: &[(&str, DisplayBackend)]) -> DisplayConfig {
        DisplayConfig {
            default: DisplayBackend::File,
            hosts: rules
                .iter()
                .map(|(pattern, backend)| HostRule {
                    pattern: pattern.to_string(),
                    backend: *backend,
                })
                .collect(),
            ..DisplayConfig::default()
        }
    }

    #[test]
    fn test_glob_match() {
        assert!(glob_match("login*", "login02"));
        assert!(glob_match("*-ws", "alice-ws"));
        assert!(glob_match("node??", "NODE42"));
        assert!(glob_match("*", ""));
        assert!(glob_match("a*b*c", "axxbyyc"));
        assert!(!glob_match("login*", "compute01"));
        assert!(!glob_match("node??", "node4"));
    }

    #[test]
    fn test_flag_wins() {
        let config = config_with_rules(&[("*", DisplayBackend::Viewer)]);
        let resolved =
            resolve_backend(Some(DisplayBackend::File), Some("viewer"), Some("ws1"), &config).unwrap();
        assert_eq!(resolved.backend, DisplayBackend::File);
        assert_eq!(resolved.source, BackendSource::Flag);
    }

    #[test]
    fn test_env_beats_host_rules() {
        let config = config_with_rules(&[("*", DisplayBackend::File)]);
        let resolved = resolve_backend(None, Some("viewer"), Some("ws1"), &config).unwrap();
        assert_eq!(resolved.backend, DisplayBackend::Viewer);
        assert_eq!(resolved.source, BackendSource::Environment);
    }

    #[test]
    fn test_first_matching_host_rule() {
        let config = config_with_rules(&[
            ("login*", DisplayBackend::File),
            ("*", DisplayBackend::Viewer),
        ]);
        let resolved = resolve_backend(None, None, Some("login3"), &config).unwrap();
        assert_eq!(resolved.backend, DisplayBackend::File);
        let resolved = resolve_backend(None, Some(""), Some("desk"), &config).unwrap();
        assert_eq!(resolved.backend, DisplayBackend::Viewer);
    }

    #[test]
    fn test_falls_back_to_default() {
        let mut config = config_with_rules(&[("login*", DisplayBackend::File)]);
        config.default = DisplayBackend::Viewer;
        let resolved = resolve_backend(None, None, None, &config).unwrap();
        assert_eq!(resolved.backend, DisplayBackend::Viewer);
        assert_eq!(resolved.source, BackendSource::ConfigDefault);
    }

    #[test]
    fn test_viewer_is_the_default_backend() {
        let resolved = resolve_backend(None, None, None, &DisplayConfig::default()).unwrap();
        assert_eq!(resolved.backend, DisplayBackend::Viewer);
        assert_eq!(resolved.source, BackendSource::ConfigDefault);

        let resolved =
            resolve_backend(None, None, Some("ws1"), &DisplayConfig::default()).unwrap();
        assert_eq!(resolved.backend, DisplayBackend::Viewer);
    }

    #[test]
    fn test_bad_env_value() {
        let err = resolve_backend(None, Some("hologram"), None, &DisplayConfig::default()).unwrap_err();
        assert!(err.to_string().contains(BACKEND_ENV));
    }

    #[test]
    fn test_empty_viewer_command() {
        let err = show(DisplayBackend::Viewer, Path::new("x.png"), &[]).unwrap_err();
        assert!(matches!(err, FieldError::Config(_)));
    }
}
