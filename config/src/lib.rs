//! API Governor configuration.
//!
//! Settings come from `~/.api-governor/config.toml` (or an explicit path),
//! then `API_GOVERNOR_*` environment overrides, then `${VAR}` expansion.
//! Every field has a default, so a missing file is a valid configuration.

use std::env;
use std::path::{Path, PathBuf};

use governor_analyzer::AnalyzerCommand;
use serde::Deserialize;

pub const DEFAULT_PYTHON: &str = "python";
pub const DEFAULT_MODULE: &str = "api_governor";
pub const DEFAULT_POLICY: &str = "standard";

pub const ENV_PYTHON: &str = "API_GOVERNOR_PYTHON";
pub const ENV_POLICY: &str = "API_GOVERNOR_POLICY";
pub const ENV_BASELINE: &str = "API_GOVERNOR_BASELINE";
pub const ENV_AUTO_LINT: &str = "API_GOVERNOR_AUTO_LINT";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GovernorConfig {
    /// Lint automatically on save.
    pub auto_lint: bool,
    /// Interpreter (or analyzer executable when `module` is empty).
    pub python_path: String,
    pub module: String,
    pub policy: String,
    /// Default baseline for diff.
    pub baseline_spec: Option<PathBuf>,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            auto_lint: true,
            python_path: DEFAULT_PYTHON.to_string(),
            module: DEFAULT_MODULE.to_string(),
            policy: DEFAULT_POLICY.to_string(),
            baseline_spec: None,
        }
    }
}

impl GovernorConfig {
    /// Load from `explicit` when given, else from the default location.
    ///
    /// Only the default location may be absent; an explicit path that cannot
    /// be read is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match explicit {
            Some(path) => Self::load_from(path)?,
            None => match config_path() {
                Some(path) if path.exists() => Self::load_from(&path)?,
                _ => {
                    tracing::debug!("No config file, using defaults");
                    Self::default()
                }
            },
        };
        Ok(config.resolve(|name| env::var(name).ok()))
    }

    /// Parse one TOML file without applying environment overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Failed to read config");
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "Loaded config");
                Ok(config)
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Failed to parse config");
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    /// Apply environment overrides, expand `${VAR}` references, and restore
    /// defaults for settings left empty.
    #[must_use]
    pub fn resolve(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(python) = lookup(ENV_PYTHON).filter(|v| !v.is_empty()) {
            self.python_path = python;
        }
        if let Some(policy) = lookup(ENV_POLICY).filter(|v| !v.is_empty()) {
            self.policy = policy;
        }
        if let Some(baseline) = lookup(ENV_BASELINE).filter(|v| !v.is_empty()) {
            self.baseline_spec = Some(PathBuf::from(baseline));
        }
        if let Some(raw) = lookup(ENV_AUTO_LINT) {
            match parse_bool(&raw) {
                Some(value) => self.auto_lint = value,
                None => tracing::warn!(
                    variable = ENV_AUTO_LINT,
                    value = %raw,
                    "Ignoring unrecognized boolean"
                ),
            }
        }

        self.python_path = expand_vars_with(&self.python_path, &lookup);
        if self.python_path.trim().is_empty() {
            self.python_path = DEFAULT_PYTHON.to_string();
        }
        if self.policy.trim().is_empty() {
            self.policy = DEFAULT_POLICY.to_string();
        }
        self.baseline_spec = self
            .baseline_spec
            .map(|path| PathBuf::from(expand_vars_with(&path.to_string_lossy(), &lookup)))
            .filter(|path| !path.as_os_str().is_empty());
        self
    }

    /// The analyzer invocation prefix: `<python> -m <module>`, or just the
    /// executable when no module is configured.
    #[must_use]
    pub fn analyzer_command(&self) -> AnalyzerCommand {
        let module = self.module.trim();
        if module.is_empty() {
            AnalyzerCommand::new(self.python_path.clone(), Vec::new())
        } else {
            AnalyzerCommand::python_module(self.python_path.clone(), module)
        }
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".api-governor").join("config.toml"))
}

/// Expand `${VAR}` through `lookup`. Unset variables expand to nothing; an
/// unclosed `${` is kept literally.
#[must_use]
pub fn expand_vars_with(value: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        if !name.is_empty() {
            out.push_str(&lookup(name).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
