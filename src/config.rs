//! Run configuration for the materializer itself.
//!
//! Layered lowest to highest:
//! 1. Built-in defaults
//! 2. `configsmith.yaml` in the working directory, or the file named by
//!    `CONFIGSMITH_CONFIG`
//! 3. Environment variables
//! 4. Command-line flags (applied by the binary)
//!
//! ## Environment Variables
//! - `CONFIGSMITH_CONFIG` - Explicit run-config file (must exist)
//! - `CONFIGSMITH_DEFAULTS_DIR` - Directory holding `default_<name>.json` templates
//! - `CONFIGSMITH_CONFIG_DIR` - Directory holding the live `<name>.json` documents
//! - `CONFIGSMITH_SERVER_CONFIG` - `overwrite` or `preserve`
//! - `CONFIGSMITH_STRICT` - `true` to abort when any override is rejected

use crate::catalog::DocumentKind;
use crate::coerce::{TypeTag, coerce};
use crate::env::EnvSource;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Run configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub paths: PathsConfig,

    /// What to do with an existing serverconfig file.
    #[serde(default)]
    pub server_config: ServerConfigPolicy,

    /// Abort before writing anything if any override is rejected.
    #[serde(default)]
    pub strict: bool,
}

/// Directory layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding the default templates.
    #[serde(default = "default_defaults_dir")]
    pub defaults_dir: PathBuf,

    /// Directory holding the live documents.
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            defaults_dir: default_defaults_dir(),
            config_dir: default_config_dir(),
        }
    }
}

fn default_defaults_dir() -> PathBuf {
    PathBuf::from("Defaults")
}

fn default_config_dir() -> PathBuf {
    PathBuf::from("Configs")
}

impl PathsConfig {
    pub fn new(defaults_dir: impl Into<PathBuf>, config_dir: impl Into<PathBuf>) -> Self {
        Self {
            defaults_dir: defaults_dir.into(),
            config_dir: config_dir.into(),
        }
    }

    /// Path of the live document.
    pub fn live_path(&self, kind: DocumentKind) -> PathBuf {
        self.config_dir.join(kind.file_name())
    }

    /// Path of the document's default template.
    pub fn default_path(&self, kind: DocumentKind) -> PathBuf {
        self.defaults_dir.join(kind.default_file_name())
    }
}

/// Handling of an existing serverconfig file.
///
/// Serverconfig holds operator-assigned server IDs, so some deployments need
/// it left alone once it exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerConfigPolicy {
    /// Rewrite it every run with overrides applied.
    #[default]
    Overwrite,
    /// Write it only when it does not exist yet.
    Preserve,
}

impl FromStr for ServerConfigPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "overwrite" => Ok(ServerConfigPolicy::Overwrite),
            "preserve" => Ok(ServerConfigPolicy::Preserve),
            other => Err(format!(
                "unknown server config policy '{}', expected 'overwrite' or 'preserve'",
                other
            )),
        }
    }
}

impl fmt::Display for ServerConfigPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerConfigPolicy::Overwrite => write!(f, "overwrite"),
            ServerConfigPolicy::Preserve => write!(f, "preserve"),
        }
    }
}

impl RunConfig {
    /// Name of the run-config file looked up in the working directory.
    pub const FILE_NAME: &'static str = "configsmith.yaml";

    /// Load a run-config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        serde_yaml::from_str(&content)
            .map_err(|e| Error::run_config(path.display().to_string(), e.to_string()))
    }

    /// Resolve the run configuration from the working directory and `env`.
    pub fn discover(env: &dyn EnvSource) -> Result<Self> {
        Self::discover_in(Path::new("."), env)
    }

    /// Like [`RunConfig::discover`], looking for the file in `dir`.
    pub fn discover_in(dir: &Path, env: &dyn EnvSource) -> Result<Self> {
        let mut config = if let Some(explicit) = env.var("CONFIGSMITH_CONFIG") {
            Self::load(explicit)?
        } else {
            let candidate = dir.join(Self::FILE_NAME);
            if candidate.is_file() {
                Self::load(&candidate)?
            } else {
                Self::default()
            }
        };

        config.apply_env_overrides(env)?;
        Ok(config)
    }

    /// Apply `CONFIGSMITH_*` variables on top of the loaded configuration.
    pub fn apply_env_overrides(&mut self, env: &dyn EnvSource) -> Result<()> {
        if let Some(dir) = env.var("CONFIGSMITH_DEFAULTS_DIR") {
            self.paths.defaults_dir = PathBuf::from(dir);
        }

        if let Some(dir) = env.var("CONFIGSMITH_CONFIG_DIR") {
            self.paths.config_dir = PathBuf::from(dir);
        }

        if let Some(policy) = env.var("CONFIGSMITH_SERVER_CONFIG") {
            self.server_config = policy
                .parse()
                .map_err(|msg| Error::run_config("CONFIGSMITH_SERVER_CONFIG", msg))?;
        }

        if let Some(strict) = env.var("CONFIGSMITH_STRICT") {
            self.strict = match coerce(TypeTag::Boolean, &strict) {
                Ok(Value::Bool(flag)) => flag,
                _ => {
                    return Err(Error::run_config(
                        "CONFIGSMITH_STRICT",
                        format!("expected {}, got {:?}", TypeTag::Boolean.describe(), strict),
                    ));
                }
            };
        }

        Ok(())
    }
}
