//! Configuration loading.
//!
//! Merges programmatic defaults, the nearest `.akatsuki.yaml` and
//! `AKATSUKI_*` environment variables with figment, then validates the result.

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::models::{AgentOverride, Config};
use crate::services::presets::Persona;
use crate::services::teams::TEAM_NAMES;

/// Project configuration file name.
pub const CONFIG_FILE_NAME: &str = ".akatsuki.yaml";

const ENV_PREFIX: &str = "AKATSUKI_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] Box<figment::Error>),

    #[error("Unknown team: {0}. Must be one of: dev, full")]
    UnknownTeam(String),

    #[error("Invalid max_turns: {0}. Must be at least 1")]
    InvalidMaxTurns(u32),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),
}

/// Look for [`CONFIG_FILE_NAME`] in `start` and then every ancestor.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// Overrides configured for `agent`, or an empty override.
pub fn get_agent_overrides(config: &Config, agent: &str) -> AgentOverride {
    config.agent_overrides(agent)
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for the current directory.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. The nearest `.akatsuki.yaml` at or above the working directory
    /// 3. Environment variables (`AKATSUKI_*`, `__` separates nesting)
    pub fn load() -> Result<Config, ConfigError> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        match find_config(&cwd) {
            Some(path) => Self::load_from_file(path),
            None => {
                debug!(start = %cwd.display(), "No config file found, using defaults");
                Self::extract(Self::base())
            }
        }
    }

    /// Load configuration from a specific file.
    ///
    /// A missing or empty file yields the defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        debug!(path = %path.display(), "Loading config file");
        Self::load_from_str(&contents)
    }

    /// Load configuration from YAML text.
    pub fn load_from_str(yaml: &str) -> Result<Config, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        // an empty or comment-only document has no settings, and figment rejects it
        let is_blank = yaml.trim().is_empty()
            || serde_yaml::from_str::<serde_yaml::Value>(yaml).is_ok_and(|v| v.is_null());
        if !is_blank {
            figment = figment.merge(Yaml::string(yaml));
        }
        Self::extract(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    fn base() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn extract(figment: Figment) -> Result<Config, ConfigError> {
        let config: Config = figment.extract().map_err(Box::new)?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let team = config.team.trim().to_lowercase();
        if !TEAM_NAMES.contains(&team.as_str()) {
            return Err(ConfigError::UnknownTeam(config.team.clone()));
        }

        if config.runtime.max_turns == 0 {
            return Err(ConfigError::InvalidMaxTurns(config.runtime.max_turns));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        for name in config.agents.keys() {
            if name.parse::<Persona>().is_err() {
                warn!(agent = %name, "Ignoring overrides for unknown agent");
            }
        }

        Ok(())
    }
}
