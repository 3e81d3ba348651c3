use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::SubstrateType;

/// Project configuration, read from `.akatsuki.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Team to run when the CLI names none: dev or full
    #[serde(default = "default_team", deserialize_with = "team_or_default")]
    pub team: String,

    /// Free text prefixed to every persona's instructions
    #[serde(default, deserialize_with = "text_or_empty")]
    pub context: String,

    /// Per-persona overrides keyed by persona key (e.g. `hidan`)
    #[serde(default, deserialize_with = "agents_or_empty")]
    pub agents: BTreeMap<String, AgentOverride>,

    /// Agent runtime configuration
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_team() -> String {
    "dev".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            team: default_team(),
            context: String::new(),
            agents: BTreeMap::new(),
            runtime: RuntimeConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Overrides for `agent`, or an empty override when none are configured.
    pub fn agent_overrides(&self, agent: &str) -> AgentOverride {
        self.agents.get(agent).cloned().unwrap_or_default()
    }
}

/// Per-persona overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AgentOverride {
    /// Model id replacing the persona default
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "optional_text"
    )]
    pub model: Option<String>,

    /// Instructions appended to the persona prompt
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "optional_text"
    )]
    pub extra: Option<String>,
}

impl AgentOverride {
    pub fn is_empty(&self) -> bool {
        self.model.is_none() && self.extra.is_none()
    }
}

/// Agent runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RuntimeConfig {
    /// Which substrate runs the agents
    #[serde(default)]
    pub substrate: SubstrateType,

    /// Maximum model turns per invocation
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,

    /// Anthropic API substrate configuration
    #[serde(default)]
    pub anthropic_api: AnthropicApiConfig,

    /// Claude Code substrate configuration
    #[serde(default)]
    pub claude_code: ClaudeCodeConfig,
}

const fn default_max_turns() -> u32 {
    50
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            substrate: SubstrateType::default(),
            max_turns: default_max_turns(),
            anthropic_api: AnthropicApiConfig::default(),
            claude_code: ClaudeCodeConfig::default(),
        }
    }
}

/// Anthropic API substrate configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AnthropicApiConfig {
    /// API key (can also be set via ANTHROPIC_API_KEY env var)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL for API (for testing/proxies)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Value of the `anthropic-version` header
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// `max_tokens` sent with every request
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-request HTTP timeout in seconds
    #[serde(default = "default_api_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

const fn default_max_tokens() -> u32 {
    8192
}

const fn default_api_timeout() -> u64 {
    600
}

impl Default for AnthropicApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            api_version: default_api_version(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_api_timeout(),
        }
    }
}

/// Claude Code substrate configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ClaudeCodeConfig {
    /// Path to claude CLI executable
    #[serde(default = "default_claude_path")]
    pub binary_path: String,

    /// Working directory for claude execution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,

    /// Timeout in seconds per invocation
    #[serde(default = "default_claude_timeout")]
    pub timeout_secs: u64,
}

fn default_claude_path() -> String {
    "claude".to_string()
}

const fn default_claude_timeout() -> u64 {
    1800
}

impl Default for ClaudeCodeConfig {
    fn default() -> Self {
        Self {
            binary_path: default_claude_path(),
            working_dir: None,
            timeout_secs: default_claude_timeout(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stderr only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}

/// A text setting as YAML or the environment may type it.
///
/// `context: 42` and `AKATSUKI_CONTEXT=42` both arrive as numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Bool(b) => b.to_string(),
            Self::Int(n) => n.to_string(),
            Self::Uint(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
        }
    }
}

// A key with no value (`context:`) deserializes as null and means "unset".

fn optional_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_string))
}

fn text_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(optional_text(deserializer)?.unwrap_or_default())
}

fn team_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(optional_text(deserializer)?.unwrap_or_else(default_team))
}

fn agents_or_empty<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, AgentOverride>, D::Error> {
    let agents = Option::<BTreeMap<String, Option<AgentOverride>>>::deserialize(deserializer)?;
    Ok(agents
        .unwrap_or_default()
        .into_iter()
        .map(|(name, overrides)| (name, overrides.unwrap_or_default()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.team, "dev");
        assert_eq!(config.context, "");
        assert!(config.agents.is_empty());
        assert_eq!(config.runtime.max_turns, 50);
        assert_eq!(config.runtime.substrate, SubstrateType::AnthropicApi);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "context: Rust workspace\nagents:\n  hidan:\n    model: claude-opus-4-6\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.team, "dev");
        assert_eq!(config.context, "Rust workspace");
        assert_eq!(
            config.agent_overrides("hidan").model.as_deref(),
            Some("claude-opus-4-6")
        );
        assert_eq!(config.runtime.anthropic_api.base_url, "https://api.anthropic.com");
    }

    #[test]
    fn test_valueless_keys_fall_back_to_defaults() {
        let yaml = "team:\ncontext:\nagents:\n  hidan:\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.team, "dev");
        assert_eq!(config.context, "");
        assert!(config.agent_overrides("hidan").is_empty());
    }

    #[test]
    fn test_scalar_text_is_stringified() {
        let yaml = "context: 42\nagents:\n  kisame:\n    extra: true\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.context, "42");
        assert_eq!(config.agent_overrides("kisame").extra.as_deref(), Some("true"));
    }

    #[test]
    fn test_missing_agent_override_is_empty() {
        let config = Config::default();
        assert!(config.agent_overrides("kisame").is_empty());
    }
}
