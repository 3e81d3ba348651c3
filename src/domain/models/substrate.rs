//! Substrate domain models.
//!
//! Substrates are the runtimes agents execute on. The default is the
//! Anthropic Messages API; the Claude Code CLI and a mock are also
//! supported.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Type of agent runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubstrateType {
    /// Direct Anthropic API
    #[default]
    AnthropicApi,
    /// Claude Code CLI
    ClaudeCode,
    /// Mock substrate for testing and dry runs
    Mock,
}

impl SubstrateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AnthropicApi => "anthropic_api",
            Self::ClaudeCode => "claude_code",
            Self::Mock => "mock",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "anthropic_api" | "anthropicapi" | "api" => Some(Self::AnthropicApi),
            "claude_code" | "claudecode" => Some(Self::ClaudeCode),
            "mock" | "test" => Some(Self::Mock),
            _ => None,
        }
    }

    pub fn all() -> [Self; 3] {
        [Self::AnthropicApi, Self::ClaudeCode, Self::Mock]
    }
}

impl fmt::Display for SubstrateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
