//! Domain errors for the Akatsuki agent team.

use thiserror::Error;

use crate::domain::ports::ToolError;

/// Domain-level errors that can occur while assembling or running agents.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Unknown agent(s): {}. Valid agents: {}", .unknown.join(", "), .valid.join(", "))]
    UnknownAgents { unknown: Vec<String>, valid: Vec<String> },

    #[error("Unknown team: {name}. Valid teams: {}", .valid.join(", "))]
    UnknownTeam { name: String, valid: Vec<String> },

    #[error("Pipeline has no stages")]
    EmptyPipeline,

    #[error("Pipeline stage {index} has no agents")]
    EmptyStage { index: usize },

    #[error("Agent invocation failed for {agent}: {message}")]
    Invocation { agent: String, message: String },

    #[error("Agent {agent} exceeded the maximum of {max_turns} turns")]
    MaxTurnsExceeded { agent: String, max_turns: u32 },

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DomainError {
    /// Shorthand for an invocation failure attributed to `agent`.
    pub fn invocation(agent: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invocation {
            agent: agent.into(),
            message: message.into(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
