//! Substrate port - interface for agent runtimes.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{AgentDescriptor, AgentRun};

/// Trait for agent runtime implementations.
///
/// A substrate takes an agent descriptor and a user message, runs the
/// agent to completion (including any tool calls and handoffs it makes),
/// and reports the final text plus token usage. Any failure aborts the
/// invocation; callers get no partial output.
#[async_trait]
pub trait Substrate: Send + Sync {
    /// Get the substrate type name.
    fn name(&self) -> &'static str;

    /// Check if the substrate is available and properly configured.
    async fn is_available(&self) -> DomainResult<bool>;

    /// Run `agent` on `message` to completion.
    async fn invoke(&self, agent: &AgentDescriptor, message: &str) -> DomainResult<AgentRun>;
}
