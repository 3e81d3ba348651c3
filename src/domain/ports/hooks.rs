//! Run hooks port - lifecycle callbacks emitted while agents run.

use crate::domain::models::AgentDescriptor;

/// Observer for agent and pipeline progress.
///
/// Every method has an empty default body so implementations only
/// override what they display.
pub trait RunHooks: Send + Sync {
    fn on_agent_start(&self, _agent: &AgentDescriptor) {}

    fn on_tool_start(&self, _agent: &AgentDescriptor, _tool: &str) {}

    fn on_tool_end(&self, _agent: &AgentDescriptor, _tool: &str, _result: &str) {}

    fn on_handoff(&self, _from: &AgentDescriptor, _to: &AgentDescriptor) {}

    fn on_agent_end(&self, _agent: &AgentDescriptor, _output: &str) {}

    /// A pipeline stage is about to run `agents` members.
    fn on_stage_start(&self, _label: &str, _agents: usize) {}

    fn on_stage_end(&self, _label: &str) {}
}

/// Hooks that ignore every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl RunHooks for NoopHooks {}
