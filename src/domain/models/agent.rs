//! Agent descriptors - named prompts bundled with tools and handoffs.

use std::fmt;
use std::sync::Arc;

use crate::domain::ports::Tool;

/// Model used when a persona does not ask for a specific one.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";

/// Prefix for the tool names through which an agent hands off to another.
pub const HANDOFF_TOOL_PREFIX: &str = "transfer_to_";

/// An agent definition: who it is, what it may call, and who it may
/// delegate to.
///
/// Descriptors are immutable once built; the `with_*` builders consume
/// `self`. Tools are shared behind `Arc`, so cloning a descriptor is cheap.
#[derive(Clone)]
pub struct AgentDescriptor {
    pub name: String,
    pub instructions: String,
    pub tools: Vec<Arc<dyn Tool>>,
    pub handoffs: Vec<AgentDescriptor>,
    pub model: String,
}

impl AgentDescriptor {
    pub fn new(name: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            tools: vec![],
            handoffs: vec![],
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_tools(mut self, tools: Vec<Arc<dyn Tool>>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn with_handoffs(mut self, handoffs: Vec<AgentDescriptor>) -> Self {
        self.handoffs = handoffs;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Look up one of this agent's tools by name.
    pub fn find_tool(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Resolve a handoff tool name (`transfer_to_<agent>`) to its target.
    pub fn handoff_target(&self, tool_name: &str) -> Option<&AgentDescriptor> {
        self.handoffs
            .iter()
            .find(|h| handoff_tool_name(&h.name) == tool_name)
    }

    /// Whether any of the agent's tools can modify the workspace.
    pub fn can_write(&self) -> bool {
        self.tools.iter().any(|t| t.mutates())
    }
}

impl fmt::Debug for AgentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentDescriptor")
            .field("name", &self.name)
            .field("model", &self.model)
            .field(
                "tools",
                &self.tools.iter().map(|t| t.name().to_string()).collect::<Vec<_>>(),
            )
            .field(
                "handoffs",
                &self.handoffs.iter().map(|h| h.name.as_str()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

/// Name of the tool that hands control to `agent_name`.
///
/// `"Team Lead"` becomes `transfer_to_team_lead`.
pub fn handoff_tool_name(agent_name: &str) -> String {
    let mut slug = String::with_capacity(agent_name.len());
    let mut last_underscore = false;
    for ch in agent_name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_underscore = false;
        } else if !last_underscore && !slug.is_empty() {
            slug.push('_');
            last_underscore = true;
        }
    }
    let slug = slug.trim_end_matches('_');
    format!("{HANDOFF_TOOL_PREFIX}{slug}")
}

/// Create an agent with sensible defaults.
///
/// Passing `None` for `tools`, `handoffs`, or `model` leaves the agent with
/// no tools, no handoffs, and [`DEFAULT_MODEL`].
pub fn create_agent(
    name: impl Into<String>,
    instructions: impl Into<String>,
    tools: Option<Vec<Arc<dyn Tool>>>,
    handoffs: Option<Vec<AgentDescriptor>>,
    model: Option<&str>,
) -> AgentDescriptor {
    AgentDescriptor::new(name, instructions)
        .with_tools(tools.unwrap_or_default())
        .with_handoffs(handoffs.unwrap_or_default())
        .with_model(model.unwrap_or(DEFAULT_MODEL))
}

/// Create a lead agent that orchestrates `members` via handoffs.
pub fn create_team(
    name: impl Into<String>,
    instructions: impl Into<String>,
    members: Vec<AgentDescriptor>,
    model: Option<&str>,
) -> AgentDescriptor {
    AgentDescriptor::new(name, instructions)
        .with_handoffs(members)
        .with_model(model.unwrap_or(DEFAULT_MODEL))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_agent() {
        let agent = create_agent("Test", "You are a test agent.", None, None, None);
        assert_eq!(agent.name, "Test");
        assert_eq!(agent.model, DEFAULT_MODEL);
        assert!(agent.tools.is_empty());
        assert!(agent.handoffs.is_empty());
    }

    #[test]
    fn test_create_team() {
        let member = create_agent("Worker", "You do work.", None, None, None);
        let lead = create_team("Lead", "You lead.", vec![member], None);
        assert_eq!(lead.name, "Lead");
        assert_eq!(lead.handoffs.len(), 1);
        assert!(lead.tools.is_empty());
    }

    #[test]
    fn test_create_agent_with_model() {
        let agent = create_agent("Hidan", "Audit.", None, None, Some("claude-opus-4-6"));
        assert_eq!(agent.model, "claude-opus-4-6");
    }

    #[test]
    fn test_handoff_tool_name() {
        assert_eq!(handoff_tool_name("Kisame"), "transfer_to_kisame");
        assert_eq!(handoff_tool_name("Team Lead"), "transfer_to_team_lead");
        assert_eq!(handoff_tool_name("  Code-Reviewer! "), "transfer_to_code_reviewer");
    }

    #[test]
    fn test_handoff_target_lookup() {
        let lead = create_team(
            "Pain",
            "Lead.",
            vec![
                AgentDescriptor::new("Kisame", "Implement."),
                AgentDescriptor::new("Itachi", "Review."),
            ],
            None,
        );
        assert_eq!(
            lead.handoff_target("transfer_to_itachi").map(|a| a.name.as_str()),
            Some("Itachi")
        );
        assert!(lead.handoff_target("transfer_to_hidan").is_none());
    }

    #[test]
    fn test_debug_lists_names_only() {
        let agent = AgentDescriptor::new("Konan", "Docs.");
        let rendered = format!("{agent:?}");
        assert!(rendered.contains("Konan"));
        assert!(!rendered.contains("Docs."));
    }
}
