//! Pipeline domain model.
//!
//! A pipeline is an ordered list of stages. Each stage runs one or more
//! agents on the same message; the outputs of every stage so far are
//! threaded into the next stage's message.

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AgentDescriptor, TokenUsage};

/// Heading that opens the fix-mission suffix of a fix stage's message.
pub const FIX_MISSION_MARKER: &str = "## Fix mission";

const FIX_MISSION: &str = "## Fix mission
The previous stage output above contains review findings. Address EVERY issue raised in the most recent review output:
- Fix each bug, failing test, and security finding that was reported.
- Apply reviewer suggestions unless they would break existing behavior.
- Skip any review section that reports no findings.
When you are done, summarize what you changed for each finding.";

/// How a stage's message is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// Context, task, and previous outputs.
    #[default]
    Plain,
    /// A plain message followed by the fix-mission instructions.
    Fix,
}

impl StageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Fix => "fix",
        }
    }
}

/// One step of a pipeline.
#[derive(Debug, Clone)]
pub struct Stage {
    pub agents: Vec<AgentDescriptor>,
    pub label: Option<String>,
    pub kind: StageKind,
}

impl Stage {
    pub fn new(agents: Vec<AgentDescriptor>) -> Self {
        Self {
            agents,
            label: None,
            kind: StageKind::Plain,
        }
    }

    /// A stage that receives the fix-mission instructions.
    pub fn fix(agents: Vec<AgentDescriptor>) -> Self {
        Self {
            agents,
            label: None,
            kind: StageKind::Fix,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn is_fix(&self) -> bool {
        self.kind == StageKind::Fix
    }

    pub fn is_parallel(&self) -> bool {
        self.agents.len() > 1
    }

    /// Label used in progress output; falls back to the agent names.
    pub fn display_label(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => self
                .agents
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// An ordered list of stages plus shared project context.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    pub stages: Vec<Stage>,
    pub context: String,
}

impl Pipeline {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self {
            stages,
            context: String::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Reject pipelines the runner cannot execute.
    pub fn validate(&self) -> DomainResult<()> {
        if self.stages.is_empty() {
            return Err(DomainError::EmptyPipeline);
        }
        if let Some(index) = self.stages.iter().position(|s| s.agents.is_empty()) {
            return Err(DomainError::EmptyStage { index });
        }
        Ok(())
    }

    /// Number of agent invocations a full run performs.
    pub fn invocation_count(&self) -> usize {
        self.stages.iter().map(|s| s.agents.len()).sum()
    }
}

/// Output recorded for a single agent invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageOutput {
    pub agent_name: String,
    pub output: String,
}

impl StageOutput {
    pub fn new(agent_name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            output: output.into(),
        }
    }
}

/// Result of a complete pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    /// All outputs combined into one report.
    pub output: String,
    pub usage: TokenUsage,
    /// Every invocation's output, in recording order.
    pub outputs: Vec<StageOutput>,
}

/// Build the message sent to every agent of a stage.
pub fn build_stage_message(
    context: &str,
    task: &str,
    prior: &[StageOutput],
    kind: StageKind,
) -> String {
    let mut message = String::new();
    if !context.is_empty() {
        message.push_str("Project context:\n");
        message.push_str(context);
        message.push_str("\n\n");
    }
    message.push_str("Task: ");
    message.push_str(task);

    if !prior.is_empty() {
        let rendered = prior
            .iter()
            .map(|o| format!("### {}\n{}", o.agent_name, o.output))
            .collect::<Vec<_>>()
            .join("\n\n");
        message.push_str("\n\n## Previous stage output\n");
        message.push_str(&rendered);
    }

    if kind == StageKind::Fix {
        message.push_str("\n\n");
        message.push_str(FIX_MISSION);
    }
    message
}

/// Combine recorded outputs into the final report.
pub fn combine_outputs(outputs: &[StageOutput]) -> String {
    outputs
        .iter()
        .map(|o| format!("## {}\n\n{}", o.agent_name, o.output))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(name: &str) -> AgentDescriptor {
        AgentDescriptor::new(name, "test")
    }

    #[test]
    fn test_message_without_context_or_prior() {
        let msg = build_stage_message("", "Add login", &[], StageKind::Plain);
        assert_eq!(msg, "Task: Add login");
    }

    #[test]
    fn test_message_with_context() {
        let msg = build_stage_message("Rust CLI", "Add login", &[], StageKind::Plain);
        assert_eq!(msg, "Project context:\nRust CLI\n\nTask: Add login");
    }

    #[test]
    fn test_message_with_prior_outputs() {
        let prior = vec![
            StageOutput::new("Kisame", "implemented"),
            StageOutput::new("Itachi", "looks fine"),
        ];
        let msg = build_stage_message("", "T", &prior, StageKind::Plain);
        assert_eq!(
            msg,
            "Task: T\n\n## Previous stage output\n### Kisame\nimplemented\n\n### Itachi\nlooks fine"
        );
    }

    #[test]
    fn test_fix_marker_only_on_fix_stages() {
        let prior = vec![StageOutput::new("Itachi", "bug on line 3")];
        let fix = build_stage_message("", "T", &prior, StageKind::Fix);
        let plain = build_stage_message("", "T", &prior, StageKind::Plain);

        assert!(fix.contains(FIX_MISSION_MARKER));
        assert!(fix.starts_with(&plain));
        assert!(!plain.contains(FIX_MISSION_MARKER));
    }

    #[test]
    fn test_combine_outputs() {
        let outputs = vec![StageOutput::new("A", "one"), StageOutput::new("B", "two")];
        assert_eq!(combine_outputs(&outputs), "## A\n\none\n\n---\n\n## B\n\ntwo");
        assert_eq!(combine_outputs(&[]), "");
    }

    #[test]
    fn test_validate_rejects_empty_pipeline() {
        let err = Pipeline::new(vec![]).validate().unwrap_err();
        assert!(matches!(err, DomainError::EmptyPipeline));
    }

    #[test]
    fn test_validate_rejects_empty_stage() {
        let pipeline = Pipeline::new(vec![Stage::new(vec![agent("K")]), Stage::new(vec![])]);
        let err = pipeline.validate().unwrap_err();
        assert!(matches!(err, DomainError::EmptyStage { index: 1 }));
    }

    #[test]
    fn test_stage_builders() {
        let stage = Stage::fix(vec![agent("Kisame")]).with_label("fix");
        assert!(stage.is_fix());
        assert!(!stage.is_parallel());
        assert_eq!(stage.display_label(), "fix");

        let review = Stage::new(vec![agent("Itachi"), agent("Hidan")]);
        assert!(!review.is_fix());
        assert!(review.is_parallel());
        assert_eq!(review.display_label(), "Itachi, Hidan");
    }

    #[test]
    fn test_invocation_count() {
        let pipeline = Pipeline::new(vec![
            Stage::new(vec![agent("K")]),
            Stage::new(vec![agent("I"), agent("H")]),
            Stage::fix(vec![agent("K")]),
        ]);
        assert_eq!(pipeline.invocation_count(), 4);
        assert!(pipeline.validate().is_ok());
    }
}
