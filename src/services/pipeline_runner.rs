//! Pipeline execution.
//!
//! Stages run in order. The members of a stage run concurrently on the
//! same message and every output recorded so far feeds the next stage.
//! The first failure aborts the run; nothing partial is returned.

use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{debug, info, instrument};

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    build_stage_message, combine_outputs, AgentDescriptor, AgentRun, Pipeline, PipelineResult, Stage,
    StageOutput, TokenUsage,
};
use crate::domain::ports::{NoopHooks, RunHooks, Substrate};

/// Runs pipelines and single agents on a substrate.
pub struct PipelineRunner {
    substrate: Arc<dyn Substrate>,
    hooks: Arc<dyn RunHooks>,
}

impl PipelineRunner {
    pub fn new(substrate: Arc<dyn Substrate>) -> Self {
        Self {
            substrate,
            hooks: Arc::new(NoopHooks),
        }
    }

    /// Hooks that receive stage start/end events.
    pub fn with_hooks(mut self, hooks: Arc<dyn RunHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Run `agent` once and account for its usage.
    pub async fn run_agent(
        &self,
        agent: &AgentDescriptor,
        message: &str,
    ) -> DomainResult<(String, TokenUsage)> {
        let run = self.substrate.invoke(agent, message).await?;
        let usage = run.usage();
        Ok((run.output, usage))
    }

    /// Execute every stage of `pipeline` on `task`.
    #[instrument(skip_all, fields(stages = pipeline.stages.len(), substrate = self.substrate.name()))]
    pub async fn run(&self, pipeline: &Pipeline, task: &str) -> DomainResult<PipelineResult> {
        pipeline.validate()?;

        let mut outputs: Vec<StageOutput> = Vec::with_capacity(pipeline.invocation_count());
        let mut usage = TokenUsage::new();

        for (index, stage) in pipeline.stages.iter().enumerate() {
            let message = build_stage_message(&pipeline.context, task, &outputs, stage.kind);
            let label = stage.display_label();

            info!(
                stage = index,
                label = %label,
                agents = stage.agents.len(),
                kind = stage.kind.as_str(),
                "Running pipeline stage"
            );
            self.hooks.on_stage_start(&label, stage.agents.len());

            for run in self.run_stage(stage, &message).await? {
                usage.add_run(&run);
                outputs.push(StageOutput::new(run.agent_name, run.output));
            }

            debug!(stage = index, recorded = outputs.len(), "Stage complete");
            self.hooks.on_stage_end(&label);
        }

        Ok(PipelineResult {
            output: combine_outputs(&outputs),
            usage,
            outputs,
        })
    }

    /// Invoke every member of `stage` on `message`.
    ///
    /// Results come back in member declaration order regardless of which
    /// invocation finishes first.
    async fn run_stage(
        &self,
        stage: &Stage,
        message: &str,
    ) -> DomainResult<Vec<AgentRun>> {
        if let [agent] = stage.agents.as_slice() {
            return Ok(vec![self.substrate.invoke(agent, message).await?]);
        }

        try_join_all(
            stage
                .agents
                .iter()
                .map(|agent| self.substrate.invoke(agent, message)),
        )
        .await
    }
}

/// Run `pipeline` on `substrate` without progress hooks.
pub async fn run_pipeline(
    substrate: Arc<dyn Substrate>,
    pipeline: &Pipeline,
    task: &str,
) -> DomainResult<PipelineResult> {
    PipelineRunner::new(substrate).run(pipeline, task).await
}

/// Run a single agent (or team lead) and return its output and usage.
pub async fn run_agent(
    substrate: Arc<dyn Substrate>,
    agent: &AgentDescriptor,
    message: &str,
) -> DomainResult<(String, TokenUsage)> {
    PipelineRunner::new(substrate).run_agent(agent, message).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::substrates::{MockResponse, MockSubstrate};
    use crate::domain::errors::DomainError;
    use crate::domain::models::FIX_MISSION_MARKER;

    fn agent(name: &str) -> AgentDescriptor {
        AgentDescriptor::new(name, "test")
    }

    #[tokio::test]
    async fn test_single_stage() {
        let substrate = Arc::new(MockSubstrate::new());
        let pipeline = Pipeline::new(vec![Stage::new(vec![agent("Kisame")])]);

        let result = run_pipeline(substrate.clone(), &pipeline, "build").await.unwrap();
        assert_eq!(result.outputs.len(), 1);
        assert_eq!(result.output, "## Kisame\n\nKisame completed the task.");
        assert_eq!(result.usage.requests, 1);
        assert_eq!(substrate.messages_for("Kisame").await, vec!["Task: build".to_string()]);
    }

    #[tokio::test]
    async fn test_fix_stage_gets_marker() {
        let substrate = Arc::new(MockSubstrate::new());
        let pipeline = Pipeline::new(vec![
            Stage::new(vec![agent("Kisame")]),
            Stage::new(vec![agent("Itachi")]),
            Stage::fix(vec![agent("Kisame")]),
        ]);

        run_pipeline(substrate.clone(), &pipeline, "t").await.unwrap();
        let kisame = substrate.messages_for("Kisame").await;
        assert_eq!(kisame.len(), 2);
        assert!(!kisame[0].contains(FIX_MISSION_MARKER));
        assert!(kisame[1].contains(FIX_MISSION_MARKER));
        assert!(kisame[1].contains("### Itachi\nItachi completed the task."));
        assert!(!substrate.messages_for("Itachi").await[0].contains(FIX_MISSION_MARKER));
    }

    #[tokio::test]
    async fn test_invalid_pipeline_invokes_nothing() {
        let substrate = Arc::new(MockSubstrate::new());
        let pipeline = Pipeline::new(vec![Stage::new(vec![agent("K")]), Stage::new(vec![])]);

        let err = run_pipeline(substrate.clone(), &pipeline, "t").await.unwrap_err();
        assert!(matches!(err, DomainError::EmptyStage { index: 1 }));
        assert!(substrate.invocations().await.is_empty());
    }

    #[tokio::test]
    async fn test_run_agent_reports_usage() {
        let substrate = Arc::new(MockSubstrate::with_default_response(
            MockResponse::success("done").with_usage(1000, 500, 2),
        ));
        let (output, usage) = run_agent(substrate, &agent("Pain"), "t").await.unwrap();
        assert_eq!(output, "done");
        assert_eq!(usage.total_tokens(), 1500);
        assert_eq!(usage.agent("Pain").unwrap().requests, 2);
    }
}
