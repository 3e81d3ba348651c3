//! Running a task through an agent, a team or a pipeline.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::info;

use crate::adapters::substrates::SubstrateRegistry;
use crate::cli::output::{output, CommandOutput, ConsoleHooks};
use crate::cli::types::Cli;
use crate::domain::errors::DomainResult;
use crate::domain::models::{AgentDescriptor, Config, Pipeline, TokenUsage};
use crate::domain::ports::{NoopHooks, RunHooks};
use crate::services::pipeline_runner::PipelineRunner;
use crate::services::roster::{
    build_agent_with_overrides, build_custom_pipeline, build_custom_squad, build_named_pipeline,
    build_named_team, CliOverrides,
};

/// What a run invocation will execute.
#[derive(Debug)]
pub enum RunPlan {
    /// One persona on its own.
    Agent(AgentDescriptor),
    /// A lead that delegates through handoffs.
    Team(AgentDescriptor),
    /// Sequential stages with concurrent members.
    Pipeline(Pipeline),
}

impl RunPlan {
    pub fn describe(&self) -> String {
        match self {
            Self::Agent(agent) => format!("agent {}", agent.name),
            Self::Team(lead) => format!("team led by {} ({} members)", lead.name, lead.handoffs.len()),
            Self::Pipeline(pipeline) => format!("pipeline of {} stages", pipeline.stages.len()),
        }
    }
}

/// Resolve the roster for `cli` without invoking anything.
///
/// `--agent` wins, then `--agents`, then the team from the flag or the
/// config. `--parallel` turns a squad or team into its pipeline.
pub fn plan(cli: &Cli, config: &Config) -> DomainResult<RunPlan> {
    let overrides = CliOverrides::new(cli.context.clone(), cli.model.clone());

    if let Some(persona) = cli.agent {
        return Ok(RunPlan::Agent(build_agent_with_overrides(persona, config, &overrides)));
    }

    if !cli.agents.is_empty() {
        return if cli.parallel {
            build_custom_pipeline(&cli.agents, config, &overrides, !cli.no_fix).map(RunPlan::Pipeline)
        } else {
            build_custom_squad(&cli.agents, config, &overrides).map(RunPlan::Team)
        };
    }

    let team = cli.team.as_deref().unwrap_or(&config.team);
    if cli.parallel {
        build_named_pipeline(team, config, &overrides).map(RunPlan::Pipeline)
    } else {
        build_named_team(team, config, &overrides).map(RunPlan::Team)
    }
}

#[derive(Debug, Serialize)]
pub struct RunOutput {
    pub output: String,
    pub usage: TokenUsage,
}

impl CommandOutput for RunOutput {
    fn to_human(&self) -> String {
        self.output.clone()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(cli: &Cli, config: &Config) -> Result<()> {
    let Some(task) = cli.task.as_deref() else {
        bail!("No task given");
    };

    let plan = plan(cli, config)?;

    let hooks: Arc<dyn RunHooks> = if cli.quiet {
        Arc::new(NoopHooks)
    } else {
        Arc::new(ConsoleHooks::new())
    };

    let mut runtime = config.runtime.clone();
    if let Some(substrate) = cli.substrate {
        runtime.substrate = substrate;
    }
    let substrate = SubstrateRegistry::new(runtime)
        .with_hooks(hooks.clone())
        .create()
        .context("Failed to create substrate")?;

    if !substrate.is_available().await? {
        bail!(
            "Substrate '{}' is not available (check ANTHROPIC_API_KEY or the claude binary)",
            substrate.name()
        );
    }

    info!(plan = %plan.describe(), substrate = substrate.name(), "Starting run");
    let runner = PipelineRunner::new(substrate).with_hooks(hooks);

    let (text, usage) = match &plan {
        RunPlan::Agent(agent) | RunPlan::Team(agent) => runner.run_agent(agent, task).await?,
        RunPlan::Pipeline(pipeline) => {
            let result = runner.run(pipeline, task).await?;
            (result.output, result.usage)
        }
    };

    let result = RunOutput { output: text, usage };
    output(&result, cli.json);
    if !cli.json && !cli.quiet {
        eprintln!("{}", result.usage.summary());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("akatsuki").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_plan_single_agent() {
        let plan = plan(&cli(&["--agent", "hidan", "audit"]), &Config::default()).unwrap();
        match plan {
            RunPlan::Agent(agent) => assert_eq!(agent.name, "Hidan"),
            other => panic!("unexpected plan: {other:?}"),
        }
    }

    #[test]
    fn test_plan_team_from_config() {
        let config = Config {
            team: "full".to_string(),
            ..Default::default()
        };
        match plan(&cli(&["ship it"]), &config).unwrap() {
            RunPlan::Team(lead) => assert_eq!(lead.handoffs.len(), 8),
            other => panic!("unexpected plan: {other:?}"),
        }
        // flag wins over config
        match plan(&cli(&["--team", "dev", "ship it"]), &config).unwrap() {
            RunPlan::Team(lead) => assert_eq!(lead.handoffs.len(), 4),
            other => panic!("unexpected plan: {other:?}"),
        }
    }

    #[test]
    fn test_plan_custom_parallel_without_fix() {
        let plan = plan(
            &cli(&["--agents", "kisame,itachi,hidan", "--parallel", "--no-fix", "t"]),
            &Config::default(),
        )
        .unwrap();
        match plan {
            RunPlan::Pipeline(p) => assert_eq!(p.stages.len(), 2),
            other => panic!("unexpected plan: {other:?}"),
        }
    }

    #[test]
    fn test_run_output_json() {
        let mut usage = TokenUsage::new();
        usage.add("Kisame", 10, 5, 1);
        let json = RunOutput {
            output: "done".to_string(),
            usage,
        }
        .to_json();
        assert_eq!(json["output"], "done");
        assert_eq!(json["usage"]["requests"], 1);
    }
}
