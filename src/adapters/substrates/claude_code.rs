//! Claude Code CLI substrate implementation.
//!
//! Spawns one `claude --print` process per invocation. Claude Code runs its
//! own tool loop, so the agent's tool list is translated into an
//! `--allowedTools` set and handoff members are rendered into the system
//! prompt.

use async_trait::async_trait;
use serde::Deserialize;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AgentDescriptor, AgentRun, ClaudeCodeConfig};
use crate::domain::ports::{NoopHooks, RunHooks, Substrate};

use super::anthropic_api::normalize_model;

/// Claude Code tools granted to agents that only read.
const READ_ONLY_TOOLS: &str = "Read,Glob,Grep";
/// Claude Code tools granted to agents that may modify the workspace.
const READ_WRITE_TOOLS: &str = "Read,Glob,Grep,Edit,Write,Bash";

/// The `--output-format json` result object.
#[derive(Debug, Deserialize)]
struct CliResult {
    #[serde(default)]
    result: String,
    #[serde(default)]
    is_error: bool,
    #[serde(default)]
    subtype: Option<String>,
    #[serde(default)]
    num_turns: u64,
    #[serde(default)]
    usage: CliUsage,
}

#[derive(Debug, Default, Deserialize)]
struct CliUsage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
    #[serde(default)]
    cache_read_input_tokens: u64,
    #[serde(default)]
    cache_creation_input_tokens: u64,
}

/// Claude Code CLI substrate.
pub struct ClaudeCodeSubstrate {
    config: ClaudeCodeConfig,
    max_turns: u32,
    hooks: Arc<dyn RunHooks>,
}

impl ClaudeCodeSubstrate {
    pub fn new(config: ClaudeCodeConfig, max_turns: u32) -> Self {
        Self {
            config,
            max_turns,
            hooks: Arc::new(NoopHooks),
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn RunHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// `--allowedTools` value for an agent and its handoff members.
    fn allowed_tools(agent: &AgentDescriptor) -> Option<&'static str> {
        let mut any_tools = !agent.tools.is_empty();
        let mut writes = agent.can_write();
        for member in &agent.handoffs {
            any_tools |= !member.tools.is_empty();
            writes |= member.can_write();
        }
        match (any_tools, writes) {
            (_, true) => Some(READ_WRITE_TOOLS),
            (true, false) => Some(READ_ONLY_TOOLS),
            (false, false) => None,
        }
    }

    /// System prompt with the handoff members folded in.
    fn system_prompt(agent: &AgentDescriptor) -> String {
        if agent.handoffs.is_empty() {
            return agent.instructions.clone();
        }

        let mut prompt = agent.instructions.clone();
        prompt.push_str(
            "\n\n# Team members\n\
             You cannot delegate to other processes. When your instructions say to \
             hand off to a member, do that member's job yourself by following their \
             instructions below, then continue with the next step.",
        );
        for member in &agent.handoffs {
            prompt.push_str(&format!("\n\n## {}\n{}", member.name, member.instructions));
        }
        prompt
    }

    /// Build CLI arguments for an invocation.
    fn build_args(&self, agent: &AgentDescriptor, message: &str) -> Vec<String> {
        let mut args = vec![
            "--print".to_string(),
            "--output-format".to_string(),
            "json".to_string(),
            "--max-turns".to_string(),
            self.max_turns.to_string(),
            "--model".to_string(),
            normalize_model(&agent.model).to_string(),
        ];

        let system_prompt = Self::system_prompt(agent);
        if !system_prompt.is_empty() {
            args.push("--system-prompt".to_string());
            args.push(system_prompt);
        }

        if let Some(tools) = Self::allowed_tools(agent) {
            args.push("--allowedTools".to_string());
            args.push(tools.to_string());
        }

        // The task is positional; `--` keeps a leading dash from reading as a flag.
        args.push("--".to_string());
        args.push(message.to_string());
        args
    }

    fn parse_result(agent: &AgentDescriptor, stdout: &str, max_turns: u32) -> DomainResult<AgentRun> {
        let parsed: CliResult = serde_json::from_str(stdout.trim()).map_err(|e| {
            DomainError::invocation(&agent.name, format!("Unreadable claude output: {}", e))
        })?;

        if parsed.is_error {
            let reason = parsed.subtype.unwrap_or_else(|| "error".to_string());
            if reason == "error_max_turns" {
                return Err(DomainError::MaxTurnsExceeded {
                    agent: agent.name.clone(),
                    max_turns,
                });
            }
            return Err(DomainError::invocation(
                &agent.name,
                format!("claude reported {}: {}", reason, parsed.result),
            ));
        }

        let usage = parsed.usage;
        let input = usage.input_tokens
            + usage.cache_read_input_tokens
            + usage.cache_creation_input_tokens;
        Ok(AgentRun::new(&agent.name, parsed.result).with_usage(
            input,
            usage.output_tokens,
            parsed.num_turns.max(1),
        ))
    }
}

#[async_trait]
impl Substrate for ClaudeCodeSubstrate {
    fn name(&self) -> &'static str {
        "claude_code"
    }

    async fn is_available(&self) -> DomainResult<bool> {
        let result = Command::new(&self.config.binary_path)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        Ok(result.map(|s| s.success()).unwrap_or(false))
    }

    async fn invoke(&self, agent: &AgentDescriptor, message: &str) -> DomainResult<AgentRun> {
        let args = self.build_args(agent, message);
        let working_dir = self
            .config
            .working_dir
            .clone()
            .unwrap_or_else(|| ".".to_string());

        debug!(agent = %agent.name, binary = %self.config.binary_path, "Spawning claude");
        self.hooks.on_agent_start(agent);

        let child = Command::new(&self.config.binary_path)
            .args(&args)
            .current_dir(&working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(Duration::from_secs(self.config.timeout_secs), child)
            .await
            .map_err(|_| {
                DomainError::invocation(
                    &agent.name,
                    format!("claude timed out after {}s", self.config.timeout_secs),
                )
            })?
            .map_err(|e| DomainError::invocation(&agent.name, format!("Failed to spawn claude: {}", e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() && stdout.trim().is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(agent = %agent.name, status = ?output.status.code(), "claude exited with failure");
            return Err(DomainError::invocation(
                &agent.name,
                format!("claude exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        let run = Self::parse_result(agent, &stdout, self.max_turns)?;
        self.hooks.on_agent_end(agent, &run.output);
        Ok(run)
    }
}
