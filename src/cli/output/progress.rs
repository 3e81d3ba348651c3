//! Live progress on stderr while agents run.

use console::{style, Term};

use crate::domain::models::AgentDescriptor;
use crate::domain::ports::RunHooks;

use super::preview;

const PREVIEW_CHARS: usize = 80;

/// Prints agent, tool, handoff and stage events to stderr.
pub struct ConsoleHooks {
    term: Term,
}

impl ConsoleHooks {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    fn log(&self, line: String) {
        // progress is best effort; a closed stderr must not fail the run
        let _ = self.term.write_line(&line);
    }
}

impl Default for ConsoleHooks {
    fn default() -> Self {
        Self::new()
    }
}

fn tag(name: &str) -> String {
    style(format!("[{name}]")).cyan().bold().to_string()
}

impl RunHooks for ConsoleHooks {
    fn on_agent_start(&self, agent: &AgentDescriptor) {
        self.log(format!("{} starting...", tag(&agent.name)));
    }

    fn on_tool_start(&self, agent: &AgentDescriptor, tool: &str) {
        self.log(format!("  {} {}()", tag(&agent.name), style(tool).dim()));
    }

    fn on_tool_end(&self, agent: &AgentDescriptor, tool: &str, result: &str) {
        let preview = preview(result, PREVIEW_CHARS);
        if !preview.is_empty() {
            self.log(format!("  {} {} -> {}", tag(&agent.name), style(tool).dim(), preview));
        }
    }

    fn on_handoff(&self, from: &AgentDescriptor, to: &AgentDescriptor) {
        self.log(format!("{} -> {}", tag(&from.name), tag(&to.name)));
    }

    fn on_agent_end(&self, agent: &AgentDescriptor, _output: &str) {
        self.log(format!("{} {}", tag(&agent.name), style("done").green()));
    }

    fn on_stage_start(&self, label: &str, agents: usize) {
        if agents > 1 {
            self.log(format!(
                "{} running {agents} agents in parallel...",
                style(format!("[{label}]")).magenta().bold()
            ));
        }
    }

    fn on_stage_end(&self, label: &str) {
        self.log(format!(
            "{} {}",
            style(format!("[{label}]")).magenta().bold(),
            style("done").green()
        ));
    }
}
