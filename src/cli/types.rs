//! CLI type definitions
//!
//! The clap structure that defines the `akatsuki` command line.

use std::path::PathBuf;

use clap::Parser;

use crate::adapters::substrates::SubstrateRegistry;
use crate::domain::models::SubstrateType;
use crate::services::presets::Persona;

#[derive(Parser, Debug)]
#[command(name = "akatsuki")]
#[command(about = "Run the Akatsuki AI agent team from the terminal.", long_about = None)]
#[command(version)]
pub struct Cli {
    /// What you want the agent or team to do
    pub task: Option<String>,

    /// Run a single agent
    #[arg(long, conflicts_with = "agents")]
    pub agent: Option<Persona>,

    /// Which team to use (default: `team` from .akatsuki.yaml, else dev)
    #[arg(long)]
    pub team: Option<String>,

    /// Custom squad of agents led by Pain (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub agents: Vec<String>,

    /// Run as a staged pipeline with parallel review instead of handoffs
    #[arg(long)]
    pub parallel: bool,

    /// Skip the fix stage of a custom --parallel pipeline
    #[arg(long)]
    pub no_fix: bool,

    /// Extra project context appended to every agent's instructions
    #[arg(long, default_value = "")]
    pub context: String,

    /// Model id for every agent, overriding .akatsuki.yaml
    #[arg(long)]
    pub model: Option<String>,

    /// Agent runtime: anthropic_api, claude_code or mock
    #[arg(long, value_parser = parse_substrate)]
    pub substrate: Option<SubstrateType>,

    /// Config file to use instead of searching for .akatsuki.yaml
    #[arg(long, env = "AKATSUKI_CONFIG")]
    pub config: Option<PathBuf>,

    /// List all available agents and teams
    #[arg(long)]
    pub list: bool,

    /// Print the resolved configuration
    #[arg(long)]
    pub show_config: bool,

    /// Output in JSON format
    #[arg(short, long)]
    pub json: bool,

    /// Suppress progress lines and the token usage summary
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// True when the invocation only asks for information.
    pub fn is_informational(&self) -> bool {
        self.list || self.show_config
    }
}

fn parse_substrate(s: &str) -> Result<SubstrateType, String> {
    SubstrateType::from_str(s).ok_or_else(|| {
        format!(
            "unknown substrate '{s}' (expected one of: {})",
            SubstrateRegistry::available_types().join(", ")
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_substrate() {
        assert_eq!(parse_substrate("claude-code"), Ok(SubstrateType::ClaudeCode));
        assert_eq!(
            parse_substrate("openai").unwrap_err(),
            "unknown substrate 'openai' (expected one of: anthropic_api, claude_code, mock)"
        );
    }
}
