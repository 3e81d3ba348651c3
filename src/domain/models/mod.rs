pub mod agent;
pub mod config;
pub mod pipeline;
pub mod substrate;
pub mod usage;

pub use agent::{
    create_agent, create_team, handoff_tool_name, AgentDescriptor, DEFAULT_MODEL,
    HANDOFF_TOOL_PREFIX,
};
pub use config::{
    AgentOverride, AnthropicApiConfig, ClaudeCodeConfig, Config, LoggingConfig, RuntimeConfig,
};
pub use pipeline::{
    build_stage_message, combine_outputs, Pipeline, PipelineResult, Stage, StageKind,
    StageOutput, FIX_MISSION_MARKER,
};
pub use substrate::SubstrateType;
pub use usage::{format_thousands, AgentRun, AgentUsage, TokenUsage};
