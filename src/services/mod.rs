//! Services: personas, teams, roster assembly and the pipeline runner.

pub mod pipeline_runner;
pub mod presets;
pub mod roster;
pub mod teams;

pub use pipeline_runner::{run_agent, run_pipeline, PipelineRunner};
pub use presets::{Persona, PersonaOptions, ToolAccess};
pub use roster::{
    build_agent_with_overrides, build_custom_pipeline, build_custom_squad, build_named_pipeline,
    build_named_team, resolve_personas, CliOverrides,
};
pub use teams::{dev_pipeline, dev_team, full_pipeline, full_team, DevTeamOptions, TEAM_NAMES};
