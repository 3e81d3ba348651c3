//! Akatsuki - a reusable AI agent team
//!
//! Nine personas that can run alone, as a handoff team under a lead, or as
//! a staged pipeline where reviewers run concurrently and the implementer
//! fixes what they found.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): agent descriptors, pipelines, token usage and the ports
//! - **Adapters** (`adapters`): substrates that run agents and the filesystem tools
//! - **Service Layer** (`services`): personas, teams, roster assembly and the pipeline runner
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use akatsuki::adapters::substrates::MockSubstrate;
//! use akatsuki::services::{dev_pipeline, run_pipeline};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let result = run_pipeline(Arc::new(MockSubstrate::new()), &dev_pipeline(""), "add signup").await?;
//!     println!("{}", result.output);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    create_agent, create_team, AgentDescriptor, AgentRun, Config, Pipeline, PipelineResult,
    Stage, StageKind, SubstrateType, TokenUsage,
};
pub use domain::ports::{RunHooks, Substrate, Tool, ToolError};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{run_agent, run_pipeline, Persona, PipelineRunner};
