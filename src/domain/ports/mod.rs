//! Domain ports (interfaces) for the hexagonal architecture.
//!
//! Ports define the boundaries between the domain and the agent runtime,
//! the tools agents call, and whoever observes progress.

pub mod hooks;
pub mod substrate;
pub mod tool;

pub use hooks::{NoopHooks, RunHooks};
pub use substrate::Substrate;
pub use tool::{parse_args, Tool, ToolError};
