//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment:
//! - Programmatic defaults
//! - `.akatsuki.yaml` discovered from the working directory upwards
//! - `AKATSUKI_*` environment overrides
//! - Validation

pub mod loader;

pub use loader::{find_config, get_agent_overrides, ConfigError, ConfigLoader, CONFIG_FILE_NAME};
