//! Infrastructure layer module
//!
//! - Configuration loading (figment over `.akatsuki.yaml`)
//! - Logging setup and secret scrubbing

pub mod config;
pub mod logging;
