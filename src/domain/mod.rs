//! Domain layer for the Akatsuki agent team
//!
//! This module contains the agent, pipeline and usage models plus the
//! ports the rest of the crate plugs into.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
