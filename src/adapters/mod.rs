//! Adapters for agent runtimes and the tools agents call.

pub mod substrates;
pub mod tools;
