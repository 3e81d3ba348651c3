//! Substrate adapter implementations.

pub mod anthropic_api;
pub mod claude_code;
pub mod mock;
pub mod registry;

pub use anthropic_api::AnthropicApiSubstrate;
pub use claude_code::ClaudeCodeSubstrate;
pub use mock::{MockInvocation, MockResponse, MockSubstrate};
pub use registry::SubstrateRegistry;
