//! Substrate registry and factory.

use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::models::{RuntimeConfig, SubstrateType};
use crate::domain::ports::{NoopHooks, RunHooks, Substrate};

use super::anthropic_api::AnthropicApiSubstrate;
use super::claude_code::ClaudeCodeSubstrate;
use super::mock::MockSubstrate;

/// Builds substrates from an explicit runtime configuration.
pub struct SubstrateRegistry {
    runtime: RuntimeConfig,
    hooks: Arc<dyn RunHooks>,
}

impl SubstrateRegistry {
    pub fn new(runtime: RuntimeConfig) -> Self {
        Self {
            runtime,
            hooks: Arc::new(NoopHooks),
        }
    }

    /// Hooks handed to every substrate this registry creates.
    pub fn with_hooks(mut self, hooks: Arc<dyn RunHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Create the substrate named by the runtime configuration.
    pub fn create(&self) -> DomainResult<Arc<dyn Substrate>> {
        self.create_by_type(self.runtime.substrate)
    }

    /// Create a substrate by type.
    pub fn create_by_type(&self, substrate_type: SubstrateType) -> DomainResult<Arc<dyn Substrate>> {
        let max_turns = self.runtime.max_turns;
        let substrate: Arc<dyn Substrate> = match substrate_type {
            SubstrateType::AnthropicApi => Arc::new(
                AnthropicApiSubstrate::new(self.runtime.anthropic_api.clone(), max_turns)?
                    .with_hooks(self.hooks.clone()),
            ),
            SubstrateType::ClaudeCode => Arc::new(
                ClaudeCodeSubstrate::new(self.runtime.claude_code.clone(), max_turns)
                    .with_hooks(self.hooks.clone()),
            ),
            SubstrateType::Mock => Arc::new(MockSubstrate::new().with_hooks(self.hooks.clone())),
        };
        Ok(substrate)
    }

    /// Names accepted by `--substrate` and `runtime.substrate`.
    pub fn available_types() -> Vec<&'static str> {
        SubstrateType::all().iter().map(SubstrateType::as_str).collect()
    }
}

impl Default for SubstrateRegistry {
    fn default() -> Self {
        Self::new(RuntimeConfig::default())
    }
}
