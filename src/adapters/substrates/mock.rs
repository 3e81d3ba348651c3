//! Mock substrate for testing and dry runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AgentDescriptor, AgentRun};
use crate::domain::ports::{NoopHooks, RunHooks, Substrate};

/// Mock response configuration.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// Output text; `None` answers with "<agent> completed the task."
    pub output: Option<String>,
    /// Whether to simulate failure
    pub fail: bool,
    /// Error message if failing
    pub error_message: Option<String>,
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// Requests reported for the run
    pub requests: u64,
    /// Simulated latency
    pub delay_ms: u64,
}

impl Default for MockResponse {
    fn default() -> Self {
        Self {
            output: None,
            fail: false,
            error_message: None,
            input_tokens: 100,
            output_tokens: 50,
            requests: 1,
            delay_ms: 0,
        }
    }
}

impl MockResponse {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: Some(output.into()),
            ..Default::default()
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            fail: true,
            error_message: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn with_usage(mut self, input_tokens: u64, output_tokens: u64, requests: u64) -> Self {
        self.input_tokens = input_tokens;
        self.output_tokens = output_tokens;
        self.requests = requests;
        self
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}

/// A message the mock received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockInvocation {
    pub agent: String,
    pub message: String,
}

/// Mock substrate for testing.
///
/// Responses are scripted per agent name; every invocation is recorded
/// in arrival order.
pub struct MockSubstrate {
    default_response: MockResponse,
    response_overrides: Arc<RwLock<HashMap<String, MockResponse>>>,
    invocations: Arc<RwLock<Vec<MockInvocation>>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    hooks: Arc<dyn RunHooks>,
}

impl MockSubstrate {
    pub fn new() -> Self {
        Self::with_default_response(MockResponse::default())
    }

    pub fn with_default_response(response: MockResponse) -> Self {
        Self {
            default_response: response,
            response_overrides: Arc::new(RwLock::new(HashMap::new())),
            invocations: Arc::new(RwLock::new(Vec::new())),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            hooks: Arc::new(NoopHooks),
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn RunHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Set a specific response for an agent name.
    pub async fn set_response_for_agent(&self, agent: impl Into<String>, response: MockResponse) {
        let mut overrides = self.response_overrides.write().await;
        overrides.insert(agent.into(), response);
    }

    async fn get_response(&self, agent: &str) -> MockResponse {
        let overrides = self.response_overrides.read().await;
        overrides
            .get(agent)
            .cloned()
            .unwrap_or_else(|| self.default_response.clone())
    }

    /// All invocations so far, in arrival order.
    pub async fn invocations(&self) -> Vec<MockInvocation> {
        self.invocations.read().await.clone()
    }

    /// Messages received by `agent`, in arrival order.
    pub async fn messages_for(&self, agent: &str) -> Vec<String> {
        self.invocations
            .read()
            .await
            .iter()
            .filter(|i| i.agent == agent)
            .map(|i| i.message.clone())
            .collect()
    }

    /// Highest number of invocations that were running at once.
    pub fn peak_concurrency(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Clear recorded invocations.
    pub async fn clear(&self) {
        self.invocations.write().await.clear();
    }
}

impl Default for MockSubstrate {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Substrate for MockSubstrate {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn is_available(&self) -> DomainResult<bool> {
        Ok(true)
    }

    async fn invoke(&self, agent: &AgentDescriptor, message: &str) -> DomainResult<AgentRun> {
        self.invocations.write().await.push(MockInvocation {
            agent: agent.name.clone(),
            message: message.to_string(),
        });
        self.hooks.on_agent_start(agent);

        let response = self.get_response(&agent.name).await;

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);
        if response.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(response.delay_ms)).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if response.fail {
            return Err(DomainError::invocation(
                &agent.name,
                response
                    .error_message
                    .unwrap_or_else(|| "Mock failure".to_string()),
            ));
        }

        let output = response
            .output
            .unwrap_or_else(|| format!("{} completed the task.", agent.name));
        self.hooks.on_agent_end(agent, &output);

        Ok(AgentRun::new(&agent.name, output).with_usage(
            response.input_tokens,
            response.output_tokens,
            response.requests,
        ))
    }
}
