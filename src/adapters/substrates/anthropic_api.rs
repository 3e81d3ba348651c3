//! Anthropic API substrate implementation.
//!
//! Runs an agent against the Anthropic Messages API. The substrate owns the
//! turn loop: it executes the tools the model asks for, switches agents on
//! handoff tool calls, and stops at the first response without tool calls.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{handoff_tool_name, AgentDescriptor, AgentRun, AnthropicApiConfig};
use crate::domain::ports::{NoopHooks, RunHooks, Substrate, ToolError};

/// Provider prefix accepted on model ids (`anthropic/claude-...`).
const PROVIDER_PREFIX: &str = "anthropic/";

/// Message role in Anthropic API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Cache control marker for Anthropic prompt caching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheControl {
    #[serde(rename = "type")]
    pub control_type: String,
}

impl CacheControl {
    pub fn ephemeral() -> Self {
        Self { control_type: "ephemeral".to_string() }
    }
}

/// System prompt content block with optional cache_control.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_control: Option<CacheControl>,
}

impl SystemContentBlock {
    /// Create a text block with ephemeral cache_control.
    pub fn cached_text(content: impl Into<String>) -> Self {
        Self {
            block_type: "text".to_string(),
            text: content.into(),
            cache_control: Some(CacheControl::ephemeral()),
        }
    }
}

/// Content block in a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "tool_use")]
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    #[serde(rename = "tool_result")]
    ToolResult {
        tool_use_id: String,
        content: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        is_error: Option<bool>,
    },
    /// Block types this client does not act on (`thinking`, `server_tool_use`, ...).
    #[serde(other)]
    Unknown,
}

impl ContentBlock {
    fn tool_result(tool_use_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::ToolResult {
            tool_use_id: tool_use_id.into(),
            content: content.into(),
            is_error: None,
        }
    }

    fn tool_error(tool_use_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::ToolResult {
            tool_use_id: tool_use_id.into(),
            content: content.into(),
            is_error: Some(true),
        }
    }
}

/// A message in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: Vec<ContentBlock>,
}

impl Message {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }
}

/// Tool definition advertised to the model.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Request to the Anthropic Messages API.
#[derive(Debug, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    /// System prompt as content block array (supports cache_control markers).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<Vec<SystemContentBlock>>,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
}

/// Usage information from the API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    #[serde(default)]
    pub cache_read_input_tokens: u64,
    #[serde(default)]
    pub cache_creation_input_tokens: u64,
}

impl Usage {
    /// Input tokens including cached prompt reads and writes.
    pub fn total_input(&self) -> u64 {
        self.input_tokens + self.cache_read_input_tokens + self.cache_creation_input_tokens
    }
}

/// Response from the Anthropic Messages API.
#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    pub id: String,
    pub content: Vec<ContentBlock>,
    pub model: String,
    pub stop_reason: Option<String>,
    pub usage: Usage,
}

impl MessagesResponse {
    fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}

/// Anthropic API substrate.
pub struct AnthropicApiSubstrate {
    config: AnthropicApiConfig,
    max_turns: u32,
    client: Client,
    hooks: Arc<dyn RunHooks>,
}

impl AnthropicApiSubstrate {
    /// Create a new Anthropic API substrate.
    pub fn new(config: AnthropicApiConfig, max_turns: u32) -> DomainResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            max_turns,
            client,
            hooks: Arc::new(NoopHooks),
        })
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn RunHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Get API key from config or environment.
    fn api_key(&self) -> Option<String> {
        self.config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
    }

    /// Tool list for `agent`: its own tools followed by one tool per handoff.
    fn tool_definitions(agent: &AgentDescriptor) -> Vec<ToolDefinition> {
        let tools = agent.tools.iter().map(|tool| ToolDefinition {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            input_schema: tool.parameters(),
        });
        let handoffs = agent.handoffs.iter().map(|target| ToolDefinition {
            name: handoff_tool_name(&target.name),
            description: format!(
                "Handoff to the {} agent to handle the request.",
                target.name
            ),
            input_schema: json!({ "type": "object", "properties": {} }),
        });
        tools.chain(handoffs).collect()
    }

    /// Build the Messages API request for the active agent.
    fn build_request(&self, agent: &AgentDescriptor, messages: &[Message]) -> MessagesRequest {
        let system = if agent.instructions.is_empty() {
            None
        } else {
            Some(vec![SystemContentBlock::cached_text(&agent.instructions)])
        };

        MessagesRequest {
            model: normalize_model(&agent.model).to_string(),
            max_tokens: self.config.max_tokens,
            system,
            messages: messages.to_vec(),
            tools: Self::tool_definitions(agent),
        }
    }

    /// Send one request and decode the response.
    async fn send(
        &self,
        agent: &AgentDescriptor,
        api_key: &str,
        request: &MessagesRequest,
    ) -> DomainResult<MessagesResponse> {
        let response = self
            .client
            .post(format!("{}/v1/messages", self.config.base_url.trim_end_matches('/')))
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-api-key", api_key)
            .header("anthropic-version", &self.config.api_version)
            .json(request)
            .send()
            .await
            .map_err(|e| DomainError::invocation(&agent.name, format!("API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| format!("{}: {}", e.error.error_type, e.error.message))
                .unwrap_or(body);
            return Err(DomainError::invocation(
                &agent.name,
                format!("API error {}: {}", status, detail),
            ));
        }

        response.json().await.map_err(|e| {
            DomainError::invocation(&agent.name, format!("Failed to parse response: {}", e))
        })
    }

    /// Execute one tool call on behalf of `agent`.
    async fn call_tool(&self, agent: &AgentDescriptor, id: &str, name: &str, input: Value) -> ContentBlock {
        self.hooks.on_tool_start(agent, name);

        let outcome = match agent.find_tool(name) {
            Some(tool) => tool.call(input).await,
            None => Err(ToolError::ExecutionFailed {
                tool: name.to_string(),
                message: format!("{} has no tool named {}", agent.name, name),
            }),
        };

        match outcome {
            Ok(output) => {
                self.hooks.on_tool_end(agent, name, &output);
                ContentBlock::tool_result(id, output)
            }
            Err(e) => {
                warn!(agent = %agent.name, tool = %name, error = %e, "Tool call failed");
                let message = e.to_string();
                self.hooks.on_tool_end(agent, name, &message);
                ContentBlock::tool_error(id, message)
            }
        }
    }
}

/// Strip the optional `anthropic/` provider prefix from a model id.
pub fn normalize_model(model: &str) -> &str {
    model.strip_prefix(PROVIDER_PREFIX).unwrap_or(model)
}

#[async_trait]
impl Substrate for AnthropicApiSubstrate {
    fn name(&self) -> &'static str {
        "anthropic_api"
    }

    async fn is_available(&self) -> DomainResult<bool> {
        Ok(self.api_key().is_some())
    }

    async fn invoke(&self, agent: &AgentDescriptor, message: &str) -> DomainResult<AgentRun> {
        let api_key = self
            .api_key()
            .ok_or_else(|| DomainError::Config("ANTHROPIC_API_KEY not set".to_string()))?;

        let mut run = AgentRun::new(&agent.name, "");
        let mut active = agent.clone();
        let mut messages = vec![Message::user_text(message)];
        self.hooks.on_agent_start(&active);

        for turn in 1..=self.max_turns {
            let request = self.build_request(&active, &messages);
            let response = self.send(&active, &api_key, &request).await?;
            run.record_request(response.usage.total_input(), response.usage.output_tokens);

            debug!(
                agent = %active.name,
                turn,
                stop_reason = response.stop_reason.as_deref().unwrap_or("none"),
                input_tokens = response.usage.total_input(),
                output_tokens = response.usage.output_tokens,
                "Received model response"
            );

            let tool_uses: Vec<(String, String, Value)> = response
                .content
                .iter()
                .filter_map(|block| match block {
                    ContentBlock::ToolUse { id, name, input } => {
                        Some((id.clone(), name.clone(), input.clone()))
                    }
                    _ => None,
                })
                .collect();

            if tool_uses.is_empty() {
                if response.stop_reason.as_deref() == Some("max_tokens") {
                    warn!(agent = %active.name, "Response truncated at max_tokens");
                }
                let output = response.text();
                self.hooks.on_agent_end(&active, &output);
                run.output = output;
                return Ok(run);
            }

            messages.push(Message {
                role: MessageRole::Assistant,
                content: response
                    .content
                    .into_iter()
                    .filter(|block| *block != ContentBlock::Unknown)
                    .collect(),
            });

            let mut results = Vec::with_capacity(tool_uses.len());
            let mut next_agent: Option<AgentDescriptor> = None;
            for (id, name, input) in tool_uses {
                if let Some(target) = active.handoff_target(&name) {
                    if next_agent.is_some() {
                        results.push(ContentBlock::tool_error(
                            id,
                            "Multiple handoffs requested; only the first one is followed.",
                        ));
                    } else {
                        results.push(ContentBlock::tool_result(
                            id,
                            json!({ "assistant": target.name }).to_string(),
                        ));
                        next_agent = Some(target.clone());
                    }
                    continue;
                }
                results.push(self.call_tool(&active, &id, &name, input).await);
            }
            messages.push(Message {
                role: MessageRole::User,
                content: results,
            });

            if let Some(target) = next_agent {
                debug!(from = %active.name, to = %target.name, "Handoff");
                self.hooks.on_handoff(&active, &target);
                active = target;
                self.hooks.on_agent_start(&active);
            }
        }

        Err(DomainError::MaxTurnsExceeded {
            agent: agent.name.clone(),
            max_turns: self.max_turns,
        })
    }
}
