//! OpenAI-compatible engine implementation.
//!
//! Works with: OpenAI, OpenRouter, Ollama, vLLM, Together AI, and any
//! OpenAI-compatible `/chat/completions` endpoint.
//!
//! Tool callbacks are bound at construction. When the model requests them,
//! this engine executes the callbacks and feeds their results back into the
//! conversation until a final text answer arrives (or the iteration bound is
//! hit).

use std::sync::Arc;

use async_trait::async_trait;
use charla_config::EngineConfig;
use charla_core::error::EngineError;
use charla_core::message::{Message, MessageToolCall, Prompt, Role};
use charla_core::tool::{ToolCall, ToolRegistry};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// An OpenAI-compatible engine.
pub struct OpenAiCompatEngine {
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    max_tool_iterations: u32,
    tools: Arc<ToolRegistry>,
    client: reqwest::Client,
}

impl OpenAiCompatEngine {
    /// Create a new OpenAI-compatible engine with the given tool bindings.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: 0.7,
            max_tokens: 1024,
            max_tool_iterations: 8,
            tools,
            client,
        }
    }

    /// Build an engine from the configuration section.
    pub fn from_config(config: &EngineConfig, tools: Arc<ToolRegistry>) -> Self {
        Self::new(
            config.api_url.clone(),
            config.api_key.clone().unwrap_or_default(),
            config.model.clone(),
            tools,
        )
        .with_temperature(config.temperature)
        .with_max_tokens(config.max_tokens)
        .with_max_tool_iterations(config.max_tool_iterations)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_max_tool_iterations(mut self, max: u32) -> Self {
        self.max_tool_iterations = max.max(1);
        self
    }

    /// Convert our Message types to the wire format.
    fn to_api_messages(messages: &[Message]) -> Vec<ApiMessage> {
        messages
            .iter()
            .map(|m| ApiMessage {
                role: match m.role {
                    Role::System => "system".into(),
                    Role::User => "user".into(),
                    Role::Assistant => "assistant".into(),
                    Role::Tool => "tool".into(),
                },
                content: Some(m.content.clone()),
                tool_calls: if m.tool_calls.is_empty() {
                    None
                } else {
                    Some(
                        m.tool_calls
                            .iter()
                            .map(|tc| ApiToolCall {
                                id: tc.id.clone(),
                                r#type: "function".into(),
                                function: ApiFunction {
                                    name: tc.name.clone(),
                                    arguments: tc.arguments.clone(),
                                },
                            })
                            .collect(),
                    )
                },
                tool_call_id: m.tool_call_id.clone(),
            })
            .collect()
    }

    /// Convert the bound tools to wire-format definitions.
    fn to_api_tools(tools: &ToolRegistry) -> Vec<ApiToolDefinition> {
        tools
            .iter()
            .map(|t| ApiToolDefinition {
                r#type: "function".into(),
                function: ApiToolFunction {
                    name: t.name().to_string(),
                    description: t.description().to_string(),
                    parameters: t.parameters_schema(),
                },
            })
            .collect()
    }

    /// One round trip to `/chat/completions`.
    async fn complete(&self, messages: &[Message]) -> Result<Message, EngineError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": Self::to_api_messages(messages),
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        if !self.tools.is_empty() {
            body["tools"] = serde_json::json!(Self::to_api_tools(&self.tools));
        }

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EngineError::Timeout(e.to_string())
                } else {
                    EngineError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(EngineError::RateLimited {
                retry_after_secs: 5,
            });
        }

        if status == 401 || status == 403 {
            return Err(EngineError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "backend returned error");
            return Err(EngineError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse =
            response.json().await.map_err(|e| EngineError::ApiError {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| EngineError::ApiError {
                status_code: 200,
                message: "No choices in response".into(),
            })?;

        let tool_calls: Vec<MessageToolCall> = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| MessageToolCall {
                id: tc.id,
                name: tc.function.name,
                arguments: tc.function.arguments,
            })
            .collect();

        let mut message = Message::assistant(choice.message.content.unwrap_or_default());
        message.tool_calls = tool_calls;
        Ok(message)
    }
}

#[async_trait]
impl charla_core::Engine for OpenAiCompatEngine {
    fn name(&self) -> &str {
        "openai-compat"
    }

    async fn invoke(&self, prompt: Prompt) -> Result<String, EngineError> {
        let request_id = uuid::Uuid::new_v4();
        let mut messages = prompt.into_messages();

        debug!(%request_id, model = %self.model, "engine invocation started");

        for iteration in 1..=self.max_tool_iterations {
            let response = self.complete(&messages).await?;

            if response.tool_calls.is_empty() {
                debug!(%request_id, iteration, "engine invocation finished");
                return Ok(response.content);
            }

            debug!(
                %request_id,
                iteration,
                tool_count = response.tool_calls.len(),
                "model requested tool calls"
            );

            let tool_calls = response.tool_calls.clone();
            messages.push(response);

            for tc in &tool_calls {
                let call = ToolCall {
                    id: tc.id.clone(),
                    name: tc.name.clone(),
                    arguments: serde_json::from_str(&tc.arguments).unwrap_or_default(),
                };

                match self.tools.execute(&call).await {
                    Ok(outcome) => {
                        messages.push(Message::tool_result(&tc.id, &outcome.output));
                    }
                    Err(e) => {
                        warn!(%request_id, tool = %tc.name, error = %e, "tool execution failed");
                        // Report the failure to the model so it can recover.
                        messages.push(Message::tool_result(&tc.id, format!("Error: {e}")));
                    }
                }
            }
        }

        Err(EngineError::ToolLoopExceeded {
            iterations: self.max_tool_iterations,
        })
    }

    async fn health_check(&self) -> Result<bool, EngineError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| EngineError::Network(e.to_string()))?;

        Ok(response.status().is_success())
    }
}

// --- Wire types (internal) ---

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ApiToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolCall {
    id: String,
    r#type: String,
    function: ApiFunction,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiFunction {
    name: String,
    arguments: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolDefinition {
    r#type: String,
    function: ApiToolFunction,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}
