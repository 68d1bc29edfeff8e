//! OpenAI-compatible chat completion client

use crate::config::ChatConfig;
use crate::error::{Result, TranscriptError};
use crate::metrics::METRICS;
use crate::transcript::{Message, MessageContent, Role};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Token usage reported by the completion endpoint for one call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

/// A callable tool advertised to the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: FunctionSpec,
}

impl ToolDefinition {
    /// Define a function tool with a JSON-schema parameter object
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionSpec {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

/// Function schema within a tool definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// A tool invocation requested by the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub call_type: String,
    pub function: FunctionCall,
}

/// Function name and serialized arguments within a tool call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

/// One model turn: the response message, any tool calls the caller must
/// execute, and the reported usage accounting
#[derive(Debug, Clone)]
pub struct ChatCompletion {
    pub message: Message,
    pub tool_calls: Vec<ToolCall>,
    pub usage: Option<TokenUsage>,
}

/// Seam between the session loop and the model endpoint
///
/// Lets tests drive a session with a scripted backend instead of the
/// network.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Request one completion for the given transcript state
    async fn complete(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<ChatCompletion>;
}

/// HTTP client for an OpenAI-compatible chat completions endpoint
pub struct ChatClient {
    http: Client,
    config: ChatConfig,
}

impl ChatClient {
    /// Create a new chat client
    pub fn new(config: ChatConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| TranscriptError::Configuration(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    async fn call_api(
        &self,
        request: &ChatCompletionRequest<'_>,
    ) -> Result<ChatCompletionResponse> {
        let mut req = self.http.post(&self.config.endpoint).json(request);

        if let Some(api_key) = self.config.api_key() {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req
            .send()
            .await
            .map_err(|e| TranscriptError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TranscriptError::Api(format!("HTTP {}: {}", status, body)));
        }

        response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| TranscriptError::Api(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl CompletionBackend for ChatClient {
    async fn complete(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<ChatCompletion> {
        let start = Instant::now();

        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            tools,
            tool_choice: tools.map(|_| "auto"),
        };

        // Retry with exponential backoff; network and upstream errors
        // are retried, a malformed success body is not
        let mut last_error = None;
        for attempt in 0..self.config.max_retries {
            if attempt > 0 {
                debug!("Retry attempt {} for chat completion", attempt);
                tokio::time::sleep(Duration::from_millis(100 * (1 << attempt))).await;
            }

            match self.call_api(&request).await {
                Ok(response) => {
                    let Some(choice) = response.choices.into_iter().next() else {
                        METRICS.record_chat_request(false);
                        return Err(TranscriptError::Api(
                            "No choices in response".to_string(),
                        ));
                    };

                    METRICS.record_chat_request(true);
                    METRICS
                        .chat_request_duration
                        .with_label_values(&["chat_completions"])
                        .observe(start.elapsed().as_secs_f64());

                    let wire = choice.message;
                    let message = Message {
                        role: wire.role,
                        content: wire
                            .content
                            .unwrap_or_else(|| MessageContent::Text(String::new())),
                        tool_call_id: None,
                    };

                    return Ok(ChatCompletion {
                        message,
                        tool_calls: wire.tool_calls.unwrap_or_default(),
                        usage: response.usage,
                    });
                }
                Err(e @ TranscriptError::Api(_)) | Err(e @ TranscriptError::Network(_)) => {
                    warn!("Chat completion attempt {} failed: {}", attempt + 1, e);
                    last_error = Some(e);
                }
                Err(e) => {
                    METRICS.record_chat_request(false);
                    return Err(e);
                }
            }
        }

        METRICS.record_chat_request(false);
        Err(last_error
            .unwrap_or_else(|| TranscriptError::Api("No attempts were made".to_string())))
    }
}

// Wire types for the completions endpoint

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolDefinition]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: WireMessage,
}

/// Response message as it appears on the wire; content is null when the
/// model only issues tool calls
#[derive(Debug, Deserialize)]
struct WireMessage {
    role: Role,
    #[serde(default)]
    content: Option<MessageContent>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
}
