//! Per-session conversation loop

use super::client::{ChatClient, ChatCompletion, CompletionBackend, ToolDefinition};
use crate::budget::{BudgetEnforcer, TiktokenCounter, TrimReport};
use crate::config::Config;
use crate::error::Result;
use crate::transcript::{Message, Transcript};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// One chat session: a transcript, a completion backend, and a budget
/// enforcer
///
/// Each session exclusively owns its transcript. A turn is processed
/// fully (model call, budget enforcement) before the next input is
/// accepted; there is no concurrent mutation.
pub struct ChatSession {
    id: Uuid,
    transcript: Transcript,
    backend: Arc<dyn CompletionBackend>,
    enforcer: BudgetEnforcer,
    tools: Vec<ToolDefinition>,
}

impl ChatSession {
    /// Create a session from configuration, binding the tokenizer to the
    /// configured model
    pub fn from_config(config: &Config, system_prompt: impl Into<String>) -> Result<Self> {
        let counter = TiktokenCounter::for_model(&config.budget.tokenizer_model)?;
        let client = ChatClient::new(config.chat.clone())?;

        Ok(Self::new(
            Transcript::with_system(system_prompt),
            Arc::new(client),
            BudgetEnforcer::new(config.budget.max_tokens, Arc::new(counter)),
        ))
    }

    /// Create a session from explicit parts
    pub fn new(
        transcript: Transcript,
        backend: Arc<dyn CompletionBackend>,
        enforcer: BudgetEnforcer,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            transcript,
            backend,
            enforcer,
            tools: Vec::new(),
        }
    }

    /// Advertise tools to the model on every turn
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    /// Session identifier
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current transcript state
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Process one user turn
    ///
    /// Appends the user message, requests a completion, appends the
    /// assistant response, then enforces the token budget using the
    /// reported usage as the trigger.
    pub async fn send(&mut self, input: impl Into<String>) -> Result<ChatCompletion> {
        self.transcript.push(Message::user(input));
        self.complete_turn().await
    }

    /// Push a tool response and request the model's follow-up turn
    ///
    /// Used after the caller executes a tool call returned by
    /// [`send`](Self::send).
    pub async fn send_tool_result(
        &mut self,
        tool_call_id: impl Into<String>,
        output: impl Into<String>,
    ) -> Result<ChatCompletion> {
        self.transcript.push(Message::tool(tool_call_id, output));
        self.complete_turn().await
    }

    async fn complete_turn(&mut self) -> Result<ChatCompletion> {
        let tools = if self.tools.is_empty() {
            None
        } else {
            Some(self.tools.as_slice())
        };

        let completion = self.backend.complete(self.transcript.messages(), tools).await?;
        self.transcript.push(completion.message.clone());

        let report = self.enforce_budget(&completion);
        debug!(
            session = %self.id,
            evicted = report.evicted,
            tokens = report.tokens,
            "turn processed"
        );

        Ok(completion)
    }

    fn enforce_budget(&mut self, completion: &ChatCompletion) -> TrimReport {
        let reported = completion.usage.as_ref().map(|u| u.total_tokens);
        self.enforcer.enforce(&mut self.transcript, reported)
    }
}
