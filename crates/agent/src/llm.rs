//! OpenAI-compatible chat-completion wire types and client.
//!
//! Non-streaming only: the kiosk prints whole replies, so there is nothing
//! to gain from deltas.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use pattybot_core::config::LlmConfig;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ChatToolCall>>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::plain("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain("assistant", content)
    }

    pub fn assistant_tool_calls(content: Option<String>, tool_calls: Vec<ChatToolCall>) -> Self {
        Self {
            role: "assistant".to_string(),
            content,
            tool_call_id: None,
            tool_calls: Some(tool_calls),
        }
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(content.into()),
            tool_call_id: Some(tool_call_id.into()),
            tool_calls: None,
        }
    }

    fn plain(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content.into()),
            tool_call_id: None,
            tool_calls: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub function: ChatToolCallFunction,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatToolCallFunction {
    pub name: String,
    /// Raw JSON text as produced by the model; decoded (leniently) by the
    /// runtime, not here.
    pub arguments: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ChatToolDefinition {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: ChatToolFunction,
}

#[derive(Clone, Debug, Serialize)]
pub struct ChatToolFunction {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub parameters: Value,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ChatToolDefinition]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'a str>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ChatToolCall>>,
}

/// One assistant turn as seen by the runtime loop.
#[derive(Clone, Debug, Default)]
pub struct AssistantTurn {
    pub content: Option<String>,
    pub tool_calls: Vec<ChatToolCall>,
}

impl AssistantTurn {
    pub fn message(content: impl Into<String>) -> Self {
        Self { content: Some(content.into()), tool_calls: Vec::new() }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request timed out")]
    Timeout,
    #[error("rate limited by upstream")]
    RateLimited,
    #[error("authentication rejected (status {status})")]
    Auth { status: u16 },
    #[error("upstream server error (status {status}): {body}")]
    Server { status: u16, body: String },
    #[error("api rejected the request (status {status}): {body}")]
    Api { status: u16, body: String },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl LlmError {
    /// Timeouts, throttling, 5xx, and transport blips are worth retrying;
    /// auth and request-shape failures are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::RateLimited | Self::Server { .. } | Self::Transport(_)
        )
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[ChatToolDefinition],
    ) -> Result<AssistantTurn, LlmError>;
}

/// Client for any endpoint speaking the OpenAI chat-completion dialect
/// (OpenAI itself, Ollama's `/v1`, vLLM, ...).
pub struct OpenAiCompatClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
    model: String,
}

impl OpenAiCompatClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| LlmError::Transport(error.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    fn classify_failure(status: u16, body: String) -> LlmError {
        match status {
            401 | 403 => LlmError::Auth { status },
            429 => LlmError::RateLimited,
            500..=599 => LlmError::Server { status, body },
            _ => LlmError::Api { status, body },
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatClient {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[ChatToolDefinition],
    ) -> Result<AssistantTurn, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
            tools: (!tools.is_empty()).then_some(tools),
            tool_choice: (!tools.is_empty()).then_some("auto"),
        };

        let url = format!("{}/chat/completions", self.base_url);
        let mut builder = self.http.post(url).header("Content-Type", "application/json");
        if let Some(api_key) = &self.api_key {
            builder = builder
                .header("Authorization", format!("Bearer {}", api_key.expose_secret()));
        }

        let response = builder.json(&request).send().await.map_err(|error| {
            if error.is_timeout() {
                LlmError::Timeout
            } else {
                LlmError::Transport(error.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(Self::classify_failure(status.as_u16(), body));
        }

        let completion = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|error| LlmError::MalformedResponse(error.to_string()))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::MalformedResponse("response carried no choices".to_string()))?;

        Ok(AssistantTurn {
            content: choice.message.content,
            tool_calls: choice.message.tool_calls.unwrap_or_default(),
        })
    }
}
