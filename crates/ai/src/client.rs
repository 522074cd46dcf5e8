//! Chat completion transport.
//!
//! [`ChatTransport`] is the seam between the retry loop and the network.
//! [`OpenAiClient`] speaks the OpenAI-compatible `/chat/completions` API.

use serde::{Deserialize, Serialize};

use crate::error::AiError;

pub const USER_AGENT: &str = concat!("casecheck/", env!("CARGO_PKG_VERSION"));

/// Longest slice of an error body quoted in a message.
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body, serialized as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f64,
}

/// First choice text (trimmed) and the provider's total token count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResponse {
    pub content: String,
    pub total_tokens: u32,
}

/// One chat completion round trip. Implementations do not retry.
pub trait ChatTransport {
    fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AiError>;
}

impl<T: ChatTransport + ?Sized> ChatTransport for &T {
    fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AiError> {
        (**self).complete(request)
    }
}

#[derive(Deserialize)]
struct CompletionBody {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: u32,
}

/// OpenAI-compatible chat completion client (blocking).
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
}

impl OpenAiClient {
    /// `base_url` is the API root, e.g. `https://api.openai.com/v1`.
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self, AiError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AiError::Setup(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ChatTransport for OpenAiClient {
    fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AiError> {
        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .map_err(|e| AiError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp.text().map_err(|e| AiError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(AiError::Http {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        parse_completion(&text)
    }
}

/// Decode a successful completion body.
pub(crate) fn parse_completion(text: &str) -> Result<ChatResponse, AiError> {
    let body: CompletionBody = serde_json::from_str(text.trim_start_matches('\u{feff}'))
        .map_err(|e| AiError::Parse(e.to_string()))?;

    let choice = body.choices.into_iter().next().ok_or(AiError::NoChoices)?;
    Ok(ChatResponse {
        content: choice.message.content.unwrap_or_default().trim().to_string(),
        total_tokens: body.usage.map(|u| u.total_tokens).unwrap_or(0),
    })
}

/// `error.message` from an OpenAI error body, else the start of the body.
fn error_message(text: &str) -> String {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| text.chars().take(MAX_ERROR_BODY).collect())
}
