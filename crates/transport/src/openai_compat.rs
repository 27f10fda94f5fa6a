//! OpenAI-compatible chat transport.
//!
//! Works with any endpoint exposing an OpenAI-style
//! `/chat/completions` route: Gemini's OpenAI-compatibility surface,
//! OpenAI, OpenRouter, Ollama, vLLM, and friends.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tablemind_config::AppConfig;
use tablemind_core::error::TransportError;
use tablemind_core::now_millis;
use tablemind_core::transport::{ChatReply, ChatTransport, OutboundMessage};
use tracing::{debug, warn};

/// An OpenAI-compatible chat transport.
///
/// The system text travels as a leading `"system"` role message; the
/// remaining thread follows in order. Sampling parameters live here, not
/// in the composed prompt.
pub struct OpenAiCompatTransport {
    name: String,
    base_url: String,
    api_key: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl OpenAiCompatTransport {
    /// Create a new transport against `base_url` with default sampling.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            temperature: 0.7,
            max_tokens: 2000,
            client,
        }
    }

    /// Build a transport from application configuration.
    ///
    /// Fails when no API key is configured anywhere.
    pub fn from_config(config: &AppConfig) -> Result<Self, TransportError> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            TransportError::AuthenticationFailed(
                "No API key configured (set TABLEMIND_API_KEY or config.toml api_key)".into(),
            )
        })?;

        Ok(Self::new("openai_compat", config.base_url.clone(), api_key)
            .with_sampling(config.default_temperature, config.default_max_tokens))
    }

    /// Override the sampling parameters.
    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    /// Convert the outbound thread to OpenAI API format, with the system
    /// text (if any) as the leading message.
    fn to_api_messages(system: Option<&str>, messages: &[OutboundMessage]) -> Vec<ApiMessage> {
        let mut api_messages = Vec::with_capacity(messages.len() + 1);
        if let Some(system) = system {
            api_messages.push(ApiMessage {
                role: "system".into(),
                content: system.to_string(),
            });
        }
        api_messages.extend(messages.iter().map(|m| ApiMessage {
            role: m.role.to_string(),
            content: m.content.clone(),
        }));
        api_messages
    }
}

#[async_trait]
impl ChatTransport for OpenAiCompatTransport {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(
        &self,
        system: Option<&str>,
        messages: &[OutboundMessage],
        model: &str,
    ) -> Result<ChatReply, TransportError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = serde_json::json!({
            "model": model,
            "messages": Self::to_api_messages(system, messages),
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "stream": false,
        });

        debug!(transport = %self.name, model, messages = messages.len(), "Sending chat request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(TransportError::RateLimited {
                retry_after_secs: 5,
            });
        }

        if status == 401 || status == 403 {
            return Err(TransportError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Chat endpoint returned error");
            return Err(TransportError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| TransportError::MalformedResponse(format!("invalid body: {e}")))?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| TransportError::MalformedResponse("no choices in response".into()))?;

        Ok(ChatReply {
            content: choice.message.content.unwrap_or_default(),
            timestamp: now_millis(),
        })
    }
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ApiResponseMessage {
    #[serde(default)]
    content: Option<String>,
}
