//! Language model collaborator
//!
//! One prompt in, free text out. The production implementation talks to the
//! Anthropic Messages API over a long-lived reqwest::Client for connection
//! pooling. Transport, auth, and empty-reply failures all surface as
//! `UnderwritingError::Model` — the one error class that aborts a run.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

use crate::error::UnderwritingError;
use crate::Result;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MODEL: &str = "claude-sonnet-4-5-20250929";
const MAX_TOKENS: u32 = 2000;

/// Trait for the language model call every agent and the synthesis step make.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send one prompt, get the model's free-text reply.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Anthropic Messages API client (connection-pooled).
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AnthropicClient {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            base_url: ANTHROPIC_API_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (local proxies, test servers).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

#[async_trait]
impl LanguageModel for AnthropicClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(UnderwritingError::Model(
                "ANTHROPIC_API_KEY not configured".to_string(),
            ));
        }

        let request = MessagesRequest {
            model: MODEL.to_string(),
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        debug!(prompt_chars = prompt.len(), "Calling Anthropic API");

        let response = self
            .client
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Anthropic API request failed: {}", e);
                UnderwritingError::Model(format!("Anthropic API error: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Anthropic API error response ({}): {}", status, error_text);
            return Err(UnderwritingError::Model(format!(
                "Anthropic API returned {}: {}",
                status, error_text
            )));
        }

        let reply: MessagesResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Anthropic response: {}", e);
            UnderwritingError::Model(format!("Anthropic response parse error: {}", e))
        })?;

        let text = reply
            .content
            .iter()
            .find(|block| block.kind == "text")
            .map(|block| block.text.clone())
            .ok_or_else(|| {
                UnderwritingError::Model("Empty response from Anthropic".to_string())
            })?;

        debug!(reply_chars = text.len(), "Anthropic response received");

        Ok(text)
    }
}

/// Canned-reply model for development & testing.
/// Keeps the pipeline runnable without an API key.
pub struct StaticModel {
    reply: String,
}

impl StaticModel {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl LanguageModel for StaticModel {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Ok(self.reply.clone())
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_messages_shape() {
        let request = MessagesRequest {
            model: MODEL.to_string(),
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user".to_string(),
                content: "Assess this business".to_string(),
            }],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], MODEL);
        assert_eq!(json["max_tokens"], 2000);
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn response_text_block_deserializes() {
        let json = r#"{"content": [{"type": "text", "text": "All clear"}]}"#;
        let response: MessagesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.content[0].text, "All clear");
    }

    #[tokio::test]
    async fn static_model_returns_canned_reply() {
        let model = StaticModel::new("not json at all");
        let reply = model.complete("anything").await.unwrap();
        assert_eq!(reply, "not json at all");
    }

    #[tokio::test]
    async fn missing_api_key_is_a_model_error() {
        let client = AnthropicClient::new(String::new());
        let err = client.complete("prompt").await.unwrap_err();
        assert!(matches!(err, UnderwritingError::Model(_)));
    }
}
