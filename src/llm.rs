//! Language-model client
//!
//! Thin chat-completions client for an OpenAI-compatible endpoint. Two
//! prompt templates drive it: structured extraction (reply must be exactly
//! one JSON object) and response composition (reply is free text).

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::TripTimeError;
use crate::config::LlmConfig;

/// A conversational language model, one system+user round trip at a time
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send one prompt pair and return the model's reply text
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

/// Chat client for an OpenAI-compatible completions endpoint
#[derive(Debug)]
pub struct OpenAiChatClient {
    client: ClientWithMiddleware,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenAiChatClient {
    /// Create a new client from configuration
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| TripTimeError::config("LLM API key is not configured"))?;

        let timeout = Duration::from_secs(config.timeout_seconds.into());
        let base_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("TripTime/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(base_client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl ChatModel for OpenAiChatClient {
    #[instrument(skip(self, system, user))]
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = openai::ChatRequest {
            model: &self.model,
            messages: vec![
                openai::ChatMessage {
                    role: "system",
                    content: system,
                },
                openai::ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        debug!("Sending chat completion request to {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TripTimeError::llm(format!("Chat completion request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TripTimeError::llm(format!(
                "Chat completion failed with status {status}: {error_text}"
            ))
            .into());
        }

        let completion: openai::ChatResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse chat completion response")?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| TripTimeError::llm("Chat completion returned no choices"))?;

        Ok(content.trim().to_string())
    }
}

/// OpenAI-compatible wire format
mod openai {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize)]
    pub struct ChatRequest<'a> {
        pub model: &'a str,
        pub messages: Vec<ChatMessage<'a>>,
    }

    #[derive(Debug, Serialize)]
    pub struct ChatMessage<'a> {
        pub role: &'a str,
        pub content: &'a str,
    }

    #[derive(Debug, Deserialize)]
    pub struct ChatResponse {
        pub choices: Vec<Choice>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Choice {
        pub message: ResponseMessage,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseMessage {
        pub content: String,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_requires_api_key() {
        let config = LlmConfig::default();
        let result = OpenAiChatClient::new(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("API key"));
    }

    #[test]
    fn test_client_builds_with_key() {
        let config = LlmConfig {
            api_key: Some("sk-test_key_12345".to_string()),
            ..LlmConfig::default()
        };
        let client = OpenAiChatClient::new(&config).unwrap();
        assert_eq!(client.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = LlmConfig {
            api_key: Some("sk-test_key_12345".to_string()),
            base_url: "https://llm.example.com/v1/".to_string(),
            ..LlmConfig::default()
        };
        let client = OpenAiChatClient::new(&config).unwrap();
        assert_eq!(client.base_url, "https://llm.example.com/v1");
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":" hello "}}]}"#;
        let parsed: openai::ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content, " hello ");
    }
}
