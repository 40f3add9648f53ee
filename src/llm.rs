use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Sampling parameters tuned for conversational legal drafting.
const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 800;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

/// Client for an OpenAI-compatible chat completions endpoint.
pub struct CompletionClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl CompletionClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }

    pub fn from_env() -> Result<Self> {
        let base_url =
            dotenv::var("LLM_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = dotenv::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let api_key = dotenv::var("LLM_API_KEY").ok();
        let timeout = dotenv::var("LLM_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self::new(base_url, model, api_key, Duration::from_secs(timeout))
    }

    /// Without an API key the client never dispatches; callers fall back to
    /// the scripted responder.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Resolve the chat completions endpoint from the base URL.
    fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/chat/completions") {
            base.to_string()
        } else if base.ends_with("/v1") {
            format!("{}/chat/completions", base)
        } else {
            format!("{}/v1/chat/completions", base)
        }
    }

    /// Non-streaming chat completion. Returns the assistant text.
    pub async fn chat(&self, messages: &[Message]) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        });

        let mut req = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.api_key {
            req = req.header("Authorization", format!("Bearer {}", key));
        }

        let resp = req.send().await.context("Completion request failed")?;
        let text = resp.text().await.context("Failed to read completion response")?;
        let json: serde_json::Value =
            serde_json::from_str(&text).context("Failed to parse completion JSON")?;

        // Extract content from choices[0].message.content (handle null)
        let content = json["choices"]
            .get(0)
            .and_then(|c| c["message"]["content"].as_str())
            .unwrap_or("")
            .to_string();

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> CompletionClient {
        CompletionClient::new(base_url, "gpt-4", None, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_normalization() {
        assert_eq!(
            client("https://api.openai.com/v1").endpoint(),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            client("https://api.openai.com/v1/").endpoint(),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            client("http://localhost:8080").endpoint(),
            "http://localhost:8080/v1/chat/completions"
        );
        assert_eq!(
            client("http://host/v1/chat/completions").endpoint(),
            "http://host/v1/chat/completions"
        );
    }

    #[test]
    fn test_blank_api_key_means_unconfigured() {
        let c = CompletionClient::new("https://api.openai.com/v1", "gpt-4", Some(String::new()), Duration::from_secs(5))
            .unwrap();
        assert!(!c.is_configured());
        assert!(!client("https://api.openai.com/v1").is_configured());
    }
}
