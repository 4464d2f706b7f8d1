use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};
use worldlens_core::{ChatMessage, EmbeddingProvider, LLMProvider, LLMResponse, Usage};

use crate::retry::retry_with_backoff;

const CHAT_RETRY_DELAYS: [Duration; 3] = [
    Duration::from_secs(2),
    Duration::from_secs(4),
    Duration::from_secs(8),
];

/// Client for any service exposing the OpenAI `chat/completions` and
/// `embeddings` endpoints.
pub struct OpenAiCompatibleProvider {
    client: Client,
    api_key: String,
    base_url: String,
    chat_model: String,
    embedding_model: String,
}

impl OpenAiCompatibleProvider {
    /// Convert f64 to f32 for embedding values
    #[expect(clippy::cast_possible_truncation, reason = "embeddings are stored as f32")]
    const fn f64_to_f32(x: f64) -> f32 {
        x as f32
    }

    /// Build a provider whose every request gives up after `timeout`.
    pub fn new(api_key: String, base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        info!("Creating OpenAiCompatibleProvider for {base_url}");
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
        })
    }

    #[must_use]
    pub fn with_chat_model(mut self, model: String) -> Self {
        self.chat_model = model;
        self
    }

    #[must_use]
    pub fn with_embedding_model(mut self, model: String) -> Self {
        self.embedding_model = model;
        self
    }

    async fn try_send(&self, request: &serde_json::Value) -> anyhow::Result<LLMResponse> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        parse_chat_response(&response)
    }
}

fn parse_chat_response(response: &serde_json::Value) -> anyhow::Result<LLMResponse> {
    let content = response["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid response format: missing content"))?
        .to_string();

    let token_count = |u: &serde_json::Map<String, serde_json::Value>, key: &str| {
        u.get(key)
            .and_then(serde_json::Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0)
    };
    let usage = response["usage"].as_object().map(|u| Usage {
        prompt_tokens: token_count(u, "prompt_tokens"),
        completion_tokens: token_count(u, "completion_tokens"),
        total_tokens: token_count(u, "total_tokens"),
    });

    Ok(LLMResponse { content, usage })
}

fn parse_embedding_response(response: &serde_json::Value) -> anyhow::Result<Vec<f32>> {
    response["data"][0]["embedding"]
        .as_array()
        .ok_or_else(|| anyhow::anyhow!("Invalid response format: missing embedding"))?
        .iter()
        .map(|v| {
            v.as_f64()
                .map(OpenAiCompatibleProvider::f64_to_f32)
                .ok_or_else(|| anyhow::anyhow!("Invalid embedding value"))
        })
        .collect()
}

#[async_trait]
impl LLMProvider for OpenAiCompatibleProvider {
    async fn chat(&self, messages: &[ChatMessage], model: &str) -> anyhow::Result<LLMResponse> {
        let request = json!({
            "model": model,
            "messages": messages,
        });

        debug!("Sending chat request: model={model}");
        let response = retry_with_backoff(|| self.try_send(&request), &CHAT_RETRY_DELAYS).await?;
        debug!("Received chat response");
        Ok(response)
    }

    fn get_default_model(&self) -> &str {
        &self.chat_model
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiCompatibleProvider {
    async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.embedding_model,
                "input": text,
            }))
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        parse_embedding_response(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_response_reads_content_and_usage() {
        let raw = json!({
            "choices": [{"message": {"role": "assistant", "content": "{\"bad_patterns\": []}"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17}
        });
        let parsed = parse_chat_response(&raw).unwrap();
        assert_eq!(parsed.content, "{\"bad_patterns\": []}");
        let usage = parsed.usage.unwrap();
        assert_eq!(usage.total_tokens, 17);
    }

    #[test]
    fn chat_response_without_content_is_error() {
        assert!(parse_chat_response(&json!({"choices": []})).is_err());
    }

    #[test]
    fn embedding_response_reads_first_vector() {
        let raw = json!({"data": [{"embedding": [0.5, -0.25, 1.0]}]});
        assert_eq!(parse_embedding_response(&raw).unwrap(), vec![0.5, -0.25, 1.0]);
        assert!(parse_embedding_response(&json!({"data": [{"embedding": ["x"]}]})).is_err());
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let provider =
            OpenAiCompatibleProvider::new("k".to_string(), "http://localhost:8080/v1/", Duration::from_secs(5))
                .unwrap()
                .with_chat_model("local-chat".to_string());
        assert_eq!(provider.base_url, "http://localhost:8080/v1");
        assert_eq!(provider.get_default_model(), "local-chat");
    }
}
