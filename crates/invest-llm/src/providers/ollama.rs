//! Ollama chat provider
//!
//! Uses the non-streaming `POST /api/chat` endpoint of a local Ollama server.
//! `initialize` loads the model into memory ahead of the first question and
//! `shutdown` asks the server to unload it again.

use crate::{
    CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message, Result, Role,
    StopReason, TokenUsage,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument};

pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "bllossom-3b-kor";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for the Ollama provider
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Server root, e.g. `http://localhost:11434`
    pub host: String,

    /// Model loaded by `initialize` and unloaded by `shutdown`
    pub model: String,

    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_OLLAMA_HOST.to_string(),
            model: DEFAULT_OLLAMA_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl OllamaConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Read `OLLAMA_HOST` if set
    pub fn with_env(mut self) -> Self {
        if let Ok(host) = std::env::var("OLLAMA_HOST") {
            self.host = host;
        }
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Ollama provider
pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
}

impl OllamaProvider {
    pub fn with_config(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn new(model: impl Into<String>) -> Result<Self> {
        Self::with_config(OllamaConfig::new(model))
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        let host = self.config.host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            format!("{host}/api/chat")
        } else {
            format!("http://{host}/api/chat")
        }
    }

    /// Send an empty chat to load or unload the model
    async fn send_keep_alive(&self, keep_alive: Option<i64>) -> Result<()> {
        let body = OllamaChatRequest {
            model: self.config.model.clone(),
            messages: Vec::new(),
            stream: false,
            options: None,
            keep_alive,
        };

        let response = self.client.post(self.endpoint()).json(&body).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await?;
            return Err(LLMError::from_status(status, error_text, &self.config.model));
        }
        Ok(())
    }
}

#[async_trait]
impl LLMProvider for OllamaProvider {
    #[instrument(skip(self, request), fields(model = %request.model, host = %self.config.host))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let body = OllamaChatRequest::from_request(&request);
        debug!(messages = body.messages.len(), "Sending Ollama chat request");

        let response = self.client.post(self.endpoint()).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await?;
            return Err(LLMError::from_status(status, error_text, &request.model));
        }

        let parsed: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| LLMError::UnexpectedResponse(format!("Failed to parse response: {e}")))?;

        Ok(parsed.into_completion())
    }

    fn name(&self) -> &str {
        "ollama"
    }

    #[instrument(skip(self), fields(model = %self.config.model))]
    async fn initialize(&self) -> Result<()> {
        self.send_keep_alive(None).await?;
        info!("Ollama model loaded");
        Ok(())
    }

    #[instrument(skip(self), fields(model = %self.config.model))]
    async fn shutdown(&self) -> Result<()> {
        self.send_keep_alive(Some(0)).await?;
        info!("Ollama model unloaded");
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    keep_alive: Option<i64>,
}

impl OllamaChatRequest {
    fn from_request(request: &CompletionRequest) -> Self {
        Self {
            model: request.model.clone(),
            messages: request
                .wire_messages()
                .into_iter()
                .map(|m| OllamaMessage {
                    role: m.role.as_str().to_string(),
                    content: m.content,
                })
                .collect(),
            stream: false,
            options: Some(OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            }),
            keep_alive: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    num_predict: usize,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    #[serde(default)]
    message: Option<OllamaMessage>,
    #[serde(default)]
    done_reason: Option<String>,
    #[serde(default)]
    prompt_eval_count: usize,
    #[serde(default)]
    eval_count: usize,
}

impl OllamaChatResponse {
    fn into_completion(self) -> CompletionResponse {
        let content = self.message.map(|m| m.content).unwrap_or_default();
        let done_reason = self.done_reason.unwrap_or_default();
        debug!(
            done_reason = %done_reason,
            prompt_tokens = self.prompt_eval_count,
            eval_tokens = self.eval_count,
            "Received Ollama chat response"
        );

        CompletionResponse {
            message: Message::new(Role::Assistant, content),
            stop_reason: StopReason::from_finish_reason(&done_reason),
            usage: TokenUsage {
                input_tokens: self.prompt_eval_count,
                output_tokens: self.eval_count,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint() {
        let provider = OllamaProvider::new("llama3").unwrap();
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.endpoint(), "http://localhost:11434/api/chat");

        let bare = OllamaProvider::with_config(OllamaConfig::new("m").with_host("10.0.0.2:11434/"))
            .unwrap();
        assert_eq!(bare.endpoint(), "http://10.0.0.2:11434/api/chat");
    }

    #[test]
    fn test_chat_request_serialization() {
        let request = CompletionRequest::builder("bllossom-3b-kor")
            .system("rules")
            .add_message(Message::user("삼성전자 어때?"))
            .temperature(0.3)
            .max_tokens(256)
            .build();

        let value = serde_json::to_value(OllamaChatRequest::from_request(&request)).unwrap();
        assert_eq!(value["stream"], json!(false));
        assert_eq!(value["messages"][0]["role"], json!("system"));
        assert_eq!(value["messages"][1]["content"], json!("삼성전자 어때?"));
        assert_eq!(value["options"]["num_predict"], json!(256));
        assert!(value.get("keep_alive").is_none());
    }

    #[test]
    fn test_response_parsing() {
        let parsed: OllamaChatResponse = serde_json::from_value(json!({
            "model": "bllossom-3b-kor",
            "message": { "role": "assistant", "content": "\n분산 투자를 권합니다.\n" },
            "done": true,
            "done_reason": "stop",
            "prompt_eval_count": 40,
            "eval_count": 12
        }))
        .unwrap();

        let completion = parsed.into_completion();
        assert_eq!(completion.text(), "분산 투자를 권합니다.");
        assert_eq!(completion.stop_reason, StopReason::EndTurn);
        assert_eq!(completion.usage.total(), 52);
    }

    #[test]
    fn test_response_without_message() {
        let parsed: OllamaChatResponse = serde_json::from_value(json!({ "done": true })).unwrap();
        assert_eq!(parsed.into_completion().text(), "");
    }

    #[tokio::test]
    #[ignore] // Requires a running Ollama server
    async fn test_live_lifecycle() {
        let provider = OllamaProvider::with_config(OllamaConfig::default().with_env()).unwrap();
        provider.initialize().await.unwrap();

        let request = CompletionRequest::builder(&provider.config().model)
            .add_message(Message::user("Say hello"))
            .build();
        let response = provider.complete(request).await.unwrap();
        assert!(!response.text().is_empty());

        provider.shutdown().await.unwrap();
    }
}
