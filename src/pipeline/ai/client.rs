use std::sync::Mutex;
use std::time::Duration;

use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, LlmClient,
};
use super::LlmError;
use crate::config::LlmSettings;

/// HTTP client for an OpenAI-compatible chat-completion endpoint.
pub struct ChatCompletionClient {
    settings: LlmSettings,
    client: reqwest::Client,
}

impl ChatCompletionClient {
    /// Build a client; the request timeout comes from `settings.timeout`.
    pub fn new(settings: LlmSettings) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| LlmError::HttpClient(e.to_string()))?;

        Ok(Self { settings, client })
    }

    /// Client configured from `DIAGNOSA_LLM_*` / `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::new(LlmSettings::from_env())
    }

    pub fn settings(&self) -> &LlmSettings {
        &self.settings
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.settings.base_url.trim_end_matches('/'))
    }

    fn map_send_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.settings.timeout)
        } else if e.is_connect() {
            LlmError::Connection(self.settings.base_url.clone())
        } else {
            LlmError::HttpClient(e.to_string())
        }
    }
}

impl LlmClient for ChatCompletionClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let body = ChatCompletionRequest {
            model: &self.settings.model,
            messages: vec![ChatMessage::system(system), ChatMessage::user(prompt)],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
            stream: false,
        };

        let mut request = self.client.post(self.completions_url()).json(&body);
        if let Some(key) = &self.settings.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::ResponseParsing(e.to_string()))?;

        parsed.into_content().ok_or(LlmError::EmptyCompletion)
    }
}

/// Mock LLM client for testing. Returns a configurable response.
pub struct MockLlmClient {
    response: Result<String, LlmError>,
    delay: Option<Duration>,
    prompts: Mutex<Vec<String>>,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
            delay: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A client whose every call fails with `error`.
    pub fn failing(error: LlmError) -> Self {
        Self {
            response: Err(error),
            delay: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Sleep before answering (exercises caller timeouts).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

impl LlmClient for MockLlmClient {
    async fn complete(&self, _system: &str, prompt: &str) -> Result<String, LlmError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.response.clone()
    }
}
