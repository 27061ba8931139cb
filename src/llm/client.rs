use crate::config;
use crate::error::AdvisorError;

use super::types::{ChatCompletionResponse, ChatRequest};

/// Chat-completion API abstraction (allows mocking).
pub trait ChatClient {
    /// Issue one chat-completion call and return the reply text.
    fn chat(&self, request: &ChatRequest) -> Result<String, AdvisorError>;
}

/// HTTP client for an OpenAI-compatible chat-completions endpoint.
///
/// The timeout set at construction is the advisory upper bound on one
/// model call; exceeding it surfaces as `UpstreamTimeout`.
pub struct FeatherlessClient {
    api_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl FeatherlessClient {
    pub fn new(api_url: &str, api_key: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
            timeout_secs,
        }
    }

    /// Standard endpoint with the default timeout.
    pub fn with_defaults(api_key: &str) -> Self {
        Self::new(config::DEFAULT_API_URL, api_key, config::DEFAULT_TIMEOUT_SECS)
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

impl ChatClient for FeatherlessClient {
    fn chat(&self, request: &ChatRequest) -> Result<String, AdvisorError> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    AdvisorError::UpstreamTimeout(self.timeout_secs)
                } else {
                    AdvisorError::UpstreamConnection(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AdvisorError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .map_err(|e| AdvisorError::MalformedResponse(e.to_string()))?;

        parsed
            .reply_text()
            .ok_or_else(|| AdvisorError::MalformedResponse("no reply content in choices[0]".into()))
    }
}

/// Mock chat client for testing. Returns a configurable reply.
pub struct MockChatClient {
    reply: String,
}

impl MockChatClient {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
        }
    }
}

impl ChatClient for MockChatClient {
    fn chat(&self, _request: &ChatRequest) -> Result<String, AdvisorError> {
        Ok(self.reply.clone())
    }
}
