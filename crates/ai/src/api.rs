//! REST client for the OpenAI chat-completions endpoint.
//!
//! Wraps `POST {base_url}/chat/completions` using [`reqwest`]. Every call is
//! a single attempt: failures are surfaced to the caller, never retried.

use std::time::Duration;

use async_trait::async_trait;

use crate::messages::{ChatCompletionRequest, ChatCompletionResponse};
use crate::provider::{CompletionProvider, CompletionRequest};

/// Public OpenAI API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Errors from the completion API layer.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Completion API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body, passed through to the caller for diagnosis.
        body: String,
    },
}

impl CompletionError {
    /// Upstream text attached to error responses.
    pub fn details(&self) -> String {
        match self {
            CompletionError::Api { body, .. } => body.clone(),
            CompletionError::Request(err) => err.to_string(),
        }
    }
}

/// HTTP client for the chat-completions API.
#[derive(Debug, Clone)]
pub struct OpenAiApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiApi {
    /// Create a client for `base_url` (e.g. [`DEFAULT_BASE_URL`]).
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Create a client whose requests give up after `timeout`.
    pub fn with_timeout(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CompletionError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Send a chat-completion request and return the first answer's text.
    pub async fn chat_completion(
        &self,
        body: &ChatCompletionRequest,
    ) -> Result<Option<String>, CompletionError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let parsed: ChatCompletionResponse = Self::parse_response(response).await?;
        Ok(parsed.first_content())
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, otherwise capture the
    /// status and body text in a [`CompletionError::Api`].
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, CompletionError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, CompletionError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiApi {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<Option<String>, CompletionError> {
        let body = ChatCompletionRequest {
            model: request.settings.model.to_string(),
            messages: request.messages,
            max_tokens: request.settings.max_tokens,
            temperature: request.settings.temperature,
        };
        tracing::debug!(
            model = %body.model,
            max_tokens = body.max_tokens,
            messages = body.messages.len(),
            "Sending chat completion request",
        );
        self.chat_completion(&body).await
    }
}
