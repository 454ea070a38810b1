//! The seam between the gateway and a concrete completion backend.

use async_trait::async_trait;

use crate::api::CompletionError;
use crate::messages::ChatMessage;

/// Model, token ceiling and sampling temperature of one call site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionSettings {
    pub model: &'static str,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// A single completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub settings: CompletionSettings,
    pub messages: Vec<ChatMessage>,
}

/// Anything that can answer a [`CompletionRequest`].
///
/// Returns the text of the first answer, or `None` if the provider answered
/// without content.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<Option<String>, CompletionError>;
}
