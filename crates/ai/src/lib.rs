//! Completion gateway for the Fixio assistant.
//!
//! - [`api`] -- HTTP client for the OpenAI chat-completions endpoint.
//! - [`messages`] -- request/response wire types.
//! - [`provider`] -- the [`CompletionProvider`] seam the gateway talks to.
//! - [`gateway`] -- the three fixed call sites (general chat, project chat,
//!   project wizard).

pub mod api;
pub mod gateway;
pub mod messages;
pub mod provider;

pub use api::{CompletionError, OpenAiApi};
pub use gateway::{CompletionGateway, GatewayError};
pub use provider::{CompletionProvider, CompletionRequest, CompletionSettings};
