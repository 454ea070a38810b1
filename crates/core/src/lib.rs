//! Domain layer for the Fixio DIY assistant.
//!
//! Everything in this crate is pure: the topic gate, prompt assembly,
//! wizard-response parsing and the project/account/chat models. Network and
//! storage access live in `fixio-ai`, `fixio-store` and `fixio-api`.

pub mod account;
pub mod chat;
pub mod error;
pub mod project;
pub mod prompt;
pub mod topic_gate;
pub mod types;
pub mod wizard;
