//! The three assistant call sites.
//!
//! Each call site has hardcoded model, token ceiling and temperature; callers
//! cannot change them. All calls are stateless single attempts.

use std::sync::Arc;

use fixio_core::account::AudienceCategory;
use fixio_core::chat::ChatTurn;
use fixio_core::error::CoreError;
use fixio_core::prompt::{
    persona_prompt, project_conversation, wizard_prompt, ProjectContext, WIZARD_SYSTEM_PROMPT,
};
use fixio_core::topic_gate::{is_home_improvement, matched_keyword, OFF_TOPIC_REPLY};
use fixio_core::wizard::{parse_plan, AiPlan};

use crate::api::CompletionError;
use crate::messages::ChatMessage;
use crate::provider::{CompletionProvider, CompletionRequest, CompletionSettings};

/// General chat: persona prompt plus the raw user message.
pub const GENERAL_CHAT: CompletionSettings = CompletionSettings {
    model: "gpt-3.5-turbo",
    max_tokens: 1000,
    temperature: 0.7,
};

/// Project-scoped chat.
pub const PROJECT_CHAT: CompletionSettings = CompletionSettings {
    model: "gpt-4o",
    max_tokens: 500,
    temperature: 0.5,
};

/// Plan generation (steps, materials, time estimate), with image input.
pub const PROJECT_WIZARD: CompletionSettings = CompletionSettings {
    model: "gpt-4o",
    max_tokens: 800,
    temperature: 0.4,
};

/// Substituted when the general chat provider answers without content.
pub const EMPTY_ANSWER_FALLBACK: &str = "Sorry, ik kon geen antwoord genereren.";

/// Errors surfaced by the gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The completion provider failed; carries its raw error body.
    #[error(transparent)]
    Provider(#[from] CompletionError),

    /// The wizard answer was not JSON, even after stripping a code fence.
    #[error("AI response is not valid JSON")]
    InvalidResponse { raw: String },
}

/// Outcome of a general chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneralReply {
    /// The topic gate rejected the message; the provider was not called.
    OffTopic,
    Answer(String),
}

impl GeneralReply {
    pub fn into_text(self) -> String {
        match self {
            GeneralReply::OffTopic => OFF_TOPIC_REPLY.to_string(),
            GeneralReply::Answer(text) => text,
        }
    }
}

/// Stateless front for the completion provider.
#[derive(Clone)]
pub struct CompletionGateway {
    provider: Arc<dyn CompletionProvider>,
}

impl CompletionGateway {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// Answer a free-form question, if it passes the topic gate.
    pub async fn general_chat(
        &self,
        message: &str,
        audience: AudienceCategory,
    ) -> Result<GeneralReply, GatewayError> {
        if !is_home_improvement(message) {
            tracing::debug!("General chat message rejected by topic gate");
            return Ok(GeneralReply::OffTopic);
        }
        tracing::debug!(
            keyword = matched_keyword(message).unwrap_or_default(),
            audience = audience.as_tag(),
            "General chat message accepted",
        );

        let request = CompletionRequest {
            settings: GENERAL_CHAT,
            messages: vec![
                ChatMessage::system(persona_prompt(audience)),
                ChatMessage::user(message),
            ],
        };
        let answer = self.provider.complete(request).await?;
        Ok(GeneralReply::Answer(
            answer
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| EMPTY_ANSWER_FALLBACK.to_string()),
        ))
    }

    /// Answer a question about one project. An answer without content is
    /// returned as `None`.
    pub async fn project_chat(
        &self,
        project: &ProjectContext,
        history: &[ChatTurn],
        prompt: &str,
    ) -> Result<Option<String>, GatewayError> {
        let conversation = project_conversation(project, history, prompt);
        let mut messages = Vec::with_capacity(conversation.turns.len() + 1);
        messages.push(ChatMessage::system(conversation.system));
        messages.extend(conversation.turns.iter().map(ChatMessage::from));

        let request = CompletionRequest {
            settings: PROJECT_CHAT,
            messages,
        };
        Ok(self.provider.complete(request).await?)
    }

    /// Generate a step plan, material list and time estimate.
    pub async fn project_wizard(
        &self,
        name: &str,
        description: &str,
        image_urls: &[String],
    ) -> Result<AiPlan, GatewayError> {
        let request = CompletionRequest {
            settings: PROJECT_WIZARD,
            messages: vec![
                ChatMessage::system(WIZARD_SYSTEM_PROMPT),
                ChatMessage::user_with_images(
                    wizard_prompt(name, description, image_urls),
                    image_urls,
                ),
            ],
        };
        let answer = self.provider.complete(request).await?.unwrap_or_default();

        parse_plan(&answer).map_err(|err| match err {
            CoreError::InvalidAiResponse { raw } => {
                tracing::warn!(raw_len = raw.len(), "Wizard answer is not valid JSON");
                GatewayError::InvalidResponse { raw }
            }
            other => GatewayError::InvalidResponse {
                raw: other.to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use assert_matches::assert_matches;
    use async_trait::async_trait;

    use super::*;
    use crate::messages::MessageContent;

    /// Provider that replays a canned answer and records every request.
    struct ScriptedProvider {
        answer: Result<Option<String>, (u16, String)>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedProvider {
        fn answering(text: Option<&str>) -> Arc<Self> {
            Arc::new(Self {
                answer: Ok(text.map(str::to_string)),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                answer: Err((status, body.to_string())),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<CompletionRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<Option<String>, CompletionError> {
            self.seen.lock().unwrap().push(request);
            match &self.answer {
                Ok(text) => Ok(text.clone()),
                Err((status, body)) => Err(CompletionError::Api {
                    status: *status,
                    body: body.clone(),
                }),
            }
        }
    }

    // -- general chat --

    #[tokio::test]
    async fn off_topic_message_never_reaches_provider() {
        let provider = ScriptedProvider::answering(Some("Parijs"));
        let gateway = CompletionGateway::new(provider.clone());

        let reply = gateway
            .general_chat("Wat is de hoofdstad van Frankrijk?", AudienceCategory::Hobbyist)
            .await
            .unwrap();

        assert_eq!(reply, GeneralReply::OffTopic);
        assert_eq!(reply.into_text(), OFF_TOPIC_REPLY);
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn on_topic_message_uses_persona_and_fixed_settings() {
        let provider = ScriptedProvider::answering(Some("Gebruik metselspecie."));
        let gateway = CompletionGateway::new(provider.clone());

        let reply = gateway
            .general_chat("Hoe metsel ik een muur?", AudienceCategory::Professional)
            .await
            .unwrap();

        assert_eq!(reply, GeneralReply::Answer("Gebruik metselspecie.".into()));
        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].settings, GENERAL_CHAT);
        assert_eq!(requests[0].messages.len(), 2);
        assert_eq!(
            requests[0].messages[0].text(),
            persona_prompt(AudienceCategory::Professional)
        );
        assert_eq!(requests[0].messages[1].text(), "Hoe metsel ik een muur?");
    }

    #[tokio::test]
    async fn empty_general_answer_uses_fallback() {
        let gateway = CompletionGateway::new(ScriptedProvider::answering(None));
        let reply = gateway
            .general_chat("Welke verf voor de badkamer?", AudienceCategory::Hobbyist)
            .await
            .unwrap();
        assert_eq!(reply.into_text(), EMPTY_ANSWER_FALLBACK);
    }

    #[tokio::test]
    async fn provider_failure_is_surfaced() {
        let gateway = CompletionGateway::new(ScriptedProvider::failing(429, "rate limited"));
        let err = gateway
            .general_chat("Tegelen in de keuken", AudienceCategory::Hobbyist)
            .await
            .unwrap_err();
        assert_matches!(
            err,
            GatewayError::Provider(CompletionError::Api { status: 429, ref body }) if body == "rate limited"
        );
    }

    // -- project chat --

    #[tokio::test]
    async fn project_chat_sends_system_history_and_prompt() {
        let provider = ScriptedProvider::answering(Some("Gebruik verzinkte schroeven."));
        let gateway = CompletionGateway::new(provider.clone());
        let project = ProjectContext {
            name: "Schutting bouwen".into(),
            description: "Nieuwe houten schutting plaatsen".into(),
            ..Default::default()
        };
        let history = vec![ChatTurn::user("Hoi"), ChatTurn::assistant("Hallo!")];

        let answer = gateway
            .project_chat(&project, &history, "Welke schroeven?")
            .await
            .unwrap();

        assert_eq!(answer.as_deref(), Some("Gebruik verzinkte schroeven."));
        let request = &provider.requests()[0];
        assert_eq!(request.settings, PROJECT_CHAT);
        let roles: Vec<_> = request.messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, ["system", "user", "assistant", "user"]);
        assert!(request.messages[0].text().contains("Projectnaam: Schutting bouwen"));
        assert_eq!(request.messages[3].text(), "Welke schroeven?");
    }

    #[tokio::test]
    async fn project_chat_keeps_absent_answer_absent() {
        let gateway = CompletionGateway::new(ScriptedProvider::answering(None));
        let answer = gateway
            .project_chat(&ProjectContext::default(), &[], "Vraag")
            .await
            .unwrap();
        assert_eq!(answer, None);
    }

    // -- wizard --

    #[tokio::test]
    async fn wizard_parses_fenced_answer() {
        let provider = ScriptedProvider::answering(Some(
            "```json\n{\"steps\":[\"Meet de lengte\"],\"materials\":[\"Houten palen\"],\"time_estimate\":\"1 dag\"}\n```",
        ));
        let gateway = CompletionGateway::new(provider.clone());

        let plan = gateway
            .project_wizard("Schutting bouwen", "Nieuwe houten schutting plaatsen", &[])
            .await
            .unwrap();

        assert_eq!(plan.steps, vec!["Meet de lengte"]);
        assert_eq!(plan.materials, vec!["Houten palen"]);
        assert_eq!(plan.time_estimate, "1 dag");
        assert_eq!(provider.requests()[0].settings, PROJECT_WIZARD);
    }

    #[tokio::test]
    async fn wizard_attaches_one_image_part_per_url() {
        let provider = ScriptedProvider::answering(Some("{}"));
        let gateway = CompletionGateway::new(provider.clone());
        let urls = vec!["https://img/a.jpg".to_string(), "https://img/b.jpg".to_string()];

        gateway.project_wizard("Tuin", "Terras", &urls).await.unwrap();

        let request = &provider.requests()[0];
        assert_eq!(request.messages[0].text(), WIZARD_SYSTEM_PROMPT);
        assert_matches!(&request.messages[1].content, MessageContent::Parts(parts) if parts.len() == 3);
    }

    #[tokio::test]
    async fn wizard_rejects_non_json_with_raw_text() {
        let gateway = CompletionGateway::new(ScriptedProvider::answering(Some("Geen JSON hier")));
        let err = gateway.project_wizard("Dak", "Lekkage", &[]).await.unwrap_err();
        assert_matches!(err, GatewayError::InvalidResponse { ref raw } if raw == "Geen JSON hier");
    }
}
