//! Handlers for the assistant endpoints under `/api`.
//!
//! These keep the response shapes the dashboard already reads: `{response}`,
//! `{answer}` and the bare plan object.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use fixio_core::account::AudienceCategory;
use fixio_core::chat::ChatTurn;
use fixio_core::prompt::ProjectContext;
use fixio_core::types::null_as_default;
use fixio_core::wizard::AiPlan;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::state::AppState;

/// Shown to the user when the general chat cannot reach the provider.
pub const TECHNICAL_ERROR_REPLY: &str = "Sorry, er is een technische fout opgetreden. Probeer het later opnieuw of neem contact op met de support.";

// ── General chat ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GeneralChatRequest {
    /// Absent reads as empty, which the topic gate rejects.
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, rename = "userType")]
    pub user_type: AudienceCategory,
}

#[derive(Debug, Serialize)]
pub struct GeneralChatResponse {
    pub response: String,
}

/// POST /api/ai-chat
///
/// Always answers with `{response}`. An unreadable body or a provider
/// failure becomes a 500 with an apology in the same field.
pub async fn general_chat(
    State(state): State<AppState>,
    input: Result<Json<GeneralChatRequest>, JsonRejection>,
) -> (StatusCode, Json<GeneralChatResponse>) {
    let input = match input {
        Ok(Json(input)) => input,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "General chat body rejected");
            return technical_error();
        }
    };

    match state
        .gateway
        .general_chat(&input.message, input.user_type)
        .await
    {
        Ok(reply) => (
            StatusCode::OK,
            Json(GeneralChatResponse {
                response: reply.into_text(),
            }),
        ),
        Err(err) => {
            tracing::error!(error = %err, "General chat failed");
            technical_error()
        }
    }
}

fn technical_error() -> (StatusCode, Json<GeneralChatResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(GeneralChatResponse {
            response: TECHNICAL_ERROR_REPLY.to_string(),
        }),
    )
}

// ── Project chat ─────────────────────────────────────────────────────

/// Read only after `prompt` and `project` have been found in the body.
#[derive(Debug, Deserialize)]
pub struct ProjectChatRequest {
    pub project: ProjectContext,
    #[serde(default, deserialize_with = "null_as_default")]
    pub history: Vec<ChatTurn>,
}

#[derive(Debug, Serialize)]
pub struct ProjectChatResponse {
    /// Absent when the provider answered without content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

/// POST /api/ai-project-chat
///
/// A missing prompt or project is reported before the rest of the body is
/// looked at.
pub async fn project_chat(
    State(state): State<AppState>,
    AppJson(body): AppJson<Value>,
) -> AppResult<Json<ProjectChatResponse>> {
    let prompt = body.get("prompt").and_then(Value::as_str).map(str::to_string);
    let has_project = body.get("project").is_some_and(|p| !p.is_null());
    let (true, Some(prompt)) = (has_project, non_empty(prompt)) else {
        return Err(AppError::BadRequest("Missing project or prompt".into()));
    };

    let input: ProjectChatRequest =
        serde_json::from_value(body).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let answer = state
        .gateway
        .project_chat(&input.project, &input.history, &prompt)
        .await?;
    Ok(Json(ProjectChatResponse { answer }))
}

// ── Wizard ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct WizardRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_urls: Vec<String>,
}

/// POST /api/ai-project-wizard
pub async fn project_wizard(
    State(state): State<AppState>,
    AppJson(input): AppJson<WizardRequest>,
) -> AppResult<Json<AiPlan>> {
    let (Some(name), Some(description)) = (non_empty(input.name), non_empty(input.description))
    else {
        return Err(AppError::BadRequest("Missing name or description".into()));
    };

    tracing::info!(images = input.image_urls.len(), "Generating project plan");
    let plan = state
        .gateway
        .project_wizard(&name, &description, &input.image_urls)
        .await?;
    Ok(Json(plan))
}

/// Present and non-empty. Whitespace counts as content.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
