use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fixio_ai::{CompletionError, GatewayError};
use fixio_core::error::CoreError;
use fixio_store::StoreError;
use serde_json::json;

/// Message shown when the wizard answer cannot be parsed as a plan.
pub const INVALID_AI_JSON_MESSAGE: &str = "AI antwoord is geen geldig JSON";

/// Message shown when the completion provider fails.
pub const PROVIDER_ERROR_MESSAGE: &str = "OpenAI error";

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain, completion and store errors and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce consistent JSON error
/// responses of the form `{ "error": ..., "code": ... }`, plus `details` or
/// `raw` where the upstream text is part of the contract.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `fixio_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A completion gateway error from `fixio_ai`.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// A persistence error from `fixio_store`.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No route or resource under the given path.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<CompletionError> for AppError {
    fn from(err: CompletionError) -> Self {
        AppError::Gateway(GatewayError::Provider(err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Status, machine code, message and an optional extra body field.
type Classified = (StatusCode, &'static str, String, Option<(&'static str, String)>);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, extra) = match self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Gateway(GatewayError::Provider(err)) => {
                tracing::error!(error = %err, "Completion provider failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_ERROR",
                    PROVIDER_ERROR_MESSAGE.to_string(),
                    Some(("details", err.details())),
                )
            }
            AppError::Gateway(GatewayError::InvalidResponse { raw }) => invalid_ai_response(raw),
            AppError::Store(err) => classify_store_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some((key, value)) = extra {
            body[key] = json!(value);
        }

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(err: CoreError) -> Classified {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
            None,
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg, None),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg, None),
        CoreError::InvalidAiResponse { raw } => invalid_ai_response(raw),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

/// Store failures are the upstream's fault (502), except a rejected session
/// token, which is the caller's (401).
fn classify_store_error(err: StoreError) -> Classified {
    match err {
        StoreError::Api { status, body } if status == 401 || status == 403 => {
            tracing::warn!(status, "Store rejected the session");
            (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Session rejected by the store".to_string(),
                Some(("details", body)),
            )
        }
        StoreError::Api { status, body } => {
            tracing::error!(status, body = %body, "Store request failed");
            (
                StatusCode::BAD_GATEWAY,
                "STORE_ERROR",
                "Store error".to_string(),
                Some(("details", body)),
            )
        }
        other => {
            tracing::error!(error = %other, "Store request failed");
            (
                StatusCode::BAD_GATEWAY,
                "STORE_ERROR",
                "Store error".to_string(),
                Some(("details", other.to_string())),
            )
        }
    }
}

fn invalid_ai_response(raw: String) -> Classified {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INVALID_AI_RESPONSE",
        INVALID_AI_JSON_MESSAGE.to_string(),
        Some(("raw", raw)),
    )
}

fn internal() -> Classified {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
        None,
    )
}
