//! Route definitions for the assistant endpoints.

use axum::routing::post;
use axum::Router;

use crate::handlers::ai;
use crate::state::AppState;

/// Routes mounted at `/api`.
///
/// ```text
/// POST /ai-chat            -> general_chat
/// POST /ai-project-chat    -> project_chat
/// POST /ai-project-wizard  -> project_wizard
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ai-chat", post(ai::general_chat))
        .route("/ai-project-chat", post(ai::project_chat))
        .route("/ai-project-wizard", post(ai::project_wizard))
}
