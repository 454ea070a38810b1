//! Route definitions for the `/projects` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Upper bound for one multipart image upload request.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                 -> list
/// POST   /                 -> create
/// GET    /{id}             -> get_by_id
/// PUT    /{id}             -> update
/// DELETE /{id}             -> delete
/// PATCH  /{id}/status      -> update_status
/// POST   /{id}/images      -> upload_images
/// POST   /{id}/generate    -> generate_plan
/// POST   /{id}/chat        -> chat
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{id}/status", patch(project::update_status))
        .route(
            "/{id}/images",
            post(project::upload_images).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/{id}/generate", post(project::generate_plan))
        .route("/{id}/chat", post(project::chat))
}
