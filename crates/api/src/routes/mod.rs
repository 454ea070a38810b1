pub mod account;
pub mod ai;
pub mod health;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /ai-chat                          general chat (public)
/// /ai-project-chat                  project chat, project sent inline (public)
/// /ai-project-wizard                plan generation (public)
///
/// /v1/me                            account profile (auth required)
/// /v1/projects                      list, create (auth required)
/// /v1/projects/{id}                 get, update, delete
/// /v1/projects/{id}/status          update status (PATCH)
/// /v1/projects/{id}/images          upload images (POST, multipart)
/// /v1/projects/{id}/generate        run the wizard and store the plan (POST)
/// /v1/projects/{id}/chat            project chat on the stored project (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    let v1 = Router::new()
        .merge(account::router())
        .nest("/projects", project::router());

    Router::new().merge(ai::router()).nest("/v1", v1)
}
