use axum::routing::get;
use axum::Router;

use crate::handlers::account;
use crate::state::AppState;

/// `GET /me` -> the signed-in account's profile.
pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(account::me))
}
