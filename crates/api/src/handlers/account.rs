use axum::Json;
use fixio_core::types::DbId;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;

/// Profile view of the signed-in account.
#[derive(Debug, Serialize)]
pub struct AccountProfile {
    pub id: DbId,
    pub email: Option<String>,
    pub name: Option<String>,
    pub display_name: String,
    pub user_type: &'static str,
    pub user_type_label: &'static str,
    pub subscription_plan: String,
}

/// GET /api/v1/me
pub async fn me(auth: AuthUser) -> AppResult<Json<DataResponse<AccountProfile>>> {
    let account = auth.account();
    Ok(Json(DataResponse {
        data: AccountProfile {
            id: account.id,
            email: account.email.clone(),
            name: account.name.clone(),
            display_name: account.display_name().to_string(),
            user_type: account.audience.as_tag(),
            user_type_label: account.audience.label(),
            subscription_plan: account.subscription_plan.clone(),
        },
    }))
}
